use crate::error::{Error, SyncResult};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, SecondsFormat};
use std::fmt;

/// Duration assumed for events that carry no end
pub const DEFAULT_EVENT_DURATION_MS: i64 = 3_600_000;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A point in time as the calendar reports it: either a whole day or an instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTime {
    /// All-day value, rendered as `YYYY-MM-DD`
    Date(NaiveDate),
    /// RFC 3339 instant; `zulu` keeps a `Z` suffix on output
    DateTime {
        value: DateTime<FixedOffset>,
        zulu: bool,
    },
}

impl EventTime {
    /// Parse a date (`2024-01-01`) or an RFC 3339 date-time
    pub fn parse(raw: &str) -> SyncResult<Self> {
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            return Ok(EventTime::Date(date));
        }

        let value = DateTime::parse_from_rfc3339(raw)
            .map_err(|e| Error::Serialization(format!("Failed to parse timestamp '{}': {}", raw, e)))?;
        let zulu = raw.ends_with('Z') || raw.ends_with('z');
        Ok(EventTime::DateTime { value, zulu })
    }

    /// Pick the Google `dateTime` field over `date` and parse it
    pub fn from_parts(date_time: Option<&str>, date: Option<&str>) -> SyncResult<Option<Self>> {
        match date_time.or(date) {
            Some(raw) => Self::parse(raw).map(Some),
            None => Ok(None),
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }

    /// Shift by `duration`, keeping the representation style
    pub fn shifted(&self, duration: Duration) -> Self {
        match self {
            EventTime::Date(date) => {
                let shifted = date.and_time(NaiveTime::default()) + duration;
                EventTime::Date(shifted.date())
            }
            EventTime::DateTime { value, zulu } => EventTime::DateTime {
                value: *value + duration,
                zulu: *zulu,
            },
        }
    }

    /// End used when the source event has none
    pub fn default_end(&self) -> Self {
        self.shifted(Duration::milliseconds(DEFAULT_EVENT_DURATION_MS))
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            EventTime::DateTime { value, zulu } => {
                write!(f, "{}", value.to_rfc3339_opts(SecondsFormat::AutoSi, *zulu))
            }
        }
    }
}
