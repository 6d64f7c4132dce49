use crate::error::{config_error, SyncResult};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Page size used for incremental pulls
pub const RECENT_PAGE_SIZE: u32 = 100;
/// Page size used for full look-ahead pulls
pub const UPCOMING_PAGE_SIZE: u32 = 2500;

/// Which events are pulled on a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarvestWindow {
    /// Events modified within the last `minutes`
    Recent { minutes: i64 },
    /// Events starting between now and `days` ahead
    Upcoming { days: i64 },
}

impl Default for HarvestWindow {
    fn default() -> Self {
        HarvestWindow::Recent { minutes: 15 }
    }
}

impl HarvestWindow {
    /// Query parameters for `events.list`, relative to `now`
    pub fn query_params(&self, now: DateTime<Utc>) -> SyncResult<Vec<(&'static str, String)>> {
        let mut params = vec![("singleEvents", "true".to_string())];

        match *self {
            HarvestWindow::Recent { minutes } => {
                let updated_min = Duration::try_minutes(minutes)
                    .and_then(|span| now.checked_sub_signed(span))
                    .ok_or_else(|| out_of_range(self))?;
                params.push(("updatedMin", format_instant(updated_min)));
                params.push(("orderBy", "updated".to_string()));
                params.push(("maxResults", RECENT_PAGE_SIZE.to_string()));
            }
            HarvestWindow::Upcoming { days } => {
                let time_max = Duration::try_days(days)
                    .and_then(|span| now.checked_add_signed(span))
                    .ok_or_else(|| out_of_range(self))?;
                params.push(("timeMin", format_instant(now)));
                params.push(("timeMax", format_instant(time_max)));
                params.push(("orderBy", "startTime".to_string()));
                params.push(("maxResults", UPCOMING_PAGE_SIZE.to_string()));
            }
        }

        Ok(params)
    }
}

fn out_of_range(window: &HarvestWindow) -> crate::error::Error {
    config_error(&format!("Harvest window {:?} is out of range", window))
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
