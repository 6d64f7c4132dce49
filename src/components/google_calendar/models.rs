use crate::error::SyncResult;
use crate::utils::time::EventTime;
use serde::Deserialize;
use tracing::warn;

/// A calendar visible to the configured credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarSummary {
    pub id: String,
    pub name: String,
}

/// Calendar event as handed to the sync engine
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalEvent {
    pub id: String,
    pub title: Option<String>,
    pub start: EventTime,
    pub end: Option<EventTime>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub calendar_id: String,
    pub calendar_name: String,
    pub link: Option<String>,
}

impl ExternalEvent {
    /// Derive an event from the raw API shape.
    ///
    /// Returns `None` for cancelled events and for events without a usable start.
    pub fn from_google(event: GoogleEvent, calendar: &CalendarSummary) -> SyncResult<Option<Self>> {
        if event.status.as_deref() == Some("cancelled") {
            return Ok(None);
        }

        let start = match event.start {
            Some(start) => EventTime::from_parts(start.date_time.as_deref(), start.date.as_deref())?,
            None => None,
        };
        let Some(start) = start else {
            warn!(event_id = %event.id, calendar_id = %calendar.id, "Skipping event without a start time");
            return Ok(None);
        };

        let end = match event.end {
            Some(end) => EventTime::from_parts(end.date_time.as_deref(), end.date.as_deref())?,
            None => None,
        };

        Ok(Some(ExternalEvent {
            id: event.id,
            title: event.summary,
            start,
            end,
            location: event.location,
            description: event.description,
            calendar_id: calendar.id.clone(),
            calendar_name: calendar.name.clone(),
            link: event.html_link,
        }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListResponse {
    #[serde(default)]
    pub items: Vec<CalendarListEntry>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListEntry {
    pub id: String,
    pub summary: Option<String>,
    pub summary_override: Option<String>,
}

impl From<CalendarListEntry> for CalendarSummary {
    fn from(entry: CalendarListEntry) -> Self {
        let name = entry
            .summary_override
            .or(entry.summary)
            .unwrap_or_else(|| entry.id.clone());
        CalendarSummary { id: entry.id, name }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsResponse {
    #[serde(default)]
    pub items: Vec<GoogleEvent>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEvent {
    pub id: String,
    pub status: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub html_link: Option<String>,
    pub start: Option<EventDateTime>,
    pub end: Option<EventDateTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date: Option<String>,
    pub date_time: Option<String>,
}
