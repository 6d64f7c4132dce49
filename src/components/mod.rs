use crate::error::SyncResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

// Export components
pub mod google_calendar;
pub mod notion;
pub mod sync;

use google_calendar::{CalendarSummary, ExternalEvent, HarvestWindow};
use notion::{PropertyMap, QueryPage};
use sync::MatchKey;

/// Calendar provider the events are read from
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// All calendars visible to the credential
    async fn list_calendars(&self) -> SyncResult<Vec<CalendarSummary>>;

    /// Events of one calendar inside the harvest window
    async fn list_events(
        &self,
        calendar: &CalendarSummary,
        window: &HarvestWindow,
        now: DateTime<Utc>,
    ) -> SyncResult<Vec<ExternalEvent>>;
}

/// Database the events are written to
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// One page of records, optionally restricted to those matching `filter`
    async fn query(
        &self,
        filter: Option<&MatchKey>,
        page_size: u32,
        start_cursor: Option<&str>,
    ) -> SyncResult<QueryPage>;

    /// Create a record and return its id
    async fn create(&self, properties: &PropertyMap) -> SyncResult<String>;

    /// Overwrite the given properties of an existing record
    async fn update(&self, page_id: &str, properties: &PropertyMap) -> SyncResult<()>;
}
