pub mod index;
pub mod mapping;
pub mod upsert;

pub use index::fetch_existing_uids;
pub use upsert::{MatchKey, MatchStrategy, UpsertEngine, UpsertOutcome};

use crate::components::google_calendar::HarvestWindow;
use crate::components::notion::PropertyNames;
use crate::components::{CalendarSource, RecordStore};
use crate::config::Config;
use crate::error::SyncResult;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Policies applied to a sync run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncSettings {
    pub match_strategy: MatchStrategy,
    pub harvest_window: HarvestWindow,
    pub preflight_index: bool,
    pub source_label: Option<String>,
    pub properties: PropertyNames,
}

impl From<&Config> for SyncSettings {
    fn from(config: &Config) -> Self {
        Self {
            match_strategy: config.match_strategy,
            harvest_window: config.harvest_window,
            preflight_index: config.preflight_index,
            source_label: config.source_label.clone(),
            properties: config.properties.clone(),
        }
    }
}

/// Counts for a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub calendars: usize,
    pub events: usize,
    pub created: usize,
    pub updated: usize,
    /// Size of the pre-flight UID index, when one was built
    pub indexed: Option<usize>,
}

/// Pulls events from every calendar and upserts them into the record store
pub struct SyncEngine<'a> {
    source: &'a dyn CalendarSource,
    store: &'a dyn RecordStore,
    settings: SyncSettings,
}

impl<'a> SyncEngine<'a> {
    pub fn new(source: &'a dyn CalendarSource, store: &'a dyn RecordStore, settings: SyncSettings) -> Self {
        Self {
            source,
            store,
            settings,
        }
    }

    /// Run one sync pass. Calendars and events are processed strictly in
    /// order; the first error aborts the run.
    pub async fn run(&self, now: DateTime<Utc>) -> SyncResult<SyncReport> {
        let mut report = SyncReport::default();

        let mut known_uids = if self.settings.preflight_index {
            let uids = fetch_existing_uids(self.store, &self.settings.properties).await?;
            info!("Database holds {} synced events", uids.len());
            Some(uids)
        } else {
            None
        };

        let mut engine = UpsertEngine::new(
            self.store,
            self.settings.match_strategy,
            &self.settings.properties,
            self.settings.source_label.as_deref(),
        );

        let calendars = self.source.list_calendars().await?;
        report.calendars = calendars.len();

        for calendar in &calendars {
            let events = self
                .source
                .list_events(calendar, &self.settings.harvest_window, now)
                .await?;
            debug!(calendar = %calendar.name, count = events.len(), "Syncing calendar");

            for event in &events {
                match engine.upsert(event).await? {
                    UpsertOutcome::Created(_) => report.created += 1,
                    UpsertOutcome::Updated(_) => report.updated += 1,
                }
                report.events += 1;

                if let Some(uids) = known_uids.as_mut() {
                    uids.insert(event.id.clone());
                }
            }
        }

        report.indexed = known_uids.map(|uids| uids.len());
        Ok(report)
    }
}
