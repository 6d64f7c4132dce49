use super::mapping;
use crate::components::google_calendar::ExternalEvent;
use crate::components::notion::PropertyNames;
use crate::components::RecordStore;
use crate::error::{config_error, Error, SyncResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;

/// How an event is matched to an existing record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Exact match on the provider event id
    #[default]
    Uid,
    /// Exact match on title and start timestamp
    TitleAndStart,
}

impl FromStr for MatchStrategy {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "uid" => Ok(MatchStrategy::Uid),
            "title_start" | "title_and_start" => Ok(MatchStrategy::TitleAndStart),
            other => Err(config_error(&format!(
                "Invalid match strategy '{}', expected 'uid' or 'title_start'",
                other
            ))),
        }
    }
}

/// Distinguishing key of a record under a strategy
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchKey {
    Uid(String),
    TitleAndStart { title: String, start: String },
}

impl MatchKey {
    pub fn for_event(strategy: MatchStrategy, event: &ExternalEvent) -> Self {
        match strategy {
            MatchStrategy::Uid => MatchKey::Uid(event.id.clone()),
            MatchStrategy::TitleAndStart => MatchKey::TitleAndStart {
                title: mapping::display_title(event).to_string(),
                start: event.start.to_string(),
            },
        }
    }
}

/// Result of a single upsert, carrying the page id written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created(String),
    Updated(String),
}

impl UpsertOutcome {
    pub fn page_id(&self) -> &str {
        match self {
            UpsertOutcome::Created(id) | UpsertOutcome::Updated(id) => id,
        }
    }
}

/// Creates or updates one record per event, one event at a time
pub struct UpsertEngine<'a> {
    store: &'a dyn RecordStore,
    strategy: MatchStrategy,
    properties: &'a PropertyNames,
    source_label: Option<&'a str>,
    /// Keys written during this run and the page holding each
    written: HashMap<MatchKey, String>,
}

impl<'a> UpsertEngine<'a> {
    pub fn new(
        store: &'a dyn RecordStore,
        strategy: MatchStrategy,
        properties: &'a PropertyNames,
        source_label: Option<&'a str>,
    ) -> Self {
        Self {
            store,
            strategy,
            properties,
            source_label,
            written: HashMap::new(),
        }
    }

    pub async fn upsert(&mut self, event: &ExternalEvent) -> SyncResult<UpsertOutcome> {
        let key = MatchKey::for_event(self.strategy, event);
        let source = mapping::source_label(event, self.source_label);
        let props = mapping::event_properties(event, self.properties, source);

        let existing = match self.written.get(&key) {
            Some(page_id) => Some(page_id.clone()),
            None => self.find_existing(&key).await?,
        };

        let outcome = match existing {
            Some(page_id) => {
                self.store.update(&page_id, &props).await?;
                UpsertOutcome::Updated(page_id)
            }
            None => UpsertOutcome::Created(self.store.create(&props).await?),
        };

        debug!(event_id = %event.id, outcome = ?outcome, "Upserted event");
        self.written.insert(key, outcome.page_id().to_string());
        Ok(outcome)
    }

    /// First record matching `key`; later duplicates are never considered
    async fn find_existing(&self, key: &MatchKey) -> SyncResult<Option<String>> {
        let page = self.store.query(Some(key), 1, None).await?;
        Ok(page.results.into_iter().next().map(|record| record.id))
    }
}
