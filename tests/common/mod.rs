#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gcal_notion_sync::components::google_calendar::{CalendarSummary, ExternalEvent, HarvestWindow};
use gcal_notion_sync::components::notion::properties::{self, PropertyMap};
use gcal_notion_sync::components::notion::{Page, QueryPage};
use gcal_notion_sync::components::sync::MatchKey;
use gcal_notion_sync::components::{CalendarSource, RecordStore};
use gcal_notion_sync::error::{notion_error, SyncResult};
use gcal_notion_sync::utils::time::EventTime;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Build an event on the default test calendar
pub fn event(id: &str, title: Option<&str>, start: &str) -> ExternalEvent {
    ExternalEvent {
        id: id.to_string(),
        title: title.map(str::to_string),
        start: EventTime::parse(start).unwrap(),
        end: None,
        location: None,
        description: None,
        calendar_id: "me@example.com".to_string(),
        calendar_name: "Personal".to_string(),
        link: None,
    }
}

pub fn calendar(id: &str, name: &str) -> CalendarSummary {
    CalendarSummary {
        id: id.to_string(),
        name: name.to_string(),
    }
}

/// Mock calendar provider serving fixed events per calendar
#[derive(Debug, Clone, Default)]
pub struct MockCalendar {
    calendars: Vec<CalendarSummary>,
    events: HashMap<String, Vec<ExternalEvent>>,
    /// Calendar ids in the order their events were requested
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl MockCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a calendar with its events
    pub fn with_calendar(mut self, calendar: CalendarSummary, events: Vec<ExternalEvent>) -> Self {
        self.events.insert(calendar.id.clone(), events);
        self.calendars.push(calendar);
        self
    }
}

#[async_trait]
impl CalendarSource for MockCalendar {
    async fn list_calendars(&self) -> SyncResult<Vec<CalendarSummary>> {
        Ok(self.calendars.clone())
    }

    async fn list_events(
        &self,
        calendar: &CalendarSummary,
        _window: &HarvestWindow,
        _now: DateTime<Utc>,
    ) -> SyncResult<Vec<ExternalEvent>> {
        self.requests.lock().await.push(calendar.id.clone());
        Ok(self.events.get(&calendar.id).cloned().unwrap_or_default())
    }
}

/// In-memory stand-in for a Notion database using the default property names
#[derive(Debug, Default)]
pub struct MockStore {
    records: Mutex<Vec<Page>>,
    next_id: AtomicUsize,
    query_calls: AtomicUsize,
    writes: AtomicUsize,
    /// Fail every write after this many have succeeded
    fail_after_writes: Option<usize>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_after(writes: usize) -> Self {
        Self {
            fail_after_writes: Some(writes),
            ..Self::default()
        }
    }

    /// Seed a record directly, bypassing the write counters
    pub async fn seed(&self, id: &str, properties: PropertyMap) {
        self.records.lock().await.push(Page {
            id: id.to_string(),
            properties,
        });
    }

    /// Seed a record carrying only a UID in the response shape
    pub async fn seed_uid(&self, id: &str, uid: &str) {
        let properties = serde_json::from_value(json!({
            "UID": {
                "type": "rich_text",
                "rich_text": [{ "type": "text", "plain_text": uid }]
            }
        }))
        .unwrap();
        self.seed(id, properties).await;
    }

    pub async fn records(&self) -> Vec<Page> {
        self.records.lock().await.clone()
    }

    pub async fn record(&self, id: &str) -> Option<Page> {
        self.records.lock().await.iter().find(|p| p.id == id).cloned()
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    fn check_write(&self) -> SyncResult<()> {
        let done = self.writes.fetch_add(1, Ordering::SeqCst);
        match self.fail_after_writes {
            Some(limit) if done >= limit => Err(notion_error("HTTP 429 - rate_limited")),
            _ => Ok(()),
        }
    }
}

fn matches(page: &Page, key: &MatchKey) -> bool {
    match key {
        MatchKey::Uid(uid) => {
            properties::rich_text_value(&page.properties, "UID").as_deref() == Some(uid.as_str())
        }
        MatchKey::TitleAndStart { title, start } => {
            properties::title_value(&page.properties, "Name").as_deref() == Some(title.as_str())
                && properties::date_start(&page.properties, "Start").as_deref() == Some(start.as_str())
        }
    }
}

#[async_trait]
impl RecordStore for MockStore {
    async fn query(
        &self,
        filter: Option<&MatchKey>,
        page_size: u32,
        start_cursor: Option<&str>,
    ) -> SyncResult<QueryPage> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);

        let records = self.records.lock().await;
        let matching: Vec<Page> = records
            .iter()
            .filter(|page| filter.map_or(true, |key| matches(page, key)))
            .cloned()
            .collect();

        let offset: usize = start_cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
        let end = (offset + page_size as usize).min(matching.len());
        let next_cursor = if end < matching.len() {
            Some(end.to_string())
        } else {
            None
        };

        Ok(QueryPage {
            results: matching[offset..end].to_vec(),
            next_cursor,
        })
    }

    async fn create(&self, properties: &PropertyMap) -> SyncResult<String> {
        self.check_write()?;

        let id = format!("page-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.records.lock().await.push(Page {
            id: id.clone(),
            properties: properties.clone(),
        });
        Ok(id)
    }

    async fn update(&self, page_id: &str, properties: &PropertyMap) -> SyncResult<()> {
        self.check_write()?;

        let mut records = self.records.lock().await;
        let page = records
            .iter_mut()
            .find(|p| p.id == page_id)
            .ok_or_else(|| notion_error(&format!("HTTP 404 - page {} not found", page_id)))?;

        for (name, value) in properties {
            page.properties.insert(name.clone(), value.clone());
        }
        Ok(())
    }
}
