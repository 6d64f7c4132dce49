use super::models::{CalendarListResponse, CalendarSummary, EventsResponse, ExternalEvent};
use super::time::HarvestWindow;
use super::token::AccessTokenProvider;
use crate::components::CalendarSource;
use crate::error::{google_calendar_error, SyncResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// REST client for the Google Calendar v3 API
pub struct GoogleCalendarClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl GoogleCalendarClient {
    pub fn new(client: Client, base_url: &str, tokens: Arc<dyn AccessTokenProvider>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    /// Build an endpoint URL, percent-encoding each path segment
    fn endpoint(&self, segments: &[&str]) -> SyncResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| google_calendar_error("Base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, params: &[(&str, String)]) -> SyncResult<T> {
        let access_token = self.tokens.access_token().await?;

        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .query(params)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!("HTTP {} - {}", status, error_body)));
        }

        response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl CalendarSource for GoogleCalendarClient {
    async fn list_calendars(&self) -> SyncResult<Vec<CalendarSummary>> {
        let url = self.endpoint(&["users", "me", "calendarList"])?;
        let mut calendars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = Vec::new();
            if let Some(token) = &page_token {
                params.push(("pageToken", token.clone()));
            }

            let page: CalendarListResponse = self.get_json(url.clone(), &params).await?;
            calendars.extend(page.items.into_iter().map(CalendarSummary::from));

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        info!("Found {} calendars", calendars.len());
        Ok(calendars)
    }

    async fn list_events(
        &self,
        calendar: &CalendarSummary,
        window: &HarvestWindow,
        now: DateTime<Utc>,
    ) -> SyncResult<Vec<ExternalEvent>> {
        let url = self.endpoint(&["calendars", calendar.id.as_str(), "events"])?;
        let base_params = window.query_params(now)?;
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = base_params.clone();
            if let Some(token) = &page_token {
                params.push(("pageToken", token.clone()));
            }

            let page: EventsResponse = self.get_json(url.clone(), &params).await?;
            for raw in page.items {
                if let Some(event) = ExternalEvent::from_google(raw, calendar)? {
                    events.push(event);
                }
            }

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        debug!(calendar_id = %calendar.id, count = events.len(), "Fetched events");
        Ok(events)
    }
}
