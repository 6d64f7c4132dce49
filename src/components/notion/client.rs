use super::models::{CreatePageRequest, Page, Parent, QueryPage, QueryRequest, QueryResponse, UpdatePageRequest};
use super::properties::{PropertyMap, PropertyNames};
use crate::components::sync::MatchKey;
use crate::components::RecordStore;
use crate::config::Config;
use crate::error::{notion_error, SyncResult};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

/// API version sent with every request
pub const NOTION_VERSION: &str = "2022-06-28";

/// REST client bound to a single Notion database
pub struct NotionClient {
    client: Client,
    base_url: String,
    token: String,
    database_id: String,
    properties: PropertyNames,
}

impl NotionClient {
    pub fn new(config: &Config, client: Client) -> Self {
        Self {
            client,
            base_url: config.notion_api_url.trim_end_matches('/').to_string(),
            token: config.notion_token.clone(),
            database_id: config.notion_database_id.clone(),
            properties: config.properties.clone(),
        }
    }

    /// Notion filter object selecting records with the given key
    pub fn filter_for(&self, key: &MatchKey) -> Value {
        match key {
            MatchKey::Uid(uid) => json!({
                "property": self.properties.uid,
                "rich_text": { "equals": uid }
            }),
            MatchKey::TitleAndStart { title, start } => json!({
                "and": [
                    { "property": self.properties.title, "title": { "equals": title } },
                    { "property": self.properties.date, "date": { "equals": start } }
                ]
            }),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.base_url, path))
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: &B) -> SyncResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .request(method, path)
            .json(body)
            .send()
            .await
            .map_err(|e| notion_error(&format!("Request to {} failed: {}", path, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(notion_error(&format!("{} returned HTTP {} - {}", path, status, error_body)));
        }

        response
            .json()
            .await
            .map_err(|e| notion_error(&format!("Failed to parse {} response: {}", path, e)))
    }
}

#[async_trait]
impl RecordStore for NotionClient {
    async fn query(
        &self,
        filter: Option<&MatchKey>,
        page_size: u32,
        start_cursor: Option<&str>,
    ) -> SyncResult<QueryPage> {
        let body = QueryRequest {
            page_size,
            start_cursor,
            filter: filter.map(|key| self.filter_for(key)),
        };
        let path = format!("databases/{}/query", self.database_id);

        let response: QueryResponse = self.send(Method::POST, &path, &body).await?;
        Ok(response.into())
    }

    async fn create(&self, properties: &PropertyMap) -> SyncResult<String> {
        let body = CreatePageRequest {
            parent: Parent {
                database_id: &self.database_id,
            },
            properties,
        };

        let page: Page = self.send(Method::POST, "pages", &body).await?;
        debug!(page_id = %page.id, "Created page");
        Ok(page.id)
    }

    async fn update(&self, page_id: &str, properties: &PropertyMap) -> SyncResult<()> {
        let body = UpdatePageRequest { properties };

        let page: Page = self
            .send(Method::PATCH, &format!("pages/{}", page_id), &body)
            .await?;
        debug!(page_id = %page.id, "Updated page");
        Ok(())
    }
}
