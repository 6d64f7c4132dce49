use super::properties::PropertyMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A database row as returned by Notion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: PropertyMap,
}

/// One page of a database query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPage {
    pub results: Vec<Page>,
    /// Cursor for the next page, `None` on the last page
    pub next_cursor: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QueryRequest<'a> {
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

impl From<QueryResponse> for QueryPage {
    fn from(response: QueryResponse) -> Self {
        let next_cursor = if response.has_more {
            response.next_cursor
        } else {
            None
        };
        QueryPage {
            results: response.results,
            next_cursor,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreatePageRequest<'a> {
    pub parent: Parent<'a>,
    pub properties: &'a PropertyMap,
}

#[derive(Debug, Serialize)]
pub(crate) struct Parent<'a> {
    pub database_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdatePageRequest<'a> {
    pub properties: &'a PropertyMap,
}
