//! Builders and readers for Notion database property values.
//!
//! Builders produce the request shape (`text.content`), readers accept both
//! the request shape and the response shape (`plain_text`).

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Property name to property value, as sent to and returned by Notion
pub type PropertyMap = Map<String, Value>;

/// Notion rejects rich text segments longer than this many characters
pub const RICH_TEXT_SEGMENT_LIMIT: usize = 2000;

/// Names of the database properties managed by the sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyNames {
    /// Title property
    pub title: String,
    /// Date range property
    pub date: String,
    /// Select holding the source calendar label
    pub source: String,
    /// Rich text holding the provider event id
    pub uid: String,
    /// Rich text holding the location
    pub location: String,
    /// Rich text holding the description
    pub notes: String,
    /// URL property holding the event link
    pub link: String,
}

impl Default for PropertyNames {
    fn default() -> Self {
        Self {
            title: "Name".to_string(),
            date: "Start".to_string(),
            source: "Source".to_string(),
            uid: "UID".to_string(),
            location: "Location".to_string(),
            notes: "Notes".to_string(),
            link: "Link".to_string(),
        }
    }
}

pub fn title(content: &str) -> Value {
    json!({ "title": text_segments(content) })
}

pub fn rich_text(content: &str) -> Value {
    json!({ "rich_text": text_segments(content) })
}

pub fn date(start: &str, end: Option<&str>) -> Value {
    json!({ "date": { "start": start, "end": end } })
}

/// Select option; Notion does not allow commas in option names
pub fn select(name: &str) -> Value {
    let name = name.replace(',', " ");
    json!({ "select": { "name": name.trim() } })
}

pub fn url(link: &str) -> Value {
    json!({ "url": link })
}

fn text_segments(content: &str) -> Vec<Value> {
    let chars: Vec<char> = content.chars().collect();
    chars
        .chunks(RICH_TEXT_SEGMENT_LIMIT)
        .map(|chunk| {
            let piece: String = chunk.iter().collect();
            json!({ "text": { "content": piece } })
        })
        .collect()
}

/// Concatenated text of a rich text property, `None` when absent, mistyped or empty
pub fn rich_text_value(properties: &PropertyMap, name: &str) -> Option<String> {
    segments_text(properties.get(name)?, "rich_text")
}

/// Concatenated text of a title property
pub fn title_value(properties: &PropertyMap, name: &str) -> Option<String> {
    segments_text(properties.get(name)?, "title")
}

/// Start of a date property
pub fn date_start(properties: &PropertyMap, name: &str) -> Option<String> {
    properties
        .get(name)?
        .get("date")?
        .get("start")?
        .as_str()
        .map(str::to_string)
}

fn segments_text(property: &Value, kind: &str) -> Option<String> {
    if let Some(declared) = property.get("type").and_then(Value::as_str) {
        if declared != kind {
            return None;
        }
    }

    let segments = property.get(kind)?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|segment| {
            segment
                .get("plain_text")
                .or_else(|| segment.get("text").and_then(|t| t.get("content")))
                .and_then(Value::as_str)
        })
        .collect();

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
