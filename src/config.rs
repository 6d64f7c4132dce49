use crate::components::google_calendar::time::HarvestWindow;
use crate::components::notion::properties::PropertyNames;
use crate::components::sync::MatchStrategy;
use crate::error::{config_error, env_error, SyncResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::ErrorKind;

/// Default Notion API base URL
pub const DEFAULT_NOTION_API_URL: &str = "https://api.notion.com/v1";
/// Default Google Calendar API base URL
pub const DEFAULT_GOOGLE_API_URL: &str = "https://www.googleapis.com/calendar/v3";
/// Default Google OAuth token endpoint
pub const DEFAULT_GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
/// Default location of the property name overrides
pub const DEFAULT_PROPERTIES_FILE: &str = "config/properties.toml";

const DEFAULT_RECENT_MINUTES: i64 = 15;
const DEFAULT_UPCOMING_DAYS: i64 = 365;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
/// Longest accepted incremental window, one year
pub const MAX_RECENT_MINUTES: i64 = 525_600;
/// Longest accepted look-ahead window, ten years
pub const MAX_UPCOMING_DAYS: i64 = 3650;

/// Main configuration structure for a sync run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Notion integration token
    pub notion_token: String,
    /// Target Notion database ID
    pub notion_database_id: String,
    /// Notion API base URL
    pub notion_api_url: String,
    /// Google OAuth client ID
    pub google_client_id: String,
    /// Google OAuth client secret
    pub google_client_secret: String,
    /// Long-lived Google refresh token
    pub google_refresh_token: String,
    /// Google Calendar API base URL
    pub google_api_url: String,
    /// Google OAuth token endpoint
    pub google_token_url: String,
    /// How events are matched to existing records
    pub match_strategy: MatchStrategy,
    /// Which events are pulled from the calendars
    pub harvest_window: HarvestWindow,
    /// Build the existing UID index before syncing
    pub preflight_index: bool,
    /// Fixed label for the source select, calendar name when unset
    pub source_label: Option<String>,
    /// Names of the managed database properties
    pub properties: PropertyNames,
    /// HTTP request timeout in seconds
    pub http_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment and properties file
    pub fn load() -> SyncResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> SyncResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).filter(|v| !v.is_empty()).ok_or_else(|| env_error(key));

        // Required environment variables
        let notion_token = required("NOTION_TOKEN")?;
        let notion_database_id = required("NOTION_DATABASE_ID")?;
        let google_client_id = required("GOOGLE_OAUTH_CLIENT_ID")?;
        let google_client_secret = required("GOOGLE_OAUTH_CLIENT_SECRET")?;
        let google_refresh_token = required("GOOGLE_REFRESH_TOKEN")?;

        // Endpoints
        let notion_api_url = lookup("NOTION_API_URL").unwrap_or_else(|| DEFAULT_NOTION_API_URL.to_string());
        let google_api_url = lookup("GOOGLE_API_URL").unwrap_or_else(|| DEFAULT_GOOGLE_API_URL.to_string());
        let google_token_url =
            lookup("GOOGLE_TOKEN_URL").unwrap_or_else(|| DEFAULT_GOOGLE_TOKEN_URL.to_string());

        // Sync policies
        let match_strategy = match lookup("SYNC_MATCH_STRATEGY") {
            Some(value) => value.parse::<MatchStrategy>()?,
            None => MatchStrategy::default(),
        };

        let harvest_window = match lookup("SYNC_HARVEST_WINDOW").as_deref() {
            None | Some("recent") => HarvestWindow::Recent {
                minutes: parse_window_span(
                    &lookup,
                    "SYNC_RECENT_MINUTES",
                    DEFAULT_RECENT_MINUTES,
                    MAX_RECENT_MINUTES,
                )?,
            },
            Some("upcoming") => HarvestWindow::Upcoming {
                days: parse_window_span(&lookup, "SYNC_UPCOMING_DAYS", DEFAULT_UPCOMING_DAYS, MAX_UPCOMING_DAYS)?,
            },
            Some(other) => {
                return Err(config_error(&format!(
                    "Invalid SYNC_HARVEST_WINDOW '{}', expected 'recent' or 'upcoming'",
                    other
                )))
            }
        };

        let preflight_index = match lookup("SYNC_PREFLIGHT_INDEX") {
            Some(value) => parse_flag("SYNC_PREFLIGHT_INDEX", &value)?,
            None => false,
        };

        let source_label = lookup("SYNC_SOURCE_LABEL").filter(|v| !v.trim().is_empty());

        let http_timeout_secs = parse_number(&lookup, "HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;

        // Property names, merged over the defaults
        let properties_file =
            lookup("SYNC_PROPERTIES_FILE").unwrap_or_else(|| DEFAULT_PROPERTIES_FILE.to_string());
        let properties = load_property_names(&properties_file)?;

        Ok(Config {
            notion_token,
            notion_database_id,
            notion_api_url,
            google_client_id,
            google_client_secret,
            google_refresh_token,
            google_api_url,
            google_token_url,
            match_strategy,
            harvest_window,
            preflight_index,
            source_label,
            properties,
            http_timeout_secs,
        })
    }
}

/// Read property name overrides, falling back to defaults when the file is absent
fn load_property_names(path: &str) -> SyncResult<PropertyNames> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str::<PropertyNames>(&content)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(PropertyNames::default()),
        Err(e) => Err(e.into()),
    }
}

fn parse_number<F, T>(lookup: &F, key: &str, default: T) -> SyncResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| config_error(&format!("Invalid {} format: '{}'", key, value))),
        None => Ok(default),
    }
}

/// A window length must be positive and no longer than `max`
fn parse_window_span<F>(lookup: &F, key: &str, default: i64, max: i64) -> SyncResult<i64>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_number(lookup, key, default)?;
    if !(1..=max).contains(&value) {
        return Err(config_error(&format!(
            "{} must be between 1 and {}, got {}",
            key, max, value
        )));
    }
    Ok(value)
}

fn parse_flag(key: &str, value: &str) -> SyncResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(config_error(&format!("Invalid {} value: '{}'", key, value))),
    }
}
