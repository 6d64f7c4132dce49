use crate::components::google_calendar::{GoogleCalendarClient, TokenManager};
use crate::components::notion::NotionClient;
use crate::components::sync::{SyncEngine, SyncReport, SyncSettings};
use crate::config::Config;
use crate::error::{Error, SyncResult};
use chrono::Utc;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the run configuration
pub fn load_config() -> SyncResult<Config> {
    Config::load()
}

/// Wire the Google and Notion clients together and run one sync pass
pub async fn run_sync(config: &Config) -> SyncResult<SyncReport> {
    let http = Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;

    let tokens = Arc::new(TokenManager::new(config, http.clone()));
    let calendar = GoogleCalendarClient::new(http.clone(), &config.google_api_url, tokens);
    let notion = NotionClient::new(config, http);

    info!(
        strategy = ?config.match_strategy,
        window = ?config.harvest_window,
        "Syncing Google Calendar into Notion database {}",
        config.notion_database_id
    );

    SyncEngine::new(&calendar, &notion, SyncSettings::from(config))
        .run(Utc::now())
        .await
}

/// Log the success line, or hand the error to miette without logging it
/// so a failed run prints exactly one failure report.
pub fn report_outcome(outcome: SyncResult<SyncReport>) -> miette::Result<()> {
    let report = outcome?;
    info!(
        calendars = report.calendars,
        events = report.events,
        created = report.created,
        updated = report.updated,
        indexed = ?report.indexed,
        "Sync complete"
    );
    Ok(())
}
