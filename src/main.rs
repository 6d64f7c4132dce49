use gcal_notion_sync::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting calendar sync");

    let outcome = match startup::load_config() {
        Ok(config) => startup::run_sync(&config).await,
        Err(e) => Err(e),
    };

    startup::report_outcome(outcome)
}
