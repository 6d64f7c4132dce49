use gcal_notion_sync::components::google_calendar::HarvestWindow;
use gcal_notion_sync::components::sync::{MatchStrategy, SyncSettings};
use gcal_notion_sync::config::Config;
use gcal_notion_sync::startup;
use serde_json::json;
use std::collections::HashMap;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn base_vars() -> HashMap<&'static str, String> {
    let mut vars = HashMap::new();
    vars.insert("NOTION_TOKEN", "secret_test".to_string());
    vars.insert("NOTION_DATABASE_ID", "db-1".to_string());
    vars.insert("GOOGLE_OAUTH_CLIENT_ID", "client-id".to_string());
    vars.insert("GOOGLE_OAUTH_CLIENT_SECRET", "client-secret".to_string());
    vars.insert("GOOGLE_REFRESH_TOKEN", "refresh".to_string());
    vars.insert("SYNC_PROPERTIES_FILE", "does/not/exist.toml".to_string());
    vars
}

/// Smoke test to verify that the property names file is merged over the defaults
#[test]
fn test_config_reads_properties_file() {
    let file = std::env::temp_dir().join(format!("gcal-notion-sync-props-{}.toml", std::process::id()));
    std::fs::write(&file, "title = \"Event\"\nnotes = \"Description\"\n").unwrap();

    let mut vars = base_vars();
    vars.insert("SYNC_PROPERTIES_FILE", file.to_string_lossy().to_string());
    let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();
    std::fs::remove_file(&file).ok();

    assert_eq!(config.properties.title, "Event");
    assert_eq!(config.properties.notes, "Description");
    assert_eq!(config.properties.uid, "UID");
}

/// The example environment file names every variable the configuration reads
#[test]
fn test_env_example_lists_every_variable() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/.env.example");
    let keys: Vec<String> = dotenvy::from_path_iter(path)
        .unwrap()
        .map(|entry| entry.unwrap().0)
        .collect();

    for key in [
        "NOTION_TOKEN",
        "NOTION_DATABASE_ID",
        "GOOGLE_OAUTH_CLIENT_ID",
        "GOOGLE_OAUTH_CLIENT_SECRET",
        "GOOGLE_REFRESH_TOKEN",
        "SYNC_MATCH_STRATEGY",
        "SYNC_HARVEST_WINDOW",
        "SYNC_RECENT_MINUTES",
        "SYNC_UPCOMING_DAYS",
        "SYNC_PREFLIGHT_INDEX",
        "SYNC_SOURCE_LABEL",
        "SYNC_PROPERTIES_FILE",
        "HTTP_TIMEOUT_SECS",
    ] {
        assert!(keys.iter().any(|k| k == key), "{} missing from .env.example", key);
    }
}

/// Settings carry the configured policies
#[test]
fn test_settings_from_config() {
    let mut vars = base_vars();
    vars.insert("SYNC_MATCH_STRATEGY", "title_start".to_string());
    vars.insert("SYNC_HARVEST_WINDOW", "upcoming".to_string());
    let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();

    let settings = SyncSettings::from(&config);
    assert_eq!(settings.match_strategy, MatchStrategy::TitleAndStart);
    assert_eq!(settings.harvest_window, HarvestWindow::Upcoming { days: 365 });
    assert!(!settings.preflight_index);
}

/// Full run against mocked Google and Notion endpoints
#[tokio::test]
async fn test_run_sync_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.test",
            "expires_in": 3599
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/calendar/v3/users/me/calendarList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "id": "me@example.com", "summary": "Personal" }]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/calendar/v3/calendars/me@example.com/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {
                    "id": "existing",
                    "summary": "Standup",
                    "start": { "dateTime": "2024-01-01T09:00:00Z" },
                    "end": { "dateTime": "2024-01-01T09:15:00Z" }
                },
                {
                    "id": "fresh",
                    "start": { "dateTime": "2024-01-01T10:00:00Z" },
                    "htmlLink": "https://calendar.google.com/event?eid=fresh"
                }
            ]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/databases/db-1/query"))
        .and(body_partial_json(json!({
            "filter": { "property": "UID", "rich_text": { "equals": "existing" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "id": "page-existing", "properties": {} }],
            "has_more": false,
            "next_cursor": null
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/databases/db-1/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [],
            "has_more": false,
            "next_cursor": null
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/v1/pages/page-existing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "page-existing" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/pages"))
        .and(body_json(json!({
            "parent": { "database_id": "db-1" },
            "properties": {
                "Name": { "title": [{ "text": { "content": "(no title)" } }] },
                "Start": { "date": { "start": "2024-01-01T10:00:00Z", "end": "2024-01-01T11:00:00Z" } },
                "Source": { "select": { "name": "Personal" } },
                "UID": { "rich_text": [{ "text": { "content": "fresh" } }] },
                "Location": { "rich_text": [] },
                "Notes": { "rich_text": [] },
                "Link": { "url": "https://calendar.google.com/event?eid=fresh" }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "page-fresh" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let mut vars = base_vars();
    vars.insert("NOTION_API_URL", format!("{}/v1", uri));
    vars.insert("GOOGLE_API_URL", format!("{}/calendar/v3", uri));
    vars.insert("GOOGLE_TOKEN_URL", format!("{}/token", uri));
    let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();

    let report = startup::run_sync(&config).await.unwrap();

    assert_eq!(report.calendars, 1);
    assert_eq!(report.events, 2);
    assert_eq!(report.created, 1);
    assert_eq!(report.updated, 1);
}

/// A destination failure surfaces as an error for the process to exit on
#[tokio::test]
async fn test_run_sync_propagates_destination_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "ya29.test" })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/calendar/v3/users/me/calendarList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "id": "me@example.com" }]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/calendar/v3/calendars/me@example.com/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "id": "evt", "start": { "date": "2024-01-01" } }]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/databases/db-1/query"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "object": "error",
            "code": "unauthorized"
        })))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let mut vars = base_vars();
    vars.insert("NOTION_API_URL", format!("{}/v1", uri));
    vars.insert("GOOGLE_API_URL", format!("{}/calendar/v3", uri));
    vars.insert("GOOGLE_TOKEN_URL", format!("{}/token", uri));
    let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();

    let result = startup::run_sync(&config).await;
    assert!(matches!(result, Err(gcal_notion_sync::error::Error::Notion(_))));
}
