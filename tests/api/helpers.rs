//! tests/api/helpers.rs

use maillist::configuration::{get_configuration, StorageBackend};
use maillist::startup::build;
use maillist::telemetry::{get_subscriber, init_subscriber};
use once_cell::sync::Lazy;
use std::path::PathBuf;
use tempfile::TempDir;

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    // Set TEST_LOG=true to see logs during tests
    // Use bunyan to format the logs nicely:
    // $ TEST_LOG=true cargo test| bunyan
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    };
});

pub struct Test {
    pub address: String,
    pub storage_path: PathBuf,
    // Removed with the test.
    _storage_dir: TempDir,
}

impl Test {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::get(&format!("{}{}", self.address, path))
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_subscribe(&self, body: serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}/subscribe", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_raw(&self, path: &str, content_type: &str, body: String) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}{}", self.address, path))
            .header("Content-Type", content_type)
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn subscribe(&self, email: &str) -> reqwest::Response {
        self.post_subscribe(serde_json::json!({ "email": email })).await
    }

    pub async fn listed_emails(&self) -> Vec<String> {
        let response = self.get("/list").await;
        assert_eq!(200, response.status().as_u16());

        let body: Vec<serde_json::Value> = response.json().await.expect("Failed to parse list");
        body.into_iter()
            .map(|entry| {
                entry["email"]
                    .as_str()
                    .expect("Missing email in list entry")
                    .to_string()
            })
            .collect()
    }
}

pub async fn setup() -> Test {
    Lazy::force(&TRACING);

    let storage_dir = tempfile::tempdir().expect("Failed to create storage directory.");
    let storage_path = storage_dir.path().join("emails.txt");

    let mut config = get_configuration().expect("Failed to read configuration.");
    config.application.host = "127.0.0.1".into();
    config.application.port = 0;
    config.storage.backend = StorageBackend::File;
    config.storage.file_path = storage_path.clone();

    // Launch the server
    let app = build(config).await.expect("Failed to build server.");
    let address = format!("http://127.0.0.1:{}", app.port());

    // Launch the server as a background task
    let _ = tokio::spawn(app.run());

    Test {
        address,
        storage_path,
        _storage_dir: storage_dir,
    }
}
