//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p dropbox-api`. Every app gets its own
//! temporary media root and library file; ffprobe is replaced by a fixed probe.

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use dropbox_api::AppState;
use dropbox_core::{BaseConfig, Config, DropboxConfig};
use dropbox_processing::FixedDurationProbe;
use std::sync::Arc;
use tempfile::TempDir;

/// Dropbox password configured for every test app.
pub const TEST_PASSWORD: &str = "test-dropbox-password";

pub const DEFAULT_MAX_UPLOAD: usize = 8 * 1024 * 1024;

/// Test application: server, state, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub dir: Arc<TempDir>,
    probe: FixedDurationProbe,
    max_upload: usize,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Build a fresh app over the same media root and library file.
    pub async fn restart(&self) -> TestApp {
        build(self.dir.clone(), self.probe.clone(), self.max_upload).await
    }

    pub fn media_path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join("media").join(name)
    }
}

pub fn bearer() -> String {
    format!("Bearer {}", TEST_PASSWORD)
}

pub fn test_config(dir: &TempDir, max_upload: usize) -> Config {
    Config::new(DropboxConfig {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            environment: "test".to_string(),
        },
        password: TEST_PASSWORD.to_string(),
        media_root: dir.path().join("media"),
        media_base_url: "/media".to_string(),
        library_file: dir.path().join("dropbox.json"),
        max_upload_size_bytes: max_upload,
        ffprobe_path: "ffprobe".to_string(),
        http_concurrency_limit: 64,
    })
}

async fn build(dir: Arc<TempDir>, probe: FixedDurationProbe, max_upload: usize) -> TestApp {
    let config = test_config(&dir, max_upload);
    let (state, router) = dropbox_api::setup::build_app(config, Arc::new(probe.clone()))
        .await
        .expect("Failed to build app");
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        state,
        dir,
        probe,
        max_upload,
    }
}

/// App whose probe reports a 12.5 second duration.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(FixedDurationProbe::new(Some(12.5)), DEFAULT_MAX_UPLOAD).await
}

pub async fn setup_test_app_with(probe: FixedDurationProbe, max_upload: usize) -> TestApp {
    let dir = Arc::new(TempDir::new().expect("Failed to create temp dir"));
    build(dir, probe, max_upload).await
}

/// Register an external URL entry and return its JSON.
pub async fn create_url_entry(client: &TestServer, title: &str, url: &str) -> serde_json::Value {
    let response = client
        .post("/dropbox")
        .add_header("Authorization", bearer())
        .json(&serde_json::json!({ "title": title, "url": url }))
        .await;
    assert_eq!(response.status_code(), 200, "create failed: {}", response.text());
    response.json()
}

/// Tag an entry through PATCH.
pub async fn add_tags(client: &TestServer, media_id: &str, tags: &[&str]) -> serde_json::Value {
    let response = client
        .patch(&format!("/dropbox/{}", media_id))
        .add_header("Authorization", bearer())
        .json(&serde_json::json!({ "addTags": tags }))
        .await;
    assert_eq!(response.status_code(), 200, "patch failed: {}", response.text());
    response.json()
}

pub fn file_form(field: &str, filename: &str, bytes: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(field, Part::bytes(bytes).file_name(filename))
}

pub const SAMPLE_SRT: &str = "1\r\n00:00:01,000 --> 00:00:03,500\r\nHello, world\r\n\r\n2\r\n00:00:04,000 --> 00:00:05,000\r\nBye\r\n";
