//! Common test utilities for in-process API testing with mocks.
//!
//! This module provides a test fixture that builds the router with a mock
//! converter and archiver injected, so no external programs are needed.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use partitura_core::{
    testing::{MockArchiver, MockConverter},
    Config, InMemoryJobRegistry, JobOrchestrator, JobSpawner, OrchestratorConfig, ServerConfig,
    StorageConfig, StorageLayout,
};

const BOUNDARY: &str = "partitura-test-boundary";

/// Test fixture for API testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_upload() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.upload("score.pdf", b"%PDF").await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock archiver - inspect or fail bundle builds
    pub archiver: Arc<MockArchiver>,
    /// Storage layout rooted in the temp directory
    pub layout: StorageLayout,
    /// Temporary directory for storage areas and static files
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub bytes: Vec<u8>,
}

impl TestFixture {
    /// Create a fixture whose converter produces two movements.
    pub async fn new() -> Self {
        Self::with_converter(MockConverter::new().with_movements(2)).await
    }

    /// Create a fixture with a custom mock converter.
    pub async fn with_converter(converter: MockConverter) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let static_dir = temp_dir.path().join("static");
        std::fs::create_dir_all(&static_dir).expect("Failed to create static dir");
        std::fs::write(static_dir.join("index.html"), "<h1>partitura</h1>")
            .expect("Failed to write index.html");
        std::fs::write(static_dir.join("app.js"), "console.log('ok');")
            .expect("Failed to write app.js");

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
                static_dir,
                max_upload_bytes: 1024 * 1024,
            },
            storage: StorageConfig::with_dirs(
                temp_dir.path().join("uploads"),
                temp_dir.path().join("downloads"),
            ),
            ..Default::default()
        };

        let layout = StorageLayout::new(config.storage.clone());
        layout
            .ensure_roots()
            .await
            .expect("Failed to create storage roots");

        let registry = Arc::new(InMemoryJobRegistry::new());
        let archiver = Arc::new(MockArchiver::new());
        let spawner = JobSpawner::new(registry.clone(), &config.jobs);
        let orchestrator = Arc::new(JobOrchestrator::new(
            OrchestratorConfig::new(false, &config.converter, &config.archiver),
            layout.clone(),
            registry.clone(),
            Arc::new(converter),
            archiver.clone(),
            spawner,
        ));

        let state = Arc::new(partitura_server::state::AppState::new(
            config,
            registry,
            orchestrator,
        ));
        let router = partitura_server::api::create_router(state);

        Self {
            router,
            archiver,
            layout,
            temp_dir,
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.send(Request::builder().method("GET").uri(path).body(Body::empty()).unwrap())
            .await
    }

    pub async fn request(&self, method: &str, path: &str) -> TestResponse {
        self.send(Request::builder().method(method).uri(path).body(Body::empty()).unwrap())
            .await
    }

    /// POST a multipart body with a single `file` field.
    pub async fn upload(&self, filename: &str, data: &[u8]) -> TestResponse {
        self.upload_field("file", filename, data).await
    }

    pub async fn upload_field(&self, field: &str, filename: &str, data: &[u8]) -> TestResponse {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Poll `/status/{id}` until the job is completed or failed.
    pub async fn wait_for_terminal(&self, id: &str) -> Value {
        for _ in 0..250 {
            let response = self.get(&format!("/status/{}", id)).await;
            let status = response.body["status"].as_str().unwrap_or_default();
            if status == "completed" || status == "error" {
                return response.body;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("Job {} did not reach a terminal state", id);
    }

    pub fn job_dir(&self, id: &str) -> PathBuf {
        self.layout.job_dir(id)
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
            bytes: body_bytes.to_vec(),
        }
    }
}

#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
