//! Common test utilities for in-process endpoint testing.
//!
//! The fixture builds the real router over a temporary data directory and
//! SQLite database, with a mock deployer in place of the deploy executable.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use buildhook_core::testing::MockDeployer;
use buildhook_core::{
    create_authenticator, load_config_from_str, ArtifactWriter, BuildStore, Config, Deployer,
    Pipeline, SpawnFailurePolicy, SqliteBuildStore,
};
use buildhook_server::state::{AppState, FatalSignal};

/// Test fixture with a real store and artifact directory.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_accepts_build() {
///     let fixture = TestFixture::new();
///
///     let response = fixture.post_data(r#"{"ticket":"AB12"}"#).await;
///
///     assert_eq!(response.status, 201);
///     assert_eq!(fixture.deployer.launches().len(), 1);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock deployer - inspect launches or force failures
    pub deployer: Arc<MockDeployer>,
    /// Signal tripped by fatal deploy failures
    pub fatal: FatalSignal,
    /// Where artifact files are written
    pub data_dir: PathBuf,
    /// SQLite database path
    pub db_path: PathBuf,
    /// Temporary directory holding the database and artifacts
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Configuration for test fixture.
#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    /// Require this value in the `token` header
    pub token: Option<String>,
    /// What to do when the deploy cannot be started
    pub on_spawn_failure: SpawnFailurePolicy,
}

impl TestFixture {
    /// Create a fixture without authentication.
    pub fn new() -> Self {
        Self::with_config(TestConfig::default())
    }

    /// Create a fixture requiring `token`.
    pub fn with_token(token: &str) -> Self {
        Self::with_config(TestConfig {
            token: Some(token.to_string()),
            ..Default::default()
        })
    }

    pub fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("data");
        std::fs::create_dir(&data_dir).expect("Failed to create data dir");
        let db_path = temp_dir.path().join("builds.db");

        let config = test_app_config(&data_dir, &db_path, &test_config);

        let deployer = Arc::new(MockDeployer::new());
        let pipeline = Pipeline::new(
            ArtifactWriter::new(&data_dir),
            Arc::new(SqliteBuildStore::new(&db_path)) as Arc<dyn BuildStore>,
            Arc::clone(&deployer) as Arc<dyn Deployer>,
            test_config.on_spawn_failure,
        );

        let fatal = FatalSignal::new();
        let state = Arc::new(AppState::new(
            config.clone(),
            Arc::from(create_authenticator(&config.auth)),
            pipeline,
            fatal.clone(),
        ));

        let router = buildhook_server::api::create_router(state);

        Self {
            router,
            deployer,
            fatal,
            data_dir,
            db_path,
            temp_dir,
        }
    }

    /// Send a GET request.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, &[], Body::empty()).await
    }

    /// POST a raw body to the webhook endpoint.
    pub async fn post_data(&self, body: &str) -> TestResponse {
        self.post_data_with_headers(body, &[]).await
    }

    /// POST a raw body to the webhook endpoint with extra headers.
    pub async fn post_data_with_headers(
        &self,
        body: &str,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut all_headers = vec![("Content-Type", "application/json")];
        all_headers.extend_from_slice(headers);
        self.request(
            "POST",
            "/api/v1/data",
            &all_headers,
            Body::from(body.to_string()),
        )
        .await
    }

    /// Send a request with arbitrary method and headers.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        headers: &[(&str, &str)],
        body: Body,
    ) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);
        for (name, value) in headers {
            request_builder = request_builder.header(*name, *value);
        }
        let request = request_builder.body(body).unwrap();

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
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Path of the artifact for `ticket`.
    pub fn artifact_path(&self, ticket: &str) -> PathBuf {
        self.data_dir.join(format!("{ticket}.json"))
    }

    /// Number of files in the data directory.
    pub fn artifact_count(&self) -> usize {
        std::fs::read_dir(&self.data_dir).unwrap().count()
    }

    /// `data` column of every stored row, in id order.
    pub fn stored_rows(&self) -> Vec<String> {
        if !self.db_path.exists() {
            return Vec::new();
        }
        let conn = rusqlite::Connection::open(&self.db_path).unwrap();
        let table_exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'build_info')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        if !table_exists {
            return Vec::new();
        }

        let mut stmt = conn
            .prepare("SELECT data FROM build_info ORDER BY id")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap()
    }
}

fn test_app_config(data_dir: &Path, db_path: &Path, test_config: &TestConfig) -> Config {
    let auth_section = match &test_config.token {
        Some(token) => format!("[auth]\ntoken = \"{token}\"\n"),
        None => String::new(),
    };
    let policy = match test_config.on_spawn_failure {
        SpawnFailurePolicy::Log => "log",
        SpawnFailurePolicy::Terminate => "terminate",
    };

    load_config_from_str(&format!(
        r#"
[server]
host = "127.0.0.1"
port = 8443

[database]
path = "{db}"

[artifacts]
data_dir = "{data}"

[deploy]
exec_file = "/usr/local/bin/deploy.sh"
on_spawn_failure = "{policy}"

{auth_section}"#,
        db = db_path.display(),
        data = data_dir.display(),
    ))
    .expect("Failed to build test config")
}
