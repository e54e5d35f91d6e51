//! Shared helpers for integration tests: a fresh in-memory database per
//! test, a wired service, and a full router with auth configured.

#![allow(dead_code)]

use std::sync::Arc;

use authn::AuthnConfig;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use blobstore::FsBlobStore;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use tower::ServiceExt;

use tracker::api::state::AppState;
use tracker::contract::model::{NewProject, NewTask, NewUser, TaskStatus, User};
use tracker::domain::service::Service;
use tracker::infra::storage::migrations::Migrator;
use tracker::infra::storage::repo::build_service;

pub const TEST_SECRET: &str = "test-secret-key-minimum-32-chars!!";

/// Create a fresh test database and service for each test.
///
/// A pooled in-memory SQLite database is per-connection, so the pool is
/// pinned to a single connection.
pub async fn test_service() -> Arc<Service> {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1);
    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    Arc::new(build_service(db))
}

pub struct TestApp {
    pub state: Arc<AppState>,
    pub router: Router,
    // Holds the blob directory alive for the test's duration.
    _blob_dir: tempfile::TempDir,
}

/// Full application: service + blob store + auth + both projections.
pub async fn test_app() -> TestApp {
    let service = test_service().await;
    let blob_dir = tempfile::tempdir().expect("tempdir");
    let blobs = Arc::new(
        FsBlobStore::open(blob_dir.path().join("blobs"))
            .await
            .expect("blob store"),
    );
    let authn_cfg = AuthnConfig {
        jwt_secret: TEST_SECRET.to_string(),
        access_ttl_secs: 3600,
        refresh_ttl_secs: 86400,
    };
    let state = AppState::new(service, authn_cfg, blobs);
    TestApp {
        router: tracker::api::router(state.clone()),
        state,
        _blob_dir: blob_dir,
    }
}

pub async fn register_user(service: &Service, username: &str) -> User {
    service
        .register_user(NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "password123".to_string(),
        })
        .await
        .expect("register user")
}

pub fn new_project(name: &str) -> NewProject {
    NewProject {
        name: name.to_string(),
        ..NewProject::default()
    }
}

pub fn new_task(title: &str, project_id: uuid::Uuid) -> NewTask {
    NewTask {
        title: title.to_string(),
        project_id,
        description: String::new(),
        assigned_to: None,
        status: TaskStatus::Todo,
        due_date: None,
    }
}

pub fn bearer(state: &AppState, user: &User) -> String {
    let token = authn::issue_access_token(&state.authn, user.id, &user.username)
        .expect("issue access token");
    format!("Bearer {token}")
}

/// Send a JSON request through the router and decode the JSON response.
pub async fn send_json(
    router: &Router,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    let response = router.clone().oneshot(request).await.expect("send request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("decode JSON body")
    };
    (status, value)
}
