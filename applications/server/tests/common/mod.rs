//! Common test utilities and fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use roster_core::{
    error::Result as RosterResult, CreateUser, RosterError, UpdateUser, User, UserId,
    UserRepository,
};
use roster_server::{create_router, AppState, AvatarStorage, Environment};
use roster_storage::SqliteUserRepository;
use std::sync::Arc;
use tempfile::TempDir;

pub const BOUNDARY: &str = "roster-test-boundary";

/// A router over a fresh database and upload directory
pub struct TestApp {
    pub router: Router,
    pub repo: Arc<dyn UserRepository>,
    pub avatars: Arc<AvatarStorage>,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}", temp_dir.path().join("roster.db").display());
        let repo = SqliteUserRepository::connect(&url).await.unwrap();
        Self::with_repository(Arc::new(repo), Environment::Development, temp_dir).await
    }

    pub async fn with_repository(
        repo: Arc<dyn UserRepository>,
        environment: Environment,
        temp_dir: TempDir,
    ) -> Self {
        let avatars = AvatarStorage::new(temp_dir.path().join("uploads"));
        avatars.initialize().await.unwrap();
        let avatars = Arc::new(avatars);

        let app_state = AppState::new(Arc::clone(&repo), Arc::clone(&avatars), environment);
        let origins = vec!["http://localhost:3000".to_string()];
        let router = create_router(app_state, &origins);

        Self {
            router,
            repo,
            avatars,
            _temp_dir: temp_dir,
        }
    }

    /// Number of files currently in the upload directory
    pub fn stored_files(&self) -> usize {
        std::fs::read_dir(self.avatars.base_path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// Multipart body builder
#[derive(Default)]
pub struct Form {
    body: Vec<u8>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn request(mut self, method: &str, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

/// John Doe's create form
pub fn john() -> Form {
    Form::new()
        .text("firstName", "John")
        .text("lastName", "Doe")
        .text("country", "USA")
        .text("city", "NYC")
        .text("email", "john@x.com")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json(method: &str, uri: &str, value: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(value).unwrap()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

/// Repository whose every call fails with a database error
pub struct FailingRepository;

fn broken() -> RosterError {
    RosterError::database("database is locked")
}

#[async_trait]
impl UserRepository for FailingRepository {
    async fn create(&self, _user: CreateUser) -> RosterResult<User> {
        Err(broken())
    }

    async fn find_all(&self) -> RosterResult<Vec<User>> {
        Err(broken())
    }

    async fn find_by_id(&self, _id: UserId) -> RosterResult<Option<User>> {
        Err(broken())
    }

    async fn find_by_email(&self, _email: &str) -> RosterResult<Option<User>> {
        Err(broken())
    }

    async fn update(&self, _id: UserId, _user: UpdateUser) -> RosterResult<Option<User>> {
        Err(broken())
    }

    async fn delete(&self, _id: UserId) -> RosterResult<Option<User>> {
        Err(broken())
    }

    async fn count(&self) -> RosterResult<i64> {
        Err(broken())
    }

    async fn clear(&self) -> RosterResult<u64> {
        Err(broken())
    }
}
