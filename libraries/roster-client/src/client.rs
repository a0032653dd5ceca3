//! Roster API client.

use crate::error::{ClientError, Result};
use crate::form::ProfileForm;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use roster_core::{ApiResponse, User, UserId};
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Connection settings for a Roster server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the server (e.g., "http://localhost:3002")
    pub url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub environment: String,
}

/// The directory operations the views depend on.
#[async_trait]
pub trait UserApi: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>>;

    async fn get_user(&self, id: UserId) -> Result<User>;

    async fn create_user(&self, form: &ProfileForm) -> Result<User>;

    async fn update_user(&self, id: UserId, form: &ProfileForm) -> Result<User>;

    async fn delete_user(&self, id: UserId) -> Result<User>;

    /// Displayable URL for a stored avatar value
    fn avatar_url(&self, avatar: &str) -> String;
}

/// Client for the Roster REST API.
///
/// Error envelopes become [`ClientError::Api`] carrying the status, message,
/// and any field errors the server reported.
#[derive(Debug, Clone)]
pub struct RosterClient {
    http: Client,
    base_url: String,
}

impl RosterClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        // Validate URL
        if config.url.trim().is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        // Parse and normalize URL
        let base_url = config.url.trim().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Roster/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Get the server URL.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response> {
        request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ClientError::ServerUnreachable(e.to_string())
            } else {
                ClientError::Request(e)
            }
        })
    }

    /// Check that the server is up.
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = self.endpoint("/health");
        debug!(url = %url, "Checking server health");

        let response = self.send(self.http.get(&url)).await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse health status: {e}")))
    }

    /// Resolve a stored avatar value to a displayable URL.
    ///
    /// Relative paths (`/uploads/...`) are joined to the server URL; absolute
    /// URLs pass through unchanged.
    pub fn avatar_url(&self, avatar: &str) -> String {
        if avatar.starts_with("http://") || avatar.starts_with("https://") || avatar.starts_with("data:") {
            return avatar.to_string();
        }

        if avatar.starts_with('/') {
            self.endpoint(avatar)
        } else {
            format!("{}/{}", self.base_url, avatar)
        }
    }
}

#[async_trait]
impl UserApi for RosterClient {
    async fn list_users(&self) -> Result<Vec<User>> {
        let response = self.send(self.http.get(self.endpoint("/api/users"))).await?;
        let users: Vec<User> = decode(response).await?;
        debug!(count = users.len(), "Fetched users");
        Ok(users)
    }

    async fn get_user(&self, id: UserId) -> Result<User> {
        let response = self
            .send(self.http.get(self.endpoint(&format!("/api/users/{id}"))))
            .await?;
        decode(response).await
    }

    async fn create_user(&self, form: &ProfileForm) -> Result<User> {
        let request = self
            .http
            .post(self.endpoint("/api/users"))
            .multipart(form.to_multipart()?);
        let user: User = decode(self.send(request).await?).await?;
        info!(id = user.id, email = %user.email, "Created user");
        Ok(user)
    }

    async fn update_user(&self, id: UserId, form: &ProfileForm) -> Result<User> {
        let request = self
            .http
            .put(self.endpoint(&format!("/api/users/{id}")))
            .multipart(form.to_update_multipart()?);
        let user: User = decode(self.send(request).await?).await?;
        info!(id = user.id, "Updated user");
        Ok(user)
    }

    async fn delete_user(&self, id: UserId) -> Result<User> {
        let response = self
            .send(self.http.delete(self.endpoint(&format!("/api/users/{id}"))))
            .await?;
        let user: User = decode(response).await?;
        info!(id = user.id, "Deleted user");
        Ok(user)
    }

    fn avatar_url(&self, avatar: &str) -> String {
        RosterClient::avatar_url(self, avatar)
    }
}

/// Unwrap a success envelope's `data`, or turn an error envelope into
/// [`ClientError::Api`]
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    if !response.status().is_success() {
        return Err(error_from(response).await);
    }

    let envelope: ApiResponse<T> = response
        .json()
        .await
        .map_err(|e| ClientError::ParseError(e.to_string()))?;

    envelope
        .data
        .ok_or_else(|| ClientError::ParseError("Response has no data".to_string()))
}

async fn error_from(response: Response) -> ClientError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    match serde_json::from_str::<ApiResponse<serde_json::Value>>(&text) {
        Ok(envelope) => ClientError::Api {
            status: status.as_u16(),
            message: envelope.message,
            errors: envelope.errors.unwrap_or_default(),
        },
        Err(_) => ClientError::Api {
            status: status.as_u16(),
            message: if text.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                text
            },
            errors: Vec::new(),
        },
    }
}
