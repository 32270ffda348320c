use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

use shared::{
    domain::{UserId, UserRecord},
    error::ApiError,
    protocol::{CreateUserResponse, UserDraft},
};

pub mod config;
pub mod form;
pub mod list;

pub use config::Settings;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure or a non-success HTTP status.
    #[error("{message}")]
    Network { message: String },
    /// Resolution of a specific record failed.
    #[error("user {id} not found")]
    NotFound { id: UserId },
    /// The server answered 2xx but the body did not parse.
    #[error("invalid response from server: {message}")]
    InvalidResponse { message: String },
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::InvalidResponse {
                message: err.to_string(),
            }
        } else {
            ClientError::Network {
                message: err.to_string(),
            }
        }
    }
}

/// The five operations the views consume. `DirectoryClient` is the real
/// implementation; tests substitute stubs.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn create_user(&self, draft: &UserDraft) -> Result<CreateUserResponse, ClientError>;
    async fn list_users(&self) -> Result<Vec<UserRecord>, ClientError>;
    async fn user_by_id(&self, id: UserId) -> Result<UserRecord, ClientError>;
    async fn update_user(&self, id: UserId, draft: &UserDraft) -> Result<(), ClientError>;
    async fn delete_user(&self, id: UserId) -> Result<(), ClientError>;
}

/// HTTP adapter over the remote users API. One request per call; no retry,
/// no cache, transport-default timeouts.
pub struct DirectoryClient {
    http: Client,
    base_url: String,
}

impl DirectoryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.api_base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Enumerates users via the dedicated enumeration endpoint rather than
    /// the listing endpoint backing the table view.
    pub async fn enumerate_users(&self) -> Result<Vec<UserRecord>, ClientError> {
        let users = self
            .http
            .get(format!("{}/api/users", self.base_url))
            .send()
            .await?
            .error_for_status()
            .map_err(ClientError::from)?
            .json()
            .await?;
        Ok(users)
    }

    /// Converts a non-success response into a `Network` error, preferring a
    /// structured error body's message over the bare status line.
    async fn non_success(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let message = match response.json::<ApiError>().await {
            Ok(body) => body.message,
            Err(_) => format!("HTTP error! status: {status}"),
        };
        ClientError::Network { message }
    }
}

#[async_trait]
impl UserDirectory for DirectoryClient {
    async fn create_user(&self, draft: &UserDraft) -> Result<CreateUserResponse, ClientError> {
        debug!(name = %draft.name, "create user");
        let response = self
            .http
            .post(format!("{}/api/create-user", self.base_url))
            .json(draft)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::non_success(response).await);
        }
        let body: CreateUserResponse = response.json().await?;
        Ok(body)
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, ClientError> {
        debug!("list users");
        let response = self.http.get(format!("{}/api", self.base_url)).send().await?;
        if !response.status().is_success() {
            return Err(Self::non_success(response).await);
        }
        let users: Vec<UserRecord> = response.json().await?;
        Ok(users)
    }

    async fn user_by_id(&self, id: UserId) -> Result<UserRecord, ClientError> {
        debug!(user_id = id.0, "fetch user");
        let response = self
            .http
            .get(format!("{}/api/user/{}", self.base_url, id.0))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound { id });
        }
        if !response.status().is_success() {
            return Err(Self::non_success(response).await);
        }
        let user: UserRecord = response.json().await?;
        Ok(user)
    }

    async fn update_user(&self, id: UserId, draft: &UserDraft) -> Result<(), ClientError> {
        debug!(user_id = id.0, "update user");
        let response = self
            .http
            .put(format!("{}/api/update/{}", self.base_url, id.0))
            .json(draft)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::non_success(response).await);
        }
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ClientError> {
        debug!(user_id = id.0, "delete user");
        let response = self
            .http
            .delete(format!("{}/api/{}", self.base_url, id.0))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::non_success(response).await);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
