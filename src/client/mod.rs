pub mod auth;

use std::collections::BTreeMap;
use std::time::Duration;

use itertools::Itertools;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::{Book, BookDraft, BookPage, CatalogQuery};

pub use auth::{AuthResponse, Role, User};

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid API URL: {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("not signed in")]
    NotAuthenticated,

    #[error("request failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode response: {source}")]
    Decode {
        #[source]
        source: reqwest::Error,
    },

    #[error("server returned {status}{}", message_suffix(.message))]
    Api {
        status: u16,
        message: Option<String>,
        field_errors: BTreeMap<String, String>,
    },
}

fn message_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Transport { .. })
    }

    /// Text for a user notice. `fallback` is used when the server gave no reason.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Api {
                field_errors,
                message,
                ..
            } => {
                if !field_errors.is_empty() {
                    format!("Validation error: {}", field_errors.values().join(", "))
                } else {
                    message.clone().unwrap_or_else(|| fallback.to_string())
                }
            }
            ClientError::Transport { .. } => "Network error. Please try again.".to_string(),
            ClientError::NotAuthenticated => "Please sign in first".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
    #[serde(default)]
    field_errors: BTreeMap<String, String>,
}

fn parse_error_body(status: StatusCode, body: &[u8]) -> ClientError {
    let parsed = serde_json::from_slice::<ErrorBody>(body).unwrap_or_default();
    ClientError::Api {
        status: status.as_u16(),
        message: parsed.message.or(parsed.error),
        field_errors: parsed.field_errors,
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        reqwest::Url::parse(trimmed).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ClientError::HttpClientBuild { source })?;
        Ok(Self {
            http,
            base_url: trimmed.to_string(),
            token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.endpoint(path))
    }

    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::NotAuthenticated)?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let response = builder
            .send()
            .await
            .map_err(|source| ClientError::Transport { source })?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "response");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.bytes().await.unwrap_or_default();
        let err = parse_error_body(status, &body);
        warn!(status = status.as_u16(), error = %err, "request rejected");
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        self.send(builder)
            .await?
            .json::<T>()
            .await
            .map_err(|source| ClientError::Decode { source })
    }

    /// Sign in and keep the returned token for later requests.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<AuthResponse, ClientError> {
        debug!(username, "login");
        let body = auth::LoginRequest { username, password };
        let auth: AuthResponse = self
            .send_json(self.request(Method::POST, "auth/login").json(&body))
            .await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        debug!(username, "register");
        let body = auth::RegisterRequest {
            username,
            email,
            password,
        };
        let auth: AuthResponse = self
            .send_json(self.request(Method::POST, "auth/register").json(&body))
            .await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    pub async fn profile(&self) -> Result<User, ClientError> {
        self.send_json(self.authorized(Method::GET, "users/profile")?)
            .await
    }

    pub async fn list_books(&self, query: &CatalogQuery, page: usize) -> Result<BookPage, ClientError> {
        debug!(page, size = query.size, sort_by = %query.sort_by, sort_dir = %query.sort_dir, "list books");
        let builder = self
            .authorized(Method::GET, "books")?
            .query(&query.to_params(page));
        self.send_json(builder).await
    }

    pub async fn get_book(&self, id: u64) -> Result<Book, ClientError> {
        self.send_json(self.authorized(Method::GET, &format!("books/{id}"))?)
            .await
    }

    pub async fn create_book(&self, draft: &BookDraft) -> Result<Book, ClientError> {
        debug!(title = %draft.title, "create book");
        let builder = self.authorized(Method::POST, "books")?.json(draft);
        self.send_json(builder).await
    }

    pub async fn update_book(&self, id: u64, draft: &BookDraft) -> Result<Book, ClientError> {
        debug!(id, "update book");
        let builder = self
            .authorized(Method::PUT, &format!("books/{id}"))?
            .json(draft);
        self.send_json(builder).await
    }

    pub async fn delete_book(&self, id: u64) -> Result<(), ClientError> {
        debug!(id, "delete book");
        self.send(self.authorized(Method::DELETE, &format!("books/{id}"))?)
            .await?;
        Ok(())
    }
}
