//! HTTP implementation of [`ChatService`]
//!
//! Talks to the chat backend's REST endpoints:
//!
//! - `GET /chat/all` returns `{ "chats": [...] }`
//! - `PATCH /chat/{id}/toggle-chat-fav`
//! - `PATCH /chat/{id}/rename` with `{ "title": "..." }`
//! - `DELETE /chat/{id}/delete`
//!
//! Failures that leave no response (transport errors, timeouts, an
//! unavailable API token) become [`ServiceError::Network`]. Non-success
//! statuses and success bodies that do not decode become
//! [`ServiceError::Server`]. A rename answered with 400 or 422 is a
//! [`ServiceError::Validation`].

use crate::auth::TokenSource;
use crate::config::ApiConfig;
use crate::error::{ChatrollError, ServiceError};
use crate::model::{ChatCollection, ChatListResponse, ChatTitle};
use crate::service::ChatService;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Request body of the rename endpoint
#[derive(Debug, Serialize)]
struct RenameRequest<'a> {
    title: &'a str,
}

/// Chat backend client
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use chatroll::auth::StaticToken;
/// use chatroll::config::ApiConfig;
/// use chatroll::service::HttpChatService;
///
/// let service = HttpChatService::new(&ApiConfig::default(), Arc::new(StaticToken::default()));
/// assert!(service.is_ok());
/// ```
pub struct HttpChatService {
    client: Client,
    base_url: Url,
    tokens: Arc<dyn TokenSource>,
}

impl HttpChatService {
    /// Create a client for the backend described by `config`
    ///
    /// # Arguments
    ///
    /// * `config` - Base URL and request timeout of the backend
    /// * `tokens` - Source of the bearer token attached to every request
    ///
    /// # Returns
    ///
    /// A client whose endpoints are resolved under `config.base_url`
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is unusable or the HTTP client cannot
    /// be built.
    pub fn new(config: &ApiConfig, tokens: Arc<dyn TokenSource>) -> crate::error::Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ChatrollError::Config(format!("Invalid API base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ChatrollError::Config(format!(
                "API base URL cannot be a base: {}",
                config.base_url
            ))
            .into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("chatroll/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ChatrollError::Http)?;

        tracing::info!("Initialized chat service: base_url={}", base_url);

        Ok(Self {
            client,
            base_url,
            tokens,
        })
    }

    /// Build `{base}/chat/{segments...}` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("chat").extend(segments);
        }
        url
    }

    /// Start a request, attaching the bearer token when one is available
    ///
    /// A token source that fails stops the request before it is sent.
    fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, ServiceError> {
        let builder = self.client.request(method, url);
        match self.tokens.token() {
            Ok(Some(token)) => Ok(builder.bearer_auth(token)),
            Ok(None) => Ok(builder),
            Err(e) => {
                tracing::error!("Failed to load API token: {}", e);
                Err(ServiceError::Network(format!("API token unavailable: {}", e)))
            }
        }
    }

    async fn send(&self, operation: &str, builder: RequestBuilder) -> Result<Response, ServiceError> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!("{} request failed: {}", operation, e);
            ServiceError::Network(e.to_string())
        })?;
        tracing::debug!("{} returned {}", operation, response.status());
        Ok(response)
    }

    async fn ensure_success(operation: &str, response: Response) -> Result<Response, ServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::error!("{} returned error {}: {}", operation, status, body);
        Err(ServiceError::Server {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl ChatService for HttpChatService {
    async fn fetch_all(&self) -> Result<ChatCollection, ServiceError> {
        let url = self.endpoint(&["all"]);
        tracing::debug!("Fetching chats from {}", url);

        let response = self
            .send("fetch_all", self.request(Method::GET, url)?)
            .await?;

        let response = Self::ensure_success("fetch_all", response).await?;
        let status = response.status();
        let body: ChatListResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse chat list: {}", e);
            ServiceError::Server {
                status: status.as_u16(),
                body: format!("Failed to parse chat list: {}", e),
            }
        })?;

        Ok(body.chats)
    }

    async fn toggle_favorite(&self, id: &str) -> Result<(), ServiceError> {
        let url = self.endpoint(&[id, "toggle-chat-fav"]);
        let response = self
            .send("toggle_favorite", self.request(Method::PATCH, url)?)
            .await?;
        Self::ensure_success("toggle_favorite", response).await?;
        Ok(())
    }

    async fn rename(&self, id: &str, title: &ChatTitle) -> Result<(), ServiceError> {
        let url = self.endpoint(&[id, "rename"]);
        let builder = self.request(Method::PATCH, url)?.json(&RenameRequest {
            title: title.as_str(),
        });
        let response = self.send("rename", builder).await?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("rename rejected with {}: {}", status, body);
            let reason = if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("invalid title")
                    .to_string()
            } else {
                body
            };
            return Err(ServiceError::Validation(reason));
        }

        Self::ensure_success("rename", response).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let url = self.endpoint(&[id, "delete"]);
        let response = self
            .send("delete", self.request(Method::DELETE, url)?)
            .await?;
        Self::ensure_success("delete", response).await?;
        Ok(())
    }
}
