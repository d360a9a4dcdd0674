//! Remote chat service
//!
//! [`ChatService`] is the call contract the controller depends on. Every
//! call is single-shot: there is no retry at this layer or above it.
//! [`HttpChatService`] implements it against the chat backend's REST API.

pub mod http;

pub use http::HttpChatService;

use crate::error::ServiceError;
use crate::model::{ChatCollection, ChatTitle};
use async_trait::async_trait;

/// Chat backend operations used by the controller
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Fetch every chat summary, newest first
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Network`] on transport failure and
    /// [`ServiceError::Server`] on a non-success status.
    async fn fetch_all(&self) -> Result<ChatCollection, ServiceError>;

    /// Flip the favorite flag of chat `id`
    ///
    /// # Errors
    ///
    /// Same failure kinds as [`ChatService::fetch_all`].
    async fn toggle_favorite(&self, id: &str) -> Result<(), ServiceError>;

    /// Rename chat `id`
    ///
    /// # Errors
    ///
    /// Same failure kinds as [`ChatService::fetch_all`], plus
    /// [`ServiceError::Validation`] when the backend rejects the title.
    async fn rename(&self, id: &str, title: &ChatTitle) -> Result<(), ServiceError>;

    /// Delete chat `id`
    ///
    /// # Errors
    ///
    /// Same failure kinds as [`ChatService::fetch_all`].
    async fn delete(&self, id: &str) -> Result<(), ServiceError>;
}
