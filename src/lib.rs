//! Chatroll - chat list client library
//!
//! This library keeps a client-side list of chat conversations consistent
//! with a remote chat backend. Changes (favorite, rename, delete) are applied
//! to the local list immediately and rolled back if the backend refuses them.
//!
//! # Architecture
//!
//! - `model`: chat summaries, partial updates and validated titles
//! - `store`: the in-memory chat list and its change notifications
//! - `service`: the chat backend contract and its HTTP implementation
//! - `controller`: optimistic apply, confirm or roll back
//! - `notify`: user-facing notification sinks
//! - `navigation`: which conversation the client has open
//! - `auth`: bearer token sources
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli` / `commands`: the command-line front end
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use chatroll::{ChatController, ChatStore, Config};
//! use chatroll::navigation::NavigationState;
//! use chatroll::notify::TracingNotifier;
//! use chatroll::service::HttpChatService;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let tokens = chatroll::commands::token_source(&config)?;
//!     let controller = ChatController::new(
//!         Arc::new(ChatStore::new()),
//!         Arc::new(HttpChatService::new(&config.api, tokens)?),
//!         Arc::new(TracingNotifier),
//!         Arc::new(NavigationState::default()),
//!     );
//!     controller.refresh().await?;
//!     controller.toggle_favorite("42").await;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod navigation;
pub mod notify;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use controller::{ChatController, MutationKind, MutationOutcome};
pub use error::{ChatrollError, Result, ServiceError};
pub use model::{ChatSummary, ChatTitle, TitleRules};
pub use store::ChatStore;

#[cfg(test)]
pub mod test_utils;
