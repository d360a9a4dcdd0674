/*!
Command handlers for the CLI

This module wires configuration into a [`ChatController`] and exposes the
handlers invoked by the CLI entrypoint:

- `chats`: list, favorite, rename and delete
- `auth`: stored API token management
*/

use crate::auth::{KeyringTokenStore, StaticToken, TokenSource};
use crate::config::Config;
use crate::controller::ChatController;
use crate::error::Result;
use crate::navigation::{NavigationState, View};
use crate::notify::ConsoleNotifier;
use crate::service::HttpChatService;
use crate::store::ChatStore;
use std::sync::Arc;

// Chat list command handlers
pub mod chats;

/// Pick the token source configured for the backend
///
/// An explicit token (config, env or CLI) wins over the keyring.
///
/// # Errors
///
/// Returns error if the keyring store cannot be created for the base URL.
pub fn token_source(config: &Config) -> Result<Arc<dyn TokenSource>> {
    if let Some(token) = &config.api.token {
        tracing::debug!("Using configured API token");
        return Ok(Arc::new(StaticToken::new(Some(token.clone()))));
    }
    if config.api.use_keyring {
        tracing::debug!("Using API token from OS keyring");
        return Ok(Arc::new(KeyringTokenStore::for_api(&config.api.base_url)?));
    }
    Ok(Arc::new(StaticToken::default()))
}

/// Build a controller talking to the configured backend
///
/// `active` is the conversation the client currently has open, if any.
///
/// # Errors
///
/// Returns error if the HTTP client or token source cannot be created.
pub fn build_controller(
    config: &Config,
    active: Option<String>,
) -> Result<(Arc<ChatController>, Arc<NavigationState>)> {
    let service = HttpChatService::new(&config.api, token_source(config)?)?;
    let navigator = Arc::new(NavigationState::new(
        active.map(View::Chat).unwrap_or_default(),
    ));
    let controller = Arc::new(ChatController::new(
        Arc::new(ChatStore::new()),
        Arc::new(service),
        Arc::new(ConsoleNotifier),
        navigator.clone(),
    ));
    Ok((controller, navigator))
}

/// Auth command(s)
///
/// Stores, removes and inspects the bearer token kept in the OS keyring for
/// the configured backend.
pub mod auth {
    use super::*;
    use crate::auth::AuthToken;
    use crate::cli::AuthCommand;
    use crate::error::ChatrollError;
    use chrono::{DateTime, Duration, Utc};
    use colored::Colorize;

    /// Handle an `auth` subcommand
    ///
    /// # Errors
    ///
    /// Returns error if `--expires-in` does not fit a timestamp or the
    /// keyring cannot be accessed.
    pub fn handle_auth(config: &Config, command: AuthCommand) -> Result<()> {
        let store = KeyringTokenStore::for_api(&config.api.base_url)?;

        match command {
            AuthCommand::Login { token, expires_in } => {
                let expires_at = expires_in.map(expiry_from_now).transpose()?;
                store.save(&AuthToken::new(token, expires_at))?;
                println!(
                    "{}",
                    format!("Token stored for {}", store.account()).green()
                );
            }
            AuthCommand::Logout => {
                store.delete()?;
                println!(
                    "{}",
                    format!("Token removed for {}", store.account()).green()
                );
            }
            AuthCommand::Status => match store.load()? {
                Some(token) if token.is_expired() => {
                    println!("{}", format!("Token for {} has expired", store.account()).yellow());
                }
                Some(token) => {
                    let expiry = token
                        .expires_at
                        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
                        .unwrap_or_else(|| "never".to_string());
                    println!(
                        "Token stored for {} (expires: {})",
                        store.account().cyan(),
                        expiry
                    );
                }
                None => {
                    println!("{}", format!("No token stored for {}", store.account()).yellow());
                }
            },
        }

        Ok(())
    }

    /// Absolute expiry `secs` seconds from now
    fn expiry_from_now(secs: i64) -> Result<DateTime<Utc>> {
        Duration::try_seconds(secs)
            .and_then(|delta| Utc::now().checked_add_signed(delta))
            .ok_or_else(|| ChatrollError::Validation("expires-in out of range".to_string()).into())
    }
}
