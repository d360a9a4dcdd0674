//! Bearer token sources
//!
//! The chat backend expects `Authorization: Bearer <token>` on every call.
//! Tokens are issued elsewhere (the OAuth login of the backend); this module
//! only keeps and hands them out. [`KeyringTokenStore`] persists a token in
//! the OS native credential store, keyed by the API host.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ChatrollError, Result};

const KEYRING_SERVICE: &str = "chatroll";

/// A bearer token together with its expiry
///
/// # Examples
///
/// ```
/// use chatroll::auth::AuthToken;
///
/// let token = AuthToken::new("abc", None);
/// assert!(!token.is_expired());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    /// The raw access token
    pub access_token: String,

    /// UTC expiry; `None` means the token does not expire
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_seconds_option"
    )]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthToken {
    /// Create a token
    pub fn new(access_token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
        }
    }

    /// Returns `true` when the token is expired or expires within 60 seconds
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            None => false,
            Some(expires_at) => Utc::now() >= expires_at - chrono::Duration::seconds(60),
        }
    }
}

/// Supplier of the bearer token attached to backend calls
pub trait TokenSource: Send + Sync {
    /// The token to send, or `None` to send the request unauthenticated
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying credential store fails.
    fn token(&self) -> Result<Option<String>>;
}

/// Token fixed at construction (config file, env var or CLI flag)
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    /// Wrap an optional token; empty strings count as no token
    pub fn new(token: Option<String>) -> Self {
        Self(token.filter(|t| !t.trim().is_empty()))
    }
}

impl TokenSource for StaticToken {
    fn token(&self) -> Result<Option<String>> {
        Ok(self.0.clone())
    }
}

/// Token persisted in the OS keyring, one entry per API host
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    account: String,
}

impl KeyringTokenStore {
    /// Store for the backend at `base_url`
    ///
    /// # Errors
    ///
    /// Returns [`ChatrollError::Auth`] if `base_url` has no host.
    pub fn for_api(base_url: &str) -> Result<Self> {
        let parsed = url::Url::parse(base_url)
            .map_err(|e| ChatrollError::Auth(format!("Invalid API base URL: {}", e)))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| ChatrollError::Auth(format!("API base URL has no host: {}", base_url)))?;
        let account = match parsed.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        Ok(Self { account })
    }

    /// Keyring account name used for this store
    pub fn account(&self) -> &str {
        &self.account
    }

    fn entry(&self) -> Result<keyring::Entry> {
        Ok(keyring::Entry::new(KEYRING_SERVICE, &self.account).map_err(ChatrollError::Keyring)?)
    }

    /// Persist `token`
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the keyring rejects the write.
    pub fn save(&self, token: &AuthToken) -> Result<()> {
        let json = serde_json::to_string(token).map_err(ChatrollError::Serialization)?;
        self.entry()?
            .set_password(&json)
            .map_err(ChatrollError::Keyring)?;
        tracing::info!("Stored API token for {}", self.account);
        Ok(())
    }

    /// Load the stored token, `Ok(None)` when nothing is stored
    ///
    /// # Errors
    ///
    /// Returns an error if the keyring fails or the stored JSON is malformed.
    pub fn load(&self) -> Result<Option<AuthToken>> {
        match self.entry()?.get_password() {
            Ok(json) => {
                let token: AuthToken =
                    serde_json::from_str(&json).map_err(ChatrollError::Serialization)?;
                Ok(Some(token))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(ChatrollError::Keyring(e).into()),
        }
    }

    /// Remove the stored token; a missing token is not an error
    ///
    /// # Errors
    ///
    /// Returns an error if the keyring fails.
    pub fn delete(&self) -> Result<()> {
        match self.entry()?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(ChatrollError::Keyring(e).into()),
        }
    }
}

impl TokenSource for KeyringTokenStore {
    fn token(&self) -> Result<Option<String>> {
        match self.load()? {
            Some(token) if token.is_expired() => {
                tracing::warn!("Stored API token for {} has expired", self.account);
                Ok(None)
            }
            Some(token) => Ok(Some(token.access_token)),
            None => Ok(None),
        }
    }
}
