//! Chat list data model
//!
//! Types describing the conversation metadata shown in navigation lists,
//! the partial updates applied to it, and the validated chat title accepted
//! by rename.

use crate::error::{ChatrollError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Metadata for one conversation
///
/// # Examples
///
/// ```
/// use chatroll::model::ChatSummary;
///
/// let chat: ChatSummary = serde_json::from_str(r#"{"id":"1","title":"A"}"#).unwrap();
/// assert!(!chat.favorite);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSummary {
    /// Backend-assigned identifier, immutable once created
    pub id: String,
    /// Human-readable label
    pub title: String,
    /// Favorite flag
    #[serde(default)]
    pub favorite: bool,
}

impl ChatSummary {
    /// Create a new summary
    pub fn new(id: impl Into<String>, title: impl Into<String>, favorite: bool) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            favorite,
        }
    }
}

/// Ordered chat list, newest first, unique ids
pub type ChatCollection = Vec<ChatSummary>;

/// Body of `GET /chat/all`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatListResponse {
    /// Chats known to the backend
    #[serde(default)]
    pub chats: ChatCollection,
}

/// Partial update of a [`ChatSummary`]
///
/// Fields left as `None` are not touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatPatch {
    /// New title
    pub title: Option<String>,
    /// New favorite flag
    pub favorite: Option<bool>,
}

impl ChatPatch {
    /// Patch that only sets the favorite flag
    pub fn favorite(favorite: bool) -> Self {
        Self {
            favorite: Some(favorite),
            ..Default::default()
        }
    }

    /// Patch that only sets the title
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Patch that puts every mutable field back to the values in `chat`
    pub fn restore(chat: &ChatSummary) -> Self {
        Self {
            title: Some(chat.title.clone()),
            favorite: Some(chat.favorite),
        }
    }

    /// Apply the patch in place
    pub fn apply_to(&self, chat: &mut ChatSummary) {
        if let Some(title) = &self.title {
            chat.title = title.clone();
        }
        if let Some(favorite) = self.favorite {
            chat.favorite = favorite;
        }
    }
}

/// Drop repeated ids, keeping the first (newest) occurrence
///
/// # Examples
///
/// ```
/// use chatroll::model::{dedup_by_id, ChatSummary};
///
/// let chats = vec![
///     ChatSummary::new("1", "new", false),
///     ChatSummary::new("1", "old", true),
///     ChatSummary::new("2", "other", false),
/// ];
/// let unique = dedup_by_id(chats);
/// assert_eq!(unique.len(), 2);
/// assert_eq!(unique[0].title, "new");
/// ```
pub fn dedup_by_id(chats: ChatCollection) -> ChatCollection {
    let mut seen = HashSet::with_capacity(chats.len());
    chats
        .into_iter()
        .filter(|chat| {
            let fresh = seen.insert(chat.id.clone());
            if !fresh {
                tracing::warn!("Dropping duplicate chat id {}", chat.id);
            }
            fresh
        })
        .collect()
}

/// Length limits for chat titles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleRules {
    /// Minimum number of characters after trimming
    #[serde(default = "default_title_min")]
    pub min_length: usize,
    /// Maximum number of characters after trimming
    #[serde(default = "default_title_max")]
    pub max_length: usize,
}

fn default_title_min() -> usize {
    3
}

fn default_title_max() -> usize {
    60
}

impl Default for TitleRules {
    fn default() -> Self {
        Self {
            min_length: default_title_min(),
            max_length: default_title_max(),
        }
    }
}

/// A chat title that passed [`TitleRules`]
///
/// Rename only accepts this type, so an invalid title can never reach the
/// controller or the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChatTitle(String);

impl ChatTitle {
    /// Trim and validate a raw title
    ///
    /// # Errors
    ///
    /// Returns [`ChatrollError::Validation`] when the trimmed title is empty,
    /// shorter than `rules.min_length` or longer than `rules.max_length`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chatroll::model::{ChatTitle, TitleRules};
    ///
    /// let rules = TitleRules::default();
    /// assert_eq!(ChatTitle::parse("  Trip plans ", &rules).unwrap().as_str(), "Trip plans");
    /// assert!(ChatTitle::parse("   ", &rules).is_err());
    /// assert!(ChatTitle::parse("ab", &rules).is_err());
    /// ```
    pub fn parse(raw: &str, rules: &TitleRules) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ChatrollError::Validation("Title cannot be empty".to_string()).into());
        }

        let length = trimmed.chars().count();
        if length < rules.min_length {
            return Err(ChatrollError::Validation(format!(
                "Title must be at least {} characters",
                rules.min_length
            ))
            .into());
        }
        if length > rules.max_length {
            return Err(ChatrollError::Validation(format!(
                "Title must be at most {} characters",
                rules.max_length
            ))
            .into());
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the title text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChatTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
