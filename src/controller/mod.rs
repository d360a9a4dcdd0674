//! Optimistic mutation controller
//!
//! [`ChatController`] is the only writer of the [`ChatStore`]. Each mutation
//! follows the same contract:
//!
//! 1. read the current entry (or the whole list, for delete) as `before`
//! 2. compute `after`
//! 3. write `after` to the store right away
//! 4. await the backend call
//! 5. on success leave the store alone; on failure restore `before`, emit one
//!    error notification and log the error
//!
//! There is no retry and no per-chat queueing. Two overlapping mutations on
//! the same chat each restore their own `before` on failure, so a rollback
//! may overwrite a newer optimistic write that is still in flight.

pub mod metrics;
pub mod mutation;

pub use mutation::{Mutation, MutationState};

use crate::error::{ChatrollError, Result, ServiceError, ServiceErrorKind};
use crate::model::{ChatPatch, ChatSummary, ChatTitle};
use crate::navigation::{Navigator, View};
use crate::notify::{Notification, Notifier};
use crate::service::ChatService;
use crate::store::ChatStore;
use self::metrics::MutationMetrics;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// The kind of change a mutation makes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    /// Flip the favorite flag
    ToggleFavorite,
    /// Change the title
    Rename,
    /// Remove the chat
    Delete,
}

impl MutationKind {
    /// Stable lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::ToggleFavorite => "toggle_favorite",
            MutationKind::Rename => "rename",
            MutationKind::Delete => "delete",
        }
    }

    /// Message shown to the user when a mutation of this kind fails
    ///
    /// # Examples
    ///
    /// ```
    /// use chatroll::controller::MutationKind;
    /// use chatroll::error::ServiceError;
    ///
    /// let err = ServiceError::Server { status: 500, body: String::new() };
    /// assert_eq!(
    ///     MutationKind::ToggleFavorite.failure_message(&err),
    ///     "Failed to update favorite status. Please try again later."
    /// );
    /// ```
    pub fn failure_message(&self, error: &ServiceError) -> String {
        if let (MutationKind::Rename, ServiceError::Validation(reason)) = (self, error) {
            return format!("Chat title was rejected: {}", reason);
        }

        let action = match self {
            MutationKind::ToggleFavorite => "Failed to update favorite status.",
            MutationKind::Rename => "Failed to rename chat.",
            MutationKind::Delete => "Failed to delete chat.",
        };

        match error.kind() {
            ServiceErrorKind::Network => {
                format!("{} Check your connection and try again.", action)
            }
            ServiceErrorKind::Server | ServiceErrorKind::Validation => {
                format!("{} Please try again later.", action)
            }
        }
    }
}

/// How a mutation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The backend accepted the change; the optimistic state stands
    Confirmed,
    /// The backend refused the change; the prior state was restored
    RolledBack(ServiceError),
    /// The target chat was not in the store; nothing was sent
    Skipped,
    /// The controller was detached before the backend answered; the result
    /// was ignored
    Detached,
}

impl MutationOutcome {
    /// Returns `true` for [`MutationOutcome::Confirmed`]
    pub fn is_confirmed(&self) -> bool {
        matches!(self, MutationOutcome::Confirmed)
    }

    /// Returns `true` for [`MutationOutcome::RolledBack`]
    pub fn is_rolled_back(&self) -> bool {
        matches!(self, MutationOutcome::RolledBack(_))
    }
}

/// Decrements the in-flight counter when dropped
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Applies chat list mutations optimistically and rolls them back on failure
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use chatroll::auth::StaticToken;
/// use chatroll::config::ApiConfig;
/// use chatroll::controller::ChatController;
/// use chatroll::navigation::NavigationState;
/// use chatroll::notify::TracingNotifier;
/// use chatroll::service::HttpChatService;
/// use chatroll::store::ChatStore;
///
/// # async fn example() -> chatroll::error::Result<()> {
/// let service = HttpChatService::new(&ApiConfig::default(), Arc::new(StaticToken::default()))?;
/// let controller = ChatController::new(
///     Arc::new(ChatStore::new()),
///     Arc::new(service),
///     Arc::new(TracingNotifier),
///     Arc::new(NavigationState::default()),
/// );
/// controller.refresh().await?;
/// let outcome = controller.toggle_favorite("42").await;
/// println!("{:?}", outcome);
/// # Ok(())
/// # }
/// ```
pub struct ChatController {
    store: Arc<ChatStore>,
    service: Arc<dyn ChatService>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    detached: CancellationToken,
    in_flight: AtomicUsize,
}

impl ChatController {
    /// Create a controller over `store`
    ///
    /// # Arguments
    ///
    /// * `store` - Chat list the controller writes to; other holders only read it
    /// * `service` - Backend that confirms or refuses each mutation
    /// * `notifier` - Receives one error notification per rolled-back mutation
    /// * `navigator` - Moved away from a chat while its deletion is pending
    ///
    /// # Returns
    ///
    /// An attached controller with no mutations in flight
    pub fn new(
        store: Arc<ChatStore>,
        service: Arc<dyn ChatService>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            store,
            service,
            notifier,
            navigator,
            detached: CancellationToken::new(),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Read access to the store
    pub fn store(&self) -> &Arc<ChatStore> {
        &self.store
    }

    /// Number of mutations waiting on the backend
    pub fn pending(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Stop applying backend results
    ///
    /// Calls already in flight still complete, but their results no longer
    /// touch the store, the navigator or the notifier.
    pub fn detach(&self) {
        tracing::debug!("Controller detached with {} pending mutations", self.pending());
        self.detached.cancel();
    }

    /// Returns `true` after [`ChatController::detach`]
    pub fn is_detached(&self) -> bool {
        self.detached.is_cancelled()
    }

    /// Load the chat list from the backend into the store
    ///
    /// Returns the number of chats now held. On failure the store keeps its
    /// previous contents and one error notification is emitted.
    ///
    /// # Errors
    ///
    /// Returns the [`ServiceError`] wrapped in [`ChatrollError::Service`].
    pub async fn refresh(&self) -> Result<usize> {
        let result = self.service.fetch_all().await;

        if self.is_detached() {
            tracing::debug!("Ignoring chat list received after detach");
            return Ok(self.store.len());
        }

        match result {
            Ok(chats) => {
                self.store.replace_all(chats);
                let count = self.store.len();
                tracing::info!("Loaded {} chats", count);
                Ok(count)
            }
            Err(error) => {
                tracing::error!("Failed to load chats: {}", error);
                let message = match error.kind() {
                    ServiceErrorKind::Network => {
                        "Failed to load chats. Check your connection and try again."
                    }
                    _ => "Failed to load chats. Please try again later.",
                };
                self.notifier.notify(Notification::error(message));
                Err(ChatrollError::Service(error).into())
            }
        }
    }

    /// Put a chat the backend just created at the head of the list
    pub fn record_new_chat(&self, chat: ChatSummary) {
        tracing::debug!("Recording new chat {}", chat.id);
        self.store.insert_front(chat);
    }

    /// Flip the favorite flag of chat `id`
    pub async fn toggle_favorite(&self, id: &str) -> MutationOutcome {
        let kind = MutationKind::ToggleFavorite;
        let Some(before) = self.store.get(id) else {
            return Self::skip(kind, id);
        };

        let mut mutation = Mutation::new(kind, id);
        let metrics = MutationMetrics::start(kind);

        self.store
            .update_one(id, &ChatPatch::favorite(!before.favorite));
        mutation.applied();

        let result = {
            let _in_flight = InFlight::enter(&self.in_flight);
            self.service.toggle_favorite(id).await
        };

        self.settle(mutation, metrics, result, || {
            self.store.update_one(id, &ChatPatch::restore(&before));
        })
    }

    /// Rename chat `id` to `title`
    ///
    /// `title` has already passed [`ChatTitle::parse`], so invalid input
    /// never gets here.
    pub async fn rename(&self, id: &str, title: ChatTitle) -> MutationOutcome {
        let kind = MutationKind::Rename;
        let Some(before) = self.store.get(id) else {
            return Self::skip(kind, id);
        };

        let mut mutation = Mutation::new(kind, id);
        let metrics = MutationMetrics::start(kind);

        self.store
            .update_one(id, &ChatPatch::title(title.as_str()));
        mutation.applied();

        let result = {
            let _in_flight = InFlight::enter(&self.in_flight);
            self.service.rename(id, &title).await
        };

        self.settle(mutation, metrics, result, || {
            self.store.update_one(id, &ChatPatch::restore(&before));
        })
    }

    /// Delete chat `id`
    ///
    /// When `id` is the open conversation the navigator moves to
    /// [`View::NewChat`] together with the optimistic removal, and back to
    /// the conversation if the removal is rolled back.
    pub async fn delete(&self, id: &str) -> MutationOutcome {
        let kind = MutationKind::Delete;
        let before = self.store.get_all();
        if !before.iter().any(|chat| chat.id == id) {
            return Self::skip(kind, id);
        }

        let mut mutation = Mutation::new(kind, id);
        let metrics = MutationMetrics::start(kind);

        let redirected = self.navigator.current().is_chat(id);
        self.store.remove_one(id);
        if redirected {
            self.navigator.navigate(View::NewChat);
        }
        mutation.applied();

        let result = {
            let _in_flight = InFlight::enter(&self.in_flight);
            self.service.delete(id).await
        };

        self.settle(mutation, metrics, result, || {
            self.store.replace_all(before);
            if redirected {
                self.navigator.navigate(View::Chat(id.to_string()));
            }
        })
    }

    fn skip(kind: MutationKind, id: &str) -> MutationOutcome {
        tracing::debug!(
            kind = kind.as_str(),
            "Chat {} is not in the store, skipping",
            id
        );
        MutationOutcome::Skipped
    }

    fn settle(
        &self,
        mut mutation: Mutation,
        metrics: MutationMetrics,
        result: std::result::Result<(), ServiceError>,
        rollback: impl FnOnce(),
    ) -> MutationOutcome {
        if self.is_detached() {
            tracing::debug!(
                mutation = %mutation.id(),
                state = ?mutation.state(),
                "Ignoring {} result for chat {} after detach",
                mutation.kind().as_str(),
                mutation.chat_id()
            );
            metrics.record_outcome("detached");
            return MutationOutcome::Detached;
        }

        match result {
            Ok(()) => {
                mutation.confirmed();
                metrics.record_outcome("confirmed");
                MutationOutcome::Confirmed
            }
            Err(error) => {
                rollback();
                mutation.rolled_back();
                tracing::error!(
                    mutation = %mutation.id(),
                    error_kind = error.kind().as_str(),
                    "{} of chat {} failed, rolled back: {}",
                    mutation.kind().as_str(),
                    mutation.chat_id(),
                    error
                );
                self.notifier.notify(Notification::error(
                    mutation.kind().failure_message(&error),
                ));
                metrics.record_outcome("rolled_back");
                MutationOutcome::RolledBack(error)
            }
        }
    }
}
