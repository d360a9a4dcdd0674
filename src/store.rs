//! In-memory chat list store
//!
//! [`ChatStore`] is the single source of truth for the client's chat list.
//! Anyone holding an `Arc<ChatStore>` can read it and subscribe to changes;
//! only code inside this crate (the controller) can write to it.
//!
//! Every successful write publishes a [`StoreEvent`] carrying the new
//! snapshot to all subscribers, in write order.

use crate::model::{dedup_by_id, ChatCollection, ChatPatch, ChatSummary};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 256;

/// What a store write changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    /// The whole collection was replaced
    Replaced,
    /// One entry was patched in place
    Updated {
        /// Id of the patched entry
        id: String,
    },
    /// One entry was removed
    Removed {
        /// Id of the removed entry
        id: String,
    },
    /// One entry was placed at the head of the list
    Inserted {
        /// Id of the inserted entry
        id: String,
    },
}

/// Notification sent to subscribers after each write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    /// The kind of write
    pub change: StoreChange,
    /// Collection contents right after the write
    pub snapshot: ChatCollection,
}

/// Chat list state container
///
/// Created explicitly at startup and shared by `Arc`. Dropping the last
/// handle discards the state; nothing is persisted.
///
/// # Examples
///
/// ```
/// use chatroll::store::ChatStore;
///
/// let store = ChatStore::new();
/// let mut events = store.subscribe();
/// assert!(store.is_empty());
/// assert!(events.try_recv().is_err());
/// ```
#[derive(Debug)]
pub struct ChatStore {
    chats: RwLock<ChatCollection>,
    events: broadcast::Sender<StoreEvent>,
}

impl ChatStore {
    /// Create an empty store
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            chats: RwLock::new(Vec::new()),
            events,
        }
    }

    /// Current collection snapshot
    pub fn get_all(&self) -> ChatCollection {
        self.read().clone()
    }

    /// Entry with the given id, if present
    pub fn get(&self, id: &str) -> Option<ChatSummary> {
        self.read().iter().find(|chat| chat.id == id).cloned()
    }

    /// Returns `true` when an entry with `id` exists
    pub fn contains(&self, id: &str) -> bool {
        self.read().iter().any(|chat| chat.id == id)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` when the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Subscribe to store writes
    ///
    /// A receiver that falls more than a few hundred events behind gets
    /// `RecvError::Lagged` and should re-read with [`ChatStore::get_all`].
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Replace the whole collection
    pub(crate) fn replace_all(&self, chats: ChatCollection) {
        let mut guard = self.write();
        *guard = dedup_by_id(chats);
        tracing::debug!("Store replaced: {} chats", guard.len());
        self.publish(StoreChange::Replaced, &guard);
    }

    /// Patch the entry with `id` in place
    ///
    /// Returns `false` and publishes nothing when `id` is absent.
    pub(crate) fn update_one(&self, id: &str, patch: &ChatPatch) -> bool {
        let mut guard = self.write();
        let Some(chat) = guard.iter_mut().find(|chat| chat.id == id) else {
            tracing::debug!("Store update ignored, unknown chat {}", id);
            return false;
        };
        patch.apply_to(chat);
        tracing::trace!("Store updated chat {}: {:?}", id, patch);
        self.publish(StoreChange::Updated { id: id.to_string() }, &guard);
        true
    }

    /// Remove the entry with `id`
    ///
    /// Returns `false` and publishes nothing when `id` is absent.
    pub(crate) fn remove_one(&self, id: &str) -> bool {
        let mut guard = self.write();
        let before = guard.len();
        guard.retain(|chat| chat.id != id);
        if guard.len() == before {
            tracing::debug!("Store remove ignored, unknown chat {}", id);
            return false;
        }
        tracing::trace!("Store removed chat {}", id);
        self.publish(StoreChange::Removed { id: id.to_string() }, &guard);
        true
    }

    /// Put `chat` at the head of the list, replacing any entry with its id
    pub(crate) fn insert_front(&self, chat: ChatSummary) {
        let mut guard = self.write();
        guard.retain(|existing| existing.id != chat.id);
        let id = chat.id.clone();
        guard.insert(0, chat);
        tracing::trace!("Store inserted chat {}", id);
        self.publish(StoreChange::Inserted { id }, &guard);
    }

    fn publish(&self, change: StoreChange, chats: &ChatCollection) {
        // No receivers is not an error: nobody is watching yet.
        let _ = self.events.send(StoreEvent {
            change,
            snapshot: chats.clone(),
        });
    }

    fn read(&self) -> RwLockReadGuard<'_, ChatCollection> {
        self.chats.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ChatCollection> {
        self.chats
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ChatStore {
    fn default() -> Self {
        Self::new()
    }
}
