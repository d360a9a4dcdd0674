//! Active conversation tracking
//!
//! Deleting the conversation that is currently open moves the client to a
//! neutral view; a failed delete moves it back. [`Navigator`] abstracts where
//! that view state lives.

use std::sync::Mutex;

/// What the client is showing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    /// An open conversation
    Chat(String),
    /// The neutral "new chat" view
    #[default]
    NewChat,
}

impl View {
    /// Returns `true` when this view is the conversation `id`
    ///
    /// # Examples
    ///
    /// ```
    /// use chatroll::navigation::View;
    ///
    /// assert!(View::Chat("1".into()).is_chat("1"));
    /// assert!(!View::NewChat.is_chat("1"));
    /// ```
    pub fn is_chat(&self, id: &str) -> bool {
        matches!(self, View::Chat(current) if current == id)
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            View::Chat(id) => write!(f, "chat {}", id),
            View::NewChat => f.write_str("new chat"),
        }
    }
}

/// Owner of the current view
pub trait Navigator: Send + Sync {
    /// The view currently shown
    fn current(&self) -> View;

    /// Switch to `view`
    fn navigate(&self, view: View);
}

/// In-memory navigator that remembers every view it visited
#[derive(Debug)]
pub struct NavigationState {
    inner: Mutex<NavigationInner>,
}

#[derive(Debug)]
struct NavigationInner {
    current: View,
    history: Vec<View>,
}

impl NavigationState {
    /// Start on `initial`
    pub fn new(initial: View) -> Self {
        Self {
            inner: Mutex::new(NavigationInner {
                current: initial.clone(),
                history: vec![initial],
            }),
        }
    }

    /// Every view visited, starting with the initial one
    pub fn history(&self) -> Vec<View> {
        self.lock().history.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NavigationInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new(View::NewChat)
    }
}

impl Navigator for NavigationState {
    fn current(&self) -> View {
        self.lock().current.clone()
    }

    fn navigate(&self, view: View) {
        let mut inner = self.lock();
        tracing::debug!("Navigating from {} to {}", inner.current, view);
        inner.current = view.clone();
        inner.history.push(view);
    }
}
