//! Test utilities for Chatroll
//!
//! Provides a scriptable in-memory [`ChatService`] and a harness wiring it to
//! a controller with recording collaborators.

use crate::controller::ChatController;
use crate::error::ServiceError;
use crate::model::{ChatCollection, ChatSummary, ChatTitle};
use crate::navigation::NavigationState;
use crate::notify::RecordingNotifier;
use crate::service::ChatService;
use crate::store::ChatStore;

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// Shorthand for building a [`ChatSummary`]
pub fn chat(id: &str, title: &str, favorite: bool) -> ChatSummary {
    ChatSummary::new(id, title, favorite)
}

/// A call received by [`FakeChatService`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    FetchAll,
    ToggleFavorite(String),
    Rename(String, String),
    Delete(String),
}

enum Reply {
    Fail(ServiceError),
    Deferred(oneshot::Receiver<Result<(), ServiceError>>),
}

/// In-memory chat service whose answers are scripted per call
///
/// Calls consume scripted replies in order; with nothing scripted a call
/// succeeds.
#[derive(Default)]
pub struct FakeChatService {
    remote: Mutex<ChatCollection>,
    calls: Mutex<Vec<ServiceCall>>,
    script: Mutex<VecDeque<Reply>>,
}

impl FakeChatService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chats returned by `fetch_all`
    pub fn set_remote_chats(&self, chats: ChatCollection) {
        *self.remote.lock().unwrap() = chats;
    }

    /// Make the next call fail with `error`
    pub fn fail_next(&self, error: ServiceError) {
        self.script.lock().unwrap().push_back(Reply::Fail(error));
    }

    /// Hold the next call until the returned sender is used
    pub fn defer_next(&self) -> oneshot::Sender<Result<(), ServiceError>> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().unwrap().push_back(Reply::Deferred(rx));
        tx
    }

    /// Calls received so far
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().unwrap().clone()
    }

    async fn answer(&self, call: ServiceCall) -> Result<(), ServiceError> {
        self.calls.lock().unwrap().push(call);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            None => Ok(()),
            Some(Reply::Fail(error)) => Err(error),
            Some(Reply::Deferred(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(ServiceError::Network("reply dropped".to_string()))),
        }
    }
}

#[async_trait]
impl ChatService for FakeChatService {
    async fn fetch_all(&self) -> Result<ChatCollection, ServiceError> {
        self.answer(ServiceCall::FetchAll).await?;
        Ok(self.remote.lock().unwrap().clone())
    }

    async fn toggle_favorite(&self, id: &str) -> Result<(), ServiceError> {
        self.answer(ServiceCall::ToggleFavorite(id.to_string()))
            .await
    }

    async fn rename(&self, id: &str, title: &ChatTitle) -> Result<(), ServiceError> {
        self.answer(ServiceCall::Rename(id.to_string(), title.to_string()))
            .await
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        self.answer(ServiceCall::Delete(id.to_string())).await
    }
}

/// Controller plus handles on its collaborators
pub struct Harness {
    pub controller: Arc<ChatController>,
    pub service: Arc<FakeChatService>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<NavigationState>,
}

/// Build a controller whose store already holds `chats`
pub fn harness(chats: ChatCollection) -> Harness {
    let store = Arc::new(ChatStore::new());
    store.replace_all(chats);

    let service = Arc::new(FakeChatService::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let navigator = Arc::new(NavigationState::default());

    let controller = Arc::new(ChatController::new(
        store,
        service.clone(),
        notifier.clone(),
        navigator.clone(),
    ));

    Harness {
        controller,
        service,
        notifier,
        navigator,
    }
}

/// Yield until `service` has received `count` calls
///
/// # Panics
///
/// Panics if the calls do not arrive within a generous number of yields.
pub async fn wait_for_calls(service: &FakeChatService, count: usize) {
    for _ in 0..1_000 {
        if service.calls().len() >= count {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!(
        "expected {} service calls, saw {:?}",
        count,
        service.calls()
    );
}
