//! Per-mutation bookkeeping
//!
//! Each optimistic mutation moves through
//! `Idle -> Applied -> {Confirmed | RolledBack}`. The terminal states are
//! final for that mutation; the store itself has no such states.

use super::MutationKind;
use uuid::Uuid;

/// Lifecycle state of one mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    /// Created, nothing written yet
    Idle,
    /// Optimistic value written to the store, backend call pending
    Applied,
    /// Backend accepted the change
    Confirmed,
    /// Backend refused the change and the prior value was restored
    RolledBack,
}

impl MutationState {
    /// Returns `true` for `Confirmed` and `RolledBack`
    pub fn is_terminal(&self) -> bool {
        matches!(self, MutationState::Confirmed | MutationState::RolledBack)
    }

    fn can_move_to(&self, next: MutationState) -> bool {
        matches!(
            (self, next),
            (MutationState::Idle, MutationState::Applied)
                | (MutationState::Applied, MutationState::Confirmed)
                | (MutationState::Applied, MutationState::RolledBack)
        )
    }
}

/// Bookkeeping for one in-flight mutation
#[derive(Debug)]
pub struct Mutation {
    id: Uuid,
    kind: MutationKind,
    chat_id: String,
    state: MutationState,
}

impl Mutation {
    /// Start tracking a mutation of `kind` on chat `chat_id`
    pub fn new(kind: MutationKind, chat_id: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            chat_id: chat_id.to_string(),
            state: MutationState::Idle,
        }
    }

    /// Correlation id used in logs
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// What is being changed
    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    /// Chat being changed
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// Current state
    pub fn state(&self) -> MutationState {
        self.state
    }

    /// Record the optimistic write
    pub fn applied(&mut self) {
        self.transition(MutationState::Applied);
    }

    /// Record backend confirmation
    pub fn confirmed(&mut self) {
        self.transition(MutationState::Confirmed);
    }

    /// Record the rollback
    pub fn rolled_back(&mut self) {
        self.transition(MutationState::RolledBack);
    }

    fn transition(&mut self, next: MutationState) {
        if self.state.is_terminal() {
            tracing::error!(
                mutation = %self.id,
                "Mutation already settled as {:?}, ignoring {:?}",
                self.state,
                next
            );
            return;
        }
        if !self.state.can_move_to(next) {
            // Out-of-order transitions are a controller bug; keep the old state.
            tracing::error!(
                mutation = %self.id,
                "Ignoring invalid mutation transition {:?} -> {:?}",
                self.state,
                next
            );
            return;
        }
        tracing::debug!(
            mutation = %self.id,
            kind = self.kind.as_str(),
            chat = %self.chat_id,
            "{:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
    }
}
