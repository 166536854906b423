//! The session store: every conversation thread the user has opened, plus
//! the pointer to the one currently on screen.
//!
//! All state here is ephemeral. Sessions exist from the moment the user
//! creates one until the process exits; there is no delete operation and
//! nothing is persisted.

use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::api::client::Conversation;
use crate::core::message::Message;

/// Opaque unique token identifying one session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Truncated form used for sidebar labels and the thread title.
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map(|(idx, _)| idx)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

/// One independent conversation thread: its identity, its provider-side
/// handle, and the ordered log of what has been said.
pub struct ChatSession {
    pub id: SessionId,
    pub remote: Conversation,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Local>,
}

/// In-memory mapping from session id to session, in creation order, with at
/// most one session active at a time.
#[derive(Default)]
pub struct SessionStore {
    sessions: Vec<ChatSession>,
    active: Option<SessionId>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new session around an already-opened remote conversation and
    /// make it the active one. Returns the fresh id.
    pub fn create_session(&mut self, remote: Conversation) -> SessionId {
        let id = SessionId::generate();
        self.sessions.push(ChatSession {
            id: id.clone(),
            remote,
            messages: Vec::new(),
            created_at: Local::now(),
        });
        self.active = Some(id.clone());
        id
    }

    /// Point the UI at an existing session. Unknown ids are ignored: the UI
    /// only offers ids it got from this store, so there is nothing sensible
    /// to report.
    pub fn select_session(&mut self, id: &SessionId) {
        if self.sessions.iter().any(|session| &session.id == id) {
            self.active = Some(id.clone());
        }
    }

    /// Clear the active pointer, returning the UI to the home view.
    pub fn return_home(&mut self) {
        self.active = None;
    }

    pub fn active_id(&self) -> Option<&SessionId> {
        self.active.as_ref()
    }

    pub fn active_session(&self) -> Option<&ChatSession> {
        let id = self.active.as_ref()?;
        self.session(id)
    }

    pub fn session(&self, id: &SessionId) -> Option<&ChatSession> {
        self.sessions.iter().find(|session| &session.id == id)
    }

    pub fn session_mut(&mut self, id: &SessionId) -> Option<&mut ChatSession> {
        self.sessions.iter_mut().find(|session| &session.id == id)
    }

    /// Sessions in creation order, for the sidebar listing.
    pub fn iter(&self) -> impl Iterator<Item = &ChatSession> {
        self.sessions.iter()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ChatMessage;

    fn empty_conversation() -> Conversation {
        Conversation::new(&[ChatMessage::new("system", "Be helpful.")])
    }

    #[test]
    fn created_sessions_get_distinct_ids_and_become_active() {
        let mut store = SessionStore::new();

        let first = store.create_session(empty_conversation());
        assert_eq!(store.active_id(), Some(&first));

        let second = store.create_session(empty_conversation());
        assert_ne!(first, second);
        assert_eq!(store.active_id(), Some(&second));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn return_home_clears_the_active_pointer() {
        let mut store = SessionStore::new();
        store.return_home();
        assert!(store.active_id().is_none());

        store.create_session(empty_conversation());
        store.return_home();
        assert!(store.active_id().is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn selecting_a_session_is_idempotent() {
        let mut store = SessionStore::new();
        let first = store.create_session(empty_conversation());
        store.create_session(empty_conversation());

        store.select_session(&first);
        assert_eq!(store.active_id(), Some(&first));

        store.select_session(&first);
        assert_eq!(store.active_id(), Some(&first));
        assert!(store.session(&first).expect("session").messages.is_empty());
    }

    #[test]
    fn selecting_an_unknown_id_is_a_no_op() {
        let mut store = SessionStore::new();
        let known = store.create_session(empty_conversation());

        let mut other = SessionStore::new();
        let foreign = other.create_session(empty_conversation());

        store.select_session(&foreign);
        assert_eq!(store.active_id(), Some(&known));
    }

    #[test]
    fn iteration_follows_creation_order() {
        let mut store = SessionStore::new();
        let first = store.create_session(empty_conversation());
        let second = store.create_session(empty_conversation());
        let third = store.create_session(empty_conversation());

        let ids: Vec<_> = store.iter().map(|session| session.id.clone()).collect();
        assert_eq!(ids, vec![first, second, third]);
    }

    #[test]
    fn short_ids_are_eight_characters() {
        let mut store = SessionStore::new();
        let id = store.create_session(empty_conversation());
        assert_eq!(id.short().chars().count(), 8);
        assert!(id.as_str().starts_with(id.short()));
    }
}
