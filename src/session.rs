//! Session store — per-session conversation state.

use std::collections::HashMap;
use std::sync::Arc;

use crate::agent::{Agent, Message, RunConfig};

/// State held for one chat session: conversation history, the active agent,
/// and the run configuration.
///
/// Lifecycle is one chat session — created on the start event, dropped with
/// the store. Nothing here is persisted.
#[derive(Debug)]
pub struct SessionState {
    pub history: Vec<Message>,
    pub agent: Arc<Agent>,
    pub config: RunConfig,
}

impl SessionState {
    /// Fresh session state: empty history.
    pub fn new(agent: Arc<Agent>, config: RunConfig) -> Self {
        Self {
            history: Vec::new(),
            agent,
            config,
        }
    }
}

/// In-memory map of live sessions, keyed by an opaque session identifier.
///
/// No concurrent-access contract is defined here: events within one session
/// are expected to arrive serialized by the hosting dispatcher.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<String, SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the state for a session key.
    pub fn insert(&mut self, key: impl Into<String>, state: SessionState) {
        self.sessions.insert(key.into(), state);
    }

    pub fn get(&self, key: &str) -> Option<&SessionState> {
        self.sessions.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut SessionState> {
        self.sessions.get_mut(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.sessions.contains_key(key)
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
    use crate::agent::AgentRegistry;

    #[test]
    fn test_fresh_session_state() {
        let registry = AgentRegistry::build();
        let state = SessionState::new(registry.triage.clone(), RunConfig::new("gemini-2.0-flash"));

        assert!(state.history.is_empty());
        assert!(state.agent.is_triage());
        assert_eq!(state.config.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_store_insert_and_get() {
        let registry = AgentRegistry::build();
        let mut store = SessionStore::new();
        assert!(store.is_empty());

        store.insert(
            "cli:default",
            SessionState::new(registry.triage.clone(), RunConfig::new("gemini-2.0-flash")),
        );

        assert_eq!(store.len(), 1);
        assert!(store.contains("cli:default"));
        assert!(store.get("telegram:42").is_none());
    }

    #[test]
    fn test_store_insert_replaces() {
        let registry = AgentRegistry::build();
        let mut store = SessionStore::new();

        let mut state =
            SessionState::new(registry.triage.clone(), RunConfig::new("gemini-2.0-flash"));
        state.history.push(crate::agent::Message::user("old"));
        store.insert("cli:default", state);

        store.insert(
            "cli:default",
            SessionState::new(registry.triage.clone(), RunConfig::new("gemini-2.0-flash")),
        );

        assert!(store.get("cli:default").unwrap().history.is_empty());
    }
}
