//! Conversation handler — session start and per-message turns.
//!
//! The only behavioral logic in the crate. On session start it populates the
//! session store and posts a greeting; on each message it posts a
//! placeholder, runs the active agent against the full history, and replaces
//! the placeholder with the outcome. Everything else (routing, topic
//! refusal) is the remote model's business.

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::agent::{AgentRegistry, LlmClient, Message, RunConfig, Runner};
use crate::error::Error;
use crate::session::{SessionState, SessionStore};
use crate::Result;

/// Greeting posted when a session starts.
pub const GREETING: &str =
    "Hi! I can connect you to a specialized assistant for English or Spanish or French \
     or German. Please tell me what you need help with!";

/// Placeholder posted before each remote run.
pub const PLACEHOLDER: &str = "Thinking...";

/// Outbound surface of the hosting chat UI.
///
/// `post` renders a new message and returns a handle to it; `update`
/// replaces that message's content in place. One placeholder is posted per
/// turn and updated exactly once.
#[async_trait]
pub trait MessageSink: Send {
    type Handle: Send + Sync;

    async fn post(&mut self, text: &str) -> Result<Self::Handle>;

    async fn update(&mut self, handle: &Self::Handle, text: &str) -> Result<()>;
}

/// Conversation handler driving every session of one gateway instance.
pub struct ChatHandler<C: LlmClient> {
    runner: Runner<C>,
    sessions: SessionStore,
    model: String,
}

impl<C: LlmClient> ChatHandler<C> {
    pub fn new(client: C, model: &str) -> Self {
        Self {
            runner: Runner::new(client),
            sessions: SessionStore::new(),
            model: model.to_string(),
        }
    }

    /// Look up a session's state.
    pub fn session(&self, key: &str) -> Option<&SessionState> {
        self.sessions.get(key)
    }

    pub fn has_session(&self, key: &str) -> bool {
        self.sessions.contains(key)
    }

    /// Start (or restart) a session: fresh state, triage agent active, then
    /// the greeting.
    ///
    /// The four specialists are constructed alongside the triage agent and
    /// stay reachable as its handoff candidates, but the active agent after
    /// start is always triage.
    pub async fn on_session_start<S: MessageSink>(
        &mut self,
        session: &str,
        sink: &mut S,
    ) -> Result<()> {
        let registry = AgentRegistry::build();
        let config = RunConfig::new(&self.model);

        self.sessions
            .insert(session, SessionState::new(registry.triage, config));
        info!("Session {session} started");

        sink.post(GREETING).await?;
        Ok(())
    }

    /// Handle one user message to completion.
    ///
    /// Runner failures never escape this method: they surface to the user as
    /// an `"Error: ..."` update and leave the stored history untouched (the
    /// just-appended user message included). An `Err` return means the sink
    /// itself failed.
    pub async fn on_message<S: MessageSink>(
        &mut self,
        session: &str,
        text: &str,
        sink: &mut S,
    ) -> Result<()> {
        // A message for an unknown session starts it first (greeting, then
        // the turn).
        if !self.sessions.contains(session) {
            self.on_session_start(session, sink).await?;
        }

        let placeholder = sink.post(PLACEHOLDER).await?;

        let (agent, config, history) = {
            let state = self
                .sessions
                .get_mut(session)
                .ok_or_else(|| Error::Other(format!("no state for session {session}")))?;

            state.history.push(Message::user(text));
            (
                state.agent.clone(),
                state.config.clone(),
                state.history.clone(),
            )
        };

        debug!(session, history = ?history, "Calling agent with context");

        match self.runner.run(&agent, &history, &config).await {
            Ok(result) => {
                sink.update(&placeholder, &result.final_output).await?;

                // The run's serialized view is authoritative going forward.
                if let Some(state) = self.sessions.get_mut(session) {
                    state.history = result.to_input_list();
                }

                info!("User: {text}");
                info!("Assistant: {}", result.final_output);
            }
            Err(e) => {
                sink.update(&placeholder, &format!("Error: {e}")).await?;
                error!("Error: {e}");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::llm::FakeLlmClient;
    use crate::agent::Role;

    /// Sink that records every post and update.
    struct RecordingSink {
        posts: Vec<String>,
        updates: Vec<(usize, String)>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                posts: Vec::new(),
                updates: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl MessageSink for RecordingSink {
        type Handle = usize;

        async fn post(&mut self, text: &str) -> Result<usize> {
            self.posts.push(text.to_string());
            Ok(self.posts.len() - 1)
        }

        async fn update(&mut self, handle: &usize, text: &str) -> Result<()> {
            self.updates.push((*handle, text.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_session_start_state() {
        let mut handler = ChatHandler::new(FakeLlmClient::new(vec![]), "gemini-2.0-flash");
        let mut sink = RecordingSink::new();

        handler
            .on_session_start("cli:default", &mut sink)
            .await
            .unwrap();

        let state = handler.session("cli:default").unwrap();
        assert!(state.history.is_empty());
        assert!(state.agent.is_triage());
        assert_eq!(state.config.model, "gemini-2.0-flash");
        assert_eq!(sink.posts, vec![GREETING.to_string()]);
    }

    #[tokio::test]
    async fn test_message_success_turn() {
        let client = FakeLlmClient::new(vec!["Être is conjugated: je suis, tu es..."]);
        let mut handler = ChatHandler::new(client, "gemini-2.0-flash");
        let mut sink = RecordingSink::new();

        handler
            .on_session_start("cli:default", &mut sink)
            .await
            .unwrap();
        handler
            .on_message("cli:default", "How do I conjugate 'être'?", &mut sink)
            .await
            .unwrap();

        // One placeholder, updated exactly once with the model's text.
        assert_eq!(sink.posts.len(), 2);
        assert_eq!(sink.posts[1], PLACEHOLDER);
        assert_eq!(sink.updates.len(), 1);
        assert_eq!(
            sink.updates[0],
            (1, "Être is conjugated: je suis, tu es...".to_string())
        );

        // Stored history equals the run's serialized view.
        let state = handler.session("cli:default").unwrap();
        assert_eq!(state.history.len(), 2);
        assert_eq!(state.history[0].role, Role::User);
        assert_eq!(state.history[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_message_error_turn() {
        let client = FakeLlmClient::failing("connection reset");
        let mut handler = ChatHandler::new(client, "gemini-2.0-flash");
        let mut sink = RecordingSink::new();

        handler
            .on_session_start("cli:default", &mut sink)
            .await
            .unwrap();
        handler
            .on_message("cli:default", "Hello?", &mut sink)
            .await
            .unwrap();

        assert_eq!(sink.updates.len(), 1);
        assert_eq!(sink.updates[0].1, "Error: LLM error: connection reset");

        // The failed turn's user message stays; no assistant reply appears.
        let state = handler.session("cli:default").unwrap();
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0], Message::user("Hello?"));
    }

    #[tokio::test]
    async fn test_message_lazily_starts_session() {
        let client = FakeLlmClient::new(vec!["Welcome aboard"]);
        let mut handler = ChatHandler::new(client, "gemini-2.0-flash");
        let mut sink = RecordingSink::new();

        handler
            .on_message("telegram:42", "Hola", &mut sink)
            .await
            .unwrap();

        assert_eq!(sink.posts[0], GREETING);
        assert_eq!(sink.posts[1], PLACEHOLDER);
        assert!(handler.has_session("telegram:42"));
    }

    #[tokio::test]
    async fn test_history_accumulates_across_turns() {
        let client = FakeLlmClient::new(vec!["First reply", "Second reply"]);
        let mut handler = ChatHandler::new(client, "gemini-2.0-flash");
        let mut sink = RecordingSink::new();

        handler
            .on_session_start("cli:default", &mut sink)
            .await
            .unwrap();
        handler
            .on_message("cli:default", "One", &mut sink)
            .await
            .unwrap();
        handler
            .on_message("cli:default", "Two", &mut sink)
            .await
            .unwrap();

        let state = handler.session("cli:default").unwrap();
        let contents: Vec<_> = state.history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["One", "First reply", "Two", "Second reply"]);
    }

    #[tokio::test]
    async fn test_restart_resets_session() {
        let client = FakeLlmClient::new(vec!["Reply"]);
        let mut handler = ChatHandler::new(client, "gemini-2.0-flash");
        let mut sink = RecordingSink::new();

        handler
            .on_session_start("cli:default", &mut sink)
            .await
            .unwrap();
        handler
            .on_message("cli:default", "One", &mut sink)
            .await
            .unwrap();
        handler
            .on_session_start("cli:default", &mut sink)
            .await
            .unwrap();

        assert!(handler.session("cli:default").unwrap().history.is_empty());
    }
}
