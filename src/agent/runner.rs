//! Run execution — one remote invocation per conversation turn.

use tracing::debug;

use crate::Result;

use super::llm::{LlmClient, Usage};
use super::message::Message;
use super::registry::Agent;

/// Per-session run configuration. Immutable once built.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Model identifier sent with every request.
    pub model: String,

    /// Suppresses run-level trace output when set.
    pub tracing_disabled: bool,
}

impl RunConfig {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            tracing_disabled: true,
        }
    }
}

/// Outcome of one run: the final text output plus the run's own serialized
/// view of the exchange.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub final_output: String,
    pub usage: Usage,
    messages: Vec<Message>,
}

impl RunResult {
    /// The exchange as an input list — authoritative history for the next
    /// turn.
    pub fn to_input_list(&self) -> Vec<Message> {
        self.messages.clone()
    }
}

/// Runner — issues a single remote run with an agent, a history, and a
/// run configuration.
pub struct Runner<C: LlmClient> {
    client: C,
}

impl<C: LlmClient> Runner<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Invoke the remote model once and wait for completion.
    ///
    /// No timeout, retry, or cancellation is applied at this layer; the call
    /// is an awaited suspension point, pending the network round-trip.
    pub async fn run(
        &self,
        agent: &Agent,
        history: &[Message],
        config: &RunConfig,
    ) -> Result<RunResult> {
        let request = build_request(agent, history);

        if !config.tracing_disabled {
            debug!(agent = %agent.name, messages = request.len(), "starting run");
        }

        let response = self.client.chat(&config.model, &request).await?;

        let mut messages = history.to_vec();
        messages.push(Message::assistant(response.content.clone()));

        Ok(RunResult {
            final_output: response.content,
            usage: response.usage,
            messages,
        })
    }
}

/// Compose the request: the agent's system instructions followed by the full
/// conversation history.
fn build_request(agent: &Agent, history: &[Message]) -> Vec<Message> {
    let mut request = Vec::with_capacity(history.len() + 1);
    request.push(Message::system(agent.system_prompt()));
    request.extend(history.iter().cloned());
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::llm::FakeLlmClient;
    use crate::agent::message::Role;
    use crate::agent::registry::AgentRegistry;

    #[tokio::test]
    async fn test_run_returns_final_output() {
        let registry = AgentRegistry::build();
        let runner = Runner::new(FakeLlmClient::new(vec!["Hello, human!"]));
        let config = RunConfig::new("gemini-2.0-flash");

        let history = vec![Message::user("Hi there")];
        let result = runner
            .run(&registry.triage, &history, &config)
            .await
            .unwrap();

        assert_eq!(result.final_output, "Hello, human!");
    }

    #[tokio::test]
    async fn test_run_serializes_exchange() {
        let registry = AgentRegistry::build();
        let runner = Runner::new(FakeLlmClient::new(vec!["Reply"]));
        let config = RunConfig::new("gemini-2.0-flash");

        let history = vec![Message::user("First")];
        let result = runner
            .run(&registry.triage, &history, &config)
            .await
            .unwrap();

        let list = result.to_input_list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0], Message::user("First"));
        assert_eq!(list[1], Message::assistant("Reply"));
    }

    #[tokio::test]
    async fn test_run_propagates_errors() {
        let registry = AgentRegistry::build();
        let runner = Runner::new(FakeLlmClient::failing("connection reset"));
        let config = RunConfig::new("gemini-2.0-flash");

        let err = runner
            .run(&registry.triage, &[], &config)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_build_request_prepends_system_prompt() {
        let registry = AgentRegistry::build();
        let history = vec![Message::user("Hola"), Message::assistant("¡Hola!")];

        let request = build_request(&registry.triage, &history);

        assert_eq!(request.len(), 3);
        assert_eq!(request[0].role, Role::System);
        assert!(request[0].content.contains("'SpanishAgent'"));
        assert_eq!(request[1], history[0]);
        assert_eq!(request[2], history[1]);
    }
}
