//! Agent module — core agent logic.
//!
//! This module contains:
//! - Message types (Message, InboundMessage)
//! - LLM client trait and the chat completions implementation
//! - The agent registry (language specialists + triage)
//! - The runner that issues one remote run per turn

mod message;
mod registry;
mod runner;

// LLM providers in submodule
pub mod llm;

// Re-exports for convenience
pub use llm::{ChatCompletionsClient, LlmClient, LlmResponse, Usage};
pub use message::{InboundMessage, Message, Role};
pub use registry::{Agent, AgentKind, AgentRegistry, Language};
pub use runner::{RunConfig, RunResult, Runner};
