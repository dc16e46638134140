//! Lingo - multi-agent language tutor chat gateway
//!
//! This library provides a minimal chat router: a triage agent reads the
//! user's intent and hands off to one of four language-tutor specialists,
//! all backed by Gemini through its OpenAI-compatible completions API.

pub mod adapters;
pub mod agent;
pub mod config;
pub mod error;
pub mod handler;
pub mod session;
pub mod ui;

pub use error::{Error, Result};
