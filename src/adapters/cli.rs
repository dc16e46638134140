//! CLI adapter — interactive and single-message command line interface.

use std::io::{self, BufRead, Write};

use async_trait::async_trait;

use crate::agent::LlmClient;
use crate::handler::{ChatHandler, MessageSink};
use crate::Result;

/// Sink rendering handler output on the terminal.
///
/// A posted line stays replaceable until the next post; `update` erases it
/// in place when it is still the last line, so the `"Thinking..."`
/// placeholder disappears under the final text.
pub struct TerminalSink {
    next_id: usize,
    last: Option<usize>,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            last: None,
        }
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageSink for TerminalSink {
    type Handle = usize;

    async fn post(&mut self, text: &str) -> Result<usize> {
        let id = self.next_id;
        self.next_id += 1;

        // Green "Bot"
        println!("\x1b[1;32mBot\x1b[0m: {text}");
        io::stdout().flush()?;

        self.last = Some(id);
        Ok(id)
    }

    async fn update(&mut self, handle: &usize, text: &str) -> Result<()> {
        if self.last == Some(*handle) {
            // Erase the placeholder line and write over it.
            print!("\x1b[1A\x1b[2K");
        }

        println!("\x1b[1;32mBot\x1b[0m: {text}");
        io::stdout().flush()?;

        self.last = None;
        Ok(())
    }
}

/// CLI channel for interactive agent sessions.
pub struct CliChannel<C: LlmClient> {
    handler: ChatHandler<C>,
    session: String,
}

impl<C: LlmClient> CliChannel<C> {
    /// Create a new CLI channel.
    pub fn new(handler: ChatHandler<C>, session: &str) -> Self {
        Self {
            handler,
            session: session.to_string(),
        }
    }

    /// Run a single message to completion.
    pub async fn run_once(&mut self, message: &str) -> Result<()> {
        let mut sink = TerminalSink::new();
        self.handler
            .on_message(&self.session, message, &mut sink)
            .await
    }

    /// Run interactive REPL loop.
    pub async fn run_interactive(&mut self) -> Result<()> {
        let mut sink = TerminalSink::new();
        self.handler
            .on_session_start(&self.session, &mut sink)
            .await?;

        let stdin = io::stdin();
        let mut stdout = io::stdout();

        loop {
            // Blue "You"
            print!("\n\x1b[1;34mYou\x1b[0m: ");
            stdout.flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                // EOF
                break;
            }

            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            if matches!(input.to_lowercase().as_str(), "exit" | "quit" | "q") {
                println!("Goodbye! 👋");
                break;
            }

            self.handler
                .on_message(&self.session, input, &mut sink)
                .await?;
        }

        Ok(())
    }
}
