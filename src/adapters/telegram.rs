//! Telegram adapter using teloxide

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{MediaKind, MessageId, MessageKind};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use super::Channel;
use crate::agent::{InboundMessage, LlmClient};
use crate::config::Config;
use crate::handler::{ChatHandler, MessageSink};
use crate::Result;

/// Sink posting into one Telegram chat.
///
/// The placeholder contract maps directly onto the Bot API: `post` is
/// `sendMessage`, `update` is `editMessageText` on the returned id.
pub struct TelegramSink {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramSink {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl MessageSink for TelegramSink {
    type Handle = MessageId;

    async fn post(&mut self, text: &str) -> Result<MessageId> {
        let message = self.bot.send_message(self.chat_id, text).await?;
        Ok(message.id)
    }

    async fn update(&mut self, handle: &MessageId, text: &str) -> Result<()> {
        self.bot
            .edit_message_text(self.chat_id, *handle, text)
            .await?;
        Ok(())
    }
}

/// Telegram channel adapter
pub struct TelegramChannel<C: LlmClient + Clone + 'static> {
    bot: Bot,
    config: Config,
    client: C,
    // One conversation handler per chat, behind its own lock: events within
    // a chat are handled one at a time in arrival order, while distinct
    // chats proceed concurrently.
    handlers: Arc<Mutex<HashMap<ChatId, Arc<Mutex<ChatHandler<C>>>>>>,
}

impl<C: LlmClient + Clone + 'static> TelegramChannel<C> {
    pub fn new(config: Config, client: C) -> Self {
        let bot = Bot::new(&config.telegram.token);
        Self {
            bot,
            config,
            client,
            handlers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    async fn handler_for(&self, chat_id: ChatId) -> Arc<Mutex<ChatHandler<C>>> {
        let mut handlers = self.handlers.lock().await;
        handlers
            .entry(chat_id)
            .or_insert_with(|| {
                Arc::new(Mutex::new(ChatHandler::new(
                    self.client.clone(),
                    &self.config.model,
                )))
            })
            .clone()
    }

    async fn handle_message(&self, message: teloxide::types::Message) -> Result<()> {
        let chat_id = message.chat.id;
        let user = message.from();

        // Authorization check
        if !self.is_allowed(user) {
            debug!("Ignoring message from unauthorized user: {:?}", user);
            return Ok(());
        }

        let text = match message.kind {
            MessageKind::Common(ref common) => match &common.media_kind {
                MediaKind::Text(media) => &media.text,
                _ => return Ok(()), // Ignore non-text messages
            },
            _ => return Ok(()),
        };

        let inbound = InboundMessage::new("telegram", &chat_id.to_string(), text);
        info!("Received message from {}: {}", chat_id, text);

        let handler = self.handler_for(chat_id).await;
        let mut handler = handler.lock().await;
        let mut sink = TelegramSink::new(self.bot.clone(), chat_id);

        if text == "/start" {
            handler
                .on_session_start(&inbound.session_key(), &mut sink)
                .await
        } else {
            handler
                .on_message(&inbound.session_key(), text, &mut sink)
                .await
        }
    }

    fn is_allowed(&self, user: Option<&teloxide::types::User>) -> bool {
        if self.config.telegram.allow_from.is_empty() {
            return true; // Empty allow list means open (dev mode)
        }

        let Some(user) = user else { return false };
        let username = user.username.as_deref().unwrap_or("");
        let id = user.id.to_string();

        self.config
            .telegram
            .allow_from
            .iter()
            .any(|allowed| allowed == username || allowed == &id)
    }
}

// Helper to wrap the event loop
async fn run_telegram_loop<C: LlmClient + Clone + 'static>(channel: Arc<TelegramChannel<C>>) {
    let handler = Update::filter_message().endpoint(
        move |_bot: Bot, msg: teloxide::types::Message, channel: Arc<TelegramChannel<C>>| async move {
            if let Err(e) = channel.handle_message(msg).await {
                error!("Error handling telegram message: {}", e);
            }
            respond(())
        },
    );

    Dispatcher::builder(channel.bot.clone(), handler)
        .dependencies(dptree::deps![channel])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

impl<C: LlmClient + Clone + 'static> Channel for TelegramChannel<C> {
    fn name(&self) -> &str {
        "telegram"
    }

    fn start(&self) -> impl std::future::Future<Output = crate::Result<()>> + Send {
        let this = Arc::new(Self {
            bot: self.bot.clone(),
            config: self.config.clone(),
            client: self.client.clone(),
            handlers: self.handlers.clone(),
        });

        async move {
            info!("Starting Telegram bot...");
            run_telegram_loop(this).await;
            Ok(())
        }
    }

    fn stop(&self) -> impl std::future::Future<Output = crate::Result<()>> + Send {
        async {
            // The teloxide dispatcher handles Ctrl+C itself
            Ok(())
        }
    }
}
