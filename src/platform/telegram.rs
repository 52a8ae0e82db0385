use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup};
use teloxide::update_listeners::Polling;
use tracing::warn;

use crate::commands::CommandRouter;
use crate::error::GatewayError;
use crate::handlers;
use crate::platform::{BotIdentity, Gateway, IncomingMessage};
use crate::replies::{Keyboard, Reply};

impl From<&Keyboard> for KeyboardMarkup {
    fn from(keyboard: &Keyboard) -> Self {
        let rows = keyboard
            .rows
            .iter()
            .map(|row| row.iter().map(|label| KeyboardButton::new(*label)).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let markup = KeyboardMarkup::new(rows);
        if keyboard.resize {
            markup.resize_keyboard()
        } else {
            markup
        }
    }
}

impl From<&Message> for IncomingMessage {
    fn from(msg: &Message) -> Self {
        Self {
            sender_id: msg.from.as_ref().map(|user| user.id.0),
            chat_id: msg.chat.id.0,
            text: msg.text().map(str::to_string),
            date: msg.date,
        }
    }
}

#[async_trait]
impl Gateway for Bot {
    async fn identity(&self) -> Result<BotIdentity, GatewayError> {
        let me = self.get_me().await?;
        Ok(BotIdentity {
            id: me.user.id.0,
            username: me.user.username.clone(),
            first_name: me.user.first_name.clone(),
        })
    }

    async fn probe_updates(&self, timeout: Duration) -> Result<usize, GatewayError> {
        let timeout = u32::try_from(timeout.as_secs()).unwrap_or(u32::MAX);
        let updates = self.get_updates().timeout(timeout).await?;
        Ok(updates.len())
    }

    async fn send_reply(&self, chat_id: i64, reply: &Reply) -> Result<(), GatewayError> {
        let request = self.send_message(ChatId(chat_id), reply.text.clone());
        match &reply.keyboard {
            Some(keyboard) => request.reply_markup(KeyboardMarkup::from(keyboard)).await?,
            None => request.await?,
        };
        Ok(())
    }
}

/// Long-poll until the dispatcher stops. Updates are handled one at a time,
/// in arrival order.
pub async fn poll(bot: Bot, router: Arc<CommandRouter>, poll_timeout: Duration) {
    let handler = Update::filter_message().endpoint(handle_message);

    let listener = Polling::builder(bot.clone())
        .timeout(poll_timeout)
        .build();

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![router])
        .distribution_function(|_| Some(()))
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("telegram polling"),
        )
        .await;
}

async fn handle_message(bot: Bot, msg: Message, router: Arc<CommandRouter>) -> ResponseResult<()> {
    let incoming = IncomingMessage::from(&msg);
    handlers::process_update(&bot, &router, Some(&incoming)).await;
    Ok(())
}
