pub mod telegram;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::GatewayError;
use crate::replies::Reply;

/// A message received from the platform
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Sender's user ID; absent for anonymous senders
    pub sender_id: Option<u64>,
    /// Chat the reply goes to
    pub chat_id: i64,
    /// The message text; absent for stickers, photos and the like
    pub text: Option<String>,
    /// Platform-assigned arrival time
    pub date: DateTime<Utc>,
}

impl IncomingMessage {
    /// Sender ID rendered for logs.
    pub fn sender(&self) -> String {
        self.sender_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// The bot's own account, as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    pub id: u64,
    pub username: Option<String>,
    pub first_name: String,
}

/// The operations the bot needs from the messaging platform.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Who am I (`getMe`).
    async fn identity(&self) -> Result<BotIdentity, GatewayError>;

    /// Fetch pending updates once with a short timeout, without consuming them.
    /// Returns how many were pending.
    async fn probe_updates(&self, timeout: Duration) -> Result<usize, GatewayError>;

    /// Send a text reply, with its keyboard if it has one.
    async fn send_reply(&self, chat_id: i64, reply: &Reply) -> Result<(), GatewayError>;
}
