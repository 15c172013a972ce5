//! Best-effort outbound messages.
//!
//! Delivery may silently fail: callers log the error and carry on, and the
//! primary action (a recorded status, a created assignment) is never rolled
//! back because of it. Nothing is retried.

use anyhow::Result;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::InlineKeyboardMarkup;
use crate::utils::logging::log_notification_error;

/// Group chat (and optional forum topic) that receives status broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastTarget {
    pub chat_id: i64,
    pub topic_id: Option<i32>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Posts to the broadcast group. Returns `Ok(false)` when no group is
    /// configured.
    async fn broadcast(&self, text: &str) -> Result<bool>;

    /// Sends a private message with inline buttons.
    async fn direct(&self, user_id: i64, text: &str, keyboard: InlineKeyboardMarkup) -> Result<()>;
}

pub struct TelegramNotifier {
    bot: Bot,
    target: Option<BroadcastTarget>,
}

impl TelegramNotifier {
    pub fn new(bot: Bot, target: Option<BroadcastTarget>) -> Self {
        Self { bot, target }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn broadcast(&self, text: &str) -> Result<bool> {
        let Some(target) = self.target else {
            tracing::debug!("No broadcast group configured, skipping notification");
            return Ok(false);
        };

        let mut request = self.bot.send_message(ChatId(target.chat_id), text);
        if let Some(topic_id) = target.topic_id {
            request = request.message_thread_id(topic_id);
        }
        request.await?;
        Ok(true)
    }

    async fn direct(&self, user_id: i64, text: &str, keyboard: InlineKeyboardMarkup) -> Result<()> {
        self.bot
            .send_message(ChatId(user_id), text)
            .reply_markup(keyboard)
            .await?;
        Ok(())
    }
}

/// Broadcasts and logs failures. Returns whether a message went out.
pub async fn broadcast_best_effort(notifier: &dyn Notifier, text: &str) -> bool {
    match notifier.broadcast(text).await {
        Ok(sent) => sent,
        Err(e) => {
            log_notification_error("broadcast group", &e.to_string());
            false
        }
    }
}

/// Sends a direct message and logs failures. Returns whether it went out.
pub async fn direct_best_effort(
    notifier: &dyn Notifier,
    user_id: i64,
    text: &str,
    keyboard: InlineKeyboardMarkup,
) -> bool {
    match notifier.direct(user_id, text, keyboard).await {
        Ok(()) => true,
        Err(e) => {
            log_notification_error(&format!("user {user_id}"), &e.to_string());
            false
        }
    }
}
