use teloxide::prelude::*;
use teloxide::types::{ParseMode, ReplyMarkup};
use crate::utils::markdown::escape_markdown;

/// Feedback types for different command outcomes
#[derive(Debug, Clone, Copy)]
pub enum FeedbackType {
    Success,
    Warning,
    Error,
    Info,
}

impl FeedbackType {
    fn emoji(self) -> &'static str {
        match self {
            FeedbackType::Success => "✅",
            FeedbackType::Warning => "⚠️",
            FeedbackType::Error => "❌",
            FeedbackType::Info => "ℹ️",
        }
    }

    /// Formats a plain message as escaped MarkdownV2 with the type's emoji.
    pub fn format(self, message: &str) -> String {
        format!("{} {}", self.emoji(), escape_markdown(message))
    }
}

/// Replies into the chat (and forum topic, if any) a command came from.
pub struct CommandFeedback {
    bot: Bot,
    chat_id: ChatId,
    thread_id: Option<i32>,
}

impl CommandFeedback {
    /// Feedback bound to the chat and topic of an incoming message.
    pub fn for_message(bot: Bot, msg: &Message) -> Self {
        Self {
            bot,
            chat_id: msg.chat.id,
            thread_id: msg.thread_id,
        }
    }

    /// Feedback for a chat with no originating message, e.g. a group the
    /// bot was just added to.
    pub fn for_chat(bot: Bot, chat_id: ChatId) -> Self {
        Self {
            bot,
            chat_id,
            thread_id: None,
        }
    }

    /// Sends already-escaped MarkdownV2 text with an optional keyboard.
    pub async fn send_markdown(
        &self,
        text: String,
        keyboard: Option<ReplyMarkup>,
    ) -> ResponseResult<Message> {
        let mut request = self
            .bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::MarkdownV2);
        if let Some(thread_id) = self.thread_id {
            request = request.message_thread_id(thread_id);
        }
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(keyboard);
        }
        request.await
    }

    pub async fn send(&self, feedback_type: FeedbackType, message: &str) -> ResponseResult<Message> {
        self.send_markdown(feedback_type.format(message), None).await
    }

    pub async fn success(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Success, message).await
    }

    pub async fn error(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Error, message).await
    }

    pub async fn warning(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Warning, message).await
    }

    pub async fn info(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Info, message).await
    }

    /// Send validation error with a usage hint
    pub async fn validation_error(&self, error: &str, suggestion: &str) -> ResponseResult<Message> {
        let text = format!(
            "{}\n\n💡 {}",
            FeedbackType::Error.format(error),
            escape_markdown(suggestion)
        );
        self.send_markdown(text, None).await
    }
}
