pub mod callback;
pub mod general_message;
pub mod message;

use std::sync::Arc;
use teloxide::{
    dispatching::UpdateHandler,
    prelude::*,
    types::{ChatMemberKind, ChatMemberUpdated},
};
use crate::bot::commands::{start, Command};
use crate::bot::session::SessionStore;
use crate::database::connection::DatabaseManager;
use crate::database::models::User;
use crate::services::notifier::Notifier;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_database_error, log_system_event};

pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type HandlerResult = Result<(), HandlerError>;

/// Everything a handler needs, cloned into each endpoint.
#[derive(Clone)]
pub struct BotContext {
    pub db: Arc<DatabaseManager>,
    pub sessions: SessionStore,
    pub notifier: Arc<dyn Notifier>,
}

impl BotContext {
    /// Records the user's latest name and activity time. Failures are logged
    /// and never block the interaction.
    pub async fn touch_user(&self, user: &teloxide::types::User) {
        if let Err(e) = User::upsert(
            &self.db.pool,
            user.id.0 as i64,
            &user.full_name(),
            user.username.as_deref(),
        )
        .await
        {
            log_database_error("UPSERT", "users", &e.to_string(), Some(&user.id.0.to_string()));
        }
    }
}

pub struct BotHandler {
    pub ctx: BotContext,
}

impl BotHandler {
    pub fn new(ctx: BotContext) -> Self {
        Self { ctx }
    }

    pub fn schema(&self) -> UpdateHandler<HandlerError> {
        use teloxide::dispatching::UpdateFilterExt;

        let ctx_command = self.ctx.clone();
        let ctx_text = self.ctx.clone();
        let ctx_callback = self.ctx.clone();

        dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let ctx = ctx_command.clone();
                        async move { message::command_handler(bot, msg, cmd, ctx).await }
                    }),
            )
            .branch(Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
                let ctx = ctx_text.clone();
                async move { general_message::handle_general_message(bot, msg, ctx).await }
            }))
            .branch(Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
                let ctx = ctx_callback.clone();
                async move { callback::callback_handler(bot, q, ctx).await }
            }))
            .branch(Update::filter_my_chat_member().endpoint(membership_handler))
    }
}

/// The bot became a plain member of the chat and should post its menu.
pub fn greets_on_join(kind: &ChatMemberKind) -> bool {
    matches!(kind, ChatMemberKind::Member)
}

async fn membership_handler(bot: Bot, update: ChatMemberUpdated) -> HandlerResult {
    log_system_event(
        "Bot membership changed",
        Some(&format!(
            "chat {} ({}): {:?}",
            update.chat.id,
            update.chat.title().unwrap_or("private"),
            update.new_chat_member.kind
        )),
    );

    if greets_on_join(&update.new_chat_member.kind) {
        start::send_main_menu(&CommandFeedback::for_chat(bot, update.chat.id)).await?;
    }
    Ok(())
}
