use teloxide::dispatching::dialogue::InMemStorageError;
use teloxide::prelude::*;
use teloxide::types::ChatKind;
use crate::bot::commands::{assign, start, status, today};
use crate::bot::handlers::{BotContext, HandlerResult};
use crate::bot::keyboards::{self, MenuButton};
use crate::bot::session::{PendingInput, SessionStore};
use crate::database::models::Auditory;
use crate::services::status::{record_status, StatusError};
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_command_error, log_command_start, log_validation_error};
use crate::utils::validation::validate_comment;

/// Where a plain-text message goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRoute {
    /// Slash-prefixed text the command parser did not recognise.
    UnknownCommand,
    Menu(MenuButton),
    Comment(PendingInput),
    Stray,
}

/// Commands and menu buttons win over a pending comment request.
pub fn route_text(text: &str, pending: Option<PendingInput>) -> TextRoute {
    if text.starts_with('/') {
        return TextRoute::UnknownCommand;
    }
    if let Some(button) = MenuButton::from_text(text) {
        return TextRoute::Menu(button);
    }
    match pending {
        Some(pending) => TextRoute::Comment(pending),
        None => TextRoute::Stray,
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum CommentStep {
    Record { pending: PendingInput, comment: String },
    /// The comment was rejected; the request stays pending.
    Retry(String),
}

/// Consumes the pending request only when the comment is usable.
pub async fn accept_comment(
    sessions: &SessionStore,
    user_id: i64,
    pending: PendingInput,
    text: &str,
) -> Result<CommentStep, InMemStorageError> {
    match validate_comment(text) {
        Ok(comment) => {
            let pending = sessions.take(user_id).await?.unwrap_or(pending);
            Ok(CommentStep::Record { pending, comment })
        }
        Err(e) => {
            sessions.begin(user_id, pending).await?;
            Ok(CommentStep::Retry(e.to_string()))
        }
    }
}

/// Plain text: menu buttons, pending comments, and hints for stray input.
pub async fn handle_general_message(bot: Bot, msg: Message, ctx: BotContext) -> HandlerResult {
    let feedback = CommandFeedback::for_message(bot, &msg);
    let (Some(user), Some(text)) = (msg.from(), msg.text()) else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;

    match route_text(text, ctx.sessions.peek(user_id).await?) {
        TextRoute::UnknownCommand => {
            let command = text.split_whitespace().next().unwrap_or(text);
            feedback
                .validation_error(
                    &format!("Неизвестная команда: {command}"),
                    "Список команд: /help",
                )
                .await?;
        }
        TextRoute::Menu(button) => {
            log_command_start("menu", &user.full_name(), user_id, msg.chat.id.0, Some(text));
            ctx.touch_user(user).await;
            ctx.sessions.cancel(user_id).await?;
            handle_menu_button(&feedback, &ctx, user_id, button).await?;
        }
        TextRoute::Comment(pending) => {
            ctx.touch_user(user).await;
            match accept_comment(&ctx.sessions, user_id, pending, text).await? {
                CommentStep::Record { pending, comment } => {
                    record_comment(&feedback, &ctx, user_id, msg.chat.id.0, pending, &comment).await?;
                }
                CommentStep::Retry(error) => {
                    log_validation_error("comment", text, &error, user_id);
                    feedback
                        .validation_error(&error, "Отправьте комментарий ещё раз или /cancel")
                        .await?;
                }
            }
        }
        // Stay quiet in groups; in private chats point at the menu.
        TextRoute::Stray => {
            if matches!(msg.chat.kind, ChatKind::Private(_)) {
                feedback
                    .info("Воспользуйтесь меню внизу экрана или командой /help")
                    .await?;
            }
        }
    }
    Ok(())
}

async fn record_comment(
    feedback: &CommandFeedback,
    ctx: &BotContext,
    user_id: i64,
    chat_id: i64,
    pending: PendingInput,
    comment: &str,
) -> HandlerResult {
    let Some(auditory) = Auditory::find_by_id(&ctx.db.pool, pending.auditory_id).await? else {
        feedback.error("Аудитория больше не доступна").await?;
        return Ok(());
    };

    match record_status(
        &ctx.db,
        ctx.notifier.as_ref(),
        user_id,
        &auditory.name,
        pending.status.as_str(),
        Some(comment),
    )
    .await
    {
        Ok(_) => {
            feedback
                .send_markdown(
                    status::status_recorded_text(&auditory.name, pending.status, Some(comment)),
                    Some(keyboards::after_status_keyboard().into()),
                )
                .await?;
        }
        Err(e @ StatusError::Database(_)) => {
            log_command_error("comment", user_id, chat_id, &e.to_string());
            feedback.error(&e.user_message()).await?;
        }
        Err(e) => {
            feedback.error(&e.user_message()).await?;
        }
    }
    Ok(())
}

async fn handle_menu_button(
    feedback: &CommandFeedback,
    ctx: &BotContext,
    user_id: i64,
    button: MenuButton,
) -> HandlerResult {
    let screen = match button {
        MenuButton::Auditories => status::auditory_list_screen(&ctx.db).await?,
        MenuButton::Schedule => today::schedule_menu_screen(),
        MenuButton::Assignments => {
            if !assign::is_staff(&ctx.db, user_id).await? {
                feedback.warning(assign::NOT_ALLOWED).await?;
                return Ok(());
            }
            assign::events_screen(&ctx.db).await?
        }
        MenuButton::Help => start::help_screen(),
    };
    feedback.send_markdown(screen.text, Some(screen.keyboard.into())).await?;
    Ok(())
}
