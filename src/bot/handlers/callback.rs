use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::{ApiError, RequestError};
use crate::bot::callback_data::CallbackAction;
use crate::bot::commands::{assign, start, status, today};
use crate::bot::handlers::{BotContext, HandlerError, HandlerResult};
use crate::bot::keyboards::{self, Screen};
use crate::bot::session::PendingInput;
use crate::database::models::{Auditory, StatusValue};
use crate::services::assignment::{self, Decision};
use crate::services::status::{record_status, StatusError};
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_command_error, log_command_start};
use crate::utils::markdown::escape_markdown;

/// Short popup text shown in the callback answer.
type Toast = Option<String>;

/// Only the status buttons and "skip" act on a pending comment request;
/// every other press abandons it.
pub fn keeps_pending(action: &CallbackAction) -> bool {
    matches!(action, CallbackAction::SetStatus(..) | CallbackAction::SkipComment)
}

/// What a status button does next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusStep {
    RecordNow(PendingInput),
    AskComment(PendingInput),
}

pub fn status_step(auditory_id: i64, value: StatusValue) -> StatusStep {
    let pending = PendingInput { auditory_id, status: value };
    if value.wants_comment() {
        StatusStep::AskComment(pending)
    } else {
        StatusStep::RecordNow(pending)
    }
}

pub async fn callback_handler(bot: Bot, q: CallbackQuery, ctx: BotContext) -> HandlerResult {
    let user_id = q.from.id.0 as i64;
    let username = q.from.username.clone().unwrap_or_else(|| q.from.full_name());
    let chat_id = q.message.as_ref().map_or(0, |m| m.chat.id.0);
    let data = q.data.clone().unwrap_or_default();

    log_command_start("callback", &username, user_id, chat_id, Some(&data));
    ctx.touch_user(&q.from).await;

    let toast = match CallbackAction::decode(&data) {
        Some(action) => match handle_action(&bot, &q, &ctx, action).await {
            Ok(toast) => toast,
            Err(e) => {
                log_command_error("callback", user_id, chat_id, &e.to_string());
                Some("❌ Произошла ошибка, попробуйте ещё раз".to_string())
            }
        },
        None => {
            tracing::warn!("Unknown callback data '{}' from user {}", data, user_id);
            Some("❓ Неизвестное действие".to_string())
        }
    };

    let mut answer = bot.answer_callback_query(q.id.clone());
    if let Some(text) = toast {
        answer = answer.text(text);
    }
    answer.await?;
    Ok(())
}

async fn handle_action(
    bot: &Bot,
    q: &CallbackQuery,
    ctx: &BotContext,
    action: CallbackAction,
) -> Result<Toast, HandlerError> {
    let user_id = q.from.id.0 as i64;

    if !keeps_pending(&action) {
        ctx.sessions.cancel(user_id).await?;
    }

    match action {
        CallbackAction::FirstStart => {
            if let Some(message) = q.message.as_ref() {
                let feedback = CommandFeedback::for_message(bot.clone(), message);
                start::send_main_menu(&feedback).await?;
            }
            Ok(None)
        }
        CallbackAction::MainMenu => show(bot, q, start::main_menu_screen()).await.map(|_| None),
        CallbackAction::Help => show(bot, q, start::help_screen()).await.map(|_| None),
        CallbackAction::ListAuditories => {
            let screen = status::auditory_list_screen(&ctx.db).await?;
            show(bot, q, screen).await?;
            Ok(None)
        }
        CallbackAction::Auditory(auditory_id) => match status::auditory_screen(&ctx.db, auditory_id).await? {
            Some(screen) => {
                show(bot, q, screen).await?;
                Ok(None)
            }
            None => Ok(Some("Аудитория не найдена".to_string())),
        },
        CallbackAction::SetStatus(auditory_id, value) => set_status(bot, q, ctx, auditory_id, value).await,
        CallbackAction::SkipComment => match ctx.sessions.take(user_id).await? {
            Some(pending) => finish_status(bot, q, ctx, pending).await,
            None => Ok(Some("Нет ожидающего статуса".to_string())),
        },
        CallbackAction::ScheduleMenu => show(bot, q, today::schedule_menu_screen()).await.map(|_| None),
        CallbackAction::Schedule(period) => {
            let screen = today::schedule_screen(&ctx.db, period).await?;
            show(bot, q, screen).await?;
            Ok(None)
        }
        CallbackAction::AssignList => {
            if !assign::is_staff(&ctx.db, user_id).await? {
                return Ok(Some(assign::NOT_ALLOWED.to_string()));
            }
            let screen = assign::events_screen(&ctx.db).await?;
            show(bot, q, screen).await?;
            Ok(None)
        }
        CallbackAction::AssignEvent(event_id) => {
            if !assign::is_staff(&ctx.db, user_id).await? {
                return Ok(Some(assign::NOT_ALLOWED.to_string()));
            }
            match assign::staff_screen(&ctx.db, event_id).await? {
                Some(screen) => {
                    show(bot, q, screen).await?;
                    Ok(None)
                }
                None => Ok(Some("Мероприятие не найдено".to_string())),
            }
        }
        CallbackAction::AssignTo { event_id, user_id: assignee_id } => {
            if !assign::is_staff(&ctx.db, user_id).await? {
                return Ok(Some(assign::NOT_ALLOWED.to_string()));
            }
            let outcome =
                assignment::assign(&ctx.db, ctx.notifier.as_ref(), user_id, event_id, assignee_id).await?;
            if let Some(screen) = assign::staff_screen(&ctx.db, event_id).await? {
                show(bot, q, screen).await?;
            }
            Ok(Some(assign::outcome_text(outcome).to_string()))
        }
        CallbackAction::Accept(event_id) => respond(bot, q, ctx, event_id, Decision::Accept).await,
        CallbackAction::Decline(event_id) => respond(bot, q, ctx, event_id, Decision::Decline).await,
    }
}

/// Green is recorded right away; other statuses wait for a comment.
async fn set_status(
    bot: &Bot,
    q: &CallbackQuery,
    ctx: &BotContext,
    auditory_id: i64,
    value: StatusValue,
) -> Result<Toast, HandlerError> {
    let user_id = q.from.id.0 as i64;
    let pending = match status_step(auditory_id, value) {
        StatusStep::RecordNow(pending) => {
            ctx.sessions.cancel(user_id).await?;
            return finish_status(bot, q, ctx, pending).await;
        }
        StatusStep::AskComment(pending) => pending,
    };

    let Some(auditory) = Auditory::find_by_id(&ctx.db.pool, auditory_id).await? else {
        return Ok(Some("Аудитория не найдена".to_string()));
    };
    ctx.sessions.begin(user_id, pending).await?;
    show(bot, q, status::comment_prompt_screen(&auditory, value)).await?;
    Ok(None)
}

/// Records a status without a comment.
async fn finish_status(
    bot: &Bot,
    q: &CallbackQuery,
    ctx: &BotContext,
    pending: PendingInput,
) -> Result<Toast, HandlerError> {
    let Some(auditory) = Auditory::find_by_id(&ctx.db.pool, pending.auditory_id).await? else {
        return Ok(Some("Аудитория не найдена".to_string()));
    };

    match record_status(
        &ctx.db,
        ctx.notifier.as_ref(),
        q.from.id.0 as i64,
        &auditory.name,
        pending.status.as_str(),
        None,
    )
    .await
    {
        Ok(_) => {
            let text = status::status_recorded_text(&auditory.name, pending.status, None);
            show(bot, q, Screen::new(text, keyboards::after_status_keyboard())).await?;
            Ok(Some(format!("{} Статус сохранён", pending.status.emoji())))
        }
        Err(e @ StatusError::Database(_)) => {
            tracing::error!("Failed to record status from button: {}", e);
            Ok(Some(e.user_message()))
        }
        Err(e) => Ok(Some(e.user_message())),
    }
}

async fn respond(
    bot: &Bot,
    q: &CallbackQuery,
    ctx: &BotContext,
    event_id: i64,
    decision: Decision,
) -> Result<Toast, HandlerError> {
    let found = assignment::respond(&ctx.db, q.from.id.0 as i64, event_id, decision).await?;
    if !found {
        return Ok(Some("Назначение не найдено".to_string()));
    }

    let text = match decision {
        Decision::Accept => "✅ Вы подтвердили участие в мероприятии",
        Decision::Decline => "❌ Вы отказались от мероприятия",
    };
    show(bot, q, Screen::new(escape_markdown(text), keyboards::back_keyboard())).await?;
    Ok(None)
}

/// Replaces the callback's message with the screen, or sends a new message
/// when the original can no longer be edited.
async fn show(bot: &Bot, q: &CallbackQuery, screen: Screen) -> HandlerResult {
    let Some(message) = q.message.as_ref() else {
        return Ok(());
    };

    let edited = bot
        .edit_message_text(message.chat.id, message.id, screen.text.clone())
        .parse_mode(ParseMode::MarkdownV2)
        .reply_markup(screen.keyboard.clone())
        .await;

    match edited {
        Ok(_) | Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
        Err(e) => {
            tracing::debug!("Editing message {} failed ({}), sending a new one", message.id.0, e);
            let mut request = bot
                .send_message(message.chat.id, screen.text)
                .parse_mode(ParseMode::MarkdownV2)
                .reply_markup(screen.keyboard);
            if let Some(thread_id) = message.thread_id {
                request = request.message_thread_id(thread_id);
            }
            request.await?;
            Ok(())
        }
    }
}
