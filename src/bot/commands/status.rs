use std::collections::HashMap;
use teloxide::prelude::*;
use crate::bot::handlers::{BotContext, HandlerResult};
use crate::bot::keyboards::{self, Screen};
use crate::database::connection::DatabaseManager;
use crate::database::models::{Auditory, StatusEntry, StatusValue};
use crate::services::status::{record_status, StatusError};
use crate::utils::auditory_names::to_display;
use crate::utils::datetime::format_short;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_command_error, log_validation_error};
use crate::utils::markdown::{bold, escape_markdown};
use crate::utils::validation::{parse_status_args, STATUS_USAGE};

/// Current status of every auditory that has at least one report.
pub async fn current_statuses(db: &DatabaseManager) -> Result<HashMap<i64, StatusValue>, sqlx::Error> {
    let latest = StatusEntry::latest_for_all(&db.pool).await?;
    Ok(latest
        .into_iter()
        .filter_map(|entry| entry.status_value().map(|status| (entry.auditory_id, status)))
        .collect())
}

pub async fn auditory_list_screen(db: &DatabaseManager) -> Result<Screen, sqlx::Error> {
    let auditories = Auditory::list_active(&db.pool).await?;
    let current = current_statuses(db).await?;

    let text = if auditories.is_empty() {
        format!("📋 {}\n\n{}", bold("Аудитории"), escape_markdown("Список аудиторий пуст."))
    } else {
        format!(
            "📋 {}\n\n{}",
            bold("Аудитории"),
            escape_markdown("Выберите аудиторию, чтобы посмотреть или изменить статус:")
        )
    };
    Ok(Screen::new(text, keyboards::auditory_list_keyboard(&auditories, &current)))
}

pub fn describe_status(auditory: &Auditory, latest: Option<&StatusEntry>) -> String {
    let mut text = format!("🏫 {}\n\n", bold(auditory.display_name()));
    if let Some(building) = auditory.building.as_deref() {
        text.push_str(&escape_markdown(&format!("Корпус: {building}\n")));
    }

    match latest.and_then(|entry| entry.status_value().map(|status| (entry, status))) {
        Some((entry, status)) => {
            text.push_str(&escape_markdown(&format!(
                "Текущий статус: {} {}\nОбновлено: {}\n",
                status.emoji(),
                status.label(),
                format_short(&entry.created_at)
            )));
            if let Some(comment) = entry.comment.as_deref() {
                text.push_str(&escape_markdown(&format!("📝 {comment}\n")));
            }
        }
        None => text.push_str(&escape_markdown("Статус ещё не сообщался\n")),
    }

    text.push_str(&escape_markdown("\nВыберите новый статус:"));
    text
}

/// `None` when the auditory does not exist or is inactive.
pub async fn auditory_screen(db: &DatabaseManager, auditory_id: i64) -> Result<Option<Screen>, sqlx::Error> {
    let auditory = match Auditory::find_by_id(&db.pool, auditory_id).await? {
        Some(auditory) if auditory.is_active => auditory,
        _ => return Ok(None),
    };
    let latest = StatusEntry::latest_for_auditory(&db.pool, auditory.id).await?;

    Ok(Some(Screen::new(
        describe_status(&auditory, latest.as_ref()),
        keyboards::status_keyboard(auditory.id),
    )))
}

pub fn comment_prompt_screen(auditory: &Auditory, status: StatusValue) -> Screen {
    let text = format!(
        "{} {}\n\n{}",
        status.emoji(),
        bold(&format!("{}: {}", auditory.display_name(), status.label())),
        escape_markdown("Опишите проблему одним сообщением или нажмите «Без комментария». /cancel отменяет ввод.")
    );
    Screen::new(text, keyboards::comment_prompt_keyboard())
}

pub fn status_recorded_text(auditory_name: &str, status: StatusValue, comment: Option<&str>) -> String {
    let mut text = format!(
        "✅ {}\n{}",
        bold("Статус обновлён"),
        escape_markdown(&format!(
            "{}: {} {}",
            to_display(auditory_name),
            status.emoji(),
            status.label()
        ))
    );
    if let Some(comment) = comment {
        text.push_str(&escape_markdown(&format!("\n📝 {comment}")));
    }
    text
}

pub async fn handle_status(bot: Bot, msg: Message, args: String, ctx: &BotContext) -> HandlerResult {
    let feedback = CommandFeedback::for_message(bot, &msg);
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;

    let parsed = match parse_status_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            log_validation_error("status", &args, &e.to_string(), user_id);
            feedback.validation_error(&e.to_string(), STATUS_USAGE).await?;
            return Ok(());
        }
    };

    match record_status(
        &ctx.db,
        ctx.notifier.as_ref(),
        user_id,
        &parsed.auditory,
        &parsed.status,
        parsed.comment.as_deref(),
    )
    .await
    {
        Ok(entry) => {
            let status = entry.status_value().unwrap_or(StatusValue::Green);
            let name = Auditory::find_by_id(&ctx.db.pool, entry.auditory_id)
                .await?
                .map_or(parsed.auditory.clone(), |a| a.name);
            feedback
                .send_markdown(status_recorded_text(&name, status, entry.comment.as_deref()), None)
                .await?;
        }
        Err(e @ StatusError::Database(_)) => {
            log_command_error("status", user_id, msg.chat.id.0, &e.to_string());
            feedback.error(&e.user_message()).await?;
        }
        Err(e) => {
            log_validation_error("status", &args, &e.to_string(), user_id);
            feedback.validation_error(&e.user_message(), STATUS_USAGE).await?;
        }
    }
    Ok(())
}
