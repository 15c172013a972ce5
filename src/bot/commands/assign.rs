use teloxide::prelude::*;
use crate::bot::handlers::{BotContext, HandlerResult};
use crate::bot::keyboards::{self, Screen};
use crate::database::connection::DatabaseManager;
use crate::database::models::{CalendarEvent, EventListing, User};
use crate::services::assignment::{list_staff_for_event, list_upcoming_events, AssignOutcome, ASSIGN_WINDOW_DAYS};
use crate::utils::auditory_names::to_display;
use crate::utils::datetime::format_full;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_command_error, log_database_error};
use crate::utils::markdown::{bold, escape_markdown};

pub const NOT_ALLOWED: &str = "Назначать сотрудников могут только инженеры, администраторы и менеджеры";

/// Whether the user holds one of the staff roles.
pub async fn is_staff(db: &DatabaseManager, user_id: i64) -> Result<bool, sqlx::Error> {
    Ok(User::find_by_id(&db.pool, user_id)
        .await?
        .is_some_and(|user| user.is_staff()))
}

pub async fn events_screen(db: &DatabaseManager) -> Result<Screen, sqlx::Error> {
    let events = list_upcoming_events(db, ASSIGN_WINDOW_DAYS).await?;

    let text = if events.is_empty() {
        format!(
            "👥 {}\n\n{}",
            bold("Назначения"),
            escape_markdown("На ближайшие три дня мероприятий нет.")
        )
    } else {
        format!(
            "👥 {}\n\n{}",
            bold("Назначения"),
            escape_markdown("Мероприятия на ближайшие три дня. Выберите мероприятие:")
        )
    };
    Ok(Screen::new(text, keyboards::events_keyboard(&events)))
}

/// Display name and building of the event's auditory.
pub fn event_location(event: &EventListing) -> String {
    match event.auditory_name.as_deref() {
        Some(name) => match event.building.as_deref() {
            Some(building) => format!("{}, {}", to_display(name), building),
            None => to_display(name).to_string(),
        },
        None => "не указана".to_string(),
    }
}

/// `None` when the event does not exist.
pub async fn staff_screen(db: &DatabaseManager, event_id: i64) -> Result<Option<Screen>, sqlx::Error> {
    let Some(event) = CalendarEvent::listing_by_id(&db.pool, event_id).await? else {
        return Ok(None);
    };
    let staff = list_staff_for_event(db, event_id).await?;

    let mut text = format!(
        "📅 {}\n{}\n{}",
        bold(&event.title),
        escape_markdown(&format!("🕐 {}", format_full(&event.start_time))),
        escape_markdown(&format!("🏢 Аудитория: {}", event_location(&event)))
    );
    text.push_str("\n\n");
    if staff.is_empty() {
        text.push_str(&escape_markdown("Сотрудники не найдены."));
    } else {
        text.push_str(&escape_markdown(
            "Выберите сотрудника.\n⏳ ожидает ответа, ✅ подтвердил, ✔️ выполнил.",
        ));
    }

    Ok(Some(Screen::new(text, keyboards::staff_keyboard(event_id, &staff))))
}

pub fn outcome_text(outcome: AssignOutcome) -> &'static str {
    match outcome {
        AssignOutcome::Assigned => "✅ Сотрудник назначен, ему отправлено уведомление",
        AssignOutcome::AlreadyAssigned => "ℹ️ Этот сотрудник уже назначен",
    }
}

pub async fn handle_assign(bot: Bot, msg: Message, ctx: &BotContext) -> HandlerResult {
    let feedback = CommandFeedback::for_message(bot, &msg);
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;

    let allowed = match is_staff(&ctx.db, user_id).await {
        Ok(allowed) => allowed,
        Err(e) => {
            log_database_error("SELECT", "users", &e.to_string(), Some(&user_id.to_string()));
            feedback.error("Не удалось проверить права доступа").await?;
            return Ok(());
        }
    };
    if !allowed {
        feedback.warning(NOT_ALLOWED).await?;
        return Ok(());
    }

    match events_screen(&ctx.db).await {
        Ok(screen) => {
            feedback.send_markdown(screen.text, Some(screen.keyboard.into())).await?;
        }
        Err(e) => {
            log_command_error("assign", user_id, msg.chat.id.0, &e.to_string());
            feedback.error("Не удалось загрузить мероприятия").await?;
        }
    }
    Ok(())
}
