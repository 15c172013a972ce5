use std::collections::HashMap;
use chrono::Duration;
use teloxide::prelude::*;
use crate::bot::callback_data::SchedulePeriod;
use crate::bot::commands::status::current_statuses;
use crate::bot::handlers::{BotContext, HandlerResult};
use crate::bot::keyboards::{self, Screen};
use crate::database::connection::DatabaseManager;
use crate::database::models::{CalendarEvent, EventListing, StatusValue};
use crate::utils::auditory_names::to_display;
use crate::utils::datetime::{day_window, format_short, format_time, today};
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_command_error, log_database_error};
use crate::utils::markdown::{bold, escape_markdown};

fn event_line(event: &EventListing, current: &HashMap<i64, StatusValue>, with_date: bool) -> String {
    let when = if with_date {
        format_short(&event.start_time)
    } else {
        format!("{}–{}", format_time(&event.start_time), format_time(&event.end_time))
    };

    let place = match (event.auditory_id, event.auditory_name.as_deref()) {
        (Some(id), Some(name)) => {
            let status = current.get(&id).map_or("⚪", |s| s.emoji());
            let building = event
                .building
                .as_deref()
                .map(|b| format!(", {b}"))
                .unwrap_or_default();
            format!("{} {}{}", status, to_display(name), building)
        }
        _ => "❔ аудитория не указана".to_string(),
    };

    format!("🕐 {} {}\n   📍 {}", when, event.title, place)
}

/// Event listing with each auditory's current status. Multi-day listings
/// carry the date on every line.
pub fn format_schedule(
    title: &str,
    events: &[EventListing],
    current: &HashMap<i64, StatusValue>,
    with_date: bool,
) -> String {
    let mut text = format!("{}\n\n", bold(title));
    if events.is_empty() {
        text.push_str(&escape_markdown("Мероприятий нет."));
        return text;
    }

    let lines: Vec<String> = events
        .iter()
        .map(|event| escape_markdown(&event_line(event, current, with_date)))
        .collect();
    text.push_str(&lines.join("\n\n"));
    text
}

async fn load_period(
    db: &DatabaseManager,
    period: SchedulePeriod,
) -> Result<Vec<EventListing>, sqlx::Error> {
    let (offset, days) = period.window();
    let (from, to) = day_window(today() + Duration::days(offset), days);
    CalendarEvent::confirmed_between(&db.pool, from, to).await
}

pub fn schedule_menu_screen() -> Screen {
    Screen::new(
        format!("📅 {}\n\n{}", bold("Расписание"), escape_markdown("За какой период показать мероприятия?")),
        keyboards::schedule_menu_keyboard(),
    )
}

pub async fn schedule_screen(db: &DatabaseManager, period: SchedulePeriod) -> Result<Screen, sqlx::Error> {
    let events = load_period(db, period).await?;
    let current = current_statuses(db).await?;
    let with_date = period == SchedulePeriod::Week;

    Ok(Screen::new(
        format_schedule(period.title(), &events, &current, with_date),
        keyboards::schedule_result_keyboard(),
    ))
}

pub async fn handle_today(bot: Bot, msg: Message, ctx: &BotContext) -> HandlerResult {
    let feedback = CommandFeedback::for_message(bot, &msg);

    match schedule_screen(&ctx.db, SchedulePeriod::Today).await {
        Ok(screen) => {
            feedback.send_markdown(screen.text, Some(screen.keyboard.into())).await?;
        }
        Err(e) => {
            log_database_error("SELECT", "calendar_events", &e.to_string(), Some("today"));
            let user_id = msg.from().map_or(0, |u| u.id.0 as i64);
            log_command_error("today", user_id, msg.chat.id.0, &e.to_string());
            feedback.error("Не удалось загрузить расписание").await?;
        }
    }
    Ok(())
}
