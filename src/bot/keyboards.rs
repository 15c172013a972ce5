use std::collections::HashMap;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};
use crate::bot::callback_data::{CallbackAction, SchedulePeriod};
use crate::database::models::{AssignmentStatus, Auditory, EventListing, StaffMember, StatusValue};
use crate::utils::auditory_names::to_display;
use crate::utils::datetime::format_short;

pub const MENU_AUDITORIES: &str = "📋 Аудитории";
pub const MENU_SCHEDULE: &str = "📅 Расписание";
pub const MENU_ASSIGNMENTS: &str = "👥 Назначения";
pub const MENU_HELP: &str = "❓ Помощь";

/// A rendered screen: MarkdownV2 text plus its inline keyboard.
#[derive(Debug, Clone)]
pub struct Screen {
    pub text: String,
    pub keyboard: InlineKeyboardMarkup,
}

impl Screen {
    pub fn new(text: String, keyboard: InlineKeyboardMarkup) -> Self {
        Self { text, keyboard }
    }
}

/// Buttons of the persistent reply keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuButton {
    Auditories,
    Schedule,
    Assignments,
    Help,
}

impl MenuButton {
    pub fn from_text(text: &str) -> Option<Self> {
        match text.trim() {
            MENU_AUDITORIES => Some(MenuButton::Auditories),
            MENU_SCHEDULE => Some(MenuButton::Schedule),
            MENU_ASSIGNMENTS => Some(MenuButton::Assignments),
            MENU_HELP => Some(MenuButton::Help),
            _ => None,
        }
    }
}

fn button(text: impl Into<String>, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, action.to_string())
}

fn back_to_main() -> InlineKeyboardButton {
    button("🏠 Главное меню", CallbackAction::MainMenu)
}

pub fn persistent_menu() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![KeyboardButton::new(MENU_AUDITORIES), KeyboardButton::new(MENU_SCHEDULE)],
        vec![KeyboardButton::new(MENU_ASSIGNMENTS), KeyboardButton::new(MENU_HELP)],
    ])
    .resize_keyboard(true)
}

pub fn first_start_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button("🚀 Начать работу", CallbackAction::FirstStart)]])
}

pub fn main_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            button(MENU_AUDITORIES, CallbackAction::ListAuditories),
            button(MENU_SCHEDULE, CallbackAction::ScheduleMenu),
        ],
        vec![
            button(MENU_ASSIGNMENTS, CallbackAction::AssignList),
            button(MENU_HELP, CallbackAction::Help),
        ],
    ])
}

pub fn back_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![back_to_main()]])
}

/// Two auditories per row, each prefixed with its current status emoji
/// (⚪ when nothing was reported yet).
pub fn auditory_list_keyboard(
    auditories: &[Auditory],
    current: &HashMap<i64, StatusValue>,
) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = auditories
        .chunks(2)
        .map(|pair| {
            pair.iter()
                .map(|auditory| {
                    let emoji = current.get(&auditory.id).map_or("⚪", |s| s.emoji());
                    button(
                        format!("{} {}", emoji, auditory.display_name()),
                        CallbackAction::Auditory(auditory.id),
                    )
                })
                .collect()
        })
        .collect();
    rows.push(vec![back_to_main()]);
    InlineKeyboardMarkup::new(rows)
}

pub fn status_keyboard(auditory_id: i64) -> InlineKeyboardMarkup {
    let status_row = StatusValue::ALL
        .iter()
        .map(|status| {
            button(
                format!("{} {}", status.emoji(), status.label()),
                CallbackAction::SetStatus(auditory_id, *status),
            )
        })
        .collect();
    InlineKeyboardMarkup::new(vec![
        status_row,
        vec![button("⬅️ К списку", CallbackAction::ListAuditories)],
    ])
}

pub fn comment_prompt_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button("➡️ Без комментария", CallbackAction::SkipComment)],
        vec![button("⬅️ К списку", CallbackAction::ListAuditories)],
    ])
}

pub fn after_status_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button("📋 К списку аудиторий", CallbackAction::ListAuditories)],
        vec![back_to_main()],
    ])
}

pub fn schedule_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            button(SchedulePeriod::Today.title(), CallbackAction::Schedule(SchedulePeriod::Today)),
            button(SchedulePeriod::Tomorrow.title(), CallbackAction::Schedule(SchedulePeriod::Tomorrow)),
        ],
        vec![button(SchedulePeriod::Week.title(), CallbackAction::Schedule(SchedulePeriod::Week))],
        vec![back_to_main()],
    ])
}

pub fn schedule_result_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button("⬅️ Расписание", CallbackAction::ScheduleMenu)],
        vec![back_to_main()],
    ])
}

/// One button per event for the assignment menu.
pub fn events_keyboard(events: &[EventListing]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = events
        .iter()
        .map(|event| {
            let place = event
                .auditory_name
                .as_deref()
                .map(|name| format!(" · {}", to_display(name)))
                .unwrap_or_default();
            vec![button(
                format!("{} {}{}", format_short(&event.start_time), event.title, place),
                CallbackAction::AssignEvent(event.id),
            )]
        })
        .collect();
    rows.push(vec![back_to_main()]);
    InlineKeyboardMarkup::new(rows)
}

fn assignment_marker(status: Option<AssignmentStatus>) -> &'static str {
    match status {
        Some(AssignmentStatus::Accepted) => "✅",
        Some(AssignmentStatus::Done) => "✔️",
        Some(AssignmentStatus::Assigned) => "⏳",
        None => "👤",
    }
}

pub fn staff_keyboard(event_id: i64, staff: &[StaffMember]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = staff
        .iter()
        .map(|member| {
            vec![button(
                format!("{} {}", assignment_marker(member.assignment()), member.full_name),
                CallbackAction::AssignTo {
                    event_id,
                    user_id: member.telegram_id,
                },
            )]
        })
        .collect();
    rows.push(vec![button("⬅️ К мероприятиям", CallbackAction::AssignList)]);
    InlineKeyboardMarkup::new(rows)
}
