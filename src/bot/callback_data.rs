//! Inline button payloads.
//!
//! Tokens are decoded once at the dispatch boundary into [`CallbackAction`]
//! and matched exhaustively afterwards. Wire format keeps short prefixes to
//! stay within Telegram's 64-byte callback limit.

use std::fmt;
use crate::database::models::StatusValue;

/// Period offered by the schedule menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulePeriod {
    Today,
    Tomorrow,
    Week,
}

impl SchedulePeriod {
    /// `(offset from today in days, number of days)`.
    pub fn window(self) -> (i64, i64) {
        match self {
            SchedulePeriod::Today => (0, 1),
            SchedulePeriod::Tomorrow => (1, 1),
            SchedulePeriod::Week => (0, 7),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SchedulePeriod::Today => "📅 Сегодня",
            SchedulePeriod::Tomorrow => "📆 Завтра",
            SchedulePeriod::Week => "📅 Неделя",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    FirstStart,
    MainMenu,
    Help,
    ListAuditories,
    Auditory(i64),
    SetStatus(i64, StatusValue),
    SkipComment,
    ScheduleMenu,
    Schedule(SchedulePeriod),
    AssignList,
    AssignEvent(i64),
    AssignTo { event_id: i64, user_id: i64 },
    Accept(i64),
    Decline(i64),
}

impl CallbackAction {
    /// Returns `None` for tokens this bot never issued.
    pub fn decode(data: &str) -> Option<Self> {
        let action = match data {
            "first_start" => CallbackAction::FirstStart,
            "back_to_main" => CallbackAction::MainMenu,
            "help" => CallbackAction::Help,
            "list_auditories" => CallbackAction::ListAuditories,
            "skip_comment" => CallbackAction::SkipComment,
            "schedule_menu" => CallbackAction::ScheduleMenu,
            "today_schedule" => CallbackAction::Schedule(SchedulePeriod::Today),
            "tomorrow_schedule" => CallbackAction::Schedule(SchedulePeriod::Tomorrow),
            "week_schedule" => CallbackAction::Schedule(SchedulePeriod::Week),
            "assign_list" => CallbackAction::AssignList,
            _ => return Self::decode_with_payload(data),
        };
        Some(action)
    }

    fn decode_with_payload(data: &str) -> Option<Self> {
        if let Some(rest) = data.strip_prefix("assign_event_") {
            return rest.parse().ok().map(CallbackAction::AssignEvent);
        }
        if let Some(rest) = data.strip_prefix("assign_to_") {
            let (event_id, user_id) = rest.split_once('_')?;
            return Some(CallbackAction::AssignTo {
                event_id: event_id.parse().ok()?,
                user_id: user_id.parse().ok()?,
            });
        }
        if let Some(rest) = data.strip_prefix("aud_") {
            return rest.parse().ok().map(CallbackAction::Auditory);
        }
        if let Some(rest) = data.strip_prefix("set_") {
            let (auditory_id, status) = rest.split_once('_')?;
            return Some(CallbackAction::SetStatus(
                auditory_id.parse().ok()?,
                status.parse().ok()?,
            ));
        }
        if let Some(rest) = data.strip_prefix("accept_") {
            return rest.parse().ok().map(CallbackAction::Accept);
        }
        if let Some(rest) = data.strip_prefix("decline_") {
            return rest.parse().ok().map(CallbackAction::Decline);
        }
        None
    }
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackAction::FirstStart => f.write_str("first_start"),
            CallbackAction::MainMenu => f.write_str("back_to_main"),
            CallbackAction::Help => f.write_str("help"),
            CallbackAction::ListAuditories => f.write_str("list_auditories"),
            CallbackAction::Auditory(id) => write!(f, "aud_{id}"),
            CallbackAction::SetStatus(id, status) => write!(f, "set_{id}_{status}"),
            CallbackAction::SkipComment => f.write_str("skip_comment"),
            CallbackAction::ScheduleMenu => f.write_str("schedule_menu"),
            CallbackAction::Schedule(SchedulePeriod::Today) => f.write_str("today_schedule"),
            CallbackAction::Schedule(SchedulePeriod::Tomorrow) => f.write_str("tomorrow_schedule"),
            CallbackAction::Schedule(SchedulePeriod::Week) => f.write_str("week_schedule"),
            CallbackAction::AssignList => f.write_str("assign_list"),
            CallbackAction::AssignEvent(id) => write!(f, "assign_event_{id}"),
            CallbackAction::AssignTo { event_id, user_id } => {
                write!(f, "assign_to_{event_id}_{user_id}")
            }
            CallbackAction::Accept(id) => write!(f, "accept_{id}"),
            CallbackAction::Decline(id) => write!(f, "decline_{id}"),
        }
    }
}
