use auditory_status_bot::bot::callback_data::{CallbackAction, SchedulePeriod};
use auditory_status_bot::bot::commands::Command;
use auditory_status_bot::bot::keyboards::{MenuButton, MENU_ASSIGNMENTS, MENU_AUDITORIES, MENU_HELP, MENU_SCHEDULE};
use auditory_status_bot::database::models::StatusValue;
use auditory_status_bot::utils::validation::{parse_status_args, MAX_COMMENT_LEN};
use teloxide::utils::command::BotCommands;

#[cfg(test)]
mod command_parsing_tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        for (input, expected) in [
            ("/start", Command::Start),
            ("/help", Command::Help),
            ("/today", Command::Today),
            ("/assign", Command::Assign),
            ("/cancel", Command::Cancel),
        ] {
            assert_eq!(Command::parse(input, "testbot").ok(), Some(expected), "{input}");
        }
    }

    #[test]
    fn test_command_with_bot_mention() {
        assert_eq!(Command::parse("/start@testbot", "testbot").ok(), Some(Command::Start));
    }

    #[test]
    fn test_status_command_keeps_raw_arguments() {
        let cmd = Command::parse("/status Kapica yellow Проектор моргает", "testbot").unwrap();
        let Command::Status(args) = cmd else {
            panic!("expected /status");
        };

        let parsed = parse_status_args(&args).unwrap();
        assert_eq!(parsed.auditory, "Kapica");
        assert_eq!(parsed.status, "yellow");
        assert_eq!(parsed.comment.as_deref(), Some("Проектор моргает"));
    }

    #[test]
    fn test_status_command_wrong_argument_count() {
        let cmd = Command::parse("/status 118", "testbot").unwrap();
        let Command::Status(args) = cmd else {
            panic!("expected /status");
        };
        assert!(parse_status_args(&args).is_err());

        let cmd = Command::parse("/status", "testbot").unwrap();
        let Command::Status(args) = cmd else {
            panic!("expected /status");
        };
        assert!(parse_status_args(&args).is_err());
    }

    #[test]
    fn test_status_comment_too_long() {
        let args = format!("118 red {}", "x".repeat(MAX_COMMENT_LEN + 1));
        assert!(parse_status_args(&args).is_err());
    }

    #[test]
    fn test_unsupported_commands_are_unknown() {
        for input in ["/schedule", "/list", "/settings", "/stats"] {
            assert!(Command::parse(input, "testbot").is_err(), "{input}");
        }
    }
}

#[cfg(test)]
mod callback_data_tests {
    use super::*;

    #[test]
    fn test_wire_tokens() {
        assert_eq!(CallbackAction::MainMenu.to_string(), "back_to_main");
        assert_eq!(CallbackAction::Auditory(12).to_string(), "aud_12");
        assert_eq!(CallbackAction::SetStatus(12, StatusValue::Red).to_string(), "set_12_red");
        assert_eq!(CallbackAction::Schedule(SchedulePeriod::Week).to_string(), "week_schedule");
        assert_eq!(CallbackAction::AssignEvent(3).to_string(), "assign_event_3");
        assert_eq!(
            CallbackAction::AssignTo { event_id: 3, user_id: 987654321 }.to_string(),
            "assign_to_3_987654321"
        );
        assert_eq!(CallbackAction::Accept(3).to_string(), "accept_3");
    }

    #[test]
    fn test_assign_prefixes_do_not_collide() {
        assert_eq!(
            CallbackAction::decode("assign_event_15"),
            Some(CallbackAction::AssignEvent(15))
        );
        assert_eq!(
            CallbackAction::decode("assign_to_15_42"),
            Some(CallbackAction::AssignTo { event_id: 15, user_id: 42 })
        );
        assert_eq!(CallbackAction::decode("assign_list"), Some(CallbackAction::AssignList));
    }

    #[test]
    fn test_unknown_tokens() {
        for data in ["", "noop", "aud_abc", "set_1_purple", "assign_to_1", "accept_x", "session:1:yes"] {
            assert_eq!(CallbackAction::decode(data), None, "{data}");
        }
    }

    #[test]
    fn test_schedule_windows() {
        assert_eq!(SchedulePeriod::Today.window(), (0, 1));
        assert_eq!(SchedulePeriod::Tomorrow.window(), (1, 1));
        assert_eq!(SchedulePeriod::Week.window(), (0, 7));
    }
}

#[cfg(test)]
mod menu_tests {
    use super::*;

    #[test]
    fn test_menu_buttons() {
        assert_eq!(MenuButton::from_text(MENU_AUDITORIES), Some(MenuButton::Auditories));
        assert_eq!(MenuButton::from_text(MENU_SCHEDULE), Some(MenuButton::Schedule));
        assert_eq!(MenuButton::from_text(MENU_ASSIGNMENTS), Some(MenuButton::Assignments));
        assert_eq!(MenuButton::from_text(MENU_HELP), Some(MenuButton::Help));
        assert_eq!(MenuButton::from_text("привет"), None);
    }
}
