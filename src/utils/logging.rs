//! Prefixed log lines shared by handlers and services, so that a grep for
//! `CMD_ERROR` or `DB_ERROR` finds every failure of that kind.

use tracing::{debug, error, info, warn};

/// An incoming command, menu button or callback.
pub fn log_command_start(command: &str, user: &str, user_id: i64, chat_id: i64, details: Option<&str>) {
    info!(
        user_id,
        chat_id,
        "CMD_START: {} by {} - {}",
        command,
        user,
        details.unwrap_or("-")
    );
}

pub fn log_command_error(command: &str, user_id: i64, chat_id: i64, error: &str) {
    error!(user_id, chat_id, "CMD_ERROR: {} - {}", command, error);
}

/// Rejected user input.
pub fn log_validation_error(command: &str, value: &str, error: &str, user_id: i64) {
    warn!(user_id, "VALIDATION_ERROR: {} - '{}' rejected: {}", command, value, error);
}

pub fn log_database_operation(operation: &str, table: &str, details: Option<&str>) {
    debug!(table, "DB_OP: {} - {}", operation, details.unwrap_or("-"));
}

pub fn log_database_error(operation: &str, table: &str, error: &str, details: Option<&str>) {
    error!(table, "DB_ERROR: {} failed: {} - {}", operation, error, details.unwrap_or("-"));
}

/// A failed best-effort delivery. Never surfaced to users.
pub fn log_notification_error(target: &str, error: &str) {
    error!(target_chat = target, "NOTIFY_ERROR: delivery failed: {}", error);
}

pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}
