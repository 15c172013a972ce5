//! Recording auditory status changes.

use thiserror::Error;
use crate::database::{connection::DatabaseManager, models::*};
use crate::services::notifier::{broadcast_best_effort, Notifier};
use crate::utils::auditory_names::{to_canonical, to_display};
use crate::utils::logging::{log_database_error, log_database_operation};

#[derive(Debug, Error)]
pub enum StatusError {
    #[error("auditory '{0}' not found")]
    UnknownAuditory(String),
    #[error("invalid status: {0}")]
    InvalidStatus(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StatusError {
    /// Message shown to the user. Store failures stay generic.
    pub fn user_message(&self) -> String {
        match self {
            StatusError::UnknownAuditory(name) => format!("Аудитория «{name}» не найдена"),
            StatusError::InvalidStatus(value) => {
                format!("Недопустимый статус «{value}». Допустимые: green, yellow, red")
            }
            StatusError::Database(_) => "Не удалось сохранить статус. Попробуйте позже".to_string(),
        }
    }
}

/// Validates and appends a status change, then broadcasts it.
///
/// `auditory_name` may be canonical or a display label. Validation happens
/// before any write. The broadcast is best effort and cannot fail the call.
pub async fn record_status(
    db: &DatabaseManager,
    notifier: &dyn Notifier,
    user_id: i64,
    auditory_name: &str,
    status: &str,
    comment: Option<&str>,
) -> Result<StatusEntry, StatusError> {
    let status_value: StatusValue = status.parse().map_err(StatusError::InvalidStatus)?;

    let canonical = to_canonical(auditory_name.trim());
    let auditory = Auditory::find_active_by_name(&db.pool, canonical)
        .await
        .map_err(|e| {
            log_database_error("SELECT", "auditories", &e.to_string(), Some(canonical));
            e
        })?
        .ok_or_else(|| StatusError::UnknownAuditory(auditory_name.trim().to_string()))?;

    let entry = StatusEntry::insert(&db.pool, auditory.id, status_value, comment, user_id)
        .await
        .map_err(|e| {
            log_database_error(
                "INSERT",
                "status_log",
                &e.to_string(),
                Some(&format!("user {user_id}, auditory '{}'", auditory.name)),
            );
            e
        })?;

    log_database_operation(
        "INSERT",
        "status_log",
        Some(&format!("{} -> {} by {}", auditory.name, status_value, user_id)),
    );

    let reporter = match User::find_by_id(&db.pool, user_id).await {
        Ok(Some(user)) => user.full_name,
        Ok(None) => format!("Пользователь {user_id}"),
        Err(e) => {
            tracing::warn!("Failed to load reporter {} for broadcast: {}", user_id, e);
            format!("Пользователь {user_id}")
        }
    };

    let text = format_status_broadcast(&reporter, &auditory.name, status_value, comment);
    broadcast_best_effort(notifier, &text).await;

    Ok(entry)
}

/// Current status of an auditory given by canonical or display name.
pub async fn latest_status(
    db: &DatabaseManager,
    auditory_name: &str,
) -> Result<Option<StatusEntry>, sqlx::Error> {
    let canonical = to_canonical(auditory_name.trim());
    match Auditory::find_active_by_name(&db.pool, canonical).await? {
        Some(auditory) => StatusEntry::latest_for_auditory(&db.pool, auditory.id).await,
        None => Ok(None),
    }
}

/// Plain-text group notification.
pub fn format_status_broadcast(
    reporter: &str,
    auditory_name: &str,
    status: StatusValue,
    comment: Option<&str>,
) -> String {
    let mut text = format!(
        "🔄 {} обновил статус {}: {} {}",
        reporter,
        to_display(auditory_name),
        status.emoji(),
        status.as_str().to_uppercase()
    );
    if let Some(comment) = comment {
        text.push_str(&format!("\n📝 Комментарий: {comment}"));
    }
    text
}
