use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use crate::utils::datetime::now_naive;

/// Operational state of an auditory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusValue {
    Green,
    Yellow,
    Red,
}

impl StatusValue {
    pub const ALL: [StatusValue; 3] = [StatusValue::Green, StatusValue::Yellow, StatusValue::Red];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusValue::Green => "green",
            StatusValue::Yellow => "yellow",
            StatusValue::Red => "red",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            StatusValue::Green => "🟢",
            StatusValue::Yellow => "🟡",
            StatusValue::Red => "🔴",
        }
    }

    /// Button caption.
    pub fn label(self) -> &'static str {
        match self {
            StatusValue::Green => "Работает",
            StatusValue::Yellow => "Проблемы",
            StatusValue::Red => "Не работает",
        }
    }

    /// Only non-green statuses ask for a comment.
    pub fn wants_comment(self) -> bool {
        self != StatusValue::Green
    }
}

impl fmt::Display for StatusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusValue {
    type Err = String;

    /// Case-insensitive; surrounding whitespace is not accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "green" => Ok(StatusValue::Green),
            "yellow" => Ok(StatusValue::Yellow),
            "red" => Ok(StatusValue::Red),
            _ => Err(format!("'{s}' is not one of green, yellow, red")),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct StatusEntry {
    pub id: i64,
    pub auditory_id: i64,
    pub status: String, // 'green', 'yellow', 'red'
    pub comment: Option<String>,
    pub reported_by: i64,
    pub created_at: NaiveDateTime,
}

impl StatusEntry {
    pub async fn insert(
        pool: &sqlx::SqlitePool,
        auditory_id: i64,
        status: StatusValue,
        comment: Option<&str>,
        reported_by: i64,
    ) -> Result<Self, sqlx::Error> {
        let created_at = now_naive();
        let id = sqlx::query(
            r#"
            INSERT INTO status_log (auditory_id, status, comment, reported_by, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(auditory_id)
        .bind(status.as_str())
        .bind(comment)
        .bind(reported_by)
        .bind(created_at)
        .execute(pool)
        .await?
        .last_insert_rowid();

        Ok(StatusEntry {
            id,
            auditory_id,
            status: status.as_str().to_string(),
            comment: comment.map(str::to_string),
            reported_by,
            created_at,
        })
    }

    /// Current status of an auditory: the newest log entry.
    pub async fn latest_for_auditory(
        pool: &sqlx::SqlitePool,
        auditory_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, StatusEntry>(
            r#"
            SELECT id, auditory_id, status, comment, reported_by, created_at
            FROM status_log
            WHERE auditory_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(auditory_id)
        .fetch_optional(pool)
        .await
    }

    /// Newest entry of every auditory that has one.
    pub async fn latest_for_all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, StatusEntry>(
            r#"
            SELECT s.id, s.auditory_id, s.status, s.comment, s.reported_by, s.created_at
            FROM status_log s
            WHERE s.id = (
                SELECT l.id FROM status_log l
                WHERE l.auditory_id = s.auditory_id
                ORDER BY l.created_at DESC, l.id DESC
                LIMIT 1
            )
            "#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn count(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM status_log")
            .fetch_one(pool)
            .await
    }

    /// Typed status; `None` only if the row was written around the CHECK.
    pub fn status_value(&self) -> Option<StatusValue> {
        self.status.parse().ok()
    }
}
