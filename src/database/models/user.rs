use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use crate::utils::datetime::now_naive;

/// Roles allowed to be assigned to events and to manage assignments.
pub const STAFF_ROLES: [&str; 3] = ["engineer", "admin", "manager"];

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub telegram_id: i64,
    pub full_name: String,
    pub username: Option<String>,
    pub role: String, // 'user', 'engineer', 'admin', 'manager'
    pub last_active: NaiveDateTime,
}

impl User {
    /// Inserts the user or refreshes name, handle and activity time.
    /// The role is never touched here; it is managed outside the bot.
    pub async fn upsert(
        pool: &sqlx::SqlitePool,
        telegram_id: i64,
        full_name: &str,
        username: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO users (telegram_id, full_name, username, last_active)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (telegram_id) DO UPDATE SET
                full_name = excluded.full_name,
                username = excluded.username,
                last_active = excluded.last_active
            "#,
        )
        .bind(telegram_id)
        .bind(full_name)
        .bind(username)
        .bind(now_naive())
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        telegram_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT telegram_id, full_name, username, role, last_active FROM users WHERE telegram_id = ?"
        )
        .bind(telegram_id)
        .fetch_optional(pool)
        .await
    }

    /// Returns false when no such user exists.
    pub async fn set_role(
        pool: &sqlx::SqlitePool,
        telegram_id: i64,
        role: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET role = ? WHERE telegram_id = ?")
            .bind(role)
            .bind(telegram_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether the user has ever reported a status; first-time users get the
    /// welcome screen on `/start`.
    pub async fn has_reported(
        pool: &sqlx::SqlitePool,
        telegram_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM status_log WHERE reported_by = ?"
        )
        .bind(telegram_id)
        .fetch_one(pool)
        .await?;

        Ok(count > 0)
    }

    pub fn is_staff(&self) -> bool {
        STAFF_ROLES.contains(&self.role.as_str())
    }
}
