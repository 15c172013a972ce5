use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use crate::database::models::user::STAFF_ROLES;
use crate::utils::datetime::now_naive;

/// Lifecycle of an assignment. Declining deletes the row instead of
/// moving it to another state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Assigned,
    Accepted,
    Done,
}

impl AssignmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentStatus::Assigned => "assigned",
            AssignmentStatus::Accepted => "accepted",
            AssignmentStatus::Done => "done",
        }
    }
}

impl FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assigned" => Ok(AssignmentStatus::Assigned),
            "accepted" => Ok(AssignmentStatus::Accepted),
            "done" => Ok(AssignmentStatus::Done),
            _ => Err(format!("unknown assignment status '{s}'")),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct EventAssignment {
    pub id: i64,
    pub event_id: i64,
    pub assigned_to: i64,
    pub assigned_by: i64,
    pub role: String,
    pub status: String, // 'assigned', 'accepted', 'done'
    pub assigned_at: NaiveDateTime,
    pub confirmed_at: Option<NaiveDateTime>,
}

/// A staff member with their assignment state for one event.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct StaffMember {
    pub telegram_id: i64,
    pub full_name: String,
    pub role: String,
    pub assignment_status: Option<String>,
}

impl StaffMember {
    pub fn assignment(&self) -> Option<AssignmentStatus> {
        self.assignment_status.as_deref().and_then(|s| s.parse().ok())
    }
}

impl EventAssignment {
    /// Inserts a `primary` assignment in state `assigned`.
    ///
    /// Returns `false` and leaves the row untouched when the pair already
    /// exists; the check and the insert are one statement.
    pub async fn create_if_absent(
        pool: &sqlx::SqlitePool,
        event_id: i64,
        assigned_to: i64,
        assigned_by: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO event_assignments
                (event_id, assigned_to, assigned_by, role, status, assigned_at)
            VALUES (?, ?, ?, 'primary', 'assigned', ?)
            ON CONFLICT (event_id, assigned_to) DO NOTHING
            "#,
        )
        .bind(event_id)
        .bind(assigned_to)
        .bind(assigned_by)
        .bind(now_naive())
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn find(
        pool: &sqlx::SqlitePool,
        event_id: i64,
        assigned_to: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, EventAssignment>(
            r#"
            SELECT id, event_id, assigned_to, assigned_by, role, status, assigned_at, confirmed_at
            FROM event_assignments
            WHERE event_id = ? AND assigned_to = ?
            "#,
        )
        .bind(event_id)
        .bind(assigned_to)
        .fetch_optional(pool)
        .await
    }

    /// Marks the assignment accepted and stamps the confirmation time.
    pub async fn accept(
        pool: &sqlx::SqlitePool,
        event_id: i64,
        assigned_to: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE event_assignments
            SET status = 'accepted', confirmed_at = ?
            WHERE event_id = ? AND assigned_to = ?
            "#,
        )
        .bind(now_naive())
        .bind(event_id)
        .bind(assigned_to)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(
        pool: &sqlx::SqlitePool,
        event_id: i64,
        assigned_to: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM event_assignments WHERE event_id = ? AND assigned_to = ?"
        )
        .bind(event_id)
        .bind(assigned_to)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_for_event(
        pool: &sqlx::SqlitePool,
        event_id: i64,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM event_assignments WHERE event_id = ?"
        )
        .bind(event_id)
        .fetch_one(pool)
        .await
    }

    /// All staff, assigned ones first, then by name.
    pub async fn staff_for_event(
        pool: &sqlx::SqlitePool,
        event_id: i64,
    ) -> Result<Vec<StaffMember>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT u.telegram_id, u.full_name, u.role, ea.status AS assignment_status
            FROM users u
            LEFT JOIN event_assignments ea
                ON u.telegram_id = ea.assigned_to AND ea.event_id = ?
            WHERE u.role IN ({})
            ORDER BY
                CASE WHEN ea.id IS NOT NULL THEN 0 ELSE 1 END,
                u.full_name
            "#,
            STAFF_ROLES.iter().map(|_| "?").collect::<Vec<_>>().join(",")
        );

        let mut query_builder = sqlx::query_as::<_, StaffMember>(&query).bind(event_id);
        for role in STAFF_ROLES {
            query_builder = query_builder.bind(role);
        }

        query_builder.fetch_all(pool).await
    }
}
