use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use crate::utils::auditory_names::to_display;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Auditory {
    pub id: i64,
    pub name: String, // canonical (Latin) name
    pub building: Option<String>,
    pub is_active: bool,
}

impl Auditory {
    /// Seeding entry point; the bot itself never creates auditories.
    pub async fn create(
        pool: &sqlx::SqlitePool,
        name: &str,
        building: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        let id = sqlx::query("INSERT INTO auditories (name, building, is_active) VALUES (?, ?, TRUE)")
            .bind(name)
            .bind(building)
            .execute(pool)
            .await?
            .last_insert_rowid();

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Auditory>(
            "SELECT id, name, building, is_active FROM auditories WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Looks up an active auditory by its canonical name.
    pub async fn find_active_by_name(
        pool: &sqlx::SqlitePool,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Auditory>(
            "SELECT id, name, building, is_active FROM auditories WHERE name = ? AND is_active = TRUE"
        )
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    pub async fn list_active(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Auditory>(
            "SELECT id, name, building, is_active FROM auditories WHERE is_active = TRUE ORDER BY name"
        )
        .fetch_all(pool)
        .await
    }

    pub async fn set_active(
        pool: &sqlx::SqlitePool,
        id: i64,
        is_active: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE auditories SET is_active = ? WHERE id = ?")
            .bind(is_active)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub fn display_name(&self) -> &str {
        to_display(&self.name)
    }
}
