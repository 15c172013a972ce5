use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: i64,
    pub google_event_id: String,
    pub auditory_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub organizer: String,
    pub status: String, // 'confirmed', 'tentative', 'cancelled'
    pub last_sync: NaiveDateTime,
}

/// Mutable fields of an event as delivered by the calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct EventUpsert {
    pub google_event_id: String,
    pub auditory_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub organizer: String,
    pub status: String,
}

/// An event joined with its auditory, as shown in listings.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct EventListing {
    pub id: i64,
    pub title: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub auditory_id: Option<i64>,
    pub auditory_name: Option<String>,
    pub building: Option<String>,
}

const SELECT_EVENT: &str = "SELECT id, google_event_id, auditory_id, title, description, start_time, end_time, organizer, status, last_sync FROM calendar_events";

impl CalendarEvent {
    /// Inserts the event or overwrites every mutable field of the row with
    /// the same `google_event_id`.
    pub async fn upsert(
        pool: &sqlx::SqlitePool,
        event: &EventUpsert,
        synced_at: NaiveDateTime,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO calendar_events
                (google_event_id, auditory_id, title, description,
                 start_time, end_time, organizer, status, last_sync)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (google_event_id) DO UPDATE SET
                auditory_id = excluded.auditory_id,
                title = excluded.title,
                description = excluded.description,
                start_time = excluded.start_time,
                end_time = excluded.end_time,
                organizer = excluded.organizer,
                status = excluded.status,
                last_sync = excluded.last_sync
            "#,
        )
        .bind(&event.google_event_id)
        .bind(event.auditory_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(&event.organizer)
        .bind(&event.status)
        .bind(synced_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, CalendarEvent>(&format!("{SELECT_EVENT} WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_google_id(
        pool: &sqlx::SqlitePool,
        google_event_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, CalendarEvent>(&format!("{SELECT_EVENT} WHERE google_event_id = ?"))
            .bind(google_event_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn count(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM calendar_events")
            .fetch_one(pool)
            .await
    }

    /// Confirmed events starting in `[from, to)`, ordered by start time.
    pub async fn confirmed_between(
        pool: &sqlx::SqlitePool,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<EventListing>, sqlx::Error> {
        sqlx::query_as::<_, EventListing>(
            r#"
            SELECT
                ce.id, ce.title, ce.start_time, ce.end_time, ce.auditory_id,
                a.name AS auditory_name, a.building
            FROM calendar_events ce
            LEFT JOIN auditories a ON ce.auditory_id = a.id
            WHERE ce.start_time >= ? AND ce.start_time < ?
              AND ce.status = 'confirmed'
            ORDER BY ce.start_time, ce.id
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
    }

    pub async fn listing_by_id(
        pool: &sqlx::SqlitePool,
        id: i64,
    ) -> Result<Option<EventListing>, sqlx::Error> {
        sqlx::query_as::<_, EventListing>(
            r#"
            SELECT
                ce.id, ce.title, ce.start_time, ce.end_time, ce.auditory_id,
                a.name AS auditory_name, a.building
            FROM calendar_events ce
            LEFT JOIN auditories a ON ce.auditory_id = a.id
            WHERE ce.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
