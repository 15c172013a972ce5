//! Staffing calendar events: listing, assigning and the assignee's answer.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use crate::bot::callback_data::CallbackAction;
use crate::database::{connection::DatabaseManager, models::*};
use crate::services::notifier::{direct_best_effort, Notifier};
use crate::utils::datetime::{day_window, format_full, today};
use crate::utils::logging::log_database_operation;

/// Days covered by the assignment menu: today, tomorrow, the day after.
pub const ASSIGN_WINDOW_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOutcome {
    AlreadyAssigned,
    Assigned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Decline,
}

/// Confirmed events starting between today's midnight and
/// `window_days` midnights later, earliest first.
pub async fn list_upcoming_events(
    db: &DatabaseManager,
    window_days: i64,
) -> Result<Vec<EventListing>, sqlx::Error> {
    let (from, to) = day_window(today(), window_days);
    CalendarEvent::confirmed_between(&db.pool, from, to).await
}

/// Assigns `assignee_id` to the event and asks them to confirm.
///
/// A repeated pair reports `AlreadyAssigned` without touching the row. The
/// prompt to the assignee is best effort.
pub async fn assign(
    db: &DatabaseManager,
    notifier: &dyn Notifier,
    actor_id: i64,
    event_id: i64,
    assignee_id: i64,
) -> Result<AssignOutcome, sqlx::Error> {
    if !EventAssignment::create_if_absent(&db.pool, event_id, assignee_id, actor_id).await? {
        tracing::info!(
            "User {} is already assigned to event {} (requested by {})",
            assignee_id, event_id, actor_id
        );
        return Ok(AssignOutcome::AlreadyAssigned);
    }

    log_database_operation(
        "INSERT",
        "event_assignments",
        Some(&format!("event {event_id} -> user {assignee_id} by {actor_id}")),
    );

    match CalendarEvent::find_by_id(&db.pool, event_id).await {
        Ok(Some(event)) => {
            let text = format_assignment_notice(&event);
            direct_best_effort(notifier, assignee_id, &text, response_keyboard(event_id)).await;
        }
        Ok(None) => tracing::warn!("Event {} vanished before notifying assignee", event_id),
        Err(e) => tracing::warn!("Failed to load event {} for notification: {}", event_id, e),
    }

    Ok(AssignOutcome::Assigned)
}

/// Records the assignee's answer. Accepting stamps the confirmation time;
/// declining removes the assignment entirely. Returns whether an assignment
/// for the pair existed.
pub async fn respond(
    db: &DatabaseManager,
    user_id: i64,
    event_id: i64,
    decision: Decision,
) -> Result<bool, sqlx::Error> {
    let found = match decision {
        Decision::Accept => EventAssignment::accept(&db.pool, event_id, user_id).await?,
        Decision::Decline => EventAssignment::delete(&db.pool, event_id, user_id).await?,
    };

    tracing::info!(
        "User {} answered {:?} for event {} (assignment found: {})",
        user_id, decision, event_id, found
    );
    Ok(found)
}

/// Staff with roles engineer/admin/manager; assigned first, then by name.
pub async fn list_staff_for_event(
    db: &DatabaseManager,
    event_id: i64,
) -> Result<Vec<StaffMember>, sqlx::Error> {
    EventAssignment::staff_for_event(&db.pool, event_id).await
}

pub fn format_assignment_notice(event: &CalendarEvent) -> String {
    format!(
        "🔔 Вам назначено мероприятие!\n\n📅 Мероприятие: {}\n🕐 Время: {}\n\nПожалуйста, подтвердите участие:",
        event.title,
        format_full(&event.start_time)
    )
}

pub fn response_keyboard(event_id: i64) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("✅ Принять", CallbackAction::Accept(event_id).to_string()),
        InlineKeyboardButton::callback("❌ Отказаться", CallbackAction::Decline(event_id).to_string()),
    ]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notifier::MockNotifier;
    use crate::utils::datetime::now_naive;
    use chrono::Duration;
    use tempfile::TempDir;

    async fn setup() -> (DatabaseManager, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());
        let db = DatabaseManager::new(&db_url).await.expect("Failed to create test database");
        db.run_migrations().await.expect("Failed to run migrations");
        (db, temp_dir)
    }

    async fn add_staff(db: &DatabaseManager, id: i64, name: &str, role: &str) {
        User::upsert(&db.pool, id, name, None).await.expect("user");
        User::set_role(&db.pool, id, role).await.expect("role");
    }

    async fn add_event(db: &DatabaseManager, google_id: &str, starts_in: Duration, status: &str) -> i64 {
        let start = day_window(today(), 0).0 + starts_in;
        let event = EventUpsert {
            google_event_id: google_id.to_string(),
            auditory_id: None,
            title: format!("Event {google_id}"),
            description: String::new(),
            start_time: start,
            end_time: start + Duration::hours(2),
            organizer: "org@example.com".to_string(),
            status: status.to_string(),
        };
        CalendarEvent::upsert(&db.pool, &event, now_naive()).await.expect("event");
        CalendarEvent::find_by_google_id(&db.pool, google_id)
            .await
            .expect("query")
            .expect("event exists")
            .id
    }

    fn accepting_notifier() -> MockNotifier {
        let mut notifier = MockNotifier::new();
        notifier.expect_direct().returning(|_, _, _| Ok(()));
        notifier
    }

    #[tokio::test]
    async fn test_second_assign_reports_already_assigned() {
        let (db, _temp_dir) = setup().await;
        add_staff(&db, 1, "Админ", "admin").await;
        add_staff(&db, 9, "Инженер", "engineer").await;
        let event_id = add_event(&db, "evt-7", Duration::hours(10), "confirmed").await;

        let mut notifier = MockNotifier::new();
        notifier
            .expect_direct()
            .withf(|user_id, text, _| *user_id == 9 && text.contains("Event evt-7"))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let first = assign(&db, &notifier, 1, event_id, 9).await.expect("assign");
        let second = assign(&db, &notifier, 1, event_id, 9).await.expect("assign");

        assert_eq!(first, AssignOutcome::Assigned);
        assert_eq!(second, AssignOutcome::AlreadyAssigned);
        assert_eq!(EventAssignment::count_for_event(&db.pool, event_id).await.expect("count"), 1);
    }

    #[tokio::test]
    async fn test_notification_failure_keeps_assignment() {
        let (db, _temp_dir) = setup().await;
        add_staff(&db, 9, "Инженер", "engineer").await;
        let event_id = add_event(&db, "evt-1", Duration::hours(10), "confirmed").await;

        let mut notifier = MockNotifier::new();
        notifier
            .expect_direct()
            .returning(|_, _, _| Err(anyhow::anyhow!("bot was blocked by the user")));

        let outcome = assign(&db, &notifier, 1, event_id, 9).await.expect("assign");
        assert_eq!(outcome, AssignOutcome::Assigned);
        let row = EventAssignment::find(&db.pool, event_id, 9).await.expect("query").expect("row");
        assert_eq!(row.status, "assigned");
        assert_eq!(row.role, "primary");
        assert_eq!(row.assigned_by, 1);
    }

    #[tokio::test]
    async fn test_accept_stamps_confirmation() {
        let (db, _temp_dir) = setup().await;
        add_staff(&db, 9, "Инженер", "engineer").await;
        let event_id = add_event(&db, "evt-1", Duration::hours(10), "confirmed").await;
        assign(&db, &accepting_notifier(), 1, event_id, 9).await.expect("assign");

        assert!(respond(&db, 9, event_id, Decision::Accept).await.expect("respond"));

        let row = EventAssignment::find(&db.pool, event_id, 9).await.expect("query").expect("row");
        assert_eq!(row.status.parse::<AssignmentStatus>(), Ok(AssignmentStatus::Accepted));
        assert!(row.confirmed_at.is_some());
    }

    #[tokio::test]
    async fn test_decline_deletes_and_allows_fresh_assignment() {
        let (db, _temp_dir) = setup().await;
        add_staff(&db, 9, "Инженер", "engineer").await;
        let event_id = add_event(&db, "evt-1", Duration::hours(10), "confirmed").await;
        let notifier = accepting_notifier();

        assign(&db, &notifier, 1, event_id, 9).await.expect("assign");
        respond(&db, 9, event_id, Decision::Accept).await.expect("accept");
        assert!(respond(&db, 9, event_id, Decision::Decline).await.expect("decline"));
        assert!(EventAssignment::find(&db.pool, event_id, 9).await.expect("query").is_none());

        let again = assign(&db, &notifier, 1, event_id, 9).await.expect("assign");
        assert_eq!(again, AssignOutcome::Assigned);
        let row = EventAssignment::find(&db.pool, event_id, 9).await.expect("query").expect("row");
        assert_eq!(row.status, "assigned");
        assert!(row.confirmed_at.is_none());
    }

    #[tokio::test]
    async fn test_respond_without_assignment_reports_missing() {
        let (db, _temp_dir) = setup().await;
        let event_id = add_event(&db, "evt-1", Duration::hours(10), "confirmed").await;
        assert!(!respond(&db, 9, event_id, Decision::Accept).await.expect("respond"));
        assert!(!respond(&db, 9, event_id, Decision::Decline).await.expect("respond"));
    }

    #[tokio::test]
    async fn test_upcoming_events_window_and_order() {
        let (db, _temp_dir) = setup().await;
        let later = add_event(&db, "day-2", Duration::days(2) + Duration::hours(9), "confirmed").await;
        let sooner = add_event(&db, "day-0", Duration::hours(23), "confirmed").await;
        add_event(&db, "day-3", Duration::days(3) + Duration::hours(1), "confirmed").await;
        add_event(&db, "yesterday", Duration::hours(-2), "confirmed").await;
        add_event(&db, "tentative", Duration::hours(12), "tentative").await;

        let events = list_upcoming_events(&db, ASSIGN_WINDOW_DAYS).await.expect("events");
        let ids: Vec<i64> = events.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![sooner, later]);
    }

    #[tokio::test]
    async fn test_staff_listing_puts_assigned_first() {
        let (db, _temp_dir) = setup().await;
        add_staff(&db, 1, "Борис", "engineer").await;
        add_staff(&db, 2, "Анна", "admin").await;
        add_staff(&db, 3, "Виктор", "manager").await;
        add_staff(&db, 4, "Галина", "user").await;
        let event_id = add_event(&db, "evt-1", Duration::hours(10), "confirmed").await;
        assign(&db, &accepting_notifier(), 2, event_id, 3).await.expect("assign");

        let staff = list_staff_for_event(&db, event_id).await.expect("staff");
        let names: Vec<&str> = staff.iter().map(|s| s.full_name.as_str()).collect();
        assert_eq!(names, vec!["Виктор", "Анна", "Борис"]);
        assert_eq!(staff[0].assignment(), Some(AssignmentStatus::Assigned));
        assert_eq!(staff[1].assignment(), None);
    }
}
