use anyhow::Result;
use auditory_status_bot::database::{connection::DatabaseManager, models::*};
use auditory_status_bot::utils::datetime::{day_window, now_naive, today};
use chrono::{Duration, NaiveDateTime};
use tempfile::{tempdir, TempDir};

async fn setup_test_db() -> Result<(DatabaseManager, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db_manager = DatabaseManager::new(&database_url).await?;
    db_manager.run_migrations().await?;

    Ok((db_manager, temp_dir))
}

fn event(google_id: &str, title: &str, start: NaiveDateTime, status: &str) -> EventUpsert {
    EventUpsert {
        google_event_id: google_id.to_string(),
        auditory_id: None,
        title: title.to_string(),
        description: String::new(),
        start_time: start,
        end_time: start + Duration::hours(1),
        organizer: "organizer@example.com".to_string(),
        status: status.to_string(),
    }
}

async fn stored_event(db: &DatabaseManager, google_id: &str) -> Result<CalendarEvent> {
    CalendarEvent::find_by_google_id(&db.pool, google_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("event {google_id} missing"))
}

#[tokio::test]
async fn test_user_upsert_refreshes_profile_but_keeps_role() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    User::upsert(&db.pool, 42, "Иван Петров", Some("ivan")).await?;
    let user = User::find_by_id(&db.pool, 42).await?.unwrap();
    assert_eq!(user.role, "user");
    assert!(!user.is_staff());

    assert!(User::set_role(&db.pool, 42, "engineer").await?);
    User::upsert(&db.pool, 42, "Иван Сидоров", None).await?;

    let user = User::find_by_id(&db.pool, 42).await?.unwrap();
    assert_eq!(user.full_name, "Иван Сидоров");
    assert_eq!(user.username, None);
    assert_eq!(user.role, "engineer");
    assert!(user.is_staff());

    assert!(!User::set_role(&db.pool, 999, "admin").await?);
    Ok(())
}

#[tokio::test]
async fn test_auditory_lookup_respects_active_flag() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let kapica = Auditory::create(&db.pool, "Kapica", Some("Главный")).await?;
    Auditory::create(&db.pool, "118", None).await?;
    assert_eq!(kapica.display_name(), "Капица");

    assert!(Auditory::find_active_by_name(&db.pool, "Kapica").await?.is_some());
    assert!(Auditory::find_active_by_name(&db.pool, "Капица").await?.is_none());

    Auditory::set_active(&db.pool, kapica.id, false).await?;
    assert!(Auditory::find_active_by_name(&db.pool, "Kapica").await?.is_none());

    let names: Vec<String> = Auditory::list_active(&db.pool)
        .await?
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(names, vec!["118".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_auditory_names_are_unique() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    Auditory::create(&db.pool, "MKZ", None).await?;
    assert!(Auditory::create(&db.pool, "MKZ", None).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_latest_status_is_newest_entry() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let a = Auditory::create(&db.pool, "118", None).await?;
    let b = Auditory::create(&db.pool, "130", None).await?;

    assert!(StatusEntry::latest_for_auditory(&db.pool, a.id).await?.is_none());

    StatusEntry::insert(&db.pool, a.id, StatusValue::Red, Some("нет звука"), 1).await?;
    let newest = StatusEntry::insert(&db.pool, a.id, StatusValue::Green, None, 2).await?;
    StatusEntry::insert(&db.pool, b.id, StatusValue::Yellow, None, 1).await?;

    let latest = StatusEntry::latest_for_auditory(&db.pool, a.id).await?.unwrap();
    assert_eq!(latest.id, newest.id);
    assert_eq!(latest.status_value(), Some(StatusValue::Green));

    let mut all = StatusEntry::latest_for_all(&db.pool).await?;
    all.sort_by_key(|entry| entry.auditory_id);
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, newest.id);
    assert_eq!(all[1].status, "yellow");

    assert_eq!(StatusEntry::count(&db.pool).await?, 3);
    assert!(User::has_reported(&db.pool, 1).await?);
    assert!(!User::has_reported(&db.pool, 3).await?);
    Ok(())
}

#[tokio::test]
async fn test_status_check_constraint() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let a = Auditory::create(&db.pool, "118", None).await?;

    let result = sqlx::query(
        "INSERT INTO status_log (auditory_id, status, reported_by, created_at) VALUES (?, 'blue', 1, ?)",
    )
    .bind(a.id)
    .bind(now_naive())
    .execute(&db.pool)
    .await;

    assert!(result.is_err());
    Ok(())
}

#[tokio::test]
async fn test_event_upsert_overwrites_by_google_id() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let room = Auditory::create(&db.pool, "SKC", None).await?;
    let start = now_naive();

    CalendarEvent::upsert(&db.pool, &event("g-1", "Старое", start, "confirmed"), start).await?;
    let first = stored_event(&db, "g-1").await?;

    let mut changed = event("g-1", "Новое", start + Duration::hours(3), "tentative");
    changed.auditory_id = Some(room.id);
    changed.description = "СКЦ".to_string();
    CalendarEvent::upsert(&db.pool, &changed, start + Duration::minutes(5)).await?;

    let second = stored_event(&db, "g-1").await?;
    assert_eq!(second.id, first.id);
    assert_eq!(second.title, "Новое");
    assert_eq!(second.auditory_id, Some(room.id));
    assert_eq!(second.description, "СКЦ");
    assert_eq!(second.status, "tentative");
    assert_eq!(second.start_time, start + Duration::hours(3));
    assert_eq!(second.last_sync, start + Duration::minutes(5));
    assert_eq!(CalendarEvent::count(&db.pool).await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_confirmed_between_window_and_order() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let room = Auditory::create(&db.pool, "Kapica", Some("Главный")).await?;
    let (from, to) = day_window(today(), 3);

    let mut inside = event("in-late", "Позже", from + Duration::hours(30), "confirmed");
    inside.auditory_id = Some(room.id);
    CalendarEvent::upsert(&db.pool, &inside, now_naive()).await?;
    CalendarEvent::upsert(&db.pool, &event("in-early", "Раньше", from + Duration::hours(9), "confirmed"), now_naive()).await?;
    CalendarEvent::upsert(&db.pool, &event("cancelled", "Отмена", from + Duration::hours(10), "cancelled"), now_naive()).await?;
    CalendarEvent::upsert(&db.pool, &event("edge", "Граница", to, "confirmed"), now_naive()).await?;
    CalendarEvent::upsert(&db.pool, &event("past", "Вчера", from - Duration::hours(1), "confirmed"), now_naive()).await?;

    let listed = CalendarEvent::confirmed_between(&db.pool, from, to).await?;
    let titles: Vec<&str> = listed.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Раньше", "Позже"]);

    assert_eq!(listed[1].auditory_name.as_deref(), Some("Kapica"));
    assert_eq!(listed[1].building.as_deref(), Some("Главный"));
    assert_eq!(listed[0].auditory_name, None);

    let listing = CalendarEvent::listing_by_id(&db.pool, listed[1].id).await?.unwrap();
    assert_eq!(listing.title, "Позже");
    Ok(())
}

#[tokio::test]
async fn test_assignment_lifecycle() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    User::upsert(&db.pool, 7, "Инженер", None).await?;
    CalendarEvent::upsert(&db.pool, &event("g-1", "Семинар", now_naive(), "confirmed"), now_naive()).await?;
    let event = stored_event(&db, "g-1").await?;

    assert!(EventAssignment::create_if_absent(&db.pool, event.id, 7, 1).await?);
    assert!(!EventAssignment::create_if_absent(&db.pool, event.id, 7, 2).await?);
    assert_eq!(EventAssignment::count_for_event(&db.pool, event.id).await?, 1);

    let assignment = EventAssignment::find(&db.pool, event.id, 7).await?.unwrap();
    assert_eq!(assignment.status, "assigned");
    assert_eq!(assignment.role, "primary");
    assert_eq!(assignment.assigned_by, 1);
    assert!(assignment.confirmed_at.is_none());

    assert!(EventAssignment::accept(&db.pool, event.id, 7).await?);
    let assignment = EventAssignment::find(&db.pool, event.id, 7).await?.unwrap();
    assert_eq!(assignment.status, "accepted");
    assert!(assignment.confirmed_at.is_some());

    assert!(EventAssignment::delete(&db.pool, event.id, 7).await?);
    assert!(!EventAssignment::delete(&db.pool, event.id, 7).await?);
    assert!(EventAssignment::find(&db.pool, event.id, 7).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_staff_listing_order() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    for (id, name, role) in [
        (1, "Борис", "engineer"),
        (2, "Анна", "manager"),
        (3, "Вера", "admin"),
        (4, "Гость", "user"),
    ] {
        User::upsert(&db.pool, id, name, None).await?;
        User::set_role(&db.pool, id, role).await?;
    }
    CalendarEvent::upsert(&db.pool, &event("g-1", "Семинар", now_naive(), "confirmed"), now_naive()).await?;
    let event = stored_event(&db, "g-1").await?;
    EventAssignment::create_if_absent(&db.pool, event.id, 3, 2).await?;

    let staff = EventAssignment::staff_for_event(&db.pool, event.id).await?;
    let names: Vec<&str> = staff.iter().map(|s| s.full_name.as_str()).collect();
    assert_eq!(names, vec!["Вера", "Анна", "Борис"]);
    assert_eq!(staff[0].assignment(), Some(AssignmentStatus::Assigned));
    assert_eq!(staff[1].assignment(), None);
    Ok(())
}
