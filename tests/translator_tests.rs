use auditory_status_bot::services::calendar::{EventTime, RemoteEvent};
use auditory_status_bot::services::calendar_sync::resolve_auditory;
use auditory_status_bot::utils::auditory_names::{to_canonical, to_display, AUDITORY_NAMES};
use auditory_status_bot::utils::translit::to_latin;
use chrono::NaiveDate;
use std::collections::HashMap;

fn event(location: Option<&str>, description: Option<&str>) -> RemoteEvent {
    let day = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
    RemoteEvent {
        id: "evt".to_string(),
        title: "Лекция".to_string(),
        description: description.map(str::to_string),
        location: location.map(str::to_string),
        start: EventTime::Date(day),
        end: EventTime::Date(day),
        organizer: None,
        status: "confirmed".to_string(),
    }
}

fn auditories() -> HashMap<String, i64> {
    AUDITORY_NAMES
        .iter()
        .enumerate()
        .map(|(i, (canonical, _))| (canonical.to_string(), i as i64 + 1))
        .collect()
}

#[test]
fn test_table_is_bidirectional() {
    for (canonical, display) in AUDITORY_NAMES {
        assert_eq!(to_display(canonical), *display);
        assert_eq!(to_canonical(display), *canonical);
    }
}

#[test]
fn test_known_pairs() {
    assert_eq!(to_display("Semenov"), "Семенов");
    assert_eq!(to_canonical("Кабинет Ректора"), "Kabinet Rektora");
    assert_eq!(to_display("118"), "118");
    assert_eq!(to_canonical("335"), "335");
}

#[test]
fn test_unknown_names_pass_through() {
    assert_eq!(to_display("Unknown hall"), "Unknown hall");
    assert_eq!(to_canonical("Неизвестная"), "Неизвестная");
}

#[test]
fn test_transliteration_matches_canonical_names() {
    assert_eq!(to_latin("Капица"), "Kapica");
    assert_eq!(to_latin("Лекционный зал 2"), "Lekcionnyj zal 2");
    assert_eq!(to_latin("СКЦ"), "SKC");
}

#[test]
fn test_resolve_prefers_location() {
    let ids = auditories();
    let resolved = resolve_auditory(&event(Some("Капица"), Some("МКЗ")), &ids);
    assert_eq!(resolved, ids.get("Kapica").copied());
}

#[test]
fn test_resolve_falls_back_to_description() {
    let ids = auditories();
    assert_eq!(resolve_auditory(&event(None, Some("  МКЗ ")), &ids), ids.get("MKZ").copied());
    assert_eq!(resolve_auditory(&event(Some("   "), Some("Г3.14")), &ids), ids.get("G3.14").copied());
}

#[test]
fn test_resolve_unmatched_location() {
    let ids = auditories();
    assert_eq!(resolve_auditory(&event(Some("Актовый зал"), None), &ids), None);
    assert_eq!(resolve_auditory(&event(None, None), &ids), None);
}
