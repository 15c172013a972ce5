use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Current local wall-clock time without an offset.
///
/// Every timestamp written to the store goes through this function, so
/// comparisons against calendar times (also stored as local naive values)
/// stay consistent.
pub fn now_naive() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Half-open range `[start 00:00, start + days 00:00)`.
pub fn day_window(start: NaiveDate, days: i64) -> (NaiveDateTime, NaiveDateTime) {
    let from = start.and_time(NaiveTime::MIN);
    (from, from + Duration::days(days))
}

/// Converts an offset-aware timestamp to local naive time.
pub fn to_local_naive<Tz: TimeZone>(dt: &DateTime<Tz>) -> NaiveDateTime {
    dt.with_timezone(&Local).naive_local()
}

/// Short form used on buttons, e.g. `19.10 14:30`.
pub fn format_short(dt: &NaiveDateTime) -> String {
    dt.format("%d.%m %H:%M").to_string()
}

/// Full form used in event cards, e.g. `19.10.2026 14:30`.
pub fn format_full(dt: &NaiveDateTime) -> String {
    dt.format("%d.%m.%Y %H:%M").to_string()
}

pub fn format_time(dt: &NaiveDateTime) -> String {
    dt.format("%H:%M").to_string()
}
