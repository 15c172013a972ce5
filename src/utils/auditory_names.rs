//! Bidirectional mapping between canonical auditory names (as stored in the
//! `auditories` table) and the Cyrillic labels shown to users.
//!
//! Names missing from the table pass through unchanged in both directions.

/// `(canonical, display)` pairs.
pub const AUDITORY_NAMES: &[(&str, &str)] = &[
    ("118", "118"),
    ("130", "130"),
    ("Semenov", "Семенов"),
    ("Lekcionnyj zal 1", "Лекционный зал 1"),
    ("Lekcionnyj zal 2", "Лекционный зал 2"),
    ("Kapica", "Капица"),
    ("G3.56", "Г3.56"),
    ("MKZ", "МКЗ"),
    ("G3.14", "Г3.14"),
    ("335", "335"),
    ("Kabinet Rektora", "Кабинет Ректора"),
    ("SKC", "СКЦ"),
];

/// Returns the display label for a canonical name.
pub fn to_display(canonical: &str) -> &str {
    AUDITORY_NAMES
        .iter()
        .find(|(name, _)| *name == canonical)
        .map_or(canonical, |(_, display)| display)
}

/// Returns the canonical name for a display label.
pub fn to_canonical(display: &str) -> &str {
    AUDITORY_NAMES
        .iter()
        .find(|(_, label)| *label == display)
        .map_or(display, |(name, _)| name)
}
