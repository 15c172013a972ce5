/// Canonical/display auditory name table
pub mod auditory_names;
/// Naive local timestamps and event time formatting
pub mod datetime;
/// Reply helpers with consistent emoji prefixes
pub mod feedback;
/// Prefixed log lines for commands, database and notifications
pub mod logging;
/// Telegram MarkdownV2 escaping
pub mod markdown;
/// Cyrillic to Latin transliteration
pub mod translit;
/// Command argument parsing and input validation
pub mod validation;
