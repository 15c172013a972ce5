/// Tagged callback actions carried by inline buttons
pub mod callback_data;
/// Command parsing and per-command screens
pub mod commands;
/// Update routing: commands, callbacks and plain text
pub mod handlers;
/// Reply and inline keyboards
pub mod keyboards;
/// Per-user pending comment state
pub mod session;
