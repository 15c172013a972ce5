/// Staff assignment workflow
pub mod assignment;
/// External calendar client
pub mod calendar;
/// Scheduled calendar mirroring
pub mod calendar_sync;
/// HTTP health endpoints
pub mod health;
/// Best-effort outbound messages
pub mod notifier;
/// Status change workflow
pub mod status;
