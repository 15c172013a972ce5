use anyhow::{anyhow, Result};
use std::env;
use std::str::FromStr;
use crate::services::notifier::BroadcastTarget;

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub database_url: String,
    pub group_chat_id: Option<i64>,
    pub topic_id: Option<i32>,
    pub log_level: String,
    pub http_port: u16,
    pub google_calendar_id: String,
    pub google_api_token: Option<String>,
    pub sync_interval_hours: u64,
    pub sync_window_days: i64,
}

/// Value of a variable, with unset and blank treated the same.
fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: FromStr>(name: &str) -> Result<Option<T>> {
    non_empty(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| anyhow!("Invalid {name}: '{value}'"))
        })
        .transpose()
}

fn parse_or<T: FromStr>(name: &str, default: T) -> Result<T> {
    Ok(parse_optional(name)?.unwrap_or(default))
}

impl Config {
    /// Reads the process environment. Every missing required variable is
    /// reported in a single error.
    pub fn from_env() -> Result<Self> {
        let telegram_bot_token = non_empty("TELEGRAM_BOT_TOKEN");
        let database_url = non_empty("DATABASE_URL");

        let (telegram_bot_token, database_url) = match (telegram_bot_token, database_url) {
            (Some(token), Some(url)) => (token, url),
            (token, url) => {
                let missing: Vec<&str> = [
                    token.is_none().then_some("TELEGRAM_BOT_TOKEN"),
                    url.is_none().then_some("DATABASE_URL"),
                ]
                .into_iter()
                .flatten()
                .collect();
                return Err(anyhow!(
                    "Missing required environment variables: {}",
                    missing.join(", ")
                ));
            }
        };

        let sync_interval_hours = parse_or("SYNC_INTERVAL_HOURS", 6)?;
        if sync_interval_hours == 0 {
            return Err(anyhow!("Invalid SYNC_INTERVAL_HOURS: must be at least 1"));
        }
        let sync_window_days = parse_or("SYNC_WINDOW_DAYS", 30)?;
        if sync_window_days <= 0 {
            return Err(anyhow!("Invalid SYNC_WINDOW_DAYS: must be at least 1"));
        }

        Ok(Config {
            telegram_bot_token,
            database_url,
            group_chat_id: parse_optional("GROUP_CHAT_ID")?,
            topic_id: parse_optional("TOPIC_ID")?,
            log_level: non_empty("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            http_port: parse_or("HTTP_PORT", 3000)?,
            google_calendar_id: non_empty("GOOGLE_CALENDAR_ID").unwrap_or_else(|| "primary".to_string()),
            google_api_token: non_empty("GOOGLE_API_TOKEN"),
            sync_interval_hours,
            sync_window_days,
        })
    }

    /// Where status changes are announced; `None` disables broadcasting.
    pub fn broadcast_target(&self) -> Option<BroadcastTarget> {
        self.group_chat_id.map(|chat_id| BroadcastTarget {
            chat_id,
            topic_id: self.topic_id,
        })
    }

    pub fn sync_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sync_interval_hours * 3600)
    }
}
