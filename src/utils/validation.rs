use anyhow::{anyhow, Result};

/// Longest comment accepted for a status change.
pub const MAX_COMMENT_LEN: usize = 500;

/// Arguments of `/status <auditory> <status> [comment]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusArgs {
    pub auditory: String,
    pub status: String,
    pub comment: Option<String>,
}

pub const STATUS_USAGE: &str = "Использование: /status <аудитория> <статус> [комментарий]\n\n\
Статусы: green, yellow, red\n\
Пример: /status 118 green\n\
Пример: /status G3.56 yellow Проектор моргает";

/// Splits the text after `/status` into auditory, status and optional comment.
///
/// The comment is everything after the status word, whitespace preserved
/// inside it.
pub fn parse_status_args(args: &str) -> Result<StatusArgs> {
    let args = args.trim();
    let (auditory, rest) = split_word(args);
    let (status, comment) = split_word(rest);

    if auditory.is_empty() || status.is_empty() {
        return Err(anyhow!("Auditory and status are required"));
    }

    let comment = if comment.is_empty() {
        None
    } else {
        Some(validate_comment(comment)?)
    };

    Ok(StatusArgs {
        auditory: auditory.to_string(),
        status: status.to_string(),
        comment,
    })
}

fn split_word(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (text, ""),
    }
}

/// Trims a free-text comment and enforces its length limit.
pub fn validate_comment(comment: &str) -> Result<String> {
    let comment = comment.trim();

    if comment.is_empty() {
        return Err(anyhow!("Comment cannot be empty"));
    }

    if comment.chars().count() > MAX_COMMENT_LEN {
        return Err(anyhow!(
            "Comment cannot be longer than {} characters",
            MAX_COMMENT_LEN
        ));
    }

    Ok(comment.to_string())
}
