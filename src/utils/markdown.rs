//! Helpers for Telegram MarkdownV2 text.
//!
//! Every screen the bot renders is sent with `ParseMode::MarkdownV2`, so any
//! user-provided or literal text must go through [`escape_markdown`] first.

/// Escapes all characters that MarkdownV2 treats as markup.
///
/// # Example
/// ```
/// use auditory_status_bot::utils::markdown::escape_markdown;
///
/// let escaped = escape_markdown("G3.56 (main hall)");
/// assert_eq!(escaped, "G3\\.56 \\(main hall\\)");
/// ```
pub fn escape_markdown(text: &str) -> String {
    const SPECIAL: &[char] = &[
        '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
        '\\',
    ];

    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escaped text wrapped in bold markers.
pub fn bold(text: &str) -> String {
    format!("*{}*", escape_markdown(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_auditory_labels() {
        assert_eq!(escape_markdown("Г3.56"), "Г3\\.56");
        assert_eq!(escape_markdown("Лекционный зал 1"), "Лекционный зал 1");
    }

    #[test]
    fn test_escape_special_symbols() {
        assert_eq!(escape_markdown("[link](url)"), "\\[link\\]\\(url\\)");
        assert_eq!(escape_markdown("a_b*c~d`e"), "a\\_b\\*c\\~d\\`e");
        assert_eq!(escape_markdown("# - + = | { } > !"), "\\# \\- \\+ \\= \\| \\{ \\} \\> \\!");
        assert_eq!(escape_markdown("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_escape_plain_text_untouched() {
        assert_eq!(escape_markdown(""), "");
        assert_eq!(escape_markdown("Проектор моргает"), "Проектор моргает");
    }

    #[test]
    fn test_bold_escapes_content() {
        assert_eq!(bold("19.10 14:30"), "*19\\.10 14:30*");
    }
}
