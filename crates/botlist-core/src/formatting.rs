//! Formatting helpers for Telegram HTML replies.

const SUCCESS: &str = "✅";
const FAILURE: &str = "❌";
const HINT: &str = "💭";

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Success line; a trailing period is added when missing.
pub fn success(text: &str) -> String {
    format!("{SUCCESS} {}", with_period(text.trim()))
}

/// Failure line; a trailing period is added when missing.
pub fn failure(text: &str) -> String {
    format!("{FAILURE} {}", with_period(text.trim()))
}

/// Hint asking the user to do something; a trailing period is dropped.
pub fn action_hint(text: &str) -> String {
    let text = text.trim();
    format!("{HINT} {}", text.strip_suffix('.').unwrap_or(text))
}

fn with_period(text: &str) -> String {
    if text.is_empty() || text.ends_with('.') {
        text.to_string()
    } else {
        format!("{text}.")
    }
}
