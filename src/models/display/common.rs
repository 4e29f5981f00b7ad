//! Common display utilities and helpers

use chrono::{DateTime, Utc};

/// Truncate string to max length (in characters) with ellipsis
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format an RFC 3339 timestamp as `YYYY-MM-DD HH:MM` (UTC).
///
/// Empty input becomes `--`; anything unparseable is returned as-is.
pub fn format_timestamp(timestamp: &str) -> String {
    if timestamp.is_empty() {
        return "--".to_string();
    }
    match timestamp.parse::<DateTime<Utc>>() {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

/// `--` for missing or empty values
pub fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "--".to_string(),
    }
}

/// Comma-separated list, `--` when empty
pub fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "--".to_string()
    } else {
        values.join(", ")
    }
}
