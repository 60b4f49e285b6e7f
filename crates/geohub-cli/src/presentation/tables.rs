//! Table formatting utilities for CLI output.

use chrono::{DateTime, Utc};

/// Longest resource name shown in tables before truncation.
pub const NAME_WIDTH: usize = 50;

/// Cut `s` to `max_chars` characters, appending "..." when anything was cut.
///
/// # Examples
///
/// ```rust
/// use geohub_cli::presentation::truncate_string;
///
/// assert_eq!(truncate_string("Hello", 10), "Hello");
/// assert_eq!(truncate_string("Hello World", 5), "Hello...");
/// ```
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}...", &s[..cut]),
    }
}

/// Print a horizontal separator line.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Render an optional timestamp as a date, or "unknown".
pub fn format_date(value: Option<&DateTime<Utc>>) -> String {
    value.map_or_else(|| "unknown".to_string(), |dt| dt.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_counts_characters() {
        let long = "é".repeat(60);
        let cut = truncate_string(&long, NAME_WIDTH);
        assert_eq!(cut.chars().count(), NAME_WIDTH + 3);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate_string(&"a".repeat(50), NAME_WIDTH), "a".repeat(50));
    }

    #[test]
    fn dates() {
        let dt = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(format_date(Some(&dt)), "2023-11-14");
        assert_eq!(format_date(None), "unknown");
    }
}
