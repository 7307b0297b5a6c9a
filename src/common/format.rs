use colored::*;

use crate::cleaner::report::RemovalResult;

/// Format duration in human-readable form
pub fn format_duration(secs: f64) -> String {
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{}m {:.0}s", mins, remaining)
    }
}

/// Format action count with appropriate plural
pub fn format_count(count: usize) -> String {
    if count == 1 {
        "1 action".to_string()
    } else {
        format!("{} actions", count)
    }
}

/// Colorize a removal outcome
pub fn format_result(result: &RemovalResult) -> ColoredString {
    match result {
        RemovalResult::Success => "ok".green(),
        RemovalResult::Failure { .. } => "failed".red().bold(),
    }
}

/// Format a list of identifiers for log lines
pub fn format_list<S: AsRef<str>>(items: &[S]) -> String {
    let joined: Vec<&str> = items
        .iter()
        .map(|s| s.as_ref())
        .filter(|s| !s.is_empty())
        .collect();
    format!("[{}]", joined.join(", "))
}

/// Truncate a string to max length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
