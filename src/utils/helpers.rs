//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new UUID v4
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%d-%m-%Y %H:%M UTC").to_string()
}

/// Format an amount as Chilean pesos: `$1.200`, no decimals.
pub fn format_price_clp(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{}", rounded.abs() as u64);

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Truncate text to a maximum number of characters with ellipsis
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

/// Split a long message into chunks of at most `max_chars` characters,
/// preferring line boundaries.
pub fn chunk_message(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();

        if current_len + line_len > max_chars && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len > max_chars {
            // A single oversized line is hard-split
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Arrange labels into rows of `columns` buttons
pub fn menu_rows(labels: &[&str], columns: usize) -> Vec<Vec<String>> {
    labels
        .chunks(columns.max(1))
        .map(|row| row.iter().map(|label| label.to_string()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_clp() {
        assert_eq!(format_price_clp(1200.0), "$1.200");
        assert_eq!(format_price_clp(999.0), "$999");
        assert_eq!(format_price_clp(0.0), "$0");
        assert_eq!(format_price_clp(1234567.4), "$1.234.567");
        assert_eq!(format_price_clp(2990.6), "$2.991");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("Huevos", 10), "Huevos");
        assert_eq!(truncate_text("Producto fresco", 8), "Producto...");
        // Multi-byte characters are never split
        assert_eq!(truncate_text("ñandú ñandú", 5), "ñandú...");
    }

    #[test]
    fn test_chunk_message_respects_limit() {
        let text = "línea\n".repeat(100);
        let chunks = chunk_message(&text, 50);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= 50));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_chunk_message_oversized_line() {
        let text = "x".repeat(25);
        let chunks = chunk_message(&text, 10);
        assert_eq!(chunks, vec!["x".repeat(10), "x".repeat(10), "x".repeat(5)]);
    }

    #[test]
    fn test_menu_rows() {
        let rows = menu_rows(&["a", "b", "c"], 2);
        assert_eq!(rows, vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string()]]);
    }
}
