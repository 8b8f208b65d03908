// Text helpers shared by the engine and any chart client.
use crate::models::{LastValue, TICK_LABEL_FORMAT};
use chrono::NaiveDate;

/// Upper-cased, trimmed ticker.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// True when a normalized symbol is a plain ticker such as "BRK-B", "^GSPC"
/// or "7203.JP": ASCII letters, digits and `.^=-` only, and never "..".
pub fn is_valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && !symbol.contains("..")
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '^' | '=' | '-'))
}

/// Splits free text like "aapl, msft,,NVDA" into normalized symbols, dropping empty entries.
pub fn parse_symbol_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(normalize_symbol)
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn format_tick_label(date: NaiveDate) -> String {
    date.format(TICK_LABEL_FORMAT).to_string()
}

/// Legend label for a moving-average line, e.g. "25D MA".
pub fn moving_average_label(window: u32) -> String {
    format!("{}D MA", window)
}

/// Annotation shown next to the chart title, e.g. "24-01-12 19.00 (+1.00, +5.56%)".
pub fn format_annotation(last: &LastValue) -> String {
    format!(
        "{} {:.2} ({:+.2}, {:+.2}%)",
        format_tick_label(last.date),
        last.close,
        last.change,
        last.percent_change
    )
}
