//! Display helpers for amounts and dates.

use chrono::{DateTime, Utc};

/// Format an amount as naira with thousands separators, e.g. `₦25,200`.
///
/// Whole amounts print without decimals; fractional amounts keep two.
pub fn naira(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let mut out = String::new();
    if negative && cents > 0 {
        out.push('-');
    }
    out.push('₦');
    out.push_str(&group_thousands(whole));
    if fraction > 0 {
        out.push_str(&format!(".{:02}", fraction));
    }
    out
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Calendar date, e.g. `2024-03-07`
pub fn date(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Date and minute, e.g. `2024-03-07 14:05`
pub fn date_time(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}
