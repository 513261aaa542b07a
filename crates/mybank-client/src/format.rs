//! Display helpers for amounts and timestamps.

use time::macros::format_description;
use time::{Date, PrimitiveDateTime};

/// Groups the whole-number part of `value` with thousands separators.
///
/// Rounds half away from zero, so `1000000.5` renders as `1,000,001`.
pub fn format_number(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let grouped = group_thousands(&digits);
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Formats a KRW amount, e.g. `₩1,000,000`.
pub fn format_currency(value: f64) -> String {
    let number = format_number(value);
    match number.strip_prefix('-') {
        Some(abs) => format!("-₩{abs}"),
        None => format!("₩{number}"),
    }
}

/// Percentage share of `part` in `total`, rounded to a whole percent.
/// A zero total is treated as 1 so the share is still finite.
pub fn share_percent(part: f64, total: f64) -> String {
    let total = if total.abs() < f64::EPSILON { 1.0 } else { total };
    format!("{:.0}", part / total * 100.0)
}

/// Renders a server timestamp (`2024-01-15T10:30:00[.fff]`) as
/// `2024-01-15 10:30`. Unparseable input is returned unchanged.
pub fn format_date_time(raw: &str) -> String {
    let input = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    let output = format_description!("[year]-[month]-[day] [hour]:[minute]");
    raw.get(..19)
        .and_then(|prefix| PrimitiveDateTime::parse(prefix, input).ok())
        .and_then(|dt| dt.format(output).ok())
        .unwrap_or_else(|| raw.to_string())
}

/// Renders the date part of a server timestamp as `2024-01-15`.
pub fn format_date(raw: &str) -> String {
    let input = format_description!("[year]-[month]-[day]");
    raw.get(..10)
        .and_then(|prefix| Date::parse(prefix, input).ok())
        .and_then(|date| date.format(input).ok())
        .unwrap_or_else(|| raw.to_string())
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
