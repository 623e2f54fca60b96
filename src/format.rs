//! Display formatting for raw benefit fields.
//!
//! Every formatter is total: absent input maps to the `"-"` placeholder so
//! that "unknown" is visually distinct from "zero balance" on screen and in
//! the persisted row.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

/// Placeholder rendered for absent, empty or unrecognized source values.
pub const PLACEHOLDER: &str = "-";

/// Rendered when a date string is present but cannot be interpreted.
///
/// The upstream API occasionally returns garbage in date fields; the original
/// front-end surfaced the browser's "Invalid Date" string in that case. Kept
/// as an explicit marker instead of silently swallowing the value.
pub const INVALID_DATE: &str = "Invalid Date";

/// Parses an 8-digit `DDMMYYYY` string into a calendar date.
fn parse_ddmmyyyy(raw: &str) -> Option<NaiveDate> {
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let day: u32 = raw[0..2].parse().ok()?;
    let month: u32 = raw[2..4].parse().ok()?;
    let year: i32 = raw[4..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Formats a date field for display as `DD/MM/YYYY`.
///
/// 8-character input is assumed to be `DDMMYYYY` and is sliced positionally
/// without calendar validation, matching the upstream contract. Anything else
/// is parsed as an ISO-ish date; unparseable input yields [`INVALID_DATE`].
pub fn format_date(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return PLACEHOLDER.to_string();
    };
    if raw.is_empty() {
        return PLACEHOLDER.to_string();
    }
    if raw.len() == 8 && raw.is_ascii() {
        return format!("{}/{}/{}", &raw[0..2], &raw[2..4], &raw[4..8]);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%d/%m/%Y").to_string();
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return instant.date_naive().format("%d/%m/%Y").to_string();
    }
    INVALID_DATE.to_string()
}

/// Formats a timestamp field for display as `DD/MM/YYYY HH:MM:SS`.
///
/// The input instant is interpreted as UTC.
pub fn format_date_time(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return PLACEHOLDER.to_string();
    };
    if raw.is_empty() {
        return PLACEHOLDER.to_string();
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return instant
            .with_timezone(&Utc)
            .format("%d/%m/%Y %H:%M:%S")
            .to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return naive.format("%d/%m/%Y %H:%M:%S").to_string();
        }
    }
    INVALID_DATE.to_string()
}

/// Formats a monetary amount in the BRL convention: `R$ 1.234,50`.
pub fn format_currency(value: Option<f64>) -> String {
    let Some(value) = value else {
        return PLACEHOLDER.to_string();
    };
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    // pt-BR convention puts the sign before the currency symbol.
    format!(
        "{}R$ {},{:02}",
        if negative { "-" } else { "" },
        grouped,
        frac
    )
}

/// Computes a whole-year age from a `DDMMYYYY` birth date against `today`.
///
/// The age is decremented by one when the birthday has not yet been reached
/// in the current year. Anything other than a valid 8-digit date yields the
/// placeholder.
pub fn calculate_age_at(birth_date: Option<&str>, today: NaiveDate) -> String {
    let Some(birth) = birth_date.and_then(parse_ddmmyyyy) else {
        return PLACEHOLDER.to_string();
    };
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age.to_string()
}

/// [`calculate_age_at`] against the current UTC date.
pub fn calculate_age(birth_date: Option<&str>) -> String {
    calculate_age_at(birth_date, Utc::now().date_naive())
}
