use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses the timestamp shapes the upstream API emits. Values without an
/// offset are taken as UTC; a bare date is midnight UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}

/// `YYYY-MM-DD` rendering of an account creation time, or the raw value when
/// it cannot be parsed.
pub fn format_member_since(created_at: &str) -> String {
    match parse_timestamp(created_at) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => created_at.to_string(),
    }
}
