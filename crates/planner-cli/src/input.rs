//! Parsing of user-entered dates and times.

use chrono::{NaiveDate, NaiveTime};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Parse `YYYY-MM-DD`, ignoring surrounding whitespace.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| format!("invalid date '{s}' (expected YYYY-MM-DD): {e}"))
}

/// Parse `HH:MM`, ignoring surrounding whitespace.
pub fn parse_time(s: &str) -> Result<NaiveTime, String> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .map_err(|e| format!("invalid time '{s}' (expected HH:MM): {e}"))
}
