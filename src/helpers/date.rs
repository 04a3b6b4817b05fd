//! Date helper functions

use chrono::{NaiveDateTime, TimeZone};

/// Format a date the way the site displays it ("January 5, 2024")
pub fn format_date(date: &NaiveDateTime) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Format a date as `YYYY-MM-DD`
pub fn short_date(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Interpret a wall-clock date in the site timezone and format it as RFC 3339
pub fn date_xml<Tz: TimeZone>(date: &NaiveDateTime, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match tz.from_local_datetime(date).earliest() {
        Some(dt) => dt.to_rfc3339(),
        // A wall time skipped by a DST jump; fall back to reading it as UTC
        None => date.and_utc().to_rfc3339(),
    }
}

/// Parse a front-matter date string in various formats
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim().trim_matches(|c| c == '"' || c == '\'');
    if s.is_empty() {
        return None;
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = chrono::NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // RFC 3339 / ISO 8601 with offset: keep the author's wall-clock time
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDateTime {
        parse_date_string(s).unwrap()
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(&date("2024-01-05")), "January 5, 2024");
        assert_eq!(format_date(&date("2024-11-15 10:30")), "November 15, 2024");
        assert_eq!(short_date(&date("2024/03/09")), "2024-03-09");
    }

    #[test]
    fn test_parse_formats() {
        assert!(parse_date_string("2024-01-15 10:30:00").is_some());
        assert!(parse_date_string("2024-01-15T10:30:00").is_some());
        assert!(parse_date_string("'2024-01-15'").is_some());
        assert_eq!(
            short_date(&date("2024-01-15T23:30:00-07:00")),
            "2024-01-15"
        );
        assert!(parse_date_string("next tuesday").is_none());
        assert!(parse_date_string("").is_none());
    }

    #[test]
    fn test_date_xml() {
        let tz = chrono_tz::America::Phoenix;
        assert_eq!(
            date_xml(&date("2024-06-01 08:00:00"), &tz),
            "2024-06-01T08:00:00-07:00"
        );
    }
}
