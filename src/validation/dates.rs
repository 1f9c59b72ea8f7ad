use chrono::{DateTime, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Inclusive tolerance between a flight date and the matching visa boundary.
pub const DATE_TOLERANCE_MS: i64 = 86_400_000;

lazy_static! {
    static ref NUMERIC_DATE: Regex =
        Regex::new(r"^(\d{1,2})\s*[./-]\s*(\d{1,2})\s*[./-]\s*(\d{2,4})$").unwrap();
}

/// Outcome of comparing flight dates with the visa validity window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateCheck {
    #[serde(rename = "match")]
    pub matches: bool,
    pub message: String,
}

/// Parses the date strings the parsers produce.
///
/// Numeric dates are read day-first and only swapped to month-first when the second
/// component cannot be a month. Two-digit years below 70 land in the 2000s.
pub fn parse_document_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_numeric_date(value))
        .or_else(|| NaiveDate::parse_from_str(value, "%d %b %Y").ok())
        .or_else(|| NaiveDate::parse_from_str(value, "%d %B %Y").ok())?;

    date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc())
}

fn parse_numeric_date(value: &str) -> Option<NaiveDate> {
    let captures = NUMERIC_DATE.captures(value)?;
    let first: u32 = captures[1].parse().ok()?;
    let second: u32 = captures[2].parse().ok()?;
    let year_text = &captures[3];
    let mut year: i32 = year_text.parse().ok()?;
    match year_text.len() {
        2 => year += if year < 70 { 2000 } else { 1900 },
        4 => {}
        _ => return None,
    }

    let (day, month) = if second > 12 && first <= 12 {
        (second, first)
    } else {
        (first, second)
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn within_tolerance(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    (a - b).num_milliseconds().abs() <= DATE_TOLERANCE_MS
}

pub fn format_human(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub struct DateConsistencyChecker;

impl DateConsistencyChecker {
    pub fn check(
        departure: Option<&str>,
        return_date: Option<&str>,
        visa_start: DateTime<Utc>,
        visa_end: DateTime<Utc>,
    ) -> DateCheck {
        // Both legs must be readable before anything is compared
        let (Some(departure), Some(return_date)) = (
            departure.and_then(parse_document_date),
            return_date.and_then(parse_document_date),
        ) else {
            return DateCheck {
                matches: false,
                message: "Flight dates were not detected on the ticket.".to_string(),
            };
        };

        // Departure pairs with the window start, return with the window end
        if within_tolerance(departure, visa_start) && within_tolerance(return_date, visa_end) {
            DateCheck {
                matches: true,
                message: "Flight dates match the visa validity window.".to_string(),
            }
        } else {
            DateCheck {
                matches: false,
                message: format!(
                    "Flight dates ({} to {}) do not match the visa window; expected travel between {} and {}.",
                    format_human(departure),
                    format_human(return_date),
                    format_human(visa_start),
                    format_human(visa_end)
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn parses_supported_formats() {
        let expected = utc(2025, 3, 10);
        assert_eq!(parse_document_date("2025-03-10"), Some(expected));
        assert_eq!(parse_document_date("10/03/2025"), Some(expected));
        assert_eq!(parse_document_date("10.03.25"), Some(expected));
        assert_eq!(parse_document_date("10 - 03 - 2025"), Some(expected));
        assert_eq!(parse_document_date("03/13/2025"), Some(utc(2025, 3, 13)));
        assert_eq!(parse_document_date("10 Mar 2025"), Some(expected));
        assert_eq!(parse_document_date("2025-03-10T00:00:00Z"), Some(expected));
        assert_eq!(parse_document_date("01/02/90"), Some(utc(1990, 2, 1)));
        assert_eq!(parse_document_date("32/13/2025"), None);
        assert_eq!(parse_document_date(""), None);
    }

    #[test]
    fn tolerance_boundary_is_inclusive() {
        let start = utc(2025, 3, 10);
        assert!(within_tolerance(start + Duration::milliseconds(86_400_000), start));
        assert!(within_tolerance(start - Duration::milliseconds(86_400_000), start));
        assert!(!within_tolerance(start + Duration::milliseconds(86_400_001), start));
    }

    #[test]
    fn check_uses_timestamps_at_millisecond_precision() {
        let start = utc(2025, 3, 10);
        let end = utc(2025, 3, 20);

        let exact = DateConsistencyChecker::check(
            Some("2025-03-11T00:00:00.000Z"),
            Some("2025-03-19T00:00:00Z"),
            start,
            end,
        );
        assert!(exact.matches);

        let over = DateConsistencyChecker::check(
            Some("2025-03-11T00:00:00.001Z"),
            Some("2025-03-20"),
            start,
            end,
        );
        assert!(!over.matches);
        assert!(over.message.contains("Mar 10, 2025"));
        assert!(over.message.contains("Mar 20, 2025"));
    }

    #[test]
    fn missing_dates_are_not_detected() {
        let check =
            DateConsistencyChecker::check(Some("10/03/2025"), None, utc(2025, 3, 10), utc(2025, 3, 20));
        assert!(!check.matches);
        assert!(check.message.contains("not detected"));

        let unreadable = DateConsistencyChecker::check(
            Some("soon"),
            Some("later"),
            utc(2025, 3, 10),
            utc(2025, 3, 20),
        );
        assert!(!unreadable.matches);
    }
}
