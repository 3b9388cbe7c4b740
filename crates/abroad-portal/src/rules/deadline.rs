use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

/// How loudly a deadline should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Presentation data for a single deadline field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadlineIndicator {
    pub severity: Severity,
    pub message: String,
    pub formatted_date: String,
    pub days_remaining: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a recognizable date")]
pub struct ParseError {
    pub value: String,
}

const URGENT_WINDOW_DAYS: i64 = 7;
const WARNING_WINDOW_DAYS: i64 = 14;

/// Parse an API date (`YYYY-MM-DD` or RFC 3339) to its UTC calendar day.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ParseError> {
    parse_instant(raw).map(|instant| instant.date_naive())
}

/// Parse an API date to an instant. Date-only values are taken as UTC midnight.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, ParseError> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|_| ParseError {
            value: raw.to_string(),
        })
}

/// Classify a raw deadline string against `now`.
pub fn classify(raw: &str, now: DateTime<Utc>) -> Result<DeadlineIndicator, ParseError> {
    parse_date(raw).map(|deadline| classify_date(deadline, now))
}

/// Classify a deadline day against `now`.
///
/// Days remaining count whole UTC calendar days, so a deadline later today
/// has zero days left and yesterday's deadline has passed.
pub fn classify_date(deadline: NaiveDate, now: DateTime<Utc>) -> DeadlineIndicator {
    let days_remaining = deadline
        .signed_duration_since(now.date_naive())
        .num_days();

    let (severity, message) = if days_remaining < 0 {
        (Severity::Error, "Deadline passed".to_string())
    } else {
        let severity = match days_remaining {
            0..=URGENT_WINDOW_DAYS => Severity::Error,
            _ if days_remaining <= WARNING_WINDOW_DAYS => Severity::Warning,
            _ => Severity::Info,
        };
        (severity, format!("{days_remaining} days left"))
    };

    DeadlineIndicator {
        severity,
        message,
        formatted_date: deadline.format("%B %-d, %Y").to_string(),
        days_remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 15, 30, 0)
            .single()
            .expect("valid instant")
    }

    fn in_days(days: i64) -> NaiveDate {
        now().date_naive() + Duration::days(days)
    }

    #[test]
    fn passed_deadlines_are_errors() {
        for days in [-1, -30, -400] {
            let indicator = classify_date(in_days(days), now());
            assert_eq!(indicator.severity, Severity::Error);
            assert_eq!(indicator.message, "Deadline passed");
            assert_eq!(indicator.days_remaining, days);
        }
    }

    #[test]
    fn tier_boundaries() {
        let cases = [
            (0, Severity::Error),
            (7, Severity::Error),
            (8, Severity::Warning),
            (14, Severity::Warning),
            (15, Severity::Info),
            (90, Severity::Info),
        ];
        for (days, expected) in cases {
            let indicator = classify_date(in_days(days), now());
            assert_eq!(indicator.severity, expected, "{days} days out");
            assert_eq!(indicator.message, format!("{days} days left"));
        }
    }

    #[test]
    fn three_days_out_reads_as_urgent() {
        let indicator = classify("2026-03-13", now()).expect("date parses");
        assert_eq!(indicator.message, "3 days left");
        assert_eq!(indicator.severity, Severity::Error);
        assert_eq!(indicator.formatted_date, "March 13, 2026");
    }

    #[test]
    fn rfc3339_deadlines_use_their_utc_day() {
        let indicator = classify("2026-03-12T01:00:00+05:00", now()).expect("date parses");
        assert_eq!(indicator.days_remaining, 1);
    }

    #[test]
    fn unparseable_dates_are_rejected() {
        let err = classify("next tuesday", now()).expect_err("garbage rejected");
        assert_eq!(err.value, "next tuesday");
        assert!(classify("", now()).is_err());
        assert!(classify("2026-02-30", now()).is_err());
    }
}
