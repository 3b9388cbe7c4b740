use std::path::Path;

use abroad_portal::client::HttpPortalClient;
use abroad_portal::config::ApiConfig;
use abroad_portal::error::AppError;
use chrono::{DateTime, NaiveDate, Utc};

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// The instant deadlines are measured against: midnight UTC of `today` when
/// given, otherwise the current time.
pub(crate) fn reference_now(today: Option<NaiveDate>) -> DateTime<Utc> {
    today
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .unwrap_or_else(Utc::now)
}

pub(crate) fn portal_client(config: &ApiConfig) -> Result<HttpPortalClient, AppError> {
    Ok(HttpPortalClient::new(config)?)
}

pub(crate) fn read_letter(path: &Path) -> Result<(String, Vec<u8>), AppError> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok((file_name, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parse_date_trims_and_reports_bad_input() {
        let date = parse_date(" 2026-03-13 ").expect("valid date");
        assert_eq!((date.year(), date.month(), date.day()), (2026, 3, 13));

        let err = parse_date("13/03/2026").expect_err("wrong layout");
        assert!(err.starts_with("failed to parse '13/03/2026'"));
    }

    #[test]
    fn reference_now_pins_to_midnight_utc() {
        let pinned = reference_now(parse_date("2026-03-10").ok());
        assert_eq!(pinned.date_naive(), NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
        assert_eq!(pinned.hour(), 0);
    }

    #[test]
    fn read_letter_keeps_only_the_file_name() {
        let dir = std::env::temp_dir().join(format!("abroad-portal-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("reference.pdf");
        std::fs::write(&path, b"%PDF-1.4").expect("write letter");

        let (name, bytes) = read_letter(&path).expect("reads");
        assert_eq!(name, "reference.pdf");
        assert_eq!(bytes, b"%PDF-1.4".to_vec());

        std::fs::remove_dir_all(&dir).ok();
    }
}
