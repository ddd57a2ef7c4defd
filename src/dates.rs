//! Timestamp helpers.
//!
//! Input timestamps arrive as strings in one of two shapes:
//! `YYYY-MM-DDTHH:MM:SS.mmmZ` or `YYYY-MM-DDTHH:MM:SS`. Display formatting
//! never fails: anything else is shown exactly as received.

use chrono::NaiveDateTime;

/// Accepted input layouts, tried in order.
const INPUT_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.3fZ", "%Y-%m-%dT%H:%M:%S"];

/// Layout used on the page.
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Parse a timestamp in either accepted format.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// `DD/MM/YYYY HH:MM:SS`, or `raw` unchanged when it cannot be parsed.
pub fn format_date(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format(DISPLAY_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

/// `YYYYMMDD.HHMMSSmmm` for the given instant.
pub fn generate_report_id(now: NaiveDateTime) -> String {
    now.format("%Y%m%d.%H%M%S%3f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn formats_millisecond_zulu() {
        assert_eq!(format_date("2024-06-01T10:00:00.500Z"), "01/06/2024 10:00:00");
    }

    #[test]
    fn formats_plain_seconds() {
        assert_eq!(format_date("2024-06-01T10:00:00"), "01/06/2024 10:00:00");
    }

    #[test]
    fn passes_through_garbage() {
        assert_eq!(format_date("not-a-date"), "not-a-date");
        assert_eq!(format_date(""), "");
        // Offsets other than Z are not an accepted shape.
        assert_eq!(
            format_date("2024-06-01T10:00:00.500+02:00"),
            "2024-06-01T10:00:00.500+02:00"
        );
    }

    #[test]
    fn report_id_layout() {
        let now = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_milli_opt(10, 0, 0, 123)
            .unwrap();
        assert_eq!(generate_report_id(now), "20240601.100000123");
    }

    #[test]
    fn report_id_pads_every_component() {
        let now = NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_milli_opt(3, 4, 5, 6)
            .unwrap();
        assert_eq!(generate_report_id(now), "20250102.030405006");
    }
}
