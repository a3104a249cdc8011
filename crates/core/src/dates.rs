use chrono::NaiveDate;

/// The only accepted input format for explicit dates.
pub const INPUT_FORMAT: &str = "%d/%m/%Y";

/// Parses a fixed-width `DD/MM/YYYY` date.
///
/// chrono alone is more lenient than the contract allows (`1/2/2025` and
/// `12/07/25` both parse with `%d/%m/%Y`), so the width is pinned to exactly
/// two-digit day, two-digit month and four-digit year before parsing.
/// Calendar validity (month 13, day 32) is left to chrono.
pub fn parse_ddmmyyyy(input: &str) -> Option<NaiveDate> {
    if input.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(input, INPUT_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn normalizes_to_iso_order() {
        let parsed = parse_ddmmyyyy("12/07/2025").unwrap();
        assert_eq!(parsed, date(2025, 7, 12));
        assert_eq!(parsed.to_string(), "2025-07-12");
    }

    #[test]
    fn rejects_abbreviated_fields() {
        assert!(parse_ddmmyyyy("1/2/2025").is_none());
        assert!(parse_ddmmyyyy("12/7/2025").is_none());
        assert!(parse_ddmmyyyy("12/07/25").is_none());
    }

    #[test]
    fn rejects_alternate_separators() {
        assert!(parse_ddmmyyyy("12-07-2025").is_none());
        assert!(parse_ddmmyyyy("12.07.2025").is_none());
    }

    #[test]
    fn rejects_impossible_calendar_dates() {
        assert!(parse_ddmmyyyy("32/01/2025").is_none());
        assert!(parse_ddmmyyyy("01/13/2025").is_none());
        assert!(parse_ddmmyyyy("29/02/2025").is_none());
    }

    #[test]
    fn accepts_leap_day() {
        assert_eq!(parse_ddmmyyyy("29/02/2024").unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn rejects_free_text() {
        assert!(parse_ddmmyyyy("ayer").is_none());
        assert!(parse_ddmmyyyy("").is_none());
    }
}
