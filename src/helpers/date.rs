//! Date helper functions

use chrono::NaiveDate;

/// Format a `YYYY-MM-DD` date string for display.
///
/// Falls back to the raw string when it does not parse as a calendar date,
/// so a malformed date never renders as an error message.
pub fn display_date(date: &str, format: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format(format).to_string(),
        Err(_) => date.to_string(),
    }
}

/// English month name for a 1-based calendar month
pub fn month_name(month: u32) -> Option<&'static str> {
    const MONTHS: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    MONTHS.get(month.checked_sub(1)? as usize).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("2024-03-05", "%B %-d, %Y"), "March 5, 2024");
        assert_eq!(display_date("2024-11-20", "%Y/%m/%d"), "2024/11/20");
    }

    #[test]
    fn test_display_date_fallback() {
        assert_eq!(display_date("TBD", "%B %-d, %Y"), "TBD");
        assert_eq!(display_date("2024-13-40", "%B %-d, %Y"), "2024-13-40");
        assert_eq!(display_date("", "%B %-d, %Y"), "");
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }
}
