use crate::error::{TaskError, TaskResult};
use chrono::{Local, NaiveDate};

/// Storage and display format for task dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's date in the local timezone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The calendar day before `date` (None only at the minimum date)
pub fn yesterday(date: NaiveDate) -> Option<NaiveDate> {
    date.pred_opt()
}

/// The calendar day after `date` (None only at the maximum date)
pub fn tomorrow(date: NaiveDate) -> Option<NaiveDate> {
    date.succ_opt()
}

/// Parse a zero-padded "YYYY-MM-DD" date
pub fn parse_date(input: &str) -> TaskResult<NaiveDate> {
    let input = input.trim();
    // chrono accepts unpadded fields, the stored form does not
    if input.len() != 10 {
        return Err(TaskError::Validation(format!(
            "date must be YYYY-MM-DD, got '{}'",
            input
        )));
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|e| {
        TaskError::Validation(format!("date must be YYYY-MM-DD, got '{}': {}", input, e))
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yesterday_crosses_month_and_year() {
        let d = parse_date("2024-03-01").unwrap();
        assert_eq!(yesterday(d), Some(parse_date("2024-02-29").unwrap()));

        let d = parse_date("2025-01-01").unwrap();
        assert_eq!(yesterday(d), Some(parse_date("2024-12-31").unwrap()));
    }

    #[test]
    fn test_tomorrow_crosses_year() {
        let d = parse_date("2023-12-31").unwrap();
        assert_eq!(tomorrow(d), Some(parse_date("2024-01-01").unwrap()));
    }

    #[test]
    fn test_parse_date_rejects_bad_input() {
        assert!(matches!(parse_date("2024-1-1"), Err(TaskError::Validation(_))));
        assert!(matches!(parse_date("2024-02-30"), Err(TaskError::Validation(_))));
        assert!(matches!(parse_date("tomorrow"), Err(TaskError::Validation(_))));
        assert!(matches!(parse_date(""), Err(TaskError::Validation(_))));
    }

    #[test]
    fn test_format_matches_lexicographic_order() {
        let a = parse_date("2024-09-30").unwrap();
        let b = parse_date("2024-10-01").unwrap();
        assert!(a < b);
        assert!(format_date(a) < format_date(b));
        assert_eq!(format_date(a), "2024-09-30");
    }
}
