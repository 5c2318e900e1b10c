//! Lenient parsing of date filter input.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parses a user-supplied date filter, returning its calendar date.
///
/// Accepts ISO dates, ISO date-times (with `T` or space), `MM/DD/YYYY` and
/// RFC 3339. Offsets are ignored: the date is taken as written, never shifted.
/// Returns `None` for anything else.
pub fn parse_filter_date(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
    {
        return Some(date);
    }

    if let Some(date_time) = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(date_time.date());
    }

    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|date_time| date_time.naive_local().date())
}

#[cfg(test)]
mod tests {
    use super::parse_filter_date;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn accepts_supported_shapes() {
        assert_eq!(parse_filter_date("2024-03-02"), Some(ymd(2024, 3, 2)));
        assert_eq!(parse_filter_date(" 2024-03-02 "), Some(ymd(2024, 3, 2)));
        assert_eq!(parse_filter_date("2024-03-02T08:15"), Some(ymd(2024, 3, 2)));
        assert_eq!(parse_filter_date("2024-03-02 08:15:30"), Some(ymd(2024, 3, 2)));
        assert_eq!(parse_filter_date("03/02/2024"), Some(ymd(2024, 3, 2)));
    }

    #[test]
    fn rfc3339_keeps_written_date() {
        assert_eq!(
            parse_filter_date("2024-03-02T23:30:00-05:00"),
            Some(ymd(2024, 3, 2))
        );
        assert_eq!(
            parse_filter_date("2024-03-02T00:30:00+09:00"),
            Some(ymd(2024, 3, 2))
        );
    }

    #[test]
    fn rejects_garbage_and_impossible_dates() {
        assert_eq!(parse_filter_date("not-a-date"), None);
        assert_eq!(parse_filter_date("2024-02-30"), None);
        assert_eq!(parse_filter_date(""), None);
    }

    #[test]
    fn formatted_date_round_trips() {
        let date = parse_filter_date("2024-03-01").unwrap();
        assert_eq!(date.format("%Y-%m-%d").to_string(), "2024-03-01");
    }
}
