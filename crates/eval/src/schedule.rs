//! Calendar arithmetic for upgrade start dates.

use serde::Serializer;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

use crate::error::ClassifyError;

const YMD: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<Date, ClassifyError> {
    Date::parse(input, YMD).map_err(|source| ClassifyError::DateParse {
        input: input.to_string(),
        source,
    })
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: Date) -> String {
    date.format(YMD).unwrap_or_default()
}

/// The day an upgrade takes effect: the day after the current membership ends.
pub fn start_after(end_date: &str) -> Result<Date, ClassifyError> {
    let end = parse_date(end_date)?;
    end.next_day().ok_or_else(|| ClassifyError::DateOutOfRange {
        input: end_date.to_string(),
    })
}

pub(crate) fn serialize_optional_date<S: Serializer>(
    date: &Option<Date>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(date) => serializer.serialize_str(&format_date(*date)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_day_crosses_year_boundary() {
        let start = start_after("2025-12-31").unwrap();
        assert_eq!(format_date(start), "2026-01-01");
    }

    #[test]
    fn next_day_handles_leap_february() {
        assert_eq!(format_date(start_after("2024-02-28").unwrap()), "2024-02-29");
        assert_eq!(format_date(start_after("2025-02-28").unwrap()), "2025-03-01");
    }

    #[test]
    fn rejects_non_calendar_dates() {
        for input in ["2025-02-30", "31.12.2025", "2025-1-5", "", "2025-12-31T00:00:00"] {
            let err = start_after(input).unwrap_err();
            assert!(
                matches!(err, ClassifyError::DateParse { .. }),
                "expected parse error for {input:?}"
            );
        }
    }

    #[test]
    fn last_representable_day_has_no_successor() {
        let err = start_after("9999-12-31").unwrap_err();
        assert!(matches!(err, ClassifyError::DateOutOfRange { .. }));
    }

    #[test]
    fn formats_with_zero_padding() {
        let date = parse_date("2026-03-07").unwrap();
        assert_eq!(format_date(date), "2026-03-07");
    }
}
