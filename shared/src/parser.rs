//! Extracts the meeting location and date span from an agenda document.
//!
//! Agenda documents are freeform markdown; the only structure relied upon are
//! two bullet lines near the top:
//!
//! ```text
//! - **Dates**: 12 - 15 June 2024
//! - **Location**: Remote
//! ```
//!
//! Digits and the month name on the dates line are ASCII only. The month
//! name is matched but not used. Dates are built
//! from the zero-based month index supplied by the locator, so a document
//! whose dates line names a different month is accepted as-is.

use chrono::{Days, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

use crate::error::ParseError;
use crate::models::{Agenda, SourceRepo};

static DATES_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"- \*\*Dates\*\*: ([0-9]+)\s*-\s*([0-9]+)\s*([0-9A-Za-z_]+)\s*([0-9]{4})")
        .expect("dates pattern is valid")
});

static LOCATION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"- \*\*Location\*\*: ([^\r\n]+)").expect("location pattern is valid")
});

/// Raw fields captured from the dates line
#[derive(Debug, Clone, PartialEq, Eq)]
struct DateSpan {
    start_day: u32,
    end_day: u32,
    month_name: String,
    year: i32,
}

/// Parse an agenda document into an [`Agenda`].
///
/// `month_index` is zero-based (see [`crate::zero_based_month`]).
pub fn parse_agenda(
    contents: &str,
    month_index: u32,
    repo: &SourceRepo,
) -> Result<Agenda, ParseError> {
    let location = parse_location(contents)?;
    let span = parse_date_span(contents)?;

    let start_date = calendar_date(span.year, month_index, span.start_day)?;
    let end_date = calendar_date(span.year, month_index, span.end_day)?;

    tracing::debug!(
        "Dates line names month '{}', using month index {}",
        span.month_name,
        month_index
    );
    tracing::info!("Agenda start date: {}", start_date);
    tracing::info!("Agenda end date: {}", end_date);
    tracing::info!("Agenda location: {}", location);

    Ok(Agenda {
        url: repo.document_url(start_date),
        location,
        start_date,
        end_date,
    })
}

fn parse_location(contents: &str) -> Result<String, ParseError> {
    LOCATION_LINE
        .captures(contents)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(ParseError::MissingLocation)
}

fn parse_date_span(contents: &str) -> Result<DateSpan, ParseError> {
    let caps = DATES_LINE
        .captures(contents)
        .ok_or(ParseError::MissingDates)?;

    Ok(DateSpan {
        start_day: parse_number(&caps[1])?,
        end_day: parse_number(&caps[2])?,
        month_name: caps[3].to_string(),
        year: parse_number(&caps[4])?,
    })
}

fn parse_number<T: std::str::FromStr>(digits: &str) -> Result<T, ParseError> {
    digits
        .parse()
        .map_err(|_| ParseError::InvalidNumber(digits.to_string()))
}

/// Build a date from a zero-based month index, letting out-of-range days
/// roll over into the neighbouring month (day 0 is the last day of the
/// previous month, day 31 of a 30-day month is the 1st of the next).
fn calendar_date(year: i32, month_index: u32, day: u32) -> Result<NaiveDate, ParseError> {
    let invalid = || ParseError::InvalidDate {
        year,
        month_index,
        day,
    };

    let first =
        NaiveDate::from_ymd_opt(year, month_index.saturating_add(1), 1).ok_or_else(invalid)?;
    match day {
        0 => first.checked_sub_days(Days::new(1)),
        d => first.checked_add_days(Days::new(u64::from(d - 1))),
    }
    .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JUNE_AGENDA: &str = "# Agenda for the 101st meeting of Ecma TC39\n\
        \n\
        - **Dates**: 12 - 15 June 2024\n\
        - **Times**: 10:00 to 17:00 UTC\n\
        - **Location**: Remote\n\
        - **Reflector Thread**: https://example.com/thread\n";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_parse_well_formed_agenda() {
        let agenda = parse_agenda(JUNE_AGENDA, 5, &SourceRepo::default()).expect("should parse");

        assert_eq!(agenda.start_date, date(2024, 6, 12));
        assert_eq!(agenda.end_date, date(2024, 6, 15));
        assert_eq!(agenda.location, "Remote");
        assert_eq!(
            agenda.url,
            "https://github.com/tc39/agendas/blob/master/2024/06.md"
        );
    }

    #[test]
    fn test_missing_location_fails() {
        let contents = "- **Dates**: 12 - 15 June 2024\n- **Times**: 10:00 UTC\n";
        let result = parse_agenda(contents, 5, &SourceRepo::default());
        assert_eq!(result, Err(ParseError::MissingLocation));
    }

    #[test]
    fn test_missing_dates_fails() {
        let contents = "- **Location**: Tokyo, Japan\n";
        let result = parse_agenda(contents, 5, &SourceRepo::default());
        assert_eq!(result, Err(ParseError::MissingDates));
    }

    #[test]
    fn test_empty_document_reports_location_first() {
        let result = parse_agenda("# TBD\n", 0, &SourceRepo::default());
        assert_eq!(result, Err(ParseError::MissingLocation));
    }

    #[test]
    fn test_dates_without_spaces_around_hyphen() {
        let contents = "- **Dates**: 3-5 October 2023\n- **Location**: Tokyo, Japan\n";
        let agenda = parse_agenda(contents, 9, &SourceRepo::default()).expect("should parse");

        assert_eq!(agenda.start_date, date(2023, 10, 3));
        assert_eq!(agenda.end_date, date(2023, 10, 5));
        assert_eq!(agenda.location, "Tokyo, Japan");
    }

    #[test]
    fn test_location_stops_at_line_end() {
        let contents = "- **Location**: Bergen, Norway\r\n- **Dates**: 1 - 3 May 2025\r\n";
        let agenda = parse_agenda(contents, 4, &SourceRepo::default()).expect("should parse");
        assert_eq!(agenda.location, "Bergen, Norway");
    }

    #[test]
    fn test_month_name_is_not_cross_checked() {
        // The month index wins over whatever month the dates line names
        let contents = "- **Dates**: 12 - 15 June 2024\n- **Location**: Remote\n";
        let agenda = parse_agenda(contents, 6, &SourceRepo::default()).expect("should parse");

        assert_eq!(agenda.start_date, date(2024, 7, 12));
        assert_eq!(
            agenda.url,
            "https://github.com/tc39/agendas/blob/master/2024/07.md"
        );
    }

    #[test]
    fn test_day_past_month_end_rolls_over() {
        let contents = "- **Dates**: 30 - 31 November 2024\n- **Location**: Remote\n";
        let agenda = parse_agenda(contents, 10, &SourceRepo::default()).expect("should parse");

        assert_eq!(agenda.start_date, date(2024, 11, 30));
        assert_eq!(agenda.end_date, date(2024, 12, 1));
    }

    #[test]
    fn test_day_zero_is_last_day_of_previous_month() {
        assert_eq!(calendar_date(2024, 2, 0), Ok(date(2024, 2, 29)));
    }

    #[test]
    fn test_month_index_out_of_range_is_invalid() {
        assert!(matches!(
            calendar_date(2024, 12, 1),
            Err(ParseError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_oversized_day_is_invalid_number() {
        let contents = "- **Dates**: 99999999999 - 1 June 2024\n- **Location**: Remote\n";
        let result = parse_agenda(contents, 5, &SourceRepo::default());
        assert_eq!(
            result,
            Err(ParseError::InvalidNumber("99999999999".to_string()))
        );
    }

    #[test]
    fn test_non_ascii_month_name_is_missing_dates() {
        let contents = "- **Dates**: 12 - 15 Juné 2024\n- **Location**: Remote\n";
        let result = parse_agenda(contents, 5, &SourceRepo::default());
        assert_eq!(result, Err(ParseError::MissingDates));
    }

    #[test]
    fn test_non_ascii_digits_are_missing_dates() {
        let contents = "- **Dates**: \u{661}\u{662} - 15 June 2024\n- **Location**: Remote\n";
        let result = parse_agenda(contents, 5, &SourceRepo::default());
        assert_eq!(result, Err(ParseError::MissingDates));
    }
}
