// File: src/model/validate.rs
//! Parsing and validation of raw user input.
//!
//! Every validator takes the raw text collected by the CLI and returns either
//! the parsed value or a tagged [`TaskError`]. None of them print anything.
use crate::error::{TaskError, TaskResult};
use crate::model::item::Priority;
use chrono::{Local, NaiveDate, NaiveDateTime};

/// chrono format of every stored and entered date-time.
pub const DATE_FORMAT: &str = "%d-%m-%Y %H:%M";
/// chrono format of a bare calendar day (range bounds, "today" prefix).
pub const DAY_FORMAT: &str = "%d-%m-%Y";

const DATE_PATTERN: &str = "DD-MM-YYYY HH:MM";
const DATE_EXAMPLE: &str = "25-02-2026 14:30";
const DAY_PATTERN: &str = "DD-MM-YYYY";
const DAY_EXAMPLE: &str = "25-02-2026";

/// chrono accepts unpadded fields and extra year digits, so the shape is
/// checked byte by byte before handing the text over.
fn matches_pattern(text: &str, pattern: &str) -> bool {
    text.len() == pattern.len()
        && text
            .bytes()
            .zip(pattern.bytes())
            .all(|(c, p)| match p {
                b'D' | b'M' | b'Y' | b'H' => c.is_ascii_digit(),
                _ => c == p,
            })
}

fn invalid_date(text: &str) -> TaskError {
    TaskError::InvalidFormat {
        input: text.to_string(),
        expected: DATE_PATTERN,
        example: DATE_EXAMPLE,
    }
}

fn invalid_day(text: &str) -> TaskError {
    TaskError::InvalidFormat {
        input: text.to_string(),
        expected: DAY_PATTERN,
        example: DAY_EXAMPLE,
    }
}

/// Parses `DD-MM-YYYY HH:MM` (24h, zero-padded). Out-of-range calendar or
/// clock values are rejected as well.
pub fn parse_date(text: &str) -> TaskResult<NaiveDateTime> {
    if !matches_pattern(text, DATE_PATTERN) {
        return Err(invalid_date(text));
    }
    NaiveDateTime::parse_from_str(text, DATE_FORMAT).map_err(|_| invalid_date(text))
}

/// Parses a bare `DD-MM-YYYY` day.
pub fn parse_day(text: &str) -> TaskResult<NaiveDate> {
    if !matches_pattern(text, DAY_PATTERN) {
        return Err(invalid_day(text));
    }
    NaiveDate::parse_from_str(text, DAY_FORMAT).map_err(|_| invalid_day(text))
}

pub fn format_date(dt: &NaiveDateTime) -> String {
    dt.format(DATE_FORMAT).to_string()
}

pub fn format_day(day: &NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Current local wall-clock time. Timezones are not modelled.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses the text and requires it to be strictly after the current local time.
pub fn validate_future_date(text: &str) -> TaskResult<NaiveDateTime> {
    validate_future_date_at(text, now())
}

/// Same as [`validate_future_date`] against an explicit reference instant.
pub fn validate_future_date_at(text: &str, now: NaiveDateTime) -> TaskResult<NaiveDateTime> {
    let dt = parse_date(text)?;
    if dt <= now {
        return Err(TaskError::NotInFuture {
            input: text.to_string(),
        });
    }
    Ok(dt)
}

pub fn validate_priority(text: &str) -> TaskResult<Priority> {
    text.trim()
        .parse::<Priority>()
        .map_err(|_| TaskError::InvalidPriority {
            input: text.to_string(),
        })
}

/// Parses both ends of a schedule window and requires `end > start`.
///
/// Unlike the deadline, neither end has to lie in the future.
pub fn validate_time_interval(
    start_text: &str,
    end_text: &str,
) -> TaskResult<(NaiveDateTime, NaiveDateTime)> {
    let start = parse_date(start_text)?;
    let end = parse_date(end_text)?;
    check_interval(start, end)
}

pub(crate) fn check_interval(
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> TaskResult<(NaiveDateTime, NaiveDateTime)> {
    if end <= start {
        return Err(TaskError::InvalidInterval {
            start: format_date(&start),
            end: format_date(&end),
        });
    }
    Ok((start, end))
}

/// Trims the text and rejects it when nothing is left.
pub fn require_text(text: &str, field: &'static str) -> TaskResult<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TaskError::EmptyInput { field });
    }
    Ok(trimmed.to_string())
}
