//! Free-form date parsing and fixed-layout formatting.
//!
//! # Parsing
//!
//! [`parse_date_string`] accepts loosely formatted input from forms, CSVs and
//! APIs:
//!
//! 1. Strict ISO-8601 first (see [`iso8601`](crate::iso8601)); a match is
//!    returned immediately
//! 2. Otherwise each entry of [`FALLBACK_PATTERNS`] is tried in order and the
//!    first one that yields a real calendar date wins. Order matters: several
//!    patterns can match the same digits
//! 3. Otherwise the failure is handed to the thread's
//!    [reporter](crate::reporter) and returned as `InvalidArgumentError`
//!
//! Fallback patterns that omit the day (`MMM yyyy`) take it from a reference
//! date, today's local date unless one is passed to
//! [`parse_date_string_with_reference`]. The same reference anchors the
//! two-digit year window of `MM/dd/yy`.
//!
//! # Formatting
//!
//! [`format_to_string`] renders a [`DateLike`] (a date value or a string to
//! parse first) with a [`DatePattern`]. The exact empty string formats to the
//! empty string without touching the parser.
//!
//! ```rust
//! use helper_kit::dates;
//!
//! assert_eq!(dates::format_iso_date("2025/10/20").unwrap(), "2025-10-20");
//! assert_eq!(dates::format_us_locale_date("Jan 5, 2023").unwrap(), "01/05/2023");
//! assert_eq!(dates::format_medium_date("2023-01-01").unwrap(), "Jan 1, 2023");
//! assert_eq!(dates::format_to_string("", "not a pattern").unwrap(), "");
//! ```

use crate::date_pattern::DatePattern;
use crate::iso8601::parse_iso8601;
use crate::reporter::{self, ReportLevel};
use crate::{Cause, Exception, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use std::borrow::Cow;
use std::sync::OnceLock;

/// `yyyy-MM-dd`, e.g. `2023-12-31`.
pub const ISO_DATE_FORMAT: &str = "yyyy-MM-dd";

/// `MM/dd/yyyy`, e.g. `12/31/2023`.
pub const US_LOCALE_DATE_FORMAT: &str = "MM/dd/yyyy";

/// `MM/dd/yyyy HH:mm:ss`, e.g. `12/31/2023 23:59:59`.
pub const US_LOCALE_TIME_FORMAT: &str = "MM/dd/yyyy HH:mm:ss";

/// `MMM d, yyyy`, e.g. `Jan 1, 2023`.
pub const MEDIUM_DATE_FORMAT: &str = "MMM d, yyyy";

/// Patterns tried after the ISO attempt, in order.
pub static FALLBACK_PATTERNS: [&str; 8] = [
    "MM/dd/yy",
    US_LOCALE_DATE_FORMAT,
    ISO_DATE_FORMAT,
    "yyyy/MM/dd",
    "M/d/yyyy",
    MEDIUM_DATE_FORMAT,
    "MMM yyyy",
    US_LOCALE_TIME_FORMAT,
];

fn fallback_patterns() -> &'static [DatePattern] {
    static COMPILED: OnceLock<Vec<DatePattern>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        FALLBACK_PATTERNS
            .iter()
            .filter_map(|pattern| DatePattern::compile(pattern).ok())
            .collect()
    })
}

/// A value to format: an already valid date, or text to parse first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateLike<'a> {
    /// A validated date-time.
    Date(NaiveDateTime),
    /// Raw text, parsed with [`parse_date_string`] when formatted.
    Text(Cow<'a, str>),
}

impl DateLike<'_> {
    fn resolve(&self) -> Result<Option<NaiveDateTime>> {
        match self {
            DateLike::Date(value) => Ok(Some(*value)),
            DateLike::Text(text) if text.is_empty() => Ok(None),
            DateLike::Text(text) => parse_date_string(text).map(Some),
        }
    }
}

impl From<NaiveDateTime> for DateLike<'_> {
    fn from(value: NaiveDateTime) -> Self {
        DateLike::Date(value)
    }
}

impl From<NaiveDate> for DateLike<'_> {
    fn from(value: NaiveDate) -> Self {
        DateLike::Date(value.and_time(NaiveTime::MIN))
    }
}

impl<'a> From<&'a str> for DateLike<'a> {
    fn from(value: &'a str) -> Self {
        DateLike::Text(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for DateLike<'a> {
    fn from(value: &'a String) -> Self {
        DateLike::Text(Cow::Borrowed(value.as_str()))
    }
}

impl From<String> for DateLike<'_> {
    fn from(value: String) -> Self {
        DateLike::Text(Cow::Owned(value))
    }
}

#[cfg(feature = "json")]
impl<'a> TryFrom<&'a serde_json::Value> for DateLike<'a> {
    type Error = Exception;

    /// Only JSON strings are date-like; every other shape is rejected with
    /// `InvalidArgumentError` naming what was received.
    fn try_from(value: &'a serde_json::Value) -> Result<Self> {
        use serde_json::Value;

        let received = match value {
            Value::String(text) => return Ok(DateLike::Text(Cow::Borrowed(text.as_str()))),
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        };
        Err(Exception::invalid_argument(format!(
            "Invalid date source: expected a date or a string, received {received}"
        )))
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse free-form date text against today's local date.
///
/// # Errors
///
/// `InvalidArgumentError` when neither the ISO reader nor any fallback
/// pattern accepts the input. The failure is reported to the current
/// thread's reporter before it is returned.
pub fn parse_date_string(input: &str) -> Result<NaiveDateTime> {
    parse_date_string_with_reference(input, Local::now().date_naive())
}

/// [`parse_date_string`] for input that may be absent.
///
/// ```rust
/// # use helper_kit::{dates, ExceptionKind};
/// let err = dates::parse_optional_date_string(None).unwrap_err();
/// assert_eq!(err.kind(), ExceptionKind::InvalidArgumentError);
/// assert_eq!(err.message(), "Input cannot be null or undefined");
/// ```
pub fn parse_optional_date_string(input: Option<&str>) -> Result<NaiveDateTime> {
    match input {
        Some(input) => parse_date_string(input),
        None => Err(Exception::invalid_argument("Input cannot be null or undefined")),
    }
}

/// [`parse_date_string`] with an explicit reference date for missing
/// components and the two-digit year window.
///
/// ```rust
/// # use chrono::NaiveDate;
/// # use helper_kit::dates;
/// let reference = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
/// let parsed = dates::parse_date_string_with_reference("Oct 2019", reference).unwrap();
/// assert_eq!(parsed.to_string(), "2019-10-15 00:00:00");
/// ```
pub fn parse_date_string_with_reference(input: &str, reference: NaiveDate) -> Result<NaiveDateTime> {
    if let Some(parsed) = parse_iso8601(input) {
        return Ok(parsed);
    }

    for pattern in fallback_patterns() {
        if let Ok(Some(parsed)) = pattern.parse(input, reference) {
            return Ok(parsed);
        }
    }

    let err = Exception::invalid_argument(format!(
        "Invalid Date: unable to parse date string - {input}"
    ));
    reporter::report_exception(&err, ReportLevel::Error, &[("input", input)]);
    Err(err)
}

/// Parse `input` with a single known pattern.
///
/// No ISO attempt, no fallbacks and no reporting.
///
/// # Errors
///
/// `InvalidArgumentError` when the pattern is invalid or cannot parse (the
/// pattern fault is the cause), or when the input does not match.
pub fn parse_date_with_pattern(input: &str, pattern: &str, reference: NaiveDate) -> Result<NaiveDateTime> {
    let compiled = DatePattern::compile(pattern)
        .map_err(|fault| unparseable_pattern(input, pattern).with_cause(Cause::error(fault)))?;
    match compiled.parse(input, reference) {
        Ok(Some(parsed)) => Ok(parsed),
        Ok(None) => Err(Exception::invalid_argument(format!(
            "Invalid Date: unable to parse date string - {input} with pattern {pattern}"
        ))),
        Err(fault) => Err(unparseable_pattern(input, pattern).with_cause(Cause::error(fault))),
    }
}

// ============================================================================
// Formatting
// ============================================================================

/// Render a date or date text with `pattern`.
///
/// # Errors
///
/// - `InvalidArgumentError` when text input cannot be parsed
/// - `InvalidArgumentError` naming the input and pattern when the pattern is
///   invalid; the pattern fault is attached as the cause
pub fn format_to_string<'a>(input: impl Into<DateLike<'a>>, pattern: &str) -> Result<String> {
    let input = input.into();
    let Some(value) = input.resolve()? else {
        return Ok(String::new());
    };

    let described = describe(&input);
    compile(&described, pattern)?
        .format(&value)
        .map_err(|fault| invalid_pattern(&described, pattern).with_cause(Cause::error(fault)))
}

/// [`format_to_string`] for dynamically typed JSON input.
///
/// ```rust
/// # use helper_kit::{dates, ExceptionKind};
/// # use serde_json::json;
/// assert_eq!(dates::format_json_to_string(&json!("10/21/19"), "yyyy-MM-dd").unwrap(), "2019-10-21");
///
/// let err = dates::format_json_to_string(&json!(12345), "yyyy-MM-dd").unwrap_err();
/// assert_eq!(err.kind(), ExceptionKind::InvalidArgumentError);
/// ```
#[cfg(feature = "json")]
pub fn format_json_to_string(input: &serde_json::Value, pattern: &str) -> Result<String> {
    format_to_string(DateLike::try_from(input)?, pattern)
}

/// Format as `yyyy-MM-dd`.
pub fn format_iso_date<'a>(input: impl Into<DateLike<'a>>) -> Result<String> {
    format_to_string(input, ISO_DATE_FORMAT)
}

/// Format as `MM/dd/yyyy`.
pub fn format_us_locale_date<'a>(input: impl Into<DateLike<'a>>) -> Result<String> {
    format_us_locale_date_with(input, None)
}

/// Format as `MM/dd/yyyy`, or with `pattern` when one is given and non-empty.
pub fn format_us_locale_date_with<'a>(input: impl Into<DateLike<'a>>, pattern: Option<&str>) -> Result<String> {
    let pattern = pattern.filter(|p| !p.is_empty()).unwrap_or(US_LOCALE_DATE_FORMAT);
    format_to_string(input, pattern)
}

/// Format as `MM/dd/yyyy HH:mm:ss`.
pub fn format_us_locale_time<'a>(input: impl Into<DateLike<'a>>) -> Result<String> {
    format_us_locale_time_with(input, None)
}

/// Format as `MM/dd/yyyy HH:mm:ss` when `pattern` is `None`, otherwise as
/// [`format_us_locale_date_with`]. An empty pattern therefore renders the
/// date-only `MM/dd/yyyy` layout.
///
/// ```rust
/// # use helper_kit::dates;
/// assert_eq!(dates::format_us_locale_time_with("2025/10/20", None).unwrap(), "10/20/2025 00:00:00");
/// assert_eq!(dates::format_us_locale_time_with("2025/10/20", Some("")).unwrap(), "10/20/2025");
/// ```
pub fn format_us_locale_time_with<'a>(input: impl Into<DateLike<'a>>, pattern: Option<&str>) -> Result<String> {
    format_us_locale_date_with(input, Some(pattern.unwrap_or(US_LOCALE_TIME_FORMAT)))
}

/// Format as `MMM d, yyyy`.
pub fn format_medium_date<'a>(input: impl Into<DateLike<'a>>) -> Result<String> {
    format_to_string(input, MEDIUM_DATE_FORMAT)
}

fn compile(input: &str, pattern: &str) -> Result<DatePattern> {
    DatePattern::compile(pattern)
        .map_err(|fault| invalid_pattern(input, pattern).with_cause(Cause::error(fault)))
}

fn invalid_pattern(input: &str, pattern: &str) -> Exception {
    Exception::invalid_argument(format!(
        "Invalid date format: unable to format {input} with pattern {pattern}"
    ))
}

fn unparseable_pattern(input: &str, pattern: &str) -> Exception {
    Exception::invalid_argument(format!(
        "Invalid date pattern: unable to parse {input} with pattern {pattern}"
    ))
}

fn describe(input: &DateLike<'_>) -> String {
    match input {
        DateLike::Date(value) => value.to_string(),
        DateLike::Text(text) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_pattern::PatternError;
    use crate::{ExceptionKind, Report, RingBufferReporter};
    use chrono::Datelike;
    use std::sync::Arc;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
    }

    fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, mi, s))
            .expect("valid date-time")
    }

    fn parse(input: &str) -> Result<NaiveDateTime> {
        parse_date_string_with_reference(input, reference())
    }

    #[test]
    fn every_fallback_pattern_compiles() {
        assert_eq!(fallback_patterns().len(), FALLBACK_PATTERNS.len());
        assert!(fallback_patterns().iter().all(DatePattern::is_parseable));
    }

    #[test]
    fn iso_input_takes_the_fast_path() {
        assert_eq!(parse("2019-10-21").unwrap(), at(2019, 10, 21, 0, 0, 0));
        assert_eq!(parse("2019-10-21T08:15:00Z").unwrap(), at(2019, 10, 21, 8, 15, 0));
    }

    #[test]
    fn two_digit_year() {
        assert_eq!(parse("10/21/19").unwrap(), at(2019, 10, 21, 0, 0, 0));
        assert_eq!(parse("10/21/99").unwrap(), at(1999, 10, 21, 0, 0, 0));
    }

    #[test]
    fn each_fallback_pattern_with_canonical_input() {
        let cases = [
            ("10/21/19", at(2019, 10, 21, 0, 0, 0)),
            ("10/21/2019", at(2019, 10, 21, 0, 0, 0)),
            ("2019/10/21", at(2019, 10, 21, 0, 0, 0)),
            ("1/2/2020", at(2020, 1, 2, 0, 0, 0)),
            ("Oct 21, 2019", at(2019, 10, 21, 0, 0, 0)),
            ("Oct 2019", at(2019, 10, 19, 0, 0, 0)),
            ("10/21/2019 13:45:10", at(2019, 10, 21, 13, 45, 10)),
        ];

        for (input, expected) in cases {
            assert_eq!(parse(input).unwrap(), expected, "{input}");
        }
    }

    #[test]
    fn missing_day_is_clamped_to_month_length() {
        let end_of_month = NaiveDate::from_ymd_opt(2026, 1, 31).expect("valid date");
        let parsed = parse_date_string_with_reference("Feb 2019", end_of_month).unwrap();
        assert_eq!(parsed, at(2019, 2, 28, 0, 0, 0));
    }

    #[test]
    fn impossible_dates_are_rejected() {
        for input in ["02/30/2019", "2019-02-29", "13/01/2019", "Foo 21, 2019"] {
            let err = parse(input).unwrap_err();
            assert_eq!(err.kind(), ExceptionKind::InvalidArgumentError, "{input}");
        }
    }

    #[test]
    fn unparseable_input_fails_with_invalid_argument() {
        let err = parse("ABCDE").unwrap_err();

        assert_eq!(err.kind(), ExceptionKind::InvalidArgumentError);
        assert!(err.is(ExceptionKind::LogicError));
        assert_eq!(err.message(), "Invalid Date: unable to parse date string - ABCDE");
    }

    #[test]
    fn missing_input_fails() {
        let err = parse_optional_date_string(None).unwrap_err();
        assert!(err.message().contains("cannot be null or undefined"));
    }

    #[test]
    fn unparseable_input_is_reported() {
        let sink = RingBufferReporter::new(8, 1024);
        reporter::set_reporter(Arc::new(sink.clone()));

        assert!(parse("ABCDE").is_err());
        assert!(parse("10/21/19").is_ok());
        reporter::clear_reporter();

        let entries = sink.get_all();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, ReportLevel::Error);
        assert_eq!(entries[0].kind, ExceptionKind::InvalidArgumentError);
        assert_eq!(entries[0].extra("input"), Some("ABCDE"));
    }

    #[test]
    fn reporting_does_not_change_the_outcome() {
        reporter::set_reporter(Arc::new(|report: &Report<'_>| {
            assert_eq!(report.extra("input"), Some("nope"));
        }));
        let err = parse("nope").unwrap_err();
        reporter::clear_reporter();

        assert_eq!(err.message(), "Invalid Date: unable to parse date string - nope");
    }

    #[test]
    fn single_pattern_parsing() {
        assert_eq!(
            parse_date_with_pattern("21.10.2019", "dd.MM.yyyy", reference()).unwrap(),
            at(2019, 10, 21, 0, 0, 0)
        );

        let mismatch = parse_date_with_pattern("2019-10-21", "dd.MM.yyyy", reference()).unwrap_err();
        assert_eq!(mismatch.kind(), ExceptionKind::InvalidArgumentError);
        assert!(mismatch.cause().is_none());

        let format_only = parse_date_with_pattern("Mon", "EEE", reference()).unwrap_err();
        let fault = format_only.cause().and_then(|c| c.downcast_ref::<PatternError>());
        assert_eq!(fault, Some(&PatternError::FormatOnly { token: "EEE" }));
    }

    #[test]
    fn bad_parse_pattern_is_reported_as_a_parse_failure() {
        let format_only = parse_date_with_pattern("Mon", "EEE", reference()).unwrap_err();
        assert_eq!(format_only.kind(), ExceptionKind::InvalidArgumentError);
        assert_eq!(
            format_only.message(),
            "Invalid date pattern: unable to parse Mon with pattern EEE"
        );

        let malformed = parse_date_with_pattern("21.10.2019", "dd.MM.yyyy x", reference()).unwrap_err();
        assert_eq!(
            malformed.message(),
            "Invalid date pattern: unable to parse 21.10.2019 with pattern dd.MM.yyyy x"
        );
        assert!(!malformed.message().contains("format"));
        let fault = malformed.cause().and_then(|c| c.downcast_ref::<PatternError>());
        assert!(matches!(fault, Some(PatternError::UnescapedLetter { letter: 'x', .. })));
    }

    #[test]
    fn default_reference_is_today() {
        let before = Local::now().date_naive();
        let parsed = parse_date_string("Oct 2019").unwrap();
        let after = Local::now().date_naive();
        let last_day = crate::date_pattern::last_day_of_month(2019, 10).expect("valid month");

        assert_eq!(parsed.date().year(), 2019);
        assert_eq!(parsed.date().month(), 10);
        assert!(
            [before, after].iter().any(|today| parsed.date().day() == today.day().min(last_day)),
            "{parsed}"
        );
    }

    #[test]
    fn formats_dates_and_text() {
        let value = at(2023, 1, 31, 12, 0, 0);

        assert_eq!(format_iso_date(value).unwrap(), "2023-01-31");
        assert_eq!(format_us_locale_date(value).unwrap(), "01/31/2023");
        assert_eq!(format_us_locale_time(value).unwrap(), "01/31/2023 12:00:00");
        assert_eq!(format_medium_date(value.date()).unwrap(), "Jan 31, 2023");
        assert_eq!(format_us_locale_time("2025/10/20").unwrap(), "10/20/2025 00:00:00");
        assert_eq!(format_iso_date(String::from("10/21/19")).unwrap(), "2019-10-21");
    }

    #[test]
    fn custom_pattern_overrides() {
        let value = at(2023, 1, 31, 12, 0, 0);

        assert_eq!(format_us_locale_date_with(value, Some("M/d/yy")).unwrap(), "1/31/23");
        assert_eq!(format_us_locale_date_with(value, Some("")).unwrap(), "01/31/2023");
        assert_eq!(format_us_locale_time_with(value, Some("HH:mm")).unwrap(), "12:00");
        assert_eq!(format_us_locale_time_with(value, None).unwrap(), "01/31/2023 12:00:00");
    }

    #[test]
    fn empty_time_pattern_falls_back_to_the_date_layout() {
        let value = at(2023, 1, 31, 12, 0, 0);

        assert_eq!(format_us_locale_time_with(value, Some("")).unwrap(), "01/31/2023");
        assert_eq!(format_us_locale_time_with("2025/10/20", Some("")).unwrap(), "10/20/2025");
    }

    #[test]
    fn empty_string_formats_to_empty_string() {
        for pattern in ["yyyy-MM-dd", "MMM d, yyyy", "not a pattern", "'"] {
            assert_eq!(format_to_string("", pattern).unwrap(), "", "{pattern}");
        }
        assert_eq!(format_medium_date("").unwrap(), "");
    }

    #[test]
    fn invalid_pattern_names_input_and_pattern() {
        let err = format_to_string("2019-10-21", "yyyy-MM-dd x").unwrap_err();

        assert_eq!(err.kind(), ExceptionKind::InvalidArgumentError);
        assert!(err.message().contains("2019-10-21"));
        assert!(err.message().contains("yyyy-MM-dd x"));

        let fault = err.cause().and_then(|c| c.downcast_ref::<PatternError>());
        assert_eq!(
            fault,
            Some(&PatternError::UnescapedLetter {
                letter: 'x',
                position: 11
            })
        );
    }

    #[test]
    fn unparseable_text_fails_before_the_pattern_is_checked() {
        let err = format_to_string("ABCDE", "not a pattern").unwrap_err();
        assert_eq!(err.message(), "Invalid Date: unable to parse date string - ABCDE");
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_shapes() {
        use serde_json::json;

        assert_eq!(format_json_to_string(&json!("10/21/19"), ISO_DATE_FORMAT).unwrap(), "2019-10-21");
        assert_eq!(format_json_to_string(&json!(""), ISO_DATE_FORMAT).unwrap(), "");

        for (value, received) in [
            (json!({}), "object"),
            (json!(12345), "number"),
            (json!(null), "null"),
            (json!(true), "boolean"),
            (json!(["2019-10-21"]), "array"),
        ] {
            let err = format_json_to_string(&value, ISO_DATE_FORMAT).unwrap_err();
            assert_eq!(err.kind(), ExceptionKind::InvalidArgumentError);
            assert!(err.message().ends_with(received), "{}", err.message());
        }
    }
}
