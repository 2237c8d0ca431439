//! Structured log view of an exception.
//!
//! # Properties
//!
//! - Borrows from the [`Exception`] with an explicit lifetime
//! - Cannot outlive the exception that created it
//! - No heap allocations in accessors
//! - Output fields are truncated to bound log line size
//!
//! The view exists only for the duration of a logging call. Nothing in it
//! retains the exception's message once the exception drops.

use crate::{Cause, Exception, ExceptionKind};
use std::borrow::Cow;
use std::fmt;

/// Maximum length (bytes) for any individual field in formatted output.
pub const MAX_FIELD_OUTPUT_LEN: usize = 1024;

/// Truncation indicator appended to truncated strings.
const TRUNCATION_INDICATOR: &str = "...[TRUNCATED]";

/// Structured log entry borrowed from an [`Exception`].
///
/// # Example
///
/// ```rust
/// # use helper_kit::Exception;
/// let err = Exception::invalid_argument("Invalid Date: unable to parse date string - ABCDE");
/// let mut line = String::new();
/// err.log().write_to(&mut line).unwrap();
///
/// assert_eq!(
///     line,
///     "[InvalidArgumentError] category='LogicError' \
///      message='Invalid Date: unable to parse date string - ABCDE'"
/// );
/// ```
#[derive(Debug)]
pub struct ExceptionLog<'a> {
    kind: ExceptionKind,
    message: &'a str,
    cause: Option<&'a Cause>,
}

impl<'a> ExceptionLog<'a> {
    /// Borrow the loggable fields of `exception`.
    #[inline]
    pub fn new(exception: &'a Exception) -> Self {
        Self {
            kind: exception.kind(),
            message: exception.message(),
            cause: exception.cause(),
        }
    }

    /// Format for human-readable logs in trusted debug contexts.
    ///
    /// Materializes the message and the full cause chain into a `String`.
    /// Only available with BOTH the `trusted_debug` feature flag AND debug
    /// assertions enabled.
    #[cfg(all(feature = "trusted_debug", debug_assertions))]
    pub fn format_for_trusted_debug(&self) -> String {
        let mut output = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_to(&mut output);

        if let Some(exception) = self.cause.and_then(Cause::as_exception) {
            for nested in exception.chain().skip(1) {
                output.push_str(&format!(
                    " caused_by='{}'",
                    truncate_with_indicator(&nested.to_string())
                ));
            }
        }

        output
    }

    /// Write structured log data to a formatter.
    ///
    /// Every field is truncated to a fixed maximum length. The category path
    /// lists the kind's ancestors nearest first and is omitted for roots.
    pub fn write_to(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(f, "[{}]", self.kind)?;

        let mut ancestors = self.kind.ancestors().iter();
        if let Some(first) = ancestors.next() {
            write!(f, " category='{first}")?;
            for ancestor in ancestors {
                write!(f, ">{ancestor}")?;
            }
            f.write_char('\'')?;
        }

        if !self.message.is_empty() {
            write!(f, " message='{}'", truncate_with_indicator(self.message))?;
        }

        match self.cause {
            Some(cause) => match cause.as_error() {
                Some(error) => write!(
                    f,
                    " cause='{}'",
                    truncate_with_indicator(&error.to_string())
                ),
                None => f.write_str(" cause=<value>"),
            },
            None => Ok(()),
        }
    }

    /// Kind of the logged exception.
    #[inline]
    pub const fn kind(&self) -> ExceptionKind {
        self.kind
    }

    /// Untruncated message text.
    ///
    /// Truncation is the responsibility of the logging framework when
    /// serializing to its own format.
    #[inline]
    pub const fn message(&self) -> &str {
        self.message
    }

    /// Category path of the kind, nearest parent first.
    #[inline]
    pub const fn ancestors(&self) -> &'static [ExceptionKind] {
        self.kind.ancestors()
    }

    /// Attached cause, if any.
    #[inline]
    pub const fn cause(&self) -> Option<&Cause> {
        self.cause
    }
}

/// Truncate a string for display, appending a visible indicator.
///
/// Returns a `Cow` to avoid allocation when no truncation is needed.
pub(crate) fn truncate_with_indicator(s: &str) -> Cow<'_, str> {
    if s.len() <= MAX_FIELD_OUTPUT_LEN {
        return Cow::Borrowed(s);
    }

    let max_content_len = MAX_FIELD_OUTPUT_LEN.saturating_sub(TRUNCATION_INDICATOR.len());

    // Last valid UTF-8 boundary at or before the limit
    let mut idx = max_content_len;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }

    if idx == 0 {
        return Cow::Borrowed(TRUNCATION_INDICATOR);
    }

    let mut result = String::with_capacity(idx + TRUNCATION_INDICATOR.len());
    result.push_str(&s[..idx]);
    result.push_str(TRUNCATION_INDICATOR);
    Cow::Owned(result)
}
