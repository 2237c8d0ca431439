//! Convenience macros for creating and raising exceptions with format strings.
//!
//! # Rules
//!
//! 1. **Kinds are identifiers** from [`ExceptionKind`](crate::ExceptionKind),
//!    checked at compile time
//! 2. **Format strings MUST be string literals**, which rules out format
//!    string injection
//! 3. **Rendered arbitrary values** (`Debug` output of caller data) go through
//!    `sanitized!()` so a single message cannot grow without bound
//!
//! # Usage
//!
//! ```rust
//! use helper_kit::{bail, ensure_that, exception, ExceptionKind, Result};
//!
//! fn pop(stack: &mut Vec<u32>) -> Result<u32> {
//!     match stack.pop() {
//!         Some(top) => Ok(top),
//!         None => bail!(UnderflowError, "pop on empty stack"),
//!     }
//! }
//!
//! fn reserve(len: usize, capacity: usize) -> Result<()> {
//!     ensure_that!(len <= capacity, OverflowError, "need {} slots, have {}", len, capacity);
//!     Ok(())
//! }
//!
//! assert_eq!(pop(&mut vec![]).unwrap_err().kind(), ExceptionKind::UnderflowError);
//! assert_eq!(
//!     reserve(9, 4).unwrap_err().to_string(),
//!     "OverflowError: need 9 slots, have 4"
//! );
//! let err = exception!(DomainError, "age {} is negative", -3);
//! assert!(err.is(ExceptionKind::LogicError));
//! ```
//!
//! ```rust,compile_fail
//! # use helper_kit::exception;
//! let template = String::from("{}");
//! // ✗ COMPILE ERROR: the format string must be a literal
//! let err = exception!(LogicError, template, 1);
//! ```

// ============================================================================
// Sanitization Utilities
// ============================================================================

/// Maximum length (bytes) of a sanitized value inside a message.
pub const MAX_SANITIZED_LEN: usize = 256;

/// Marker appended when a sanitized value was cut.
pub const TRUNCATION_MARKER: &str = "...[TRUNCATED]";

/// Bound and neutralize arbitrary text before it lands in a message.
///
/// - Control characters become `?`; ANSI escape sequences collapse to a
///   single `?`
/// - Output is cut at a UTF-8 boundary so that, marker included, it never
///   exceeds [`MAX_SANITIZED_LEN`] bytes
///
/// ```rust
/// use helper_kit::convenience::{sanitize, MAX_SANITIZED_LEN};
///
/// assert_eq!(sanitize("tab\there"), "tab?here");
/// assert!(sanitize(&"x".repeat(1000)).len() <= MAX_SANITIZED_LEN);
/// ```
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len().min(MAX_SANITIZED_LEN));
    let mut in_escape = false;
    let mut truncated = false;

    for c in text.chars() {
        if in_escape {
            if c.is_ascii_alphabetic() {
                in_escape = false;
            }
            continue;
        }

        let replacement = if c == '\u{1b}' {
            in_escape = true;
            '?'
        } else if c.is_control() {
            '?'
        } else {
            c
        };

        if out.len() + replacement.len_utf8() > MAX_SANITIZED_LEN {
            truncated = true;
            break;
        }
        out.push(replacement);
    }

    if truncated {
        let mut keep = MAX_SANITIZED_LEN - TRUNCATION_MARKER.len();
        while !out.is_char_boundary(keep) {
            keep -= 1;
        }
        out.truncate(keep);
        out.push_str(TRUNCATION_MARKER);
    }

    out
}

/// Render any `Debug` value through [`sanitize`].
///
/// ```rust
/// # use helper_kit::sanitized;
/// assert_eq!(sanitized!(Some("a\nb")), "Some(\"a\\nb\")");
/// assert!(sanitized!(vec![0_u8; 500]).ends_with("...[TRUNCATED]"));
/// ```
#[macro_export]
macro_rules! sanitized {
    ($value:expr) => {
        $crate::convenience::sanitize(&::std::format!("{:?}", $value))
    };
}

// ============================================================================
// Exception Creation Macros
// ============================================================================

/// Build an [`Exception`](crate::Exception) of the named kind with a
/// formatted message.
///
/// ```rust
/// # use helper_kit::{exception, ExceptionKind};
/// let err = exception!(OutOfBoundsError, "no key {:?}", "user:42");
/// assert_eq!(err.kind(), ExceptionKind::OutOfBoundsError);
/// assert_eq!(err.message(), "no key \"user:42\"");
/// ```
#[macro_export]
macro_rules! exception {
    ($kind:ident, $fmt:literal $(,)?) => {
        $crate::Exception::new($crate::ExceptionKind::$kind, $fmt)
    };
    ($kind:ident, $fmt:literal, $($arg:expr),+ $(,)?) => {
        $crate::Exception::new(
            $crate::ExceptionKind::$kind,
            ::std::format!($fmt, $($arg),+),
        )
    };
}

/// Return early with an exception of the named kind.
#[macro_export]
macro_rules! bail {
    ($kind:ident, $($rest:tt)+) => {
        return ::core::result::Result::Err($crate::exception!($kind, $($rest)+))
    };
}

/// Return early with an exception of the named kind unless the condition
/// holds.
#[macro_export]
macro_rules! ensure_that {
    ($cond:expr, $kind:ident, $($rest:tt)+) => {
        if !$cond {
            $crate::bail!($kind, $($rest)+);
        }
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExceptionKind, Result};

    #[test]
    fn literal_only_message_borrows() {
        let err = exception!(IgnorableError, "cache miss");
        assert_eq!(err.kind(), ExceptionKind::IgnorableError);
        assert_eq!(err.message(), "cache miss");
    }

    #[test]
    fn formatted_message() {
        let err = exception!(LengthError, "expected {} items, got {}", 3, 5);
        assert_eq!(err.to_string(), "LengthError: expected 3 items, got 5");
    }

    #[test]
    fn bail_returns_err() {
        fn check(index: usize) -> Result<usize> {
            if index > 3 {
                bail!(OutOfRangeError, "index {} past end", index);
            }
            Ok(index)
        }

        assert_eq!(check(1).ok(), Some(1));
        let err = check(9).unwrap_err();
        assert_eq!(err.kind(), ExceptionKind::OutOfRangeError);
        assert_eq!(err.message(), "index 9 past end");
    }

    #[test]
    fn ensure_that_passes_and_fails() {
        fn positive(n: i64) -> Result<i64> {
            ensure_that!(n > 0, DomainError, "{} is not positive", n);
            Ok(n)
        }

        assert!(positive(4).is_ok());
        assert_eq!(positive(-4).unwrap_err().message(), "-4 is not positive");
    }

    #[test]
    fn sanitize_preserves_short_text() {
        assert_eq!(sanitize("short"), "short");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn sanitize_truncates_long_text() {
        let long = "A".repeat(1000);
        let out = sanitize(&long);

        assert!(out.len() <= MAX_SANITIZED_LEN);
        assert!(out.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn sanitize_respects_utf8_boundaries() {
        let long = "й".repeat(400);
        let out = sanitize(&long);

        assert!(out.len() <= MAX_SANITIZED_LEN);
        assert!(out.ends_with(TRUNCATION_MARKER));
        assert!(out.trim_end_matches(TRUNCATION_MARKER).chars().all(|c| c == 'й'));
    }

    #[test]
    fn sanitize_neutralizes_control_characters() {
        assert_eq!(sanitize("line1\nline2\r"), "line1?line2?");
        assert_eq!(sanitize("\u{1b}[31mred\u{1b}[0m"), "?red?");
    }

    #[test]
    fn sanitized_macro_uses_debug() {
        assert_eq!(sanitized!("quoted"), "\"quoted\"");
        assert_eq!(sanitized!(None::<u8>), "None");
    }
}
