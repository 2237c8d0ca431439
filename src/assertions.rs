//! Assertions that fail with `UnexpectedValueError` instead of panicking.
//!
//! Every helper takes an optional message. Without one the message is
//! `"<helper>: Unexpected <value>"`, with the offending value rendered
//! through [`sanitize`](crate::convenience::sanitize).
//!
//! ```rust
//! use helper_kit::{assertions, ExceptionKind, Result};
//!
//! fn admin_name(user: Option<(&str, bool)>) -> Result<&str> {
//!     let (name, is_admin) = assertions::ensure_non_nullable(user, Some("User not found"))?;
//!     assertions::assert(is_admin, Some("Admin privileges required"))?;
//!     Ok(name)
//! }
//!
//! assert_eq!(admin_name(Some(("root", true))).unwrap(), "root");
//! let err = admin_name(Some(("guest", false))).unwrap_err();
//! assert_eq!(err.kind(), ExceptionKind::UnexpectedValueError);
//! assert_eq!(err.message(), "Admin privileges required");
//! ```

use crate::convenience::sanitize;
use crate::{Exception, Result};
use std::fmt::Debug;

fn unexpected(helper: &str, rendered: &str, message: Option<&str>) -> Exception {
    match message {
        Some(message) => Exception::unexpected_value(message.to_owned()),
        None => Exception::unexpected_value(format!("{helper}: Unexpected {}", sanitize(rendered))),
    }
}

/// Fail unless `condition` is `true`.
pub fn assert(condition: bool, message: Option<&str>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(unexpected("assert", "false", message))
    }
}

/// Fail unless `value` is exactly JSON `true`.
///
/// Truthy-looking values (`1`, `"true"`, `[]`) fail like `false`, `0`,
/// `""` and `null` do.
#[cfg(feature = "json")]
pub fn assert_value(value: &serde_json::Value, message: Option<&str>) -> Result<()> {
    if *value == serde_json::Value::Bool(true) {
        Ok(())
    } else {
        Err(unexpected("assert", &value.to_string(), message))
    }
}

/// Fail when `value` is `None`.
pub fn assert_non_nullable<T>(value: &Option<T>, message: Option<&str>) -> Result<()> {
    match value {
        Some(_) => Ok(()),
        None => Err(unexpected("assert_non_nullable", "None", message)),
    }
}

/// Return `value` unchanged when `predicate` holds for it.
///
/// Fails exactly like [`assert`] on a `false` condition.
pub fn ensure<T, P>(value: T, predicate: P, message: Option<&str>) -> Result<T>
where
    P: FnOnce(&T) -> bool,
{
    assert(predicate(&value), message)?;
    Ok(value)
}

/// Narrow `value` to another type, failing like [`ensure`] when the
/// conversion declines.
///
/// ```rust
/// # use helper_kit::assertions::ensure_narrowed;
/// #[derive(Debug)]
/// enum User { Admin(String), Guest }
///
/// let admin = ensure_narrowed(User::Admin("root".into()), |user| match user {
///     User::Admin(name) => Some(name),
///     User::Guest => None,
/// }, None);
/// assert_eq!(admin.unwrap(), "root");
///
/// let guest = ensure_narrowed(User::Guest, |_| None::<String>, Some("Admin required"));
/// assert_eq!(guest.unwrap_err().message(), "Admin required");
/// ```
pub fn ensure_narrowed<T, U, N>(value: T, narrow: N, message: Option<&str>) -> Result<U>
where
    N: FnOnce(T) -> Option<U>,
{
    narrow(value).ok_or_else(|| unexpected("assert", "false", message))
}

/// Unwrap `value`, failing when it is `None`.
pub fn ensure_non_nullable<T>(value: Option<T>, message: Option<&str>) -> Result<T> {
    value.ok_or_else(|| unexpected("ensure_non_nullable", "None", message))
}

/// Mark a branch that should never run. Always fails.
///
/// The default message reads as if the missing value were `None`:
/// "assert_unreachable: Unexpected None".
pub fn assert_unreachable<T>(message: Option<&str>) -> Result<T> {
    Err(unexpected("assert_unreachable", "None", message))
}

/// Mark the fallback arm of a match that should already be exhaustive.
/// Always fails, naming the value that got through.
///
/// ```rust
/// # use helper_kit::assertions::assert_exhaustive;
/// let status = "activating";
/// let label: helper_kit::Result<&str> = match status {
///     "active" => Ok("On"),
///     "inactive" => Ok("Off"),
///     other => assert_exhaustive(other, None),
/// };
/// assert_eq!(label.unwrap_err().message(), "assert_exhaustive: Unexpected \"activating\"");
/// ```
pub fn assert_exhaustive<T, V: Debug>(value: V, message: Option<&str>) -> Result<T> {
    Err(unexpected("assert_exhaustive", &format!("{value:?}"), message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExceptionKind;

    #[test]
    fn assert_passes_and_fails() {
        assert!(assert(true, None).is_ok());

        let err = assert(false, None).unwrap_err();
        assert_eq!(err.kind(), ExceptionKind::UnexpectedValueError);
        assert_eq!(err.message(), "assert: Unexpected false");
    }

    #[test]
    fn custom_message_replaces_default() {
        let err = assert(false, Some("User must be at least 18 years old")).unwrap_err();
        assert_eq!(err.to_string(), "UnexpectedValueError: User must be at least 18 years old");
    }

    #[cfg(feature = "json")]
    #[test]
    fn assert_value_accepts_only_true() {
        use serde_json::json;

        assert!(assert_value(&json!(true), None).is_ok());

        for (value, rendered) in [
            (json!(false), "false"),
            (json!(0), "0"),
            (json!(f64::NAN), "null"),
            (json!(null), "null"),
            (json!(""), "\"\""),
            (json!(1), "1"),
            (json!("true"), "\"true\""),
        ] {
            let err = assert_value(&value, None).unwrap_err();
            assert_eq!(err.kind(), ExceptionKind::UnexpectedValueError);
            assert_eq!(err.message(), format!("assert: Unexpected {rendered}"));
        }
    }

    #[test]
    fn non_nullable_checks() {
        assert!(assert_non_nullable(&Some(0), None).is_ok());
        assert_eq!(
            assert_non_nullable(&None::<u8>, None).unwrap_err().message(),
            "assert_non_nullable: Unexpected None"
        );

        assert_eq!(ensure_non_nullable(Some("config"), None).unwrap(), "config");
        assert_eq!(
            ensure_non_nullable(None::<&str>, Some("Configuration not found")).unwrap_err().message(),
            "Configuration not found"
        );
        assert_eq!(
            ensure_non_nullable(None::<&str>, None).unwrap_err().message(),
            "ensure_non_nullable: Unexpected None"
        );
    }

    #[test]
    fn ensure_returns_the_value_untouched() {
        let values = vec![3, 1, 2];
        let ptr = values.as_ptr();

        let ensured = ensure(values, |v| !v.is_empty(), None).unwrap();

        assert_eq!(ensured, vec![3, 1, 2]);
        assert_eq!(ensured.as_ptr(), ptr);
    }

    #[test]
    fn ensure_fails_like_assert() {
        let err = ensure(17, |age| *age >= 18, None).unwrap_err();
        assert_eq!(err.kind(), ExceptionKind::UnexpectedValueError);
        assert_eq!(err.message(), "assert: Unexpected false");
    }

    #[test]
    fn narrowing() {
        let parsed = ensure_narrowed("42", |s| s.parse::<u8>().ok(), None).unwrap();
        assert_eq!(parsed, 42);

        let err = ensure_narrowed("x", |s| s.parse::<u8>().ok(), None).unwrap_err();
        assert_eq!(err.message(), "assert: Unexpected false");
    }

    #[test]
    fn unreachable_and_exhaustive_always_fail() {
        let err = assert_unreachable::<()>(None).unwrap_err();
        assert_eq!(err.kind(), ExceptionKind::UnexpectedValueError);
        assert_eq!(err.message(), "assert_unreachable: Unexpected None");

        let err = assert_unreachable::<()>(Some("Unexpected status value: activating")).unwrap_err();
        assert_eq!(err.message(), "Unexpected status value: activating");

        #[derive(Debug)]
        enum Action {
            Multiply(i32),
        }
        let err = assert_exhaustive::<i32, _>(Action::Multiply(3), None).unwrap_err();
        assert_eq!(err.message(), "assert_exhaustive: Unexpected Multiply(3)");
    }

    #[test]
    fn rendered_values_are_sanitized() {
        let err = assert_exhaustive::<(), _>("line\nbreak", None).unwrap_err();
        assert_eq!(err.message(), "assert_exhaustive: Unexpected \"line\\nbreak\"");

        let err = assert_exhaustive::<(), _>("x".repeat(1000), None).unwrap_err();
        assert!(err.message().ends_with("...[TRUNCATED]"));
    }
}
