//! # Helper Kit
//!
//! Small, independent helpers with real behavioral contracts:
//!
//! - [`Exception`]: a closed, classifiable failure taxonomy (see [`kinds`])
//!   carrying a message and an optional, identity-compared [`Cause`]
//! - [`dates`]: free-form date parsing with an ordered fallback-format search,
//!   and validated formatting into fixed layouts
//! - [`colors`]: YIQ-based contrast selection and hex normalization
//! - [`assertions`]: type-narrowing assertions that fail with
//!   `UnexpectedValueError`
//!
//! ## Design Philosophy
//!
//! 1. **Branch on categories, not messages**: every failure has a kind, and
//!    kinds form a fixed lattice with table-driven membership checks
//! 2. **Causes are compared by identity**, never structurally
//! 3. **Fail fast**: no invalid date ever escapes the parser
//! 4. **No hidden I/O**: exceptions never log or retry; reporting parse
//!    failures to a sink is opt-in (see [`reporter`])
//!
//! ## Quick Start
//!
//! ```rust
//! use helper_kit::{dates, Exception, ExceptionKind, Result};
//!
//! fn due_date(raw: &str) -> Result<String> {
//!     let parsed = dates::parse_date_string(raw)?;
//!     dates::format_iso_date(parsed)
//! }
//!
//! assert_eq!(due_date("10/21/19").unwrap(), "2019-10-21");
//!
//! let err = due_date("ABCDE").unwrap_err();
//! assert!(err.is(ExceptionKind::LogicError));
//! assert_eq!(err.kind(), ExceptionKind::InvalidArgumentError);
//! ```
//!
//! ## Causes
//!
//! ```rust
//! use helper_kit::{Cause, Exception};
//!
//! let original = Cause::from(Exception::runtime("socket closed"));
//! let wrapped = Exception::logic("sync failed").with_cause(original.clone());
//!
//! assert!(wrapped.is_caused_by(&original));
//! assert!(!wrapped.is_caused_by(&Cause::from(Exception::runtime("socket closed"))));
//! ```
//!
//! ## Features
//!
//! - `json` (default): accept `serde_json::Value` inputs in [`dates`] and
//!   [`assertions`], rejecting non-string shapes with `InvalidArgumentError`
//! - `trusted_debug`: enable [`ExceptionLog::format_for_trusted_debug`]
//!   (debug builds only)

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::result;
use std::sync::Arc;

pub mod assertions;
pub mod colors;
pub mod convenience;
pub mod date_pattern;
pub mod dates;
pub mod iso8601;
pub mod kinds;
pub mod logging;
pub mod message;
pub mod reporter;

pub use convenience::*;
pub use kinds::*;
pub use logging::*;
pub use message::*;
pub use reporter::*;

/// Type alias for Results using our error type.
pub type Result<T> = result::Result<T, Exception>;

// ============================================================================
// Cause
// ============================================================================

/// The originating fault attached to an [`Exception`].
///
/// A cause may hold any `Send + Sync + 'static` value: another exception,
/// any `std::error::Error`, or plain data. Clones share one allocation, and
/// equality is identity: two causes are the same only if they point at the
/// same allocation, regardless of contents.
///
/// # Example
///
/// ```rust
/// use helper_kit::Cause;
///
/// let payload = Cause::value(vec![1, 2, 3]);
/// assert_eq!(payload.downcast_ref::<Vec<i32>>(), Some(&vec![1, 2, 3]));
/// assert_eq!(payload, payload.clone());
/// assert_ne!(payload, Cause::value(vec![1, 2, 3]));
/// ```
#[derive(Clone)]
pub struct Cause {
    payload: Arc<dyn Any + Send + Sync>,
    // Same allocation as `payload` when the cause is an error.
    error: Option<Arc<dyn Error + Send + Sync>>,
}

impl Cause {
    /// Wrap arbitrary data as a cause.
    pub fn value<T>(value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            payload: Arc::new(value),
            error: None,
        }
    }

    /// Wrap an error as a cause; it is exposed through
    /// [`Error::source`] on the owning exception.
    pub fn error<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        let shared = Arc::new(error);
        Self {
            payload: shared.clone(),
            error: Some(shared),
        }
    }

    /// The cause as an error, when it was built from one.
    #[inline]
    pub fn as_error(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.error.as_deref()
    }

    /// The cause as an exception, when it is one.
    #[inline]
    pub fn as_exception(&self) -> Option<&Exception> {
        self.downcast_ref::<Exception>()
    }

    /// Borrow the payload as a concrete type.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Identity comparison: same allocation, contents ignored.
    #[inline]
    pub fn ptr_eq(&self, other: &Cause) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.payload), Arc::as_ptr(&other.payload))
    }
}

impl PartialEq for Cause {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Cause {}

impl From<Exception> for Cause {
    fn from(exception: Exception) -> Self {
        Cause::error(exception)
    }
}

impl fmt::Debug for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(error) => f.debug_tuple("Cause").field(&format_args!("{error}")).finish(),
            None => f.debug_tuple("Cause").field(&"<value>").finish(),
        }
    }
}

// ============================================================================
// Exception
// ============================================================================

/// A classified failure: kind, message and optional cause.
///
/// # Key Properties
///
/// - Kind, message and cause are fixed at construction; there are no setters
/// - Category checks ([`Exception::is`]) follow the static lattice in [`kinds`]
/// - Cause checks ([`Exception::is_caused_by`]) compare identity
/// - No I/O, logging or retries: surfacing the failure is the caller's job
/// - Owned message text is zeroized on drop
///
/// # Constructors
///
/// Each kind has a named constructor (`Exception::invalid_argument(..)`,
/// `Exception::overflow(..)`, ...). They read better at call sites than
/// `Exception::new(ExceptionKind::..., ..)` and make every construction site
/// of a given kind grep-able. For formatted messages see the
/// [`exception!`](crate::exception) macro.
#[derive(Clone)]
#[must_use = "exceptions should be returned or handled"]
pub struct Exception {
    kind: ExceptionKind,
    message: Message,
    cause: Option<Cause>,
}

impl Exception {
    /// Create an exception of the given kind.
    #[inline]
    pub fn new(kind: ExceptionKind, message: impl Into<Message>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// Attach the originating fault.
    ///
    /// Part of construction: the cause is set once, before the exception is
    /// handed to anyone.
    #[inline]
    pub fn with_cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Kind of this exception.
    #[inline]
    pub const fn kind(&self) -> ExceptionKind {
        self.kind
    }

    /// Human-readable message (may be empty).
    #[inline]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Attached cause, if any.
    #[inline]
    pub const fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Category membership: `true` for the exception's own kind and every
    /// ancestor of it.
    #[inline]
    pub fn is(&self, category: ExceptionKind) -> bool {
        self.kind.is_a(category)
    }

    /// `true` iff `candidate` is the very cause this exception was built
    /// with (identity, not equality of contents).
    #[inline]
    pub fn is_caused_by(&self, candidate: &Cause) -> bool {
        self.cause.as_ref().is_some_and(|cause| cause.ptr_eq(candidate))
    }

    /// This exception followed by every nested exception cause.
    ///
    /// Stops at the first cause that is not an [`Exception`].
    pub fn chain(&self) -> impl Iterator<Item = &Exception> {
        std::iter::successors(Some(self), |&current| {
            current.cause.as_ref().and_then(Cause::as_exception)
        })
    }

    /// Structured view for loggers; borrows from `self`.
    #[inline]
    pub fn log(&self) -> ExceptionLog<'_> {
        ExceptionLog::new(self)
    }

    /// Callback-style access to the structured log view.
    #[inline]
    pub fn with_log<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ExceptionLog<'_>) -> R,
    {
        let log = self.log();
        f(&log)
    }

    /// Create a `LogicError`.
    #[inline]
    pub fn logic(message: impl Into<Message>) -> Self {
        Self::new(ExceptionKind::LogicError, message)
    }

    /// Create a `RuntimeError`.
    #[inline]
    pub fn runtime(message: impl Into<Message>) -> Self {
        Self::new(ExceptionKind::RuntimeError, message)
    }

    /// Create an `IgnorableError`.
    #[inline]
    pub fn ignorable(message: impl Into<Message>) -> Self {
        Self::new(ExceptionKind::IgnorableError, message)
    }

    /// Create an `UnexpectedValueError`.
    #[inline]
    pub fn unexpected_value(message: impl Into<Message>) -> Self {
        Self::new(ExceptionKind::UnexpectedValueError, message)
    }

    /// Create a `BadFunctionCallError`.
    #[inline]
    pub fn bad_function_call(message: impl Into<Message>) -> Self {
        Self::new(ExceptionKind::BadFunctionCallError, message)
    }

    /// Create a `BadMethodCallError`.
    #[inline]
    pub fn bad_method_call(message: impl Into<Message>) -> Self {
        Self::new(ExceptionKind::BadMethodCallError, message)
    }

    /// Create a `DomainError`.
    #[inline]
    pub fn domain(message: impl Into<Message>) -> Self {
        Self::new(ExceptionKind::DomainError, message)
    }

    /// Create an `InvalidArgumentError`.
    #[inline]
    pub fn invalid_argument(message: impl Into<Message>) -> Self {
        Self::new(ExceptionKind::InvalidArgumentError, message)
    }

    /// Create a `LengthError`.
    #[inline]
    pub fn length(message: impl Into<Message>) -> Self {
        Self::new(ExceptionKind::LengthError, message)
    }

    /// Create an `OutOfRangeError`.
    #[inline]
    pub fn out_of_range(message: impl Into<Message>) -> Self {
        Self::new(ExceptionKind::OutOfRangeError, message)
    }

    /// Create an `OutOfBoundsError`.
    #[inline]
    pub fn out_of_bounds(message: impl Into<Message>) -> Self {
        Self::new(ExceptionKind::OutOfBoundsError, message)
    }

    /// Create an `OverflowError`.
    #[inline]
    pub fn overflow(message: impl Into<Message>) -> Self {
        Self::new(ExceptionKind::OverflowError, message)
    }

    /// Create an `UnderflowError`.
    #[inline]
    pub fn underflow(message: impl Into<Message>) -> Self {
        Self::new(ExceptionKind::UnderflowError, message)
    }

    /// Create a `RangeError`.
    #[inline]
    pub fn range(message: impl Into<Message>) -> Self {
        Self::new(ExceptionKind::RangeError, message)
    }
}

impl fmt::Debug for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exception")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("cause", &self.cause)
            .finish()
    }
}

impl fmt::Display for Exception {
    /// Format: `"{KindLabel}: {message}"`, or just the label when the
    /// message is empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str(self.kind.label())
        } else {
            write!(f, "{}: {}", self.kind.label(), self.message)
        }
    }
}

impl Error for Exception {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_ref()
            .and_then(|cause| cause.error.as_ref())
            .map(|error| error.as_ref() as &(dyn Error + 'static))
    }
}
