//! Exception kind lattice - failure classification without string matching.
//!
//! Every [`Exception`](crate::Exception) carries exactly one [`ExceptionKind`].
//! Kinds form a fixed lattice: a kind is also a member of every category on
//! its ancestor path, so a `BadMethodCallError` answers `true` when asked
//! whether it is a `BadFunctionCallError` or a `LogicError`.
//!
//! # Structure
//!
//! ```text
//! LogicError ─┬─ BadFunctionCallError ── BadMethodCallError
//!             ├─ DomainError
//!             ├─ InvalidArgumentError
//!             ├─ LengthError
//!             └─ OutOfRangeError
//! RuntimeError ─┬─ OutOfBoundsError
//!               ├─ OverflowError
//!               ├─ UnderflowError
//!               └─ RangeError
//! IgnorableError
//! UnexpectedValueError
//! ```
//!
//! # Governance
//!
//! The lattice is declared once, in the `exception_kinds!` invocation below.
//! Labels, ancestor paths and descriptions are all generated from that single
//! table, so category checks are slice lookups and cannot drift from the
//! declared hierarchy. Kinds cannot be created at runtime.
//!
//! # Example
//!
//! ```rust
//! use helper_kit::ExceptionKind;
//!
//! let kind = ExceptionKind::BadMethodCallError;
//! assert_eq!(kind.parent(), Some(ExceptionKind::BadFunctionCallError));
//! assert!(kind.is_a(ExceptionKind::LogicError));
//! assert!(!kind.is_a(ExceptionKind::RuntimeError));
//! ```

use std::fmt;

/// Declares the closed kind enum together with its static ancestor table.
///
/// Each entry is `Kind => [nearest ancestor, ..., root] : "description"`.
macro_rules! exception_kinds {
    ($( $kind:ident => [$($ancestor:ident),*] : $description:literal ),+ $(,)?) => {
        /// One fixed category in the exception lattice.
        ///
        /// Copy-enabled: a kind is classification metadata, not identity-bearing
        /// state, so it is passed by value.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ExceptionKind {
            $(
                #[doc = $description]
                $kind,
            )+
        }

        impl ExceptionKind {
            /// Every kind, in declaration order.
            pub const ALL: &'static [ExceptionKind] = &[$(ExceptionKind::$kind),+];

            /// The kind's own label, e.g. `"InvalidArgumentError"`.
            #[inline]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$kind => stringify!($kind),)+
                }
            }

            /// Ancestor path, nearest parent first, root last.
            ///
            /// Empty for root kinds.
            #[inline]
            pub const fn ancestors(self) -> &'static [ExceptionKind] {
                match self {
                    $(Self::$kind => &[$(ExceptionKind::$ancestor),*],)+
                }
            }

            /// Human-readable meaning of the category.
            #[inline]
            pub const fn description(self) -> &'static str {
                match self {
                    $(Self::$kind => $description,)+
                }
            }
        }
    };
}

exception_kinds! {
    LogicError => [] : "Programming or logic defect; should lead directly to a fix in code.",
    RuntimeError => [] : "Defect that can only be detected at run time.",
    IgnorableError => [] : "Non-fatal failure that is safe to suppress.",
    UnexpectedValueError => [] : "Returned or observed value outside the expected set of values.",
    BadFunctionCallError => [LogicError] : "Callee is undefined or arguments are missing.",
    BadMethodCallError => [BadFunctionCallError, LogicError] : "Method is undefined or arguments are missing.",
    DomainError => [LogicError] : "Value does not adhere to a defined valid data domain.",
    InvalidArgumentError => [LogicError] : "Argument is not of the expected type or shape.",
    LengthError => [LogicError] : "Length is invalid.",
    OutOfRangeError => [LogicError] : "Illegal index requested; detectable statically.",
    OutOfBoundsError => [RuntimeError] : "Value is not a valid key; detectable only at run time.",
    OverflowError => [RuntimeError] : "Element added to a full container.",
    UnderflowError => [RuntimeError] : "Invalid operation on an empty container.",
    RangeError => [RuntimeError] : "Arithmetic or range fault other than over/underflow.",
}

impl ExceptionKind {
    /// Direct parent in the lattice, if any.
    #[inline]
    pub const fn parent(self) -> Option<ExceptionKind> {
        match self.ancestors() {
            [parent, ..] => Some(*parent),
            [] => None,
        }
    }

    /// Root category this kind descends from (itself for roots).
    #[inline]
    pub const fn root(self) -> ExceptionKind {
        match self.ancestors() {
            [.., root] => *root,
            [] => self,
        }
    }

    /// Whether this kind has no parent.
    #[inline]
    pub const fn is_root(self) -> bool {
        self.ancestors().is_empty()
    }

    /// Category membership: `true` when `category` is this kind or one of
    /// its ancestors.
    #[inline]
    pub fn is_a(self, category: ExceptionKind) -> bool {
        self == category || self.ancestors().contains(&category)
    }

    /// Kinds whose direct parent is this kind.
    pub fn children(self) -> impl Iterator<Item = ExceptionKind> {
        Self::ALL
            .iter()
            .copied()
            .filter(move |kind| kind.parent() == Some(self))
    }

    /// Look a kind up by its label.
    pub fn from_label(label: &str) -> Option<ExceptionKind> {
        Self::ALL.iter().copied().find(|kind| kind.label() == label)
    }
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
