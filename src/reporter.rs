//! Opt-in failure reporting.
//!
//! Some failures are worth surfacing to a monitoring sink even though they are
//! also returned to the caller; the date parser reports every input it cannot
//! understand. Reporting is fire-and-forget: a reporter cannot change the
//! outcome of the operation that triggered it, and with no reporter installed
//! nothing happens at all.
//!
//! # Installing a sink
//!
//! The reporter slot is per thread, like a session setting. Install a sink on
//! each thread that should report:
//!
//! ```rust
//! use helper_kit::{dates, reporter, RingBufferReporter};
//! use std::sync::Arc;
//!
//! // Max 1000 entries, 2KB per entry
//! let sink = RingBufferReporter::new(1000, 2048);
//! reporter::set_reporter(Arc::new(sink.clone()));
//!
//! assert!(dates::parse_date_string("ABCDE").is_err());
//!
//! let recent = sink.get_recent(1);
//! assert_eq!(recent[0].extra("input"), Some("ABCDE"));
//! reporter::clear_reporter();
//! ```
//!
//! # Ring buffer sink
//!
//! [`RingBufferReporter`] keeps a fixed number of entries with FIFO eviction
//! and a per-entry byte cap, so a flood of bad input cannot grow memory
//! without bound. Clones share the same buffer; readers run concurrently.

use crate::{Exception, ExceptionKind};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{SystemTime, UNIX_EPOCH};
use zeroize::{Zeroize, Zeroizing};

/// Severity attached to a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportLevel {
    /// Degraded but handled.
    Warning,
    /// Operation failed.
    Error,
}

impl ReportLevel {
    /// Lowercase name, as monitoring backends expect it.
    pub const fn as_str(self) -> &'static str {
        match self {
            ReportLevel::Warning => "warning",
            ReportLevel::Error => "error",
        }
    }
}

impl fmt::Display for ReportLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failure handed to a reporter.
///
/// Borrows everything; a reporter that keeps data must copy it.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    level: ReportLevel,
    exception: &'a Exception,
    extras: &'a [(&'static str, &'a str)],
}

impl<'a> Report<'a> {
    /// Bundle a failure with its level and extra key/value context.
    pub const fn new(
        level: ReportLevel,
        exception: &'a Exception,
        extras: &'a [(&'static str, &'a str)],
    ) -> Self {
        Self {
            level,
            exception,
            extras,
        }
    }

    /// Severity.
    #[inline]
    pub const fn level(&self) -> ReportLevel {
        self.level
    }

    /// The reported exception.
    #[inline]
    pub const fn exception(&self) -> &'a Exception {
        self.exception
    }

    /// Extra context, in the order it was given.
    #[inline]
    pub const fn extras(&self) -> &'a [(&'static str, &'a str)] {
        self.extras
    }

    /// Look up one extra by key.
    pub fn extra(&self, key: &str) -> Option<&'a str> {
        self.extras
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| *value)
    }
}

/// A sink for failure reports.
///
/// Implementations must not panic and should return quickly; they run inline
/// on the failing call.
pub trait ErrorReporter: Send + Sync {
    /// Receive one report.
    fn report(&self, report: &Report<'_>);
}

impl<F> ErrorReporter for F
where
    F: Fn(&Report<'_>) + Send + Sync,
{
    fn report(&self, report: &Report<'_>) {
        self(report)
    }
}

// ============================================================================
// Thread-scoped reporter slot
// ============================================================================

thread_local! {
    static REPORTER: RefCell<Option<Arc<dyn ErrorReporter>>> = const { RefCell::new(None) };
}

/// Install the reporter for the current thread, replacing any previous one.
pub fn set_reporter(reporter: Arc<dyn ErrorReporter>) {
    REPORTER.with(|slot| *slot.borrow_mut() = Some(reporter));
}

/// Remove the current thread's reporter.
pub fn clear_reporter() {
    REPORTER.with(|slot| *slot.borrow_mut() = None);
}

/// Whether the current thread has a reporter installed.
pub fn has_reporter() -> bool {
    REPORTER.with(|slot| slot.borrow().is_some())
}

/// Hand `exception` to the current thread's reporter, if any.
///
/// The slot is released before the reporter runs, so a reporter may itself
/// install or clear reporters.
pub fn report_exception(exception: &Exception, level: ReportLevel, extras: &[(&'static str, &str)]) {
    let reporter = REPORTER.with(|slot| slot.borrow().clone());
    if let Some(reporter) = reporter {
        reporter.report(&Report::new(level, exception, extras));
    }
}

// ============================================================================
// Ring buffer sink
// ============================================================================

/// Byte cap for an entry's message before the extras budget.
const MESSAGE_CAP: usize = 512;

/// Byte cap for a single extra value.
const EXTRA_VALUE_CAP: usize = 128;

/// Text copied out of a report into the ring buffer.
///
/// Clones share one buffer. The buffer is zeroized when the last clone
/// drops, the same as an owned exception message.
#[derive(Clone)]
pub struct RetainedText(Arc<Zeroizing<String>>);

impl RetainedText {
    fn new(text: &str) -> Self {
        Self(Arc::new(Zeroizing::new(text.to_owned())))
    }

    /// The retained text.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Zeroize for RetainedText {
    /// Wipes the text now when this is the only clone; shared text is left
    /// to be wiped by the last clone's drop.
    fn zeroize(&mut self) {
        if let Some(text) = Arc::get_mut(&mut self.0) {
            text.zeroize();
        }
    }
}

impl Deref for RetainedText {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for RetainedText {
    #[inline]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Debug for RetainedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for RetainedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A retained report with bounded size.
///
/// Text fields are shared, so `get_recent()` clones are refcount increments.
#[derive(Clone, Debug)]
pub struct ReportEntry {
    /// Unix timestamp (seconds) when the report was received
    pub timestamp: u64,
    /// Severity
    pub level: ReportLevel,
    /// Exception kind
    pub kind: ExceptionKind,
    /// Exception message, truncated
    pub message: RetainedText,
    /// Extras that fit the entry budget, values truncated
    pub extras: Arc<[(&'static str, RetainedText)]>,
    /// Approximate size in bytes
    pub size_bytes: usize,
}

impl ReportEntry {
    /// Look up one retained extra by key.
    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extras
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| value.as_str())
    }
}

/// Fixed-size ring buffer with exact allocation (no growth).
struct RingBuffer {
    entries: Box<[Option<ReportEntry>]>,
    tail: usize,
    head: usize,
    len: usize,
}

impl RingBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            entries: std::iter::repeat_with(|| None)
                .take(capacity)
                .collect::<Box<[Option<ReportEntry>]>>(),
            tail: 0,
            head: 0,
            len: 0,
        }
    }

    fn push(&mut self, entry: ReportEntry) -> Option<ReportEntry> {
        let evicted = self.entries[self.tail].replace(entry);
        self.tail = (self.tail + 1) % self.entries.len();

        if self.len < self.entries.len() {
            self.len += 1;
        } else {
            self.head = (self.head + 1) % self.entries.len();
        }

        evicted
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    fn iter(&self) -> impl DoubleEndedIterator<Item = &ReportEntry> {
        let head = self.head;
        let cap = self.entries.len();

        (0..self.len).filter_map(move |i| self.entries[(head + i) % cap].as_ref())
    }

    fn clear(&mut self) {
        for entry in self.entries.iter_mut() {
            *entry = None;
        }
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }
}

/// In-memory reporter with bounded memory usage.
pub struct RingBufferReporter {
    buffer: Arc<RwLock<RingBuffer>>,
    max_entries: usize,
    max_entry_bytes: usize,
    eviction_count: Arc<AtomicU64>,
}

impl RingBufferReporter {
    /// Create a sink holding at most `max_entries` entries (at least one) of
    /// at most `max_entry_bytes` payload bytes each.
    pub fn new(max_entries: usize, max_entry_bytes: usize) -> Self {
        let bounded_entries = max_entries.max(1);
        Self {
            buffer: Arc::new(RwLock::new(RingBuffer::new(bounded_entries))),
            max_entries: bounded_entries,
            max_entry_bytes,
            eviction_count: Arc::new(AtomicU64::new(0)),
        }
    }

    #[inline]
    fn read_buffer(&self) -> RwLockReadGuard<'_, RingBuffer> {
        match self.buffer.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[inline]
    fn write_buffer(&self) -> RwLockWriteGuard<'_, RingBuffer> {
        match self.buffer.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn create_entry(&self, report: &Report<'_>) -> ReportEntry {
        let mut remaining = self.max_entry_bytes;

        let message = truncate_to_bytes(report.exception().message(), remaining.min(MESSAGE_CAP));
        let mut size = message.len();
        remaining = remaining.saturating_sub(message.len());

        let mut extras: SmallVec<[(&'static str, RetainedText); 4]> = SmallVec::new();
        for (key, value) in report.extras() {
            if key.len() >= remaining {
                break;
            }
            let value = truncate_to_bytes(value, (remaining - key.len()).min(EXTRA_VALUE_CAP));
            let used = key.len() + value.len();
            size += used;
            remaining -= used;

            extras.push((*key, RetainedText::new(&value)));
        }

        ReportEntry {
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |d| d.as_secs()),
            level: report.level(),
            kind: report.exception().kind(),
            message: RetainedText::new(&message),
            extras: extras.into_vec().into(),
            size_bytes: size,
        }
    }

    /// The `count` most recent entries, newest first.
    pub fn get_recent(&self, count: usize) -> Vec<ReportEntry> {
        let buffer = self.read_buffer();
        buffer.iter().rev().take(count).cloned().collect()
    }

    /// All entries, newest first.
    pub fn get_all(&self) -> Vec<ReportEntry> {
        let buffer = self.read_buffer();
        buffer.iter().rev().cloned().collect()
    }

    /// Entries matching a predicate, oldest first.
    ///
    /// ```rust
    /// # use helper_kit::{ExceptionKind, RingBufferReporter};
    /// # let sink = RingBufferReporter::new(100, 1024);
    /// let invalid = sink.get_filtered(|entry| entry.kind.is_a(ExceptionKind::LogicError));
    /// # assert!(invalid.is_empty());
    /// ```
    pub fn get_filtered<F>(&self, predicate: F) -> Vec<ReportEntry>
    where
        F: Fn(&ReportEntry) -> bool,
    {
        let buffer = self.read_buffer();
        buffer.iter().filter(|e| predicate(e)).cloned().collect()
    }

    /// Current number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.read_buffer().len()
    }

    /// Whether no entries are held.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total evictions since creation.
    #[inline]
    pub fn eviction_count(&self) -> u64 {
        self.eviction_count.load(Ordering::Relaxed)
    }

    /// Drop every entry. The eviction count is kept.
    pub fn clear(&self) {
        self.write_buffer().clear();
    }

    /// Maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    /// Whether the next report will evict an entry.
    pub fn is_full(&self) -> bool {
        self.len() >= self.max_entries
    }
}

impl ErrorReporter for RingBufferReporter {
    fn report(&self, report: &Report<'_>) {
        let entry = self.create_entry(report);

        if self.write_buffer().push(entry).is_some() {
            self.eviction_count.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl Clone for RingBufferReporter {
    fn clone(&self) -> Self {
        Self {
            buffer: Arc::clone(&self.buffer),
            max_entries: self.max_entries,
            max_entry_bytes: self.max_entry_bytes,
            eviction_count: Arc::clone(&self.eviction_count),
        }
    }
}

impl fmt::Debug for RingBufferReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBufferReporter")
            .field("len", &self.len())
            .field("capacity", &self.max_entries)
            .field("max_entry_bytes", &self.max_entry_bytes)
            .field("eviction_count", &self.eviction_count())
            .finish()
    }
}

/// Truncate to a maximum byte length on a UTF-8 boundary.
fn truncate_to_bytes(s: &str, max_bytes: usize) -> Cow<'_, str> {
    if s.len() <= max_bytes {
        return Cow::Borrowed(s);
    }

    let indicator = "...[TRUNC]";
    if max_bytes <= indicator.len() {
        return Cow::Borrowed(&indicator[..max_bytes]);
    }

    let mut idx = max_bytes - indicator.len();
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }

    let mut out = String::with_capacity(idx + indicator.len());
    out.push_str(&s[..idx]);
    out.push_str(indicator);
    Cow::Owned(out)
}
