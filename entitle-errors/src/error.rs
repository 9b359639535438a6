//! The diagnostic error type

use crate::fields::Fields;
use crate::frame::{capture_stack, Frame};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The creation record of a diagnostic error: the fields, call-site
/// location, and text supplied where the error entered the system.
///
/// Serializes with the location flattened, matching the wire shape
/// `{fields, file, func, line, text}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseRecord {
    pub fields: Fields,
    #[serde(flatten)]
    pub location: Frame,
    pub text: String,
}

/// One annotation layer applied while an error propagated.
///
/// `text` is the fully composed message at that layer, so the most
/// recent record always carries the complete "outer: ...: inner" text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrapRecord {
    pub fields: Fields,
    #[serde(flatten)]
    pub location: Frame,
    pub text: String,
}

/// A structured error carrying everything needed to diagnose a failure:
///
/// - a base record: the fields, location, and text from the creation site
/// - the call stack captured when the error first entered the system
/// - one wrap record per annotation layer, in chronological order
/// - the original foreign error, preserved unchanged, when there is one
/// - an HTTP status classification, when deliberately set
///
/// Values are never mutated in place. Every operation returns a new
/// value sharing the immutable parts, so one error can be held and
/// wrapped from several call paths without interference.
///
/// # Example
///
/// ```rust
/// use entitle_errors::{fields, Error};
///
/// let err = Error::not_found(fields! { "account_id" => "acc-9" }, "account missing")
///     .with(fields! { "region" => "eu-1" });
///
/// assert_eq!(err.message(), "account missing");
/// assert_eq!(err.status_code(), Some(404));
/// assert!(err.fields().contains_key("region"));
/// assert!(err.fields().contains_key("account_id"));
/// ```
#[derive(Clone)]
pub struct Error {
    pub(crate) base: Arc<BaseRecord>,
    pub(crate) stack: Arc<[Frame]>,
    pub(crate) wraps: Arc<Vec<WrapRecord>>,
    pub(crate) cause: Option<Arc<anyhow::Error>>,
    pub(crate) status: Option<u16>,
}

impl Error {
    /// Create a new diagnostic error, capturing the call stack here.
    #[inline(never)]
    pub fn new(fields: Fields, text: impl Into<String>) -> Self {
        Self::construct(fields, text.into(), None, 2)
    }

    /// Create an error classified as HTTP 404.
    #[inline(never)]
    pub fn not_found(fields: Fields, text: impl Into<String>) -> Self {
        Self::construct(fields, text.into(), Some(404), 2)
    }

    /// Create a status-bearing error with a deliberately shallow stack.
    ///
    /// Meant to be called directly at the failure site, so the snapshot
    /// keeps only the nearest three frames.
    #[inline(never)]
    pub fn http(status: u16, text: impl Into<String>) -> Self {
        let mut err = Self::construct(Fields::new(), text.into(), Some(status), 2);
        let mut stack = err.stack.to_vec();
        stack.truncate(3);
        err.stack = stack.into();
        err
    }

    #[inline(never)]
    fn construct(fields: Fields, text: String, status: Option<u16>, skip: usize) -> Self {
        let stack = capture_stack(skip);
        let location = stack.first().cloned().unwrap_or_else(Frame::unknown);
        Self {
            base: Arc::new(BaseRecord {
                fields,
                location,
                text,
            }),
            stack: stack.into(),
            wraps: Arc::new(Vec::new()),
            cause: None,
            status,
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// The current message: the most recent wrap's composed text, or the
    /// base text when nothing has wrapped the error yet
    pub fn message(&self) -> &str {
        self.wraps
            .last()
            .map(|w| w.text.as_str())
            .unwrap_or(&self.base.text)
    }

    /// Fields of the most recently created record (the latest wrap if
    /// any exist, else the base record); the record `with` merges into
    pub fn fields(&self) -> &Fields {
        self.wraps
            .last()
            .map(|w| &w.fields)
            .unwrap_or(&self.base.fields)
    }

    /// The creation record
    pub fn base(&self) -> &BaseRecord {
        &self.base
    }

    /// The stack captured when the error entered the diagnostic system
    pub fn stack(&self) -> &[Frame] {
        &self.stack
    }

    /// Every annotation layer, innermost first
    pub fn wraps(&self) -> &[WrapRecord] {
        &self.wraps
    }

    /// The HTTP status this error carries, if deliberately classified
    pub fn status_code(&self) -> Option<u16> {
        self.status
    }

    /// The original foreign error, when this error wrapped one
    pub fn foreign_cause(&self) -> Option<&anyhow::Error> {
        self.cause.as_deref()
    }

    // =========================================================================
    // Builders (chainable)
    // =========================================================================

    /// Merge fields into the most recently created record.
    ///
    /// Adds no stack frame and no wrap record; later keys win over
    /// earlier ones on the same record.
    pub fn with(mut self, fields: Fields) -> Self {
        if self.wraps.is_empty() {
            Arc::make_mut(&mut self.base).fields.merge(fields);
        } else if let Some(last) = Arc::make_mut(&mut self.wraps).last_mut() {
            last.fields.merge(fields);
        }
        self
    }

    /// Set the HTTP status this error should classify as
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

// =============================================================================
// Display - the composed message, nothing else
// =============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

// =============================================================================
// Debug - verbose, multi-line format for debugging
// =============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Error: {}", self.message())?;

        if let Some(status) = self.status {
            writeln!(f, "    Status: {}", status)?;
        }

        if !self.base.fields.is_empty() {
            writeln!(f, "    Fields:")?;
            for (key, value) in self.base.fields.iter() {
                writeln!(f, "        {}: {}", key, value)?;
            }
        }

        for (i, wrap) in self.wraps.iter().enumerate() {
            writeln!(f, "    Wrap[{}] at {}: {}", i, wrap.location, wrap.text)?;
        }

        if let Some(cause) = &self.cause {
            writeln!(f, "    Cause: {}", cause)?;
        }

        if let Some(first) = self.stack.first() {
            writeln!(f, "    Stack: {} frames from {}", self.stack.len(), first.func)?;
        }

        Ok(())
    }
}

// =============================================================================
// std::error::Error implementation
// =============================================================================

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

// =============================================================================
// Convenient From implementations (entry points for `?`)
// =============================================================================

impl From<std::io::Error> for Error {
    #[inline(never)]
    fn from(err: std::io::Error) -> Self {
        crate::wrap::wrap_inner(err.into(), Fields::new(), None, 2)
    }
}

impl From<anyhow::Error> for Error {
    #[inline(never)]
    fn from(err: anyhow::Error) -> Self {
        crate::wrap::wrap_inner(err, Fields::new(), None, 2)
    }
}
