//! Wrapping operations: how errors enter and move through the diagnostic
//! system
//!
//! A diagnostic error gains one wrap record per layer. Any other error
//! becomes the entry point: the stack is captured at that call site and
//! the error rides along unchanged as the foreign cause.

use crate::error::{BaseRecord, Error, WrapRecord};
use crate::fields::Fields;
use crate::frame::{capture_stack, Frame};
use std::sync::Arc;

/// Wrap an error with context fields and no added message text.
///
/// The new record's text is the wrapped error's message unchanged, so
/// the composed message is preserved through textless layers.
#[inline(never)]
pub fn wrap(err: impl Into<anyhow::Error>, fields: Fields) -> Error {
    wrap_inner(err.into(), fields, None, 2)
}

/// Wrap an error with context fields and a message.
///
/// The record carries the composed text `"{text}: {inner message}"`.
/// Use [`wrapf!`](crate::wrapf) to format the text inline.
#[inline(never)]
pub fn wrap_msg(err: impl Into<anyhow::Error>, fields: Fields, text: impl Into<String>) -> Error {
    wrap_inner(err.into(), fields, Some(text.into()), 2)
}

/// Convert an error with no additional context.
///
/// Identical to [`wrap`] with empty fields; used at panic-recovery
/// boundaries and anywhere a foreign error should enter the system
/// as-is, with the stack captured here.
#[inline(never)]
pub fn with_stack(err: impl Into<anyhow::Error>) -> Error {
    wrap_inner(err.into(), Fields::new(), None, 2)
}

/// Shared wrapping core. `skip` is the number of frames between the
/// public entry point's caller and the capture, so the recorded
/// location is always application code.
#[inline(never)]
pub(crate) fn wrap_inner(
    err: anyhow::Error,
    fields: Fields,
    text: Option<String>,
    skip: usize,
) -> Error {
    let frames = capture_stack(skip);
    let location = frames.first().cloned().unwrap_or_else(Frame::unknown);

    match err.downcast::<Error>() {
        Ok(inner) => {
            let composed = match &text {
                Some(t) => format!("{}: {}", t, inner.message()),
                None => inner.message().to_string(),
            };
            let mut wraps = Arc::clone(&inner.wraps);
            Arc::make_mut(&mut wraps).push(WrapRecord {
                fields,
                location,
                text: composed,
            });
            Error {
                base: inner.base,
                stack: inner.stack,
                wraps,
                cause: inner.cause,
                status: inner.status,
            }
        }
        Err(foreign) => {
            let composed = match &text {
                Some(t) => format!("{}: {}", t, foreign),
                None => foreign.to_string(),
            };
            let base = BaseRecord {
                fields: Fields::new(),
                location: location.clone(),
                text: String::new(),
            };
            Error {
                base: Arc::new(base),
                stack: frames.into(),
                wraps: Arc::new(vec![WrapRecord {
                    fields,
                    location,
                    text: composed,
                }]),
                cause: Some(Arc::new(foreign)),
                status: None,
            }
        }
    }
}

// =============================================================================
// Result extension - the unconditional-annotation idiom
// =============================================================================

/// Wrapping for the error half of a `Result`.
///
/// `Ok` values pass through untouched, so call sites can annotate
/// unconditionally after an operation that may or may not have failed:
///
/// ```rust
/// use entitle_errors::{fields, Error, ResultExt};
///
/// fn read_config(path: &str) -> Result<String, Error> {
///     std::fs::read_to_string(path).wrap(fields! { "path" => path })
/// }
/// ```
pub trait ResultExt<T> {
    /// Wrap the error, if any, with context fields
    fn wrap(self, fields: Fields) -> Result<T, Error>;

    /// Wrap the error, if any, with context fields and a message
    fn wrap_msg(self, fields: Fields, text: impl Into<String>) -> Result<T, Error>;

    /// Convert the error, if any, with no additional context
    fn with_stack(self) -> Result<T, Error>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    #[inline(never)]
    fn wrap(self, fields: Fields) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(wrap_inner(err.into(), fields, None, 2)),
        }
    }

    #[inline(never)]
    fn wrap_msg(self, fields: Fields, text: impl Into<String>) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(wrap_inner(err.into(), fields, Some(text.into()), 2)),
        }
    }

    #[inline(never)]
    fn with_stack(self) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(wrap_inner(err.into(), Fields::new(), None, 2)),
        }
    }
}

// =============================================================================
// Formatting macros
// =============================================================================

/// Wrap an error with fields and a formatted message.
///
/// Expands to [`wrap_msg`] with `format!`-style arguments:
///
/// ```rust
/// use entitle_errors::{fields, wrapf, Error};
///
/// let inner = Error::new(fields! {}, "row missing");
/// let err = wrapf!(inner, fields! { "table" => "plans" }, "loading plan {}", 7);
/// assert_eq!(err.message(), "loading plan 7: row missing");
/// ```
#[macro_export]
macro_rules! wrapf {
    ($err:expr, $fields:expr, $($arg:tt)*) => {
        $crate::wrap_msg($err, $fields, format!($($arg)*))
    };
}

/// Construct a diagnostic error with a formatted message.
#[macro_export]
macro_rules! newf {
    ($fields:expr, $($arg:tt)*) => {
        $crate::Error::new($fields, format!($($arg)*))
    };
}
