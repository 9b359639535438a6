//! Flattening an error into its loggable parts

use crate::error::{BaseRecord, Error, WrapRecord};
use crate::fields::Fields;
use crate::frame::Frame;
use std::fmt;
use std::sync::Arc;

/// The flattened view of an error: the entry stack, every wrap layer in
/// chronological order (innermost first), and the root cause.
///
/// Because the stack is fixed when an error enters the system and wraps
/// only ever append, the outermost error value already carries the
/// complete picture; unwinding reads it off directly without walking
/// intermediate layers.
#[derive(Debug, Clone)]
pub struct Unwound {
    pub stack: Vec<Frame>,
    pub wraps: Vec<WrapRecord>,
    pub cause: Cause,
}

/// The root cause extracted from an error.
///
/// Either the foreign error exactly as it was first wrapped, preserved
/// for type-based inspection, or the creation record of a natively
/// constructed error. Both display the original message; the native
/// form keeps its fields and status classification.
#[derive(Debug, Clone)]
pub enum Cause {
    /// A failure that originated outside the diagnostic system
    Foreign(Arc<anyhow::Error>),
    /// A natively constructed error's creation record
    Base {
        record: Arc<BaseRecord>,
        status: Option<u16>,
    },
}

impl Cause {
    /// The root-cause message
    pub fn message(&self) -> String {
        match self {
            Cause::Foreign(err) => err.to_string(),
            Cause::Base { record, .. } => record.text.clone(),
        }
    }

    /// Creation-site fields, when the cause is a native record
    pub fn fields(&self) -> Option<&Fields> {
        match self {
            Cause::Foreign(_) => None,
            Cause::Base { record, .. } => Some(&record.fields),
        }
    }

    /// The HTTP status the cause carries, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Cause::Foreign(_) => None,
            Cause::Base { status, .. } => *status,
        }
    }

    /// The foreign error, preserved for downcasting
    pub fn foreign(&self) -> Option<&anyhow::Error> {
        match self {
            Cause::Foreign(err) => Some(err),
            Cause::Base { .. } => None,
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Foreign(err) => fmt::Display::fmt(err, f),
            Cause::Base { record, .. } => f.write_str(&record.text),
        }
    }
}

impl std::error::Error for Cause {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            // the cause stands in for the foreign error, so its source
            // is the foreign error's own source
            Cause::Foreign(err) => err.chain().nth(1),
            Cause::Base { .. } => None,
        }
    }
}

impl Error {
    /// Flatten into the (stack, wraps, cause) triple.
    pub fn unwind(&self) -> Unwound {
        let cause = match &self.cause {
            Some(foreign) => Cause::Foreign(Arc::clone(foreign)),
            None => Cause::Base {
                record: Arc::clone(&self.base),
                status: self.status,
            },
        };
        Unwound {
            stack: self.stack.to_vec(),
            wraps: self.wraps.as_ref().clone(),
            cause,
        }
    }
}

/// Unwind any error value.
///
/// A diagnostic error flattens as usual. Anything else degenerates to
/// an empty stack, no wraps, and the error itself as the cause, with
/// its concrete type intact.
pub fn unwind(err: impl Into<anyhow::Error>) -> Unwound {
    match err.into().downcast::<Error>() {
        Ok(diag) => diag.unwind(),
        Err(foreign) => Unwound {
            stack: Vec::new(),
            wraps: Vec::new(),
            cause: Cause::Foreign(Arc::new(foreign)),
        },
    }
}
