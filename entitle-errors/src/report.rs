//! The serialized diagnostic record

use crate::error::{BaseRecord, WrapRecord};
use crate::frame::Frame;
use crate::unwind::{Cause, Unwound};
use serde::{Deserialize, Serialize};

/// The JSON-shaped rendering of an unwound error, as consumed by
/// logging and observability pipelines:
///
/// - `stack`: `{file, func, line}` objects in capture order
/// - `wraps`: `{fields, file, func, line, text}` objects, innermost
///   wrap first
/// - `cause`: the foreign error's message as a plain string, or the
///   base record's full `{fields, file, func, line, text}` shape
///
/// Reports round-trip: serializing and parsing one back preserves every
/// field, frame, and ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub stack: Vec<Frame>,
    pub wraps: Vec<WrapRecord>,
    pub cause: CauseReport,
}

/// The cause half of a [`Report`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CauseReport {
    /// A foreign cause renders as its message
    Message(String),
    /// A native cause keeps the base record shape
    Record(BaseRecord),
}

impl Unwound {
    /// Render to the serialization contract.
    pub fn to_report(&self) -> Report {
        let cause = match &self.cause {
            Cause::Foreign(err) => CauseReport::Message(err.to_string()),
            Cause::Base { record, .. } => CauseReport::Record(record.as_ref().clone()),
        };
        Report {
            stack: self.stack.clone(),
            wraps: self.wraps.clone(),
            cause,
        }
    }
}
