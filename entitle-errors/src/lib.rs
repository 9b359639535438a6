//! # entitle-errors
//!
//! Structured, causally-complete error diagnostics for entitle.
//!
//! ## Design Philosophy
//!
//! - **Fields**: Key/value context attached at every layer a failure crosses
//! - **Stack**: Captured once, where the failure first entered the system
//! - **Wraps**: An append-only record of every annotation layer, in order
//! - **Cause**: The original foreign error preserved unchanged for inspection
//! - **Status**: An optional HTTP classification any layer can carry
//!
//! ## Usage
//!
//! ```rust
//! use entitle_errors::{fields, http_status, wrapf, Error, ResultExt};
//!
//! fn load_plan(id: u32) -> entitle_errors::Result<String> {
//!     let err = Error::not_found(fields! { "plan_id" => id }, "no such plan");
//!     Err(wrapf!(err, fields! { "op" => "load_plan" }, "loading plan {}", id))
//! }
//!
//! let err = load_plan(7).unwrap_err();
//! assert_eq!(err.message(), "loading plan 7: no such plan");
//! assert_eq!(http_status(Some(&err)), (404, true));
//!
//! let report = err.unwind().to_report();
//! let json = serde_json::to_value(&report).unwrap();
//! assert_eq!(json["cause"]["text"], "no such plan");
//! ```
//!
//! ## Principles
//!
//! - Errors are values: every operation returns a new error sharing the
//!   immutable parts, never mutating the receiver
//! - Wrap at the boundaries you want diagnosable, forward the rest untouched
//! - The core never swallows a failure; it only enriches and reshapes it
//!   for the caller to decide

mod error;
mod fields;
mod frame;
mod panic;
mod report;
mod status;
mod unwind;
mod wrap;

pub use error::{BaseRecord, Error, WrapRecord};
pub use fields::Fields;
pub use frame::{capture_stack, Frame, UNKNOWN};
pub use panic::catch_panic;
pub use report::{CauseReport, Report};
pub use status::http_status;
pub use unwind::{unwind, Cause, Unwound};
pub use wrap::{with_stack, wrap, wrap_msg, ResultExt};

/// Result type alias using the diagnostic Error
pub type Result<T> = std::result::Result<T, Error>;
