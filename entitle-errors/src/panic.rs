//! Panic interception at recovery boundaries

use crate::error::Error;
use crate::wrap::with_stack;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Run `f`, converting a panic into a diagnostic error.
///
/// The payload becomes the foreign cause: string payloads keep their
/// text, anything else gets a generic message. Conversion goes through
/// [`with_stack`](crate::with_stack), so a recovered panic is
/// structurally indistinguishable from an ordinarily wrapped foreign
/// error; the stack reflects this recovery point.
///
/// # Example
///
/// ```rust
/// use entitle_errors::catch_panic;
///
/// let err = catch_panic(|| -> u32 { panic!("sum overflowed") }).unwrap_err();
/// assert_eq!(err.unwind().cause.message(), "sum overflowed");
/// ```
pub fn catch_panic<T>(f: impl FnOnce() -> T) -> Result<T, Error> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Ok(value),
        Err(payload) => {
            let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
                (*s).to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "panic with non-string payload".to_string()
            };
            Err(with_stack(anyhow::Error::msg(message)))
        }
    }
}
