//! HTTP status classification

use crate::error::Error;
use crate::unwind::Cause;

/// Extract an HTTP status code from an error.
///
/// Returns `(status, true)` when the error, its cause, or anything in
/// its `source()` chain deliberately carries a status; `(200, false)`
/// when there is no error at all; and `(500, false)` as the safe
/// fallback for everything else. The boolean tells callers whether the
/// classification was intentional or the fallback.
///
/// The walk goes through the standard source chain, so any error type
/// that embeds a diagnostic error and exposes it via `source()` is
/// classified without this function knowing the type.
///
/// # Example
///
/// ```rust
/// use entitle_errors::{http_status, Error};
///
/// assert_eq!(http_status(None), (200, false));
///
/// let err = Error::http(402, "insert coins");
/// assert_eq!(http_status(Some(&err)), (402, true));
/// ```
pub fn http_status(err: Option<&(dyn std::error::Error + 'static)>) -> (u16, bool) {
    let mut current = match err {
        None => return (200, false),
        Some(e) => Some(e),
    };

    while let Some(e) = current {
        if let Some(diag) = e.downcast_ref::<Error>() {
            if let Some(status) = diag.status_code() {
                return (status, true);
            }
        } else if let Some(cause) = e.downcast_ref::<Cause>() {
            if let Some(status) = cause.status_code() {
                return (status, true);
            }
        }
        current = e.source();
    }

    (500, false)
}
