//! # entitle-validation
//!
//! Input validation for entitle requests, with failures that convert
//! straight into 400-classified diagnostic errors.
//!
//! ## Design Philosophy
//!
//! - **Collect, don't bail**: a [`Validate`] implementation reports every
//!   failing field in one pass so the caller can fix them all at once
//! - **Plain predicates**: [`is_empty`], [`is_email`], [`is_url`] and
//!   [`matches`] are free functions usable outside the trait
//! - **One conversion**: `Errors` becomes an [`entitle_errors::Error`]
//!   carrying a 400 status and one context field per offending input
//!
//! ## Usage
//!
//! ```
//! use entitle_validation::{invalid_email, invalid_empty, Errors, Validate};
//!
//! struct Signup {
//!     name: String,
//!     email: String,
//! }
//!
//! impl Validate for Signup {
//!     fn validate(&self) -> Result<(), Errors> {
//!         let mut errors = Errors::new();
//!         if entitle_validation::is_empty(&self.name) {
//!             errors.push(invalid_empty("name"));
//!         }
//!         if !entitle_validation::is_email(&self.email) {
//!             errors.push(invalid_email("email", &self.email));
//!         }
//!         errors.into_result()
//!     }
//! }
//!
//! let bad = Signup { name: "  ".into(), email: "nope".into() };
//! let errors = bad.validate().unwrap_err();
//! assert_eq!(errors.len(), 2);
//!
//! let err = entitle_errors::Error::from(errors);
//! assert_eq!(err.status_code(), Some(400));
//! ```

// =========================================================================
// Modules
// =========================================================================

mod error;

pub use error::{invalid_email, invalid_empty, invalid_pattern, invalid_url, Errors, Invalid};

use regex::Regex;
use std::sync::OnceLock;

// =========================================================================
// Predicates
// =========================================================================

/// Whether the value is empty after trimming whitespace.
pub fn is_empty(value: &str) -> bool {
    value.trim().is_empty()
}

/// Whether the value looks like an email address.
///
/// Deliberately loose: one `@`, a dotted domain, a two-letter-or-longer
/// top level. Deliverability is the mail server's problem.
pub fn is_email(value: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
            .unwrap_or_else(|e| panic!("email pattern failed to compile: {e}"))
    });
    re.is_match(value)
}

/// Whether the value parses as an absolute http or https URL.
pub fn is_url(value: &str) -> bool {
    match url::Url::parse(value) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Whether the value matches the given regular expression.
///
/// An invalid pattern matches nothing.
pub fn matches(value: &str, pattern: &str) -> bool {
    match Regex::new(pattern) {
        Ok(re) => re.is_match(value),
        Err(_) => false,
    }
}

// =========================================================================
// Validate trait
// =========================================================================

/// Implemented by request payloads that check themselves before being
/// sent anywhere.
pub trait Validate {
    /// Report every failing field, or `Ok(())` when the value is sound.
    fn validate(&self) -> Result<(), Errors>;
}

// =========================================================================
// Tests
// =========================================================================
