//! Validation failures and their conversion into diagnostic errors

use entitle_errors::Fields;
use std::fmt;

/// A single field validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Invalid {
    #[error("field '{field}' must not be empty")]
    Empty { field: String },

    #[error("field '{field}' must be a valid email address, got '{value}'")]
    Email { field: String, value: String },

    #[error("field '{field}' must be a valid http(s) url, got '{value}'")]
    Url { field: String, value: String },

    #[error("field '{field}' does not match '{pattern}'")]
    Pattern {
        field: String,
        value: String,
        pattern: String,
    },
}

impl Invalid {
    /// The name of the offending field
    pub fn field(&self) -> &str {
        match self {
            Invalid::Empty { field }
            | Invalid::Email { field, .. }
            | Invalid::Url { field, .. }
            | Invalid::Pattern { field, .. } => field,
        }
    }

    /// The rejected value, when one was supplied
    pub fn value(&self) -> Option<&str> {
        match self {
            Invalid::Empty { .. } => None,
            Invalid::Email { value, .. }
            | Invalid::Url { value, .. }
            | Invalid::Pattern { value, .. } => Some(value),
        }
    }
}

/// A field that must not be empty was
pub fn invalid_empty(field: impl Into<String>) -> Invalid {
    Invalid::Empty {
        field: field.into(),
    }
}

/// A field that must hold an email address did not
pub fn invalid_email(field: impl Into<String>, value: impl Into<String>) -> Invalid {
    Invalid::Email {
        field: field.into(),
        value: value.into(),
    }
}

/// A field that must hold an http(s) URL did not
pub fn invalid_url(field: impl Into<String>, value: impl Into<String>) -> Invalid {
    Invalid::Url {
        field: field.into(),
        value: value.into(),
    }
}

/// A field that must match a pattern did not
pub fn invalid_pattern(
    field: impl Into<String>,
    value: impl Into<String>,
    pattern: impl Into<String>,
) -> Invalid {
    Invalid::Pattern {
        field: field.into(),
        value: value.into(),
        pattern: pattern.into(),
    }
}

/// Every validation failure found in one input.
///
/// Collect with [`push`](Errors::push), then hand the whole set to the
/// caller at once rather than stopping at the first failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Errors(Vec<Invalid>);

impl Errors {
    /// An empty collection
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Record one failure
    pub fn push(&mut self, invalid: Invalid) {
        self.0.push(invalid);
    }

    /// Whether anything failed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failures
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate the failures in the order found
    pub fn iter(&self) -> impl Iterator<Item = &Invalid> {
        self.0.iter()
    }

    /// `Ok(())` when nothing failed, otherwise the collection itself
    pub fn into_result(self) -> Result<(), Errors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, invalid) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", invalid)?;
        }
        Ok(())
    }
}

impl std::error::Error for Errors {}

impl From<Invalid> for Errors {
    fn from(invalid: Invalid) -> Self {
        Self(vec![invalid])
    }
}

impl IntoIterator for Errors {
    type Item = Invalid;
    type IntoIter = std::vec::IntoIter<Invalid>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Turn a validation failure set into a 400-classified diagnostic
/// error, with one context field per offending input field.
impl From<Errors> for entitle_errors::Error {
    fn from(errors: Errors) -> Self {
        let mut fields = Fields::new();
        for invalid in errors.iter() {
            fields.insert(invalid.field(), invalid.to_string());
        }
        let text = errors.to_string();
        entitle_errors::Error::new(fields, text).with_status(400)
    }
}
