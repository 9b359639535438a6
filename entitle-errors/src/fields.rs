//! Key/value context fields carried by diagnostic errors

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// An order-irrelevant map from context key to scalar value.
///
/// Fields accumulate on an error as it crosses layers. Merging is
/// last-write-wins per key, and values are JSON scalars so every field
/// lands in the serialized diagnostic record unchanged. Keys are kept
/// sorted so two equal field sets always serialize identically.
///
/// # Example
///
/// ```rust
/// use entitle_errors::fields;
///
/// let mut f = fields! { "account_id" => "acc-7", "attempt" => 1 };
/// f.merge(fields! { "attempt" => 2 });
/// assert_eq!(f.get("attempt"), Some(&serde_json::json!(2)));
/// assert_eq!(f.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<String, Value>);

impl Fields {
    /// Create an empty field set
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert one field, replacing any previous value under the key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Merge `other` into this set; on key collision `other` wins
    pub fn merge(&mut self, other: Fields) {
        self.0.extend(other.0);
    }

    /// Look up a field by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether the key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate fields in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for Fields {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Fields {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Build a [`Fields`] set from `key => value` pairs.
///
/// Values may be anything convertible into a JSON value (strings,
/// integers, floats, booleans).
#[macro_export]
macro_rules! fields {
    () => { $crate::Fields::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut f = $crate::Fields::new();
        $( f.insert($key, $value); )+
        f
    }};
}
