use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a snowflake instance.
///
/// A `FlakeId` is unique within one class and one namespace. It is either
/// supplied by the caller or synthesized from the class name and the class
/// creation counter (see [`FlakeId::generated`]).
///
/// `FlakeId` borrows as `str` and orders exactly like its string contents, so
/// maps keyed by `FlakeId` can be queried with a plain `&str`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlakeId(String);

impl FlakeId {
    /// Create an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The default identifier for the `index`-th instance of `class`:
    /// `"{class}_{index}"`.
    pub fn generated(class: &str, index: u64) -> Self {
        Self(format!("{class}_{index}"))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the empty identifier, which construction requests
    /// treat as "generate one".
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the identifier and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FlakeId({:?})", self.0)
    }
}

impl fmt::Display for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for FlakeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FlakeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FlakeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for FlakeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for FlakeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for FlakeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
