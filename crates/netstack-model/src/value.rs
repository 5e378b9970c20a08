//! Logical identifiers and typed resource references.

use std::fmt;

/// Logical name of a resource within one stack.
///
/// Logical ids are stable across redeployments of the same stack and key the
/// logical-to-physical binding journal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct LogicalId(String);

impl LogicalId {
    /// Create a logical id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LogicalId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for LogicalId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A typed reference slot on a resource declaration.
///
/// `Literal` carries an already-known physical value (for example a hub id
/// resolved from the parameter store); `Ref` names a producer resource in the
/// same stack and is resolved to that resource's physical id at apply time.
/// Every `Ref` is also a dependency edge: the referencing resource cannot be
/// created before its producer completes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Value<T> {
    /// An externally resolved physical value.
    Literal(T),
    /// A reference to a same-stack resource by logical id.
    Ref(LogicalId),
}

impl<T> Value<T> {
    /// The logical id this value references, if it is a `Ref`.
    #[must_use]
    pub fn reference(&self) -> Option<&LogicalId> {
        match self {
            Self::Literal(_) => None,
            Self::Ref(id) => Some(id),
        }
    }

    /// The literal value, if already resolved.
    #[must_use]
    pub fn literal(&self) -> Option<&T> {
        match self {
            Self::Literal(v) => Some(v),
            Self::Ref(_) => None,
        }
    }
}

impl<T> From<&LogicalId> for Value<T> {
    fn from(id: &LogicalId) -> Self {
        Self::Ref(id.clone())
    }
}
