use std::fmt;

use serde::{Deserialize, Serialize};

/// A labeled network target: a host address plus a display label.
///
/// Immutable once built. Identifiers are not required to be unique;
/// duplicates are probed once per occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    identifier: String,
    label: String,
}

impl Endpoint {
    pub fn new(identifier: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            label: label.into(),
        }
    }

    /// Host address (IP literal or hostname).
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Free-form display string.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.identifier)
    }
}
