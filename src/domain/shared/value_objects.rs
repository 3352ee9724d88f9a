//! Shared value objects used across multiple bounded contexts

use serde::{Deserialize, Serialize};
use std::fmt;

/// Call record identifier
///
/// Assigned by the backend; opaque to this system. Kept as a string
/// rather than a parsed form so unfamiliar id schemes pass through
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_display() {
        let id = RecordId::new("call-42");
        assert_eq!(id.as_str(), "call-42");
        assert_eq!(id.to_string(), "call-42");
    }

    #[test]
    fn test_record_id_equality() {
        assert_eq!(RecordId::from("a"), RecordId::new("a"));
        assert_ne!(RecordId::from("a"), RecordId::from("b"));
    }
}
