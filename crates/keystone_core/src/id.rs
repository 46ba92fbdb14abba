//! Unique identifiers for KEYSTONE entities.
//!
//! All IDs are UUIDs for uniqueness and are serialized in canonical format.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Build identifier - identifies a single build invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildId(Uuid);

impl BuildId {
    /// Create a new random BuildId
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from UUID bytes
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Get as UUID
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for BuildId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BuildId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "build_{}", self.0)
    }
}

/// Request identifier - identifies one schedulable unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Create a new random RequestId
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from UUID bytes
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Get as UUID
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "req_{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_id_unique() {
        let a = BuildId::new();
        let b = BuildId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_build_id_display() {
        let id = BuildId::new();
        assert!(id.to_string().starts_with("build_"));
    }

    #[test]
    fn test_request_id_display() {
        let id = RequestId::new();
        assert!(id.to_string().starts_with("req_"));
    }

    #[test]
    fn test_id_from_bytes_roundtrip() {
        let bytes = [7u8; 16];
        let id = RequestId::from_bytes(bytes);
        assert_eq!(id.as_uuid().as_bytes(), &bytes);
    }

    #[test]
    fn test_id_serde_roundtrip() {
        let id = BuildId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: BuildId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
