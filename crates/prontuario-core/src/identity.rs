//! # Record Identity
//!
//! Every violation record carries a `ViolationId` assigned by the store
//! at creation. Identifiers are immutable and never reused.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a violation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViolationId(pub Uuid);

impl ViolationId {
    /// Generate a new random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ViolationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ViolationId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ViolationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sanzione:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_distinct() {
        assert_ne!(ViolationId::new(), ViolationId::new());
    }

    #[test]
    fn display_is_prefixed() {
        let id = ViolationId(Uuid::nil());
        assert_eq!(
            id.to_string(),
            "sanzione:00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn serializes_as_bare_uuid() {
        let id = ViolationId(Uuid::nil());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
        let back: ViolationId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
