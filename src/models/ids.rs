//! Typed resource keys for JSON:API lookups.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource type names used by the match API.
pub const MATCH_TYPE: &str = "match";
pub const ROSTER_TYPE: &str = "roster";
pub const PARTICIPANT_TYPE: &str = "participant";
pub const PLAYER_TYPE: &str = "player";

/// A `(type, id)` pair identifying one resource in a document.
///
/// Ids are only unique within a type, so lookups always carry both halves.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

impl ResourceKey {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

impl fmt::Debug for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceKey({}/{})", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_key_display() {
        let key = ResourceKey::new("roster", "abc-123");
        assert_eq!(format!("{}", key), "roster/abc-123");
    }

    #[test]
    fn test_resource_key_debug() {
        let key = ResourceKey::new("player", "p1");
        assert!(format!("{:?}", key).contains("player/p1"));
    }

    #[test]
    fn test_resource_key_equality_needs_both_halves() {
        let roster = ResourceKey::new("roster", "same");
        let player = ResourceKey::new("player", "same");
        assert_ne!(roster, player);
        assert_eq!(roster, ResourceKey::new("roster", "same"));
    }

    #[test]
    fn test_resource_key_serialization() {
        let key = ResourceKey::new("match", "m1");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, r#"{"type":"match","id":"m1"}"#);

        let parsed: ResourceKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);
    }
}
