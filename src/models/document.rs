//! JSON:API match documents.
//!
//! The match API answers with a document holding a primary `data` member
//! (a list for match queries, a single object when one match is requested)
//! and an `included` pool of rosters, participants, players and assets.
//! Members this crate does not interpret are kept in `extra` so a loaded
//! document can be written back without losing anything.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ResourceKey, MATCH_TYPE};

/// A typed reference from one resource to another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

impl ResourceIdentifier {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

/// Relationship linkage: to-many relationships carry a list, to-one a single
/// identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Linkage {
    Many(Vec<ResourceIdentifier>),
    One(ResourceIdentifier),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub data: Option<Linkage>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Relationship {
    /// All identifiers of this relationship, regardless of cardinality.
    pub fn identifiers(&self) -> &[ResourceIdentifier] {
        match &self.data {
            Some(Linkage::Many(ids)) => ids,
            Some(Linkage::One(id)) => std::slice::from_ref(id),
            None => &[],
        }
    }
}

/// One entity of a document (match, roster, participant, player, asset).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub kind: String,

    pub id: String,

    #[serde(default)]
    pub attributes: Map<String, Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, Relationship>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            attributes: Map::new(),
            relationships: BTreeMap::new(),
            extra: Map::new(),
        }
    }

    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(self.kind.as_str(), self.id.as_str())
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn attribute_str(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(Value::as_str)
    }

    /// The nested `attributes.stats` object, when present.
    pub fn stats(&self) -> Option<&Map<String, Value>> {
        self.attribute("stats").and_then(Value::as_object)
    }

    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.get(name)
    }
}

/// Primary data of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    Many(Vec<Resource>),
    One(Box<Resource>),
}

impl Default for PrimaryData {
    fn default() -> Self {
        PrimaryData::Many(Vec::new())
    }
}

/// A whole API response or saved dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchDocument {
    #[serde(default)]
    pub data: PrimaryData,

    #[serde(default)]
    pub included: Vec<Resource>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MatchDocument {
    /// Primary resources as a slice, whether the document carried one or many.
    pub fn primary(&self) -> &[Resource] {
        match &self.data {
            PrimaryData::Many(items) => items,
            PrimaryData::One(item) => std::slice::from_ref(item.as_ref()),
        }
    }

    /// Ids of the primary matches, in document order.
    pub fn match_ids(&self) -> Vec<&str> {
        self.primary()
            .iter()
            .filter(|r| r.is(MATCH_TYPE))
            .map(|m| m.id.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "data": [{
                "type": "match",
                "id": "m1",
                "attributes": {"gameMode": "casual", "duration": 1500},
                "relationships": {
                    "rosters": {"data": [
                        {"type": "roster", "id": "r1"},
                        {"type": "roster", "id": "r2"}
                    ]},
                    "assets": {"data": []}
                },
                "links": {"self": "https://example.com/m1"}
            }],
            "included": [{
                "type": "participant",
                "id": "pa1",
                "attributes": {"actor": "*Ringo*", "stats": {"kills": 3}},
                "relationships": {"player": {"data": {"type": "player", "id": "p1"}}}
            }],
            "meta": {"count": 1}
        })
    }

    #[test]
    fn test_document_parses_many_and_keeps_unknown_members() {
        let doc: MatchDocument = serde_json::from_value(sample()).unwrap();

        assert_eq!(doc.match_ids(), vec!["m1"]);
        assert_eq!(doc.included.len(), 1);
        assert_eq!(doc.extra["meta"]["count"], 1);
        assert!(doc.primary()[0].extra.contains_key("links"));
    }

    #[test]
    fn test_document_parses_single_primary() {
        let doc: MatchDocument = serde_json::from_value(json!({
            "data": {"type": "match", "id": "solo", "attributes": {}},
            "included": []
        }))
        .unwrap();

        assert!(matches!(doc.data, PrimaryData::One(_)));
        assert_eq!(doc.match_ids(), vec!["solo"]);
    }

    #[test]
    fn test_relationship_identifiers_cardinality() {
        let doc: MatchDocument = serde_json::from_value(sample()).unwrap();
        let m = &doc.primary()[0];

        assert_eq!(m.relationship("rosters").unwrap().identifiers().len(), 2);
        assert!(m.relationship("assets").unwrap().identifiers().is_empty());

        let participant = &doc.included[0];
        let player = participant.relationship("player").unwrap().identifiers();
        assert_eq!(player, &[ResourceIdentifier::new("player", "p1")]);
    }

    #[test]
    fn test_null_relationship_has_no_identifiers() {
        let rel: Relationship = serde_json::from_value(json!({"data": null})).unwrap();
        assert!(rel.identifiers().is_empty());
    }

    #[test]
    fn test_document_json_round_trip() {
        let doc: MatchDocument = serde_json::from_value(sample()).unwrap();
        let text = serde_json::to_string_pretty(&doc).unwrap();
        let reparsed: MatchDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(doc, reparsed);
    }

    #[test]
    fn test_resource_stats_accessor() {
        let doc: MatchDocument = serde_json::from_value(sample()).unwrap();
        let participant = &doc.included[0];

        assert_eq!(participant.stats().unwrap()["kills"], 3);
        assert_eq!(participant.attribute_str("actor"), Some("*Ringo*"));
        assert!(doc.primary()[0].stats().is_none());
    }
}
