//! Flattening of match documents.
//!
//! A match only references its rosters by `(type, id)`; the rosters,
//! participants and players live in the document's `included` pool.
//! [`DocumentIndex`] hashes both collections once so relationship lookups
//! do not rescan the pool. Unknown ids resolve to nothing, never to an
//! error: callers treat absence as "no data".

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::models::{
    player_id_of, MatchDocument, Participant, Player, Resource, MATCH_TYPE, PARTICIPANT_TYPE,
    PLAYER_TYPE, ROSTER_TYPE,
};

/// Id-indexed view over a borrowed [`MatchDocument`].
#[derive(Debug)]
pub struct DocumentIndex<'a> {
    document: &'a MatchDocument,
    matches: HashMap<&'a str, &'a Resource>,
    included: HashMap<(&'a str, &'a str), &'a Resource>,
}

impl<'a> DocumentIndex<'a> {
    pub fn new(document: &'a MatchDocument) -> Self {
        let mut matches = HashMap::new();
        for resource in document.primary().iter().filter(|r| r.is(MATCH_TYPE)) {
            matches.entry(resource.id.as_str()).or_insert(resource);
        }

        let mut included = HashMap::new();
        for resource in &document.included {
            included
                .entry((resource.kind.as_str(), resource.id.as_str()))
                .or_insert(resource);
        }

        debug!(
            "Indexed {} matches and {} included resources",
            matches.len(),
            included.len()
        );

        Self {
            document,
            matches,
            included,
        }
    }

    /// Find a primary entity (a match) by id.
    pub fn find_match(&self, match_id: &str) -> Option<&'a Resource> {
        let found = self.matches.get(match_id).copied();
        if found.is_none() {
            debug!("Match {} not found in document", match_id);
        }
        found
    }

    /// Find an included entity by type and id.
    pub fn find_included(&self, kind: &str, id: &str) -> Option<&'a Resource> {
        self.included.get(&(kind, id)).copied()
    }

    /// Resolve every identifier of `relation` on `entity` against the
    /// included pool, in relationship order. Dangling references are skipped.
    pub fn resolve_relationship(&self, entity: &Resource, relation: &str) -> Vec<&'a Resource> {
        let Some(rel) = entity.relationship(relation) else {
            return Vec::new();
        };

        rel.identifiers()
            .iter()
            .filter_map(|ident| {
                let found = self.find_included(&ident.kind, &ident.id);
                if found.is_none() {
                    debug!("Dangling {} reference {}/{}", relation, ident.kind, ident.id);
                }
                found
            })
            .collect()
    }

    /// Rosters of a match, in the order they appear in `included`; empty
    /// when the match is unknown.
    pub fn rosters_for_match(&self, match_id: &str) -> Vec<&'a Resource> {
        let Some(m) = self.find_match(match_id) else {
            return Vec::new();
        };

        let ids = roster_ids(m);
        debug!("Roster ids for {}: {:?}", match_id, ids);

        self.document
            .included
            .iter()
            .filter(|r| r.is(ROSTER_TYPE) && ids.contains(&r.id.as_str()))
            .collect()
    }

    /// Participants of a match, roster by roster.
    pub fn participants_for_match(&self, match_id: &str) -> Vec<&'a Resource> {
        self.rosters_for_match(match_id)
            .into_iter()
            .flat_map(|roster| self.resolve_relationship(roster, "participants"))
            .filter(|r| r.is(PARTICIPANT_TYPE))
            .collect()
    }

    /// Players that took part in a match, in participant order.
    pub fn players_for_match(&self, match_id: &str) -> Vec<&'a Resource> {
        self.participants_for_match(match_id)
            .into_iter()
            .filter_map(|p| player_id_of(p).and_then(|id| self.find_included(PLAYER_TYPE, id)))
            .collect()
    }
}

/// Ids of the `roster` entries in a match's `rosters` relationship.
pub fn roster_ids(m: &Resource) -> Vec<&str> {
    m.relationship("rosters")
        .map(|rel| {
            rel.identifiers()
                .iter()
                .filter(|ident| ident.kind == ROSTER_TYPE)
                .map(|ident| ident.id.as_str())
                .collect()
        })
        .unwrap_or_default()
}

/// A player paired with their participant record for one match.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub player: Player,
    pub participant: Participant,
}

/// Pair every `player` with the `participant` that links to it.
///
/// Order follows the first appearance of each player id in `included`.
/// Players without a participant (or the reverse) are skipped, and so is
/// a record whose stats do not parse.
pub fn pair_users(included: &[Resource]) -> Vec<UserRecord> {
    let mut order: Vec<&str> = Vec::new();
    let mut players: HashMap<&str, Player> = HashMap::new();
    let mut participants: HashMap<&str, Participant> = HashMap::new();

    for item in included {
        if item.is(PLAYER_TYPE) {
            let player = match Player::from_resource(item) {
                Ok(player) => player,
                Err(e) => {
                    warn!("Skipping player {}: {}", item.id, e);
                    continue;
                }
            };
            let id = item.id.as_str();
            if !players.contains_key(id) && !participants.contains_key(id) {
                order.push(id);
            }
            players.insert(id, player);
        } else if item.is(PARTICIPANT_TYPE) {
            let Some(id) = player_id_of(item) else {
                warn!("Participant {} has no player relationship", item.id);
                continue;
            };
            let participant = match Participant::from_resource(item) {
                Ok(participant) => participant,
                Err(e) => {
                    warn!("Skipping participant {}: {}", item.id, e);
                    continue;
                }
            };
            if !players.contains_key(id) && !participants.contains_key(id) {
                order.push(id);
            }
            participants.insert(id, participant);
        }
    }

    let mut users = Vec::with_capacity(order.len());
    for id in order {
        match (players.remove(id), participants.remove(id)) {
            (Some(player), Some(participant)) => users.push(UserRecord {
                player,
                participant,
            }),
            _ => warn!("Skipping incomplete player/participant pair for {}", id),
        }
    }

    users
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::json;

    use crate::models::MatchDocument;

    /// Two matches; the second references a roster that is not included.
    pub fn two_match_document() -> MatchDocument {
        serde_json::from_value(json!({
            "data": [
                {
                    "type": "match",
                    "id": "m1",
                    "attributes": {
                        "createdAt": "2017-03-01T12:00:00Z",
                        "duration": 1530,
                        "gameMode": "casual",
                        "stats": {"endGameReason": "victory"}
                    },
                    "relationships": {"rosters": {"data": [
                        {"type": "roster", "id": "r1"},
                        {"type": "roster", "id": "r2"}
                    ]}}
                },
                {
                    "type": "match",
                    "id": "m2",
                    "attributes": {"gameMode": "ranked", "duration": 61, "stats": {"endGameReason": "surrender"}},
                    "relationships": {"rosters": {"data": [
                        {"type": "roster", "id": "r3"},
                        {"type": "roster", "id": "missing"}
                    ]}}
                }
            ],
            "included": [
                {
                    "type": "roster",
                    "id": "r2",
                    "attributes": {"stats": {"side": "right/red", "gold": 21000, "heroKills": 9, "turretKills": 2}},
                    "relationships": {"participants": {"data": [{"type": "participant", "id": "pa2"}]}}
                },
                {
                    "type": "roster",
                    "id": "r1",
                    "attributes": {"stats": {"side": "left/blue", "gold": 25000, "heroKills": 14, "acesEarned": 1}},
                    "relationships": {"participants": {"data": [{"type": "participant", "id": "pa1"}]}}
                },
                {
                    "type": "roster",
                    "id": "r3",
                    "attributes": {"stats": {"side": "left/blue", "gold": "lots"}},
                    "relationships": {"participants": {"data": []}}
                },
                {
                    "type": "participant",
                    "id": "pa1",
                    "attributes": {
                        "actor": "*Ringo*",
                        "stats": {
                            "kills": 8, "deaths": 2, "gold": 0,
                            "turretCaptures": 1, "winner": true,
                            "wentAfk": false, "firstAfkTime": 0
                        }
                    },
                    "relationships": {"player": {"data": {"type": "player", "id": "p1"}}}
                },
                {
                    "type": "participant",
                    "id": "pa2",
                    "attributes": {
                        "actor": "*Catherine*",
                        "stats": {
                            "kills": 1, "deaths": 6, "assists": 2, "gold": 0,
                            "winner": false, "wentAfk": true, "firstAfkTime": 300
                        }
                    },
                    "relationships": {"player": {"data": {"type": "player", "id": "p2"}}}
                },
                {
                    "type": "player",
                    "id": "p1",
                    "attributes": {"name": "Alice", "shardId": "na", "stats": {"level": 30, "wins": 120}}
                },
                {
                    "type": "player",
                    "id": "p2",
                    "attributes": {"name": "Bob", "shardId": "na", "stats": {"level": 12, "wins": 40}}
                }
            ]
        }))
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::two_match_document;
    use super::*;
    use crate::models::{Linkage, Relationship, ResourceIdentifier};

    #[test]
    fn test_find_match_present_and_absent() {
        let doc = two_match_document();
        let index = DocumentIndex::new(&doc);

        for id in doc.match_ids() {
            let m = index.find_match(id).unwrap();
            assert_eq!(m.id, id);
            assert_eq!(m.kind, "match");
        }
        assert!(index.find_match("nope").is_none());
    }

    #[test]
    fn test_roster_ids_filters_by_type() {
        let mut m = Resource::new("match", "m");
        m.relationships.insert(
            "rosters".to_string(),
            Relationship {
                data: Some(Linkage::Many(vec![
                    ResourceIdentifier::new("roster", "a"),
                    ResourceIdentifier::new("asset", "x"),
                    ResourceIdentifier::new("roster", "b"),
                ])),
                ..Default::default()
            },
        );

        assert_eq!(roster_ids(&m), vec!["a", "b"]);
        assert!(roster_ids(&Resource::new("match", "empty")).is_empty());
    }

    #[test]
    fn test_rosters_follow_included_order() {
        let doc = two_match_document();
        let index = DocumentIndex::new(&doc);

        // m1 lists r1 then r2, `included` holds r2 first.
        let m = index.find_match("m1").unwrap();
        assert_eq!(roster_ids(m), vec!["r1", "r2"]);

        let rosters: Vec<&str> = index
            .rosters_for_match("m1")
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(rosters, vec!["r2", "r1"]);
    }

    #[test]
    fn test_dangling_roster_is_skipped() {
        let doc = two_match_document();
        let index = DocumentIndex::new(&doc);

        let rosters = index.rosters_for_match("m2");
        assert_eq!(rosters.len(), 1);
        assert_eq!(rosters[0].id, "r3");
    }

    #[test]
    fn test_unknown_match_has_no_rosters() {
        let doc = two_match_document();
        let index = DocumentIndex::new(&doc);
        assert!(index.rosters_for_match("nope").is_empty());
        assert!(index.participants_for_match("nope").is_empty());
    }

    #[test]
    fn test_resolve_missing_relationship_is_empty() {
        let doc = two_match_document();
        let index = DocumentIndex::new(&doc);
        let m = index.find_match("m1").unwrap();
        assert!(index.resolve_relationship(m, "assets").is_empty());
    }

    #[test]
    fn test_participants_and_players_for_match() {
        let doc = two_match_document();
        let index = DocumentIndex::new(&doc);

        let participants: Vec<&str> = index
            .participants_for_match("m1")
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(participants, vec!["pa2", "pa1"]);

        let players: Vec<&str> = index
            .players_for_match("m1")
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(players, vec!["p2", "p1"]);
    }

    #[test]
    fn test_pair_users() {
        let doc = two_match_document();
        let users = pair_users(&doc.included);

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].player.name, "Alice");
        assert_eq!(users[0].participant.actor.as_deref(), Some("*Ringo*"));
        assert_eq!(users[1].player.name, "Bob");
    }

    #[test]
    fn test_pair_users_skips_unpaired_player() {
        let mut doc = two_match_document();
        doc.included
            .retain(|r| !(r.is(PARTICIPANT_TYPE) && r.id == "pa2"));

        let users = pair_users(&doc.included);
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].player.id, "p1");
    }

    #[test]
    fn test_pair_users_skips_unparseable_stats() {
        let mut doc = two_match_document();
        for item in doc.included.iter_mut().filter(|r| r.id == "pa2") {
            item.attributes["stats"]["kills"] = serde_json::json!("eight");
        }

        let users = pair_users(&doc.included);
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].player.name, "Alice");
    }

    #[test]
    fn test_pair_users_accepts_numeric_winner() {
        let mut doc = two_match_document();
        for item in doc.included.iter_mut().filter(|r| r.id == "pa1") {
            item.attributes["stats"]["winner"] = serde_json::json!(1);
        }

        let users = pair_users(&doc.included);
        assert_eq!(users.len(), 2);
        assert!(users[0].participant.stats.winner);
    }
}
