//! Typed views over rosters, participants and players.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::{Resource, ResourceKey, PARTICIPANT_TYPE, PLAYER_TYPE, ROSTER_TYPE};

/// Errors raised when a resource does not have the expected shape.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Expected a {expected} resource, got {found}")]
    WrongType {
        expected: &'static str,
        found: ResourceKey,
    },

    #[error("Resource {0} has no stats object")]
    MissingStats(ResourceKey),

    #[error("Invalid stats on {key}: {source}")]
    InvalidStats {
        key: ResourceKey,
        #[source]
        source: serde_json::Error,
    },
}

fn expect_kind(resource: &Resource, expected: &'static str) -> Result<(), ModelError> {
    if resource.is(expected) {
        Ok(())
    } else {
        Err(ModelError::WrongType {
            expected,
            found: resource.key(),
        })
    }
}

fn typed_stats<T: for<'de> Deserialize<'de>>(resource: &Resource) -> Result<T, ModelError> {
    let stats = resource
        .attribute("stats")
        .filter(|v| v.is_object())
        .ok_or_else(|| ModelError::MissingStats(resource.key()))?;
    T::deserialize(stats).map_err(|source| ModelError::InvalidStats {
        key: resource.key(),
        source,
    })
}

/// `wentAfk` shows up as a boolean or as a 0/1 integer. Anything but an
/// explicit `false` or `0` counts as AFK, including `null`.
fn afk_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::Number(n) => Ok(n.as_f64().map_or(true, |x| x != 0.0)),
        Value::Null => Ok(true),
        other => Err(serde::de::Error::custom(format!(
            "expected boolean or number for wentAfk, got {}",
            other
        ))),
    }
}

/// `winner` is `true` or `1`; any other number or `null` is a loss.
fn winner_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::Number(n) => Ok(n.as_f64() == Some(1.0)),
        Value::Null => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected boolean or number for winner, got {}",
            other
        ))),
    }
}

/// Lifetime statistics of a player account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerStats {
    pub level: f64,
    pub wins: f64,
    pub played: f64,
    #[serde(rename = "played_ranked")]
    pub played_ranked: f64,
    pub win_streak: f64,
    pub loss_streak: f64,
    pub lifetime_gold: f64,
    pub xp: f64,
}

/// Per-match statistics of one participant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticipantStats {
    pub kills: f64,
    pub deaths: f64,
    pub assists: f64,
    pub gold: f64,
    pub farm: f64,
    pub level: f64,
    pub jungle_kills: f64,
    pub minion_kills: f64,
    pub non_jungle_minion_kills: f64,
    pub turret_captures: f64,
    pub kraken_captures: f64,
    pub gold_mine_captures: f64,
    pub crystal_mine_captures: f64,
    pub karma_level: f64,
    pub skill_tier: f64,
    pub first_afk_time: f64,
    #[serde(deserialize_with = "afk_flag")]
    pub went_afk: bool,
    #[serde(deserialize_with = "winner_flag")]
    pub winner: bool,
    pub skin_key: Option<String>,
}

/// A player account with lifetime stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub shard_id: Option<String>,
    pub stats: PlayerStats,
}

impl Player {
    pub fn from_resource(resource: &Resource) -> Result<Self, ModelError> {
        expect_kind(resource, PLAYER_TYPE)?;
        Ok(Self {
            id: resource.id.clone(),
            name: resource.attribute_str("name").unwrap_or_default().to_string(),
            shard_id: resource.attribute_str("shardId").map(str::to_string),
            stats: typed_stats(resource)?,
        })
    }
}

/// One player's record within one match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Participant {
    pub id: String,
    pub player_id: Option<String>,
    pub actor: Option<String>,
    pub stats: ParticipantStats,
}

impl Participant {
    pub fn from_resource(resource: &Resource) -> Result<Self, ModelError> {
        expect_kind(resource, PARTICIPANT_TYPE)?;
        Ok(Self {
            id: resource.id.clone(),
            player_id: player_id_of(resource).map(str::to_string),
            actor: resource.attribute_str("actor").map(str::to_string),
            stats: typed_stats(resource)?,
        })
    }
}

/// The player id a participant resource links to, if any.
pub fn player_id_of(participant: &Resource) -> Option<&str> {
    participant
        .relationship("player")
        .and_then(|rel| rel.identifiers().first())
        .map(|ident| ident.id.as_str())
}

/// One team's entry within a match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Roster {
    pub id: String,
    pub side: Option<String>,
    pub stats: Map<String, Value>,
}

impl Roster {
    pub fn from_resource(resource: &Resource) -> Result<Self, ModelError> {
        expect_kind(resource, ROSTER_TYPE)?;
        let stats = resource.stats().cloned().unwrap_or_default();
        let side = stats
            .get("side")
            .and_then(Value::as_str)
            .or_else(|| resource.attribute_str("side"))
            .map(str::to_string);
        Ok(Self {
            id: resource.id.clone(),
            side,
            stats,
        })
    }

    /// Label for charts and tables: the side, or the roster id when the side
    /// is unknown.
    pub fn label(&self) -> &str {
        self.side.as_deref().unwrap_or(&self.id)
    }
}
