//! API shard regions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Region shard the match API is queried against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Na,
    Eu,
    Sa,
    Ea,
    Sg,
}

impl Region {
    pub const ALL: [Region; 5] = [Region::Na, Region::Eu, Region::Sa, Region::Ea, Region::Sg];

    /// Shard code used in API paths.
    pub fn code(&self) -> &'static str {
        match self {
            Region::Na => "na",
            Region::Eu => "eu",
            Region::Sa => "sa",
            Region::Ea => "ea",
            Region::Sg => "sg",
        }
    }

    pub fn full_name(&self) -> &'static str {
        match self {
            Region::Na => "North America",
            Region::Eu => "Europe",
            Region::Sa => "South America",
            Region::Ea => "East Asia",
            Region::Sg => "Southeast Asia (SEA)",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Region::ALL
            .into_iter()
            .find(|r| r.code() == wanted)
            .ok_or_else(|| {
                let available: Vec<String> = Region::ALL
                    .iter()
                    .map(|r| format!("{}: {}", r.code(), r.full_name()))
                    .collect();
                format!(
                    "Region '{}' is not recognized. Available regions are: {}",
                    s,
                    available.join(", ")
                )
            })
    }
}
