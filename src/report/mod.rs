//! Console output for the fetch tool.

use serde_json::Value;

use crate::calculate::Ranking;
use crate::models::{MatchDocument, Participant, Player, Resource};

const DIVIDER: &str = "------------------";

/// A divider line followed by a message.
pub fn divider(message: &str) -> String {
    format!("{}\n{}", DIVIDER, message)
}

/// Seconds as `MM:SS`; hours roll over.
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", (seconds / 60) % 60, seconds % 60)
}

fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "unknown".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn number_text(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Summary block for one match.
pub fn match_summary(m: &Resource) -> String {
    let outcome = m.stats().and_then(|s| s.get("endGameReason"));
    let duration = m
        .attribute("duration")
        .and_then(Value::as_f64)
        .map(|d| format_duration(d as i64))
        .unwrap_or_else(|| "unknown".to_string());

    [
        divider("Found match"),
        format!("id: {}", m.id),
        format!("outcome: {}", value_text(outcome)),
        format!("type: {}", value_text(m.attribute("gameMode"))),
        format!("date: {}", value_text(m.attribute("createdAt"))),
        format!("duration: {}", duration),
        String::new(),
    ]
    .join("\n")
}

pub fn player_summary(player: &Player) -> String {
    let s = &player.stats;
    [
        format!("player name: {}", player.name),
        format!("player id: {}", player.id),
        format!(
            "player region: {}",
            player.shard_id.as_deref().unwrap_or("unknown")
        ),
        format!("player level: {}", number_text(s.level)),
        format!("player wins: {}", number_text(s.wins)),
        format!("player win streak: {}", number_text(s.win_streak)),
        format!("player loss streak: {}", number_text(s.loss_streak)),
        format!("played: {}", number_text(s.played)),
        format!("played rank: {}", number_text(s.played_ranked)),
        format!("match xp: {}", number_text(s.xp)),
        format!("match lifetimegold: {}", number_text(s.lifetime_gold)),
    ]
    .join("\n")
}

pub fn participant_summary(participant: &Participant) -> String {
    let s = &participant.stats;
    [
        format!("player skillTier: {}", number_text(s.skill_tier)),
        format!("player karmaLevel: {}", number_text(s.karma_level)),
        format!(
            "match hero: {}",
            participant.actor.as_deref().unwrap_or("unknown")
        ),
        format!("match skin: {}", s.skin_key.as_deref().unwrap_or("unknown")),
        format!("match level: {}", number_text(s.level)),
        format!(
            "match kills/deaths/assists: {}/{}/{}",
            number_text(s.kills),
            number_text(s.deaths),
            number_text(s.assists)
        ),
        format!("match final gold: {}", number_text(s.gold)),
        format!(
            "match nonJungleMinionKills: {}",
            number_text(s.non_jungle_minion_kills)
        ),
        format!("match turretCaptures: {}", number_text(s.turret_captures)),
        format!("match jungleKills: {}", number_text(s.jungle_kills)),
        format!("match farm: {}", number_text(s.farm)),
        format!("match wentAfk: {}", s.went_afk),
        format!("match firstAfkTime: {}", number_text(s.first_afk_time)),
        format!("match minionKills: {}", number_text(s.minion_kills)),
        format!("match krakenCaptures: {}", number_text(s.kraken_captures)),
        format!(
            "match goldMineCaptures: {}",
            number_text(s.gold_mine_captures)
        ),
        format!(
            "match crystalMineCaptures: {}",
            number_text(s.crystal_mine_captures)
        ),
        format!("match winner: {}", s.winner),
    ]
    .join("\n")
}

/// Tab-separated `name  hero  total  player_id`.
pub fn ranking_line(ranking: &Ranking) -> String {
    let total = ranking.score.total.to_string();
    [
        ranking.name.as_str(),
        ranking.hero.as_deref().unwrap_or("unknown"),
        total.as_str(),
        ranking.player_id.as_str(),
    ]
    .join("\t")
}

/// Type and id of every resource, for poking around a raw document.
pub fn document_outline(document: &MatchDocument) -> String {
    let mut lines = vec![divider("Primary data")];
    lines.extend(
        document
            .primary()
            .iter()
            .map(|r| format!("{} {}", r.kind, r.id)),
    );
    lines.push(divider("Included"));
    lines.extend(
        document
            .included
            .iter()
            .map(|r| format!("{} {}", r.kind, r.id)),
    );
    lines.join("\n")
}
