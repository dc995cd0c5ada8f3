//! Player ranking heuristic.
//!
//! A fixed linear combination of lifetime player stats ("user stats") and
//! per-match participant stats ("match stats"), with an all-or-nothing win
//! bonus and two AFK penalties. The weights are kept exactly as they were
//! tuned by hand; there is no normalisation.

use serde::Serialize;

use crate::models::{ParticipantStats, PlayerStats};
use crate::parse::UserRecord;

pub const WIN_BONUS: f64 = 10.0;
pub const AFK_PENALTY: f64 = 50.0;

/// Score split into its two halves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub user_stats: f64,
    pub match_stats: f64,
    pub total: f64,
}

/// Lifetime contribution of a player.
pub fn user_stats_score(player: &PlayerStats) -> f64 {
    player.level + player.wins / 100.0 + player.played_ranked / 75.0 + player.played / 100.0
        + player.win_streak * 10.0
        - player.loss_streak * 10.0
}

/// Match contribution of a participant. Lifetime gold and xp live on the
/// player but are counted here.
pub fn match_stats_score(player: &PlayerStats, participant: &ParticipantStats) -> f64 {
    let mut score = participant.karma_level * 10.0
        + participant.skill_tier * 10.0
        + player.lifetime_gold / 1000.0
        + player.xp / 100_000.0
        - participant.gold / 10.0
        - participant.deaths
        + participant.kills
        + participant.turret_captures * 3.0
        + participant.jungle_kills
        + participant.farm
        + participant.assists * 0.5
        + participant.minion_kills / 10.0
        + participant.kraken_captures * 5.0
        + participant.gold_mine_captures * 3.0
        + participant.crystal_mine_captures * 2.0;

    if participant.winner {
        score += WIN_BONUS;
    }
    if participant.first_afk_time > 0.0 {
        score -= AFK_PENALTY;
    }
    if participant.went_afk {
        score -= AFK_PENALTY;
    }

    score
}

pub fn ranking_breakdown(player: &PlayerStats, participant: &ParticipantStats) -> ScoreBreakdown {
    let user_stats = user_stats_score(player);
    let match_stats = match_stats_score(player, participant);
    ScoreBreakdown {
        user_stats,
        match_stats,
        total: user_stats + match_stats,
    }
}

/// Ranking score for a player/participant pair.
pub fn score(player: &PlayerStats, participant: &ParticipantStats) -> f64 {
    ranking_breakdown(player, participant).total
}

/// One ranked player of a match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub player_id: String,
    pub name: String,
    pub hero: Option<String>,
    pub score: ScoreBreakdown,
}

/// Score every user, keeping input order.
pub fn rank_users(users: &[UserRecord]) -> Vec<Ranking> {
    users
        .iter()
        .map(|u| Ranking {
            player_id: u.player.id.clone(),
            name: u.player.name.clone(),
            hero: u.participant.actor.clone(),
            score: ranking_breakdown(&u.player.stats, &u.participant.stats),
        })
        .collect()
}

/// Highest total first. The sort is stable, so ties keep input order.
pub fn sorted_by_total(mut rankings: Vec<Ranking>) -> Vec<Ranking> {
    rankings.sort_by(|a, b| b.score.total.total_cmp(&a.score.total));
    rankings
}
