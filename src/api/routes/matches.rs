use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::{AppState, MatchOption};
use crate::api::{resolve_source, ApiError};
use crate::calculate::{rank_users, sorted_by_total, Ranking};
use crate::models::Resource;
use crate::parse::{pair_users, DocumentIndex};
use crate::table::{participant_table, roster_chart, roster_labels, roster_table, BarChart, StatsTable};

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub source: String,
    pub title: String,
    pub matches: Vec<MatchOption>,
}

#[derive(Debug, Serialize)]
pub struct TableResponse {
    pub match_id: String,
    pub labels: Vec<String>,
    #[serde(flatten)]
    pub table: StatsTable,
}

#[derive(Debug, Serialize)]
pub struct RankingsResponse {
    pub match_id: String,
    pub rankings: Vec<Ranking>,
}

#[derive(Debug, Deserialize)]
pub struct ChartParams {
    pub stat: Option<String>,
}

fn require_match(index: &DocumentIndex<'_>, match_id: &str) -> Result<(), ApiError> {
    index
        .find_match(match_id)
        .map(|_| ())
        .ok_or_else(|| ApiError::NotFound(format!("match '{}'", match_id)))
}

pub async fn list_matches(
    State(state): State<AppState>,
    Path(source): Path<String>,
) -> Result<Json<MatchesResponse>, ApiError> {
    let dataset = resolve_source(&state, &source)?;
    Ok(Json(MatchesResponse {
        source: dataset.source.to_string(),
        title: dataset.title.clone(),
        matches: dataset.match_options(),
    }))
}

pub async fn roster_stats(
    State(state): State<AppState>,
    Path((source, match_id)): Path<(String, String)>,
) -> Result<Json<TableResponse>, ApiError> {
    let dataset = resolve_source(&state, &source)?;
    let index = DocumentIndex::new(&dataset.document);
    require_match(&index, &match_id)?;

    Ok(Json(TableResponse {
        labels: roster_labels(&index, &match_id),
        table: roster_table(&index, &match_id),
        match_id,
    }))
}

pub async fn participant_stats(
    State(state): State<AppState>,
    Path((source, match_id)): Path<(String, String)>,
) -> Result<Json<TableResponse>, ApiError> {
    let dataset = resolve_source(&state, &source)?;
    let index = DocumentIndex::new(&dataset.document);
    require_match(&index, &match_id)?;

    let participants = index.participants_for_match(&match_id);
    let labels = participants
        .iter()
        .map(|p| p.attribute_str("actor").unwrap_or(&p.id).to_string())
        .collect();

    Ok(Json(TableResponse {
        labels,
        table: participant_table(&index, &match_id),
        match_id,
    }))
}

pub async fn rankings(
    State(state): State<AppState>,
    Path((source, match_id)): Path<(String, String)>,
) -> Result<Json<RankingsResponse>, ApiError> {
    let dataset = resolve_source(&state, &source)?;
    let index = DocumentIndex::new(&dataset.document);
    require_match(&index, &match_id)?;

    let pool: Vec<Resource> = index
        .participants_for_match(&match_id)
        .into_iter()
        .chain(index.players_for_match(&match_id))
        .cloned()
        .collect();
    let users = pair_users(&pool);

    Ok(Json(RankingsResponse {
        match_id,
        rankings: sorted_by_total(rank_users(&users)),
    }))
}

pub async fn chart(
    State(state): State<AppState>,
    Path((source, match_id)): Path<(String, String)>,
    Query(params): Query<ChartParams>,
) -> Result<Json<BarChart>, ApiError> {
    let dataset = resolve_source(&state, &source)?;
    let index = DocumentIndex::new(&dataset.document);
    require_match(&index, &match_id)?;

    let stat = params
        .stat
        .unwrap_or_else(|| crate::table::DEFAULT_PLOT.to_string());
    roster_chart(&index, &match_id, &stat)
        .map(Json)
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}
