//! Dashboard server.
//!
//! Axum router serving the HTML dashboard and JSON endpoints over the
//! datasets loaded at start-up.

pub mod render;
pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use state::{AppState, Dataset, Source};

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Look up the dataset named by a path segment.
pub fn resolve_source<'a>(state: &'a AppState, source: &str) -> Result<&'a Dataset, ApiError> {
    Source::parse(source)
        .and_then(|s| state.dataset(s))
        .ok_or_else(|| ApiError::NotFound(format!("source '{}'", source)))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::dashboard::dashboard))
        .route(
            "/api/sources/:source/matches",
            get(routes::matches::list_matches),
        )
        .route(
            "/api/sources/:source/matches/:match_id/rosters",
            get(routes::matches::roster_stats),
        )
        .route(
            "/api/sources/:source/matches/:match_id/participants",
            get(routes::matches::participant_stats),
        )
        .route(
            "/api/sources/:source/matches/:match_id/rankings",
            get(routes::matches::rankings),
        )
        .route(
            "/api/sources/:source/matches/:match_id/chart",
            get(routes::matches::chart),
        )
        .with_state(state)
}

/// Wrap a router with CORS and, optionally, request logging.
pub fn with_layers(router: Router, server: &ServerConfig, access_log: bool) -> Router {
    let cors = if server.cors_origin == "*" {
        CorsLayer::new().allow_origin(Any)
    } else {
        match HeaderValue::from_str(&server.cors_origin) {
            Ok(origin) => CorsLayer::new().allow_origin(AllowOrigin::exact(origin)),
            Err(_) => {
                tracing::warn!(
                    "Ignoring invalid CORS origin {:?}, allowing any",
                    server.cors_origin
                );
                CorsLayer::new().allow_origin(Any)
            }
        }
    };

    let router = router.layer(cors);
    if access_log {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}
