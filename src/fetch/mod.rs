//! Match API client.
//!
//! Queries the game-statistics API for recent matches (optionally filtered
//! by player name) or for one match by id. Responses are JSON:API
//! documents. A non-success status is an error; there are no retries.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::models::{MatchDocument, Region};

pub const DEFAULT_BASE_URL: &str = "https://api.dc01.gamelockerapp.com/shards";
pub const DEFAULT_TITLE_ID: &str = "semc-vainglory";
pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";
pub const TITLE_ID_HEADER: &str = "x-title-id";

/// Errors that can occur while querying the match API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header value for {0}")]
    InvalidHeader(&'static str),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Shards root, e.g. `https://api.dc01.gamelockerapp.com/shards`
    pub base_url: String,

    /// Value of the `X-TITLE-ID` header
    pub title_id: String,

    /// Request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            title_id: DEFAULT_TITLE_ID.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Query parameters of a match search.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
    pub player_name: Option<String>,
    pub created_after: DateTime<Utc>,
    pub page_limit: u32,
    pub sort: String,
}

impl MatchQuery {
    /// Most recent matches created within the last `days` days.
    pub fn recent(days: i64, page_limit: u32) -> Self {
        Self::recent_from(Utc::now(), days, page_limit)
    }

    pub fn recent_from(now: DateTime<Utc>, days: i64, page_limit: u32) -> Self {
        Self {
            player_name: None,
            created_after: now - chrono::Duration::days(days),
            page_limit,
            sort: "-createdAt".to_string(),
        }
    }

    pub fn with_player(mut self, name: Option<String>) -> Self {
        self.player_name = name;
        self
    }

    /// Lower creation-time bound as sent to the API (UTC, whole seconds).
    pub fn search_time(&self) -> String {
        self.created_after.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("sort".to_string(), self.sort.clone()),
            ("filter[createdAt-start]".to_string(), self.search_time()),
            ("page[limit]".to_string(), self.page_limit.to_string()),
        ];
        if let Some(name) = &self.player_name {
            params.push(("filter[playerNames]".to_string(), name.clone()));
        }
        params
    }
}

/// HTTP client for the match API.
pub struct GameApiClient {
    client: Client,
    config: ClientConfig,
    api_key: String,
}

impl std::fmt::Debug for GameApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameApiClient")
            .field("config", &self.config)
            .finish()
    }
}

impl GameApiClient {
    pub fn new(config: ClientConfig, api_key: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config,
            api_key: api_key.into(),
        })
    }

    /// `{base}/{region}/matches[/{match_id}]`
    pub fn match_url(&self, region: Region, match_id: Option<&str>) -> Result<Url, FetchError> {
        let base = self.config.base_url.trim_end_matches('/');
        let raw = match match_id {
            Some(id) => format!("{}/{}/matches/{}", base, region.code(), id),
            None => format!("{}/{}/matches", base, region.code()),
        };
        Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    /// The bearer token as sent in `Authorization`.
    fn authorization(&self) -> String {
        if self.api_key.starts_with("Bearer ") {
            self.api_key.clone()
        } else {
            format!("Bearer {}", self.api_key)
        }
    }

    pub fn headers(&self) -> Result<HeaderMap, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&self.authorization())
                .map_err(|_| FetchError::InvalidHeader("Authorization"))?,
        );
        headers.insert(
            TITLE_ID_HEADER,
            HeaderValue::from_str(&self.config.title_id)
                .map_err(|_| FetchError::InvalidHeader(TITLE_ID_HEADER))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_API_MEDIA_TYPE));
        Ok(headers)
    }

    /// Search recent matches.
    pub async fn fetch_matches(
        &self,
        region: Region,
        query: &MatchQuery,
    ) -> Result<MatchDocument, FetchError> {
        let url = self.match_url(region, None)?;
        self.get_document(url, query).await
    }

    /// Fetch one match by id. The query still bounds the search window.
    pub async fn fetch_match(
        &self,
        region: Region,
        match_id: &str,
        query: &MatchQuery,
    ) -> Result<MatchDocument, FetchError> {
        let url = self.match_url(region, Some(match_id))?;
        self.get_document(url, query).await
    }

    async fn get_document(&self, url: Url, query: &MatchQuery) -> Result<MatchDocument, FetchError> {
        info!("Querying {}", url);
        debug!("Query parameters: {:?}", query.to_params());

        let response = self
            .client
            .get(url.as_str())
            .headers(self.headers()?)
            .query(&query.to_params())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await?;
        let document: MatchDocument = serde_json::from_slice(&body)?;
        info!(
            "Received {} matches and {} included resources",
            document.primary().len(),
            document.included.len()
        );
        Ok(document)
    }

    /// A copy/pasteable `curl` command reproducing a query. The key is
    /// printed as-is, so this is only meant for local debugging.
    pub fn debug_command(&self, url: &Url, query: &MatchQuery) -> String {
        let mut full = url.clone();
        {
            let mut pairs = full.query_pairs_mut();
            for (k, v) in query.to_params() {
                pairs.append_pair(&k, &v);
            }
        }

        format!(
            "curl -g '{}' \\\n  -H 'Authorization: {}' \\\n  -H 'X-TITLE-ID: {}' \\\n  -H 'Accept: {}'",
            full,
            self.authorization(),
            self.config.title_id,
            JSON_API_MEDIA_TYPE
        )
    }
}
