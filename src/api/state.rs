use std::sync::Arc;

use serde::Serialize;

use crate::models::MatchDocument;

/// Where a dataset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Demo,
    Api,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Demo => "demo",
            Source::Api => "api",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "demo" => Some(Source::Demo),
            "api" => Some(Source::Api),
            _ => None,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dropdown entry: `"{n}: {match_id}"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchOption {
    pub value: String,
    pub label: String,
}

/// One document loaded at start-up.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub source: Source,
    pub title: String,
    pub document: MatchDocument,
}

impl Dataset {
    pub fn new(source: Source, title: impl Into<String>, document: MatchDocument) -> Self {
        Self {
            source,
            title: title.into(),
            document,
        }
    }

    pub fn match_options(&self) -> Vec<MatchOption> {
        self.document
            .match_ids()
            .into_iter()
            .enumerate()
            .map(|(i, id)| MatchOption {
                value: id.to_string(),
                label: format!("{}: {}", i + 1, id),
            })
            .collect()
    }
}

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct AppState {
    pub datasets: Arc<Vec<Dataset>>,
}

impl AppState {
    pub fn new(datasets: Vec<Dataset>) -> Self {
        Self {
            datasets: Arc::new(datasets),
        }
    }

    pub fn dataset(&self, source: Source) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.source == source)
    }
}
