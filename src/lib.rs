//! # vainstats
//!
//! Vainglory match stats: a dashboard over JSON:API match documents and a
//! command line tool for fetching, saving and ranking matches.
//!
//! ## Architecture
//!
//! - **models**: JSON:API document types and the typed match entities
//! - **parse**: Id-indexed lookups over a document, player/participant pairing
//! - **table**: Stats tables and bar chart series
//! - **calculate**: Player ranking score
//! - **fetch**: Remote match API client
//! - **storage**: Demo data, API key and harvested JSON files
//! - **report**: Console output for the fetch tool
//! - **api**: Dashboard server
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod fetch;
pub mod models;
pub mod parse;
pub mod report;
pub mod storage;
pub mod table;

pub use models::*;
