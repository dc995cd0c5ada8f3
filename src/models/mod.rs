//! Core data models for vainstats.

mod document;
mod entities;
mod ids;
mod region;

pub use document::*;
pub use entities::*;
pub use ids::*;
pub use region::*;
