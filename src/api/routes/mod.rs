pub mod dashboard;
pub mod matches;
