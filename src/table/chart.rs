use serde::Serialize;

use super::{roster_labels, roster_table, TableError};
use crate::parse::DocumentIndex;

/// Preferred plot type when a roster table has it.
pub const DEFAULT_PLOT: &str = "gold";

/// One bar per roster for a single stat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub stat: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl BarChart {
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Bar chart of `stat` across a match's rosters.
pub fn roster_chart(
    index: &DocumentIndex<'_>,
    match_id: &str,
    stat: &str,
) -> Result<BarChart, TableError> {
    let table = roster_table(index, match_id);
    let values = table.column_values(stat)?;
    Ok(BarChart {
        stat: stat.to_string(),
        labels: roster_labels(index, match_id),
        values,
    })
}

/// Plot types offered for a match and the one picked by default.
pub fn plot_choices(index: &DocumentIndex<'_>, match_id: &str) -> (Vec<String>, Option<String>) {
    let table = roster_table(index, match_id);
    let choices: Vec<String> = table
        .numeric_columns()
        .into_iter()
        .map(str::to_string)
        .collect();
    let default = choices
        .iter()
        .find(|c| c.as_str() == DEFAULT_PLOT)
        .or_else(|| choices.first())
        .cloned();
    (choices, default)
}
