//! Tabular assembly of stats mappings.
//!
//! Each input mapping becomes one row; the column set is the union of all
//! keys in first-seen order, so rosters reporting different stats still line
//! up. Cells a row does not have stay empty.

mod chart;

pub use chart::*;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::Roster;
use crate::parse::DocumentIndex;

/// Rows rendered by default in HTML tables.
pub const DEFAULT_MAX_ROWS: usize = 10;

#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column {column} has a non-numeric value in row {row}")]
    NonNumeric { column: String, row: usize },
}

/// A table of scalar stats, one row per entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<Value>>>,
}

impl StatsTable {
    /// Build a table from a list of stats mappings.
    pub fn from_stats<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a Map<String, Value>>,
    {
        let items: Vec<&Map<String, Value>> = items.into_iter().collect();

        let mut columns: Vec<String> = Vec::new();
        for item in &items {
            for key in item.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = items
            .iter()
            .map(|item| columns.iter().map(|c| item.get(c).cloned()).collect())
            .collect();

        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_ref()
    }

    /// Columns whose present cells are all numbers (at least one present).
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(idx, _)| {
                let mut present = self.rows.iter().filter_map(|row| row[*idx].as_ref());
                let mut any = false;
                let all_numeric = present.all(|v| {
                    any = true;
                    v.is_number()
                });
                any && all_numeric
            })
            .map(|(_, c)| c.as_str())
            .collect()
    }

    /// Numeric values of one column; empty cells read as 0.
    pub fn column_values(&self, column: &str) -> Result<Vec<f64>, TableError> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| TableError::UnknownColumn(column.to_string()))?;

        self.rows
            .iter()
            .enumerate()
            .map(|(row, cells)| match &cells[idx] {
                None => Ok(0.0),
                Some(v) => v.as_f64().ok_or_else(|| TableError::NonNumeric {
                    column: column.to_string(),
                    row,
                }),
            })
            .collect()
    }

    /// Render the table as HTML, capped at `max_rows` rows.
    pub fn to_html(&self, max_rows: usize) -> String {
        let mut html = String::from("<table>\n<tr>");
        for column in &self.columns {
            html.push_str("<th>");
            html.push_str(&escape_html(column));
            html.push_str("</th>");
        }
        html.push_str("</tr>\n");

        for row in self.rows.iter().take(max_rows) {
            html.push_str("<tr>");
            for cell in row {
                html.push_str("<td>");
                html.push_str(&escape_html(&display_cell(cell.as_ref())));
                html.push_str("</td>");
            }
            html.push_str("</tr>\n");
        }

        html.push_str("</table>");
        html
    }
}

/// Text shown for a cell: strings unquoted, empty cells blank.
pub fn display_cell(cell: Option<&Value>) -> String {
    match cell {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Roster stats table for a match, one row per roster.
///
/// An unknown match yields an empty table.
pub fn roster_table(index: &DocumentIndex<'_>, match_id: &str) -> StatsTable {
    let rosters = index.rosters_for_match(match_id);
    StatsTable::from_stats(rosters.iter().filter_map(|r| r.stats()))
}

/// Participant stats table for a match, one row per participant, with the
/// hero in an `actor` column. Nested stats (item lists) are left out.
pub fn participant_table(index: &DocumentIndex<'_>, match_id: &str) -> StatsTable {
    let rows: Vec<Map<String, Value>> = index
        .participants_for_match(match_id)
        .into_iter()
        .map(|p| {
            let mut row = Map::new();
            if let Some(actor) = p.attribute("actor") {
                row.insert("actor".to_string(), actor.clone());
            }
            if let Some(stats) = p.stats() {
                for (k, v) in stats {
                    if v.is_array() || v.is_object() {
                        continue;
                    }
                    row.insert(k.clone(), v.clone());
                }
            }
            row
        })
        .collect();

    StatsTable::from_stats(rows.iter())
}

/// Bar labels for a match's rosters, aligned with [`roster_table`] rows.
pub fn roster_labels(index: &DocumentIndex<'_>, match_id: &str) -> Vec<String> {
    index
        .rosters_for_match(match_id)
        .into_iter()
        .filter(|r| r.stats().is_some())
        .map(|r| match Roster::from_resource(r) {
            Ok(roster) => roster.label().to_string(),
            Err(_) => r.id.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::fixtures::two_match_document;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_columns_are_union_in_first_seen_order() {
        let a = map(json!({"b": 1, "a": 2}));
        let b = map(json!({"c": 3, "a": 4}));

        let table = StatsTable::from_stats([&a, &b]);

        assert_eq!(table.columns, vec!["b", "a", "c"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0], vec![Some(json!(1)), Some(json!(2)), None]);
        assert_eq!(table.rows[1], vec![None, Some(json!(4)), Some(json!(3))]);
    }

    #[test]
    fn test_rows_preserve_input_order() {
        let items: Vec<Map<String, Value>> =
            (0..5).map(|i| map(json!({ "n": i }))).collect();
        let table = StatsTable::from_stats(items.iter());

        for (i, row) in table.rows.iter().enumerate() {
            assert_eq!(row[0], Some(json!(i)));
        }
    }

    #[test]
    fn test_assembly_is_idempotent() {
        let items = vec![map(json!({"x": 1})), map(json!({"y": "a"}))];
        assert_eq!(
            StatsTable::from_stats(items.iter()),
            StatsTable::from_stats(items.iter())
        );
    }

    #[test]
    fn test_empty_input() {
        let table = StatsTable::from_stats(std::iter::empty());
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
        assert_eq!(table.to_html(10), "<table>\n<tr></tr>\n</table>");
    }

    #[test]
    fn test_numeric_columns_and_values() {
        let a = map(json!({"side": "left/blue", "gold": 100, "aces": 1}));
        let b = map(json!({"side": "right/red", "gold": 50.5}));
        let table = StatsTable::from_stats([&a, &b]);

        assert_eq!(table.numeric_columns(), vec!["gold", "aces"]);
        assert_eq!(table.column_values("gold").unwrap(), vec![100.0, 50.5]);
        assert_eq!(table.column_values("aces").unwrap(), vec![1.0, 0.0]);
        assert_eq!(
            table.column_values("side"),
            Err(TableError::NonNumeric {
                column: "side".to_string(),
                row: 0
            })
        );
        assert_eq!(
            table.column_values("nope"),
            Err(TableError::UnknownColumn("nope".to_string()))
        );
    }

    #[test]
    fn test_to_html_caps_rows_and_escapes() {
        let items: Vec<Map<String, Value>> = (0..12)
            .map(|i| map(json!({"name": format!("<p{}>", i)})))
            .collect();
        let table = StatsTable::from_stats(items.iter());
        let html = table.to_html(DEFAULT_MAX_ROWS);

        assert_eq!(html.matches("<td>").count(), 10);
        assert!(html.contains("&lt;p0&gt;"));
        assert!(!html.contains("<p0>"));
    }

    #[test]
    fn test_roster_table_for_match() {
        let doc = two_match_document();
        let index = DocumentIndex::new(&doc);

        let table = roster_table(&index, "m1");
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns[..4].to_vec(), vec!["side", "gold", "heroKills", "turretKills"]);
        assert_eq!(table.cell(0, "side"), Some(&json!("right/red")));
        assert_eq!(table.cell(1, "gold"), Some(&json!(25000)));
        assert!(table.cell(0, "acesEarned").is_none());

        assert_eq!(roster_labels(&index, "m1"), vec!["right/red", "left/blue"]);
        assert!(roster_table(&index, "nope").is_empty());
    }

    #[test]
    fn test_participant_table_for_match() {
        let doc = two_match_document();
        let index = DocumentIndex::new(&doc);

        let table = participant_table(&index, "m1");
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns[..3].to_vec(), vec!["actor", "kills", "deaths"]);
        assert_eq!(table.cell(0, "actor"), Some(&json!("*Catherine*")));
        assert_eq!(table.cell(1, "kills"), Some(&json!(8)));
    }

    #[test]
    fn test_display_cell() {
        assert_eq!(display_cell(None), "");
        assert_eq!(display_cell(Some(&json!("x"))), "x");
        assert_eq!(display_cell(Some(&json!(true))), "true");
        assert_eq!(display_cell(Some(&json!(2.5))), "2.5");
    }
}
