use serde::Serialize;

use crate::error::{Error, Result};
use crate::table::Table;

/// One observation in long form: the shape the chart sink consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TidyRecord {
    pub group: String,
    pub category: String,
    pub value: f64,
}

/// Reshape a wide per-group table into (group, category, value) records:
/// one record per (row, value column) pair. Order is deterministic (rows
/// in table order, then columns in argument order) so chart legends are
/// reproducible. A total column is only included if explicitly listed.
pub fn to_tidy(table: &Table, group_col: &str, value_cols: &[&str]) -> Result<Vec<TidyRecord>> {
    let group_idx = table.column_index(group_col)?;
    let value_idx = table.column_indices(value_cols)?;

    let mut records = Vec::with_capacity(table.n_rows() * value_cols.len());
    for row in table.rows() {
        let group = row[group_idx].to_string();
        for (&idx, &name) in value_idx.iter().zip(value_cols) {
            let value = row[idx].as_f64().ok_or_else(|| Error::NonNumeric {
                column: name.to_string(),
                value: row[idx].to_string(),
            })?;
            records.push(TidyRecord {
                group: group.clone(),
                category: name.to_string(),
                value,
            });
        }
    }
    Ok(records)
}
