//! Percentage normalization over cross-tabulated counts.
//!
//! `GroupedCounts` is the validated view: construction checks that every
//! category cell is a non-negative integer and that each row's stated total
//! equals the sum of its categories. The transcribed survey tables are only
//! trusted after passing through here.

use log::warn;

use crate::error::{Error, Result};
use crate::table::{Table, Value};

/// A table with one group column, integer category columns, and a total
/// column verified to equal the per-row category sum.
#[derive(Debug, Clone)]
pub struct GroupedCounts {
    table: Table,
    group_col: String,
    category_cols: Vec<String>,
    total_col: String,
}

impl GroupedCounts {
    pub fn new(
        table: Table,
        group_col: &str,
        category_cols: &[&str],
        total_col: &str,
    ) -> Result<GroupedCounts> {
        if category_cols.is_empty() {
            return Err(Error::InvalidData(
                "at least one category column is required".into(),
            ));
        }
        let group_idx = table.column_index(group_col)?;
        let total_idx = table.column_index(total_col)?;
        let category_idx = table.column_indices(category_cols)?;

        for row in table.rows() {
            let group = row[group_idx].to_string();
            let mut computed = 0i64;
            for (&idx, &name) in category_idx.iter().zip(category_cols) {
                let count = read_count(&row[idx], name)?;
                computed += count;
            }
            let stated = read_count(&row[total_idx], total_col)?;
            if stated != computed {
                return Err(Error::TotalMismatch {
                    group,
                    stated,
                    computed,
                });
            }
        }

        Ok(GroupedCounts {
            table,
            group_col: group_col.to_string(),
            category_cols: category_cols.iter().map(|s| s.to_string()).collect(),
            total_col: total_col.to_string(),
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn group_col(&self) -> &str {
        &self.group_col
    }

    pub fn category_cols(&self) -> &[String] {
        &self.category_cols
    }

    pub fn total_col(&self) -> &str {
        &self.total_col
    }
}

fn read_count(cell: &Value, column: &str) -> Result<i64> {
    let count = cell.as_i64().ok_or_else(|| Error::NonNumeric {
        column: column.to_string(),
        value: cell.to_string(),
    })?;
    if count < 0 {
        return Err(Error::InvalidData(format!(
            "negative count {} in column '{}'",
            count, column
        )));
    }
    Ok(count)
}

/// Result of normalization: the percentage table plus the group labels of
/// any rows dropped under the zero-total policy.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub table: Table,
    pub dropped: Vec<String>,
}

/// Convert each category count to `100 * count / total` for its row.
///
/// Zero-total rows cannot be normalized; they are excluded from the output
/// and reported, both through the returned drop list and a logged warning.
/// The output carries the group column and the category columns, as floats.
pub fn normalize(counts: &GroupedCounts) -> Normalized {
    let table = counts.table();
    // Indices were validated at construction.
    let group_idx = table.column_index(counts.group_col()).expect("validated");
    let total_idx = table.column_index(counts.total_col()).expect("validated");
    let category_idx: Vec<usize> = counts
        .category_cols()
        .iter()
        .map(|c| table.column_index(c).expect("validated"))
        .collect();

    let mut headers = vec![counts.group_col().to_string()];
    headers.extend(counts.category_cols().iter().cloned());

    let mut rows = Vec::new();
    let mut dropped = Vec::new();
    for row in table.rows() {
        let group = row[group_idx].clone();
        let total = row[total_idx].as_i64().expect("validated") as f64;
        if total == 0.0 {
            warn!(
                "dropping group '{}': zero total, percentages undefined",
                group
            );
            dropped.push(group.to_string());
            continue;
        }
        let mut out = Vec::with_capacity(headers.len());
        out.push(group);
        for &idx in &category_idx {
            let count = row[idx].as_i64().expect("validated") as f64;
            out.push(Value::Float(100.0 * count / total));
        }
        rows.push(out);
    }

    Normalized {
        table: Table::new(headers, rows).expect("rows built against headers"),
        dropped,
    }
}
