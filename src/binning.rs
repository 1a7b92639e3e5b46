//! Fixed-width binning of count columns whose names are numeric keys
//! (exact friend counts "0".."75" become "0-9", "10-19", ...).

use log::warn;

use crate::error::{Error, Result};
use crate::table::{Table, Value};

/// Sum category columns into half-open, left-inclusive bins of `bin_width`
/// over `[domain_min, domain_max)`, per group row. A key equal to a bin's
/// upper bound lands in the next bin; a key outside the domain drops its
/// column with a logged warning. Output bins are in ascending order.
pub fn bin_by_width(
    table: &Table,
    group_col: &str,
    category_cols: &[&str],
    bin_width: f64,
    domain_min: f64,
    domain_max: f64,
) -> Result<Table> {
    if !bin_width.is_finite() || bin_width <= 0.0 {
        return Err(Error::InvalidBins(format!(
            "bin width must be positive, got {}",
            bin_width
        )));
    }
    if !(domain_min.is_finite() && domain_max.is_finite()) || domain_max <= domain_min {
        return Err(Error::InvalidBins(format!(
            "empty domain [{}, {})",
            domain_min, domain_max
        )));
    }

    let group_idx = table.column_index(group_col)?;

    // Every category key must parse as a number before any summing happens.
    let mut keyed: Vec<(usize, f64)> = Vec::with_capacity(category_cols.len());
    for &name in category_cols {
        let idx = table.column_index(name)?;
        let key: f64 = name.trim().parse().map_err(|_| Error::NonNumeric {
            column: name.to_string(),
            value: name.to_string(),
        })?;
        keyed.push((idx, key));
    }

    let n_bins = ((domain_max - domain_min) / bin_width).ceil() as usize;

    // Column index -> bin index, with out-of-domain columns dropped.
    let mut bin_of: Vec<Option<usize>> = Vec::with_capacity(keyed.len());
    for (&(_, key), &name) in keyed.iter().zip(category_cols) {
        if key < domain_min || key >= domain_max {
            warn!(
                "column '{}' (key {}) outside [{}, {}), dropped from binning",
                name, key, domain_min, domain_max
            );
            bin_of.push(None);
            continue;
        }
        bin_of.push(Some(((key - domain_min) / bin_width).floor() as usize));
    }

    let mut headers = vec![group_col.to_string()];
    for k in 0..n_bins {
        headers.push(bin_label(domain_min, bin_width, k));
    }

    let mut rows = Vec::with_capacity(table.n_rows());
    for row in table.rows() {
        let mut sums = vec![0i64; n_bins];
        for ((&(idx, _), bin), &name) in keyed.iter().zip(&bin_of).zip(category_cols) {
            let Some(bin) = bin else { continue };
            let count = row[idx].as_i64().ok_or_else(|| Error::NonNumeric {
                column: name.to_string(),
                value: row[idx].to_string(),
            })?;
            sums[*bin] += count;
        }
        let mut out = Vec::with_capacity(n_bins + 1);
        out.push(row[group_idx].clone());
        out.extend(sums.into_iter().map(Value::Int));
        rows.push(out);
    }

    Table::new(headers, rows)
}

fn bin_label(domain_min: f64, bin_width: f64, k: usize) -> String {
    let lo = domain_min + k as f64 * bin_width;
    let hi = lo + bin_width;
    if bin_width.fract() == 0.0 && domain_min.fract() == 0.0 {
        // Integer domains read like the survey bins: "0-9", "10-19"
        format!("{}-{}", lo as i64, hi as i64 - 1)
    } else {
        format!("[{}, {})", lo, hi)
    }
}
