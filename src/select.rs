//! Row filtering. Predicates are ANDed; column references are resolved
//! against the header row before any data row is inspected.

use crate::error::{Error, Result};
use crate::table::{Table, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column == value`
    Eq { column: String, value: Value },
    /// `column != value`
    NotEq { column: String, value: Value },
    /// `column in min..max`, bounds inclusive
    Between { column: String, min: f64, max: f64 },
}

impl Predicate {
    pub fn eq(column: &str, value: impl Into<Value>) -> Predicate {
        Predicate::Eq {
            column: column.to_string(),
            value: value.into(),
        }
    }

    pub fn not_eq(column: &str, value: impl Into<Value>) -> Predicate {
        Predicate::NotEq {
            column: column.to_string(),
            value: value.into(),
        }
    }

    pub fn between(column: &str, min: f64, max: f64) -> Predicate {
        Predicate::Between {
            column: column.to_string(),
            min,
            max,
        }
    }

    fn column(&self) -> &str {
        match self {
            Predicate::Eq { column, .. }
            | Predicate::NotEq { column, .. }
            | Predicate::Between { column, .. } => column,
        }
    }
}

/// Return the sub-table of rows satisfying every predicate, preserving the
/// column set and row order. An empty match is a valid zero-row table.
pub fn select(table: &Table, predicates: &[Predicate]) -> Result<Table> {
    // Resolve every column up front so a bad reference fails before any row
    // is inspected, even on an empty table.
    let resolved: Vec<(usize, &Predicate)> = predicates
        .iter()
        .map(|p| Ok((table.column_index(p.column())?, p)))
        .collect::<Result<_>>()?;

    let mut rows = Vec::new();
    for row in table.rows() {
        let mut keep = true;
        for (idx, pred) in &resolved {
            let cell = &row[*idx];
            let matches = match pred {
                Predicate::Eq { value, .. } => cell.loose_eq(value),
                Predicate::NotEq { value, .. } => !cell.loose_eq(value),
                Predicate::Between { column, min, max } => {
                    let v = cell.as_f64().ok_or_else(|| Error::NonNumeric {
                        column: column.clone(),
                        value: cell.to_string(),
                    })?;
                    v >= *min && v <= *max
                }
            };
            if !matches {
                keep = false;
                break;
            }
        }
        if keep {
            rows.push(row.clone());
        }
    }

    Table::new(table.headers().to_vec(), rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_table() -> Table {
        Table::from_rows(
            vec!["Country name", "year", "Ladder score"],
            vec![
                vec!["United States".into(), 2010.into(), 7.16.into()],
                vec!["United States".into(), 2024.into(), 6.72.into()],
                vec!["Finland".into(), 2024.into(), 7.74.into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_eq() {
        let t = make_table();
        let us = select(&t, &[Predicate::eq("Country name", "United States")]).unwrap();
        assert_eq!(us.n_rows(), 2);
        assert_eq!(us.headers(), t.headers());
    }

    #[test]
    fn test_not_eq() {
        let t = make_table();
        let rest = select(&t, &[Predicate::not_eq("Country name", "United States")]).unwrap();
        assert_eq!(rest.n_rows(), 1);
    }

    #[test]
    fn test_range_is_inclusive() {
        let t = make_table();
        let recent = select(&t, &[Predicate::between("year", 2010.0, 2024.0)]).unwrap();
        assert_eq!(recent.n_rows(), 3);
        let only_2024 = select(&t, &[Predicate::between("year", 2024.0, 2024.0)]).unwrap();
        assert_eq!(only_2024.n_rows(), 2);
    }

    #[test]
    fn test_predicates_are_anded() {
        let t = make_table();
        let rows = select(
            &t,
            &[
                Predicate::eq("Country name", "United States"),
                Predicate::between("year", 2020.0, 2024.0),
            ],
        )
        .unwrap();
        assert_eq!(rows.n_rows(), 1);
        assert_eq!(rows.rows()[0][2], Value::Float(6.72));
    }

    #[test]
    fn test_empty_match_keeps_columns() {
        let t = make_table();
        let none = select(&t, &[Predicate::between("year", 1800.0, 1900.0)]).unwrap();
        assert_eq!(none.n_rows(), 0);
        assert_eq!(none.headers(), t.headers());
    }

    #[test]
    fn test_missing_column_fails_before_rows() {
        let t = make_table();
        let err = select(&t, &[Predicate::eq("country", "x")]).unwrap_err();
        assert!(matches!(err, Error::MissingColumn(name) if name == "country"));

        // Fails even when the table has no rows to inspect.
        let empty = Table::from_rows(vec!["a"], vec![]).unwrap();
        assert!(select(&empty, &[Predicate::eq("b", 1)]).is_err());
    }

    #[test]
    fn test_range_over_text_column_is_a_schema_error() {
        let t = make_table();
        let err = select(&t, &[Predicate::between("Country name", 0.0, 1.0)]).unwrap_err();
        assert!(matches!(err, Error::NonNumeric { .. }));
    }

    #[test]
    fn test_idempotent() {
        let t = make_table();
        let preds = [Predicate::eq("Country name", "United States")];
        let once = select(&t, &preds).unwrap();
        let twice = select(&once, &preds).unwrap();
        assert_eq!(once, twice);
    }
}
