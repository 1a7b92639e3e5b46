use std::fmt;

use serde_json::Value as Json;

use crate::error::{Error, Result};

/// A single table cell. CSV fields are inferred int -> float -> string.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
}

impl Value {
    /// Infer the narrowest scalar type for a raw text field.
    pub fn infer(raw: &str) -> Value {
        let trimmed = raw.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return Value::Float(f);
        }
        Value::Str(raw.to_string())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Str(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Equality across numeric representations: `Int(2010)` matches
    /// `Float(2010.0)`; strings compare exactly.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => match (self, other) {
                (Value::Str(a), Value::Str(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

/// An in-memory table: ordered named columns, positional rows, all rows the
/// same width. Every pipeline stage takes a `Table` and returns a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        for (i, h) in headers.iter().enumerate() {
            if headers[..i].contains(h) {
                return Err(Error::DuplicateColumn(h.clone()));
            }
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(Error::RaggedRow {
                    row: i,
                    expected: headers.len(),
                    got: row.len(),
                });
            }
        }
        Ok(Table { headers, rows })
    }

    /// Build a table from literal rows, converting headers as given.
    pub fn from_rows<H: Into<String>>(headers: Vec<H>, rows: Vec<Vec<Value>>) -> Result<Self> {
        Table::new(headers.into_iter().map(Into::into).collect(), rows)
    }

    /// Build a table from a JSON array of objects. Headers come from the
    /// first object; missing fields become empty strings.
    pub fn from_json(value: &Json) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| Error::InvalidData("input data must be a JSON array of objects".into()))?;
        if array.is_empty() {
            return Err(Error::InvalidData("input data array is empty".into()));
        }

        let first = array[0]
            .as_object()
            .ok_or_else(|| Error::InvalidData("items in array must be objects".into()))?;
        let headers: Vec<String> = first.keys().cloned().collect();

        let mut rows = Vec::with_capacity(array.len());
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| Error::InvalidData("items in array must be objects".into()))?;
            let mut row = Vec::with_capacity(headers.len());
            for header in &headers {
                let cell = match obj.get(header) {
                    Some(Json::String(s)) => Value::Str(s.clone()),
                    Some(Json::Number(n)) => {
                        if let Some(i) = n.as_i64() {
                            Value::Int(i)
                        } else {
                            Value::Float(n.as_f64().unwrap_or(f64::NAN))
                        }
                    }
                    Some(Json::Bool(b)) => Value::Str(b.to_string()),
                    Some(Json::Null) | None => Value::Str(String::new()),
                    Some(other) => {
                        return Err(Error::InvalidData(format!(
                            "unsupported value {} for field '{}'",
                            other, header
                        )))
                    }
                };
                row.push(cell);
            }
            rows.push(row);
        }

        Table::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.headers.len()
    }

    /// Exact, case-sensitive header lookup.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    pub fn column_indices(&self, names: &[&str]) -> Result<Vec<usize>> {
        names.iter().map(|n| self.column_index(n)).collect()
    }

    /// Keep only the named columns, in the given order.
    pub fn project(&self, columns: &[&str]) -> Result<Table> {
        let indices = self.column_indices(columns)?;
        let headers = indices.iter().map(|&i| self.headers[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(Table { headers, rows })
    }

    /// Remove the named columns, preserving the order of the rest.
    pub fn drop_columns(&self, columns: &[&str]) -> Result<Table> {
        let drop = self.column_indices(columns)?;
        let keep: Vec<usize> = (0..self.headers.len())
            .filter(|i| !drop.contains(i))
            .collect();
        let headers = keep.iter().map(|&i| self.headers[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(Table { headers, rows })
    }

    pub fn rename_column(&self, old: &str, new: &str) -> Result<Table> {
        let idx = self.column_index(old)?;
        if old != new && self.headers.iter().any(|h| h == new) {
            return Err(Error::DuplicateColumn(new.to_string()));
        }
        let mut headers = self.headers.clone();
        headers[idx] = new.to_string();
        Ok(Table {
            headers,
            rows: self.rows.clone(),
        })
    }

    /// Append a column holding the same value in every row.
    pub fn with_constant_column(&self, name: &str, value: Value) -> Result<Table> {
        if self.headers.iter().any(|h| h == name) {
            return Err(Error::DuplicateColumn(name.to_string()));
        }
        let mut headers = self.headers.clone();
        headers.push(name.to_string());
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.push(value.clone());
                row
            })
            .collect();
        Ok(Table { headers, rows })
    }

    /// Row-wise concatenation. Column sets and order must match exactly.
    pub fn append(&self, other: &Table) -> Result<Table> {
        if self.headers != other.headers {
            return Err(Error::InvalidData(format!(
                "cannot append: columns [{}] do not match [{}]",
                self.headers.join(", "),
                other.headers.join(", ")
            )));
        }
        let mut rows = self.rows.clone();
        rows.extend(other.rows.iter().cloned());
        Ok(Table {
            headers: self.headers.clone(),
            rows,
        })
    }
}
