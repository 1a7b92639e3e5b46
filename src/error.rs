//! Typed failures for the tabular pipeline.
//!
//! Everything here is synchronous and non-retryable: a stage either returns a
//! new table or fails naming the row/column that triggered it. The binary and
//! story layers wrap these in `anyhow` context chains.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("column '{column}' is not numeric (offending value '{value}')")]
    NonNumeric { column: String, value: String },

    #[error("row {row} has {got} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("group '{group}': stated total {stated} does not match category sum {computed}")]
    TotalMismatch {
        group: String,
        stated: i64,
        computed: i64,
    },

    #[error("invalid bin configuration: {0}")]
    InvalidBins(String),

    #[error("unknown encoding label '{0}'")]
    UnknownEncoding(String),

    #[error("{0}")]
    InvalidData(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
