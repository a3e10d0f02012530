use thiserror::Error;

#[derive(Error, Debug)]
pub enum AcsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("traversal error: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("table {table_id}: line number {value:?} is not a whole number")]
    BadLineNumber { table_id: String, value: String },

    #[error("sequence number {value:?} is not an integer")]
    BadSequenceNumber { value: String },

    #[error("value {value:?} is not numeric")]
    BadValue { value: String },

    #[error("{path}: record has {got} fields, expected {expected}")]
    FieldCount {
        path: String,
        expected: usize,
        got: usize,
    },

    #[error("table {table_id}: lookup block has fewer than two rows")]
    TruncatedTable { table_id: String },

    #[error("no geography record for state {stusab:?} logrecno {logrecno:?}")]
    UnknownGeography { stusab: String, logrecno: String },

    #[error("{path}: no sequence table derived for sequence {seq}")]
    UnknownSequence { path: String, seq: u32 },

    #[error("{0:?} is not a valid SQL identifier")]
    BadIdentifier(String),

    #[error("table {0} has no reportable columns to project")]
    EmptyView(String),
}

pub type Result<T> = std::result::Result<T, AcsError>;
