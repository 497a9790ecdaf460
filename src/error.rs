use thiserror::Error;

/// Data-integrity failures.  None of these are recovered: they abort the
/// current session with the full error chain.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("unknown city '{0}'")]
    UnknownCity(String),

    #[error("unknown month '{0}'")]
    UnknownMonth(String),

    #[error("unknown day '{0}'")]
    UnknownDay(String),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: cannot parse start time '{value}'")]
    InvalidStartTime { row: usize, value: String },

    #[error("row {row}: '{value}' is not a valid {column}")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: expected {expected} fields, found {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
