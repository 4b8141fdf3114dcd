use thiserror::Error;
use tracing::{debug, error};

use crate::engine::types::ColumnType;

/// Errors raised while planning or executing a sampling query.
#[derive(Debug, Error)]
pub enum SampleByError {
    #[error("Query cancelled")]
    Cancelled,

    #[error("Query timed out after {0} ms")]
    QueryTimeout(u64),

    #[error("Upstream cursor failed: {0}")]
    Upstream(String),

    #[error("Designated timestamp is null")]
    NullTimestamp,

    #[error("Timestamp {0} has no representable bucket start")]
    InvalidTimestamp(i64),

    #[error("Input is not ordered by timestamp: bucket {current} follows {previous}")]
    UnorderedTimestamp { previous: i64, current: i64 },

    #[error("Cursor is not bound to an input")]
    NotBound,

    #[error("Invalid sampling interval: {0}")]
    InvalidInterval(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Column {column} must be a timestamp, found {found}")]
    NotATimestamp { column: String, found: ColumnType },

    #[error("Aggregate {function} does not accept {arg_type} argument")]
    UnsupportedArgument {
        function: &'static str,
        arg_type: ColumnType,
    },

    #[error("Invalid aggregate expression: {0}")]
    InvalidAggregate(String),

    #[error("Expected {expected} fill values, found {found}")]
    FillValueCount { expected: usize, found: usize },

    #[error("Invalid fill value {value:?} for {column_type} column")]
    InvalidFillValue {
        value: String,
        column_type: ColumnType,
    },

    #[error("Fill mode {0} is not supported by value filling")]
    UnsupportedFill(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Row decode failed at line {line}: {reason}")]
    RowDecode { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SampleByError {
    pub fn log_error(&self) {
        match self {
            SampleByError::Cancelled | SampleByError::QueryTimeout(_) => {
                error!("Query was interrupted: {}", self);
                debug!("Interrupt details: {:?}", self);
            }
            SampleByError::Upstream(e) => {
                error!("Upstream cursor failed: {}", e);
                debug!("Upstream failure details: {:?}", self);
            }
            SampleByError::NullTimestamp
            | SampleByError::InvalidTimestamp(_)
            | SampleByError::UnorderedTimestamp { .. } => {
                error!("Input violates timestamp contract: {}", self);
                debug!("Timestamp contract details: {:?}", self);
            }
            SampleByError::RowDecode { line, reason } => {
                error!("Row decode failed at line {}", line);
                debug!("Row decode error details: {}", reason);
            }
            SampleByError::Io(e) => {
                error!("I/O error: {}", e);
                debug!("I/O error details: {:?}", e);
            }
            other => {
                error!("Sample by planning failed: {}", other);
                debug!("Planning error details: {:?}", other);
            }
        }
    }

    /// True when the error came from the execution context rather than the data.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, SampleByError::Cancelled | SampleByError::QueryTimeout(_))
    }
}
