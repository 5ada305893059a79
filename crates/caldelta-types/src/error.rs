use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid qualified name: {0}")]
    InvalidName(String),

    #[error("invalid date or date-time: {0}")]
    InvalidDateTime(String),
}
