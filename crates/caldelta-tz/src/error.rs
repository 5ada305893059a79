use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors raised while normalizing a date-time to UTC.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TzError {
    /// The resolver does not know the timezone identifier.
    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),

    /// The local time falls in a gap of the zone (e.g. a DST transition).
    #[error("local time {local} does not exist in timezone '{tzid}'")]
    NonexistentLocalTime { tzid: String, local: NaiveDateTime },
}

/// Result alias for timezone operations.
pub type TzResult<T> = Result<T, TzError>;
