//! Error types for the diff crate.

use caldelta_tz::TzError;
use caldelta_types::QName;
use caldelta_values::ValueError;

/// Errors that abort a diff call.
///
/// None of these are retried: the engine is a pure function of its inputs
/// and configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    /// No converter resolves for an encountered value, or a converter was
    /// handed a shape it does not handle.
    #[error(transparent)]
    Value(#[from] ValueError),

    /// A property required to identify a component is missing.
    #[error("component '{component}' has no '{property}' property to identify it")]
    AmbiguousIdentity { component: QName, property: QName },

    /// A RECURRENCE-ID could not be normalized to UTC.
    #[error("cannot resolve timezone '{tzid}': {reason}")]
    TimezoneResolutionFailure { tzid: String, reason: String },

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl DiffError {
    pub fn ambiguous(component: &QName, property: &QName) -> Self {
        Self::AmbiguousIdentity {
            component: component.clone(),
            property: property.clone(),
        }
    }
}

impl From<TzError> for DiffError {
    fn from(err: TzError) -> Self {
        let tzid = match &err {
            TzError::UnknownTimezone(tzid) => tzid.clone(),
            TzError::NonexistentLocalTime { tzid, .. } => tzid.clone(),
        };
        Self::TimezoneResolutionFailure {
            tzid,
            reason: err.to_string(),
        }
    }
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
