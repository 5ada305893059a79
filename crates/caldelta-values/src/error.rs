use caldelta_types::ValueKind;
use thiserror::Error;

/// Errors raised while converting values.
///
/// Both variants are configuration bugs rather than data errors: retrying
/// the same call cannot succeed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValueError {
    /// No converter is registered for the kind or any of its generalizations.
    #[error("no converter registered for value kind '{kind}'")]
    UnknownValueKind { kind: ValueKind },

    /// A converter was handed a value shape it does not understand.
    #[error("converter '{converter}' cannot handle a value of kind '{kind}'")]
    ConverterMismatch {
        converter: &'static str,
        kind: ValueKind,
    },
}

impl ValueError {
    /// Shorthand for a [`ValueError::ConverterMismatch`] on `value`.
    pub fn mismatch(converter: &'static str, value: &caldelta_types::Value) -> Self {
        Self::ConverterMismatch {
            converter,
            kind: value.kind(),
        }
    }
}

/// Result alias for value operations.
pub type ValueResult<T> = Result<T, ValueError>;
