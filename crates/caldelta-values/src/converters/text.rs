use caldelta_types::Value;

use crate::comparator::{ValueComparator, ValueTag};
use crate::converter::ValueConverter;
use crate::error::{ValueError, ValueResult};

/// Compares any single-text value by its text.
///
/// Registered for plain text and for the enumerated-text parent kind, so
/// every enumerated property and parameter resolves here through its
/// generalization chain.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextConverter;

impl ValueConverter for TextConverter {
    fn name(&self) -> &'static str {
        "text"
    }

    fn comparator(&self, value: &Value) -> ValueResult<ValueComparator> {
        value
            .as_text()
            .map(|text| ValueComparator::single(ValueTag::Text, text))
            .ok_or_else(|| ValueError::mismatch(self.name(), value))
    }
}
