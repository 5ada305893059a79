use caldelta_types::Value;

use crate::comparator::{ValueComparator, ValueTag};
use crate::converter::ValueConverter;
use crate::error::{ValueError, ValueResult};

/// Compares single-field values by their textual form.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScalarConverter;

impl ValueConverter for ScalarConverter {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn comparator(&self, value: &Value) -> ValueResult<ValueComparator> {
        let (tag, text) = match value {
            Value::Integer(n) => (ValueTag::Integer, n.to_string()),
            Value::Uri(s) => (ValueTag::Uri, s.clone()),
            Value::CalAddress(s) => (ValueTag::CalAddress, s.clone()),
            Value::UtcOffset(s) => (ValueTag::UtcOffset, s.clone()),
            Value::Boolean(b) => (ValueTag::Boolean, b.to_string()),
            Value::Duration(s) => (ValueTag::Duration, s.clone()),
            _ => return Err(ValueError::mismatch(self.name(), value)),
        };
        Ok(ValueComparator::single(tag, text))
    }
}
