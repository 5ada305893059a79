use caldelta_types::Value;

use crate::comparator::ValueComparator;
use crate::error::ValueResult;

/// Comparison capability for one value kind.
///
/// Converters are registered per [`ValueKind`](caldelta_types::ValueKind) in
/// a [`ConverterRegistry`](crate::ConverterRegistry) and shared across
/// threads, hence `Send + Sync`.
pub trait ValueConverter: Send + Sync {
    /// Short name used in error messages and logs.
    fn name(&self) -> &'static str;

    /// The comparable form of `value`.
    fn comparator(&self, value: &Value) -> ValueResult<ValueComparator>;

    /// Split a multi-valued value into independent comparison units.
    ///
    /// The default keeps the value whole.
    fn normalize(&self, value: &Value) -> ValueResult<Vec<Value>> {
        Ok(vec![value.clone()])
    }

    /// A copy carrying only the payload, used for value-change leaves.
    fn value_only(&self, value: &Value) -> Value {
        value.clone()
    }
}
