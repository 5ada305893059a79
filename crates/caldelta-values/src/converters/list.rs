use caldelta_types::Value;

use crate::comparator::{ValueComparator, ValueTag};
use crate::converter::ValueConverter;
use crate::error::{ValueError, ValueResult};

/// Compares list values element by element.
///
/// A splitting list converter normalizes a list into one single-element
/// value per entry, so one element can be added or removed without
/// disturbing its siblings. Duplicate entries collapse later in the
/// ordered sibling set.
#[derive(Debug, Clone, Copy)]
pub struct ListConverter {
    split: bool,
}

impl ListConverter {
    /// Compare the list as one unit.
    pub const fn whole() -> Self {
        Self { split: false }
    }

    /// Split the list into one unit per element.
    pub const fn splitting() -> Self {
        Self { split: true }
    }

    fn elements(value: &Value) -> Option<(ValueTag, &[String])> {
        match value {
            Value::TextList(items) | Value::Categories(items) => Some((ValueTag::Text, items.as_slice())),
            Value::CalAddressList(items) => Some((ValueTag::CalAddress, items.as_slice())),
            _ => None,
        }
    }
}

impl ValueConverter for ListConverter {
    fn name(&self) -> &'static str {
        if self.split {
            "split-list"
        } else {
            "list"
        }
    }

    fn comparator(&self, value: &Value) -> ValueResult<ValueComparator> {
        let (tag, items) =
            Self::elements(value).ok_or_else(|| ValueError::mismatch(self.name(), value))?;
        Ok(items.iter().map(|item| (tag.clone(), item.clone())).collect())
    }

    fn normalize(&self, value: &Value) -> ValueResult<Vec<Value>> {
        let (_, items) =
            Self::elements(value).ok_or_else(|| ValueError::mismatch(self.name(), value))?;
        if !self.split || items.len() < 2 {
            return Ok(vec![value.clone()]);
        }

        let rebuild = |item: &String| match value {
            Value::Categories(_) => Value::Categories(vec![item.clone()]),
            Value::CalAddressList(_) => Value::CalAddressList(vec![item.clone()]),
            _ => Value::TextList(vec![item.clone()]),
        };
        Ok(items.iter().map(rebuild).collect())
    }
}
