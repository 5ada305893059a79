use caldelta_types::value::format_utc;
use caldelta_types::{DateOrDateTime, Value};

use crate::comparator::{ValueComparator, ValueTag};
use crate::converter::ValueConverter;
use crate::error::{ValueError, ValueResult};

/// Compares dates and date-times by their iCalendar textual form.
///
/// A TZID parameter is never folded in: a pure timezone change surfaces as
/// a parameter change, not a value change.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateTimeConverter;

impl ValueConverter for DateTimeConverter {
    fn name(&self) -> &'static str {
        "date-time"
    }

    fn comparator(&self, value: &Value) -> ValueResult<ValueComparator> {
        let (tag, text) = match value {
            Value::DateTime(naive) => (
                ValueTag::DateTime,
                DateOrDateTime::Local(*naive).to_ical_string(),
            ),
            Value::UtcDateTime(utc) => (ValueTag::UtcDateTime, format_utc(utc)),
            Value::DateOrDateTime(dt) if dt.is_date() => (ValueTag::Date, dt.to_ical_string()),
            Value::DateOrDateTime(dt) => (ValueTag::DateTime, dt.to_ical_string()),
            _ => return Err(ValueError::mismatch(self.name(), value)),
        };
        Ok(ValueComparator::single(tag, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_and_date_time_are_distinguished() {
        let date = DateTimeConverter
            .comparator(&Value::date_or_date_time("20240301").unwrap())
            .unwrap();
        let dt = DateTimeConverter
            .comparator(&Value::date_or_date_time("20240301T000000").unwrap())
            .unwrap();
        assert_eq!(date, ValueComparator::single(ValueTag::Date, "20240301"));
        assert_eq!(dt, ValueComparator::single(ValueTag::DateTime, "20240301T000000"));
    }

    #[test]
    fn utc_suffix_is_kept() {
        let vc = DateTimeConverter
            .comparator(&Value::date_or_date_time("20240301T090000Z").unwrap())
            .unwrap();
        assert_eq!(vc, ValueComparator::single(ValueTag::DateTime, "20240301T090000Z"));
    }
}
