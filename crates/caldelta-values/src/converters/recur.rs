use std::fmt::Display;

use caldelta_types::{Recur, Value};

use crate::comparator::{ValueComparator, ValueTag};
use crate::converter::ValueConverter;
use crate::error::{ValueError, ValueResult};

/// Compares recurrence rules part by part.
///
/// Parts appear in a fixed order (FREQ, UNTIL, COUNT, INTERVAL, the BYxxx
/// lists, WKST). A part the rule does not state is left out of the
/// comparator entirely.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecurConverter;

fn push_all<T: Display>(vc: &mut ValueComparator, tag: ValueTag, items: &[T]) {
    for item in items {
        vc.push(tag.clone(), item.to_string());
    }
}

fn rule_comparator(rule: &Recur) -> ValueComparator {
    let mut vc = ValueComparator::single(ValueTag::Freq, rule.freq.to_string());

    vc.push_opt(ValueTag::Until, rule.until.as_ref().map(|u| u.to_ical_string()));
    vc.push_opt(ValueTag::Count, rule.count.map(|n| n.to_string()));
    vc.push_opt(ValueTag::Interval, rule.interval.map(|n| n.to_string()));
    push_all(&mut vc, ValueTag::BySecond, &rule.by_second);
    push_all(&mut vc, ValueTag::ByMinute, &rule.by_minute);
    push_all(&mut vc, ValueTag::ByHour, &rule.by_hour);
    push_all(&mut vc, ValueTag::ByDay, &rule.by_day);
    push_all(&mut vc, ValueTag::ByMonthDay, &rule.by_month_day);
    push_all(&mut vc, ValueTag::ByYearDay, &rule.by_year_day);
    push_all(&mut vc, ValueTag::ByWeekNo, &rule.by_week_no);
    push_all(&mut vc, ValueTag::ByMonth, &rule.by_month);
    push_all(&mut vc, ValueTag::BySetPos, &rule.by_set_pos);
    vc.push_opt(ValueTag::Wkst, rule.wkst.map(|d| d.to_string()));

    vc
}

impl ValueConverter for RecurConverter {
    fn name(&self) -> &'static str {
        "recur"
    }

    fn comparator(&self, value: &Value) -> ValueResult<ValueComparator> {
        match value {
            Value::Recur(rule) => Ok(rule_comparator(rule)),
            _ => Err(ValueError::mismatch(self.name(), value)),
        }
    }
}
