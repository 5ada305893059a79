use std::cmp::Ordering;

use caldelta_tz::to_utc;
use caldelta_types::{names, DateOrDateTime, Property, QName, Value, ValueKind};
use caldelta_values::{ValueComparator, ValueConverter};
use chrono::{DateTime, Utc};

use crate::error::DiffResult;
use crate::merge::{select, Entity};
use crate::selection::PropertySelection;
use crate::sibling::Canonicalizer;

use super::ParamNode;

/// A canonical property: one normalized unit of a raw property.
///
/// A split multi-valued property (CATEGORIES, FREEBUSY) yields one node per
/// element, each carrying a copy of the raw property's parameters.
#[derive(Clone, Debug)]
pub struct PropNode {
    property: Property,
    mapped: QName,
    /// Name of the wrapped property for an `x-bedework-wrapper`.
    wrapped_name: Option<String>,
    kind: ValueKind,
    comparator: ValueComparator,
    value_only: Value,
    params: Vec<ParamNode>,
    /// UTC instant of a RECURRENCE-ID with a date or date-time value.
    instant: Option<DateTime<Utc>>,
}

impl PropNode {
    pub(crate) fn new(
        property: Property,
        converter: &dyn ValueConverter,
        cx: &Canonicalizer<'_>,
    ) -> DiffResult<Self> {
        let mapped = cx.config().mapped_name(&property.name).clone();
        let wrapped_name = (mapped == names::X_BEDEWORK_WRAPPER)
            .then(|| property.text_parameter(&names::X_BEDEWORK_WRAPPED_NAME))
            .flatten()
            .map(str::to_string);
        let instant = if mapped == names::RECURRENCE_ID {
            recurrence_instant(&property, cx)?
        } else {
            None
        };

        Ok(Self {
            kind: property.value.kind(),
            comparator: converter.comparator(&property.value)?,
            value_only: converter.value_only(&property.value),
            params: cx.parameters(&property.parameters)?,
            property,
            mapped,
            wrapped_name,
            instant,
        })
    }

    pub fn property(&self) -> &Property {
        &self.property
    }

    pub fn mapped_name(&self) -> &QName {
        &self.mapped
    }

    pub fn comparator(&self) -> &ValueComparator {
        &self.comparator
    }

    pub fn parameters(&self) -> &[ParamNode] {
        &self.params
    }

    /// The UTC instant, for a RECURRENCE-ID.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.instant
    }
}

/// Normalize a RECURRENCE-ID value to UTC, honoring its TZID parameter.
///
/// Values that are not dates or date-times have no instant.
fn recurrence_instant(
    property: &Property,
    cx: &Canonicalizer<'_>,
) -> DiffResult<Option<DateTime<Utc>>> {
    let value = match &property.value {
        Value::DateOrDateTime(dt) => dt.clone(),
        Value::UtcDateTime(utc) => DateOrDateTime::Utc(*utc),
        Value::DateTime(local) => DateOrDateTime::Local(*local),
        _ => return Ok(None),
    };
    let tzid = property.text_parameter(&names::TZID);
    Ok(Some(to_utc(&value, tzid, cx.timezones())?))
}

impl Ord for PropNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Recurrence instants order before the written value so instances
        // sort chronologically whatever zone they are written in.
        self.compare_names(other)
            .then_with(|| self.property.name.cmp(&other.property.name))
            .then_with(|| self.instant.cmp(&other.instant))
            .then_with(|| self.comparator.cmp(&other.comparator))
            .then_with(|| self.params.cmp(&other.params))
            .then_with(|| self.kind.cmp(&other.kind))
    }
}

impl PartialOrd for PropNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PropNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PropNode {}

impl Entity for PropNode {
    type Reference = Property;
    type Change = PropertySelection;

    fn name(&self) -> &QName {
        &self.property.name
    }

    /// Mapped names, except between two `x-bedework-wrapper` properties,
    /// which compare by the text of their `x-bedework-wrapped-name`
    /// parameter (absent first).
    fn compare_names(&self, other: &Self) -> Ordering {
        if self.mapped == names::X_BEDEWORK_WRAPPER && other.mapped == names::X_BEDEWORK_WRAPPER {
            return self.wrapped_name.cmp(&other.wrapped_name);
        }
        self.mapped.cmp(&other.mapped)
    }

    fn same_entity(&self, other: &Self) -> bool {
        self.compare_names(other) == Ordering::Equal && self.kind == other.kind
    }

    fn reference(&self) -> Property {
        self.property.clone()
    }

    fn diff(&self, old: &Self) -> DiffResult<Option<PropertySelection>> {
        let parameters = select(&self.params, &old.params)?;
        let change = (self.comparator != old.comparator)
            .then(|| Property::new(self.property.name.clone(), self.value_only.clone()));

        if parameters.is_none() && change.is_none() {
            return Ok(None);
        }
        Ok(Some(PropertySelection {
            property: old.property.clone(),
            parameters,
            change,
        }))
    }
}
