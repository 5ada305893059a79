use std::cmp::Ordering;

use caldelta_types::{Parameter, QName, Value, ValueKind};
use caldelta_values::{ValueComparator, ValueConverter};

use crate::error::DiffResult;
use crate::merge::Entity;
use crate::selection::ParameterSelection;

/// A canonical parameter.
#[derive(Clone, Debug)]
pub struct ParamNode {
    parameter: Parameter,
    mapped: QName,
    kind: ValueKind,
    comparator: ValueComparator,
    value_only: Value,
}

impl ParamNode {
    pub(crate) fn new(
        parameter: Parameter,
        mapped: QName,
        converter: &dyn ValueConverter,
    ) -> DiffResult<Self> {
        let comparator = converter.comparator(&parameter.value)?;
        let value_only = converter.value_only(&parameter.value);
        Ok(Self {
            kind: parameter.value.kind(),
            parameter,
            mapped,
            comparator,
            value_only,
        })
    }

    pub fn parameter(&self) -> &Parameter {
        &self.parameter
    }

    pub fn mapped_name(&self) -> &QName {
        &self.mapped
    }

    pub fn comparator(&self) -> &ValueComparator {
        &self.comparator
    }
}

impl Ord for ParamNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_names(other)
            .then_with(|| self.parameter.name.cmp(&other.parameter.name))
            .then_with(|| self.comparator.cmp(&other.comparator))
            .then_with(|| self.kind.cmp(&other.kind))
    }
}

impl PartialOrd for ParamNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ParamNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ParamNode {}

impl Entity for ParamNode {
    type Reference = Parameter;
    type Change = ParameterSelection;

    fn name(&self) -> &QName {
        &self.parameter.name
    }

    fn compare_names(&self, other: &Self) -> Ordering {
        self.mapped.cmp(&other.mapped)
    }

    fn same_entity(&self, other: &Self) -> bool {
        self.compare_names(other) == Ordering::Equal && self.kind == other.kind
    }

    fn reference(&self) -> Parameter {
        self.parameter.clone()
    }

    fn diff(&self, old: &Self) -> DiffResult<Option<ParameterSelection>> {
        if self.comparator == old.comparator {
            return Ok(None);
        }
        Ok(Some(ParameterSelection {
            parameter: old.parameter.clone(),
            change: Some(Parameter::new(
                self.parameter.name.clone(),
                self.value_only.clone(),
            )),
        }))
    }
}
