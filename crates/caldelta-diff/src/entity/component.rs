use std::cmp::Ordering;

use caldelta_types::{names, Component, ComponentKind, QName};
use caldelta_values::ValueComparator;
use chrono::{DateTime, Utc};

use crate::error::{DiffError, DiffResult};
use crate::merge::{select, Entity};
use crate::selection::ComponentSelection;

use super::PropNode;

/// Which instance of a recurring entity a component is.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Instance {
    At(DateTime<Utc>),
    /// A RECURRENCE-ID whose value is not a date or date-time.
    Value(ValueComparator),
}

/// The identity key of a component, by kind.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Identity {
    /// Identified by name and kind alone.
    Anonymous,
    Recurring {
        uid: ValueComparator,
        instance: Option<Instance>,
    },
    Uid {
        uid: ValueComparator,
    },
    /// ACTION is the identity; TRIGGER only orders.
    Alarm {
        action: ValueComparator,
        trigger: Option<ValueComparator>,
    },
}

fn find<'p>(props: &'p [PropNode], name: &QName) -> Option<&'p PropNode> {
    props.iter().find(|p| p.property().name == *name)
}

fn require<'p>(component: &QName, props: &'p [PropNode], name: &QName) -> DiffResult<&'p PropNode> {
    find(props, name).ok_or_else(|| DiffError::ambiguous(component, name))
}

impl Identity {
    fn build(name: &QName, kind: ComponentKind, props: &[PropNode]) -> DiffResult<Self> {
        Ok(match kind {
            ComponentKind::Recurring => Self::Recurring {
                uid: require(name, props, &names::UID)?.comparator().clone(),
                instance: find(props, &names::RECURRENCE_ID).map(|rid| match rid.instant() {
                    Some(at) => Instance::At(at),
                    None => Instance::Value(rid.comparator().clone()),
                }),
            },
            ComponentKind::UidOnly => Self::Uid {
                uid: require(name, props, &names::UID)?.comparator().clone(),
            },
            ComponentKind::Alarm => Self::Alarm {
                action: require(name, props, &names::ACTION)?.comparator().clone(),
                trigger: find(props, &names::TRIGGER).map(|t| t.comparator().clone()),
            },
            ComponentKind::Unknown
            | ComponentKind::Outer
            | ComponentKind::Timezone
            | ComponentKind::Daylight
            | ComponentKind::Standard => Self::Anonymous,
        })
    }
}

/// A canonical component.
///
/// Borrows the source component so add and remove references can be
/// emitted whole without re-assembling them from canonical children.
#[derive(Clone, Debug)]
pub struct CompNode<'a> {
    source: &'a Component,
    kind: ComponentKind,
    identity: Identity,
    props: Vec<PropNode>,
    comps: Vec<CompNode<'a>>,
}

impl<'a> CompNode<'a> {
    pub(crate) fn new(
        source: &'a Component,
        props: Vec<PropNode>,
        comps: Vec<CompNode<'a>>,
    ) -> DiffResult<Self> {
        let kind = source.kind();
        let identity = Identity::build(&source.name, kind, &props)?;
        Ok(Self {
            source,
            kind,
            identity,
            props,
            comps,
        })
    }

    pub fn component(&self) -> &'a Component {
        self.source
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn properties(&self) -> &[PropNode] {
        &self.props
    }

    pub fn components(&self) -> &[CompNode<'a>] {
        &self.comps
    }

    /// Just enough of the component to say which one it is.
    ///
    /// | Kind | Reference properties |
    /// |---|---|
    /// | outer, unknown | none |
    /// | event, to-do, journal | UID, RECURRENCE-ID if present |
    /// | free/busy | UID |
    /// | alarm | ACTION |
    /// | vtimezone | TZID |
    /// | standard, daylight | DTSTART |
    pub fn minimal_reference(&self) -> DiffResult<Component> {
        let name = &self.source.name;
        let (required, optional) = match self.kind {
            ComponentKind::Outer | ComponentKind::Unknown => (None, None),
            ComponentKind::Recurring => (Some(names::UID), Some(names::RECURRENCE_ID)),
            ComponentKind::UidOnly => (Some(names::UID), None),
            ComponentKind::Alarm => (Some(names::ACTION), None),
            ComponentKind::Timezone => (Some(names::TZID), None),
            ComponentKind::Daylight | ComponentKind::Standard => (Some(names::DTSTART), None),
        };

        let mut reference = Component::new(name.clone());
        if let Some(prop) = required {
            reference
                .properties
                .push(require(name, &self.props, &prop)?.property().clone());
        }
        if let Some(prop) = optional.and_then(|prop| find(&self.props, &prop)) {
            reference.properties.push(prop.property().clone());
        }
        Ok(reference)
    }
}

impl Ord for CompNode<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_names(other)
            .then_with(|| self.kind.cmp(&other.kind))
            .then_with(|| self.identity.cmp(&other.identity))
            .then_with(|| self.props.cmp(&other.props))
            .then_with(|| self.comps.cmp(&other.comps))
    }
}

impl PartialOrd for CompNode<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CompNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CompNode<'_> {}

impl Entity for CompNode<'_> {
    type Reference = Component;
    type Change = ComponentSelection;

    fn name(&self) -> &QName {
        &self.source.name
    }

    fn compare_names(&self, other: &Self) -> Ordering {
        self.source.name.cmp(&other.source.name)
    }

    /// Outer, timezone and unknown components always match a same-named
    /// counterpart. Events, to-dos and journals match on UID and
    /// recurrence instance, free/busy on UID, alarms on ACTION alone.
    fn same_entity(&self, other: &Self) -> bool {
        if self.compare_names(other) != Ordering::Equal || self.kind != other.kind {
            return false;
        }
        match (&self.identity, &other.identity) {
            (
                Identity::Recurring { uid, instance },
                Identity::Recurring {
                    uid: other_uid,
                    instance: other_instance,
                },
            ) => uid == other_uid && instance == other_instance,
            (Identity::Uid { uid }, Identity::Uid { uid: other_uid }) => uid == other_uid,
            (
                Identity::Alarm { action, .. },
                Identity::Alarm {
                    action: other_action,
                    ..
                },
            ) => action == other_action,
            _ => true,
        }
    }

    fn reference(&self) -> Component {
        self.source.clone()
    }

    fn diff(&self, old: &Self) -> DiffResult<Option<ComponentSelection>> {
        let properties = select(&self.props, &old.props)?;
        let components = select(&self.comps, &old.comps)?;

        if properties.is_none() && components.is_none() {
            return Ok(None);
        }
        Ok(Some(ComponentSelection {
            component: self.minimal_reference()?,
            properties,
            components,
        }))
    }
}
