//! The selection tree: the edit script a diff call returns.
//!
//! A selection names *which* entity changed with a reference node and nests
//! the changes to that entity's children beneath it. Added and removed
//! entities are carried whole so a caller can re-emit them verbatim; change
//! nodes carry only what identifies the changed entity.

use caldelta_types::{Component, Parameter, Property};
use serde::{Deserialize, Serialize};

/// Adds, removes and changes among the children of one parent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiblingSelection<R, C> {
    /// Entities present in the new tree only.
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub add: Vec<R>,
    /// Entities present in the old tree only.
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub remove: Vec<R>,
    /// Entities present on both sides that differ.
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub changed: Vec<C>,
}

impl<R, C> Default for SiblingSelection<R, C> {
    fn default() -> Self {
        Self {
            add: Vec::new(),
            remove: Vec::new(),
            changed: Vec::new(),
        }
    }
}

impl<R, C> SiblingSelection<R, C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no operations at this level.
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty() && self.changed.is_empty()
    }

    /// Number of operations at this level.
    pub fn len(&self) -> usize {
        self.add.len() + self.remove.len() + self.changed.len()
    }

    pub fn additions(&self) -> usize {
        self.add.len()
    }

    pub fn removals(&self) -> usize {
        self.remove.len()
    }

    pub fn modifications(&self) -> usize {
        self.changed.len()
    }

    /// `None` when empty, so empty levels vanish from the tree.
    pub fn into_option(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

pub type ComponentsSelection = SiblingSelection<Component, ComponentSelection>;
pub type PropertiesSelection = SiblingSelection<Property, PropertySelection>;
pub type ParametersSelection = SiblingSelection<Parameter, ParameterSelection>;

// ---------------------------------------------------------------------------
// Change nodes
// ---------------------------------------------------------------------------

/// A component present on both sides whose children differ.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentSelection {
    /// Minimal reference identifying the component (e.g. UID and
    /// RECURRENCE-ID for an event).
    pub component: Component,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertiesSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<ComponentsSelection>,
}

impl ComponentSelection {
    /// Added entities anywhere in this subtree.
    pub fn additions(&self) -> usize {
        let props = self.properties.as_ref().map_or(0, |p| {
            p.additions() + p.changed.iter().map(PropertySelection::additions).sum::<usize>()
        });
        let comps = self.components.as_ref().map_or(0, |c| {
            c.additions() + c.changed.iter().map(Self::additions).sum::<usize>()
        });
        props + comps
    }

    /// Removed entities anywhere in this subtree.
    pub fn removals(&self) -> usize {
        let props = self.properties.as_ref().map_or(0, |p| {
            p.removals() + p.changed.iter().map(PropertySelection::removals).sum::<usize>()
        });
        let comps = self.components.as_ref().map_or(0, |c| {
            c.removals() + c.changed.iter().map(Self::removals).sum::<usize>()
        });
        props + comps
    }

    /// Value changes anywhere in this subtree.
    pub fn modifications(&self) -> usize {
        let props = self.properties.as_ref().map_or(0, |p| {
            p.changed.iter().map(PropertySelection::modifications).sum::<usize>()
        });
        let comps = self.components.as_ref().map_or(0, |c| {
            c.changed.iter().map(Self::modifications).sum::<usize>()
        });
        props + comps
    }

    /// Returns `true` if no operation is recorded beneath this node.
    pub fn is_empty(&self) -> bool {
        self.additions() + self.removals() + self.modifications() == 0
    }
}

/// A property present on both sides whose value or parameters differ.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertySelection {
    /// The old property, parameters included.
    ///
    /// Repeated siblings such as ATTENDEE share a name, so the full old
    /// property is what locates the entity in the tree the edit applies
    /// to. The new state is carried by `parameters` and `change`. Component
    /// change nodes carry the new component's minimal reference instead.
    pub property: Property,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ParametersSelection>,
    /// The new value on a parameter-less copy of the property, present only
    /// when the value itself changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<Property>,
}

impl PropertySelection {
    pub fn additions(&self) -> usize {
        self.parameters.as_ref().map_or(0, SiblingSelection::additions)
    }

    pub fn removals(&self) -> usize {
        self.parameters.as_ref().map_or(0, SiblingSelection::removals)
    }

    /// The value change, if any, plus changed parameters.
    pub fn modifications(&self) -> usize {
        usize::from(self.change.is_some())
            + self.parameters.as_ref().map_or(0, SiblingSelection::modifications)
    }
}

/// A parameter present on both sides whose value differs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterSelection {
    /// The old parameter, locating the entity as for
    /// [`PropertySelection::property`].
    pub parameter: Parameter,
    /// The new value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<Parameter>,
}
