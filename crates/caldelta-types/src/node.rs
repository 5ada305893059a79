//! The canonical calendar tree.
//!
//! A codec builds this tree from a wire format; the diff engine only reads
//! it. Children are kept in their original order here; canonical ordering is
//! the diff engine's concern.

use serde::{Deserialize, Serialize};

use crate::kind::ComponentKind;
use crate::name::QName;
use crate::value::Value;

/// A named modifier attached to a property.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: QName,
    pub value: Value,
}

impl Parameter {
    pub fn new(name: QName, value: Value) -> Self {
        Self { name, value }
    }

    /// A parameter with a plain text value.
    pub fn text(name: QName, text: impl Into<String>) -> Self {
        Self::new(name, Value::text(text))
    }
}

/// A named, typed, parameterized value attached to a component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: QName,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub value: Value,
}

impl Property {
    pub fn new(name: QName, value: Value) -> Self {
        Self {
            name,
            parameters: Vec::new(),
            value,
        }
    }

    /// Builder-style parameter append.
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// The first parameter with the given name.
    pub fn parameter(&self, name: &QName) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == *name)
    }

    /// The text of the first parameter with the given name, if it carries
    /// a text value.
    pub fn text_parameter(&self, name: &QName) -> Option<&str> {
        self.parameter(name).and_then(|p| p.value.as_text())
    }
}

/// A structural calendar container.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: QName,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Component {
    /// An empty component.
    pub fn new(name: QName) -> Self {
        Self {
            name,
            properties: Vec::new(),
            components: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// The first property with the given name.
    pub fn property(&self, name: &QName) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == *name)
    }

    /// The identity class of this component.
    pub fn kind(&self) -> ComponentKind {
        ComponentKind::of(&self.name)
    }
}
