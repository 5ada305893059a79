//! Structural diff engine for calendar trees.
//!
//! Given an old and a new calendar tree, the engine produces a minimal,
//! hierarchical edit script: which components, properties and parameters
//! were added, removed, or changed. Bookkeeping properties are skipped, and
//! repeated siblings such as ATTENDEE or CATEGORIES are matched by value
//! rather than position. Recurring entities are matched by UID and their
//! UTC-normalized RECURRENCE-ID.
//!
//! # Key Types
//!
//! - [`DiffEngine`] — Entry point; holds configuration, converters and the
//!   timezone resolver
//! - [`DiffConfig`] — Skip set and mapped names, loadable from TOML
//! - [`ComponentSelection`] — Root of the returned edit script
//! - [`SiblingSelection`] — Adds, removes and changes among one node's children
//! - [`Entity`] — What the sequence merge needs from a canonical node
//!
//! # Quick Start
//!
//! ```rust
//! use caldelta_diff::DiffEngine;
//! use caldelta_types::{names, Component, Property, Value};
//!
//! let event = |summary: &str| {
//!     Component::new(names::VEVENT)
//!         .with_property(Property::new(names::UID, Value::text("standup-1")))
//!         .with_property(Property::new(names::SUMMARY, Value::text(summary)))
//! };
//! let old = Component::new(names::VCALENDAR).with_component(event("Standup"));
//! let new = Component::new(names::VCALENDAR).with_component(event("Retro"));
//!
//! let engine = DiffEngine::with_defaults();
//! assert!(engine.diff(&old, &old).unwrap().is_none());
//!
//! let selection = engine.diff(&new, &old).unwrap().unwrap();
//! assert_eq!(selection.modifications(), 1);
//! ```

pub mod config;
pub mod engine;
pub mod entity;
pub mod error;
pub mod merge;
pub mod selection;
pub mod sibling;

pub use config::{DiffConfig, SkipSet};
pub use engine::{DiffEngine, DiffEngineBuilder};
pub use entity::{CompNode, ParamNode, PropNode};
pub use error::{DiffError, DiffResult};
pub use merge::{merge, select, Entity, MergeOp};
pub use selection::{
    ComponentSelection, ComponentsSelection, ParameterSelection, ParametersSelection,
    PropertiesSelection, PropertySelection, SiblingSelection,
};
pub use sibling::Canonicalizer;
