//! Foundation types for caldelta.
//!
//! This crate provides the calendar tree model consumed by the diff engine.
//! Every other caldelta crate depends on `caldelta-types`.
//!
//! # Key Types
//!
//! - [`QName`] — Namespace-qualified entity name (Clark notation `{ns}local`)
//! - [`Component`] / [`Property`] / [`Parameter`] — The canonical calendar tree
//! - [`Value`] — Closed union of every calendar value shape
//! - [`ValueKind`] — Concrete value kind with its generalization chain
//! - [`ComponentKind`] — Identity class of a component (recurring, alarm, ...)

pub mod error;
pub mod kind;
pub mod name;
pub mod node;
pub mod value;

pub use error::TypeError;
pub use kind::{ComponentKind, ValueKind};
pub use name::{names, QName, ICAL_NS};
pub use node::{Component, Parameter, Property};
pub use value::{
    Attachment, DateOrDateTime, EnumKind, Frequency, Geo, Period, PeriodEnd, Recur,
    RequestStatus, Trigger, Value, Weekday, WeekdayNum,
};
