//! Value comparison for caldelta.
//!
//! Calendar values come in many unrelated shapes: single dates, recurrence
//! rules, period lists, geo pairs, addresses. This crate reduces every shape
//! to a [`ValueComparator`], a tagged string sequence with one equality and
//! one ordering, so the diff engine can compare values without knowing what
//! they are.
//!
//! # Key Types
//!
//! - [`ValueComparator`] — Ordered `(ValueTag, String)` sequence
//! - [`ValueConverter`] — Per-kind comparator / normalize / value-only capability
//! - [`ConverterRegistry`] — Kind → converter map with generalization fallback
//!   and layered instance overrides
//!
//! # Quick Start
//!
//! ```rust
//! use caldelta_types::Value;
//! use caldelta_values::ConverterRegistry;
//!
//! let registry = ConverterRegistry::with_defaults();
//! let a = registry.comparator(&Value::text("Lunch")).unwrap();
//! let b = registry.comparator(&Value::text("Dinner")).unwrap();
//! assert!(b < a);
//! ```

pub mod comparator;
pub mod converter;
pub mod converters;
pub mod error;
pub mod registry;

pub use comparator::{ValueComparator, ValueTag};
pub use converter::ValueConverter;
pub use error::{ValueError, ValueResult};
pub use registry::{register_defaults, ConverterRegistry, ENUM_KINDS};
