//! Timezone resolution for caldelta.
//!
//! The diff engine needs exactly one timezone operation: turning a zoned
//! RECURRENCE-ID into a UTC instant so two renditions of the same instance
//! in different zones are recognized as one entity. This crate defines the
//! resolver seam and ships two implementations.
//!
//! # Key Types
//!
//! - [`TimezoneResolver`] — Maps a TZID to a [`ZoneOffsets`] function
//! - [`IanaTimezones`] — Resolver backed by the IANA database (`chrono-tz`)
//! - [`FixedTimezones`] — Resolver over a table of fixed offsets
//! - [`to_utc`] — UTC normalization of a date or date-time value

pub mod error;
pub mod normalize;
pub mod resolver;

pub use error::{TzError, TzResult};
pub use normalize::to_utc;
pub use resolver::{FixedTimezones, IanaTimezones, TimezoneResolver, ZoneOffsets};
