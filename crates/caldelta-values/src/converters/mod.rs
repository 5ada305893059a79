//! Built-in converters.
//!
//! | Converter | Kinds |
//! |---|---|
//! | [`TextConverter`] | text, enumerated text, caller extensions |
//! | [`ListConverter`] | text list, categories (splitting), cal-address list |
//! | [`ScalarConverter`] | integer, URI, cal-address, UTC offset, boolean, duration |
//! | [`DateTimeConverter`] | floating date-time, UTC date-time, date-or-date-time |
//! | [`RecurConverter`] | recurrence rule |
//! | [`GeoConverter`], [`AttachConverter`], [`RequestStatusConverter`], [`TriggerConverter`] | structured values |
//! | [`FreeBusyConverter`] | free/busy period list (splitting) |

pub mod list;
pub mod recur;
pub mod scalar;
pub mod structured;
pub mod temporal;
pub mod text;

pub use list::ListConverter;
pub use recur::RecurConverter;
pub use scalar::ScalarConverter;
pub use structured::{
    AttachConverter, FreeBusyConverter, GeoConverter, RequestStatusConverter, TriggerConverter,
};
pub use temporal::DateTimeConverter;
pub use text::TextConverter;
