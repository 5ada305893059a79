//! Entity wrappers.
//!
//! A wrapper is built once per node per diff call and holds everything the
//! merge needs, computed eagerly: the mapped name, the value comparator, the
//! canonical children and, for components, the identity key. Wrappers are
//! immutable after construction.
//!
//! Ordering is total at every level: names first, then kind-specific
//! tiebreaks, then the value, then the children. Two wrappers are equal
//! exactly when they compare equal.

pub mod component;
pub mod parameter;
pub mod property;

pub use component::CompNode;
pub use parameter::ParamNode;
pub use property::PropNode;
