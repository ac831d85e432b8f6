//! Value and member conversion.
//!
//! [`ValueConverter`] handles leaf scalar/sequence conversions and
//! registered nested-object delegation; [`PropertyConverter`] layers
//! name-driven member matching (direct and flattened) on top of it.

pub mod member;
pub mod value;

pub use member::{MatchPath, PropertyConverter};
pub use value::ValueConverter;
