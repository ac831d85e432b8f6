//! Core value model, member accessor tables and shared traits.

pub mod member;
pub mod traits;
pub mod value;

pub use member::{
    Accessor, Direction, MapDirective, Mappable, MemberInfo, StructValue, TypeToken,
};
pub use traits::{DynMapper, NestedResolver};
pub use value::{MapValue, Value, ValueKind};
