//! # objmap
//!
//! Object-to-object property mapping library.
//!
//! Maps values between struct types without per-pair boilerplate, using:
//!
//! - **Convention discovery** over registered member tables, including
//!   two-level flattening of nested objects
//! - **Declarative directives** binding member pairs across types
//! - **External configuration** of member pairs from YAML
//! - **Manual rules** with caller-supplied transfer functions
//! - **Nested mapping** of object-valued members through explicitly
//!   registered inner pairs
//!
//! Types opt in by registering a static accessor table with the
//! [`mappable!`] macro; nothing is introspected at runtime.
//!
//! ## Example
//!
//! ```rust
//! use objmap::{mappable, MapperRegistry};
//!
//! #[derive(Debug, Default, Clone)]
//! struct Person {
//!     name: String,
//!     age: i64,
//! }
//! mappable! { Person { name: String, age: i64 } }
//!
//! #[derive(Debug, Default, Clone)]
//! struct PersonDto {
//!     name: String,
//!     age: String,
//! }
//! mappable! { PersonDto { name: String, age: String } }
//!
//! fn main() -> objmap::Result<()> {
//!     let registry = MapperRegistry::with_defaults();
//!     let mapper = registry.resolve::<Person, PersonDto>()?;
//!     let dto = mapper.map(&Person { name: "Ada".into(), age: 36 })?;
//!     assert_eq!(dto.name, "Ada");
//!     assert_eq!(dto.age, "36");
//!     Ok(())
//! }
//! ```

pub mod composite;
pub mod config;
pub mod convert;
pub mod core;
pub mod error;
mod macros;
pub mod registry;
pub mod rules;
pub mod strategy;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-exports for convenient access
pub use composite::CompositeMapper;
pub use config::{MappingConfig, MappingConfigSource, MemberPair};
pub use convert::{MatchPath, PropertyConverter, ValueConverter};
pub use crate::core::{
    Accessor, Direction, DynMapper, MapDirective, MapValue, Mappable, MemberInfo, NestedResolver,
    StructValue, TypeToken, Value, ValueKind,
};
pub use error::{ConvertError, MapError, Result, RuleError};
pub use registry::{default_order, default_registry, MapperRegistry, StrategyKind};
pub use rules::{ActionRule, MapAction, MappingRule, MemberRule, NestedRule, RuleSet};
pub use strategy::{
    AssociationStrategy, ConfiguredStrategy, ConventionStrategy, DirectiveStrategy, ManualStrategy,
    MapHooks, MemberContext, MemberDecision, Strategy,
};
