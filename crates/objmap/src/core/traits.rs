//! Core traits shared by converters, rules and the registry.
//!
//! - [`DynMapper`]: erased single-object mapping entry point, implemented
//!   by composite mappers and borrowed by nested rules
//! - [`NestedResolver`]: decides which type pairs are nested-mappable and
//!   hands out the mapper for a pair

use std::sync::Arc;

use crate::core::member::{StructValue, TypeToken};
use crate::error::Result;

/// Erased single-object mapping entry point.
///
/// Nested rules and the mapper-aware value converter hold one of these as
/// a borrowed handle; its lifetime belongs to the registry cache entry it
/// came from, not to the rule holding it.
pub trait DynMapper: Send + Sync {
    /// Token of the source type this mapper accepts.
    fn source_token(&self) -> TypeToken;

    /// Token of the target type this mapper produces.
    fn target_token(&self) -> TypeToken;

    /// Map one erased source object into a freshly constructed target.
    fn map_struct(&self, source: &dyn StructValue) -> Result<Box<dyn StructValue>>;
}

/// Resolves nested-mappability for object-kinded member pairs.
///
/// A pair is nested-mappable only when explicitly registered (or already
/// seeded in the registry cache) — never inferred. `can_map` is
/// side-effect-free; `resolve` may construct and cache the pair's mapper.
pub trait NestedResolver: Send + Sync {
    /// Check whether the pair is nested-mappable, without constructing
    /// anything.
    fn can_map(&self, source: TypeToken, target: TypeToken) -> bool;

    /// Obtain the mapper for the pair, constructing it on first use.
    fn resolve(&self, source: TypeToken, target: TypeToken) -> Option<Arc<dyn DynMapper>>;
}
