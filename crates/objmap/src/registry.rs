//! Mapper construction, caching and nested-pair registration.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, Weak};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::composite::CompositeMapper;
use crate::config::MappingConfigSource;
use crate::convert::{PropertyConverter, ValueConverter};
use crate::core::member::{Mappable, TypeToken};
use crate::core::traits::{DynMapper, NestedResolver};
use crate::error::{MapError, Result};
use crate::strategy::{
    AssociationStrategy, ConfiguredStrategy, ConventionStrategy, DirectiveStrategy,
    ManualStrategy, Strategy,
};

/// Strategy selector used in registry orders and configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Convention,
    Attribute,
    Configuration,
    Manual,
    Association,
}

/// Default strategy order: convention first, explicit sources override it,
/// manual rules have the last word. Association is opt-in.
pub fn default_order() -> Vec<StrategyKind> {
    vec![
        StrategyKind::Convention,
        StrategyKind::Attribute,
        StrategyKind::Configuration,
        StrategyKind::Manual,
    ]
}

type PairKey = (TypeId, TypeId);

struct CacheEntry {
    typed: Arc<dyn Any + Send + Sync>,
    dynamic: Arc<dyn DynMapper>,
}

type NestedBuilder = Box<dyn Fn(&Arc<MapperRegistry>) -> Result<Arc<dyn DynMapper>> + Send + Sync>;

/// Builds composite mappers on demand and caches one per type pair.
///
/// The registry is explicit shared state: callers hold an `Arc` and pass
/// it where mapping happens. [`default_registry`] offers a process-wide
/// instance for applications that want one, but nothing in the crate
/// requires it.
pub struct MapperRegistry {
    order: Vec<StrategyKind>,
    config: Option<Arc<dyn MappingConfigSource>>,
    cache: RwLock<HashMap<PairKey, CacheEntry>>,
    nested: RwLock<HashMap<PairKey, NestedBuilder>>,
    weak: Weak<MapperRegistry>,
}

impl MapperRegistry {
    /// Registry with an explicit strategy order and optional configuration
    /// source.
    pub fn new(
        order: Vec<StrategyKind>,
        config: Option<Arc<dyn MappingConfigSource>>,
    ) -> Result<Arc<Self>> {
        if order.is_empty() {
            return Err(MapError::InvalidArgument(
                "strategy order must name at least one strategy".to_string(),
            ));
        }
        Ok(Arc::new_cyclic(|weak| MapperRegistry {
            order,
            config,
            cache: RwLock::new(HashMap::new()),
            nested: RwLock::new(HashMap::new()),
            weak: weak.clone(),
        }))
    }

    /// Registry with the default order and no configuration source.
    pub fn with_defaults() -> Arc<Self> {
        Arc::new_cyclic(|weak| MapperRegistry {
            order: default_order(),
            config: None,
            cache: RwLock::new(HashMap::new()),
            nested: RwLock::new(HashMap::new()),
            weak: weak.clone(),
        })
    }

    /// The mapper for a type pair, built and cached on first request.
    ///
    /// Concurrent first requests may build twice; the first entry to land
    /// in the cache wins and the loser is dropped.
    pub fn resolve<S: Mappable, T: Mappable>(&self) -> Result<Arc<CompositeMapper<S, T>>> {
        let key = (TypeId::of::<S>(), TypeId::of::<T>());

        {
            let cache = self.cache.read().unwrap_or_else(|e| e.into_inner());
            if let Some(entry) = cache.get(&key) {
                return Self::downcast_entry(entry);
            }
        }

        let mapper = self.build_mapper::<S, T>()?;
        debug!(source = S::NAME, target = T::NAME, "built mapper");

        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = cache.get(&key) {
            return Self::downcast_entry(existing);
        }
        cache.insert(
            key,
            CacheEntry {
                typed: mapper.clone(),
                dynamic: mapper.clone(),
            },
        );
        Ok(mapper)
    }

    /// Install a pre-built mapper for its type pair, replacing any cached
    /// one.
    pub fn add_mapper<S: Mappable, T: Mappable>(&self, mapper: Arc<CompositeMapper<S, T>>) {
        let key = (TypeId::of::<S>(), TypeId::of::<T>());
        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        cache.insert(
            key,
            CacheEntry {
                typed: mapper.clone(),
                dynamic: mapper,
            },
        );
    }

    /// Declare `M -> N` nested-mappable.
    ///
    /// Object-kinded members of these inner types will be mapped through
    /// the pair's own registered mapper. Nothing is built until a mapping
    /// first needs the pair.
    pub fn register_nested<M: Mappable, N: Mappable>(&self) {
        let key = (TypeId::of::<M>(), TypeId::of::<N>());
        let builder: NestedBuilder = Box::new(|registry| {
            registry
                .resolve::<M, N>()
                .map(|mapper| mapper as Arc<dyn DynMapper>)
        });
        let mut nested = self.nested.write().unwrap_or_else(|e| e.into_inner());
        nested.insert(key, builder);
        debug!(source = M::NAME, target = N::NAME, "registered nested pair");
    }

    /// Drop all cached mappers. Nested-pair registrations are kept; the
    /// next resolve rebuilds from scratch.
    pub fn clear(&self) {
        self.cache
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    /// Number of cached mappers.
    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.cache.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn downcast_entry<S: Mappable, T: Mappable>(
        entry: &CacheEntry,
    ) -> Result<Arc<CompositeMapper<S, T>>> {
        entry
            .typed
            .clone()
            .downcast::<CompositeMapper<S, T>>()
            .map_err(|_| MapError::TypeMismatch {
                expected: "cached mapper for this pair",
                actual: "mapper of another pair",
            })
    }

    fn build_mapper<S: Mappable, T: Mappable>(&self) -> Result<Arc<CompositeMapper<S, T>>> {
        let resolver: Arc<dyn NestedResolver> = Arc::new(RegistryResolver {
            registry: self.weak.clone(),
        });
        let converter = PropertyConverter::new(ValueConverter::with_resolver(resolver.clone()));

        let mut strategies: Vec<Arc<dyn Strategy<S, T>>> = Vec::with_capacity(self.order.len());
        let mut manual: Option<Arc<ManualStrategy<S, T>>> = None;

        for kind in &self.order {
            match kind {
                StrategyKind::Convention => {
                    strategies.push(Arc::new(ConventionStrategy::new(converter.clone())));
                }
                StrategyKind::Attribute => {
                    strategies.push(Arc::new(DirectiveStrategy::new(converter.clone())));
                }
                StrategyKind::Configuration => match &self.config {
                    Some(config) => {
                        strategies.push(Arc::new(ConfiguredStrategy::new(
                            config.clone(),
                            converter.clone(),
                        )));
                    }
                    None => {
                        debug!(
                            source = S::NAME,
                            target = T::NAME,
                            "no configuration source, skipping configuration strategy"
                        );
                    }
                },
                StrategyKind::Manual => {
                    let strategy = Arc::new(ManualStrategy::new());
                    manual = Some(strategy.clone());
                    strategies.push(strategy);
                }
                StrategyKind::Association => {
                    strategies.push(Arc::new(AssociationStrategy::new(
                        converter.clone(),
                        resolver.clone(),
                    )));
                }
            }
        }

        CompositeMapper::new(strategies, manual)
    }
}

/// [`NestedResolver`] backed by a registry.
///
/// Holds a weak reference so cached mappers do not keep their registry
/// alive through the resolver they embed.
struct RegistryResolver {
    registry: Weak<MapperRegistry>,
}

impl NestedResolver for RegistryResolver {
    fn can_map(&self, source: TypeToken, target: TypeToken) -> bool {
        let registry = match self.registry.upgrade() {
            Some(r) => r,
            None => return false,
        };
        let key = (source.type_id(), target.type_id());
        registry
            .nested
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(&key)
            || registry
                .cache
                .read()
                .unwrap_or_else(|e| e.into_inner())
                .contains_key(&key)
    }

    fn resolve(&self, source: TypeToken, target: TypeToken) -> Option<Arc<dyn DynMapper>> {
        let registry = self.registry.upgrade()?;
        let key = (source.type_id(), target.type_id());

        // A mapper already seeded in the cache counts as registered.
        {
            let cache = registry.cache.read().unwrap_or_else(|e| e.into_inner());
            if let Some(entry) = cache.get(&key) {
                return Some(entry.dynamic.clone());
            }
        }

        let nested = registry.nested.read().unwrap_or_else(|e| e.into_inner());
        let builder = nested.get(&key)?;
        match builder(&registry) {
            Ok(mapper) => Some(mapper),
            Err(e) => {
                warn!(
                    source = source.name(),
                    target = target.name(),
                    error = %e,
                    "failed to build nested mapper"
                );
                None
            }
        }
    }
}

/// Process-wide registry with the default strategy order.
///
/// A convenience for applications that want one shared instance; library
/// code should take a registry explicitly.
pub fn default_registry() -> Arc<MapperRegistry> {
    static DEFAULT: Lazy<Arc<MapperRegistry>> = Lazy::new(MapperRegistry::with_defaults);
    DEFAULT.clone()
}
