//! The composite mapper: an ordered strategy pipeline for one type pair.

use std::sync::Arc;

use tracing::debug;

use crate::core::member::{Mappable, StructValue};
use crate::core::traits::DynMapper;
use crate::error::{MapError, Result};
use crate::rules::MapAction;
use crate::strategy::{ManualStrategy, MapHooks, Strategy};

/// Maps `S` into `T` by running an ordered list of strategies.
///
/// Strategies run in registration order against the same target, so a
/// later strategy overwrites members an earlier one already set: the last
/// strategy to claim a member wins. The pipeline is fixed at
/// construction; only the manual strategy, when present, accepts new
/// rules afterwards.
pub struct CompositeMapper<S: Mappable, T: Mappable> {
    strategies: Vec<Arc<dyn Strategy<S, T>>>,
    manual: Option<Arc<ManualStrategy<S, T>>>,
}

impl<S: Mappable, T: Mappable> CompositeMapper<S, T> {
    /// Build a mapper from an ordered strategy list.
    ///
    /// `manual`, when supplied, must also appear in `strategies` at the
    /// position the caller wants it to run; it is kept separately so
    /// rules can be registered later through [`add_action`](Self::add_action).
    pub fn new(
        strategies: Vec<Arc<dyn Strategy<S, T>>>,
        manual: Option<Arc<ManualStrategy<S, T>>>,
    ) -> Result<Arc<Self>> {
        if strategies.is_empty() {
            return Err(MapError::InvalidArgument(format!(
                "mapper {} -> {} needs at least one strategy",
                S::NAME,
                T::NAME
            )));
        }
        Ok(Arc::new(CompositeMapper { strategies, manual }))
    }

    /// Map into a freshly constructed target.
    pub fn map(&self, source: &S) -> Result<T> {
        let mut target = T::default();
        self.map_into(source, &mut target)?;
        Ok(target)
    }

    /// Map into an existing target; members no strategy claims keep their
    /// current values.
    pub fn map_into(&self, source: &S, target: &mut T) -> Result<()> {
        self.map_with(source, target, &MapHooks::new())
    }

    /// Map with per-member hooks.
    pub fn map_with(&self, source: &S, target: &mut T, hooks: &MapHooks) -> Result<()> {
        for strategy in &self.strategies {
            strategy.map_into(source, target, hooks)?;
        }
        debug!(
            source = S::NAME,
            target = T::NAME,
            strategies = self.strategies.len(),
            "mapping complete"
        );
        Ok(())
    }

    /// Map a stream of sources lazily.
    ///
    /// Nothing is mapped until the returned iterator is advanced; each
    /// item is mapped on demand.
    pub fn map_all<'a, I>(&'a self, sources: I) -> impl Iterator<Item = Result<T>> + 'a
    where
        I: IntoIterator<Item = &'a S>,
        I::IntoIter: 'a,
    {
        sources.into_iter().map(move |source| self.map(source))
    }

    /// Map on a blocking worker thread.
    ///
    /// Discovery and rule execution are CPU-bound, so the work is moved
    /// off the async executor.
    pub async fn map_async(self: Arc<Self>, source: S) -> Result<T> {
        tokio::task::spawn_blocking(move || self.map(&source)).await?
    }

    /// Register a delegate transfer function on the manual strategy.
    ///
    /// Fails when the pipeline was built without a manual strategy.
    pub fn add_action(
        &self,
        source_member: &str,
        target_member: &str,
        action: MapAction<S, T>,
    ) -> Result<()> {
        match &self.manual {
            Some(manual) => manual.add_action(source_member, target_member, action),
            None => Err(MapError::InvalidArgument(format!(
                "mapper {} -> {} has no manual strategy",
                S::NAME,
                T::NAME
            ))),
        }
    }

    /// Strategy names in execution order.
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Total rules across all strategies (triggers pending discovery).
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.strategies.iter().map(|s| s.rule_count()).sum()
    }
}

impl<S: Mappable, T: Mappable> DynMapper for CompositeMapper<S, T> {
    fn source_token(&self) -> crate::core::member::TypeToken {
        S::token()
    }

    fn target_token(&self) -> crate::core::member::TypeToken {
        T::token()
    }

    fn map_struct(&self, source: &dyn StructValue) -> Result<Box<dyn StructValue>> {
        let source = source
            .as_any()
            .downcast_ref::<S>()
            .ok_or_else(|| MapError::TypeMismatch {
                expected: S::NAME,
                actual: source.token().name(),
            })?;
        Ok(Box::new(self.map(source)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{PropertyConverter, ValueConverter};
    use crate::fixtures::{FlatPerson, Person};
    use crate::strategy::ConventionStrategy;

    fn mapper() -> Arc<CompositeMapper<Person, FlatPerson>> {
        let convention: Arc<dyn Strategy<Person, FlatPerson>> = Arc::new(
            ConventionStrategy::new(PropertyConverter::new(ValueConverter::new())),
        );
        let manual = Arc::new(ManualStrategy::new());
        let strategies: Vec<Arc<dyn Strategy<Person, FlatPerson>>> =
            vec![convention, manual.clone()];
        CompositeMapper::new(strategies, Some(manual)).unwrap()
    }

    #[test]
    fn test_empty_pipeline_rejected() {
        let err = match CompositeMapper::<Person, FlatPerson>::new(Vec::new(), None) {
            Err(e) => e,
            Ok(_) => panic!("empty pipeline accepted"),
        };
        assert!(matches!(err, MapError::InvalidArgument(_)));
    }

    #[test]
    fn test_later_strategy_overwrites() {
        let m = mapper();
        m.add_action(
            "name",
            "name",
            Box::new(|p: &Person, f: &mut FlatPerson| {
                f.name = p.name.to_uppercase();
                Ok(())
            }),
        )
        .unwrap();

        let person = Person::sample();
        let flat = m.map(&person).unwrap();
        assert_eq!(flat.name, person.name.to_uppercase());
        // Members the manual strategy left alone keep the convention value.
        assert_eq!(flat.age, person.age);
    }

    #[test]
    fn test_map_all_is_lazy() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let m = mapper();
        let mapped = Arc::new(AtomicUsize::new(0));
        let counter = mapped.clone();
        m.add_action(
            "name",
            "name",
            Box::new(move |p: &Person, f: &mut FlatPerson| {
                counter.fetch_add(1, Ordering::SeqCst);
                f.name = p.name.clone();
                Ok(())
            }),
        )
        .unwrap();

        let people = vec![Person::sample(), Person::default(), Person::sample()];
        let mut iter = m.map_all(&people);

        // Nothing mapped until the iterator is advanced; then exactly the
        // consumed prefix.
        assert_eq!(mapped.load(Ordering::SeqCst), 0);
        let first = iter.next().unwrap().unwrap();
        assert_eq!(first.name, people[0].name);
        assert_eq!(mapped.load(Ordering::SeqCst), 1);

        assert_eq!(iter.count(), 2);
        assert_eq!(mapped.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_strategy_names_in_order() {
        let m = mapper();
        assert_eq!(m.strategy_names(), vec!["convention", "manual"]);
    }

    #[test]
    fn test_dyn_mapper_rejects_wrong_type() {
        let m = mapper();
        let wrong = FlatPerson::default();
        let err = match m.map_struct(&wrong) {
            Err(e) => e,
            Ok(_) => panic!("wrong source type accepted"),
        };
        assert!(matches!(err, MapError::TypeMismatch { .. }));
    }

    #[tokio::test]
    async fn test_map_async() {
        let m = mapper();
        let person = Person::sample();
        let flat = m.clone().map_async(person.clone()).await.unwrap();
        assert_eq!(flat.name, person.name);
    }
}
