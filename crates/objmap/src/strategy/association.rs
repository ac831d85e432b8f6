//! Convention discovery extended with nested-object delegation.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::convert::member::PropertyConverter;
use crate::core::member::Mappable;
use crate::core::traits::NestedResolver;
use crate::core::value::ValueKind;
use crate::error::Result;
use crate::rules::{MemberRule, NestedRule, RuleSet};
use crate::strategy::{apply_rules, MapHooks, Strategy};

/// Convention discovery that prefers mapper-delegating rules for nested
/// objects.
///
/// Discovery runs the full name-and-kind convention pass first, then
/// replaces the rule for each same-named object member pair with a
/// [`NestedRule`] where a nested mapper for the inner types resolves.
/// Unregistered object pairs keep whatever convention found (usually
/// nothing), never inferred.
pub struct AssociationStrategy<S: Mappable, T: Mappable> {
    converter: PropertyConverter,
    resolver: Arc<dyn NestedResolver>,
    rules: OnceCell<RuleSet<S, T>>,
}

impl<S: Mappable, T: Mappable> AssociationStrategy<S, T> {
    pub fn new(converter: PropertyConverter, resolver: Arc<dyn NestedResolver>) -> Self {
        AssociationStrategy {
            converter,
            resolver,
            rules: OnceCell::new(),
        }
    }

    fn rules(&self) -> &RuleSet<S, T> {
        self.rules.get_or_init(|| {
            let mut set = RuleSet::new();

            // Convention pass.
            for source in S::accessors() {
                let matched = T::accessors()
                    .iter()
                    .find(|target| self.converter.can_convert(&source.info, &target.info));
                if let Some(target) = matched {
                    set.add(Box::new(MemberRule::new(
                        source,
                        target,
                        false,
                        self.converter.clone(),
                    )));
                }
            }

            // Nested-delegation pass over same-named object member pairs.
            for source in S::accessors() {
                let source_token = match source.info.kind {
                    ValueKind::Object(token) => token,
                    _ => continue,
                };
                let target = T::accessors().iter().find(|t| {
                    t.info.name == source.info.name
                        && matches!(t.info.kind, ValueKind::Object(_))
                });
                let target = match target {
                    Some(t) => t,
                    None => continue,
                };
                let target_token = match target.info.kind {
                    ValueKind::Object(token) => token,
                    _ => continue,
                };
                if let Some(inner) = self.resolver.resolve(source_token, target_token) {
                    set.add(Box::new(NestedRule::new(source, target, inner)));
                }
            }

            debug!(
                source = S::NAME,
                target = T::NAME,
                rules = set.len(),
                "association discovery complete"
            );
            set
        })
    }
}

impl<S: Mappable, T: Mappable> Strategy<S, T> for AssociationStrategy<S, T> {
    fn name(&self) -> &'static str {
        "association"
    }

    fn map_into(&self, source: &S, target: &mut T, hooks: &MapHooks) -> Result<()> {
        apply_rules(self.name(), self.rules(), source, target, hooks)
    }

    fn rule_count(&self) -> usize {
        self.rules().len()
    }
}
