//! Name-and-kind convention discovery.

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::convert::member::PropertyConverter;
use crate::core::member::Mappable;
use crate::error::Result;
use crate::rules::{MemberRule, RuleSet};
use crate::strategy::{apply_rules, MapHooks, Strategy};

/// Pairs up members by matching names and convertible kinds.
///
/// For every source member, the target table is scanned for a direct
/// name match or a two-level flattened match (nested source object whose
/// sub-member completes the target name). Each source member claims the
/// first matching target in declaration order; a target claimed by
/// several source members keeps the last. Unmatched target members are
/// left at their defaults.
pub struct ConventionStrategy<S: Mappable, T: Mappable> {
    converter: PropertyConverter,
    rules: OnceCell<RuleSet<S, T>>,
}

impl<S: Mappable, T: Mappable> ConventionStrategy<S, T> {
    pub fn new(converter: PropertyConverter) -> Self {
        ConventionStrategy {
            converter,
            rules: OnceCell::new(),
        }
    }

    fn rules(&self) -> &RuleSet<S, T> {
        self.rules.get_or_init(|| {
            let mut set = RuleSet::new();
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
            debug!(
                source = S::NAME,
                target = T::NAME,
                rules = set.len(),
                "convention discovery complete"
            );
            set
        })
    }
}

impl<S: Mappable, T: Mappable> Strategy<S, T> for ConventionStrategy<S, T> {
    fn name(&self) -> &'static str {
        "convention"
    }

    fn map_into(&self, source: &S, target: &mut T, hooks: &MapHooks) -> Result<()> {
        apply_rules(self.name(), self.rules(), source, target, hooks)
    }

    fn rule_count(&self) -> usize {
        self.rules().len()
    }
}
