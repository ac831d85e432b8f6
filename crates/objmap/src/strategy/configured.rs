//! Discovery from an external configuration source.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::config::MappingConfigSource;
use crate::convert::member::PropertyConverter;
use crate::core::member::Mappable;
use crate::error::Result;
use crate::rules::{MemberRule, RuleSet};
use crate::strategy::{apply_rules, MapHooks, Strategy};

/// Pairs up members from configured `source -> target` member pairs.
///
/// The configuration source is consulted once, on first use, for the
/// section matching this type pair. Pairs naming members that do not
/// exist are logged and skipped; resolved pairs are strict.
pub struct ConfiguredStrategy<S: Mappable, T: Mappable> {
    config: Arc<dyn MappingConfigSource>,
    converter: PropertyConverter,
    rules: OnceCell<RuleSet<S, T>>,
}

impl<S: Mappable, T: Mappable> ConfiguredStrategy<S, T> {
    pub fn new(config: Arc<dyn MappingConfigSource>, converter: PropertyConverter) -> Self {
        ConfiguredStrategy {
            config,
            converter,
            rules: OnceCell::new(),
        }
    }

    fn rules(&self) -> &RuleSet<S, T> {
        self.rules.get_or_init(|| {
            let mut set = RuleSet::new();
            let pairs = self
                .config
                .member_pairs(S::NAME, T::NAME)
                .unwrap_or_default();
            for pair in &pairs {
                let source = match S::accessor(&pair.source) {
                    Some(a) => a,
                    None => {
                        warn!(
                            source_type = S::NAME,
                            member = %pair.source,
                            "configured pair names unknown source member, skipping"
                        );
                        continue;
                    }
                };
                let target = match T::accessor(&pair.target) {
                    Some(a) => a,
                    None => {
                        warn!(
                            target_type = T::NAME,
                            member = %pair.target,
                            "configured pair names unknown target member, skipping"
                        );
                        continue;
                    }
                };
                set.add(Box::new(MemberRule::new(
                    source,
                    target,
                    true,
                    self.converter.clone(),
                )));
            }
            debug!(
                source = S::NAME,
                target = T::NAME,
                configured = pairs.len(),
                rules = set.len(),
                "configured discovery complete"
            );
            set
        })
    }
}

impl<S: Mappable, T: Mappable> Strategy<S, T> for ConfiguredStrategy<S, T> {
    fn name(&self) -> &'static str {
        "configuration"
    }

    fn map_into(&self, source: &S, target: &mut T, hooks: &MapHooks) -> Result<()> {
        apply_rules(self.name(), self.rules(), source, target, hooks)
    }

    fn rule_count(&self) -> usize {
        self.rules().len()
    }
}
