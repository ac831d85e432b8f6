//! Caller-registered delegate rules.

use std::sync::RwLock;

use crate::core::member::Mappable;
use crate::error::{MapError, Result};
use crate::rules::{ActionRule, MapAction, MappingRule, RuleSet};
use crate::strategy::{apply_rules, MapHooks, Strategy};

/// Holds rules registered explicitly by the caller.
///
/// Unlike the discovery strategies there is nothing to discover: the set
/// starts empty and grows as rules are added, including after the mapper
/// has been used. Adding a rule for an already-covered target member
/// replaces the earlier rule.
pub struct ManualStrategy<S: Mappable, T: Mappable> {
    rules: RwLock<RuleSet<S, T>>,
}

impl<S: Mappable, T: Mappable> ManualStrategy<S, T> {
    pub fn new() -> Self {
        ManualStrategy {
            rules: RwLock::new(RuleSet::new()),
        }
    }

    /// Register a rule.
    pub fn add_rule(&self, rule: Box<dyn MappingRule<S, T>>) {
        self.rules
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .add(rule);
    }

    /// Register a delegate transfer function for a member pair.
    ///
    /// Member names identify the rule for overwrite and error context;
    /// they must be non-empty.
    pub fn add_action(
        &self,
        source_member: &str,
        target_member: &str,
        action: MapAction<S, T>,
    ) -> Result<()> {
        if source_member.is_empty() || target_member.is_empty() {
            return Err(MapError::InvalidArgument(
                "action rule member names must be non-empty".to_string(),
            ));
        }
        self.add_rule(Box::new(ActionRule::new(source_member, target_member, action)));
        Ok(())
    }
}

impl<S: Mappable, T: Mappable> Default for ManualStrategy<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Mappable, T: Mappable> Strategy<S, T> for ManualStrategy<S, T> {
    fn name(&self) -> &'static str {
        "manual"
    }

    fn map_into(&self, source: &S, target: &mut T, hooks: &MapHooks) -> Result<()> {
        let rules = self.rules.read().unwrap_or_else(|e| e.into_inner());
        apply_rules(self.name(), &rules, source, target, hooks)
    }

    fn rule_count(&self) -> usize {
        self.rules.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}
