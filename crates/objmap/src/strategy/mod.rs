//! Discovery strategies and rule execution.
//!
//! Each strategy module implements one rule-finding policy over a fixed
//! `(source, target)` type pair:
//!
//! - [`convention`]: name/type compatible member pairs
//! - [`directive`]: declarative annotations on either side of the pair
//! - [`configured`]: member pairs from external configuration
//! - [`manual`]: delegate rules registered by the caller
//! - [`association`]: convention extended with nested-object mappers
//!
//! Strategies discover their rule set lazily on first use and memoize it;
//! the shared [`apply_rules`] engine executes a set with per-member hooks
//! and uniform error wrapping.

pub mod association;
pub mod configured;
pub mod convention;
pub mod directive;
pub mod manual;

pub use association::AssociationStrategy;
pub use configured::ConfiguredStrategy;
pub use convention::ConventionStrategy;
pub use directive::DirectiveStrategy;
pub use manual::ManualStrategy;

use tracing::trace;

use crate::core::member::Mappable;
use crate::error::{MapError, Result};
use crate::rules::RuleSet;

/// Per-member decision returned by the pre-mapping hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberDecision {
    Proceed,
    /// Skip this member's rule; the rest of the mapping continues.
    Skip,
}

/// Identifies the member pair a hook is being consulted about.
#[derive(Debug, Clone, Copy)]
pub struct MemberContext<'a> {
    pub source_type: &'static str,
    pub target_type: &'static str,
    pub source_member: &'a str,
    pub target_member: &'a str,
}

type BeforeFn = dyn Fn(&MemberContext<'_>) -> MemberDecision + Send + Sync;
type AfterFn = dyn Fn(&MemberContext<'_>) + Send + Sync;

/// Per-member callbacks passed into a mapping call.
///
/// The pre-member hook may skip individual rules; the post-member hook is
/// notified after each successfully applied rule. Hooks are part of the
/// call, not ambient subscriber state.
#[derive(Default)]
pub struct MapHooks {
    before: Option<Box<BeforeFn>>,
    after: Option<Box<AfterFn>>,
}

impl MapHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consult `f` before each member rule; returning
    /// [`MemberDecision::Skip`] skips that rule.
    #[must_use]
    pub fn on_before(
        mut self,
        f: impl Fn(&MemberContext<'_>) -> MemberDecision + Send + Sync + 'static,
    ) -> Self {
        self.before = Some(Box::new(f));
        self
    }

    /// Notify `f` after each successfully applied member rule.
    #[must_use]
    pub fn on_after(mut self, f: impl Fn(&MemberContext<'_>) + Send + Sync + 'static) -> Self {
        self.after = Some(Box::new(f));
        self
    }

    fn before(&self, ctx: &MemberContext<'_>) -> MemberDecision {
        match &self.before {
            Some(f) => f(ctx),
            None => MemberDecision::Proceed,
        }
    }

    fn after(&self, ctx: &MemberContext<'_>) {
        if let Some(f) = &self.after {
            f(ctx);
        }
    }
}

/// One discovery+execution unit implementing a single rule-finding policy.
pub trait Strategy<S: Mappable, T: Mappable>: Send + Sync {
    /// Strategy identifier for diagnostics.
    fn name(&self) -> &'static str;

    /// Execute this strategy's rules against the pair.
    fn map_into(&self, source: &S, target: &mut T, hooks: &MapHooks) -> Result<()>;

    /// Number of discovered rules (triggers discovery if pending).
    fn rule_count(&self) -> usize;
}

/// Execute a rule set in order, wrapping any failure with full pair
/// context and aborting the remaining rules.
pub(crate) fn apply_rules<S: Mappable, T: Mappable>(
    strategy: &str,
    rules: &RuleSet<S, T>,
    source: &S,
    target: &mut T,
    hooks: &MapHooks,
) -> Result<()> {
    for rule in rules.iter() {
        let ctx = MemberContext {
            source_type: S::NAME,
            target_type: T::NAME,
            source_member: rule.source_member(),
            target_member: rule.target_member(),
        };

        if hooks.before(&ctx) == MemberDecision::Skip {
            trace!(
                strategy,
                source_member = ctx.source_member,
                target_member = ctx.target_member,
                "member rule skipped by hook"
            );
            continue;
        }

        rule.apply(source, target).map_err(|cause| {
            MapError::member(
                S::NAME,
                T::NAME,
                rule.source_member(),
                rule.target_member(),
                cause,
            )
        })?;

        trace!(
            strategy,
            source_member = ctx.source_member,
            target_member = ctx.target_member,
            "member rule applied"
        );
        hooks.after(&ctx);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{FlatPerson, Person};
    use crate::rules::ActionRule;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn failing_set() -> RuleSet<Person, FlatPerson> {
        let mut set = RuleSet::new();
        set.add(Box::new(ActionRule::new(
            "name",
            "name",
            Box::new(|s: &Person, t: &mut FlatPerson| {
                t.name = s.name.clone();
                Ok(())
            }),
        )));
        set.add(Box::new(ActionRule::new(
            "age",
            "age",
            Box::new(|_: &Person, _: &mut FlatPerson| Err("boom".into())),
        )));
        set
    }

    #[test]
    fn test_failure_wrapped_and_earlier_effects_kept() {
        let set = failing_set();
        let person = Person::sample();
        let mut flat = FlatPerson::default();
        let err = apply_rules("manual", &set, &person, &mut flat, &MapHooks::new()).unwrap_err();

        match err {
            MapError::Member {
                source_type,
                target_type,
                source_member,
                target_member,
                cause,
            } => {
                assert_eq!(source_type, "Person");
                assert_eq!(target_type, "FlatPerson");
                assert_eq!(source_member, "age");
                assert_eq!(target_member, "age");
                assert_eq!(cause.to_string(), "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
        // No rollback: the rule before the failing one already ran.
        assert_eq!(flat.name, person.name);
    }

    #[test]
    fn test_hook_skip_and_notify() {
        let set = failing_set();
        let person = Person::sample();
        let mut flat = FlatPerson::default();

        let applied = Arc::new(AtomicUsize::new(0));
        let counter = applied.clone();
        let hooks = MapHooks::new()
            .on_before(|ctx| {
                if ctx.target_member == "age" {
                    MemberDecision::Skip
                } else {
                    MemberDecision::Proceed
                }
            })
            .on_after(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        // Skipping the failing rule makes the call succeed.
        apply_rules("manual", &set, &person, &mut flat, &hooks).unwrap();
        assert_eq!(applied.load(Ordering::SeqCst), 1);
        assert_eq!(flat.name, person.name);
        assert_eq!(flat.age, 0);
    }
}
