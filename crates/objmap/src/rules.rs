//! Resolved mapping rules and the per-pair rule set.

use std::sync::Arc;

use crate::convert::member::PropertyConverter;
use crate::core::member::{Accessor, Mappable};
use crate::core::traits::DynMapper;
use crate::core::value::Value;
use crate::error::{ConvertError, RuleError};

/// One resolved mapping rule for a `(source, target)` type pair.
///
/// Identifies the member pair and performs the transfer for it. Member
/// names are fixed at construction.
pub trait MappingRule<S, T>: Send + Sync {
    fn source_member(&self) -> &str;

    fn target_member(&self) -> &str;

    /// Perform the transfer for this one member pair.
    fn apply(&self, source: &S, target: &mut T) -> std::result::Result<(), RuleError>;
}

/// Caller-supplied transfer function for an [`ActionRule`].
pub type MapAction<S, T> =
    Box<dyn Fn(&S, &mut T) -> std::result::Result<(), RuleError> + Send + Sync>;

/// Delegate rule wrapping a caller-supplied transfer function.
pub struct ActionRule<S, T> {
    source_member: String,
    target_member: String,
    action: MapAction<S, T>,
}

impl<S, T> ActionRule<S, T> {
    pub fn new(
        source_member: impl Into<String>,
        target_member: impl Into<String>,
        action: MapAction<S, T>,
    ) -> Self {
        ActionRule {
            source_member: source_member.into(),
            target_member: target_member.into(),
            action,
        }
    }
}

impl<S: Send + Sync, T: Send + Sync> MappingRule<S, T> for ActionRule<S, T> {
    fn source_member(&self) -> &str {
        &self.source_member
    }

    fn target_member(&self) -> &str {
        &self.target_member
    }

    fn apply(&self, source: &S, target: &mut T) -> std::result::Result<(), RuleError> {
        (self.action)(source, target)
    }
}

/// Reflective rule over a pair of member accessors.
///
/// Non-strict rules come from convention discovery and re-run the
/// name-driven match at apply time (direct or flattened), skipping
/// silently when the pair no longer matches. Strict rules bind an
/// explicit pair (directive or configured): member names play no further
/// role, the source value is converted straight into the target kind and
/// any failure surfaces.
pub struct MemberRule<S: Mappable, T: Mappable> {
    source: &'static Accessor<S>,
    target: &'static Accessor<T>,
    strict: bool,
    converter: PropertyConverter,
}

impl<S: Mappable, T: Mappable> MemberRule<S, T> {
    pub fn new(
        source: &'static Accessor<S>,
        target: &'static Accessor<T>,
        strict: bool,
        converter: PropertyConverter,
    ) -> Self {
        MemberRule {
            source,
            target,
            strict,
            converter,
        }
    }
}

impl<S: Mappable, T: Mappable> MappingRule<S, T> for MemberRule<S, T> {
    fn source_member(&self) -> &str {
        self.source.info.name
    }

    fn target_member(&self) -> &str {
        self.target.info.name
    }

    fn apply(&self, source: &S, target: &mut T) -> std::result::Result<(), RuleError> {
        if self.strict {
            let value = (self.source.get)(source);
            let value = self
                .converter
                .values()
                .convert(value, &self.target.info.kind)
                .map_err(RuleError::from)?;
            (self.target.set)(target, value).map_err(RuleError::from)
        } else {
            self.converter
                .convert(source, self.source, target, self.target, false)
                .map_err(RuleError::from)
        }
    }
}

/// Mapper-delegating rule for nested object members.
///
/// Reads the source member, maps it through the inner mapper and writes
/// the result to the target member. The inner mapper is a borrowed handle
/// whose lifetime belongs to the registry cache entry that produced it.
pub struct NestedRule<S: Mappable, T: Mappable> {
    source: &'static Accessor<S>,
    target: &'static Accessor<T>,
    inner: Arc<dyn DynMapper>,
}

impl<S: Mappable, T: Mappable> NestedRule<S, T> {
    pub fn new(
        source: &'static Accessor<S>,
        target: &'static Accessor<T>,
        inner: Arc<dyn DynMapper>,
    ) -> Self {
        NestedRule {
            source,
            target,
            inner,
        }
    }
}

impl<S: Mappable, T: Mappable> MappingRule<S, T> for NestedRule<S, T> {
    fn source_member(&self) -> &str {
        self.source.info.name
    }

    fn target_member(&self) -> &str {
        self.target.info.name
    }

    fn apply(&self, source: &S, target: &mut T) -> std::result::Result<(), RuleError> {
        match (self.source.get)(source) {
            Value::Object(obj) => {
                let mapped = self.inner.map_struct(&*obj).map_err(RuleError::from)?;
                (self.target.set)(target, Value::Object(mapped)).map_err(RuleError::from)
            }
            // Unset optional nested member: leave the target at its default.
            Value::Null => Ok(()),
            other => Err(RuleError::from(ConvertError::Mismatch {
                expected: self.source.info.kind.to_string(),
                actual: other.kind_label(),
            })),
        }
    }
}

/// Ordered, deduplicated rule collection for one type pair.
///
/// Keyed by target member: adding a rule for an already-present target
/// member replaces the earlier rule in place (last added wins, position
/// preserved). Rules are never removed individually; a mapper regenerates
/// the whole set instead.
pub struct RuleSet<S, T> {
    rules: Vec<Box<dyn MappingRule<S, T>>>,
}

impl<S, T> RuleSet<S, T> {
    pub fn new() -> Self {
        RuleSet { rules: Vec::new() }
    }

    /// Add a rule, overwriting any existing rule for the same target
    /// member.
    pub fn add(&mut self, rule: Box<dyn MappingRule<S, T>>) {
        match self
            .rules
            .iter_mut()
            .find(|existing| existing.target_member() == rule.target_member())
        {
            Some(slot) => *slot = rule,
            None => self.rules.push(rule),
        }
    }

    /// Current rules in insertion order (post-overwrite).
    pub fn iter(&self) -> impl Iterator<Item = &dyn MappingRule<S, T>> {
        self.rules.iter().map(AsRef::as_ref)
    }

    /// Look up the active rule for a target member.
    #[must_use]
    pub fn get(&self, target_member: &str) -> Option<&dyn MappingRule<S, T>> {
        self.rules
            .iter()
            .find(|r| r.target_member() == target_member)
            .map(AsRef::as_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<S, T> Default for RuleSet<S, T> {
    fn default() -> Self {
        Self::new()
    }
}
