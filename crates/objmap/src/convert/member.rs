//! Member-pair compatibility and member-to-member value transfer.

use crate::convert::value::ValueConverter;
use crate::core::member::{Accessor, Mappable, MemberInfo};
use crate::core::value::{Value, ValueKind};
use crate::error::ConvertError;

/// How a member pair was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPath {
    /// Member names are equal and kinds are convertible.
    Direct,
    /// Target name is `<source member><sub member>` against a nested
    /// source object; the value comes from the recorded sub-member.
    Flattened { sub: &'static str },
}

/// Decides whether a member pair is compatible and performs the transfer.
///
/// Matching is name-driven with two-level flattening: source member
/// `inner` with sub-member `name` matches target members spelled either
/// `inner_name` or `innername`. The source is never mutated.
#[derive(Clone, Default)]
pub struct PropertyConverter {
    values: ValueConverter,
}

impl PropertyConverter {
    pub fn new(values: ValueConverter) -> Self {
        PropertyConverter { values }
    }

    /// The value converter used for leaf conversions.
    #[must_use]
    pub fn values(&self) -> &ValueConverter {
        &self.values
    }

    /// Resolve the match path for a member pair, if any.
    ///
    /// Side-effect-free; consistent with [`convert`](Self::convert) in
    /// strict mode for the same pair.
    #[must_use]
    pub fn resolve(&self, source: &MemberInfo, target: &MemberInfo) -> Option<MatchPath> {
        if source.name == target.name && self.values.can_convert(&source.kind, &target.kind) {
            return Some(MatchPath::Direct);
        }

        if let ValueKind::Object(token) = source.kind {
            if let Some(rest) = target.name.strip_prefix(source.name) {
                let rest = rest.strip_prefix('_').unwrap_or(rest);
                if !rest.is_empty() {
                    if let Some(sub) = token.members().iter().find(|m| m.name == rest) {
                        if self.values.can_convert(&sub.kind, &target.kind) {
                            return Some(MatchPath::Flattened { sub: sub.name });
                        }
                    }
                }
            }
        }

        None
    }

    /// Check whether the member pair is compatible.
    #[must_use]
    pub fn can_convert(&self, source: &MemberInfo, target: &MemberInfo) -> bool {
        self.resolve(source, target).is_some()
    }

    /// Transfer one member pair from `source` to `target`.
    ///
    /// With `strict` set, an unmatched pair fails with
    /// [`ConvertError::NoMatch`]; otherwise the pair is silently skipped
    /// (used when probing candidate pairs during discovery).
    pub fn convert<S: Mappable, T: Mappable>(
        &self,
        source: &S,
        source_accessor: &Accessor<S>,
        target: &mut T,
        target_accessor: &Accessor<T>,
        strict: bool,
    ) -> std::result::Result<(), ConvertError> {
        match self.resolve(&source_accessor.info, &target_accessor.info) {
            None if strict => Err(ConvertError::NoMatch {
                source_member: source_accessor.info.name.to_string(),
                target_member: target_accessor.info.name.to_string(),
            }),
            None => Ok(()),
            Some(MatchPath::Direct) => {
                let value = (source_accessor.get)(source);
                let value = self.values.convert(value, &target_accessor.info.kind)?;
                (target_accessor.set)(target, value)
            }
            Some(MatchPath::Flattened { sub }) => {
                match (source_accessor.get)(source) {
                    Value::Object(obj) => {
                        let inner = obj.get_member(sub).ok_or_else(|| {
                            ConvertError::UnknownMember {
                                type_name: obj.token().name().to_string(),
                                member: sub.to_string(),
                            }
                        })?;
                        let value = self.values.convert(inner, &target_accessor.info.kind)?;
                        (target_accessor.set)(target, value)
                    }
                    Value::Null => Err(ConvertError::NullValue {
                        to: target_accessor.info.kind.to_string(),
                    }),
                    other => Err(ConvertError::Mismatch {
                        expected: source_accessor.info.kind.to_string(),
                        actual: other.kind_label(),
                    }),
                }
            }
        }
    }
}
