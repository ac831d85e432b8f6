//! Discovery from declarative member directives.

use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::convert::member::PropertyConverter;
use crate::core::member::Mappable;
use crate::error::Result;
use crate::rules::{MemberRule, RuleSet};
use crate::strategy::{apply_rules, MapHooks, Strategy};

/// Pairs up members from [`MapDirective`](crate::core::member::MapDirective)s
/// declared on either type.
///
/// A directive on the source applies when it names the target type and
/// its direction flows forward; a directive on the target applies when it
/// names the source type and its direction flows in reverse. Directives
/// naming members that do not exist on the counterpart are logged and
/// skipped. Resolved pairs are strict: a pair that stops converting fails
/// the mapping instead of being silently dropped.
pub struct DirectiveStrategy<S: Mappable, T: Mappable> {
    converter: PropertyConverter,
    rules: OnceCell<RuleSet<S, T>>,
}

impl<S: Mappable, T: Mappable> DirectiveStrategy<S, T> {
    pub fn new(converter: PropertyConverter) -> Self {
        DirectiveStrategy {
            converter,
            rules: OnceCell::new(),
        }
    }

    fn add_pair(&self, set: &mut RuleSet<S, T>, source_member: &str, target_member: &str) {
        let source = match S::accessor(source_member) {
            Some(a) => a,
            None => {
                warn!(
                    source_type = S::NAME,
                    member = source_member,
                    "directive names unknown source member, skipping"
                );
                return;
            }
        };
        let target = match T::accessor(target_member) {
            Some(a) => a,
            None => {
                warn!(
                    target_type = T::NAME,
                    member = target_member,
                    "directive names unknown target member, skipping"
                );
                return;
            }
        };
        set.add(Box::new(MemberRule::new(
            source,
            target,
            true,
            self.converter.clone(),
        )));
    }

    fn rules(&self) -> &RuleSet<S, T> {
        self.rules.get_or_init(|| {
            let mut set = RuleSet::new();

            // Directives declared on the source, pointing at the target.
            for d in S::directives() {
                if d.target_type == T::NAME && d.direction.maps_forward() {
                    self.add_pair(&mut set, d.member, d.target_member);
                }
            }
            // Directives declared on the target, pointing back at the source.
            for d in T::directives() {
                if d.target_type == S::NAME && d.direction.maps_reverse() {
                    self.add_pair(&mut set, d.target_member, d.member);
                }
            }

            debug!(
                source = S::NAME,
                target = T::NAME,
                rules = set.len(),
                "directive discovery complete"
            );
            set
        })
    }
}

impl<S: Mappable, T: Mappable> Strategy<S, T> for DirectiveStrategy<S, T> {
    fn name(&self) -> &'static str {
        "attribute"
    }

    fn map_into(&self, source: &S, target: &mut T, hooks: &MapHooks) -> Result<()> {
        apply_rules(self.name(), self.rules(), source, target, hooks)
    }

    fn rule_count(&self) -> usize {
        self.rules().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ValueConverter;
    use crate::fixtures::{Person, TaggedRecord};

    #[test]
    fn test_forward_directive_applies() {
        let s: DirectiveStrategy<TaggedRecord, Person> =
            DirectiveStrategy::new(PropertyConverter::new(ValueConverter::new()));
        assert_eq!(s.rule_count(), 1);

        let record = TaggedRecord {
            label: "Ada".to_string(),
            ..TaggedRecord::default()
        };
        let mut person = Person::default();
        s.map_into(&record, &mut person, &MapHooks::new()).unwrap();
        assert_eq!(person.name, "Ada");
    }

    #[test]
    fn test_reverse_directive_applies() {
        // The directive lives on TaggedRecord but also binds the reverse
        // pair, so mapping Person -> TaggedRecord picks it up.
        let s: DirectiveStrategy<Person, TaggedRecord> =
            DirectiveStrategy::new(PropertyConverter::new(ValueConverter::new()));
        assert_eq!(s.rule_count(), 1);

        let person = Person::sample();
        let mut record = TaggedRecord::default();
        s.map_into(&person, &mut record, &MapHooks::new()).unwrap();
        assert_eq!(record.label, person.name);
    }
}
