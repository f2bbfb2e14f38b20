//! Decides whether an argument's permission check applies to the values
//! an invocation resolved.

use crate::commands::{
    argument::{ArgumentSpec, PermissionCondition},
    context::SenderRef,
    parser::TypeParserRegistry,
    value::Value,
};

type Target<'v> = (&'v ArgumentSpec, Option<&'v Value>);

pub struct ConditionEvaluator<'a> {
    parsers: &'a TypeParserRegistry,
    sender: &'a SenderRef,
}

impl<'a> ConditionEvaluator<'a> {
    pub fn new(parsers: &'a TypeParserRegistry, sender: &'a SenderRef) -> Self {
        Self { parsers, sender }
    }

    /// `specs` and `values` are parallel. `value` is what `spec` resolved to.
    pub fn applies(
        &self,
        spec: &ArgumentSpec,
        value: Option<&Value>,
        specs: &[ArgumentSpec],
        values: &[Option<Value>],
    ) -> bool {
        let targets = collect_targets(spec, value, specs, values);
        let mut present = targets.iter().copied().filter(|(_, value)| value.is_some());

        match spec.condition {
            PermissionCondition::Always => true,
            PermissionCondition::NotNull | PermissionCondition::Exists => present.next().is_some(),
            PermissionCondition::IsSelf => {
                present.any(|(spec, value)| self.parsers.is_sender(self.sender, spec, value))
            }
            PermissionCondition::Other | PermissionCondition::AnyOther => {
                present.any(|(spec, value)| !self.parsers.is_sender(self.sender, spec, value))
            }
            PermissionCondition::Distinct => self.distinct(&present.collect::<Vec<_>>(), false),
            PermissionCondition::AllDistinct | PermissionCondition::NotEquals => {
                self.distinct(&present.collect::<Vec<_>>(), true)
            }
            PermissionCondition::Equals => self.all_equal(&present.collect::<Vec<_>>()),
        }
    }

    /// With fewer than two targets nothing is distinct. Otherwise `all`
    /// requires every pair to differ, else any differing pair suffices.
    fn distinct(&self, targets: &[Target<'_>], all: bool) -> bool {
        if targets.len() < 2 {
            return false;
        }
        for (i, a) in targets.iter().enumerate() {
            for b in &targets[i + 1..] {
                let equal = self.parsers.are_equal(self.sender, *a, *b);
                if all && equal {
                    return false;
                }
                if !all && !equal {
                    return true;
                }
            }
        }
        all
    }

    fn all_equal(&self, targets: &[Target<'_>]) -> bool {
        let Some((first, rest)) = targets.split_first() else {
            return false;
        };
        !rest.is_empty()
            && rest
                .iter()
                .all(|other| self.parsers.are_equal(self.sender, *first, *other))
    }
}

fn collect_targets<'v>(
    spec: &'v ArgumentSpec,
    value: Option<&'v Value>,
    specs: &'v [ArgumentSpec],
    values: &'v [Option<Value>],
) -> Vec<Target<'v>> {
    if spec.condition_args.is_empty() {
        return vec![(spec, value)];
    }
    spec.condition_args
        .iter()
        .map(|name| match specs.iter().position(|other| other.name == *name) {
            Some(index) => (&specs[index], values.get(index).and_then(Option::as_ref)),
            None => (spec, None),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{
        argument::{CompareMode, ValueType},
        parser::TypeParser,
        value::PlayerRef,
    };

    fn player(id: u128, name: &str) -> Option<Value> {
        Some(Value::Player(PlayerRef::new(Some(id), name)))
    }

    fn check(condition: PermissionCondition, args: &[&str], values: Vec<Option<Value>>) -> bool {
        let parsers = TypeParserRegistry::new();
        let alice = SenderRef::player(1, "Alice");
        let evaluator = ConditionEvaluator::new(&parsers, &alice);
        let guarded = ArgumentSpec::player("from")
            .permission("")
            .condition(condition, args.iter().copied());
        let specs = vec![guarded, ArgumentSpec::player("to")];
        evaluator.applies(&specs[0], values[0].as_ref(), &specs, &values)
    }

    #[test]
    fn always_and_presence() {
        assert!(check(PermissionCondition::Always, &[], vec![None, None]));
        assert!(!check(PermissionCondition::NotNull, &[], vec![None, None]));
        assert!(check(PermissionCondition::Exists, &[], vec![player(2, "Bob"), None]));
        assert!(check(PermissionCondition::NotNull, &["from", "to"], vec![None, player(2, "Bob")]));
    }

    #[test]
    fn self_and_other() {
        assert!(check(PermissionCondition::IsSelf, &[], vec![player(1, "Alice"), None]));
        assert!(!check(PermissionCondition::IsSelf, &[], vec![player(2, "Bob"), None]));
        assert!(check(PermissionCondition::Other, &[], vec![player(2, "Bob"), None]));
        assert!(!check(PermissionCondition::AnyOther, &[], vec![None, None]));
    }

    #[test]
    fn distinct_family() {
        let same = vec![player(2, "Bob"), player(2, "Bob")];
        let differ = vec![player(2, "Bob"), player(3, "Carl")];
        let args = ["from", "to"];

        assert!(!check(PermissionCondition::Distinct, &args, same.clone()));
        assert!(check(PermissionCondition::Distinct, &args, differ.clone()));
        assert!(!check(PermissionCondition::AllDistinct, &args, same.clone()));
        assert!(check(PermissionCondition::NotEquals, &args, differ.clone()));
        assert!(check(PermissionCondition::Equals, &args, same));
        assert!(!check(PermissionCondition::Equals, &args, differ));

        let single = vec![player(2, "Bob"), None];
        assert!(!check(PermissionCondition::Distinct, &args, single.clone()));
        assert!(!check(PermissionCondition::AllDistinct, &args, single.clone()));
        assert!(!check(PermissionCondition::Equals, &args, single));
    }

    #[test]
    fn unknown_condition_argument_is_unresolved() {
        assert!(!check(
            PermissionCondition::NotNull,
            &["missing"],
            vec![player(2, "Bob"), None]
        ));
    }

    #[test]
    fn compare_mode_is_honored() {
        let parsers = TypeParserRegistry::new();
        let alice = SenderRef::player(1, "Alice");
        let evaluator = ConditionEvaluator::new(&parsers, &alice);
        let spec = ArgumentSpec::player("target")
            .permission("")
            .condition(PermissionCondition::IsSelf, Vec::<String>::new())
            .compare_mode(CompareMode::Name);
        let renamed = Some(Value::Player(PlayerRef::new(Some(5), "alice")));
        let specs = vec![spec];
        assert!(evaluator.applies(&specs[0], renamed.as_ref(), &specs, &[renamed.clone()]));
    }

    /// Teams are the same side when they share a colour, whatever their names.
    struct TeamParser;

    impl TypeParser for TeamParser {
        fn name(&self) -> &str {
            "team"
        }

        fn can_parse(&self, value_type: &ValueType) -> bool {
            matches!(value_type, ValueType::Custom(name) if name == "team")
        }

        fn parse(&self, _: &str, _: &ValueType, _: &SenderRef) -> Option<Value> {
            None
        }

        fn is_equal(&self, _: &SenderRef, first: Option<&Value>, second: Option<&Value>, _: CompareMode) -> bool {
            let colour = |value: Option<&Value>| match value {
                Some(Value::Custom { raw, .. }) => raw.split(':').next().map(str::to_string),
                _ => None,
            };
            colour(first) == colour(second)
        }
    }

    fn team(raw: &str) -> Option<Value> {
        Some(Value::Custom {
            type_name: "team".into(),
            id: None,
            name: raw.split(':').nth(1).map(str::to_string),
            raw: raw.to_string(),
        })
    }

    #[test]
    fn owning_parser_decides_equality() {
        let alice = SenderRef::player(1, "Alice");
        let specs = vec![
            ArgumentSpec::new("home", ValueType::Custom("team".into()))
                .permission("")
                .condition(PermissionCondition::Distinct, ["home", "away"]),
            ArgumentSpec::new("away", ValueType::Custom("team".into())),
        ];
        let values = vec![team("red:Foxes"), team("red:Wolves")];

        let generic = TypeParserRegistry::new();
        let evaluator = ConditionEvaluator::new(&generic, &alice);
        assert!(evaluator.applies(&specs[0], values[0].as_ref(), &specs, &values));

        let mut parsers = TypeParserRegistry::new();
        parsers.register(TeamParser);
        let evaluator = ConditionEvaluator::new(&parsers, &alice);
        assert!(!evaluator.applies(&specs[0], values[0].as_ref(), &specs, &values));

        let values = vec![team("red:Foxes"), team("blue:Foxes")];
        assert!(evaluator.applies(&specs[0], values[0].as_ref(), &specs, &values));
    }
}
