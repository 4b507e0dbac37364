//! Maps partitioned raw strings onto members as typed values.
//!
//! Each function returns one slot per schema member (`None` when the
//! arguments did not provide the member) together with the errors found.

use command_bind_core::{Error, Member, NameInfo, Specification, TargetKind, Value};
use tracing::debug;

use crate::convert::convert;
use crate::{NameLookup, Occurrence, Overflow, ParserSettings, Token};

/// Parsed values indexed like the schema's members, plus errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapped {
    pub values: Vec<Option<Value>>,
    pub errors: Vec<Error>,
    /// Positional values bound to members (value mapping only).
    pub consumed: usize,
}

impl Mapped {
    fn with_slots(len: usize) -> Self {
        Self {
            values: vec![None; len],
            errors: Vec::new(),
            consumed: 0,
        }
    }
}

/// Maps option occurrences.
///
/// Non-sequence options given more than once are `RepeatedOption` unless
/// `allow_multi_instance` is set, in which case the last occurrence wins.
/// Sequence occurrences accumulate.
pub fn map_options<T>(
    members: &[Member<T>],
    occurrences: &[Occurrence],
    settings: &ParserSettings,
) -> Mapped {
    let mut mapped = Mapped::with_slots(members.len());

    for (index, member) in members.iter().enumerate() {
        let raw: Vec<&Occurrence> = occurrences.iter().filter(|o| o.member == index).collect();
        let Some(last) = raw.last() else {
            continue;
        };
        let spec = member.specification();
        let name = member.name_info();

        if spec.target != TargetKind::Sequence && raw.len() > 1 && !settings.allow_multi_instance {
            mapped.errors.push(Error::RepeatedOption { name });
            continue;
        }

        let result = match spec.target {
            TargetKind::Switch => Ok(Value::Bool(true)),
            TargetKind::Scalar => match last.values.first() {
                Some(value) => convert_one(value, spec, &name, settings),
                None => Err(Error::MissingValueOption { name }),
            },
            TargetKind::Sequence => {
                let elements: Vec<&str> = raw
                    .iter()
                    .flat_map(|o| o.values.iter())
                    .flat_map(|value| split_elements(value, spec.separator()))
                    .collect();
                convert_sequence(&elements, spec, &name, settings)
            }
        };

        match result {
            Ok(value) => mapped.values[index] = Some(value),
            Err(err) => mapped.errors.push(err),
        }
    }

    mapped
}

/// Maps positional values onto value members by ascending index.
///
/// A terminal sequence takes every remaining value; values left over after
/// the last positional member are ignored.
pub fn map_values<T>(members: &[Member<T>], values: &[String], settings: &ParserSettings) -> Mapped {
    let mut mapped = Mapped::with_slots(members.len());

    let mut positionals: Vec<(usize, usize)> = members
        .iter()
        .enumerate()
        .filter_map(|(slot, m)| m.specification().index().map(|index| (index, slot)))
        .collect();
    positionals.sort_unstable();

    let mut remaining = values;
    for (_, slot) in positionals {
        if remaining.is_empty() {
            break;
        }
        let member = &members[slot];
        let spec = member.specification();
        let name = member.name_info();

        let result = if spec.target == TargetKind::Sequence {
            let elements: Vec<&str> = remaining.iter().map(String::as_str).collect();
            remaining = &[];
            convert_sequence(&elements, spec, &name, settings)
        } else {
            let (first, rest) = remaining.split_at(1);
            remaining = rest;
            convert_one(&first[0], spec, &name, settings)
        };

        match result {
            Ok(value) => mapped.values[slot] = Some(value),
            Err(err) => mapped.errors.push(err),
        }
    }

    mapped.consumed = values.len() - remaining.len();
    if !remaining.is_empty() {
        debug!(surplus = ?remaining, "Ignoring surplus positional values");
    }

    mapped
}

/// Reports bounded sequence options whose trailing values no positional
/// member took.
///
/// Each such option becomes `SequenceOutOfRange` and its slot in `options`
/// is cleared, so the extra values are never silently dropped.
pub fn map_overflow<T>(
    members: &[Member<T>],
    overflow: &[Overflow],
    consumed: usize,
    options: &mut Mapped,
) {
    for entry in overflow.iter().filter(|entry| entry.position >= consumed) {
        let Some(member) = members.get(entry.member) else {
            continue;
        };
        let name = member.name_info();
        let reported = options.errors.iter().any(|err| {
            matches!(err, Error::SequenceOutOfRange { name: other } if *other == name)
        });
        if let Some(slot) = options.values.get_mut(entry.member) {
            *slot = None;
        }
        if !reported {
            options.errors.push(Error::SequenceOutOfRange { name });
        }
    }
}

/// Turns unmatched tokens into errors.
///
/// A known value-taking name without a value is `MissingValueOption`; a
/// switch given an inline value is `BadFormatConversion`; unknown names are
/// `UnknownOption` unless `ignore_unknown_arguments` is set.
pub fn map_unmatched<T>(
    unmatched: &[Token],
    lookup: &NameLookup<'_>,
    members: &[Member<T>],
    settings: &ParserSettings,
) -> Vec<Error> {
    let mut errors = Vec::new();

    for token in unmatched {
        let Token::Name { text, inline } = token else {
            continue;
        };
        let known = lookup.find(text).and_then(|index| members.get(index));

        match (known, inline) {
            (Some(member), Some(value))
                if member.specification().target == TargetKind::Switch =>
            {
                errors.push(Error::BadFormatConversion {
                    name: member.name_info(),
                    token: value.clone(),
                    reason: "switch takes no value".to_string(),
                });
            }
            (Some(member), _) => errors.push(Error::MissingValueOption {
                name: member.name_info(),
            }),
            (None, _) if settings.ignore_unknown_arguments => {
                debug!(name = %text, "Ignoring unknown option");
            }
            (None, _) => errors.push(Error::UnknownOption {
                token: text.clone(),
            }),
        }
    }

    errors
}

fn split_elements(value: &str, separator: Option<char>) -> Vec<&str> {
    match separator {
        Some(separator) => value.split(separator).collect(),
        None => vec![value],
    }
}

fn convert_one(
    raw: &str,
    spec: &Specification,
    name: &NameInfo,
    settings: &ParserSettings,
) -> Result<Value, Error> {
    convert(raw, &spec.value_type, settings.decimal_separator).map_err(|err| {
        Error::BadFormatConversion {
            name: name.clone(),
            token: raw.to_string(),
            reason: err.to_string(),
        }
    })
}

fn convert_sequence(
    elements: &[&str],
    spec: &Specification,
    name: &NameInfo,
    settings: &ParserSettings,
) -> Result<Value, Error> {
    let items = elements
        .iter()
        .map(|raw| convert_one(raw, spec, name, settings))
        .collect::<Result<Vec<_>, _>>()?;

    let too_few = spec.min.is_some_and(|min| items.len() < min);
    let too_many = spec.max.is_some_and(|max| items.len() > max);
    if too_few || too_many {
        return Err(Error::SequenceOutOfRange { name: name.clone() });
    }
    Ok(Value::Sequence(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use command_bind_core::{Schema, SchemaBuilder, ValueMap, ValueType};

    fn schema(specs: Vec<(&str, Specification)>) -> Schema<ValueMap> {
        specs
            .into_iter()
            .fold(SchemaBuilder::mutable("Test", ValueMap::new), |builder, (name, spec)| {
                let key = name.to_string();
                builder.member_with(name, spec, move |map: &ValueMap| map.get(&key).cloned(), |_, _| Ok(()))
            })
            .build()
            .unwrap()
    }

    fn occurrence(member: usize, values: &[&str]) -> Occurrence {
        Occurrence {
            member,
            name: String::new(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[test]
    fn test_repeated_scalar_is_an_error_unless_multi_instance() {
        let schema = schema(vec![(
            "num",
            Specification::scalar(Some('n'), None, ValueType::Integer),
        )]);
        let occurrences = [occurrence(0, &["1"]), occurrence(0, &["2"])];

        let mapped = map_options(schema.members(), &occurrences, &ParserSettings::default());
        assert_eq!(mapped.values, vec![None]);
        assert_eq!(
            mapped.errors,
            vec![Error::RepeatedOption {
                name: NameInfo::new(Some('n'), None)
            }]
        );

        let settings = ParserSettings::default().with_allow_multi_instance(true);
        let mapped = map_options(schema.members(), &occurrences, &settings);
        assert_eq!(mapped.values, vec![Some(Value::Integer(2))]);
        assert!(mapped.errors.is_empty());
    }

    #[test]
    fn test_sequence_accumulates_and_splits() {
        let schema = schema(vec![(
            "tags",
            Specification::sequence(None, Some("tags"), ValueType::String).with_separator(','),
        )]);
        let occurrences = [occurrence(0, &["a,b"]), occurrence(0, &["c"])];

        let mapped = map_options(schema.members(), &occurrences, &ParserSettings::default());
        assert_eq!(
            mapped.values,
            vec![Some(Value::from(vec!["a", "b", "c"]))]
        );
    }

    #[test]
    fn test_sequence_range() {
        let schema = schema(vec![(
            "nums",
            Specification::sequence(None, Some("nums"), ValueType::Integer).with_range(2, Some(4)),
        )]);
        let settings = ParserSettings::default();

        for (values, ok) in [
            (vec!["1"], false),
            (vec!["1", "2"], true),
            (vec!["1", "2", "3", "4"], true),
            (vec!["1", "2", "3", "4", "5"], false),
        ] {
            let mapped = map_options(schema.members(), &[occurrence(0, &values)], &settings);
            assert_eq!(mapped.errors.is_empty(), ok, "{values:?}");
        }
    }

    #[test]
    fn test_overflow_is_reported_unless_a_positional_takes_it() {
        let schema = schema(vec![
            (
                "nums",
                Specification::sequence(None, Some("nums"), ValueType::Integer).with_range(1, Some(2)),
            ),
            ("file", Specification::value(0, ValueType::String)),
        ]);
        let settings = ParserSettings::default();
        let occurrences = [occurrence(0, &["1", "2"])];
        let overflow = [Overflow {
            member: 0,
            position: 0,
        }];

        let values = map_values(schema.members(), &["3".to_string()], &settings);
        assert_eq!(values.consumed, 1);
        let mut options = map_options(schema.members(), &occurrences, &settings);
        map_overflow(schema.members(), &overflow, values.consumed, &mut options);
        assert!(options.errors.is_empty());
        assert!(options.values[0].is_some());

        let surplus = ["pos".to_string(), "3".to_string()];
        let values = map_values(schema.members(), &surplus, &settings);
        let overflow = [Overflow {
            member: 0,
            position: 1,
        }];
        let mut options = map_options(schema.members(), &occurrences, &settings);
        map_overflow(schema.members(), &overflow, values.consumed, &mut options);
        assert_eq!(
            options.errors,
            vec![Error::SequenceOutOfRange {
                name: NameInfo::new(None, Some("nums"))
            }]
        );
        assert_eq!(options.values[0], None);
    }

    #[test]
    fn test_conversion_failure_names_the_option() {
        let schema = schema(vec![(
            "num",
            Specification::scalar(None, Some("num"), ValueType::Integer),
        )]);

        let mapped = map_options(
            schema.members(),
            &[occurrence(0, &["five"])],
            &ParserSettings::default(),
        );
        assert!(matches!(
            &mapped.errors[..],
            [Error::BadFormatConversion { name, token, .. }]
                if name.name_text() == "num" && token == "five"
        ));
    }

    #[test]
    fn test_values_bind_by_index_and_surplus_is_ignored() {
        let schema = schema(vec![
            ("second", Specification::value(1, ValueType::Integer)),
            ("first", Specification::value(0, ValueType::String)),
        ]);
        let values = vec!["a".to_string(), "2".to_string(), "extra".to_string()];

        let mapped = map_values(schema.members(), &values, &ParserSettings::default());
        assert_eq!(
            mapped.values,
            vec![Some(Value::Integer(2)), Some(Value::from("a"))]
        );
        assert!(mapped.errors.is_empty());
    }

    #[test]
    fn test_value_sequence_takes_the_rest() {
        let schema = schema(vec![
            ("input", Specification::value(0, ValueType::String)),
            (
                "rest",
                Specification::value_sequence(1, ValueType::String).with_range(0, Some(1)),
            ),
        ]);
        let values: Vec<String> = ["in", "a", "b"].iter().map(|s| s.to_string()).collect();

        let mapped = map_values(schema.members(), &values, &ParserSettings::default());
        assert_eq!(mapped.values[0], Some(Value::from("in")));
        assert_eq!(mapped.values[1], None);
        assert!(matches!(&mapped.errors[..], [Error::SequenceOutOfRange { .. }]));
    }

    #[test]
    fn test_unmatched_tokens_become_errors() {
        let schema = schema(vec![
            ("out", Specification::scalar(Some('o'), None, ValueType::String)),
            ("quiet", Specification::switch(Some('q'), None)),
        ]);
        let specs: Vec<&Specification> = schema.specifications().collect();
        let lookup = NameLookup::new(specs, true);
        let unmatched = [
            Token::name("o"),
            Token::name_with("q", "yes"),
            Token::name("unknown"),
        ];

        let errors = map_unmatched(&unmatched, &lookup, schema.members(), &ParserSettings::default());
        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors[0],
            Error::MissingValueOption {
                name: NameInfo::new(Some('o'), None)
            }
        );
        assert!(matches!(errors[1], Error::BadFormatConversion { .. }));
        assert_eq!(
            errors[2],
            Error::UnknownOption {
                token: "unknown".into()
            }
        );

        let settings = ParserSettings::default().with_ignore_unknown_arguments(true);
        let errors = map_unmatched(&unmatched, &lookup, schema.members(), &settings);
        assert_eq!(errors.len(), 2);
    }
}
