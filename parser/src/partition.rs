//! Splits tokens into option occurrences, positional values and leftovers.

use std::iter::Peekable;

use command_bind_core::TargetKind;
use tracing::debug;

use crate::{NameLookup, Token};

/// One occurrence of an option together with the raw values it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// Member index in the schema.
    pub member: usize,
    /// Name as written in the arguments.
    pub name: String,
    pub values: Vec<String>,
}

/// A bounded sequence option that reached its `max` while more values
/// followed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overflow {
    /// Member index in the schema.
    pub member: usize,
    /// Index in [`Partitions::values`] of the first value that followed.
    pub position: usize,
}

/// Partitioner output. Each list keeps argument order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partitions {
    pub options: Vec<Occurrence>,
    pub values: Vec<String>,
    /// Unknown names, value-taking names left without a value and switches
    /// given an inline value.
    pub unmatched: Vec<Token>,
    pub overflow: Vec<Overflow>,
}

/// Partitions `tokens`.
///
/// A scalar option (or a sequence option with a separator) consumes its
/// inline value or else one following value. A sequence option without a
/// separator consumes its inline value plus following values up to its
/// `max`. Values never cross a [`Token::Separator`].
///
/// When a bounded sequence stops at its `max` with values still following,
/// the following values become positional and an [`Overflow`] records where
/// they start, so the mapper can report them if no positional member takes
/// them.
///
/// # Examples
///
/// ```
/// use command_bind_core::{Specification, ValueType};
/// use command_bind_parser::{NameLookup, Token, partition};
///
/// let specs = [Specification::scalar(None, Some("num"), ValueType::Integer)];
/// let lookup = NameLookup::new(&specs, true);
/// let parts = partition(
///     vec![Token::name("num"), Token::value("5"), Token::value("file")],
///     &lookup,
/// );
///
/// assert_eq!(parts.options[0].values, vec!["5"]);
/// assert_eq!(parts.values, vec!["file"]);
/// ```
pub fn partition(tokens: Vec<Token>, lookup: &NameLookup<'_>) -> Partitions {
    let mut parts = Partitions::default();
    let mut tokens = tokens.into_iter().peekable();

    while let Some(token) = tokens.next() {
        let (text, inline) = match token {
            Token::Separator => continue,
            Token::Value(value) => {
                parts.values.push(value);
                continue;
            }
            Token::Name { text, inline } => (text, inline),
        };

        let Some((member, spec)) = lookup
            .find(&text)
            .and_then(|member| lookup.get(member).map(|spec| (member, spec)))
        else {
            parts.unmatched.push(Token::Name { text, inline });
            continue;
        };

        let values = match spec.target {
            TargetKind::Switch => {
                if inline.is_some() {
                    parts.unmatched.push(Token::Name { text, inline });
                    continue;
                }
                parts.options.push(Occurrence {
                    member,
                    name: text,
                    values: Vec::new(),
                });
                continue;
            }
            TargetKind::Scalar => take_values(inline, 1, &mut tokens),
            TargetKind::Sequence if spec.separator().is_some() => {
                take_values(inline, 1, &mut tokens)
            }
            TargetKind::Sequence => {
                let limit = spec.max.unwrap_or(usize::MAX);
                let values = take_values(inline, limit, &mut tokens);
                let saturated = spec.max.is_some() && values.len() >= limit;
                if saturated && matches!(tokens.peek(), Some(Token::Value(_))) {
                    parts.overflow.push(Overflow {
                        member,
                        position: parts.values.len(),
                    });
                }
                values
            }
        };

        if values.is_empty() {
            parts.unmatched.push(Token::Name { text, inline: None });
        } else {
            parts.options.push(Occurrence {
                member,
                name: text,
                values,
            });
        }
    }

    debug!(
        options = parts.options.len(),
        values = parts.values.len(),
        unmatched = parts.unmatched.len(),
        overflow = parts.overflow.len(),
        "Partitioned tokens"
    );
    parts
}

fn take_values<I>(inline: Option<String>, limit: usize, tokens: &mut Peekable<I>) -> Vec<String>
where
    I: Iterator<Item = Token>,
{
    let mut values: Vec<String> = inline.into_iter().collect();
    while values.len() < limit {
        match tokens.next_if(|token| matches!(token, Token::Value(_))) {
            Some(Token::Value(value)) => values.push(value),
            _ => break,
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use command_bind_core::{Specification, ValueType};

    fn specs() -> Vec<Specification> {
        vec![
            Specification::switch(Some('v'), Some("verbose")),
            Specification::scalar(Some('o'), Some("output"), ValueType::String),
            Specification::sequence(None, Some("tags"), ValueType::String).with_separator(','),
            Specification::sequence(None, Some("files"), ValueType::String).with_range(0, Some(2)),
            Specification::sequence(None, Some("rest"), ValueType::String),
        ]
    }

    fn run(tokens: Vec<Token>) -> Partitions {
        let specs = specs();
        let lookup = NameLookup::new(&specs, true);
        partition(tokens, &lookup)
    }

    #[test]
    fn test_scalar_takes_inline_or_next_value() {
        let parts = run(vec![
            Token::name_with("output", "a"),
            Token::value("pos"),
            Token::name("o"),
            Token::value("b"),
        ]);

        let values: Vec<_> = parts.options.iter().map(|o| o.values.clone()).collect();
        assert_eq!(values, vec![vec!["a".to_string()], vec!["b".to_string()]]);
        assert_eq!(parts.values, vec!["pos"]);
    }

    #[test]
    fn test_sequence_consumption_rules() {
        let parts = run(vec![
            Token::name("tags"),
            Token::value("a,b"),
            Token::value("x"),
            Token::name("files"),
            Token::value("1"),
            Token::value("2"),
            Token::value("3"),
        ]);

        assert_eq!(parts.options[0].values, vec!["a,b"]);
        assert_eq!(parts.options[1].values, vec!["1", "2"]);
        assert_eq!(parts.values, vec!["x", "3"]);
        assert_eq!(parts.overflow, vec![Overflow { member: 3, position: 1 }]);
    }

    #[test]
    fn test_full_sequence_before_name_is_not_an_overflow() {
        let parts = run(vec![
            Token::name("files"),
            Token::value("1"),
            Token::value("2"),
            Token::name("verbose"),
            Token::value("pos"),
        ]);

        assert_eq!(parts.options[0].values, vec!["1", "2"]);
        assert_eq!(parts.values, vec!["pos"]);
        assert!(parts.overflow.is_empty());
    }

    #[test]
    fn test_unbounded_sequence_stops_at_separator() {
        let parts = run(vec![
            Token::name_with("rest", "a"),
            Token::value("b"),
            Token::Separator,
            Token::value("c"),
        ]);

        assert_eq!(parts.options[0].values, vec!["a", "b"]);
        assert_eq!(parts.values, vec!["c"]);
    }

    #[test]
    fn test_unmatched_tokens() {
        let parts = run(vec![
            Token::name("unknown"),
            Token::name("output"),
            Token::Separator,
            Token::value("x"),
            Token::name_with("verbose", "yes"),
        ]);

        assert!(parts.options.is_empty());
        assert_eq!(
            parts.unmatched,
            vec![
                Token::name("unknown"),
                Token::name("output"),
                Token::name_with("verbose", "yes"),
            ]
        );
        assert_eq!(parts.values, vec!["x"]);
    }
}
