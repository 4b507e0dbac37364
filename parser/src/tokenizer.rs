//! Classifies raw argument strings into tokens.

use command_bind_core::{Error, is_valid_long_name, is_valid_short_name};
use tracing::debug;

use crate::NameLookup;

/// One classified argument (or part of a bundled short-name argument).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// An option name, with its `=value` or bundle remainder if present.
    Name { text: String, inline: Option<String> },
    /// A plain value.
    Value(String),
    /// The end-of-options marker `--`.
    Separator,
}

impl Token {
    pub fn name(text: &str) -> Self {
        Token::Name {
            text: text.to_string(),
            inline: None,
        }
    }

    pub fn name_with(text: &str, inline: &str) -> Self {
        Token::Name {
            text: text.to_string(),
            inline: Some(inline.to_string()),
        }
    }

    pub fn value(text: &str) -> Self {
        Token::Value(text.to_string())
    }
}

/// Tokenizer output: tokens in argument order plus malformed arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    pub errors: Vec<Error>,
}

/// Tokenizes `args`.
///
/// Short-name bundles are split using `lookup`: a declared short name that
/// takes a value consumes the rest of its argument, and `-<digit>` is a
/// value unless the digit is itself a declared short name.
///
/// # Examples
///
/// ```
/// use command_bind_core::{Specification, ValueType};
/// use command_bind_parser::{NameLookup, Token, tokenize};
///
/// let specs = [
///     Specification::switch(Some('a'), None),
///     Specification::scalar(Some('n'), None, ValueType::Integer),
/// ];
/// let lookup = NameLookup::new(&specs, true);
///
/// let out = tokenize(&["-an5", "--", "-x"], &lookup, true);
/// assert_eq!(
///     out.tokens,
///     vec![
///         Token::name("a"),
///         Token::name_with("n", "5"),
///         Token::Separator,
///         Token::value("-x"),
///     ]
/// );
/// assert!(out.errors.is_empty());
/// ```
pub fn tokenize<S: AsRef<str>>(args: &[S], lookup: &NameLookup<'_>, enable_separator: bool) -> Tokenized {
    let mut out = Tokenized::default();
    let mut args = args.iter().map(AsRef::as_ref);

    while let Some(arg) = args.next() {
        if enable_separator && arg == "--" {
            out.tokens.push(Token::Separator);
            out.tokens.extend(args.by_ref().map(Token::value));
            break;
        }
        tokenize_one(arg, lookup, &mut out);
    }

    debug!(
        tokens = out.tokens.len(),
        errors = out.errors.len(),
        "Tokenized arguments"
    );
    out
}

fn tokenize_one(arg: &str, lookup: &NameLookup<'_>, out: &mut Tokenized) {
    if let Some(long) = arg.strip_prefix("--") {
        if long.is_empty() {
            // `--` with the separator disabled
            out.tokens.push(Token::value(arg));
            return;
        }
        let (name, inline) = match long.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (long, None),
        };
        if !is_valid_long_name(name) {
            out.errors.push(Error::BadFormatToken {
                token: arg.to_string(),
            });
            return;
        }
        out.tokens.push(Token::Name {
            text: name.to_string(),
            inline: inline.map(String::from),
        });
        return;
    }

    let Some(bundle) = arg.strip_prefix('-') else {
        out.tokens.push(Token::value(arg));
        return;
    };
    let Some(first) = bundle.chars().next() else {
        out.tokens.push(Token::value(arg));
        return;
    };
    if first.is_ascii_digit() && lookup.find_short(first).is_none() {
        out.tokens.push(Token::value(arg));
        return;
    }

    match split_bundle(bundle, lookup) {
        Some(tokens) => out.tokens.extend(tokens),
        None => out.errors.push(Error::BadFormatToken {
            token: arg.to_string(),
        }),
    }
}

/// Splits `abc` of `-abc` into names. Returns `None` if a character before
/// the first value-taking name is not a valid short name.
fn split_bundle(bundle: &str, lookup: &NameLookup<'_>) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    for (pos, c) in bundle.char_indices() {
        if !is_valid_short_name(c) {
            return None;
        }
        let text = c.to_string();
        if lookup.short_takes_value(c) {
            let rest = &bundle[pos + c.len_utf8()..];
            let inline = (!rest.is_empty()).then(|| rest.to_string());
            tokens.push(Token::Name { text, inline });
            return Some(tokens);
        }
        tokens.push(Token::Name { text, inline: None });
    }
    Some(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use command_bind_core::{Specification, ValueType};

    fn specs() -> Vec<Specification> {
        vec![
            Specification::switch(Some('a'), Some("all")),
            Specification::switch(Some('b'), None),
            Specification::switch(Some('c'), None),
            Specification::scalar(Some('n'), Some("name"), ValueType::String),
            Specification::switch(Some('1'), Some("one")),
        ]
    }

    fn run(args: &[&str]) -> Tokenized {
        let specs = specs();
        let lookup = NameLookup::new(&specs, true);
        tokenize(args, &lookup, true)
    }

    #[test]
    fn test_long_names_with_and_without_inline_value() {
        let out = run(&["--all", "--name=x=y", "--name="]);
        assert_eq!(
            out.tokens,
            vec![
                Token::name("all"),
                Token::name_with("name", "x=y"),
                Token::name_with("name", ""),
            ]
        );
    }

    #[test]
    fn test_bundle_of_switches() {
        let out = run(&["-abc"]);
        assert_eq!(
            out.tokens,
            vec![Token::name("a"), Token::name("b"), Token::name("c")]
        );
    }

    #[test]
    fn test_value_taking_short_name_takes_remainder() {
        let out = run(&["-nvalue"]);
        assert_eq!(out.tokens, vec![Token::name_with("n", "value")]);

        let out = run(&["-an5"]);
        assert_eq!(out.tokens, vec![Token::name("a"), Token::name_with("n", "5")]);

        let out = run(&["-n"]);
        assert_eq!(out.tokens, vec![Token::name("n")]);
    }

    #[test]
    fn test_negative_numbers_are_values() {
        let out = run(&["-5", "-2.5", "-"]);
        assert_eq!(
            out.tokens,
            vec![Token::value("-5"), Token::value("-2.5"), Token::value("-")]
        );

        // `1` is declared, so it is a name
        let out = run(&["-1"]);
        assert_eq!(out.tokens, vec![Token::name("1")]);
    }

    #[test]
    fn test_malformed_tokens() {
        let out = run(&["--=x", "--a b", "-a!", "ok"]);
        assert_eq!(out.tokens, vec![Token::value("ok")]);
        assert_eq!(
            out.errors,
            vec![
                Error::BadFormatToken { token: "--=x".into() },
                Error::BadFormatToken { token: "--a b".into() },
                Error::BadFormatToken { token: "-a!".into() },
            ]
        );
    }

    #[test]
    fn test_separator_makes_rest_values() {
        let out = run(&["-a", "--", "--all", "-b", "--"]);
        assert_eq!(
            out.tokens,
            vec![
                Token::name("a"),
                Token::Separator,
                Token::value("--all"),
                Token::value("-b"),
                Token::value("--"),
            ]
        );
    }

    #[test]
    fn test_disabled_separator_is_a_value() {
        let specs = specs();
        let lookup = NameLookup::new(&specs, true);
        let out = tokenize(&["--", "-a"], &lookup, false);
        assert_eq!(out.tokens, vec![Token::value("--"), Token::name("a")]);
    }
}
