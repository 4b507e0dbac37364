//! Formats instances back into command lines.
//!
//! The output follows the same conventions the parser reads, so binding an
//! unparsed command line yields an equal instance.

use command_bind_core::{Member, Schema, Specification, TargetKind, Value};

use crate::UnparserSettings;

/// Formats instances of a schema as command lines.
///
/// # Examples
///
/// ```
/// use command_bind_core::{SchemaBuilder, Specification, ValueType};
/// use command_bind_parser::Unparser;
///
/// #[derive(Default)]
/// struct Opts { bla: bool, blub: Option<String>, num: i32 }
///
/// let schema = SchemaBuilder::mutable("Opts", Opts::default)
///     .field("bla", Specification::switch(None, Some("bla")), |o| &o.bla, |o| &mut o.bla)
///     .field("blub", Specification::scalar(None, Some("blub"), ValueType::String), |o| &o.blub, |o| &mut o.blub)
///     .field("num", Specification::scalar(None, Some("num"), ValueType::Integer).with_default(3), |o| &o.num, |o| &mut o.num)
///     .build()
///     .unwrap();
///
/// let opts = Opts { bla: true, blub: Some("hello world".into()), num: 5 };
/// assert_eq!(
///     Unparser::default().format_command_line(&schema, &opts),
///     r#"--bla --blub "hello world" --num 5"#
/// );
///
/// let defaults = Opts { num: 3, ..Opts::default() };
/// assert_eq!(Unparser::default().format_command_line(&schema, &defaults), "");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Unparser {
    settings: UnparserSettings,
}

impl Unparser {
    pub fn new(settings: UnparserSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &UnparserSettings {
        &self.settings
    }

    /// Formats `instance`, leaving out members that hold their declared
    /// default, or an empty value when no default is declared.
    ///
    /// Empty sequences are always left out since no argument spells them.
    pub fn format_command_line<T>(&self, schema: &Schema<T>, instance: &T) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(verb) = schema.verb() {
            parts.push(verb.name.clone());
        }

        let present: Vec<(&Member<T>, Value)> = schema
            .members()
            .iter()
            .filter_map(|member| {
                let value = member.read(instance)?;
                let skip = match &member.specification().default {
                    Some(default) => *default == value || value == Value::Sequence(Vec::new()),
                    None => value.is_empty(),
                };
                (!skip).then_some((member, value))
            })
            .collect();

        let (options, mut values): (Vec<_>, Vec<_>) = present
            .into_iter()
            .partition(|(member, _)| member.specification().is_option());
        values.sort_by_key(|(member, _)| member.specification().index());

        let mut grouped = String::new();
        let mut rest = Vec::new();
        for (member, value) in options {
            let short = member.specification().as_option().and_then(|o| o.short_name);
            match short {
                Some(short)
                    if self.settings.group_switches
                        && member.specification().target == TargetKind::Switch =>
                {
                    grouped.push(short);
                }
                _ => rest.push((member, value)),
            }
        }
        if !grouped.is_empty() {
            parts.push(format!("-{grouped}"));
        }

        for (member, value) in rest {
            self.format_option(member.specification(), &value, &mut parts);
        }

        if !values.is_empty() {
            if self.settings.emit_separator {
                parts.push("--".to_string());
            }
            for (member, value) in values {
                parts.extend(format_values(member.specification(), &value));
            }
        }

        parts.join(" ")
    }

    fn format_option(&self, spec: &Specification, value: &Value, parts: &mut Vec<String>) {
        let Some(option) = spec.as_option() else {
            return;
        };
        let (name, is_long) = match (option.short_name, &option.long_name) {
            (Some(short), _) if self.settings.prefer_short_name => (format!("-{short}"), false),
            (_, Some(long)) => (format!("--{long}"), true),
            (Some(short), None) => (format!("-{short}"), false),
            (None, None) => return,
        };

        if spec.target == TargetKind::Switch {
            parts.push(name);
            return;
        }

        let formatted = format_values(spec, value);
        if self.settings.use_equal_token && is_long {
            let mut formatted = formatted.into_iter();
            let first = formatted.next().unwrap_or_default();
            parts.push(format!("{name}={first}"));
            parts.extend(formatted);
        } else {
            parts.push(name);
            parts.extend(formatted);
        }
    }
}

/// Formats a member value as argument strings: one per sequence element, or
/// one joined string when the member declares a separator.
fn format_values(spec: &Specification, value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(items) => match spec.separator() {
            Some(separator) => {
                let joined = items
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(&separator.to_string());
                vec![format_with_quotes(&joined)]
            }
            None => items
                .iter()
                .map(|item| format_with_quotes(&item.to_string()))
                .collect(),
        },
        other => vec![format_with_quotes(&other.to_string())],
    }
}

/// Escapes `"` as `\"` and wraps values containing a space in quotes.
///
/// Trailing backslashes stay outside the closing quote so they are not
/// read as an escaped quote, and the empty string becomes `""`.
///
/// # Examples
///
/// ```
/// use command_bind_parser::format_with_quotes;
///
/// assert_eq!(format_with_quotes("plain"), "plain");
/// assert_eq!(format_with_quotes("hello world"), "\"hello world\"");
/// assert_eq!(format_with_quotes(r#"say "hi""#), r#""say \"hi\"""#);
/// assert_eq!(format_with_quotes(r"C:\my dir\"), r#""C:\my dir"\"#);
/// assert_eq!(format_with_quotes(""), r#""""#);
/// ```
pub fn format_with_quotes(value: &str) -> String {
    if value.is_empty() {
        return "\"\"".to_string();
    }
    let escaped = value.replace('"', "\\\"");
    if !escaped.contains(' ') {
        return escaped;
    }
    let head = escaped.trim_end_matches('\\');
    let trailing = &escaped[head.len()..];
    format!("\"{head}\"{trailing}")
}

/// Splits a command line produced by [`Unparser`] back into arguments.
///
/// Spaces outside quotes separate arguments; `"` toggles quoting and `\"`
/// is a literal quote.
///
/// # Examples
///
/// ```
/// use command_bind_parser::split_command_line;
///
/// assert_eq!(
///     split_command_line(r#"--blub "hello world" --say \"hi\""#),
///     vec!["--blub", "hello world", "--say", "\"hi\""]
/// );
/// ```
pub fn split_command_line(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
                in_arg = true;
            }
            '"' => {
                quoted = !quoted;
                in_arg = true;
            }
            ' ' if !quoted => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            _ => {
                current.push(c);
                in_arg = true;
            }
        }
    }
    if in_arg {
        args.push(current);
    }
    args
}
