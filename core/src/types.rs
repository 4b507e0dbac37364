//! Specification type definitions.
//!
//! A [`Specification`] describes one bindable member: either a named option
//! ([`OptionSpecification`]) or a positional value
//! ([`ValueSpecification`]). Specifications are immutable once a schema is
//! built and serialize with [`serde`], so they can also be described in
//! JSON or YAML documents.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Value;

/// Shape of the target a member binds to.
///
/// # Examples
///
/// ```
/// use command_bind_core::TargetKind;
///
/// assert_eq!(TargetKind::default(), TargetKind::Scalar);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Presence-only boolean option.
    Switch,
    /// Exactly one value.
    #[default]
    Scalar,
    /// Zero or more values.
    Sequence,
}

impl TargetKind {
    pub(crate) fn label(self) -> &'static str {
        match self {
            TargetKind::Switch => "switch",
            TargetKind::Scalar => "scalar",
            TargetKind::Sequence => "sequence",
        }
    }
}

/// Element type of a member's value.
///
/// For sequences this is the type of each element.
///
/// # Examples
///
/// ```
/// use command_bind_core::ValueType;
///
/// let format = ValueType::Choice(vec!["json".into(), "yaml".into()]);
/// assert!(matches!(format, ValueType::Choice(_)));
/// assert_eq!(ValueType::default(), ValueType::String);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// `true` / `false`.
    Bool,
    /// Free-form text (the default).
    #[default]
    String,
    /// Signed 64-bit integer.
    Integer,
    /// Floating point number.
    Float,
    /// A single character.
    Char,
    /// One of the listed names (matched case-insensitively).
    Choice(Vec<String>),
}

impl ValueType {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            ValueType::Bool => "bool",
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::Char => "char",
            ValueType::Choice(_) => "choice",
        }
    }
}

/// Option-only part of a specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OptionSpecification {
    /// Single-letter name used as `-x`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<char>,
    /// Long name used as `--name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    /// Character splitting an inline sequence value (e.g. `,`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<char>,
    /// Mutual-exclusion group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_name: Option<String>,
}

impl OptionSpecification {
    /// Returns `true` if `name` is this option's short or long name.
    pub fn matches(&self, name: &str, case_sensitive: bool) -> bool {
        let name = fold_name(name, case_sensitive);
        let short = self.short_name.is_some_and(|c| {
            let mut buf = [0u8; 4];
            fold_name(c.encode_utf8(&mut buf), case_sensitive) == name
        });
        short
            || self
                .long_name
                .as_deref()
                .is_some_and(|long| fold_name(long, case_sensitive) == name)
    }
}

/// The form of an option name used for comparisons: unchanged when
/// matching case-sensitively, Unicode-lowercased otherwise.
///
/// ```
/// use command_bind_core::fold_name;
///
/// assert_eq!(fold_name("Ünit", false), "ünit");
/// assert_eq!(fold_name("Ünit", true), "Ünit");
/// ```
pub fn fold_name(name: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(name.to_lowercase())
    }
}

/// Positional-only part of a specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSpecification {
    /// Binding order among positional values, from 0.
    pub index: usize,
}

/// Distinguishes options from positional values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecificationKind {
    Option(OptionSpecification),
    Value(ValueSpecification),
}

/// Description of one bindable member.
///
/// Use the constructors ([`switch`](Specification::switch),
/// [`scalar`](Specification::scalar), [`sequence`](Specification::sequence),
/// [`value`](Specification::value),
/// [`value_sequence`](Specification::value_sequence)) and chain builder
/// methods to refine them.
///
/// # Examples
///
/// ```
/// use command_bind_core::{Specification, TargetKind, Value, ValueType};
///
/// let verbose = Specification::switch(Some('v'), Some("verbose"))
///     .with_help("Print more output");
/// assert_eq!(verbose.target, TargetKind::Switch);
///
/// let jobs = Specification::scalar(Some('j'), Some("jobs"), ValueType::Integer)
///     .with_default(4);
/// assert_eq!(jobs.default, Some(Value::Integer(4)));
///
/// let files = Specification::value_sequence(0, ValueType::String).with_range(1, None);
/// assert_eq!(files.index(), Some(0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specification {
    /// Option or positional value.
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub kind: SpecificationKind,
    /// Whether binding fails when the member stays unresolved.
    #[serde(default)]
    pub required: bool,
    /// Minimum number of sequence elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
    /// Maximum number of sequence elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
    /// Value used when the arguments do not provide one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Element type.
    #[serde(default, with = "serde_yaml::with::singleton_map")]
    pub value_type: ValueType,
    /// Target shape.
    #[serde(default)]
    pub target: TargetKind,
    /// Text for help renderers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    /// Placeholder shown in usage text (e.g. `FILE`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_value: Option<String>,
    /// Excluded from help output.
    #[serde(default)]
    pub hidden: bool,
}

impl Specification {
    fn option(
        short: Option<char>,
        long: Option<&str>,
        value_type: ValueType,
        target: TargetKind,
    ) -> Self {
        Self {
            kind: SpecificationKind::Option(OptionSpecification {
                short_name: short,
                long_name: long.map(String::from),
                separator: None,
                set_name: None,
            }),
            required: false,
            min: None,
            max: None,
            default: None,
            value_type,
            target,
            help_text: None,
            meta_value: None,
            hidden: false,
        }
    }

    fn positional(index: usize, value_type: ValueType, target: TargetKind) -> Self {
        Self {
            kind: SpecificationKind::Value(ValueSpecification { index }),
            required: false,
            min: None,
            max: None,
            default: None,
            value_type,
            target,
            help_text: None,
            meta_value: None,
            hidden: false,
        }
    }

    /// Creates a presence-only boolean option.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_bind_core::{Specification, ValueType};
    ///
    /// let spec = Specification::switch(Some('q'), None);
    /// assert_eq!(spec.value_type, ValueType::Bool);
    /// assert!(spec.is_option());
    /// ```
    pub fn switch(short: Option<char>, long: Option<&str>) -> Self {
        Self::option(short, long, ValueType::Bool, TargetKind::Switch)
    }

    /// Creates an option taking exactly one value.
    pub fn scalar(short: Option<char>, long: Option<&str>, value_type: ValueType) -> Self {
        Self::option(short, long, value_type, TargetKind::Scalar)
    }

    /// Creates an option taking a list of values.
    pub fn sequence(short: Option<char>, long: Option<&str>, value_type: ValueType) -> Self {
        Self::option(short, long, value_type, TargetKind::Sequence)
    }

    /// Creates a positional value bound at `index`.
    pub fn value(index: usize, value_type: ValueType) -> Self {
        Self::positional(index, value_type, TargetKind::Scalar)
    }

    /// Creates a positional sequence; it consumes every remaining value and
    /// must be the last positional.
    pub fn value_sequence(index: usize, value_type: ValueType) -> Self {
        Self::positional(index, value_type, TargetKind::Sequence)
    }

    /// Marks as required.
    pub fn as_required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the default value.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the accepted element count of a sequence.
    pub fn with_range(mut self, min: usize, max: Option<usize>) -> Self {
        self.min = Some(min);
        self.max = max;
        self
    }

    /// Splits inline sequence values on `separator`. Ignored for positionals.
    pub fn with_separator(mut self, separator: char) -> Self {
        if let SpecificationKind::Option(option) = &mut self.kind {
            option.separator = Some(separator);
        }
        self
    }

    /// Places the option in a mutual-exclusion group. Ignored for positionals.
    pub fn in_set(mut self, set_name: &str) -> Self {
        if let SpecificationKind::Option(option) = &mut self.kind {
            option.set_name = Some(set_name.to_string());
        }
        self
    }

    /// Adds help text.
    pub fn with_help(mut self, text: &str) -> Self {
        self.help_text = Some(text.to_string());
        self
    }

    /// Adds a usage placeholder.
    pub fn with_meta(mut self, meta: &str) -> Self {
        self.meta_value = Some(meta.to_string());
        self
    }

    /// Hides from help output.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Gives an option declared without any name the lowercased member name
    /// as its long name.
    ///
    /// ```
    /// use command_bind_core::{Specification, ValueType};
    ///
    /// let spec = Specification::scalar(None, None, ValueType::Integer).named_after("MaxDepth");
    /// assert_eq!(spec.as_option().and_then(|o| o.long_name.as_deref()), Some("maxdepth"));
    /// ```
    pub fn named_after(mut self, member: &str) -> Self {
        if let SpecificationKind::Option(option) = &mut self.kind {
            if option.short_name.is_none() && option.long_name.is_none() {
                option.long_name = Some(member.to_lowercase());
            }
        }
        self
    }

    pub fn is_option(&self) -> bool {
        matches!(self.kind, SpecificationKind::Option(_))
    }

    pub fn is_value(&self) -> bool {
        matches!(self.kind, SpecificationKind::Value(_))
    }

    /// Option part, if this is an option.
    pub fn as_option(&self) -> Option<&OptionSpecification> {
        match &self.kind {
            SpecificationKind::Option(option) => Some(option),
            SpecificationKind::Value(_) => None,
        }
    }

    /// Positional index, if this is a positional value.
    pub fn index(&self) -> Option<usize> {
        match &self.kind {
            SpecificationKind::Value(value) => Some(value.index),
            SpecificationKind::Option(_) => None,
        }
    }

    /// The separator if this is an option declaring one.
    pub fn separator(&self) -> Option<char> {
        self.as_option().and_then(|o| o.separator)
    }

    /// The mutual-exclusion group, if any.
    pub fn set_name(&self) -> Option<&str> {
        self.as_option().and_then(|o| o.set_name.as_deref())
    }

    /// Whether a name token for this option takes values.
    pub fn takes_value(&self) -> bool {
        self.target != TargetKind::Switch
    }
}

/// Names identifying a member in error messages.
///
/// Options carry their short and/or long name; positional values carry the
/// member name (or meta value) as `long_name`.
///
/// # Examples
///
/// ```
/// use command_bind_core::NameInfo;
///
/// let name = NameInfo::new(Some('n'), Some("num"));
/// assert_eq!(name.name_text(), "num");
/// assert_eq!(name.to_string(), "-n, --num");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
}

impl NameInfo {
    pub fn new(short: Option<char>, long: Option<&str>) -> Self {
        Self {
            short_name: short,
            long_name: long.map(String::from),
        }
    }

    /// The preferred single name (long first).
    pub fn name_text(&self) -> String {
        match (&self.long_name, self.short_name) {
            (Some(long), _) => long.clone(),
            (None, Some(short)) => short.to_string(),
            (None, None) => String::new(),
        }
    }
}

impl fmt::Display for NameInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.short_name, &self.long_name) {
            (Some(short), Some(long)) => write!(f, "-{short}, --{long}"),
            (Some(short), None) => write!(f, "-{short}"),
            (None, Some(long)) => write!(f, "--{long}"),
            (None, None) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_creation() {
        let spec = Specification::switch(Some('v'), Some("verbose")).with_help("Verbose");

        assert!(spec.is_option());
        assert!(!spec.takes_value());
        assert_eq!(spec.value_type, ValueType::Bool);
        assert_eq!(spec.help_text.as_deref(), Some("Verbose"));
    }

    #[test]
    fn test_option_matches_respects_case() {
        let spec = Specification::scalar(Some('o'), Some("output"), ValueType::String);
        let option = spec.as_option().unwrap();

        assert!(option.matches("o", true));
        assert!(option.matches("output", true));
        assert!(!option.matches("OUTPUT", true));
        assert!(option.matches("OUTPUT", false));
        assert!(!option.matches("x", false));
    }

    #[test]
    fn test_positional_ignores_option_builders() {
        let spec = Specification::value(1, ValueType::Integer)
            .with_separator(',')
            .in_set("group");

        assert_eq!(spec.index(), Some(1));
        assert_eq!(spec.separator(), None);
        assert_eq!(spec.set_name(), None);
    }

    #[test]
    fn test_specification_json_round_trip_shape() {
        let spec = Specification::sequence(None, Some("tags"), ValueType::String)
            .with_separator(',')
            .with_range(1, Some(3));
        let json = serde_json::to_value(&spec).unwrap();

        assert_eq!(json["kind"]["option"]["long_name"], "tags");
        assert_eq!(json["target"], "sequence");

        let back: Specification = serde_json::from_value(json).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn test_specification_yaml_uses_nested_maps() {
        let yaml = "kind: { option: { short_name: c, long_name: color } }\nvalue_type: { choice: [Red, Green] }\n";
        let spec: Specification = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(spec.as_option().and_then(|o| o.short_name), Some('c'));
        assert_eq!(
            spec.value_type,
            ValueType::Choice(vec!["Red".into(), "Green".into()])
        );

        let plain: Specification =
            serde_yaml::from_str("kind: { value: { index: 2 } }\nvalue_type: integer\n").unwrap();
        assert_eq!(plain.index(), Some(2));
        assert_eq!(plain.value_type, ValueType::Integer);

        let back: Specification = serde_yaml::from_str(&serde_yaml::to_string(&spec).unwrap()).unwrap();
        assert_eq!(back, spec);
    }
}
