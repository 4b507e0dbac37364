//! Dynamic values and their conversion to and from Rust field types.
//!
//! The binding pipeline works on [`Value`]s; typed members convert through
//! [`FromValue`] and [`ToValue`] at the edges (setters, constructors and the
//! unparser).

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{TargetKind, ValueType};

/// A typed value produced by conversion or declared as a default.
///
/// # Examples
///
/// ```
/// use command_bind_core::Value;
///
/// let tags = Value::Sequence(vec![Value::from("a"), Value::from("b c")]);
/// assert_eq!(tags.to_string(), "a b c");
/// assert!(Value::from("").is_empty());
/// assert!(!Value::Integer(3).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean (switches and `Bool` scalars).
    Bool(bool),
    /// Signed integer.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Free-form string.
    String(String),
    /// Single character.
    Char(char),
    /// One of a declared set of names, stored with its declared spelling.
    Choice(String),
    /// Ordered elements of a sequence member.
    Sequence(Vec<Value>),
}

impl Value {
    /// The "zero" value for a member of the given shape.
    ///
    /// Choices have no zero and yield `None`.
    pub fn zero(value_type: &ValueType, target: TargetKind) -> Option<Value> {
        match target {
            TargetKind::Switch => Some(Value::Bool(false)),
            TargetKind::Sequence => Some(Value::Sequence(Vec::new())),
            TargetKind::Scalar => match value_type {
                ValueType::Bool => Some(Value::Bool(false)),
                ValueType::String => Some(Value::String(String::new())),
                ValueType::Integer => Some(Value::Integer(0)),
                ValueType::Float => Some(Value::Float(0.0)),
                ValueType::Char => Some(Value::Char('\0')),
                ValueType::Choice(_) => None,
            },
        }
    }

    /// Whether the value is considered empty for unparsing.
    ///
    /// `false`, zero numbers, `'\0'`, empty strings and empty sequences are
    /// empty; choices never are.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Bool(b) => !b,
            Value::Integer(n) => *n == 0,
            Value::Float(f) => *f == 0.0,
            Value::String(s) => s.is_empty(),
            Value::Char(c) => *c == '\0',
            Value::Choice(_) => false,
            Value::Sequence(items) => items.is_empty(),
        }
    }

    /// Short label for the variant, used in conversion errors.
    pub fn type_label(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Char(_) => "char",
            Value::Choice(_) => "choice",
            Value::Sequence(_) => "sequence",
        }
    }

    /// Returns `true` if the value has the shape a member declares.
    pub fn conforms_to(&self, value_type: &ValueType, target: TargetKind) -> bool {
        match (target, self) {
            (TargetKind::Switch, Value::Bool(_)) => true,
            (TargetKind::Switch, _) => false,
            (TargetKind::Sequence, Value::Sequence(items)) => items
                .iter()
                .all(|item| item.conforms_to(value_type, TargetKind::Scalar)),
            (TargetKind::Sequence, _) => false,
            (TargetKind::Scalar, value) => matches!(
                (value_type, value),
                (ValueType::Bool, Value::Bool(_))
                    | (ValueType::String, Value::String(_))
                    | (ValueType::Integer, Value::Integer(_))
                    | (ValueType::Float, Value::Float(_))
                    | (ValueType::Char, Value::Char(_))
                    | (ValueType::Choice(_), Value::Choice(_))
            ),
        }
    }

    /// Reshapes a loosely typed value (as read from JSON or YAML) into the
    /// declared shape.
    ///
    /// Strings become choices (matched case-insensitively) or chars,
    /// integers widen to floats, and sequences are coerced element-wise.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_bind_core::{TargetKind, Value, ValueType};
    ///
    /// let color = ValueType::Choice(vec!["Red".into(), "Green".into()]);
    /// let value = Value::from("green").coerce(&color, TargetKind::Scalar).unwrap();
    /// assert_eq!(value, Value::Choice("Green".into()));
    /// ```
    pub fn coerce(self, value_type: &ValueType, target: TargetKind) -> Result<Value, ValueError> {
        if self.conforms_to(value_type, target) {
            return Ok(self);
        }
        match (target, self) {
            (TargetKind::Sequence, Value::Sequence(items)) => items
                .into_iter()
                .map(|item| item.coerce(value_type, TargetKind::Scalar))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Sequence),
            (TargetKind::Scalar, value) => match (value_type, value) {
                (ValueType::Float, Value::Integer(n)) => Ok(Value::Float(n as f64)),
                (ValueType::Char, Value::String(s)) => {
                    let mut chars = s.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Ok(Value::Char(c)),
                        _ => Err(ValueError::TypeMismatch {
                            expected: "char",
                            found: "string",
                        }),
                    }
                }
                (ValueType::Choice(names), Value::String(s) | Value::Choice(s)) => names
                    .iter()
                    .find(|name| name.eq_ignore_ascii_case(&s))
                    .map(|name| Value::Choice(name.clone()))
                    .ok_or(ValueError::UnknownChoice(s)),
                (ValueType::String, Value::Choice(s)) => Ok(Value::String(s)),
                (_, value) => Err(ValueError::TypeMismatch {
                    expected: value_type.label(),
                    found: value.type_label(),
                }),
            },
            (_, value) => Err(ValueError::TypeMismatch {
                expected: target.label(),
                found: value.type_label(),
            }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) | Value::Choice(s) => f.write_str(s),
            Value::Char(c) => write!(f, "{c}"),
            Value::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

/// Failure converting between a [`Value`] and a Rust type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The value has a different shape than the target type.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// An integer does not fit the target width.
    #[error("{value} is out of range for {target}")]
    OutOfRange { value: i64, target: &'static str },
    /// A string does not name any declared choice.
    #[error("'{0}' is not a valid choice")]
    UnknownChoice(String),
    /// A constructor asked for a parameter no member provides.
    #[error("no member named '{0}'")]
    UnknownParameter(String),
}

/// Conversion from a bound [`Value`] into a field type.
///
/// Implement this for enums bound to [`ValueType::Choice`] members:
///
/// ```
/// use command_bind_core::{FromValue, Value, ValueError};
///
/// #[derive(Debug, PartialEq)]
/// enum Level { Low, High }
///
/// impl FromValue for Level {
///     fn from_value(value: Value) -> Result<Self, ValueError> {
///         match value {
///             Value::Choice(name) if name == "Low" => Ok(Level::Low),
///             Value::Choice(name) if name == "High" => Ok(Level::High),
///             Value::Choice(name) => Err(ValueError::UnknownChoice(name)),
///             other => Err(ValueError::TypeMismatch { expected: "choice", found: other.type_label() }),
///         }
///     }
/// }
///
/// assert_eq!(Level::from_value(Value::Choice("High".into())), Ok(Level::High));
/// ```
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

/// Conversion from a field into a [`Value`] for unparsing.
///
/// `None` means the field holds no value at all (e.g. an unset `Option`).
pub trait ToValue {
    fn to_value(&self) -> Option<Value>;
}

fn mismatch(expected: &'static str, found: &Value) -> ValueError {
    ValueError::TypeMismatch {
        expected,
        found: found.type_label(),
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(value)
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Option<Value> {
        Some(self.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Bool(*self))
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::String(s) | Value::Choice(s) => Ok(s),
            other => Err(mismatch("string", &other)),
        }
    }
}

impl ToValue for String {
    fn to_value(&self) -> Option<Value> {
        Some(Value::String(self.clone()))
    }
}

impl FromValue for PathBuf {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        String::from_value(value).map(PathBuf::from)
    }
}

impl ToValue for PathBuf {
    fn to_value(&self) -> Option<Value> {
        Some(Value::String(self.to_string_lossy().into_owned()))
    }
}

impl FromValue for char {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Char(c) => Ok(c),
            other => Err(mismatch("char", &other)),
        }
    }
}

impl ToValue for char {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Char(*self))
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(x) => Ok(x),
            Value::Integer(n) => Ok(n as f64),
            other => Err(mismatch("float", &other)),
        }
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Float(*self))
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        f64::from_value(value).map(|x| x as f32)
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Float(f64::from(*self)))
    }
}

macro_rules! integer_value {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ValueError> {
                    match value {
                        Value::Integer(n) => <$ty>::try_from(n).map_err(|_| ValueError::OutOfRange {
                            value: n,
                            target: stringify!($ty),
                        }),
                        other => Err(mismatch("integer", &other)),
                    }
                }
            }

            impl ToValue for $ty {
                fn to_value(&self) -> Option<Value> {
                    i64::try_from(*self).ok().map(Value::Integer)
                }
            }
        )*
    };
}

integer_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        T::from_value(value).map(Some)
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Option<Value> {
        self.as_ref().and_then(ToValue::to_value)
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Sequence(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(mismatch("sequence", &other)),
        }
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Sequence(
            self.iter().filter_map(ToValue::to_value).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_conversion_checks_width() {
        assert_eq!(u8::from_value(Value::Integer(200)), Ok(200));
        assert_eq!(
            u8::from_value(Value::Integer(300)),
            Err(ValueError::OutOfRange {
                value: 300,
                target: "u8"
            })
        );
        assert!(u32::from_value(Value::Integer(-1)).is_err());
    }

    #[test]
    fn test_option_and_vec_conversion() {
        let tags: Vec<String> =
            Vec::from_value(Value::Sequence(vec!["a".into(), "b".into()])).unwrap();
        assert_eq!(tags, vec!["a", "b"]);

        let missing: Option<String> = None;
        assert_eq!(missing.to_value(), None);
        assert_eq!(Some(5_i32).to_value(), Some(Value::Integer(5)));
    }

    #[test]
    fn test_coerce_reshapes_loose_values() {
        let value = Value::Sequence(vec![Value::Integer(1), Value::Integer(2)])
            .coerce(&ValueType::Float, TargetKind::Sequence)
            .unwrap();
        assert_eq!(
            value,
            Value::Sequence(vec![Value::Float(1.0), Value::Float(2.0)])
        );

        assert_eq!(
            Value::from("x").coerce(&ValueType::Char, TargetKind::Scalar),
            Ok(Value::Char('x'))
        );
        assert!(
            Value::from("xy")
                .coerce(&ValueType::Char, TargetKind::Scalar)
                .is_err()
        );
        assert_eq!(
            Value::from("blue").coerce(
                &ValueType::Choice(vec!["Red".into()]),
                TargetKind::Scalar
            ),
            Err(ValueError::UnknownChoice("blue".into()))
        );
    }

    #[test]
    fn test_empty_values() {
        assert!(Value::Bool(false).is_empty());
        assert!(Value::Float(0.0).is_empty());
        assert!(Value::Sequence(Vec::new()).is_empty());
        assert!(!Value::Choice("Red".into()).is_empty());
        assert!(!Value::Bool(true).is_empty());
    }
}
