//! Conversion of raw argument strings to typed values.

use std::num::{ParseFloatError, ParseIntError};

use command_bind_core::{Value, ValueType};
use thiserror::Error;

/// Why a raw string could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("expected 'true' or 'false'")]
    InvalidBool,

    #[error("invalid integer: {0}")]
    InvalidInteger(#[from] ParseIntError),

    #[error("invalid number: {0}")]
    InvalidFloat(#[from] ParseFloatError),

    /// A number written with a decimal separator other than the configured one.
    #[error("expected '{0}' as decimal separator")]
    DecimalSeparator(char),

    #[error("expected a single character")]
    NotAChar,

    #[error("valid values are: {}", .0.join(", "))]
    UnknownChoice(Vec<String>),
}

/// Converts `raw` to a value of `value_type`.
///
/// Booleans and choice names match case-insensitively; a matched choice
/// yields its declared spelling.
///
/// # Examples
///
/// ```
/// use command_bind_core::{Value, ValueType};
/// use command_bind_parser::convert;
///
/// assert_eq!(convert("TRUE", &ValueType::Bool, '.'), Ok(Value::Bool(true)));
/// assert_eq!(convert("2,5", &ValueType::Float, ','), Ok(Value::Float(2.5)));
///
/// let color = ValueType::Choice(vec!["Red".into(), "Green".into()]);
/// assert_eq!(convert("red", &color, '.'), Ok(Value::Choice("Red".into())));
/// assert_eq!(
///     convert("blue", &color, '.').unwrap_err().to_string(),
///     "valid values are: Red, Green"
/// );
/// ```
pub fn convert(
    raw: &str,
    value_type: &ValueType,
    decimal_separator: char,
) -> Result<Value, ConversionError> {
    match value_type {
        ValueType::String => Ok(Value::String(raw.to_string())),
        ValueType::Bool => {
            if raw.eq_ignore_ascii_case("true") {
                Ok(Value::Bool(true))
            } else if raw.eq_ignore_ascii_case("false") {
                Ok(Value::Bool(false))
            } else {
                Err(ConversionError::InvalidBool)
            }
        }
        ValueType::Integer => Ok(Value::Integer(raw.parse()?)),
        ValueType::Float => convert_float(raw, decimal_separator),
        ValueType::Char => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(c)),
                _ => Err(ConversionError::NotAChar),
            }
        }
        ValueType::Choice(names) => names
            .iter()
            .find(|name| name.eq_ignore_ascii_case(raw))
            .map(|name| Value::Choice(name.clone()))
            .ok_or_else(|| ConversionError::UnknownChoice(names.clone())),
    }
}

fn convert_float(raw: &str, decimal_separator: char) -> Result<Value, ConversionError> {
    if decimal_separator == '.' {
        return Ok(Value::Float(raw.parse()?));
    }
    if raw.contains('.') {
        return Err(ConversionError::DecimalSeparator(decimal_separator));
    }
    let normalized = raw.replace(decimal_separator, ".");
    Ok(Value::Float(normalized.parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers() {
        assert_eq!(convert("-42", &ValueType::Integer, '.'), Ok(Value::Integer(-42)));
        assert!(matches!(
            convert("4x", &ValueType::Integer, '.'),
            Err(ConversionError::InvalidInteger(_))
        ));
    }

    #[test]
    fn test_floats_follow_decimal_separator() {
        assert_eq!(convert("1.5", &ValueType::Float, '.'), Ok(Value::Float(1.5)));
        assert_eq!(convert("-3", &ValueType::Float, '.'), Ok(Value::Float(-3.0)));
        assert_eq!(
            convert("1.5", &ValueType::Float, ','),
            Err(ConversionError::DecimalSeparator(','))
        );
    }

    #[test]
    fn test_bool_and_char() {
        assert_eq!(convert("False", &ValueType::Bool, '.'), Ok(Value::Bool(false)));
        assert_eq!(convert("yes", &ValueType::Bool, '.'), Err(ConversionError::InvalidBool));
        assert_eq!(convert("x", &ValueType::Char, '.'), Ok(Value::Char('x')));
        assert_eq!(convert("xy", &ValueType::Char, '.'), Err(ConversionError::NotAChar));
        assert_eq!(convert("", &ValueType::Char, '.'), Err(ConversionError::NotAChar));
    }

    #[test]
    fn test_strings_are_verbatim() {
        assert_eq!(
            convert(" a b ", &ValueType::String, '.'),
            Ok(Value::String(" a b ".into()))
        );
    }
}
