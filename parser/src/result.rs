//! Outcome of a binding pass.

use command_bind_core::Error;
use thiserror::Error;

/// A successfully bound instance with the errors demoted to warnings.
#[derive(Debug)]
pub struct Parsed<T> {
    pub value: T,
    pub warnings: Vec<Error>,
}

/// A failed binding pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{type_name} could not be bound ({} error(s))", .errors.len())]
pub struct NotParsed {
    /// Name of the target type.
    pub type_name: String,
    /// Every error found, in pipeline order.
    pub errors: Vec<Error>,
}

/// Either a bound instance or the errors that prevented binding.
///
/// # Examples
///
/// ```
/// use command_bind_core::Error;
/// use command_bind_parser::{NotParsed, ParserResult};
///
/// let failed: ParserResult<i32> = ParserResult::NotParsed(NotParsed {
///     type_name: "Opts".into(),
///     errors: vec![Error::NoVerbSelected],
/// });
/// assert!(!failed.is_parsed());
/// assert_eq!(failed.errors().len(), 1);
/// assert!(failed.into_result().is_err());
/// ```
#[derive(Debug)]
pub enum ParserResult<T> {
    Parsed(Parsed<T>),
    NotParsed(NotParsed),
}

impl<T> ParserResult<T> {
    pub(crate) fn parsed(value: T, warnings: Vec<Error>) -> Self {
        ParserResult::Parsed(Parsed { value, warnings })
    }

    pub(crate) fn not_parsed(type_name: &str, errors: Vec<Error>) -> Self {
        ParserResult::NotParsed(NotParsed {
            type_name: type_name.to_string(),
            errors,
        })
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, ParserResult::Parsed(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            ParserResult::Parsed(parsed) => Some(&parsed.value),
            ParserResult::NotParsed(_) => None,
        }
    }

    /// Errors of a failed pass; empty when parsed.
    pub fn errors(&self) -> &[Error] {
        match self {
            ParserResult::Parsed(_) => &[],
            ParserResult::NotParsed(not_parsed) => &not_parsed.errors,
        }
    }

    /// Warnings of a successful pass; empty when not parsed.
    pub fn warnings(&self) -> &[Error] {
        match self {
            ParserResult::Parsed(parsed) => &parsed.warnings,
            ParserResult::NotParsed(_) => &[],
        }
    }

    /// Maps the bound value, keeping warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParserResult<U> {
        match self {
            ParserResult::Parsed(Parsed { value, warnings }) => ParserResult::parsed(f(value), warnings),
            ParserResult::NotParsed(not_parsed) => ParserResult::NotParsed(not_parsed),
        }
    }

    pub fn into_result(self) -> Result<Parsed<T>, NotParsed> {
        match self {
            ParserResult::Parsed(parsed) => Ok(parsed),
            ParserResult::NotParsed(not_parsed) => Err(not_parsed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_keeps_warnings() {
        let result = ParserResult::parsed(
            2,
            vec![Error::UnknownOption {
                token: "x".into(),
            }],
        )
        .map(|n| n * 10);

        assert_eq!(result.value(), Some(&20));
        assert_eq!(result.warnings().len(), 1);
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_not_parsed_display() {
        let err = NotParsed {
            type_name: "Opts".into(),
            errors: vec![Error::NoVerbSelected, Error::NoVerbSelected],
        };
        assert_eq!(err.to_string(), "Opts could not be bound (2 error(s))");
    }
}
