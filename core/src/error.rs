//! Binding error taxonomy.
//!
//! Errors produced while binding user input are plain data: every stage
//! returns them next to whatever it could still produce, and the instance
//! builder aggregates them. Schema-definition mistakes are reported
//! separately as [`SchemaError`](crate::SchemaError).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::NameInfo;

/// Tag identifying the kind of an [`Error`].
///
/// Used to select which errors a caller treats as warnings.
///
/// # Examples
///
/// ```
/// use command_bind_core::{Error, ErrorKind};
///
/// let err = Error::UnknownOption { token: "x".into() };
/// assert_eq!(err.kind(), ErrorKind::UnknownOption);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    BadFormatToken,
    UnknownOption,
    MissingValueOption,
    RepeatedOption,
    MissingRequiredOption,
    SequenceOutOfRange,
    BadFormatConversion,
    MutuallyExclusiveSet,
    SetValue,
    NoVerbSelected,
    BadVerbSelected,
}

/// A classified problem with the bound arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Error {
    /// A dash-prefixed argument that is not a well-formed name.
    #[error("token '{token}' is not well formed")]
    BadFormatToken { token: String },

    /// A name that matches no declared option.
    #[error("option '{token}' is unknown")]
    UnknownOption { token: String },

    /// A value-taking option given without a value.
    #[error("option '{name}' has no value")]
    MissingValueOption { name: NameInfo },

    /// A non-sequence option given more than once.
    #[error("option '{name}' is defined multiple times")]
    RepeatedOption { name: NameInfo },

    /// A required member left unresolved.
    #[error("required option '{name}' is missing")]
    MissingRequiredOption { name: NameInfo },

    /// A sequence with fewer than `min` or more than `max` elements.
    #[error("option '{name}' has a number of values out of range")]
    SequenceOutOfRange { name: NameInfo },

    /// A raw string that could not be converted to the member type.
    #[error("option '{name}' cannot accept '{token}': {reason}")]
    BadFormatConversion {
        name: NameInfo,
        token: String,
        reason: String,
    },

    /// More than one member of a mutual-exclusion set was given.
    #[error("options {} cannot be used together (set '{set_name}')", join_names(.names))]
    MutuallyExclusiveSet {
        set_name: String,
        names: Vec<NameInfo>,
    },

    /// The target rejected a resolved value.
    #[error("option '{name}' could not be assigned: {reason}")]
    SetValue { name: NameInfo, reason: String },

    /// Several verbs were offered but none was given.
    #[error("no verb selected")]
    NoVerbSelected,

    /// The first argument names no known verb.
    #[error("verb '{token}' is not recognized")]
    BadVerbSelected { token: String },
}

fn join_names(names: &[NameInfo]) -> String {
    names
        .iter()
        .map(|n| format!("'{n}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// The kind tag of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::BadFormatToken { .. } => ErrorKind::BadFormatToken,
            Error::UnknownOption { .. } => ErrorKind::UnknownOption,
            Error::MissingValueOption { .. } => ErrorKind::MissingValueOption,
            Error::RepeatedOption { .. } => ErrorKind::RepeatedOption,
            Error::MissingRequiredOption { .. } => ErrorKind::MissingRequiredOption,
            Error::SequenceOutOfRange { .. } => ErrorKind::SequenceOutOfRange,
            Error::BadFormatConversion { .. } => ErrorKind::BadFormatConversion,
            Error::MutuallyExclusiveSet { .. } => ErrorKind::MutuallyExclusiveSet,
            Error::SetValue { .. } => ErrorKind::SetValue,
            Error::NoVerbSelected => ErrorKind::NoVerbSelected,
            Error::BadVerbSelected { .. } => ErrorKind::BadVerbSelected,
        }
    }
}
