//! Specification set validation.
//!
//! Catches schema-definition mistakes (malformed or duplicate names, broken
//! positional ordering, inconsistent arity or defaults) before any argument
//! is read, so they are never confused with bad user input.
//!
//! # Examples
//!
//! ```
//! use command_bind_core::*;
//!
//! let verbose = Specification::switch(Some('v'), Some("verbose"));
//! let version = Specification::switch(Some('v'), Some("version"));
//! assert!(validate_specifications(&[("verbose", &verbose)], true).is_empty());
//!
//! let errors = validate_specifications(&[("verbose", &verbose), ("version", &version)], true);
//! assert_eq!(errors, vec![SchemaError::DuplicateName("v".into())]);
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::{Specification, SpecificationKind, TargetKind, ValueType, fold_name};

static LONG_NAME: LazyLock<Regex> = LazyLock::new(|| {
    // Compile-time constant pattern.
    Regex::new(r"^[A-Za-z0-9?][A-Za-z0-9_.?-]*$").expect("static regex must compile")
});

/// Schema-definition violations.
///
/// These are configuration errors detected while building a schema, distinct
/// from the user-input [`Error`](crate::Error)s produced by binding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two members share a name.
    #[error("duplicate member: {0}")]
    DuplicateMember(String),
    /// An option has neither a short nor a long name.
    #[error("option '{0}' must define a short or long name")]
    MissingOptionName(String),
    /// A short name is not a letter, digit or `?`.
    #[error("invalid short name: {0}")]
    InvalidShortName(char),
    /// A long name contains characters outside the name grammar.
    #[error("invalid long name: {0}")]
    InvalidLongName(String),
    /// Two options share a short or long name.
    #[error("duplicate option name: {0}")]
    DuplicateName(String),
    /// Two positional values share an index.
    #[error("duplicate positional index: {0}")]
    DuplicateIndex(usize),
    /// Positional indices do not run contiguously from 0.
    #[error("positional indices must be contiguous from 0, missing {0}")]
    IndexGap(usize),
    /// A positional sequence is followed by another positional.
    #[error("positional sequence '{0}' must be the last positional value")]
    SequenceNotLast(String),
    /// A switch declares a type other than `Bool`, or a positional is a switch.
    #[error("member '{0}' is an invalid switch")]
    InvalidSwitch(String),
    /// `min` exceeds `max`.
    #[error("member '{0}' has min greater than max")]
    InvalidRange(String),
    /// A default value does not match the member type.
    #[error("default value of member '{0}' does not match its type")]
    DefaultTypeMismatch(String),
    /// A choice type lists no names.
    #[error("member '{0}' declares an empty choice list")]
    EmptyChoice(String),
    /// A mutable schema member has no setter.
    #[error("member '{0}' of a mutable schema is read-only")]
    ReadOnlyMember(String),
    /// A schema registered as a verb declares no verb.
    #[error("schema '{0}' declares no verb")]
    MissingVerb(String),
    /// A factory was supplied for a schema built by a constructor.
    #[error("schema '{0}' is immutable and cannot use a factory")]
    FactoryOnImmutable(String),
}

/// Returns `true` if `name` is a well-formed long option name.
///
/// # Examples
///
/// ```
/// use command_bind_core::is_valid_long_name;
///
/// assert!(is_valid_long_name("dry-run"));
/// assert!(!is_valid_long_name("-x"));
/// assert!(!is_valid_long_name("a b"));
/// ```
pub fn is_valid_long_name(name: &str) -> bool {
    LONG_NAME.is_match(name)
}

/// Returns `true` if `c` may be used as a short option name.
pub fn is_valid_short_name(c: char) -> bool {
    c.is_alphanumeric() || c == '?'
}

/// Validates a set of `(member name, specification)` pairs.
///
/// Checks member names, option names (compared case-insensitively when
/// `case_sensitive` is false), positional indices, switch shape, arity and
/// default values. Stops at the first violation.
pub fn validate_specifications(
    members: &[(&str, &Specification)],
    case_sensitive: bool,
) -> Vec<SchemaError> {
    let mut errors = Vec::new();

    let mut seen_members = HashSet::new();
    for (member, spec) in members {
        if !seen_members.insert(*member) {
            errors.push(SchemaError::DuplicateMember(member.to_string()));
            return errors;
        }
        errors.extend(validate_member(member, spec));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors.extend(validate_names(members, case_sensitive));
    if !errors.is_empty() {
        return errors;
    }

    errors.extend(validate_indices(members));
    errors
}

fn validate_member(member: &str, spec: &Specification) -> Vec<SchemaError> {
    let mut errors = Vec::new();

    if spec.target == TargetKind::Switch
        && (spec.value_type != ValueType::Bool || spec.is_value())
    {
        errors.push(SchemaError::InvalidSwitch(member.to_string()));
        return errors;
    }

    if let ValueType::Choice(names) = &spec.value_type {
        if names.is_empty() {
            errors.push(SchemaError::EmptyChoice(member.to_string()));
            return errors;
        }
    }

    if let (Some(min), Some(max)) = (spec.min, spec.max) {
        if min > max {
            errors.push(SchemaError::InvalidRange(member.to_string()));
            return errors;
        }
    }

    if let Some(default) = &spec.default {
        if !default.conforms_to(&spec.value_type, spec.target) {
            errors.push(SchemaError::DefaultTypeMismatch(member.to_string()));
        }
    }

    errors
}

fn validate_names(members: &[(&str, &Specification)], case_sensitive: bool) -> Vec<SchemaError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let key = |name: &str| fold_name(name, case_sensitive).into_owned();

    for (member, spec) in members {
        let SpecificationKind::Option(option) = &spec.kind else {
            continue;
        };

        if option.short_name.is_none() && option.long_name.is_none() {
            errors.push(SchemaError::MissingOptionName(member.to_string()));
            return errors;
        }

        if let Some(short) = option.short_name {
            if !is_valid_short_name(short) {
                errors.push(SchemaError::InvalidShortName(short));
                return errors;
            }
            if !seen.insert(key(&short.to_string())) {
                errors.push(SchemaError::DuplicateName(short.to_string()));
                return errors;
            }
        }

        if let Some(long) = &option.long_name {
            if !is_valid_long_name(long) {
                errors.push(SchemaError::InvalidLongName(long.clone()));
                return errors;
            }
            if !seen.insert(key(long)) {
                errors.push(SchemaError::DuplicateName(long.clone()));
                return errors;
            }
        }
    }

    errors
}

fn validate_indices(members: &[(&str, &Specification)]) -> Vec<SchemaError> {
    let mut errors = Vec::new();
    let mut positionals: Vec<(usize, &str, &Specification)> = members
        .iter()
        .filter_map(|(member, spec)| spec.index().map(|index| (index, *member, *spec)))
        .collect();
    positionals.sort_by_key(|(index, _, _)| *index);

    for (expected, (index, _, _)) in positionals.iter().enumerate() {
        if *index < expected {
            errors.push(SchemaError::DuplicateIndex(*index));
            return errors;
        }
        if *index > expected {
            errors.push(SchemaError::IndexGap(expected));
            return errors;
        }
    }

    let last = positionals.len().saturating_sub(1);
    if let Some((_, member, _)) = positionals
        .iter()
        .enumerate()
        .find(|(i, (_, _, spec))| *i < last && spec.target == TargetKind::Sequence)
        .map(|(_, entry)| entry)
    {
        errors.push(SchemaError::SequenceNotLast(member.to_string()));
    }

    errors
}
