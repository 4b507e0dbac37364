//! Runs the binding pipeline and constructs the target instance.

use command_bind_core::{
    Arguments, ConstructionStrategy, Error, NameInfo, Schema, SchemaError, ValueError,
};
use tracing::debug;

use crate::mapper::{map_options, map_overflow, map_unmatched, map_values};
use crate::rules::{enforce_mutually_exclusive_set, enforce_required};
use crate::{
    NameLookup, ParserResult, ParserSettings, Resolution, SpecificationProperty, partition,
    tokenize,
};

/// Binds argument lists to instances of a schema's target type.
#[derive(Debug, Clone, Copy)]
pub struct InstanceBuilder<'s> {
    settings: &'s ParserSettings,
}

impl<'s> InstanceBuilder<'s> {
    pub fn new(settings: &'s ParserSettings) -> Self {
        Self { settings }
    }

    /// Binds `args` to a new instance.
    ///
    /// `factory`, when given, replaces the schema's own way of creating a
    /// mutable instance.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] when the schema is invalid under the
    /// configured case sensitivity or when a factory is supplied for an
    /// immutable schema. User-input problems are reported through
    /// [`ParserResult::NotParsed`] instead.
    pub fn build<T, S: AsRef<str>>(
        &self,
        schema: &Schema<T>,
        args: &[S],
        factory: Option<&dyn Fn() -> T>,
    ) -> Result<ParserResult<T>, SchemaError> {
        let settings = self.settings;
        if !settings.case_sensitive {
            schema.validate(false)?;
        }
        if factory.is_some() && !schema.strategy().is_mutable() {
            return Err(SchemaError::FactoryOnImmutable(schema.name().to_string()));
        }

        let members = schema.members();
        let lookup = NameLookup::new(schema.specifications(), settings.case_sensitive);
        let tokenized = tokenize(args, &lookup, settings.enable_separator);
        if tokenized.tokens.is_empty() && !tokenized.errors.is_empty() {
            return Ok(ParserResult::not_parsed(schema.name(), tokenized.errors));
        }

        let partitions = partition(tokenized.tokens, &lookup);
        let unmatched_errors = map_unmatched(&partitions.unmatched, &lookup, members, settings);
        let mut options = map_options(members, &partitions.options, settings);
        let values = map_values(members, &partitions.values, settings);
        map_overflow(members, &partitions.overflow, values.consumed, &mut options);

        let properties: Vec<SpecificationProperty<'_, T>> = members
            .iter()
            .zip(options.values.into_iter().zip(values.values))
            .map(|(member, (option, value))| {
                let resolution = match option.or(value) {
                    Some(value) => Resolution::Parsed(value),
                    None => Resolution::Unresolved,
                };
                SpecificationProperty::new(member, resolution).resolve_default()
            })
            .collect();

        let (instance, set_errors) = construct(schema, &properties, factory);
        let rule_errors: Vec<Error> = enforce_required(&properties)
            .into_iter()
            .chain(enforce_mutually_exclusive_set(&properties))
            .collect();

        let errors: Vec<Error> = tokenized
            .errors
            .into_iter()
            .chain(unmatched_errors)
            .chain(options.errors)
            .chain(values.errors)
            .chain(set_errors)
            .chain(rule_errors)
            .collect();

        Ok(self.finish(schema, instance, errors))
    }

    fn finish<T>(&self, schema: &Schema<T>, instance: Option<T>, errors: Vec<Error>) -> ParserResult<T> {
        let fatal = errors
            .iter()
            .any(|err| !self.settings.is_non_fatal(err.kind()));
        debug!(
            schema = schema.name(),
            errors = errors.len(),
            fatal,
            "Bound arguments"
        );

        match instance {
            Some(value) if !fatal => ParserResult::parsed(value, errors),
            Some(mut value) => {
                if let Err(err) = schema.release(&mut value) {
                    debug!(schema = schema.name(), error = %err, "Release hook failed");
                }
                drop(value);
                ParserResult::not_parsed(schema.name(), errors)
            }
            None => ParserResult::not_parsed(schema.name(), errors),
        }
    }
}

/// Builds the instance from resolved properties.
///
/// Returns `None` when an immutable constructor fails; setter failures on a
/// mutable instance are reported but leave the instance in place.
fn construct<T>(
    schema: &Schema<T>,
    properties: &[SpecificationProperty<'_, T>],
    factory: Option<&dyn Fn() -> T>,
) -> (Option<T>, Vec<Error>) {
    let mut errors = Vec::new();

    match schema.strategy() {
        ConstructionStrategy::Mutate { create, setters } => {
            let mut instance = match factory {
                Some(factory) => factory(),
                None => create(),
            };
            for (prop, setter) in properties.iter().zip(setters) {
                let Some(value) = prop.value() else {
                    continue;
                };
                if let Err(err) = setter(&mut instance, value.clone()) {
                    errors.push(Error::SetValue {
                        name: prop.name_info(),
                        reason: err.to_string(),
                    });
                }
            }
            (Some(instance), errors)
        }
        ConstructionStrategy::Inject { construct } => {
            let mut arguments = Arguments::default();
            for prop in properties {
                arguments.insert(prop.member().name(), prop.value().cloned());
            }
            match construct(&mut arguments) {
                Ok(instance) => (Some(instance), errors),
                Err(err) => {
                    let name = match &err {
                        ValueError::UnknownParameter(parameter) => {
                            NameInfo::new(None, Some(parameter))
                        }
                        _ => NameInfo::new(None, Some(schema.name())),
                    };
                    errors.push(Error::SetValue {
                        name,
                        reason: err.to_string(),
                    });
                    (None, errors)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use command_bind_core::{ErrorKind, SchemaBuilder, Specification, ValueType};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default, PartialEq)]
    struct Opts {
        verbose: bool,
        count: i32,
        name: Option<String>,
    }

    fn schema() -> Schema<Opts> {
        SchemaBuilder::mutable("Opts", Opts::default)
            .field(
                "verbose",
                Specification::switch(Some('v'), Some("verbose")),
                |o| &o.verbose,
                |o| &mut o.verbose,
            )
            .field(
                "count",
                Specification::scalar(Some('c'), Some("count"), ValueType::Integer).with_default(1),
                |o| &o.count,
                |o| &mut o.count,
            )
            .field(
                "name",
                Specification::value(0, ValueType::String),
                |o| &o.name,
                |o| &mut o.name,
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_binds_mutable_instance() {
        let settings = ParserSettings::default();
        let result = InstanceBuilder::new(&settings)
            .build(&schema(), &["-v", "x", "--count", "4"], None)
            .unwrap();

        assert_eq!(
            result.value(),
            Some(&Opts {
                verbose: true,
                count: 4,
                name: Some("x".into()),
            })
        );
    }

    #[test]
    fn test_defaults_fill_unparsed_members() {
        let settings = ParserSettings::default();
        let no_args: [&str; 0] = [];
        let result = InstanceBuilder::new(&settings)
            .build(&schema(), &no_args, None)
            .unwrap();

        assert_eq!(
            result.value(),
            Some(&Opts {
                verbose: false,
                count: 1,
                name: None,
            })
        );
    }

    #[test]
    fn test_tokenizer_errors_alone_stop_early() {
        let settings = ParserSettings::default();
        let result = InstanceBuilder::new(&settings)
            .build(&schema(), &["--=x"], None)
            .unwrap();

        assert_eq!(
            result.errors(),
            &[Error::BadFormatToken {
                token: "--=x".into()
            }]
        );
    }

    #[test]
    fn test_non_fatal_errors_become_warnings() {
        let settings = ParserSettings::default().with_non_fatal(ErrorKind::UnknownOption);
        let result = InstanceBuilder::new(&settings)
            .build(&schema(), &["--bogus", "-v"], None)
            .unwrap();

        assert!(result.is_parsed());
        assert_eq!(result.warnings()[0].kind(), ErrorKind::UnknownOption);
        assert!(result.value().is_some_and(|o| o.verbose));
    }

    #[test]
    fn test_case_insensitive_pass_revalidates_schema() {
        let schema = SchemaBuilder::mutable("Opts", Opts::default)
            .field("a", Specification::switch(Some('v'), None), |o| &o.verbose, |o| &mut o.verbose)
            .field(
                "b",
                Specification::scalar(Some('V'), None, ValueType::Integer),
                |o| &o.count,
                |o| &mut o.count,
            )
            .build()
            .unwrap();
        let settings = ParserSettings::default().with_case_sensitive(false);

        let result = InstanceBuilder::new(&settings).build(&schema, &["-v"], None);
        assert_eq!(result.unwrap_err(), SchemaError::DuplicateName("V".into()));
    }

    #[test]
    fn test_factory_replaces_create() {
        let settings = ParserSettings::default();
        let factory = || Opts {
            count: 99,
            name: Some("preset".into()),
            ..Opts::default()
        };
        let result = InstanceBuilder::new(&settings)
            .build(&schema(), &["-v"], Some(&factory))
            .unwrap();

        // declared default still overrides the factory value
        assert_eq!(result.value().map(|o| o.count), Some(1));
        assert_eq!(result.value().and_then(|o| o.name.clone()), Some("preset".into()));
    }

    #[test]
    fn test_release_hook_runs_on_failure() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);
        let schema = SchemaBuilder::mutable("Opts", Opts::default)
            .field(
                "count",
                Specification::scalar(None, Some("count"), ValueType::Integer),
                |o| &o.count,
                |o| &mut o.count,
            )
            .release_with(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Err("cannot release".into())
            })
            .build()
            .unwrap();
        let settings = ParserSettings::default();
        let builder = InstanceBuilder::new(&settings);

        let result = builder.build(&schema, &["--count", "x"], None).unwrap();
        assert!(!result.is_parsed());
        assert_eq!(released.load(Ordering::SeqCst), 1);

        let result = builder.build(&schema, &["--count", "3"], None).unwrap();
        assert!(result.is_parsed());
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_setter_failure_is_set_value_error() {
        let schema = SchemaBuilder::mutable("Opts", Opts::default)
            .field(
                "count",
                Specification::scalar(None, Some("count"), ValueType::Integer),
                |o| &o.count,
                |o| &mut o.count,
            )
            .build()
            .unwrap();
        let settings = ParserSettings::default();

        let result = InstanceBuilder::new(&settings)
            .build(&schema, &["--count", "99999999999"], None)
            .unwrap();
        assert!(matches!(result.errors(), [Error::SetValue { .. }]));
    }
}
