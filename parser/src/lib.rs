//! Argument binding pipeline.
//!
//! Raw argument strings pass through these stages:
//!
//! 1. [`tokenize`] classifies each string as a name, a value or the `--`
//!    separator;
//! 2. [`partition`] assigns values to the options that consume them and
//!    collects positional values and leftovers;
//! 3. the mapper converts raw strings to typed [`Value`](command_bind_core::Value)s
//!    per member ([`convert`]);
//! 4. [`InstanceBuilder`] fills defaults, constructs the target instance,
//!    applies the required and mutual-exclusion rules and returns a
//!    [`ParserResult`].
//!
//! [`Unparser`] runs the other way, formatting an instance as a command
//! line the pipeline reads back to an equal instance. [`VerbSet`] selects
//! one of several schemas by a leading command word.
//!
//! # Example
//!
//! ```
//! use command_bind_core::{SchemaBuilder, Specification, ValueType};
//! use command_bind_parser::Parser;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct AppOptions {
//!     bla: bool,
//!     blub: Option<String>,
//!     num: i32,
//! }
//!
//! let schema = SchemaBuilder::mutable("AppOptions", AppOptions::default)
//!     .field("bla", Specification::switch(None, Some("bla")), |o| &o.bla, |o| &mut o.bla)
//!     .field("blub", Specification::scalar(None, Some("blub"), ValueType::String), |o| &o.blub, |o| &mut o.blub)
//!     .field("num", Specification::scalar(None, Some("num"), ValueType::Integer).with_default(3), |o| &o.num, |o| &mut o.num)
//!     .build()
//!     .unwrap();
//!
//! let result = Parser::default()
//!     .parse_arguments(&schema, &["--bla", "--blub", "hello world"])
//!     .unwrap();
//! assert_eq!(
//!     result.value(),
//!     Some(&AppOptions { bla: true, blub: Some("hello world".into()), num: 3 })
//! );
//! ```

mod builder;
mod convert;
mod lookup;
mod mapper;
mod partition;
mod property;
mod result;
mod rules;
mod settings;
mod tokenizer;
mod unparse;
mod verbs;

pub use builder::InstanceBuilder;
pub use convert::{ConversionError, convert};
pub use lookup::NameLookup;
pub use mapper::{Mapped, map_options, map_overflow, map_unmatched, map_values};
pub use partition::{Occurrence, Overflow, Partitions, partition};
pub use property::{Resolution, SpecificationProperty};
pub use result::{NotParsed, Parsed, ParserResult};
pub use rules::{enforce_mutually_exclusive_set, enforce_required};
pub use settings::{ParserSettings, SettingsError, UnparserSettings};
pub use tokenizer::{Token, Tokenized, tokenize};
pub use unparse::{Unparser, format_with_quotes, split_command_line};
pub use verbs::VerbSet;

use command_bind_core::{Schema, SchemaError};

/// Entry point binding argument lists with fixed settings.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    settings: ParserSettings,
}

impl Parser {
    pub fn new(settings: ParserSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    /// Binds `args` to a new instance of the schema's target type.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the schema is invalid for the configured
    /// case sensitivity.
    pub fn parse_arguments<T, S: AsRef<str>>(
        &self,
        schema: &Schema<T>,
        args: &[S],
    ) -> Result<ParserResult<T>, SchemaError> {
        InstanceBuilder::new(&self.settings).build(schema, args, None)
    }

    /// Binds `args` to an instance created by `factory` instead of the
    /// schema's own constructor.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::FactoryOnImmutable`] for schemas built with
    /// [`SchemaBuilder::immutable`](command_bind_core::SchemaBuilder::immutable).
    pub fn parse_with_factory<T, S: AsRef<str>>(
        &self,
        schema: &Schema<T>,
        factory: impl Fn() -> T,
        args: &[S],
    ) -> Result<ParserResult<T>, SchemaError> {
        InstanceBuilder::new(&self.settings).build(schema, args, Some(&factory))
    }
}
