//! Specification model for declarative command-line argument binding.
//!
//! This crate defines the data every binding pass works from:
//!
//! - [`Specification`]: one bindable member: a named option
//!   ([`OptionSpecification`]) or a positional value
//!   ([`ValueSpecification`]), with arity, default, type and grouping.
//! - [`Value`]: typed values, converted to and from Rust fields through
//!   [`FromValue`] / [`ToValue`].
//! - [`Schema`]: a validated list of [`Member`]s of a target type plus the
//!   [`ConstructionStrategy`] used to build instances, created with
//!   [`SchemaBuilder`] or from a [`SchemaDocument`].
//! - [`Error`]: the classified user-input errors produced by binding;
//!   [`SchemaError`]: schema-definition violations.
//!
//! # Example
//!
//! ```
//! use command_bind_core::*;
//!
//! #[derive(Default)]
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
//! assert_eq!(schema.members().len(), 3);
//! assert!(schema.validate(false).is_ok());
//! ```

mod document;
mod error;
mod schema;
mod types;
mod validate;
mod value;

pub use document::{DocumentError, MemberDocument, SchemaDocument, ValueMap};
pub use error::{Error, ErrorKind};
pub use schema::{
    Arguments, ConstructionStrategy, Member, ReleaseError, Schema, SchemaBuilder,
    VerbSpecification,
};
pub use types::*;
pub use validate::{
    SchemaError, is_valid_long_name, is_valid_short_name, validate_specifications,
};
pub use value::{FromValue, ToValue, Value, ValueError};
