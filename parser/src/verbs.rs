//! Selecting one of several schemas by a leading verb.

use command_bind_core::{Error, Schema, SchemaError, VerbSpecification};
use tracing::debug;

use crate::{Parser, ParserResult};

type Bind<'s, R> = Box<dyn Fn(&Parser, &[String]) -> Result<ParserResult<R>, SchemaError> + 's>;

struct Verb<'s, R> {
    spec: VerbSpecification,
    bind: Bind<'s, R>,
}

/// A set of verb schemas whose instances map into one result type.
///
/// # Examples
///
/// ```
/// use command_bind_core::{SchemaBuilder, Specification, ValueType, VerbSpecification};
/// use command_bind_parser::{Parser, VerbSet};
///
/// #[derive(Default)]
/// struct Add { file: String }
/// #[derive(Default)]
/// struct Commit { message: Option<String> }
///
/// enum Command { Add(Add), Commit(Commit) }
///
/// let add = SchemaBuilder::mutable("Add", Add::default)
///     .verb(VerbSpecification::new("add"))
///     .field("file", Specification::value(0, ValueType::String), |a| &a.file, |a| &mut a.file)
///     .build()
///     .unwrap();
/// let commit = SchemaBuilder::mutable("Commit", Commit::default)
///     .verb(VerbSpecification::new("commit"))
///     .field("message", Specification::scalar(Some('m'), None, ValueType::String), |c| &c.message, |c| &mut c.message)
///     .build()
///     .unwrap();
///
/// let verbs = VerbSet::new()
///     .register(&add, Command::Add).unwrap()
///     .register(&commit, Command::Commit).unwrap();
///
/// let result = verbs.parse(&Parser::default(), &["commit", "-m", "fix"]).unwrap();
/// assert!(matches!(result.value(), Some(Command::Commit(c)) if c.message.as_deref() == Some("fix")));
/// ```
pub struct VerbSet<'s, R> {
    verbs: Vec<Verb<'s, R>>,
}

impl<R> Default for VerbSet<'_, R> {
    fn default() -> Self {
        Self { verbs: Vec::new() }
    }
}

impl<'s, R: 's> VerbSet<'s, R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a schema; `map` turns its instances into the common result type.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingVerb`] if the schema declares no verb and
    /// [`SchemaError::DuplicateName`] if its name or an alias is taken.
    pub fn register<T: 's>(
        mut self,
        schema: &'s Schema<T>,
        map: impl Fn(T) -> R + 's,
    ) -> Result<Self, SchemaError> {
        let Some(spec) = schema.verb() else {
            return Err(SchemaError::MissingVerb(schema.name().to_string()));
        };
        let words = std::iter::once(&spec.name).chain(&spec.aliases);
        for word in words {
            if self.find(word).is_some() {
                return Err(SchemaError::DuplicateName(word.clone()));
            }
        }

        self.verbs.push(Verb {
            spec: spec.clone(),
            bind: Box::new(move |parser: &Parser, args: &[String]| {
                parser
                    .parse_arguments(schema, args)
                    .map(|result| result.map(&map))
            }),
        });
        Ok(self)
    }

    /// Verbs in registration order.
    pub fn verbs(&self) -> impl Iterator<Item = &VerbSpecification> {
        self.verbs.iter().map(|verb| &verb.spec)
    }

    fn find(&self, word: &str) -> Option<&Verb<'s, R>> {
        self.verbs.iter().find(|verb| verb.spec.matches(word))
    }

    /// Selects a verb by the first argument and binds the rest with its
    /// schema.
    ///
    /// No arguments, or a leading option, give `NoVerbSelected`; an unknown
    /// first argument gives `BadVerbSelected`.
    pub fn parse<S: AsRef<str>>(
        &self,
        parser: &Parser,
        args: &[S],
    ) -> Result<ParserResult<R>, SchemaError> {
        let Some((first, rest)) = args.split_first() else {
            return Ok(ParserResult::not_parsed("verb", vec![Error::NoVerbSelected]));
        };
        let first = first.as_ref();
        if first.starts_with('-') {
            return Ok(ParserResult::not_parsed("verb", vec![Error::NoVerbSelected]));
        }

        let Some(verb) = self.find(first) else {
            debug!(token = first, "Unknown verb");
            return Ok(ParserResult::not_parsed(
                "verb",
                vec![Error::BadVerbSelected {
                    token: first.to_string(),
                }],
            ));
        };

        let rest: Vec<String> = rest.iter().map(|arg| arg.as_ref().to_string()).collect();
        (verb.bind)(parser, &rest)
    }
}
