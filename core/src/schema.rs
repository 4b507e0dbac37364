//! Schema descriptions: members of a target type bound to specifications.
//!
//! A [`Schema`] is built once per target type and then shared read-only by
//! every binding pass. The pipeline only ever sees its specifications; how
//! the members were declared (builder calls here, a JSON document in
//! [`SchemaDocument`](crate::SchemaDocument), or generated code) does not
//! matter to it.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validate::{SchemaError, validate_specifications};
use crate::{FromValue, NameInfo, Specification, SpecificationKind, ToValue, Value, ValueError};

type Reader<T> = Box<dyn Fn(&T) -> Option<Value> + Send + Sync>;
type Setter<T> = Box<dyn Fn(&mut T, Value) -> Result<(), ValueError> + Send + Sync>;
type Factory<T> = Box<dyn Fn() -> T + Send + Sync>;
type Constructor<T> = Box<dyn Fn(&mut Arguments) -> Result<T, ValueError> + Send + Sync>;

/// Error returned by a release hook.
pub type ReleaseError = Box<dyn std::error::Error + Send + Sync>;
type Release<T> = Box<dyn Fn(&mut T) -> Result<(), ReleaseError> + Send + Sync>;

/// One bound member: its name, specification and a reader for unparsing.
pub struct Member<T> {
    name: String,
    spec: Specification,
    read: Reader<T>,
}

impl<T> Member<T> {
    /// Member (field or parameter) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn specification(&self) -> &Specification {
        &self.spec
    }

    /// Reads the member's current value from an instance.
    pub fn read(&self, instance: &T) -> Option<Value> {
        (self.read)(instance)
    }

    /// Names used to identify this member in errors.
    ///
    /// Positional values are identified by their meta value, falling back
    /// to the member name.
    pub fn name_info(&self) -> NameInfo {
        match &self.spec.kind {
            SpecificationKind::Option(option) => NameInfo {
                short_name: option.short_name,
                long_name: option.long_name.clone(),
            },
            SpecificationKind::Value(_) => NameInfo {
                short_name: None,
                long_name: Some(
                    self.spec
                        .meta_value
                        .clone()
                        .unwrap_or_else(|| self.name.clone()),
                ),
            },
        }
    }
}

impl<T> fmt::Debug for Member<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// How a target instance is produced from resolved values.
///
/// Selected once when the schema is built.
pub enum ConstructionStrategy<T> {
    /// Create a value, then assign each resolved member through its setter.
    /// `setters[i]` belongs to the schema's `i`-th member.
    Mutate {
        create: Factory<T>,
        setters: Vec<Setter<T>>,
    },
    /// Call a constructor once with every member's resolved value.
    Inject { construct: Constructor<T> },
}

impl<T> ConstructionStrategy<T> {
    pub fn is_mutable(&self) -> bool {
        matches!(self, ConstructionStrategy::Mutate { .. })
    }
}

/// Verb metadata for schemas selected by a leading command word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct VerbSpecification {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl VerbSpecification {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Returns `true` if `word` is the verb name or one of its aliases.
    pub fn matches(&self, word: &str) -> bool {
        self.name == word || self.aliases.iter().any(|a| a == word)
    }
}

/// Resolved values handed to an [`Inject`](ConstructionStrategy::Inject)
/// constructor, keyed by member name (case-insensitive).
///
/// # Examples
///
/// ```
/// use command_bind_core::{Arguments, Value};
///
/// let mut args = Arguments::default();
/// args.insert("Port", Some(Value::Integer(8080)));
/// args.insert("host", None);
///
/// let port: u16 = args.take("port").unwrap();
/// let host: String = args.take("host").unwrap(); // unresolved: zero value
/// assert_eq!((port, host.as_str()), (8080, ""));
/// assert!(args.take::<u16>("missing").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: HashMap<String, Option<Value>>,
}

impl Arguments {
    /// Records the resolution of one member. `None` means unresolved.
    pub fn insert(&mut self, name: &str, value: Option<Value>) {
        self.values.insert(name.to_lowercase(), value);
    }

    /// Takes a member's value as `F`; unresolved members give
    /// `F::default()`.
    pub fn take<F: FromValue + Default>(&mut self, name: &str) -> Result<F, ValueError> {
        match self.values.remove(&name.to_lowercase()) {
            Some(Some(value)) => F::from_value(value),
            Some(None) => Ok(F::default()),
            None => Err(ValueError::UnknownParameter(name.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A validated schema description for target type `T`.
///
/// Built with [`SchemaBuilder`]; immutable afterwards and safe to share
/// between threads.
pub struct Schema<T> {
    name: String,
    verb: Option<VerbSpecification>,
    members: Vec<Member<T>>,
    strategy: ConstructionStrategy<T>,
    release: Option<Release<T>>,
}

impl<T> Schema<T> {
    /// Type name used as the tag of failed results.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn verb(&self) -> Option<&VerbSpecification> {
        self.verb.as_ref()
    }

    /// Members in declaration order.
    pub fn members(&self) -> &[Member<T>] {
        &self.members
    }

    pub fn strategy(&self) -> &ConstructionStrategy<T> {
        &self.strategy
    }

    /// Specifications in declaration order.
    pub fn specifications(&self) -> impl Iterator<Item = &Specification> {
        self.members.iter().map(|m| &m.spec)
    }

    /// Re-checks the set-level invariants, e.g. for case-insensitive name
    /// comparison.
    pub fn validate(&self, case_sensitive: bool) -> Result<(), SchemaError> {
        let entries: Vec<(&str, &Specification)> = self
            .members
            .iter()
            .map(|m| (m.name.as_str(), &m.spec))
            .collect();
        match validate_specifications(&entries, case_sensitive)
            .into_iter()
            .next()
        {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Runs the release hook, if one was declared.
    pub fn release(&self, instance: &mut T) -> Result<(), ReleaseError> {
        match &self.release {
            Some(release) => release(instance),
            None => Ok(()),
        }
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("verb", &self.verb)
            .field("members", &self.members)
            .field("mutable", &self.strategy.is_mutable())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Schema`].
///
/// # Examples
///
/// ```
/// use command_bind_core::{SchemaBuilder, Specification, ValueType};
///
/// #[derive(Default)]
/// struct Options {
///     verbose: bool,
///     output: Option<String>,
/// }
///
/// let schema = SchemaBuilder::mutable("Options", Options::default)
///     .field("verbose", Specification::switch(Some('v'), Some("verbose")), |o| &o.verbose, |o| &mut o.verbose)
///     .field("output", Specification::scalar(Some('o'), Some("output"), ValueType::String), |o| &o.output, |o| &mut o.output)
///     .build()
///     .unwrap();
///
/// assert_eq!(schema.members().len(), 2);
/// assert!(schema.strategy().is_mutable());
/// ```
pub struct SchemaBuilder<T> {
    name: String,
    verb: Option<VerbSpecification>,
    members: Vec<Member<T>>,
    setters: Vec<Option<Setter<T>>>,
    origin: Origin<T>,
    release: Option<Release<T>>,
}

enum Origin<T> {
    Create(Factory<T>),
    Construct(Constructor<T>),
}

impl<T: 'static> SchemaBuilder<T> {
    /// Starts a schema whose instances are created by `create` and then
    /// assigned member by member.
    pub fn mutable(name: &str, create: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            name: name.to_string(),
            verb: None,
            members: Vec::new(),
            setters: Vec::new(),
            origin: Origin::Create(Box::new(create)),
            release: None,
        }
    }

    /// Starts a schema whose instances are built by one constructor call.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_bind_core::{SchemaBuilder, Specification, ValueType};
    ///
    /// struct Point { x: i32, y: i32 }
    ///
    /// let schema = SchemaBuilder::immutable("Point", |args| {
    ///     Ok(Point { x: args.take("x")?, y: args.take("y")? })
    /// })
    /// .member("x", Specification::value(0, ValueType::Integer), |p| &p.x)
    /// .member("y", Specification::value(1, ValueType::Integer), |p| &p.y)
    /// .build()
    /// .unwrap();
    ///
    /// assert!(!schema.strategy().is_mutable());
    /// ```
    pub fn immutable(
        name: &str,
        construct: impl Fn(&mut Arguments) -> Result<T, ValueError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            verb: None,
            members: Vec::new(),
            setters: Vec::new(),
            origin: Origin::Construct(Box::new(construct)),
            release: None,
        }
    }

    /// Adds a readable and writable member.
    ///
    /// An option declared without names is named after the member (see
    /// [`Specification::named_after`]); the same holds for the other
    /// member methods.
    pub fn field<F, G, M>(mut self, name: &str, spec: Specification, get: G, get_mut: M) -> Self
    where
        F: FromValue + ToValue + 'static,
        G: Fn(&T) -> &F + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut F + Send + Sync + 'static,
    {
        self.members.push(Member {
            name: name.to_string(),
            spec: spec.named_after(name),
            read: Box::new(move |t| get(t).to_value()),
        });
        self.setters.push(Some(Box::new(move |t, value| {
            *get_mut(t) = F::from_value(value)?;
            Ok(())
        })));
        self
    }

    /// Adds a read-only member; its value reaches the instance through the
    /// constructor.
    pub fn member<F, G>(mut self, name: &str, spec: Specification, get: G) -> Self
    where
        F: ToValue + 'static,
        G: Fn(&T) -> &F + Send + Sync + 'static,
    {
        self.members.push(Member {
            name: name.to_string(),
            spec: spec.named_after(name),
            read: Box::new(move |t| get(t).to_value()),
        });
        self.setters.push(None);
        self
    }

    /// Adds a member with hand-written accessors.
    pub fn member_with(
        mut self,
        name: &str,
        spec: Specification,
        read: impl Fn(&T) -> Option<Value> + Send + Sync + 'static,
        write: impl Fn(&mut T, Value) -> Result<(), ValueError> + Send + Sync + 'static,
    ) -> Self {
        self.members.push(Member {
            name: name.to_string(),
            spec: spec.named_after(name),
            read: Box::new(read),
        });
        self.setters.push(Some(Box::new(write)));
        self
    }

    /// Declares the verb that selects this schema.
    pub fn verb(mut self, verb: VerbSpecification) -> Self {
        self.verb = Some(verb);
        self
    }

    /// Declares how to release resources held by an instance that is
    /// discarded because binding failed.
    pub fn release_with(
        mut self,
        release: impl Fn(&mut T) -> Result<(), ReleaseError> + Send + Sync + 'static,
    ) -> Self {
        self.release = Some(Box::new(release));
        self
    }

    /// Validates the members and finishes the schema.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found: malformed or duplicate names,
    /// bad positional indices, inconsistent arity or defaults, or a
    /// read-only member on a mutable schema.
    pub fn build(self) -> Result<Schema<T>, SchemaError> {
        let entries: Vec<(&str, &Specification)> = self
            .members
            .iter()
            .map(|m| (m.name.as_str(), &m.spec))
            .collect();
        if let Some(err) = validate_specifications(&entries, true).into_iter().next() {
            return Err(err);
        }

        let strategy = match self.origin {
            Origin::Create(create) => {
                let mut setters = Vec::with_capacity(self.setters.len());
                for (member, setter) in self.members.iter().zip(self.setters) {
                    match setter {
                        Some(setter) => setters.push(setter),
                        None => return Err(SchemaError::ReadOnlyMember(member.name.clone())),
                    }
                }
                ConstructionStrategy::Mutate { create, setters }
            }
            Origin::Construct(construct) => ConstructionStrategy::Inject { construct },
        };

        Ok(Schema {
            name: self.name,
            verb: self.verb,
            members: self.members,
            strategy,
            release: self.release,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValueType;

    #[derive(Default)]
    struct Opts {
        name: String,
        count: i32,
    }

    #[test]
    fn test_mutable_schema_rejects_read_only_member() {
        let result = SchemaBuilder::mutable("Opts", Opts::default)
            .member(
                "name",
                Specification::scalar(None, Some("name"), ValueType::String),
                |o: &Opts| &o.name,
            )
            .build();

        assert!(matches!(result, Err(SchemaError::ReadOnlyMember(name)) if name == "name"));
    }

    #[test]
    fn test_unnamed_option_takes_member_name() {
        let schema = SchemaBuilder::mutable("Opts", Opts::default)
            .field(
                "Count",
                Specification::scalar(None, None, ValueType::Integer),
                |o| &o.count,
                |o| &mut o.count,
            )
            .build()
            .unwrap();

        let option = schema.members()[0].specification().as_option().unwrap();
        assert_eq!(option.long_name.as_deref(), Some("count"));
        assert_eq!(option.short_name, None);
    }

    #[test]
    fn test_member_reader_and_setter() {
        let schema = SchemaBuilder::mutable("Opts", Opts::default)
            .field(
                "count",
                Specification::scalar(Some('c'), None, ValueType::Integer),
                |o| &o.count,
                |o| &mut o.count,
            )
            .build()
            .unwrap();

        let mut opts = Opts::default();
        let ConstructionStrategy::Mutate { setters, .. } = schema.strategy() else {
            panic!("expected mutable strategy");
        };
        setters[0](&mut opts, Value::Integer(7)).unwrap();

        assert_eq!(opts.count, 7);
        assert_eq!(schema.members()[0].read(&opts), Some(Value::Integer(7)));
        assert!(setters[0](&mut opts, Value::from("x")).is_err());
    }

    #[test]
    fn test_positional_name_info_uses_meta_value() {
        let schema = SchemaBuilder::mutable("Opts", Opts::default)
            .field(
                "name",
                Specification::value(0, ValueType::String).with_meta("NAME"),
                |o| &o.name,
                |o| &mut o.name,
            )
            .build()
            .unwrap();

        assert_eq!(schema.members()[0].name_info().name_text(), "NAME");
    }

    #[test]
    fn test_arguments_are_case_insensitive() {
        let mut args = Arguments::default();
        args.insert("Count", Some(Value::Integer(2)));

        assert_eq!(args.take::<i32>("count"), Ok(2));
        assert!(args.is_empty());
    }
}
