//! Per-member resolution state of one binding pass.

use command_bind_core::{Member, NameInfo, Specification, TargetKind, Value};

/// How a member got its value.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Taken from the arguments.
    Parsed(Value),
    /// Filled from the declared default, or `false` / an empty sequence.
    Defaulted(Value),
    /// No value at all.
    Unresolved,
}

impl Resolution {
    pub fn value(&self) -> Option<&Value> {
        match self {
            Resolution::Parsed(value) | Resolution::Defaulted(value) => Some(value),
            Resolution::Unresolved => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Resolution::Parsed(value) | Resolution::Defaulted(value) => Some(value),
            Resolution::Unresolved => None,
        }
    }
}

/// A member paired with its resolution.
pub struct SpecificationProperty<'a, T> {
    member: &'a Member<T>,
    resolution: Resolution,
}

impl<'a, T> SpecificationProperty<'a, T> {
    pub fn new(member: &'a Member<T>, resolution: Resolution) -> Self {
        Self { member, resolution }
    }

    /// Returns a copy of this property carrying `resolution`.
    pub fn with_resolution(&self, resolution: Resolution) -> Self {
        Self {
            member: self.member,
            resolution,
        }
    }

    pub fn member(&self) -> &'a Member<T> {
        self.member
    }

    pub fn specification(&self) -> &'a Specification {
        self.member.specification()
    }

    pub fn name_info(&self) -> NameInfo {
        self.member.name_info()
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn value(&self) -> Option<&Value> {
        self.resolution.value()
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self.resolution, Resolution::Parsed(_))
    }

    /// Parsed with a value other than the declared default.
    pub fn is_parsed_non_default(&self) -> bool {
        match &self.resolution {
            Resolution::Parsed(value) => self.specification().default.as_ref() != Some(value),
            _ => false,
        }
    }

    /// Fills an unparsed property: the declared default, else `false` for
    /// switches, else an empty sequence for sequences.
    pub fn resolve_default(self) -> Self {
        if !matches!(self.resolution, Resolution::Unresolved) {
            return self;
        }
        let spec = self.specification();
        let fallback = spec.default.clone().or_else(|| match spec.target {
            TargetKind::Switch => Some(Value::Bool(false)),
            TargetKind::Sequence => Some(Value::Sequence(Vec::new())),
            TargetKind::Scalar => None,
        });
        match fallback {
            Some(value) => self.with_resolution(Resolution::Defaulted(value)),
            None => self,
        }
    }
}

impl<T> std::fmt::Debug for SpecificationProperty<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecificationProperty")
            .field("member", &self.member.name())
            .field("resolution", &self.resolution)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use command_bind_core::{SchemaBuilder, ValueType};

    #[derive(Default)]
    struct Opts {
        quiet: bool,
        level: i64,
        tags: Vec<String>,
        name: Option<String>,
    }

    #[test]
    fn test_default_resolution_order() {
        let schema = SchemaBuilder::mutable("Opts", Opts::default)
            .field("quiet", Specification::switch(Some('q'), None), |o| &o.quiet, |o| &mut o.quiet)
            .field(
                "level",
                Specification::scalar(None, Some("level"), ValueType::Integer).with_default(2),
                |o| &o.level,
                |o| &mut o.level,
            )
            .field(
                "tags",
                Specification::sequence(None, Some("tags"), ValueType::String),
                |o| &o.tags,
                |o| &mut o.tags,
            )
            .field(
                "name",
                Specification::scalar(None, Some("name"), ValueType::String),
                |o| &o.name,
                |o| &mut o.name,
            )
            .build()
            .unwrap();

        let resolved: Vec<Resolution> = schema
            .members()
            .iter()
            .map(|m| {
                SpecificationProperty::new(m, Resolution::Unresolved)
                    .resolve_default()
                    .resolution()
                    .clone()
            })
            .collect();

        assert_eq!(
            resolved,
            vec![
                Resolution::Defaulted(Value::Bool(false)),
                Resolution::Defaulted(Value::Integer(2)),
                Resolution::Defaulted(Value::Sequence(vec![])),
                Resolution::Unresolved,
            ]
        );
    }

    #[test]
    fn test_parsed_default_value_is_not_non_default() {
        let schema = SchemaBuilder::mutable("Opts", Opts::default)
            .field(
                "level",
                Specification::scalar(None, Some("level"), ValueType::Integer).with_default(2),
                |o| &o.level,
                |o| &mut o.level,
            )
            .build()
            .unwrap();
        let member = &schema.members()[0];

        let prop = SpecificationProperty::new(member, Resolution::Parsed(Value::Integer(2)));
        assert!(prop.is_parsed());
        assert!(!prop.is_parsed_non_default());

        let prop = prop.with_resolution(Resolution::Parsed(Value::Integer(3)));
        assert!(prop.is_parsed_non_default());
    }
}
