//! Schemas described by JSON or YAML documents.
//!
//! A [`SchemaDocument`] lists members and their specifications without a
//! Rust type behind them; it converts into a [`Schema`] over a
//! [`ValueMap`], which lets tools bind arguments for schemas only known at
//! runtime.
//!
//! # Example document
//!
//! ```yaml
//! name: AppOptions
//! members:
//!   - member: verbose
//!     spec:
//!       kind: { option: { short_name: v, long_name: verbose } }
//!       target: switch
//!       value_type: bool
//!   - member: num
//!     spec:
//!       kind: { option: { long_name: num } }
//!       value_type: integer
//!       default: 3
//! ```

use std::collections::BTreeMap;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    Schema, SchemaBuilder, SchemaError, Specification, Value, ValueError, VerbSpecification,
};

/// Instance type of document-described schemas: member name → value.
pub type ValueMap = BTreeMap<String, Value>;

/// Errors loading or converting a schema document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The described members violate a schema invariant.
    #[error("invalid schema: {0}")]
    Schema(#[from] SchemaError),

    /// A value does not fit the member it is given for.
    #[error("member '{member}': {source}")]
    Value {
        member: String,
        #[source]
        source: ValueError,
    },

    /// A value is given for a member the schema does not declare.
    #[error("unknown member: {0}")]
    UnknownMember(String),
}

/// One described member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDocument {
    pub member: String,
    pub spec: Specification,
}

/// Serializable description of a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verb: Option<VerbSpecification>,
    #[serde(default)]
    pub members: Vec<MemberDocument>,
}

impl SchemaDocument {
    /// Loads a document, choosing YAML for `.yml`/`.yaml` files and JSON
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Io`] if the file cannot be read, or a
    /// JSON/YAML error if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let reader = BufReader::new(std::fs::File::open(path)?);
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"));
        if is_yaml {
            Ok(serde_yaml::from_reader(reader)?)
        } else {
            Ok(serde_json::from_reader(reader)?)
        }
    }

    /// Parses a JSON document.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parses a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Coerces declared defaults to their member types.
    ///
    /// Documents spell choices and chars as plain strings and floats may be
    /// written as integers.
    pub fn normalized(mut self) -> Result<Self, DocumentError> {
        for member in &mut self.members {
            if let Some(default) = member.spec.default.take() {
                let coerced = default
                    .coerce(&member.spec.value_type, member.spec.target)
                    .map_err(|source| DocumentError::Value {
                        member: member.member.clone(),
                        source,
                    })?;
                member.spec.default = Some(coerced);
            }
        }
        Ok(self)
    }

    /// Builds a schema over [`ValueMap`] instances.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_bind_core::{SchemaDocument, Value};
    ///
    /// let doc = SchemaDocument::from_json(r#"{
    ///     "name": "Opts",
    ///     "members": [
    ///         { "member": "num", "spec": { "kind": { "option": { "long_name": "num" } },
    ///                                      "value_type": "integer", "default": 3 } }
    ///     ]
    /// }"#).unwrap();
    ///
    /// let schema = doc.into_schema().unwrap();
    /// assert_eq!(schema.name(), "Opts");
    /// assert_eq!(schema.members()[0].specification().default, Some(Value::Integer(3)));
    /// ```
    pub fn into_schema(self) -> Result<Schema<ValueMap>, DocumentError> {
        let doc = self.normalized()?;
        let mut builder = SchemaBuilder::mutable(&doc.name, ValueMap::new);
        if let Some(verb) = doc.verb {
            builder = builder.verb(verb);
        }
        for MemberDocument { member, spec } in doc.members {
            let read_key = member.clone();
            let write_key = member.clone();
            builder = builder.member_with(
                &member,
                spec,
                move |map: &ValueMap| map.get(&read_key).cloned(),
                move |map: &mut ValueMap, value| {
                    map.insert(write_key.clone(), value);
                    Ok(())
                },
            );
        }
        Ok(builder.build()?)
    }

    /// Coerces loosely typed member values (e.g. read from JSON) to the
    /// declared member types.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UnknownMember`] for values naming no member
    /// and [`DocumentError::Value`] for values of the wrong shape.
    pub fn coerce_values(&self, values: ValueMap) -> Result<ValueMap, DocumentError> {
        values
            .into_iter()
            .map(|(name, value)| {
                let member = self
                    .members
                    .iter()
                    .find(|m| m.member == name)
                    .ok_or_else(|| DocumentError::UnknownMember(name.clone()))?;
                let value = value
                    .coerce(&member.spec.value_type, member.spec.target)
                    .map_err(|source| DocumentError::Value {
                        member: name.clone(),
                        source,
                    })?;
                Ok((name, value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TargetKind, ValueType};

    const YAML: &str = r#"
name: AppOptions
verb:
  name: run
members:
  - member: verbose
    spec:
      kind: { option: { short_name: v, long_name: verbose } }
      target: switch
      value_type: bool
  - member: color
    spec:
      kind: { option: { long_name: color } }
      value_type: { choice: [Red, Green] }
      default: green
  - member: ratio
    spec:
      kind: { option: { long_name: ratio } }
      value_type: float
      default: 1
"#;

    #[test]
    fn test_yaml_document_into_schema() {
        let schema = SchemaDocument::from_yaml(YAML).unwrap().into_schema().unwrap();

        assert_eq!(schema.verb().map(|v| v.name.as_str()), Some("run"));
        let specs: Vec<&Specification> = schema.specifications().collect();
        assert_eq!(specs[0].target, TargetKind::Switch);
        assert_eq!(specs[1].default, Some(Value::Choice("Green".into())));
        assert_eq!(specs[2].default, Some(Value::Float(1.0)));
        assert_eq!(
            specs[1].value_type,
            ValueType::Choice(vec!["Red".into(), "Green".into()])
        );
    }

    #[test]
    fn test_invalid_document_is_schema_error() {
        let doc = SchemaDocument::from_json(
            r#"{ "name": "Bad", "members": [
                { "member": "a", "spec": { "kind": { "value": { "index": 1 } } } }
            ] }"#,
        )
        .unwrap();

        assert!(matches!(
            doc.into_schema(),
            Err(DocumentError::Schema(SchemaError::IndexGap(0)))
        ));
    }

    #[test]
    fn test_coerce_values_rejects_unknown_member() {
        let doc = SchemaDocument::from_yaml(YAML).unwrap();
        let mut values = ValueMap::new();
        values.insert("colour".into(), Value::from("red"));

        assert!(matches!(
            doc.coerce_values(values),
            Err(DocumentError::UnknownMember(name)) if name == "colour"
        ));
    }

    #[test]
    fn test_unnamed_option_is_named_after_member() {
        let doc = SchemaDocument::from_yaml(
            r#"
name: Depth
members:
  - member: MaxDepth
    spec:
      kind: { option: {} }
      value_type: integer
"#,
        )
        .unwrap();
        let schema = doc.into_schema().unwrap();

        let option = schema.members()[0].specification().as_option().cloned();
        assert_eq!(option.and_then(|o| o.long_name), Some("maxdepth".to_string()));
    }
}
