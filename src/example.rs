//! Schema graph → example request body
//!
//! Walks a schema of a single document and produces a representative
//! `serde_json::Value`. References are resolved by name through the
//! document. The walker carries the schema names on the current path plus a
//! depth counter and substitutes `null` when either guard trips, so mutually
//! recursive schemas terminate.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};
use tracing::trace;

use crate::config::{MapperConfig, OptionalFields};
use crate::error::SpecError;
use crate::schema::{ObjectSchema, SchemaDefinition, SchemaDocument};

/// Text format of a rendered example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExampleFormat {
    #[default]
    Json,
    Yaml,
}

impl FromStr for ExampleFormat {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(SpecError::UnknownFormat {
                format: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ExampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Yaml => f.write_str("yaml"),
        }
    }
}

/// Serialize an example value.
pub fn render(value: &Value, format: ExampleFormat) -> Result<String, SpecError> {
    match format {
        ExampleFormat::Json => serde_json::to_string_pretty(value).map_err(SpecError::Render),
        ExampleFormat::Yaml => serde_yaml::to_string(value).map_err(SpecError::RenderYaml),
    }
}

/// Generates example values from the schemas of one document.
#[derive(Debug, Clone)]
pub struct ExampleGenerator<'a> {
    document: &'a SchemaDocument,
    max_depth: usize,
    optional_fields: OptionalFields,
}

impl<'a> ExampleGenerator<'a> {
    pub fn new(document: &'a SchemaDocument, config: &MapperConfig) -> Self {
        Self {
            document,
            max_depth: config.max_depth,
            optional_fields: config.optional_fields,
        }
    }

    /// Example for a named schema, or `None` if the document lacks it.
    pub fn generate_schema(&self, schema_name: &str) -> Option<Value> {
        let (name, def) = self.document.schemas.get_key_value(schema_name)?;
        let mut path = vec![name.as_str()];
        Some(self.walk(def, &mut path, 0))
    }

    /// Example for a resource's create-request schema, or `None` if the
    /// document has no such schema.
    pub fn generate_create_request(&self, resource: &str, suffix: &str) -> Option<Value> {
        let (name, _) = self.document.find_create_request_schema(resource, suffix)?;
        self.generate_schema(name)
    }

    fn walk(&self, def: &'a SchemaDefinition, path: &mut Vec<&'a str>, depth: usize) -> Value {
        self.walk_node(def, path, depth, &BTreeSet::new())
    }

    /// `required` names extra property names that count as required on the
    /// object this node resolves to (the union of an enclosing `allOf`).
    fn walk_node(
        &self,
        def: &'a SchemaDefinition,
        path: &mut Vec<&'a str>,
        depth: usize,
        required: &BTreeSet<&'a str>,
    ) -> Value {
        if depth > self.max_depth {
            trace!(depth, "depth limit reached, using placeholder");
            return Value::Null;
        }

        match def {
            SchemaDefinition::Reference(name) => self.walk_reference(name, path, depth, required),
            SchemaDefinition::Object(obj) => self.walk_object(obj, path, depth, required),
            SchemaDefinition::Array(item) => match self.walk(item, path, depth + 1) {
                Value::Null => Value::Array(Vec::new()),
                v => Value::Array(vec![v]),
            },
            SchemaDefinition::String => Value::String(String::new()),
            SchemaDefinition::Integer | SchemaDefinition::Number => Value::from(0),
            SchemaDefinition::Boolean => Value::Bool(false),
            SchemaDefinition::Enum(values) => values.first().cloned().unwrap_or(Value::Null),
            SchemaDefinition::AllOf(parts) => self.walk_all_of(parts, path, depth, required),
            SchemaDefinition::OneOf(parts) => parts
                .first()
                .map(|first| self.walk_node(first, path, depth, required))
                .unwrap_or(Value::Null),
            SchemaDefinition::Any => Value::Null,
        }
    }

    fn walk_reference(
        &self,
        name: &'a str,
        path: &mut Vec<&'a str>,
        depth: usize,
        required: &BTreeSet<&'a str>,
    ) -> Value {
        if path.contains(&name) {
            trace!(schema = name, "reference cycle, using placeholder");
            return Value::Null;
        }

        let Some((key, target)) = self.document.schemas.get_key_value(name) else {
            trace!(schema = name, filename = %self.document.filename, "unresolved reference");
            return Value::Null;
        };

        path.push(key.as_str());
        let value = self.walk_node(target, path, depth + 1, required);
        path.pop();
        value
    }

    fn walk_object(
        &self,
        obj: &'a ObjectSchema,
        path: &mut Vec<&'a str>,
        depth: usize,
        required: &BTreeSet<&'a str>,
    ) -> Value {
        let mut out = Map::new();

        for (name, prop) in &obj.properties {
            let is_required = obj.is_required(name) || required.contains(name.as_str());
            if !is_required && self.optional_fields == OptionalFields::RequiredOnly {
                continue;
            }
            out.insert(name.clone(), self.walk(prop, path, depth + 1));
        }

        // Required names without a property definition are still present
        for name in &obj.required {
            out.entry(name.clone()).or_insert(Value::Null);
        }

        Value::Object(out)
    }

    /// Merge the parts' objects. A `null` never overwrites a value.
    ///
    /// A property required by any part is required in every part, so a
    /// property declared in one part and required in another is generated.
    fn walk_all_of(
        &self,
        parts: &'a [SchemaDefinition],
        path: &mut Vec<&'a str>,
        depth: usize,
        required: &BTreeSet<&'a str>,
    ) -> Value {
        let mut union = required.clone();
        let mut seen = path.clone();
        for part in parts {
            self.collect_required(part, &mut seen, &mut union);
        }

        let mut merged = Map::new();
        let mut saw_object = false;
        let mut scalar = None;

        for part in parts {
            match self.walk_node(part, path, depth, &union) {
                Value::Object(fields) => {
                    saw_object = true;
                    for (key, value) in fields {
                        let keep_existing =
                            value.is_null() && merged.get(&key).is_some_and(|v| !v.is_null());
                        if !keep_existing {
                            merged.insert(key, value);
                        }
                    }
                }
                Value::Null => {}
                other => {
                    scalar.get_or_insert(other);
                }
            }
        }

        if saw_object {
            Value::Object(merged)
        } else {
            scalar.unwrap_or(Value::Null)
        }
    }

    /// Required names of the object a node resolves to, following
    /// references and nested `allOf` without re-entering `seen` schemas.
    fn collect_required(
        &self,
        def: &'a SchemaDefinition,
        seen: &mut Vec<&'a str>,
        out: &mut BTreeSet<&'a str>,
    ) {
        match def {
            SchemaDefinition::Object(obj) => out.extend(obj.required.iter().map(String::as_str)),
            SchemaDefinition::AllOf(parts) => {
                for part in parts {
                    self.collect_required(part, seen, out);
                }
            }
            SchemaDefinition::Reference(name) => {
                if seen.contains(&name.as_str()) {
                    return;
                }
                if let Some((key, target)) = self.document.schemas.get_key_value(name.as_str()) {
                    seen.push(key.as_str());
                    self.collect_required(target, seen, out);
                }
            }
            _ => {}
        }
    }
}
