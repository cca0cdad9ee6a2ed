//! OpenAPI document → schema graph
//!
//! Parses the `components.schemas` section of an OpenAPI JSON document into
//! `SchemaDefinition`s. References stay symbolic (`Reference("Name")`) and
//! are resolved by name against the owning document, so cyclic schemas need
//! no special representation.

use std::collections::{btree_map, BTreeMap, BTreeSet};

use serde_json::Value;

use crate::error::SpecError;
use crate::naming::squash_underscores;

/// A single schema definition.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaDefinition {
    Object(ObjectSchema),
    Array(Box<SchemaDefinition>),
    String,
    Integer,
    Number,
    Boolean,
    /// Declared enum values, in declaration order
    Enum(Vec<Value>),
    /// Schema name within the same document
    Reference(String),
    /// `allOf`: every part applies
    AllOf(Vec<SchemaDefinition>),
    /// `oneOf` / `anyOf`: any part applies
    OneOf(Vec<SchemaDefinition>),
    /// No usable type information
    Any,
}

/// Properties and required names of an object schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    pub properties: BTreeMap<String, SchemaDefinition>,
    pub required: BTreeSet<String>,
}

impl ObjectSchema {
    pub fn is_required(&self, property: &str) -> bool {
        self.required.contains(property)
    }
}

impl SchemaDefinition {
    /// Parse a JSON schema node. Never fails: unknown shapes become `Any`.
    pub fn from_value(value: &Value) -> Self {
        let obj = match value.as_object() {
            Some(o) => o,
            None => return Self::Any,
        };

        if let Some(reference) = obj.get("$ref").and_then(|v| v.as_str()) {
            return Self::Reference(ref_name(reference));
        }

        if let Some(values) = obj.get("enum").and_then(|v| v.as_array()) {
            return Self::Enum(values.clone());
        }

        // Sibling properties/required of a composition apply alongside it
        let sibling = (obj.contains_key("properties") || obj.contains_key("required"))
            .then(|| Self::Object(parse_object(value)));

        if let Some(parts) = obj.get("allOf").and_then(|v| v.as_array()) {
            let mut parts: Vec<Self> = parts.iter().map(Self::from_value).collect();
            parts.extend(sibling);
            return Self::AllOf(parts);
        }

        if let Some(parts) = obj
            .get("oneOf")
            .or_else(|| obj.get("anyOf"))
            .and_then(|v| v.as_array())
        {
            let one_of = Self::OneOf(parts.iter().map(Self::from_value).collect());
            return match sibling {
                Some(sibling) => Self::AllOf(vec![one_of, sibling]),
                None => one_of,
            };
        }

        match schema_type(value) {
            Some("object") => Self::Object(parse_object(value)),
            Some("array") => Self::Array(Box::new(parse_items(value))),
            Some("string") => Self::String,
            Some("integer") => Self::Integer,
            Some("number") => Self::Number,
            Some("boolean") => Self::Boolean,
            Some(_) => Self::Any,
            // Partial type information: infer from structure
            None if obj.contains_key("properties") => Self::Object(parse_object(value)),
            None if obj.contains_key("items") => Self::Array(Box::new(parse_items(value))),
            None => Self::Any,
        }
    }
}

/// Extract the `type` keyword. OpenAPI 3.1 allows an array such as
/// `["string", "null"]`; the first non-null entry is used.
fn schema_type(value: &Value) -> Option<&str> {
    match value.get("type")? {
        Value::String(s) => Some(s.as_str()),
        Value::Array(types) => types
            .iter()
            .filter_map(|t| t.as_str())
            .find(|t| *t != "null"),
        _ => None,
    }
}

fn parse_object(value: &Value) -> ObjectSchema {
    let properties = value
        .get("properties")
        .and_then(|p| p.as_object())
        .map(|props| {
            props
                .iter()
                .map(|(name, schema)| (name.clone(), SchemaDefinition::from_value(schema)))
                .collect()
        })
        .unwrap_or_default();

    let required = value
        .get("required")
        .and_then(|r| r.as_array())
        .map(|names| {
            names
                .iter()
                .filter_map(|n| n.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    ObjectSchema {
        properties,
        required,
    }
}

fn parse_items(value: &Value) -> SchemaDefinition {
    value
        .get("items")
        .map(SchemaDefinition::from_value)
        .unwrap_or(SchemaDefinition::Any)
}

/// Reduce a JSON pointer reference (`#/components/schemas/Foo`) to `Foo`.
fn ref_name(reference: &str) -> String {
    let last = reference.rsplit('/').next().unwrap_or(reference);
    last.replace("~1", "/").replace("~0", "~")
}

/// A parsed specification document: a filename plus its named schemas.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct SchemaDocument {
    /// Source filename; unique within a `DocumentSet`
    pub filename: String,
    /// Schema name → definition
    pub schemas: BTreeMap<String, SchemaDefinition>,
}

impl SchemaDocument {
    pub fn new(filename: impl Into<String>, schemas: BTreeMap<String, SchemaDefinition>) -> Self {
        Self {
            filename: filename.into(),
            schemas,
        }
    }

    /// Build a document from parsed OpenAPI JSON.
    ///
    /// Schemas are read from `components.schemas` (OpenAPI 3) or
    /// `definitions` (Swagger 2). A document with neither is valid and empty.
    pub fn from_value(filename: impl Into<String>, spec: &Value) -> Result<Self, SpecError> {
        let filename = filename.into();

        let section = spec
            .pointer("/components/schemas")
            .or_else(|| spec.get("definitions"));

        let schemas = match section {
            None => BTreeMap::new(),
            Some(Value::Object(map)) => map
                .iter()
                .map(|(name, schema)| (name.clone(), SchemaDefinition::from_value(schema)))
                .collect(),
            Some(_) => {
                return Err(SpecError::InvalidDocument {
                    filename,
                    reason: "schemas section is not an object".to_string(),
                })
            }
        };

        Ok(Self { filename, schemas })
    }

    pub fn schema(&self, name: &str) -> Option<&SchemaDefinition> {
        self.schemas.get(name)
    }

    pub fn schema_names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Find the create-request schema for a resource, e.g. `DNSZoneCreateRequest`
    /// for `dns_zone`.
    pub fn find_create_request_schema(
        &self,
        resource: &str,
        suffix: &str,
    ) -> Option<(&str, &SchemaDefinition)> {
        self.find_suffixed_schema(resource, suffix)
    }

    /// Find the create spec-type schema for a resource, e.g. `dns_zoneCreateSpecType`.
    pub fn find_spec_type_schema(
        &self,
        resource: &str,
        suffix: &str,
    ) -> Option<(&str, &SchemaDefinition)> {
        self.find_suffixed_schema(resource, suffix)
    }

    /// Candidates are schemas ending in `suffix`, scanned in name order:
    /// exact prefix match, then a prefix ending in the resource name, then a
    /// lone candidate. Comparison ignores case and underscores.
    fn find_suffixed_schema(
        &self,
        resource: &str,
        suffix: &str,
    ) -> Option<(&str, &SchemaDefinition)> {
        let wanted = squash_underscores(resource);
        if wanted.is_empty() || suffix.is_empty() {
            return None;
        }

        let candidates: Vec<(&str, String, &SchemaDefinition)> = self
            .schemas
            .iter()
            .filter_map(|(name, def)| {
                name.strip_suffix(suffix)
                    .map(|prefix| (name.as_str(), squash_underscores(prefix), def))
            })
            .collect();

        candidates
            .iter()
            .find(|(_, prefix, _)| *prefix == wanted)
            .or_else(|| {
                candidates
                    .iter()
                    .find(|(_, prefix, _)| prefix.ends_with(&wanted))
            })
            .or_else(|| match candidates.as_slice() {
                [only] => Some(only),
                _ => None,
            })
            .map(|(name, _, def)| (*name, *def))
    }
}

/// Read-only collection of documents keyed by filename.
///
/// Iteration is in filename order, which fixes the processing order of the
/// index builder and of every fallback search.
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    documents: BTreeMap<String, SchemaDocument>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document. A later document with the same filename replaces the earlier one.
    pub fn insert(&mut self, document: SchemaDocument) {
        self.documents.insert(document.filename.clone(), document);
    }

    pub fn get(&self, filename: &str) -> Option<&SchemaDocument> {
        self.documents.get(filename)
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.documents.contains_key(filename)
    }

    pub fn iter(&self) -> btree_map::Values<'_, String, SchemaDocument> {
        self.documents.values()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl FromIterator<SchemaDocument> for DocumentSet {
    fn from_iter<I: IntoIterator<Item = SchemaDocument>>(iter: I) -> Self {
        let mut set = Self::new();
        for document in iter {
            set.insert(document);
        }
        set
    }
}

impl<'a> IntoIterator for &'a DocumentSet {
    type Item = &'a SchemaDocument;
    type IntoIter = btree_map::Values<'a, String, SchemaDocument>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
