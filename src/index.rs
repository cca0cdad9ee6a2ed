//! Resource name → authoritative document index.
//!
//! Built once from a `DocumentSet`. Documents are visited in filename order
//! and the first document to claim a name keeps it, so the same document set
//! always yields the same index.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::config::MapperConfig;
use crate::naming::{base_name, normalize_resource_name};
use crate::schema::DocumentSet;

/// Where an index entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSource {
    /// A `<Name>CreateRequest` schema
    CreateRequestSchema,
    /// A `...views.<name>...` filename segment
    Filename,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct IndexEntry {
    filename: String,
    source: IndexSource,
}

/// Normalized resource name → filename of its authoritative document.
///
/// Every filename refers to a document of the set the index was built from,
/// and none refers to a sub-resource document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceIndex {
    entries: BTreeMap<String, IndexEntry>,
}

impl ResourceIndex {
    /// Build the index in two passes over the non-subordinate documents:
    /// create-request schema names first, then filename segments.
    pub fn build(documents: &DocumentSet, config: &MapperConfig) -> Self {
        let mut index = Self::default();

        let primary: Vec<_> = documents
            .iter()
            .filter(|doc| {
                let sub = config.is_sub_resource(&doc.filename);
                if sub {
                    debug!(filename = %doc.filename, "skipping sub-resource document");
                }
                !sub
            })
            .collect();

        for doc in &primary {
            for schema_name in doc.schema_names() {
                if let Some(resource) = schema_name.strip_suffix(config.create_suffix.as_str()) {
                    index.claim(resource, &doc.filename, IndexSource::CreateRequestSchema);
                }
            }
        }

        for doc in &primary {
            for resource in filename_resources(&doc.filename, config) {
                index.claim(resource, &doc.filename, IndexSource::Filename);
            }
        }

        info!(
            documents = documents.len(),
            resources = index.len(),
            "built resource index"
        );
        index
    }

    /// First writer wins: an already-claimed name is left untouched.
    fn claim(&mut self, resource: &str, filename: &str, source: IndexSource) {
        let key = normalize_resource_name(resource);
        if key.is_empty() || self.entries.contains_key(&key) {
            return;
        }
        self.entries.insert(
            key,
            IndexEntry {
                filename: filename.to_string(),
                source,
            },
        );
    }

    /// Exact lookup of an already-normalized name.
    pub fn get(&self, normalized: &str) -> Option<&str> {
        self.entries.get(normalized).map(|e| e.filename.as_str())
    }

    pub fn source(&self, normalized: &str) -> Option<IndexSource> {
        self.entries.get(normalized).map(|e| e.source)
    }

    /// `(resource, filename)` pairs in resource-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.filename.as_str()))
    }

    pub fn resource_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resource names named by a filename: the token after each marker word,
/// unless it is a generic token.
///
/// `docs.ves.io.schema.views.http_loadbalancer.ves-swagger.json` → `http_loadbalancer`
fn filename_resources<'a>(filename: &'a str, config: &MapperConfig) -> Vec<&'a str> {
    let parts: Vec<&str> = base_name(filename).split('.').collect();
    if parts.len() < 3 {
        return Vec::new();
    }

    parts
        .windows(2)
        .filter(|pair| config.is_filename_marker(pair[0]))
        .map(|pair| pair[1])
        .filter(|candidate| !candidate.is_empty() && !config.is_generic_token(candidate))
        .collect()
}
