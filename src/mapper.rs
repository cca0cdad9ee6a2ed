//! Resource name → spec document facade
//!
//! `SpecMapper` owns the document set and the resource index. It is built
//! once and is read-only afterwards, so a shared `&SpecMapper` can serve
//! lookups from any number of threads.

use crate::config::{MapperConfig, OptionalFields};
use crate::error::SpecError;
use crate::example::{render, ExampleFormat, ExampleGenerator};
use crate::index::ResourceIndex;
use crate::resolver::{resolve, MatchStrategy, Resolution};
use crate::schema::{DocumentSet, SchemaDocument};

/// What is known about a resource's specification.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ResourceSpecInfo {
    /// Resource name as supplied by the caller
    pub resource_name: String,
    /// Filename of the resolved document, if any
    pub spec_file: Option<String>,
    /// Strategy that selected `spec_file`
    pub strategy: Option<MatchStrategy>,
    /// Whether the document has a create-request schema for the resource
    pub has_create_schema: bool,
    /// Whether the document has a create spec-type schema for the resource
    pub has_spec_schema: bool,
}

/// Maps resource names to their OpenAPI documents.
#[derive(Debug, Clone)]
pub struct SpecMapper {
    documents: DocumentSet,
    index: ResourceIndex,
    config: MapperConfig,
}

impl SpecMapper {
    /// Build with the default naming conventions.
    pub fn new(documents: DocumentSet) -> Self {
        Self::with_config(documents, MapperConfig::new())
    }

    pub fn with_config(documents: DocumentSet, config: MapperConfig) -> Self {
        let index = ResourceIndex::build(&documents, &config);
        Self {
            documents,
            index,
            config,
        }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn index(&self) -> &ResourceIndex {
        &self.index
    }

    pub fn documents(&self) -> &DocumentSet {
        &self.documents
    }

    /// Resolve a resource name and report which strategy matched.
    pub fn resolve(&self, resource: &str) -> Option<Resolution<'_>> {
        resolve(resource, &self.index, &self.documents, &self.config)
    }

    /// The document for a resource, or `None` when nothing matches.
    pub fn find_spec(&self, resource: &str) -> Option<&SchemaDocument> {
        self.resolve(resource)
            .and_then(|r| self.documents.get(r.filename))
    }

    /// Filename of the document [`find_spec`](Self::find_spec) returns.
    pub fn find_spec_file(&self, resource: &str) -> Option<&str> {
        self.resolve(resource).map(|r| r.filename)
    }

    /// Every indexed resource name, sorted.
    pub fn mapped_resources(&self) -> Vec<&str> {
        self.index.resource_names().collect()
    }

    pub fn spec_count(&self) -> usize {
        self.documents.len()
    }

    /// Example create request for a resource as pretty JSON.
    ///
    /// Returns an empty string when the resource does not resolve or its
    /// document has no create-request schema.
    pub fn generate_example(&self, resource: &str) -> Result<String, SpecError> {
        self.generate_example_as(resource, ExampleFormat::Json)
    }

    pub fn generate_example_as(
        &self,
        resource: &str,
        format: ExampleFormat,
    ) -> Result<String, SpecError> {
        self.generate_example_with(resource, format, self.config.optional_fields)
    }

    /// Like [`generate_example_as`](Self::generate_example_as) with an
    /// explicit optional-field policy.
    pub fn generate_example_with(
        &self,
        resource: &str,
        format: ExampleFormat,
        optional_fields: OptionalFields,
    ) -> Result<String, SpecError> {
        let Some(document) = self.find_spec(resource) else {
            return Ok(String::new());
        };

        let config = self.config.clone().optional_fields(optional_fields);
        match ExampleGenerator::new(document, &config)
            .generate_create_request(resource, &config.create_suffix)
        {
            Some(value) => render(&value, format),
            None => Ok(String::new()),
        }
    }

    pub fn resource_info(&self, resource: &str) -> ResourceSpecInfo {
        let mut info = ResourceSpecInfo {
            resource_name: resource.to_string(),
            spec_file: None,
            strategy: None,
            has_create_schema: false,
            has_spec_schema: false,
        };

        let Some(resolution) = self.resolve(resource) else {
            return info;
        };
        info.spec_file = Some(resolution.filename.to_string());
        info.strategy = Some(resolution.strategy);

        if let Some(document) = self.documents.get(resolution.filename) {
            info.has_create_schema = document
                .find_create_request_schema(resource, &self.config.create_suffix)
                .is_some();
            info.has_spec_schema = document
                .find_spec_type_schema(resource, &self.config.spec_type_suffix)
                .is_some();
        }

        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn doc(filename: &str, schemas: Value) -> SchemaDocument {
        SchemaDocument::from_value(filename, &json!({ "components": { "schemas": schemas } }))
            .unwrap()
    }

    fn dns_mapper() -> SpecMapper {
        SpecMapper::new(
            vec![
                doc(
                    "a.views.dns_zone.ves-swagger.json",
                    json!({
                        "DNSZoneCreateRequest": {
                            "type": "object",
                            "required": ["name"],
                            "properties": {
                                "name": { "type": "string" },
                                "status": { "enum": ["ACTIVE", "DISABLED"] }
                            }
                        },
                        "dns_zoneCreateSpecType": { "type": "object" }
                    }),
                ),
                doc(
                    "a.views.dns_zone.subscription.json",
                    json!({
                        "DNSZoneSubscriptionCreateRequest": {
                            "type": "object",
                            "properties": { "plan": { "type": "string" } }
                        }
                    }),
                ),
                doc(
                    "b.views.namespace.ves-swagger.json",
                    json!({ "ObjectMeta": { "type": "object" } }),
                ),
            ]
            .into_iter()
            .collect(),
        )
    }

    #[test]
    fn find_spec_returns_main_document_not_subscription() {
        let mapper = dns_mapper();
        let spec = mapper.find_spec("dns_zone").unwrap();
        assert_eq!(spec.filename, "a.views.dns_zone.ves-swagger.json");
        assert!(spec.schema("DNSZoneCreateRequest").is_some());
    }

    #[test]
    fn find_spec_underscore_insensitive() {
        let mapper = dns_mapper();
        assert_eq!(
            mapper.find_spec_file("dnszone"),
            Some("a.views.dns_zone.ves-swagger.json")
        );
        assert_eq!(
            mapper.find_spec_file("Name_Space"),
            Some("b.views.namespace.ves-swagger.json")
        );
    }

    #[test]
    fn find_spec_and_find_spec_file_agree() {
        let mapper = dns_mapper();
        for name in [
            "dns_zone",
            "dnszone",
            "DNS_ZONE",
            "namespace",
            "zone",
            "views",
            "subscription",
            "missing",
            "",
        ] {
            assert_eq!(
                mapper.find_spec(name).map(|d| d.filename.as_str()),
                mapper.find_spec_file(name),
                "disagreement for {name:?}"
            );
        }
    }

    #[test]
    fn unknown_resource_is_not_found_and_example_is_empty() {
        let mapper = dns_mapper();
        assert!(mapper.find_spec("load_balancer").is_none());
        assert!(mapper.find_spec_file("load_balancer").is_none());
        assert_eq!(mapper.generate_example("load_balancer").unwrap(), "");

        let info = mapper.resource_info("load_balancer");
        assert_eq!(info.resource_name, "load_balancer");
        assert!(info.spec_file.is_none());
        assert!(!info.has_create_schema);
        assert!(!info.has_spec_schema);
    }

    #[test]
    fn generate_example_contains_required_and_declared_enum() {
        let mapper = dns_mapper();
        let text = mapper.generate_example("dns_zone").unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["name"], "");
        if let Some(status) = value.get("status") {
            assert!(status == "ACTIVE" || status == "DISABLED", "got {status}");
        }
        assert!(value.get("plan").is_none());
    }

    #[test]
    fn generate_example_empty_without_create_schema() {
        let mapper = dns_mapper();
        assert!(mapper.find_spec("namespace").is_some());
        assert_eq!(mapper.generate_example("namespace").unwrap(), "");
    }

    #[test]
    fn generate_example_as_yaml() {
        let mapper = dns_mapper();
        let text = mapper
            .generate_example_as("dns_zone", ExampleFormat::Yaml)
            .unwrap();
        assert!(text.contains("name: ''"), "got: {text}");
    }

    #[test]
    fn generate_example_with_required_only() {
        let mapper = dns_mapper();
        let text = mapper
            .generate_example_with("dns_zone", ExampleFormat::Json, OptionalFields::RequiredOnly)
            .unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, json!({ "name": "" }));
    }

    #[test]
    fn resource_info_reports_schemas() {
        let mapper = dns_mapper();
        let info = mapper.resource_info("dns_zone");
        assert_eq!(
            info.spec_file.as_deref(),
            Some("a.views.dns_zone.ves-swagger.json")
        );
        assert_eq!(info.strategy, Some(MatchStrategy::ExactIndex));
        assert!(info.has_create_schema);
        assert!(info.has_spec_schema);

        let ns = mapper.resource_info("namespace");
        assert!(ns.spec_file.is_some());
        assert!(!ns.has_create_schema);
        assert!(!ns.has_spec_schema);
    }

    #[test]
    fn mapped_resources_are_sorted_and_exclude_sub_resources() {
        let mapper = dns_mapper();
        assert_eq!(
            mapper.mapped_resources(),
            vec!["dns_zone", "dnszone", "namespace"]
        );
        assert_eq!(mapper.spec_count(), 3);
    }

    #[test]
    fn rebuilding_gives_same_resolutions() {
        let a = dns_mapper();
        let b = dns_mapper();
        assert_eq!(a.index(), b.index());
        for name in a.mapped_resources() {
            assert_eq!(a.find_spec_file(name), b.find_spec_file(name));
        }
    }

    #[test]
    fn concurrent_lookups_share_one_mapper() {
        let mapper = dns_mapper();
        let mapper = &mapper;
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(move || {
                        (
                            mapper.find_spec_file("dns_zone").map(str::to_string),
                            mapper.generate_example("dns_zone").unwrap(),
                        )
                    })
                })
                .collect();
            for handle in handles {
                let (file, example) = handle.join().unwrap();
                assert_eq!(file.as_deref(), Some("a.views.dns_zone.ves-swagger.json"));
                assert!(example.contains("\"name\""));
            }
        });
    }
}
