//! Resource name → document resolution.
//!
//! Resolution runs a fixed list of matcher strategies in priority order and
//! stops at the first hit. Every strategy is a pure function of the query,
//! the index and the document set.

use std::fmt;

use tracing::debug;

use crate::config::MapperConfig;
use crate::index::ResourceIndex;
use crate::naming::{normalize_resource_name, squash_underscores};
use crate::schema::DocumentSet;

/// A single resolution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStrategy {
    /// Lowercased name is an index key
    ExactIndex,
    /// Name equals an index key once underscores are removed from both
    UnderscoreInsensitiveIndex,
    /// Filename contains `<name>.<authoritative marker>`
    BoundaryFilename,
    /// Filename contains the name anywhere
    LooseFilename,
}

impl MatchStrategy {
    /// Evaluation order, highest priority first.
    pub const ORDER: [MatchStrategy; 4] = [
        MatchStrategy::ExactIndex,
        MatchStrategy::UnderscoreInsensitiveIndex,
        MatchStrategy::BoundaryFilename,
        MatchStrategy::LooseFilename,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExactIndex => "exact-index",
            Self::UnderscoreInsensitiveIndex => "underscore-insensitive-index",
            Self::BoundaryFilename => "boundary-filename",
            Self::LooseFilename => "loose-filename",
        }
    }

    /// Run this strategy alone.
    pub fn find<'a>(
        &self,
        query: &Query,
        index: &'a ResourceIndex,
        documents: &'a DocumentSet,
        config: &MapperConfig,
    ) -> Option<&'a str> {
        match self {
            Self::ExactIndex => index.get(&query.normalized),
            Self::UnderscoreInsensitiveIndex => index
                .iter()
                .find(|(name, _)| squash_underscores(name) == query.squashed)
                .map(|(_, filename)| filename),
            Self::BoundaryFilename => {
                let marker = config.authoritative_marker.to_lowercase();
                let with_underscores = format!("{}.{}", query.normalized, marker);
                let without = format!("{}.{}", query.squashed, marker);
                find_primary_filename(documents, config, |lower| {
                    lower.contains(&with_underscores) || lower.contains(&without)
                })
            }
            Self::LooseFilename => find_primary_filename(documents, config, |lower| {
                lower.contains(&query.normalized) || lower.contains(&query.squashed)
            }),
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First non-subordinate document (in filename order) whose lowercased
/// filename satisfies `predicate`.
fn find_primary_filename<'a>(
    documents: &'a DocumentSet,
    config: &MapperConfig,
    predicate: impl Fn(&str) -> bool,
) -> Option<&'a str> {
    documents
        .iter()
        .filter(|doc| !config.is_sub_resource(&doc.filename))
        .find(|doc| predicate(&doc.filename.to_lowercase()))
        .map(|doc| doc.filename.as_str())
}

/// A caller-supplied resource name in both normalized forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Lowercase, underscores kept
    pub normalized: String,
    /// Lowercase, underscores removed
    pub squashed: String,
}

impl Query {
    pub fn new(resource: &str) -> Self {
        Self {
            normalized: normalize_resource_name(resource),
            squashed: squash_underscores(resource),
        }
    }

    fn is_empty(&self) -> bool {
        self.squashed.is_empty()
    }
}

/// The selected document and the strategy that selected it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub filename: &'a str,
    pub strategy: MatchStrategy,
}

/// Resolve a resource name, trying each strategy of [`MatchStrategy::ORDER`].
///
/// Returns `None` when nothing matches; that is an expected outcome.
pub fn resolve<'a>(
    resource: &str,
    index: &'a ResourceIndex,
    documents: &'a DocumentSet,
    config: &MapperConfig,
) -> Option<Resolution<'a>> {
    let query = Query::new(resource);
    if query.is_empty() {
        return None;
    }

    let found = MatchStrategy::ORDER.iter().find_map(|strategy| {
        strategy
            .find(&query, index, documents, config)
            .map(|filename| Resolution {
                filename,
                strategy: *strategy,
            })
    });

    match &found {
        Some(r) => debug!(resource, filename = r.filename, strategy = %r.strategy, "resolved resource"),
        None => debug!(resource, "no spec found for resource"),
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaDefinition, SchemaDocument};

    fn doc(filename: &str, schemas: &[&str]) -> SchemaDocument {
        SchemaDocument::new(
            filename,
            schemas
                .iter()
                .map(|s| (s.to_string(), SchemaDefinition::Any))
                .collect(),
        )
    }

    struct Fixture {
        documents: DocumentSet,
        index: ResourceIndex,
        config: MapperConfig,
    }

    impl Fixture {
        fn new(docs: Vec<SchemaDocument>) -> Self {
            let config = MapperConfig::new();
            let documents: DocumentSet = docs.into_iter().collect();
            let index = ResourceIndex::build(&documents, &config);
            Self {
                documents,
                index,
                config,
            }
        }

        fn resolve(&self, resource: &str) -> Option<Resolution<'_>> {
            resolve(resource, &self.index, &self.documents, &self.config)
        }

        fn run(&self, strategy: MatchStrategy, resource: &str) -> Option<&str> {
            strategy.find(&Query::new(resource), &self.index, &self.documents, &self.config)
        }
    }

    fn dns_fixture() -> Fixture {
        Fixture::new(vec![
            doc("a.views.dns_zone.ves-swagger.json", &["DNSZoneCreateRequest"]),
            doc(
                "a.views.dns_zone.subscription.json",
                &["DNSZoneSubscriptionCreateRequest"],
            ),
        ])
    }

    #[test]
    fn resolve_exact_index_hit() {
        let fx = dns_fixture();
        let r = fx.resolve("dns_zone").unwrap();
        assert_eq!(r.filename, "a.views.dns_zone.ves-swagger.json");
        assert_eq!(r.strategy, MatchStrategy::ExactIndex);
    }

    #[test]
    fn resolve_is_case_insensitive() {
        let fx = dns_fixture();
        let r = fx.resolve("DNS_Zone").unwrap();
        assert_eq!(r.filename, "a.views.dns_zone.ves-swagger.json");
    }

    #[test]
    fn resolve_never_returns_sub_resource_document() {
        let fx = dns_fixture();
        for name in ["dns_zone", "dnszone", "dns_zone_subscription", "subscription"] {
            if let Some(r) = fx.resolve(name) {
                assert!(
                    !r.filename.contains("subscription"),
                    "{name} resolved to {}",
                    r.filename
                );
            }
        }
    }

    #[test]
    fn underscore_insensitive_index_hit() {
        let fx = Fixture::new(vec![doc("x.views.dns_zone.json", &[])]);
        assert_eq!(fx.index.get("dnszone"), None);

        let r = fx.resolve("dnszone").unwrap();
        assert_eq!(r.filename, "x.views.dns_zone.json");
        assert_eq!(r.strategy, MatchStrategy::UnderscoreInsensitiveIndex);
    }

    #[test]
    fn underscore_insensitive_scans_keys_in_order() {
        let fx = Fixture::new(vec![
            doc("b.json", &["a_bCreateRequest"]),
            doc("a.json", &["ab_CreateRequest"]),
        ]);
        // Keys "a_b" (b.json) and "ab_" (a.json); "a_b" sorts first
        assert_eq!(
            fx.run(MatchStrategy::UnderscoreInsensitiveIndex, "ab"),
            Some("b.json")
        );
    }

    #[test]
    fn boundary_filename_requires_marker_after_name() {
        let fx = Fixture::new(vec![
            doc("a.pool_extra.ves-swagger.json", &[]),
            doc("b.pool.ves-swagger.json", &[]),
        ]);
        assert_eq!(
            fx.run(MatchStrategy::BoundaryFilename, "pool"),
            Some("b.pool.ves-swagger.json")
        );
        assert_eq!(
            fx.run(MatchStrategy::LooseFilename, "pool"),
            Some("a.pool_extra.ves-swagger.json")
        );

        let r = fx.resolve("pool").unwrap();
        assert_eq!(r.strategy, MatchStrategy::BoundaryFilename);
        assert_eq!(r.filename, "b.pool.ves-swagger.json");
    }

    #[test]
    fn boundary_filename_skips_sub_resources() {
        let fx = Fixture::new(vec![
            doc("a.views.dns_zone.monitor.dns_zone.ves-swagger.json", &[]),
            doc("b.dns_zone.ves-swagger.json", &[]),
        ]);
        assert_eq!(
            fx.run(MatchStrategy::BoundaryFilename, "dns_zone"),
            Some("b.dns_zone.ves-swagger.json")
        );
        assert_eq!(fx.run(MatchStrategy::BoundaryFilename, "dnszone"), None);
    }

    #[test]
    fn boundary_filename_tries_squashed_form() {
        let fx = Fixture::new(vec![doc("svc.apigateway.ves-swagger.json", &[])]);
        assert_eq!(
            fx.run(MatchStrategy::BoundaryFilename, "api_gateway"),
            Some("svc.apigateway.ves-swagger.json")
        );
    }

    #[test]
    fn loose_filename_skips_sub_resources() {
        let fx = Fixture::new(vec![
            doc("a.alert_monitor.json", &[]),
            doc("b.alert_policy.json", &[]),
        ]);
        assert_eq!(
            fx.run(MatchStrategy::LooseFilename, "alert"),
            Some("b.alert_policy.json")
        );
    }

    #[test]
    fn resolve_unknown_is_none() {
        let fx = dns_fixture();
        assert!(fx.resolve("does_not_exist").is_none());
        assert!(fx.resolve("").is_none());
        assert!(fx.resolve("___").is_none());
    }

    #[test]
    fn strategies_run_in_declared_order() {
        assert_eq!(MatchStrategy::ORDER[0], MatchStrategy::ExactIndex);
        assert_eq!(MatchStrategy::ORDER[3], MatchStrategy::LooseFilename);
        assert_eq!(MatchStrategy::BoundaryFilename.to_string(), "boundary-filename");
    }
}
