//! Naming conventions and generation policy shared by the index, the
//! resolver and the example generator.

/// Schema-name suffix marking a resource's create payload.
pub const CREATE_REQUEST_SUFFIX: &str = "CreateRequest";
/// Schema-name suffix marking a resource's create spec type.
pub const SPEC_TYPE_SUFFIX: &str = "CreateSpecType";
/// Filename token that marks the authoritative document of a resource.
pub const AUTHORITATIVE_MARKER: &str = "ves-swagger";
/// Default recursion limit for the example generator.
pub const DEFAULT_MAX_DEPTH: usize = 12;

const FILENAME_MARKERS: &[&str] = &["views", "schema"];
const GENERIC_TOKENS: &[&str] = &["ves-swagger", "json"];
const SUB_RESOURCE_MARKERS: &[&str] = &["subscription", "rrset", "record_set", "monitor"];

/// Which object properties the example generator emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionalFields {
    /// Emit every declared property.
    #[default]
    All,
    /// Emit required properties only.
    RequiredOnly,
}

/// Configuration for building and querying a [`SpecMapper`](crate::SpecMapper).
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct MapperConfig {
    /// Suffix of create-request schema names (e.g. `DNSZoneCreateRequest`)
    pub create_suffix: String,
    /// Suffix of spec-type schema names (e.g. `dns_zoneCreateSpecType`)
    pub spec_type_suffix: String,
    /// Filename tokens followed by a resource name (`...views.dns_zone...`)
    pub filename_markers: Vec<String>,
    /// Tokens never taken as a resource name in the filename pass
    pub generic_tokens: Vec<String>,
    /// Filename substrings classifying a document as subordinate
    pub sub_resource_markers: Vec<String>,
    /// Token that follows the resource name in an authoritative filename
    pub authoritative_marker: String,
    /// Maximum schema nesting the example generator descends into
    pub max_depth: usize,
    /// Optional property policy for generated examples
    pub optional_fields: OptionalFields,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MapperConfig {
    pub fn new() -> Self {
        Self {
            create_suffix: CREATE_REQUEST_SUFFIX.to_string(),
            spec_type_suffix: SPEC_TYPE_SUFFIX.to_string(),
            filename_markers: to_owned(FILENAME_MARKERS),
            generic_tokens: to_owned(GENERIC_TOKENS),
            sub_resource_markers: to_owned(SUB_RESOURCE_MARKERS),
            authoritative_marker: AUTHORITATIVE_MARKER.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            optional_fields: OptionalFields::All,
        }
    }

    /// Replace the set of sub-resource filename markers.
    pub fn sub_resource_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sub_resource_markers = markers
            .into_iter()
            .map(|m| m.into().to_lowercase())
            .collect();
        self
    }

    /// Set the example generator's recursion limit.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the optional property policy.
    pub fn optional_fields(mut self, policy: OptionalFields) -> Self {
        self.optional_fields = policy;
        self
    }

    /// Whether a filename belongs to a subordinate (sub-resource) document.
    pub fn is_sub_resource(&self, filename: &str) -> bool {
        let lower = filename.to_lowercase();
        self.sub_resource_markers
            .iter()
            .any(|marker| lower.contains(&marker.to_lowercase()))
    }

    pub(crate) fn is_filename_marker(&self, token: &str) -> bool {
        self.filename_markers.iter().any(|m| m == token)
    }

    /// Generic tokens plus the marker words themselves.
    pub(crate) fn is_generic_token(&self, token: &str) -> bool {
        self.generic_tokens.iter().any(|t| t == token) || self.is_filename_marker(token)
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
