//! Resource-name normalization shared by the index and the resolver.

/// Normalize a resource name for index keys: lowercase, underscores kept.
pub fn normalize_resource_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Lowercase and drop every underscore, so `dns_zone` and `DNSZone` compare equal.
pub fn squash_underscores(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Base name of a path-like filename (`dir/a.b.json` → `a.b.json`).
pub fn base_name(filename: &str) -> &str {
    filename
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename)
}
