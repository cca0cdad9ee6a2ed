//! Filesystem → `DocumentSet`
//!
//! Reads the `*.json` OpenAPI documents of one directory. Documents are keyed
//! by their file name, which is what the index and the resolver match on.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::SpecError;
use crate::schema::{DocumentSet, SchemaDocument};

/// Load every `*.json` file directly inside `dir`. Subdirectories are not visited.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<DocumentSet, SpecError> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|source| SpecError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut documents = DocumentSet::new();
    for entry in entries {
        let entry = entry.map_err(|source| SpecError::DirectoryRead {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if !is_json || !path.is_file() {
            continue;
        }

        documents.insert(load_document(&path)?);
    }

    info!(dir = %dir.display(), documents = documents.len(), "loaded spec documents");
    Ok(documents)
}

/// Load a single OpenAPI JSON document.
pub fn load_document(path: impl AsRef<Path>) -> Result<SchemaDocument, SpecError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| SpecError::DocumentRead {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&text).map_err(|source| SpecError::DocumentParse {
        path: path.to_path_buf(),
        source,
    })?;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let document = SchemaDocument::from_value(filename, &value)?;
    debug!(filename = %document.filename, schemas = document.schemas.len(), "loaded spec document");
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn load_dir_reads_json_files_only() {
        let tmp = tempfile::tempdir().unwrap();
        let spec = json!({
            "components": { "schemas": { "DNSZoneCreateRequest": { "type": "object" } } }
        });
        write(tmp.path(), "a.views.dns_zone.ves-swagger.json", &spec.to_string());
        write(tmp.path(), "b.views.pool.ves-swagger.JSON", r#"{"openapi":"3.0.0"}"#);
        write(tmp.path(), "README.md", "# not a spec");
        fs::create_dir(tmp.path().join("nested.json")).unwrap();

        let docs = load_dir(tmp.path()).unwrap();
        assert_eq!(docs.len(), 2);

        let dns = docs.get("a.views.dns_zone.ves-swagger.json").unwrap();
        assert!(dns.schema("DNSZoneCreateRequest").is_some());
        assert!(docs.get("b.views.pool.ves-swagger.JSON").unwrap().schemas.is_empty());
    }

    #[test]
    fn load_dir_missing_directory_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_dir(tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, SpecError::DirectoryRead { .. }), "got {err:?}");
    }

    #[test]
    fn load_document_reports_invalid_json() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "broken.json", "{not json");

        let err = load_document(tmp.path().join("broken.json")).unwrap_err();
        assert!(matches!(err, SpecError::DocumentParse { .. }), "got {err:?}");
        assert!(err.to_string().contains("broken.json"));
    }
}
