//! Error types for the openapi-resources crate.
//!
//! Resolution and example generation never fail: an unknown resource, a
//! dangling reference or a missing create-request schema all produce an
//! empty or placeholder result. Errors only come from the outer surface
//! (reading documents, rendering output, the CLI).

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading documents or rendering examples.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SpecError {
    #[error("failed to read spec directory: {}", path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read spec file: {}", path.display())]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in spec file: {}", path.display())]
    DocumentParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid spec document {filename}: {reason}")]
    InvalidDocument { filename: String, reason: String },

    #[error("failed to render example as JSON")]
    Render(#[source] serde_json::Error),

    #[error("failed to render example as YAML")]
    RenderYaml(#[source] serde_yaml::Error),

    #[error("unsupported output format: {format} (expected json or yaml)")]
    UnknownFormat { format: String },
}

/// Errors surfaced by the command-line front end.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CliError {
    #[error("no specification found for resource '{resource}'")]
    ResourceNotFound { resource: String },

    #[error("missing required argument: {name}")]
    MissingArgument { name: String },

    #[error(transparent)]
    Spec(#[from] SpecError),
}
