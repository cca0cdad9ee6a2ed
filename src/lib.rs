//! Resolve short resource names to OpenAPI documents and generate example
//! create requests from their schemas.
//!
//! Documents are indexed once; lookups and example generation are pure
//! reads of the immutable index and document set.
//!
//! # Usage
//!
//! ```
//! use openapi_resources::{SchemaDocument, SpecMapper};
//! use serde_json::json;
//!
//! let doc = SchemaDocument::from_value(
//!     "ves.io.schema.views.dns_zone.ves-swagger.json",
//!     &json!({
//!         "components": { "schemas": {
//!             "dns_zoneCreateRequest": {
//!                 "type": "object",
//!                 "required": ["name"],
//!                 "properties": { "name": { "type": "string" } }
//!             }
//!         } }
//!     }),
//! )
//! .unwrap();
//!
//! let mapper = SpecMapper::new([doc].into_iter().collect());
//! assert!(mapper.find_spec("dns_zone").is_some());
//! assert!(mapper.generate_example("dns_zone").unwrap().contains("\"name\""));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod example;
pub mod index;
pub mod loader;
pub mod mapper;
pub mod naming;
pub mod resolver;
pub mod schema;

pub use cli::{build_command, run, CliConfig};
pub use config::{MapperConfig, OptionalFields};
pub use error::{CliError, SpecError};
pub use example::{render, ExampleFormat, ExampleGenerator};
pub use index::{IndexSource, ResourceIndex};
pub use loader::{load_dir, load_document};
pub use mapper::{ResourceSpecInfo, SpecMapper};
pub use resolver::{resolve, MatchStrategy, Query, Resolution};
pub use schema::{DocumentSet, ObjectSchema, SchemaDefinition, SchemaDocument};

// Re-export dependencies for downstream crates
pub use clap;
pub use serde_json;
