//! Mapping sources: readers that turn one configuration input into a
//! [`MappingSet`].
//!
//! Defines the [`MappingSource`] trait for pluggable readers, the
//! file-backed implementation in [`file_source`], per-format
//! constructors gated by feature flags, and [`lint`] checks used by the
//! `validate` command.

pub mod file_source;
pub mod lint;

#[cfg(feature = "yaml")]
pub mod yaml;

#[cfg(feature = "json")]
pub mod json;

#[cfg(feature = "toml")]
pub mod toml_source;

use std::path::Path;

use async_trait::async_trait;

use crate::error::UrlshortError;
use crate::mapping::{MappingSet, Redirect};

// async_trait is required here because sources are held as
// Box<dyn MappingSource>, which native async fn in traits cannot express.
#[async_trait]
pub trait MappingSource: Send + Sync {
    /// Format name, e.g. `"yaml"`.
    fn name(&self) -> &'static str;

    /// Identity reported in logs and errors, e.g. the file path.
    fn label(&self) -> String;

    async fn load(&self) -> Result<MappingSet, UrlshortError>;
}

/// Parse mapping records based on file extension.
pub fn parse_mapping_str(
    ext: &str,
    content: &str,
    source_name: &str,
) -> Result<Vec<Redirect>, UrlshortError> {
    let parse_err = |e: Box<dyn std::error::Error + Send + Sync>| UrlshortError::SourceParse {
        source_name: source_name.to_string(),
        source: e,
    };

    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => yaml::deserialize(content).map_err(parse_err),

        #[cfg(feature = "json")]
        "json" => json::deserialize(content).map_err(parse_err),

        #[cfg(feature = "toml")]
        "toml" => toml_source::deserialize(content).map_err(parse_err),

        other => Err(UrlshortError::UnsupportedFormat(other.to_string())),
    }
}

/// Pick a [`MappingSource`] for `path` from its extension.
pub fn source_for_path(path: &Path) -> Result<Box<dyn MappingSource>, UrlshortError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => Ok(Box::new(yaml::new(path.to_path_buf()))),

        #[cfg(feature = "json")]
        "json" => Ok(Box::new(json::new(path.to_path_buf()))),

        #[cfg(feature = "toml")]
        "toml" => Ok(Box::new(toml_source::new(path.to_path_buf()))),

        other => Err(UrlshortError::UnsupportedFormat(other.to_string())),
    }
}
