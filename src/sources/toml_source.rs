//! TOML mapping source backed by [`FileSource`].
//!
//! TOML has no top-level arrays, so records live under `[[redirects]]`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::file_source::FileSource;
use crate::mapping::Redirect;

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TomlDocument {
    #[serde(default)]
    pub redirects: Vec<Redirect>,
}

pub fn deserialize(content: &str) -> Result<Vec<Redirect>, Box<dyn std::error::Error + Send + Sync>> {
    toml::from_str::<TomlDocument>(content)
        .map(|doc| doc.redirects)
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
}

#[must_use]
pub fn new(path: PathBuf) -> FileSource {
    FileSource::new(path, "toml", deserialize)
}
