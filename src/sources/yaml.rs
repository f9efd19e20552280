//! YAML mapping source backed by [`FileSource`].

use std::path::PathBuf;

use super::file_source::FileSource;
use crate::mapping::Redirect;

pub fn deserialize(content: &str) -> Result<Vec<Redirect>, Box<dyn std::error::Error + Send + Sync>> {
    serde_yml::from_str::<Vec<Redirect>>(content)
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
}

#[must_use]
pub fn new(path: PathBuf) -> FileSource {
    FileSource::new(path, "yaml", deserialize)
}
