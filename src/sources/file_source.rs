//! Generic async file-based mapping source.
//!
//! [`FileSource`] implements [`MappingSource`] for any file format by
//! accepting a deserialization function at construction time. It reads
//! the whole file via Tokio and parses it into a complete record list
//! before building the [`MappingSet`], so a malformed file never yields
//! a partial set.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::MappingSource;
use crate::error::UrlshortError;
use crate::mapping::{MappingSet, Redirect};

pub type DeserializeFn = fn(&str) -> Result<Vec<Redirect>, Box<dyn std::error::Error + Send + Sync>>;

pub struct FileSource {
    path: PathBuf,
    name: &'static str,
    deserialize: DeserializeFn,
}

impl FileSource {
    #[must_use]
    pub fn new(path: PathBuf, name: &'static str, deserialize: DeserializeFn) -> Self {
        Self {
            path,
            name,
            deserialize,
        }
    }

}

/// Read a mapping file as UTF-8. Every failure names the file.
pub async fn read_mapping_file(path: &Path) -> Result<String, UrlshortError> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            UrlshortError::SourceNotFound {
                path: path.to_path_buf(),
            }
        } else {
            UrlshortError::SourceRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

#[async_trait]
impl MappingSource for FileSource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn label(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<MappingSet, UrlshortError> {
        let content = read_mapping_file(&self.path).await?;

        let redirects = (self.deserialize)(&content).map_err(|e| UrlshortError::SourceParse {
            source_name: self.label(),
            source: e,
        })?;

        Ok(MappingSet::from_redirects(
            self.label(),
            content.as_bytes(),
            redirects,
        ))
    }
}
