//! Serde data structures for redirect mapping files.
//!
//! A mapping file is a top-level list of [`Redirect`] records. Each
//! configuration source becomes one [`MappingSet`], the unit that a
//! storage engine registers in a single step.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const DEFAULTS_SOURCE: &str = "defaults";

const DEFAULT_REDIRECTS: &[(&str, &str)] = &[
    (
        "/urlshort-godoc",
        "https://godoc.org/github.com/gophercises/urlshort",
    ),
    ("/yaml-godoc", "https://godoc.org/gopkg.in/yaml.v2"),
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Redirect {
    pub path: String,
    pub url: String,
}

impl Redirect {
    pub fn new(path: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            url: url.into(),
        }
    }
}

/// The mappings contributed by one configuration source.
#[derive(Debug, Clone, Default)]
pub struct MappingSet {
    source: String,
    digest: String,
    entries: HashMap<String, String>,
}

impl MappingSet {
    /// Build a set from records in file order. A path listed twice keeps
    /// the last destination.
    pub fn from_redirects(
        source: impl Into<String>,
        raw: &[u8],
        redirects: Vec<Redirect>,
    ) -> Self {
        let source = source.into();
        let mut entries = HashMap::with_capacity(redirects.len());
        for redirect in redirects {
            if let Some(previous) = entries.insert(redirect.path.clone(), redirect.url) {
                tracing::warn!(
                    source = %source,
                    path = %redirect.path,
                    discarded = %previous,
                    "duplicate path in source, last entry wins"
                );
            }
        }
        Self {
            source,
            digest: sha256_hex(raw),
            entries,
        }
    }

    /// Build a set from in-code pairs, hashing their textual form.
    pub fn from_pairs<I, P, U>(source: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (P, U)>,
        P: Into<String>,
        U: Into<String>,
    {
        let redirects: Vec<Redirect> = pairs
            .into_iter()
            .map(|(p, u)| Redirect::new(p, u))
            .collect();
        let raw: String = redirects
            .iter()
            .map(|r| format!("{}\t{}\n", r.path, r.url))
            .collect();
        Self::from_redirects(source, raw.as_bytes(), redirects)
    }

    /// The two built-in mappings registered before any file.
    #[must_use]
    pub fn defaults() -> Self {
        Self::from_pairs(DEFAULTS_SOURCE, DEFAULT_REDIRECTS.iter().copied())
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Lowercase hex SHA-256 of the raw source bytes.
    #[must_use]
    pub fn digest(&self) -> &str {
        &self.digest
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }
}

/// Compute a lowercase hex-encoded SHA-256 digest.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}
