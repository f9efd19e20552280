//! Unified error types for urlshort.
//!
//! Defines [`UrlshortError`] (the main crate error enum) and
//! [`LintFinding`] for mapping-file lint results. Source errors always
//! carry the identity of the offending source so the operator knows
//! which file to fix.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintFinding {
    pub source: String,
    pub entry: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for LintFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {} {}: {}", self.source, self.entry, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for LintFinding {}

fn format_findings(findings: &[LintFinding]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, finding) in findings.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        let _ = write!(buf, "{finding}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum UrlshortError {
    #[error("Mapping file not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Cannot read mapping file {}: {source}", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Mapping parse error in {source_name}:\n  {source}")]
    SourceParse {
        source_name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Mapping lint failed:\n{}", format_findings(.findings))]
    Lint { findings: Vec<LintFinding> },

    #[error("Unsupported mapping format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Storage error during {operation}: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: redb::Error,
    },

    #[error("Storage failed while serving; the redirect table can no longer be trusted")]
    StorageUnavailable,

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("File already exists: {}", path.display())]
    FileExists { path: PathBuf },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl UrlshortError {
    /// Wrap any redb error type with the name of the operation that failed.
    pub fn storage(operation: &'static str, source: impl Into<redb::Error>) -> Self {
        Self::Storage {
            operation,
            source: source.into(),
        }
    }

    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::StorageUnavailable)
    }
}
