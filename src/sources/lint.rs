//! Lint checks for mapping records.
//!
//! The loader never rejects a destination: paths are opaque and URLs are
//! passed verbatim into the redirect response. These checks exist for
//! `urlshort validate`, which reports entries that are almost certainly
//! mistakes before they are deployed.

use std::collections::HashMap;

use url::Url;

use crate::error::LintFinding;
use crate::mapping::Redirect;

/// Check a single path. Returns `Ok(())` or a human-readable error.
pub fn check_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("path cannot be empty".into());
    }
    if !path.starts_with('/') {
        return Err(format!(
            "path never matches a request, it must start with '/' (did you mean '/{path}'?)"
        ));
    }
    Ok(())
}

/// Check a single destination. Returns `Ok(())` or a human-readable error.
pub fn check_url(url: &str) -> Result<(), String> {
    if url.is_empty() {
        return Err("url cannot be empty".into());
    }
    match Url::parse(url) {
        Ok(parsed) => match parsed.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(format!(
                "unusual scheme '{scheme}' (expected http or https)"
            )),
        },
        // Relative redirects are legal in a Location header.
        Err(url::ParseError::RelativeUrlWithoutBase) if url.starts_with('/') => Ok(()),
        Err(e) => Err(format!("'{url}' is not a valid URL: {e}")),
    }
}

pub fn lint(source: &str, redirects: &[Redirect]) -> Vec<LintFinding> {
    let mut findings = Vec::new();
    let mut first_seen: HashMap<&str, usize> = HashMap::new();

    for (i, redirect) in redirects.iter().enumerate() {
        let entry = if redirect.path.is_empty() {
            format!("[{i}]")
        } else {
            redirect.path.clone()
        };

        if let Err(message) = check_path(&redirect.path) {
            findings.push(LintFinding {
                source: source.to_string(),
                entry: entry.clone(),
                message,
                suggestion: None,
            });
        }

        if let Err(message) = check_url(&redirect.url) {
            findings.push(LintFinding {
                source: source.to_string(),
                entry: entry.clone(),
                message,
                suggestion: None,
            });
        }

        let first = *first_seen.entry(redirect.path.as_str()).or_insert(i);
        if first != i {
            findings.push(LintFinding {
                source: source.to_string(),
                entry,
                message: format!("duplicate path, first defined at entry [{first}]"),
                suggestion: Some(format!("entry [{i}] wins")),
            });
        }
    }

    findings
}
