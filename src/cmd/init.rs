//! `urlshort init` — generate a starter mapping file.
//!
//! Writes the built-in default redirects in YAML, JSON, or TOML so the
//! file can be edited and passed back to `urlshort run`.

use std::path::PathBuf;

use crate::cli::{InitArgs, MappingFormat};
use crate::error::UrlshortError;

pub fn execute(args: &InitArgs) -> Result<(), UrlshortError> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("paths.{}", args.format.extension())));

    if output.exists() {
        return Err(UrlshortError::FileExists { path: output });
    }

    std::fs::write(&output, template(&args.format))?;
    println!("Created {}", output.display());
    Ok(())
}

#[must_use]
pub const fn template(format: &MappingFormat) -> &'static str {
    match format {
        MappingFormat::Yaml => YAML_TEMPLATE,
        MappingFormat::Json => JSON_TEMPLATE,
        MappingFormat::Toml => TOML_TEMPLATE,
    }
}

const YAML_TEMPLATE: &str = r#"# urlshort redirects. Later files passed to `urlshort run` take precedence.
- path: /urlshort-godoc
  url: https://godoc.org/github.com/gophercises/urlshort
- path: /yaml-godoc
  url: https://godoc.org/gopkg.in/yaml.v2
"#;

const JSON_TEMPLATE: &str = r#"[
  {
    "path": "/urlshort-godoc",
    "url": "https://godoc.org/github.com/gophercises/urlshort"
  },
  {
    "path": "/yaml-godoc",
    "url": "https://godoc.org/gopkg.in/yaml.v2"
  }
]
"#;

const TOML_TEMPLATE: &str = r#"# urlshort redirects. Later files passed to `urlshort run` take precedence.

[[redirects]]
path = "/urlshort-godoc"
url = "https://godoc.org/github.com/gophercises/urlshort"

[[redirects]]
path = "/yaml-godoc"
url = "https://godoc.org/gopkg.in/yaml.v2"
"#;
