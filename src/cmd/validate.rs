//! `urlshort validate` — lint mapping files without starting a server.
//!
//! Parses every file and runs [`lint`](crate::sources::lint::lint) over
//! its records, reporting results in human-readable text or
//! machine-readable JSON.

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::error::{LintFinding, UrlshortError};
use crate::sources::file_source::read_mapping_file;
use crate::sources::{lint, parse_mapping_str};

pub async fn execute(args: &ValidateArgs) -> Result<(), UrlshortError> {
    let mut findings: Vec<LintFinding> = Vec::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for path in &args.files {
        let label = path.display().to_string();
        let content = read_mapping_file(path).await?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let redirects = parse_mapping_str(ext, &content, &label)?;
        findings.extend(lint::lint(&label, &redirects));
        counts.push((label, redirects.len()));
    }

    match args.format {
        ValidateFormat::Text => print_text(&counts, &findings),
        ValidateFormat::Json => print_json(&counts, &findings),
    }

    if findings.is_empty() {
        Ok(())
    } else {
        Err(UrlshortError::Lint { findings })
    }
}

fn print_text(counts: &[(String, usize)], findings: &[LintFinding]) {
    for (label, entries) in counts {
        let problems = findings.iter().filter(|f| &f.source == label).count();
        if problems == 0 {
            println!("\u{2713} {label} ({entries} redirects)");
        } else {
            eprintln!("\u{2717} {label} has {problems} problems");
        }
    }
}

fn print_json(counts: &[(String, usize)], findings: &[LintFinding]) {
    let files: Vec<serde_json::Value> = counts
        .iter()
        .map(|(label, entries)| {
            let problems: Vec<serde_json::Value> = findings
                .iter()
                .filter(|f| &f.source == label)
                .map(|f| {
                    serde_json::json!({
                        "entry": f.entry,
                        "message": f.message,
                        "suggestion": f.suggestion,
                    })
                })
                .collect();
            serde_json::json!({
                "file": label,
                "redirects": entries,
                "valid": problems.is_empty(),
                "problems": problems,
            })
        })
        .collect();
    println!(
        "{}",
        serde_json::json!({
            "valid": findings.is_empty(),
            "files": files,
        })
    );
}

#[cfg(all(test, feature = "yaml"))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clean_file_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.yaml");
        std::fs::write(&path, "- path: /a\n  url: https://a.example\n").unwrap();

        let args = ValidateArgs {
            files: vec![path],
            format: ValidateFormat::Json,
        };
        assert!(execute(&args).await.is_ok());
    }

    #[tokio::test]
    async fn findings_fail_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dup.yaml");
        std::fs::write(
            &path,
            "- path: /a\n  url: https://a.example\n- path: /a\n  url: https://b.example\n",
        )
        .unwrap();

        let args = ValidateArgs {
            files: vec![path],
            format: ValidateFormat::Text,
        };
        match execute(&args).await.unwrap_err() {
            UrlshortError::Lint { findings } => assert_eq!(findings.len(), 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn unreadable_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.yaml");
        std::fs::write(&path, b"- path: /caf\xe9\n  url: https://cafe.example\n").unwrap();

        let args = ValidateArgs {
            files: vec![path.clone()],
            format: ValidateFormat::Text,
        };
        match execute(&args).await.unwrap_err() {
            UrlshortError::SourceRead { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let args = ValidateArgs {
            files: vec![dir.path().join("absent.yaml")],
            format: ValidateFormat::Text,
        };
        assert!(matches!(
            execute(&args).await.unwrap_err(),
            UrlshortError::SourceNotFound { .. }
        ));
    }
}
