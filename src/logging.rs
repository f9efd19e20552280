//! Structured logging setup using the `tracing` ecosystem.
//!
//! JSON output for production, pretty output for a TTY, forced with
//! `--log-json` or `--pretty`. The chosen level applies to urlshort
//! itself; the per-request spans from `tower_http` and the storage
//! internals of `redb` are capped at `info` so `--log-level trace`
//! shows registrations and lookups without drowning them.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::cli::LogLevel;

const QUIETED_TARGETS: &[&str] = &["tower_http", "redb"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[must_use]
pub fn resolve_format(pretty: bool, json: bool) -> LogFormat {
    if json {
        LogFormat::Json
    } else if pretty || std::io::IsTerminal::is_terminal(&std::io::stdout()) {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    }
}

#[must_use]
pub fn filter(level: &LogLevel) -> Targets {
    let level = LevelFilter::from_level(level.to_tracing_level());
    let quiet = level.min(LevelFilter::INFO);
    QUIETED_TARGETS
        .iter()
        .fold(Targets::new().with_default(level), |targets, target| {
            targets.with_target(*target, quiet)
        })
}

pub fn init(level: &LogLevel, format: LogFormat) {
    let output = match format {
        LogFormat::Json => fmt::layer().json().with_target(false).boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
    };

    tracing_subscriber::registry()
        .with(output)
        .with(filter(level))
        .init();
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::*;

    #[test]
    fn json_flag_wins() {
        assert_eq!(resolve_format(false, true), LogFormat::Json);
    }

    #[test]
    fn pretty_flag_forces_pretty() {
        assert_eq!(resolve_format(true, false), LogFormat::Pretty);
    }

    #[test]
    fn trace_level_keeps_dependencies_at_info() {
        let targets = filter(&LogLevel::Trace);
        assert!(targets.would_enable("urlshort::engine", &Level::TRACE));
        assert!(targets.would_enable("redb", &Level::INFO));
        assert!(!targets.would_enable("redb::tree_store", &Level::DEBUG));
        assert!(!targets.would_enable("tower_http::trace", &Level::TRACE));
    }

    #[test]
    fn quieter_levels_apply_everywhere() {
        let targets = filter(&LogLevel::Warn);
        assert!(!targets.would_enable("urlshort::redirect", &Level::INFO));
        assert!(!targets.would_enable("tower_http::trace", &Level::INFO));
        assert!(targets.would_enable("redb", &Level::WARN));
    }
}
