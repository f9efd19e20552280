//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, validate, init), and their associated argument
//! structs. Server flags have environment variable equivalents for
//! container deployments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "urlshort",
    version,
    about = "Redirect server backed by YAML/JSON path mappings",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        urlshort init                        Create a starter paths.yaml\n  \
        urlshort run                         Serve ./paths.yaml on :8080\n  \
        urlshort run -y a.yaml -j b.json -b  Serve two files from a persistent table"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the redirect server
    Run(Box<RunArgs>),

    /// Lint mapping files without starting
    Validate(ValidateArgs),

    /// Generate a starter mapping file
    Init(InitArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        urlshort run                                   Auto-detect ./paths.yaml\n  \
        urlshort run -y paths.yaml -y extra.yaml       Later files take precedence\n  \
        urlshort run -j paths.json --persistent        Store redirects in a redb table")]
pub struct RunArgs {
    /// YAML file mapping paths to urls (repeatable)
    #[arg(short, long = "yaml", value_name = "FILE")]
    pub yaml: Vec<PathBuf>,

    /// JSON file mapping paths to urls (repeatable)
    #[arg(short, long = "json", value_name = "FILE")]
    pub json: Vec<PathBuf>,

    /// TOML file mapping paths to urls (repeatable)
    #[cfg(feature = "toml")]
    #[arg(short, long = "toml", value_name = "FILE")]
    pub toml: Vec<PathBuf>,

    /// Store redirects in a temporary redb table instead of memory
    #[arg(short = 'b', long)]
    pub persistent: bool,

    /// Directory for the persistent table file
    #[arg(long, env = "URLSHORT_STORAGE_DIR", default_value = ".")]
    pub storage_dir: PathBuf,

    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub log_json: bool,
}

impl RunArgs {
    /// Mapping files in load order: YAML, then JSON, then TOML, each in
    /// the order given on the command line.
    #[must_use]
    pub fn mapping_files(&self) -> Vec<PathBuf> {
        let files = self.yaml.iter().chain(self.json.iter());
        #[cfg(feature = "toml")]
        let files = files.chain(self.toml.iter());
        files.cloned().collect()
    }
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Mapping files to lint
    #[arg(default_value = "paths.yaml", num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        urlshort init                      Write paths.yaml\n  \
        urlshort init -f json -o ext.json  JSON format, custom name")]
pub struct InitArgs {
    /// Output format
    #[arg(short, long, default_value = "yaml")]
    pub format: MappingFormat,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum MappingFormat {
    Yaml,
    Json,
    Toml,
}

impl MappingFormat {
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}
