//! urlshort is a redirect-routing server.
//!
//! It maps request paths to destination URLs and answers matching
//! requests with `301 Moved Permanently`, falling back to a plain
//! greeting when no mapping exists. Mappings come from a built-in
//! default set followed by YAML, JSON, or TOML files, registered in
//! order into one of two storage engines.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, validate, init).
//! - [`engine`] -- The [`Engine`](engine::Engine) trait with an in-memory
//!   layered backend and a persistent redb backend.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`loader`] -- Folds mapping sets into an engine, then freezes it into
//!   a read-only [`Redirector`](loader::Redirector).
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`mapping`] -- Redirect records and per-source mapping sets.
//! - [`redirect`] -- HTTP adapter turning lookups into redirect responses.
//! - [`server`] -- Axum server setup, shared application state, and
//!   graceful shutdown.
//! - [`sources`] -- Mapping file readers via the
//!   [`MappingSource`](sources::MappingSource) trait.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML mapping files _(enabled by default)_ |
//! | `json` | JSON mapping files _(enabled by default)_ |
//! | `toml` | TOML mapping files |
//! | `file-backends` | All file formats |

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod engine;
pub mod error;
pub mod loader;
pub mod logging;
pub mod mapping;
pub mod redirect;
pub mod server;
pub mod sources;
