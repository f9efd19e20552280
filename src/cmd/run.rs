//! `urlshort run` — load mappings and start the redirect server.
//!
//! Creates the selected engine, registers the default mappings, folds
//! every mapping file into it in command-line order, then serves until
//! Ctrl+C / SIGTERM or a storage failure. The engine is released once
//! the server has stopped.

use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::engine::EngineKind;
use crate::error::UrlshortError;
use crate::loader::{Loader, Redirector};
use crate::logging;
use crate::server::{self, AppState};
use crate::sources::{self, MappingSource};

const AUTO_DETECT_CANDIDATES: &[&str] = &["paths.yaml", "paths.yml", "paths.json", "paths.toml"];

pub async fn execute(args: RunArgs) -> Result<(), UrlshortError> {
    let log_format = logging::resolve_format(args.pretty, args.log_json);
    logging::init(&args.log_level, log_format);

    // Resolve everything that can fail cheaply before touching storage.
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let files = resolve_mapping_files(args.mapping_files()).await;
    let sources = build_sources(&files)?;

    let redirector = load(
        EngineKind::from_flag(args.persistent),
        &args.storage_dir,
        &sources,
    )
    .await?;

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            release(redirector);
            return Err(e.into());
        }
    };

    tracing::info!(
        addr = %addr,
        engine = redirector.engine_name(),
        sources = redirector.sources().len(),
        "urlshort started"
    );

    serve(listener, redirector, server::shutdown_signal()).await?;

    tracing::info!("urlshort stopped");
    Ok(())
}

/// Serve `redirector` until `shutdown` resolves or a lookup hits a
/// storage failure, then release the engine. A storage failure is
/// reported as [`UrlshortError::StorageUnavailable`].
pub async fn serve<F>(
    listener: tokio::net::TcpListener,
    redirector: Redirector,
    shutdown: F,
) -> Result<(), UrlshortError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = Arc::new(AppState::new(redirector));
    let failure = server::storage_failure(state.fatal.subscribe());
    let router = server::build_router(Arc::clone(&state));

    let graceful_shutdown = async move {
        tokio::select! {
            () = shutdown => {}
            () = failure => tracing::error!("storage failure, stopping server"),
        }
    };

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(graceful_shutdown)
        .await;

    let failed = state.has_failed();
    match Arc::try_unwrap(state) {
        Ok(state) => release(state.redirector),
        // Dropping the last reference still removes the table file.
        Err(_) => tracing::warn!("engine still referenced at shutdown, skipping release"),
    }

    served?;
    if failed {
        return Err(UrlshortError::StorageUnavailable);
    }
    Ok(())
}

/// Create an engine and register the defaults followed by `sources`.
pub async fn load(
    kind: EngineKind,
    storage_dir: &Path,
    sources: &[Box<dyn MappingSource>],
) -> Result<Redirector, UrlshortError> {
    let engine = kind.create(storage_dir)?;
    let loader = Loader::new(engine)
        .register_defaults()?
        .load_sources(sources)
        .await?;
    Ok(loader.finish())
}

/// Explicit files win; otherwise look for a well-known file in the cwd.
async fn resolve_mapping_files(explicit: Vec<PathBuf>) -> Vec<PathBuf> {
    if !explicit.is_empty() {
        return explicit;
    }

    for name in AUTO_DETECT_CANDIDATES {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected mapping file");
            return vec![path];
        }
    }

    tracing::info!("no mapping file found, serving default redirects only");
    Vec::new()
}

fn build_sources(files: &[PathBuf]) -> Result<Vec<Box<dyn MappingSource>>, UrlshortError> {
    files.iter().map(|f| sources::source_for_path(f)).collect()
}

fn release(redirector: Redirector) {
    if let Err(e) = redirector.release() {
        tracing::error!(error = %e, "failed to release engine");
    }
}
