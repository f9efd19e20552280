//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared state holding the loaded
//! [`Redirector`] and the fatal-error channel), [`build_router`] for
//! constructing the Axum router with middleware layers, and
//! [`shutdown_signal`] for SIGTERM / Ctrl+C handling.

use std::sync::Arc;

use axum::Router;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::loader::Redirector;
use crate::redirect;

pub const FALLBACK_BODY: &str = "Hello, world!\n";

pub struct AppState {
    pub redirector: Redirector,
    /// Flipped to `true` when a lookup hits a storage failure.
    pub fatal: watch::Sender<bool>,
}

impl AppState {
    #[must_use]
    pub fn new(redirector: Redirector) -> Self {
        let (fatal, _) = watch::channel(false);
        Self { redirector, fatal }
    }

    #[must_use]
    pub fn has_failed(&self) -> bool {
        *self.fatal.borrow()
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(redirect::redirect_handler)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Resolves once a lookup has reported a storage failure.
pub async fn storage_failure(mut fatal: watch::Receiver<bool>) {
    let failed = fatal.wait_for(|failed| *failed).await.is_ok();
    if !failed {
        // Sender dropped without a failure: never resolve.
        std::future::pending::<()>().await;
    }
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
