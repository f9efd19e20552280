//! Integration tests for the HTTP redirect adapter and graceful shutdown.

#![cfg(feature = "yaml")]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;
use urlshort::cmd::run::{self, load};
use urlshort::engine::{Engine, EngineKind};
use urlshort::error::UrlshortError;
use urlshort::loader::{Loader, Redirector};
use urlshort::mapping::MappingSet;
use urlshort::server::{self, AppState, FALLBACK_BODY};
use urlshort::sources::{source_for_path, MappingSource};

const FILE_A: &str = "\
- path: /a
  url: https://a.example
- path: /hello world
  url: https://hello.example
- path: /café
  url: https://cafe.example
";

/// Engine whose table is unreadable: every lookup is a storage error.
struct CorruptedEngine;

impl Engine for CorruptedEngine {
    fn name(&self) -> &'static str {
        "corrupted"
    }

    fn register(self: Box<Self>, _mappings: MappingSet) -> Result<Box<dyn Engine>, UrlshortError> {
        Ok(self)
    }

    fn route(&self, _path: &str) -> Result<Option<String>, UrlshortError> {
        Err(UrlshortError::storage(
            "get",
            redb::StorageError::Corrupted("checksum mismatch".into()),
        ))
    }

    fn release(self: Box<Self>) -> Result<(), UrlshortError> {
        Ok(())
    }
}

fn corrupted_redirector() -> Redirector {
    Loader::new(Box::new(CorruptedEngine)).finish()
}

async fn start_test_server(
    kind: EngineKind,
    storage_dir: &Path,
) -> (SocketAddr, tokio::sync::oneshot::Sender<()>) {
    let file = storage_dir.join("fileA.yaml");
    std::fs::write(&file, FILE_A).unwrap();
    let sources: Vec<Box<dyn MappingSource>> = vec![source_for_path(&file).unwrap()];

    let redirector = load(kind, storage_dir, &sources).await.unwrap();
    let state = Arc::new(AppState::new(redirector));
    let router = server::build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    (addr, shutdown_tx)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

#[tokio::test]
async fn mapped_path_redirects_permanently() {
    let dir = tempfile::tempdir().unwrap();
    for kind in [EngineKind::Memory, EngineKind::Persistent] {
        let (addr, shutdown) = start_test_server(kind, dir.path()).await;

        let resp = client().get(format!("http://{addr}/a")).send().await.unwrap();
        assert_eq!(resp.status(), 301);
        assert_eq!(resp.headers()["location"], "https://a.example");

        let _ = shutdown.send(());
    }
}

#[tokio::test]
async fn default_mapping_redirects() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, shutdown) = start_test_server(EngineKind::Memory, dir.path()).await;

    let resp = client()
        .get(format!("http://{addr}/urlshort-godoc"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 301);
    assert_eq!(
        resp.headers()["location"],
        "https://godoc.org/github.com/gophercises/urlshort"
    );

    let _ = shutdown.send(());
}

#[tokio::test]
async fn unknown_path_serves_fallback() {
    let dir = tempfile::tempdir().unwrap();
    for kind in [EngineKind::Memory, EngineKind::Persistent] {
        let (addr, shutdown) = start_test_server(kind, dir.path()).await;

        let resp = client()
            .get(format!("http://{addr}/unknown"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert!(resp.headers().get("location").is_none());
        assert_eq!(resp.text().await.unwrap(), FALLBACK_BODY);

        let _ = shutdown.send(());
    }
}

#[tokio::test]
async fn any_method_is_redirected() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, shutdown) = start_test_server(EngineKind::Memory, dir.path()).await;

    let resp = client()
        .post(format!("http://{addr}/a"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 301);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn query_string_is_ignored_for_matching() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, shutdown) = start_test_server(EngineKind::Memory, dir.path()).await;

    let resp = client()
        .get(format!("http://{addr}/a?ref=mail"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 301);

    let resp = client()
        .get(format!("http://{addr}/a/"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn graceful_shutdown_works() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, shutdown) = start_test_server(EngineKind::Memory, dir.path()).await;

    let url = format!("http://{addr}/");
    assert!(client().get(&url).send().await.is_ok());

    let _ = shutdown.send(());
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    assert!(client().get(&url).send().await.is_err());
}

#[tokio::test]
async fn percent_encoded_path_matches_decoded_mapping() {
    let dir = tempfile::tempdir().unwrap();
    for kind in [EngineKind::Memory, EngineKind::Persistent] {
        let (addr, shutdown) = start_test_server(kind, dir.path()).await;

        let resp = client()
            .get(format!("http://{addr}/hello%20world"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 301);
        assert_eq!(resp.headers()["location"], "https://hello.example");

        let resp = client()
            .get(format!("http://{addr}/caf%C3%A9"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 301);
        assert_eq!(resp.headers()["location"], "https://cafe.example");

        let _ = shutdown.send(());
    }
}

#[tokio::test]
async fn storage_error_answers_500_and_flags_failure() {
    let state = Arc::new(AppState::new(corrupted_redirector()));
    let failure = server::storage_failure(state.fatal.subscribe());
    assert!(!state.has_failed());

    let resp = server::build_router(Arc::clone(&state))
        .oneshot(Request::builder().uri("/a").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(resp.headers().get("location").is_none());

    assert!(state.has_failed());
    assert!(tokio::time::timeout(Duration::from_secs(1), failure)
        .await
        .is_ok());
}

#[tokio::test]
async fn storage_error_stops_the_server() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let serving = tokio::spawn(run::serve(
        listener,
        corrupted_redirector(),
        std::future::pending::<()>(),
    ));

    {
        let resp = client().get(format!("http://{addr}/a")).send().await.unwrap();
        assert_eq!(resp.status(), 500);
    }

    let result = tokio::time::timeout(Duration::from_secs(5), serving)
        .await
        .expect("server did not stop after storage failure")
        .unwrap();
    assert!(matches!(result, Err(UrlshortError::StorageUnavailable)));
}

#[tokio::test]
async fn serve_returns_ok_on_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let redirector = load(EngineKind::Persistent, dir.path(), &[]).await.unwrap();
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    let serving = tokio::spawn(run::serve(listener, redirector, async {
        let _ = shutdown_rx.await;
    }));
    let _ = shutdown_tx.send(());

    assert!(serving.await.unwrap().is_ok());
    // The persistent table was released with the server.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
