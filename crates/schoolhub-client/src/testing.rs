//! In-process fake backend for client tests.

use axum::Router;
use schoolhub_core::config::BackendConfig;

/// Serve `app` on an ephemeral localhost port and return its base URL.
pub(crate) async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub(crate) fn backend_config(base_url: &str) -> BackendConfig {
    BackendConfig {
        srs_server: base_url.to_string(),
        timeout_secs: 5,
        ..BackendConfig::default()
    }
}
