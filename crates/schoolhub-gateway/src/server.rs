//! HTTP server implementation using Axum.

use axum::{
    Router,
    routing::{delete, get},
};
use schoolhub_client::SrsClient;
use schoolhub_core::config::SchoolHubConfig;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state for the gateway server.
#[derive(Clone)]
pub struct AppState {
    pub config: SchoolHubConfig,
    /// Backend client without a session; each request supplies its own token.
    pub client: SrsClient,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: SchoolHubConfig) -> schoolhub_core::Result<Self> {
        let client = schoolhub_client::create_client(&config, None)?;
        Ok(Self {
            config,
            client,
            start_time: std::time::Instant::now(),
        })
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = origins
            .iter()
            .filter_map(|s| s.trim().parse::<axum::http::HeaderValue>().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.gateway.cors_origins);
    let shared = Arc::new(state);

    Router::new()
        .route("/health", get(super::routes::health_check))
        .route("/api/info", get(super::routes::system_info))
        .route(
            "/api/grade/student-course",
            get(super::routes::proxy_student_course_grades),
        )
        .route(
            "/api/student/{id}/report-cards",
            get(super::routes::proxy_report_cards),
        )
        .route("/api/activity", get(super::routes::list_activity))
        .route("/api/activity/{id}", delete(super::routes::delete_activity))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

/// Start the HTTP server.
pub async fn start(config: SchoolHubConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let backend = config.backend.srs_server.clone();
    let state = AppState::new(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%backend, "gateway listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
