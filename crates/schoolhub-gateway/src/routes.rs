//! API route handlers for the gateway.

use axum::extract::{Path, Query, RawQuery, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::Method;
use schoolhub_client::{Forwarded, Resource, resource_path};
use schoolhub_core::error::SchoolHubError;
use schoolhub_core::traits::ActivityApi;
use schoolhub_core::types::{ListQuery, Role};
use schoolhub_portal::ActivityFeed;
use serde::Deserialize;
use std::sync::Arc;

use super::server::AppState;

/// Bearer token of the caller: the `Authorization` header, else the `token`
/// cookie set by the login page.
pub(crate) fn caller_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|t| !t.is_empty())
    {
        return Some(token.to_string());
    }
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == "token" && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({"ok": false, "error": message.into()})),
    )
        .into_response()
}

fn error_response(e: &SchoolHubError) -> Response {
    let status = match e {
        SchoolHubError::InvalidRole(_) | SchoolHubError::Validation(_) => StatusCode::BAD_REQUEST,
        SchoolHubError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        SchoolHubError::NotFound(_) => StatusCode::NOT_FOUND,
        SchoolHubError::Conflict(_) => StatusCode::CONFLICT,
        SchoolHubError::Http(_) | SchoolHubError::Decode(_) | SchoolHubError::Api { .. } => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_body(status, e.to_string())
}

/// Relay a backend response: same status, same content type, same bytes.
fn relay(forwarded: Forwarded) -> Response {
    let status = StatusCode::from_u16(forwarded.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut resp = (status, forwarded.body).into_response();
    match forwarded
        .content_type
        .and_then(|ct| HeaderValue::from_str(&ct).ok())
    {
        Some(ct) => {
            resp.headers_mut().insert(CONTENT_TYPE, ct);
        }
        None => {
            resp.headers_mut().remove(CONTENT_TYPE);
        }
    }
    resp
}

async fn pass_through(state: &AppState, path_and_query: String, headers: &HeaderMap) -> Response {
    let token = caller_token(headers);
    match state
        .client
        .forward(Method::GET, &path_and_query, token.as_deref())
        .await
    {
        Ok(forwarded) => relay(forwarded),
        Err(e) => {
            tracing::error!(path = %path_and_query, error = %e, "pass-through failed");
            error_body(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

/// Health check endpoint.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "schoolhub-gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// System information endpoint.
pub async fn system_info(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "platform": format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH),
        "uptime_secs": state.start_time.elapsed().as_secs(),
        "backend": state.client.base_url(),
        "gateway": {
            "host": state.config.gateway.host,
            "port": state.config.gateway.port,
        }
    }))
}

/// `GET /api/grade/student-course` → backend `/grade/student-course`, query
/// string untouched.
pub async fn proxy_student_course_grades(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let path = match query {
        Some(q) if !q.is_empty() => format!("/grade/student-course?{q}"),
        _ => "/grade/student-course".to_string(),
    };
    pass_through(&state, path, &headers).await
}

/// `GET /api/student/{id}/report-cards` → backend `/student/{id}/report-cards`.
pub async fn proxy_report_cards(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    match resource_path(Resource::Student, &[id.as_str(), "report-cards"]) {
        Ok(path) => pass_through(&state, path, &headers).await,
        Err(e) => error_response(&e),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityParams {
    perform_by: String,
    page: Option<u64>,
    limit: Option<u64>,
    search: Option<String>,
}

/// `GET /api/activity?performBy=` → timeline rows with relative-time labels.
pub async fn list_activity(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ActivityParams>,
    headers: HeaderMap,
) -> Response {
    let role: Role = match params.perform_by.parse() {
        Ok(role) => role,
        Err(e) => return error_response(&e),
    };
    let query = ListQuery {
        page: params.page,
        limit: params.limit.or(Some(state.config.portal.page_limit)),
        search: params.search,
    };

    let api: Arc<dyn ActivityApi> = Arc::new(state.client.with_token(caller_token(&headers)));
    let mut feed = ActivityFeed::new(api);
    match feed.fetch(role, &query).await {
        Ok(()) => Json(serde_json::json!({
            "ok": true,
            "data": feed.items(),
            "page": feed.page(),
        }))
        .into_response(),
        Err(e) => error_response(&e),
    }
}

/// `DELETE /api/activity/{id}`.
pub async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let client = state.client.with_token(caller_token(&headers));
    match client.delete_activity(&id).await {
        Ok(()) => Json(serde_json::json!({"ok": true, "message": "Activity deleted successfully"}))
            .into_response(),
        Err(e) => error_response(&e),
    }
}
