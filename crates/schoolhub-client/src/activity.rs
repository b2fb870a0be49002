//! Activity log endpoints.

use async_trait::async_trait;
use schoolhub_core::error::{Result, SchoolHubError};
use schoolhub_core::traits::ActivityApi;
use schoolhub_core::types::{Activity, ListQuery, Page, Role};

use crate::client::SrsClient;
use crate::resources::Resource;

#[async_trait]
impl ActivityApi for SrsClient {
    async fn list_activities(&self, role: Role, query: &ListQuery) -> Result<Page<Activity>> {
        if !role.is_activity_actor() {
            return Err(SchoolHubError::InvalidRole(role.to_string()));
        }
        let mut params = vec![("performBy", role.to_string())];
        params.extend(query.to_pairs());
        self.get_json(&self.url(Resource::Activity, ""), &params).await
    }

    async fn delete_activity(&self, id: &str) -> Result<()> {
        self.delete(&self.entity_url(Resource::Activity, &[id])?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{backend_config, spawn_backend};
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::routing::{delete, get};
    use axum::{Json, Router};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    fn feed_backend() -> Router {
        Router::new()
            .route(
                "/activity",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    let role = q.get("performBy").cloned().unwrap_or_default();
                    Json(serde_json::json!({
                        "data": [
                            {"id": "a1", "title": "Course added", "subtitle": "Biology",
                             "performBy": role, "createdAt": "2026-10-16T11:30:00Z"},
                            {"id": "a2", "title": "Attendance taken", "subtitle": "Grade 7",
                             "performBy": role, "createdAt": "2026-10-15T09:00:00Z"}
                        ],
                        "totalRecords": 2, "totalPages": 1, "currentPage": 1,
                        "currentLimit": q.get("limit").and_then(|l| l.parse::<u64>().ok()).unwrap_or(10)
                    }))
                }),
            )
            .route(
                "/activity/{id}",
                delete(|Path(id): Path<String>| async move {
                    if id == "a1" {
                        StatusCode::OK
                    } else {
                        StatusCode::NOT_FOUND
                    }
                }),
            )
    }

    #[tokio::test]
    async fn test_list_filters_by_role() {
        let base = spawn_backend(feed_backend()).await;
        let client = SrsClient::new(&backend_config(&base), None).unwrap();
        let query = ListQuery {
            limit: Some(25),
            ..Default::default()
        };
        let page = client.list_activities(Role::Teacher, &query).await.unwrap();
        assert_eq!(page.data.len(), 2);
        assert!(page.data.iter().all(|a| a.perform_by == Role::Teacher));
        assert_eq!(page.current_limit, 25);
    }

    #[tokio::test]
    async fn test_list_rejects_non_actor_role_without_request() {
        // Nothing listens here; an attempted request would yield Http instead.
        let client = SrsClient::new(&backend_config("http://127.0.0.1:9"), None).unwrap();
        let err = client
            .list_activities(Role::Nurse, &ListQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolHubError::InvalidRole(r) if r == "Nurse"));
    }

    #[tokio::test]
    async fn test_delete() {
        let base = spawn_backend(feed_backend()).await;
        let client = SrsClient::new(&backend_config(&base), None).unwrap();
        client.delete_activity("a1").await.unwrap();
        assert!(matches!(
            client.delete_activity("zz").await,
            Err(SchoolHubError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_id_stays_one_segment() {
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let (on_activity, on_course) = (seen.clone(), seen.clone());
        let app = Router::new()
            .route(
                "/activity/{id}",
                delete(move |Path(id): Path<String>| async move {
                    on_activity.lock().unwrap().push(format!("activity:{id}"));
                    StatusCode::OK
                }),
            )
            .route(
                "/course/{id}",
                delete(move |Path(id): Path<String>| async move {
                    on_course.lock().unwrap().push(format!("course:{id}"));
                    StatusCode::OK
                }),
            );
        let base = spawn_backend(app).await;
        let client = SrsClient::new(&backend_config(&base), None).unwrap();

        client.delete_activity("../course/c1").await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["activity:../course/c1".to_string()]);

        assert!(matches!(
            client.delete_activity("..").await,
            Err(SchoolHubError::Validation(_))
        ));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
