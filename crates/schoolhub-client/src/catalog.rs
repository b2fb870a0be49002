//! Course and department endpoints.

use async_trait::async_trait;
use reqwest::Method;
use schoolhub_core::error::Result;
use schoolhub_core::traits::CatalogApi;
use schoolhub_core::types::{
    Course, CourseUpdate, Department, DepartmentUpdate, ListQuery, NewCourse, NewDepartment, Page,
};

use crate::client::SrsClient;
use crate::resources::Resource;

impl SrsClient {
    pub async fn list_courses(&self, query: &ListQuery) -> Result<Page<Course>> {
        self.get_json(&self.url(Resource::Course, ""), &query.to_pairs())
            .await
    }

    pub async fn get_course(&self, id: &str) -> Result<Course> {
        self.get_entity(&self.entity_url(Resource::Course, &[id])?)
            .await
    }

    pub async fn delete_course(&self, id: &str) -> Result<()> {
        self.delete(&self.entity_url(Resource::Course, &[id])?)
            .await
    }

    pub async fn list_departments(&self, query: &ListQuery) -> Result<Page<Department>> {
        self.get_json(&self.url(Resource::Department, ""), &query.to_pairs())
            .await
    }

    pub async fn delete_department(&self, id: &str) -> Result<()> {
        self.delete(&self.entity_url(Resource::Department, &[id])?)
            .await
    }
}

#[async_trait]
impl CatalogApi for SrsClient {
    async fn create_course(&self, course: &NewCourse) -> Result<Course> {
        self.send_entity(Method::POST, &self.url(Resource::Course, ""), course)
            .await
    }

    async fn update_course(&self, id: &str, update: &CourseUpdate) -> Result<Course> {
        self.send_entity(
            Method::PATCH,
            &self.entity_url(Resource::Course, &[id])?,
            update,
        )
        .await
    }

    async fn create_department(&self, department: &NewDepartment) -> Result<Department> {
        self.send_entity(Method::POST, &self.url(Resource::Department, ""), department)
            .await
    }

    async fn update_department(&self, id: &str, update: &DepartmentUpdate) -> Result<Department> {
        self.send_entity(
            Method::PATCH,
            &self.entity_url(Resource::Department, &[id])?,
            update,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{backend_config, spawn_backend};
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::{get, patch, post};
    use axum::{Json, Router};
    use schoolhub_core::error::SchoolHubError;

    fn catalog_backend() -> Router {
        Router::new()
            .route(
                "/department",
                post(|Json(body): Json<serde_json::Value>| async move {
                    if body["name"] == "Science" {
                        (
                            StatusCode::CONFLICT,
                            Json(serde_json::json!({"message": "Department name already exists"})),
                        )
                            .into_response()
                    } else {
                        (
                            StatusCode::CREATED,
                            Json(serde_json::json!({"data": {"id": "d9", "name": body["name"]}})),
                        )
                            .into_response()
                    }
                })
                .get(|| async {
                    Json(serde_json::json!({
                        "data": [{"id": "d1", "name": "Science"}],
                        "totalRecords": 1, "totalPages": 1, "currentPage": 1, "currentLimit": 10
                    }))
                }),
            )
            .route(
                "/department/{id}",
                patch(|Path(id): Path<String>, Json(body): Json<serde_json::Value>| async move {
                    // Echo what the body asked for the description.
                    let description = match body.get("description") {
                        Some(serde_json::Value::Null) => "cleared".to_string(),
                        Some(v) => v.to_string(),
                        None => "untouched".to_string(),
                    };
                    Json(serde_json::json!({"id": id, "name": "Math", "description": description}))
                }),
            )
            .route(
                "/course/{id}",
                patch(|Path(id): Path<String>, Json(body): Json<serde_json::Value>| async move {
                    Json(serde_json::json!({"id": id, "name": body["name"], "code": "BIO-1"}))
                })
                .get(|Path(id): Path<String>| async move {
                    Json(serde_json::json!({"id": id, "name": "Biology"}))
                }),
            )
            .route(
                "/course",
                get(|| async {
                    Json(serde_json::json!({"data": [
                        {"id": "c1", "name": "Biology"},
                        {"id": "c2", "name": "Chemistry", "credits": 3.0}
                    ]}))
                }),
            )
    }

    #[tokio::test]
    async fn test_create_department() {
        let base = spawn_backend(catalog_backend()).await;
        let client = SrsClient::new(&backend_config(&base), None).unwrap();
        let dept = client
            .create_department(&NewDepartment {
                name: "History".into(),
                description: None,
            })
            .await
            .unwrap();
        assert_eq!(dept.id, "d9");
        assert_eq!(dept.name, "History");
    }

    #[tokio::test]
    async fn test_duplicate_department_is_conflict_with_server_message() {
        let base = spawn_backend(catalog_backend()).await;
        let client = SrsClient::new(&backend_config(&base), None).unwrap();
        let err = client
            .create_department(&NewDepartment {
                name: "Science".into(),
                description: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolHubError::Conflict(ref m) if m == "Department name already exists"));
        assert_eq!(err.user_message(), "Department name already exists");
    }

    #[tokio::test]
    async fn test_update_course_patches() {
        let base = spawn_backend(catalog_backend()).await;
        let client = SrsClient::new(&backend_config(&base), None).unwrap();
        let course = client
            .update_course(
                "c1",
                &CourseUpdate {
                    name: Some("Biology II".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(course.id, "c1");
        assert_eq!(course.name, "Biology II");
        assert_eq!(course.code.as_deref(), Some("BIO-1"));
    }

    #[tokio::test]
    async fn test_list_and_get() {
        let base = spawn_backend(catalog_backend()).await;
        let client = SrsClient::new(&backend_config(&base), None).unwrap();

        let courses = client.list_courses(&ListQuery::default()).await.unwrap();
        assert_eq!(courses.data.len(), 2);
        assert_eq!(courses.total_records, 2);
        assert_eq!(courses.data[1].credits, Some(3.0));

        let departments = client.list_departments(&ListQuery::default()).await.unwrap();
        assert_eq!(departments.data[0].name, "Science");

        let course = client.get_course("c7").await.unwrap();
        assert_eq!(course.id, "c7");
    }

    #[tokio::test]
    async fn test_update_department_sends_null_to_clear() {
        let base = spawn_backend(catalog_backend()).await;
        let client = SrsClient::new(&backend_config(&base), None).unwrap();

        let cleared = DepartmentUpdate {
            description: Some(None),
            ..Default::default()
        };
        let dept = client.update_department("d1", &cleared).await.unwrap();
        assert_eq!(dept.description.as_deref(), Some("cleared"));

        let renamed = DepartmentUpdate {
            name: Some("Mathematics".into()),
            ..Default::default()
        };
        let dept = client.update_department("d1", &renamed).await.unwrap();
        assert_eq!(dept.description.as_deref(), Some("untouched"));
    }
}
