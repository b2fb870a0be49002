//! Student, teacher and parent directory endpoints.

use async_trait::async_trait;
use schoolhub_core::error::Result;
use schoolhub_core::traits::DirectoryApi;
use schoolhub_core::types::{Guardian, ListQuery, Page, Student, Teacher};

use crate::client::SrsClient;
use crate::resources::Resource;

impl SrsClient {
    pub async fn list_students(&self, query: &ListQuery) -> Result<Page<Student>> {
        self.get_json(&self.url(Resource::Student, ""), &query.to_pairs())
            .await
    }

    pub async fn get_student(&self, id: &str) -> Result<Student> {
        self.get_entity(&self.entity_url(Resource::Student, &[id])?)
            .await
    }

    pub async fn list_teachers(&self, query: &ListQuery) -> Result<Page<Teacher>> {
        self.get_json(&self.url(Resource::Teachers, ""), &query.to_pairs())
            .await
    }

    pub async fn get_teacher(&self, id: &str) -> Result<Teacher> {
        self.get_entity(&self.entity_url(Resource::Teachers, &[id])?)
            .await
    }

    pub async fn list_parents(&self, query: &ListQuery) -> Result<Page<Guardian>> {
        self.get_json(&self.url(Resource::Parent, ""), &query.to_pairs())
            .await
    }

    pub async fn get_parent(&self, id: &str) -> Result<Guardian> {
        self.get_entity(&self.entity_url(Resource::Parent, &[id])?)
            .await
    }

    /// Students linked to a parent account.
    pub async fn children(&self, parent_id: &str) -> Result<Vec<Student>> {
        let page: Page<Student> = self
            .get_json(
                &self.url(Resource::Student, ""),
                &[("parentId", parent_id.to_string())],
            )
            .await?;
        // Older backends ignore the filter; enforce it here.
        Ok(page
            .data
            .into_iter()
            .filter(|s| s.parent_id.as_deref() == Some(parent_id))
            .collect())
    }
}

#[async_trait]
impl DirectoryApi for SrsClient {
    async fn search_students(&self, query: &ListQuery) -> Result<Page<Student>> {
        self.list_students(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{backend_config, spawn_backend};
    use axum::extract::{Path, Query};
    use axum::routing::get;
    use axum::{Json, Router};
    use std::collections::HashMap;

    fn directory_backend() -> Router {
        Router::new()
            .route(
                "/student",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    let all = vec![
                        serde_json::json!({"id": "s1", "firstName": "Ana", "lastName": "Lopez", "parentId": "p1"}),
                        serde_json::json!({"id": "s2", "firstName": "Ben", "lastName": "Okafor", "parentId": "p2"}),
                        serde_json::json!({"id": "s3", "firstName": "Anil", "lastName": "Rao", "parentId": "p1"}),
                    ];
                    let search = q.get("search").map(|s| s.to_lowercase());
                    let data: Vec<_> = all
                        .into_iter()
                        .filter(|s| match &search {
                            Some(term) => s["firstName"]
                                .as_str()
                                .is_some_and(|n| n.to_lowercase().contains(term.as_str())),
                            None => true,
                        })
                        .collect();
                    Json(serde_json::json!({"data": data}))
                }),
            )
            .route(
                "/teachers/{id}",
                get(|Path(id): Path<String>| async move {
                    Json(serde_json::json!({"_id": id, "firstName": "Mei", "lastName": "Chen"}))
                }),
            )
            .route(
                "/parent",
                get(|| async {
                    Json(serde_json::json!({"data": [
                        {"id": "p1", "firstName": "Rosa", "lastName": "Lopez", "phone": "555-0101"}
                    ], "totalRecords": 1}))
                }),
            )
    }

    #[tokio::test]
    async fn test_search_students() {
        let base = spawn_backend(directory_backend()).await;
        let client = SrsClient::new(&backend_config(&base), None).unwrap();
        let page = client.search_students(&ListQuery::search("an")).await.unwrap();
        let names: Vec<String> = page.data.iter().map(Student::full_name).collect();
        assert_eq!(names, vec!["Ana Lopez", "Anil Rao"]);
    }

    #[tokio::test]
    async fn test_children_filtered_by_parent() {
        let base = spawn_backend(directory_backend()).await;
        let client = SrsClient::new(&backend_config(&base), None).unwrap();
        let kids = client.children("p1").await.unwrap();
        let ids: Vec<&str> = kids.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s3"]);
    }

    #[tokio::test]
    async fn test_teacher_and_parents() {
        let base = spawn_backend(directory_backend()).await;
        let client = SrsClient::new(&backend_config(&base), None).unwrap();

        let teacher = client.get_teacher("t4").await.unwrap();
        assert_eq!(teacher.id, "t4");
        assert_eq!(teacher.full_name(), "Mei Chen");

        let parents = client.list_parents(&ListQuery::default()).await.unwrap();
        assert_eq!(parents.data[0].phone.as_deref(), Some("555-0101"));
    }
}
