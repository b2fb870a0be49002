//! Backend seams used by the portal views.
//!
//! `schoolhub-client::SrsClient` implements all of them; views depend on the
//! traits so they can be driven by in-memory fakes.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    Activity, Course, CourseUpdate, Department, DepartmentUpdate, ListQuery, NewCourse,
    NewDepartment, Page, Role, Student,
};

#[async_trait]
pub trait ActivityApi: Send + Sync {
    /// `GET /activity?performBy=<role>`.
    async fn list_activities(&self, role: Role, query: &ListQuery) -> Result<Page<Activity>>;

    /// `DELETE /activity/:id`.
    async fn delete_activity(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn create_course(&self, course: &NewCourse) -> Result<Course>;

    async fn update_course(&self, id: &str, update: &CourseUpdate) -> Result<Course>;

    async fn create_department(&self, department: &NewDepartment) -> Result<Department>;

    async fn update_department(&self, id: &str, update: &DepartmentUpdate) -> Result<Department>;
}

#[async_trait]
pub trait DirectoryApi: Send + Sync {
    async fn search_students(&self, query: &ListQuery) -> Result<Page<Student>>;
}
