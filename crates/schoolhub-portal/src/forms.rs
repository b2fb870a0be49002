//! Add/edit dialogs for courses and departments.
//!
//! A form keeps its field values and an error line. Only a duplicate name
//! (HTTP 409) gets the server's own message; every other failure shows the
//! generic one. Fields survive a failed submit so the user can fix and retry.

use schoolhub_core::error::{Result, SchoolHubError};
use schoolhub_core::traits::CatalogApi;
use schoolhub_core::types::{
    Course, CourseUpdate, Department, DepartmentUpdate, NewCourse, NewDepartment,
};

fn non_blank(value: &str) -> Option<String> {
    let v = value.trim();
    (!v.is_empty()).then(|| v.to_string())
}

/// `Some(new)` when it differs from the stored value; `Some(None)` clears it.
fn changed<T: PartialEq>(new: Option<T>, old: Option<T>) -> Option<Option<T>> {
    (new != old).then_some(new)
}

fn stored(value: &Option<String>) -> Option<String> {
    value.as_deref().and_then(non_blank)
}

fn require_name(name: &str, what: &str) -> Result<String> {
    non_blank(name).ok_or_else(|| SchoolHubError::Validation(format!("{what} name is required")))
}

/// Record the failure on the form, then hand it back to the caller.
fn fail<T>(error: &mut Option<String>, e: SchoolHubError) -> Result<T> {
    if e.is_conflict() {
        tracing::warn!(error = %e, "duplicate name rejected by backend");
    } else {
        tracing::error!(error = %e, "form submit failed");
    }
    *error = Some(e.user_message());
    Err(e)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepartmentForm {
    original: Option<Department>,
    pub name: String,
    pub description: String,
    error: Option<String>,
}

impl DepartmentForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edit(department: &Department) -> Self {
        Self {
            original: Some(department.clone()),
            name: department.name.clone(),
            description: department.description.clone().unwrap_or_default(),
            error: None,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.original.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fields that differ from the department being edited.
    pub fn changes(&self) -> DepartmentUpdate {
        let Some(orig) = &self.original else {
            return DepartmentUpdate::default();
        };
        let name = self.name.trim();
        DepartmentUpdate {
            name: (name != orig.name).then(|| name.to_string()),
            description: changed(non_blank(&self.description), stored(&orig.description)),
        }
    }

    /// POST a new department, or PATCH only the changed fields when editing.
    pub async fn submit(&mut self, api: &dyn CatalogApi) -> Result<Department> {
        self.error = None;
        let name = match require_name(&self.name, "Department") {
            Ok(name) => name,
            Err(e) => return fail(&mut self.error, e),
        };

        let result = match &self.original {
            Some(orig) => {
                let update = self.changes();
                if update.is_empty() {
                    tracing::debug!(id = %orig.id, "department unchanged, nothing to send");
                    let orig = orig.clone();
                    *self = Self::default();
                    return Ok(orig);
                }
                api.update_department(&orig.id, &update).await
            }
            None => {
                let body = NewDepartment {
                    name,
                    description: non_blank(&self.description),
                };
                api.create_department(&body).await
            }
        };
        match result {
            Ok(department) => {
                tracing::info!(id = %department.id, name = %department.name, "department saved");
                *self = Self::default();
                Ok(department)
            }
            Err(e) => fail(&mut self.error, e),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseForm {
    original: Option<Course>,
    pub name: String,
    pub code: String,
    pub description: String,
    pub department_id: String,
    pub teacher_id: String,
    pub credits: Option<f64>,
    error: Option<String>,
}

impl CourseForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edit(course: &Course) -> Self {
        Self {
            original: Some(course.clone()),
            name: course.name.clone(),
            code: course.code.clone().unwrap_or_default(),
            description: course.description.clone().unwrap_or_default(),
            department_id: course.department_id.clone().unwrap_or_default(),
            teacher_id: course.teacher_id.clone().unwrap_or_default(),
            credits: course.credits,
            error: None,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.original.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn to_new(&self, name: String) -> NewCourse {
        NewCourse {
            name,
            code: non_blank(&self.code),
            description: non_blank(&self.description),
            department_id: non_blank(&self.department_id),
            teacher_id: non_blank(&self.teacher_id),
            credits: self.credits,
        }
    }

    /// Fields that differ from the course being edited.
    pub fn changes(&self) -> CourseUpdate {
        let Some(orig) = &self.original else {
            return CourseUpdate::default();
        };
        let name = self.name.trim();
        CourseUpdate {
            name: (name != orig.name).then(|| name.to_string()),
            code: changed(non_blank(&self.code), stored(&orig.code)),
            description: changed(non_blank(&self.description), stored(&orig.description)),
            department_id: changed(non_blank(&self.department_id), stored(&orig.department_id)),
            teacher_id: changed(non_blank(&self.teacher_id), stored(&orig.teacher_id)),
            credits: changed(self.credits, orig.credits),
        }
    }

    /// POST a new course, or PATCH only the changed fields when editing.
    /// An edit without changes returns the original course without a request.
    pub async fn submit(&mut self, api: &dyn CatalogApi) -> Result<Course> {
        self.error = None;
        let name = match require_name(&self.name, "Course") {
            Ok(name) => name,
            Err(e) => return fail(&mut self.error, e),
        };

        let result = match &self.original {
            Some(orig) => {
                let update = self.changes();
                if update.is_empty() {
                    tracing::debug!(id = %orig.id, "course unchanged, nothing to send");
                    let orig = orig.clone();
                    *self = Self::default();
                    return Ok(orig);
                }
                api.update_course(&orig.id, &update).await
            }
            None => api.create_course(&self.to_new(name)).await,
        };
        match result {
            Ok(course) => {
                tracing::info!(id = %course.id, name = %course.name, "course saved");
                *self = Self::default();
                Ok(course)
            }
            Err(e) => fail(&mut self.error, e),
        }
    }
}
