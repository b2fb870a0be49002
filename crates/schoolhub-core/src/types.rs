//! Data model mirrored from the SRS backend.
//!
//! Every DTO is validated by serde at the network boundary: required fields
//! that are missing or mistyped turn into a decode error instead of a
//! half-filled struct.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SchoolHubError;

// ─── Roles ───────────────────────────────────────────────────────────────────

/// Portal role of the signed-in user. Also used as the `performBy` filter of
/// the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Teacher,
    Student,
    Parent,
    Secretary,
    Nurse,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::Teacher,
        Role::Student,
        Role::Parent,
        Role::Secretary,
        Role::Nurse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Teacher => "Teacher",
            Role::Student => "Student",
            Role::Parent => "Parent",
            Role::Secretary => "Secretary",
            Role::Nurse => "Nurse",
        }
    }

    /// Only these roles ever appear as `performBy` on an activity record.
    pub fn is_activity_actor(&self) -> bool {
        matches!(self, Role::Admin | Role::Teacher | Role::Student)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SchoolHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SchoolHubError::InvalidRole(s.to_string()))
    }
}

// ─── Activity log ────────────────────────────────────────────────────────────

/// A logged admin/teacher action, shown in a timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub perform_by: Role,
    pub created_at: DateTime<Utc>,
}

// ─── Pagination ──────────────────────────────────────────────────────────────

/// A page of records with the pagination fields echoed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    from = "PageWire<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total_records: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub current_limit: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageWire<T> {
    data: Vec<T>,
    total_records: Option<u64>,
    total_pages: Option<u64>,
    current_page: Option<u64>,
    current_limit: Option<u64>,
}

impl<T> From<PageWire<T>> for Page<T> {
    fn from(w: PageWire<T>) -> Self {
        let len = w.data.len() as u64;
        Self {
            total_records: w.total_records.unwrap_or(len),
            total_pages: w.total_pages.unwrap_or(1),
            current_page: w.current_page.unwrap_or(1),
            current_limit: w.current_limit.unwrap_or(len),
            data: w.data,
        }
    }
}

impl<T> Page<T> {
    /// Wrap a bare list (endpoints that do not paginate).
    pub fn single(data: Vec<T>) -> Self {
        PageWire {
            data,
            total_records: None,
            total_pages: None,
            current_page: None,
            current_limit: None,
        }
        .into()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total_records: self.total_records,
            total_pages: self.total_pages,
            current_page: self.current_page,
            current_limit: self.current_limit,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Paging and search parameters for list endpoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }

    /// Query-string pairs; empty search terms are omitted.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            pairs.push(("search", search.to_string()));
        }
        pairs
    }
}

// ─── Courses & departments ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub department_id: Option<String>,
    #[serde(default)]
    pub teacher_id: Option<String>,
    #[serde(default)]
    pub credits: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<f64>,
}

/// PATCH body: only the fields that changed are sent.
///
/// Optional fields are `None` when untouched, `Some(None)` to clear them
/// (serialized as `null`) and `Some(Some(v))` to set them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<Option<f64>>,
}

impl CourseUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDepartment {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Department PATCH body, same conventions as [`CourseUpdate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

impl DepartmentUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ─── People ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(alias = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub grade_level: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    #[serde(alias = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub department_id: Option<String>,
}

/// A parent or guardian record (`/parent`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guardian {
    #[serde(alias = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

macro_rules! impl_full_name {
    ($($ty:ty),*) => {
        $(impl $ty {
            pub fn full_name(&self) -> String {
                format!("{} {}", self.first_name, self.last_name)
            }
        })*
    };
}

impl_full_name!(Student, Teacher, Guardian);

// ─── Schedule ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    #[serde(alias = "_id")]
    pub id: String,
    pub course_id: String,
    #[serde(default)]
    pub course_name: Option<String>,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub teacher_name: Option<String>,
}

// ─── Attendance ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
}

impl FromStr for AttendanceStatus {
    type Err = SchoolHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" | "p" => Ok(Self::Present),
            "late" | "l" => Ok(Self::Late),
            "absent" | "a" => Ok(Self::Absent),
            other => Err(SchoolHubError::Validation(format!(
                "unknown attendance status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    pub student_id: String,
    #[serde(default)]
    pub course_id: Option<String>,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// One student's mark when a teacher takes attendance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    pub student_id: String,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeAttendance {
    pub course_id: String,
    pub date: NaiveDate,
    pub records: Vec<AttendanceEntry>,
}

// ─── Grades ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeComponent {
    pub name: String,
    pub weight: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCourseGrade {
    pub student_id: String,
    pub course_id: String,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub components: Vec<GradeComponent>,
    /// Backend-computed percentage, when it sends one.
    #[serde(default)]
    pub percentage: Option<f64>,
}
