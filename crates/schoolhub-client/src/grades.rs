//! Grade endpoints.

use reqwest::Method;
use schoolhub_core::error::Result;
use schoolhub_core::grading::{letter_grade, weighted_percentage};
use schoolhub_core::types::StudentCourseGrade;
use serde::Serialize;

use crate::client::{Forwarded, SrsClient, resource_path};
use crate::resources::Resource;

/// A course grade ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeView {
    pub course_id: String,
    pub course_name: Option<String>,
    pub percentage: Option<f64>,
    pub letter: Option<&'static str>,
}

impl From<&StudentCourseGrade> for GradeView {
    fn from(g: &StudentCourseGrade) -> Self {
        // Prefer the backend's number; fall back to the weighted components.
        let percentage = g.percentage.or_else(|| weighted_percentage(&g.components));
        Self {
            course_id: g.course_id.clone(),
            course_name: g.course_name.clone(),
            percentage,
            letter: percentage.map(letter_grade),
        }
    }
}

impl SrsClient {
    /// `GET /grade/student-course`; `course_id = None` returns every course.
    pub async fn student_course_grades(
        &self,
        student_id: &str,
        course_id: Option<&str>,
    ) -> Result<Vec<StudentCourseGrade>> {
        let mut params = vec![("studentId", student_id.to_string())];
        if let Some(course_id) = course_id {
            params.push(("courseId", course_id.to_string()));
        }
        self.get_list(&self.url(Resource::StudentCourseGrade, ""), &params)
            .await
    }

    /// `GET /student/:id/report-cards`, returned as the backend sent it.
    pub async fn report_cards(&self, student_id: &str) -> Result<Forwarded> {
        self.forward(
            Method::GET,
            &resource_path(Resource::Student, &[student_id, "report-cards"])?,
            None,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{backend_config, spawn_backend};
    use axum::extract::Query;
    use axum::routing::get;
    use axum::{Json, Router};
    use schoolhub_core::types::GradeComponent;
    use std::collections::HashMap;

    #[test]
    fn test_grade_view_prefers_backend_percentage() {
        let g = StudentCourseGrade {
            student_id: "s1".into(),
            course_id: "c1".into(),
            course_name: Some("Algebra".into()),
            components: vec![GradeComponent { name: "Final".into(), weight: 1.0, score: 10.0 }],
            percentage: Some(92.0),
        };
        let view = GradeView::from(&g);
        assert_eq!(view.percentage, Some(92.0));
        assert_eq!(view.letter, Some("A"));
    }

    #[test]
    fn test_grade_view_from_components() {
        let g = StudentCourseGrade {
            student_id: "s1".into(),
            course_id: "c1".into(),
            course_name: None,
            components: vec![
                GradeComponent { name: "Quiz".into(), weight: 1.0, score: 60.0 },
                GradeComponent { name: "Exam".into(), weight: 1.0, score: 70.0 },
            ],
            percentage: None,
        };
        let view = GradeView::from(&g);
        assert_eq!(view.percentage, Some(65.0));
        assert_eq!(view.letter, Some("D"));
    }

    #[test]
    fn test_grade_view_without_data() {
        let g = StudentCourseGrade {
            student_id: "s1".into(),
            course_id: "c1".into(),
            course_name: None,
            components: vec![],
            percentage: None,
        };
        assert_eq!(GradeView::from(&g).letter, None);
    }

    #[tokio::test]
    async fn test_student_course_grades_query() {
        let app = Router::new().route(
            "/grade/student-course",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                Json(serde_json::json!({"data": [{
                    "studentId": q.get("studentId").cloned().unwrap_or_default(),
                    "courseId": q.get("courseId").cloned().unwrap_or_else(|| "all".into()),
                    "percentage": 85.0
                }]}))
            }),
        );
        let base = spawn_backend(app).await;
        let client = SrsClient::new(&backend_config(&base), None).unwrap();

        let grades = client.student_course_grades("s1", Some("c2")).await.unwrap();
        assert_eq!(grades[0].student_id, "s1");
        assert_eq!(grades[0].course_id, "c2");

        let grades = client.student_course_grades("s1", None).await.unwrap();
        assert_eq!(grades[0].course_id, "all");
        assert_eq!(GradeView::from(&grades[0]).letter, Some("B"));
    }
}
