//! Attendance endpoints.

use chrono::NaiveDate;
use schoolhub_core::error::{Result, SchoolHubError};
use schoolhub_core::grading::AttendanceSummary;
use schoolhub_core::types::{AttendanceEntry, AttendanceRecord, TakeAttendance};

use crate::client::SrsClient;
use crate::resources::Resource;

impl SrsClient {
    /// `POST /attendance`: a teacher marks one course session.
    pub async fn take_attendance(
        &self,
        course_id: &str,
        date: NaiveDate,
        entries: Vec<AttendanceEntry>,
    ) -> Result<()> {
        if entries.is_empty() {
            return Err(SchoolHubError::Validation(
                "attendance needs at least one student".into(),
            ));
        }
        let body = TakeAttendance {
            course_id: course_id.to_string(),
            date,
            records: entries,
        };
        self.post_unit(&self.url(Resource::Attendance, ""), &body)
            .await?;
        tracing::info!(course_id, %date, students = body.records.len(), "attendance recorded");
        Ok(())
    }

    pub async fn student_attendance(&self, student_id: &str) -> Result<Vec<AttendanceRecord>> {
        self.get_list(
            &self.entity_url(Resource::Attendance, &["student", student_id])?,
            &[],
        )
        .await
    }

    pub async fn course_attendance(
        &self,
        course_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        self.get_list(
            &self.entity_url(Resource::Attendance, &["course", course_id])?,
            &[("date", date.to_string())],
        )
        .await
    }

    /// Records plus the present/late/absent tally for one student.
    pub async fn attendance_summary(
        &self,
        student_id: &str,
    ) -> Result<(Vec<AttendanceRecord>, AttendanceSummary)> {
        let records = self.student_attendance(student_id).await?;
        let summary = AttendanceSummary::from_records(&records);
        Ok((records, summary))
    }
}
