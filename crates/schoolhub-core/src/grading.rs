//! Display formatting for grades and attendance.
//!
//! The backend owns grade computation and attendance rules; these helpers only
//! turn numbers it sends into the labels the portals show.

use serde::Serialize;

use crate::types::{AttendanceRecord, AttendanceStatus, GradeComponent};

/// Letter for a percentage score: ≥90 A, ≥80 B, ≥70 C, ≥60 D, else F.
pub fn letter_grade(score: f64) -> &'static str {
    match score {
        s if s >= 90.0 => "A",
        s if s >= 80.0 => "B",
        s if s >= 70.0 => "C",
        s if s >= 60.0 => "D",
        _ => "F",
    }
}

/// Σ(score × weight) / Σ(weight). `None` when no component carries weight.
pub fn weighted_percentage(components: &[GradeComponent]) -> Option<f64> {
    let total_weight: f64 = components.iter().map(|c| c.weight).sum();
    if total_weight <= 0.0 {
        return None;
    }
    let weighted: f64 = components.iter().map(|c| c.score * c.weight).sum();
    Some(weighted / total_weight)
}

/// Attendance tally for one student. Late counts as attended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AttendanceSummary {
    pub present: u32,
    pub late: u32,
    pub absent: u32,
}

impl AttendanceSummary {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a AttendanceRecord>,
    {
        Self::from_statuses(records.into_iter().map(|r| r.status))
    }

    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = AttendanceStatus>,
    {
        let mut summary = Self::default();
        for status in statuses {
            match status {
                AttendanceStatus::Present => summary.present += 1,
                AttendanceStatus::Late => summary.late += 1,
                AttendanceStatus::Absent => summary.absent += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> u32 {
        self.present + self.late + self.absent
    }

    /// (present + late) / total × 100; 0 when nothing was recorded.
    pub fn effective_percentage(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        f64::from(self.present + self.late) / f64::from(total) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AttendanceStatus::{Absent, Late, Present};

    #[test]
    fn test_letter_grades() {
        assert_eq!(letter_grade(92.0), "A");
        assert_eq!(letter_grade(85.0), "B");
        assert_eq!(letter_grade(72.0), "C");
        assert_eq!(letter_grade(65.0), "D");
        assert_eq!(letter_grade(40.0), "F");
    }

    #[test]
    fn test_letter_grade_boundaries() {
        assert_eq!(letter_grade(90.0), "A");
        assert_eq!(letter_grade(89.99), "B");
        assert_eq!(letter_grade(80.0), "B");
        assert_eq!(letter_grade(70.0), "C");
        assert_eq!(letter_grade(60.0), "D");
        assert_eq!(letter_grade(59.9), "F");
    }

    #[test]
    fn test_weighted_percentage() {
        let components = vec![
            GradeComponent { name: "Homework".into(), weight: 20.0, score: 100.0 },
            GradeComponent { name: "Midterm".into(), weight: 30.0, score: 80.0 },
            GradeComponent { name: "Final".into(), weight: 50.0, score: 70.0 },
        ];
        let pct = weighted_percentage(&components).unwrap();
        assert!((pct - 79.0).abs() < 1e-9);
        assert_eq!(letter_grade(pct), "C");
    }

    #[test]
    fn test_weighted_percentage_without_weight() {
        assert_eq!(weighted_percentage(&[]), None);
        let zero = vec![GradeComponent { name: "Quiz".into(), weight: 0.0, score: 50.0 }];
        assert_eq!(weighted_percentage(&zero), None);
    }

    #[test]
    fn test_late_counts_as_present() {
        let statuses = std::iter::repeat_n(Present, 8).chain(std::iter::repeat_n(Late, 2));
        let summary = AttendanceSummary::from_statuses(statuses);
        assert_eq!(summary.total(), 10);
        assert_eq!(summary.absent, 0);
        assert!((summary.effective_percentage() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_absences_reduce_percentage() {
        let summary = AttendanceSummary::from_statuses([Present, Present, Late, Absent]);
        assert!((summary.effective_percentage() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_records() {
        assert_eq!(AttendanceSummary::default().effective_percentage(), 0.0);
    }
}
