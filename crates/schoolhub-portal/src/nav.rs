//! Role portals: which sections each role sees and where it lands.

use schoolhub_core::error::{Result, SchoolHubError};
use schoolhub_core::types::Role;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Section {
    Dashboard,
    Courses,
    Departments,
    Students,
    Teachers,
    Parents,
    Children,
    Schedule,
    Attendance,
    Grades,
    ReportCards,
    Activity,
}

impl Section {
    pub fn label(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Courses => "Courses",
            Section::Departments => "Departments",
            Section::Students => "Students",
            Section::Teachers => "Teachers",
            Section::Parents => "Parents",
            Section::Children => "Children",
            Section::Schedule => "Schedule",
            Section::Attendance => "Attendance",
            Section::Grades => "Grades",
            Section::ReportCards => "Report Cards",
            Section::Activity => "Activity",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Section::Dashboard => "",
            Section::Courses => "courses",
            Section::Departments => "departments",
            Section::Students => "students",
            Section::Teachers => "teachers",
            Section::Parents => "parents",
            Section::Children => "children",
            Section::Schedule => "schedule",
            Section::Attendance => "attendance",
            Section::Grades => "grades",
            Section::ReportCards => "report-cards",
            Section::Activity => "activity",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

use Section::*;

const ADMIN: &[Section] = &[Dashboard, Courses, Departments, Students, Teachers, Parents, Schedule, Activity];
const TEACHER: &[Section] = &[Dashboard, Courses, Attendance, Grades, Schedule, Activity];
const STUDENT: &[Section] = &[Dashboard, Schedule, Grades, Attendance, ReportCards];
const PARENT: &[Section] = &[Dashboard, Children, Grades, Attendance, ReportCards];
const SECRETARY: &[Section] = &[Dashboard, Students, Parents, Teachers, Schedule];
const NURSE: &[Section] = &[Dashboard, Students];

/// Portal navigation for a role.
pub trait RoleNav {
    fn sections(&self) -> &'static [Section];
    fn home_path(&self) -> &'static str;

    fn can_access(&self, section: Section) -> bool {
        self.sections().contains(&section)
    }

    /// `Unauthorized` when the role's portal has no such section.
    fn require(&self, section: Section) -> Result<()>;

    /// Route of a section inside the role's portal, e.g. `/admin/courses`.
    fn path_of(&self, section: Section) -> Option<String> {
        if !self.can_access(section) {
            return None;
        }
        Some(match section.slug() {
            "" => self.home_path().to_string(),
            slug => format!("{}/{slug}", self.home_path()),
        })
    }
}

impl RoleNav for Role {
    fn sections(&self) -> &'static [Section] {
        match self {
            Role::Admin => ADMIN,
            Role::Teacher => TEACHER,
            Role::Student => STUDENT,
            Role::Parent => PARENT,
            Role::Secretary => SECRETARY,
            Role::Nurse => NURSE,
        }
    }

    fn home_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Teacher => "/teacher",
            Role::Student => "/student",
            Role::Parent => "/parent",
            Role::Secretary => "/secretary",
            Role::Nurse => "/nurse",
        }
    }

    fn require(&self, section: Section) -> Result<()> {
        if self.can_access(section) {
            Ok(())
        } else {
            tracing::warn!(role = %self, %section, "section not available for role");
            Err(SchoolHubError::Unauthorized(format!(
                "{section} is not available in the {self} portal"
            )))
        }
    }
}
