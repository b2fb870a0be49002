//! Resource registry: maps each backend resource to its path.

/// Backend collections the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Activity,
    Course,
    Department,
    Student,
    Teachers,
    Parent,
    Schedule,
    Attendance,
    StudentCourseGrade,
}

impl Resource {
    pub const ALL: [Resource; 9] = [
        Resource::Activity,
        Resource::Course,
        Resource::Department,
        Resource::Student,
        Resource::Teachers,
        Resource::Parent,
        Resource::Schedule,
        Resource::Attendance,
        Resource::StudentCourseGrade,
    ];

    /// Path relative to the backend base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Activity => "/activity",
            Resource::Course => "/course",
            Resource::Department => "/department",
            Resource::Student => "/student",
            Resource::Teachers => "/teachers",
            Resource::Parent => "/parent",
            Resource::Schedule => "/schedule",
            Resource::Attendance => "/attendance",
            Resource::StudentCourseGrade => "/grade/student-course",
        }
    }

    pub fn name(&self) -> &'static str {
        self.path().trim_start_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_unique_and_rooted() {
        let mut paths: Vec<&str> = Resource::ALL.iter().map(Resource::path).collect();
        assert!(paths.iter().all(|p| p.starts_with('/')));
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), Resource::ALL.len());
    }

    #[test]
    fn test_names() {
        assert_eq!(Resource::Teachers.name(), "teachers");
        assert_eq!(Resource::StudentCourseGrade.name(), "grade/student-course");
    }
}
