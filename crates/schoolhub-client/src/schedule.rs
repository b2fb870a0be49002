//! Timetable endpoint.

use schoolhub_core::error::Result;
use schoolhub_core::types::ScheduleItem;

use crate::client::SrsClient;
use crate::resources::Resource;

/// Whose timetable to fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleOwner {
    Student(String),
    Teacher(String),
}

impl ScheduleOwner {
    fn query_pair(&self) -> (&'static str, String) {
        match self {
            ScheduleOwner::Student(id) => ("studentId", id.clone()),
            ScheduleOwner::Teacher(id) => ("teacherId", id.clone()),
        }
    }
}

impl SrsClient {
    pub async fn schedule(&self, owner: &ScheduleOwner) -> Result<Vec<ScheduleItem>> {
        self.get_list(&self.url(Resource::Schedule, ""), &[owner.query_pair()])
            .await
    }
}
