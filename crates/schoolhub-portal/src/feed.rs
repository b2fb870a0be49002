//! Activity feed: the timeline shown on the admin and teacher dashboards.
//!
//! Fetches activity records for one actor role, turns them into view models
//! with a relative-time label, and deletes entries optimistically: the local
//! list changes only once the backend confirms the DELETE.

use chrono::{DateTime, Utc};
use schoolhub_core::error::{GENERIC_ERROR_MESSAGE, Result, SchoolHubError};
use schoolhub_core::timefmt::{Clock, SystemClock, relative_time};
use schoolhub_core::traits::ActivityApi;
use schoolhub_core::types::{Activity, ListQuery, Page, Role};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::toast::ToastQueue;
use crate::view::{LoadState, ViewScope};

/// One timeline row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityView {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub perform_by: Role,
    pub created_at: DateTime<Utc>,
    pub relative_time: String,
}

impl ActivityView {
    pub fn new(activity: Activity, now: DateTime<Utc>) -> Self {
        Self {
            relative_time: relative_time(activity.created_at, now),
            id: activity.id,
            title: activity.title,
            subtitle: activity.subtitle,
            perform_by: activity.perform_by,
            created_at: activity.created_at,
        }
    }
}

/// Pagination echoed from the last successful fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_records: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub current_limit: u64,
}

impl<T> From<&Page<T>> for PageInfo {
    fn from(p: &Page<T>) -> Self {
        Self {
            total_records: p.total_records,
            total_pages: p.total_pages,
            current_page: p.current_page,
            current_limit: p.current_limit,
        }
    }
}

/// Convert a fetched page into rows, keeping the first record of any
/// duplicated id.
pub fn to_views(page: Page<Activity>, now: DateTime<Utc>) -> (Vec<ActivityView>, PageInfo) {
    let info = PageInfo::from(&page);
    let mut seen = HashSet::new();
    let mut views = Vec::with_capacity(page.data.len());
    for activity in page.data {
        if !seen.insert(activity.id.clone()) {
            tracing::warn!(id = %activity.id, "duplicate activity id in page, skipping");
            continue;
        }
        views.push(ActivityView::new(activity, now));
    }
    (views, info)
}

pub struct ActivityFeed {
    api: Arc<dyn ActivityApi>,
    clock: Arc<dyn Clock>,
    scope: ViewScope,
    toasts: ToastQueue,
    role: Option<Role>,
    items: Vec<ActivityView>,
    page: Option<PageInfo>,
    error: Option<String>,
    loaded: bool,
}

impl ActivityFeed {
    pub fn new(api: Arc<dyn ActivityApi>) -> Self {
        Self::with_clock(api, Arc::new(SystemClock))
    }

    pub fn with_clock(api: Arc<dyn ActivityApi>, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            clock,
            scope: ViewScope::new(),
            toasts: ToastQueue::default(),
            role: None,
            items: Vec::new(),
            page: None,
            error: None,
            loaded: false,
        }
    }

    pub fn with_toast_capacity(mut self, capacity: usize) -> Self {
        self.toasts = ToastQueue::new(capacity);
        self
    }

    /// Load the timeline for `role`. Only Admin, Teacher and Student are
    /// accepted; anything else fails with `InvalidRole` before any request.
    pub async fn fetch(&mut self, role: Role, query: &ListQuery) -> Result<()> {
        if !role.is_activity_actor() {
            return Err(SchoolHubError::InvalidRole(role.to_string()));
        }

        let result = self
            .scope
            .run(self.api.list_activities(role, query))
            .await;

        match result {
            Ok(page) => {
                let (views, info) = to_views(page, self.clock.now());
                tracing::info!(%role, count = views.len(), "activity feed loaded");
                self.role = Some(role);
                self.items = views;
                self.page = Some(info);
                self.error = None;
                self.loaded = true;
                Ok(())
            }
            Err(SchoolHubError::Cancelled) => Err(SchoolHubError::Cancelled),
            Err(e) => {
                tracing::error!(%role, error = %e, "activity feed fetch failed");
                self.error = Some(e.user_message());
                self.loaded = true;
                self.toasts.error(e.user_message());
                Err(e)
            }
        }
    }

    /// Delete one entry. On success exactly the matching row leaves the list
    /// and the rest keep their order; on any failure the list is untouched and
    /// the generic error toast is raised.
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        let result = self.scope.run(self.api.delete_activity(id)).await;

        match result {
            Ok(()) => {
                let before = self.items.len();
                self.items.retain(|a| a.id != id);
                let removed = (before - self.items.len()) as u64;
                if let Some(page) = self.page.as_mut() {
                    page.total_records = page.total_records.saturating_sub(removed);
                }
                tracing::info!(id, "activity deleted");
                self.toasts.success("Activity deleted successfully");
                Ok(())
            }
            Err(SchoolHubError::Cancelled) => Err(SchoolHubError::Cancelled),
            Err(e) => {
                tracing::error!(id, error = %e, "activity delete failed");
                self.toasts.error(GENERIC_ERROR_MESSAGE);
                Err(e)
            }
        }
    }

    pub fn state(&self) -> LoadState<&[ActivityView]> {
        if !self.loaded {
            return LoadState::Loading;
        }
        if let Some(err) = &self.error {
            return LoadState::Error(err.clone());
        }
        if self.items.is_empty() {
            LoadState::Empty
        } else {
            LoadState::Data(&self.items)
        }
    }

    pub fn items(&self) -> &[ActivityView] {
        &self.items
    }

    pub fn page(&self) -> Option<PageInfo> {
        self.page
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut ToastQueue {
        &mut self.toasts
    }

    /// Tear the view down; in-flight calls resolve to `Cancelled`.
    pub fn close(&self) {
        self.scope.close();
    }

    pub fn canceller(&self) -> crate::view::ScopeCanceller {
        self.scope.canceller()
    }
}
