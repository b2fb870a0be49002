//! # SchoolHub Portal
//!
//! View logic behind the role portals, independent of any renderer: the
//! activity feed, toasts, debounced search, add/edit forms, per-view load
//! state with lifetime-bound cancellation, and role navigation.

pub mod debounce;
pub mod feed;
pub mod forms;
pub mod nav;
pub mod toast;
pub mod view;

pub use debounce::{Debouncer, SearchController};
pub use feed::{ActivityFeed, ActivityView};
pub use forms::{CourseForm, DepartmentForm};
pub use nav::{RoleNav, Section};
pub use toast::{Toast, ToastKind, ToastQueue};
pub use view::{LoadState, ViewScope};
