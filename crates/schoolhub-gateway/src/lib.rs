//! # SchoolHub Gateway
//!
//! Local HTTP server in front of the SRS backend: two pass-through routes
//! (student-course grades, report cards) and the activity feed.

pub mod routes;
pub mod server;

pub use server::{AppState, build_router, start};
