//! # SchoolHub Core
//!
//! Shared building blocks for every SchoolHub crate: the data model mirrored
//! from the SRS backend, configuration, the error type, the explicit session
//! context and the small display helpers (relative time, letter grades,
//! attendance percentage).

pub mod config;
pub mod error;
pub mod grading;
pub mod session;
pub mod timefmt;
pub mod traits;
pub mod types;

pub use config::SchoolHubConfig;
pub use error::{Result, SchoolHubError};
pub use session::{Session, SessionStore};
pub use types::Role;
