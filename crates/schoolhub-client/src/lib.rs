//! # SchoolHub Client
//!
//! Typed REST client for the SRS backend. A single [`SrsClient`] handles every
//! resource; the per-resource calls live in their own modules as `impl`
//! blocks on it.

pub mod activity;
pub mod attendance;
pub mod catalog;
pub mod client;
pub mod grades;
pub mod people;
pub mod resources;
pub mod schedule;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{Forwarded, SrsClient, resource_path};
pub use resources::Resource;

use schoolhub_core::config::SchoolHubConfig;
use schoolhub_core::error::Result;
use schoolhub_core::session::Session;

/// Create a client from configuration and the current session.
pub fn create_client(config: &SchoolHubConfig, session: Option<Session>) -> Result<SrsClient> {
    SrsClient::new(&config.backend, session)
}
