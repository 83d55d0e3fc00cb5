pub mod client;
mod convert;
pub mod error;
pub mod models;
mod trait_impl;

#[cfg(test)]
mod client_tests;

pub use client::GitHubClient;
pub use error::{GitHubError, Result};
pub use models::*;

// Re-export mirror-core types for convenience
pub use mirror_core::{MirrorError, RepositoryHost};
