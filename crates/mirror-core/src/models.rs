use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MirrorError, Result};

/// A source organization and the destination organization it mirrors into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationPair {
    pub source: String,
    pub destination: String,
}

impl OrganizationPair {
    /// Create a pair, rejecting empty organization names
    pub fn new(source: &str, destination: &str) -> Result<Self> {
        let source = source.trim();
        let destination = destination.trim();

        if source.is_empty() || destination.is_empty() {
            return Err(MirrorError::InvalidInput(format!(
                "Organization names must be non-empty (got source '{}', destination '{}')",
                source, destination
            )));
        }

        Ok(Self {
            source: source.to_string(),
            destination: destination.to_string(),
        })
    }

    /// Pair two positional lists index by index.
    ///
    /// Lists of different length are rejected instead of truncated.
    pub fn zip_positional(sources: &[String], destinations: &[String]) -> Result<Vec<Self>> {
        if sources.len() != destinations.len() {
            return Err(MirrorError::InvalidInput(format!(
                "Source organization list has {} entries but destination list has {}",
                sources.len(),
                destinations.len()
            )));
        }

        sources
            .iter()
            .zip(destinations)
            .map(|(source, destination)| Self::new(source, destination))
            .collect()
    }
}

impl fmt::Display for OrganizationPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.destination)
    }
}

/// Minimal organization representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub login: String,
    pub id: u64,
    pub name: Option<String>,
}

/// Repository as listed by a host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub is_private: bool,
    /// "public", "private" or "internal" when the host reports it
    pub visibility: Option<String>,
    pub default_branch: Option<String>,
    pub has_issues: bool,
    pub has_projects: bool,
    pub has_wiki: bool,
    pub has_downloads: bool,
    pub archived: bool,
    pub fork: bool,
    pub clone_url: String,
}

/// Payload for creating a destination repository.
///
/// Only metadata is carried over. Branch protection, webhooks and Actions
/// configuration are not transferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateRepository {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub private: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    pub has_issues: bool,
    pub has_projects: bool,
    pub has_wiki: bool,
    pub has_downloads: bool,
}

impl CreateRepository {
    /// Copy the creatable fields verbatim from a source repository
    pub fn from_source(source: &RepositoryDescriptor) -> Self {
        Self {
            name: source.name.clone(),
            description: source.description.clone(),
            private: source.is_private,
            visibility: source.visibility.clone(),
            default_branch: source.default_branch.clone(),
            has_issues: source.has_issues,
            has_projects: source.has_projects,
            has_wiki: source.has_wiki,
            has_downloads: source.has_downloads,
        }
    }
}

/// Bearer token for one side of the migration.
///
/// `Debug` and `Display` never print the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building authentication headers only
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Result of migrating a single repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationStatus {
    Success,
    Failed,
    SkippedDryRun,
}

impl fmt::Display for MigrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MigrationStatus::Success => "success",
            MigrationStatus::Failed => "failed",
            MigrationStatus::SkippedDryRun => "dry-run",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationOutcome {
    pub repository: String,
    pub source_org: String,
    pub destination_org: String,
    pub status: MigrationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MigrationOutcome {
    pub fn new(repository: &str, pair: &OrganizationPair, status: MigrationStatus) -> Self {
        Self {
            repository: repository.to_string(),
            source_org: pair.source.clone(),
            destination_org: pair.destination.clone(),
            status,
            error: None,
        }
    }

    pub fn failed(repository: &str, pair: &OrganizationPair, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(repository, pair, MigrationStatus::Failed)
        }
    }
}

/// Rate-limit quota as last reported by a host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub limit: u64,
    pub remaining: u64,
    pub reset: DateTime<Utc>,
}
