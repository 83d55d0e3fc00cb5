use std::path::Path;

use crate::error::Result;
use crate::models::*;

/// Repository hosting API as seen by the mirroring workflow.
///
/// Each instance is bound to one side of the migration and that side's
/// credential.
pub trait RepositoryHost {
    /// Get an organization; fails with `NotFound` when it does not exist
    /// or is invisible to the credential
    fn get_organization(&self, org: &str) -> Result<Organization>;

    /// List every repository in an organization, all pages materialized
    fn list_repositories(&self, org: &str) -> Result<Vec<RepositoryDescriptor>>;

    /// Get a single repository
    fn get_repository(&self, owner: &str, name: &str) -> Result<RepositoryDescriptor>;

    /// Create a repository in an organization
    fn create_repository(&self, org: &str, repo: &CreateRepository)
        -> Result<RepositoryDescriptor>;

    /// Point a repository's default branch at an existing branch
    fn set_default_branch(&self, owner: &str, name: &str, branch: &str) -> Result<()>;

    /// Latest rate-limit quota observed on this host, if any.
    /// Default implementation reports nothing.
    fn rate_limit(&self) -> Option<RateLimitStatus> {
        None
    }
}

/// Local workspace and version-control operations of a migration.
///
/// Implementations either run the real commands or only announce them.
/// Every operation returns the lines worth recording in the run log
/// (captured command output, or the announced intent).
pub trait MirrorExecutor {
    /// Make sure the directory holding every mirror exists. Runs once per
    /// run, after all organizations are verified. Does nothing by default.
    fn prepare_work_dir(&self, _path: &Path) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    /// Remove any stale mirror at `path` so the clone starts clean
    fn prepare_workspace(&self, path: &Path) -> Result<Vec<String>>;

    /// Mirror-clone `url` into `path`
    fn mirror_clone(&self, url: &str, credential: &Credential, path: &Path)
        -> Result<Vec<String>>;

    /// Mirror-push the clone at `path` to `url`
    fn mirror_push(&self, path: &Path, url: &str, credential: &Credential)
        -> Result<Vec<String>>;

    /// Remove the mirror at `path`
    fn cleanup_workspace(&self, path: &Path) -> Result<Vec<String>>;
}
