//! Implementation of mirror-core traits for GitHubClient

use mirror_core::{
    CreateRepository, DEFAULT_PAGE_SIZE, MirrorError, Organization, RateLimitStatus,
    RepositoryDescriptor, RepositoryHost, Result, fetch_all_pages,
};

use crate::client::GitHubClient;
use crate::convert::{create_repo_from_core, github_org_to_core, github_repo_to_core};
use crate::models::UpdateGitHubRepository;

impl RepositoryHost for GitHubClient {
    fn get_organization(&self, org: &str) -> Result<Organization> {
        let org = self.get_org(org).map_err(MirrorError::from)?;
        Ok(github_org_to_core(org))
    }

    fn list_repositories(&self, org: &str) -> Result<Vec<RepositoryDescriptor>> {
        let repos = fetch_all_pages(
            |page, per_page| {
                self.list_org_repos(org, per_page, page)
                    .map_err(MirrorError::from)
            },
            DEFAULT_PAGE_SIZE,
        )?;
        Ok(repos.into_iter().map(github_repo_to_core).collect())
    }

    fn get_repository(&self, owner: &str, name: &str) -> Result<RepositoryDescriptor> {
        let repo = self.get_repo(owner, name).map_err(MirrorError::from)?;
        Ok(github_repo_to_core(repo))
    }

    fn create_repository(
        &self,
        org: &str,
        repo: &CreateRepository,
    ) -> Result<RepositoryDescriptor> {
        let created = self
            .create_org_repo(org, &create_repo_from_core(repo))
            .map_err(MirrorError::from)?;
        Ok(github_repo_to_core(created))
    }

    fn set_default_branch(&self, owner: &str, name: &str, branch: &str) -> Result<()> {
        let update = UpdateGitHubRepository {
            default_branch: Some(branch.to_string()),
        };
        self.update_repo(owner, name, &update)
            .map_err(MirrorError::from)?;
        Ok(())
    }

    fn rate_limit(&self) -> Option<RateLimitStatus> {
        self.last_rate_limit()
    }
}
