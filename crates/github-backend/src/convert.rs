//! Model conversions between GitHub types and mirror-core types

use mirror_core::{CreateRepository, Organization, RepositoryDescriptor};

use crate::models::*;

/// Convert a GitHub organization to a mirror-core Organization
pub fn github_org_to_core(org: GitHubOrganization) -> Organization {
    Organization {
        login: org.login,
        id: org.id,
        name: org.name,
    }
}

/// Convert a GitHub repository to a mirror-core RepositoryDescriptor
pub fn github_repo_to_core(repo: GitHubRepository) -> RepositoryDescriptor {
    RepositoryDescriptor {
        name: repo.name,
        description: repo.description,
        is_private: repo.private,
        visibility: repo.visibility,
        default_branch: repo.default_branch,
        has_issues: repo.has_issues,
        has_projects: repo.has_projects,
        has_wiki: repo.has_wiki,
        has_downloads: repo.has_downloads,
        archived: repo.archived,
        fork: repo.fork,
        clone_url: repo.clone_url,
    }
}

/// Convert a mirror-core CreateRepository to the GitHub request body
pub fn create_repo_from_core(repo: &CreateRepository) -> CreateGitHubRepository {
    CreateGitHubRepository {
        name: repo.name.clone(),
        description: repo.description.clone(),
        private: repo.private,
        visibility: repo.visibility.clone(),
        default_branch: repo.default_branch.clone(),
        has_issues: repo.has_issues,
        has_projects: repo.has_projects,
        has_wiki: repo.has_wiki,
        has_downloads: repo.has_downloads,
    }
}
