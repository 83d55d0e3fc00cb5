//! In-memory host and executor doubles for workflow tests

use mirror_core::{
    CreateRepository, Credential, MirrorError, MirrorExecutor, Organization, RateLimitStatus,
    RepositoryDescriptor, RepositoryHost, Result,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// A private repository on github.com with `main` as default branch
pub fn repo(org: &str, name: &str) -> RepositoryDescriptor {
    RepositoryDescriptor {
        name: name.to_string(),
        description: Some(format!("{} description", name)),
        is_private: true,
        visibility: Some("private".to_string()),
        default_branch: Some("main".to_string()),
        has_issues: true,
        has_projects: false,
        has_wiki: true,
        has_downloads: true,
        archived: false,
        fork: false,
        clone_url: format!("https://github.com/{}/{}.git", org, name),
    }
}

#[derive(Default)]
pub struct FakeHost {
    orgs: HashSet<String>,
    forbidden_orgs: HashSet<String>,
    repos: HashMap<String, Vec<RepositoryDescriptor>>,
    failing_listings: HashSet<String>,
    rate_limit: Option<RateLimitStatus>,
    existing: RefCell<HashSet<String>>,
    create_errors: RefCell<HashMap<String, MirrorError>>,
    lookup_errors: RefCell<HashMap<String, MirrorError>>,
    created: RefCell<Vec<(String, CreateRepository)>>,
    branch_updates: RefCell<Vec<(String, String)>>,
    org_lookups: RefCell<Vec<String>>,
    repo_lookups: RefCell<Vec<String>>,
    listings: RefCell<Vec<String>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_org(mut self, org: &str) -> Self {
        self.orgs.insert(org.to_string());
        self
    }

    pub fn with_forbidden_org(mut self, org: &str) -> Self {
        self.forbidden_orgs.insert(org.to_string());
        self
    }

    /// Organization holding repositories with the given names
    pub fn with_repos(mut self, org: &str, names: &[&str]) -> Self {
        self.orgs.insert(org.to_string());
        self.repos.insert(
            org.to_string(),
            names.iter().map(|name| repo(org, name)).collect(),
        );
        self
    }

    pub fn with_failing_listing(mut self, org: &str) -> Self {
        self.orgs.insert(org.to_string());
        self.failing_listings.insert(org.to_string());
        self
    }

    pub fn with_existing_repo(self, owner: &str, name: &str) -> Self {
        self.existing.borrow_mut().insert(format!("{}/{}", owner, name));
        self
    }

    pub fn with_create_error(self, name: &str, err: MirrorError) -> Self {
        self.create_errors.borrow_mut().insert(name.to_string(), err);
        self
    }

    pub fn with_lookup_error(self, name: &str, err: MirrorError) -> Self {
        self.lookup_errors.borrow_mut().insert(name.to_string(), err);
        self
    }

    pub fn with_rate_limit(mut self, status: RateLimitStatus) -> Self {
        self.rate_limit = Some(status);
        self
    }

    pub fn created(&self) -> Vec<(String, CreateRepository)> {
        self.created.borrow().clone()
    }

    pub fn default_branch_updates(&self) -> Vec<(String, String)> {
        self.branch_updates.borrow().clone()
    }

    pub fn org_lookups(&self) -> Vec<String> {
        self.org_lookups.borrow().clone()
    }

    pub fn repo_lookups(&self) -> Vec<String> {
        self.repo_lookups.borrow().clone()
    }

    pub fn listings(&self) -> Vec<String> {
        self.listings.borrow().clone()
    }
}

impl RepositoryHost for FakeHost {
    fn get_organization(&self, org: &str) -> Result<Organization> {
        self.org_lookups.borrow_mut().push(org.to_string());
        if self.forbidden_orgs.contains(org) {
            return Err(MirrorError::Forbidden(
                "Resource protected by organization SAML enforcement".to_string(),
            ));
        }
        if self.orgs.contains(org) {
            Ok(Organization {
                login: org.to_string(),
                id: 1,
                name: None,
            })
        } else {
            Err(MirrorError::NotFound(format!("/orgs/{}", org)))
        }
    }

    fn list_repositories(&self, org: &str) -> Result<Vec<RepositoryDescriptor>> {
        self.listings.borrow_mut().push(org.to_string());
        if self.failing_listings.contains(org) {
            return Err(MirrorError::Api {
                status: 500,
                message: "listing failed".to_string(),
            });
        }
        Ok(self.repos.get(org).cloned().unwrap_or_default())
    }

    fn get_repository(&self, owner: &str, name: &str) -> Result<RepositoryDescriptor> {
        let key = format!("{}/{}", owner, name);
        self.repo_lookups.borrow_mut().push(key.clone());
        if let Some(err) = self.lookup_errors.borrow_mut().remove(name) {
            return Err(err);
        }
        if self.existing.borrow().contains(&key) {
            Ok(repo(owner, name))
        } else {
            Err(MirrorError::NotFound(format!("/repos/{}", key)))
        }
    }

    fn create_repository(
        &self,
        org: &str,
        create: &CreateRepository,
    ) -> Result<RepositoryDescriptor> {
        if let Some(err) = self.create_errors.borrow_mut().remove(&create.name) {
            return Err(err);
        }
        self.created
            .borrow_mut()
            .push((org.to_string(), create.clone()));
        self.existing
            .borrow_mut()
            .insert(format!("{}/{}", org, create.name));
        Ok(repo(org, &create.name))
    }

    fn set_default_branch(&self, owner: &str, name: &str, branch: &str) -> Result<()> {
        self.branch_updates
            .borrow_mut()
            .push((format!("{}/{}", owner, name), branch.to_string()));
        Ok(())
    }

    fn rate_limit(&self) -> Option<RateLimitStatus> {
        self.rate_limit
    }
}

/// Records every executor call instead of running git
#[derive(Default)]
pub struct RecordingExecutor {
    calls: RefCell<Vec<String>>,
    credentials: RefCell<Vec<String>>,
    failing_clones: HashSet<String>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the clone of the named repository fail
    pub fn failing_clone(mut self, name: &str) -> Self {
        self.failing_clones.insert(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn credentials(&self) -> Vec<String> {
        self.credentials.borrow().clone()
    }
}

impl MirrorExecutor for RecordingExecutor {
    fn prepare_work_dir(&self, path: &Path) -> Result<Vec<String>> {
        self.calls
            .borrow_mut()
            .push(format!("work-dir {}", path.display()));
        Ok(Vec::new())
    }

    fn prepare_workspace(&self, path: &Path) -> Result<Vec<String>> {
        self.calls
            .borrow_mut()
            .push(format!("prepare {}", path.display()));
        Ok(Vec::new())
    }

    fn mirror_clone(&self, url: &str, credential: &Credential, path: &Path) -> Result<Vec<String>> {
        self.calls
            .borrow_mut()
            .push(format!("clone {} {}", url, path.display()));
        self.credentials
            .borrow_mut()
            .push(credential.expose().to_string());

        let failing = self
            .failing_clones
            .iter()
            .any(|name| url.ends_with(&format!("/{}.git", name)));
        if failing {
            return Err(MirrorError::Git(
                "`git clone --mirror` exited with exit status: 128: fatal: repository not found"
                    .to_string(),
            ));
        }
        Ok(Vec::new())
    }

    fn mirror_push(&self, path: &Path, url: &str, credential: &Credential) -> Result<Vec<String>> {
        self.calls
            .borrow_mut()
            .push(format!("push {} {}", path.display(), url));
        self.credentials
            .borrow_mut()
            .push(credential.expose().to_string());
        Ok(Vec::new())
    }

    fn cleanup_workspace(&self, path: &Path) -> Result<Vec<String>> {
        self.calls
            .borrow_mut()
            .push(format!("cleanup {}", path.display()));
        Ok(Vec::new())
    }
}
