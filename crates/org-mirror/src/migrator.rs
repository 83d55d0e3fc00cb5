use mirror_core::{
    CreateRepository, Credential, MigrationOutcome, MigrationStatus, MirrorError, MirrorExecutor,
    OrganizationPair, RepositoryDescriptor, RepositoryHost,
};
use std::path::{Path, PathBuf};

use crate::run_log::RunLog;

/// Everything a repository migration needs besides the hosts
#[derive(Debug, Clone)]
pub struct MigrationSettings {
    pub work_dir: PathBuf,
    /// Base URL destination repositories are pushed to, e.g. `https://github.com`
    pub destination_git_url: String,
    pub source_credential: Credential,
    pub destination_credential: Credential,
    pub dry_run: bool,
}

impl MigrationSettings {
    /// Local mirror directory for a source repository
    pub fn slot_path(&self, source_org: &str, repo: &str) -> PathBuf {
        self.work_dir.join(source_org).join(format!("{}.git", repo))
    }

    pub fn push_url(&self, destination_org: &str, repo: &str) -> String {
        format!(
            "{}/{}/{}.git",
            self.destination_git_url.trim_end_matches('/'),
            destination_org,
            repo
        )
    }
}

/// Migrates one repository at a time: create-if-absent, mirror clone,
/// mirror push, cleanup.
pub struct Migrator<'a> {
    destination: &'a dyn RepositoryHost,
    executor: &'a dyn MirrorExecutor,
    settings: &'a MigrationSettings,
}

impl<'a> Migrator<'a> {
    pub fn new(
        destination: &'a dyn RepositoryHost,
        executor: &'a dyn MirrorExecutor,
        settings: &'a MigrationSettings,
    ) -> Self {
        Self {
            destination,
            executor,
            settings,
        }
    }

    /// Migrate `repo` from `pair.source` to `pair.destination`.
    ///
    /// Failures are confined to this repository and reported in the outcome.
    pub fn migrate(
        &self,
        repo: &RepositoryDescriptor,
        pair: &OrganizationPair,
        log: &mut RunLog,
    ) -> MigrationOutcome {
        let name = repo.name.as_str();
        log.info(format!(
            "Migrating {}/{} -> {}/{}",
            pair.source, name, pair.destination, name
        ));

        let exists = match self.destination.get_repository(&pair.destination, name) {
            Ok(_) => {
                log.info(format!(
                    "Repository {}/{} already exists, skipping creation",
                    pair.destination, name
                ));
                true
            }
            Err(err) if err.is_not_found() => false,
            Err(err) => return self.fail(repo, pair, "checking destination repository", &err, log),
        };

        let mut created = false;
        if !exists {
            if self.settings.dry_run {
                log.info(format!(
                    "[DRY RUN] Would create repository {}/{} ({})",
                    pair.destination,
                    name,
                    visibility_label(repo)
                ));
            } else {
                match self
                    .destination
                    .create_repository(&pair.destination, &CreateRepository::from_source(repo))
                {
                    Ok(_) => {
                        log.success(format!(
                            "Created repository {}/{} ({})",
                            pair.destination,
                            name,
                            visibility_label(repo)
                        ));
                        created = true;
                    }
                    Err(MirrorError::Unprocessable(message)) => {
                        log.warning(format!(
                            "Repository {}/{} already exists or failed validation: {}",
                            pair.destination, name, message
                        ));
                    }
                    Err(err) => {
                        return self.fail(repo, pair, "creating destination repository", &err, log)
                    }
                }
            }
        }

        let slot = self.settings.slot_path(&pair.source, name);
        let push_url = self.settings.push_url(&pair.destination, name);
        let transferred = self.transfer(repo, &slot, &push_url, log);

        match self.executor.cleanup_workspace(&slot) {
            Ok(notes) => record(log, notes),
            Err(err) => log.warning(format!("Could not clean up {}: {}", slot.display(), err)),
        }

        if let Err((step, err)) = transferred {
            return self.fail(repo, pair, step, &err, log);
        }

        if created {
            self.align_default_branch(repo, pair, log);
        }

        if self.settings.dry_run {
            MigrationOutcome::new(name, pair, MigrationStatus::SkippedDryRun)
        } else {
            log.success(format!(
                "Mirrored {}/{} -> {}/{}",
                pair.source, name, pair.destination, name
            ));
            MigrationOutcome::new(name, pair, MigrationStatus::Success)
        }
    }

    fn transfer(
        &self,
        repo: &RepositoryDescriptor,
        slot: &Path,
        push_url: &str,
        log: &mut RunLog,
    ) -> Result<(), (&'static str, MirrorError)> {
        let notes = self
            .executor
            .prepare_workspace(slot)
            .map_err(|e| ("preparing workspace", e))?;
        record(log, notes);

        let notes = self
            .executor
            .mirror_clone(&repo.clone_url, &self.settings.source_credential, slot)
            .map_err(|e| ("mirror clone", e))?;
        record(log, notes);

        let notes = self
            .executor
            .mirror_push(slot, push_url, &self.settings.destination_credential)
            .map_err(|e| ("mirror push", e))?;
        record(log, notes);

        Ok(())
    }

    /// A mirror push into a fresh repository leaves the host to pick the
    /// default branch; point it back at the source's.
    fn align_default_branch(
        &self,
        repo: &RepositoryDescriptor,
        pair: &OrganizationPair,
        log: &mut RunLog,
    ) {
        let Some(branch) = repo.default_branch.as_deref() else {
            return;
        };
        if let Err(err) = self
            .destination
            .set_default_branch(&pair.destination, &repo.name, branch)
        {
            log.warning(format!(
                "Could not set default branch of {}/{} to '{}': {}",
                pair.destination, repo.name, branch, err
            ));
        }
    }

    fn fail(
        &self,
        repo: &RepositoryDescriptor,
        pair: &OrganizationPair,
        step: &str,
        err: &MirrorError,
        log: &mut RunLog,
    ) -> MigrationOutcome {
        log.error(format!(
            "Failed to migrate {}/{} -> {}/{} while {}: {}",
            pair.source, repo.name, pair.destination, repo.name, step, err
        ));
        if let Some(hint) = err.hint() {
            log.error(format!("Hint: {}", hint));
        }
        MigrationOutcome::failed(&repo.name, pair, format!("{}: {}", step, err))
    }
}

fn record(log: &mut RunLog, notes: Vec<String>) {
    for note in notes {
        log.info(note);
    }
}

fn visibility_label(repo: &RepositoryDescriptor) -> &str {
    match repo.visibility.as_deref() {
        Some(visibility) => visibility,
        None if repo.is_private => "private",
        None => "public",
    }
}
