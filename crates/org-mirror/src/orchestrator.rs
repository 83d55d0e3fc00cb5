//! Drives a whole run: verify every organization pair, then migrate each
//! pair's repositories in input order, then summarize.

use mirror_core::{
    MigrationOutcome, MigrationStatus, MirrorExecutor, OrganizationPair, RepositoryHost,
};
use serde::Serialize;

use crate::error::AppError;
use crate::migrator::{MigrationSettings, Migrator};
use crate::run_log::RunLog;
use crate::throttle::Throttle;
use crate::verifier::verify_all;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    PartialFailure,
}

/// Aggregated result of a completed run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub dry_run: bool,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub planned: usize,
    /// Source organizations whose repositories could not be listed
    pub skipped_organizations: Vec<String>,
    pub outcomes: Vec<MigrationOutcome>,
}

impl RunSummary {
    fn record(&mut self, outcome: MigrationOutcome) {
        self.total += 1;
        match outcome.status {
            MigrationStatus::Success => self.succeeded += 1,
            MigrationStatus::Failed => self.failed += 1,
            MigrationStatus::SkippedDryRun => self.planned += 1,
        }
        self.outcomes.push(outcome);
    }

    pub fn status(&self) -> RunStatus {
        if self.failed == 0 && self.skipped_organizations.is_empty() {
            RunStatus::Success
        } else {
            RunStatus::PartialFailure
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &MigrationOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == MigrationStatus::Failed)
    }
}

pub struct Orchestrator<'a> {
    source: &'a dyn RepositoryHost,
    destination: &'a dyn RepositoryHost,
    executor: &'a dyn MirrorExecutor,
    settings: &'a MigrationSettings,
    throttle: Throttle,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        source: &'a dyn RepositoryHost,
        destination: &'a dyn RepositoryHost,
        executor: &'a dyn MirrorExecutor,
        settings: &'a MigrationSettings,
        throttle: Throttle,
    ) -> Self {
        Self {
            source,
            destination,
            executor,
            settings,
            throttle,
        }
    }

    /// Run the migration for every pair.
    ///
    /// Only a failed verification aborts; repository and listing failures
    /// are counted in the summary.
    pub fn run(
        &self,
        pairs: &[OrganizationPair],
        log: &mut RunLog,
    ) -> Result<RunSummary, AppError> {
        tracing::debug!(pairs = pairs.len(), "verifying organizations");
        log.info(format!("Verifying {} organization pair(s)", pairs.len()));

        let report = verify_all(pairs, self.source, self.destination, log);
        if !report.passed() {
            log.error(format!(
                "Aborting: {} of {} organization checks failed; nothing was migrated",
                report.failed, report.checked
            ));
            return Err(AppError::Verification {
                failed: report.failed,
                checked: report.checked,
            });
        }

        match self.executor.prepare_work_dir(&self.settings.work_dir) {
            Ok(notes) => notes.into_iter().for_each(|note| log.info(note)),
            Err(err) => {
                log.error(format!(
                    "Could not prepare working directory {}: {}",
                    self.settings.work_dir.display(),
                    err
                ));
                return Err(err.into());
            }
        }

        let mut summary = RunSummary {
            dry_run: self.settings.dry_run,
            ..RunSummary::default()
        };
        let migrator = Migrator::new(self.destination, self.executor, self.settings);
        let mut first = true;

        for (index, pair) in pairs.iter().enumerate() {
            tracing::debug!(index, %pair, "migrating organization");
            log.info(format!(
                "[{}/{}] Organization {}",
                index + 1,
                pairs.len(),
                pair
            ));

            let repos = match self.source.list_repositories(&pair.source) {
                Ok(repos) => repos,
                Err(err) => {
                    log.error(format!(
                        "Could not list repositories of '{}', skipping organization: {}",
                        pair.source, err
                    ));
                    summary.skipped_organizations.push(pair.source.clone());
                    continue;
                }
            };

            if repos.is_empty() {
                log.warning(format!("No repositories found in '{}'", pair.source));
                continue;
            }
            log.info(format!("Found {} repositories in '{}'", repos.len(), pair.source));

            for repo in &repos {
                if !first {
                    self.throttle.pause(
                        &[self.source.rate_limit(), self.destination.rate_limit()],
                        log,
                    );
                }
                first = false;

                summary.record(migrator.migrate(repo, pair, log));
            }
        }

        log_summary(&summary, log);
        Ok(summary)
    }
}

fn log_summary(summary: &RunSummary, log: &mut RunLog) {
    let mut line = format!(
        "Summary: total={}, succeeded={}, failed={}",
        summary.total, summary.succeeded, summary.failed
    );
    if summary.dry_run {
        line.push_str(&format!(", planned={}", summary.planned));
    }
    if !summary.skipped_organizations.is_empty() {
        line.push_str(&format!(
            ", skipped organizations={}",
            summary.skipped_organizations.join(",")
        ));
    }

    match summary.status() {
        RunStatus::Success => log.success(line),
        RunStatus::PartialFailure => log.warning(line),
    }
}
