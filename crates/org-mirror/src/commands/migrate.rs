use crate::cli::{MigrateArgs, OutputFormat, Side};
use crate::config::Config;
use crate::error::AppError;
use crate::git::{DryRunExecutor, GitCommandExecutor};
use crate::orchestrator::Orchestrator;
use crate::output::output_result;
use crate::run_log::RunLog;
use mirror_core::MirrorExecutor;

use super::{client_for, console_for};

pub fn handle_migrate(
    config: &mut Config,
    args: &MigrateArgs,
    format: OutputFormat,
) -> Result<(), AppError> {
    config.merge_with_migrate_args(args);

    let pairs = config.organization_pairs()?;
    let settings = config.migration_settings()?;
    let source = client_for(config, Side::Source)?;
    let destination = client_for(config, Side::Destination)?;

    let log_path = config.log_path();
    let mut log = RunLog::open(&log_path, console_for(format))?;

    log.info(format!("Run log: {}", log_path.display()));
    log.info(format!(
        "Source enterprise: {} ({})",
        config.source_enterprise.as_deref().unwrap_or("-"),
        config.source_api_url
    ));
    log.info(format!(
        "Destination enterprise: {} ({})",
        config.destination_enterprise.as_deref().unwrap_or("-"),
        config.destination_api_url
    ));
    for pair in &pairs {
        log.info(format!("Mapping: {}", pair));
    }

    let git = GitCommandExecutor::new(config.git_timeout());
    let executor: &dyn MirrorExecutor = if settings.dry_run {
        log.warning("DRY RUN: no repositories will be created, cloned or pushed");
        &DryRunExecutor
    } else {
        match git.check_available() {
            Ok(version) => log.info(format!("Using {}", version)),
            Err(err) => {
                log.error(format!("git is required for mirroring: {}", err));
                return Err(AppError::GitUnavailable(err.to_string()));
            }
        }
        log.info(format!("Working directory: {}", settings.work_dir.display()));
        &git
    };

    let summary = Orchestrator::new(
        &source,
        &destination,
        executor,
        &settings,
        config.throttle(),
    )
    .run(&pairs, &mut log)?;

    output_result(&summary, format);
    Ok(())
}
