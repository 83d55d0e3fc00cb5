pub mod migrate;
pub mod repos;
pub mod verify;

use crate::cli::{OutputFormat, Side};
use crate::config::Config;
use crate::error::AppError;
use crate::run_log::{Console, RunLog};
use github_backend::GitHubClient;

/// Keep stdout clean for JSON; progress lines go to stderr instead
fn console_for(format: OutputFormat) -> Console {
    match format {
        OutputFormat::Text => Console::Stdout,
        OutputFormat::Json => Console::Stderr,
    }
}

/// Run log for read-only commands: a file only when one was asked for
fn optional_log(config: &Config, format: OutputFormat) -> Result<RunLog, AppError> {
    match &config.log_file {
        Some(path) => Ok(RunLog::open(path, console_for(format))?),
        None => Ok(RunLog::console_only(console_for(format))),
    }
}

fn client_for(config: &Config, side: Side) -> Result<GitHubClient, AppError> {
    let credential = config.credential(side)?;
    Ok(GitHubClient::with_base_url(config.api_url(side), &credential)
        .with_timeout(config.http_timeout()))
}
