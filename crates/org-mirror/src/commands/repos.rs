use crate::cli::{OutputFormat, Side};
use crate::config::Config;
use crate::error::AppError;
use crate::output::output_list;
use mirror_core::RepositoryHost;

use super::client_for;

pub fn handle_list_repos(
    config: &Config,
    org: &str,
    side: Side,
    format: OutputFormat,
) -> Result<(), AppError> {
    let client = client_for(config, side)?;
    let repos = client.list_repositories(org)?;

    if repos.is_empty() && format == OutputFormat::Text {
        println!("No repositories found in '{}'", org);
        return Ok(());
    }

    output_list(&repos, format);
    Ok(())
}
