mod cli;
mod color;
mod commands;
mod config;
mod error;
mod git;
mod migrator;
mod orchestrator;
mod output;
mod run_log;
mod telemetry;
mod throttle;
mod verifier;

#[cfg(test)]
mod testing;

use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::AppError;
use output::output_error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    color::init(cli.color);
    telemetry::init();

    if let Err(e) = run(&cli) {
        output_error(&e, cli.format);
        return ExitCode::from(e.exit_code());
    }

    ExitCode::SUCCESS
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let mut config = Config::load(cli.config.clone()).map_err(AppError::config)?;
    config.merge_with_cli(&cli.overrides);

    match &cli.command {
        Commands::Migrate(args) => commands::migrate::handle_migrate(&mut config, args, cli.format),
        Commands::Verify => commands::verify::handle_verify(&config, cli.format),
        Commands::ListRepos { org, side } => {
            commands::repos::handle_list_repos(&config, org, *side, cli.format)
        }
    }
}
