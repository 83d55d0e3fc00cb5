use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "org-mirror",
    version,
    about = "Mirror GitHub organizations' repositories into other organizations"
)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'o', value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to colorize output
    #[arg(long, value_enum, global = true, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a TOML config file
    #[arg(long, env = "ORG_MIRROR_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

/// Settings that override the config file and environment
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Token for the source organizations
    #[arg(long, env = "ORG_MIRROR_SOURCE_TOKEN", global = true, hide_env_values = true)]
    pub source_token: Option<String>,

    /// Token for the destination organizations
    #[arg(
        long,
        env = "ORG_MIRROR_DESTINATION_TOKEN",
        global = true,
        hide_env_values = true
    )]
    pub destination_token: Option<String>,

    /// Source organizations, comma separated (paired by position)
    #[arg(long, global = true, value_delimiter = ',', value_name = "ORGS")]
    pub source_orgs: Vec<String>,

    /// Destination organizations, comma separated (paired by position)
    #[arg(long, global = true, value_delimiter = ',', value_name = "ORGS")]
    pub destination_orgs: Vec<String>,

    /// Source enterprise name (reported in the run log)
    #[arg(long, global = true)]
    pub source_enterprise: Option<String>,

    /// Destination enterprise name (reported in the run log)
    #[arg(long, global = true)]
    pub destination_enterprise: Option<String>,

    /// Source REST API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub source_api_url: Option<String>,

    /// Destination REST API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub destination_api_url: Option<String>,

    /// Base URL destination repositories are pushed to
    #[arg(long, global = true, value_name = "URL")]
    pub destination_git_url: Option<String>,

    /// Run log file (appended to)
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Debug, Copy, Default)]
pub enum ColorChoice {
    /// Colorize output if stdout is a terminal
    #[default]
    Auto,
    /// Always colorize output
    Always,
    /// Never colorize output
    Never,
}

/// Which side of the migration an operation targets
#[derive(ValueEnum, Clone, Debug, Copy, Default, PartialEq, Eq)]
pub enum Side {
    #[default]
    Source,
    Destination,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Mirror every repository of each source organization into its destination
    Migrate(MigrateArgs),
    /// Check that every organization pair is reachable, without changing anything
    Verify,
    /// List an organization's repositories
    #[command(visible_alias = "ls")]
    ListRepos {
        /// Organization login
        org: String,

        /// Which token and API to use
        #[arg(long, value_enum, default_value_t = Side::Source)]
        side: Side,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct MigrateArgs {
    /// Only log what would be done; no repositories are created, cloned or pushed
    #[arg(long)]
    pub dry_run: bool,

    /// Directory holding the temporary mirror clones
    #[arg(long, value_name = "PATH")]
    pub work_dir: Option<PathBuf>,

    /// Fixed pause between repositories, in milliseconds
    #[arg(long, value_name = "MS")]
    pub repo_delay_ms: Option<u64>,

    /// Wait for the rate-limit reset once remaining quota drops to this value
    #[arg(long, value_name = "N")]
    pub rate_limit_min_remaining: Option<u64>,

    /// Kill git commands that run longer than this many seconds
    #[arg(long, value_name = "SECS")]
    pub git_timeout_secs: Option<u64>,
}
