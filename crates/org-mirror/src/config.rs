use crate::cli::{ConfigOverrides, MigrateArgs, Side};
use crate::error::AppError;
use crate::migrator::MigrationSettings;
use crate::throttle::Throttle;
use anyhow::{anyhow, Result};
use chrono::Local;
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use mirror_core::{Credential, OrganizationPair};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_PREFIX: &str = "ORG_MIRROR_";
const LOCAL_CONFIG_FILE_NAME: &str = "org-mirror.toml";

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub source_token: Option<String>,
    pub destination_token: Option<String>,
    pub source_enterprise: Option<String>,
    pub destination_enterprise: Option<String>,
    pub source_api_url: String,
    pub destination_api_url: String,
    pub destination_git_url: String,
    /// Explicit pair records
    #[serde(default)]
    pub organizations: Vec<OrganizationPair>,
    /// Positional lists, paired by index
    #[serde(default, deserialize_with = "string_or_list")]
    pub source_orgs: Vec<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub destination_orgs: Vec<String>,
    pub work_dir: PathBuf,
    pub log_file: Option<PathBuf>,
    pub dry_run: bool,
    pub repo_delay_ms: u64,
    pub rate_limit_min_remaining: Option<u64>,
    pub rate_limit_max_wait_secs: u64,
    pub http_timeout_secs: u64,
    pub git_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_token: None,
            destination_token: None,
            source_enterprise: None,
            destination_enterprise: None,
            source_api_url: "https://api.github.com".to_string(),
            destination_api_url: "https://api.github.com".to_string(),
            destination_git_url: "https://github.com".to_string(),
            organizations: Vec::new(),
            source_orgs: Vec::new(),
            destination_orgs: Vec::new(),
            work_dir: PathBuf::from("mirror-workspace"),
            log_file: None,
            dry_run: false,
            repo_delay_ms: 1000,
            rate_limit_min_remaining: None,
            rate_limit_max_wait_secs: 900,
            http_timeout_secs: 30,
            git_timeout_secs: None,
        }
    }
}

/// Accept either a TOML/env list or a single comma-separated string.
///
/// Blank entries are kept so pairing rejects them. Environment values that
/// look numeric arrive as integers and are read back as logins.
fn string_or_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Login {
        Name(String),
        Number(u64),
    }

    impl Login {
        fn into_string(self) -> String {
            match self {
                Login::Name(name) => name,
                Login::Number(number) => number.to_string(),
            }
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(Login),
        Many(Vec<Login>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(Login::Name(s)) if s.trim().is_empty() => Vec::new(),
        OneOrMany::One(Login::Name(s)) => s.split(',').map(|part| part.trim().to_string()).collect(),
        OneOrMany::One(number) => vec![number.into_string()],
        OneOrMany::Many(list) => list.into_iter().map(Login::into_string).collect(),
    })
}

impl Config {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let explicit_path = config_path.as_deref();
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
        }

        for path in config_paths(explicit_path) {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["config", "log"]));

        figment
            .extract()
            .map_err(|e| anyhow!("Failed to load config: {}", e))
    }

    pub fn merge_with_cli(&mut self, cli: &ConfigOverrides) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }

        if cli.source_token.is_some() {
            self.source_token = cli.source_token.clone();
        }
        if cli.destination_token.is_some() {
            self.destination_token = cli.destination_token.clone();
        }
        if cli.source_enterprise.is_some() {
            self.source_enterprise = cli.source_enterprise.clone();
        }
        if cli.destination_enterprise.is_some() {
            self.destination_enterprise = cli.destination_enterprise.clone();
        }
        if cli.log_file.is_some() {
            self.log_file = cli.log_file.clone();
        }
        if !cli.source_orgs.is_empty() || !cli.destination_orgs.is_empty() {
            self.source_orgs = cli.source_orgs.clone();
            self.destination_orgs = cli.destination_orgs.clone();
        }
        set(&mut self.source_api_url, &cli.source_api_url);
        set(&mut self.destination_api_url, &cli.destination_api_url);
        set(&mut self.destination_git_url, &cli.destination_git_url);
    }

    pub fn merge_with_migrate_args(&mut self, args: &MigrateArgs) {
        if args.dry_run {
            self.dry_run = true;
        }
        if let Some(dir) = &args.work_dir {
            self.work_dir = dir.clone();
        }
        if let Some(delay) = args.repo_delay_ms {
            self.repo_delay_ms = delay;
        }
        if args.rate_limit_min_remaining.is_some() {
            self.rate_limit_min_remaining = args.rate_limit_min_remaining;
        }
        if args.git_timeout_secs.is_some() {
            self.git_timeout_secs = args.git_timeout_secs;
        }
    }

    /// Token for one side; missing or blank tokens are configuration errors
    pub fn credential(&self, side: Side) -> std::result::Result<Credential, AppError> {
        let (token, flag, env) = match side {
            Side::Source => (&self.source_token, "--source-token", "ORG_MIRROR_SOURCE_TOKEN"),
            Side::Destination => (
                &self.destination_token,
                "--destination-token",
                "ORG_MIRROR_DESTINATION_TOKEN",
            ),
        };

        match token.as_deref().map(Credential::new) {
            Some(credential) if !credential.is_empty() => Ok(credential),
            _ => Err(AppError::Config(format!(
                "{} token not configured. Set via {}, {} env var, or config file",
                side_name(side),
                flag,
                env
            ))),
        }
    }

    pub fn api_url(&self, side: Side) -> &str {
        match side {
            Side::Source => &self.source_api_url,
            Side::Destination => &self.destination_api_url,
        }
    }

    /// All organization pairs: explicit records first, then the positional lists
    pub fn organization_pairs(&self) -> std::result::Result<Vec<OrganizationPair>, AppError> {
        let mut pairs = self
            .organizations
            .iter()
            .map(|p| OrganizationPair::new(&p.source, &p.destination))
            .collect::<mirror_core::Result<Vec<_>>>()
            .map_err(AppError::config)?;

        pairs.extend(
            OrganizationPair::zip_positional(&self.source_orgs, &self.destination_orgs)
                .map_err(AppError::config)?,
        );

        if pairs.is_empty() {
            return Err(AppError::Config(
                "No organizations configured. Set --source-orgs/--destination-orgs or [[organizations]] in the config file"
                    .to_string(),
            ));
        }

        Ok(pairs)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            PathBuf::from(format!(
                "org-mirror-{}.log",
                Local::now().format("%Y%m%d-%H%M%S")
            ))
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn git_timeout(&self) -> Option<Duration> {
        self.git_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn throttle(&self) -> Throttle {
        Throttle::new(
            Duration::from_millis(self.repo_delay_ms),
            self.rate_limit_min_remaining,
            Duration::from_secs(self.rate_limit_max_wait_secs),
        )
    }

    pub fn migration_settings(&self) -> std::result::Result<MigrationSettings, AppError> {
        Ok(MigrationSettings {
            work_dir: self.work_dir.clone(),
            destination_git_url: self.destination_git_url.clone(),
            source_credential: self.credential(Side::Source)?,
            destination_credential: self.credential(Side::Destination)?,
            dry_run: self.dry_run,
        })
    }
}

fn side_name(side: Side) -> &'static str {
    match side {
        Side::Source => "Source",
        Side::Destination => "Destination",
    }
}

fn config_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
        return paths;
    }

    if let Some(path) = get_project_config_path() {
        paths.push(path);
    }
    if let Some(path) = get_local_config_path() {
        if !paths.contains(&path) {
            paths.push(path);
        }
    }

    paths
}

fn get_project_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "org-mirror").map(|d| d.config_dir().join("config.toml"))
}

fn get_local_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join(LOCAL_CONFIG_FILE_NAME))
}
