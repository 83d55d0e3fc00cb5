use serde::{Deserialize, Serialize};

/// GitHub repository as returned by the repository and listing endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubRepository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub private: bool,
    /// "public", "private" or "internal"
    pub visibility: Option<String>,
    pub default_branch: Option<String>,
    #[serde(default)]
    pub has_issues: bool,
    #[serde(default)]
    pub has_projects: bool,
    #[serde(default)]
    pub has_wiki: bool,
    /// Missing from some responses; GitHub's default is enabled
    #[serde(default = "default_true")]
    pub has_downloads: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub fork: bool,
    pub clone_url: String,
}

fn default_true() -> bool {
    true
}

/// Body of `POST /orgs/{org}/repos`
#[derive(Debug, Clone, Serialize)]
pub struct CreateGitHubRepository {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub private: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    pub has_issues: bool,
    pub has_projects: bool,
    pub has_wiki: bool,
    pub has_downloads: bool,
}

/// Body of `PATCH /repos/{owner}/{repo}`
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateGitHubRepository {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
}
