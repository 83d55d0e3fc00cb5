use serde::{Deserialize, Serialize};

/// GitHub organization (minimal representation)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubOrganization {
    pub login: String,
    pub id: u64,
    pub name: Option<String>,
    pub description: Option<String>,
}
