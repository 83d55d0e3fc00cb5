use chrono::DateTime;
use mirror_core::{Credential, RateLimitStatus};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Mutex;
use std::time::Duration;
use ureq::Agent;

use crate::error::{GitHubError, Result};
use crate::models::*;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// GitHub REST API client bound to one token
pub struct GitHubClient {
    agent: Agent,
    base_url: String,
    token: Credential,
    rate_limit: Mutex<Option<RateLimitStatus>>,
}

impl GitHubClient {
    /// Create a new GitHub client targeting api.github.com
    pub fn new(token: &Credential) -> Self {
        Self::with_base_url("https://api.github.com", token)
    }

    /// Create a new GitHub client with a custom base URL (for GHE.com hosts or testing)
    pub fn with_base_url(base_url: &str, token: &Credential) -> Self {
        Self {
            agent: build_agent(DEFAULT_TIMEOUT),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.clone(),
            rate_limit: Mutex::new(None),
        }
    }

    /// Replace the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = build_agent(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Latest rate-limit quota reported by the API
    pub fn last_rate_limit(&self) -> Option<RateLimitStatus> {
        self.rate_limit.lock().ok().and_then(|guard| *guard)
    }

    /// Build the Authorization header value
    fn auth_header(&self) -> String {
        format!("Bearer {}", self.token.expose())
    }

    fn record_rate_limit(&self, headers: &ureq::http::HeaderMap) {
        if let Some(status) = parse_rate_limit(headers) {
            if let Ok(mut guard) = self.rate_limit.lock() {
                *guard = Some(status);
            }
        }
    }

    /// Check response status and return error if not successful
    fn check_response(
        &self,
        mut response: ureq::http::Response<ureq::Body>,
        resource: &str,
    ) -> Result<ureq::http::Response<ureq::Body>> {
        self.record_rate_limit(response.headers());
        let status = response.status().as_u16();

        if (200..300).contains(&status) {
            return Ok(response);
        }

        // Rate limiting: 429, or 403 with x-ratelimit-remaining: 0
        let exhausted = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "0");
        if status == 429 || (status == 403 && exhausted) {
            let reset = response
                .headers()
                .get("x-ratelimit-reset")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<i64>().ok());
            return Err(GitHubError::RateLimited { reset });
        }

        let body = response
            .body_mut()
            .read_to_string()
            .unwrap_or_else(|_| String::new());

        // Try to parse as GitHub error response
        let message = if let Ok(error_response) = serde_json::from_str::<serde_json::Value>(&body) {
            error_response
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or(&body)
                .to_string()
        } else if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            body
        };

        Err(match status {
            401 => GitHubError::Unauthorized,
            403 => GitHubError::Forbidden(message),
            404 => GitHubError::NotFound(resource.to_string()),
            422 => GitHubError::Unprocessable(message),
            _ => GitHubError::Api { status, message },
        })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(method = "GET", %url, "GitHub API request");

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &self.auth_header())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .call()
            .map_err(GitHubError::Http)?;

        let mut response = self.check_response(response, path)?;
        Ok(response.body_mut().read_json()?)
    }

    fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(method, %url, "GitHub API request");

        let request = match method {
            "PATCH" => self.agent.patch(&url),
            _ => self.agent.post(&url),
        };

        let response = request
            .header("Authorization", &self.auth_header())
            .header("Content-Type", "application/json")
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send_json(body)
            .map_err(GitHubError::Http)?;

        let mut response = self.check_response(response, path)?;
        Ok(response.body_mut().read_json()?)
    }

    // ==================== Organization Operations ====================

    /// Get an organization by login
    pub fn get_org(&self, org: &str) -> Result<GitHubOrganization> {
        self.get_json(&format!("/orgs/{}", urlencoding::encode(org)))
    }

    // ==================== Repository Operations ====================

    /// List one page of an organization's repositories, all types included
    pub fn list_org_repos(
        &self,
        org: &str,
        per_page: usize,
        page: usize,
    ) -> Result<Vec<GitHubRepository>> {
        self.get_json(&format!(
            "/orgs/{}/repos?type=all&per_page={}&page={}",
            urlencoding::encode(org),
            per_page,
            page
        ))
    }

    /// Get a specific repository
    pub fn get_repo(&self, owner: &str, repo: &str) -> Result<GitHubRepository> {
        self.get_json(&format!(
            "/repos/{}/{}",
            urlencoding::encode(owner),
            urlencoding::encode(repo)
        ))
    }

    /// Create a repository in an organization
    pub fn create_org_repo(
        &self,
        org: &str,
        repo: &CreateGitHubRepository,
    ) -> Result<GitHubRepository> {
        self.send_json("POST", &format!("/orgs/{}/repos", urlencoding::encode(org)), repo)
    }

    /// Update repository settings
    pub fn update_repo(
        &self,
        owner: &str,
        repo: &str,
        update: &UpdateGitHubRepository,
    ) -> Result<GitHubRepository> {
        self.send_json(
            "PATCH",
            &format!(
                "/repos/{}/{}",
                urlencoding::encode(owner),
                urlencoding::encode(repo)
            ),
            update,
        )
    }
}

fn build_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Read the `x-ratelimit-*` headers, if all of them are present
fn parse_rate_limit(headers: &ureq::http::HeaderMap) -> Option<RateLimitStatus> {
    let read = |name: &str| -> Option<u64> { headers.get(name)?.to_str().ok()?.parse().ok() };

    let limit = read("x-ratelimit-limit")?;
    let remaining = read("x-ratelimit-remaining")?;
    let reset = DateTime::from_timestamp(read("x-ratelimit-reset")? as i64, 0)?;

    Some(RateLimitStatus {
        limit,
        remaining,
        reset,
    })
}
