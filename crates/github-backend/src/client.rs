use std::time::Duration;
use ureq::Agent;

use crate::error::{GitHubError, Result};
use crate::models::*;

/// Media type that makes GitHub return server-rendered, sanitized `body_html`
const HTML_MEDIA_TYPE: &str = "application/vnd.github.v3.html+json";

/// Maximum page size accepted by the comments endpoint
const COMMENTS_PER_PAGE: usize = 100;

/// GitHub REST API client scoped to one repository's issue comments
pub struct GitHubClient {
    agent: Agent,
    base_url: String,
    owner: String,
    repo: String,
}

impl GitHubClient {
    /// Create a new GitHub client targeting api.github.com
    pub fn new(owner: &str, repo: &str) -> Self {
        Self::with_base_url("https://api.github.com", owner, repo)
    }

    /// Create a new GitHub client with a custom base URL (for GitHub Enterprise or testing)
    pub fn with_base_url(base_url: &str, owner: &str, repo: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        }
    }

    /// Get the owner for this client
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Get the repo for this client
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Build the comments collection URL for an issue
    fn comments_url(&self, number: u64) -> String {
        format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.base_url, self.owner, self.repo, number
        )
    }

    /// Build the Authorization header value
    fn auth_header(token: &str) -> String {
        format!("token {}", token)
    }

    /// Check response status and return error if not successful
    fn check_response(
        &self,
        number: u64,
        mut response: ureq::http::Response<ureq::Body>,
    ) -> Result<ureq::http::Response<ureq::Body>> {
        let status = response.status().as_u16();

        if (200..300).contains(&status) {
            return Ok(response);
        }

        // Detect rate limiting: 403 with x-ratelimit-remaining: 0
        if status == 403 {
            if let Some(remaining) = response.headers().get("x-ratelimit-remaining") {
                if remaining.to_str().unwrap_or("") == "0" {
                    return Err(GitHubError::RateLimited);
                }
            }
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

        match status {
            401 => Err(GitHubError::Unauthorized),
            404 => Err(GitHubError::IssueNotFound(format!(
                "{}/{}#{}",
                self.owner, self.repo, number
            ))),
            _ => Err(GitHubError::Api { status, message }),
        }
    }

    // ==================== Comment Operations ====================

    /// Get up to 100 comments on an issue, oldest first
    ///
    /// The token is optional: anonymous reads work on public repositories
    /// but are subject to a much lower rate limit.
    pub fn get_comments(&self, number: u64, token: Option<&str>) -> Result<Vec<GitHubComment>> {
        let url = format!("{}?per_page={}", self.comments_url(number), COMMENTS_PER_PAGE);
        tracing::debug!(%url, "GET issue comments");

        let mut request = self.agent.get(&url).header("Accept", HTML_MEDIA_TYPE);
        if let Some(token) = token {
            request = request.header("Authorization", &Self::auth_header(token));
        }
        let response = request.call().map_err(GitHubError::Http)?;

        let mut response = self.check_response(number, response)?;
        let body = response.body_mut().read_to_string()?;
        let comments: Vec<GitHubComment> = serde_json::from_str(&body)?;
        Ok(comments)
    }

    /// Add a comment to an issue
    ///
    /// Only the status is inspected; the created comment shows up on the
    /// next `get_comments`.
    pub fn add_comment(&self, number: u64, body: &str, token: &str) -> Result<()> {
        let url = self.comments_url(number);
        tracing::debug!(%url, "POST issue comment");

        let comment = CreateGitHubComment {
            body: body.to_string(),
        };

        let response = self
            .agent
            .post(&url)
            .header("Authorization", &Self::auth_header(token))
            .header("Content-Type", "application/json")
            .send_json(&comment)
            .map_err(GitHubError::Http)?;

        self.check_response(number, response)?;
        Ok(())
    }
}
