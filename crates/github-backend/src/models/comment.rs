use serde::{Deserialize, Serialize};

/// GitHub user as embedded in a comment
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubUser {
    pub login: String,
    pub id: u64,
    pub avatar_url: String,
    pub html_url: String,
}

/// GitHub issue comment, as returned with the `html+json` media type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubComment {
    pub id: u64,
    pub html_url: String,
    /// Only present when the raw or full media type is requested
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub body_html: Option<String>,
    pub user: GitHubUser,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Request body for creating a comment
#[derive(Debug, Clone, Serialize)]
pub struct CreateGitHubComment {
    pub body: String,
}
