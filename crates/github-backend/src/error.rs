use thiserror::Error;
use thread_core::ThreadError;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid timestamp '{0}'")]
    Timestamp(String),

    #[error("Issue not found: {0}")]
    IssueNotFound(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Rate limited")]
    RateLimited,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, GitHubError>;

impl From<GitHubError> for ThreadError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::Http(e) => ThreadError::Network(e.to_string()),
            GitHubError::Parse(e) => ThreadError::Parse(e.to_string()),
            GitHubError::Timestamp(ts) => {
                ThreadError::Parse(format!("invalid created_at timestamp '{}'", ts))
            }
            GitHubError::IssueNotFound(id) => ThreadError::NotFound(id),
            GitHubError::Unauthorized => ThreadError::Unauthorized,
            GitHubError::RateLimited => ThreadError::Api {
                status: 429,
                message: "GitHub API rate limit exceeded".to_string(),
            },
            GitHubError::Api { status, message } => ThreadError::Api { status, message },
        }
    }
}
