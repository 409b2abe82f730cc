use thiserror::Error;

/// Errors raised while loading, rendering or posting a comment thread
#[derive(Error, Debug)]
pub enum ThreadError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Comment submission failed: {0}")]
    Submission(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Thread not found: {0}")]
    NotFound(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, ThreadError>;
