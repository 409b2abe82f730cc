use crate::error::Result;
use crate::models::{AuthToken, Comment};

/// Remote service holding the comment threads
///
/// Each backend (GitHub, test doubles) provides its own implementation.
pub trait CommentSource: Send + Sync {
    /// Fetch up to one page of comments for a thread, oldest first.
    /// The token, when present, is sent as read authorization.
    fn list_comments(&self, thread_id: u64, token: Option<&AuthToken>) -> Result<Vec<Comment>>;

    /// Post a new comment to a thread on behalf of the token's owner
    fn submit_comment(&self, thread_id: u64, body: &str, token: &AuthToken) -> Result<()>;
}

/// Container that rendered comment fragments are appended to
pub trait RenderTarget {
    fn append_html(&mut self, fragment: &str);
}

/// The page hosting the thread
pub trait Page {
    /// Reload the whole page, re-running the render flow
    fn reload(&mut self);
}
