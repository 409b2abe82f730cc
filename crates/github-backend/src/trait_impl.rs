//! Implementation of thread-core traits for GitHubClient

use thread_core::{AuthToken, Comment, CommentSource, Result, ThreadError};

use crate::client::GitHubClient;
use crate::convert::github_comment_to_core;

impl CommentSource for GitHubClient {
    fn list_comments(&self, thread_id: u64, token: Option<&AuthToken>) -> Result<Vec<Comment>> {
        let comments = self
            .get_comments(thread_id, token.map(AuthToken::as_str))
            .map_err(ThreadError::from)?;

        // A comment that fails to convert is dropped; the rest of the thread still renders
        Ok(comments
            .into_iter()
            .filter_map(|c| {
                let id = c.id;
                match github_comment_to_core(c) {
                    Ok(comment) => Some(comment),
                    Err(err) => {
                        tracing::warn!(comment = id, error = %err, "skipping unreadable comment");
                        None
                    }
                }
            })
            .collect())
    }

    fn submit_comment(&self, thread_id: u64, body: &str, token: &AuthToken) -> Result<()> {
        self.add_comment(thread_id, body, token.as_str())
            .map_err(ThreadError::from)
    }
}
