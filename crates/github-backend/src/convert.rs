use chrono::{DateTime, Utc};
use thread_core::{Comment, CommentAuthor};

use crate::error::{GitHubError, Result};
use crate::models::GitHubComment;

/// Convert a GitHub comment to a thread-core Comment
///
/// When GitHub did not render the body (`body_html` missing), the plain
/// body is escaped and wrapped in a paragraph.
pub fn github_comment_to_core(c: GitHubComment) -> Result<Comment> {
    let created_at =
        parse_github_datetime(&c.created_at).ok_or(GitHubError::Timestamp(c.created_at))?;

    let body_html = match (c.body_html, c.body) {
        (Some(html), _) => html,
        (None, Some(text)) => format!("<p>{}</p>", escape_text(&text)),
        (None, None) => String::new(),
    };

    Ok(Comment {
        id: c.id.to_string(),
        html_url: c.html_url,
        body_html,
        created_at,
        author: CommentAuthor {
            login: c.user.login,
            avatar_url: c.user.avatar_url,
            html_url: c.user.html_url,
        },
    })
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn parse_github_datetime(dt: &str) -> Option<DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(dt)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}
