use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A comment on a discussion thread, as returned by the remote tracker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: String,
    /// Permalink to the comment on the tracker
    pub html_url: String,
    /// Rendered markup, already sanitized by the remote service
    pub body_html: String,
    pub created_at: DateTime<Utc>,
    pub author: CommentAuthor,
}

/// Comment author information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentAuthor {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
}

/// Opaque credential used for both reading and posting comments
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// A comment deferred across the external authorization redirect
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingSubmission {
    pub comment: String,
    pub token: String,
}

impl PendingSubmission {
    pub fn auth_token(&self) -> AuthToken {
        AuthToken::new(self.token.clone())
    }
}

/// What the compose form should do once the page has loaded
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitFlow {
    /// No credential and nothing queued; the form stays inert
    Idle,
    /// A stored token exists; submissions happen when the visitor posts
    Armed(AuthToken),
    /// A queued submission arrived via the redirect and must be replayed now
    AutoSubmit(PendingSubmission),
}

impl SubmitFlow {
    pub fn is_armed(&self) -> bool {
        matches!(self, SubmitFlow::Armed(_))
    }
}

/// Result of the render flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Rendered(usize),
    Failed,
}
