//! Client-side session state: the cookie jar and the one-shot URL fragment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, ThreadError};
use crate::models::{AuthToken, PendingSubmission, SubmitFlow};

/// Cookie holding the visitor's credential
pub const TOKEN_COOKIE: &str = "ghtoken";

/// Name/value cookie store scoped to the page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CookieJar {
    entries: BTreeMap<String, String>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `Cookie:` header value such as `a=1; ghtoken=abc`.
    ///
    /// Pairs without `=` or with an empty name are skipped. Values are
    /// percent-decoded; undecodable values are kept as-is.
    pub fn parse(header: &str) -> Self {
        let mut jar = Self::new();
        for pair in header.split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let value = value.trim();
            let value = urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string());
            jar.entries.insert(name.to_string(), value);
        }
        jar
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.entries.insert(name.to_string(), value.to_string());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize all cookies back into a `Cookie:` header value
    pub fn to_header(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Build the `Set-Cookie` value that would persist `name` site-wide
    pub fn set_cookie_header(&self, name: &str) -> Option<String> {
        self.get(name)
            .map(|v| format!("{}={}; path=/", name, urlencoding::encode(v)))
    }
}

/// Everything the thread client reads from the hosting page besides the DOM
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    cookies: CookieJar,
    fragment: Option<String>,
}

impl SessionState {
    pub fn new(cookies: CookieJar) -> Self {
        Self {
            cookies,
            fragment: None,
        }
    }

    /// Attach the URL fragment the page was opened with (with or without `#`)
    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    pub fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    pub fn into_cookies(self) -> CookieJar {
        self.cookies
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// The stored credential, if any. An empty cookie counts as absent.
    pub fn token(&self) -> Option<AuthToken> {
        self.cookies
            .get(TOKEN_COOKIE)
            .filter(|t| !t.is_empty())
            .map(AuthToken::new)
    }

    pub fn set_token(&mut self, token: &AuthToken) {
        self.cookies.set(TOKEN_COOKIE, token.as_str());
    }

    pub fn clear_token(&mut self) {
        self.cookies.remove(TOKEN_COOKIE);
    }

    /// Consume a pending submission delivered through the URL fragment.
    ///
    /// The fragment is cleared whether or not it decodes. On success the
    /// carried token is stored in the `ghtoken` cookie.
    pub fn detect_pending_submission(&mut self) -> Result<Option<PendingSubmission>> {
        let Some(raw) = self.fragment.take() else {
            return Ok(None);
        };
        let raw = raw.strip_prefix('#').unwrap_or(&raw);
        if raw.is_empty() {
            return Ok(None);
        }

        let decoded = urlencoding::decode(raw)
            .map_err(|e| ThreadError::Parse(format!("fragment is not valid UTF-8: {}", e)))?;
        let pending: PendingSubmission = serde_json::from_str(&decoded)
            .map_err(|e| ThreadError::Parse(format!("fragment is not a pending submission: {}", e)))?;

        self.set_token(&pending.auth_token());
        Ok(Some(pending))
    }

    /// Decide how the compose form behaves.
    ///
    /// A stored token wins over a queued fragment, which is then left untouched.
    pub fn plan_submission(&mut self) -> Result<SubmitFlow> {
        if let Some(token) = self.token() {
            return Ok(SubmitFlow::Armed(token));
        }
        Ok(match self.detect_pending_submission()? {
            Some(pending) => SubmitFlow::AutoSubmit(pending),
            None => SubmitFlow::Idle,
        })
    }
}
