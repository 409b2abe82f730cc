//! Turning comments into `comments-list` markup.

use chrono::{DateTime, Utc};
use handlebars::Handlebars;
use serde::Serialize;

use crate::error::{Result, ThreadError};
use crate::models::Comment;
use crate::traits::RenderTarget;

const COMMENT_TEMPLATE: &str = include_str!("templates/comment.hbs");
const FALLBACK_TEMPLATE: &str = include_str!("templates/fallback.hbs");

/// Pixel density above which the larger avatar is requested
const HIGH_DENSITY_THRESHOLD: f64 = 1.3;
const AVATAR_SIZE: u32 = 20;
const AVATAR_SIZE_HIGH_DENSITY: u32 = 40;

/// Format a creation timestamp like `Jan 2, 2020` (en-us, UTC)
pub fn format_comment_date(created_at: DateTime<Utc>) -> String {
    created_at.format("%b %-d, %Y").to_string()
}

/// Avatar edge length in pixels for the display's pixel density
pub fn avatar_size(pixel_ratio: Option<f64>) -> u32 {
    match pixel_ratio {
        Some(ratio) if ratio > HIGH_DENSITY_THRESHOLD => AVATAR_SIZE_HIGH_DENSITY,
        _ => AVATAR_SIZE,
    }
}

/// Append the size parameter to an avatar URL
pub fn avatar_src(url: &str, size: u32) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{}{}s={}", url, sep, size)
}

fn escape_html(data: &str) -> String {
    let mut out = String::with_capacity(data.len());
    for c in data.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Serialize)]
struct CommentView<'a> {
    avatar_src: String,
    login: &'a str,
    profile_url: &'a str,
    html_url: &'a str,
    date: String,
    body_html: &'a str,
}

/// Renders comments into HTML fragments
pub struct Renderer {
    registry: Handlebars<'static>,
    avatar_size: u32,
}

impl Renderer {
    pub fn new(pixel_ratio: Option<f64>) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(escape_html);
        registry
            .register_template_string("comment", COMMENT_TEMPLATE)
            .map_err(|e| ThreadError::Render(e.to_string()))?;
        registry
            .register_template_string("fallback", FALLBACK_TEMPLATE)
            .map_err(|e| ThreadError::Render(e.to_string()))?;

        Ok(Self {
            registry,
            avatar_size: avatar_size(pixel_ratio),
        })
    }

    pub fn avatar_size(&self) -> u32 {
        self.avatar_size
    }

    /// Render a single comment fragment
    pub fn render_comment(&self, comment: &Comment) -> Result<String> {
        let view = CommentView {
            avatar_src: avatar_src(&comment.author.avatar_url, self.avatar_size),
            login: &comment.author.login,
            profile_url: &comment.author.html_url,
            html_url: &comment.html_url,
            date: format_comment_date(comment.created_at),
            body_html: &comment.body_html,
        };
        self.registry
            .render("comment", &view)
            .map_err(|e| ThreadError::Render(e.to_string()))
    }

    /// Append one fragment per comment, in the order given.
    ///
    /// Nothing is appended unless every comment renders.
    pub fn render<I>(&self, comments: I, target: &mut dyn RenderTarget) -> Result<usize>
    where
        I: IntoIterator<Item = Comment>,
    {
        let fragments = comments
            .into_iter()
            .map(|c| self.render_comment(&c))
            .collect::<Result<Vec<_>>>()?;

        for fragment in &fragments {
            target.append_html(fragment);
        }
        Ok(fragments.len())
    }

    /// Append a visible notice in place of the thread
    pub fn render_fallback(&self, message: &str, target: &mut dyn RenderTarget) -> Result<()> {
        let html = self
            .registry
            .render("fallback", &serde_json::json!({ "message": message }))
            .map_err(|e| ThreadError::Render(e.to_string()))?;
        target.append_html(&html);
        Ok(())
    }
}

/// In-memory `comments-list` container
#[derive(Debug, Default, Clone)]
pub struct CommentList {
    fragments: Vec<String>,
}

impl CommentList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// The container element with every appended fragment
    pub fn into_html(self) -> String {
        let mut html = String::from("<div class=\"comments-list\">\n");
        for fragment in self.fragments {
            html.push_str(&fragment);
        }
        html.push_str("</div>\n");
        html
    }
}

impl RenderTarget for CommentList {
    fn append_html(&mut self, fragment: &str) {
        self.fragments.push(fragment.to_string());
    }
}
