use crate::cli::OutputFormat;
use colored::Colorize;
use serde::Serialize;
use std::cell::Cell;
use thread_core::{format_comment_date, Comment, FailureReporter, ThreadError};

pub fn output_list<T: Serialize + Displayable>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(&items) {
                println!("{}", json);
            }
        }
        OutputFormat::Text | OutputFormat::Html => {
            for item in items {
                println!("{}", item.display());
                println!();
            }
        }
    }
}

/// Print a one-off status message in the requested format
pub fn output_message(message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({ "success": true, "message": message });
            println!("{}", json);
        }
        OutputFormat::Text | OutputFormat::Html => println!("{}", message),
    }
}

#[derive(Serialize)]
pub struct JsonError {
    pub error: bool,
    pub code: String,
    pub message: String,
}

pub fn output_error(err: &anyhow::Error, format: OutputFormat) {
    let message = match format {
        OutputFormat::Json => {
            let json_err = JsonError {
                error: true,
                code: "error".to_string(),
                message: format!("{:#}", err),
            };
            serde_json::to_string_pretty(&json_err).unwrap_or_else(|_| {
                format!(r#"{{"error": true, "message": "{}"}}"#, err)
            })
        }
        OutputFormat::Text | OutputFormat::Html => {
            format!("{}: {:#}", "Error".red().bold(), err)
        }
    };
    eprintln!("{}", message);
}

/// Print what stands in for a thread that could not be loaded.
///
/// Text shows the fallback notice (nothing when it is disabled); JSON gets
/// an error object so consumers never mistake the failure for an empty thread.
pub fn output_load_failure(fallback: Option<&str>, err: &ThreadError, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "error": true,
                "code": "load_failed",
                "message": fallback.map(str::to_string).unwrap_or_else(|| err.to_string()),
            });
            println!("{}", json);
        }
        OutputFormat::Text | OutputFormat::Html => {
            if let Some(message) = fallback {
                println!("{}", message);
            }
        }
    }
}

/// Surfaces non-fatal thread failures on stderr
#[derive(Default)]
pub struct ConsoleReporter {
    reported: Cell<usize>,
}

impl ConsoleReporter {
    /// Number of failures reported so far
    pub fn reported(&self) -> usize {
        self.reported.get()
    }
}

impl FailureReporter for ConsoleReporter {
    fn report(&self, failure: &ThreadError) {
        tracing::debug!(error = ?failure, "reporting thread failure");
        self.reported.set(self.reported.get() + 1);
        eprintln!("{}: {}", "Warning".yellow().bold(), failure);
    }
}

pub trait Displayable {
    fn display(&self) -> String;
}

impl Displayable for Comment {
    fn display(&self) -> String {
        format!(
            "{} {} {}\n  {}\n  {}",
            self.author.login.cyan().bold(),
            "on".dimmed(),
            format_comment_date(self.created_at),
            self.html_url.dimmed(),
            self.body_html.trim().replace('\n', "\n  ")
        )
    }
}
