mod cli;
mod color;
mod config;
mod output;
mod session_store;

use anyhow::{anyhow, Result};
use clap::Parser;
use cli::{Cli, Commands, OutputFormat, SessionCommands};
use config::{CliOverrides, Config};
use github_backend::GitHubClient;
use output::{output_error, output_list, output_load_failure, output_message, ConsoleReporter};
use session_store::SessionStore;
use std::process::ExitCode;
use thread_core::{
    AuthToken, Comment, CommentList, CommentThreadClient, FailureReporter, Page, Renderer,
    SessionState, SubmitFlow, TOKEN_COOKIE,
};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    color::init(cli.color);
    init_logging(cli.verbose);

    let format = cli.format;
    if let Err(e) = run(cli) {
        output_error(&e, format);
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Logs go to stderr so they never mix with rendered output
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Stands in for the browser page: a reload re-renders the thread
#[derive(Default)]
struct CliPage {
    reloads: usize,
}

impl Page for CliPage {
    fn reload(&mut self) {
        self.reloads += 1;
    }
}

fn run(cli: Cli) -> Result<()> {
    // Commands that don't need a thread
    match &cli.command {
        Commands::Session { action } => return handle_session(action, cli.format),
        Commands::Completions { shell } => {
            Cli::generate_completions(*shell);
            return Ok(());
        }
        _ => {}
    }

    let mut config = Config::load(cli.config.as_deref())?;
    config.merge_with_cli(CliOverrides {
        api_url: cli.api_url.clone(),
        owner: cli.owner.clone(),
        repo: cli.repo.clone(),
        thread: cli.thread,
    });
    let target = config.target()?;
    tracing::debug!(?target, "resolved comment thread");

    let client = GitHubClient::with_base_url(&target.api_url, &target.owner, &target.repo);
    let reporter = ConsoleReporter::default();
    let mut thread = CommentThreadClient::new(&client, target.thread).with_reporter(&reporter);
    if let Some(message) = config.fallback_message() {
        thread = thread.with_fallback_message(message);
    }

    match &cli.command {
        Commands::List { pixel_ratio } => {
            let session = SessionState::new(SessionStore::load()?);
            handle_list(
                &thread,
                &reporter,
                &session,
                pixel_ratio.or(config.pixel_ratio),
                cli.format,
            )
        }
        Commands::Submit { body } => {
            handle_submit(&thread, &reporter, body, config.pixel_ratio, cli.format)
        }
        Commands::Resume { fragment } => {
            handle_resume(&thread, &reporter, fragment, config.pixel_ratio, cli.format)
        }
        Commands::Session { .. } | Commands::Completions { .. } => {
            unreachable!("Local commands are handled before the thread is resolved")
        }
    }
}

/// Render flow. Load failures are reported but never fail the command.
fn handle_list(
    thread: &CommentThreadClient<'_>,
    reporter: &dyn FailureReporter,
    session: &SessionState,
    pixel_ratio: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Html => {
            let renderer = Renderer::new(pixel_ratio)?;
            let mut list = CommentList::new();
            let outcome = thread.load(session, &renderer, &mut list);
            tracing::debug!(?outcome, "render flow finished");
            print!("{}", list.into_html());
        }
        OutputFormat::Text | OutputFormat::Json => {
            let comments: Vec<Comment> = match thread.list_comments(session.token().as_ref()) {
                Ok(comments) => comments.collect(),
                Err(err) => {
                    reporter.report(&err);
                    output_load_failure(thread.fallback_message(), &err, format);
                    return Ok(());
                }
            };
            if comments.is_empty() && format == OutputFormat::Text {
                println!("No comments.");
            } else {
                output_list(&comments, format);
            }
        }
    }
    Ok(())
}

fn handle_submit(
    thread: &CommentThreadClient<'_>,
    reporter: &ConsoleReporter,
    body: &str,
    pixel_ratio: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    let session = SessionState::new(SessionStore::load()?);
    let token = session.token().ok_or_else(|| {
        anyhow!(
            "Not authorized: no '{}' token stored. Use 'comments resume' after authorizing, or 'comments session set-token'",
            TOKEN_COOKIE
        )
    })?;

    let mut page = CliPage::default();
    let reported_before = reporter.reported();
    thread.submit_comment(body, &token, &mut page)?;
    let accepted = reporter.reported() == reported_before;
    after_submit(thread, reporter, &session, &page, accepted, pixel_ratio, format)
}

fn handle_resume(
    thread: &CommentThreadClient<'_>,
    reporter: &ConsoleReporter,
    fragment: &str,
    pixel_ratio: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    let stored = SessionStore::load()?;
    let mut session = SessionState::new(stored.clone()).with_fragment(fragment);
    let mut page = CliPage::default();

    let reported_before = reporter.reported();
    let flow = thread.resume(&mut session, &mut page);
    let accepted = reporter.reported() == reported_before;

    // The token is kept even when the replayed submission fails
    if session.cookies() != &stored {
        SessionStore::save(session.cookies())?;
    }

    match flow? {
        SubmitFlow::Idle => {
            output_message("Nothing to submit: no stored token and no pending comment.", format);
            Ok(())
        }
        SubmitFlow::Armed(_) => {
            output_message(
                "A token is already stored; post with 'comments submit <BODY>'.",
                format,
            );
            Ok(())
        }
        SubmitFlow::AutoSubmit(_) => {
            after_submit(thread, reporter, &session, &page, accepted, pixel_ratio, format)
        }
    }
}

/// Re-render the thread once per reload the submission requested
fn after_submit(
    thread: &CommentThreadClient<'_>,
    reporter: &dyn FailureReporter,
    session: &SessionState,
    page: &CliPage,
    accepted: bool,
    pixel_ratio: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Text {
        if accepted {
            println!("Comment posted.");
        } else {
            println!("Comment was not accepted.");
        }
        println!();
    }
    for _ in 0..page.reloads {
        handle_list(thread, reporter, session, pixel_ratio, format)?;
    }
    Ok(())
}

fn handle_session(action: &SessionCommands, format: OutputFormat) -> Result<()> {
    match action {
        SessionCommands::Show => {
            let jar = SessionStore::load()?;
            let session = SessionState::new(jar.clone());
            match format {
                OutputFormat::Json => {
                    let cookies: serde_json::Map<String, serde_json::Value> = jar
                        .iter()
                        .map(|(name, value)| (
                                name.to_string(),
                                serde_json::Value::String(mask_cookie(name, value)),
                            ))
                        .collect();
                    let json = serde_json::json!({
                        "authorized": session.token().is_some(),
                        "cookies": cookies,
                    });
                    println!("{}", serde_json::to_string_pretty(&json)?);
                }
                OutputFormat::Text | OutputFormat::Html => {
                    if jar.is_empty() {
                        println!("No session cookies stored.");
                        println!("Use 'comments resume <FRAGMENT>' after authorizing to store a token.");
                    } else {
                        for (name, value) in jar.iter() {
                            println!("{}={}", name, mask_cookie(name, value));
                        }
                    }
                }
            }
            Ok(())
        }
        SessionCommands::SetToken { token } => {
            let mut session = SessionState::new(SessionStore::load()?);
            session.set_token(&AuthToken::new(token.as_str()));
            SessionStore::save(session.cookies())?;
            output_message("Token stored.", format);
            Ok(())
        }
        SessionCommands::Clear => {
            SessionStore::delete()?;
            output_message("Session cleared.", format);
            Ok(())
        }
        SessionCommands::Path => {
            println!("{}", SessionStore::path()?.display());
            Ok(())
        }
    }
}

/// Hide all but the first four characters of the token cookie
fn mask_cookie(name: &str, value: &str) -> String {
    if name != TOKEN_COOKIE {
        return value.to_string();
    }
    let visible: String = value.chars().take(4).collect();
    format!("{}***", visible)
}
