use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "comments",
    version,
    about = "Render and post blog comment threads backed by GitHub issues"
)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'o', value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to colorize output
    #[arg(long, value_enum, global = true, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a TOML config file
    #[arg(long, env = "COMMENTS_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// GitHub API base URL (overrides config file)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Repository owner holding the comment issues (overrides config file)
    #[arg(long, global = true)]
    pub owner: Option<String>,

    /// Repository holding the comment issues (overrides config file)
    #[arg(long, global = true)]
    pub repo: Option<String>,

    /// Issue number backing the page's comment thread (overrides config file)
    #[arg(long, short = 't', global = true)]
    pub thread: Option<u64>,

    /// Show debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    /// The rendered `comments-list` markup
    Html,
}

#[derive(ValueEnum, Clone, Debug, Copy, Default)]
pub enum ColorChoice {
    /// Colorize output if stdout is a terminal
    #[default]
    Auto,
    /// Always colorize output
    Always,
    /// Never colorize output
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch and render the comment thread
    #[command(visible_alias = "ls")]
    List {
        /// Display pixel density; above 1.3 the larger avatars are used
        #[arg(long)]
        pixel_ratio: Option<f64>,
    },
    /// Post a comment with the stored token, then show the refreshed thread
    Submit {
        /// Comment text (GitHub-flavored markdown)
        body: String,
    },
    /// Finish a submission deferred across the authorization redirect
    ///
    /// FRAGMENT is the URL fragment the authorization flow redirected back
    /// with: a percent-encoded JSON object {"token": .., "comment": ..}.
    Resume {
        fragment: String,
    },
    /// Inspect or edit the stored session cookies
    Session {
        #[command(subcommand)]
        action: SessionCommands,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum SessionCommands {
    /// Show stored cookies (the token is masked)
    Show,
    /// Store a token as if the authorization flow had completed
    SetToken { token: String },
    /// Delete the session file
    Clear,
    /// Print the session file path
    Path,
}

impl Cli {
    /// Generate shell completions and write to stdout
    pub fn generate_completions(shell: Shell) {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "comments", &mut std::io::stdout());
    }
}
