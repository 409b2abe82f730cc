use anyhow::{anyhow, Result};
use directories::{BaseDirs, ProjectDirs};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_FALLBACK_MESSAGE: &str = "Comments could not be loaded.";

/// Configuration for the comment thread a page is attached to
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// GitHub API base URL (GitHub Enterprise uses https://host/api/v3)
    pub api_url: String,
    /// Owner of the repository whose issues hold the threads
    pub owner: Option<String>,
    /// Repository whose issues hold the threads
    pub repo: Option<String>,
    /// Issue number of this page's thread
    pub thread: Option<u64>,
    /// Display pixel density used to pick avatar sizes
    pub pixel_ratio: Option<f64>,
    /// Shown in place of the thread when it cannot be loaded; empty disables it
    pub fallback_message: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            owner: None,
            repo: None,
            thread: None,
            pixel_ratio: None,
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
        }
    }
}

/// Values given on the command line, applied over every other source
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub api_url: Option<String>,
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub thread: Option<u64>,
}

/// A fully resolved thread location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadTarget {
    pub api_url: String,
    pub owner: String,
    pub repo: String,
    pub thread: u64,
}

impl Config {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
        }

        for path in config_paths(config_path) {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed("COMMENTS_"));

        figment
            .extract()
            .map_err(|e| anyhow!("Failed to load config: {}", e))
    }

    pub fn merge_with_cli(&mut self, overrides: CliOverrides) {
        if let Some(api_url) = overrides.api_url {
            self.api_url = api_url;
        }
        if let Some(owner) = overrides.owner {
            self.owner = Some(owner);
        }
        if let Some(repo) = overrides.repo {
            self.repo = Some(repo);
        }
        if let Some(thread) = overrides.thread {
            self.thread = Some(thread);
        }
    }

    /// The fallback notice, unless disabled with an empty string
    pub fn fallback_message(&self) -> Option<&str> {
        Some(self.fallback_message.trim()).filter(|m| !m.is_empty())
    }

    /// Resolve the thread location, naming the missing setting on failure
    pub fn target(&self) -> Result<ThreadTarget> {
        let owner = self.owner.clone().ok_or_else(|| {
            anyhow!("Repository owner not configured. Set via --owner, COMMENTS_OWNER env var, or config file")
        })?;
        let repo = self.repo.clone().ok_or_else(|| {
            anyhow!("Repository not configured. Set via --repo, COMMENTS_REPO env var, or config file")
        })?;
        let thread = self.thread.ok_or_else(|| {
            anyhow!("Thread not configured. Set via --thread, COMMENTS_THREAD env var, or config file")
        })?;

        Ok(ThreadTarget {
            api_url: self.api_url.clone(),
            owner,
            repo,
            thread,
        })
    }
}

fn config_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
        return paths;
    }

    if let Some(path) = get_project_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_xdg_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_local_config_path() {
        push_unique(&mut paths, path);
    }

    paths
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}

fn get_project_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "comments").map(|d| d.config_dir().join("config.toml"))
}

fn get_xdg_config_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(dir).join("comments").join("config.toml"));
    }

    BaseDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(".config")
            .join("comments")
            .join("config.toml")
    })
}

fn get_local_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join("comments.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_win() {
        let mut config = Config {
            owner: Some("file-owner".to_string()),
            thread: Some(1),
            ..Config::default()
        };
        config.merge_with_cli(CliOverrides {
            owner: Some("cli-owner".to_string()),
            repo: Some("blog".to_string()),
            thread: Some(12),
            ..CliOverrides::default()
        });

        let target = config.target().unwrap();
        assert_eq!(target.api_url, DEFAULT_API_URL);
        assert_eq!(target.owner, "cli-owner");
        assert_eq!(target.repo, "blog");
        assert_eq!(target.thread, 12);
    }

    #[test]
    fn test_target_names_missing_setting() {
        let config = Config {
            owner: Some("me".to_string()),
            repo: Some("blog".to_string()),
            ..Config::default()
        };
        let err = config.target().unwrap_err();
        assert!(err.to_string().contains("--thread"));
    }

    #[test]
    fn test_empty_fallback_message_disables_it() {
        let mut config = Config::default();
        assert_eq!(config.fallback_message(), Some(DEFAULT_FALLBACK_MESSAGE));

        config.fallback_message = "  ".to_string();
        assert_eq!(config.fallback_message(), None);
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let err = Config::load(Some(Path::new("/nonexistent/comments.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
