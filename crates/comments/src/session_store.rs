use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use thread_core::CookieJar;

const SESSION_FILE_NAME: &str = ".comments-session.json";

/// Cookie jar persisted in the current directory, standing in for the
/// browser's cookie storage for the site
pub struct SessionStore;

impl SessionStore {
    /// Load stored cookies; a missing file is an empty jar
    pub fn load() -> Result<CookieJar> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(CookieJar::new());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read session: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse session")
    }

    /// Save cookies to the current directory
    pub fn save(jar: &CookieJar) -> Result<()> {
        let path = Self::path()?;
        let content = serde_json::to_string_pretty(jar)?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write session: {}", path.display()))?;
        Ok(())
    }

    /// Get the session file path
    pub fn path() -> Result<PathBuf> {
        Ok(std::env::current_dir()?.join(SESSION_FILE_NAME))
    }

    /// Delete the session file
    pub fn delete() -> Result<()> {
        let path = Self::path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to delete session: {}", path.display()))?;
        }
        Ok(())
    }
}
