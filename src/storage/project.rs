//! Project management
//!
//! Handles project initialization and provides access to the session store.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::config::PROJECT_DIR;
use super::{Config, SessionStore};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a todo-ledger project. Run 'todo-ledger init' first.")]
    NotInProject,
}

/// A todo-ledger project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let todo_dir = root.join(PROJECT_DIR);

        if !todo_dir.is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let todo_dir = root.join(PROJECT_DIR);

        fs::create_dir_all(&todo_dir).with_context(|| {
            format!("Failed to create {} directory: {}", PROJECT_DIR, todo_dir.display())
        })?;

        // Create default config
        let config_path = todo_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# todo-ledger configuration

# Name used by 'create' when no name is given
# list_name = "Backlog"

# Session log, relative to .todo/
session_file = "session.jsonl"
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .todo directory path
    pub fn todo_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the session store
    pub fn session_store(&self) -> Result<SessionStore> {
        Ok(SessionStore::new(self.config.session_path()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_creates_structure() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert!(project.todo_dir().is_dir());
        assert!(project.todo_dir().join("config.toml").is_file());
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();

        Project::init(dir.path()).unwrap();
        Project::init(dir.path()).unwrap(); // Should not fail

        assert!(dir.path().join(".todo").is_dir());
    }

    #[test]
    fn open_existing_project() {
        let dir = TempDir::new().unwrap();
        Project::init(dir.path()).unwrap();

        let project = Project::open(dir.path()).unwrap();
        assert_eq!(project.root(), dir.path());
    }

    #[test]
    fn open_non_project_fails() {
        let dir = TempDir::new().unwrap();
        let result = Project::open(dir.path());

        assert!(result.is_err());
    }

    #[test]
    fn session_store_follows_config() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        let store = project.session_store().unwrap();
        assert!(store.path().ends_with(".todo/session.jsonl"));
    }
}
