//! # Storage Layer
//!
//! The session log owner: persists the branchable history the tracker is
//! rebuilt from. The core never writes here; the CLI appends each response.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Session log | JSONL, append-only | `.todo/session.jsonl` |
//! | Config | TOML | `.todo/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`SessionStore`] uses file locking (`fs2`) for concurrent access
//! - Compaction is atomic (temp file + rename)
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for accessing a project
//! - [`SessionStore`] - Read/append the session log
//! - [`Config`] - Project and global configuration

mod config;
mod jsonl;
mod project;

pub use config::{Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig, PROJECT_DIR};
pub use jsonl::{SessionStore, DEFAULT_SESSION_FILE};
pub use project::{Project, ProjectError};
