//! JSONL storage for the session log
//!
//! The log lives in `.todo/session.jsonl` with one JSON object per line.
//! Lines are only ever appended: an `entry` line adds a node and moves the
//! leaf to it, a `leaf` line moves the leaf without adding anything.
//! Uses file locking for concurrent access safety.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::session::{EntryId, SessionEntry, SessionLog};

/// Default file name of the session log inside `.todo/`
pub const DEFAULT_SESSION_FILE: &str = "session.jsonl";

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum LogLine {
    Entry { entry: SessionEntry },
    Leaf { id: Option<EntryId> },
}

/// Store for the session log in JSONL format
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Creates a new session store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole log
    pub fn load(&self) -> Result<SessionLog> {
        if !self.path.exists() {
            return Ok(SessionLog::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open session log: {}", self.path.display()))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .context("Failed to acquire read lock on session log")?;

        let reader = BufReader::new(&file);
        let mut entries = Vec::new();
        let mut leaf = None;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let parsed: LogLine = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse session line {}", line_num + 1))?;

            match parsed {
                LogLine::Entry { entry } => {
                    leaf = Some(entry.id.clone());
                    entries.push(entry);
                }
                LogLine::Leaf { id } => leaf = id,
            }
        }

        // Lock is released when file is dropped
        let log = SessionLog::from_parts(entries, leaf)
            .with_context(|| format!("Corrupt session log: {}", self.path.display()))?;
        log::debug!(
            target: "todo::storage",
            "loaded {} entries from {}",
            log.len(),
            self.path.display()
        );
        Ok(log)
    }

    /// Appends one entry
    pub fn append_entry(&self, entry: &SessionEntry) -> Result<()> {
        self.append_line(&LogLine::Entry {
            entry: entry.clone(),
        })
    }

    /// Records a leaf move
    pub fn set_leaf(&self, leaf: Option<&EntryId>) -> Result<()> {
        self.append_line(&LogLine::Leaf {
            id: leaf.cloned(),
        })
    }

    fn append_line(&self, line: &LogLine) -> Result<()> {
        self.ensure_parent()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open session log: {}", self.path.display()))?;

        // Acquire exclusive lock
        file.lock_exclusive()
            .context("Failed to acquire write lock on session log")?;

        let mut writer = BufWriter::new(&file);
        let json = serde_json::to_string(line).context("Failed to serialize session line")?;
        writeln!(writer, "{}", json).context("Failed to write session line")?;

        writer.flush().context("Failed to flush session log")?;

        Ok(())
    }

    /// Rewrites the log with every entry and a single leaf line
    ///
    /// Drops the history of leaf moves, keeps every entry. Returns the number
    /// of entries written.
    pub fn compact(&self, log: &SessionLog) -> Result<usize> {
        self.ensure_parent()?;

        // Write to temp file first
        let temp_path = self.path.with_extension("jsonl.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            // Acquire exclusive lock
            file.lock_exclusive()
                .context("Failed to acquire write lock on session log")?;

            let mut writer = BufWriter::new(&file);

            for entry in log.entries() {
                let line = serde_json::to_string(&LogLine::Entry {
                    entry: entry.clone(),
                })
                .context("Failed to serialize session entry")?;
                writeln!(writer, "{}", line).context("Failed to write session entry")?;
            }

            let leaf = serde_json::to_string(&LogLine::Leaf {
                id: log.leaf().cloned(),
            })
            .context("Failed to serialize leaf")?;
            writeln!(writer, "{}", leaf).context("Failed to write leaf")?;

            writer.flush().context("Failed to flush session log")?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(log.len())
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::EntryKind;
    use tempfile::TempDir;

    fn note(text: &str) -> EntryKind {
        EntryKind::Note {
            text: text.to_string(),
        }
    }

    /// Appends to both the in-memory log and the store, like the CLI does
    fn append(store: &SessionStore, log: &mut SessionLog, text: &str) -> EntryId {
        let entry = log.append(note(text)).clone();
        store.append_entry(&entry).unwrap();
        entry.id
    }

    #[test]
    fn read_missing_store() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.jsonl"));

        let log = store.load().unwrap();
        assert!(log.is_empty());
        assert!(log.leaf().is_none());
    }

    #[test]
    fn appended_entries_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.jsonl"));
        let mut log = SessionLog::new();

        append(&store, &mut log, "a");
        let b = append(&store, &mut log, "b");

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.leaf(), Some(&b));
        assert_eq!(loaded.entries(), log.entries());
    }

    #[test]
    fn leaf_lines_move_the_leaf() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.jsonl"));
        let mut log = SessionLog::new();

        let a = append(&store, &mut log, "a");
        append(&store, &mut log, "b");
        store.set_leaf(Some(&a)).unwrap();
        assert_eq!(store.load().unwrap().leaf(), Some(&a));

        store.set_leaf(None).unwrap();
        assert_eq!(store.load().unwrap().leaf(), None);
    }

    #[test]
    fn compact_keeps_entries_and_leaf() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.jsonl"));
        let mut log = SessionLog::new();

        let a = append(&store, &mut log, "a");
        append(&store, &mut log, "b");
        for _ in 0..3 {
            store.set_leaf(Some(&a)).unwrap();
        }
        log.checkout(&a).unwrap();

        assert_eq!(store.compact(&log).unwrap(), 2);

        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content.lines().count(), 3);

        let loaded = store.load().unwrap();
        assert_eq!(loaded.leaf(), Some(&a));

        // Temp file should not exist after write
        assert!(!store.path().with_extension("jsonl.tmp").exists());
    }

    #[test]
    fn corrupt_line_reports_line_number() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.jsonl");
        fs::write(&path, "{\"type\":\"leaf\",\"id\":null}\nnot json\n").unwrap();

        let err = SessionStore::new(&path).load().unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.jsonl"));

        store.set_leaf(None).unwrap();
        assert!(store.path().exists());
    }
}
