//! Branchable session tree
//!
//! Entries are only ever appended. Each entry points at its parent, so the
//! log forms a tree; the `leaf` pointer selects which root-to-leaf path is
//! the active branch.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::id::EntryId;
use super::record::{EntryKind, SessionEntry};

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("Entry not found: {0}")]
    UnknownEntry(EntryId),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(EntryId),

    #[error("Entry {id} references missing parent {parent}")]
    MissingParent { id: EntryId, parent: EntryId },
}

/// In-memory session tree with an active leaf
#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    entries: Vec<SessionEntry>,
    index: HashMap<EntryId, usize>,
    leaf: Option<EntryId>,
}

impl SessionLog {
    /// Creates an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a log from stored entries and the leaf pointer
    ///
    /// Entries must appear after their parents. `None` means no active leaf,
    /// so the next append starts a new root.
    pub fn from_parts(
        entries: Vec<SessionEntry>,
        leaf: Option<EntryId>,
    ) -> Result<Self, SessionError> {
        let mut log = Self::new();
        for entry in entries {
            log.insert(entry)?;
        }

        if let Some(leaf) = leaf {
            log.checkout(&leaf)?;
        }

        Ok(log)
    }

    fn insert(&mut self, entry: SessionEntry) -> Result<(), SessionError> {
        if self.index.contains_key(&entry.id) {
            return Err(SessionError::DuplicateEntry(entry.id));
        }
        if let Some(parent) = &entry.parent {
            if !self.index.contains_key(parent) {
                return Err(SessionError::MissingParent {
                    id: entry.id.clone(),
                    parent: parent.clone(),
                });
            }
        }

        self.index.insert(entry.id.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Appends an entry as a child of the current leaf and moves the leaf to it
    pub fn append(&mut self, kind: EntryKind) -> &SessionEntry {
        self.append_at(kind, Utc::now())
    }

    /// Same as [`append`](Self::append) with an explicit timestamp
    pub fn append_at(&mut self, kind: EntryKind, timestamp: DateTime<Utc>) -> &SessionEntry {
        let parent = self.leaf.clone();
        let content = serde_json::to_string(&kind).unwrap_or_default();

        let mut nonce = self.entries.len() as u64;
        let mut id = EntryId::derive(parent.as_ref(), &content, nonce);
        while self.index.contains_key(&id) {
            nonce += 1;
            id = EntryId::derive(parent.as_ref(), &content, nonce);
        }

        let position = self.entries.len();
        self.index.insert(id.clone(), position);
        self.entries.push(SessionEntry {
            id: id.clone(),
            parent,
            timestamp,
            kind,
        });
        self.leaf = Some(id);
        &self.entries[position]
    }

    /// Returns all entries in append order
    pub fn entries(&self) -> &[SessionEntry] {
        &self.entries
    }

    /// Returns the active leaf
    pub fn leaf(&self) -> Option<&EntryId> {
        self.leaf.as_ref()
    }

    pub fn get(&self, id: &EntryId) -> Option<&SessionEntry> {
        self.index.get(id).map(|&pos| &self.entries[pos])
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.index.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the root-to-`leaf` path
    pub fn branch(&self, leaf: Option<&EntryId>) -> Vec<&SessionEntry> {
        let mut path = Vec::new();
        let mut current = leaf.and_then(|id| self.get(id));

        while let Some(entry) = current {
            path.push(entry);
            current = entry.parent.as_ref().and_then(|id| self.get(id));
        }

        path.reverse();
        path
    }

    /// Returns the root-to-leaf path of the active branch
    pub fn active_branch(&self) -> Vec<&SessionEntry> {
        self.branch(self.leaf.as_ref())
    }

    /// Moves the leaf to an existing entry
    pub fn checkout(&mut self, id: &EntryId) -> Result<(), SessionError> {
        if !self.contains(id) {
            return Err(SessionError::UnknownEntry(id.clone()));
        }
        self.leaf = Some(id.clone());
        Ok(())
    }

    /// Moves the leaf to the parent of `id`
    ///
    /// The next append becomes a sibling of `id`, starting a new branch.
    /// Forking at a root entry leaves no leaf, so the next append is a new root.
    pub fn fork(&mut self, id: &EntryId) -> Result<Option<&EntryId>, SessionError> {
        let entry = self
            .get(id)
            .ok_or_else(|| SessionError::UnknownEntry(id.clone()))?;
        self.leaf = entry.parent.clone();
        Ok(self.leaf.as_ref())
    }

    /// Returns direct children of an entry in append order
    pub fn children(&self, id: &EntryId) -> Vec<&SessionEntry> {
        self.entries
            .iter()
            .filter(|e| e.parent.as_ref() == Some(id))
            .collect()
    }

    /// Returns entries without a parent
    pub fn roots(&self) -> Vec<&SessionEntry> {
        self.entries.iter().filter(|e| e.parent.is_none()).collect()
    }

    /// Returns entries without children, i.e. the tip of every branch
    pub fn tips(&self) -> Vec<&SessionEntry> {
        let parents: HashSet<&EntryId> =
            self.entries.iter().filter_map(|e| e.parent.as_ref()).collect();

        self.entries
            .iter()
            .filter(|e| !parents.contains(&e.id))
            .collect()
    }
}
