//! Session entry IDs
//!
//! Format: `e-{7-char-hash}` (e.g., `e-7f2b4c1`).
//!
//! The hash is derived from the parent ID, the entry content and a nonce, so
//! the same content appended on two branches gets two different IDs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid entry ID format: expected 'e-{{7-char-hash}}', got '{0}'")]
    InvalidEntryId(String),
}

const HASH_LEN: usize = 7;

/// ID of one entry in the session tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryId {
    hash: String,
}

impl EntryId {
    /// Derives an ID from the parent, serialized content and a nonce
    pub fn derive(parent: Option<&EntryId>, content: &str, nonce: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        if let Some(parent) = parent {
            hasher.update(parent.hash.as_bytes());
        }
        hasher.update(content.as_bytes());
        hasher.update(&nonce.to_le_bytes());

        let hex = hasher.finalize().to_hex();
        Self {
            hash: hex[..HASH_LEN].to_string(),
        }
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e-{}", self.hash)
    }
}

impl FromStr for EntryId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hash = s
            .strip_prefix("e-")
            .ok_or_else(|| IdError::InvalidEntryId(s.to_string()))?;

        if hash.len() != HASH_LEN || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(IdError::InvalidEntryId(s.to_string()));
        }

        Ok(Self {
            hash: hash.to_ascii_lowercase(),
        })
    }
}

impl TryFrom<String> for EntryId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntryId> for String {
    fn from(id: EntryId) -> Self {
        id.to_string()
    }
}
