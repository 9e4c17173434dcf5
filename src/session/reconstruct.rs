//! Branch-aware state reconstruction
//!
//! Every tracker record already stores the post-action snapshot, so the state
//! at a branch tip is the snapshot of the last tracker record on the path.
//! That is equivalent to folding the reducer over every recorded request from
//! the default state, without re-running it.

use std::fmt;

use super::record::SessionEntry;
use crate::domain::{replay, TodoState};

/// Why the active branch changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchEvent {
    /// First attach to a session
    SessionStart,
    /// Leaf moved to another existing entry
    Switch,
    /// A new branch was started from an earlier point
    Fork,
    /// The full tree was requested
    Tree,
}

impl fmt::Display for BranchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BranchEvent::SessionStart => "session_start",
            BranchEvent::Switch => "switch",
            BranchEvent::Fork => "fork",
            BranchEvent::Tree => "tree",
        };
        f.write_str(name)
    }
}

/// Returns the state as of the end of `path`
///
/// Entries from other tools are skipped. A path without any tracker
/// snapshot yields the default empty state.
pub fn reconstruct<'a, I>(path: I) -> TodoState
where
    I: IntoIterator<Item = &'a SessionEntry>,
    I::IntoIter: DoubleEndedIterator,
{
    let found = path
        .into_iter()
        .rev()
        .find_map(|entry| entry.record()?.snapshot().map(|s| (entry, s)));

    match found {
        Some((entry, snapshot)) => {
            log::debug!(
                target: "todo::reconstruct",
                "using snapshot from {} ({} items, next id {})",
                entry.id,
                snapshot.items.len(),
                snapshot.next_id
            );
            snapshot.state()
        }
        None => {
            log::debug!(target: "todo::reconstruct", "no tracker record on branch, starting empty");
            TodoState::default()
        }
    }
}

/// Recomputes the state by re-running every recorded tracker request
///
/// Slower than [`reconstruct`]; used to verify that the stored snapshots
/// agree with the reducer.
pub fn replay_path<'a, I>(path: I) -> TodoState
where
    I: IntoIterator<Item = &'a SessionEntry>,
{
    let requests: Vec<_> = path
        .into_iter()
        .filter_map(|entry| entry.record()?.action_request())
        .collect();
    replay(&requests)
}
