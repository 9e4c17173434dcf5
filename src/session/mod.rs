//! # Session History
//!
//! The branchable append-only log the tracker is rebuilt from.
//!
//! ## Pieces
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`SessionLog`] | Tree of entries plus the active leaf |
//! | [`ActionRecord`] | One logged tool outcome with its snapshot |
//! | [`reconstruct`] | State as of the end of a branch |
//! | [`Tracker`] | Owned list state for one branch attachment |
//!
//! ## Flow
//!
//! ```text
//! branch change ──► reconstruct(path) ──► Tracker.state
//! action ─────────► Tracker.handle ─────► Response ──► log owner appends ActionRecord
//! ```

mod id;
mod reconstruct;
mod record;
mod tracker;
mod tree;

pub use id::{EntryId, IdError};
pub use reconstruct::{reconstruct, replay_path, BranchEvent};
pub use record::{ActionRecord, EntryKind, SessionEntry, TOOL_NAME};
pub use tracker::Tracker;
pub use tree::{SessionError, SessionLog};
