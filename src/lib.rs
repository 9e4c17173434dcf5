//! todo-ledger - a small todo tracker rebuilt from a branchable session log
//!
//! The tracker's state is never stored directly. Each action produces a
//! snapshot that the log owner appends to a session tree; when the active
//! branch changes, the state is recovered from the last snapshot on that
//! branch.

pub mod cli;
pub mod domain;
pub mod session;
pub mod storage;

pub use domain::{ActionKind, ActionRequest, Response, TodoError, TodoItem, TodoState, TodoStatus};
pub use session::{reconstruct, BranchEvent, SessionLog, Tracker};
