//! Domain models for the todo tracker
//!
//! Contains the reducer and its types without any I/O concerns.

mod action;
mod error;
mod item;
mod reducer;
mod summary;

pub use action::{ActionKind, ActionRequest, BatchEntry};
pub use error::TodoError;
pub use item::{TodoItem, TodoState, TodoStatus};
pub use reducer::{reduce, replay, Response, Snapshot};
pub use summary::{item_line, listing, summary_line};
