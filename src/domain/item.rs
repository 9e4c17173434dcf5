//! Todo item and list state
//!
//! Items are flat and optionally grouped. Their only order is insertion order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of a todo item
///
/// Statuses form an unordered set of labels: any status may be set from any
/// other one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Done,
    Skipped,
    Blocked,
}

impl TodoStatus {
    /// Order in which statuses appear in the summary line
    pub const SUMMARY_ORDER: [TodoStatus; 5] = [
        TodoStatus::Done,
        TodoStatus::InProgress,
        TodoStatus::Pending,
        TodoStatus::Blocked,
        TodoStatus::Skipped,
    ];

    /// Returns the wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Pending => "pending",
            TodoStatus::InProgress => "in_progress",
            TodoStatus::Done => "done",
            TodoStatus::Skipped => "skipped",
            TodoStatus::Blocked => "blocked",
        }
    }

    /// Returns the label used in human-readable summaries
    pub fn label(&self) -> &'static str {
        match self {
            TodoStatus::InProgress => "in progress",
            other => other.as_str(),
        }
    }

    /// Returns true if a reason is kept alongside this status
    pub fn carries_reason(&self) -> bool {
        matches!(self, TodoStatus::Skipped | TodoStatus::Blocked)
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single tracked task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Positive id, unique for the lifetime of the list
    pub id: u64,

    /// Description, immutable after creation
    pub text: String,

    /// Current status
    pub status: TodoStatus,

    /// Why the item was skipped or blocked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Display group, set once at creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl TodoItem {
    /// Creates a pending item
    pub fn new(id: u64, text: impl Into<String>, group: Option<String>) -> Self {
        Self {
            id,
            text: text.into(),
            status: TodoStatus::Pending,
            reason: None,
            group,
        }
    }

    /// Sets the status and overwrites the reason
    ///
    /// The reason is only kept for statuses that carry one. Any previous
    /// reason is replaced, never merged. Returns the reason that was dropped,
    /// if the transition discarded one.
    pub fn transition(&mut self, status: TodoStatus, reason: Option<String>) -> Option<String> {
        let reason = reason.filter(|r| status.carries_reason() && !r.trim().is_empty());
        let previous = std::mem::replace(&mut self.reason, reason);
        self.status = status;

        match previous {
            Some(prev) if self.reason.as_deref() != Some(prev.as_str()) => Some(prev),
            _ => None,
        }
    }
}

/// The whole tracked list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoState {
    /// Items in insertion order
    pub items: Vec<TodoItem>,

    /// Next id to assign
    pub next_id: u64,

    /// Label for the list as a whole
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_name: Option<String>,
}

impl Default for TodoState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
            list_name: None,
        }
    }
}

impl TodoState {
    /// Creates a fresh list with an optional name
    pub fn named(list_name: Option<String>) -> Self {
        Self {
            list_name,
            ..Self::default()
        }
    }

    /// Looks up an item by id
    pub fn get(&self, id: u64) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Looks up an item by id for mutation
    pub fn get_mut(&mut self, id: u64) -> Option<&mut TodoItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Appends a pending item with the next id and returns that id
    pub fn push(&mut self, text: impl Into<String>, group: Option<String>) -> u64 {
        let id = self.next_id;
        self.items.push(TodoItem::new(id, text, group));
        self.next_id += 1;
        id
    }

    /// Counts items with the given status
    pub fn count(&self, status: TodoStatus) -> usize {
        self.items.iter().filter(|item| item.status == status).count()
    }

    /// Returns true if there are no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Groups items by their label, preserving first-seen group order
    ///
    /// Ungrouped items are collected under `None`.
    pub fn grouped(&self) -> Vec<(Option<&str>, Vec<&TodoItem>)> {
        let mut groups: Vec<(Option<&str>, Vec<&TodoItem>)> = Vec::new();
        for item in &self.items {
            let key = item.group.as_deref();
            match groups.iter_mut().find(|(g, _)| *g == key) {
                Some((_, members)) => members.push(item),
                None => groups.push((key, vec![item])),
            }
        }
        groups
    }
}
