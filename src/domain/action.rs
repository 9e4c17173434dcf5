//! Action requests accepted by the tracker
//!
//! The request keeps `action` as a raw string so that unknown kinds reach the
//! reducer and come back as an error response instead of a parse failure. A
//! missing `action` decodes as the empty string and is reported the same way.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::TodoError;
use super::item::TodoStatus;

/// Kind of action the reducer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Create,
    Add,
    Batch,
    Start,
    Done,
    Skip,
    Block,
    Reset,
    List,
    Summary,
    Clear,
}

impl ActionKind {
    pub const ALL: [ActionKind; 11] = [
        ActionKind::Create,
        ActionKind::Add,
        ActionKind::Batch,
        ActionKind::Start,
        ActionKind::Done,
        ActionKind::Skip,
        ActionKind::Block,
        ActionKind::Reset,
        ActionKind::List,
        ActionKind::Summary,
        ActionKind::Clear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Create => "create",
            ActionKind::Add => "add",
            ActionKind::Batch => "batch",
            ActionKind::Start => "start",
            ActionKind::Done => "done",
            ActionKind::Skip => "skip",
            ActionKind::Block => "block",
            ActionKind::Reset => "reset",
            ActionKind::List => "list",
            ActionKind::Summary => "summary",
            ActionKind::Clear => "clear",
        }
    }

    /// Returns the status a status-changing action sets, if any
    pub fn target_status(&self) -> Option<TodoStatus> {
        match self {
            ActionKind::Start => Some(TodoStatus::InProgress),
            ActionKind::Done => Some(TodoStatus::Done),
            ActionKind::Skip => Some(TodoStatus::Skipped),
            ActionKind::Block => Some(TodoStatus::Blocked),
            ActionKind::Reset => Some(TodoStatus::Pending),
            _ => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TodoError::UnknownAction(s.to_string()))
    }
}

/// One entry of a `batch` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl BatchEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            group: None,
        }
    }

    pub fn grouped(text: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            group: Some(group.into()),
        }
    }
}

/// A request to the tracker, independent of transport
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionRequest {
    #[serde(default)]
    pub action: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<BatchEntry>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl ActionRequest {
    /// Creates a bare request for the given kind
    pub fn new(kind: ActionKind) -> Self {
        Self {
            action: kind.as_str().to_string(),
            ..Self::default()
        }
    }

    pub fn create(name: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            ..Self::new(ActionKind::Create)
        }
    }

    pub fn add(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(ActionKind::Add)
        }
    }

    pub fn batch(items: Vec<BatchEntry>) -> Self {
        Self {
            items: Some(items),
            ..Self::new(ActionKind::Batch)
        }
    }

    /// Creates a status-changing request for an item
    pub fn status(kind: ActionKind, id: u64) -> Self {
        Self {
            id: Some(id),
            ..Self::new(kind)
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Parses the action name
    pub fn kind(&self) -> Result<ActionKind, TodoError> {
        self.action.parse()
    }
}
