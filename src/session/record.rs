//! Session entries and action records
//!
//! The tracker only ever reads these. Entries from other tools share the
//! same log, so `request` and `details` are kept as raw JSON and only
//! decoded for records that belong to the tracker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::EntryId;
use crate::domain::{ActionRequest, Response, Snapshot};

/// Tool name under which the tracker's records are logged
pub const TOOL_NAME: &str = "todo";

/// One logged action outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Tool that produced the record
    pub tool_name: String,

    /// Request as it was issued
    #[serde(default)]
    pub request: serde_json::Value,

    /// Human-readable result line
    #[serde(default)]
    pub message: String,

    /// Post-action snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    #[serde(default)]
    pub is_error: bool,
}

impl ActionRecord {
    /// Builds the record for a tracker action
    pub fn tracker(request: &ActionRequest, response: &Response) -> serde_json::Result<Self> {
        Ok(Self {
            tool_name: TOOL_NAME.to_string(),
            request: serde_json::to_value(request)?,
            message: response.message.clone(),
            details: Some(serde_json::to_value(&response.details)?),
            is_error: response.is_error(),
        })
    }

    /// Returns true if the record was produced by the tracker
    pub fn is_tracker(&self) -> bool {
        self.tool_name == TOOL_NAME
    }

    /// Decodes the snapshot of a tracker record
    ///
    /// Returns `None` for other tools, for records without details, and for
    /// details that do not decode as a snapshot.
    pub fn snapshot(&self) -> Option<Snapshot> {
        if !self.is_tracker() {
            return None;
        }
        let details = self.details.as_ref()?;
        match serde_json::from_value(details.clone()) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                log::debug!(target: "todo::reconstruct", "ignoring undecodable snapshot: {}", e);
                None
            }
        }
    }

    /// Decodes the request of a tracker record
    pub fn action_request(&self) -> Option<ActionRequest> {
        if !self.is_tracker() {
            return None;
        }
        serde_json::from_value(self.request.clone()).ok()
    }
}

/// What an entry holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryKind {
    /// Outcome of a tool call
    ToolResult(ActionRecord),

    /// Free text that does not touch any tool state
    Note { text: String },
}

impl EntryKind {
    pub fn record(&self) -> Option<&ActionRecord> {
        match self {
            EntryKind::ToolResult(record) => Some(record),
            EntryKind::Note { .. } => None,
        }
    }

    /// Short one-line description for logs and tree views
    pub fn describe(&self) -> String {
        match self {
            EntryKind::ToolResult(record) => {
                let first_line = record.message.lines().next().unwrap_or_default();
                format!("{}: {}", record.tool_name, first_line)
            }
            EntryKind::Note { text } => format!("note: {}", text),
        }
    }
}

/// A node in the session tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub id: EntryId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<EntryId>,

    pub timestamp: DateTime<Utc>,

    #[serde(flatten)]
    pub kind: EntryKind,
}

impl SessionEntry {
    pub fn record(&self) -> Option<&ActionRecord> {
        self.kind.record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{reduce, ActionKind, TodoState};

    fn tracker_record(request: ActionRequest) -> ActionRecord {
        let (_, response) = reduce(&TodoState::default(), &request);
        ActionRecord::tracker(&request, &response).unwrap()
    }

    #[test]
    fn tracker_record_carries_snapshot() {
        let record = tracker_record(ActionRequest::add("write docs"));

        assert!(record.is_tracker());
        assert!(!record.is_error);
        let snapshot = record.snapshot().unwrap();
        assert_eq!(snapshot.next_id, 2);
        assert_eq!(record.action_request().unwrap().text.as_deref(), Some("write docs"));
    }

    #[test]
    fn error_record_is_flagged() {
        let record = tracker_record(ActionRequest::status(ActionKind::Done, 5));
        assert!(record.is_error);
        assert_eq!(record.snapshot().unwrap().error.as_deref(), Some("Item #5 not found"));
    }

    #[test]
    fn foreign_record_has_no_snapshot() {
        let record = ActionRecord {
            tool_name: "bash".to_string(),
            request: serde_json::json!({"command": "ls"}),
            message: "ok".to_string(),
            details: Some(serde_json::json!({"items": [], "nextId": 4})),
            is_error: false,
        };
        assert!(record.snapshot().is_none());
        assert!(record.action_request().is_none());
    }

    #[test]
    fn malformed_details_are_ignored() {
        let record = ActionRecord {
            tool_name: TOOL_NAME.to_string(),
            request: serde_json::Value::Null,
            message: String::new(),
            details: Some(serde_json::json!({"unexpected": true})),
            is_error: false,
        };
        assert!(record.snapshot().is_none());
    }

    #[test]
    fn entry_serializes_flat_with_kind_tag() {
        let entry = SessionEntry {
            id: "e-0000001".parse().unwrap(),
            parent: None,
            timestamp: "2025-01-01T00:00:00Z".parse().unwrap(),
            kind: EntryKind::Note {
                text: "hello".to_string(),
            },
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["kind"], "note");
        assert_eq!(json["text"], "hello");

        let parsed: SessionEntry = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, entry);
    }
}
