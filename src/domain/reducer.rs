//! Reducer: `(state, request) -> (state, response)`
//!
//! Every action is total. Failures come back as a response carrying an
//! `error` and the unchanged prior state, never as a panic.

use serde::{Deserialize, Serialize};

use super::action::{ActionKind, ActionRequest, BatchEntry};
use super::error::TodoError;
use super::item::{TodoItem, TodoState, TodoStatus};
use super::summary::{listing, summary_line};

/// Machine-readable outcome of one action
///
/// This is what the log owner stores, and what reconstruction reads back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub action: String,
    pub items: Vec<TodoItem>,
    pub next_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Snapshot {
    fn of(action: &str, state: &TodoState, error: Option<String>) -> Self {
        Self {
            action: action.to_string(),
            items: state.items.clone(),
            next_id: state.next_id,
            list_name: state.list_name.clone(),
            error,
        }
    }

    /// Returns the list state carried by this snapshot
    pub fn state(&self) -> TodoState {
        TodoState {
            items: self.items.clone(),
            next_id: self.next_id,
            list_name: self.list_name.clone(),
        }
    }

    /// Returns true if the action failed
    pub fn is_error(&self) -> bool {
        self.error.as_deref().is_some_and(|e| !e.is_empty())
    }
}

/// Human-readable line plus snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub message: String,
    pub details: Snapshot,
}

impl Response {
    pub fn is_error(&self) -> bool {
        self.details.is_error()
    }
}

/// Applies one request to a state
pub fn reduce(state: &TodoState, request: &ActionRequest) -> (TodoState, Response) {
    match apply(state, request) {
        Ok((next, message)) => {
            let details = Snapshot::of(&request.action, &next, None);
            (next, Response { message, details })
        }
        Err(err) => {
            log::debug!(target: "todo::reducer", "{} rejected: {}", request.action, err);
            let message = format!("Error: {}", err);
            let details = Snapshot::of(&request.action, state, Some(err.to_string()));
            (state.clone(), Response { message, details })
        }
    }
}

/// Folds a sequence of requests over the default state
///
/// This is the reference full replay that snapshot-based reconstruction
/// must agree with.
pub fn replay<'a>(requests: impl IntoIterator<Item = &'a ActionRequest>) -> TodoState {
    requests
        .into_iter()
        .fold(TodoState::default(), |state, request| reduce(&state, request).0)
}

fn apply(state: &TodoState, request: &ActionRequest) -> Result<(TodoState, String), TodoError> {
    let kind = request.kind()?;

    match kind {
        ActionKind::Create => {
            let name = non_blank(request.name.as_deref());
            let next = TodoState::named(name.clone());
            let message = match name {
                Some(name) => format!("Created list: {}", name),
                None => "Created list".to_string(),
            };
            Ok((next, message))
        }

        ActionKind::Add => {
            let text = non_blank(request.text.as_deref())
                .ok_or_else(|| TodoError::missing("text", kind.as_str()))?;
            let mut next = state.clone();
            let id = next.push(text.clone(), non_blank(request.group.as_deref()));
            Ok((next, format!("Added #{}: {}", id, text)))
        }

        ActionKind::Batch => {
            let entries = validate_batch(request.items.as_deref())?;
            let mut next = state.clone();
            let first = next.next_id;
            for entry in entries {
                next.push(entry.text.clone(), non_blank(entry.group.as_deref()));
            }
            let last = next.next_id - 1;
            Ok((
                next,
                format!("Added {} items (#{}-#{})", entries.len(), first, last),
            ))
        }

        ActionKind::Start
        | ActionKind::Done
        | ActionKind::Skip
        | ActionKind::Block
        | ActionKind::Reset => {
            let id = request.id.ok_or_else(|| TodoError::missing("id", kind.as_str()))?;
            let mut next = state.clone();
            let item = next.get_mut(id).ok_or(TodoError::NotFound(id))?;

            let status = kind.target_status().unwrap_or_default();
            set_status(item, status, request.reason.clone());

            let message = match &item.reason {
                Some(reason) => format!("#{} {} ({}): {}", id, status, reason, item.text),
                None => format!("#{} {}: {}", id, status, item.text),
            };
            Ok((next, message))
        }

        ActionKind::List => Ok((state.clone(), listing(state))),

        ActionKind::Summary => Ok((state.clone(), summary_line(state))),

        ActionKind::Clear => {
            let mut next = state.clone();
            let cleared = next.items.len();
            next.items.clear();
            Ok((next, format!("Cleared {} items", cleared)))
        }
    }
}

/// Applies a status change and logs any reason it discards
///
/// Returns the discarded reason.
fn set_status(item: &mut TodoItem, status: TodoStatus, reason: Option<String>) -> Option<String> {
    let dropped = item.transition(status, reason)?;
    log::debug!(
        target: "todo::reducer",
        "#{} -> {} dropped reason '{}'",
        item.id,
        status,
        dropped
    );
    Some(dropped)
}

fn validate_batch(items: Option<&[BatchEntry]>) -> Result<&[BatchEntry], TodoError> {
    let items = match items {
        Some(items) if !items.is_empty() => items,
        _ => return Err(TodoError::missing("items", ActionKind::Batch.as_str())),
    };

    if let Some(pos) = items.iter().position(|e| e.text.trim().is_empty()) {
        return Err(TodoError::Validation(format!(
            "items[{}].text must not be empty",
            pos
        )));
    }

    Ok(items)
}

/// Returns the value unchanged unless it is missing or only whitespace
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(requests: &[ActionRequest]) -> (TodoState, Response) {
        let mut state = TodoState::default();
        let mut last = None;
        for request in requests {
            let (next, response) = reduce(&state, request);
            state = next;
            last = Some(response);
        }
        (state, last.expect("at least one request"))
    }

    #[test]
    fn scenario_create_add_start_done() {
        let (state, _) = run(&[
            ActionRequest::create(Some("Auth")),
            ActionRequest::add("write login test"),
            ActionRequest::status(ActionKind::Start, 1),
            ActionRequest::status(ActionKind::Done, 1),
        ]);

        assert_eq!(state.list_name.as_deref(), Some("Auth"));
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].id, 1);
        assert_eq!(state.items[0].text, "write login test");
        assert_eq!(state.items[0].status, TodoStatus::Done);

        let (_, response) = reduce(&state, &ActionRequest::new(ActionKind::Summary));
        assert_eq!(response.message, "1 items: 1 done");
    }

    #[test]
    fn scenario_batch_on_fresh_state() {
        let (state, response) = run(&[ActionRequest::batch(vec![
            BatchEntry::new("a"),
            BatchEntry::new("b"),
        ])]);

        let ids: Vec<u64> = state.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(state.next_id, 3);
        assert_eq!(response.message, "Added 2 items (#1-#2)");
    }

    #[test]
    fn scenario_done_on_missing_id() {
        let (before, _) = run(&[ActionRequest::add("only")]);
        let (after, response) = reduce(&before, &ActionRequest::status(ActionKind::Done, 99));

        assert!(response.is_error());
        assert_eq!(response.details.error.as_deref(), Some("Item #99 not found"));
        assert_eq!(after, before);
        assert_eq!(response.details.state(), before);
    }

    #[test]
    fn scenario_skip_then_reset_clears_reason() {
        let (state, _) = run(&[
            ActionRequest::add("e2e suite"),
            ActionRequest::status(ActionKind::Skip, 1).with_reason("flaky env"),
            ActionRequest::status(ActionKind::Reset, 1),
        ]);

        assert_eq!(state.items[0].status, TodoStatus::Pending);
        assert!(state.items[0].reason.is_none());
    }

    #[test]
    fn done_after_block_drops_reason() {
        let (state, _) = run(&[
            ActionRequest::add("deploy"),
            ActionRequest::status(ActionKind::Block, 1).with_reason("waiting on ops"),
            ActionRequest::status(ActionKind::Done, 1),
        ]);

        assert_eq!(state.items[0].status, TodoStatus::Done);
        assert!(state.items[0].reason.is_none());
    }

    #[test]
    fn status_change_reports_dropped_reason() {
        let (mut state, _) = run(&[
            ActionRequest::add("deploy"),
            ActionRequest::status(ActionKind::Block, 1).with_reason("waiting on ops"),
        ]);
        let item = state.get_mut(1).unwrap();

        let dropped = set_status(item, TodoStatus::Done, None);
        assert_eq!(dropped.as_deref(), Some("waiting on ops"));

        assert_eq!(set_status(item, TodoStatus::Skipped, Some("later".to_string())), None);
        let dropped = set_status(item, TodoStatus::Blocked, Some("ci red".to_string()));
        assert_eq!(dropped.as_deref(), Some("later"));
        assert_eq!(item.reason.as_deref(), Some("ci red"));
    }

    #[test]
    fn direct_jump_from_pending_to_done_is_allowed() {
        let (state, response) = run(&[
            ActionRequest::add("x"),
            ActionRequest::status(ActionKind::Done, 1),
        ]);
        assert!(!response.is_error());
        assert_eq!(state.items[0].status, TodoStatus::Done);
    }

    #[test]
    fn add_requires_text() {
        let state = TodoState::default();
        for text in [None, Some(""), Some("   ")] {
            let request = ActionRequest {
                text: text.map(str::to_string),
                ..ActionRequest::new(ActionKind::Add)
            };
            let (after, response) = reduce(&state, &request);
            assert_eq!(response.details.error.as_deref(), Some("text required for add"));
            assert_eq!(after, state);
        }
    }

    #[test]
    fn add_stores_text_as_given() {
        let (state, response) = run(&[ActionRequest::add("  padded  ").with_group(" ui ")]);

        assert_eq!(state.items[0].text, "  padded  ");
        assert_eq!(state.items[0].group.as_deref(), Some(" ui "));
        assert_eq!(response.message, "Added #1:   padded  ");
    }

    #[test]
    fn add_keeps_group() {
        let (state, response) = run(&[ActionRequest::add("login form").with_group("ui")]);
        assert_eq!(state.items[0].group.as_deref(), Some("ui"));
        assert_eq!(response.message, "Added #1: login form");
    }

    #[test]
    fn empty_batch_adds_nothing() {
        let (before, _) = run(&[ActionRequest::add("keep")]);

        for items in [None, Some(vec![])] {
            let request = ActionRequest {
                items,
                ..ActionRequest::new(ActionKind::Batch)
            };
            let (after, response) = reduce(&before, &request);
            assert!(response.is_error());
            assert_eq!(after.next_id, 2);
            assert_eq!(after, before);
        }
    }

    #[test]
    fn batch_with_blank_entry_is_all_or_nothing() {
        let state = TodoState::default();
        let request = ActionRequest::batch(vec![BatchEntry::new("ok"), BatchEntry::new(" ")]);
        let (after, response) = reduce(&state, &request);

        assert_eq!(
            response.details.error.as_deref(),
            Some("items[1].text must not be empty")
        );
        assert!(after.is_empty());
        assert_eq!(after.next_id, 1);
    }

    #[test]
    fn status_action_requires_id() {
        let (before, _) = run(&[ActionRequest::add("x")]);
        let (after, response) = reduce(&before, &ActionRequest::new(ActionKind::Start));

        assert_eq!(response.details.error.as_deref(), Some("id required for start"));
        assert_eq!(after, before);
    }

    #[test]
    fn clear_keeps_next_id_and_name() {
        let (state, response) = run(&[
            ActionRequest::create(Some("Sprint")),
            ActionRequest::add("a"),
            ActionRequest::add("b"),
            ActionRequest::new(ActionKind::Clear),
        ]);

        assert!(state.is_empty());
        assert_eq!(state.next_id, 3);
        assert_eq!(state.list_name.as_deref(), Some("Sprint"));
        assert_eq!(response.message, "Cleared 2 items");

        let (state, _) = reduce(&state, &ActionRequest::add("c"));
        assert_eq!(state.items[0].id, 3);
    }

    #[test]
    fn create_resets_ids_and_items() {
        let (state, _) = run(&[
            ActionRequest::add("a"),
            ActionRequest::add("b"),
            ActionRequest::create(None),
        ]);

        assert_eq!(state, TodoState::default());
    }

    #[test]
    fn read_only_actions_do_not_change_state() {
        let (before, _) = run(&[ActionRequest::add("a")]);

        let (after, response) = reduce(&before, &ActionRequest::new(ActionKind::List));
        assert_eq!(after, before);
        assert!(response.message.ends_with("1 items: 1 pending"));
        assert_eq!(response.details.items, before.items);

        let (after, response) = reduce(&before, &ActionRequest::new(ActionKind::Summary));
        assert_eq!(after, before);
        assert_eq!(response.message, "1 items: 1 pending");
    }

    #[test]
    fn unknown_action_is_reported_not_thrown() {
        let (before, _) = run(&[ActionRequest::add("a")]);
        let request = ActionRequest {
            action: "archive".to_string(),
            ..ActionRequest::default()
        };
        let (after, response) = reduce(&before, &request);

        assert_eq!(response.details.error.as_deref(), Some("Unknown action: archive"));
        assert_eq!(response.details.action, "archive");
        assert_eq!(after, before);
    }

    #[test]
    fn missing_action_is_reported_not_thrown() {
        let (before, _) = run(&[ActionRequest::add("a")]);
        let request: ActionRequest = serde_json::from_str(r#"{"text":"b"}"#).unwrap();
        let (after, response) = reduce(&before, &request);

        assert_eq!(response.details.error.as_deref(), Some("Unknown action: "));
        assert!(response.is_error());
        assert_eq!(after, before);
    }

    #[test]
    fn replay_matches_step_by_step_application() {
        let requests = vec![
            ActionRequest::create(Some("Auth")),
            ActionRequest::batch(vec![BatchEntry::new("a"), BatchEntry::grouped("b", "api")]),
            ActionRequest::status(ActionKind::Block, 2).with_reason("schema"),
            ActionRequest::status(ActionKind::Done, 7),
        ];

        let (stepped, _) = run(&requests);
        assert_eq!(replay(&requests), stepped);
    }
}
