//! Tracker context
//!
//! Owns the single in-memory list for one branch attachment. The reducer
//! carries state forward between actions; reconstruction only runs when the
//! branch pointer moves.

use super::reconstruct::{reconstruct, BranchEvent};
use super::record::SessionEntry;
use crate::domain::{reduce, ActionRequest, Response, TodoState};

/// One independent tracker
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    state: TodoState,
}

impl Tracker {
    /// Creates a tracker with the default empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tracker attached to a branch
    pub fn attach<'a, I>(path: I) -> Self
    where
        I: IntoIterator<Item = &'a SessionEntry>,
        I::IntoIter: DoubleEndedIterator,
    {
        let mut tracker = Self::new();
        tracker.on_branch_event(BranchEvent::SessionStart, path);
        tracker
    }

    /// Current list
    pub fn state(&self) -> &TodoState {
        &self.state
    }

    /// Runs one action and keeps the resulting state
    pub fn handle(&mut self, request: &ActionRequest) -> Response {
        let (next, response) = reduce(&self.state, request);
        self.state = next;
        response
    }

    /// Rebuilds the state after the active branch changed
    pub fn on_branch_event<'a, I>(&mut self, event: BranchEvent, path: I)
    where
        I: IntoIterator<Item = &'a SessionEntry>,
        I::IntoIter: DoubleEndedIterator,
    {
        self.state = reconstruct(path);
        log::info!(
            target: "todo::tracker",
            "rebuilt on {}: {} items, next id {}",
            event,
            self.state.items.len(),
            self.state.next_id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActionKind, TodoStatus};
    use crate::session::record::{ActionRecord, EntryKind};
    use crate::session::tree::SessionLog;

    fn act(tracker: &mut Tracker, log: &mut SessionLog, request: ActionRequest) -> Response {
        let response = tracker.handle(&request);
        let record = ActionRecord::tracker(&request, &response).unwrap();
        log.append(EntryKind::ToolResult(record));
        response
    }

    #[test]
    fn trackers_do_not_share_state() {
        let mut a = Tracker::new();
        let b = Tracker::new();

        a.handle(&ActionRequest::add("only in a"));
        assert_eq!(a.state().items.len(), 1);
        assert!(b.state().is_empty());
    }

    #[test]
    fn handle_carries_state_forward() {
        let mut tracker = Tracker::new();
        tracker.handle(&ActionRequest::add("x"));
        let response = tracker.handle(&ActionRequest::status(ActionKind::Start, 1));

        assert!(!response.is_error());
        assert_eq!(tracker.state().items[0].status, TodoStatus::InProgress);
    }

    #[test]
    fn switching_branch_reconstructs() {
        let mut log = SessionLog::new();
        let mut tracker = Tracker::attach(log.active_branch());

        act(&mut tracker, &mut log, ActionRequest::add("a"));
        let first = log.leaf().cloned().unwrap();
        act(&mut tracker, &mut log, ActionRequest::add("b"));
        assert_eq!(tracker.state().items.len(), 2);

        log.checkout(&first).unwrap();
        tracker.on_branch_event(BranchEvent::Switch, log.active_branch());
        assert_eq!(tracker.state().items.len(), 1);
        assert_eq!(tracker.state().next_id, 2);
    }

    #[test]
    fn forking_before_first_record_resets() {
        let mut log = SessionLog::new();
        let mut tracker = Tracker::new();

        act(&mut tracker, &mut log, ActionRequest::create(Some("Auth")));
        let root = log.leaf().cloned().unwrap();

        log.fork(&root).unwrap();
        tracker.on_branch_event(BranchEvent::Fork, log.active_branch());
        assert_eq!(tracker.state(), &TodoState::default());
    }

    #[test]
    fn attach_restores_from_log() {
        let mut log = SessionLog::new();
        let mut tracker = Tracker::new();
        act(&mut tracker, &mut log, ActionRequest::create(Some("Auth")));
        act(&mut tracker, &mut log, ActionRequest::add("login"));

        let reattached = Tracker::attach(log.active_branch());
        assert_eq!(reattached.state(), tracker.state());
    }
}
