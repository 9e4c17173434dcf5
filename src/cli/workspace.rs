//! Attached session for one CLI invocation
//!
//! Loads the session log, rebuilds the tracker for the active branch, and
//! appends every response back to the log. This is the log owner; the
//! tracker itself never touches the file.

use anyhow::{Context, Result};

use super::output::Output;
use crate::domain::{ActionRequest, Response};
use crate::session::{ActionRecord, BranchEvent, EntryId, EntryKind, SessionLog, Tracker};
use crate::storage::{Project, SessionStore};

pub struct Workspace {
    project: Project,
    store: SessionStore,
    log: SessionLog,
    tracker: Tracker,
}

impl Workspace {
    /// Opens the current project and attaches to its active branch
    pub fn open(output: &Output) -> Result<Self> {
        let project = Project::open_current()?;
        let store = project.session_store()?;
        output.verbose_ctx("session", &format!("Loading {}", store.path().display()));

        let log = store.load()?;
        let tracker = Tracker::attach(log.active_branch());
        output.verbose_ctx(
            "session",
            &format!(
                "Attached at {} ({} entries, {} items)",
                log.leaf().map(|id| id.to_string()).unwrap_or_else(|| "<root>".to_string()),
                log.len(),
                tracker.state().len()
            ),
        );

        Ok(Self {
            project,
            store,
            log,
            tracker,
        })
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Runs an action and appends its outcome to the log
    pub fn apply(&mut self, request: &ActionRequest) -> Result<Response> {
        let response = self.tracker.handle(request);
        let record = ActionRecord::tracker(request, &response)
            .context("Failed to encode action record")?;
        self.append(EntryKind::ToolResult(record))?;
        Ok(response)
    }

    /// Appends an entry that does not belong to the tracker
    pub fn note(&mut self, text: &str) -> Result<EntryId> {
        self.append(EntryKind::Note {
            text: text.to_string(),
        })
    }

    fn append(&mut self, kind: EntryKind) -> Result<EntryId> {
        let entry = self.log.append(kind);
        self.store.append_entry(entry)?;
        Ok(entry.id.clone())
    }

    /// Switches the active branch to an existing entry
    pub fn checkout(&mut self, id: &EntryId) -> Result<()> {
        self.log.checkout(id)?;
        self.store.set_leaf(Some(id))?;
        self.tracker
            .on_branch_event(BranchEvent::Switch, self.log.active_branch());
        Ok(())
    }

    /// Starts a new branch just before `id`
    pub fn fork(&mut self, id: &EntryId) -> Result<Option<EntryId>> {
        let leaf = self.log.fork(id)?.cloned();
        self.store.set_leaf(leaf.as_ref())?;
        self.tracker
            .on_branch_event(BranchEvent::Fork, self.log.active_branch());
        Ok(leaf)
    }

    /// Rebuilds the tracker before showing the full tree
    pub fn refresh_for_tree(&mut self) {
        self.tracker
            .on_branch_event(BranchEvent::Tree, self.log.active_branch());
    }

    /// Rewrites the session file without redundant leaf lines
    pub fn compact(&self) -> Result<usize> {
        self.store.compact(&self.log)
    }
}
