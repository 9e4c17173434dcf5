//! Session history commands
//!
//! Branch switches and forks go through [`Workspace`], which rebuilds the
//! tracker from the new active branch.

use std::collections::HashSet;

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use super::workspace::Workspace;
use crate::domain::summary_line;
use crate::session::{EntryId, SessionEntry, SessionLog};

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// Show the entries of the active branch
    Log,

    /// Show the whole session tree
    Tree,

    /// List branch tips
    Tips,

    /// Switch the active branch to an entry
    Checkout {
        /// Entry ID (e-xxxxxxx)
        entry: String,
    },

    /// Start a new branch just before an entry
    Fork {
        /// Entry ID (e-xxxxxxx)
        entry: String,
    },

    /// Append a free-text note to the active branch
    Note {
        /// Note text
        text: String,
    },

    /// Rewrite the session file, dropping superseded leaf moves
    Compact,
}

pub fn run(cmd: HistoryCommands, output: &Output) -> Result<()> {
    let mut workspace = Workspace::open(output)?;

    match cmd {
        HistoryCommands::Log => show_log(output, &workspace),
        HistoryCommands::Tree => {
            workspace.refresh_for_tree();
            show_tree(output, &workspace)
        }
        HistoryCommands::Tips => show_tips(output, workspace.log()),
        HistoryCommands::Checkout { entry } => {
            let id: EntryId = entry.parse()?;
            workspace.checkout(&id)?;
            report_branch(output, &workspace, &format!("Switched to {}", id));
        }
        HistoryCommands::Fork { entry } => {
            let id: EntryId = entry.parse()?;
            let leaf = workspace.fork(&id)?;
            let from = leaf
                .map(|leaf| leaf.to_string())
                .unwrap_or_else(|| "a new root".to_string());
            let message = format!("Forked before {}, continuing from {}", id, from);
            report_branch(output, &workspace, &message);
        }
        HistoryCommands::Note { text } => {
            let id = workspace.note(&text)?;
            if output.is_json() {
                output.data(&serde_json::json!({ "id": id.to_string() }));
            } else {
                output.success(&format!("Added note {}", id));
            }
        }
        HistoryCommands::Compact => {
            let count = workspace.compact()?;
            output.verbose_ctx("compact", &format!("Rewrote {} entries", count));
            if output.is_json() {
                output.data(&serde_json::json!({ "entries": count }));
            } else {
                output.success(&format!("Compacted session log ({} entries)", count));
            }
        }
    }

    Ok(())
}

fn report_branch(output: &Output, workspace: &Workspace, message: &str) {
    let state = workspace.tracker().state();
    if output.is_json() {
        output.data(&serde_json::json!({
            "leaf": workspace.log().leaf().map(|id| id.to_string()),
            "state": state,
            "summary": summary_line(state),
        }));
    } else {
        output.success(message);
        output.line(&summary_line(state));
    }
}

fn entry_json(entry: &SessionEntry) -> serde_json::Value {
    serde_json::json!({
        "id": entry.id.to_string(),
        "parent": entry.parent.as_ref().map(|id| id.to_string()),
        "timestamp": entry.timestamp,
        "summary": entry.kind.describe(),
    })
}

fn show_log(output: &Output, workspace: &Workspace) {
    let path = workspace.log().active_branch();

    if output.is_json() {
        let items: Vec<_> = path.iter().copied().map(entry_json).collect();
        output.data(&items);
    } else if path.is_empty() {
        println!("No entries on this branch");
    } else {
        for entry in path {
            println!(
                "{}  {}  {}",
                entry.id,
                entry.timestamp.format("%Y-%m-%d %H:%M"),
                entry.kind.describe()
            );
        }
    }
}

fn show_tips(output: &Output, log: &SessionLog) {
    let tips = log.tips();
    let leaf = log.leaf();

    if output.is_json() {
        let items: Vec<_> = tips
            .iter()
            .map(|e| {
                let is_active = Some(&e.id) == leaf;
                let mut value = entry_json(e);
                value["active"] = serde_json::Value::Bool(is_active);
                value
            })
            .collect();
        output.data(&items);
    } else if tips.is_empty() {
        println!("No branches yet");
    } else {
        for tip in tips {
            let marker = if Some(&tip.id) == leaf { "*" } else { " " };
            println!("{} {}  {}", marker, tip.id, tip.kind.describe());
        }
    }
}

fn show_tree(output: &Output, workspace: &Workspace) {
    let log = workspace.log();
    let active: HashSet<&EntryId> = log.active_branch().into_iter().map(|e| &e.id).collect();

    if output.is_json() {
        let entries: Vec<_> = log
            .entries()
            .iter()
            .map(|e| {
                let mut value = entry_json(e);
                value["active"] = serde_json::Value::Bool(active.contains(&e.id));
                value
            })
            .collect();
        output.data(&serde_json::json!({
            "leaf": log.leaf().map(|id| id.to_string()),
            "entries": entries,
            "summary": summary_line(workspace.tracker().state()),
        }));
        return;
    }

    if log.is_empty() {
        println!("Empty session");
        return;
    }

    let mut lines = Vec::new();
    for root in log.roots() {
        render_subtree(log, root, &active, 0, &mut lines);
    }
    for line in lines {
        println!("{}", line);
    }
    println!();
    println!("{}", summary_line(workspace.tracker().state()));
}

fn render_subtree(
    log: &SessionLog,
    entry: &SessionEntry,
    active: &HashSet<&EntryId>,
    depth: usize,
    lines: &mut Vec<String>,
) {
    let marker = if log.leaf() == Some(&entry.id) {
        "@"
    } else if active.contains(&entry.id) {
        "*"
    } else {
        " "
    };
    lines.push(format!(
        "{}{} {}  {}",
        "  ".repeat(depth),
        marker,
        entry.id,
        entry.kind.describe()
    ));

    let children = log.children(&entry.id);
    // A single child continues the same column, forks indent
    let child_depth = if children.len() > 1 { depth + 1 } else { depth };
    for child in children {
        render_subtree(log, child, active, child_depth, lines);
    }
}
