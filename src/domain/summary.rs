//! Derived summary line
//!
//! Format: `"<total> items: <n> done, <n> in progress, <n> pending, <n> blocked, <n> skipped"`.
//! Statuses always appear in that order and zero counts are left out, so the
//! line does not depend on item insertion order.

use super::item::{TodoItem, TodoState, TodoStatus};

/// Renders the summary line for a list
pub fn summary_line(state: &TodoState) -> String {
    let counts: Vec<String> = TodoStatus::SUMMARY_ORDER
        .iter()
        .filter_map(|status| match state.count(*status) {
            0 => None,
            n => Some(format!("{} {}", n, status.label())),
        })
        .collect();

    if counts.is_empty() {
        format!("{} items", state.len())
    } else {
        format!("{} items: {}", state.len(), counts.join(", "))
    }
}

/// Renders one item as a single line
pub fn item_line(item: &TodoItem) -> String {
    let mut line = format!("#{} [{}] {}", item.id, item.status, item.text);
    if let Some(reason) = &item.reason {
        line.push_str(&format!(" ({})", reason));
    }
    line
}

/// Renders the full listing: header, one line per item, then the summary
pub fn listing(state: &TodoState) -> String {
    let mut lines = Vec::with_capacity(state.len() + 2);
    if let Some(name) = &state.list_name {
        lines.push(format!("{}:", name));
    }
    lines.extend(state.items.iter().map(item_line));
    lines.push(summary_line(state));
    lines.join("\n")
}
