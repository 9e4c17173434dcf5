//! Todo action commands

use std::process::ExitCode;

use anyhow::{Context, Result};

use super::output::Output;
use super::workspace::Workspace;
use crate::domain::{
    item_line, summary_line, ActionKind, ActionRequest, BatchEntry, Response, TodoItem, TodoState,
};

/// Builds the `batch` request from CLI arguments
///
/// `--json` takes the raw boundary form; otherwise every positional text
/// becomes one entry sharing the optional group.
pub fn batch_request(
    texts: Vec<String>,
    group: Option<String>,
    json: Option<&str>,
) -> Result<ActionRequest> {
    let items = match json {
        Some(json) => serde_json::from_str::<Vec<BatchEntry>>(json)
            .context("Failed to parse --json as [{\"text\": ..., \"group\": ...}]")?,
        None => texts
            .into_iter()
            .map(|text| BatchEntry {
                text,
                group: group.clone(),
            })
            .collect(),
    };
    Ok(ActionRequest::batch(items))
}

/// Parses a raw action request
pub fn parse_request(json: &str) -> Result<ActionRequest> {
    serde_json::from_str(json).context("Failed to parse action request JSON")
}

/// Runs one action against the active branch and prints the response
pub fn run(output: &Output, mut request: ActionRequest, grouped: bool) -> Result<ExitCode> {
    let mut workspace = Workspace::open(output)?;

    if request.action == ActionKind::Create.as_str() && request.name.is_none() {
        request.name = workspace.project().config().project.list_name.clone();
    }

    output.verbose_ctx("action", &format!("Applying {}", request.action));
    let response = workspace.apply(&request)?;

    print_response(output, &response, grouped);

    if response.is_error() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn print_response(output: &Output, response: &Response, grouped: bool) {
    if output.is_json() {
        output.data(response);
        return;
    }

    if let Some(error) = &response.details.error {
        output.error(error);
        return;
    }

    if grouped {
        print_grouped(output, &response.details.items);
        output.line(&summary_line(&response.details.state()));
    } else {
        output.success(&response.message);
    }
}

fn print_grouped(output: &Output, items: &[TodoItem]) {
    let state = TodoState {
        items: items.to_vec(),
        ..TodoState::default()
    };

    for (group, members) in state.grouped() {
        output.line(&format!("{}:", group.unwrap_or("(ungrouped)")));
        for item in members {
            output.line(&format!("  {}", item_line(item)));
        }
    }
}
