//! Main CLI application structure

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::history::{self, HistoryCommands};
use super::output::{Output, OutputFormat};
use super::todo;
use crate::domain::{ActionKind, ActionRequest};
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "todo-ledger")]
#[command(author, version, about = "Branch-aware todo tracking rebuilt from a session log")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Start a new list, discarding current items
    Create {
        /// List name
        name: Option<String>,
    },

    /// Add one item
    Add {
        /// Item text
        text: String,

        /// Display group
        #[arg(long, short)]
        group: Option<String>,
    },

    /// Add several items at once (all or nothing)
    Batch {
        /// Item texts, in order
        texts: Vec<String>,

        /// Display group for every item
        #[arg(long, short)]
        group: Option<String>,

        /// Raw items as JSON: [{"text": "...", "group": "..."}]
        #[arg(long, conflicts_with_all = ["texts", "group"])]
        json: Option<String>,
    },

    /// Mark an item as in progress
    Start {
        /// Item ID
        id: u64,
    },

    /// Mark an item as done
    Done {
        /// Item ID
        id: u64,
    },

    /// Mark an item as skipped
    Skip {
        /// Item ID
        id: u64,

        /// Why it was skipped
        #[arg(long, short)]
        reason: Option<String>,
    },

    /// Mark an item as blocked
    Block {
        /// Item ID
        id: u64,

        /// What it is waiting on
        #[arg(long, short)]
        reason: Option<String>,
    },

    /// Put an item back to pending
    Reset {
        /// Item ID
        id: u64,
    },

    /// Show all items with a summary
    List {
        /// Group items by their label
        #[arg(long)]
        grouped: bool,
    },

    /// Show the status counts only
    Summary,

    /// Remove all items, keeping ids and the list name
    Clear,

    /// Apply a raw action request given as JSON
    Apply {
        /// Request, e.g. '{"action":"add","text":"write docs"}'
        request: String,
    },

    /// Inspect and switch branches of the session history
    #[command(subcommand)]
    History(HistoryCommands),
}

/// Main entry point for the CLI
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let format = match cli.format {
        Some(format) => format,
        None => Config::load()?.global.default_format,
    };
    let output = Output::new(format, cli.verbose);

    output.verbose("todo-ledger starting");

    let code = match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing project at: {}", path));
            let project = Project::init(&path)?;
            output.verbose_ctx(
                "init",
                &format!("Created .todo directory at: {}", project.todo_dir().display()),
            );
            output.success(&format!(
                "Initialized todo-ledger project at {}",
                project.root().display()
            ));
            ExitCode::SUCCESS
        }

        Commands::History(cmd) => {
            history::run(cmd, &output)?;
            ExitCode::SUCCESS
        }

        Commands::List { grouped } => {
            todo::run(&output, ActionRequest::new(ActionKind::List), grouped)?
        }

        command => todo::run(&output, action_request(command)?, false)?,
    };

    output.verbose("Command completed");
    Ok(code)
}

/// Maps an action command to its request
fn action_request(command: Commands) -> Result<ActionRequest> {
    let request = match command {
        Commands::Create { name } => ActionRequest::create(name.as_deref()),
        Commands::Add { text, group } => {
            let request = ActionRequest::add(text);
            match group {
                Some(group) => request.with_group(group),
                None => request,
            }
        }
        Commands::Batch { texts, group, json } => {
            todo::batch_request(texts, group, json.as_deref())?
        }
        Commands::Start { id } => ActionRequest::status(ActionKind::Start, id),
        Commands::Done { id } => ActionRequest::status(ActionKind::Done, id),
        Commands::Skip { id, reason } => ActionRequest {
            reason,
            ..ActionRequest::status(ActionKind::Skip, id)
        },
        Commands::Block { id, reason } => ActionRequest {
            reason,
            ..ActionRequest::status(ActionKind::Block, id)
        },
        Commands::Reset { id } => ActionRequest::status(ActionKind::Reset, id),
        Commands::List { .. } => ActionRequest::new(ActionKind::List),
        Commands::Summary => ActionRequest::new(ActionKind::Summary),
        Commands::Clear => ActionRequest::new(ActionKind::Clear),
        Commands::Apply { request } => todo::parse_request(&request)?,
        Commands::Init { .. } | Commands::History(_) => {
            anyhow::bail!("not an action command")
        }
    };
    Ok(request)
}

/// Installs the `log` backend; `RUST_LOG` overrides the default filter
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
