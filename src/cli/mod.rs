//! # Command-Line Interface
//!
//! User-facing commands and output formatting. The CLI is the session log
//! owner: it loads the log, attaches a tracker to the active branch, and
//! appends each response.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project setup | `init` |
//! | Actions | Tracker actions | `create`, `add`, `batch`, `start`, `done`, `skip`, `block`, `reset`, `list`, `summary`, `clear`, `apply` |
//! | History | Branches of the session log | `history log`, `history tree`, `history checkout`, `history fork` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output; `RUST_LOG` controls library logs:
//! ```bash
//! todo-ledger --verbose history tree
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod history;
mod output;
mod todo;
mod workspace;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
