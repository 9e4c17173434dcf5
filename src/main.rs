//! todo-ledger - branch-aware todo tracking

use std::process::ExitCode;

fn main() -> ExitCode {
    match todo_ledger::cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
