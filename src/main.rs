//! # kb - Kanban board CLI
//!
//! A command-line front end for a kanban board with swimlanes, a project
//! registry and a roadmap.
//!
//! ## Quick Start
//!
//! ```bash
//! # Create a board with the bundled sample data
//! kb init --sample
//!
//! # Show the current project's board
//! kb board
//!
//! # Add a task and move it along
//! kb task add "Write release notes" --priority high --tag docs
//! kb task move task-7 in-progress --position 0
//!
//! # List overdue work across every project
//! kb task list --overdue --all-projects
//! ```
//!
//! The board lives in `~/.kanban/board.json` unless `--db` (or `KANBAN_DB`)
//! points elsewhere. UI preferences sit beside it in `prefs.json`.
//!
//! Set `RUST_LOG=kanban=debug` to trace store actions on stderr.

use clap::Parser;
use kanban::cli::Cli;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    // Tracing is opt-in via RUST_LOG; an unusable filter is ignored.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() || raw.len() > 4096 {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    if let Err(err) = kanban::cmd::run(cli) {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}
