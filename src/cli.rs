use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Kanban board and roadmap manager.
/// Storage defaults to ~/.kanban/board.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "kb", version, about = "Kanban board and roadmap CLI")]
pub struct Cli {
    /// Path to the board JSON file.
    #[arg(long, global = true, env = "KANBAN_DB")]
    pub db: Option<PathBuf>,

    /// Path to the UI preferences file (defaults to prefs.json beside the board).
    #[arg(long, global = true, env = "KANBAN_PREFS")]
    pub prefs: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn db_path(&self) -> PathBuf {
        self.db.clone().unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".kanban").join("board.json")
        })
    }

    pub fn prefs_path(&self) -> PathBuf {
        self.prefs.clone().unwrap_or_else(|| {
            self.db_path()
                .parent()
                .map(|dir| dir.join("prefs.json"))
                .unwrap_or_else(|| PathBuf::from("prefs.json"))
        })
    }
}
