//! Kanban board and roadmap state store.
//!
//! [`db::Database`] owns projects, teams, users, columns, tasks and roadmap
//! items and keeps their cross-references consistent. Every mutating action
//! returns a `Result`; the most recent failure is also kept on the store as
//! `last_error` for callers that only poll state.
//!
//! ```no_run
//! use kanban::task::NewTask;
//!
//! let mut db = kanban::seed::sample()?;
//! let task = db.create_task(NewTask { title: "Triage inbox".into(), ..Default::default() });
//! db.move_task(&task.id, "todo", Some(0))?;
//! db.save(std::path::Path::new("board.json"))?;
//! # Ok::<(), kanban::error::Error>(())
//! ```

pub mod assign;
pub mod cli;
pub mod cmd;
pub mod column;
pub mod db;
pub mod error;
pub mod fields;
pub mod filter;
pub mod format;
pub mod id;
pub mod movement;
pub mod prefs;
pub mod project;
pub mod roadmap;
pub mod seed;
pub mod task;
