//! Error types for the board store.
//!
//! Exit codes used by the `kb` binary:
//! - 0: Success
//! - 2: User error (unknown id, rejected input)
//! - 4: Operation failed (file or JSON error)

use std::fmt;

use thiserror::Error;

/// Exit codes for the `kb` CLI.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// The kinds of record the store owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Task,
    Column,
    RoadmapItem,
    Project,
    Team,
    User,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Task => "Task",
            EntityKind::Column => "Column",
            EntityKind::RoadmapItem => "Roadmap item",
            EntityKind::Project => "Project",
            EntityKind::Team => "Team",
            EntityKind::User => "User",
        };
        f.write_str(name)
    }
}

/// Main error type for store operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::NotFound { .. } | Error::Validation(_) => exit_codes::USER_ERROR,
            Error::Io(_) | Error::Json(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;
