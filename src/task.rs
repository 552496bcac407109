//! Task data structure and related functionality.
//!
//! This module defines the core `Task` struct that represents a single card on
//! the board, the `NewTask` input merged over defaults at creation, and the
//! typed `TaskPatch` used for partial updates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::*;

/// Column new tasks land in when the caller names none.
pub const DEFAULT_COLUMN: &str = "backlog";

/// A card on the kanban board.
///
/// `position` orders the task inside its (project, column) sequence. The
/// legacy `assignee_id` always mirrors the first entry of `assignee_ids`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default = "default_column")]
    pub column_id: String,
    #[serde(default)]
    pub swimlane: Swimlane,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, alias = "order")]
    pub position: usize,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub assignee_ids: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub comments_count: usize,
    #[serde(default)]
    pub attachments_count: usize,
    #[serde(default)]
    pub subtasks_count: usize,
    #[serde(default)]
    pub completed_subtasks: usize,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_column() -> String {
    DEFAULT_COLUMN.to_string()
}

/// A comment left on a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub author_id: Option<String>,
    pub body: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new task. Anything left `None` takes the default.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub project_id: Option<String>,
    pub column_id: Option<String>,
    pub swimlane: Option<Swimlane>,
    pub priority: Option<Priority>,
    pub position: Option<usize>,
    pub assignee_id: Option<String>,
    pub assignee_ids: Vec<String>,
    pub tags: Vec<String>,
    pub due_date: Option<NaiveDate>,
}

impl Task {
    /// Build a task from `new` over the defaults. The position is provisional;
    /// the store places the task in its column sequence.
    pub fn from_new(id: String, new: NewTask, now: DateTime<Utc>) -> Self {
        let mut assignees = new.assignee_ids;
        if let Some(legacy) = new.assignee_id {
            if !assignees.contains(&legacy) {
                assignees.insert(0, legacy);
            }
        }
        let mut task = Task {
            id,
            title: new.title,
            description: new.description.unwrap_or_default(),
            project_id: new.project_id.unwrap_or_default(),
            column_id: new.column_id.unwrap_or_else(default_column),
            swimlane: new.swimlane.unwrap_or_default(),
            priority: new.priority.unwrap_or_default(),
            position: 0,
            assignee_id: None,
            assignee_ids: Vec::new(),
            tags: new.tags,
            due_date: new.due_date,
            comments: Vec::new(),
            comments_count: 0,
            attachments_count: 0,
            subtasks_count: 0,
            completed_subtasks: 0,
            created_at: now,
            updated_at: now,
        };
        task.replace_assignees(assignees);
        task
    }

    /// Replace the assignee list, dropping repeats, and re-derive the legacy field.
    pub fn replace_assignees(&mut self, user_ids: Vec<String>) {
        let mut unique: Vec<String> = Vec::with_capacity(user_ids.len());
        for user in user_ids {
            if !unique.contains(&user) {
                unique.push(user);
            }
        }
        self.assignee_ids = unique;
        self.sync_legacy_assignee();
    }

    /// Point the legacy single-assignee field at the head of the list.
    pub fn sync_legacy_assignee(&mut self) {
        self.assignee_id = self.assignee_ids.first().cloned();
    }

    /// All users on the task, honouring records that only carry the legacy field.
    pub fn assignees(&self) -> Vec<&str> {
        if self.assignee_ids.is_empty() {
            self.assignee_id.as_deref().into_iter().collect()
        } else {
            self.assignee_ids.iter().map(String::as_str).collect()
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Typed partial update for a task.
///
/// Double options distinguish "leave alone" (`None`) from "clear" (`Some(None)`).
/// Column, position and project changes are applied by the movement coordinator;
/// assignee changes by the assignment manager.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub project_id: Option<String>,
    pub column_id: Option<String>,
    pub position: Option<usize>,
    pub swimlane: Option<Swimlane>,
    pub priority: Option<Priority>,
    pub assignee_id: Option<Option<String>>,
    pub assignee_ids: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub attachments_count: Option<usize>,
    pub subtasks_count: Option<usize>,
    pub completed_subtasks: Option<usize>,
}

impl TaskPatch {
    /// Whether the patch changes where the task sits on the board.
    pub fn relocates(&self) -> bool {
        self.project_id.is_some() || self.column_id.is_some() || self.position.is_some()
    }

    /// Copy the plain descriptive fields onto `task`.
    pub(crate) fn apply_fields(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(swimlane) = self.swimlane {
            task.swimlane = swimlane;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(tags) = &self.tags {
            task.tags = tags.clone();
        }
        if let Some(due) = self.due_date {
            task.due_date = due;
        }
        if let Some(n) = self.attachments_count {
            task.attachments_count = n;
        }
        if let Some(n) = self.subtasks_count {
            task.subtasks_count = n;
        }
        if let Some(n) = self.completed_subtasks {
            task.completed_subtasks = n.min(task.subtasks_count);
        }
    }
}
