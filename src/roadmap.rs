//! Roadmap items and their links to tasks.
//!
//! Items hold the ids of the tasks they cover; tasks keep no back-reference.
//! Deleting a task unlinks it from every item, deleting an item touches no task.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::column::DONE_COLUMN;
use crate::db::Database;
use crate::error::{EntityKind, Error, Result};
use crate::fields::RoadmapStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub project_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: RoadmapStatus,
    /// Percent complete, 0..=100.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub task_ids: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewRoadmapItem {
    pub id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub project_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<RoadmapStatus>,
    pub progress: Option<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct RoadmapPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub project_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<RoadmapStatus>,
    pub progress: Option<u8>,
}

impl Database {
    pub fn roadmap_item(&self, item_id: &str) -> Option<&RoadmapItem> {
        self.roadmap_items.iter().find(|i| i.id == item_id)
    }

    fn roadmap_item_mut(&mut self, item_id: &str) -> Result<&mut RoadmapItem> {
        self.roadmap_items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| Error::not_found(EntityKind::RoadmapItem, item_id))
    }

    pub fn create_roadmap_item(&mut self, new: NewRoadmapItem) -> RoadmapItem {
        let now = Utc::now();
        let today = Local::now().date_naive();
        let items = &self.roadmap_items;
        let id = self
            .ids
            .claim(new.id, "roadmap", |c| items.iter().any(|i| i.id == c));
        let item = RoadmapItem {
            id,
            title: new.title,
            description: new.description.unwrap_or_default(),
            project_id: new.project_id.unwrap_or_default(),
            start_date: new.start_date.unwrap_or(today),
            end_date: new.end_date.unwrap_or(today),
            status: new.status.unwrap_or_default(),
            progress: new.progress.unwrap_or(0).min(100),
            task_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        debug!(roadmap_item = %item.id, "created roadmap item");
        self.roadmap_items.push(item.clone());
        item
    }

    /// Merge a patch. Any status may follow any other; progress is clamped to 100.
    pub fn update_roadmap_item(&mut self, item_id: &str, patch: RoadmapPatch) -> Result<RoadmapItem> {
        let result = self.roadmap_item_mut(item_id).map(|item| {
            if let Some(title) = patch.title {
                item.title = title;
            }
            if let Some(description) = patch.description {
                item.description = description;
            }
            if let Some(project_id) = patch.project_id {
                item.project_id = project_id;
            }
            if let Some(start) = patch.start_date {
                item.start_date = start;
            }
            if let Some(end) = patch.end_date {
                item.end_date = end;
            }
            if let Some(status) = patch.status {
                item.status = status;
            }
            if let Some(progress) = patch.progress {
                item.progress = progress.min(100);
            }
            item.updated_at = Utc::now();
            item.clone()
        });
        self.record_outcome(result)
    }

    /// Returns `false` when no such item exists.
    pub fn delete_roadmap_item(&mut self, item_id: &str) -> bool {
        let before = self.roadmap_items.len();
        self.roadmap_items.retain(|i| i.id != item_id);
        let removed = self.roadmap_items.len() != before;
        debug!(roadmap_item = item_id, removed, "delete roadmap item");
        removed
    }

    /// Link a task to an item. Linking twice keeps a single entry.
    pub fn link_task_to_roadmap(&mut self, item_id: &str, task_id: &str) -> Result<RoadmapItem> {
        let result = self.link_inner(item_id, task_id);
        self.record_outcome(result)
    }

    fn link_inner(&mut self, item_id: &str, task_id: &str) -> Result<RoadmapItem> {
        self.require_task(task_id)?;
        let item = self.roadmap_item_mut(item_id)?;
        if !item.task_ids.iter().any(|t| t == task_id) {
            item.task_ids.push(task_id.to_string());
            item.updated_at = Utc::now();
            debug!(roadmap_item = item_id, task = task_id, "linked task");
        }
        Ok(item.clone())
    }

    /// Unlink a task from an item. Unlinking an absent task is a no-op.
    pub fn unlink_task_from_roadmap(&mut self, item_id: &str, task_id: &str) -> Result<RoadmapItem> {
        let result = self.roadmap_item_mut(item_id).map(|item| {
            if let Some(at) = item.task_ids.iter().position(|t| t == task_id) {
                item.task_ids.remove(at);
                item.updated_at = Utc::now();
                debug!(roadmap_item = item_id, task = task_id, "unlinked task");
            }
            item.clone()
        });
        self.record_outcome(result)
    }

    /// Drop a task id from every item that references it.
    pub(crate) fn unlink_task_everywhere(&mut self, task_id: &str) {
        let now = Utc::now();
        for item in self.roadmap_items.iter_mut() {
            if let Some(at) = item.task_ids.iter().position(|t| t == task_id) {
                item.task_ids.remove(at);
                item.updated_at = now;
            }
        }
    }

    /// Share of an item's linked tasks sitting in the done column, in percent.
    /// An item with no linked tasks reports its stored progress.
    pub fn roadmap_completion(&self, item_id: &str) -> Result<u8> {
        let item = self
            .roadmap_item(item_id)
            .ok_or_else(|| Error::not_found(EntityKind::RoadmapItem, item_id))?;
        if item.task_ids.is_empty() {
            return Ok(item.progress);
        }
        let done = item
            .task_ids
            .iter()
            .filter_map(|id| self.task(id))
            .filter(|t| t.column_id == DONE_COLUMN)
            .count();
        Ok((done * 100 / item.task_ids.len()) as u8)
    }
}
