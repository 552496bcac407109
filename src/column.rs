//! Kanban columns.
//!
//! Columns are shared by every project's board. Their `order` values always
//! form the contiguous sequence `0..n`, left to right.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::Database;
use crate::error::{EntityKind, Error, Result};

/// Column whose tasks count as finished.
pub const DONE_COLUMN: &str = "done";
/// Column whose tasks were abandoned.
pub const CANCELLED_COLUMN: &str = "cancelled";

/// Whether tasks in `column_id` are no longer pending.
pub fn is_closed_column(column_id: &str) -> bool {
    column_id == DONE_COLUMN || column_id == CANCELLED_COLUMN
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub order: usize,
    #[serde(default)]
    pub collapsed: bool,
    /// Whether tasks may be moved in from other columns.
    #[serde(default = "default_true")]
    pub allow_drop: bool,
    /// Incoming tasks are slotted by priority rather than at the requested position.
    #[serde(default)]
    pub auto_sort: bool,
    /// Work-in-progress cap per project.
    #[serde(default)]
    pub task_limit: Option<usize>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_color() -> String {
    "primary".to_string()
}

fn default_true() -> bool {
    true
}

/// Where a new column goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ColumnPlacement {
    Start,
    #[default]
    End,
    After(String),
}

#[derive(Debug, Clone, Default)]
pub struct NewColumn {
    pub id: Option<String>,
    pub title: String,
    pub color: Option<String>,
    pub placement: ColumnPlacement,
    pub collapsed: bool,
    pub allow_drop: Option<bool>,
    pub auto_sort: bool,
    pub task_limit: Option<usize>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ColumnPatch {
    pub title: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub collapsed: Option<bool>,
    pub allow_drop: Option<bool>,
    pub auto_sort: Option<bool>,
    pub task_limit: Option<Option<usize>>,
}

impl ColumnPatch {
    fn apply(self, column: &mut Column) {
        if let Some(title) = self.title {
            column.title = title;
        }
        if let Some(color) = self.color {
            column.color = color;
        }
        if let Some(description) = self.description {
            column.description = description;
        }
        if let Some(collapsed) = self.collapsed {
            column.collapsed = collapsed;
        }
        if let Some(allow_drop) = self.allow_drop {
            column.allow_drop = allow_drop;
        }
        if let Some(auto_sort) = self.auto_sort {
            column.auto_sort = auto_sort;
        }
        if let Some(limit) = self.task_limit {
            column.task_limit = limit;
        }
    }
}

impl Database {
    /// Add a column at the requested placement, shifting later columns right.
    pub fn create_column(&mut self, new: NewColumn) -> Column {
        let now = Utc::now();
        let columns = &self.columns;
        let id = self
            .ids
            .claim(new.id, "column", |c| columns.iter().any(|col| col.id == c));

        let order = match &new.placement {
            ColumnPlacement::Start => 0,
            ColumnPlacement::End => self.columns.len(),
            ColumnPlacement::After(anchor) => self
                .column(anchor)
                .map(|c| c.order + 1)
                .unwrap_or(self.columns.len()),
        };
        for col in self.columns.iter_mut().filter(|c| c.order >= order) {
            col.order += 1;
        }

        let column = Column {
            id,
            title: new.title,
            color: new.color.unwrap_or_else(default_color),
            order,
            collapsed: new.collapsed,
            allow_drop: new.allow_drop.unwrap_or(true),
            auto_sort: new.auto_sort,
            task_limit: new.task_limit,
            description: new.description.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        debug!(column = %column.id, order, "created column");
        self.columns.push(column.clone());
        column
    }

    pub fn update_column(&mut self, column_id: &str, patch: ColumnPatch) -> Result<Column> {
        let result = match self.columns.iter_mut().find(|c| c.id == column_id) {
            Some(column) => {
                patch.apply(column);
                column.updated_at = Utc::now();
                debug!(column = column_id, "updated column");
                Ok(column.clone())
            }
            None => Err(Error::not_found(EntityKind::Column, column_id)),
        };
        self.record_outcome(result)
    }

    pub fn set_column_collapsed(&mut self, column_id: &str, collapsed: bool) -> Result<Column> {
        self.update_column(
            column_id,
            ColumnPatch {
                collapsed: Some(collapsed),
                ..Default::default()
            },
        )
    }

    /// Assign orders from the position of each id in `column_ids`, which must
    /// name every existing column exactly once.
    pub fn reorder_columns(&mut self, column_ids: &[String]) -> Result<()> {
        let result = self.reorder_columns_inner(column_ids);
        self.record_outcome(result)
    }

    fn reorder_columns_inner(&mut self, column_ids: &[String]) -> Result<()> {
        if column_ids.len() != self.columns.len() {
            return Err(Error::Validation(format!(
                "expected {} column ids, got {}",
                self.columns.len(),
                column_ids.len()
            )));
        }
        for (i, id) in column_ids.iter().enumerate() {
            if column_ids[..i].contains(id) {
                return Err(Error::Validation(format!("column {id} listed twice")));
            }
            if self.column(id).is_none() {
                return Err(Error::not_found(EntityKind::Column, id.clone()));
            }
        }
        let now = Utc::now();
        for column in self.columns.iter_mut() {
            if let Some(order) = column_ids.iter().position(|id| *id == column.id) {
                if column.order != order {
                    column.order = order;
                    column.updated_at = now;
                }
            }
        }
        debug!(columns = column_ids.len(), "reordered columns");
        Ok(())
    }

    /// Remove a column and close the gap in the ordering.
    ///
    /// Tasks still in the column are appended to `relocate_to`; deleting a
    /// non-empty column without a relocation target is rejected. Returns
    /// `false` when no such column exists.
    pub fn delete_column(&mut self, column_id: &str, relocate_to: Option<&str>) -> Result<bool> {
        let result = self.delete_column_inner(column_id, relocate_to);
        self.record_outcome(result)
    }

    fn delete_column_inner(&mut self, column_id: &str, relocate_to: Option<&str>) -> Result<bool> {
        let Some(index) = self.columns.iter().position(|c| c.id == column_id) else {
            debug!(column = column_id, "delete of unknown column ignored");
            return Ok(false);
        };

        let mut stranded: Vec<usize> = (0..self.tasks.len())
            .filter(|&i| self.tasks[i].column_id == column_id)
            .collect();
        if !stranded.is_empty() {
            let target = match relocate_to {
                Some(target) if target == column_id => {
                    return Err(Error::Validation(
                        "cannot relocate tasks into the column being deleted".into(),
                    ));
                }
                Some(target) => target,
                None => {
                    return Err(Error::Validation(format!(
                        "column {column_id} still holds {} task(s); choose a column to move them to",
                        stranded.len()
                    )));
                }
            };
            let Some(dest) = self.column(target) else {
                return Err(Error::not_found(EntityKind::Column, target));
            };
            if !dest.allow_drop {
                return Err(Error::Validation(format!(
                    "column {target} does not accept dropped tasks"
                )));
            }
            if let Some(limit) = dest.task_limit {
                let mut incoming: BTreeMap<&str, usize> = BTreeMap::new();
                for &i in &stranded {
                    *incoming.entry(self.tasks[i].project_id.as_str()).or_default() += 1;
                }
                for (project, count) in incoming {
                    let occupied = self.sequence_len(project, target, None);
                    if occupied + count > limit {
                        return Err(Error::Validation(format!(
                            "column {target} cannot take {count} more task(s) for project {project}; its limit is {limit}"
                        )));
                    }
                }
            }
            stranded.sort_by_key(|&i| (self.tasks[i].project_id.clone(), self.tasks[i].position));
            let ids: Vec<String> = stranded.iter().map(|&i| self.tasks[i].id.clone()).collect();
            for id in ids {
                if let Some(i) = self.task_index(&id) {
                    let project = self.tasks[i].project_id.clone();
                    self.place_task(i, &project, target, None);
                }
            }
        }

        let removed = self.columns.remove(index);
        for col in self.columns.iter_mut().filter(|c| c.order > removed.order) {
            col.order -= 1;
        }
        debug!(column = column_id, "deleted column");
        Ok(true)
    }

    /// Restore contiguous `0..n` column orders, keeping the current sequence.
    pub(crate) fn compact_column_orders(&mut self) {
        let mut ranked: Vec<(usize, usize)> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.order, i))
            .collect();
        ranked.sort();
        for (order, (_, i)) in ranked.into_iter().enumerate() {
            self.columns[i].order = order;
        }
    }
}
