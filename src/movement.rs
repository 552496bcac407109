//! Task movement between and within columns.
//!
//! Every (project, column) pair holds its own sequence of tasks whose
//! `position` values run `0..n` without gaps or repeats. Moving a task closes
//! the gap it leaves behind and opens a slot where it lands.

use chrono::Utc;
use tracing::debug;

use crate::db::Database;
use crate::error::{EntityKind, Error, Result};
use crate::task::Task;

impl Database {
    /// Move a task to `column_id` at `position`, or to the end of that column
    /// when no position is given. Positions past the end are clamped.
    ///
    /// Moving to the slot the task already occupies changes nothing but the
    /// update timestamp.
    pub fn move_task(
        &mut self,
        task_id: &str,
        column_id: &str,
        position: Option<usize>,
    ) -> Result<Task> {
        let result = self.require_task(task_id).and_then(|index| {
            let project = self.tasks[index].project_id.clone();
            self.relocate_task(index, &project, column_id, position)?;
            Ok(self.tasks[index].clone())
        });
        self.record_outcome(result)
    }

    /// Check the target column's policies, then detach the task and insert it
    /// into the target sequence. Nothing changes when a check fails.
    pub(crate) fn relocate_task(
        &mut self,
        index: usize,
        project_id: &str,
        column_id: &str,
        position: Option<usize>,
    ) -> Result<()> {
        let column = self
            .column(column_id)
            .ok_or_else(|| Error::not_found(EntityKind::Column, column_id))?;
        let task = &self.tasks[index];
        let entering = task.column_id != column_id || task.project_id != project_id;

        let mut position = position;
        if entering {
            if !column.allow_drop {
                return Err(Error::Validation(format!(
                    "column {column_id} does not accept dropped tasks"
                )));
            }
            if let Some(limit) = column.task_limit {
                let occupied = self.sequence_len(project_id, column_id, None);
                if occupied >= limit {
                    return Err(Error::Validation(format!(
                        "column {column_id} is at its limit of {limit} task(s)"
                    )));
                }
            }
            if column.auto_sort {
                position = Some(self.priority_slot(index, project_id, column_id));
            }
        }

        let from = (task.column_id.clone(), task.position);
        self.place_task(index, project_id, column_id, position);
        let task = &self.tasks[index];
        debug!(
            task = %task.id,
            from_column = %from.0,
            from_position = from.1,
            to_column = column_id,
            to_position = task.position,
            "moved task"
        );
        Ok(())
    }

    /// Detach and re-insert without policy checks.
    pub(crate) fn place_task(
        &mut self,
        index: usize,
        project_id: &str,
        column_id: &str,
        position: Option<usize>,
    ) {
        self.detach_task(index);
        self.insert_task(index, project_id, column_id, position);
    }

    /// Close the gap the task leaves in its current sequence.
    pub(crate) fn detach_task(&mut self, index: usize) {
        let (id, project, column, old) = {
            let t = &self.tasks[index];
            (t.id.clone(), t.project_id.clone(), t.column_id.clone(), t.position)
        };
        for other in self.tasks.iter_mut() {
            if other.id != id
                && other.project_id == project
                && other.column_id == column
                && other.position > old
            {
                other.position -= 1;
            }
        }
    }

    /// Open a slot in the target sequence and drop the task into it.
    pub(crate) fn insert_task(
        &mut self,
        index: usize,
        project_id: &str,
        column_id: &str,
        position: Option<usize>,
    ) {
        let id = self.tasks[index].id.clone();
        let len = self.sequence_len(project_id, column_id, Some(&id));
        let slot = position.map_or(len, |p| p.min(len));
        for other in self.tasks.iter_mut() {
            if other.id != id
                && other.project_id == project_id
                && other.column_id == column_id
                && other.position >= slot
            {
                other.position += 1;
            }
        }
        let task = &mut self.tasks[index];
        task.project_id = project_id.to_string();
        task.column_id = column_id.to_string();
        task.position = slot;
        task.updated_at = Utc::now();
    }

    pub(crate) fn sequence_len(&self, project_id: &str, column_id: &str, excluding: Option<&str>) -> usize {
        self.tasks
            .iter()
            .filter(|t| {
                t.project_id == project_id
                    && t.column_id == column_id
                    && excluding.map_or(true, |id| t.id != id)
            })
            .count()
    }

    /// First slot after every task of equal or higher priority.
    fn priority_slot(&self, index: usize, project_id: &str, column_id: &str) -> usize {
        let incoming = &self.tasks[index];
        let mut sequence: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.id != incoming.id && t.project_id == project_id && t.column_id == column_id)
            .collect();
        sequence.sort_by_key(|t| t.position);
        sequence
            .iter()
            .position(|t| t.priority > incoming.priority)
            .unwrap_or(sequence.len())
    }

    /// Renumber every sequence to `0..n`, keeping the existing relative order.
    pub(crate) fn compact_task_positions(&mut self) {
        let mut ranked: Vec<(String, String, usize, usize)> = self
            .tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.project_id.clone(), t.column_id.clone(), t.position, i))
            .collect();
        ranked.sort();
        let mut next = 0;
        let mut current: Option<(String, String)> = None;
        for (project, column, _, i) in ranked {
            let key = (project, column);
            if current.as_ref() != Some(&key) {
                current = Some(key);
                next = 0;
            }
            self.tasks[i].position = next;
            next += 1;
        }
    }
}
