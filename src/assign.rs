//! Task assignment.
//!
//! A task carries an ordered, duplicate-free list of assignees plus a legacy
//! single-assignee field. After every operation here the legacy field equals
//! the head of the list, or is empty when the list is.

use tracing::debug;

use crate::db::Database;
use crate::error::Result;
use crate::task::Task;

impl Database {
    /// Replace the assignee list, keeping the first occurrence of each user.
    pub fn set_assignees(&mut self, task_id: &str, user_ids: &[String]) -> Result<Task> {
        let result = self.require_task(task_id).map(|index| {
            let task = &mut self.tasks[index];
            task.replace_assignees(user_ids.to_vec());
            task.touch();
            debug!(task = task_id, assignees = task.assignee_ids.len(), "set assignees");
            task.clone()
        });
        self.record_outcome(result)
    }

    /// Legacy single-assignee setter: the list becomes just `user_id`, or empty.
    pub fn assign_task(&mut self, task_id: &str, user_id: Option<&str>) -> Result<Task> {
        let users: Vec<String> = user_id.map(str::to_string).into_iter().collect();
        self.set_assignees(task_id, &users)
    }

    /// Append a user. Already-assigned users leave the task untouched.
    pub fn add_assignee(&mut self, task_id: &str, user_id: &str) -> Result<Task> {
        let result = self.require_task(task_id).map(|index| {
            let task = &mut self.tasks[index];
            if !task.assignee_ids.iter().any(|u| u == user_id) {
                task.assignee_ids.push(user_id.to_string());
                task.sync_legacy_assignee();
                task.touch();
                debug!(task = task_id, user = user_id, "added assignee");
            }
            task.clone()
        });
        self.record_outcome(result)
    }

    /// Drop a user. Users not on the task leave it untouched.
    pub fn remove_assignee(&mut self, task_id: &str, user_id: &str) -> Result<Task> {
        let result = self.require_task(task_id).map(|index| {
            let task = &mut self.tasks[index];
            if let Some(at) = task.assignee_ids.iter().position(|u| u == user_id) {
                task.assignee_ids.remove(at);
                task.sync_legacy_assignee();
                task.touch();
                debug!(task = task_id, user = user_id, "removed assignee");
            }
            task.clone()
        });
        self.record_outcome(result)
    }

    /// Remove a user from every task's assignees. Returns the number of tasks changed.
    pub(crate) fn purge_assignee(&mut self, user_id: &str) -> usize {
        let mut changed = 0;
        for task in self.tasks.iter_mut() {
            let before = task.assignee_ids.len();
            task.assignee_ids.retain(|u| u != user_id);
            let legacy_stale = task.assignee_id.as_deref() == Some(user_id);
            if task.assignee_ids.len() != before || legacy_stale {
                task.sync_legacy_assignee();
                task.touch();
                changed += 1;
            }
        }
        changed
    }
}
