//! Task filtering and search.

use chrono::NaiveDate;

use crate::db::Database;
use crate::fields::{Priority, Swimlane};
use crate::task::Task;

/// Optional criteria for narrowing a task list. A `None` field matches every
/// task; list-valued criteria match when any listed value applies.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub project_id: Option<String>,
    pub column_id: Option<String>,
    pub swimlane: Option<Swimlane>,
    pub assignees: Option<Vec<String>>,
    pub priorities: Option<Vec<Priority>>,
    pub tags: Option<Vec<String>>,
    pub due_on: Option<NaiveDate>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(project) = &self.project_id {
            if &task.project_id != project {
                return false;
            }
        }
        if let Some(column) = &self.column_id {
            if &task.column_id != column {
                return false;
            }
        }
        if let Some(swimlane) = self.swimlane {
            if task.swimlane != swimlane {
                return false;
            }
        }
        if let Some(assignees) = &self.assignees {
            let on_task = task.assignees();
            if !assignees.iter().any(|a| on_task.contains(&a.as_str())) {
                return false;
            }
        }
        if let Some(priorities) = &self.priorities {
            if !priorities.contains(&task.priority) {
                return false;
            }
        }
        if let Some(tags) = &self.tags {
            if !tags.iter().any(|tag| task.tags.contains(tag)) {
                return false;
            }
        }
        if let Some(day) = self.due_on {
            if task.due_date != Some(day) {
                return false;
            }
        }
        true
    }
}

impl Database {
    pub fn filter_tasks(&self, filter: &TaskFilter) -> Vec<&Task> {
        self.list_tasks(|t| filter.matches(t))
    }

    /// Case-insensitive match on title, description and tags. A blank query
    /// returns every task in scope.
    pub fn search_tasks(&self, query: &str, project_id: Option<&str>) -> Vec<&Task> {
        let needle = query.trim().to_lowercase();
        self.list_tasks(|t| {
            if project_id.map_or(false, |p| t.project_id != p) {
                return false;
            }
            needle.is_empty()
                || t.title.to_lowercase().contains(&needle)
                || t.description.to_lowercase().contains(&needle)
                || t.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::NewTask;

    fn db() -> Database {
        let mut db = Database::default();
        db.create_task(NewTask {
            id: Some("login".into()),
            title: "Fix login redirect".into(),
            project_id: Some("p1".into()),
            swimlane: Some(Swimlane::Bug),
            priority: Some(Priority::High),
            assignee_ids: vec!["u1".into()],
            tags: vec!["auth".into()],
            due_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            ..Default::default()
        });
        db.create_task(NewTask {
            id: Some("docs".into()),
            title: "Write onboarding guide".into(),
            description: Some("Covers the LOGIN flow".into()),
            project_id: Some("p2".into()),
            tags: vec!["docs".into()],
            ..Default::default()
        });
        db
    }

    fn ids(tasks: Vec<&Task>) -> Vec<&str> {
        tasks.into_iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let db = db();
        assert_eq!(db.filter_tasks(&TaskFilter::default()).len(), 2);
    }

    #[test]
    fn criteria_combine() {
        let db = db();
        let filter = TaskFilter {
            priorities: Some(vec![Priority::High, Priority::Critical]),
            tags: Some(vec!["auth".into(), "ui".into()]),
            assignees: Some(vec!["u1".into()]),
            due_on: NaiveDate::from_ymd_opt(2024, 5, 1),
            ..Default::default()
        };
        assert_eq!(ids(db.filter_tasks(&filter)), vec!["login"]);

        let filter = TaskFilter {
            swimlane: Some(Swimlane::Bug),
            project_id: Some("p2".into()),
            ..Default::default()
        };
        assert!(db.filter_tasks(&filter).is_empty());
    }

    #[test]
    fn legacy_only_assignee_still_matches() {
        let mut db = db();
        db.tasks[1].assignee_ids.clear();
        db.tasks[1].assignee_id = Some("u7".into());
        let filter = TaskFilter {
            assignees: Some(vec!["u7".into()]),
            ..Default::default()
        };
        assert_eq!(ids(db.filter_tasks(&filter)), vec!["docs"]);
    }

    #[test]
    fn search_looks_at_title_description_and_tags() {
        let db = db();
        assert_eq!(ids(db.search_tasks("login", None)), vec!["login", "docs"]);
        assert_eq!(ids(db.search_tasks("login", Some("p2"))), vec!["docs"]);
        assert_eq!(ids(db.search_tasks("AUTH", None)), vec!["login"]);
        assert_eq!(db.search_tasks("   ", Some("p1")).len(), 1);
        assert_eq!(db.search_tasks("", None).len(), 2);
    }
}
