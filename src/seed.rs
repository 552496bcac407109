//! Bundled sample board.

use crate::db::Database;
use crate::error::Result;

const SAMPLE_DATA: &str = include_str!("../data/sample-data.json");

/// Parse the bundled sample board.
pub fn sample() -> Result<Database> {
    Database::from_json(SAMPLE_DATA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_consistent() {
        let db = sample().unwrap();
        assert_eq!(db.projects.len(), 2);
        assert_eq!(db.columns.len(), 5);
        for task in &db.tasks {
            assert_eq!(task.assignee_id.as_ref(), task.assignee_ids.first(), "{}", task.id);
            assert!(db.column(&task.column_id).is_some(), "{}", task.id);
        }
        for item in &db.roadmap_items {
            assert!(item.task_ids.iter().all(|id| db.task(id).is_some()));
        }
        // legacy-only records are migrated into the list
        assert_eq!(db.task("task-1").unwrap().assignee_ids, vec!["user-1"]);
    }

    #[test]
    fn initialize_only_fills_empty_collections() {
        let mut db = Database::default();
        db.create_task(crate::task::NewTask {
            id: Some("mine".into()),
            title: "Mine".into(),
            ..Default::default()
        });
        db.initialize(sample().unwrap());
        assert_eq!(db.tasks.len(), 1);
        assert_eq!(db.columns.len(), 5);
        // sample roadmap links point at tasks this board does not have
        assert!(db.roadmap_items.iter().all(|i| i.task_ids.is_empty()));
        assert_eq!(db.current_project_id.as_deref(), Some("project-1"));
    }
}
