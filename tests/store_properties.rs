use std::collections::BTreeMap;

use kanban::db::Database;
use kanban::error::Error;
use kanban::seed;
use kanban::task::{NewTask, TaskPatch};

/// Small deterministic generator so failures replay exactly.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % bound
    }
}

fn assert_positions_dense(db: &Database) {
    let mut groups: BTreeMap<(String, String), Vec<usize>> = BTreeMap::new();
    for task in &db.tasks {
        groups
            .entry((task.project_id.clone(), task.column_id.clone()))
            .or_default()
            .push(task.position);
    }
    for (key, mut positions) in groups {
        positions.sort_unstable();
        let expected: Vec<usize> = (0..positions.len()).collect();
        assert_eq!(positions, expected, "sequence {key:?}");
    }
}

fn assert_assignees_mirrored(db: &Database) {
    for task in &db.tasks {
        assert_eq!(task.assignee_id.as_ref(), task.assignee_ids.first(), "{}", task.id);
    }
}

fn assert_within_task_limits(db: &Database) {
    for column in db.columns.iter().filter(|c| c.task_limit.is_some()) {
        let limit = column.task_limit.unwrap_or(usize::MAX);
        let mut per_project: BTreeMap<&str, usize> = BTreeMap::new();
        for task in db.tasks.iter().filter(|t| t.column_id == column.id) {
            *per_project.entry(task.project_id.as_str()).or_default() += 1;
        }
        for (project, count) in per_project {
            assert!(count <= limit, "{} holds {count} for {project}, limit {limit}", column.id);
        }
    }
}

fn board() -> Database {
    let mut db = seed::sample().unwrap();
    for i in 0..12 {
        db.create_task(NewTask {
            title: format!("Extra {i}"),
            project_id: Some(if i % 3 == 0 { "project-2" } else { "project-1" }.into()),
            column_id: Some(["backlog", "todo", "review"][i % 3].into()),
            assignee_ids: if i % 2 == 0 { vec!["user-1".into()] } else { vec![] },
            ..Default::default()
        });
    }
    db
}

#[test]
fn random_moves_keep_positions_dense() {
    let mut db = board();
    let columns: Vec<String> = db.columns.iter().map(|c| c.id.clone()).collect();
    let total = db.tasks.len();
    let mut rng = Lcg(7);

    for _ in 0..500 {
        let task_id = db.tasks[rng.next(db.tasks.len())].id.clone();
        let column = &columns[rng.next(columns.len())];
        let position = match rng.next(3) {
            0 => None,
            _ => Some(rng.next(8)),
        };
        let before = db.tasks.clone();
        match db.move_task(&task_id, column, position) {
            Ok(task) => assert_eq!(&task.column_id, column),
            Err(err) => {
                assert!(matches!(err, Error::Validation(_)), "{err}");
                assert_eq!(db.tasks, before, "refused move of {task_id} changed the board");
            }
        }
        assert_positions_dense(&db);
        assert_within_task_limits(&db);
    }
    assert_eq!(db.tasks.len(), total);
    assert_assignees_mirrored(&db);
    assert!(
        db.columns.iter().any(|c| c.task_limit.is_some()),
        "sample board should exercise a task limit"
    );
}

#[test]
fn random_assignee_edits_keep_legacy_field_in_sync() {
    let mut db = board();
    let users = ["user-1", "user-2", "user-3", "user-4"];
    let mut rng = Lcg(42);

    for _ in 0..300 {
        let task_id = db.tasks[rng.next(db.tasks.len())].id.clone();
        let user = users[rng.next(users.len())];
        match rng.next(4) {
            0 => {
                db.add_assignee(&task_id, user).unwrap();
            }
            1 => {
                db.remove_assignee(&task_id, user).unwrap();
            }
            2 => {
                db.assign_task(&task_id, Some(user)).unwrap();
            }
            _ => {
                let picked: Vec<String> =
                    users.iter().take(rng.next(users.len() + 1)).map(|u| u.to_string()).collect();
                db.set_assignees(&task_id, &picked).unwrap();
            }
        }
        assert_assignees_mirrored(&db);
    }
}

#[test]
fn deleted_tasks_leave_no_dangling_links() {
    let mut db = board();
    let mut rng = Lcg(3);
    while db.tasks.len() > 4 {
        let task_id = db.tasks[rng.next(db.tasks.len())].id.clone();
        assert!(db.delete_task(&task_id));
        assert!(db.task(&task_id).is_none());
        for item in &db.roadmap_items {
            assert!(item.task_ids.iter().all(|id| db.task(id).is_some()), "{}", item.id);
        }
        assert_positions_dense(&db);
    }
}

#[test]
fn deleting_a_user_clears_every_reference() {
    let mut db = board();
    assert!(db.delete_user("user-1"));
    assert!(db.user("user-1").is_none());
    assert!(db.tasks.iter().all(|t| !t.assignee_ids.iter().any(|u| u == "user-1")));
    assert!(db.teams.iter().all(|t| !t.members.iter().any(|u| u == "user-1")));
    assert_assignees_mirrored(&db);
}

#[test]
fn failed_update_leaves_store_unchanged() {
    let mut db = board();
    let before = serde_json::to_value(&db).unwrap();

    let err = db
        .update_task(
            "missing",
            TaskPatch {
                title: Some("Renamed".into()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert_eq!(serde_json::to_value(&db).unwrap(), before);
    assert!(db.last_error.is_some());

    db.update_task_priority("task-2", kanban::fields::Priority::Low).unwrap();
    assert!(db.last_error.is_none());
}
