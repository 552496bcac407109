//! The board store and its utility functions.
//!
//! `Database` owns every collection (projects, teams, users, tasks, columns and
//! roadmap items). It is built once per session and handed by reference to
//! whatever drives it. Cross-references between records are plain ids.
//!
//! Task CRUD, derived views, bulk operations, snapshot load/save and seed
//! normalisation live here; column, roadmap, movement, assignment and registry
//! actions are `impl Database` blocks in their own modules.

use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use chrono::{Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::column::{is_closed_column, Column, DONE_COLUMN};
use crate::error::{EntityKind, Error, Result};
use crate::fields::*;
use crate::id::IdGenerator;
use crate::project::{Project, Team, User};
use crate::roadmap::RoadmapItem;
use crate::task::{Comment, NewTask, Task, TaskPatch, DEFAULT_COLUMN};

/// In-memory store for the whole board.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub current_project_id: Option<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default, alias = "kanban_columns")]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub roadmap_items: Vec<RoadmapItem>,
    /// Message of the most recent failed action, cleared by the next success.
    #[serde(skip)]
    pub last_error: Option<String>,
    /// Last number handed out by the id generator.
    #[serde(default, rename = "id_counter")]
    pub(crate) ids: IdGenerator,
}

impl Database {
    /// Load a snapshot from JSON, starting empty if the file is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no snapshot, starting empty");
            return Database::default();
        }
        let mut buf = String::new();
        match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match Database::from_json(&buf) {
                Ok(db) => {
                    info!(path = %path.display(), tasks = db.tasks.len(), "loaded board");
                    db
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "error parsing board, starting fresh");
                    Database::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "error reading board, starting fresh");
                Database::default()
            }
        }
    }

    /// Parse a snapshot or seed document and restore its invariants.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut db: Database = serde_json::from_str(json)?;
        db.normalize();
        Ok(db)
    }

    /// Save the snapshot to JSON using a temp file and rename.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(self)?;
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        info!(path = %path.display(), "saved board");
        Ok(())
    }

    /// Fill every empty collection from `seed`, then restore invariants.
    pub fn initialize(&mut self, seed: Database) {
        if self.projects.is_empty() {
            self.projects = seed.projects;
            if self.current_project_id.is_none() {
                self.current_project_id = seed
                    .current_project_id
                    .or_else(|| self.projects.first().map(|p| p.id.clone()));
            }
        }
        if self.teams.is_empty() {
            self.teams = seed.teams;
        }
        if self.users.is_empty() {
            self.users = seed.users;
        }
        if self.tasks.is_empty() {
            self.tasks = seed.tasks;
        }
        if self.columns.is_empty() {
            self.columns = seed.columns;
        }
        if self.roadmap_items.is_empty() {
            self.roadmap_items = seed.roadmap_items;
        }
        self.normalize();
        info!(
            projects = self.projects.len(),
            tasks = self.tasks.len(),
            columns = self.columns.len(),
            "initialised board"
        );
    }

    /// Repair data that may predate the store's invariants.
    pub(crate) fn normalize(&mut self) {
        for task in self.tasks.iter_mut() {
            let mut assignees = std::mem::take(&mut task.assignee_ids);
            if let Some(legacy) = task.assignee_id.take() {
                if !assignees.contains(&legacy) {
                    assignees.insert(0, legacy);
                }
            }
            task.replace_assignees(assignees);
            task.comments_count = task.comments_count.max(task.comments.len());
        }
        self.compact_task_positions();
        self.compact_column_orders();

        let existing = self
            .tasks
            .iter()
            .map(|t| t.id.as_str())
            .chain(self.columns.iter().map(|c| c.id.as_str()))
            .chain(self.roadmap_items.iter().map(|i| i.id.as_str()))
            .chain(self.projects.iter().map(|p| p.id.as_str()));
        for id in existing {
            self.ids.observe(id);
        }

        let known: HashSet<String> = self.tasks.iter().map(|t| t.id.clone()).collect();
        for item in self.roadmap_items.iter_mut() {
            let before = item.task_ids.len();
            let mut seen = HashSet::new();
            item.task_ids
                .retain(|id| known.contains(id) && seen.insert(id.clone()));
            if item.task_ids.len() != before {
                warn!(roadmap_item = %item.id, dropped = before - item.task_ids.len(), "dropped dangling or repeated task links");
            }
        }
    }

    /// Record the outcome of a store action for observers and hand it back.
    pub(crate) fn record_outcome<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(err) => {
                warn!(error = %err, "store action failed");
                self.last_error = Some(err.to_string());
            }
        }
        result
    }

    pub(crate) fn task_index(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }

    pub(crate) fn require_task(&self, task_id: &str) -> Result<usize> {
        self.task_index(task_id)
            .ok_or_else(|| Error::not_found(EntityKind::Task, task_id))
    }

    /// Get a task by id.
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Get a column by id.
    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    /// Columns left to right.
    pub fn columns_ordered(&self) -> Vec<&Column> {
        let mut columns: Vec<&Column> = self.columns.iter().collect();
        columns.sort_by_key(|c| c.order);
        columns
    }

    // Task actions

    /// Create a task, placing it in its column at the requested position or at the end.
    ///
    /// An unknown column falls back to `backlog`, or the leftmost column when
    /// there is no backlog. Creation is not held to the column's task limit.
    pub fn create_task(&mut self, mut new: NewTask) -> Task {
        let tasks = &self.tasks;
        let id = self
            .ids
            .claim(new.id.take(), "task", |c| tasks.iter().any(|t| t.id == c));
        let position = new.position;
        let mut task = Task::from_new(id, new, Utc::now());
        if !self.columns.is_empty() && self.column(&task.column_id).is_none() {
            let fallback = self
                .column(DEFAULT_COLUMN)
                .or_else(|| self.columns_ordered().first().copied())
                .map(|c| c.id.clone());
            if let Some(fallback) = fallback {
                warn!(task = %task.id, column = %task.column_id, fallback = %fallback, "unknown column for new task");
                task.column_id = fallback;
            }
        }

        let project = task.project_id.clone();
        let column = task.column_id.clone();
        self.tasks.push(task);
        let index = self.tasks.len() - 1;
        self.insert_task(index, &project, &column, position);
        let created = self.tasks[index].clone();
        debug!(task = %created.id, column = %created.column_id, position = created.position, "created task");
        created
    }

    /// Apply a partial update. Unknown ids fail with `NotFound` and change nothing.
    pub fn update_task(&mut self, task_id: &str, patch: TaskPatch) -> Result<Task> {
        let result = self.update_task_inner(task_id, &patch);
        self.record_outcome(result)
    }

    fn update_task_inner(&mut self, task_id: &str, patch: &TaskPatch) -> Result<Task> {
        let index = self.require_task(task_id)?;
        if patch.relocates() {
            let current = &self.tasks[index];
            let project = patch
                .project_id
                .clone()
                .unwrap_or_else(|| current.project_id.clone());
            let column = patch
                .column_id
                .clone()
                .unwrap_or_else(|| current.column_id.clone());
            let stays_put = project == current.project_id
                && column == current.column_id
                && patch.position.is_none();
            if !stays_put {
                self.relocate_task(index, &project, &column, patch.position)?;
            }
        }

        let task = &mut self.tasks[index];
        patch.apply_fields(task);
        if let Some(ids) = &patch.assignee_ids {
            task.replace_assignees(ids.clone());
        } else if let Some(legacy) = &patch.assignee_id {
            task.replace_assignees(legacy.iter().cloned().collect());
        }
        task.touch();
        debug!(task = task_id, "updated task");
        Ok(task.clone())
    }

    pub fn update_task_priority(&mut self, task_id: &str, priority: Priority) -> Result<Task> {
        self.update_task(
            task_id,
            TaskPatch {
                priority: Some(priority),
                ..Default::default()
            },
        )
    }

    /// Append a comment and bump the comment counter.
    pub fn add_task_comment(
        &mut self,
        task_id: &str,
        body: &str,
        author_id: Option<&str>,
    ) -> Result<Task> {
        let result = self.require_task(task_id).map(|index| {
            let now = Utc::now();
            let task = &mut self.tasks[index];
            task.comments.push(Comment {
                author_id: author_id.map(str::to_string),
                body: body.to_string(),
                created_at: now,
            });
            task.comments_count += 1;
            task.updated_at = now;
            task.clone()
        });
        self.record_outcome(result)
    }

    /// Remove a task, closing the gap in its column and unlinking it from the
    /// roadmap. Returns `false` when no such task exists.
    pub fn delete_task(&mut self, task_id: &str) -> bool {
        let Some(index) = self.task_index(task_id) else {
            debug!(task = task_id, "delete of unknown task ignored");
            return false;
        };
        self.detach_task(index);
        self.tasks.remove(index);
        self.unlink_task_everywhere(task_id);
        debug!(task = task_id, "deleted task");
        true
    }

    /// Apply one patch to several tasks. Every id is checked first, and a failure
    /// part-way through rolls all of them back.
    pub fn bulk_update_tasks(&mut self, task_ids: &[String], patch: TaskPatch) -> Result<Vec<Task>> {
        let result = self.bulk_update_inner(task_ids, &patch);
        self.record_outcome(result)
    }

    fn bulk_update_inner(&mut self, task_ids: &[String], patch: &TaskPatch) -> Result<Vec<Task>> {
        for id in task_ids {
            self.require_task(id)?;
        }
        let snapshot = self.tasks.clone();
        let mut updated = Vec::with_capacity(task_ids.len());
        for id in task_ids {
            match self.update_task_inner(id, patch) {
                Ok(task) => updated.push(task),
                Err(err) => {
                    self.tasks = snapshot;
                    return Err(err);
                }
            }
        }
        Ok(updated)
    }

    /// Delete every listed task, skipping unknown ids. Returns how many were removed.
    pub fn bulk_delete_tasks(&mut self, task_ids: &[String]) -> usize {
        task_ids.iter().filter(|id| self.delete_task(id)).count()
    }

    // Derived views, recomputed on every call

    pub fn list_tasks(&self, predicate: impl Fn(&Task) -> bool) -> Vec<&Task> {
        self.tasks.iter().filter(|t| predicate(t)).collect()
    }

    pub fn tasks_by_project(&self, project_id: &str) -> Vec<&Task> {
        self.list_tasks(|t| t.project_id == project_id)
    }

    /// Tasks in a column in board order, optionally limited to one project.
    pub fn tasks_by_column(&self, column_id: &str, project_id: Option<&str>) -> Vec<&Task> {
        let mut tasks = self.list_tasks(|t| {
            t.column_id == column_id && project_id.map_or(true, |p| t.project_id == p)
        });
        tasks.sort_by(|a, b| {
            a.project_id
                .cmp(&b.project_id)
                .then(a.position.cmp(&b.position))
        });
        tasks
    }

    pub fn tasks_by_swimlane(&self, swimlane: Swimlane, project_id: Option<&str>) -> Vec<&Task> {
        self.list_tasks(|t| {
            t.swimlane == swimlane && project_id.map_or(true, |p| t.project_id == p)
        })
    }

    /// Tasks not yet done or cancelled.
    pub fn pending_tasks_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| !is_closed_column(&t.column_id))
            .count()
    }

    /// Every priority bucket, empty ones included.
    pub fn tasks_by_priority(&self) -> BTreeMap<Priority, Vec<&Task>> {
        let mut buckets: BTreeMap<Priority, Vec<&Task>> =
            Priority::ALL.iter().map(|p| (*p, Vec::new())).collect();
        for task in &self.tasks {
            buckets.entry(task.priority).or_default().push(task);
        }
        buckets
    }

    /// Tasks due before `today` that are not in the done column.
    pub fn overdue_tasks(&self, today: NaiveDate) -> Vec<&Task> {
        self.list_tasks(|t| {
            t.column_id != DONE_COLUMN && t.due_date.map_or(false, |due| due < today)
        })
    }

    pub fn roadmap_by_project(&self, project_id: &str) -> Vec<&RoadmapItem> {
        self.roadmap_items
            .iter()
            .filter(|item| item.project_id == project_id)
            .collect()
    }
}

/// Normalise a tag by trimming, lowercasing and hyphenating inner spaces.
pub fn normalise_tag(s: &str) -> String {
    s.trim().to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

/// Split comma-separated tag arguments, normalise, sort and dedupe them.
pub fn split_and_normalise_tags(inputs: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = inputs
        .iter()
        .flat_map(|raw| raw.split(','))
        .map(normalise_tag)
        .filter(|tag| !tag.is_empty())
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

/// Parse a due date: `today`, `tomorrow`, `in Nd`, `in Nw`, or `YYYY-MM-DD`.
pub fn parse_due_input(s: &str) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();
    let today = Local::now().date_naive();
    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        _ => {}
    }
    if let Some(rest) = s.strip_prefix("in ") {
        let rest = rest.trim();
        if let Some(days) = rest.strip_suffix('d').and_then(|n| n.trim().parse::<i64>().ok()) {
            return Some(today + Duration::days(days));
        }
        if let Some(weeks) = rest.strip_suffix('w').and_then(|n| n.trim().parse::<i64>().ok()) {
            return Some(today + Duration::weeks(weeks));
        }
        return None;
    }
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{ColumnPlacement, NewColumn};
    use crate::roadmap::NewRoadmapItem;

    fn board() -> Database {
        let mut db = Database::default();
        for id in ["todo", "doing", "done", "cancelled"] {
            db.create_column(NewColumn {
                id: Some(id.into()),
                title: id.into(),
                placement: ColumnPlacement::End,
                ..Default::default()
            });
        }
        db
    }

    fn add(db: &mut Database, title: &str, column: &str) -> String {
        db.create_task(NewTask {
            title: title.into(),
            project_id: Some("p1".into()),
            column_id: Some(column.into()),
            ..Default::default()
        })
        .id
    }

    #[test]
    fn create_appends_or_inserts() {
        let mut db = board();
        let a = add(&mut db, "A", "todo");
        let b = add(&mut db, "B", "todo");
        let c = db
            .create_task(NewTask {
                title: "C".into(),
                project_id: Some("p1".into()),
                column_id: Some("todo".into()),
                position: Some(0),
                ..Default::default()
            })
            .id;
        let order: Vec<(&str, usize)> = db
            .tasks_by_column("todo", Some("p1"))
            .iter()
            .map(|t| (t.id.as_str(), t.position))
            .collect();
        assert_eq!(order, vec![(c.as_str(), 0), (a.as_str(), 1), (b.as_str(), 2)]);
    }

    #[test]
    fn create_in_unknown_column_falls_back() {
        let mut db = board();
        let a = add(&mut db, "A", "nowhere");
        assert_eq!(db.task(&a).unwrap().column_id, "todo");

        db.create_column(NewColumn {
            id: Some(DEFAULT_COLUMN.into()),
            title: "Backlog".into(),
            placement: ColumnPlacement::End,
            ..Default::default()
        });
        let b = add(&mut db, "B", "nowhere");
        let task = db.task(&b).unwrap();
        assert_eq!((task.column_id.as_str(), task.position), (DEFAULT_COLUMN, 0));
    }

    #[test]
    fn create_is_not_held_to_the_task_limit() {
        let mut db = board();
        db.update_column(
            "doing",
            crate::column::ColumnPatch {
                task_limit: Some(Some(1)),
                ..Default::default()
            },
        )
        .unwrap();
        for title in ["A", "B", "C"] {
            add(&mut db, title, "doing");
        }
        assert_eq!(db.tasks_by_column("doing", Some("p1")).len(), 3);
        assert!(db.last_error.is_none());

        // moving in is still refused while the column is over its cap
        let d = add(&mut db, "D", "todo");
        assert!(matches!(db.move_task(&d, "doing", None), Err(Error::Validation(_))));
    }

    #[test]
    fn reloaded_store_does_not_reuse_deleted_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");
        let mut db = board();
        let ids: Vec<String> = ["A", "B", "C"].iter().map(|t| add(&mut db, t, "todo")).collect();
        assert!(db.delete_task(&ids[2]));
        db.save(&path).unwrap();

        let mut reloaded = Database::load(&path);
        let fresh = add(&mut reloaded, "D", "todo");
        assert!(!ids.contains(&fresh), "{fresh} was handed out before");
    }

    #[test]
    fn update_unknown_task_changes_nothing() {
        let mut db = board();
        add(&mut db, "A", "todo");
        let before = db.tasks.clone();
        let err = db
            .update_task(
                "task-404",
                TaskPatch {
                    title: Some("nope".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: EntityKind::Task, .. }));
        assert_eq!(db.tasks, before);
        assert_eq!(db.last_error.as_deref(), Some("Task not found: task-404"));
    }

    #[test]
    fn update_refreshes_timestamp_and_syncs_assignees() {
        let mut db = board();
        let a = add(&mut db, "A", "todo");
        let old = Utc::now() - Duration::days(1);
        db.tasks[0].updated_at = old;

        let task = db
            .update_task(
                &a,
                TaskPatch {
                    assignee_id: Some(Some("u9".into())),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(task.updated_at > old);
        assert_eq!(task.assignee_ids, vec!["u9"]);
        assert_eq!(task.assignee_id.as_deref(), Some("u9"));

        let task = db
            .update_task(
                &a,
                TaskPatch {
                    assignee_id: Some(Some("u1".into())),
                    assignee_ids: Some(vec!["u2".into(), "u3".into()]),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(task.assignee_ids, vec!["u2", "u3"]);
        assert_eq!(task.assignee_id.as_deref(), Some("u2"));
    }

    #[test]
    fn update_with_column_moves_task() {
        let mut db = board();
        let a = add(&mut db, "A", "todo");
        let b = add(&mut db, "B", "todo");
        db.update_task(
            &a,
            TaskPatch {
                column_id: Some("doing".into()),
                title: Some("A moved".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(db.task(&b).unwrap().position, 0);
        let moved = db.task(&a).unwrap();
        assert_eq!((moved.column_id.as_str(), moved.position), ("doing", 0));
        assert_eq!(moved.title, "A moved");
    }

    #[test]
    fn delete_closes_gap_unlinks_and_is_lenient() {
        let mut db = board();
        let a = add(&mut db, "A", "todo");
        let b = add(&mut db, "B", "todo");
        let item = db
            .create_roadmap_item(NewRoadmapItem {
                title: "Q1".into(),
                project_id: Some("p1".into()),
                ..Default::default()
            })
            .id;
        db.link_task_to_roadmap(&item, &a).unwrap();

        assert!(db.delete_task(&a));
        assert!(!db.delete_task(&a));
        assert_eq!(db.task(&b).unwrap().position, 0);
        assert!(db.roadmap_items.iter().all(|r| !r.task_ids.contains(&a)));
    }

    #[test]
    fn bulk_update_is_all_or_nothing() {
        let mut db = board();
        let a = add(&mut db, "A", "todo");
        let before = db.tasks.clone();
        let ids = vec![a.clone(), "task-404".to_string()];
        let err = db
            .bulk_update_tasks(
                &ids,
                TaskPatch {
                    priority: Some(Priority::Critical),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert_eq!(db.tasks, before);

        let updated = db
            .bulk_update_tasks(
                &[a],
                TaskPatch {
                    priority: Some(Priority::Critical),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated[0].priority, Priority::Critical);
    }

    #[test]
    fn derived_views() {
        let mut db = board();
        let a = add(&mut db, "A", "todo");
        let b = add(&mut db, "B", "done");
        add(&mut db, "C", "cancelled");
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let yesterday = today - Duration::days(1);
        for id in [&a, &b] {
            db.update_task(
                id,
                TaskPatch {
                    due_date: Some(Some(yesterday)),
                    priority: Some(Priority::High),
                    ..Default::default()
                },
            )
            .unwrap();
        }

        assert_eq!(db.pending_tasks_count(), 1);
        let overdue: Vec<&str> = db.overdue_tasks(today).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(overdue, vec![a.as_str()]);
        assert!(db.overdue_tasks(yesterday).is_empty());

        let buckets = db.tasks_by_priority();
        assert_eq!(buckets[&Priority::High].len(), 2);
        assert_eq!(buckets[&Priority::Medium].len(), 1);
        assert!(buckets[&Priority::Critical].is_empty());
        assert_eq!(db.tasks_by_swimlane(Swimlane::Feature, Some("p1")).len(), 3);
        assert!(db.tasks_by_swimlane(Swimlane::Bug, None).is_empty());
    }

    #[test]
    fn comments_are_counted() {
        let mut db = board();
        let a = add(&mut db, "A", "todo");
        db.add_task_comment(&a, "first", Some("u1")).unwrap();
        let task = db.add_task_comment(&a, "second", None).unwrap();
        assert_eq!(task.comments_count, 2);
        assert_eq!(task.comments[0].author_id.as_deref(), Some("u1"));
    }

    #[test]
    fn tags_are_normalised() {
        let tags = split_and_normalise_tags(&["Front End, api".into(), "API".into()]);
        assert_eq!(tags, vec!["api", "front-end"]);
    }

    #[test]
    fn due_input_formats() {
        assert_eq!(
            parse_due_input("2024-02-29"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        let today = Local::now().date_naive();
        assert_eq!(parse_due_input("in 2w"), Some(today + Duration::days(14)));
        assert_eq!(parse_due_input("someday"), None);
    }

    #[test]
    fn save_and_load_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("board.json");
        let mut db = board();
        add(&mut db, "A", "todo");
        db.save(&path).unwrap();

        let loaded = Database::load(&path);
        assert_eq!(loaded.tasks, db.tasks);
        assert_eq!(loaded.columns.len(), 4);
    }

    #[test]
    fn malformed_snapshot_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(Database::load(&path).tasks.is_empty());
    }
}
