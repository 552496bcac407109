//! Projects, teams and users.
//!
//! The registry is mostly seed-loaded. Projects can be created, edited,
//! selected and deleted here; deleting a project or a user cleans every
//! reference to it out of the rest of the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::db::Database;
use crate::error::{EntityKind, Error, Result};
use crate::fields::ProjectStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub team_ids: Vec<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub team_ids: Vec<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub team_ids: Option<Vec<String>>,
    pub color: Option<Option<String>>,
}

impl Database {
    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    pub fn team(&self, team_id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    pub fn current_project(&self) -> Option<&Project> {
        self.current_project_id
            .as_deref()
            .and_then(|id| self.project(id))
    }

    /// Teams attached to the current project.
    pub fn project_teams(&self) -> Vec<&Team> {
        let Some(project) = self.current_project() else {
            return Vec::new();
        };
        self.teams
            .iter()
            .filter(|t| project.team_ids.contains(&t.id))
            .collect()
    }

    /// Users belonging to any team of the current project.
    pub fn project_users(&self) -> Vec<&User> {
        let teams = self.project_teams();
        self.users
            .iter()
            .filter(|u| teams.iter().any(|t| t.members.contains(&u.id)))
            .collect()
    }

    pub fn set_current_project(&mut self, project_id: &str) -> Result<()> {
        let result = match self.project(project_id) {
            Some(_) => {
                self.current_project_id = Some(project_id.to_string());
                Ok(())
            }
            None => Err(Error::not_found(EntityKind::Project, project_id)),
        };
        self.record_outcome(result)
    }

    /// New projects start active.
    pub fn create_project(&mut self, new: NewProject) -> Project {
        let now = Utc::now();
        let projects = &self.projects;
        let id = self
            .ids
            .claim(new.id, "project", |c| projects.iter().any(|p| p.id == c));
        let project = Project {
            id,
            name: new.name,
            description: new.description.unwrap_or_default(),
            status: ProjectStatus::Active,
            team_ids: new.team_ids,
            color: new.color,
            created_at: now,
            updated_at: now,
        };
        debug!(project = %project.id, "created project");
        self.projects.push(project.clone());
        if self.current_project_id.is_none() {
            self.current_project_id = Some(project.id.clone());
        }
        project
    }

    pub fn update_project(&mut self, project_id: &str, patch: ProjectPatch) -> Result<Project> {
        let result = match self.projects.iter_mut().find(|p| p.id == project_id) {
            Some(project) => {
                if let Some(name) = patch.name {
                    project.name = name;
                }
                if let Some(description) = patch.description {
                    project.description = description;
                }
                if let Some(status) = patch.status {
                    project.status = status;
                }
                if let Some(team_ids) = patch.team_ids {
                    project.team_ids = team_ids;
                }
                if let Some(color) = patch.color {
                    project.color = color;
                }
                project.updated_at = Utc::now();
                Ok(project.clone())
            }
            None => Err(Error::not_found(EntityKind::Project, project_id)),
        };
        self.record_outcome(result)
    }

    /// Delete a project with its tasks and roadmap items. If it was current, the
    /// first remaining project becomes current. Returns `false` when no such
    /// project exists.
    pub fn delete_project(&mut self, project_id: &str) -> bool {
        let Some(index) = self.projects.iter().position(|p| p.id == project_id) else {
            debug!(project = project_id, "delete of unknown project ignored");
            return false;
        };
        self.projects.remove(index);

        let doomed: Vec<String> = self
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .map(|t| t.id.clone())
            .collect();
        for task_id in &doomed {
            self.delete_task(task_id);
        }
        self.roadmap_items.retain(|i| i.project_id != project_id);

        if self.current_project_id.as_deref() == Some(project_id) {
            self.current_project_id = self.projects.first().map(|p| p.id.clone());
        }
        info!(project = project_id, tasks = doomed.len(), "deleted project");
        true
    }

    /// Remove a user everywhere: the registry, team memberships and task
    /// assignments. Returns `false` when the user was not registered.
    pub fn delete_user(&mut self, user_id: &str) -> bool {
        let before = self.users.len();
        self.users.retain(|u| u.id != user_id);
        let existed = self.users.len() != before;

        for team in self.teams.iter_mut() {
            team.members.retain(|m| m != user_id);
        }
        let tasks = self.purge_assignee(user_id);
        info!(user = user_id, existed, tasks, "deleted user");
        existed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roadmap::NewRoadmapItem;
    use crate::task::NewTask;

    fn registry() -> Database {
        let mut db = Database::default();
        db.users = ["u1", "u2", "u3"]
            .iter()
            .map(|id| User {
                id: id.to_string(),
                name: id.to_uppercase(),
                email: None,
                role: None,
            })
            .collect();
        db.teams = vec![
            Team {
                id: "t1".into(),
                name: "Core".into(),
                members: vec!["u1".into(), "u2".into()],
            },
            Team {
                id: "t2".into(),
                name: "Ops".into(),
                members: vec!["u3".into(), "u1".into()],
            },
        ];
        db.create_project(NewProject {
            id: Some("p1".into()),
            name: "Website".into(),
            team_ids: vec!["t1".into()],
            ..Default::default()
        });
        db
    }

    #[test]
    fn first_project_becomes_current() {
        let db = registry();
        assert_eq!(db.current_project().map(|p| p.id.as_str()), Some("p1"));
        let teams: Vec<&str> = db.project_teams().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(teams, vec!["t1"]);
        let users: Vec<&str> = db.project_users().iter().map(|u| u.id.as_str()).collect();
        assert_eq!(users, vec!["u1", "u2"]);
    }

    #[test]
    fn deleting_user_cascades() {
        let mut db = registry();
        let task = db
            .create_task(NewTask {
                title: "Launch".into(),
                assignee_ids: vec!["u1".into(), "u3".into()],
                ..Default::default()
            })
            .id;
        assert!(db.delete_user("u1"));
        assert!(db.user("u1").is_none());
        assert!(db.teams.iter().all(|t| !t.members.contains(&"u1".to_string())));
        let task = db.task(&task).unwrap();
        assert_eq!(task.assignee_ids, vec!["u3"]);
        assert_eq!(task.assignee_id.as_deref(), Some("u3"));
        assert!(!db.delete_user("u1"));
    }

    #[test]
    fn deleting_project_cascades() {
        let mut db = registry();
        db.create_project(NewProject {
            id: Some("p2".into()),
            name: "App".into(),
            ..Default::default()
        });
        let doomed = db
            .create_task(NewTask {
                title: "Old".into(),
                project_id: Some("p1".into()),
                ..Default::default()
            })
            .id;
        let kept = db
            .create_task(NewTask {
                title: "New".into(),
                project_id: Some("p2".into()),
                ..Default::default()
            })
            .id;
        let item = db
            .create_roadmap_item(NewRoadmapItem {
                title: "Cross-project".into(),
                project_id: Some("p2".into()),
                ..Default::default()
            })
            .id;
        db.link_task_to_roadmap(&item, &doomed).unwrap();
        db.create_roadmap_item(NewRoadmapItem {
            title: "Gone".into(),
            project_id: Some("p1".into()),
            ..Default::default()
        });

        assert!(db.delete_project("p1"));
        assert!(db.task(&doomed).is_none());
        assert!(db.task(&kept).is_some());
        assert_eq!(db.roadmap_items.len(), 1);
        assert!(db.roadmap_items[0].task_ids.is_empty());
        assert_eq!(db.current_project_id.as_deref(), Some("p2"));
        assert!(!db.delete_project("p1"));
    }

    #[test]
    fn selecting_unknown_project_fails() {
        let mut db = registry();
        assert!(db.set_current_project("p9").is_err());
        assert_eq!(db.current_project_id.as_deref(), Some("p1"));
    }
}
