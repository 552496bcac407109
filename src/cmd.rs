//! Command implementations for the CLI interface.
//!
//! This module holds the subcommand tree and one handler per command. Handlers
//! load the board, call the store, save when something changed and print a
//! short confirmation.

use std::path::Path;

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::column::{ColumnPatch, ColumnPlacement, NewColumn};
use crate::db::*;
use crate::error::{EntityKind, Error, Result};
use crate::fields::*;
use crate::filter::TaskFilter;
use crate::format::*;
use crate::prefs::Prefs;
use crate::project::{NewProject, ProjectPatch};
use crate::roadmap::{NewRoadmapItem, RoadmapPatch};
use crate::seed;
use crate::task::{NewTask, Task, TaskPatch};

#[derive(Subcommand)]
pub enum Commands {
    /// Create the board file.
    Init {
        /// Fill the board with the bundled sample data.
        #[arg(long)]
        sample: bool,
        /// Overwrite an existing board.
        #[arg(long)]
        force: bool,
    },

    /// Show the kanban board, column by column.
    Board {
        /// Project to show (defaults to the current project).
        #[arg(long)]
        project: Option<String>,
    },

    /// Pending, overdue and per-priority counts.
    Stats {
        /// Limit counts to one project.
        #[arg(long)]
        project: Option<String>,
    },

    /// Manage tasks.
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Manage board columns.
    Column {
        #[command(subcommand)]
        action: ColumnAction,
    },

    /// Manage roadmap items and their task links.
    Roadmap {
        #[command(subcommand)]
        action: RoadmapAction,
    },

    /// Manage projects.
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Manage users.
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// View or change UI preferences.
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Explicit id (a fresh one is generated if taken).
        #[arg(long)]
        id: Option<String>,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Project id (defaults to the current project).
        #[arg(long)]
        project: Option<String>,
        /// Column id (defaults to backlog).
        #[arg(long)]
        column: Option<String>,
        /// Position inside the column, 0 is the top. Appends when omitted.
        #[arg(long)]
        position: Option<usize>,
        #[arg(long, value_enum)]
        swimlane: Option<Swimlane>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Assignee user id. May be repeated; the first is the primary assignee.
        #[arg(long = "assignee")]
        assignees: Vec<String>,
        /// Comma-separated tags. May be repeated.
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "in Nd" or "in Nw".
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks with optional filters.
    List {
        /// Project id (defaults to the current project).
        #[arg(long)]
        project: Option<String>,
        /// Ignore the project scope.
        #[arg(long)]
        all_projects: bool,
        #[arg(long)]
        column: Option<String>,
        #[arg(long, value_enum)]
        swimlane: Option<Swimlane>,
        /// Any of these priorities. May be repeated.
        #[arg(long = "priority", value_enum)]
        priorities: Vec<Priority>,
        /// Any of these assignees. May be repeated.
        #[arg(long = "assignee")]
        assignees: Vec<String>,
        /// Any of these tags. May be repeated and comma-separated.
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Only tasks due on this day.
        #[arg(long)]
        due: Option<String>,
        /// Only overdue tasks.
        #[arg(long)]
        overdue: bool,
        /// Text to look for in title, description and tags.
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum, default_value_t = SortKey::Position)]
        sort: SortKey,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show a single task.
    View { id: String },

    /// Update fields on a task.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        /// Move the task to another project (appended to its column there).
        #[arg(long)]
        project: Option<String>,
        #[arg(long, value_enum)]
        swimlane: Option<Swimlane>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Replace the tag set. May be repeated and comma-separated.
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
    },

    /// Move a task to a column, optionally at a position.
    Move {
        id: String,
        column: String,
        #[arg(long)]
        position: Option<usize>,
    },

    /// Replace a task's assignees. No users clears them.
    Assign { id: String, users: Vec<String> },

    /// Add one assignee.
    AddAssignee { id: String, user: String },

    /// Remove one assignee.
    RmAssignee { id: String, user: String },

    /// Change a task's priority.
    Priority {
        id: String,
        #[arg(value_enum)]
        priority: Priority,
    },

    /// Comment on a task.
    Comment {
        id: String,
        body: String,
        #[arg(long)]
        author: Option<String>,
    },

    /// Delete one or more tasks.
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum ColumnAction {
    /// List columns left to right.
    List,
    /// Add a column.
    Add {
        title: String,
        #[arg(long)]
        id: Option<String>,
        /// Insert as the first column.
        #[arg(long, conflicts_with = "after")]
        start: bool,
        /// Insert after this column id.
        #[arg(long)]
        after: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        /// Work-in-progress limit per project.
        #[arg(long)]
        limit: Option<usize>,
        /// Slot incoming tasks by priority.
        #[arg(long)]
        auto_sort: bool,
        /// Refuse tasks moved in from other columns.
        #[arg(long)]
        no_drop: bool,
    },
    /// Update a column.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, conflicts_with = "limit")]
        clear_limit: bool,
        #[arg(long)]
        auto_sort: Option<bool>,
        #[arg(long)]
        allow_drop: Option<bool>,
    },
    /// Delete a column.
    Delete {
        id: String,
        /// Column that receives the deleted column's tasks.
        #[arg(long)]
        relocate_to: Option<String>,
    },
    /// Set the left-to-right order. Every column id must appear once.
    Reorder {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Collapse (or expand) a column.
    Collapse {
        id: String,
        #[arg(long)]
        expand: bool,
    },
}

#[derive(Subcommand)]
pub enum RoadmapAction {
    /// List roadmap items.
    List {
        #[arg(long)]
        project: Option<String>,
    },
    /// Add a roadmap item.
    Add {
        title: String,
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long, value_enum)]
        status: Option<RoadmapStatus>,
    },
    /// Update a roadmap item.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long, value_enum)]
        status: Option<RoadmapStatus>,
        /// Percent complete, capped at 100.
        #[arg(long)]
        progress: Option<u8>,
    },
    /// Delete a roadmap item.
    Delete { id: String },
    /// Link a task to a roadmap item.
    Link { item: String, task: String },
    /// Unlink a task from a roadmap item.
    Unlink { item: String, task: String },
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// List projects.
    List,
    /// Add a project.
    Add {
        name: String,
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        /// Team id. May be repeated.
        #[arg(long = "team")]
        teams: Vec<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Update a project.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long, value_enum)]
        status: Option<ProjectStatus>,
    },
    /// Make a project current.
    Use { id: String },
    /// Delete a project with its tasks and roadmap items.
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// List users.
    List,
    /// Delete a user and remove them from every team and task.
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Print the current preferences.
    Show,
    /// Set the colour theme.
    Theme {
        #[arg(value_enum)]
        theme: Theme,
    },
    /// Switch between light and dark.
    ToggleTheme,
    /// Open or close the sidebar.
    ToggleSidebar,
    /// Set the locale.
    Locale { locale: String },
}

/// Dispatch a parsed command line.
pub fn run(cli: crate::cli::Cli) -> Result<()> {
    let db_path = cli.db_path();
    let prefs_path = cli.prefs_path();
    match cli.command {
        Commands::Init { sample, force } => cmd_init(&db_path, sample, force),
        Commands::Board { project } => cmd_board(&Database::load(&db_path), project),
        Commands::Stats { project } => cmd_stats(&Database::load(&db_path), project),
        Commands::Task { action } => cmd_task(&mut Database::load(&db_path), &db_path, action),
        Commands::Column { action } => cmd_column(&mut Database::load(&db_path), &db_path, action),
        Commands::Roadmap { action } => {
            cmd_roadmap(&mut Database::load(&db_path), &db_path, action)
        }
        Commands::Project { action } => {
            cmd_project(&mut Database::load(&db_path), &db_path, action)
        }
        Commands::User { action } => cmd_user(&mut Database::load(&db_path), &db_path, action),
        Commands::Prefs { action } => {
            cmd_prefs(&prefs_path, action);
            Ok(())
        }
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_date_arg(input: &str) -> Result<NaiveDate> {
    parse_due_input(input).ok_or_else(|| {
        Error::Validation(format!(
            "unrecognised date '{input}'. Use YYYY-MM-DD, 'today', 'tomorrow', 'in Nd' or 'in Nw'"
        ))
    })
}

/// The explicit project, else the current one.
fn project_scope(db: &Database, explicit: Option<String>) -> Option<String> {
    explicit.or_else(|| db.current_project_id.clone())
}

/// Create the board file, with default columns or the sample data.
pub fn cmd_init(db_path: &Path, sample: bool, force: bool) -> Result<()> {
    if db_path.exists() && !force {
        return Err(Error::Validation(format!(
            "board already exists at {} (use --force to overwrite)",
            db_path.display()
        )));
    }
    let db = if sample {
        let mut db = Database::default();
        db.initialize(seed::sample()?);
        db
    } else {
        let mut db = Database::default();
        for (id, title) in [
            ("backlog", "Backlog"),
            ("todo", "To Do"),
            ("in-progress", "In Progress"),
            ("done", "Done"),
        ] {
            db.create_column(NewColumn {
                id: Some(id.into()),
                title: title.into(),
                ..Default::default()
            });
        }
        db
    };
    db.save(db_path)?;
    println!("Initialised board at {}", db_path.display());
    Ok(())
}

/// Print every column of a project's board.
pub fn cmd_board(db: &Database, project: Option<String>) -> Result<()> {
    let scope = project_scope(db, project);
    if let Some(p) = &scope {
        let name = db.project(p).map(|p| p.name.as_str()).unwrap_or(p.as_str());
        println!("Board: {name}\n");
    }
    for column in db.columns_ordered() {
        let tasks = db.tasks_by_column(&column.id, scope.as_deref());
        print_board_column(column, &tasks);
        println!();
    }
    Ok(())
}

pub fn cmd_stats(db: &Database, project: Option<String>) -> Result<()> {
    let in_scope = |t: &Task| project.as_deref().map_or(true, |p| t.project_id == p);
    let pending = db
        .list_tasks(|t| in_scope(t) && !crate::column::is_closed_column(&t.column_id))
        .len();
    let overdue = db.overdue_tasks(today());
    println!("{:<12} {}", "Pending", pending);
    println!(
        "{:<12} {}",
        "Overdue",
        overdue.into_iter().filter(|t| in_scope(t)).count()
    );
    for (priority, tasks) in db.tasks_by_priority() {
        println!(
            "{:<12} {}",
            format_priority(priority),
            tasks.into_iter().filter(|t| in_scope(t)).count()
        );
    }
    Ok(())
}

pub fn cmd_task(db: &mut Database, db_path: &Path, action: TaskAction) -> Result<()> {
    match action {
        TaskAction::Add {
            title, id, desc, project, column, position, swimlane, priority,
            assignees, tags, due,
        } => {
            let due_date = due.as_deref().map(parse_date_arg).transpose()?;
            let project_id = project_scope(db, project);
            let task = db.create_task(NewTask {
                id,
                title,
                description: desc,
                project_id,
                column_id: column,
                swimlane,
                priority,
                position,
                assignee_id: None,
                assignee_ids: assignees,
                tags: split_and_normalise_tags(&tags),
                due_date,
            });
            db.save(db_path)?;
            println!("Added task {} to {} at position {}", task.id, task.column_id, task.position);
        }

        TaskAction::List {
            project, all_projects, column, swimlane, priorities, assignees, tags, due,
            overdue, search, sort, limit,
        } => {
            let filter = TaskFilter {
                project_id: if all_projects { None } else { project_scope(db, project) },
                column_id: column,
                swimlane,
                assignees: Some(assignees).filter(|a| !a.is_empty()),
                priorities: Some(priorities).filter(|p| !p.is_empty()),
                tags: Some(split_and_normalise_tags(&tags)).filter(|t| !t.is_empty()),
                due_on: due.as_deref().map(parse_date_arg).transpose()?,
            };
            let today = today();
            let mut tasks = db.filter_tasks(&filter);
            if overdue {
                let late: Vec<&str> = db.overdue_tasks(today).into_iter().map(|t| t.id.as_str()).collect();
                tasks.retain(|t| late.contains(&t.id.as_str()));
            }
            if let Some(query) = search {
                let hits: Vec<&str> = db
                    .search_tasks(&query, filter.project_id.as_deref())
                    .into_iter()
                    .map(|t| t.id.as_str())
                    .collect();
                tasks.retain(|t| hits.contains(&t.id.as_str()));
            }
            sort_tasks(db, &mut tasks, sort);
            if let Some(n) = limit {
                tasks.truncate(n);
            }
            print_task_table(&tasks, today);
        }

        TaskAction::View { id } => {
            let task = db
                .task(&id)
                .ok_or_else(|| Error::not_found(EntityKind::Task, id.clone()))?;
            print_task_detail(db, task);
        }

        TaskAction::Update {
            id, title, desc, project, swimlane, priority, tags, due, clear_due,
        } => {
            let due_date = if clear_due {
                Some(None)
            } else {
                due.as_deref().map(parse_date_arg).transpose()?.map(Some)
            };
            let patch = TaskPatch {
                title,
                description: desc,
                project_id: project,
                swimlane,
                priority,
                tags: Some(split_and_normalise_tags(&tags)).filter(|t| !t.is_empty()),
                due_date,
                ..Default::default()
            };
            let task = db.update_task(&id, patch)?;
            db.save(db_path)?;
            println!("Updated task {}", task.id);
        }

        TaskAction::Move { id, column, position } => {
            let task = db.move_task(&id, &column, position)?;
            db.save(db_path)?;
            println!("Moved task {} to {} at position {}", task.id, task.column_id, task.position);
        }

        TaskAction::Assign { id, users } => {
            let task = db.set_assignees(&id, &users)?;
            db.save(db_path)?;
            println!("Assignees for {}: {}", task.id, describe_assignees(&task));
        }

        TaskAction::AddAssignee { id, user } => {
            let task = db.add_assignee(&id, &user)?;
            db.save(db_path)?;
            println!("Assignees for {}: {}", task.id, describe_assignees(&task));
        }

        TaskAction::RmAssignee { id, user } => {
            let task = db.remove_assignee(&id, &user)?;
            db.save(db_path)?;
            println!("Assignees for {}: {}", task.id, describe_assignees(&task));
        }

        TaskAction::Priority { id, priority } => {
            let task = db.update_task_priority(&id, priority)?;
            db.save(db_path)?;
            println!("Task {} is now {}", task.id, format_priority(task.priority));
        }

        TaskAction::Comment { id, body, author } => {
            let task = db.add_task_comment(&id, &body, author.as_deref())?;
            db.save(db_path)?;
            println!("Task {} has {} comment(s)", task.id, task.comments_count);
        }

        TaskAction::Delete { ids } => {
            let removed = db.bulk_delete_tasks(&ids);
            db.save(db_path)?;
            println!("Deleted {removed} task(s)");
        }
    }
    Ok(())
}

fn describe_assignees(task: &Task) -> String {
    if task.assignee_ids.is_empty() {
        "-".into()
    } else {
        task.assignee_ids.join(", ")
    }
}

fn sort_tasks(db: &Database, tasks: &mut [&Task], sort: SortKey) {
    let column_order = |t: &Task| db.column(&t.column_id).map_or(usize::MAX, |c| c.order);
    match sort {
        SortKey::Position => tasks.sort_by_key(|t| (column_order(t), t.project_id.clone(), t.position)),
        SortKey::Priority => tasks.sort_by_key(|t| (t.priority, column_order(t), t.position)),
        SortKey::Due => tasks.sort_by_key(|t| (t.due_date.unwrap_or(NaiveDate::MAX), t.id.clone())),
        SortKey::Updated => tasks.sort_by_key(|t| std::cmp::Reverse(t.updated_at)),
    }
}

fn print_task_detail(db: &Database, task: &Task) {
    let user_name = |id: &str| {
        db.user(id)
            .map(|u| format!("{} ({id})", u.name))
            .unwrap_or_else(|| id.to_string())
    };
    let linked: Vec<&str> = db
        .roadmap_items
        .iter()
        .filter(|i| i.task_ids.contains(&task.id))
        .map(|i| i.title.as_str())
        .collect();

    println!("ID:           {}", task.id);
    println!("Title:        {}", task.title);
    println!("Project:      {}", if task.project_id.is_empty() { "-" } else { task.project_id.as_str() });
    println!("Column:       {} (position {})", task.column_id, task.position);
    println!("Priority:     {}", format_priority(task.priority));
    println!("Swimlane:     {}", format_swimlane(task.swimlane));
    println!(
        "Assignees:    {}",
        if task.assignee_ids.is_empty() {
            "-".to_string()
        } else {
            task.assignee_ids.iter().map(|u| user_name(u.as_str())).collect::<Vec<_>>().join(", ")
        }
    );
    println!("Due:          {}", match task.due_date {
        Some(d) => format!("{d} ({})", format_due_relative(Some(d), today())),
        None => "-".into(),
    });
    println!("Tags:         {}", if task.tags.is_empty() { "-".into() } else { task.tags.join(",") });
    println!("Subtasks:     {}/{}", task.completed_subtasks, task.subtasks_count);
    println!("Roadmap:      {}", if linked.is_empty() { "-".into() } else { linked.join(", ") });
    println!("Created UTC:  {}", task.created_at.to_rfc3339());
    println!("Updated UTC:  {}", task.updated_at.to_rfc3339());
    println!("Description:\n{}\n", if task.description.is_empty() { "-" } else { task.description.as_str() });
    println!("Comments ({}):", task.comments_count);
    for c in &task.comments {
        let author = c.author_id.as_deref().map(|a| user_name(a)).unwrap_or_else(|| "anonymous".into());
        println!("  [{}] {}: {}", c.created_at.format("%Y-%m-%d %H:%M"), author, c.body);
    }
}

pub fn cmd_column(db: &mut Database, db_path: &Path, action: ColumnAction) -> Result<()> {
    match action {
        ColumnAction::List => {
            println!("{:<5} {:<14} {:<16} {:<6} {:<6} {}", "Order", "ID", "Title", "Tasks", "Limit", "Flags");
            for c in db.columns_ordered() {
                let mut flags = Vec::new();
                if c.collapsed {
                    flags.push("collapsed");
                }
                if c.auto_sort {
                    flags.push("auto-sort");
                }
                if !c.allow_drop {
                    flags.push("no-drop");
                }
                println!(
                    "{:<5} {:<14} {:<16} {:<6} {:<6} {}",
                    c.order,
                    truncate(&c.id, 14),
                    truncate(&c.title, 16),
                    db.tasks_by_column(&c.id, None).len(),
                    c.task_limit.map(|l| l.to_string()).unwrap_or_else(|| "-".into()),
                    flags.join(",")
                );
            }
        }

        ColumnAction::Add {
            title, id, start, after, color, desc, limit, auto_sort, no_drop,
        } => {
            let placement = match (start, after) {
                (true, _) => ColumnPlacement::Start,
                (false, Some(anchor)) => ColumnPlacement::After(anchor),
                (false, None) => ColumnPlacement::End,
            };
            let column = db.create_column(NewColumn {
                id,
                title,
                color,
                placement,
                collapsed: false,
                allow_drop: Some(!no_drop),
                auto_sort,
                task_limit: limit,
                description: desc,
            });
            db.save(db_path)?;
            println!("Added column {} at order {}", column.id, column.order);
        }

        ColumnAction::Update {
            id, title, color, desc, limit, clear_limit, auto_sort, allow_drop,
        } => {
            let task_limit = if clear_limit { Some(None) } else { limit.map(Some) };
            let column = db.update_column(
                &id,
                ColumnPatch {
                    title,
                    color,
                    description: desc,
                    collapsed: None,
                    allow_drop,
                    auto_sort,
                    task_limit,
                },
            )?;
            db.save(db_path)?;
            println!("Updated column {}", column.id);
        }

        ColumnAction::Delete { id, relocate_to } => {
            if db.delete_column(&id, relocate_to.as_deref())? {
                db.save(db_path)?;
                println!("Deleted column {id}");
            } else {
                println!("No column {id}");
            }
        }

        ColumnAction::Reorder { ids } => {
            db.reorder_columns(&ids)?;
            db.save(db_path)?;
            println!("Columns: {}", ids.join(" -> "));
        }

        ColumnAction::Collapse { id, expand } => {
            let column = db.set_column_collapsed(&id, !expand)?;
            db.save(db_path)?;
            println!(
                "Column {} {}",
                column.id,
                if column.collapsed { "collapsed" } else { "expanded" }
            );
        }
    }
    Ok(())
}

pub fn cmd_roadmap(db: &mut Database, db_path: &Path, action: RoadmapAction) -> Result<()> {
    match action {
        RoadmapAction::List { project } => {
            let items: Vec<_> = match project_scope(db, project) {
                Some(p) => db.roadmap_by_project(&p),
                None => db.roadmap_items.iter().collect(),
            };
            print_roadmap_table(&items);
        }

        RoadmapAction::Add { title, project, desc, start, end, status } => {
            let project_id = project_scope(db, project);
            let item = db.create_roadmap_item(NewRoadmapItem {
                id: None,
                title,
                description: desc,
                project_id,
                start_date: start.as_deref().map(parse_date_arg).transpose()?,
                end_date: end.as_deref().map(parse_date_arg).transpose()?,
                status,
                progress: None,
            });
            db.save(db_path)?;
            println!("Added roadmap item {}", item.id);
        }

        RoadmapAction::Update { id, title, desc, start, end, status, progress } => {
            let item = db.update_roadmap_item(
                &id,
                RoadmapPatch {
                    title,
                    description: desc,
                    project_id: None,
                    start_date: start.as_deref().map(parse_date_arg).transpose()?,
                    end_date: end.as_deref().map(parse_date_arg).transpose()?,
                    status,
                    progress,
                },
            )?;
            db.save(db_path)?;
            println!("Updated roadmap item {} ({}%)", item.id, item.progress);
        }

        RoadmapAction::Delete { id } => {
            if db.delete_roadmap_item(&id) {
                db.save(db_path)?;
                println!("Deleted roadmap item {id}");
            } else {
                println!("No roadmap item {id}");
            }
        }

        RoadmapAction::Link { item, task } => {
            let updated = db.link_task_to_roadmap(&item, &task)?;
            db.save(db_path)?;
            println!("{} links {} task(s)", updated.id, updated.task_ids.len());
        }

        RoadmapAction::Unlink { item, task } => {
            let updated = db.unlink_task_from_roadmap(&item, &task)?;
            db.save(db_path)?;
            println!("{} links {} task(s)", updated.id, updated.task_ids.len());
        }
    }
    Ok(())
}

pub fn cmd_project(db: &mut Database, db_path: &Path, action: ProjectAction) -> Result<()> {
    match action {
        ProjectAction::List => {
            println!("{:<2} {:<14} {:<10} {:<6} {}", "", "ID", "Status", "Tasks", "Name");
            for p in &db.projects {
                let marker = if db.current_project_id.as_deref() == Some(p.id.as_str()) { "*" } else { "" };
                println!(
                    "{:<2} {:<14} {:<10} {:<6} {}",
                    marker,
                    truncate(&p.id, 14),
                    format_project_status(p.status),
                    db.tasks_by_project(&p.id).len(),
                    p.name
                );
            }
        }

        ProjectAction::Add { name, id, desc, teams, color } => {
            let project = db.create_project(NewProject {
                id,
                name,
                description: desc,
                team_ids: teams,
                color,
            });
            db.save(db_path)?;
            println!("Added project {}", project.id);
        }

        ProjectAction::Update { id, name, desc, status } => {
            let project = db.update_project(
                &id,
                ProjectPatch {
                    name,
                    description: desc,
                    status,
                    ..Default::default()
                },
            )?;
            db.save(db_path)?;
            println!("Updated project {}", project.id);
        }

        ProjectAction::Use { id } => {
            db.set_current_project(&id)?;
            db.save(db_path)?;
            println!("Current project: {id}");
        }

        ProjectAction::Delete { id } => {
            if db.delete_project(&id) {
                db.save(db_path)?;
                println!("Deleted project {id}");
            } else {
                println!("No project {id}");
            }
        }
    }
    Ok(())
}

pub fn cmd_user(db: &mut Database, db_path: &Path, action: UserAction) -> Result<()> {
    match action {
        UserAction::List => {
            println!("{:<12} {:<20} {:<12} {}", "ID", "Name", "Role", "Email");
            for u in &db.users {
                println!(
                    "{:<12} {:<20} {:<12} {}",
                    truncate(&u.id, 12),
                    truncate(&u.name, 20),
                    u.role.as_deref().unwrap_or("-"),
                    u.email.as_deref().unwrap_or("-")
                );
            }
        }

        UserAction::Delete { id } => {
            let existed = db.delete_user(&id);
            db.save(db_path)?;
            if existed {
                println!("Deleted user {id}");
            } else {
                println!("No user {id}; cleared any remaining references");
            }
        }
    }
    Ok(())
}

/// Preference changes never fail; a save problem is only logged.
pub fn cmd_prefs(prefs_path: &Path, action: PrefsAction) {
    let mut prefs = Prefs::load(prefs_path);
    match action {
        PrefsAction::Show => {
            println!("Theme:    {:?}", prefs.theme);
            println!("Locale:   {}", prefs.locale);
            println!("Sidebar:  {}", if prefs.sidebar_open { "open" } else { "closed" });
            return;
        }
        PrefsAction::Theme { theme } => prefs.theme = theme,
        PrefsAction::ToggleTheme => prefs.toggle_theme(),
        PrefsAction::ToggleSidebar => prefs.toggle_sidebar(),
        PrefsAction::Locale { locale } => prefs.locale = locale,
    }
    prefs.save(prefs_path);
    println!("Preferences updated");
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
