//! Terminal formatting for tasks, columns and roadmap items.

use chrono::NaiveDate;

use crate::column::Column;
use crate::fields::*;
use crate::roadmap::RoadmapItem;
use crate::task::Task;

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    let Some(d) = due else {
        return "-".into();
    };
    match (d - today).num_days() {
        0 => "today".into(),
        1 => "tomorrow".into(),
        n if n > 1 => format!("in {n}d"),
        n => format!("{}d late", -n),
    }
}

pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::Critical => "Critical",
        Priority::High => "High",
        Priority::Medium => "Medium",
        Priority::Low => "Low",
    }
}

pub fn format_swimlane(s: Swimlane) -> &'static str {
    match s {
        Swimlane::Feature => "Feature",
        Swimlane::Bug => "Bug",
        Swimlane::Chore => "Chore",
        Swimlane::Improvement => "Improvement",
        Swimlane::Research => "Research",
    }
}

pub fn format_roadmap_status(s: RoadmapStatus) -> &'static str {
    match s {
        RoadmapStatus::Planning => "Planning",
        RoadmapStatus::InProgress => "In Progress",
        RoadmapStatus::Done => "Done",
        RoadmapStatus::OnHold => "On Hold",
        RoadmapStatus::Cancelled => "Cancelled",
    }
}

pub fn format_project_status(s: ProjectStatus) -> &'static str {
    match s {
        ProjectStatus::Active => "Active",
        ProjectStatus::OnHold => "On Hold",
        ProjectStatus::Completed => "Completed",
        ProjectStatus::Archived => "Archived",
    }
}

/// Truncate a string to a maximum width, adding an ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Print tasks as a table.
pub fn print_task_table(tasks: &[&Task], today: NaiveDate) {
    println!(
        "{:<12} {:<12} {:<4} {:<9} {:<11} {:<10} {:<16} {}",
        "ID", "Column", "Pos", "Priority", "Lane", "Due", "Assignees", "Title [tags]"
    );
    for t in tasks {
        let tags = if t.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", t.tags.join(","))
        };
        let assignees = t.assignees();
        let assignees = if assignees.is_empty() {
            "-".to_string()
        } else {
            assignees.join(",")
        };
        println!(
            "{:<12} {:<12} {:<4} {:<9} {:<11} {:<10} {:<16} {}{}",
            truncate(&t.id, 12),
            truncate(&t.column_id, 12),
            t.position,
            format_priority(t.priority),
            format_swimlane(t.swimlane),
            format_due_relative(t.due_date, today),
            truncate(&assignees, 16),
            t.title,
            tags
        );
    }
}

/// Print one column heading followed by its cards.
pub fn print_board_column(column: &Column, tasks: &[&Task]) {
    let limit = column
        .task_limit
        .map(|l| format!("/{l}"))
        .unwrap_or_default();
    println!("== {} ({}{}) ==", column.title, tasks.len(), limit);
    if column.collapsed {
        println!("   (collapsed)");
        return;
    }
    for t in tasks {
        println!(
            "  {:>2}. {} [{}] #{}",
            t.position,
            t.title,
            format_priority(t.priority),
            t.id
        );
    }
}

pub fn print_roadmap_table(items: &[&RoadmapItem]) {
    println!(
        "{:<12} {:<12} {:<11} {:<11} {:<5} {:<6} {}",
        "ID", "Status", "Start", "End", "Prog", "Tasks", "Title"
    );
    for item in items {
        println!(
            "{:<12} {:<12} {:<11} {:<11} {:<5} {:<6} {}",
            truncate(&item.id, 12),
            format_roadmap_status(item.status),
            item.start_date,
            item.end_date,
            format!("{}%", item.progress),
            item.task_ids.len(),
            item.title
        );
    }
}
