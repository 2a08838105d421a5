//! Command implementations for the Command Center CLI.
//!
//! This module contains the business logic for each CLI command. Commands are
//! organized by entity type (project, task, subtask, comment, timer, template,
//! notification) plus the derived views (board, stats, search, activity) and
//! snapshot management (export/import/clear).
//!
//! Every command returns a result type implementing [`Output`], which main
//! prints as compact JSON (the default) or human-readable text (`-H`). The
//! command layer is also the view boundary: empty required fields are
//! rejected here with `Error::InvalidInput` before they reach the store,
//! missing ids are mapped from the store's `Option`/`bool` returns to
//! `Error::NotFound`, and `task move` refuses a move to done while blockers
//! are unresolved (`Error::Blocked`) unless forced.

use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;

use crate::models::team;
use crate::models::{
    ActivityEntry, Comment, Notification, Priority, Project, ProjectStatus, Settings, Subtask,
    Task, TaskStatus, Template, Theme, TimeEntry,
};
use crate::store::{
    NewProject, NewTask, NewTemplate, ProjectUpdate, SearchHit, Stats, Store, TaskFilter,
    TaskUpdate,
};
use crate::{Error, Result};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output: Serialize {
    /// Serialize to JSON string.
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"error":"serialize failed"}"#.into())
    }

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

// === Parsing & validation helpers ===

fn require_text(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{} cannot be empty", what)));
    }
    Ok(())
}

fn parse_task_status(s: &str) -> Result<TaskStatus> {
    s.parse().map_err(Error::InvalidInput)
}

fn parse_project_status(s: &str) -> Result<ProjectStatus> {
    s.parse().map_err(Error::InvalidInput)
}

fn parse_priority(s: &str) -> Result<Priority> {
    s.parse().map_err(Error::InvalidInput)
}

fn parse_theme(s: &str) -> Result<Theme> {
    s.parse().map_err(Error::InvalidInput)
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| Error::InvalidInput(format!("Invalid date (expected YYYY-MM-DD): {}", s)))
}

fn task_not_found(id: &str) -> Error {
    Error::NotFound(format!("Task {}", id))
}

fn project_not_found(id: &str) -> Error {
    Error::NotFound(format!("Project {}", id))
}

/// Format a millisecond duration as "2h 15m", "3m 10s", or "45s".
fn format_ms(ms: i64) -> String {
    let secs = ms / 1000;
    let (hours, mins) = (secs / 3600, (secs % 3600) / 60);
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs % 60)
    } else {
        format!("{}s", secs)
    }
}

/// Ten-cell progress bar, e.g. `[████░░░░░░] 40%`.
fn progress_bar(pct: u8) -> String {
    let filled = ((pct as usize * 10) + 50) / 100;
    format!("[{}{}] {}%", "█".repeat(filled), "░".repeat(10 - filled), pct)
}

fn local_stamp(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

// === Projects ===

/// Payload of `project create`: the created project.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ProjectCreated(pub Project);

impl Output for ProjectCreated {
    fn to_human(&self) -> String {
        format!("Created project {}: \"{}\"", self.0.id, self.0.name)
    }
}

pub fn project_create(
    store: &mut Store,
    name: String,
    description: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    assignees: Vec<String>,
    color: Option<String>,
) -> Result<ProjectCreated> {
    require_text(&name, "Project name")?;
    let project = store.create_project(NewProject {
        name: Some(name),
        description,
        status: status.as_deref().map(parse_project_status).transpose()?,
        priority: priority.as_deref().map(parse_priority).transpose()?,
        assignees: if assignees.is_empty() {
            None
        } else {
            Some(assignees)
        },
        color,
        ..Default::default()
    });
    Ok(ProjectCreated(project))
}

#[derive(Debug, Serialize)]
pub struct ProjectList {
    pub count: usize,
    pub projects: Vec<Project>,
}

impl Output for ProjectList {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("{} project(s)", self.count)];
        for p in &self.projects {
            lines.push(format!(
                "  {}  {:<10} [{}] \"{}\"",
                p.id, p.status, p.priority, p.name
            ));
        }
        lines.join("\n")
    }
}

pub fn project_list(store: &Store) -> Result<ProjectList> {
    let projects = store.list_projects();
    Ok(ProjectList {
        count: projects.len(),
        projects,
    })
}

/// Payload of `project show`: the project, its tasks, and its activity feed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    pub project: Project,
    pub tasks: Vec<Task>,
    pub activity: Vec<ActivityEntry>,
}

impl Output for ProjectDetail {
    fn to_human(&self) -> String {
        let p = &self.project;
        let done = self
            .tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Done)
            .count();
        let mut lines = vec![
            format!("Project {}: \"{}\" ({})", p.id, p.name, p.status),
            format!("  Priority:  {}", p.priority),
            format!("  Color:     {}", p.color),
        ];
        if !p.description.is_empty() {
            lines.push(format!("  About:     {}", p.description));
        }
        if !p.assignees.is_empty() {
            lines.push(format!("  Assignees: {}", p.assignees.join(", ")));
        }
        for m in &p.milestones {
            let mark = if m.completed { "x" } else { " " };
            lines.push(format!("  Milestone: [{}] {} ({})", mark, m.name, m.date));
        }
        lines.push(format!("  Tasks:     {} ({} done)", self.tasks.len(), done));
        for t in &self.tasks {
            lines.push(format!("    {}  {:<12} \"{}\"", t.id, t.status, t.title));
        }

        // The feed interleaves project-level entries with each task's own
        // history, newest first, the way the project pane rendered it.
        let mut feed: Vec<(DateTime<Utc>, String)> = self
            .activity
            .iter()
            .map(|e| (e.timestamp, format!("{} ({})", e.details, e.by)))
            .collect();
        for t in &self.tasks {
            for a in &t.activity_log {
                feed.push((a.timestamp, format!("[{}] {} ({})", t.title, a.action, a.by)));
            }
        }
        feed.sort_by(|a, b| b.0.cmp(&a.0));
        feed.truncate(10);
        if !feed.is_empty() {
            lines.push("  Recent activity:".to_string());
            for (at, row) in &feed {
                lines.push(format!("    [{}] {}", local_stamp(at), row));
            }
        }
        lines.join("\n")
    }
}

pub fn project_show(store: &Store, id: &str) -> Result<ProjectDetail> {
    let project = store.get_project(id).ok_or_else(|| project_not_found(id))?;
    let tasks = store.list_tasks(&TaskFilter {
        project_id: Some(id.to_string()),
        ..Default::default()
    });
    Ok(ProjectDetail {
        project,
        tasks,
        activity: store.get_activity_for_project(id),
    })
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ProjectUpdated(pub Project);

impl Output for ProjectUpdated {
    fn to_human(&self) -> String {
        format!("Updated project {}: \"{}\"", self.0.id, self.0.name)
    }
}

pub fn project_update(
    store: &mut Store,
    id: &str,
    name: Option<String>,
    description: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    color: Option<String>,
) -> Result<ProjectUpdated> {
    if let Some(ref name) = name {
        require_text(name, "Project name")?;
    }
    let update = ProjectUpdate {
        name,
        description,
        status: status.as_deref().map(parse_project_status).transpose()?,
        priority: priority.as_deref().map(parse_priority).transpose()?,
        color,
        ..Default::default()
    };
    let project = store
        .update_project(id, update)
        .ok_or_else(|| project_not_found(id))?;
    Ok(ProjectUpdated(project))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDeleted {
    pub id: String,
    pub name: String,
    pub tasks_deleted: usize,
    pub deleted: bool,
}

impl Output for ProjectDeleted {
    fn to_human(&self) -> String {
        format!(
            "Deleted project {}: \"{}\" and {} task(s)",
            self.id, self.name, self.tasks_deleted
        )
    }
}

pub fn project_delete(store: &mut Store, id: &str) -> Result<ProjectDeleted> {
    let project = store.get_project(id).ok_or_else(|| project_not_found(id))?;
    let tasks_deleted = store
        .list_tasks(&TaskFilter {
            project_id: Some(id.to_string()),
            ..Default::default()
        })
        .len();
    store.delete_project(id);
    Ok(ProjectDeleted {
        id: project.id,
        name: project.name,
        tasks_deleted,
        deleted: true,
    })
}

// === Tasks ===

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct TaskCreated(pub Task);

impl Output for TaskCreated {
    fn to_human(&self) -> String {
        format!("Created task {}: \"{}\"", self.0.id, self.0.title)
    }
}

#[allow(clippy::too_many_arguments)]
pub fn task_create(
    store: &mut Store,
    title: String,
    project: Option<String>,
    description: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    assignee: Option<String>,
    tags: Vec<String>,
    due: Option<String>,
    estimate: Option<f64>,
    model: Option<String>,
    blocked_by: Vec<String>,
    from_template: Option<String>,
) -> Result<TaskCreated> {
    require_text(&title, "Task title")?;

    let mut new = NewTask {
        title: Some(title),
        project_id: project,
        description,
        status: status.as_deref().map(parse_task_status).transpose()?,
        priority: priority.as_deref().map(parse_priority).transpose()?,
        assignee,
        tags: if tags.is_empty() { None } else { Some(tags) },
        due_date: due.as_deref().map(parse_date).transpose()?,
        estimated_cost: estimate,
        model,
        blocked_by: if blocked_by.is_empty() {
            None
        } else {
            Some(blocked_by)
        },
        ..Default::default()
    };

    // Template fields fill the gaps; explicit flags win.
    if let Some(ref template_id) = from_template {
        let template = store
            .get_template(template_id)
            .ok_or_else(|| Error::NotFound(format!("Template {}", template_id)))?;
        new.project_id = new.project_id.or(template.project_id);
        new.assignee = new.assignee.or(template.assignee);
        new.priority = new.priority.or(Some(template.priority));
        if new.tags.is_none() && !template.tags.is_empty() {
            new.tags = Some(template.tags);
        }
        if new.description.is_none() && !template.description.is_empty() {
            new.description = Some(template.description);
        }
    }

    Ok(TaskCreated(store.create_task(new)))
}

#[derive(Debug, Serialize)]
pub struct TaskList {
    pub count: usize,
    pub tasks: Vec<Task>,
}

impl Output for TaskList {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("{} task(s)", self.count)];
        for t in &self.tasks {
            let who = t.assignee.as_deref().unwrap_or("-");
            lines.push(format!(
                "  {}  {:<12} [{:<8}] \"{}\" ({})",
                t.id, t.status, t.priority, t.title, who
            ));
        }
        lines.join("\n")
    }
}

pub fn task_list(
    store: &Store,
    project: Option<String>,
    status: Option<String>,
    assignee: Option<String>,
    priority: Option<String>,
) -> Result<TaskList> {
    let filter = TaskFilter {
        project_id: project,
        status: status.as_deref().map(parse_task_status).transpose()?,
        assignee,
        priority: priority.as_deref().map(parse_priority).transpose()?,
    };
    let tasks = store.list_tasks(&filter);
    Ok(TaskList {
        count: tasks.len(),
        tasks,
    })
}

/// An existing blocker of a task, with its current status.
#[derive(Debug, Serialize)]
pub struct BlockerBrief {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
}

/// Payload of `task show`: the task plus resolved blocker info.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetail {
    pub task: Task,
    pub unresolved_blockers: bool,
    pub blockers: Vec<BlockerBrief>,
}

impl Output for TaskDetail {
    fn to_human(&self) -> String {
        let t = &self.task;
        let mut lines = vec![
            format!("Task {}: \"{}\"", t.id, t.title),
            format!("  Status:    {}", t.status.label()),
            format!("  Priority:  {}", t.priority),
        ];
        if let Some(ref pid) = t.project_id {
            lines.push(format!("  Project:   {}", pid));
        }
        if let Some(ref who) = t.assignee {
            lines.push(format!("  Assignee:  {}", who));
        }
        if !t.description.is_empty() {
            lines.push(format!("  About:     {}", t.description));
        }
        if !t.tags.is_empty() {
            lines.push(format!("  Tags:      {}", t.tags.join(", ")));
        }
        if let Some(due) = t.due_date {
            let overdue = t.status != TaskStatus::Done && due < Local::now().date_naive();
            let marker = if overdue { " (overdue)" } else { "" };
            lines.push(format!("  Due:       {}{}", due, marker));
        }
        if let Some(cost) = t.estimated_cost {
            let actual = t
                .actual_cost
                .map(|a| format!(" / {:.2} actual", a))
                .unwrap_or_default();
            lines.push(format!("  Cost:      {:.2} estimated{}", cost, actual));
        }
        if let Some(ref model) = t.model {
            lines.push(format!("  Model:     {}", model));
        }
        lines.push(format!("  Progress:  {}", progress_bar(t.progress)));
        if t.total_time_ms > 0 {
            lines.push(format!("  Time:      {} tracked", format_ms(t.total_time_ms)));
        }
        if !self.blockers.is_empty() {
            let open: Vec<String> = self
                .blockers
                .iter()
                .filter(|b| b.status != TaskStatus::Done)
                .map(|b| format!("{} \"{}\"", b.id, b.title))
                .collect();
            if open.is_empty() {
                lines.push("  Blockers:  all done".to_string());
            } else {
                lines.push(format!(
                    "  Blockers:  ⚠ {} unresolved: {}",
                    open.len(),
                    open.join(", ")
                ));
            }
        }
        if !t.subtasks.is_empty() {
            lines.push("  Subtasks:".to_string());
            for s in &t.subtasks {
                let mark = if s.completed { "x" } else { " " };
                lines.push(format!("    [{}] {}  {}", mark, s.id, s.text));
            }
        }
        if !t.comments.is_empty() {
            lines.push("  Comments:".to_string());
            for c in &t.comments {
                lines.push(format!(
                    "    [{}] {}: {}",
                    local_stamp(&c.timestamp),
                    c.author,
                    c.text
                ));
            }
        }
        if !t.activity_log.is_empty() {
            lines.push("  Activity:".to_string());
            for a in &t.activity_log {
                lines.push(format!(
                    "    [{}] {} ({})",
                    local_stamp(&a.timestamp),
                    a.action,
                    a.by
                ));
            }
        }
        lines.join("\n")
    }
}

pub fn task_show(store: &Store, id: &str) -> Result<TaskDetail> {
    let task = store.get_task(id).ok_or_else(|| task_not_found(id))?;
    let blockers = task
        .blocked_by
        .iter()
        .filter_map(|bid| store.get_task(bid))
        .map(|b| BlockerBrief {
            id: b.id,
            title: b.title,
            status: b.status,
        })
        .collect();
    Ok(TaskDetail {
        unresolved_blockers: store.has_unresolved_blockers(id),
        task,
        blockers,
    })
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct TaskUpdated(pub Task);

impl Output for TaskUpdated {
    fn to_human(&self) -> String {
        format!("Updated task {}: \"{}\"", self.0.id, self.0.title)
    }
}

/// Empty strings clear optional fields (assignee, project, model, due date),
/// matching how the edit form submitted cleared inputs.
#[allow(clippy::too_many_arguments)]
pub fn task_update(
    store: &mut Store,
    id: &str,
    title: Option<String>,
    description: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    assignee: Option<String>,
    project: Option<String>,
    model: Option<String>,
    due: Option<String>,
    progress: Option<u8>,
    tags: Option<Vec<String>>,
    blocked_by: Option<Vec<String>>,
    estimate: Option<f64>,
    actual_cost: Option<f64>,
) -> Result<TaskUpdated> {
    if let Some(ref title) = title {
        require_text(title, "Task title")?;
    }
    let clear_or = |value: String| if value.is_empty() { None } else { Some(value) };
    let due_date = match due.as_deref() {
        None => None,
        Some("") => Some(None),
        Some(s) => Some(Some(parse_date(s)?)),
    };
    let update = TaskUpdate {
        title,
        description,
        status: status.as_deref().map(parse_task_status).transpose()?,
        priority: priority.as_deref().map(parse_priority).transpose()?,
        assignee: assignee.map(clear_or),
        project_id: project.map(clear_or),
        model: model.map(clear_or),
        due_date,
        progress,
        tags,
        blocked_by,
        estimated_cost: estimate.map(Some),
        actual_cost: actual_cost.map(Some),
        ..Default::default()
    };
    let task = store
        .update_task(id, update)
        .ok_or_else(|| task_not_found(id))?;
    Ok(TaskUpdated(task))
}

/// Payload of `task move`: the task after the move, with both endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskMoved {
    pub task: Task,
    pub from: TaskStatus,
    pub to: TaskStatus,
}

impl Output for TaskMoved {
    fn to_human(&self) -> String {
        format!(
            "Moved task {}: \"{}\" {} → {}",
            self.task.id,
            self.task.title,
            self.from.label(),
            self.to.label()
        )
    }
}

/// The drag-and-drop analog: change column, then position. Refuses a move
/// to done while direct blockers are unfinished, unless forced; `task update
/// --status done` stays unguarded on purpose.
pub fn task_move(
    store: &mut Store,
    id: &str,
    to: &str,
    index: Option<usize>,
    force: bool,
) -> Result<TaskMoved> {
    let to = parse_task_status(to)?;
    let task = store.get_task(id).ok_or_else(|| task_not_found(id))?;
    let from = task.status;

    if to == TaskStatus::Done && !force && store.has_unresolved_blockers(id) {
        let open: Vec<String> = task
            .blocked_by
            .iter()
            .filter_map(|bid| store.get_task(bid))
            .filter(|b| b.status != TaskStatus::Done)
            .map(|b| format!("{} \"{}\"", b.id, b.title))
            .collect();
        return Err(Error::Blocked(format!(
            "{} is waiting on {} (use --force to override)",
            id,
            open.join(", ")
        )));
    }

    store
        .update_task(
            id,
            TaskUpdate {
                status: Some(to),
                ..Default::default()
            },
        )
        .ok_or_else(|| task_not_found(id))?;
    let target = index.unwrap_or_else(|| store.list_column(to).len());
    store.reorder_task(id, target, to);
    let task = store.get_task(id).ok_or_else(|| task_not_found(id))?;
    Ok(TaskMoved { task, from, to })
}

/// One row of a reordered column.
#[derive(Debug, Serialize)]
pub struct ColumnPosition {
    pub order: u32,
    pub id: String,
    pub title: String,
}

/// Payload of `task reorder`: the column in its new order.
#[derive(Debug, Serialize)]
pub struct TaskReordered {
    pub status: TaskStatus,
    pub column: Vec<ColumnPosition>,
}

impl Output for TaskReordered {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("Column {}:", self.status.label())];
        for row in &self.column {
            lines.push(format!("  {}. {}  \"{}\"", row.order, row.id, row.title));
        }
        lines.join("\n")
    }
}

pub fn task_reorder(
    store: &mut Store,
    id: &str,
    index: usize,
    status: Option<String>,
) -> Result<TaskReordered> {
    let task = store.get_task(id).ok_or_else(|| task_not_found(id))?;
    let status = match status.as_deref() {
        Some(s) => parse_task_status(s)?,
        None => task.status,
    };
    store.reorder_task(id, index, status);
    let column = store
        .list_column(status)
        .into_iter()
        .map(|t| ColumnPosition {
            order: t.order,
            id: t.id,
            title: t.title,
        })
        .collect();
    Ok(TaskReordered { status, column })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDeleted {
    pub id: String,
    pub title: String,
    pub deleted: bool,
}

impl Output for TaskDeleted {
    fn to_human(&self) -> String {
        format!("Deleted task {}: \"{}\"", self.id, self.title)
    }
}

pub fn task_delete(store: &mut Store, id: &str) -> Result<TaskDeleted> {
    let task = store.get_task(id).ok_or_else(|| task_not_found(id))?;
    store.delete_task(id);
    Ok(TaskDeleted {
        id: task.id,
        title: task.title,
        deleted: true,
    })
}

// === Subtasks ===

/// Payload of `subtask add`/`toggle`: the subtask plus the recomputed
/// task progress.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtaskChanged {
    pub task_id: String,
    pub subtask: Subtask,
    pub progress: u8,
}

impl Output for SubtaskChanged {
    fn to_human(&self) -> String {
        let mark = if self.subtask.completed { "x" } else { " " };
        format!(
            "[{}] {}  {} (task {} now {}%)",
            mark, self.subtask.id, self.subtask.text, self.task_id, self.progress
        )
    }
}

pub fn subtask_add(store: &mut Store, task_id: &str, text: &str) -> Result<SubtaskChanged> {
    require_text(text, "Subtask text")?;
    let subtask = store
        .add_subtask(task_id, text)
        .ok_or_else(|| task_not_found(task_id))?;
    let progress = store.get_task(task_id).map(|t| t.progress).unwrap_or(0);
    Ok(SubtaskChanged {
        task_id: task_id.to_string(),
        subtask,
        progress,
    })
}

pub fn subtask_toggle(
    store: &mut Store,
    task_id: &str,
    subtask_id: &str,
) -> Result<SubtaskChanged> {
    store.get_task(task_id).ok_or_else(|| task_not_found(task_id))?;
    let subtask = store
        .toggle_subtask(task_id, subtask_id)
        .ok_or_else(|| Error::NotFound(format!("Subtask {}", subtask_id)))?;
    let progress = store.get_task(task_id).map(|t| t.progress).unwrap_or(0);
    Ok(SubtaskChanged {
        task_id: task_id.to_string(),
        subtask,
        progress,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtaskRemoved {
    pub task_id: String,
    pub subtask_id: String,
    pub progress: u8,
}

impl Output for SubtaskRemoved {
    fn to_human(&self) -> String {
        format!(
            "Removed subtask {} (task {} now {}%)",
            self.subtask_id, self.task_id, self.progress
        )
    }
}

pub fn subtask_rm(store: &mut Store, task_id: &str, subtask_id: &str) -> Result<SubtaskRemoved> {
    store.get_task(task_id).ok_or_else(|| task_not_found(task_id))?;
    if !store.remove_subtask(task_id, subtask_id) {
        return Err(Error::NotFound(format!("Subtask {}", subtask_id)));
    }
    let progress = store.get_task(task_id).map(|t| t.progress).unwrap_or(0);
    Ok(SubtaskRemoved {
        task_id: task_id.to_string(),
        subtask_id: subtask_id.to_string(),
        progress,
    })
}

// === Comments ===

/// Payload of `comment add`: the comment and who was notified by mention.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAdded {
    pub task_id: String,
    pub comment: Comment,
    pub notified: Vec<String>,
}

impl Output for CommentAdded {
    fn to_human(&self) -> String {
        let mut line = format!("Commented on {} as {}", self.task_id, self.comment.author);
        if !self.notified.is_empty() {
            line.push_str(&format!(" (notified {})", self.notified.join(", ")));
        }
        line
    }
}

pub fn comment_add(
    store: &mut Store,
    task_id: &str,
    text: &str,
    by: &str,
) -> Result<CommentAdded> {
    require_text(text, "Comment text")?;
    let notified = team::mentions(text)
        .into_iter()
        .map(String::from)
        .collect();
    let comment = store
        .add_comment(task_id, text, by)
        .ok_or_else(|| task_not_found(task_id))?;
    Ok(CommentAdded {
        task_id: task_id.to_string(),
        comment,
        notified,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentList {
    pub task_id: String,
    pub count: usize,
    pub comments: Vec<Comment>,
}

impl Output for CommentList {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("{} comment(s) on {}", self.count, self.task_id)];
        for c in &self.comments {
            lines.push(format!(
                "  [{}] {}: {}",
                local_stamp(&c.timestamp),
                c.author,
                c.text
            ));
        }
        lines.join("\n")
    }
}

pub fn comment_list(store: &Store, task_id: &str) -> Result<CommentList> {
    let task = store.get_task(task_id).ok_or_else(|| task_not_found(task_id))?;
    Ok(CommentList {
        task_id: task.id,
        count: task.comments.len(),
        comments: task.comments,
    })
}

// === Timers ===

/// A running timer, described live.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningTimer {
    pub task_id: String,
    pub title: String,
    pub elapsed_ms: i64,
}

/// Payload of `timer start`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerStarted {
    pub task_id: String,
    pub title: String,
    pub entry: TimeEntry,
    /// Task whose timer was auto-stopped so this one could start.
    pub previous: Option<String>,
}

impl Output for TimerStarted {
    fn to_human(&self) -> String {
        let mut line = format!("Started timer on {}: \"{}\"", self.task_id, self.title);
        if let Some(ref prev) = self.previous {
            line.push_str(&format!(" (stopped timer on {})", prev));
        }
        line
    }
}

pub fn timer_start(store: &mut Store, task_id: &str, by: &str) -> Result<TimerStarted> {
    let previous = store
        .active_timer()
        .filter(|running| *running != task_id)
        .map(String::from);
    let entry = store
        .start_timer(task_id, by)
        .ok_or_else(|| task_not_found(task_id))?;
    let title = store
        .get_task(task_id)
        .map(|t| t.title)
        .unwrap_or_default();
    Ok(TimerStarted {
        task_id: task_id.to_string(),
        title,
        entry,
        previous,
    })
}

/// Payload of `timer stop`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerStopped {
    pub task_id: String,
    pub title: String,
    pub elapsed_ms: i64,
    pub total_time_ms: i64,
}

impl Output for TimerStopped {
    fn to_human(&self) -> String {
        format!(
            "Stopped timer on {}: \"{}\" after {} (total {})",
            self.task_id,
            self.title,
            format_ms(self.elapsed_ms),
            format_ms(self.total_time_ms)
        )
    }
}

pub fn timer_stop(store: &mut Store, task_id: Option<&str>) -> Result<TimerStopped> {
    let stopped = store
        .stop_timer(task_id)
        .ok_or_else(|| Error::NotFound("No running timer".to_string()))?;
    let (title, total) = store
        .get_task(&stopped.task_id)
        .map(|t| (t.title, t.total_time_ms))
        .unwrap_or_default();
    Ok(TimerStopped {
        task_id: stopped.task_id,
        title,
        elapsed_ms: stopped.elapsed_ms,
        total_time_ms: total,
    })
}

/// Payload of `timer status`.
#[derive(Debug, Serialize)]
pub struct TimerStatus {
    pub running: Option<RunningTimer>,
}

impl Output for TimerStatus {
    fn to_human(&self) -> String {
        match &self.running {
            Some(timer) => format!(
                "Timer running on {}: \"{}\" for {}",
                timer.task_id,
                timer.title,
                format_ms(timer.elapsed_ms)
            ),
            None => "No timer running".to_string(),
        }
    }
}

pub fn timer_status(store: &Store) -> Result<TimerStatus> {
    let running = store.active_timer().map(|task_id| RunningTimer {
        task_id: task_id.to_string(),
        title: store
            .get_task(task_id)
            .map(|t| t.title)
            .unwrap_or_default(),
        elapsed_ms: store.running_elapsed_ms(),
    });
    Ok(TimerStatus { running })
}

// === Templates ===

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct TemplateCreated(pub Template);

impl Output for TemplateCreated {
    fn to_human(&self) -> String {
        format!("Created template {}: \"{}\"", self.0.id, self.0.name)
    }
}

pub fn template_create(
    store: &mut Store,
    name: String,
    project: Option<String>,
    assignee: Option<String>,
    priority: Option<String>,
    tags: Vec<String>,
    description: Option<String>,
) -> Result<TemplateCreated> {
    require_text(&name, "Template name")?;
    let template = store.create_template(NewTemplate {
        name: Some(name),
        project_id: project,
        assignee,
        priority: priority.as_deref().map(parse_priority).transpose()?,
        tags: if tags.is_empty() { None } else { Some(tags) },
        description,
    });
    Ok(TemplateCreated(template))
}

#[derive(Debug, Serialize)]
pub struct TemplateList {
    pub count: usize,
    pub templates: Vec<Template>,
}

impl Output for TemplateList {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("{} template(s)", self.count)];
        for t in &self.templates {
            let mut extras = vec![format!("priority {}", t.priority)];
            if let Some(ref who) = t.assignee {
                extras.push(format!("assignee {}", who));
            }
            if !t.tags.is_empty() {
                extras.push(format!("tags: {}", t.tags.join(", ")));
            }
            lines.push(format!("  {}  \"{}\" ({})", t.id, t.name, extras.join(", ")));
        }
        lines.join("\n")
    }
}

pub fn template_list(store: &Store) -> Result<TemplateList> {
    let templates = store.list_templates();
    Ok(TemplateList {
        count: templates.len(),
        templates,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDeleted {
    pub id: String,
    pub deleted: bool,
}

impl Output for TemplateDeleted {
    fn to_human(&self) -> String {
        format!("Deleted template {}", self.id)
    }
}

pub fn template_delete(store: &mut Store, id: &str) -> Result<TemplateDeleted> {
    if !store.delete_template(id) {
        return Err(Error::NotFound(format!("Template {}", id)));
    }
    Ok(TemplateDeleted {
        id: id.to_string(),
        deleted: true,
    })
}

// === Notifications ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationList {
    pub user: String,
    pub count: usize,
    pub unread: usize,
    pub notifications: Vec<Notification>,
}

impl Output for NotificationList {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "{} notification(s) for {} ({} unread)",
            self.count, self.user, self.unread
        )];
        for n in &self.notifications {
            let dot = if n.read { "○" } else { "●" };
            lines.push(format!(
                "  {} [{}] {} from {} on \"{}\": {}",
                dot,
                local_stamp(&n.timestamp),
                n.id,
                n.from,
                n.task_title,
                n.text
            ));
        }
        lines.join("\n")
    }
}

pub fn notification_list(store: &Store, user: &str, unread_only: bool) -> Result<NotificationList> {
    let notifications = store.notifications(user, unread_only);
    Ok(NotificationList {
        user: user.to_string(),
        count: notifications.len(),
        unread: store.unread_count(user),
        notifications,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRead {
    pub id: String,
    pub read: bool,
}

impl Output for NotificationRead {
    fn to_human(&self) -> String {
        format!("Marked {} read", self.id)
    }
}

pub fn notification_read(store: &mut Store, id: &str) -> Result<NotificationRead> {
    if !store.mark_read(id) {
        return Err(Error::NotFound(format!("Notification {}", id)));
    }
    Ok(NotificationRead {
        id: id.to_string(),
        read: true,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsMarked {
    pub user: String,
    pub marked: usize,
}

impl Output for NotificationsMarked {
    fn to_human(&self) -> String {
        format!("Marked {} notification(s) read for {}", self.marked, self.user)
    }
}

pub fn notification_read_all(store: &mut Store, user: &str) -> Result<NotificationsMarked> {
    let marked = store.mark_all_read(user);
    Ok(NotificationsMarked {
        user: user.to_string(),
        marked,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    pub user: String,
    pub unread: usize,
}

impl Output for UnreadCount {
    fn to_human(&self) -> String {
        format!("{} unread notification(s) for {}", self.unread, self.user)
    }
}

pub fn notification_count(store: &Store, user: &str) -> Result<UnreadCount> {
    Ok(UnreadCount {
        user: user.to_string(),
        unread: store.unread_count(user),
    })
}

// === Board & derived views ===

/// One kanban column.
#[derive(Debug, Serialize)]
pub struct BoardColumn {
    pub status: TaskStatus,
    pub label: String,
    pub count: usize,
    pub tasks: Vec<Task>,
}

/// Payload of `board`: every column in display order.
#[derive(Debug, Serialize)]
pub struct BoardView {
    pub columns: Vec<BoardColumn>,
}

impl Output for BoardView {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        for column in &self.columns {
            lines.push(format!("{} ({})", column.label, column.count));
            for t in &column.tasks {
                let mut row = format!("  {}  [{}] \"{}\"", t.id, t.priority, t.title);
                if let Some(ref who) = t.assignee {
                    row.push_str(&format!(" ({})", who));
                }
                if t.progress > 0 {
                    row.push_str(&format!(" {}%", t.progress));
                }
                lines.push(row);
            }
        }
        lines.join("\n")
    }
}

pub fn board(store: &Store) -> Result<BoardView> {
    let columns = TaskStatus::board_order()
        .iter()
        .map(|&status| {
            let tasks = store.list_column(status);
            BoardColumn {
                status,
                label: status.label().to_string(),
                count: tasks.len(),
                tasks,
            }
        })
        .collect();
    Ok(BoardView { columns })
}

/// Payload of `stats`: the derived dashboard numbers.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct StatsView(pub Stats);

impl Output for StatsView {
    fn to_human(&self) -> String {
        let s = &self.0;
        let mut lines = vec![
            "Command Center stats".to_string(),
            format!("  Projects:  {} total, {} active", s.total_projects, s.active_projects),
            format!(
                "  Tasks:     {} total ({} blocked, {} todo, {} on hold, {} in progress, {} done)",
                s.total_tasks, s.blocked, s.todo, s.onhold, s.in_progress, s.done
            ),
            format!("  This week: {} completed", s.completed_this_week),
            format!("  Overdue:   {}", s.overdue_tasks),
        ];
        lines.push("  By assignee:".to_string());
        for (id, row) in &s.by_assignee {
            let (emoji, name) = team::member(id)
                .map(|m| (m.emoji, m.name))
                .unwrap_or(("", id.as_str()));
            let mut parts = Vec::new();
            for (count, label) in [
                (row.blocked, "blocked"),
                (row.todo, "todo"),
                (row.onhold, "on hold"),
                (row.in_progress, "in progress"),
                (row.done, "done"),
            ] {
                if count > 0 {
                    parts.push(format!("{} {}", count, label));
                }
            }
            let detail = if parts.is_empty() {
                String::new()
            } else {
                format!(" ({})", parts.join(", "))
            };
            lines.push(format!("    {} {:<7} {} total{}", emoji, name, row.total, detail));
        }
        let cells: Vec<String> = s.week_histogram.iter().map(|c| c.to_string()).collect();
        lines.push(format!("  Completions Mon..Sun: {}", cells.join(" ")));
        lines.join("\n")
    }
}

pub fn stats(store: &Store) -> Result<StatsView> {
    Ok(StatsView(store.stats()))
}

/// Payload of `search`.
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub count: usize,
    pub results: Vec<SearchHit>,
}

impl Output for SearchResults {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("{} result(s) for \"{}\"", self.count, self.query)];
        for hit in &self.results {
            match hit {
                SearchHit::Task(t) => {
                    lines.push(format!("  task     {}  \"{}\"", t.id, t.title));
                }
                SearchHit::Project(p) => {
                    lines.push(format!("  project  {}  \"{}\"", p.id, p.name));
                }
            }
        }
        lines.join("\n")
    }
}

pub fn search(store: &Store, query: &str) -> Result<SearchResults> {
    let results = store.search(query);
    Ok(SearchResults {
        query: query.to_string(),
        count: results.len(),
        results,
    })
}

/// Payload of `activity`.
#[derive(Debug, Serialize)]
pub struct ActivityList {
    pub count: usize,
    pub entries: Vec<ActivityEntry>,
}

impl Output for ActivityList {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("{} activity entr(ies)", self.count)];
        for e in &self.entries {
            lines.push(format!(
                "  [{}] {:<16} {} ({})",
                local_stamp(&e.timestamp),
                e.action,
                e.details,
                e.by
            ));
        }
        lines.join("\n")
    }
}

pub fn activity(store: &Store, project: Option<&str>, limit: usize) -> Result<ActivityList> {
    let mut entries = match project {
        Some(project_id) => store.get_activity_for_project(project_id),
        None => store.get_activity(limit),
    };
    entries.truncate(limit);
    Ok(ActivityList {
        count: entries.len(),
        entries,
    })
}

/// Payload of the bare `cmdc` invocation: a one-screen overview.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub data_file: String,
    pub projects: usize,
    pub tasks: usize,
    pub blocked: usize,
    pub todo: usize,
    pub onhold: usize,
    pub in_progress: usize,
    pub done: usize,
    pub overdue_tasks: usize,
    pub completed_this_week: usize,
    pub active_timer: Option<RunningTimer>,
}

impl Output for StatusSummary {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!(
                "Command Center: {} project(s), {} task(s)",
                self.projects, self.tasks
            ),
            format!(
                "  🔴 {}  🟡 {}  ⏸️ {}  🔵 {}  ✅ {}",
                self.blocked, self.todo, self.onhold, self.in_progress, self.done
            ),
            format!(
                "  Overdue: {}  Completed this week: {}",
                self.overdue_tasks, self.completed_this_week
            ),
        ];
        match &self.active_timer {
            Some(timer) => lines.push(format!(
                "  Timer: {} \"{}\" ({})",
                timer.task_id,
                timer.title,
                format_ms(timer.elapsed_ms)
            )),
            None => lines.push("  Timer: none".to_string()),
        }
        lines.push(format!("  Data file: {}", self.data_file));
        lines.join("\n")
    }
}

pub fn status(store: &Store) -> Result<StatusSummary> {
    let stats = store.stats();
    let active_timer = store.active_timer().map(|task_id| RunningTimer {
        task_id: task_id.to_string(),
        title: store
            .get_task(task_id)
            .map(|t| t.title)
            .unwrap_or_default(),
        elapsed_ms: store.running_elapsed_ms(),
    });
    Ok(StatusSummary {
        data_file: store.location(),
        projects: stats.total_projects,
        tasks: stats.total_tasks,
        blocked: stats.blocked,
        todo: stats.todo,
        onhold: stats.onhold,
        in_progress: stats.in_progress,
        done: stats.done,
        overdue_tasks: stats.overdue_tasks,
        completed_this_week: stats.completed_this_week,
        active_timer,
    })
}

// === Settings ===

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct SettingsView(pub Settings);

impl Output for SettingsView {
    fn to_human(&self) -> String {
        format!(
            "Theme: {}\nSince: {}",
            self.0.theme,
            local_stamp(&self.0.created_at)
        )
    }
}

pub fn settings_show(store: &Store) -> Result<SettingsView> {
    Ok(SettingsView(store.settings()))
}

pub fn settings_theme(store: &mut Store, theme: &str) -> Result<SettingsView> {
    let theme = parse_theme(theme)?;
    Ok(SettingsView(store.set_theme(theme)))
}

// === Data management ===

/// Payload of `data export`: either the raw snapshot (stdout) or a receipt
/// for the written file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub path: Option<String>,
    pub projects: usize,
    pub tasks: usize,
    #[serde(skip)]
    payload: String,
}

impl Output for ExportResult {
    fn to_json(&self) -> String {
        match &self.path {
            // To stdout the snapshot itself is the output.
            None => self.payload.clone(),
            Some(path) => serde_json::json!({
                "exported": true,
                "path": path,
                "projects": self.projects,
                "tasks": self.tasks,
            })
            .to_string(),
        }
    }

    fn to_human(&self) -> String {
        match &self.path {
            None => self.payload.clone(),
            Some(path) => format!(
                "Exported {} project(s) and {} task(s) to {}",
                self.projects, self.tasks, path
            ),
        }
    }
}

pub fn data_export(store: &Store, output: Option<PathBuf>) -> Result<ExportResult> {
    let payload = store.export_json()?;
    let projects = store.list_projects().len();
    let tasks = store.list_tasks(&TaskFilter::default()).len();
    let path = match output {
        Some(path) => {
            std::fs::write(&path, &payload)?;
            Some(path.display().to_string())
        }
        None => None,
    };
    Ok(ExportResult {
        path,
        projects,
        tasks,
        payload,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub imported: bool,
    pub projects: usize,
    pub tasks: usize,
}

impl Output for ImportResult {
    fn to_human(&self) -> String {
        format!(
            "Imported {} project(s) and {} task(s)",
            self.projects, self.tasks
        )
    }
}

/// Import a snapshot from a file, or from stdin when `input` is `-`.
/// Rejection leaves the current data untouched.
pub fn data_import(store: &mut Store, input: &str) -> Result<ImportResult> {
    let text = if input == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(input)?
    };
    if !store.import_json(&text) {
        return Err(Error::InvalidInput(
            "Not a valid snapshot: projects and tasks arrays are required".to_string(),
        ));
    }
    Ok(ImportResult {
        imported: true,
        projects: store.list_projects().len(),
        tasks: store.list_tasks(&TaskFilter::default()).len(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearResult {
    pub cleared: bool,
}

impl Output for ClearResult {
    fn to_human(&self) -> String {
        "All data cleared".to_string()
    }
}

pub fn data_clear(store: &mut Store, force: bool) -> Result<ClearResult> {
    if !force {
        return Err(Error::InvalidInput(
            "This deletes every project and task; pass --force to confirm".to_string(),
        ));
    }
    store.clear_all();
    Ok(ClearResult { cleared: true })
}
