//! The Store: owner of all domain state.
//!
//! Every mutating operation follows the same shape: mutate the in-memory
//! snapshot, persist the whole snapshot through the backend, then emit the
//! operation's specific event followed by `dataChanged`. Reads hand out
//! clones, never references into the backing collections.
//!
//! Submodules:
//! - `snapshot` - Persistence adapters (`FileStore`, `MemoryStore`)
//! - `events` - Synchronous pub/sub bus
//! - `stats` - Derived statistics, recomputed per call
//! - `search` - Cross-entity substring search

pub mod events;
pub mod search;
pub mod snapshot;
pub mod stats;

pub use events::{EventBus, EventKind, StoreEvent, Subscription};
pub use search::SearchHit;
pub use snapshot::{FileStore, MemoryStore, Snapshot, SnapshotStore};
pub use stats::{AssigneeStats, Stats};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::Result;
use crate::models::team;
use crate::models::{
    ActivityEntry, Comment, LinkRef, Milestone, Notification, NotificationKind, Priority, Project,
    ProjectStatus, Settings, Subtask, Task, TaskActivity, TaskStatus, Template, Theme, TimeEntry,
};

/// Global activity log retention.
const ACTIVITY_CAP: usize = 500;

/// Actor recorded for operations that don't carry an author.
const DEFAULT_ACTOR: &str = "user";

/// Fields accepted when creating a project. Omitted fields get defaults.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    pub assignees: Option<Vec<String>>,
    pub links: Option<Vec<LinkRef>>,
    pub milestones: Option<Vec<Milestone>>,
    pub color: Option<String>,
}

/// Fields a project update may overwrite. `None` fields are untouched.
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    pub assignees: Option<Vec<String>>,
    pub links: Option<Vec<LinkRef>>,
    pub milestones: Option<Vec<Milestone>>,
    pub color: Option<String>,
}

/// Fields accepted when creating a task. Omitted fields get defaults.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub id: Option<String>,
    pub project_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assignee: Option<String>,
    pub tags: Option<Vec<String>>,
    pub due_date: Option<NaiveDate>,
    pub estimated_cost: Option<f64>,
    pub actual_cost: Option<f64>,
    pub model: Option<String>,
    pub progress: Option<u8>,
    pub blocked_by: Option<Vec<String>>,
    pub links: Option<Vec<LinkRef>>,
    pub subtasks: Option<Vec<Subtask>>,
}

/// Fields a task update may overwrite. `None` fields are untouched; the
/// nested options (`Some(None)`) clear a field that holds an optional value.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub project_id: Option<Option<String>>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assignee: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub estimated_cost: Option<Option<f64>>,
    pub actual_cost: Option<Option<f64>>,
    pub model: Option<Option<String>>,
    pub progress: Option<u8>,
    pub blocked_by: Option<Vec<String>>,
    pub links: Option<Vec<LinkRef>>,
    pub subtasks: Option<Vec<Subtask>>,
}

/// Optional predicates for task listing, combined by AND.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub project_id: Option<String>,
    pub status: Option<TaskStatus>,
    pub assignee: Option<String>,
    pub priority: Option<Priority>,
}

impl TaskFilter {
    /// Whether a task passes every present predicate.
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(ref project_id) = self.project_id {
            if task.project_id.as_deref() != Some(project_id.as_str()) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(ref assignee) = self.assignee {
            if task.assignee.as_deref() != Some(assignee.as_str()) {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        true
    }
}

/// Fields accepted when creating a template.
#[derive(Debug, Clone, Default)]
pub struct NewTemplate {
    pub name: Option<String>,
    pub project_id: Option<String>,
    pub assignee: Option<String>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
    pub description: Option<String>,
}

/// A closed time entry together with the credited duration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoppedTimer {
    pub task_id: String,
    pub entry: TimeEntry,
    pub elapsed_ms: i64,
}

/// The single owner of all domain state.
pub struct Store {
    pub(crate) data: Snapshot,
    bus: EventBus,
    backend: Box<dyn SnapshotStore>,
    active_timer: Option<String>,
}

impl Store {
    /// Open a store over the given backend.
    ///
    /// Loads the existing snapshot (a corrupt or unreadable one is logged
    /// and treated as absent), then rescans time entries to restore the
    /// running-timer pointer. Emits nothing; call `init` once subscribers
    /// are registered.
    pub fn open(backend: impl SnapshotStore + 'static) -> Self {
        let data = match backend.load() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => Snapshot::empty(),
            Err(e) => {
                tracing::warn!("Failed to read snapshot, starting fresh: {}", e);
                Snapshot::empty()
            }
        };
        let mut store = Self {
            data,
            bus: EventBus::new(),
            backend: Box::new(backend),
            active_timer: None,
        };
        store.rescan_active_timer();
        store
    }

    /// Persist the current snapshot and announce the store is ready.
    pub fn init(&mut self) {
        self.persist();
        self.emit(StoreEvent::Initialized(self.data.clone()));
    }

    /// Where the backend keeps the snapshot (for display).
    pub fn location(&self) -> String {
        self.backend.location()
    }

    /// Register an event handler.
    pub fn on(&mut self, kind: EventKind, handler: impl Fn(&StoreEvent) + 'static) -> Subscription {
        self.bus.on(kind, handler)
    }

    /// Remove an event handler.
    pub fn off(&mut self, subscription: Subscription) -> bool {
        self.bus.off(subscription)
    }

    fn emit(&self, event: StoreEvent) {
        self.bus.emit(&event);
    }

    fn emit_changed(&self, event: StoreEvent) {
        self.bus.emit(&event);
        self.bus.emit(&StoreEvent::DataChanged);
    }

    /// Save the snapshot through the backend. Failures are logged and
    /// swallowed; the in-memory state stays authoritative.
    fn persist(&mut self) {
        self.data.updated_at = Utc::now();
        if let Err(e) = self.backend.save(&self.data) {
            tracing::warn!("Failed to persist snapshot: {}", e);
        }
    }

    fn id_exists(&self, id: &str) -> bool {
        self.data.projects.iter().any(|p| p.id == id)
            || self.data.tasks.iter().any(|t| t.id == id)
            || self.data.templates.iter().any(|t| t.id == id)
            || self.data.notifications.iter().any(|n| n.id == id)
            || self.data.activity_log.iter().any(|a| a.id == id)
    }

    /// Generate an ID that is unique across every top-level collection.
    fn unique_id(&self, prefix: &str, seed: &str) -> String {
        let mut attempt: u32 = 0;
        loop {
            let id = generate_id(prefix, &format!("{}{}", seed, attempt));
            if !self.id_exists(&id) {
                return id;
            }
            attempt += 1;
        }
    }

    /// Insert a global activity entry at the head, enforcing the cap.
    fn log_activity(
        &mut self,
        action: &str,
        task_id: Option<&str>,
        project_id: Option<&str>,
        details: String,
        by: &str,
    ) {
        let entry = ActivityEntry {
            id: generate_id("act", &details),
            action: action.to_string(),
            task_id: task_id.map(String::from),
            project_id: project_id.map(String::from),
            details,
            by: by.to_string(),
            timestamp: Utc::now(),
        };
        self.data.activity_log.insert(0, entry);
        self.data.activity_log.truncate(ACTIVITY_CAP);
    }

    // === Projects ===

    /// List all projects.
    pub fn list_projects(&self) -> Vec<Project> {
        self.data.projects.clone()
    }

    /// Get a project by ID.
    pub fn get_project(&self, id: &str) -> Option<Project> {
        self.data.projects.iter().find(|p| p.id == id).cloned()
    }

    /// Create a project, filling omitted fields with defaults.
    pub fn create_project(&mut self, new: NewProject) -> Project {
        let now = Utc::now();
        let name = new
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Untitled Project".to_string());
        let id = match new.id {
            Some(id) => id,
            None => self.unique_id("proj", &name),
        };

        let mut project = Project::new(id, name);
        if let Some(description) = new.description {
            project.description = description;
        }
        if let Some(status) = new.status {
            project.status = status;
        }
        if let Some(priority) = new.priority {
            project.priority = priority;
        }
        if let Some(assignees) = new.assignees {
            project.assignees = assignees;
        }
        if let Some(links) = new.links {
            project.links = links;
        }
        if let Some(milestones) = new.milestones {
            project.milestones = milestones;
        }
        if let Some(color) = new.color {
            project.color = color;
        }
        project.created_at = now;
        project.updated_at = now;

        self.data.projects.push(project.clone());
        self.log_activity(
            "project_created",
            None,
            Some(&project.id),
            format!("Created project \"{}\"", project.name),
            DEFAULT_ACTOR,
        );
        self.persist();
        self.emit_changed(StoreEvent::ProjectCreated(project.clone()));
        project
    }

    /// Apply a partial update to a project.
    pub fn update_project(&mut self, id: &str, update: ProjectUpdate) -> Option<Project> {
        let index = self.data.projects.iter().position(|p| p.id == id)?;
        {
            let project = &mut self.data.projects[index];
            if let Some(name) = update.name {
                project.name = name;
            }
            if let Some(description) = update.description {
                project.description = description;
            }
            if let Some(status) = update.status {
                project.status = status;
            }
            if let Some(priority) = update.priority {
                project.priority = priority;
            }
            if let Some(assignees) = update.assignees {
                project.assignees = assignees;
            }
            if let Some(links) = update.links {
                project.links = links;
            }
            if let Some(milestones) = update.milestones {
                project.milestones = milestones;
            }
            if let Some(color) = update.color {
                project.color = color;
            }
            project.updated_at = Utc::now();
        }

        let project = self.data.projects[index].clone();
        self.log_activity(
            "project_updated",
            None,
            Some(&project.id),
            format!("Updated project \"{}\"", project.name),
            DEFAULT_ACTOR,
        );
        self.persist();
        self.emit_changed(StoreEvent::ProjectUpdated(project.clone()));
        Some(project)
    }

    /// Delete a project and every task that belongs to it.
    pub fn delete_project(&mut self, id: &str) -> bool {
        let Some(index) = self.data.projects.iter().position(|p| p.id == id) else {
            return false;
        };
        let project = self.data.projects.remove(index);
        let before = self.data.tasks.len();
        self.data.tasks.retain(|t| t.project_id.as_deref() != Some(id));
        let removed_tasks = before - self.data.tasks.len();
        if let Some(ref running) = self.active_timer {
            if !self.data.tasks.iter().any(|t| t.id == *running) {
                self.active_timer = None;
            }
        }
        self.log_activity(
            "project_deleted",
            None,
            Some(id),
            format!(
                "Deleted project \"{}\" and {} task(s)",
                project.name, removed_tasks
            ),
            DEFAULT_ACTOR,
        );
        self.persist();
        self.emit_changed(StoreEvent::ProjectDeleted {
            id: project.id,
            name: project.name,
        });
        true
    }

    // === Tasks ===

    /// List tasks passing the filter.
    pub fn list_tasks(&self, filter: &TaskFilter) -> Vec<Task> {
        self.data
            .tasks
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect()
    }

    /// Get a task by ID.
    pub fn get_task(&self, id: &str) -> Option<Task> {
        self.data.tasks.iter().find(|t| t.id == id).cloned()
    }

    /// One status column, ordered by the `order` field.
    pub fn list_column(&self, status: TaskStatus) -> Vec<Task> {
        let mut column: Vec<Task> = self
            .data
            .tasks
            .iter()
            .filter(|t| t.status == status)
            .cloned()
            .collect();
        column.sort_by_key(|t| t.order);
        column
    }

    /// Create a task, filling omitted fields with defaults. The task is
    /// appended at the end of its status column.
    pub fn create_task(&mut self, new: NewTask) -> Task {
        let now = Utc::now();
        let title = new
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Untitled Task".to_string());
        let id = match new.id {
            Some(id) => id,
            None => self.unique_id("task", &title),
        };
        let status = new.status.unwrap_or_default();
        let order = self
            .data
            .tasks
            .iter()
            .filter(|t| t.status == status)
            .count() as u32;

        let mut task = Task::new(id, title);
        task.project_id = new.project_id;
        task.description = new.description.unwrap_or_default();
        task.status = status;
        task.priority = new.priority.unwrap_or_default();
        task.assignee = new.assignee;
        task.tags = new.tags.unwrap_or_default();
        task.due_date = new.due_date;
        task.estimated_cost = new.estimated_cost;
        task.actual_cost = new.actual_cost;
        task.model = new.model;
        task.progress = new.progress.unwrap_or(0).min(100);
        task.order = order;
        task.blocked_by = new.blocked_by.unwrap_or_default();
        task.links = new.links.unwrap_or_default();
        task.subtasks = new.subtasks.unwrap_or_default();
        if !task.subtasks.is_empty() {
            recompute_progress(&mut task);
        }
        task.created_at = now;
        task.updated_at = now;
        task.activity_log.push(TaskActivity {
            timestamp: now,
            action: "Task created".to_string(),
            by: DEFAULT_ACTOR.to_string(),
        });

        self.data.tasks.push(task.clone());
        self.log_activity(
            "task_created",
            Some(&task.id),
            task.project_id.as_deref(),
            format!("Created task \"{}\"", task.title),
            DEFAULT_ACTOR,
        );
        self.persist();
        self.emit_changed(StoreEvent::TaskCreated(task.clone()));
        task
    }

    /// Apply a partial update to a task.
    ///
    /// A status change records "Status: old → new" on the task, logs a
    /// global `task_moved` entry, and a move to done forces progress to 100
    /// plus a `task_completed` entry. Setting status to its current value
    /// skips all of that.
    pub fn update_task(&mut self, id: &str, update: TaskUpdate) -> Option<Task> {
        let index = self.data.tasks.iter().position(|t| t.id == id)?;
        let now = Utc::now();
        let old_status = self.data.tasks[index].status;

        {
            let task = &mut self.data.tasks[index];
            if let Some(ref project_id) = update.project_id {
                task.project_id = project_id.clone();
            }
            if let Some(title) = update.title {
                task.title = title;
            }
            if let Some(description) = update.description {
                task.description = description;
            }
            if let Some(status) = update.status {
                task.status = status;
            }
            if let Some(priority) = update.priority {
                task.priority = priority;
            }
            if let Some(ref assignee) = update.assignee {
                task.assignee = assignee.clone();
            }
            if let Some(tags) = update.tags {
                task.tags = tags;
            }
            if let Some(ref due_date) = update.due_date {
                task.due_date = *due_date;
            }
            if let Some(ref estimated_cost) = update.estimated_cost {
                task.estimated_cost = *estimated_cost;
            }
            if let Some(ref actual_cost) = update.actual_cost {
                task.actual_cost = *actual_cost;
            }
            if let Some(ref model) = update.model {
                task.model = model.clone();
            }
            if let Some(progress) = update.progress {
                task.progress = progress.min(100);
            }
            if let Some(blocked_by) = update.blocked_by {
                task.blocked_by = blocked_by;
            }
            if let Some(links) = update.links {
                task.links = links;
            }
            if let Some(subtasks) = update.subtasks {
                task.subtasks = subtasks;
                recompute_progress(&mut self.data.tasks[index]);
            }
            self.data.tasks[index].updated_at = now;
        }

        let new_status = self.data.tasks[index].status;
        let (task_id, project_id, title) = {
            let task = &self.data.tasks[index];
            (task.id.clone(), task.project_id.clone(), task.title.clone())
        };

        if new_status != old_status {
            {
                let task = &mut self.data.tasks[index];
                task.activity_log.push(TaskActivity {
                    timestamp: now,
                    action: format!("Status: {} → {}", old_status, new_status),
                    by: DEFAULT_ACTOR.to_string(),
                });
                if new_status == TaskStatus::Done {
                    task.progress = 100;
                }
            }
            self.log_activity(
                "task_moved",
                Some(&task_id),
                project_id.as_deref(),
                format!("Task \"{}\" moved to {}", title, new_status.label()),
                DEFAULT_ACTOR,
            );
            if new_status == TaskStatus::Done {
                self.log_activity(
                    "task_completed",
                    Some(&task_id),
                    project_id.as_deref(),
                    format!("Completed task \"{}\"", title),
                    DEFAULT_ACTOR,
                );
            }
        } else {
            self.log_activity(
                "task_updated",
                Some(&task_id),
                project_id.as_deref(),
                format!("Updated task \"{}\"", title),
                DEFAULT_ACTOR,
            );
        }

        let task = self.data.tasks[index].clone();
        self.persist();
        self.emit_changed(StoreEvent::TaskUpdated(task.clone()));
        Some(task)
    }

    /// Delete a task. Dangling `blockedBy` references to it are left in
    /// place; the dependency check ignores them.
    pub fn delete_task(&mut self, id: &str) -> bool {
        let Some(index) = self.data.tasks.iter().position(|t| t.id == id) else {
            return false;
        };
        let task = self.data.tasks.remove(index);
        if self.active_timer.as_deref() == Some(id) {
            self.active_timer = None;
        }
        self.log_activity(
            "task_deleted",
            Some(&task.id),
            task.project_id.as_deref(),
            format!("Deleted task \"{}\"", task.title),
            DEFAULT_ACTOR,
        );
        self.persist();
        self.emit_changed(StoreEvent::TaskDeleted {
            id: task.id,
            title: task.title,
        });
        true
    }

    // === Dependencies ===

    /// True iff at least one `blockedBy` reference resolves to an existing
    /// task that is not done. Advisory: never enforced on writes.
    pub fn has_unresolved_blockers(&self, task_id: &str) -> bool {
        let Some(task) = self.data.tasks.iter().find(|t| t.id == task_id) else {
            return false;
        };
        task.blocked_by.iter().any(|blocker_id| {
            self.data
                .tasks
                .iter()
                .any(|t| t.id == *blocker_id && t.status != TaskStatus::Done)
        })
    }

    // === Reordering ===

    /// Move a task to `target_index` within the given status column and
    /// rewrite the column's order values 0..n-1. The index is clamped to
    /// the column length. Position only: the task's status is never changed
    /// here. A cross-column move sets the status through `update_task`
    /// first, then reorders the destination column.
    pub fn reorder_task(&mut self, task_id: &str, target_index: usize, status: TaskStatus) -> bool {
        let Some(task_index) = self.data.tasks.iter().position(|t| t.id == task_id) else {
            return false;
        };

        let mut column: Vec<usize> = self
            .data
            .tasks
            .iter()
            .enumerate()
            .filter(|(i, t)| t.status == status && *i != task_index)
            .map(|(i, _)| i)
            .collect();
        column.sort_by_key(|&i| self.data.tasks[i].order);

        let insert_at = target_index.min(column.len());
        column.insert(insert_at, task_index);
        for (position, &index) in column.iter().enumerate() {
            self.data.tasks[index].order = position as u32;
        }

        self.persist();
        self.emit(StoreEvent::DataChanged);
        true
    }

    // === Subtasks ===

    /// Append a subtask and recompute the task's progress.
    pub fn add_subtask(&mut self, task_id: &str, text: &str) -> Option<Subtask> {
        let index = self.data.tasks.iter().position(|t| t.id == task_id)?;
        let subtask = Subtask {
            id: generate_id("sub", text),
            text: text.to_string(),
            completed: false,
        };
        {
            let task = &mut self.data.tasks[index];
            task.subtasks.push(subtask.clone());
            recompute_progress(task);
            task.updated_at = Utc::now();
        }
        let task = self.data.tasks[index].clone();
        self.persist();
        self.emit_changed(StoreEvent::TaskUpdated(task));
        Some(subtask)
    }

    /// Flip a subtask's completed flag and recompute the task's progress.
    pub fn toggle_subtask(&mut self, task_id: &str, subtask_id: &str) -> Option<Subtask> {
        let index = self.data.tasks.iter().position(|t| t.id == task_id)?;
        let toggled = {
            let task = &mut self.data.tasks[index];
            let subtask = task.subtasks.iter_mut().find(|s| s.id == subtask_id)?;
            subtask.completed = !subtask.completed;
            let snapshot = subtask.clone();
            recompute_progress(task);
            task.updated_at = Utc::now();
            snapshot
        };
        let task = self.data.tasks[index].clone();
        self.persist();
        self.emit_changed(StoreEvent::TaskUpdated(task));
        Some(toggled)
    }

    /// Remove a subtask. Removing the last one leaves progress at its
    /// last computed value.
    pub fn remove_subtask(&mut self, task_id: &str, subtask_id: &str) -> bool {
        let Some(index) = self.data.tasks.iter().position(|t| t.id == task_id) else {
            return false;
        };
        let removed = {
            let task = &mut self.data.tasks[index];
            let before = task.subtasks.len();
            task.subtasks.retain(|s| s.id != subtask_id);
            if task.subtasks.len() == before {
                false
            } else {
                recompute_progress(task);
                task.updated_at = Utc::now();
                true
            }
        };
        if !removed {
            return false;
        }
        let task = self.data.tasks[index].clone();
        self.persist();
        self.emit_changed(StoreEvent::TaskUpdated(task));
        true
    }

    // === Comments & notifications ===

    /// Append a comment; @-mentions of roster members each produce one
    /// unread notification (self-mentions included).
    pub fn add_comment(&mut self, task_id: &str, text: &str, author: &str) -> Option<Comment> {
        let index = self.data.tasks.iter().position(|t| t.id == task_id)?;
        let now = Utc::now();
        let comment = Comment {
            id: generate_id("cmt", text),
            text: text.to_string(),
            author: author.to_string(),
            timestamp: now,
        };

        let (title, project_id) = {
            let task = &mut self.data.tasks[index];
            task.comments.push(comment.clone());
            task.activity_log.push(TaskActivity {
                timestamp: now,
                action: "Comment added".to_string(),
                by: author.to_string(),
            });
            task.updated_at = now;
            (task.title.clone(), task.project_id.clone())
        };

        self.log_activity(
            "comment_added",
            Some(task_id),
            project_id.as_deref(),
            format!("Commented on \"{}\"", title),
            author,
        );

        let mut created = Vec::new();
        for member in team::mentions(text) {
            let notification = Notification {
                id: generate_id("ntf", member),
                kind: NotificationKind::Mention,
                task_id: Some(task_id.to_string()),
                task_title: title.clone(),
                from: author.to_string(),
                to: member.to_string(),
                text: text.to_string(),
                read: false,
                timestamp: now,
            };
            self.data.notifications.push(notification.clone());
            created.push(notification);
        }

        let task = self.data.tasks[index].clone();
        self.persist();
        for notification in created {
            self.emit(StoreEvent::NotificationAdded(notification));
        }
        self.emit_changed(StoreEvent::TaskUpdated(task));
        Some(comment)
    }

    /// Notifications addressed to `user`, newest first.
    pub fn notifications(&self, user: &str, unread_only: bool) -> Vec<Notification> {
        let mut list: Vec<Notification> = self
            .data
            .notifications
            .iter()
            .filter(|n| n.to == user && (!unread_only || !n.read))
            .cloned()
            .collect();
        list.reverse();
        list
    }

    /// Mark one notification read.
    pub fn mark_read(&mut self, id: &str) -> bool {
        let Some(notification) = self.data.notifications.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        notification.read = true;
        self.persist();
        self.emit(StoreEvent::DataChanged);
        true
    }

    /// Mark all of `user`'s notifications read; returns how many changed.
    pub fn mark_all_read(&mut self, user: &str) -> usize {
        let mut marked = 0;
        for notification in self
            .data
            .notifications
            .iter_mut()
            .filter(|n| n.to == user && !n.read)
        {
            notification.read = true;
            marked += 1;
        }
        if marked > 0 {
            self.persist();
            self.emit(StoreEvent::DataChanged);
        }
        marked
    }

    /// Count of unread notifications addressed to `user`.
    pub fn unread_count(&self, user: &str) -> usize {
        self.data
            .notifications
            .iter()
            .filter(|n| n.to == user && !n.read)
            .count()
    }

    // === Time tracking ===

    /// The task currently being timed, if any.
    pub fn active_timer(&self) -> Option<&str> {
        self.active_timer.as_deref()
    }

    /// Milliseconds elapsed on the running entry, 0 when idle.
    pub fn running_elapsed_ms(&self) -> i64 {
        let Some(ref task_id) = self.active_timer else {
            return 0;
        };
        self.data
            .tasks
            .iter()
            .find(|t| t.id == *task_id)
            .and_then(|t| t.time_entries.iter().rev().find(|e| e.end_time.is_none()))
            .map(|entry| (Utc::now() - entry.start_time).num_milliseconds().max(0))
            .unwrap_or(0)
    }

    /// Start timing a task. Any running entry anywhere is closed first,
    /// crediting its task, so at most one entry is ever open.
    pub fn start_timer(&mut self, task_id: &str, by: &str) -> Option<TimeEntry> {
        let index = self.data.tasks.iter().position(|t| t.id == task_id)?;
        let now = Utc::now();
        let stopped = self.close_running_entry(now);
        if let Some(ref closed) = stopped {
            self.log_timer_stopped(closed);
        }

        let entry = TimeEntry {
            id: generate_id("time", task_id),
            start_time: now,
            end_time: None,
            author: by.to_string(),
        };
        let (title, project_id) = {
            let task = &mut self.data.tasks[index];
            task.time_entries.push(entry.clone());
            task.updated_at = now;
            (task.title.clone(), task.project_id.clone())
        };
        self.active_timer = Some(task_id.to_string());
        self.log_activity(
            "timer_started",
            Some(task_id),
            project_id.as_deref(),
            format!("Started timer on \"{}\"", title),
            by,
        );
        self.persist();
        if let Some(closed) = stopped {
            self.emit(StoreEvent::TimerStopped {
                task_id: closed.task_id,
            });
        }
        self.emit_changed(StoreEvent::TimerStarted {
            task_id: task_id.to_string(),
        });
        Some(entry)
    }

    /// Stop the running timer. With an explicit `task_id` that isn't the
    /// running task this is a no-op.
    pub fn stop_timer(&mut self, task_id: Option<&str>) -> Option<StoppedTimer> {
        let running = self.active_timer.clone()?;
        if let Some(requested) = task_id {
            if requested != running {
                return None;
            }
        }
        let now = Utc::now();
        let stopped = self.close_running_entry(now)?;
        self.log_timer_stopped(&stopped);
        self.persist();
        self.emit_changed(StoreEvent::TimerStopped {
            task_id: stopped.task_id.clone(),
        });
        Some(stopped)
    }

    /// Close the open entry pointed at by `active_timer`, crediting the
    /// elapsed duration (floored at 0) to the task. Clears the pointer.
    fn close_running_entry(&mut self, now: DateTime<Utc>) -> Option<StoppedTimer> {
        let task_id = self.active_timer.take()?;
        let task = self.data.tasks.iter_mut().find(|t| t.id == task_id)?;
        let entry = task
            .time_entries
            .iter_mut()
            .rev()
            .find(|e| e.end_time.is_none())?;
        entry.end_time = Some(now);
        let elapsed = (now - entry.start_time).num_milliseconds().max(0);
        let closed = entry.clone();
        task.total_time_ms += elapsed;
        task.updated_at = now;
        Some(StoppedTimer {
            task_id,
            entry: closed,
            elapsed_ms: elapsed,
        })
    }

    fn log_timer_stopped(&mut self, stopped: &StoppedTimer) {
        let Some((title, project_id)) = self
            .data
            .tasks
            .iter()
            .find(|t| t.id == stopped.task_id)
            .map(|t| (t.title.clone(), t.project_id.clone()))
        else {
            return;
        };
        self.log_activity(
            "timer_stopped",
            Some(&stopped.task_id),
            project_id.as_deref(),
            format!("Stopped timer on \"{}\"", title),
            &stopped.entry.author,
        );
    }

    /// Timer state is derived from data: scan for an open entry.
    fn rescan_active_timer(&mut self) {
        self.active_timer = self
            .data
            .tasks
            .iter()
            .find(|t| t.time_entries.iter().any(|e| e.end_time.is_none()))
            .map(|t| t.id.clone());
    }

    // === Templates ===

    /// Create a template.
    pub fn create_template(&mut self, new: NewTemplate) -> Template {
        let name = new
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Untitled Template".to_string());
        let id = self.unique_id("tmpl", &name);
        let mut template = Template::new(id, name);
        template.project_id = new.project_id;
        template.assignee = new.assignee;
        template.priority = new.priority.unwrap_or_default();
        template.tags = new.tags.unwrap_or_default();
        template.description = new.description.unwrap_or_default();

        self.data.templates.push(template.clone());
        self.persist();
        self.emit(StoreEvent::DataChanged);
        template
    }

    /// List all templates.
    pub fn list_templates(&self) -> Vec<Template> {
        self.data.templates.clone()
    }

    /// Get a template by ID.
    pub fn get_template(&self, id: &str) -> Option<Template> {
        self.data.templates.iter().find(|t| t.id == id).cloned()
    }

    /// Delete a template.
    pub fn delete_template(&mut self, id: &str) -> bool {
        let before = self.data.templates.len();
        self.data.templates.retain(|t| t.id != id);
        if self.data.templates.len() == before {
            return false;
        }
        self.persist();
        self.emit(StoreEvent::DataChanged);
        true
    }

    // === Activity ===

    /// The newest `limit` global activity entries.
    pub fn get_activity(&self, limit: usize) -> Vec<ActivityEntry> {
        self.data.activity_log.iter().take(limit).cloned().collect()
    }

    /// Activity entries recorded against one project.
    pub fn get_activity_for_project(&self, project_id: &str) -> Vec<ActivityEntry> {
        self.data
            .activity_log
            .iter()
            .filter(|e| e.project_id.as_deref() == Some(project_id))
            .cloned()
            .collect()
    }

    // === Settings ===

    /// Current settings.
    pub fn settings(&self) -> Settings {
        self.data.settings.clone()
    }

    /// Switch the theme.
    pub fn set_theme(&mut self, theme: Theme) -> Settings {
        self.data.settings.theme = theme;
        self.persist();
        self.emit_changed(StoreEvent::SettingsChanged(self.data.settings.clone()));
        self.data.settings.clone()
    }

    // === Import / export / clear ===

    /// The full snapshot as pretty-printed JSON.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }

    /// Replace the whole snapshot from JSON text. Requires `projects` and
    /// `tasks` to be arrays; anything else is rejected with zero mutation.
    pub fn import_json(&mut self, text: &str) -> bool {
        let value: serde_json::Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Import rejected, invalid JSON: {}", e);
                return false;
            }
        };
        let shape_ok = value.get("projects").is_some_and(|v| v.is_array())
            && value.get("tasks").is_some_and(|v| v.is_array());
        if !shape_ok {
            tracing::warn!("Import rejected: projects and tasks arrays are required");
            return false;
        }
        let snapshot: Snapshot = match serde_json::from_value(value) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Import rejected, malformed snapshot: {}", e);
                return false;
            }
        };

        self.data = snapshot;
        self.rescan_active_timer();
        self.persist();
        self.emit_changed(StoreEvent::DataImported(self.data.clone()));
        true
    }

    /// Reset to an empty snapshot.
    pub fn clear_all(&mut self) {
        self.data = Snapshot::empty();
        self.active_timer = None;
        self.persist();
        self.emit_changed(StoreEvent::DataCleared);
    }
}

/// Recompute progress from subtasks: round(100 * completed / total).
/// No-op when the task has no subtasks.
fn recompute_progress(task: &mut Task) {
    if task.subtasks.is_empty() {
        return;
    }
    let total = task.subtasks.len() as f64;
    let completed = task.completed_subtasks() as f64;
    task.progress = ((completed / total) * 100.0).round() as u8;
}

/// Generate a unique ID.
///
/// Format: `<prefix>-<4 hex chars>`, e.g. "task-a1b2". Prefixes in use:
/// proj, task, tmpl, ntf, act, sub, cmt, link, time.
pub fn generate_id(prefix: &str, seed: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hasher.update(
        chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or(0)
            .to_le_bytes(),
    );
    let hash = hasher.finalize();
    let hash_hex = format!("{:x}", hash);
    format!("{}-{}", prefix, &hash_hex[..4])
}
