//! Data models for Command Center entities.
//!
//! This module defines the core data structures:
//! - `Project` - Containers for grouping work, with milestones and links
//! - `Task` - Work items with status, priority, subtasks, comments, and timers
//! - `Template` - Stamps that pre-fill new-task creation
//! - `Notification` - Unread/read mention notices addressed to a team member
//! - `ActivityEntry` - Global activity log entries
//! - `Settings` - Singleton app settings
//!
//! All persisted structs serialize with camelCase field names so the JSON
//! snapshot keeps the layout older data files already use.

pub mod team;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Task status, one kanban column per value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Blocked,
    #[default]
    Todo,
    #[serde(rename = "onhold")]
    OnHold,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Board columns in display order.
    pub fn board_order() -> &'static [TaskStatus] {
        &[
            TaskStatus::Blocked,
            TaskStatus::Todo,
            TaskStatus::OnHold,
            TaskStatus::InProgress,
            TaskStatus::Done,
        ]
    }

    /// Human-facing column label, emoji included.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Blocked => "🔴 Blocked",
            TaskStatus::Todo => "🟡 To-Do",
            TaskStatus::OnHold => "⏸️ On Hold",
            TaskStatus::InProgress => "🔵 In Progress",
            TaskStatus::Done => "✅ Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Blocked => "blocked",
            TaskStatus::Todo => "todo",
            TaskStatus::OnHold => "onhold",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "blocked" => Ok(TaskStatus::Blocked),
            "todo" => Ok(TaskStatus::Todo),
            "onhold" | "on-hold" => Ok(TaskStatus::OnHold),
            "in-progress" | "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            _ => Err(format!("Unknown task status: {}", s)),
        }
    }
}

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    OnHold,
    Completed,
    Archived,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProjectStatus::Planning => "planning",
            ProjectStatus::Active => "active",
            ProjectStatus::OnHold => "on-hold",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Archived => "archived",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "planning" => Ok(ProjectStatus::Planning),
            "active" => Ok(ProjectStatus::Active),
            "on-hold" | "onhold" => Ok(ProjectStatus::OnHold),
            "completed" => Ok(ProjectStatus::Completed),
            "archived" => Ok(ProjectStatus::Archived),
            _ => Err(format!("Unknown project status: {}", s)),
        }
    }
}

/// Priority shared by projects, tasks, and templates.
///
/// Ordered highest first so sorting ascending surfaces urgent work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Priority::Critical),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// UI color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}

/// Kind of notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Mention,
}

/// Deserialize an optional string treating `""` as `None`.
///
/// Older snapshots stored cleared references as empty strings.
fn de_opt_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// A labeled URL attached to a project or task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRef {
    /// Unique identifier (e.g., "link-a1b2")
    pub id: String,

    /// Display label
    pub label: String,

    /// Link target
    pub url: String,
}

/// A dated project milestone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Milestone name
    pub name: String,

    /// Target date
    pub date: NaiveDate,

    /// Whether the milestone has been reached
    #[serde(default)]
    pub completed: bool,
}

/// A checklist item belonging to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    /// Unique identifier (e.g., "sub-a1b2")
    pub id: String,

    /// Checklist text
    pub text: String,

    /// Whether the item is checked off
    #[serde(default)]
    pub completed: bool,
}

/// A comment on a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier (e.g., "cmt-a1b2")
    pub id: String,

    /// Comment body
    pub text: String,

    /// Team member who wrote the comment
    pub author: String,

    /// When the comment was added
    pub timestamp: DateTime<Utc>,
}

/// One tracked span of work on a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    /// Unique identifier (e.g., "time-a1b2")
    pub id: String,

    /// When tracking started
    pub start_time: DateTime<Utc>,

    /// When tracking stopped; `None` while the timer is running
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,

    /// Team member who ran the timer
    pub author: String,
}

/// An activity entry recorded on the task itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskActivity {
    /// When it happened
    pub timestamp: DateTime<Utc>,

    /// What happened (e.g., "Status: todo → done")
    pub action: String,

    /// Actor id
    pub by: String,
}

/// A container for related tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier (e.g., "proj-a1b2")
    pub id: String,

    /// Project name
    pub name: String,

    /// Detailed description
    #[serde(default)]
    pub description: String,

    /// Current lifecycle status
    #[serde(default)]
    pub status: ProjectStatus,

    /// Priority level
    #[serde(default)]
    pub priority: Priority,

    /// Team members assigned to the project
    #[serde(default)]
    pub assignees: Vec<String>,

    /// External references
    #[serde(default)]
    pub links: Vec<LinkRef>,

    /// Dated checkpoints
    #[serde(default)]
    pub milestones: Vec<Milestone>,

    /// Display color (hex)
    #[serde(default = "default_project_color")]
    pub color: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

fn default_project_color() -> String {
    "#2196f3".to_string()
}

impl Project {
    /// Create a new project with the given ID and name.
    pub fn new(id: String, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            description: String::new(),
            status: ProjectStatus::default(),
            priority: Priority::default(),
            assignees: Vec::new(),
            links: Vec::new(),
            milestones: Vec::new(),
            color: default_project_color(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A work item tracked on the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier (e.g., "task-a1b2")
    pub id: String,

    /// Owning project, if any. Weak reference: may point at a deleted project.
    #[serde(default, deserialize_with = "de_opt_string")]
    pub project_id: Option<String>,

    /// Task title
    pub title: String,

    /// Detailed description
    #[serde(default)]
    pub description: String,

    /// Board column the task sits in
    #[serde(default)]
    pub status: TaskStatus,

    /// Priority level
    #[serde(default)]
    pub priority: Priority,

    /// Assigned team member
    #[serde(default, deserialize_with = "de_opt_string")]
    pub assignee: Option<String>,

    /// Tags for categorization
    #[serde(default)]
    pub tags: Vec<String>,

    /// Due date
    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    /// Estimated cost
    #[serde(default)]
    pub estimated_cost: Option<f64>,

    /// Actual cost
    #[serde(default)]
    pub actual_cost: Option<f64>,

    /// Model label (free text)
    #[serde(default, deserialize_with = "de_opt_string")]
    pub model: Option<String>,

    /// Completion percentage (0-100)
    #[serde(default)]
    pub progress: u8,

    /// Position within the status column
    #[serde(default)]
    pub order: u32,

    /// Checklist items
    #[serde(default)]
    pub subtasks: Vec<Subtask>,

    /// Discussion
    #[serde(default)]
    pub comments: Vec<Comment>,

    /// External references
    #[serde(default)]
    pub links: Vec<LinkRef>,

    /// Task IDs this task depends on
    #[serde(default)]
    pub blocked_by: Vec<String>,

    /// Tracked work spans
    #[serde(default)]
    pub time_entries: Vec<TimeEntry>,

    /// Accumulated milliseconds from completed time entries
    #[serde(default)]
    pub total_time_ms: i64,

    /// Per-task activity history
    #[serde(default)]
    pub activity_log: Vec<TaskActivity>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task with the given ID and title.
    pub fn new(id: String, title: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            project_id: None,
            title,
            description: String::new(),
            status: TaskStatus::default(),
            priority: Priority::default(),
            assignee: None,
            tags: Vec::new(),
            due_date: None,
            estimated_cost: None,
            actual_cost: None,
            model: None,
            progress: 0,
            order: 0,
            subtasks: Vec::new(),
            comments: Vec::new(),
            links: Vec::new(),
            blocked_by: Vec::new(),
            time_entries: Vec::new(),
            total_time_ms: 0,
            activity_log: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The number of completed subtasks.
    pub fn completed_subtasks(&self) -> usize {
        self.subtasks.iter().filter(|s| s.completed).count()
    }
}

/// A stamp that pre-fills new-task creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Unique identifier (e.g., "tmpl-a1b2")
    pub id: String,

    /// Template name
    pub name: String,

    /// Default project for stamped tasks
    #[serde(default, deserialize_with = "de_opt_string")]
    pub project_id: Option<String>,

    /// Default assignee for stamped tasks
    #[serde(default, deserialize_with = "de_opt_string")]
    pub assignee: Option<String>,

    /// Default priority for stamped tasks
    #[serde(default)]
    pub priority: Priority,

    /// Default tags for stamped tasks
    #[serde(default)]
    pub tags: Vec<String>,

    /// Default description for stamped tasks
    #[serde(default)]
    pub description: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Template {
    /// Create a new template with the given ID and name.
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            project_id: None,
            assignee: None,
            priority: Priority::default(),
            tags: Vec::new(),
            description: String::new(),
            created_at: Utc::now(),
        }
    }
}

/// An @-mention notice addressed to one team member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique identifier (e.g., "ntf-a1b2")
    pub id: String,

    /// Notification kind marker
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,

    /// Task the mention happened on
    #[serde(default)]
    pub task_id: Option<String>,

    /// Task title at mention time
    #[serde(default)]
    pub task_title: String,

    /// Team member who wrote the mention
    pub from: String,

    /// Team member being notified
    pub to: String,

    /// Comment text at mention time
    #[serde(default)]
    pub text: String,

    /// Whether the notice has been seen
    #[serde(default)]
    pub read: bool,

    /// When the mention happened
    pub timestamp: DateTime<Utc>,
}

/// One entry in the global activity log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    /// Unique identifier (e.g., "act-a1b2")
    pub id: String,

    /// Machine tag (e.g., "task_moved", "comment_added")
    pub action: String,

    /// Related task, if any
    #[serde(default)]
    pub task_id: Option<String>,

    /// Related project, if any
    #[serde(default)]
    pub project_id: Option<String>,

    /// Human-readable summary
    pub details: String,

    /// Actor id
    pub by: String,

    /// When it happened
    pub timestamp: DateTime<Utc>,
}

/// Singleton application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// UI theme
    #[serde(default)]
    pub theme: Theme,

    /// When the settings record was created
    pub created_at: DateTime<Utc>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            created_at: Utc::now(),
        }
    }
}
