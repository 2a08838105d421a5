//! CLI argument definitions for Command Center.

use clap::{Parser, Subcommand};

/// Version string from the package manifest.
pub fn package_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Short git commit hash recorded at build time.
pub fn git_commit() -> &'static str {
    env!("CC_GIT_COMMIT")
}

/// ISO 8601 timestamp recorded at build time.
pub fn build_timestamp() -> &'static str {
    env!("CC_BUILD_TIMESTAMP")
}

/// Command Center - a single-user project and task tracker.
///
/// Run `cmdc` with no arguments for a status summary, `cmdc board` for the
/// kanban view.
#[derive(Parser, Debug)]
#[command(name = "cmdc")]
#[command(author, version, about = "AI Agent Command Center: projects, tasks, and time tracking", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Snapshot file to use instead of the default data path.
    /// Can also be set via the CC_DATA_FILE environment variable.
    #[arg(short = 'f', long = "data-file", global = true, env = "CC_DATA_FILE")]
    pub data_file: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Project management commands
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Task management commands
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Subtask (checklist) commands
    Subtask {
        #[command(subcommand)]
        command: SubtaskCommands,
    },

    /// Comment commands (@mentions notify roster members)
    Comment {
        #[command(subcommand)]
        command: CommentCommands,
    },

    /// Time tracking commands (one timer runs at a time)
    Timer {
        #[command(subcommand)]
        command: TimerCommands,
    },

    /// Task template commands
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },

    /// Notification commands
    Notification {
        #[command(subcommand)]
        command: NotificationCommands,
    },

    /// Show the kanban board (columns: blocked, todo, onhold, in-progress, done)
    Board,

    /// Show dashboard statistics
    Stats,

    /// Search tasks and projects (two characters minimum)
    Search {
        /// Search query
        query: String,
    },

    /// Show the activity feed, newest first
    Activity {
        /// Only activity recorded against this project
        #[arg(long)]
        project: Option<String>,

        /// Maximum number of entries
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },

    /// Settings management
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// Snapshot management (export/import/clear)
    Data {
        #[command(subcommand)]
        command: DataCommands,
    },

    /// Show version and build information
    BuildInfo,
}

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a new project
    Create {
        /// Project name
        name: String,

        /// Project description
        #[arg(short, long)]
        description: Option<String>,

        /// Status
        #[arg(long, value_parser = ["planning", "active", "on-hold", "completed", "archived"])]
        status: Option<String>,

        /// Priority
        #[arg(short, long, value_parser = ["critical", "high", "medium", "low"])]
        priority: Option<String>,

        /// Assigned roster member (repeatable)
        #[arg(short, long)]
        assignee: Vec<String>,

        /// Accent color as a hex string, e.g. #2196f3
        #[arg(long)]
        color: Option<String>,
    },

    /// List projects
    List,

    /// Show project details with its tasks and activity
    Show {
        /// Project ID (e.g., proj-a1b2)
        id: String,
    },

    /// Update a project
    Update {
        /// Project ID
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New status
        #[arg(long, value_parser = ["planning", "active", "on-hold", "completed", "archived"])]
        status: Option<String>,

        /// New priority
        #[arg(long, value_parser = ["critical", "high", "medium", "low"])]
        priority: Option<String>,

        /// New accent color
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a project and all of its tasks
    Delete {
        /// Project ID
        id: String,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a new task
    Create {
        /// Task title
        title: String,

        /// Project to attach the task to
        #[arg(short, long)]
        project: Option<String>,

        /// Task description
        #[arg(short, long)]
        description: Option<String>,

        /// Status (blocked, todo, onhold, in-progress, done)
        #[arg(long)]
        status: Option<String>,

        /// Priority
        #[arg(long, value_parser = ["critical", "high", "medium", "low"])]
        priority: Option<String>,

        /// Assigned roster member
        #[arg(short, long)]
        assignee: Option<String>,

        /// Tags for the task
        #[arg(short, long)]
        tag: Vec<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Estimated cost
        #[arg(long)]
        estimate: Option<f64>,

        /// Model or tool expected to do the work
        #[arg(long)]
        model: Option<String>,

        /// Task IDs this task is blocked by (repeatable)
        #[arg(long)]
        blocked_by: Vec<String>,

        /// Seed fields from a template; explicit flags override
        #[arg(long)]
        from_template: Option<String>,
    },

    /// List tasks
    List {
        /// Filter by project
        #[arg(long)]
        project: Option<String>,

        /// Filter by status (blocked, todo, onhold, in-progress, done)
        #[arg(long)]
        status: Option<String>,

        /// Filter by assignee
        #[arg(long)]
        assignee: Option<String>,

        /// Filter by priority
        #[arg(long, value_parser = ["critical", "high", "medium", "low"])]
        priority: Option<String>,
    },

    /// Show task details with subtasks, comments, and time entries
    Show {
        /// Task ID (e.g., task-a1b2)
        id: String,
    },

    /// Update a task
    ///
    /// Optional fields (assignee, project, model, due date) are cleared by
    /// passing an empty string. Setting --status done bypasses the blocker
    /// check on purpose.
    Update {
        /// Task ID
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New status (blocked, todo, onhold, in-progress, done)
        #[arg(long)]
        status: Option<String>,

        /// New priority
        #[arg(long, value_parser = ["critical", "high", "medium", "low"])]
        priority: Option<String>,

        /// New assignee ("" clears)
        #[arg(long)]
        assignee: Option<String>,

        /// New project ("" detaches)
        #[arg(long)]
        project: Option<String>,

        /// New model ("" clears)
        #[arg(long)]
        model: Option<String>,

        /// New due date, YYYY-MM-DD ("" clears)
        #[arg(long)]
        due: Option<String>,

        /// Progress percentage (0-100)
        #[arg(long)]
        progress: Option<u8>,

        /// Replace the tag list (repeatable)
        #[arg(long)]
        tag: Option<Vec<String>>,

        /// Replace the blocked-by list (repeatable)
        #[arg(long)]
        blocked_by: Option<Vec<String>>,

        /// New estimated cost
        #[arg(long)]
        estimate: Option<f64>,

        /// New actual cost
        #[arg(long)]
        actual_cost: Option<f64>,
    },

    /// Move a task to another status column
    ///
    /// Refuses to move a task to done while other tasks it is blocked by
    /// are unfinished, unless --force is given.
    Move {
        /// Task ID
        id: String,

        /// Target status (blocked, todo, onhold, in-progress, done)
        #[arg(long)]
        to: String,

        /// Position within the target column (default: end)
        #[arg(long)]
        index: Option<usize>,

        /// Move even with unresolved blockers
        #[arg(long)]
        force: bool,
    },

    /// Move a task to a position within a status column
    ///
    /// Reordering never changes the task's status; use `task move` to
    /// switch columns.
    Reorder {
        /// Task ID
        id: String,

        /// Target position, clamped to the column length
        index: usize,

        /// Column to reorder within (default: the task's current status)
        #[arg(long)]
        status: Option<String>,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

/// Subtask subcommands
#[derive(Subcommand, Debug)]
pub enum SubtaskCommands {
    /// Add a subtask to a task
    Add {
        /// Task ID
        task_id: String,

        /// Subtask text
        text: String,
    },

    /// Toggle a subtask's completed flag
    Toggle {
        /// Task ID
        task_id: String,

        /// Subtask ID (e.g., sub-a1b2)
        subtask_id: String,
    },

    /// Remove a subtask
    Rm {
        /// Task ID
        task_id: String,

        /// Subtask ID
        subtask_id: String,
    },
}

/// Comment subcommands
#[derive(Subcommand, Debug)]
pub enum CommentCommands {
    /// Add a comment to a task (@kris, @taylor, @nyx send notifications)
    Add {
        /// Task ID
        task_id: String,

        /// Comment text
        text: String,

        /// Comment author
        #[arg(long, default_value = "user")]
        by: String,
    },

    /// List a task's comments
    List {
        /// Task ID
        task_id: String,
    },
}

/// Timer subcommands
#[derive(Subcommand, Debug)]
pub enum TimerCommands {
    /// Start timing a task (stops any running timer first)
    Start {
        /// Task ID
        task_id: String,

        /// Who is working
        #[arg(long, default_value = "user")]
        by: String,
    },

    /// Stop the running timer
    Stop {
        /// Task ID (default: whichever task is running)
        task_id: Option<String>,
    },

    /// Show the running timer, if any
    Status,
}

/// Template subcommands
#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    /// Create a task template
    Create {
        /// Template name
        name: String,

        /// Default project for tasks created from this template
        #[arg(short, long)]
        project: Option<String>,

        /// Default assignee
        #[arg(short, long)]
        assignee: Option<String>,

        /// Default priority
        #[arg(long, value_parser = ["critical", "high", "medium", "low"])]
        priority: Option<String>,

        /// Default tags (repeatable)
        #[arg(short, long)]
        tag: Vec<String>,

        /// Default description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List templates
    List,

    /// Delete a template
    Delete {
        /// Template ID (e.g., tmpl-a1b2)
        id: String,
    },
}

/// Notification subcommands
#[derive(Subcommand, Debug)]
pub enum NotificationCommands {
    /// List notifications for a roster member, newest first
    List {
        /// Recipient (kris, taylor, nyx)
        user: String,

        /// Only unread notifications
        #[arg(long)]
        unread: bool,
    },

    /// Mark one notification read
    Read {
        /// Notification ID (e.g., ntf-a1b2)
        id: String,
    },

    /// Mark all of a member's notifications read
    ReadAll {
        /// Recipient
        user: String,
    },

    /// Count unread notifications for a member
    Count {
        /// Recipient
        user: String,
    },
}

/// Settings subcommands
#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show current settings
    Show,

    /// Switch the color theme
    Theme {
        /// Theme name
        #[arg(value_parser = ["dark", "light"])]
        theme: String,
    },
}

/// Snapshot management subcommands
#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Export the snapshot as pretty-printed JSON
    Export {
        /// Output path (omit for stdout)
        output: Option<std::path::PathBuf>,
    },

    /// Import a snapshot, replacing all current data
    Import {
        /// Input path (use '-' for stdin)
        input: String,
    },

    /// Delete all data and start fresh
    Clear {
        /// Confirm the wipe
        #[arg(long)]
        force: bool,
    },
}
