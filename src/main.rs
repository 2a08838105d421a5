//! Command Center CLI - a single-user project and task tracker.

use clap::Parser;
use command_center::cli::{
    Cli, CommentCommands, Commands, DataCommands, NotificationCommands, ProjectCommands,
    SettingsCommands, SubtaskCommands, TaskCommands, TemplateCommands, TimerCommands,
};
use command_center::commands::{self, Output};
use command_center::store::{FileStore, Store};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    init_tracing();

    // Determine data file: --data-file flag > CC_DATA_FILE env > platform default
    let data_file = resolve_data_file(cli.data_file, human);
    let mut store = Store::open(FileStore::new(data_file));

    if let Err(e) = run_command(cli.command, &mut store, human) {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({"error": e.to_string()}));
        }
        process::exit(1);
    }
}

/// Diagnostics go to stderr so stdout stays machine-parseable.
/// `RUST_LOG` overrides the default `warn` filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolve the snapshot path. clap already folds the CC_DATA_FILE
/// environment variable into the flag value.
fn resolve_data_file(explicit_path: Option<PathBuf>, human: bool) -> PathBuf {
    match explicit_path {
        Some(path) => path,
        None => match FileStore::default_path() {
            Ok(path) => path,
            Err(e) => {
                if human {
                    eprintln!("Error: {}", e);
                } else {
                    eprintln!("{}", serde_json::json!({"error": e.to_string()}));
                }
                process::exit(1);
            }
        },
    }
}

fn run_command(
    command: Option<Commands>,
    store: &mut Store,
    human: bool,
) -> Result<(), command_center::Error> {
    match command {
        Some(Commands::Project { command }) => match command {
            ProjectCommands::Create {
                name,
                description,
                status,
                priority,
                assignee,
                color,
            } => {
                let result = commands::project_create(
                    store,
                    name,
                    description,
                    status,
                    priority,
                    assignee,
                    color,
                )?;
                output(&result, human);
            }
            ProjectCommands::List => {
                let result = commands::project_list(store)?;
                output(&result, human);
            }
            ProjectCommands::Show { id } => {
                let result = commands::project_show(store, &id)?;
                output(&result, human);
            }
            ProjectCommands::Update {
                id,
                name,
                description,
                status,
                priority,
                color,
            } => {
                let result = commands::project_update(
                    store,
                    &id,
                    name,
                    description,
                    status,
                    priority,
                    color,
                )?;
                output(&result, human);
            }
            ProjectCommands::Delete { id } => {
                let result = commands::project_delete(store, &id)?;
                output(&result, human);
            }
        },
        Some(Commands::Task { command }) => match command {
            TaskCommands::Create {
                title,
                project,
                description,
                status,
                priority,
                assignee,
                tag,
                due,
                estimate,
                model,
                blocked_by,
                from_template,
            } => {
                let result = commands::task_create(
                    store,
                    title,
                    project,
                    description,
                    status,
                    priority,
                    assignee,
                    tag,
                    due,
                    estimate,
                    model,
                    blocked_by,
                    from_template,
                )?;
                output(&result, human);
            }
            TaskCommands::List {
                project,
                status,
                assignee,
                priority,
            } => {
                let result = commands::task_list(store, project, status, assignee, priority)?;
                output(&result, human);
            }
            TaskCommands::Show { id } => {
                let result = commands::task_show(store, &id)?;
                output(&result, human);
            }
            TaskCommands::Update {
                id,
                title,
                description,
                status,
                priority,
                assignee,
                project,
                model,
                due,
                progress,
                tag,
                blocked_by,
                estimate,
                actual_cost,
            } => {
                let result = commands::task_update(
                    store,
                    &id,
                    title,
                    description,
                    status,
                    priority,
                    assignee,
                    project,
                    model,
                    due,
                    progress,
                    tag,
                    blocked_by,
                    estimate,
                    actual_cost,
                )?;
                output(&result, human);
            }
            TaskCommands::Move {
                id,
                to,
                index,
                force,
            } => {
                let result = commands::task_move(store, &id, &to, index, force)?;
                output(&result, human);
            }
            TaskCommands::Reorder { id, index, status } => {
                let result = commands::task_reorder(store, &id, index, status)?;
                output(&result, human);
            }
            TaskCommands::Delete { id } => {
                let result = commands::task_delete(store, &id)?;
                output(&result, human);
            }
        },
        Some(Commands::Subtask { command }) => match command {
            SubtaskCommands::Add { task_id, text } => {
                let result = commands::subtask_add(store, &task_id, &text)?;
                output(&result, human);
            }
            SubtaskCommands::Toggle {
                task_id,
                subtask_id,
            } => {
                let result = commands::subtask_toggle(store, &task_id, &subtask_id)?;
                output(&result, human);
            }
            SubtaskCommands::Rm {
                task_id,
                subtask_id,
            } => {
                let result = commands::subtask_rm(store, &task_id, &subtask_id)?;
                output(&result, human);
            }
        },
        Some(Commands::Comment { command }) => match command {
            CommentCommands::Add { task_id, text, by } => {
                let result = commands::comment_add(store, &task_id, &text, &by)?;
                output(&result, human);
            }
            CommentCommands::List { task_id } => {
                let result = commands::comment_list(store, &task_id)?;
                output(&result, human);
            }
        },
        Some(Commands::Timer { command }) => match command {
            TimerCommands::Start { task_id, by } => {
                let result = commands::timer_start(store, &task_id, &by)?;
                output(&result, human);
            }
            TimerCommands::Stop { task_id } => {
                let result = commands::timer_stop(store, task_id.as_deref())?;
                output(&result, human);
            }
            TimerCommands::Status => {
                let result = commands::timer_status(store)?;
                output(&result, human);
            }
        },
        Some(Commands::Template { command }) => match command {
            TemplateCommands::Create {
                name,
                project,
                assignee,
                priority,
                tag,
                description,
            } => {
                let result = commands::template_create(
                    store,
                    name,
                    project,
                    assignee,
                    priority,
                    tag,
                    description,
                )?;
                output(&result, human);
            }
            TemplateCommands::List => {
                let result = commands::template_list(store)?;
                output(&result, human);
            }
            TemplateCommands::Delete { id } => {
                let result = commands::template_delete(store, &id)?;
                output(&result, human);
            }
        },
        Some(Commands::Notification { command }) => match command {
            NotificationCommands::List { user, unread } => {
                let result = commands::notification_list(store, &user, unread)?;
                output(&result, human);
            }
            NotificationCommands::Read { id } => {
                let result = commands::notification_read(store, &id)?;
                output(&result, human);
            }
            NotificationCommands::ReadAll { user } => {
                let result = commands::notification_read_all(store, &user)?;
                output(&result, human);
            }
            NotificationCommands::Count { user } => {
                let result = commands::notification_count(store, &user)?;
                output(&result, human);
            }
        },
        Some(Commands::Board) => {
            let result = commands::board(store)?;
            output(&result, human);
        }
        Some(Commands::Stats) => {
            let result = commands::stats(store)?;
            output(&result, human);
        }
        Some(Commands::Search { query }) => {
            let result = commands::search(store, &query)?;
            output(&result, human);
        }
        Some(Commands::Activity { project, limit }) => {
            let result = commands::activity(store, project.as_deref(), limit)?;
            output(&result, human);
        }
        Some(Commands::Settings { command }) => match command {
            SettingsCommands::Show => {
                let result = commands::settings_show(store)?;
                output(&result, human);
            }
            SettingsCommands::Theme { theme } => {
                let result = commands::settings_theme(store, &theme)?;
                output(&result, human);
            }
        },
        Some(Commands::Data { command }) => match command {
            DataCommands::Export { output: path } => {
                let result = commands::data_export(store, path)?;
                output(&result, human);
            }
            DataCommands::Import { input } => {
                let result = commands::data_import(store, &input)?;
                output(&result, human);
            }
            DataCommands::Clear { force } => {
                let result = commands::data_clear(store, force)?;
                output(&result, human);
            }
        },
        Some(Commands::BuildInfo) => {
            let result = serde_json::json!({
                "version": command_center::cli::package_version(),
                "commit": command_center::cli::git_commit(),
                "built": command_center::cli::build_timestamp(),
            });
            if human {
                println!("Version: {}", command_center::cli::package_version());
                println!("Commit:  {}", command_center::cli::git_commit());
                println!("Built:   {}", command_center::cli::build_timestamp());
            } else {
                println!("{}", result);
            }
        }
        None => {
            // Default: show status summary
            let result = commands::status(store)?;
            output(&result, human);
        }
    }

    Ok(())
}

/// Print output in JSON or human-readable format.
fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
