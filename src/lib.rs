//! Command Center - A single-user project and task tracking library.
//!
//! This library provides the core functionality for the `cmdc` CLI tool,
//! including project/task management, time tracking, and a JSON snapshot store.

pub mod cli;
pub mod commands;
pub mod models;
pub mod store;

/// Library-level error type for Command Center operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Task is blocked: {0}")]
    Blocked(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Command Center operations.
pub type Result<T> = std::result::Result<T, Error>;
