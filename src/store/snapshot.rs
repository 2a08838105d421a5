//! Snapshot persistence adapters.
//!
//! This module provides the persistence seam for the store:
//! - `Snapshot` - The entire domain state as one JSON document
//! - `SnapshotStore` - Trait for load/save backends
//! - `FileStore` - One pretty-printed JSON file on disk (default)
//! - `MemoryStore` - Blob-in-memory adapter for tests and embedding
//!
//! Loading performs forward migration: every collection and every per-task
//! field added after v1 carries a serde default, so older snapshots remain
//! loadable indefinitely. Schema evolution is additive only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::models::{ActivityEntry, Notification, Project, Settings, Task, Template};
use crate::{Error, Result};

/// The entire persisted domain state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// All projects
    #[serde(default)]
    pub projects: Vec<Project>,

    /// All tasks
    #[serde(default)]
    pub tasks: Vec<Task>,

    /// Global activity log, newest first
    #[serde(default)]
    pub activity_log: Vec<ActivityEntry>,

    /// Task templates
    #[serde(default)]
    pub templates: Vec<Template>,

    /// Mention notifications
    #[serde(default)]
    pub notifications: Vec<Notification>,

    /// Singleton settings
    #[serde(default)]
    pub settings: Settings,

    /// When the snapshot was first created
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// When the snapshot was last written
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Snapshot {
    /// Create an empty snapshot with fresh timestamps.
    pub fn empty() -> Self {
        let now = Utc::now();
        Self {
            projects: Vec::new(),
            tasks: Vec::new(),
            activity_log: Vec::new(),
            templates: Vec::new(),
            notifications: Vec::new(),
            settings: Settings::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Trait for snapshot persistence backends.
///
/// Backends hold the whole domain state as one document; there is no
/// partial write path.
pub trait SnapshotStore: Send + Sync {
    /// Load the snapshot, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<Snapshot>>;

    /// Persist the full snapshot.
    fn save(&mut self, snapshot: &Snapshot) -> Result<()>;

    /// Get the storage location description (for display purposes).
    fn location(&self) -> String;
}

/// File-backed snapshot storage: one pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default data file: `<platform data dir>/command-center/data.json`.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::data_dir()
            .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?;
        Ok(base.join("command-center").join("data.json"))
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&self.path)?;
        let snapshot = serde_json::from_str(&text)?;
        Ok(Some(snapshot))
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;
        // Write to a temp file in the same directory, then rename into
        // place so a crash mid-write never truncates the snapshot.
        let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
        tmp.write_all(json.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory snapshot storage holding the serialized blob.
///
/// Serializes through the same JSON path as `FileStore` so tests exercise
/// the real round trip.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blob: Option<String>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with raw JSON text.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
        }
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        match &self.blob {
            Some(text) => Ok(Some(serde_json::from_str(text)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.blob = Some(serde_json::to_string_pretty(snapshot)?);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
