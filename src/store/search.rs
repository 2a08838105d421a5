//! Case-insensitive substring search across tasks and projects.

use serde::Serialize;

use crate::models::{Project, Task};

use super::Store;

/// Search results stay below this many hits.
const RESULT_CAP: usize = 20;

/// A single search result.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "item", rename_all = "lowercase")]
pub enum SearchHit {
    Task(Task),
    Project(Project),
}

impl Store {
    /// Search tasks (title, description, comments, tags) and then projects
    /// (name, description). Queries shorter than two characters after
    /// trimming return nothing; results are capped at 20.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let needle = query.trim().to_lowercase();
        if needle.chars().count() < 2 {
            return Vec::new();
        }

        let mut hits = Vec::new();
        for task in &self.data.tasks {
            if hits.len() >= RESULT_CAP {
                break;
            }
            let matched = task.title.to_lowercase().contains(&needle)
                || task.description.to_lowercase().contains(&needle)
                || task
                    .comments
                    .iter()
                    .any(|c| c.text.to_lowercase().contains(&needle))
                || task.tags.iter().any(|t| t.to_lowercase().contains(&needle));
            if matched {
                hits.push(SearchHit::Task(task.clone()));
            }
        }
        for project in &self.data.projects {
            if hits.len() >= RESULT_CAP {
                break;
            }
            if project.name.to_lowercase().contains(&needle)
                || project.description.to_lowercase().contains(&needle)
            {
                hits.push(SearchHit::Project(project.clone()));
            }
        }
        hits
    }
}
