//! Dashboard statistics.
//!
//! Nothing here is cached: every call recomputes from the live snapshot.
//! Week boundaries start on Monday in local time.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;

use crate::models::team::TEAM;
use crate::models::{ProjectStatus, TaskStatus};

use super::Store;

/// Per-assignee status breakdown.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssigneeStats {
    pub total: usize,
    pub blocked: usize,
    pub todo: usize,
    pub onhold: usize,
    #[serde(rename = "in-progress")]
    pub in_progress: usize,
    pub done: usize,
}

/// A point-in-time summary of the whole board.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_projects: usize,
    pub active_projects: usize,
    pub total_tasks: usize,
    /// Task counts keyed by status name; only statuses that occur appear.
    pub by_status: BTreeMap<String, usize>,
    pub blocked: usize,
    pub todo: usize,
    pub onhold: usize,
    pub in_progress: usize,
    pub done: usize,
    /// Done tasks whose last update falls inside the current week.
    pub completed_this_week: usize,
    /// One row per roster member, whether or not they have tasks.
    pub by_assignee: BTreeMap<String, AssigneeStats>,
    /// Tasks strictly past their due date and not done.
    pub overdue_tasks: usize,
    /// This week's completions per weekday, Monday first.
    pub week_histogram: [usize; 7],
}

impl Store {
    /// Compute dashboard statistics from the current snapshot.
    pub fn stats(&self) -> Stats {
        let today = Local::now().date_naive();
        let week_start = start_of_week(today);

        let mut by_status: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_assignee: BTreeMap<String, AssigneeStats> = TEAM
            .iter()
            .map(|m| (m.id.to_string(), AssigneeStats::default()))
            .collect();
        let mut completed_this_week = 0;
        let mut overdue_tasks = 0;
        let mut week_histogram = [0usize; 7];

        for task in &self.data.tasks {
            *by_status.entry(task.status.to_string()).or_insert(0) += 1;

            if let Some(ref assignee) = task.assignee {
                if let Some(row) = by_assignee.get_mut(assignee) {
                    row.total += 1;
                    match task.status {
                        TaskStatus::Blocked => row.blocked += 1,
                        TaskStatus::Todo => row.todo += 1,
                        TaskStatus::OnHold => row.onhold += 1,
                        TaskStatus::InProgress => row.in_progress += 1,
                        TaskStatus::Done => row.done += 1,
                    }
                }
            }

            if task.status == TaskStatus::Done {
                let updated = task.updated_at.with_timezone(&Local).date_naive();
                if updated >= week_start {
                    completed_this_week += 1;
                    week_histogram[updated.weekday().num_days_from_monday() as usize] += 1;
                }
            } else if task.due_date.is_some_and(|due| due < today) {
                overdue_tasks += 1;
            }
        }

        let count = |status: TaskStatus| by_status.get(&status.to_string()).copied().unwrap_or(0);
        let blocked = count(TaskStatus::Blocked);
        let todo = count(TaskStatus::Todo);
        let onhold = count(TaskStatus::OnHold);
        let in_progress = count(TaskStatus::InProgress);
        let done = count(TaskStatus::Done);

        Stats {
            total_projects: self.data.projects.len(),
            active_projects: self
                .data
                .projects
                .iter()
                .filter(|p| p.status == ProjectStatus::Active)
                .count(),
            total_tasks: self.data.tasks.len(),
            by_status,
            blocked,
            todo,
            onhold,
            in_progress,
            done,
            completed_this_week,
            by_assignee,
            overdue_tasks,
            week_histogram,
        }
    }
}

/// Monday of the week containing `date`.
fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}
