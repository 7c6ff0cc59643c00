//! Aggregate task counts for the dashboard header.
//!
//! Statistics are scoped to the tasks a single user's list holds, not the
//! cross-user relevance-filtered set the views use.

use chrono::NaiveDate;
use serde::Serialize;

use crate::task::{Status, Task};

/// Derived counts over one user's task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
}

impl TaskStats {
    /// Compute counts for `tasks` as of `today`.
    ///
    /// A task is overdue when it is not done and its due date is strictly
    /// before `today`; a task due today is not overdue, and a task with no
    /// due date never is.
    pub fn compute<'a>(tasks: impl IntoIterator<Item = &'a Task>, today: NaiveDate) -> Self {
        let mut total = 0;
        let mut completed = 0;
        let mut overdue = 0;

        for task in tasks {
            total += 1;
            if task.status == Status::Done {
                completed += 1;
            } else if task.date.is_some_and(|due| due < today) {
                overdue += 1;
            }
        }

        TaskStats {
            total,
            completed,
            pending: total - completed,
            overdue,
        }
    }
}
