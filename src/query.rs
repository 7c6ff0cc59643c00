//! Query engine over the flattened task collection.
//!
//! Every view starts from the same pipeline: flatten all users' tasks,
//! apply the filters, and keep only tasks relevant to the current user
//! (created by or assigned to them). All predicates are conjoined; an
//! unset filter passes everything. Queries are pure, so the same store
//! and filter always yield the same tasks in the same order.

use chrono::NaiveDate;

use crate::store::Store;
use crate::task::{Priority, Status, Task};

/// Filters applied to the flattened task list.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Case-insensitive substring match on title or description.
    pub search: Option<String>,
    pub priority: Option<Priority>,
    pub assignee: Option<String>,
    pub due: Option<NaiveDate>,
}

impl TaskFilter {
    fn matches(&self, task: &Task) -> bool {
        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            let in_title = task.title.to_lowercase().contains(&term);
            let in_desc = task.desc.to_lowercase().contains(&term);
            if !in_title && !in_desc {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        if let Some(assignee) = &self.assignee {
            if task.assignee.as_deref() != Some(assignee.as_str()) {
                return false;
            }
        }
        if let Some(due) = self.due {
            if task.date != Some(due) {
                return false;
            }
        }
        true
    }
}

/// Tasks visible to `current_user` that pass `filter`, in store order.
pub fn query<'a>(store: &'a Store, current_user: &str, filter: &TaskFilter) -> Vec<&'a Task> {
    store
        .iter_tasks()
        .filter(|task| task.visible_to(current_user))
        .filter(|task| filter.matches(task))
        .collect()
}

/// A query result partitioned into kanban columns.
///
/// `Status` is a closed enum, so the partition is total: no task is
/// dropped on the way to the board.
#[derive(Debug, Default)]
pub struct Board<'a> {
    pub todo: Vec<&'a Task>,
    pub progress: Vec<&'a Task>,
    pub done: Vec<&'a Task>,
}

impl<'a> Board<'a> {
    pub fn partition(tasks: Vec<&'a Task>) -> Self {
        let mut board = Board::default();
        for task in tasks {
            match task.status {
                Status::Todo => board.todo.push(task),
                Status::Progress => board.progress.push(task),
                Status::Done => board.done.push(task),
            }
        }
        board
    }

    pub fn column(&self, status: Status) -> &[&'a Task] {
        match status {
            Status::Todo => &self.todo,
            Status::Progress => &self.progress,
            Status::Done => &self.done,
        }
    }
}

/// Usernames offered as assignees: everyone but the current user, in
/// registration order.
pub fn assignees(store: &Store, current_user: &str) -> Vec<String> {
    store
        .usernames()
        .filter(|name| *name != current_user)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_store() -> Store {
        let mut store = Store::default();
        store.register("alice", "pw1").unwrap();
        store.register("bob", "pw2").unwrap();
        store.register("carol", "pw3").unwrap();

        let mut report = Task::new("Write report", "alice");
        report.desc = "Quarterly numbers".to_string();
        report.priority = Priority::High;
        report.assignee = Some("bob".to_string());
        report.date = NaiveDate::from_ymd_opt(2026, 9, 1);
        store.insert_task(report).unwrap();

        let mut chores = Task::new("Chores", "alice");
        chores.priority = Priority::Low;
        chores.status = Status::Done;
        store.insert_task(chores).unwrap();

        let mut secret = Task::new("Bob's private task", "bob");
        secret.priority = Priority::High;
        store.insert_task(secret).unwrap();

        store
    }

    #[test]
    fn relevance_keeps_created_and_assigned() {
        let store = seeded_store();

        let alices: Vec<&str> = query(&store, "alice", &TaskFilter::default())
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(alices, vec!["Write report", "Chores"]);

        let bobs: Vec<&str> = query(&store, "bob", &TaskFilter::default())
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(bobs, vec!["Write report", "Bob's private task"]);

        assert!(query(&store, "carol", &TaskFilter::default()).is_empty());
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_desc() {
        let store = seeded_store();

        let filter = TaskFilter {
            search: Some("REPORT".to_string()),
            ..TaskFilter::default()
        };
        assert_eq!(query(&store, "alice", &filter).len(), 1);

        let filter = TaskFilter {
            search: Some("quarterly".to_string()),
            ..TaskFilter::default()
        };
        assert_eq!(query(&store, "alice", &filter).len(), 1);

        let filter = TaskFilter {
            search: Some("missing".to_string()),
            ..TaskFilter::default()
        };
        assert!(query(&store, "alice", &filter).is_empty());
    }

    #[test]
    fn filters_conjoin() {
        let store = seeded_store();

        let filter = TaskFilter {
            priority: Some(Priority::High),
            assignee: Some("bob".to_string()),
            due: NaiveDate::from_ymd_opt(2026, 9, 1),
            ..TaskFilter::default()
        };
        let hits = query(&store, "alice", &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Write report");

        // same filter, wrong due date
        let filter = TaskFilter {
            due: NaiveDate::from_ymd_opt(2026, 9, 2),
            ..filter
        };
        assert!(query(&store, "alice", &filter).is_empty());
    }

    #[test]
    fn query_is_idempotent() {
        let store = seeded_store();
        let filter = TaskFilter {
            priority: Some(Priority::High),
            ..TaskFilter::default()
        };

        let first: Vec<String> = query(&store, "bob", &filter)
            .iter()
            .map(|t| t.id.clone())
            .collect();
        let second: Vec<String> = query(&store, "bob", &filter)
            .iter()
            .map(|t| t.id.clone())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn board_partitions_by_status() {
        let store = seeded_store();
        let board = Board::partition(query(&store, "alice", &TaskFilter::default()));

        assert_eq!(board.todo.len(), 1);
        assert_eq!(board.progress.len(), 0);
        assert_eq!(board.done.len(), 1);
        assert_eq!(board.column(Status::Done)[0].title, "Chores");
    }

    #[test]
    fn assignees_excludes_current_user() {
        let store = seeded_store();
        assert_eq!(assignees(&store, "alice"), vec!["bob", "carol"]);
        assert_eq!(assignees(&store, "bob"), vec!["alice", "carol"]);
    }
}
