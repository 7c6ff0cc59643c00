//! The user store: authoritative in-memory state for the dashboard.
//!
//! The on-disk snapshot keeps every task inside the record of the user whose
//! list holds it, exactly like the dashboard's `users` blob. In memory the
//! store is restructured: one task table keyed by task id, plus a per-user
//! index of held task ids. Mutating a task by id therefore touches exactly
//! one entry, no matter which user's list holds it, and a task can never be
//! duplicated or silently dropped across lists.
//!
//! `from_snapshot` is the validating boundary: malformed records and
//! duplicate task ids are rejected there instead of propagating.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::activity::{push_entry, ActivityEntry};
use crate::error::{Error, Result};
use crate::task::{Comment, Status, Task};

/// On-disk record for one user, the unit of the `users` snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub password: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub activity: Vec<ActivityEntry>,
}

/// Full serialized store: username -> record, insertion-ordered.
pub type UsersSnapshot = IndexMap<String, UserRecord>;

#[derive(Debug, Clone, Default)]
struct UserAccount {
    password: String,
    activity: Vec<ActivityEntry>,
    /// Ids of the tasks this user's list holds, in insertion order.
    task_ids: IndexSet<String>,
}

/// In-memory store over all users and their tasks.
#[derive(Debug, Clone, Default)]
pub struct Store {
    accounts: IndexMap<String, UserAccount>,
    /// Authoritative task table keyed by task id.
    tasks: IndexMap<String, Task>,
}

impl Store {
    // =========================================================================
    // Users
    // =========================================================================

    /// Create a user with empty task and activity lists.
    pub fn register(&mut self, username: &str, password: &str) -> Result<()> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::Validation("username cannot be empty".to_string()));
        }
        if password.is_empty() {
            return Err(Error::Validation("password cannot be empty".to_string()));
        }
        if self.accounts.contains_key(username) {
            return Err(Error::UsernameTaken(username.to_string()));
        }

        self.accounts.insert(
            username.to_string(),
            UserAccount {
                password: password.to_string(),
                ..UserAccount::default()
            },
        );
        Ok(())
    }

    /// Check credentials with an exact string match.
    ///
    /// Passwords are stored and compared in plaintext, matching the
    /// prototype this store persists. Not a security mechanism.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<()> {
        match self.accounts.get(username) {
            Some(account) if account.password == password => Ok(()),
            _ => Err(Error::InvalidCredentials),
        }
    }

    pub fn contains_user(&self, username: &str) -> bool {
        self.accounts.contains_key(username)
    }

    /// All usernames in registration order.
    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.accounts.keys().map(String::as_str)
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    pub fn find_task(&self, id: &str) -> Result<&Task> {
        self.tasks
            .get(id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))
    }

    /// Username whose list currently holds the task.
    pub fn owner_of(&self, id: &str) -> Option<&str> {
        self.accounts
            .iter()
            .find(|(_, account)| account.task_ids.contains(id))
            .map(|(username, _)| username.as_str())
    }

    /// Insert a brand-new task under its creator's list.
    ///
    /// Duplicate ids are rejected here rather than first-match-wins: the
    /// table keyed by id makes "at most one task per id" structural.
    pub fn insert_task(&mut self, task: Task) -> Result<()> {
        task.validate()?;
        if self.tasks.contains_key(&task.id) {
            return Err(Error::DuplicateTaskId(task.id));
        }
        let account = self
            .accounts
            .get_mut(&task.created_by)
            .ok_or_else(|| Error::Validation(format!("unknown user: {}", task.created_by)))?;

        account.task_ids.insert(task.id.clone());
        self.tasks.insert(task.id.clone(), task);
        Ok(())
    }

    /// Replace a task in place if its id exists anywhere in the store,
    /// keeping whichever user's list holds it; otherwise insert it under
    /// the creator's list.
    pub fn upsert_task(&mut self, task: Task) -> Result<()> {
        task.validate()?;
        if let Some(existing) = self.tasks.get_mut(&task.id) {
            *existing = task;
            Ok(())
        } else {
            self.insert_task(task)
        }
    }

    /// Remove the task from whichever list holds it.
    pub fn delete_task(&mut self, id: &str) -> Result<Task> {
        let task = self
            .tasks
            .shift_remove(id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        for account in self.accounts.values_mut() {
            account.task_ids.shift_remove(id);
        }
        Ok(task)
    }

    /// Set a task's status, returning (old, new) for activity logging.
    pub fn move_task(&mut self, id: &str, new_status: Status) -> Result<(Status, Status)> {
        let task = self
            .tasks
            .get_mut(id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        let old_status = task.status;
        task.status = new_status;
        Ok((old_status, new_status))
    }

    /// Append a comment to a task.
    pub fn add_comment(&mut self, id: &str, author: &str, text: &str) -> Result<()> {
        let comment = Comment::new(author, text)?;
        let task = self
            .tasks
            .get_mut(id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        task.comments.push(comment);
        Ok(())
    }

    /// All tasks, grouped by user in registration order, then per-user
    /// insertion order. This is the iteration order every view sees, so
    /// query output is deterministic.
    pub fn iter_tasks(&self) -> impl Iterator<Item = &Task> {
        self.accounts
            .values()
            .flat_map(|account| account.task_ids.iter())
            .filter_map(|id| self.tasks.get(id))
    }

    /// Tasks held in one user's list (the statistics scope).
    pub fn tasks_owned_by<'a>(&'a self, username: &str) -> Vec<&'a Task> {
        match self.accounts.get(username) {
            Some(account) => account
                .task_ids
                .iter()
                .filter_map(|id| self.tasks.get(id))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    // =========================================================================
    // Activity
    // =========================================================================

    /// Record an activity message for a user, newest first, bounded.
    pub fn record_activity(&mut self, username: &str, message: &str, limit: usize) -> Result<()> {
        let account = self
            .accounts
            .get_mut(username)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown user: {username}")))?;
        push_entry(&mut account.activity, message, limit);
        Ok(())
    }

    /// A user's activity feed, newest first. Empty for unknown users.
    pub fn activity_for(&self, username: &str) -> &[ActivityEntry] {
        self.accounts
            .get(username)
            .map(|account| account.activity.as_slice())
            .unwrap_or(&[])
    }

    // =========================================================================
    // Snapshot conversion
    // =========================================================================

    /// Reassemble the per-user on-disk layout.
    pub fn to_snapshot(&self) -> UsersSnapshot {
        self.accounts
            .iter()
            .map(|(username, account)| {
                let tasks = account
                    .task_ids
                    .iter()
                    .filter_map(|id| self.tasks.get(id).cloned())
                    .collect();
                (
                    username.clone(),
                    UserRecord {
                        password: account.password.clone(),
                        tasks,
                        activity: account.activity.clone(),
                    },
                )
            })
            .collect()
    }

    /// Build a store from the per-user layout, validating every record.
    ///
    /// Fails with `DuplicateTaskId` when two lists (or one list twice)
    /// carry the same id, and with `Validation` on malformed tasks.
    pub fn from_snapshot(snapshot: UsersSnapshot) -> Result<Self> {
        let mut store = Store::default();

        for (username, record) in &snapshot {
            if username.trim().is_empty() {
                return Err(Error::Validation("username cannot be empty".to_string()));
            }
            store.accounts.insert(
                username.clone(),
                UserAccount {
                    password: record.password.clone(),
                    activity: record.activity.clone(),
                    task_ids: IndexSet::new(),
                },
            );
        }

        for (username, record) in snapshot {
            for task in record.tasks {
                task.validate()?;
                if store.tasks.contains_key(&task.id) {
                    return Err(Error::DuplicateTaskId(task.id));
                }
                let account = store
                    .accounts
                    .get_mut(&username)
                    .ok_or_else(|| Error::Validation(format!("unknown user: {username}")))?;
                account.task_ids.insert(task.id.clone());
                store.tasks.insert(task.id.clone(), task);
            }
        }

        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::DEFAULT_ACTIVITY_LIMIT;

    fn store_with_users(users: &[&str]) -> Store {
        let mut store = Store::default();
        for user in users {
            store.register(user, "pw").unwrap();
        }
        store
    }

    #[test]
    fn register_rejects_duplicates() {
        let mut store = Store::default();
        store.register("alice", "pw1").unwrap();
        assert!(matches!(
            store.register("alice", "pw2"),
            Err(Error::UsernameTaken(_))
        ));
    }

    #[test]
    fn authenticate_requires_exact_password() {
        let mut store = Store::default();
        store.register("alice", "pw1").unwrap();

        assert!(store.authenticate("alice", "pw1").is_ok());
        assert!(matches!(
            store.authenticate("alice", "PW1"),
            Err(Error::InvalidCredentials)
        ));
        assert!(matches!(
            store.authenticate("nobody", "pw1"),
            Err(Error::InvalidCredentials)
        ));
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let mut store = store_with_users(&["alice", "bob"]);
        let task = Task::new("One", "alice");
        let mut clash = Task::new("Two", "bob");
        clash.id = task.id.clone();

        store.insert_task(task).unwrap();
        assert!(matches!(
            store.insert_task(clash),
            Err(Error::DuplicateTaskId(_))
        ));
        assert_eq!(store.task_count(), 1);
    }

    #[test]
    fn upsert_by_non_owner_keeps_owning_list() {
        let mut store = store_with_users(&["alice", "bob"]);
        let mut task = Task::new("Draft", "alice");
        task.assignee = Some("bob".to_string());
        let id = task.id.clone();
        store.insert_task(task).unwrap();

        // bob edits: created_by flips to the editor, owner stays alice
        let mut edited = store.find_task(&id).unwrap().clone();
        edited.title = "Draft v2".to_string();
        edited.created_by = "bob".to_string();
        store.upsert_task(edited).unwrap();

        assert_eq!(store.task_count(), 1);
        assert_eq!(store.owner_of(&id), Some("alice"));
        assert_eq!(store.find_task(&id).unwrap().title, "Draft v2");
        assert_eq!(store.tasks_owned_by("alice").len(), 1);
        assert!(store.tasks_owned_by("bob").is_empty());
    }

    #[test]
    fn delete_removes_from_owning_list() {
        let mut store = store_with_users(&["alice"]);
        let task = Task::new("Gone soon", "alice");
        let id = task.id.clone();
        store.insert_task(task).unwrap();

        let removed = store.delete_task(&id).unwrap();
        assert_eq!(removed.title, "Gone soon");
        assert!(matches!(store.find_task(&id), Err(Error::TaskNotFound(_))));
        assert!(store.tasks_owned_by("alice").is_empty());
        assert!(matches!(
            store.delete_task(&id),
            Err(Error::TaskNotFound(_))
        ));
    }

    #[test]
    fn move_reports_old_and_new_status() {
        let mut store = store_with_users(&["alice"]);
        let task = Task::new("Move me", "alice");
        let id = task.id.clone();
        store.insert_task(task).unwrap();

        let (old, new) = store.move_task(&id, Status::Progress).unwrap();
        assert_eq!(old, Status::Todo);
        assert_eq!(new, Status::Progress);
        assert_eq!(store.find_task(&id).unwrap().status, Status::Progress);
    }

    #[test]
    fn comments_append_in_order() {
        let mut store = store_with_users(&["alice", "bob"]);
        let task = Task::new("Discuss", "alice");
        let id = task.id.clone();
        store.insert_task(task).unwrap();

        store.add_comment(&id, "alice", "first").unwrap();
        store.add_comment(&id, "bob", "second").unwrap();
        assert!(store.add_comment(&id, "bob", "  ").is_err());

        let comments = &store.find_task(&id).unwrap().comments;
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].author, "alice");
        assert_eq!(comments[1].text, "second");
    }

    #[test]
    fn activity_is_bounded_and_newest_first() {
        let mut store = store_with_users(&["alice"]);
        for n in 0..25 {
            store
                .record_activity("alice", &format!("event {n}"), DEFAULT_ACTIVITY_LIMIT)
                .unwrap();
        }

        let feed = store.activity_for("alice");
        assert_eq!(feed.len(), DEFAULT_ACTIVITY_LIMIT);
        assert_eq!(feed[0].message, "event 24");
        assert!(store.activity_for("nobody").is_empty());
    }

    #[test]
    fn iteration_order_is_user_then_insertion() {
        let mut store = store_with_users(&["alice", "bob"]);
        store.insert_task(Task::new("b1", "bob")).unwrap();
        store.insert_task(Task::new("a1", "alice")).unwrap();
        store.insert_task(Task::new("a2", "alice")).unwrap();

        let titles: Vec<&str> = store.iter_tasks().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["a1", "a2", "b1"]);
    }

    #[test]
    fn snapshot_round_trip_preserves_everything() {
        let mut store = store_with_users(&["alice", "bob"]);
        let mut task = Task::new("Cross", "alice");
        task.assignee = Some("bob".to_string());
        let id = task.id.clone();
        store.insert_task(task).unwrap();
        store.add_comment(&id, "bob", "on it").unwrap();
        store
            .record_activity("alice", "alice created task", DEFAULT_ACTIVITY_LIMIT)
            .unwrap();

        let rebuilt = Store::from_snapshot(store.to_snapshot()).unwrap();
        assert_eq!(rebuilt.to_snapshot(), store.to_snapshot());
        assert_eq!(rebuilt.owner_of(&id), Some("alice"));
        assert_eq!(rebuilt.activity_for("alice").len(), 1);
    }

    #[test]
    fn from_snapshot_rejects_cross_user_duplicate_ids() {
        let mut store = store_with_users(&["alice", "bob"]);
        store.insert_task(Task::new("Original", "alice")).unwrap();

        let mut snapshot = store.to_snapshot();
        let stolen = snapshot["alice"].tasks[0].clone();
        snapshot["bob"].tasks.push(stolen);

        assert!(matches!(
            Store::from_snapshot(snapshot),
            Err(Error::DuplicateTaskId(_))
        ));
    }
}
