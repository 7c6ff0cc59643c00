//! Task model for taskdeck.
//!
//! Tasks live in one authoritative table keyed by id (see `store`), but the
//! on-disk layout keeps each task inside its owner's record for parity with
//! the dashboard snapshot format. Field names serialize in camelCase to match
//! that format.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{Error, Result};

/// Task priority, ordered Low < Medium < High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(Error::InvalidArgument(format!(
                "unknown priority '{other}' (expected Low|Medium|High)"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Priority::parse(s)
    }
}

/// Kanban column a task sits in.
///
/// The validating deserializer makes this total: a loaded task always has one
/// of the three statuses, so the board partition never drops tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Todo,
    Progress,
    Done,
}

impl Status {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(Status::Todo),
            "progress" => Ok(Status::Progress),
            "done" => Ok(Status::Done),
            other => Err(Error::InvalidArgument(format!(
                "unknown status '{other}' (expected todo|progress|done)"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::Progress => "progress",
            Status::Done => "done",
        }
    }

    /// Column heading used by the board view.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Todo => "To Do",
            Status::Progress => "In Progress",
            Status::Done => "Done",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Status::parse(s)
    }
}

/// A comment on a task. Append-only; comments are never edited or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Comment {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::Validation("comment text cannot be empty".to_string()));
        }
        Ok(Self {
            author: author.into(),
            text,
            timestamp: Utc::now(),
        })
    }
}

/// A single task as stored in the dashboard snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub desc: String,
    pub priority: Priority,
    /// Due date (calendar date, no time component)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub status: Status,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task with a fresh timestamp-derived id and `todo` status.
    pub fn new(title: impl Into<String>, created_by: impl Into<String>) -> Self {
        Self {
            id: Ulid::new().to_string(),
            title: title.into(),
            desc: String::new(),
            priority: Priority::Medium,
            date: None,
            assignee: None,
            category: None,
            status: Status::Todo,
            comments: Vec::new(),
            created_by: created_by.into(),
            created_at: Utc::now(),
        }
    }

    /// Relevance predicate: a task is visible to the users who created it or
    /// are assigned to it.
    pub fn visible_to(&self, username: &str) -> bool {
        self.created_by == username || self.assignee.as_deref() == Some(username)
    }

    /// Validate required fields. Run on every task crossing the storage
    /// boundary, so malformed records fail loudly instead of propagating
    /// undefined fields.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation("task id cannot be empty".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(Error::Validation(format!(
                "task {}: title cannot be empty",
                self.id
            )));
        }
        if self.created_by.trim().is_empty() {
            return Err(Error::Validation(format!(
                "task {}: createdBy cannot be empty",
                self.id
            )));
        }
        Ok(())
    }
}

/// Trim an optional field, mapping empty strings to `None`.
///
/// The dashboard stored unassigned tasks with an empty assignee string; that
/// shape still parses but normalizes away.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
