//! Per-user activity feed.
//!
//! A bounded, newest-first log of human-readable event messages. New entries
//! go in at the head; the tail is truncated past the configured limit, so the
//! feed never needs sorting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of entries retained per user.
pub const DEFAULT_ACTIVITY_LIMIT: usize = 20;

/// One entry in a user's activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Prepend a new entry and truncate to `limit`, keeping newest-first order.
pub fn push_entry(feed: &mut Vec<ActivityEntry>, message: impl Into<String>, limit: usize) {
    feed.insert(0, ActivityEntry::new(message));
    feed.truncate(limit);
}
