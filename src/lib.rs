//! taskdeck - Local Task Dashboard Library
//!
//! This library provides the core functionality for the taskdeck CLI, a
//! local multi-user task dashboard: one shared store of users and tasks,
//! kanban/list queries over it, per-user activity feeds, and statistics.
//!
//! # Core Concepts
//!
//! - **Store**: the authoritative collection of users and their tasks.
//!   On disk it is one `users.json` snapshot partitioned per user; in
//!   memory it is a single task table keyed by task id.
//! - **Relevance**: every view is restricted to tasks created by or
//!   assigned to the session user.
//! - **Activity feed**: a bounded, newest-first log per user.
//! - **Snapshots**: whole-store export/import with user-level merge.
//!
//! # Module Organization
//!
//! - `cli`: command-line interface using clap
//! - `config`: configuration loading from `taskdeck.toml`
//! - `error`: error types and result aliases
//! - `task`: task, comment, priority, and status model
//! - `store`: the user/task store and its snapshot conversion
//! - `query`: filtering and kanban partitioning
//! - `activity`: bounded per-user activity feed
//! - `stats`: aggregate task counts
//! - `snapshot`: export/import of the whole store
//! - `storage`: data directory layout and atomic persistence
//! - `lock`: file locking and atomic writes
//! - `output`: shared CLI output formatting

pub mod activity;
pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod output;
pub mod query;
pub mod snapshot;
pub mod stats;
pub mod storage;
pub mod store;
pub mod task;

pub use error::{Error, Result};
