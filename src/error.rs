//! Error types for taskdeck
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, unknown task, invalid input)
//! - 3: Blocked (invalid credentials, no active session)
//! - 4: Operation failed (io error, corrupt store, lock contention)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the taskdeck CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const AUTH_BLOCKED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskdeck operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Duplicate task id: {0}")]
    DuplicateTaskId(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Auth blocks (exit code 3)
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("No active session; log in first")]
    NotLoggedIn,

    // Operation failures (exit code 4)
    #[error("Malformed snapshot: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::UsernameTaken(_)
            | Error::TaskNotFound(_)
            | Error::DuplicateTaskId(_)
            | Error::Validation(_)
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_) => exit_codes::USER_ERROR,

            // Auth blocks
            Error::InvalidCredentials | Error::NotLoggedIn => exit_codes::AUTH_BLOCKED,

            // Operation failures
            Error::ParseError(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::LockFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

/// Result type alias for taskdeck operations
pub type Result<T> = std::result::Result<T, Error>;
