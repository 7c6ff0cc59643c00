//! Storage layer for taskdeck
//!
//! Manages persistent state in a single data directory:
//!
//! ```text
//! <data-dir>/
//!   users.json      # Full store snapshot, rewritten wholesale on every write
//!   users.json.lock # Lock file serializing concurrent sessions
//!   session         # Username of the active session (absent when logged out)
//!   theme           # Display preference (dark / light)
//!   taskdeck.toml   # Optional configuration
//! ```
//!
//! Every mutation runs load -> mutate -> save as one unit under the store
//! lock, so a read after a write always observes that write.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::store::{Store, UsersSnapshot};

/// Store snapshot filename
pub const USERS_FILE: &str = "users.json";

/// Active session filename
pub const SESSION_FILE: &str = "session";

/// Theme preference filename
pub const THEME_FILE: &str = "theme";

/// Storage manager for taskdeck state
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    /// Create a storage manager rooted at the given data directory
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Resolve the data directory: explicit override first, then the
    /// platform data dir, then `.taskdeck` under the current directory.
    pub fn resolve(data_dir: Option<PathBuf>) -> Self {
        let dir = data_dir
            .or_else(|| {
                ProjectDirs::from("", "", "taskdeck")
                    .map(|dirs| dirs.data_dir().to_path_buf())
            })
            .unwrap_or_else(|| PathBuf::from(".taskdeck"));
        Self::new(dir)
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir.join(USERS_FILE)
    }

    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }

    pub fn theme_file(&self) -> PathBuf {
        self.data_dir.join(THEME_FILE)
    }

    fn store_lock_file(&self) -> PathBuf {
        let path = self.users_file();
        PathBuf::from(format!("{}.lock", path.display()))
    }

    /// Initialize the data directory
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    /// Load configuration from the data directory
    pub fn load_config(&self) -> Config {
        Config::load_from_dir(&self.data_dir)
    }

    // =========================================================================
    // Store snapshot
    // =========================================================================

    /// Read and validate the store snapshot. A missing file is an empty
    /// store; a corrupt one fails with `ParseError`.
    pub fn load_store(&self) -> Result<Store> {
        let store = self.load_store_unlocked()?;
        debug!(
            users = store.usernames().count(),
            tasks = store.task_count(),
            "loaded store"
        );
        Ok(store)
    }

    /// Persist the whole store synchronously (atomic temp + rename under
    /// the store lock).
    pub fn save_store(&self, store: &Store) -> Result<()> {
        self.init()?;
        let json = serde_json::to_string_pretty(&store.to_snapshot())?;
        lock::write_atomic_locked(&self.users_file(), json.as_bytes(), DEFAULT_LOCK_TIMEOUT_MS)?;
        debug!(tasks = store.task_count(), "saved store");
        Ok(())
    }

    /// Run a mutation as one atomic load -> mutate -> save unit.
    ///
    /// The store lock is held across the whole closure, serializing
    /// concurrent sessions against the shared store.
    pub fn update_store<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Store) -> Result<T>,
    {
        self.init()?;
        let _lock = FileLock::acquire(self.store_lock_file(), DEFAULT_LOCK_TIMEOUT_MS)?;

        let mut store = self.load_store_unlocked()?;
        let result = f(&mut store)?;

        let json = serde_json::to_string_pretty(&store.to_snapshot())?;
        lock::write_atomic(self.users_file(), json.as_bytes())?;

        Ok(result)
    }

    fn load_store_unlocked(&self) -> Result<Store> {
        let path = self.users_file();
        if !path.exists() {
            return Ok(Store::default());
        }
        let content = fs::read_to_string(&path)?;
        let snapshot: UsersSnapshot = serde_json::from_str(&content)
            .map_err(|err| Error::ParseError(format!("{}: {err}", path.display())))?;
        Store::from_snapshot(snapshot)
    }

    // =========================================================================
    // Session persistence
    // =========================================================================

    /// Read the active session username, if any
    pub fn read_session(&self) -> Option<String> {
        let raw = fs::read_to_string(self.session_file()).ok()?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Persist the active session username
    pub fn write_session(&self, username: &str) -> Result<()> {
        self.init()?;
        lock::write_atomic(self.session_file(), username.as_bytes())
    }

    /// Remove the active session
    pub fn clear_session(&self) -> Result<()> {
        let path = self.session_file();
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// The active session username, or `NotLoggedIn`
    pub fn require_session(&self) -> Result<String> {
        self.read_session().ok_or(Error::NotLoggedIn)
    }

    // =========================================================================
    // Theme preference
    // =========================================================================

    /// Read the persisted theme, defaulting to `dark`
    pub fn read_theme(&self) -> String {
        fs::read_to_string(self.theme_file())
            .map(|raw| raw.trim().to_string())
            .ok()
            .filter(|theme| !theme.is_empty())
            .unwrap_or_else(|| "dark".to_string())
    }

    /// Persist the theme preference
    pub fn write_theme(&self, theme: &str) -> Result<()> {
        match theme {
            "dark" | "light" => {}
            other => {
                return Err(Error::InvalidArgument(format!(
                    "unknown theme '{other}' (expected dark|light)"
                )))
            }
        }
        self.init()?;
        lock::write_atomic(self.theme_file(), theme.as_bytes())
    }
}
