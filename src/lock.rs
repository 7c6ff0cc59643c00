//! File locking and atomic writes for taskdeck
//!
//! The whole store is rewritten on every mutation, so writers must never
//! leave a partial file behind and concurrent sessions must be serialized:
//! - File locking (fs2/flock) around store writes
//! - Atomic write pattern (write temp + rename)
//! - Lock timeout with configurable wait

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;

use crate::error::{Error, Result};

/// Default lock timeout in milliseconds
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5000;

/// Default retry interval when waiting for a lock
const LOCK_RETRY_INTERVAL_MS: u64 = 50;

fn is_lock_contended(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::WouldBlock {
        return true;
    }

    // On Windows, fs2/libc can surface lock/sharing violations as "Other".
    // Treat them as contention so callers get Err(LockFailed) after timeout.
    #[cfg(windows)]
    {
        matches!(err.raw_os_error(), Some(32) | Some(33))
    }
    #[cfg(not(windows))]
    {
        false
    }
}

/// A file lock guard that releases the lock when dropped
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Acquire an exclusive lock on a file with timeout
    ///
    /// If the file doesn't exist, it will be created.
    /// Returns an error if the lock cannot be acquired within the timeout.
    pub fn acquire(path: impl AsRef<Path>, timeout_ms: u64) -> Result<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Open or create the lock file
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let start = Instant::now();
        let timeout = Duration::from_millis(timeout_ms);
        let retry_interval = Duration::from_millis(LOCK_RETRY_INTERVAL_MS);

        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    return Ok(FileLock {
                        file,
                        path: path.to_path_buf(),
                    });
                }
                Err(e) if is_lock_contended(&e) => {
                    // Lock is held by another process
                    if start.elapsed() >= timeout {
                        return Err(Error::LockFailed(path.to_path_buf()));
                    }
                    std::thread::sleep(retry_interval);
                }
                Err(e) => {
                    return Err(Error::Io(e));
                }
            }
        }
    }

    /// Get the path to the locked file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock the file - ignore errors during drop
        let _ = self.file.unlock();
    }
}

/// Atomically write data to a file
///
/// This writes to a temporary file in the same directory, then renames
/// it to the target path. This ensures the file is either fully written
/// or not modified at all.
///
/// Note: This does NOT acquire a lock. Use `write_atomic_locked` if you
/// need to coordinate with other processes.
pub fn write_atomic(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Create temp file in same directory (important for atomic rename)
    let temp_path = path.with_extension(format!(
        "{}.tmp.{}",
        path.extension().and_then(|e| e.to_str()).unwrap_or(""),
        std::process::id()
    ));

    // Write to temp file
    let mut temp_file = File::create(&temp_path)?;
    temp_file.write_all(data)?;
    temp_file.sync_all()?; // Ensure data is flushed to disk
    drop(temp_file);

    // Atomic rename
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Write data atomically while holding a lock on a separate lock file
///
/// This is the pattern for the store file, which may be read/written by
/// several taskdeck sessions at once:
///
/// 1. Acquire lock on `<path>.lock`
/// 2. Write to temp file
/// 3. Rename temp to target
/// 4. Release lock (automatic on drop)
pub fn write_atomic_locked(path: impl AsRef<Path>, data: &[u8], timeout_ms: u64) -> Result<()> {
    let path = path.as_ref();
    let lock_path = PathBuf::from(format!("{}.lock", path.display()));

    let _lock = FileLock::acquire(&lock_path, timeout_ms)?;
    write_atomic(path, data)?;

    // Lock released on drop
    Ok(())
}
