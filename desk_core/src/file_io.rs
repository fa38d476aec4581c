//! # File I/O Module
//!
//! Handles the inventory data file:
//! - **Whole-file saves**: every save rewrites the complete inventory,
//!   written to a `.tmp` sibling, synced, then renamed over the target
//! - **Whole-file loads**: a missing file is an empty inventory, a malformed
//!   one is a [`DeskError::SerializationError`]
//! - **File locking**: a `.lock` sibling keeps a second process from racing
//!   on the same file
//!
//! ## File Format
//!
//! Plain JSON, indented with four spaces:
//!
//! ```text
//! {
//!     "next_id": 3,
//!     "books": [
//!         { "book_id": 1, "title": "Dune", "author": "Frank Herbert", "issued": false },
//!         { "book_id": 2, "title": "Emma", "author": "Jane Austen", "issued": true }
//!     ]
//! }
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use desk_core::file_io::{load_inventory, save_inventory, FileLock};
//! use std::path::Path;
//!
//! let path = Path::new("library_data.json");
//!
//! // Hold the lock for as long as the file is in use
//! let lock = FileLock::acquire(path, "librarian").unwrap();
//!
//! let inventory = load_inventory(path).unwrap();
//! save_inventory(&inventory, path).unwrap();
//!
//! drop(lock);
//! ```

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{DeskError, DeskResult};
use crate::library::Book;

/// Default data file name, relative to the working directory
pub const DEFAULT_DATA_FILE: &str = "library_data.json";

/// Snapshot of the inventory exactly as it is stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Identifier the next added book will receive
    #[serde(default = "first_book_id")]
    pub next_id: u32,

    /// All books, in identifier order
    #[serde(default)]
    pub books: Vec<Book>,
}

fn first_book_id() -> u32 {
    1
}

impl Default for Inventory {
    fn default() -> Self {
        Inventory {
            next_id: first_book_id(),
            books: Vec::new(),
        }
    }
}

/// Lock file metadata stored in `.lock` files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (login name or whatever `--user` was given)
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    fn holder(&self) -> String {
        format!("{} ({}, pid {})", self.user_id, self.machine, self.pid)
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// Exclusive lock on a data file, released when dropped.
///
/// The OS-level lock (via fs2) is what actually excludes other processes.
/// The JSON written into the lock file only tells the loser who holds it.
/// A lock file left behind by a crashed process is simply taken over, since
/// the OS drops the lock together with the process.
///
/// The lock file itself is never deleted, only emptied on release. Unlinking
/// it would let a process still holding the old inode lock that orphan while
/// another process locks a freshly created file.
#[derive(Debug)]
pub struct FileLock {
    data_path: PathBuf,
    lock_path: PathBuf,
    /// Keeps the OS lock alive
    lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on `path` without blocking.
    ///
    /// # Returns
    ///
    /// * `Ok(FileLock)` - Lock acquired
    /// * `Err(DeskError::FileLocked)` - Another process holds the lock
    /// * `Err(DeskError::FileError)` - The lock file could not be written
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> DeskResult<Self> {
        let lock_path = lock_path_for(path);

        // No truncate here: the current holder's metadata must survive until
        // we know the lock is ours.
        let mut lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| DeskError::file_error("create lock", lock_path.display().to_string(), e.to_string()))?;

        if lock_file.try_lock_exclusive().is_err() {
            return Err(match read_lock_info(&lock_path) {
                Ok(existing) => DeskError::file_locked(
                    path.display().to_string(),
                    existing.holder(),
                    existing.locked_at.to_rfc3339(),
                ),
                Err(_) => DeskError::file_locked(path.display().to_string(), "another process", "unknown"),
            });
        }

        let info = LockInfo::new(user_id);
        let lock_json = serde_json::to_string_pretty(&info).map_err(|e| DeskError::serialization(e.to_string()))?;

        let write_err = |e: std::io::Error| DeskError::file_error("write lock", lock_path.display().to_string(), e.to_string());
        lock_file.set_len(0).map_err(write_err)?;
        lock_file.seek(SeekFrom::Start(0)).map_err(write_err)?;
        lock_file.write_all(lock_json.as_bytes()).map_err(write_err)?;
        lock_file.sync_all().map_err(write_err)?;

        debug!(lock = %lock_path.display(), pid = info.pid, "acquired file lock");

        Ok(FileLock {
            data_path: path.to_path_buf(),
            lock_path,
            lock_file,
            info,
        })
    }

    /// Path of the data file this lock protects
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Clear our metadata while the lock is still ours, then release it
        let _ = self.lock_file.set_len(0);
        let _ = FileExt::unlock(&self.lock_file);
    }
}

/// `library_data.json` -> `library_data.json.<suffix>`
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

fn lock_path_for(data_path: &Path) -> PathBuf {
    sibling_path(data_path, "lock")
}

fn tmp_path_for(data_path: &Path) -> PathBuf {
    sibling_path(data_path, "tmp")
}

fn read_lock_info(lock_path: &Path) -> DeskResult<LockInfo> {
    let contents = fs::read_to_string(lock_path)
        .map_err(|e| DeskError::file_error("read lock", lock_path.display().to_string(), e.to_string()))?;

    serde_json::from_str(&contents).map_err(|e| DeskError::serialization(e.to_string()))
}

/// Save the inventory, replacing the whole file.
///
/// The save process:
/// 1. Serialize to JSON
/// 2. Write to `<file>.tmp`
/// 3. Sync to disk (fsync)
/// 4. Rename over `<file>`
///
/// # Example
///
/// ```rust,no_run
/// use desk_core::file_io::{save_inventory, Inventory};
/// use std::path::Path;
///
/// save_inventory(&Inventory::default(), Path::new("library_data.json"))?;
/// # Ok::<(), desk_core::errors::DeskError>(())
/// ```
pub fn save_inventory(inventory: &Inventory, path: &Path) -> DeskResult<()> {
    let mut json = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut json, formatter);
    inventory
        .serialize(&mut serializer)
        .map_err(|e| DeskError::serialization(e.to_string()))?;

    replace_file_with(path, |file| file.write_all(&json))?;

    debug!(path = %path.display(), books = inventory.books.len(), next_id = inventory.next_id, "saved inventory");
    Ok(())
}

/// Write `<path>.tmp` with `write`, sync it and rename it over `path`.
///
/// On any failure the temp file is removed and `path` is left untouched.
fn replace_file_with<F>(path: &Path, write: F) -> DeskResult<()>
where
    F: FnOnce(&mut File) -> std::io::Result<()>,
{
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| DeskError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;

    let written = write(&mut tmp_file)
        .map_err(|e| ("write temp file", e))
        .and_then(|()| tmp_file.sync_all().map_err(|e| ("sync temp file", e)));
    drop(tmp_file);

    if let Err((operation, e)) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(DeskError::file_error(operation, tmp_path.display().to_string(), e.to_string()));
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        DeskError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

/// Load the inventory from a file.
///
/// # Returns
///
/// * `Ok(Inventory)` - Parsed file, or an empty inventory if the file does not exist
/// * `Err(DeskError::SerializationError)` - Invalid JSON
/// * `Err(DeskError::FileError)` - Any other I/O error
pub fn load_inventory(path: &Path) -> DeskResult<Inventory> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no data file yet, starting empty");
            return Ok(Inventory::default());
        }
        Err(e) => return Err(DeskError::file_error("read", path.display().to_string(), e.to_string())),
    };

    let inventory: Inventory = serde_json::from_str(&contents)
        .map_err(|e| DeskError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))?;

    debug!(path = %path.display(), books = inventory.books.len(), next_id = inventory.next_id, "loaded inventory");
    Ok(inventory)
}
