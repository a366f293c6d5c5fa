//! Test fixtures and store helpers.
//!
//! Provides convenience functions for setting up throwaway stores
//! and inspecting the files they leave behind.

use jsonlog_core::{Config, LogStore};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// File name of the active file in every fixture store.
pub const TEST_FILE_NAME: &str = "test.log";

/// A test store in its own temporary directory, removed on drop.
pub struct TestStore {
    /// The store instance.
    pub store: LogStore,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: TempDir,
}

impl TestStore {
    /// Creates a store with default settings.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a store with the given settings.
    pub fn with_config(config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(TEST_FILE_NAME);
        let store = LogStore::open_with_config(&path, config).expect("Failed to open store");

        Self { store, temp_dir }
    }

    /// Creates a store that does not timestamp records, so file content is
    /// fully predictable.
    pub fn untimestamped() -> Self {
        Self::with_config(Config::new().add_timestamp(false))
    }

    /// Returns the directory holding the active file and its archives.
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Returns the path of the active file.
    pub fn path(&self) -> PathBuf {
        self.store.path()
    }

    /// Returns every file of this store on disk, active file included,
    /// sorted by name.
    pub fn files(&self) -> Vec<PathBuf> {
        log_files(self.dir(), "test", ".log")
    }

    /// Opens a second handle on the same active file.
    pub fn reopen(&self, config: Config) -> LogStore {
        LogStore::open_with_config(self.path(), config).expect("Failed to reopen store")
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestStore {
    type Target = LogStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

/// Runs a test with a temporary store using default settings.
///
/// # Example
///
/// ```rust
/// use jsonlog_testkit::with_temp_store;
/// use serde_json::json;
///
/// with_temp_store(|store| {
///     store.add(&json!({"a": 1}));
///     assert_eq!(store.last(1).len(), 1);
/// });
/// ```
pub fn with_temp_store<F, R>(f: F) -> R
where
    F: FnOnce(&LogStore) -> R,
{
    let test_store = TestStore::new();
    f(&test_store.store)
}

/// Runs a test with a temporary store using `config`. The closure also
/// receives the directory so it can inspect archives.
pub fn with_temp_store_config<F, R>(config: Config, f: F) -> R
where
    F: FnOnce(&LogStore, &Path) -> R,
{
    let test_store = TestStore::with_config(config);
    f(&test_store.store, test_store.dir())
}

/// Lists the files in `dir` whose names start with `prefix` and end with
/// `extension`, sorted by name. Directories are skipped.
pub fn log_files(dir: &Path, prefix: &str, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .expect("Failed to read directory")
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(prefix) && name.ends_with(extension))
        })
        .map(|entry| entry.path())
        .collect();
    files.sort();
    files
}

/// Writes `lines` to `path`, each followed by `\n`, replacing the file.
pub fn write_lines(path: &Path, lines: &[&str]) {
    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    fs::write(path, content).expect("Failed to write lines");
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// Creates a store holding `count` records `{"index": i}`.
    pub fn populated_store(count: usize) -> TestStore {
        let test_store = TestStore::new();
        for i in 0..count {
            test_store
                .try_add(&json!({"index": i}))
                .expect("Failed to add record");
        }
        test_store
    }

    /// Creates a store that has already rotated at least `rotations` times.
    ///
    /// The store rotates at `max_file_size` bytes and keeps archives per
    /// `max_file_count`.
    pub fn rotated_store(max_file_size: u64, max_file_count: usize, rotations: u64) -> TestStore {
        let test_store = TestStore::with_config(
            Config::new()
                .max_file_size(max_file_size)
                .max_file_count(max_file_count),
        );

        let mut i = 0u64;
        while test_store.stats().rotations() < rotations {
            test_store
                .try_add(&json!({"seq": i}))
                .expect("Failed to add record");
            i += 1;
        }
        test_store
    }

    /// Creates a store whose active file mixes valid records with lines
    /// that do not parse. Valid records are `{"a": 1}` through `{"a": 3}`.
    pub fn corrupted_store() -> TestStore {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(TEST_FILE_NAME);
        write_lines(
            &path,
            &[
                r#"{"a":1}"#,
                "garbage",
                r#"{"a":2}"#,
                r#"{"a":"#,
                "",
                r#"{"a":3}"#,
            ],
        );

        let store = LogStore::open(&path).expect("Failed to open store");
        TestStore { store, temp_dir }
    }
}
