//! The store facade.

use crate::active::ActiveFile;
use crate::config::Config;
use crate::dir::StoreDir;
use crate::error::{CoreError, CoreResult};
use crate::rotation::{RotationController, RotationOutcome};
use crate::segment::{discover, ArchivedSegment, RetentionPolicy};
use crate::stats::StoreStats;
use crate::tail::tail_lines;
use chrono::{SecondsFormat, Utc};
use jsonlog_codec::{decode_line_as, encode_batch, stamp, to_record, Record};
use jsonlog_storage::StorageBackend;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Mutable state, guarded by one lock per store.
#[derive(Debug)]
struct Writer {
    active: ActiveFile,
    rotation: RotationController,
}

/// An append-only store of JSON records with size-based rotation.
///
/// `LogStore` owns one active file. Records are appended to it as JSON
/// lines; once it reaches [`Config::max_file_size`] it is renamed to an
/// archived segment next to it and replaced by an empty file, and the
/// oldest archives beyond [`Config::max_file_count`] are deleted.
///
/// # Error policy
///
/// Writes are best effort. [`add`](Self::add) logs failures and returns
/// nothing; a batch that fails to append is lost. Rotation failures are
/// logged too, and the active file keeps growing until a rotation succeeds.
/// [`last`](Self::last) answers an empty list when the file cannot be read.
/// Only [`open`](Self::open), [`try_add`](Self::try_add),
/// [`read_raw`](Self::read_raw) and [`clear`](Self::clear) return errors.
///
/// # Concurrency
///
/// Every operation runs under a per-store mutex, so concurrent appends
/// cannot interleave and never rotate twice. The store is `Send + Sync`;
/// share it behind an `Arc`. Separate processes writing the same path are
/// not coordinated.
///
/// # Example
///
/// ```rust,no_run
/// use jsonlog_core::{Config, LogStore};
/// use serde_json::json;
///
/// let store = LogStore::open_with_config(
///     "logs/events.log",
///     Config::new().max_file_size(1024 * 1024).max_file_count(3),
/// )?;
///
/// store.add(&json!({"event": "login", "user": 7}));
/// store.add(&json!([{"event": "a"}, {"event": "b"}]));
///
/// let recent = store.last(2);
/// assert_eq!(recent[1]["event"], "b");
/// # Ok::<(), jsonlog_core::CoreError>(())
/// ```
#[derive(Debug)]
pub struct LogStore {
    config: Config,
    dir: StoreDir,
    writer: Mutex<Writer>,
    stats: StoreStats,
}

impl LogStore {
    /// Opens the store whose active file is `path`, with default settings.
    ///
    /// # Errors
    ///
    /// See [`open_with_config`](Self::open_with_config).
    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        Self::open_with_config(path, Config::default())
    }

    /// Opens the store whose active file is `path`.
    ///
    /// Creates the parent directory recursively and the active file if it is
    /// missing. An existing active file is kept as is. Setup completes before
    /// this returns, so the first `add` or `last` never races it.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the path has no
    /// file name, or the directory or file cannot be created.
    pub fn open_with_config(path: impl AsRef<Path>, config: Config) -> CoreResult<Self> {
        config.validate()?;

        let dir = StoreDir::new(path.as_ref())?;
        dir.create()?;

        let active = ActiveFile::open(&dir.active_path())?;
        let rotation = RotationController::new(
            config.max_file_size,
            RetentionPolicy::new(config.max_file_count),
        );

        debug!(
            path = %dir.active_path().display(),
            rotation = config.rotation_enabled,
            max_file_size = config.max_file_size,
            retention = config.retention_enabled(),
            max_file_count = config.max_file_count,
            "opened log store"
        );

        Ok(Self {
            config,
            dir,
            writer: Mutex::new(Writer { active, rotation }),
            stats: StoreStats::new(),
        })
    }

    /// Returns the path of the active file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.active_path()
    }

    /// Returns the configuration the store was opened with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the store's counters.
    #[must_use]
    pub fn stats(&self) -> &StoreStats {
        &self.stats
    }

    /// Appends one record, or a batch if `entry` serializes to an array.
    ///
    /// Failures are logged and swallowed: a batch that cannot be encoded or
    /// written is dropped. Use [`try_add`](Self::try_add) to observe them.
    pub fn add<T: Serialize + ?Sized>(&self, entry: &T) {
        if let Err(error) = self.try_add(entry) {
            warn!(
                path = %self.dir.active_path().display(),
                %error,
                "failed to append records, batch dropped"
            );
        }
    }

    /// Appends one record, or a batch if `entry` serializes to an array,
    /// and reports failures.
    ///
    /// With timestamping enabled every record gets a `timestamp` field as its
    /// first key, holding the current UTC time in RFC 3339 with milliseconds.
    /// A `timestamp` field supplied by the caller is replaced.
    ///
    /// The whole batch is written with a single append. Rotation runs
    /// afterwards; its failures are logged, not returned.
    ///
    /// Returns the number of records written.
    ///
    /// # Errors
    ///
    /// Returns an error if a record is not a JSON object, serialization
    /// fails, or the append fails. Nothing is written in the first two cases.
    pub fn try_add<T: Serialize + ?Sized>(&self, entry: &T) -> CoreResult<usize> {
        let result = self.append(entry);
        if result.is_err() {
            self.stats.record_append_failure();
        }
        result
    }

    fn append<T: Serialize + ?Sized>(&self, entry: &T) -> CoreResult<usize> {
        let mut records = to_record(entry)?;
        if records.is_empty() {
            return Ok(0);
        }

        // Stamp under the lock so file order matches timestamp order.
        let mut writer = self.writer.lock();

        if self.config.add_timestamp {
            let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
            records = records
                .into_iter()
                .map(|record| stamp(record, &now))
                .collect();
        }

        let bytes = encode_batch(&records)?;
        let backend = writer.active.backend()?;
        backend.append(&bytes)?;
        if self.config.sync_on_append {
            backend.sync()?;
        }
        self.stats.record_append(records.len() as u64, bytes.len() as u64);

        if self.config.rotation_enabled {
            self.rotate(&mut writer);
        }

        Ok(records.len())
    }

    fn rotate(&self, writer: &mut Writer) {
        let Writer { active, rotation } = writer;

        match rotation.maybe_rotate(&self.dir, active) {
            Ok(RotationOutcome::NotNeeded { .. }) => {}
            Ok(RotationOutcome::Rotated { archive, pruned }) => {
                self.stats
                    .record_rotation(pruned.deleted.len() as u64, pruned.failed.len() as u64);
                info!(
                    archive = %archive.display(),
                    pruned = pruned.deleted.len(),
                    "log rotated"
                );
            }
            Err(error) => {
                self.stats.record_rotation_failure();
                warn!(
                    path = %self.dir.active_path().display(),
                    %error,
                    "log rotation failed, active file keeps growing"
                );
            }
        }
    }

    /// Returns the last `n` records of the active file, oldest first.
    ///
    /// Archived segments are never read: right after a rotation this returns
    /// only what was written since. Lines that do not parse are skipped
    /// silently. If the file cannot be read the failure is logged and the
    /// result is empty.
    #[must_use]
    pub fn last(&self, n: usize) -> Vec<Record> {
        self.last_as(n)
    }

    /// Like [`last`](Self::last), deserializing each line into `T`.
    ///
    /// Lines that do not deserialize into `T` are skipped.
    #[must_use]
    pub fn last_as<T: DeserializeOwned>(&self, n: usize) -> Vec<T> {
        let lines = {
            let mut writer = self.writer.lock();
            writer
                .active
                .backend()
                .and_then(|backend| tail_lines(&*backend, n).map_err(CoreError::from))
        };

        match lines {
            Ok(lines) => lines
                .iter()
                .filter_map(|line| decode_line_as(line).ok())
                .collect(),
            Err(error) => {
                warn!(
                    path = %self.dir.active_path().display(),
                    %error,
                    "failed to read last lines"
                );
                Vec::new()
            }
        }
    }

    /// Returns the whole active file as text.
    ///
    /// # Errors
    ///
    /// Unlike `add` and `last`, read failures are returned to the caller.
    /// Returns [`CoreError::InvalidUtf8`] if the file is not UTF-8.
    pub fn read_raw(&self) -> CoreResult<String> {
        let bytes = self.writer.lock().active.backend()?.read_to_end()?;
        String::from_utf8(bytes).map_err(|_| CoreError::InvalidUtf8)
    }

    /// Truncates the active file. Archived segments are left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the truncation fails.
    pub fn clear(&self) -> CoreResult<()> {
        self.writer.lock().active.backend()?.truncate(0)?;
        Ok(())
    }

    /// Lists the archived segments of this store, oldest first.
    #[must_use]
    pub fn segments(&self) -> Vec<ArchivedSegment> {
        discover(&self.dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn add_then_last() {
        let temp = tempdir().unwrap();
        let store = LogStore::open(temp.path().join("app.log")).unwrap();

        store.add(&json!({"name": "test", "value": 123}));

        let records = store.last(1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], "test");
        assert_eq!(records[0]["value"], 123);
        assert!(records[0]["timestamp"].is_string());
    }

    #[test]
    fn timestamp_is_first_key() {
        let temp = tempdir().unwrap();
        let store = LogStore::open(temp.path().join("app.log")).unwrap();

        store.add(&json!({"value": 1}));

        let raw = store.read_raw().unwrap();
        assert!(raw.starts_with("{\"timestamp\":\""));
        assert!(raw.ends_with(",\"value\":1}\n"));
    }

    #[test]
    fn without_timestamps_records_are_verbatim() {
        let temp = tempdir().unwrap();
        let store = LogStore::open_with_config(
            temp.path().join("app.log"),
            Config::new().add_timestamp(false),
        )
        .unwrap();

        store.add(&json!({"b": 2, "a": 1}));
        assert_eq!(store.read_raw().unwrap(), "{\"b\":2,\"a\":1}\n");
    }

    #[test]
    fn try_add_rejects_non_objects() {
        let temp = tempdir().unwrap();
        let store = LogStore::open(temp.path().join("app.log")).unwrap();

        assert!(matches!(store.try_add(&42), Err(CoreError::Codec(_))));
        assert_eq!(store.read_raw().unwrap(), "");
        assert_eq!(store.stats().append_failures(), 1);

        store.add(&"not an object");
        assert_eq!(store.stats().append_failures(), 2);
    }

    #[test]
    fn try_add_counts_records() {
        let temp = tempdir().unwrap();
        let store = LogStore::open(temp.path().join("app.log")).unwrap();

        assert_eq!(store.try_add(&json!([{"a": 1}, {"a": 2}])).unwrap(), 2);
        assert_eq!(store.try_add(&json!([])).unwrap(), 0);
        assert_eq!(store.stats().records_appended(), 2);
        assert_eq!(store.stats().batches_appended(), 1);
    }

    #[test]
    fn last_as_typed() {
        #[derive(Serialize)]
        struct Event<'a> {
            kind: &'a str,
            seq: u32,
        }

        #[derive(Deserialize)]
        struct Seen {
            seq: u32,
        }

        let temp = tempdir().unwrap();
        let store = LogStore::open(temp.path().join("app.log")).unwrap();

        store.add(&[Event { kind: "a", seq: 1 }, Event { kind: "b", seq: 2 }]);
        store.add(&json!({"unrelated": true}));

        let seen: Vec<Seen> = store.last_as(3);
        assert_eq!(seen.iter().map(|s| s.seq).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn clear_keeps_archives() {
        let temp = tempdir().unwrap();
        let store = LogStore::open_with_config(
            temp.path().join("app.log"),
            Config::new().max_file_size(64),
        )
        .unwrap();

        for i in 0..10 {
            store.add(&json!({"i": i}));
        }
        let archives = store.segments();
        assert!(!archives.is_empty());

        store.clear().unwrap();
        assert!(store.last(1).is_empty());
        assert_eq!(store.segments(), archives);
    }

    #[test]
    fn rotation_disabled_grows_forever() {
        let temp = tempdir().unwrap();
        let store = LogStore::open_with_config(
            temp.path().join("app.log"),
            Config::new().max_file_size(16).rotation_enabled(false),
        )
        .unwrap();

        for i in 0..20 {
            store.add(&json!({"i": i}));
        }

        assert!(store.segments().is_empty());
        assert_eq!(store.last(100).len(), 20);
        assert_eq!(store.stats().rotations(), 0);
    }

    #[test]
    fn rotates_after_every_append_past_threshold() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("app.log");
        let store =
            LogStore::open_with_config(&path, Config::new().max_file_size(1).add_timestamp(false))
                .unwrap();

        store.add(&json!({"a": 1}));
        assert_eq!(store.stats().rotations(), 1);
        assert!(path.exists());

        store.add(&json!({"a": 2}));
        assert_eq!(store.stats().rotations(), 2);
        assert_eq!(store.segments().len(), 2);
    }

    #[test]
    fn open_rejects_invalid_config() {
        let temp = tempdir().unwrap();
        let result = LogStore::open_with_config(
            temp.path().join("app.log"),
            Config::new().max_file_size(0),
        );
        assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));
    }
}
