//! End-to-end behavior of `LogStore` against a real directory.

use chrono::{DateTime, Utc};
use jsonlog_core::{Config, CoreError, LogStore};
use serde_json::json;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

/// Counts the files in `dir` belonging to the store named `base` + `ext`,
/// the active file included.
fn count_log_files(dir: &Path, base: &str, ext: &str) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.unwrap().file_name().into_string().ok())
        .filter(|name| name.starts_with(base) && name.ends_with(ext))
        .count()
}

#[test]
fn open_keeps_existing_content() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("app.log");
    fs::write(&path, "{\"a\":1}\n").unwrap();

    let store = LogStore::open(&path).unwrap();
    assert_eq!(store.read_raw().unwrap(), "{\"a\":1}\n");
    drop(store);

    let store = LogStore::open(&path).unwrap();
    store.add(&json!({"a": 2}));
    let again = LogStore::open(&path).unwrap();

    assert_eq!(again.last(10).len(), 2);
}

#[test]
fn open_creates_missing_directories() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("nested").join("deeper").join("app.log");

    let store = LogStore::open(&path).unwrap();

    assert!(path.is_file());
    assert_eq!(store.path(), path);
    assert!(store.last(5).is_empty());
}

#[test]
fn generated_timestamp_wins_over_caller_value() {
    let temp = tempdir().unwrap();
    let store = LogStore::open(temp.path().join("app.log")).unwrap();

    let before = Utc::now();
    store.add(&json!({"value": 1, "timestamp": "caller supplied"}));
    let after = Utc::now();

    let records = store.last(1);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["value"], 1);

    let stamp = records[0]["timestamp"].as_str().unwrap();
    assert_ne!(stamp, "caller supplied");
    assert!(stamp.ends_with('Z'));

    let parsed: DateTime<Utc> = DateTime::parse_from_rfc3339(stamp).unwrap().into();
    let millis = |t: DateTime<Utc>| t.timestamp_millis();
    assert!(millis(parsed) >= millis(before));
    assert!(millis(parsed) <= millis(after));
}

#[test]
fn last_returns_newest_in_order() {
    let temp = tempdir().unwrap();
    let store = LogStore::open(temp.path().join("app.log")).unwrap();

    store.add(&json!([{"a": 1}, {"a": 2}, {"a": 3}]));

    let records = store.last(2);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["a"], 2);
    assert_eq!(records[1]["a"], 3);

    assert!(store.last(0).is_empty());
    assert_eq!(store.last(100).len(), 3);
}

#[test]
fn batch_is_written_contiguously() {
    let temp = tempdir().unwrap();
    let store = LogStore::open_with_config(
        temp.path().join("app.log"),
        Config::new().add_timestamp(false),
    )
    .unwrap();

    store.add(&json!([{"a": 1}, {"a": 2}]));
    store.add(&json!({"a": 3}));

    assert_eq!(
        store.read_raw().unwrap(),
        "{\"a\":1}\n{\"a\":2}\n{\"a\":3}\n"
    );
}

#[test]
fn clear_empties_the_active_file() {
    let temp = tempdir().unwrap();
    let store = LogStore::open(temp.path().join("app.log")).unwrap();

    store.add(&json!({"a": 1}));
    store.clear().unwrap();

    assert!(store.last(1).is_empty());
    assert_eq!(store.read_raw().unwrap(), "");

    store.add(&json!({"a": 2}));
    assert_eq!(store.last(5).len(), 1);
}

#[test]
fn rotation_steady_state_keeps_three_files() {
    let temp = tempdir().unwrap();
    let store = LogStore::open_with_config(
        temp.path().join("test_rol.log"),
        Config::new().max_file_size(1024).max_file_count(3),
    )
    .unwrap();

    for i in 0..100 {
        store.add(&json!({"message": format!("Record {i}")}));
        assert!(count_log_files(temp.path(), "test_rol", ".log") <= 3);
    }

    assert_eq!(count_log_files(temp.path(), "test_rol", ".log"), 3);
    assert_eq!(store.segments().len(), 2);
    assert!(store.stats().rotations() >= 3);
    assert!(store.stats().segments_pruned() > 0);
}

#[test]
fn last_only_sees_the_active_file_after_rotation() {
    let temp = tempdir().unwrap();
    let store = LogStore::open_with_config(
        temp.path().join("app.log"),
        Config::new().max_file_size(10).add_timestamp(false),
    )
    .unwrap();

    store.add(&json!({"seq": 1, "pad": "xxxxxxxx"}));
    assert!(store.last(10).is_empty());

    store.add(&json!({"s": 2}));
    let records = store.last(10);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["s"], 2);
}

#[test]
fn zero_max_file_count_never_deletes() {
    let temp = tempdir().unwrap();
    let store = LogStore::open_with_config(
        temp.path().join("app.log"),
        Config::new().max_file_size(64).max_file_count(0),
    )
    .unwrap();

    let mut previous = 0;
    for i in 0..40 {
        store.add(&json!({"i": i}));
        let archived = store.segments().len();
        assert!(archived >= previous);
        previous = archived;
    }

    assert!(previous > 5);
    assert_eq!(store.stats().segments_pruned(), 0);
    assert_eq!(
        count_log_files(temp.path(), "app", ".log"),
        store.stats().rotations() as usize + 1
    );
}

#[test]
fn malformed_lines_are_skipped() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("app.log");
    fs::write(
        &path,
        "{\"a\":1}\nthis is not json\n{\"a\":2}\n[1,2]\n{\"a\":3}\n",
    )
    .unwrap();

    let store = LogStore::open(&path).unwrap();

    let records = store.last(5);
    let values: Vec<_> = records.iter().map(|r| r["a"].as_i64().unwrap()).collect();
    assert_eq!(values, vec![1, 2, 3]);

    let records = store.last(2);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["a"], 3);
}

#[test]
fn segments_are_ordered_by_creation() {
    let temp = tempdir().unwrap();
    let store = LogStore::open(temp.path().join("app.log")).unwrap();

    for name in ["app-c.log", "app-a.log", "app-b.log"] {
        fs::write(temp.path().join(name), "{}\n").unwrap();
        thread::sleep(Duration::from_millis(20));
    }
    fs::write(temp.path().join("other-1.log"), "{}\n").unwrap();
    fs::create_dir(temp.path().join("app-dir.log")).unwrap();

    let names: Vec<_> = store
        .segments()
        .into_iter()
        .map(|s| s.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(names, vec!["app-c.log", "app-a.log", "app-b.log"]);
}

#[test]
fn concurrent_appends_respect_the_cap() {
    let temp = tempdir().unwrap();
    let store = Arc::new(
        LogStore::open_with_config(
            temp.path().join("app.log"),
            Config::new().max_file_size(512).max_file_count(3),
        )
        .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..50 {
                    store
                        .try_add(&json!({"thread": t, "i": i}))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(count_log_files(temp.path(), "app", ".log"), 3);
    assert_eq!(store.stats().records_appended(), 200);
    assert_eq!(store.stats().rotation_failures(), 0);

    for line in store.read_raw().unwrap().lines() {
        let record: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(record["thread"].is_number());
    }
}

#[test]
fn strict_mode_reports_invalid_input() {
    let temp = tempdir().unwrap();
    let store = LogStore::open(temp.path().join("app.log")).unwrap();

    assert!(matches!(
        store.try_add(&json!([{"a": 1}, "nope"])),
        Err(CoreError::Codec(_))
    ));
    assert_eq!(store.read_raw().unwrap(), "");

    store.add(&json!(null));
    assert_eq!(store.read_raw().unwrap(), "");
    assert_eq!(store.stats().append_failures(), 2);
}

#[test]
fn read_raw_rejects_non_utf8() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("app.log");
    fs::write(&path, [0xff, 0xfe, b'\n']).unwrap();

    let store = LogStore::open(&path).unwrap();

    assert!(matches!(store.read_raw(), Err(CoreError::InvalidUtf8)));
    assert!(store.last(1).is_empty());
}

#[test]
fn append_recreates_a_deleted_active_file() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("app.log");
    let store =
        LogStore::open_with_config(&path, Config::new().max_file_size(1024)).unwrap();

    store.add(&json!({"a": 1}));
    fs::remove_file(&path).unwrap();
    store.add(&json!({"a": 2}));

    assert!(path.is_file());
    let records = store.last(5);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["a"], 2);

    let fresh = LogStore::open(&path).unwrap();
    assert_eq!(fresh.last(5).len(), 1);
    assert_eq!(store.stats().rotation_failures(), 0);
}

#[cfg(unix)]
#[test]
fn append_follows_a_replaced_active_file() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("app.log");
    let store = LogStore::open(&path).unwrap();

    store.add(&json!({"a": 1}));
    fs::rename(&path, temp.path().join("moved.log")).unwrap();
    fs::write(&path, "{\"a\":0}\n").unwrap();
    store.add(&json!({"a": 2}));

    let values: Vec<_> = store.last(5).iter().map(|r| r["a"].clone()).collect();
    assert_eq!(values, vec![json!(0), json!(2)]);
}

#[test]
fn last_on_a_missing_active_file_is_empty() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("app.log");
    let store = LogStore::open(&path).unwrap();

    store.add(&json!({"a": 1}));
    fs::remove_file(&path).unwrap();

    assert!(store.last(5).is_empty());
    assert_eq!(store.read_raw().unwrap(), "");
}

#[test]
fn concurrent_appends_keep_timestamps_in_file_order() {
    let temp = tempdir().unwrap();
    let store = Arc::new(
        LogStore::open_with_config(
            temp.path().join("app.log"),
            Config::new().rotation_enabled(false),
        )
        .unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..200 {
                    store.try_add(&json!({"thread": t, "i": i})).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let stamps: Vec<DateTime<Utc>> = store
        .read_raw()
        .unwrap()
        .lines()
        .map(|line| {
            let record: serde_json::Value = serde_json::from_str(line).unwrap();
            DateTime::parse_from_rfc3339(record["timestamp"].as_str().unwrap())
                .unwrap()
                .with_timezone(&Utc)
        })
        .collect();

    assert_eq!(stamps.len(), 1600);
    assert!(stamps.windows(2).all(|pair| pair[0] <= pair[1]));
}
