use super::*;
use serde_json::json;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::thread;
use std::time::Instant;
use tempfile::{TempDir, tempdir};

const TEST_DEBOUNCE: Duration = Duration::from_millis(100);

fn prefs_path(temp: &TempDir) -> PathBuf {
    temp.path().join("app").join("preferences.json")
}

fn open_store() -> (Preferences, TempDir) {
    let temp = tempdir().unwrap();
    let prefs = Preferences::open(prefs_path(&temp), TEST_DEBOUNCE).unwrap();
    (prefs, temp)
}

fn read_file(path: &Path) -> Map<String, Value> {
    let content = fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

/// Like `read_file`, but tolerates catching a write half-way.
fn try_read_file(path: &Path) -> Option<Map<String, Value>> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Polls `condition` until it holds or a generous timeout passes.
fn wait_for(condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}

fn settle() {
    thread::sleep(TEST_DEBOUNCE * 4);
}

mod open {
    use super::*;

    #[test]
    fn test_missing_file_creates_parent_dir() {
        let temp = tempdir().unwrap();
        let path = prefs_path(&temp);
        assert!(!path.parent().unwrap().exists());

        let prefs = Preferences::open(&path, TEST_DEBOUNCE).unwrap();

        assert!(prefs.is_empty());
        assert!(path.parent().unwrap().exists());
        assert!(!path.exists());
        assert_eq!(prefs.storage_path(), Some(path.as_path()));
    }

    #[test]
    fn test_existing_values_load_without_saving() {
        let temp = tempdir().unwrap();
        let path = prefs_path(&temp);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let original = "{\"volume\":7,\"name\":\"fenn\"}\n";
        fs::write(&path, original).unwrap();

        let prefs = Preferences::open(&path, TEST_DEBOUNCE).unwrap();
        settle();

        assert_eq!(prefs.int("volume"), 7);
        assert_eq!(prefs.string("name"), "fenn");
        assert_eq!(prefs.flush_count(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_invalid_json_starts_empty() {
        let temp = tempdir().unwrap();
        let path = prefs_path(&temp);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();

        let prefs = Preferences::open(&path, TEST_DEBOUNCE).unwrap();

        assert!(prefs.is_empty());
        assert_eq!(prefs.flush_count(), 0);
    }

    #[test]
    fn test_empty_file_is_empty_map() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("preferences.json");
        fs::write(&path, "  \n").unwrap();

        let prefs = Preferences::in_memory();
        prefs.load_from_file(&path).unwrap();

        assert!(prefs.is_empty());
    }

    #[test]
    fn test_non_object_json_is_rejected() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("preferences.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let prefs = Preferences::in_memory();
        let result = prefs.load_from_file(&path);

        assert!(matches!(result, Err(PreferencesError::NotAnObject)));
        assert!(prefs.is_empty());
    }

    #[test]
    fn test_load_merges_into_existing_values() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("preferences.json");
        fs::write(&path, r#"{"b": 2, "c": 3}"#).unwrap();

        let prefs = Preferences::in_memory();
        prefs.set_int("a", 1).unwrap();
        prefs.set_int("b", 0).unwrap();
        prefs.load_from_file(&path).unwrap();

        assert_eq!(prefs.keys(), vec!["a", "b", "c"]);
        assert_eq!(prefs.int("b"), 2);
    }
}

mod save {
    use super::*;

    #[test]
    fn test_first_change_saves_immediately() {
        let (prefs, temp) = open_store();

        prefs.set_bool("fullscreen", true).unwrap();

        assert_eq!(prefs.flush_count(), 1);
        let saved = read_file(&prefs_path(&temp));
        assert_eq!(saved.get("fullscreen"), Some(&json!(true)));
    }

    #[test]
    fn test_rapid_changes_coalesce_into_one_write() {
        let (prefs, temp) = open_store();

        prefs.set_int("counter", 0).unwrap();
        assert_eq!(prefs.flush_count(), 1);

        for i in 1..50 {
            prefs.set_int("counter", i).unwrap();
        }
        assert_eq!(prefs.flush_count(), 1);
        assert_eq!(read_file(&prefs_path(&temp)).get("counter"), Some(&json!(0)));

        assert!(wait_for(|| prefs.flush_count() == 2));
        assert_eq!(read_file(&prefs_path(&temp)).get("counter"), Some(&json!(49)));

        // The trailing write opens a window of its own, with nothing to replay.
        settle();
        assert_eq!(prefs.flush_count(), 2);
    }

    #[test]
    fn test_changes_after_window_save_again() {
        let (prefs, _temp) = open_store();

        prefs.set_string("a", "1").unwrap();
        settle();
        prefs.set_string("a", "2").unwrap();

        assert_eq!(prefs.flush_count(), 2);
    }

    #[test]
    fn test_round_trip() {
        let temp = tempdir().unwrap();
        let path = prefs_path(&temp);
        let expected = {
            let prefs = Preferences::open(&path, TEST_DEBOUNCE).unwrap();
            prefs.set_bool("bool", true).unwrap();
            prefs.set_float("float", 1.5).unwrap();
            prefs.set_int("int", -3).unwrap();
            prefs.set_string("string", "hello").unwrap();
            prefs
                .set_string_list("list", vec!["a".to_string(), "b".to_string()])
                .unwrap();
            prefs
                .set("nested", json!({"inner": {"depth": 2}}))
                .unwrap();
            prefs.read_values(|values| values.clone())
        };

        let reopened = Preferences::open(&path, TEST_DEBOUNCE).unwrap();

        assert_eq!(reopened.read_values(|values| values.clone()), expected);
    }

    #[test]
    fn test_drop_flushes_suspended_changes() {
        let temp = tempdir().unwrap();
        let path = prefs_path(&temp);
        let prefs = Preferences::open(&path, Duration::from_secs(60)).unwrap();

        prefs.set_int("volume", 1).unwrap();
        prefs.set_int("volume", 2).unwrap();
        assert_eq!(prefs.flush_count(), 1);
        drop(prefs);

        assert_eq!(read_file(&path).get("volume"), Some(&json!(2)));
    }

    #[test]
    fn test_drop_returns_promptly_with_pending_reset() {
        let (prefs, _temp) = open_store();
        prefs.set_int("volume", 1).unwrap();

        let started = Instant::now();
        drop(prefs);

        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_save_without_storage_fails() {
        let prefs = Preferences::in_memory();
        prefs.set_int("volume", 1).unwrap();

        let result = prefs.save();

        assert!(matches!(result, Err(PreferencesError::NoStorage)));
        assert_eq!(prefs.flush_count(), 0);
    }

    #[test]
    fn test_in_memory_store_exports_to_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("export").join("preferences.json");
        let prefs = Preferences::in_memory();
        prefs.set_string("theme", "dark").unwrap();

        prefs.save_to_file(&path).unwrap();
        prefs.save_to_file(&path).unwrap();

        assert_eq!(prefs.flush_count(), 2);
        assert_eq!(read_file(&path).get("theme"), Some(&json!("dark")));
    }

    #[test]
    fn test_unwritable_path_is_logged_not_fatal() {
        let temp = tempdir().unwrap();
        // A directory where the file should be makes every write fail.
        let path = temp.path().join("preferences.json");
        fs::create_dir_all(&path).unwrap();
        let prefs = Preferences::open(&path, TEST_DEBOUNCE).unwrap();

        prefs.set_int("volume", 3).unwrap();

        assert_eq!(prefs.int("volume"), 3);
        assert_eq!(prefs.flush_count(), 0);
        assert!(prefs.save().is_err());
    }
}

mod listeners {
    use super::*;

    #[test]
    fn test_listeners_run_in_registration_order() {
        let prefs = Preferences::in_memory();
        let calls = Arc::new(Mutex::new(Vec::new()));
        for id in 1..=2 {
            let calls = Arc::clone(&calls);
            prefs.add_change_listener(move || calls.lock().unwrap().push(id));
        }

        prefs.set_bool("a", true).unwrap();

        assert_eq!(prefs.change_listener_count(), 2);
        assert_eq!(*calls.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_load_notifies_without_saving() {
        let (prefs, temp) = open_store();
        let notified = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&notified);
        prefs.add_change_listener(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        fs::write(prefs_path(&temp), r#"{"volume": 9}"#).unwrap();
        prefs.load();
        settle();

        assert_eq!(notified.load(Ordering::SeqCst), 1);
        assert_eq!(prefs.int("volume"), 9);
        assert_eq!(prefs.flush_count(), 0);
    }

    #[test]
    fn test_remove_missing_key_does_not_notify() {
        let prefs = Preferences::in_memory();
        let notified = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&notified);
        prefs.add_change_listener(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(prefs.remove("missing"), None);
        prefs.set_int("present", 1).unwrap();
        assert_eq!(prefs.remove("present"), Some(json!(1)));

        assert_eq!(notified.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_write_values_notifies_once() {
        let prefs = Preferences::in_memory();
        let notified = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&notified);
        prefs.add_change_listener(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let inserted = prefs.write_values(|values| {
            values.insert("a".to_string(), json!(1));
            values.insert("b".to_string(), json!(2));
            values.len()
        });

        assert_eq!(inserted, 2);
        assert_eq!(notified.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_replayed_change_reaches_listeners() {
        let (prefs, _temp) = open_store();
        let notified = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&notified);
        prefs.add_change_listener(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        prefs.set_int("a", 1).unwrap();
        prefs.set_int("a", 2).unwrap();
        assert_eq!(notified.load(Ordering::SeqCst), 2);

        assert!(wait_for(|| notified.load(Ordering::SeqCst) == 3));
    }

    #[test]
    fn test_store_is_shareable_across_threads() {
        let (prefs, temp) = open_store();
        let prefs = Arc::new(prefs);

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let prefs = Arc::clone(&prefs);
                thread::spawn(move || {
                    for i in 0..25 {
                        prefs.set_int(&format!("worker{}", worker), i).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(wait_for(|| {
            let Some(saved) = try_read_file(&prefs_path(&temp)) else {
                return false;
            };
            (0..4).all(|worker| saved.get(&format!("worker{}", worker)) == Some(&json!(24)))
        }));
        assert!(prefs.flush_count() < 100);
    }
}

mod typed {
    use super::*;

    #[test]
    fn test_missing_keys_read_as_zero_values() {
        let prefs = Preferences::in_memory();

        assert!(!prefs.bool("missing"));
        assert_eq!(prefs.float("missing"), 0.0);
        assert_eq!(prefs.int("missing"), 0);
        assert_eq!(prefs.string("missing"), "");
        assert!(prefs.bool_list("missing").is_empty());
        assert!(prefs.float_list("missing").is_empty());
        assert!(prefs.int_list("missing").is_empty());
        assert!(prefs.string_list("missing").is_empty());
    }

    #[test]
    fn test_fallbacks_for_missing_keys() {
        let prefs = Preferences::in_memory();

        assert!(prefs.bool_with_fallback("missing", true));
        assert_eq!(prefs.float_with_fallback("missing", 2.5), 2.5);
        assert_eq!(prefs.int_with_fallback("missing", 42), 42);
        assert_eq!(prefs.string_with_fallback("missing", "dflt"), "dflt");
        assert_eq!(prefs.int_list_with_fallback("missing", vec![1, 2]), vec![1, 2]);
    }

    #[test]
    fn test_wrong_type_reads_as_fallback() {
        let prefs = Preferences::in_memory();
        prefs.set_string("value", "text").unwrap();

        assert!(prefs.bool_with_fallback("value", true));
        assert_eq!(prefs.int_with_fallback("value", 5), 5);
        assert_eq!(prefs.string("value"), "text");
    }

    #[test]
    fn test_whole_float_reads_as_int() {
        let prefs = Preferences::in_memory();
        prefs.set_float("whole", 12.0).unwrap();
        prefs.set_float("fraction", 12.5).unwrap();

        assert_eq!(prefs.int("whole"), 12);
        assert_eq!(prefs.int_with_fallback("fraction", -1), -1);
        assert_eq!(prefs.float("whole"), 12.0);
    }

    #[test]
    fn test_float_beyond_int_range_reads_as_fallback() {
        let prefs = Preferences::in_memory();
        prefs.set_float("edge", 9_223_372_036_854_775_808.0).unwrap();
        prefs.set_float("below", -9_223_372_036_854_775_808.0).unwrap();

        assert_eq!(prefs.int_with_fallback("edge", -1), -1);
        assert_eq!(prefs.int("below"), i64::MIN);
    }

    #[test]
    fn test_int_reads_as_float() {
        let prefs = Preferences::in_memory();
        prefs.set_int("volume", 3).unwrap();

        assert_eq!(prefs.float("volume"), 3.0);
    }

    #[test]
    fn test_lists() {
        let prefs = Preferences::in_memory();
        prefs.set_bool_list("bools", vec![true, false]).unwrap();
        prefs.set_float_list("floats", vec![0.5, 1.0]).unwrap();
        prefs.set_int_list("ints", vec![1, 2, 3]).unwrap();
        prefs
            .set_string_list("strings", vec!["x".to_string()])
            .unwrap();

        assert_eq!(prefs.bool_list("bools"), vec![true, false]);
        assert_eq!(prefs.float_list("floats"), vec![0.5, 1.0]);
        assert_eq!(prefs.int_list("ints"), vec![1, 2, 3]);
        assert_eq!(prefs.string_list("strings"), vec!["x".to_string()]);
    }

    #[test]
    fn test_mixed_list_reads_as_fallback() {
        let prefs = Preferences::in_memory();
        prefs.set("mixed", json!([1, "two", 3])).unwrap();

        assert!(prefs.int_list("mixed").is_empty());
        assert_eq!(prefs.get("mixed"), Some(json!([1, "two", 3])));
    }

    #[test]
    fn test_invalid_key_is_rejected_by_setters() {
        let prefs = Preferences::in_memory();

        let result = prefs.set_int("   ", 1);

        assert!(matches!(result, Err(PreferencesError::InvalidKey(_))));
        assert!(prefs.is_empty());
    }

    #[test]
    fn test_keys_are_trimmed() {
        let prefs = Preferences::in_memory();
        prefs.set_int(" volume ", 4).unwrap();

        assert_eq!(prefs.keys(), vec!["volume"]);
        assert_eq!(prefs.int("volume"), 4);
        assert_eq!(prefs.int("  volume"), 4);
        assert!(prefs.contains("volume"));
    }

    #[test]
    fn test_clear_empties_store() {
        let prefs = Preferences::in_memory();
        prefs.set_int("a", 1).unwrap();
        prefs.set_int("b", 2).unwrap();
        assert_eq!(prefs.len(), 2);

        prefs.clear();

        assert!(prefs.is_empty());
        assert!(!prefs.contains("a"));
    }
}
