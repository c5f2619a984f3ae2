//! Key-value preferences mirrored to a JSON file.
//!
//! Every mutation notifies listeners. When the store has a backing file, the
//! first notification writes the whole map to disk and opens a suspend window
//! (the debounce). Changes made inside the window are only counted; when it
//! closes, one synthetic notification is fired if anything was counted, which
//! goes through the same check and usually writes once more.
//!
//! Loading the file also notifies listeners, but never writes.

use crate::types::{AppConfig, Config, Key};
use error::PreferencesError;
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use std::time::Duration;
use timer::{ResetTimer, Scheduler};

mod timer;

pub mod error {
    use crate::types::KeyError;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum PreferencesError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("JSON error: {0}")]
        Json(#[from] serde_json::Error),

        #[error("preferences file does not hold a JSON object")]
        NotAnObject,

        #[error("invalid key: {0}")]
        InvalidKey(#[from] KeyError),

        #[error("preferences have no backing file")]
        NoStorage,
    }
}

/// Debounce window used when none is configured.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

type ChangeListener = Arc<dyn Fn() + Send + Sync>;

/// Save suppression state. Only ever held briefly, never across I/O.
#[derive(Debug, Default)]
struct SaveGuard {
    loading_in_progress: bool,
    suspend_change: bool,
    suspended_changes: usize,
}

struct Storage {
    path: PathBuf,
    debounce: Duration,
    scheduler: Scheduler,
}

struct Shared {
    values: RwLock<Map<String, Value>>,
    listeners: RwLock<Vec<ChangeListener>>,
    guard: RwLock<SaveGuard>,
    storage: Option<Storage>,
    flushes: AtomicU64,
}

/// Application preferences.
///
/// `Preferences` is `Send + Sync`; wrap it in an `Arc` to share it.
pub struct Preferences {
    timer: Option<ResetTimer>,
    shared: Arc<Shared>,
}

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(unix)]
fn create_private_dir(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(path)
}

#[cfg(not(unix))]
fn create_private_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

fn create_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_private_dir(parent),
        _ => Ok(()),
    }
}

fn as_int(value: &Value) -> Option<i64> {
    if let Some(int) = value.as_i64() {
        return Some(int);
    }
    // Integers written by other tools may come back as floats.
    let float = value.as_f64()?;
    let in_range = float >= i64::MIN as f64 && float < i64::MAX as f64;
    (float.fract() == 0.0 && in_range).then_some(float as i64)
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn as_list<T>(value: &Value, element: impl Fn(&Value) -> Option<T>) -> Option<Vec<T>> {
    value.as_array()?.iter().map(element).collect()
}

impl Shared {
    fn new(storage: Option<Storage>) -> Self {
        Self {
            values: RwLock::new(Map::new()),
            listeners: RwLock::new(Vec::new()),
            guard: RwLock::new(SaveGuard::default()),
            storage,
            flushes: AtomicU64::new(0),
        }
    }

    /// Runs the save hook, then every listener in registration order.
    fn fire_change(&self) {
        self.on_change();
        let listeners = read_lock(&self.listeners).clone();
        for listener in listeners {
            listener();
        }
    }

    fn on_change(&self) {
        let Some(storage) = &self.storage else {
            return;
        };

        let skip = {
            let mut guard = write_lock(&self.guard);
            if guard.suspend_change {
                guard.suspended_changes += 1;
            }
            let skip = guard.suspend_change || guard.loading_in_progress;
            // Claim the window here so concurrent writers see it before the save starts.
            if !skip {
                guard.suspend_change = true;
            }
            skip
        };
        if skip {
            return;
        }

        if let Err(err) = self.save_to_file(&storage.path) {
            tracing::error!("Failed on saving preferences: {}", err);
        }
    }

    /// Writes the whole map to `path` and opens a suspend window.
    fn save_to_file(&self, path: &Path) -> Result<(), PreferencesError> {
        write_lock(&self.guard).suspend_change = true;
        let result = self.write_file(path);
        self.schedule_reset();
        result
    }

    fn write_file(&self, path: &Path) -> Result<(), PreferencesError> {
        create_parent_dir(path)?;
        let mut file = fs::File::create(path)?;
        let encoded = serde_json::to_vec(&*read_lock(&self.values))?;
        file.write_all(&encoded)?;
        file.write_all(b"\n")?;
        file.sync_all()?;

        let flushes = self.flushes.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!("Saved preferences to {} (flush #{})", path.display(), flushes);
        Ok(())
    }

    fn schedule_reset(&self) {
        match &self.storage {
            Some(storage) => storage.scheduler.schedule_after(storage.debounce),
            // No timer without a backing file; close the window straight away.
            None => write_lock(&self.guard).suspend_change = false,
        }
    }

    /// Closes the suspend window, replaying one change if any were held back.
    fn reset_suspend(&self) {
        let changes = {
            let mut guard = write_lock(&self.guard);
            guard.suspend_change = false;
            std::mem::take(&mut guard.suspended_changes)
        };

        if changes > 0 {
            tracing::debug!("Replaying {} suspended preference change(s)", changes);
            self.fire_change();
        }
    }

    fn load_from_file(&self, path: &Path) -> Result<(), PreferencesError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                create_parent_dir(path)?;
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        if content.trim().is_empty() {
            return Ok(());
        }

        let Value::Object(loaded) = serde_json::from_str::<Value>(&content)? else {
            return Err(PreferencesError::NotAnObject);
        };

        write_lock(&self.guard).loading_in_progress = true;
        write_lock(&self.values).extend(loaded);
        self.fire_change();
        write_lock(&self.guard).loading_in_progress = false;

        tracing::debug!("Loaded preferences from {}", path.display());
        Ok(())
    }
}

/// Construction.
impl Preferences {
    /// A store that lives only in memory. Nothing is ever written.
    pub fn in_memory() -> Self {
        Self {
            timer: None,
            shared: Arc::new(Shared::new(None)),
        }
    }

    /// Opens a store backed by `path` and loads whatever the file holds.
    ///
    /// A missing file is fine; its directory is created. A file that cannot be
    /// read or decoded is logged and the store starts empty.
    pub fn open(path: impl Into<PathBuf>, debounce: Duration) -> Result<Self, PreferencesError> {
        let (scheduler, queue) = timer::channel();
        let storage = Storage {
            path: path.into(),
            debounce,
            scheduler: scheduler.clone(),
        };
        let shared = Arc::new(Shared::new(Some(storage)));

        let weak: Weak<Shared> = Arc::downgrade(&shared);
        let timer = ResetTimer::spawn(&scheduler, queue, move || {
            if let Some(shared) = weak.upgrade() {
                shared.reset_suspend();
            }
        })?;

        let preferences = Self {
            timer: Some(timer),
            shared,
        };
        preferences.load();
        Ok(preferences)
    }

    /// Opens the store at the app's preferences path with the configured debounce.
    pub fn from_config(
        config: &Config,
        app_config: &AppConfig,
    ) -> Result<Self, PreferencesError> {
        Self::open(config.preferences_path(), app_config.preferences.debounce())
    }

    pub fn storage_path(&self) -> Option<&Path> {
        self.shared.storage.as_ref().map(|storage| storage.path.as_path())
    }

    /// Number of times the map has been written to disk.
    pub fn flush_count(&self) -> u64 {
        self.shared.flushes.load(Ordering::Relaxed)
    }
}

/// Persistence operations.
impl Preferences {
    /// Reloads the backing file, logging any error.
    pub fn load(&self) {
        let Some(path) = self.storage_path() else {
            return;
        };
        if let Err(err) = self.shared.load_from_file(path) {
            tracing::error!("Preferences load error: {}", err);
        }
    }

    /// Merges the JSON object stored at `path` into the map without saving.
    pub fn load_from_file(&self, path: &Path) -> Result<(), PreferencesError> {
        self.shared.load_from_file(path)
    }

    /// Writes the map to the backing file now.
    pub fn save(&self) -> Result<(), PreferencesError> {
        let path = self.storage_path().ok_or(PreferencesError::NoStorage)?;
        self.shared.save_to_file(path)
    }

    /// Writes the map to `path`.
    pub fn save_to_file(&self, path: &Path) -> Result<(), PreferencesError> {
        self.shared.save_to_file(path)
    }
}

/// Change notification.
impl Preferences {
    /// Registers a callback run after every change, in registration order.
    pub fn add_change_listener(&self, listener: impl Fn() + Send + Sync + 'static) {
        write_lock(&self.shared.listeners).push(Arc::new(listener));
    }

    pub fn change_listener_count(&self) -> usize {
        read_lock(&self.shared.listeners).len()
    }
}

/// Untyped access.
impl Preferences {
    pub fn get(&self, key: &str) -> Option<Value> {
        self.lookup(key, |value| Some(value.clone()))
    }

    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<(), PreferencesError> {
        let key = Key::try_new(key)?;
        write_lock(&self.shared.values).insert(key.into_inner(), value.into());
        self.shared.fire_change();
        Ok(())
    }

    /// Removes a key, notifying listeners only if it was present.
    pub fn remove(&self, key: &str) -> Option<Value> {
        let key = Key::try_new(key).ok()?;
        let removed = write_lock(&self.shared.values).remove(key.as_str());
        if removed.is_some() {
            self.shared.fire_change();
        }
        removed
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key, |_| Some(())).is_some()
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        read_lock(&self.shared.values).keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        read_lock(&self.shared.values).len()
    }

    pub fn is_empty(&self) -> bool {
        read_lock(&self.shared.values).is_empty()
    }

    pub fn clear(&self) {
        write_lock(&self.shared.values).clear();
        self.shared.fire_change();
    }

    /// Runs `f` with read access to the whole map.
    pub fn read_values<R>(&self, f: impl FnOnce(&Map<String, Value>) -> R) -> R {
        f(&read_lock(&self.shared.values))
    }

    /// Runs `f` with write access to the whole map, then notifies once.
    ///
    /// Keys inserted here are not validated.
    pub fn write_values<R>(&self, f: impl FnOnce(&mut Map<String, Value>) -> R) -> R {
        let result = f(&mut write_lock(&self.shared.values));
        self.shared.fire_change();
        result
    }

    fn lookup<T>(&self, key: &str, convert: impl FnOnce(&Value) -> Option<T>) -> Option<T> {
        let key = Key::try_new(key).ok()?;
        read_lock(&self.shared.values)
            .get(key.as_str())
            .and_then(convert)
    }
}

/// Typed access. A missing key or a value of another type reads as the fallback.
impl Preferences {
    pub fn bool(&self, key: &str) -> bool {
        self.bool_with_fallback(key, false)
    }

    pub fn bool_with_fallback(&self, key: &str, fallback: bool) -> bool {
        self.lookup(key, Value::as_bool).unwrap_or(fallback)
    }

    pub fn set_bool(&self, key: &str, value: bool) -> Result<(), PreferencesError> {
        self.set(key, value)
    }

    pub fn float(&self, key: &str) -> f64 {
        self.float_with_fallback(key, 0.0)
    }

    pub fn float_with_fallback(&self, key: &str, fallback: f64) -> f64 {
        self.lookup(key, Value::as_f64).unwrap_or(fallback)
    }

    /// Non-finite values cannot be stored in JSON and are written as `null`.
    pub fn set_float(&self, key: &str, value: f64) -> Result<(), PreferencesError> {
        self.set(key, value)
    }

    pub fn int(&self, key: &str) -> i64 {
        self.int_with_fallback(key, 0)
    }

    pub fn int_with_fallback(&self, key: &str, fallback: i64) -> i64 {
        self.lookup(key, as_int).unwrap_or(fallback)
    }

    pub fn set_int(&self, key: &str, value: i64) -> Result<(), PreferencesError> {
        self.set(key, value)
    }

    pub fn string(&self, key: &str) -> String {
        self.string_with_fallback(key, "")
    }

    pub fn string_with_fallback(&self, key: &str, fallback: &str) -> String {
        self.lookup(key, as_string)
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn set_string(&self, key: &str, value: &str) -> Result<(), PreferencesError> {
        self.set(key, value)
    }
}

/// Typed list access. A list with any element of the wrong type reads as the fallback.
impl Preferences {
    pub fn bool_list(&self, key: &str) -> Vec<bool> {
        self.bool_list_with_fallback(key, Vec::new())
    }

    pub fn bool_list_with_fallback(&self, key: &str, fallback: Vec<bool>) -> Vec<bool> {
        self.lookup(key, |value| as_list(value, Value::as_bool))
            .unwrap_or(fallback)
    }

    pub fn set_bool_list(&self, key: &str, value: Vec<bool>) -> Result<(), PreferencesError> {
        self.set(key, value)
    }

    pub fn float_list(&self, key: &str) -> Vec<f64> {
        self.float_list_with_fallback(key, Vec::new())
    }

    pub fn float_list_with_fallback(&self, key: &str, fallback: Vec<f64>) -> Vec<f64> {
        self.lookup(key, |value| as_list(value, Value::as_f64))
            .unwrap_or(fallback)
    }

    pub fn set_float_list(&self, key: &str, value: Vec<f64>) -> Result<(), PreferencesError> {
        self.set(key, value)
    }

    pub fn int_list(&self, key: &str) -> Vec<i64> {
        self.int_list_with_fallback(key, Vec::new())
    }

    pub fn int_list_with_fallback(&self, key: &str, fallback: Vec<i64>) -> Vec<i64> {
        self.lookup(key, |value| as_list(value, as_int))
            .unwrap_or(fallback)
    }

    pub fn set_int_list(&self, key: &str, value: Vec<i64>) -> Result<(), PreferencesError> {
        self.set(key, value)
    }

    pub fn string_list(&self, key: &str) -> Vec<String> {
        self.string_list_with_fallback(key, Vec::new())
    }

    pub fn string_list_with_fallback(&self, key: &str, fallback: Vec<String>) -> Vec<String> {
        self.lookup(key, |value| as_list(value, as_string))
            .unwrap_or(fallback)
    }

    pub fn set_string_list(&self, key: &str, value: Vec<String>) -> Result<(), PreferencesError> {
        self.set(key, value)
    }
}

impl Drop for Preferences {
    fn drop(&mut self) {
        // Stop the timer first so a pending reset cannot race the final write.
        drop(self.timer.take());

        let Some(storage) = &self.shared.storage else {
            return;
        };
        let pending = std::mem::take(&mut write_lock(&self.shared.guard).suspended_changes);
        if pending == 0 {
            return;
        }
        if let Err(err) = self.shared.write_file(&storage.path) {
            tracing::error!("Failed on saving preferences: {}", err);
        }
    }
}

#[cfg(test)]
mod tests;
