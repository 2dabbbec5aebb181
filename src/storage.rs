use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, warn};

use crate::models::{ImportantDate, Task, IMPORTANT_DATE_TAG};

/// File name of the task store.
pub const TASKS_FILE: &str = "tasks.json";
/// File name of the important-date store.
pub const IMPORTANT_DATES_FILE: &str = "important_dates.json";

/// Returns the directory holding the store files.
///
/// The path is determined in the following order:
/// 1. `DAYWEAVER_DATA_DIR` environment variable.
/// 2. `~/.local/share/dayweaver` (on Linux).
/// 3. `.` (fallback).
fn data_dir() -> PathBuf {
    std::env::var("DAYWEAVER_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push("dayweaver");
            p
        })
}

/// Minimal shape requirements a stored record must satisfy on load.
pub trait StoredRecord: Serialize + DeserializeOwned + Clone {
    fn record_id(&self) -> &str;
    /// Checks a raw JSON element before full deserialization.
    fn shape_is_valid(value: &Value) -> bool;
}

impl StoredRecord for Task {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn shape_is_valid(value: &Value) -> bool {
        value.get("id").is_some_and(Value::is_string)
    }
}

impl StoredRecord for ImportantDate {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn shape_is_valid(value: &Value) -> bool {
        value.get("id").is_some_and(Value::is_string)
            && value.get("type").and_then(Value::as_str) == Some(IMPORTANT_DATE_TAG)
    }
}

/// JSON-file store for one record kind, keyed by a fixed file name.
///
/// Load favors availability over partial recovery: any corruption (bad JSON,
/// not an array, an element failing the shape check) discards the stored
/// file entirely and yields an empty list.
pub struct JsonStore<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: StoredRecord> JsonStore<T> {
    /// Opens the store for `file_name` under the data directory, creating
    /// the directory if needed.
    pub fn open(file_name: &str) -> JsonStore<T> {
        let dir = data_dir();
        if !dir.exists() {
            let _ = fs::create_dir_all(&dir);
        }
        JsonStore {
            path: dir.join(file_name),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads all records.
    ///
    /// Returns an empty vector if the file does not exist or cannot be read.
    /// A file that fails the parse or shape checks is deleted before the
    /// empty vector is returned.
    pub fn load(&self) -> Vec<T> {
        if !self.path.exists() {
            return Vec::new();
        }
        let raw = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(_) => return Vec::new(),
        };
        let value: Value = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "stored data is not valid JSON, discarding");
                self.discard();
                return Vec::new();
            }
        };
        let Some(items) = value.as_array() else {
            warn!(path = %self.path.display(), "stored data is not an array, discarding");
            self.discard();
            return Vec::new();
        };
        if !items.iter().all(T::shape_is_valid) {
            warn!(path = %self.path.display(), "stored record failed the shape check, discarding");
            self.discard();
            return Vec::new();
        }
        match serde_json::from_value(value) {
            Ok(records) => records,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "stored data failed to deserialize, discarding");
                self.discard();
                Vec::new()
            }
        }
    }

    /// Saves the full record list, overwriting the file.
    ///
    /// Failures are logged and swallowed; callers cannot observe them.
    pub fn save(&self, records: &[T]) {
        let body = match serde_json::to_string_pretty(records) {
            Ok(s) => s,
            Err(err) => {
                error!(path = %self.path.display(), %err, "failed to serialize records");
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, body) {
            error!(path = %self.path.display(), %err, "failed to write store");
        }
    }

    fn discard(&self) {
        if let Err(err) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), %err, "failed to remove corrupted store");
        }
    }
}

/// Deletes both store files.
pub fn delete_database() -> std::io::Result<()> {
    for file_name in [TASKS_FILE, IMPORTANT_DATES_FILE] {
        let path = data_dir().join(file_name);
        if path.exists() {
            fs::remove_file(path)?;
        }
    }
    Ok(())
}
