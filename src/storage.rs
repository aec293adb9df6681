use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

const MIGRATION_SQL_0001: &str = include_str!("../migrations/0001_initial.sql");

/// Durable string key-value storage backing the collection store.
pub trait KeyValueStore {
  /// Returns `Ok(None)` when the key has never been written.
  fn get(&self, key: &str) -> Result<Option<String>, String>;
  fn set(&self, key: &str, value: &str) -> Result<(), String>;
}

pub(crate) fn now_iso() -> String {
  Utc::now().to_rfc3339()
}

fn init_database(db_path: &Path) -> Result<(), String> {
  if let Some(parent) = db_path.parent() {
    fs::create_dir_all(parent).map_err(|e| e.to_string())?;
  }

  let connection = Connection::open(db_path).map_err(|e| e.to_string())?;
  connection
    .execute_batch(MIGRATION_SQL_0001)
    .map_err(|e| e.to_string())?;
  Ok(())
}

fn open_database(db_path: &Path) -> Result<Connection, String> {
  Connection::open(db_path).map_err(|e| e.to_string())
}

/// SQLite-backed store. Every call opens the database file, so the handle
/// itself holds no connection and can be shared freely.
#[derive(Clone, Debug)]
pub struct SqliteStore {
  db_path: PathBuf,
}

impl SqliteStore {
  pub fn open(db_path: impl Into<PathBuf>) -> Result<Self, String> {
    let db_path = db_path.into();
    init_database(&db_path)?;
    log::info!("Opened collection database at {}", db_path.display());
    Ok(Self { db_path })
  }

  pub fn db_path(&self) -> &Path {
    &self.db_path
  }
}

impl KeyValueStore for SqliteStore {
  fn get(&self, key: &str) -> Result<Option<String>, String> {
    let connection = open_database(&self.db_path)?;
    connection
      .query_row(
        "SELECT value FROM kv_entries WHERE key = ?1 LIMIT 1",
        params![key],
        |row| row.get(0),
      )
      .optional()
      .map_err(|e| e.to_string())
  }

  fn set(&self, key: &str, value: &str) -> Result<(), String> {
    let connection = open_database(&self.db_path)?;
    connection
      .execute(
        "INSERT INTO kv_entries (key, value, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?3)
         ON CONFLICT(key) DO UPDATE SET
           value = excluded.value,
           updated_at = excluded.updated_at",
        params![key, value, now_iso()],
      )
      .map_err(|e| e.to_string())?;
    Ok(())
  }
}

/// In-process store for tests and throwaway sessions. Clones share the same
/// entries, so a test can keep a handle after giving one to the store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
  entries: Arc<Mutex<HashMap<String, String>>>,
  fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Makes every subsequent `set` fail, as a full or unavailable disk would.
  pub fn set_fail_writes(&self, fail: bool) {
    self.fail_writes.store(fail, Ordering::SeqCst);
  }

  pub fn insert_raw(&self, key: &str, value: &str) {
    if let Ok(mut entries) = self.entries.lock() {
      entries.insert(key.to_string(), value.to_string());
    }
  }
}

impl KeyValueStore for MemoryStore {
  fn get(&self, key: &str) -> Result<Option<String>, String> {
    let entries = self.entries.lock().map_err(|e| e.to_string())?;
    Ok(entries.get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> Result<(), String> {
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(format!("Storage quota exceeded while writing '{}'.", key));
    }
    let mut entries = self.entries.lock().map_err(|e| e.to_string())?;
    entries.insert(key.to_string(), value.to_string());
    Ok(())
  }
}
