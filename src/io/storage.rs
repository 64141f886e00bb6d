use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};

/// Error type for key-value storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },
    #[error("malformed stored data: {0}")]
    Json(#[from] serde_json::Error),
}

/// A string-to-string record with local-storage semantics.
///
/// Every `set` is durable once it returns `Ok`. A failed `set` leaves the
/// previous value in place.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Bytes counted against the quota: every key plus every value
fn usage<'a>(entries: impl Iterator<Item = (&'a String, &'a String)>) -> usize {
    entries.map(|(k, v)| k.len() + v.len()).sum()
}

/// Usage after replacing `key` with `value`
fn usage_after<'a>(
    entries: impl Iterator<Item = (&'a String, &'a String)>,
    key: &str,
    value: &str,
) -> usize {
    let others: usize = usage(entries.filter(|(k, _)| k.as_str() != key));
    others + key.len() + value.len()
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// Key-value record persisted as one JSON object, rewritten atomically on
/// every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: IndexMap<String, String>,
    quota: usize,
}

impl FileStore {
    /// Open the record at `path`. A missing file is an empty record.
    pub fn open(path: &Path, quota: usize) -> Result<Self, StorageError> {
        let entries = if path.exists() {
            let text = fs::read_to_string(path).map_err(|e| StorageError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })?;
            if text.trim().is_empty() {
                IndexMap::new()
            } else {
                serde_json::from_str(&text)?
            }
        } else {
            IndexMap::new()
        };
        Ok(FileStore {
            path: path.to_path_buf(),
            entries,
            quota,
        })
    }

    /// Open the record, falling back to an empty one if the file is corrupted.
    /// The corrupted file is backed up as `<name>.bak` and its contents are
    /// written to the recovery log.
    pub fn open_or_recover(path: &Path, quota: usize) -> Self {
        match Self::open(path, quota) {
            Ok(store) => store,
            Err(e) => {
                let bak = backup_path(path);
                let _ = fs::copy(path, &bak);
                tracing::warn!(
                    path = %path.display(),
                    backup = %bak.display(),
                    error = %e,
                    "storage unreadable, starting empty"
                );
                recovery::log_recovery(
                    &recovery_dir(path),
                    RecoveryEntry {
                        timestamp: chrono::Utc::now(),
                        category: RecoveryCategory::Load,
                        description: "storage file unreadable".to_string(),
                        fields: vec![
                            ("Source".to_string(), path.display().to_string()),
                            ("Backup".to_string(), bak.display().to_string()),
                            ("Error".to_string(), e.to_string()),
                        ],
                        body: fs::read_to_string(path).unwrap_or_default(),
                    },
                );
                FileStore {
                    path: path.to_path_buf(),
                    entries: IndexMap::new(),
                    quota,
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the storage file (and its recovery log)
    pub fn dir(&self) -> PathBuf {
        recovery_dir(&self.path)
    }

    fn try_set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let needed = usage_after(self.entries.iter(), key, value);
        if needed > self.quota {
            return Err(StorageError::QuotaExceeded {
                needed,
                quota: self.quota,
            });
        }
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.write_entries(&next)?;
        self.entries = next;
        Ok(())
    }

    fn write_entries(&self, entries: &IndexMap<String, String>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(entries)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| StorageError::WriteError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        recovery::atomic_write(&self.path, content.as_bytes()).map_err(|e| {
            StorageError::WriteError {
                path: self.path.clone(),
                source: e,
            }
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let result = self.try_set(key, value);
        if let Err(e) = &result {
            // The rejected value would otherwise be lost
            recovery::log_recovery(
                &self.dir(),
                RecoveryEntry {
                    timestamp: chrono::Utc::now(),
                    category: RecoveryCategory::Write,
                    description: format!("write of '{}' failed", key),
                    fields: vec![
                        ("Target".to_string(), self.path.display().to_string()),
                        ("Error".to_string(), e.to_string()),
                    ],
                    body: value.to_string(),
                },
            );
        }
        result
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut next = self.entries.clone();
        next.shift_remove(key);
        self.write_entries(&next)?;
        self.entries = next;
        Ok(())
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".bak");
    path.with_file_name(name)
}

fn recovery_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Volatile record with the same quota semantics as `FileStore`
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore {
            entries: HashMap::new(),
            quota: usize::MAX,
        }
    }
}

impl MemoryStore {
    pub fn with_quota(quota: usize) -> Self {
        MemoryStore {
            entries: HashMap::new(),
            quota,
        }
    }

    pub fn set_quota(&mut self, quota: usize) {
        self.quota = quota;
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let needed = usage_after(self.entries.iter(), key, value);
        if needed > self.quota {
            return Err(StorageError::QuotaExceeded {
                needed,
                quota: self.quota,
            });
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}
