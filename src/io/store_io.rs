use std::path::Path;

use chrono::Utc;

use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::io::storage::FileStore;
use crate::ops::task_store::TaskStore;

/// Open the task store at `path`, never failing.
///
/// An unreadable storage file is backed up and replaced by an empty one; an
/// unreadable `tasks` value starts an empty collection and its raw text goes
/// to the recovery log.
pub fn open_task_store(path: &Path, quota: usize) -> TaskStore<FileStore> {
    let storage = FileStore::open_or_recover(path, quota);
    let dir = storage.dir();
    let (store, issue) = TaskStore::load(storage);
    if let Some(issue) = issue {
        recovery::log_recovery(
            &dir,
            RecoveryEntry {
                timestamp: Utc::now(),
                category: RecoveryCategory::Load,
                description: "stored tasks unreadable".to_string(),
                fields: vec![
                    ("Source".to_string(), path.display().to_string()),
                    ("Error".to_string(), issue.error.to_string()),
                ],
                body: issue.raw.unwrap_or_default(),
            },
        );
    }
    store
}
