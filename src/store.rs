//! Durable storage for the binding table.
//!
//! The table lives in a single JSON document. Saves go through a temp file
//! in the same directory followed by a rename, so a reader never observes a
//! half-written file.

use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::{errors::StoreError, models::BindingTable};

pub trait Store: Send + Sync {
    /// Returns the last persisted table. A missing file is an empty table.
    fn load(&self) -> Result<BindingTable, StoreError>;

    /// Atomically replaces the persisted table.
    fn save(&self, table: &BindingTable) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    // Moves a corrupt file out of the way so the next save cannot clobber it.
    fn quarantine(&self) -> Option<PathBuf> {
        let mut name = self.path.file_name()?.to_os_string();
        name.push(format!(".corrupt-{}", chrono::Utc::now().timestamp()));
        let target = self.path.with_file_name(name);
        match fs::rename(&self.path, &target) {
            Ok(()) => Some(target),
            Err(e) => {
                tracing::warn!("Could not move corrupt {} aside: {}", self.path.display(), e);
                None
            }
        }
    }
}

impl Store for JsonFileStore {
    fn load(&self) -> Result<BindingTable, StoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BindingTable::new()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        serde_json::from_slice(&raw).map_err(|e| {
            let reason = match self.quarantine() {
                Some(moved) => format!("{e} (moved to {})", moved.display()),
                None => e.to_string(),
            };
            StoreError::Corrupt {
                path: self.path.clone(),
                reason,
            }
        })
    }

    fn save(&self, table: &BindingTable) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(table)?;
        let parent = self.parent_dir();

        let mut tmp = tempfile::NamedTempFile::new_in(&parent).map_err(|e| StoreError::io(&parent, e))?;
        let write_durably = |tmp: &mut tempfile::NamedTempFile| -> std::io::Result<()> {
            tmp.write_all(&json)?;
            tmp.flush()?;
            tmp.as_file().sync_all()
        };
        write_durably(&mut tmp).map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::io(&self.path, e.error))?;

        // Commit the rename itself. Not every platform can open a directory.
        if let Ok(dir) = File::open(&parent) {
            let _ = dir.sync_all();
        }

        Ok(())
    }
}

/// Keeps the last saved table in memory; can be told to fail saves.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    saved: std::sync::Mutex<Option<BindingTable>>,
    fail_saves: std::sync::atomic::AtomicBool,
    saves: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MemoryStore {
    pub fn failing() -> Self {
        let store = Self::default();
        store.fail_saves.store(true, std::sync::atomic::Ordering::SeqCst);
        store
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl Store for MemoryStore {
    fn load(&self) -> Result<BindingTable, StoreError> {
        Ok(self.saved.lock().unwrap().clone().unwrap_or_default())
    }

    fn save(&self, table: &BindingTable) -> Result<(), StoreError> {
        self.saves.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if self.fail_saves.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(StoreError::io(
                "memory",
                std::io::Error::new(ErrorKind::Other, "disk full"),
            ));
        }
        *self.saved.lock().unwrap() = Some(table.clone());
        Ok(())
    }
}
