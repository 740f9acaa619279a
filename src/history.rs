//! JSON-backed history of pipeline runs.
//!
//! The whole history is one JSON object mapping run keys to
//! [`RunRecord`]s. Every mutation rewrites the file. A missing or unreadable
//! file starts an empty history rather than failing, so a corrupt history
//! never blocks a new run.

use crate::error::Result;
use crate::pipeline::RunRecord;
use log::{info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Run records keyed by run id, optionally persisted to a file.
#[derive(Debug, Default)]
pub struct RunHistory {
    path: Option<PathBuf>,
    runs: BTreeMap<String, RunRecord>,
}

impl RunHistory {
    /// A history that lives only in memory.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the history stored at `path`, loading any runs already there.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let runs = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(runs) => runs,
                Err(e) => {
                    warn!(
                        "ignoring unreadable history {}: {}",
                        path.display(),
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("could not read history {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self {
            path: Some(path),
            runs,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the history to its file. A no-op for in-memory histories.
    pub fn save(&self) -> Result<()> {
        if let Some(path) = &self.path {
            let json = serde_json::to_string_pretty(&self.runs)?;
            fs::write(path, json)?;
        }
        Ok(())
    }

    /// Insert or replace the run under `key` and persist. If the file cannot
    /// be written the history is left as it was.
    pub fn store(&mut self, key: impl Into<String>, record: RunRecord) -> Result<()> {
        let key = key.into();
        let previous = self.runs.insert(key.clone(), record);
        if let Err(e) = self.save() {
            match previous {
                Some(old) => self.runs.insert(key, old),
                None => self.runs.remove(&key),
            };
            return Err(e);
        }
        info!("saved run under key {}", key);
        Ok(())
    }

    pub fn retrieve(&self, key: &str) -> Option<&RunRecord> {
        self.runs.get(key)
    }

    /// Remove the run under `key`, persisting if it existed.
    /// Returns whether a run was removed.
    pub fn delete(&mut self, key: &str) -> Result<bool> {
        let Some(removed) = self.runs.remove(key) else {
            return Ok(false);
        };
        if let Err(e) = self.save() {
            self.runs.insert(key.to_owned(), removed);
            return Err(e);
        }
        Ok(true)
    }

    /// Stored keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.runs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}
