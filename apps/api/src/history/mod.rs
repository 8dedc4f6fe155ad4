//! Bounded history of past audits.
//!
//! History is a best-effort cache, not durable storage. It lives wherever the
//! [`HistoryStorage`] backend puts it (browser-local storage in the web client,
//! memory in tests), is last-write-wins, and callers must tolerate its loss.
//!
//! Every mutation persists the whole list. When the backend reports it is out
//! of space the list is cut to the [`QUOTA_FALLBACK_LEN`] most recent entries
//! and saved once more; if that also fails the history is cleared.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::report::AnalysisResult;

pub const MAX_HISTORY: usize = 5;
pub const QUOTA_FALLBACK_LEN: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage quota exceeded")]
    QuotaExceeded,

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Where the serialized history list is kept.
pub trait HistoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn save(&mut self, serialized: &str) -> Result<(), StorageError>;
    fn clear(&mut self);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Creation timestamp in milliseconds; unique within one history.
    pub id: i64,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub thumbnail: String,
    pub result: AnalysisResult,
}

/// What a save ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Truncated,
    Cleared,
}

pub struct HistoryStore<S: HistoryStorage> {
    storage: S,
    entries: Vec<HistoryEntry>,
}

impl<S: HistoryStorage> HistoryStore<S> {
    /// Reads the stored list. Unreadable or malformed data loads as empty.
    pub fn load(storage: S) -> Self {
        let entries = match storage.load() {
            Ok(Some(raw)) => serde_json::from_str::<Vec<HistoryEntry>>(&raw).unwrap_or_else(|e| {
                warn!("Discarding unreadable history: {e}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("History storage unavailable: {e}");
                Vec::new()
            }
        };
        let mut store = Self { storage, entries };
        store.entries.truncate(MAX_HISTORY);
        store
    }

    /// Newest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, id: i64) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Adds a result at the front, dropping the oldest beyond [`MAX_HISTORY`].
    pub fn add(
        &mut self,
        name: impl Into<String>,
        thumbnail: impl Into<String>,
        result: AnalysisResult,
        now: DateTime<Utc>,
    ) -> (i64, SaveOutcome) {
        let mut id = now.timestamp_millis();
        if let Some(newest) = self.entries.iter().map(|e| e.id).max() {
            id = id.max(newest + 1);
        }

        self.entries.insert(
            0,
            HistoryEntry {
                id,
                name: name.into(),
                timestamp: now,
                thumbnail: thumbnail.into(),
                result,
            },
        );
        self.entries.truncate(MAX_HISTORY);
        (id, self.persist())
    }

    /// Renames an entry. Returns `None` when no entry has `id`.
    pub fn rename(&mut self, id: i64, name: impl Into<String>) -> Option<SaveOutcome> {
        let entry = self.entries.iter_mut().find(|e| e.id == id)?;
        entry.name = name.into();
        Some(self.persist())
    }

    pub fn remove(&mut self, id: i64) -> Option<SaveOutcome> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        self.entries.remove(index);
        Some(self.persist())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.storage.clear();
    }

    fn persist(&mut self) -> SaveOutcome {
        match self.try_save() {
            Ok(()) => return SaveOutcome::Saved,
            Err(StorageError::QuotaExceeded) => {
                warn!(
                    "History exceeds storage quota; keeping the {QUOTA_FALLBACK_LEN} most recent entries"
                );
            }
            Err(e) => {
                warn!("History save failed: {e}; clearing history");
                self.clear();
                return SaveOutcome::Cleared;
            }
        }

        self.entries.truncate(QUOTA_FALLBACK_LEN);
        match self.try_save() {
            Ok(()) => SaveOutcome::Truncated,
            Err(e) => {
                warn!("History save failed after truncation: {e}; clearing history");
                self.clear();
                SaveOutcome::Cleared
            }
        }
    }

    fn try_save(&mut self) -> Result<(), StorageError> {
        let serialized = serde_json::to_string(&self.entries)
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        self.storage.save(&serialized)
    }
}

/// In-process backend with an optional byte capacity.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    data: Option<String>,
    capacity: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            data: None,
            capacity: Some(bytes),
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.data.as_deref()
    }
}

impl HistoryStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.data.clone())
    }

    fn save(&mut self, serialized: &str) -> Result<(), StorageError> {
        if self.capacity.is_some_and(|cap| serialized.len() > cap) {
            return Err(StorageError::QuotaExceeded);
        }
        self.data = Some(serialized.to_string());
        Ok(())
    }

    fn clear(&mut self) {
        self.data = None;
    }
}
