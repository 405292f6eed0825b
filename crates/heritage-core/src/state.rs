//! Persistent ledger state
//!
//! Testament records and token books, saved as one JSON document so that a
//! host applies each operation to both or neither. Hosts hold a
//! [`StateLock`] across load, change and save so that two processes never
//! interleave on the same file.

use crate::clock::Timestamp;
use crate::store::{StoreError, TestamentStore};
use crate::token::TokenLedger;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors from state operations
#[derive(Error, Debug)]
pub enum StateError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Inconsistent testament store: {0}")]
    Inconsistent(#[from] StoreError),
}

/// Everything the host persists between calls
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LedgerState {
    /// Testament records, both indices
    #[serde(default)]
    pub testaments: TestamentStore,
    /// Token balances and allowances
    #[serde(default)]
    pub tokens: TokenLedger,
    /// Last completed liveness check (unix timestamp)
    pub last_check: Option<Timestamp>,
}

impl LedgerState {
    /// Create empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse state from JSON and verify the two testament indices agree.
    pub fn from_json(contents: &str) -> Result<Self, StateError> {
        let state: LedgerState = serde_json::from_str(contents)?;
        state.testaments.check_consistency()?;
        Ok(state)
    }

    /// Load state from file, or create empty if not exists
    pub fn load(path: &Path) -> Result<Self, StateError> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            Self::from_json(&contents)
        } else {
            Ok(Self::new())
        }
    }

    /// Save state to file.
    ///
    /// Writes a sibling temp file and renames it over `path`, so readers
    /// see either the old or the new state.
    pub fn save(&self, path: &Path) -> Result<(), StateError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn mark_checked(&mut self, timestamp: Timestamp) {
        self.last_check = Some(timestamp);
    }
}

/// Exclusive advisory lock on a state file, released on drop.
///
/// Taken on a sibling `.lock` file, since [`LedgerState::save`] replaces
/// the state file itself.
#[derive(Debug)]
pub struct StateLock {
    file: File,
}

impl StateLock {
    /// Block until the lock for `path` is ours.
    pub fn acquire(path: &Path) -> Result<Self, StateError> {
        let file = Self::open(path)?;
        fs2::FileExt::lock_exclusive(&file)?;
        Ok(Self { file })
    }

    /// Take the lock for `path` if nobody else holds it.
    pub fn try_acquire(path: &Path) -> Result<Option<Self>, StateError> {
        let file = Self::open(path)?;
        match fs2::FileExt::try_lock_exclusive(&file) {
            Ok(()) => Ok(Some(Self { file })),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn open(path: &Path) -> Result<File, StateError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path.with_extension("json.lock"))?;
        Ok(file)
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}
