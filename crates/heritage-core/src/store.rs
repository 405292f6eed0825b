//! Testament storage
//!
//! Two indices over the same records: one keyed by testator, one keyed by
//! inheritor. Each entry holds the full record. Every mutation is staged as a
//! [`Write`], validated against both indices, and only then applied to both
//! together.

use crate::address::Address;
use crate::testament::Testament;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Invariant violations detected by the store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Testator already has a testament: {0}")]
    DuplicateTestator(Address),

    #[error("Inheritor already named by another testament: {0}")]
    DuplicateInheritor(Address),

    #[error("No testament for testator: {0}")]
    MissingTestator(Address),

    #[error("Heartbeat window must be at least one day")]
    InvalidWindow,

    #[error("Indices disagree for testator {0}")]
    IndexMismatch(Address),
}

/// A staged mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    /// Add a new record
    Insert(Testament),
    /// Overwrite the record of `testament.testator`
    Replace(Testament),
    /// Remove the record of this testator
    Remove(Address),
}

/// Cross-indexed testament records
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestamentStore {
    by_testator: BTreeMap<Address, Testament>,
    by_inheritor: BTreeMap<Address, Testament>,
}

impl TestamentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_by_testator(&self, testator: &Address) -> Option<&Testament> {
        self.by_testator.get(testator)
    }

    pub fn get_by_inheritor(&self, inheritor: &Address) -> Option<&Testament> {
        self.by_inheritor.get(inheritor)
    }

    pub fn len(&self) -> usize {
        self.by_testator.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_testator.is_empty()
    }

    /// All records, ordered by testator
    pub fn iter(&self) -> impl Iterator<Item = &Testament> {
        self.by_testator.values()
    }

    /// Check a staged write against the current records without applying it.
    pub fn validate(&self, write: &Write) -> Result<(), StoreError> {
        match write {
            Write::Insert(next) => {
                if self.by_testator.contains_key(&next.testator) {
                    return Err(StoreError::DuplicateTestator(next.testator));
                }
                if next.max_days == 0 {
                    return Err(StoreError::InvalidWindow);
                }
                if self.by_inheritor.contains_key(&next.inheritor) {
                    return Err(StoreError::DuplicateInheritor(next.inheritor));
                }
                Ok(())
            }
            Write::Replace(next) => {
                if !self.by_testator.contains_key(&next.testator) {
                    return Err(StoreError::MissingTestator(next.testator));
                }
                if next.max_days == 0 {
                    return Err(StoreError::InvalidWindow);
                }
                match self.by_inheritor.get(&next.inheritor) {
                    Some(holder) if holder.testator != next.testator => {
                        Err(StoreError::DuplicateInheritor(next.inheritor))
                    }
                    _ => Ok(()),
                }
            }
            Write::Remove(testator) => {
                if self.by_testator.contains_key(testator) {
                    Ok(())
                } else {
                    Err(StoreError::MissingTestator(*testator))
                }
            }
        }
    }

    /// Validate and apply a write to both indices.
    ///
    /// Returns the record that was replaced or removed, if any. On error
    /// nothing changes.
    pub fn commit(&mut self, write: Write) -> Result<Option<Testament>, StoreError> {
        self.validate(&write)?;

        let prior = match write {
            Write::Insert(next) => {
                self.by_inheritor.insert(next.inheritor, next.clone());
                self.by_testator.insert(next.testator, next);
                None
            }
            Write::Replace(next) => {
                let prior = self.by_testator.insert(next.testator, next.clone());
                if let Some(ref old) = prior {
                    self.by_inheritor.remove(&old.inheritor);
                }
                self.by_inheritor.insert(next.inheritor, next);
                prior
            }
            Write::Remove(testator) => {
                let prior = self.by_testator.remove(&testator);
                if let Some(ref old) = prior {
                    self.by_inheritor.remove(&old.inheritor);
                }
                prior
            }
        };

        Ok(prior)
    }

    /// Verify that both indices describe the same record set.
    ///
    /// Used after loading a persisted store.
    pub fn check_consistency(&self) -> Result<(), StoreError> {
        for (testator, record) in &self.by_testator {
            if &record.testator != testator {
                return Err(StoreError::IndexMismatch(*testator));
            }
            if record.max_days == 0 {
                return Err(StoreError::InvalidWindow);
            }
            match self.by_inheritor.get(&record.inheritor) {
                Some(mirror) if mirror == record => {}
                _ => return Err(StoreError::IndexMismatch(*testator)),
            }
        }
        if self.by_inheritor.len() != self.by_testator.len() {
            let stray = self
                .by_inheritor
                .values()
                .find(|r| self.by_testator.get(&r.testator) != Some(r))
                .map(|r| r.testator)
                .unwrap_or(Address::ZERO);
            return Err(StoreError::IndexMismatch(stray));
        }
        Ok(())
    }
}
