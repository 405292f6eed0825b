//! The testament registry
//!
//! Every operation takes a [`CallContext`] carrying the caller's identity and
//! the clock reading for this call, and either completes or leaves the
//! registry untouched. Mutations follow one discipline:
//!
//! 1. validate every precondition against the current records
//! 2. perform the external effect, if any (the token transfer in `inherit`)
//! 3. commit the staged [`Write`] to both indices
//!
//! and emit exactly one [`TestamentEvent`] after the commit.

use crate::address::Address;
use crate::clock::CallContext;
use crate::events::{EventLog, EventSink, TestamentEvent};
use crate::store::{StoreError, TestamentStore, Write};
use crate::testament::{Testament, TestamentStatus};
use crate::token::{AssetTransferAgent, TransferError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which index a lookup went through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Index {
    Testator,
    Inheritor,
}

/// Reasons an operation was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Testator already has a testament")]
    TestatorExists,

    #[error("Heartbeat window must be greater than 0 days")]
    InvalidWindow,

    #[error("Token allowance must be greater than 0")]
    NoAllowance,

    #[error("Inheritor already has a testament")]
    InheritorTaken,

    #[error("No testament found by {index:?}")]
    NotFound { index: Index },

    #[error("Caller is not a valid testator")]
    NotTestator,

    #[error("Caller is not a valid inheritor")]
    NotInheritor,

    #[error("Testament has already been inherited")]
    AlreadyInherited,

    #[error("Heartbeat window has not elapsed yet")]
    WindowNotElapsed,

    #[error("Token transfer failed: {0}")]
    TransferFailed(#[source] TransferError),

    #[error("Store invariant violated: {0}")]
    Store(#[from] StoreError),
}

/// Stable discriminant of [`RegistryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    TestatorExists,
    InvalidWindow,
    NoAllowance,
    InheritorTaken,
    NotFound,
    NotTestator,
    NotInheritor,
    AlreadyInherited,
    WindowNotElapsed,
    TransferFailed,
    Store,
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::TestatorExists => ErrorKind::TestatorExists,
            RegistryError::InvalidWindow => ErrorKind::InvalidWindow,
            RegistryError::NoAllowance => ErrorKind::NoAllowance,
            RegistryError::InheritorTaken => ErrorKind::InheritorTaken,
            RegistryError::NotFound { .. } => ErrorKind::NotFound,
            RegistryError::NotTestator => ErrorKind::NotTestator,
            RegistryError::NotInheritor => ErrorKind::NotInheritor,
            RegistryError::AlreadyInherited => ErrorKind::AlreadyInherited,
            RegistryError::WindowNotElapsed => ErrorKind::WindowNotElapsed,
            RegistryError::TransferFailed(_) => ErrorKind::TransferFailed,
            RegistryError::Store(_) => ErrorKind::Store,
        }
    }
}

/// Keyed testament records plus the lifecycle operations over them
#[derive(Debug)]
pub struct TestamentRegistry<S: EventSink = EventLog> {
    /// Account the registry spends allowances as
    address: Address,
    store: TestamentStore,
    sink: S,
}

impl TestamentRegistry<EventLog> {
    /// Empty registry recording events in memory
    pub fn new(address: Address) -> Self {
        Self::with_sink(address, TestamentStore::new(), EventLog::new())
    }
}

impl<S: EventSink> TestamentRegistry<S> {
    pub fn with_sink(address: Address, store: TestamentStore, sink: S) -> Self {
        Self {
            address,
            store,
            sink,
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn store(&self) -> &TestamentStore {
        &self.store
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Give up the registry, keeping its records.
    pub fn into_store(self) -> TestamentStore {
        self.store
    }

    /// Register a testament for the caller.
    ///
    /// Checked in order: the caller has no testament, the window is
    /// positive, the caller has granted this registry an allowance on
    /// `token`, and `inheritor` is not named by another testament.
    pub fn add_testament(
        &mut self,
        ctx: &CallContext,
        agent: &dyn AssetTransferAgent,
        inheritor: Address,
        token: Address,
        max_days: u32,
    ) -> Result<Testament, RegistryError> {
        let testator = ctx.caller;
        if self.store.get_by_testator(&testator).is_some() {
            return Err(self.refuse(ctx, "add_testament", RegistryError::TestatorExists));
        }
        if max_days == 0 {
            return Err(self.refuse(ctx, "add_testament", RegistryError::InvalidWindow));
        }
        if agent.allowance(&token, &testator, &self.address) == 0 {
            return Err(self.refuse(ctx, "add_testament", RegistryError::NoAllowance));
        }
        if self.store.get_by_inheritor(&inheritor).is_some() {
            return Err(self.refuse(ctx, "add_testament", RegistryError::InheritorTaken));
        }

        let testament = Testament {
            testator,
            inheritor,
            status: TestamentStatus::Active,
            proof_of_timestamp: ctx.now,
            token,
            max_days,
        };
        self.store.commit(Write::Insert(testament.clone()))?;
        self.sink.emit(&TestamentEvent::Created {
            testament: testament.clone(),
        });
        Ok(testament)
    }

    pub fn get_by_testator(&self, testator: &Address) -> Result<&Testament, RegistryError> {
        self.store
            .get_by_testator(testator)
            .ok_or(RegistryError::NotFound {
                index: Index::Testator,
            })
    }

    pub fn get_by_inheritor(&self, inheritor: &Address) -> Result<&Testament, RegistryError> {
        self.store
            .get_by_inheritor(inheritor)
            .ok_or(RegistryError::NotFound {
                index: Index::Inheritor,
            })
    }

    /// Replace the caller's inheritor, token and window.
    ///
    /// A successful update is itself a proof of life: the timestamp is
    /// refreshed and the status returns to ACTIVE.
    pub fn update_testament(
        &mut self,
        ctx: &CallContext,
        inheritor: Address,
        token: Address,
        max_days: u32,
    ) -> Result<Testament, RegistryError> {
        let current = self.own_testament(ctx, "update_testament")?;
        if max_days == 0 {
            return Err(self.refuse(ctx, "update_testament", RegistryError::InvalidWindow));
        }
        if let Some(holder) = self.store.get_by_inheritor(&inheritor) {
            if holder.testator != current.testator {
                return Err(self.refuse(ctx, "update_testament", RegistryError::InheritorTaken));
            }
        }

        let next = Testament {
            inheritor,
            token,
            max_days,
            proof_of_timestamp: ctx.now,
            status: TestamentStatus::Active,
            ..current
        };
        self.store.commit(Write::Replace(next.clone()))?;
        self.sink.emit(&TestamentEvent::Updated {
            testament: next.clone(),
        });
        Ok(next)
    }

    /// Heartbeat from the testator.
    ///
    /// Inside the window the proof of life moves to `ctx.now`. Once the
    /// window has elapsed the testament turns INACTIVE and the timestamp
    /// stays frozen at the last confirmed proof.
    pub fn update_proof(&mut self, ctx: &CallContext) -> Result<Testament, RegistryError> {
        let current = self.own_testament(ctx, "update_proof")?;

        let next = if current.window_elapsed(ctx.now) {
            log::warn!(
                "Late heartbeat from {}: {} days elapsed of {}",
                current.testator.short(),
                current.elapsed_days(ctx.now),
                current.max_days
            );
            Testament {
                status: TestamentStatus::Inactive,
                ..current
            }
        } else {
            Testament {
                status: TestamentStatus::Active,
                proof_of_timestamp: ctx.now,
                ..current
            }
        };
        self.store.commit(Write::Replace(next.clone()))?;
        self.sink.emit(&TestamentEvent::Updated {
            testament: next.clone(),
        });
        Ok(next)
    }

    /// Claim the testator's full balance on behalf of the caller.
    ///
    /// Eligibility depends only on elapsed time. The transfer happens before
    /// the status change is committed; if it fails nothing is recorded.
    pub fn inherit(
        &mut self,
        ctx: &CallContext,
        agent: &mut dyn AssetTransferAgent,
    ) -> Result<TestamentEvent, RegistryError> {
        let current = match self.store.get_by_inheritor(&ctx.caller) {
            Some(t) => t.clone(),
            None => return Err(self.refuse(ctx, "inherit", RegistryError::NotInheritor)),
        };
        if current.status.is_terminal() {
            return Err(self.refuse(ctx, "inherit", RegistryError::AlreadyInherited));
        }
        if !current.window_elapsed(ctx.now) {
            return Err(self.refuse(ctx, "inherit", RegistryError::WindowNotElapsed));
        }

        let next = Testament {
            status: TestamentStatus::Inherited,
            ..current.clone()
        };
        let write = Write::Replace(next);
        self.store.validate(&write)?;

        let amount = agent.balance_of(&current.token, &current.testator);
        if let Err(e) = agent.transfer_from(
            &current.token,
            &self.address,
            &current.testator,
            &current.inheritor,
            amount,
        ) {
            return Err(self.refuse(ctx, "inherit", RegistryError::TransferFailed(e)));
        }

        self.store.commit(write)?;
        let event = TestamentEvent::Inherited {
            testator: current.testator,
            inheritor: current.inheritor,
            status: TestamentStatus::Inherited,
            proof_of_timestamp: current.proof_of_timestamp,
            token: current.token,
            max_days: current.max_days,
            amount,
        };
        self.sink.emit(&event);
        Ok(event)
    }

    /// Withdraw the caller's testament entirely.
    pub fn revoke(&mut self, ctx: &CallContext) -> Result<Testament, RegistryError> {
        let current = self.own_testament(ctx, "revoke")?;
        let removed = self
            .store
            .commit(Write::Remove(current.testator))?
            .unwrap_or(current);
        self.sink.emit(&TestamentEvent::Revoked {
            testament: removed.clone(),
        });
        Ok(removed)
    }

    /// The caller's own, still modifiable testament.
    fn own_testament(&self, ctx: &CallContext, op: &str) -> Result<Testament, RegistryError> {
        let current = match self.store.get_by_testator(&ctx.caller) {
            Some(t) => t.clone(),
            None => return Err(self.refuse(ctx, op, RegistryError::NotTestator)),
        };
        if current.status.is_terminal() {
            return Err(self.refuse(ctx, op, RegistryError::AlreadyInherited));
        }
        Ok(current)
    }

    fn refuse(&self, ctx: &CallContext, op: &str, err: RegistryError) -> RegistryError {
        log::debug!("{} refused for {}: {}", op, ctx.caller.short(), err);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SECONDS_PER_DAY;
    use crate::test_utils::{funded_ledger, inheritor, registry_address, testator, token, START};
    use crate::token::TokenLedger;

    fn ctx(caller: Address, day: u64) -> CallContext {
        CallContext::new(caller, START + day * SECONDS_PER_DAY)
    }

    fn setup() -> (TestamentRegistry, TokenLedger) {
        let ledger = funded_ledger(&[1, 2, 3], 1_000, 1_000);
        (TestamentRegistry::new(registry_address()), ledger)
    }

    #[test]
    fn test_add_testament() {
        let (mut registry, ledger) = setup();
        let t = registry
            .add_testament(&ctx(testator(1), 0), &ledger, inheritor(1), token(), 10)
            .unwrap();

        assert_eq!(t.status, TestamentStatus::Active);
        assert_eq!(t.proof_of_timestamp, START);
        assert_eq!(t.max_days, 10);
        assert_eq!(registry.get_by_testator(&testator(1)).unwrap(), &t);
        assert_eq!(registry.get_by_inheritor(&inheritor(1)).unwrap(), &t);
        assert_eq!(
            registry.sink().last(),
            Some(&TestamentEvent::Created { testament: t })
        );
    }

    #[test]
    fn test_add_precondition_order() {
        let (mut registry, mut ledger) = setup();
        registry
            .add_testament(&ctx(testator(1), 0), &ledger, inheritor(1), token(), 10)
            .unwrap();

        // Existing testator wins over a zero window
        let err = registry
            .add_testament(&ctx(testator(1), 0), &ledger, inheritor(2), token(), 0)
            .unwrap_err();
        assert_eq!(err, RegistryError::TestatorExists);

        // Zero window wins over missing allowance
        ledger
            .approve(&token(), &testator(2), &registry_address(), 0)
            .unwrap();
        let err = registry
            .add_testament(&ctx(testator(2), 0), &ledger, inheritor(1), token(), 0)
            .unwrap_err();
        assert_eq!(err, RegistryError::InvalidWindow);

        // Missing allowance wins over a taken inheritor
        let err = registry
            .add_testament(&ctx(testator(2), 0), &ledger, inheritor(1), token(), 10)
            .unwrap_err();
        assert_eq!(err, RegistryError::NoAllowance);

        ledger
            .approve(&token(), &testator(2), &registry_address(), 5)
            .unwrap();
        let err = registry
            .add_testament(&ctx(testator(2), 0), &ledger, inheritor(1), token(), 10)
            .unwrap_err();
        assert_eq!(err, RegistryError::InheritorTaken);

        assert_eq!(registry.store().len(), 1);
        assert_eq!(registry.sink().len(), 1);
    }

    #[test]
    fn test_allowance_checked_on_named_token() {
        let (mut registry, ledger) = setup();
        let other_token = Address::from_bytes([0xEE; 20]);
        let err = registry
            .add_testament(&ctx(testator(1), 0), &ledger, inheritor(1), other_token, 10)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoAllowance);
    }

    #[test]
    fn test_lookups_report_missing_index() {
        let (registry, _) = setup();
        assert_eq!(
            registry.get_by_testator(&testator(1)).unwrap_err(),
            RegistryError::NotFound {
                index: Index::Testator
            }
        );
        assert_eq!(
            registry.get_by_inheritor(&inheritor(1)).unwrap_err(),
            RegistryError::NotFound {
                index: Index::Inheritor
            }
        );
        // Indices are independent: a testator id is not an inheritor key
        assert!(registry.get_by_inheritor(&testator(1)).is_err());
    }

    #[test]
    fn test_update_testament() {
        let (mut registry, ledger) = setup();
        registry
            .add_testament(&ctx(testator(1), 0), &ledger, inheritor(1), token(), 10)
            .unwrap();

        let new_token = Address::from_bytes([0x42; 20]);
        let t = registry
            .update_testament(&ctx(testator(1), 3), inheritor(2), new_token, 30)
            .unwrap();

        assert_eq!(t.inheritor, inheritor(2));
        assert_eq!(t.token, new_token);
        assert_eq!(t.max_days, 30);
        assert_eq!(t.proof_of_timestamp, START + 3 * SECONDS_PER_DAY);
        assert_eq!(t.status, TestamentStatus::Active);
        assert!(registry.get_by_inheritor(&inheritor(1)).is_err());
        assert_eq!(registry.get_by_inheritor(&inheritor(2)).unwrap(), &t);
        assert_eq!(
            registry.sink().last(),
            Some(&TestamentEvent::Updated {
                testament: Testament {
                    testator: testator(1),
                    inheritor: inheritor(2),
                    status: TestamentStatus::Active,
                    proof_of_timestamp: START + 3 * SECONDS_PER_DAY,
                    token: new_token,
                    max_days: 30,
                }
            })
        );
    }

    #[test]
    fn test_update_testament_refusals() {
        let (mut registry, ledger) = setup();
        registry
            .add_testament(&ctx(testator(1), 0), &ledger, inheritor(1), token(), 10)
            .unwrap();
        registry
            .add_testament(&ctx(testator(2), 0), &ledger, inheritor(2), token(), 10)
            .unwrap();

        let err = registry
            .update_testament(&ctx(inheritor(1), 1), inheritor(3), token(), 10)
            .unwrap_err();
        assert_eq!(err, RegistryError::NotTestator);

        let err = registry
            .update_testament(&ctx(testator(1), 1), inheritor(3), token(), 0)
            .unwrap_err();
        assert_eq!(err, RegistryError::InvalidWindow);

        let err = registry
            .update_testament(&ctx(testator(1), 1), inheritor(2), token(), 10)
            .unwrap_err();
        assert_eq!(err, RegistryError::InheritorTaken);

        // Keeping the own inheritor is not a collision
        registry
            .update_testament(&ctx(testator(1), 1), inheritor(1), token(), 20)
            .unwrap();
    }

    #[test]
    fn test_update_testament_revives_inactive() {
        let (mut registry, ledger) = setup();
        registry
            .add_testament(&ctx(testator(1), 0), &ledger, inheritor(1), token(), 10)
            .unwrap();
        let late = registry.update_proof(&ctx(testator(1), 11)).unwrap();
        assert_eq!(late.status, TestamentStatus::Inactive);

        let t = registry
            .update_testament(&ctx(testator(1), 12), inheritor(1), token(), 10)
            .unwrap();
        assert_eq!(t.status, TestamentStatus::Active);
        assert_eq!(t.proof_of_timestamp, START + 12 * SECONDS_PER_DAY);
    }

    #[test]
    fn test_update_proof_inside_window() {
        let (mut registry, ledger) = setup();
        registry
            .add_testament(&ctx(testator(1), 0), &ledger, inheritor(1), token(), 10)
            .unwrap();

        let t = registry.update_proof(&ctx(testator(1), 9)).unwrap();
        assert_eq!(t.status, TestamentStatus::Active);
        assert_eq!(t.proof_of_timestamp, START + 9 * SECONDS_PER_DAY);
    }

    #[test]
    fn test_update_proof_after_window_freezes_timestamp() {
        let (mut registry, ledger) = setup();
        registry
            .add_testament(&ctx(testator(1), 0), &ledger, inheritor(1), token(), 10)
            .unwrap();

        let t = registry.update_proof(&ctx(testator(1), 10)).unwrap();
        assert_eq!(t.status, TestamentStatus::Inactive);
        assert_eq!(t.proof_of_timestamp, START);

        // Stays INACTIVE on further late heartbeats
        let t = registry.update_proof(&ctx(testator(1), 20)).unwrap();
        assert_eq!(t.status, TestamentStatus::Inactive);
        assert_eq!(t.proof_of_timestamp, START);
    }

    #[test]
    fn test_update_proof_requires_testator() {
        let (mut registry, ledger) = setup();
        registry
            .add_testament(&ctx(testator(1), 0), &ledger, inheritor(1), token(), 10)
            .unwrap();
        let err = registry.update_proof(&ctx(inheritor(1), 1)).unwrap_err();
        assert_eq!(err, RegistryError::NotTestator);
    }

    #[test]
    fn test_inherit_moves_full_balance() {
        let (mut registry, mut ledger) = setup();
        ledger.mint(&token(), &inheritor(1), 7).unwrap();
        registry
            .add_testament(&ctx(testator(1), 0), &ledger, inheritor(1), token(), 10)
            .unwrap();

        let event = registry
            .inherit(&ctx(inheritor(1), 11), &mut ledger)
            .unwrap();
        assert_eq!(
            event,
            TestamentEvent::Inherited {
                testator: testator(1),
                inheritor: inheritor(1),
                status: TestamentStatus::Inherited,
                proof_of_timestamp: START,
                token: token(),
                max_days: 10,
                amount: 1_000,
            }
        );
        assert_eq!(ledger.balance_of(&token(), &testator(1)), 0);
        assert_eq!(ledger.balance_of(&token(), &inheritor(1)), 1_007);
        assert_eq!(
            registry.get_by_testator(&testator(1)).unwrap().status,
            TestamentStatus::Inherited
        );
    }

    #[test]
    fn test_inherit_settles_empty_balance() {
        let mut ledger = funded_ledger(&[1], 0, 100);
        let mut registry = TestamentRegistry::new(registry_address());
        registry
            .add_testament(&ctx(testator(1), 0), &ledger, inheritor(1), token(), 1)
            .unwrap();

        let event = registry
            .inherit(&ctx(inheritor(1), 2), &mut ledger)
            .unwrap();
        assert!(matches!(
            event,
            TestamentEvent::Inherited { amount: 0, status: TestamentStatus::Inherited, .. }
        ));
        assert_eq!(
            registry.get_by_inheritor(&inheritor(1)).unwrap().status,
            TestamentStatus::Inherited
        );
        assert_eq!(ledger.balance_of(&token(), &inheritor(1)), 0);
    }

    #[test]
    fn test_inherit_refusals() {
        let (mut registry, mut ledger) = setup();
        registry
            .add_testament(&ctx(testator(1), 0), &ledger, inheritor(1), token(), 10)
            .unwrap();

        let err = registry
            .inherit(&ctx(testator(2), 11), &mut ledger)
            .unwrap_err();
        assert_eq!(err, RegistryError::NotInheritor);

        let err = registry
            .inherit(&ctx(inheritor(1), 5), &mut ledger)
            .unwrap_err();
        assert_eq!(err, RegistryError::WindowNotElapsed);
        assert_eq!(ledger.balance_of(&token(), &testator(1)), 1_000);
    }

    #[test]
    fn test_inherit_transfer_failure_changes_nothing() {
        let (mut registry, mut ledger) = setup();
        registry
            .add_testament(&ctx(testator(1), 0), &ledger, inheritor(1), token(), 10)
            .unwrap();
        // Allowance smaller than the balance
        ledger
            .approve(&token(), &testator(1), &registry_address(), 10)
            .unwrap();
        let before_store = registry.store().clone();
        let before_ledger = ledger.clone();
        let events_before = registry.sink().len();

        let err = registry
            .inherit(&ctx(inheritor(1), 11), &mut ledger)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransferFailed);
        assert!(matches!(
            err,
            RegistryError::TransferFailed(TransferError::InsufficientAllowance { .. })
        ));
        assert_eq!(registry.store(), &before_store);
        assert_eq!(ledger, before_ledger);
        assert_eq!(registry.sink().len(), events_before);
    }

    #[test]
    fn test_inherited_is_terminal() {
        let (mut registry, mut ledger) = setup();
        registry
            .add_testament(&ctx(testator(1), 0), &ledger, inheritor(1), token(), 10)
            .unwrap();
        registry
            .inherit(&ctx(inheritor(1), 10), &mut ledger)
            .unwrap();

        assert_eq!(
            registry.inherit(&ctx(inheritor(1), 12), &mut ledger),
            Err(RegistryError::AlreadyInherited)
        );
        assert_eq!(
            registry.update_proof(&ctx(testator(1), 12)),
            Err(RegistryError::AlreadyInherited)
        );
        assert_eq!(
            registry.update_testament(&ctx(testator(1), 12), inheritor(2), token(), 5),
            Err(RegistryError::AlreadyInherited)
        );
        assert_eq!(
            registry.revoke(&ctx(testator(1), 12)),
            Err(RegistryError::AlreadyInherited)
        );
        // The record is retained
        assert!(registry.get_by_inheritor(&inheritor(1)).is_ok());
    }

    #[test]
    fn test_revoke() {
        let (mut registry, ledger) = setup();
        let t = registry
            .add_testament(&ctx(testator(1), 0), &ledger, inheritor(1), token(), 10)
            .unwrap();

        assert_eq!(
            registry.revoke(&ctx(inheritor(1), 1)),
            Err(RegistryError::NotTestator)
        );

        let removed = registry.revoke(&ctx(testator(1), 1)).unwrap();
        assert_eq!(removed, t);
        assert_eq!(
            registry.sink().last(),
            Some(&TestamentEvent::Revoked { testament: t })
        );
        assert!(registry.get_by_testator(&testator(1)).is_err());
        assert!(registry.get_by_inheritor(&inheritor(1)).is_err());

        // Revoked testator may register again, and the inheritor is free
        registry
            .add_testament(&ctx(testator(1), 2), &ledger, inheritor(1), token(), 3)
            .unwrap();
    }

    #[test]
    fn test_error_kinds_are_distinct() {
        let errors = [
            RegistryError::TestatorExists,
            RegistryError::InvalidWindow,
            RegistryError::NoAllowance,
            RegistryError::InheritorTaken,
            RegistryError::NotFound {
                index: Index::Testator,
            },
            RegistryError::NotTestator,
            RegistryError::NotInheritor,
            RegistryError::AlreadyInherited,
            RegistryError::WindowNotElapsed,
            RegistryError::TransferFailed(TransferError::Overflow),
            RegistryError::Store(StoreError::InvalidWindow),
        ];
        let kinds: std::collections::HashSet<ErrorKind> = errors.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds.len(), errors.len());
    }
}
