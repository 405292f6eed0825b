//! Lifecycle events emitted by the registry

use crate::address::Address;
use crate::clock::Timestamp;
use crate::testament::{Testament, TestamentStatus};
use crate::token::Amount;
use serde::{Deserialize, Serialize};

/// One event per successful registry operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestamentEvent {
    /// A testament was registered
    Created { testament: Testament },

    /// Fields or proof of life changed (explicit update or heartbeat)
    Updated { testament: Testament },

    /// The inheritor claimed the testator's balance
    Inherited {
        testator: Address,
        inheritor: Address,
        status: TestamentStatus,
        /// Last proof of life before the claim
        proof_of_timestamp: Timestamp,
        token: Address,
        max_days: u32,
        amount: Amount,
    },

    /// A testament was removed. Carries the record as it was.
    Revoked { testament: Testament },
}

/// Kind of lifecycle event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Created,
    Updated,
    Inherited,
    Revoked,
}

impl TestamentEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            TestamentEvent::Created { .. } => EventKind::Created,
            TestamentEvent::Updated { .. } => EventKind::Updated,
            TestamentEvent::Inherited { .. } => EventKind::Inherited,
            TestamentEvent::Revoked { .. } => EventKind::Revoked,
        }
    }

    pub fn testator(&self) -> &Address {
        match self {
            TestamentEvent::Created { testament }
            | TestamentEvent::Updated { testament }
            | TestamentEvent::Revoked { testament } => &testament.testator,
            TestamentEvent::Inherited { testator, .. } => testator,
        }
    }
}

/// Receives lifecycle events
pub trait EventSink {
    fn emit(&mut self, event: &TestamentEvent);
}

/// Append-only in-memory event log
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<TestamentEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TestamentEvent] {
        &self.events
    }

    pub fn last(&self) -> Option<&TestamentEvent> {
        self.events.last()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: &TestamentEvent) {
        self.events.push(event.clone());
    }
}

/// Writes every event to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: &TestamentEvent) {
        match event {
            TestamentEvent::Created { testament } => log::info!(
                "Testament created: {} -> {} ({} days, token {})",
                testament.testator,
                testament.inheritor,
                testament.max_days,
                testament.token
            ),
            TestamentEvent::Updated { testament } => log::info!(
                "Testament updated: {} -> {} [{}] proof at {}",
                testament.testator,
                testament.inheritor,
                testament.status,
                testament.proof_of_timestamp
            ),
            TestamentEvent::Inherited {
                testator,
                inheritor,
                amount,
                token,
                ..
            } => log::warn!(
                "Testament inherited: {} of {} moved from {} to {}",
                amount,
                token,
                testator,
                inheritor
            ),
            TestamentEvent::Revoked { testament } => {
                log::info!("Testament revoked: {}", testament.testator)
            }
        }
    }
}
