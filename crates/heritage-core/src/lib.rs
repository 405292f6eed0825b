//! Heritage Core
//!
//! Proof-of-life token inheritance.
//!
//! # Concepts
//!
//! - **Testament**: a testator names one inheritor, one token and a
//!   heartbeat window in days
//! - **Heartbeat**: the testator proves liveness; a late heartbeat marks the
//!   testament INACTIVE and leaves the last proof in place
//! - **Claim**: once the window has elapsed the inheritor receives the
//!   testator's whole balance through an allowance granted to the registry
//!
//! # Example
//!
//! ```
//! use heritage_core::{Address, CallContext, ManualClock, TestamentRegistry, TokenLedger};
//!
//! let registry_addr = Address::from_bytes([0xCD; 20]);
//! let alice = Address::from_bytes([0x01; 20]);
//! let bob = Address::from_bytes([0x02; 20]);
//! let paz = Address::from_bytes([0xAB; 20]);
//!
//! let mut tokens = TokenLedger::new();
//! tokens.deploy(paz, "PAZ");
//! tokens.mint(&paz, &alice, 100).unwrap();
//! tokens.approve(&paz, &alice, &registry_addr, 100).unwrap();
//!
//! let clock = ManualClock::new(1_700_000_000);
//! let mut registry = TestamentRegistry::new(registry_addr);
//! registry
//!     .add_testament(&CallContext::at(alice, &clock), &tokens, bob, paz, 10)
//!     .unwrap();
//!
//! clock.advance_days(10);
//! registry
//!     .inherit(&CallContext::at(bob, &clock), &mut tokens)
//!     .unwrap();
//! ```

pub mod address;
pub mod clock;
pub mod events;
pub mod liveness;
pub mod registry;
pub mod state;
pub mod store;
pub mod testament;
pub mod token;

#[cfg(test)]
pub(crate) mod test_utils;

pub use address::{Address, AddressError};
pub use clock::{CallContext, Clock, ManualClock, SystemClock, Timestamp, SECONDS_PER_DAY};
pub use events::{EventKind, EventLog, EventSink, LogSink, TestamentEvent};
pub use liveness::{
    evaluate_batch, evaluate_liveness, LivenessAction, LivenessConfig, LivenessError,
    LivenessStatus,
};
pub use registry::{ErrorKind, Index, RegistryError, TestamentRegistry};
pub use state::{LedgerState, StateError, StateLock};
pub use store::{StoreError, TestamentStore, Write};
pub use testament::{Testament, TestamentStatus};
pub use token::{Amount, AssetTransferAgent, TokenLedger, TransferError};
