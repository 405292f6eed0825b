//! Shared test fixtures for heritage-core tests.
//!
//! Deterministic identities and a funded token ledger used across the
//! unit test modules.

use crate::address::Address;
use crate::clock::Timestamp;
use crate::token::{Amount, TokenLedger};

/// Creation time used by most fixtures
pub const START: Timestamp = 1_700_000_000;

/// Testator identity `0x01..0n`
pub fn testator(n: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = 0x01;
    bytes[19] = n;
    Address::from_bytes(bytes)
}

/// Inheritor identity `0x02..0n`
pub fn inheritor(n: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = 0x02;
    bytes[19] = n;
    Address::from_bytes(bytes)
}

/// The single token most fixtures use
pub fn token() -> Address {
    Address::from_bytes([0xAB; 20])
}

/// The registry's own account
pub fn registry_address() -> Address {
    Address::from_bytes([0xCD; 20])
}

/// Ledger with `token()` deployed, each listed testator holding `balance`
/// and having approved `allowance` to the registry.
pub fn funded_ledger(testators: &[u8], balance: Amount, allowance: Amount) -> TokenLedger {
    let mut ledger = TokenLedger::new();
    ledger.deploy(token(), "PAZ");
    for &n in testators {
        ledger.mint(&token(), &testator(n), balance).unwrap();
        ledger
            .approve(&token(), &testator(n), &registry_address(), allowance)
            .unwrap();
    }
    ledger
}
