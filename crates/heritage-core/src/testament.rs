//! Testament records and the heartbeat window
//!
//! # Window
//!
//! Elapsed time is measured in whole days since the last proof of life:
//!
//! ```text
//! proof_of_timestamp                proof_of_timestamp + max_days
//! |------------- window open -------------|---- claimable ---->
//! ```
//!
//! A testament becomes claimable once `elapsed_days >= max_days`, no matter
//! what its cached status says.

use crate::address::Address;
use crate::clock::{Timestamp, SECONDS_PER_DAY};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cached lifecycle status of a testament.
///
/// A record that does not exist (never created, or revoked) has no status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestamentStatus {
    /// Proof of life is current
    Active,
    /// A heartbeat arrived after the window had elapsed
    Inactive,
    /// The inheritor claimed the balance. Terminal.
    Inherited,
}

impl TestamentStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TestamentStatus::Inherited)
    }
}

impl fmt::Display for TestamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TestamentStatus::Active => "ACTIVE",
            TestamentStatus::Inactive => "INACTIVE",
            TestamentStatus::Inherited => "INHERITED",
        };
        f.write_str(s)
    }
}

/// A testator's standing instruction to hand a token balance to an inheritor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testament {
    pub testator: Address,
    pub inheritor: Address,
    pub status: TestamentStatus,
    /// Last confirmed proof of life (unix seconds)
    pub proof_of_timestamp: Timestamp,
    /// Token contract whose balance is inherited
    pub token: Address,
    /// Heartbeat window in whole days, always > 0
    pub max_days: u32,
}

impl Testament {
    /// Whole days since the last proof of life.
    ///
    /// A clock reading earlier than the proof counts as zero days.
    pub fn elapsed_days(&self, now: Timestamp) -> u64 {
        now.saturating_sub(self.proof_of_timestamp) / SECONDS_PER_DAY
    }

    /// Whether the heartbeat window has run out at `now`.
    pub fn window_elapsed(&self, now: Timestamp) -> bool {
        self.elapsed_days(now) >= u64::from(self.max_days)
    }

    /// Moment the window runs out.
    pub fn expires_at(&self) -> Timestamp {
        self.proof_of_timestamp
            .saturating_add(u64::from(self.max_days) * SECONDS_PER_DAY)
    }

    /// Signed seconds until the window runs out (negative once past).
    ///
    /// Saturates at the `i64` bounds.
    pub fn seconds_until_expiry(&self, now: Timestamp) -> i64 {
        let diff = i128::from(self.expires_at()) - i128::from(now);
        i64::try_from(diff).unwrap_or(if diff < 0 { i64::MIN } else { i64::MAX })
    }
}
