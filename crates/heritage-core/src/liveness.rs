//! Proof-of-life evaluation for registered testaments.
//!
//! Pure logic: takes a record and a clock reading, returns a recommendation.
//! The caller (the server's monitor cycle) decides what to do with it.
//!
//! ```text
//! |--- Healthy ---|--- CheckinRecommended ---|--- CheckinRequired ---|--- Claimable
//! 0%             50%                        90%                    100%
//! ```
//!
//! Thresholds are configurable. Claimability follows the same whole-day
//! rule as `inherit`, so a record is never reported claimable before the
//! registry would accept the claim.

use crate::clock::{Timestamp, SECONDS_PER_DAY};
use crate::testament::{Testament, TestamentStatus};
use serde::{Deserialize, Serialize};

/// When to recommend a heartbeat
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LivenessConfig {
    /// Fraction of the window elapsed before recommending a heartbeat (0.0–1.0).
    /// Default: 0.5.
    #[serde(default = "default_checkin_threshold")]
    pub checkin_threshold: f64,

    /// Fraction of the window elapsed before a heartbeat is critical (0.0–1.0).
    /// Default: 0.9.
    #[serde(default = "default_critical_threshold")]
    pub critical_threshold: f64,
}

fn default_checkin_threshold() -> f64 {
    0.5
}

fn default_critical_threshold() -> f64 {
    0.9
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            checkin_threshold: default_checkin_threshold(),
            critical_threshold: default_critical_threshold(),
        }
    }
}

impl LivenessConfig {
    /// Validate that thresholds are sensible.
    pub fn validate(&self) -> Result<(), LivenessError> {
        if self.checkin_threshold <= 0.0 || self.checkin_threshold >= 1.0 {
            return Err(LivenessError::InvalidThreshold(
                "checkin_threshold must be between 0.0 and 1.0 exclusive".into(),
            ));
        }
        if self.critical_threshold <= self.checkin_threshold || self.critical_threshold >= 1.0 {
            return Err(LivenessError::InvalidThreshold(
                "critical_threshold must be between checkin_threshold and 1.0 exclusive".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LivenessError {
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),
}

/// What the evaluation recommends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LivenessAction {
    /// Window is far from running out
    Healthy,
    /// Past the check-in threshold. Should send a heartbeat soon.
    CheckinRecommended,
    /// Past the critical threshold. Must send a heartbeat now.
    CheckinRequired,
    /// Window elapsed. The inheritor can claim.
    Claimable,
    /// Already inherited. Nothing left to do.
    Settled,
}

impl LivenessAction {
    fn priority(self) -> u8 {
        match self {
            LivenessAction::Claimable => 0,
            LivenessAction::CheckinRequired => 1,
            LivenessAction::CheckinRecommended => 2,
            LivenessAction::Healthy => 3,
            LivenessAction::Settled => 4,
        }
    }
}

/// Evaluation result for one testament
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessStatus {
    pub testament: Testament,
    /// Fraction of the window elapsed (0.0–1.0+)
    pub elapsed_fraction: f64,
    /// Seconds until the window runs out (negative once past)
    pub seconds_remaining: i64,
    pub action: LivenessAction,
}

impl LivenessStatus {
    pub fn days_remaining(&self) -> f64 {
        self.seconds_remaining as f64 / SECONDS_PER_DAY as f64
    }
}

/// Evaluate how close a testament is to becoming claimable.
pub fn evaluate_liveness(
    testament: &Testament,
    now: Timestamp,
    config: &LivenessConfig,
) -> LivenessStatus {
    let window_secs = u64::from(testament.max_days) * SECONDS_PER_DAY;
    let elapsed_secs = now.saturating_sub(testament.proof_of_timestamp);
    let elapsed_fraction = if window_secs == 0 {
        1.0 // Degenerate: a zero window is always elapsed
    } else {
        elapsed_secs as f64 / window_secs as f64
    };

    let action = if testament.status == TestamentStatus::Inherited {
        LivenessAction::Settled
    } else if testament.window_elapsed(now) {
        LivenessAction::Claimable
    } else if elapsed_fraction >= config.critical_threshold {
        LivenessAction::CheckinRequired
    } else if elapsed_fraction >= config.checkin_threshold {
        LivenessAction::CheckinRecommended
    } else {
        LivenessAction::Healthy
    };

    LivenessStatus {
        testament: testament.clone(),
        elapsed_fraction,
        seconds_remaining: testament.seconds_until_expiry(now),
        action,
    }
}

/// Evaluate many testaments, most urgent first.
pub fn evaluate_batch<'a>(
    testaments: impl IntoIterator<Item = &'a Testament>,
    now: Timestamp,
    config: &LivenessConfig,
) -> Vec<LivenessStatus> {
    let mut statuses: Vec<LivenessStatus> = testaments
        .into_iter()
        .map(|t| evaluate_liveness(t, now, config))
        .collect();

    statuses.sort_by(|a, b| {
        a.action.priority().cmp(&b.action.priority()).then(
            a.elapsed_fraction
                .partial_cmp(&b.elapsed_fraction)
                .unwrap_or(std::cmp::Ordering::Equal)
                .reverse(),
        )
    });

    statuses
}
