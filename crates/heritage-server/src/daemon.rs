//! The daemon loop: periodically evaluates testator liveness and logs what needs attention.

use crate::config::ServerConfig;
use anyhow::{Context, Result};
use heritage_core::{
    evaluate_batch, Clock, LedgerState, LivenessAction, LivenessStatus, StateLock, SystemClock,
    Timestamp,
};
use std::time::Duration;

/// Counts of testaments per liveness action after one cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub healthy: usize,
    pub recommended: usize,
    pub required: usize,
    pub claimable: usize,
    pub settled: usize,
}

impl CycleSummary {
    fn record(&mut self, action: LivenessAction) {
        match action {
            LivenessAction::Healthy => self.healthy += 1,
            LivenessAction::CheckinRecommended => self.recommended += 1,
            LivenessAction::CheckinRequired => self.required += 1,
            LivenessAction::Claimable => self.claimable += 1,
            LivenessAction::Settled => self.settled += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.healthy + self.recommended + self.required + self.claimable + self.settled
    }
}

/// Run the daemon loop. Blocks forever (until shutdown signal).
pub async fn run(config: ServerConfig) -> Result<()> {
    log::info!("Heritage server starting…");
    log::info!("  Registry:   {}", config.registry.address);
    log::info!(
        "  Interval:   {} seconds ({:.1} hours)",
        config.server.check_interval_secs,
        config.server.check_interval_secs as f64 / 3600.0
    );
    log::info!("  Data dir:   {}", config.server.data_dir.display());

    // Ensure data directory exists
    std::fs::create_dir_all(&config.server.data_dir).with_context(|| {
        format!(
            "Failed to create data dir: {}",
            config.server.data_dir.display()
        )
    })?;

    let interval = Duration::from_secs(config.server.check_interval_secs);

    // Run first check immediately, then loop
    let mut first = true;
    loop {
        if !first {
            log::info!(
                "Sleeping {} seconds until next check…",
                config.server.check_interval_secs
            );
            tokio::time::sleep(interval).await;
        }
        first = false;

        match run_check_cycle(&config, &SystemClock) {
            Ok(summary) => log::info!(
                "Check cycle completed: {} testaments, {} claimable.",
                summary.total(),
                summary.claimable
            ),
            Err(e) => log::error!("Check cycle failed: {:#}", e),
        }
    }
}

/// Execute a single check cycle: load state, evaluate every testament, record the check.
///
/// The state lock is held until the save, so a command running meanwhile
/// lands either before the load or after the save.
pub fn run_check_cycle(config: &ServerConfig, clock: &dyn Clock) -> Result<CycleSummary> {
    log::info!("Starting check cycle…");

    let path = config.state_path();
    let _lock = StateLock::acquire(&path)
        .with_context(|| format!("Failed to lock ledger state {}", path.display()))?;
    let mut state = LedgerState::load(&path)
        .with_context(|| format!("Failed to load ledger state from {}", path.display()))?;

    let now = clock.now();
    let summary = evaluate_state(&state, now, config);

    state.mark_checked(now);
    state
        .save(&path)
        .with_context(|| format!("Failed to save ledger state to {}", path.display()))?;

    Ok(summary)
}

/// Evaluate and log every testament in `state`.
pub fn evaluate_state(state: &LedgerState, now: Timestamp, config: &ServerConfig) -> CycleSummary {
    let statuses = evaluate_batch(state.testaments.iter(), now, &config.liveness);
    if statuses.is_empty() {
        log::info!("No testaments registered, nothing to check.");
    }

    let mut summary = CycleSummary::default();
    for status in &statuses {
        report(status);
        summary.record(status.action);
    }
    summary
}

fn report(status: &LivenessStatus) {
    let t = &status.testament;
    let deadline = chrono::DateTime::from_timestamp(t.expires_at() as i64, 0)
        .map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| t.expires_at().to_string());

    match status.action {
        LivenessAction::Healthy => log::debug!(
            "[{}] healthy: {:.0}% of {} days elapsed",
            t.testator,
            status.elapsed_fraction * 100.0,
            t.max_days
        ),
        LivenessAction::CheckinRecommended => log::info!(
            "[{}] heartbeat recommended: ~{:.1} days left (deadline {})",
            t.testator,
            status.days_remaining(),
            deadline
        ),
        LivenessAction::CheckinRequired => log::warn!(
            "[{}] ⚠️  heartbeat required: ~{:.1} days left (deadline {})",
            t.testator,
            status.days_remaining(),
            deadline
        ),
        LivenessAction::Claimable => log::warn!(
            "[{}] 🔴 window elapsed {}, {} may claim",
            t.testator,
            deadline,
            t.inheritor
        ),
        LivenessAction::Settled => {
            log::debug!("[{}] inherited by {}", t.testator, t.inheritor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{execute, Command};
    use heritage_core::{
        Address, AssetTransferAgent, ManualClock, Testament, TestamentStatus, Write,
        SECONDS_PER_DAY,
    };
    use tempfile::tempdir;

    const START: Timestamp = 1_700_000_000;

    fn testament(n: u8, max_days: u32, status: TestamentStatus) -> Testament {
        Testament {
            testator: Address::from_bytes([n; 20]),
            inheritor: Address::from_bytes([n + 100; 20]),
            status,
            proof_of_timestamp: START,
            token: Address::from_bytes([0xAA; 20]),
            max_days,
        }
    }

    fn config_in(dir: &std::path::Path) -> ServerConfig {
        let mut config: ServerConfig = toml::from_str("").unwrap();
        config.server.data_dir = dir.to_path_buf();
        config
    }

    #[test]
    fn test_evaluate_state_counts_actions() {
        let mut state = LedgerState::new();
        for t in [
            testament(1, 100, TestamentStatus::Active),
            testament(2, 10, TestamentStatus::Active),
            testament(3, 5, TestamentStatus::Inactive),
            testament(4, 5, TestamentStatus::Inherited),
        ] {
            state.testaments.commit(Write::Insert(t)).unwrap();
        }

        let dir = tempdir().unwrap();
        let summary = evaluate_state(&state, START + 6 * SECONDS_PER_DAY, &config_in(dir.path()));
        assert_eq!(
            summary,
            CycleSummary {
                healthy: 1,
                recommended: 1,
                required: 0,
                claimable: 1,
                settled: 1,
            }
        );
        assert_eq!(summary.total(), 4);
    }

    #[test]
    fn test_check_cycle_records_last_check() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        let clock = ManualClock::new(START);

        let summary = run_check_cycle(&config, &clock).unwrap();
        assert_eq!(summary.total(), 0);

        let state = LedgerState::load(&config.state_path()).unwrap();
        assert_eq!(state.last_check, Some(START));
    }

    #[test]
    fn test_command_during_check_cycle_is_kept() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        let path = config.state_path();
        let clock = ManualClock::new(START + 2 * SECONDS_PER_DAY);
        let token = Address::from_bytes([0xAA; 20]);
        let registry = config.registry_address().unwrap();
        let t = testament(1, 1, TestamentStatus::Active);

        let mut seeded = LedgerState::new();
        seeded.tokens.deploy(token, "PAZ");
        seeded.tokens.mint(&token, &t.testator, 500).unwrap();
        seeded
            .tokens
            .approve(&token, &t.testator, &registry, 500)
            .unwrap();
        seeded.testaments.commit(Write::Insert(t.clone())).unwrap();
        seeded.save(&path).unwrap();

        // A claim is in progress when the cycle starts
        let lock = StateLock::acquire(&path).unwrap();
        let mut state = LedgerState::load(&path).unwrap();
        let cycle = {
            let config = config.clone();
            let clock = clock.clone();
            std::thread::spawn(move || run_check_cycle(&config, &clock))
        };
        execute(&config, &mut state, Some(t.inheritor), &Command::Inherit, &clock).unwrap();
        state.save(&path).unwrap();
        drop(lock);

        let summary = cycle.join().unwrap().unwrap();
        assert_eq!(summary.settled, 1);

        let state = LedgerState::load(&path).unwrap();
        assert_eq!(
            state.testaments.get_by_testator(&t.testator).unwrap().status,
            TestamentStatus::Inherited
        );
        assert_eq!(state.tokens.balance_of(&token, &t.inheritor), 500);
        assert_eq!(state.last_check, Some(START + 2 * SECONDS_PER_DAY));
    }
}
