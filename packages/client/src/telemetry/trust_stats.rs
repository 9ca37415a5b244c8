//! Trust-check statistics
//!
//! Provides `TrustStats` for tracking how many presented chains were checked,
//! how many reached a trusted root, and how many attempts were aborted, with
//! atomic counters shared between adapter clones.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for supplementary trust checks
#[derive(Debug, Default)]
pub struct TrustStats {
    /// Number of `is_trusted` calls
    pub checks: AtomicU64,
    /// Chains whose leaf reached a self-signed root in the trust store
    pub chains_validated: AtomicU64,
    /// Chains whose leaf did not reach a root
    pub chains_rejected: AtomicU64,
    /// Calls made with an empty presented chain
    pub empty_chains: AtomicU64,
    /// Attempts aborted by a fatal error
    pub fatal_errors: AtomicU64,
}

/// Point-in-time copy of [`TrustStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrustStatsSnapshot {
    pub checks: u64,
    pub chains_validated: u64,
    pub chains_rejected: u64,
    pub empty_chains: u64,
    pub fatal_errors: u64,
}

impl TrustStats {
    pub(crate) fn record_check(&self) {
        self.checks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_validated(&self) {
        self.chains_validated.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected(&self) {
        self.chains_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_empty_chain(&self) {
        self.empty_chains.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fatal_error(&self) {
        self.fatal_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Share of checked chains that reached a trusted root, as a percentage
    pub fn validation_rate(&self) -> f64 {
        // Precision loss acceptable for rate statistics
        #[allow(clippy::cast_precision_loss)]
        let validated = self.chains_validated.load(Ordering::Relaxed) as f64;
        #[allow(clippy::cast_precision_loss)]
        let total = validated + self.chains_rejected.load(Ordering::Relaxed) as f64;

        if total > 0.0 {
            (validated / total) * 100.0
        } else {
            0.0
        }
    }

    /// Get statistics snapshot
    pub fn snapshot(&self) -> TrustStatsSnapshot {
        TrustStatsSnapshot {
            checks: self.checks.load(Ordering::Relaxed),
            chains_validated: self.chains_validated.load(Ordering::Relaxed),
            chains_rejected: self.chains_rejected.load(Ordering::Relaxed),
            empty_chains: self.empty_chains.load(Ordering::Relaxed),
            fatal_errors: self.fatal_errors.load(Ordering::Relaxed),
        }
    }
}
