//! Telemetry for trust checks
//!
//! Counters are updated by the trust adapter and can be read at any time
//! through [`TrustStats::snapshot`].

pub mod trust_stats;

pub use trust_stats::{TrustStats, TrustStatsSnapshot};
