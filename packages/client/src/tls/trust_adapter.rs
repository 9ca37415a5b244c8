//! Supplementary trust adapter
//!
//! Sits in front of a host TLS stack's own verification. It validates the
//! leaf of the presented chain against the trust anchors and records the
//! outcome, but never vouches for the chain: `is_trusted` always answers
//! `false`, leaving the decision to the default verifier.

use std::sync::Arc;

use crate::telemetry::TrustStats;
use crate::tls::certificate::Certificate;
use crate::tls::chain::ChainValidator;
use crate::tls::errors::TrustError;
use crate::tls::trust_store::TrustAnchors;

/// Authentication type passed when the host stack does not expose one
pub const UNKNOWN_AUTH_TYPE: &str = "UNKNOWN";

/// Non-authoritative trust strategy over a fixed set of anchors
#[derive(Debug, Clone)]
pub struct TrustAdapter {
    anchors: Arc<TrustAnchors>,
    validator: ChainValidator,
    stats: Arc<TrustStats>,
}

impl TrustAdapter {
    #[must_use]
    pub fn new(anchors: Arc<TrustAnchors>) -> Self {
        Self {
            anchors,
            validator: ChainValidator::new(),
            stats: Arc::new(TrustStats::default()),
        }
    }

    /// Adapter over the anchors installed with [`TrustAnchors::install_global`]
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Configuration`] when no global anchors exist yet.
    pub fn from_global() -> Result<Self, TrustError> {
        TrustAnchors::global().map(Self::new).ok_or_else(|| {
            TrustError::Configuration("global trust anchors are not installed".to_string())
        })
    }

    /// Replace the chain validator, e.g. to pin the validation time
    #[must_use]
    pub fn with_validator(mut self, validator: ChainValidator) -> Self {
        self.validator = validator;
        self
    }

    #[must_use]
    pub fn anchors(&self) -> &Arc<TrustAnchors> {
        &self.anchors
    }

    #[must_use]
    pub fn stats(&self) -> &Arc<TrustStats> {
        &self.stats
    }

    /// Validate the leaf of `presented_chain` and report "not trusted"
    ///
    /// Only the first certificate of the chain is validated; the remaining
    /// presented certificates are not used as candidates. The outcome is
    /// logged and counted, and `Ok(false)` is returned either way.
    ///
    /// # Errors
    ///
    /// Fatal errors from validation (unsupported algorithm, provider
    /// failure) are returned unchanged and abort the trust decision.
    pub fn is_trusted(
        &self,
        presented_chain: &[Certificate],
        auth_type: &str,
    ) -> Result<bool, TrustError> {
        self.stats.record_check();

        let Some(leaf) = presented_chain.first() else {
            tracing::warn!("empty certificate chain presented (auth type {auth_type})");
            self.stats.record_empty_chain();
            return Ok(false);
        };

        match self.validator.validate(leaf, self.anchors.certificates()) {
            Ok(true) => {
                tracing::info!(
                    "peer certificate [{}] chains to a trusted root (auth type {auth_type})",
                    leaf.subject()
                );
                self.stats.record_validated();
            }
            Ok(false) => {
                tracing::info!(
                    "peer certificate [{}] does not chain to a trusted root (auth type {auth_type})",
                    leaf.subject()
                );
                self.stats.record_rejected();
            }
            Err(e) => {
                tracing::error!(
                    "trust validation of [{}] aborted: {e}",
                    leaf.subject()
                );
                self.stats.record_fatal_error();
                return Err(e);
            }
        }

        Ok(false)
    }
}
