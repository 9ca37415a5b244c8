//! Trustwalk Public API
//!
//! Supplementary X.509 trust-chain checks for TLS peers. A presented leaf is
//! walked up through a trust store to a self-signed root; the outcome is logged
//! and counted while the final decision stays with rustls' WebPKI verifier.

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

use std::path::Path;
use std::sync::Arc;

// Re-export important types from client package
pub use trustwalk_client::{
    Certificate, ChainValidator, DistinguishedName, HopFailure, PemBundle, PemDirectory,
    SupplementaryTrustVerifier, TlsSettings, TrustAdapter, TrustAnchors, TrustConfig,
    TrustError, TrustManager, TrustStats, TrustStatsSnapshot, TrustStoreConfig,
    TrustStoreFormat, TrustStoreSource, UNKNOWN_AUTH_TYPE,
};
pub use trustwalk_client::{config, telemetry, tls};

/// Main entry point providing static validation helpers
pub struct TrustWalk;

impl TrustWalk {
    /// Check that `subject` chains to a self-signed root in `candidates`
    ///
    /// Shorthand for `ChainValidator::new().validate(..)`
    ///
    /// # Errors
    ///
    /// Returns fatal provider errors such as an unsupported signature algorithm.
    pub fn validate(subject: &Certificate, candidates: &[Certificate]) -> Result<bool, TrustError> {
        ChainValidator::new().validate(subject, candidates)
    }

    /// Whether `cert` verifies under its own public key
    ///
    /// # Errors
    ///
    /// Returns fatal provider errors such as an unsupported signature algorithm.
    pub fn is_self_signed(cert: &Certificate) -> Result<bool, TrustError> {
        trustwalk_client::is_self_signed(cert)
    }

    /// Adapter over a set of anchors
    #[must_use]
    pub fn adapter(anchors: TrustAnchors) -> TrustAdapter {
        TrustAdapter::new(Arc::new(anchors))
    }

    /// Read a JSON configuration file and build a [`TrustManager`] from it
    ///
    /// # Errors
    ///
    /// Returns configuration, IO or trust-store errors.
    pub fn from_config(path: impl AsRef<Path>) -> Result<TrustManager, TrustError> {
        let config = TrustConfig::from_file(path.as_ref())?;
        tracing::debug!(
            "loading trust store {} from {}",
            config.trust_store.path.display(),
            path.as_ref().display()
        );
        TrustManager::from_config(&config)
    }

    /// Load the configured trust store and install it as the global anchors
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::AlreadyInitialized`] on a second call, or the error
    /// that prevented loading.
    pub fn install(config: &TrustConfig) -> Result<Arc<TrustAnchors>, TrustError> {
        config.validate()?;
        TrustAnchors::from_config(&config.trust_store)?.install_global()
    }
}

/// Check that `subject` chains to a self-signed root in `candidates`
///
/// Shorthand for [`TrustWalk::validate`]
///
/// # Errors
///
/// Returns fatal provider errors such as an unsupported signature algorithm.
pub fn validate(subject: &Certificate, candidates: &[Certificate]) -> Result<bool, TrustError> {
    TrustWalk::validate(subject, candidates)
}
