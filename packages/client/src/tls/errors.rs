//! Trust-validation error types
//!
//! Two families live here and must never be mixed up:
//!
//! - [`TrustError`] is fatal. It aborts the current validation attempt and is
//!   never interpreted as "not trusted".
//! - [`HopFailure`] is the reason a single candidate issuer was rejected. It is a
//!   plain value consumed by the chain scan, which moves on to the next candidate.

/// Fatal configuration, provider or input errors
#[derive(Debug, thiserror::Error)]
pub enum TrustError {
    #[error("Certificate parsing failed: {0}")]
    CertificateParsing(String),
    #[error("Unsupported signature algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("Cryptographic provider failure: {0}")]
    Provider(String),
    #[error("Trust store unavailable: {0}")]
    TrustStore(String),
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    #[error("Trust anchors are already initialized")]
    AlreadyInitialized,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrustError {
    /// True for errors caused by the environment (provider, algorithm support,
    /// trust-store access, configuration) rather than by the presented input.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, TrustError::CertificateParsing(_))
    }
}

impl From<der::Error> for TrustError {
    fn from(err: der::Error) -> Self {
        TrustError::CertificateParsing(format!("DER decoding failed: {err}"))
    }
}

impl From<pem::PemError> for TrustError {
    fn from(err: pem::PemError) -> Self {
        TrustError::TrustStore(format!("PEM decoding failed: {err}"))
    }
}

impl From<serde_json::Error> for TrustError {
    fn from(err: serde_json::Error) -> Self {
        TrustError::Configuration(err.to_string())
    }
}

impl From<rustls::Error> for TrustError {
    fn from(err: rustls::Error) -> Self {
        TrustError::Provider(err.to_string())
    }
}

/// Why one candidate issuer failed single-hop path validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HopFailure {
    #[error("signature does not verify under the issuer key")]
    SignatureMismatch,
    #[error("issuer key is not usable with signature algorithm {0}")]
    IncompatibleKey(String),
    #[error("certificate is not yet valid")]
    NotYetValid,
    #[error("certificate has expired")]
    Expired,
    #[error("unrecognized critical extension {0}")]
    UnrecognizedCriticalExtension(String),
}
