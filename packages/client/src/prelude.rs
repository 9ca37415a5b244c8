//! Trustwalk Prelude
//!
//! The types most callers need to load a trust store and validate chains.

// Certificates and validation
pub use crate::tls::certificate::{Certificate, DistinguishedName};
pub use crate::tls::chain::{ChainValidator, is_self_signed};

// Error types
pub use crate::tls::errors::{HopFailure, TrustError};

// Trust store and adapter
pub use crate::tls::trust_adapter::{TrustAdapter, UNKNOWN_AUTH_TYPE};
pub use crate::tls::trust_store::{PemBundle, PemDirectory, TrustAnchors, TrustStoreSource};

// Rustls integration
pub use crate::tls::tls_manager::{SupplementaryTrustVerifier, TrustManager};

// Configuration
pub use crate::config::{TlsSettings, TrustConfig, TrustStoreConfig, TrustStoreFormat};

// Telemetry types
pub use crate::telemetry::{TrustStats, TrustStatsSnapshot};
