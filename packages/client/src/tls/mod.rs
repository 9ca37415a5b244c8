//! Trust validation and rustls integration
//!
//! Bottom-up: certificate values and names, signature verification, single-hop
//! and chain validation, the trust store, the supplementary trust adapter, and
//! the rustls verifier that hosts it.

pub mod certificate;
pub mod chain;
pub mod errors;
pub mod signature;
pub mod tls_manager;
pub mod trust_adapter;
pub mod trust_store;

pub use certificate::{Certificate, DistinguishedName};
pub use chain::{ChainValidator, HopOutcome, is_self_signed, validate_hop};
pub use errors::{HopFailure, TrustError};
pub use tls_manager::{SupplementaryTrustVerifier, TrustManager};
pub use trust_adapter::{TrustAdapter, UNKNOWN_AUTH_TYPE};
pub use trust_store::{PemBundle, PemDirectory, TrustAnchors, TrustStoreSource};
