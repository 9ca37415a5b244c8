//! Configuration for the trust store and the TLS verifier
//!
//! Configuration is plain serde data, loadable from JSON and checked by
//! [`TrustConfig::validate`] before use.

pub mod trust;

pub use trust::{TlsSettings, TrustConfig, TrustStoreConfig, TrustStoreFormat};
