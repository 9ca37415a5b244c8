//! # Trustwalk client
//!
//! Custom X.509 trust-chain validation that plugs into rustls as a
//! supplementary, non-authoritative check.
//!
//! ## Features
//!
//! - **Chain validation** from a leaf to a self-signed root held in a trust store
//! - **Single-hop path validation** with name chaining, signature, validity and
//!   critical-extension checks
//! - **Self-signed detection** by verifying a certificate against its own key
//! - **Trust adapter** that logs and counts outcomes but never vouches for a chain
//! - **Rustls verifier** running the adapter ahead of WebPKI verification
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use trustwalk_client::{PemBundle, TrustAnchors, TrustManager};
//!
//! # fn main() -> Result<(), trustwalk_client::TrustError> {
//! let anchors = TrustAnchors::load(&PemBundle::new("/etc/trustwalk/roots.pem"))?;
//! let manager = TrustManager::new(Arc::new(anchors));
//! let client_config = manager.client_config()?;
//! # drop(client_config);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod telemetry;
pub mod tls;

// Prelude with canonical types
pub mod prelude;

pub use crate::prelude::*;
