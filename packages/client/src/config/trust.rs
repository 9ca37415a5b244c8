//! Trust configuration
//!
//! Where the trust store lives, how it is laid out, and whether the inner
//! WebPKI verifier also trusts the bundled Mozilla roots.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::tls::errors::TrustError;

/// On-disk layout of the trust store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrustStoreFormat {
    /// One file holding concatenated PEM `CERTIFICATE` blocks
    #[default]
    PemBundle,
    /// A directory of `.pem` / `.crt` files
    PemDirectory,
}

/// Location and layout of the trust store
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustStoreConfig {
    pub path: PathBuf,
    pub format: TrustStoreFormat,
}

/// Settings for the rustls verifier the adapter sits in front of
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsSettings {
    /// Add the webpki-roots bundle to the inner verifier's root store
    pub use_webpki_roots: bool,
}

impl Default for TlsSettings {
    fn default() -> Self {
        Self {
            use_webpki_roots: true,
        }
    }
}

/// Top-level trust configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustConfig {
    pub trust_store: TrustStoreConfig,
    pub tls: TlsSettings,
}

impl TrustConfig {
    /// Configuration reading a PEM bundle at `path`
    #[must_use]
    pub fn pem_bundle(path: impl Into<PathBuf>) -> Self {
        Self {
            trust_store: TrustStoreConfig {
                path: path.into(),
                format: TrustStoreFormat::PemBundle,
            },
            ..Self::default()
        }
    }

    /// Configuration reading every certificate file in `dir`
    #[must_use]
    pub fn pem_directory(dir: impl Into<PathBuf>) -> Self {
        Self {
            trust_store: TrustStoreConfig {
                path: dir.into(),
                format: TrustStoreFormat::PemDirectory,
            },
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Configuration`] for malformed JSON or a
    /// configuration that fails [`TrustConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, TrustError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Io`] when the file cannot be read, otherwise as
    /// [`TrustConfig::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TrustError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Validate configuration settings
    ///
    /// Only the shape of the configuration is checked here; whether the path
    /// exists is decided when the trust store is loaded.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Configuration`] when no trust-store path is set.
    pub fn validate(&self) -> Result<(), TrustError> {
        if self.trust_store.path.as_os_str().is_empty() {
            return Err(TrustError::Configuration(
                "trust_store.path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
