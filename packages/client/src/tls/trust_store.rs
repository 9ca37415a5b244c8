//! Trust-store loading and the process-wide trust anchors
//!
//! A trust store is an ordered list of certificates. The order matters: the
//! chain validator scans candidates from last to first, so the position of a
//! certificate in its bundle (or the name of its file in a directory) decides
//! which of two same-named issuers is tried first.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::config::{TrustStoreConfig, TrustStoreFormat};
use crate::tls::certificate::Certificate;
use crate::tls::errors::TrustError;

const PEM_CERTIFICATE_TAG: &str = "CERTIFICATE";
const CERTIFICATE_EXTENSIONS: [&str; 2] = ["pem", "crt"];

/// Global trust anchors instance
static GLOBAL_TRUST_ANCHORS: OnceLock<Arc<TrustAnchors>> = OnceLock::new();

/// Something that can produce the trust-store certificates
pub trait TrustStoreSource {
    /// Load every certificate, in store order
    ///
    /// # Errors
    ///
    /// Any failure to read or decode the store is fatal.
    fn load(&self) -> Result<Vec<Certificate>, TrustError>;

    /// Human-readable origin for log lines
    fn describe(&self) -> String;
}

/// A single file of concatenated PEM blocks
#[derive(Debug, Clone)]
pub struct PemBundle {
    path: PathBuf,
}

impl PemBundle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TrustStoreSource for PemBundle {
    fn load(&self) -> Result<Vec<Certificate>, TrustError> {
        let data = std::fs::read(&self.path).map_err(|e| {
            TrustError::TrustStore(format!("cannot read {}: {e}", self.path.display()))
        })?;
        parse_bundle(&data, &self.path)
    }

    fn describe(&self) -> String {
        format!("PEM bundle {}", self.path.display())
    }
}

/// A directory whose `.pem` and `.crt` files are read in file-name order
#[derive(Debug, Clone)]
pub struct PemDirectory {
    dir: PathBuf,
}

impl PemDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl TrustStoreSource for PemDirectory {
    fn load(&self) -> Result<Vec<Certificate>, TrustError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| {
            TrustError::TrustStore(format!("cannot list {}: {e}", self.dir.display()))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_certificate_file = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| CERTIFICATE_EXTENSIONS.contains(&ext));
            if path.is_file() && is_certificate_file {
                files.push(path);
            } else {
                tracing::debug!("skipping non-certificate entry {}", path.display());
            }
        }
        files.sort();

        let mut certificates = Vec::new();
        for file in files {
            let data = std::fs::read(&file).map_err(|e| {
                TrustError::TrustStore(format!("cannot read {}: {e}", file.display()))
            })?;
            certificates.extend(parse_bundle(&data, &file)?);
        }

        Ok(certificates)
    }

    fn describe(&self) -> String {
        format!("PEM directory {}", self.dir.display())
    }
}

/// Decode every `CERTIFICATE` block of a PEM file, keeping file order
fn parse_bundle(data: &[u8], origin: &Path) -> Result<Vec<Certificate>, TrustError> {
    let blocks = pem::parse_many(data)
        .map_err(|e| TrustError::TrustStore(format!("{}: {e}", origin.display())))?;

    let mut certificates = Vec::with_capacity(blocks.len());
    for block in blocks {
        if block.tag() != PEM_CERTIFICATE_TAG {
            tracing::debug!(
                "skipping PEM block {} in {}",
                block.tag(),
                origin.display()
            );
            continue;
        }

        let certificate = Certificate::from_der(block.contents()).map_err(|e| {
            TrustError::TrustStore(format!("{}: {e}", origin.display()))
        })?;
        certificates.push(certificate);
    }

    Ok(certificates)
}

/// Source matching a trust-store configuration
#[must_use]
pub fn source_for(config: &TrustStoreConfig) -> Box<dyn TrustStoreSource + Send + Sync> {
    match config.format {
        TrustStoreFormat::PemBundle => Box::new(PemBundle::new(config.path.clone())),
        TrustStoreFormat::PemDirectory => Box::new(PemDirectory::new(config.path.clone())),
    }
}

/// The ordered candidate set every validation runs against
#[derive(Debug, Clone, Default)]
pub struct TrustAnchors {
    certificates: Vec<Certificate>,
}

impl TrustAnchors {
    #[must_use]
    pub fn from_certificates(certificates: Vec<Certificate>) -> Self {
        Self { certificates }
    }

    /// Load anchors from any trust-store source
    ///
    /// # Errors
    ///
    /// Propagates the source's error unchanged.
    pub fn load(source: &dyn TrustStoreSource) -> Result<Self, TrustError> {
        let certificates = source.load()?;

        if certificates.is_empty() {
            tracing::warn!("{} contains no certificates", source.describe());
        } else {
            tracing::debug!(
                "loaded {} certificates from {}",
                certificates.len(),
                source.describe()
            );
        }

        Ok(Self { certificates })
    }

    /// Load anchors described by a trust-store configuration
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::TrustStore`] when the store cannot be read or
    /// contains an undecodable certificate.
    pub fn from_config(config: &TrustStoreConfig) -> Result<Self, TrustError> {
        Self::load(source_for(config).as_ref())
    }

    /// Certificates in store order
    #[must_use]
    pub fn certificates(&self) -> &[Certificate] {
        &self.certificates
    }

    pub fn iter(&self) -> impl Iterator<Item = &Certificate> {
        self.certificates.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    /// Install these anchors as the process-wide set
    ///
    /// Initialization happens once; the anchors are read-only afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::AlreadyInitialized`] if anchors were installed
    /// before.
    pub fn install_global(self) -> Result<Arc<Self>, TrustError> {
        let anchors = Arc::new(self);
        GLOBAL_TRUST_ANCHORS
            .set(Arc::clone(&anchors))
            .map_err(|_| TrustError::AlreadyInitialized)?;
        tracing::info!("installed {} global trust anchors", anchors.len());
        Ok(anchors)
    }

    /// The process-wide anchors, if installed
    #[must_use]
    pub fn global() -> Option<Arc<Self>> {
        GLOBAL_TRUST_ANCHORS.get().cloned()
    }
}
