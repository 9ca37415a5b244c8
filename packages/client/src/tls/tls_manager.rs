//! TLS Manager
//!
//! Wires the supplementary trust adapter into rustls. The adapter runs first
//! on every server certificate; because it never vouches for a chain, the
//! decision always falls through to the WebPKI verifier built over the same
//! trust anchors.

use std::sync::Arc;

use rustls::client::WebPkiServerVerifier;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};

use crate::config::{TlsSettings, TrustConfig};
use crate::tls::certificate::Certificate;
use crate::tls::errors::TrustError;
use crate::tls::trust_adapter::{TrustAdapter, UNKNOWN_AUTH_TYPE};
use crate::tls::trust_store::TrustAnchors;

/// Builds rustls client configurations around a [`TrustAdapter`]
#[derive(Debug, Clone)]
pub struct TrustManager {
    adapter: TrustAdapter,
    settings: TlsSettings,
    provider: Arc<CryptoProvider>,
}

impl TrustManager {
    /// Manager over `anchors` with default TLS settings
    #[must_use]
    pub fn new(anchors: Arc<TrustAnchors>) -> Self {
        Self::with_settings(anchors, TlsSettings::default())
    }

    #[must_use]
    pub fn with_settings(anchors: Arc<TrustAnchors>, settings: TlsSettings) -> Self {
        Self {
            adapter: TrustAdapter::new(anchors),
            settings,
            provider: Arc::new(rustls::crypto::ring::default_provider()),
        }
    }

    /// Load the trust store named by `config` and build a manager over it
    ///
    /// # Errors
    ///
    /// Returns the configuration or trust-store error that prevented loading.
    pub fn from_config(config: &TrustConfig) -> Result<Self, TrustError> {
        config.validate()?;
        let anchors = TrustAnchors::from_config(&config.trust_store)?;
        Ok(Self::with_settings(Arc::new(anchors), config.tls.clone()))
    }

    /// Use a specific adapter, e.g. one with a pinned validation time
    #[must_use]
    pub fn with_adapter(mut self, adapter: TrustAdapter) -> Self {
        self.adapter = adapter;
        self
    }

    #[must_use]
    pub fn adapter(&self) -> &TrustAdapter {
        &self.adapter
    }

    /// Root store for the inner verifier: the trust anchors, plus the
    /// webpki-roots bundle when enabled
    fn root_store(&self) -> RootCertStore {
        let mut root_store = RootCertStore::empty();

        if self.settings.use_webpki_roots {
            root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        }

        for anchor in self.adapter.anchors().iter() {
            if let Err(e) = root_store.add(anchor.to_certificate_der()) {
                tracing::warn!(
                    "Failed to add trust anchor [{}] to root store: {}",
                    anchor.subject(),
                    e
                );
            }
        }

        tracing::debug!("root store holds {} anchors", root_store.len());
        root_store
    }

    /// Verifier running the adapter before WebPKI verification
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Provider`] when the inner verifier cannot be
    /// built, for example because the root store is empty.
    pub fn verifier(&self) -> Result<Arc<SupplementaryTrustVerifier>, TrustError> {
        let inner = WebPkiServerVerifier::builder_with_provider(
            Arc::new(self.root_store()),
            Arc::clone(&self.provider),
        )
        .build()
        .map_err(|e| TrustError::Provider(format!("Failed to create webpki verifier: {e}")))?;

        Ok(Arc::new(SupplementaryTrustVerifier {
            adapter: self.adapter.clone(),
            inner,
        }))
    }

    /// Client configuration using [`TrustManager::verifier`]
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Provider`] when rustls rejects the provider or
    /// the verifier cannot be built.
    pub fn client_config(&self) -> Result<ClientConfig, TrustError> {
        let verifier = self.verifier()?;

        let client_config = ClientConfig::builder_with_provider(Arc::clone(&self.provider))
            .with_safe_default_protocol_versions()?
            .dangerous()
            .with_custom_certificate_verifier(verifier)
            .with_no_client_auth();

        Ok(client_config)
    }
}

/// Server certificate verifier consulting a [`TrustAdapter`] first
///
/// A positive adapter answer would accept the certificate outright. In practice
/// the adapter always answers "not trusted", so every certificate is judged by
/// the inner WebPKI verifier. A fatal adapter error fails the handshake.
#[derive(Debug)]
pub struct SupplementaryTrustVerifier {
    adapter: TrustAdapter,
    inner: Arc<WebPkiServerVerifier>,
}

impl SupplementaryTrustVerifier {
    #[must_use]
    pub fn adapter(&self) -> &TrustAdapter {
        &self.adapter
    }

    /// Decode what the peer presented; certificates that fail to decode are
    /// left to the inner verifier
    fn presented_chain(
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
    ) -> Option<Vec<Certificate>> {
        let leaf = match Certificate::try_from(end_entity) {
            Ok(leaf) => leaf,
            Err(e) => {
                tracing::warn!("skipping supplementary trust check: {}", e);
                return None;
            }
        };

        let mut chain = vec![leaf];
        for intermediate in intermediates {
            match Certificate::try_from(intermediate) {
                Ok(cert) => chain.push(cert),
                Err(e) => tracing::debug!("ignoring undecodable intermediate: {}", e),
            }
        }
        Some(chain)
    }
}

impl ServerCertVerifier for SupplementaryTrustVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        if let Some(chain) = Self::presented_chain(end_entity, intermediates) {
            let trusted = self
                .adapter
                .is_trusted(&chain, UNKNOWN_AUTH_TYPE)
                .map_err(|e| {
                    rustls::Error::General(format!("Supplementary trust check aborted: {e}"))
                })?;

            if trusted {
                tracing::debug!("{:?} accepted by supplementary trust check", server_name);
                return Ok(ServerCertVerified::assertion());
            }
        }

        self.inner
            .verify_server_cert(end_entity, intermediates, server_name, ocsp_response, now)
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        self.inner.verify_tls12_signature(message, cert, dss)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        self.inner.verify_tls13_signature(message, cert, dss)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.inner.supported_verify_schemes()
    }
}
