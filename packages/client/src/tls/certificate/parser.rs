//! Immutable X.509 certificate values consumed by the chain validator

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Range;
use std::time::SystemTime;

use der::{Decode, Encode, Reader, SliceReader, Tag};
use rustls::pki_types::CertificateDer;
use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use x509_cert::Certificate as X509CertCert;
use x509_cert::ext::Extension;

use super::name::DistinguishedName;
use crate::tls::errors::TrustError;

const PEM_CERTIFICATE_TAG: &str = "CERTIFICATE";

/// A parsed certificate together with the exact bytes it was decoded from
///
/// Two certificates are equal when their DER encodings are identical.
#[derive(Clone)]
pub struct Certificate {
    der: Vec<u8>,
    tbs: Range<usize>,
    inner: X509CertCert,
    subject: DistinguishedName,
    issuer: DistinguishedName,
    fingerprint: [u8; 32],
}

impl Certificate {
    /// Parse a DER-encoded certificate
    pub fn from_der(der_bytes: &[u8]) -> Result<Self, TrustError> {
        let inner = X509CertCert::from_der(der_bytes).map_err(|e| {
            TrustError::CertificateParsing(format!("Failed to parse DER certificate: {e}"))
        })?;
        let tbs = locate_tbs(der_bytes)?;

        let subject = DistinguishedName::from_name(&inner.tbs_certificate.subject);
        let issuer = DistinguishedName::from_name(&inner.tbs_certificate.issuer);

        let mut fingerprint = [0u8; 32];
        fingerprint.copy_from_slice(
            ring::digest::digest(&ring::digest::SHA256, der_bytes).as_ref(),
        );

        Ok(Self {
            der: der_bytes.to_vec(),
            tbs,
            inner,
            subject,
            issuer,
            fingerprint,
        })
    }

    /// Parse a single PEM `CERTIFICATE` block
    pub fn from_pem(pem_data: &str) -> Result<Self, TrustError> {
        let block = pem::parse(pem_data).map_err(|e| {
            TrustError::CertificateParsing(format!("Failed to parse PEM certificate: {e}"))
        })?;

        if block.tag() != PEM_CERTIFICATE_TAG {
            return Err(TrustError::CertificateParsing(format!(
                "Expected PEM tag {PEM_CERTIFICATE_TAG}, found {}",
                block.tag()
            )));
        }

        Self::from_der(block.contents())
    }

    /// The DER encoding this value was parsed from
    #[must_use]
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }

    /// Owned copy suitable for a rustls root store
    #[must_use]
    pub fn to_certificate_der(&self) -> CertificateDer<'static> {
        CertificateDer::from(self.der.clone())
    }

    /// Raw `tbsCertificate` bytes covered by the signature
    #[must_use]
    pub fn tbs_der(&self) -> &[u8] {
        &self.der[self.tbs.clone()]
    }

    #[must_use]
    pub fn subject(&self) -> &DistinguishedName {
        &self.subject
    }

    #[must_use]
    pub fn issuer(&self) -> &DistinguishedName {
        &self.issuer
    }

    #[must_use]
    pub fn public_key(&self) -> &SubjectPublicKeyInfoOwned {
        &self.inner.tbs_certificate.subject_public_key_info
    }

    #[must_use]
    pub fn signature_algorithm(&self) -> &AlgorithmIdentifierOwned {
        &self.inner.signature_algorithm
    }

    #[must_use]
    pub fn signature(&self) -> &[u8] {
        self.inner.signature.raw_bytes()
    }

    #[must_use]
    pub fn not_before(&self) -> SystemTime {
        self.inner.tbs_certificate.validity.not_before.to_system_time()
    }

    #[must_use]
    pub fn not_after(&self) -> SystemTime {
        self.inner.tbs_certificate.validity.not_after.to_system_time()
    }

    /// Extensions present in the certificate, empty for v1 certificates
    #[must_use]
    pub fn extensions(&self) -> &[Extension] {
        self.inner
            .tbs_certificate
            .extensions
            .as_deref()
            .unwrap_or_default()
    }

    /// SHA-256 over the DER encoding
    #[must_use]
    pub fn fingerprint(&self) -> &[u8; 32] {
        &self.fingerprint
    }

    #[must_use]
    pub fn fingerprint_hex(&self) -> String {
        hex::encode(self.fingerprint)
    }

    #[must_use]
    pub fn serial_hex(&self) -> String {
        hex::encode(self.inner.tbs_certificate.serial_number.as_bytes())
    }
}

/// Byte range of the `tbsCertificate` TLV inside the outer `Certificate` SEQUENCE
fn locate_tbs(der_bytes: &[u8]) -> Result<Range<usize>, TrustError> {
    let outer = reader_at(der_bytes, 0)?.peek_header()?;
    outer.tag.assert_eq(Tag::Sequence)?;
    let outer_header_len = usize::try_from(outer.encoded_len()?)?;

    let tbs = reader_at(der_bytes, outer_header_len)?.peek_header()?;
    tbs.tag.assert_eq(Tag::Sequence)?;
    let tbs_len = usize::try_from((tbs.encoded_len()? + tbs.length)?)?;

    let end = outer_header_len + tbs_len;
    if end > der_bytes.len() {
        return Err(TrustError::CertificateParsing(
            "tbsCertificate extends past the end of the certificate".to_string(),
        ));
    }

    Ok(outer_header_len..end)
}

fn reader_at(der_bytes: &[u8], offset: usize) -> Result<SliceReader<'_>, TrustError> {
    let rest = der_bytes.get(offset..).ok_or_else(|| {
        TrustError::CertificateParsing("Truncated certificate".to_string())
    })?;
    Ok(SliceReader::new(rest)?)
}

impl TryFrom<&CertificateDer<'_>> for Certificate {
    type Error = TrustError;

    fn try_from(der: &CertificateDer<'_>) -> Result<Self, Self::Error> {
        Self::from_der(der.as_ref())
    }
}

impl PartialEq for Certificate {
    fn eq(&self, other: &Self) -> bool {
        self.der == other.der
    }
}

impl Eq for Certificate {}

impl Hash for Certificate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.der.hash(state);
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("subject", &self.subject.as_str())
            .field("issuer", &self.issuer.as_str())
            .field("serial", &self.serial_hex())
            .field("fingerprint", &self.fingerprint_hex())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_is_rejected() {
        let err = Certificate::from_der(&[0x30, 0x03, 0x02, 0x01, 0x00]);
        assert!(matches!(err, Err(TrustError::CertificateParsing(_))));
    }

    #[test]
    fn test_non_certificate_pem_is_rejected() {
        let block = pem::Pem::new("PRIVATE KEY", vec![0x30, 0x00]);
        let err = Certificate::from_pem(&pem::encode(&block));
        assert!(matches!(err, Err(TrustError::CertificateParsing(_))));
    }
}
