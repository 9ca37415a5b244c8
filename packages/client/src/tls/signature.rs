//! Certificate signature verification
//!
//! Resolution happens in two steps. The certificate's signature algorithm must
//! be one the ring provider implements, otherwise the attempt fails with
//! [`TrustError::UnsupportedAlgorithm`]. The issuer key must then fit that
//! algorithm; a key of the wrong type only rejects the candidate.

use const_oid::ObjectIdentifier;
use der::{Decode, Encode, Reader, SliceReader, TagMode, TagNumber};
use ring::signature::{self, UnparsedPublicKey, VerificationAlgorithm};
use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};

use crate::tls::certificate::Certificate;
use crate::tls::errors::{HopFailure, TrustError};

const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
const SHA1_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.5");
const RSASSA_PSS: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.10");
const SHA256_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.11");
const SHA384_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.12");
const SHA512_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.13");

const ID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
const ECDSA_WITH_SHA256: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.2");
const ECDSA_WITH_SHA384: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.3");
const SECP256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
const SECP384R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");

const ED25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");

const SHA256: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.1");
const SHA384: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.2");
const SHA512: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.3");

/// Certificate signature algorithms the verifier implements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    RsaPkcs1Sha1,
    RsaPkcs1Sha256,
    RsaPkcs1Sha384,
    RsaPkcs1Sha512,
    RsaPssSha256,
    RsaPssSha384,
    RsaPssSha512,
    EcdsaSha256,
    EcdsaSha384,
    Ed25519,
}

/// Result of checking one signature against one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureCheck {
    Valid,
    Invalid(HopFailure),
}

impl SignatureAlgorithm {
    /// Resolve the `signatureAlgorithm` field of a certificate
    pub fn from_identifier(identifier: &AlgorithmIdentifierOwned) -> Result<Self, TrustError> {
        match identifier.oid {
            SHA1_WITH_RSA => Ok(Self::RsaPkcs1Sha1),
            SHA256_WITH_RSA => Ok(Self::RsaPkcs1Sha256),
            SHA384_WITH_RSA => Ok(Self::RsaPkcs1Sha384),
            SHA512_WITH_RSA => Ok(Self::RsaPkcs1Sha512),
            RSASSA_PSS => Self::from_pss_params(identifier.parameters.as_ref()),
            ECDSA_WITH_SHA256 => Ok(Self::EcdsaSha256),
            ECDSA_WITH_SHA384 => Ok(Self::EcdsaSha384),
            ED25519 => Ok(Self::Ed25519),
            other => Err(TrustError::UnsupportedAlgorithm(format!("OID {other}"))),
        }
    }

    /// Read the hash out of RSASSA-PSS-params
    ///
    /// ```asn1
    /// RSASSA-PSS-params ::= SEQUENCE {
    ///     hashAlgorithm     [0] HashAlgorithm DEFAULT sha1,
    ///     ...
    /// }
    /// ```
    fn from_pss_params(params: Option<&der::Any>) -> Result<Self, TrustError> {
        let Some(params) = params else {
            return Err(TrustError::UnsupportedAlgorithm(
                "RSASSA-PSS with default SHA-1 parameters".to_string(),
            ));
        };

        let mut reader = SliceReader::new(params.value()).map_err(|e| {
            TrustError::CertificateParsing(format!("Invalid RSASSA-PSS parameters: {e}"))
        })?;
        let hash = reader
            .context_specific::<AlgorithmIdentifierOwned>(TagNumber::N0, TagMode::Explicit)
            .map_err(|e| {
                TrustError::CertificateParsing(format!("Invalid RSASSA-PSS hash algorithm: {e}"))
            })?;

        match hash.map(|h| h.oid) {
            Some(SHA256) => Ok(Self::RsaPssSha256),
            Some(SHA384) => Ok(Self::RsaPssSha384),
            Some(SHA512) => Ok(Self::RsaPssSha512),
            Some(other) => Err(TrustError::UnsupportedAlgorithm(format!(
                "RSASSA-PSS with hash {other}"
            ))),
            None => Err(TrustError::UnsupportedAlgorithm(
                "RSASSA-PSS with default SHA-1 hash".to_string(),
            )),
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::RsaPkcs1Sha1 => "sha1WithRSAEncryption",
            Self::RsaPkcs1Sha256 => "sha256WithRSAEncryption",
            Self::RsaPkcs1Sha384 => "sha384WithRSAEncryption",
            Self::RsaPkcs1Sha512 => "sha512WithRSAEncryption",
            Self::RsaPssSha256 => "rsassa-pss-sha256",
            Self::RsaPssSha384 => "rsassa-pss-sha384",
            Self::RsaPssSha512 => "rsassa-pss-sha512",
            Self::EcdsaSha256 => "ecdsa-with-SHA256",
            Self::EcdsaSha384 => "ecdsa-with-SHA384",
            Self::Ed25519 => "Ed25519",
        }
    }

    /// Pick the ring algorithm for this signature under `key`
    ///
    /// `Ok(None)` means the key cannot carry this kind of signature.
    fn ring_algorithm(
        self,
        key: &SubjectPublicKeyInfoOwned,
    ) -> Result<Option<&'static dyn VerificationAlgorithm>, TrustError> {
        let key_oid = key.algorithm.oid;

        let algorithm: &'static dyn VerificationAlgorithm = match self {
            Self::RsaPkcs1Sha1 | Self::RsaPkcs1Sha256 | Self::RsaPkcs1Sha384 | Self::RsaPkcs1Sha512
                if key_oid != RSA_ENCRYPTION =>
            {
                return Ok(None);
            }
            Self::RsaPkcs1Sha1 => &signature::RSA_PKCS1_2048_8192_SHA1_FOR_LEGACY_USE_ONLY,
            Self::RsaPkcs1Sha256 => &signature::RSA_PKCS1_2048_8192_SHA256,
            Self::RsaPkcs1Sha384 => &signature::RSA_PKCS1_2048_8192_SHA384,
            Self::RsaPkcs1Sha512 => &signature::RSA_PKCS1_2048_8192_SHA512,
            Self::RsaPssSha256 | Self::RsaPssSha384 | Self::RsaPssSha512
                if key_oid != RSA_ENCRYPTION && key_oid != RSASSA_PSS =>
            {
                return Ok(None);
            }
            Self::RsaPssSha256 => &signature::RSA_PSS_2048_8192_SHA256,
            Self::RsaPssSha384 => &signature::RSA_PSS_2048_8192_SHA384,
            Self::RsaPssSha512 => &signature::RSA_PSS_2048_8192_SHA512,
            Self::EcdsaSha256 | Self::EcdsaSha384 => {
                if key_oid != ID_EC_PUBLIC_KEY {
                    return Ok(None);
                }
                let Some(curve) = named_curve(key) else {
                    return Ok(None);
                };
                match (self, curve) {
                    (Self::EcdsaSha256, SECP256R1) => &signature::ECDSA_P256_SHA256_ASN1,
                    (Self::EcdsaSha384, SECP256R1) => &signature::ECDSA_P256_SHA384_ASN1,
                    (Self::EcdsaSha256, SECP384R1) => &signature::ECDSA_P384_SHA256_ASN1,
                    (Self::EcdsaSha384, SECP384R1) => &signature::ECDSA_P384_SHA384_ASN1,
                    (_, other) => {
                        return Err(TrustError::UnsupportedAlgorithm(format!(
                            "{} on curve {other}",
                            self.name()
                        )));
                    }
                }
            }
            Self::Ed25519 if key_oid != ED25519 => return Ok(None),
            Self::Ed25519 => &signature::ED25519,
        };

        Ok(Some(algorithm))
    }
}

/// Curve OID from the `id-ecPublicKey` parameters, if well-formed
fn named_curve(key: &SubjectPublicKeyInfoOwned) -> Option<ObjectIdentifier> {
    let params = key.algorithm.parameters.as_ref()?;
    let encoded = params.to_der().ok()?;
    ObjectIdentifier::from_der(&encoded).ok()
}

/// Verify that `cert` was signed by the private half of `issuer_key`
pub fn verify_signature(
    cert: &Certificate,
    issuer_key: &SubjectPublicKeyInfoOwned,
) -> Result<SignatureCheck, TrustError> {
    let algorithm = SignatureAlgorithm::from_identifier(cert.signature_algorithm())?;

    let Some(ring_algorithm) = algorithm.ring_algorithm(issuer_key)? else {
        return Ok(SignatureCheck::Invalid(HopFailure::IncompatibleKey(
            algorithm.name().to_string(),
        )));
    };

    let key = UnparsedPublicKey::new(ring_algorithm, issuer_key.subject_public_key.raw_bytes());
    match key.verify(cert.tbs_der(), cert.signature()) {
        Ok(()) => Ok(SignatureCheck::Valid),
        Err(_) => Ok(SignatureCheck::Invalid(HopFailure::SignatureMismatch)),
    }
}
