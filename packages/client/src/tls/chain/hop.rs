//! Single-hop path validation
//!
//! Validates the one-certificate path `[subject]` against a single trust anchor
//! with revocation checking disabled: issuer name chaining, the signature under
//! the anchor's key, the validity period, and critical extension processing.
//! The anchor itself is trusted as-is, so its own validity and constraints are
//! not examined.

use std::time::SystemTime;

use const_oid::ObjectIdentifier;

use crate::tls::certificate::Certificate;
use crate::tls::errors::{HopFailure, TrustError};
use crate::tls::signature::{SignatureCheck, verify_signature};

/// Critical extensions the path validation knows how to process
const RECOGNIZED_CRITICAL_EXTENSIONS: [ObjectIdentifier; 9] = [
    ObjectIdentifier::new_unwrap("2.5.29.15"), // keyUsage
    ObjectIdentifier::new_unwrap("2.5.29.17"), // subjectAltName
    ObjectIdentifier::new_unwrap("2.5.29.19"), // basicConstraints
    ObjectIdentifier::new_unwrap("2.5.29.30"), // nameConstraints
    ObjectIdentifier::new_unwrap("2.5.29.32"), // certificatePolicies
    ObjectIdentifier::new_unwrap("2.5.29.33"), // policyMappings
    ObjectIdentifier::new_unwrap("2.5.29.36"), // policyConstraints
    ObjectIdentifier::new_unwrap("2.5.29.37"), // extKeyUsage
    ObjectIdentifier::new_unwrap("2.5.29.54"), // inhibitAnyPolicy
];

/// Outcome of trying one candidate as the issuer of a certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HopOutcome {
    /// The candidate's subject is not the certificate's issuer
    NoMatch,
    /// Names match but path validation failed
    Invalid(HopFailure),
    /// Names match and path validation succeeded
    Valid,
}

/// Validate `subject` as issued by `anchor` at time `at`
pub fn validate_hop(
    subject: &Certificate,
    anchor: &Certificate,
    at: SystemTime,
) -> Result<HopOutcome, TrustError> {
    if subject.issuer() != anchor.subject() {
        return Ok(HopOutcome::NoMatch);
    }

    if let SignatureCheck::Invalid(reason) = verify_signature(subject, anchor.public_key())? {
        return Ok(HopOutcome::Invalid(reason));
    }

    if at < subject.not_before() {
        return Ok(HopOutcome::Invalid(HopFailure::NotYetValid));
    }
    if at > subject.not_after() {
        return Ok(HopOutcome::Invalid(HopFailure::Expired));
    }

    let unrecognized = subject
        .extensions()
        .iter()
        .find(|ext| ext.critical && !RECOGNIZED_CRITICAL_EXTENSIONS.contains(&ext.extn_id));
    if let Some(ext) = unrecognized {
        return Ok(HopOutcome::Invalid(HopFailure::UnrecognizedCriticalExtension(
            ext.extn_id.to_string(),
        )));
    }

    Ok(HopOutcome::Valid)
}
