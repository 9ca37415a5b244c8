//! Self-signed certificate detection

use crate::tls::certificate::Certificate;
use crate::tls::errors::TrustError;
use crate::tls::signature::{SignatureCheck, verify_signature};

/// Whether `cert` verifies under its own public key
///
/// A mismatching signature or an unusable key means "not self-signed". Provider
/// failures such as an unsupported algorithm are returned as errors.
pub fn is_self_signed(cert: &Certificate) -> Result<bool, TrustError> {
    match verify_signature(cert, cert.public_key())? {
        SignatureCheck::Valid => Ok(true),
        SignatureCheck::Invalid(reason) => {
            tracing::trace!("[{}] is not self-signed: {}", cert.subject(), reason);
            Ok(false)
        }
    }
}
