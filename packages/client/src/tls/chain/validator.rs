//! Recursive trust-chain validation against a candidate set

use std::collections::HashSet;
use std::time::SystemTime;

use super::hop::{HopOutcome, validate_hop};
use super::self_signed::is_self_signed;
use crate::tls::certificate::Certificate;
use crate::tls::errors::TrustError;

/// Links a certificate to a self-signed root contained in a candidate set
///
/// Candidates are scanned from last to first. The first candidate whose
/// subject matches the current issuer and which passes single-hop validation is
/// committed to: either it is a self-signed root and validation succeeds, or the
/// climb continues from it. There is no backtracking to other candidates once a
/// hop has been committed, so two issuers sharing a name but holding different
/// keys can make an otherwise valid chain fail.
#[derive(Debug, Clone, Default)]
pub struct ChainValidator {
    validation_time: Option<SystemTime>,
}

impl ChainValidator {
    /// Validator checking validity periods against the current time
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator checking validity periods against a fixed instant
    #[must_use]
    pub fn at_time(validation_time: SystemTime) -> Self {
        Self {
            validation_time: Some(validation_time),
        }
    }

    /// True when `subject` chains up to a self-signed root in `candidates`
    ///
    /// `Ok(false)` does not say whether no issuer was found or whether the chain
    /// above a matching issuer was invalid.
    ///
    /// # Errors
    ///
    /// Returns an error when the cryptographic provider cannot process a
    /// signature (for example an unsupported algorithm). Such errors abort the
    /// whole attempt and are never a trust decision.
    pub fn validate(
        &self,
        subject: &Certificate,
        candidates: &[Certificate],
    ) -> Result<bool, TrustError> {
        let at = self.validation_time.unwrap_or_else(SystemTime::now);
        let mut visited = HashSet::from([*subject.fingerprint()]);
        self.climb(subject, candidates, at, &mut visited)
    }

    fn climb(
        &self,
        subject: &Certificate,
        candidates: &[Certificate],
        at: SystemTime,
        visited: &mut HashSet<[u8; 32]>,
    ) -> Result<bool, TrustError> {
        for candidate in candidates.iter().rev() {
            match validate_hop(subject, candidate, at)? {
                HopOutcome::NoMatch => {}
                HopOutcome::Invalid(reason) => {
                    tracing::trace!(
                        "validation of [{}] via [{}] failed: {}, checking next candidate",
                        subject.subject(),
                        candidate.subject(),
                        reason
                    );
                }
                HopOutcome::Valid => {
                    if is_self_signed(candidate)? {
                        tracing::debug!("validating root [{}]", candidate.subject());
                        return Ok(true);
                    }

                    if candidate == subject {
                        continue;
                    }

                    if !visited.insert(*candidate.fingerprint()) {
                        tracing::warn!(
                            "issuer cycle: [{}] ({}) was already visited, giving up",
                            candidate.subject(),
                            candidate.fingerprint_hex()
                        );
                        return Ok(false);
                    }

                    tracing::debug!(
                        "validating [{}] via: [{}]",
                        subject.subject(),
                        candidate.subject()
                    );
                    return self.climb(candidate, candidates, at, visited);
                }
            }
        }

        Ok(false)
    }
}
