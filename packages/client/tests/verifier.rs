//! The rustls verifier consults the adapter, then defers to WebPKI

mod common;

use std::sync::Arc;

use rustls::client::danger::ServerCertVerifier;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use trustwalk_client::{TlsSettings, TrustAnchors, TrustManager};

use common::*;

fn manager_over(anchors: Vec<trustwalk_client::Certificate>) -> TrustManager {
    let settings = TlsSettings {
        use_webpki_roots: false,
    };
    TrustManager::with_settings(Arc::new(TrustAnchors::from_certificates(anchors)), settings)
}

fn localhost() -> ServerName<'static> {
    ServerName::try_from("localhost").expect("valid server name")
}

#[test]
fn test_chain_to_anchor_is_accepted_by_inner_verifier() {
    init_logging();
    let root = new_root("Verifier Root");
    let leaf = leaf("localhost", &root);
    let manager = manager_over(vec![root.cert.clone()]);
    let verifier = manager.verifier().expect("verifier builds");

    let end_entity = CertificateDer::from(leaf.as_der().to_vec());
    let result = verifier.verify_server_cert(&end_entity, &[], &localhost(), &[], UnixTime::now());
    assert!(result.is_ok(), "webpki should accept: {result:?}");

    let stats = manager.adapter().stats().snapshot();
    assert_eq!(stats.checks, 1);
    assert_eq!(stats.chains_validated, 1);
}

#[test]
fn test_unknown_issuer_is_rejected_by_inner_verifier() {
    init_logging();
    let root = new_root("Verifier Root");
    let stranger = new_root("Verifier Stranger");
    let leaf = leaf("localhost", &stranger);
    let manager = manager_over(vec![root.cert.clone()]);
    let verifier = manager.verifier().expect("verifier builds");

    let end_entity = CertificateDer::from(leaf.as_der().to_vec());
    let result = verifier.verify_server_cert(&end_entity, &[], &localhost(), &[], UnixTime::now());
    assert!(result.is_err());
    assert_eq!(manager.adapter().stats().snapshot().chains_rejected, 1);
}

#[test]
fn test_fatal_adapter_error_fails_verification() {
    init_logging();
    let root = new_root("Verifier Root");
    let leaf = relabel_as_ecdsa_sha512(&leaf("localhost", &root));
    let manager = manager_over(vec![root.cert.clone()]);
    let verifier = manager.verifier().expect("verifier builds");

    let end_entity = CertificateDer::from(leaf.as_der().to_vec());
    let result = verifier.verify_server_cert(&end_entity, &[], &localhost(), &[], UnixTime::now());
    assert!(matches!(result, Err(rustls::Error::General(_))));
    assert_eq!(manager.adapter().stats().snapshot().fatal_errors, 1);
}

#[test]
fn test_undecodable_leaf_is_left_to_inner_verifier() {
    init_logging();
    let root = new_root("Verifier Root");
    let manager = manager_over(vec![root.cert.clone()]);
    let verifier = manager.verifier().expect("verifier builds");

    let garbage = CertificateDer::from(vec![0x30, 0x03, 0x02, 0x01, 0x00]);
    let result = verifier.verify_server_cert(&garbage, &[], &localhost(), &[], UnixTime::now());
    assert!(result.is_err());
    assert_eq!(manager.adapter().stats().snapshot().checks, 0);
}

#[test]
fn test_empty_root_store_cannot_build_verifier() {
    let manager = manager_over(Vec::new());
    assert!(manager.verifier().is_err());
}

#[test]
fn test_client_config_builds() {
    let root = new_root("Verifier Root");
    let manager = manager_over(vec![root.cert.clone()]);
    let config = manager.client_config().expect("client config builds");
    assert!(config.enable_sni);
}
