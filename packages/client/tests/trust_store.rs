//! Loading trust anchors from PEM files

mod common;

use std::fs;

use trustwalk_client::{PemBundle, PemDirectory, TrustAnchors, TrustConfig, TrustError};

use common::*;

#[test]
fn test_bundle_preserves_order_and_skips_other_blocks() {
    init_logging();
    let first = new_root("Bundle First");
    let second = new_root("Bundle Second");
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("roots.pem");

    let key_block = pem::encode(&pem::Pem::new("PRIVATE KEY", vec![0x30, 0x00]));
    let contents = format!("{}{}{}", pem_of(&first.cert), key_block, pem_of(&second.cert));
    fs::write(&path, contents).expect("write bundle");

    let anchors = TrustAnchors::load(&PemBundle::new(&path)).expect("bundle loads");
    assert_eq!(anchors.len(), 2);
    assert_eq!(anchors.certificates()[0], first.cert);
    assert_eq!(anchors.certificates()[1], second.cert);
}

#[test]
fn test_directory_reads_certificate_files_by_name() {
    init_logging();
    let alpha = new_root("Directory Alpha");
    let beta = new_root("Directory Beta");
    let dir = tempfile::tempdir().expect("temp dir");

    fs::write(dir.path().join("b-beta.crt"), pem_of(&beta.cert)).expect("write");
    fs::write(dir.path().join("a-alpha.pem"), pem_of(&alpha.cert)).expect("write");
    fs::write(dir.path().join("README.txt"), "not a certificate").expect("write");

    let anchors = TrustAnchors::load(&PemDirectory::new(dir.path())).expect("directory loads");
    let subjects: Vec<_> = anchors.iter().map(|c| c.subject().clone()).collect();
    assert_eq!(subjects, vec![alpha.cert.subject().clone(), beta.cert.subject().clone()]);
}

#[test]
fn test_missing_directory_is_fatal() {
    let err = TrustAnchors::load(&PemDirectory::new("/nonexistent/trustwalk/roots.d"))
        .expect_err("missing directory must fail");
    assert!(matches!(err, TrustError::TrustStore(_)));
    assert!(err.is_configuration_error());
}

#[test]
fn test_anchors_from_config_validate_chain() {
    init_logging();
    let root = new_root("Config Root");
    let leaf = leaf("service.internal", &root);
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("roots.pem");
    fs::write(&path, pem_of(&root.cert)).expect("write bundle");

    let config = TrustConfig::pem_bundle(&path);
    let anchors = TrustAnchors::from_config(&config.trust_store).expect("anchors load");
    let validator = trustwalk_client::ChainValidator::new();
    assert!(validator.validate(&leaf, anchors.certificates()).expect("no fatal error"));
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("trustwalk.json");
    let config = TrustConfig::pem_directory("/etc/trustwalk/roots.d");
    fs::write(&path, serde_json::to_string_pretty(&config).expect("serialize")).expect("write");

    let loaded = TrustConfig::from_file(&path).expect("config loads");
    assert_eq!(loaded, config);
}
