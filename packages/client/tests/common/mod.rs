//! Certificate fixtures shared by the integration tests

#![allow(dead_code)]

use rcgen::{
    BasicConstraints, CertificateParams, DnType, IsCa, Issuer, KeyPair, SignatureAlgorithm,
};
use trustwalk_client::Certificate;

/// Route validator logs to the test harness
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// A certificate together with the params and key needed to issue from it
pub struct Authority {
    pub cert: Certificate,
    params: CertificateParams,
    key_pem: String,
}

impl Authority {
    pub fn key(&self) -> KeyPair {
        KeyPair::from_pem(&self.key_pem).expect("fixture key should reload")
    }

    pub fn issuer(&self) -> Issuer<'static, KeyPair> {
        Issuer::new(self.params.clone(), self.key())
    }
}

pub fn params(common_name: &str) -> CertificateParams {
    let mut params =
        CertificateParams::new(Vec::<String>::new()).expect("empty SAN list is valid");
    params.distinguished_name = rcgen::DistinguishedName::new();
    params.distinguished_name.push(DnType::CommonName, common_name);
    params.distinguished_name.push(DnType::OrganizationName, "Trustwalk Tests");
    params
}

pub fn ca_params(common_name: &str) -> CertificateParams {
    let mut params = params(common_name);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params
}

pub fn convert(cert: &rcgen::Certificate) -> Certificate {
    Certificate::from_der(cert.der().as_ref()).expect("rcgen output should parse")
}

fn authority(params: CertificateParams, key: &KeyPair, cert: &rcgen::Certificate) -> Authority {
    Authority {
        cert: convert(cert),
        params,
        key_pem: key.serialize_pem(),
    }
}

/// Self-signed P-256 root
pub fn new_root(common_name: &str) -> Authority {
    let key = KeyPair::generate().expect("P-256 key generation");
    root_with_key(common_name, key)
}

/// Self-signed root with a key of the given algorithm
pub fn new_root_with(common_name: &str, alg: &'static SignatureAlgorithm) -> Authority {
    let key = KeyPair::generate_for(alg).expect("key generation");
    root_with_key(common_name, key)
}

fn root_with_key(common_name: &str, key: KeyPair) -> Authority {
    let params = ca_params(common_name);
    let cert = params.self_signed(&key).expect("self-signing");
    authority(params, &key, &cert)
}

/// CA certificate issued by `issuer`, with a fresh key
pub fn intermediate(common_name: &str, issuer: &Authority) -> Authority {
    let key = KeyPair::generate().expect("P-256 key generation");
    intermediate_with_key(common_name, issuer, &key)
}

/// CA certificate issued by `issuer` for an existing key
pub fn intermediate_with_key(common_name: &str, issuer: &Authority, key: &KeyPair) -> Authority {
    let params = ca_params(common_name);
    let cert = params.signed_by(key, &issuer.issuer()).expect("issuing");
    authority(params, key, &cert)
}

/// End-entity certificate for `localhost`
pub fn leaf_params(common_name: &str) -> CertificateParams {
    let mut params = CertificateParams::new(vec!["localhost".to_string()])
        .expect("localhost is a valid SAN");
    params.distinguished_name = rcgen::DistinguishedName::new();
    params.distinguished_name.push(DnType::CommonName, common_name);
    params
}

pub fn leaf(common_name: &str, issuer: &Authority) -> Certificate {
    issue(leaf_params(common_name), issuer)
}

pub fn issue(params: CertificateParams, issuer: &Authority) -> Certificate {
    let key = KeyPair::generate().expect("P-256 key generation");
    let cert = params.signed_by(&key, &issuer.issuer()).expect("issuing");
    convert(&cert)
}

/// Copy of `der` with the last byte of the signature flipped
pub fn tamper_signature(cert: &Certificate) -> Certificate {
    let mut der = cert.as_der().to_vec();
    if let Some(last) = der.last_mut() {
        *last ^= 0x01;
    }
    Certificate::from_der(&der).expect("tampered certificate still parses")
}

/// Relabel an ecdsa-with-SHA256 certificate as ecdsa-with-SHA512
pub fn relabel_as_ecdsa_sha512(cert: &Certificate) -> Certificate {
    const ECDSA_WITH_SHA256: [u8; 8] = [0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x04, 0x03, 0x02];

    let mut der = cert.as_der().to_vec();
    let mut replaced = 0;
    let mut i = 0;
    while i + ECDSA_WITH_SHA256.len() <= der.len() {
        if der[i..i + ECDSA_WITH_SHA256.len()] == ECDSA_WITH_SHA256 {
            der[i + ECDSA_WITH_SHA256.len() - 1] = 0x04;
            replaced += 1;
        }
        i += 1;
    }
    assert_eq!(replaced, 2, "both signature algorithm fields should be relabelled");
    Certificate::from_der(&der).expect("relabelled certificate still parses")
}

pub fn pem_of(cert: &Certificate) -> String {
    pem::encode(&pem::Pem::new("CERTIFICATE", cert.as_der().to_vec()))
}
