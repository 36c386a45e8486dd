//! Common test utilities for pkicmp integration tests
//!
//! This module provides shared helper functions to reduce code duplication
//! across integration test files.

#![allow(dead_code)]

use pkicmp::der::asn1::{Ia5String, OctetString};
use pkicmp::x509_cert::ext::pkix::name::GeneralName;

// Re-export commonly used types
pub use pkicmp::prelude::*;
pub use pkicmp::protocol::body::body_type;

/// Shared password for MAC-protected test messages
pub const TEST_PASSWORD: &[u8] = b"correct horse battery staple";

/// Self-signed P-256 certificate, CN "test ca"
pub const TEST_CERT_HEX: &str = "308201103081b7a003020102020101300a06082a8648ce3d04030230123110300e06\
    035504030c0774657374206361301e170d3234303130313030303030305a170d3334303130313030303030305a\
    30123110300e06035504030c07746573742063613059301306072a8648ce3d020106082a8648ce3d0301070342\
    00049fad84aeae08bbef7f010014d82cef6a09de2b0cf871b5ce0c4f1d13a59a593407cb45769f1070e2c2470f\
    e5b1bfe63133c0b0cdc64ea4bf3791a8ec2a07fd4f300a06082a8648ce3d040302034800304502206a2c770693\
    6b4a749549a50bf63048e06159ea0fd92b08f133bb57b6a7383c23022100a346e607511c0eb3f1dbb94b676b7e\
    12043cec8b8ea28b4ee9026fceb0a9571d";

/// Install a test-writer subscriber once; later calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn dns(name: &str) -> GeneralName {
    GeneralName::DnsName(Ia5String::new(name).unwrap())
}

/// A header carrying a transaction id and a sender nonce
pub fn sample_header() -> PkiHeader {
    let mut header = PkiHeader::new(dns("client.example.com"), dns("ca.example.com"));
    header.transaction_id = Some(OctetString::new(vec![0x11; 16]).unwrap());
    header.sender_nonce = Some(OctetString::new(vec![0x22; 16]).unwrap());
    header.free_text = Some(vec!["integration test".to_string()]);
    header
}

/// A general message body with some opaque content
pub fn sample_body() -> PkiBody {
    // SEQUENCE { SEQUENCE { OID 1.3.6.1.5.5.7.4.1 } }
    let content = hex::decode("300c300a06082b06010505070401").unwrap();
    PkiBody::new(body_type::GENM, content).unwrap()
}

pub fn test_cert_der() -> Vec<u8> {
    hex::decode(TEST_CERT_HEX).unwrap()
}

/// A MAC-protected message using the default PBM parameters
pub fn mac_protected_message() -> ProtectedPkiMessage {
    let factory = PkMacBuilder::new().build(TEST_PASSWORD).unwrap();
    ProtectedPkiMessageBuilder::new(sample_header(), sample_body())
        .build_with_mac(&factory)
        .unwrap()
}
