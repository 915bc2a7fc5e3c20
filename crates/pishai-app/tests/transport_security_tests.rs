//! Integration tests for classifier endpoint policy.

use pishai_client::{
    DEVELOPMENT_ENDPOINT, HttpClassifierTransport, PRODUCTION_ENDPOINT, TransportError,
    validate_endpoint,
};

#[test]
fn transport_security_tests_accepts_https_and_loopback_http() {
    assert!(validate_endpoint(PRODUCTION_ENDPOINT).is_ok());
    assert!(validate_endpoint(DEVELOPMENT_ENDPOINT).is_ok());
    assert!(validate_endpoint("http://localhost:8000").is_ok());
    assert!(validate_endpoint("https://classifier.example.test/api").is_ok());
}

#[test]
fn transport_security_tests_rejects_plain_http_to_remote_hosts() {
    let error = validate_endpoint("http://classifier.example.test")
        .expect_err("plain http to a remote host should be rejected");
    assert!(matches!(error, TransportError::InvalidEndpoint(_)));
}

#[test]
fn transport_security_tests_rejects_other_schemes_and_queries() {
    for endpoint in [
        "ftp://classifier.example.test",
        "https://classifier.example.test/?key=1",
        "https://classifier.example.test/#top",
        "not a url",
    ] {
        assert!(
            matches!(validate_endpoint(endpoint), Err(TransportError::InvalidEndpoint(_))),
            "{endpoint} should be rejected"
        );
    }
}

#[test]
fn transport_security_tests_transport_refuses_invalid_endpoint() {
    let result = HttpClassifierTransport::new("http://classifier.example.test", None);
    assert!(matches!(result, Err(TransportError::InvalidEndpoint(_))));
}
