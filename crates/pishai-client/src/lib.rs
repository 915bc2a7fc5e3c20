#![warn(missing_docs)]
//! # pishai-client
//!
//! ## Purpose
//! Talks to the remote classification service over HTTP.
//!
//! ## Responsibilities
//! - Enforce endpoint transport policy (HTTPS, or HTTP on loopback only).
//! - Build the `/predict/url` and `/predict/email` request bodies.
//! - Decode responses through the classifier contract.
//! - Expose an injectable [`ClassifierTransport`] seam for tests and front ends.
//!
//! ## Data flow
//! [`pishai_core::CheckRequest`] -> [`ClassifierTransport::classify`] ->
//! `POST {endpoint}/predict/{kind}` -> [`ClassifierResponse`].
//!
//! ## Ownership and lifetimes
//! Requests are borrowed for the duration of one call; responses are owned.
//! [`HttpClassifierTransport`] wraps a cloneable `reqwest::Client` and can be
//! shared between checker instances.
//!
//! ## Error model
//! Every failure is a [`TransportError`]; the detail is kept for logs while
//! [`TransportError::kind`] collapses all of them to
//! [`ErrorKind::NetworkError`]. No call is ever retried here.
//!
//! ## Security and privacy notes
//! Request payloads are never logged; only kind, endpoint, and status are.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use pishai_analysis_contract::{
    ClassifierContractError, ClassifierResponse, parse_classifier_response,
};
use pishai_core::{CheckKind, CheckRequest, ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Base URL of the locally run classifier.
pub const DEVELOPMENT_ENDPOINT: &str = "http://127.0.0.1:8000";

/// Base URL of the hosted classifier.
pub const PRODUCTION_ENDPOINT: &str = "https://phishai.onrender.com";

const MAX_DETAIL_CHARS: usize = 200;

/// Deployment profile selecting a default endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Local classifier on loopback.
    #[serde(alias = "dev")]
    Development,
    /// Hosted classifier.
    #[default]
    #[serde(alias = "prod")]
    Production,
}

impl Profile {
    /// Returns the profile's default endpoint.
    pub fn default_endpoint(self) -> &'static str {
        match self {
            Profile::Development => DEVELOPMENT_ENDPOINT,
            Profile::Production => PRODUCTION_ENDPOINT,
        }
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Profile::Development),
            "prod" | "production" => Ok(Profile::Production),
            other => Err(format!("unknown profile `{other}` (expected dev or prod)")),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Development => f.write_str("development"),
            Profile::Production => f.write_str("production"),
        }
    }
}

/// JSON body sent to the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PredictBody<'a> {
    /// Body for `/predict/url`.
    Url {
        /// Absolute URL under test.
        url: &'a str,
    },
    /// Body for `/predict/email`.
    Email {
        /// Raw email text under test.
        email_text: &'a str,
    },
}

impl<'a> PredictBody<'a> {
    /// Builds the body matching the request kind.
    pub fn for_request(request: &'a CheckRequest) -> Self {
        match request.kind() {
            CheckKind::Url => PredictBody::Url {
                url: request.payload(),
            },
            CheckKind::Email => PredictBody::Email {
                email_text: request.payload(),
            },
        }
    }
}

/// Abstract transport used by checkers.
#[async_trait]
pub trait ClassifierTransport: Send + Sync {
    /// Sends one request to the classifier and returns its verdict.
    async fn classify(&self, request: &CheckRequest) -> Result<ClassifierResponse, TransportError>;
}

/// `reqwest`-backed classifier transport.
#[derive(Debug, Clone)]
pub struct HttpClassifierTransport {
    endpoint: Url,
    http: reqwest::Client,
}

impl HttpClassifierTransport {
    /// Creates a transport for a validated endpoint.
    ///
    /// `timeout` bounds each whole request; `None` leaves calls unbounded.
    ///
    /// # Errors
    /// Returns [`TransportError::InvalidEndpoint`] when the endpoint violates
    /// [`validate_endpoint`], or [`TransportError::Client`] when the HTTP
    /// client cannot be built.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let endpoint = validate_endpoint(endpoint)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|error| TransportError::Client(error.to_string()))?;

        Ok(Self { endpoint, http })
    }

    /// Returns the configured base endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns the full predict URL for a check kind.
    pub fn predict_url(&self, kind: CheckKind) -> Url {
        let mut url = self.endpoint.clone();
        let path = format!(
            "{}{}",
            self.endpoint.path().trim_end_matches('/'),
            kind.predict_path()
        );
        url.set_path(&path);
        url
    }
}

#[async_trait]
impl ClassifierTransport for HttpClassifierTransport {
    async fn classify(&self, request: &CheckRequest) -> Result<ClassifierResponse, TransportError> {
        let target = self.predict_url(request.kind());
        tracing::debug!(kind = %request.kind(), endpoint = %target, "sending classifier request");

        let response = self
            .http
            .post(target.clone())
            .json(&PredictBody::for_request(request))
            .send()
            .await
            .map_err(TransportError::from_reqwest)?;

        let status = response.status();
        let body = response.text().await.map_err(TransportError::from_reqwest)?;

        if !status.is_success() {
            let detail = error_detail(&body);
            tracing::warn!(
                kind = %request.kind(),
                endpoint = %target,
                status = status.as_u16(),
                detail = detail.as_deref().unwrap_or("-"),
                "classifier rejected request"
            );
            return Err(TransportError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        parse_classifier_response(&body).map_err(TransportError::Contract)
    }
}

/// Validates a classifier base endpoint.
///
/// # Errors
/// Returns [`TransportError::InvalidEndpoint`] when the URL does not parse,
/// has no host, carries a query or fragment, or uses plain HTTP towards a
/// non-loopback host.
pub fn validate_endpoint(endpoint: &str) -> Result<Url, TransportError> {
    let parsed = Url::parse(endpoint.trim())
        .map_err(|error| TransportError::InvalidEndpoint(format!("invalid endpoint url: {error}")))?;

    let Some(host) = parsed.host_str() else {
        return Err(TransportError::InvalidEndpoint(
            "endpoint must include a host".to_string(),
        ));
    };

    match parsed.scheme() {
        "https" => {}
        "http" if is_loopback_host(host) => {}
        "http" => {
            return Err(TransportError::InvalidEndpoint(
                "plain http is only allowed for loopback endpoints".to_string(),
            ));
        }
        other => {
            return Err(TransportError::InvalidEndpoint(format!(
                "unsupported endpoint scheme `{other}`"
            )));
        }
    }

    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(TransportError::InvalidEndpoint(
            "endpoint must not carry a query or fragment".to_string(),
        ));
    }

    Ok(parsed)
}

fn is_loopback_host(host: &str) -> bool {
    matches!(host, "localhost" | "127.0.0.1" | "[::1]" | "::1")
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let detail = match parsed.detail {
        serde_json::Value::String(text) => text,
        other => other.to_string(),
    };
    Some(detail.chars().take(MAX_DETAIL_CHARS).collect())
}

/// Errors produced while reaching or decoding the classifier.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Endpoint violates transport policy.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// HTTP client could not be constructed.
    #[error("http client setup failed: {0}")]
    Client(String),
    /// Request exceeded the configured timeout.
    #[error("classifier request timed out")]
    Timeout,
    /// Connection or I/O failure.
    #[error("classifier unreachable: {0}")]
    Network(String),
    /// Non-2xx HTTP status.
    #[error("classifier returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// `detail` field of the error body, when present.
        detail: Option<String>,
    },
    /// Response body violated the classifier contract.
    #[error(transparent)]
    Contract(#[from] ClassifierContractError),
}

impl TransportError {
    /// User-facing category; every transport failure is a network error.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::NetworkError
    }

    fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Network(error.to_string())
        }
    }
}
