#![warn(missing_docs)]
//! # pishai-core
//!
//! ## Purpose
//! Defines the pure data model shared across the `pishai` workspace.
//!
//! ## Responsibilities
//! - Represent the two check kinds (URL, email) and their wire endpoints.
//! - Validate raw user input before any network call is made.
//! - Own the user-facing error taxonomy ([`ErrorKind`]).
//! - Render log-safe summaries of user payloads.
//!
//! ## Data flow
//! Raw text from the front end -> [`validate`] -> [`CheckRequest`] handed to the
//! request coordinator and, from there, to the classifier transport.
//!
//! ## Ownership and lifetimes
//! Requests own their payload (`String`) so they can outlive the input buffer
//! and cross the await point of the outbound call.
//!
//! ## Error model
//! Validation returns [`ErrorKind::EmptyInput`] or [`ErrorKind::InvalidUrl`].
//! [`ErrorKind::NetworkError`] is produced further downstream but lives here so
//! every layer shares one taxonomy.
//!
//! ## Security and privacy notes
//! Payloads are user content (often full email bodies). Use
//! [`CheckRequest::log_safe`] whenever a request must appear in logs.
//!
//! ## Example
//! ```rust
//! use pishai_core::{CheckKind, ErrorKind, validate};
//!
//! assert_eq!(validate(CheckKind::Url, "  https://example.com  ").unwrap(), "https://example.com");
//! assert_eq!(validate(CheckKind::Url, "example.com"), Err(ErrorKind::InvalidUrl));
//! assert_eq!(validate(CheckKind::Email, "   "), Err(ErrorKind::EmptyInput));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use url::Url;

/// Classifier path for URL checks.
pub const URL_PREDICT_PATH: &str = "/predict/url";

/// Classifier path for email text checks.
pub const EMAIL_PREDICT_PATH: &str = "/predict/email";

const FINGERPRINT_HEX_LEN: usize = 12;

/// Which checker a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    /// A single absolute URL.
    Url,
    /// Free-form email text (headers and/or body).
    Email,
}

impl CheckKind {
    /// Returns the classifier path serving this kind.
    pub fn predict_path(self) -> &'static str {
        match self {
            CheckKind::Url => URL_PREDICT_PATH,
            CheckKind::Email => EMAIL_PREDICT_PATH,
        }
    }

    /// Returns the lowercase kind name used in logs and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            CheckKind::Url => "url",
            CheckKind::Email => "email",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated check submission.
///
/// Only constructible through [`CheckRequest::new`], so holding one proves the
/// payload passed [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    kind: CheckKind,
    payload: String,
}

impl CheckRequest {
    /// Validates raw input and builds a request from it.
    ///
    /// # Errors
    /// Propagates [`validate`] failures.
    pub fn new(kind: CheckKind, raw: &str) -> Result<Self, ErrorKind> {
        let payload = validate(kind, raw)?;
        Ok(Self { kind, payload })
    }

    /// Returns the check kind.
    pub fn kind(&self) -> CheckKind {
        self.kind
    }

    /// Returns the trimmed, validated payload.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Renders the request without leaking user content.
    ///
    /// URLs keep scheme, host, port, and path. Email text is reduced to its
    /// length and a short SHA-256 fingerprint.
    pub fn log_safe(&self) -> String {
        match self.kind {
            CheckKind::Url => log_safe_url(&self.payload),
            CheckKind::Email => format!(
                "email len={} sha256={}",
                self.payload.chars().count(),
                fingerprint(&self.payload)
            ),
        }
    }
}

/// Validates raw user input for the given check kind.
///
/// Returns the trimmed payload on success.
///
/// # Errors
/// - [`ErrorKind::EmptyInput`] when the input is blank after trimming.
/// - [`ErrorKind::InvalidUrl`] for URL checks whose input is not an absolute
///   URI with both a scheme and a host.
pub fn validate(kind: CheckKind, raw: &str) -> Result<String, ErrorKind> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ErrorKind::EmptyInput);
    }

    if kind == CheckKind::Url && !is_absolute_url_with_host(trimmed) {
        return Err(ErrorKind::InvalidUrl);
    }

    Ok(trimmed.to_string())
}

fn is_absolute_url_with_host(candidate: &str) -> bool {
    // `example.com` fails with RelativeUrlWithoutBase; `localhost:80` parses
    // with scheme `localhost` and no host.
    Url::parse(candidate)
        .map(|url| url.host_str().is_some_and(|host| !host.is_empty()))
        .unwrap_or(false)
}

fn log_safe_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => {
            let host = url.host_str().unwrap_or_default();
            match url.port() {
                Some(port) => format!("{}://{host}:{port}{}", url.scheme(), url.path()),
                None => format!("{}://{host}{}", url.scheme(), url.path()),
            }
        }
        Err(_) => format!("url sha256={}", fingerprint(raw)),
    }
}

fn fingerprint(raw: &str) -> String {
    let digest = Sha256::digest(raw.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(FINGERPRINT_HEX_LEN);
    encoded
}

/// User-facing failure taxonomy shared by every checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input was blank after trimming.
    #[error("input is empty")]
    EmptyInput,
    /// URL input was not an absolute URI with scheme and host.
    #[error("input is not an absolute URL")]
    InvalidUrl,
    /// The classification service could not be reached or answered badly.
    #[error("classification service unavailable")]
    NetworkError,
}

impl ErrorKind {
    /// Returns `true` for local validation failures.
    pub fn is_input_error(self) -> bool {
        matches!(self, ErrorKind::EmptyInput | ErrorKind::InvalidUrl)
    }
}
