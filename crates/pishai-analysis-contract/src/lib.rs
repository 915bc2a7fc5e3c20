#![warn(missing_docs)]
//! # pishai-analysis-contract
//!
//! ## Purpose
//! Defines the classifier response schema and the deterministic transform that
//! turns a `(label, confidence)` verdict into user-facing risk metrics.
//!
//! ## Responsibilities
//! - Parse and validate classifier responses.
//! - Derive security score, trust level, and risk level.
//! - Map risk levels onto threat/recommendation categories.
//!
//! ## Data flow
//! Raw JSON response -> [`parse_classifier_response`] -> [`analyze`] ->
//! [`AnalysisResult`] held by the request coordinator and read by the UI.
//!
//! ## Ownership and lifetimes
//! Parsed values and results are owned structs; results are immutable once
//! produced and are replaced wholesale by the next submission.
//!
//! ## Error model
//! Invalid JSON or contract violations return [`ClassifierContractError`].
//! [`derive`] itself is total and never fails.
//!
//! ## Example
//! ```rust
//! use pishai_analysis_contract::{RiskBand, derive};
//!
//! let result = derive(false, 80.0);
//! assert_eq!((result.security_score, result.trust_level, result.risk_level), (16, 60, 40));
//! assert_eq!(result.band(), RiskBand::Moderate);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Label value (compared case-insensitively) that marks a verdict as safe.
pub const SAFE_LABEL: &str = "safe";

/// Envelope status emitted by the classifier on success.
pub const SUCCESS_STATUS: &str = "success";

/// Upper bound of the confidence percentage scale.
pub const MAX_CONFIDENCE: f64 = 100.0;

const SAFE_SECURITY_BASE: f64 = 60.0;
const UNSAFE_SECURITY_BASE: f64 = 40.0;
const SECURITY_WEIGHT: f64 = 0.3;
const SAFE_TRUST_UPLIFT: f64 = 0.15;
const UNSAFE_TRUST_DISCOUNT: f64 = 0.25;

/// Classifier verdict as received from the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierResponse {
    /// Optional envelope status (`"success"` when present).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Categorical verdict, e.g. `Safe` or `Phishing/Malicious`.
    pub label: String,
    /// Reported certainty as a percentage in `[0, 100]`.
    pub confidence: f64,
}

impl ClassifierResponse {
    /// Returns `true` when the label denotes a safe verdict.
    pub fn is_safe(&self) -> bool {
        is_safe_label(&self.label)
    }

    /// Returns `true` when confidence already lies in `[0, 100]`.
    pub fn confidence_in_range(&self) -> bool {
        (0.0..=MAX_CONFIDENCE).contains(&self.confidence)
    }

    /// Returns confidence clamped to `[0, 100]`.
    pub fn normalized_confidence(&self) -> f64 {
        clamp_confidence(self.confidence)
    }
}

/// Coarse risk category chosen from the derived risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    /// Risk level of 75 or more.
    Critical,
    /// Risk level in `[50, 75)`.
    Warning,
    /// Risk level in `[25, 50)`.
    Moderate,
    /// Risk level below 25.
    Secure,
}

impl RiskBand {
    /// Picks the band for a risk level; thresholds are checked high to low.
    pub fn from_risk_level(risk_level: u8) -> Self {
        match risk_level {
            75..=u8::MAX => RiskBand::Critical,
            50..=74 => RiskBand::Warning,
            25..=49 => RiskBand::Moderate,
            0..=24 => RiskBand::Secure,
        }
    }

    /// Threat message shown for this band.
    pub fn threat(self) -> &'static str {
        match self {
            RiskBand::Critical => "Critical Alert: strong signs of phishing/malicious activity",
            RiskBand::Warning => "Warning: multiple suspicious indicators detected",
            RiskBand::Moderate => "Moderate Risk: unusual domain or tracker detected",
            RiskBand::Secure => "Secure: appears legitimate, minimal risk",
        }
    }

    /// Recommendation message shown for this band.
    pub fn recommendation(self) -> &'static str {
        match self {
            RiskBand::Critical => "Do not proceed; avoid entering credentials",
            RiskBand::Warning => "Avoid logging in or downloading from this site",
            RiskBand::Moderate => "Verify domain spelling and certificate before proceeding",
            RiskBand::Secure => "Continue safely; stay cautious of pop-ups/redirects",
        }
    }
}

/// Presentation-ready metrics derived from one classifier verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Whether the classifier labelled the input safe.
    pub is_safe: bool,
    /// Overall security score in `[0, 100]`.
    pub security_score: u8,
    /// Trust level in `[0, 100]`.
    pub trust_level: u8,
    /// Risk level, always `100 - trust_level`.
    pub risk_level: u8,
    /// Categorized threat messages (at least one).
    pub threats: Vec<String>,
    /// Categorized recommendations (at least one).
    pub recommendations: Vec<String>,
}

impl AnalysisResult {
    /// Returns the band the risk level falls in.
    pub fn band(&self) -> RiskBand {
        RiskBand::from_risk_level(self.risk_level)
    }
}

/// Parses raw JSON into a validated classifier response.
///
/// # Errors
/// Returns [`ClassifierContractError::Decode`] for invalid JSON.
/// Returns [`ClassifierContractError::InvalidContract`] when the confidence is
/// not finite or the envelope status is present but not `success`. Any label,
/// blank included, is accepted; only `safe` counts as a safe verdict.
pub fn parse_classifier_response(raw: &str) -> Result<ClassifierResponse, ClassifierContractError> {
    let parsed: ClassifierResponse =
        serde_json::from_str(raw).map_err(ClassifierContractError::Decode)?;

    if let Some(status) = parsed.status.as_deref()
        && !status.trim().eq_ignore_ascii_case(SUCCESS_STATUS)
    {
        return Err(ClassifierContractError::InvalidContract(format!(
            "unexpected status `{}`",
            status.trim()
        )));
    }

    if !parsed.confidence.is_finite() {
        return Err(ClassifierContractError::InvalidContract(
            "confidence is not a finite number".to_string(),
        ));
    }

    Ok(parsed)
}

/// Returns `true` when `label` is `safe`, ignoring case and surrounding space.
pub fn is_safe_label(label: &str) -> bool {
    label.trim().to_lowercase() == SAFE_LABEL
}

/// Clamps a confidence percentage into `[0, 100]`; NaN maps to `0`.
pub fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        return 0.0;
    }
    confidence.clamp(0.0, MAX_CONFIDENCE)
}

/// Derives metrics from a parsed classifier response.
pub fn analyze(response: &ClassifierResponse) -> AnalysisResult {
    derive(response.is_safe(), response.confidence)
}

/// Derives security score, trust level, risk level, and categories.
///
/// Pure and deterministic. Confidence is clamped into `[0, 100]` first so
/// every score stays inside its range for any input.
pub fn derive(is_safe: bool, confidence: f64) -> AnalysisResult {
    let confidence = clamp_confidence(confidence);

    let (security, trust) = if is_safe {
        (
            SAFE_SECURITY_BASE + confidence * SECURITY_WEIGHT,
            (confidence + (MAX_CONFIDENCE - confidence) * SAFE_TRUST_UPLIFT).min(MAX_CONFIDENCE),
        )
    } else {
        (
            UNSAFE_SECURITY_BASE - confidence * SECURITY_WEIGHT,
            (confidence - confidence * UNSAFE_TRUST_DISCOUNT).max(0.0),
        )
    };

    let security_score = to_score(security);
    let trust_level = to_score(trust);
    // Taken from the rounded trust level so the pair always sums to 100.
    let risk_level = 100 - trust_level;
    let band = RiskBand::from_risk_level(risk_level);

    AnalysisResult {
        is_safe,
        security_score,
        trust_level,
        risk_level,
        threats: vec![band.threat().to_string()],
        recommendations: vec![band.recommendation().to_string()],
    }
}

fn to_score(value: f64) -> u8 {
    value.round().clamp(0.0, MAX_CONFIDENCE) as u8
}

/// Classifier contract errors.
#[derive(Debug, Error)]
pub enum ClassifierContractError {
    /// JSON decode failure.
    #[error("classifier response decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// Parsed payload violates contract invariants.
    #[error("classifier contract violation: {0}")]
    InvalidContract(String),
}
