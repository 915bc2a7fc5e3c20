#![warn(missing_docs)]
//! # pishai-ui
//!
//! ## Purpose
//! Defines the presentation contract for one checker: what a front end shows
//! for each lifecycle state.
//!
//! ## Responsibilities
//! - Project [`RequestState`] into a display-ready [`CheckerPanel`].
//! - Disable the submit action while a request is pending.
//! - Map failures to generic messages that never leak transport internals.
//! - Carry the theme as an explicit value that only affects presentation.
//!
//! ## Data flow
//! [`RequestCoordinator`] snapshot + [`Theme`] -> [`project`] ->
//! [`CheckerPanel`] -> terminal text ([`render_text`]) or JSON.
//!
//! ## Ownership and lifetimes
//! Panels own copies of every string so they can be handed to renderers or
//! serialized without borrowing from the coordinator.
//!
//! ## Error model
//! This crate favors explicit state over recoverable errors; projection is
//! total.
//!
//! ## Security and privacy notes
//! Error views carry only fixed copy chosen by [`ErrorKind`].

use std::fmt::{self, Write as _};
use std::str::FromStr;

use pishai_analysis_contract::{AnalysisResult, RiskBand};
use pishai_core::{CheckKind, ErrorKind};
use pishai_lifecycle::{RequestCoordinator, RequestState};
use serde::{Deserialize, Serialize};

/// Color scheme used by renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark text on light background.
    #[default]
    Light,
    /// Light text on dark background.
    Dark,
}

impl Theme {
    /// Accent color (hex) for a risk band.
    pub fn band_accent(self, band: RiskBand) -> &'static str {
        match (self, band) {
            (Theme::Light, RiskBand::Secure) => "#15803d",
            (Theme::Light, RiskBand::Moderate) => "#b45309",
            (Theme::Light, RiskBand::Warning) => "#c2410c",
            (Theme::Light, RiskBand::Critical) => "#b91c1c",
            (Theme::Dark, RiskBand::Secure) => "#4ade80",
            (Theme::Dark, RiskBand::Moderate) => "#fbbf24",
            (Theme::Dark, RiskBand::Warning) => "#fb923c",
            (Theme::Dark, RiskBand::Critical) => "#f87171",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme `{other}` (expected light or dark)")),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

/// Failure class shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Input was rejected locally.
    InvalidInput,
    /// The classifier could not be reached.
    ServiceUnavailable,
}

/// Verdict rendering for a succeeded request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportView {
    /// Short verdict headline.
    pub verdict: String,
    /// Echo of the checked input, when retained.
    pub input: Option<String>,
    /// Security score in `[0, 100]`.
    pub security_score: u8,
    /// Trust level in `[0, 100]`.
    pub trust_level: u8,
    /// Risk level in `[0, 100]`.
    pub risk_level: u8,
    /// Risk band of the result.
    pub band: RiskBand,
    /// Theme accent for the band.
    pub accent: String,
    /// Threat messages.
    pub threats: Vec<String>,
    /// Recommendations.
    pub recommendations: Vec<String>,
}

/// Body of a checker panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CheckerView {
    /// Waiting for input.
    Idle {
        /// Input prompt.
        prompt: String,
    },
    /// Busy indicator while pending.
    Busy {
        /// Progress text.
        message: String,
    },
    /// Rendered verdict.
    Report(ReportView),
    /// Generic failure notice.
    Error {
        /// Failure class.
        category: ErrorCategory,
        /// User-facing message.
        message: String,
    },
}

/// Display state for one checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckerPanel {
    /// Checker kind.
    pub kind: CheckKind,
    /// Whether the submit action is enabled.
    pub submit_enabled: bool,
    /// Current view body.
    pub view: CheckerView,
}

/// Projects a coordinator snapshot into a panel.
pub fn project(coordinator: &RequestCoordinator, theme: Theme) -> CheckerPanel {
    let kind = coordinator.kind();
    let view = match coordinator.state() {
        RequestState::Idle => CheckerView::Idle {
            prompt: prompt_for(kind).to_string(),
        },
        RequestState::Pending => CheckerView::Busy {
            message: busy_message(kind).to_string(),
        },
        RequestState::Succeeded(result) => CheckerView::Report(report_view(
            result,
            coordinator.input_echo(),
            theme,
        )),
        RequestState::Failed(error) => CheckerView::Error {
            category: error_category(*error),
            message: error_message(*error, kind).to_string(),
        },
    };

    CheckerPanel {
        kind,
        submit_enabled: coordinator.can_submit(),
        view,
    }
}

/// Builds a report view; fields are copied from the result as-is.
pub fn report_view(result: &AnalysisResult, input: Option<&str>, theme: Theme) -> ReportView {
    let band = result.band();
    ReportView {
        verdict: if result.is_safe {
            "Safe".to_string()
        } else {
            "Potentially malicious".to_string()
        },
        input: input.map(str::to_string),
        security_score: result.security_score,
        trust_level: result.trust_level,
        risk_level: result.risk_level,
        band,
        accent: theme.band_accent(band).to_string(),
        threats: result.threats.clone(),
        recommendations: result.recommendations.clone(),
    }
}

/// Groups an error kind for display.
pub fn error_category(error: ErrorKind) -> ErrorCategory {
    if error.is_input_error() {
        ErrorCategory::InvalidInput
    } else {
        ErrorCategory::ServiceUnavailable
    }
}

/// Returns fixed user-facing copy for a failure.
pub fn error_message(error: ErrorKind, kind: CheckKind) -> &'static str {
    match (error, kind) {
        (ErrorKind::EmptyInput, CheckKind::Url) => "Please enter a URL to check.",
        (ErrorKind::EmptyInput, CheckKind::Email) => "Please paste some email content to analyze.",
        (ErrorKind::InvalidUrl, _) => "Enter a full URL including http:// or https://.",
        (ErrorKind::NetworkError, _) => "Could not reach the analysis service. Please try again.",
    }
}

fn prompt_for(kind: CheckKind) -> &'static str {
    match kind {
        CheckKind::Url => "Enter a URL to check",
        CheckKind::Email => "Paste email content to analyze",
    }
}

fn busy_message(kind: CheckKind) -> &'static str {
    match kind {
        CheckKind::Url => "Analyzing URL...",
        CheckKind::Email => "Analyzing email...",
    }
}

/// Renders a panel as plain terminal text.
pub fn render_text(panel: &CheckerPanel) -> String {
    let mut out = String::new();
    match &panel.view {
        CheckerView::Idle { prompt } => {
            let _ = writeln!(out, "[{}] {prompt}", panel.kind);
        }
        CheckerView::Busy { message } => {
            let _ = writeln!(out, "[{}] {message}", panel.kind);
        }
        CheckerView::Error { message, .. } => {
            let _ = writeln!(out, "[{}] {message}", panel.kind);
        }
        CheckerView::Report(report) => {
            let _ = writeln!(out, "[{}] Verdict: {}", panel.kind, report.verdict);
            if let Some(input) = &report.input {
                let _ = writeln!(out, "  Checked:        {}", preview(input));
            }
            let _ = writeln!(out, "  Security score: {}/100", report.security_score);
            let _ = writeln!(out, "  Trust level:    {}%", report.trust_level);
            let _ = writeln!(out, "  Risk level:     {}%", report.risk_level);
            for threat in &report.threats {
                let _ = writeln!(out, "  Threat:         {threat}");
            }
            for recommendation in &report.recommendations {
                let _ = writeln!(out, "  Recommendation: {recommendation}");
            }
        }
    }
    out
}

fn preview(input: &str) -> String {
    const MAX_PREVIEW_CHARS: usize = 72;

    let single_line = input.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= MAX_PREVIEW_CHARS {
        return single_line;
    }
    let truncated: String = single_line.chars().take(MAX_PREVIEW_CHARS).collect();
    format!("{truncated}...")
}
