#![warn(missing_docs)]
//! # pishai-lifecycle
//!
//! ## Purpose
//! Implements the per-checker request lifecycle state machine.
//!
//! ## Responsibilities
//! - Gate submissions: validate input and refuse to submit while a request is
//!   in flight.
//! - Stamp every outbound request with a monotonically increasing sequence
//!   number.
//! - Apply responses and transport failures only when they match the current
//!   in-flight sequence, discarding stale ones.
//!
//! ## Data flow
//! Front end calls [`RequestCoordinator::submit`] -> receives a
//! [`RequestTicket`] -> performs the network call -> reports back through
//! [`RequestCoordinator::on_response`] or
//! [`RequestCoordinator::on_transport_failure`] with the ticket sequence.
//!
//! ## Ownership and lifetimes
//! The coordinator exclusively owns its [`RequestState`]. It performs no I/O;
//! callers own the transport and the await point.
//!
//! ## Error model
//! Every failure is a state: validation errors land in
//! `Failed(EmptyInput | InvalidUrl)`, transport failures in
//! `Failed(NetworkError)`.
//!
//! ## Example
//! ```rust
//! use pishai_core::CheckKind;
//! use pishai_lifecycle::{RequestCoordinator, RequestState, SubmitOutcome};
//!
//! let mut coordinator = RequestCoordinator::new(CheckKind::Url);
//! let SubmitOutcome::Issued(ticket) = coordinator.submit("https://example.com") else {
//!     unreachable!("idle coordinator accepts valid input");
//! };
//! coordinator.clear();
//! assert!(matches!(coordinator.state(), RequestState::Idle));
//! assert_eq!(ticket.sequence, 1);
//! ```

use pishai_analysis_contract::{AnalysisResult, ClassifierResponse, analyze};
use pishai_core::{CheckKind, CheckRequest, ErrorKind};
use std::fmt;

/// Lifecycle state of one checker instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    /// Nothing submitted, or cleared.
    Idle,
    /// One request is in flight.
    Pending,
    /// Latest request produced a result.
    Succeeded(AnalysisResult),
    /// Latest submission failed locally or remotely.
    Failed(ErrorKind),
}

impl RequestState {
    /// Returns `true` while a request is in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }
}

/// Handle for one outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    /// Sequence number the eventual response must echo.
    pub sequence: u64,
    /// Validated request to send.
    pub request: CheckRequest,
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Moved to `Pending`; the caller must send the ticket's request.
    Issued(RequestTicket),
    /// Input failed validation; state is now `Failed(kind)`.
    Rejected(ErrorKind),
    /// A request is already in flight; nothing changed.
    Busy,
}

/// Whether a reported completion changed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Completion matched the in-flight request and was applied.
    Applied,
    /// Completion belonged to a cleared or superseded request.
    Stale,
}

/// Request lifecycle state machine with explicit legal transitions.
#[derive(Debug, Clone)]
pub struct RequestCoordinator {
    kind: CheckKind,
    state: RequestState,
    last_sequence: u64,
    in_flight: Option<u64>,
    input_echo: Option<String>,
}

impl RequestCoordinator {
    /// Creates an `Idle` coordinator for one checker kind.
    pub fn new(kind: CheckKind) -> Self {
        Self {
            kind,
            state: RequestState::Idle,
            last_sequence: 0,
            in_flight: None,
            input_echo: None,
        }
    }

    /// Returns the checker kind this coordinator serves.
    pub fn kind(&self) -> CheckKind {
        self.kind
    }

    /// Returns current state snapshot.
    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// Returns the sequence of the in-flight request, if any.
    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    /// Returns the trimmed input of the latest accepted submission.
    pub fn input_echo(&self) -> Option<&str> {
        self.input_echo.as_deref()
    }

    /// Returns `true` when a submission would be accepted.
    pub fn can_submit(&self) -> bool {
        !self.state.is_pending()
    }

    /// Validates `raw` and, when legal, moves to `Pending`.
    ///
    /// A no-op returning [`SubmitOutcome::Busy`] while `Pending`. Otherwise any
    /// prior result is dropped before the new outcome is recorded.
    pub fn submit(&mut self, raw: &str) -> SubmitOutcome {
        if self.state.is_pending() {
            tracing::debug!(kind = %self.kind, "submit ignored while request is pending");
            return SubmitOutcome::Busy;
        }

        let request = match CheckRequest::new(self.kind, raw) {
            Ok(request) => request,
            Err(error) => {
                self.input_echo = None;
                self.state = RequestState::Failed(error);
                tracing::info!(kind = %self.kind, %error, "input rejected before submission");
                return SubmitOutcome::Rejected(error);
            }
        };

        self.last_sequence += 1;
        let sequence = self.last_sequence;
        self.in_flight = Some(sequence);
        self.input_echo = Some(request.payload().to_string());
        self.state = RequestState::Pending;
        tracing::info!(
            kind = %self.kind,
            sequence,
            payload = %request.log_safe(),
            "request issued"
        );

        SubmitOutcome::Issued(RequestTicket { sequence, request })
    }

    /// Applies a classifier response for `sequence`.
    ///
    /// Runs score derivation and moves to `Succeeded` when `sequence` is the
    /// in-flight request; otherwise the response is discarded.
    pub fn on_response(&mut self, sequence: u64, response: &ClassifierResponse) -> Resolution {
        if !self.take_in_flight(sequence) {
            return Resolution::Stale;
        }

        let result = analyze(response);
        tracing::info!(
            kind = %self.kind,
            sequence,
            is_safe = result.is_safe,
            risk_level = result.risk_level,
            "request succeeded"
        );
        self.state = RequestState::Succeeded(result);
        Resolution::Applied
    }

    /// Records a transport failure for `sequence`.
    ///
    /// Moves to `Failed(NetworkError)` when `sequence` is the in-flight
    /// request. Never retries.
    pub fn on_transport_failure(&mut self, sequence: u64, cause: impl fmt::Display) -> Resolution {
        if !self.take_in_flight(sequence) {
            return Resolution::Stale;
        }

        tracing::warn!(kind = %self.kind, sequence, %cause, "request failed");
        self.state = RequestState::Failed(ErrorKind::NetworkError);
        Resolution::Applied
    }

    /// Resets to `Idle` from any state, discarding result and input echo.
    ///
    /// An in-flight request is not aborted; its completion will be stale.
    pub fn clear(&mut self) {
        if let Some(sequence) = self.in_flight.take() {
            tracing::debug!(kind = %self.kind, sequence, "cleared while pending");
        }
        self.input_echo = None;
        self.state = RequestState::Idle;
    }

    fn take_in_flight(&mut self, sequence: u64) -> bool {
        if self.in_flight == Some(sequence) && self.state.is_pending() {
            self.in_flight = None;
            return true;
        }

        tracing::debug!(
            kind = %self.kind,
            sequence,
            current = ?self.in_flight,
            "discarding stale completion"
        );
        false
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for lifecycle transitions.

    use super::*;

    fn response(label: &str, confidence: f64) -> ClassifierResponse {
        ClassifierResponse {
            status: None,
            label: label.to_string(),
            confidence,
        }
    }

    fn issue(coordinator: &mut RequestCoordinator, raw: &str) -> RequestTicket {
        match coordinator.submit(raw) {
            SubmitOutcome::Issued(ticket) => ticket,
            other => panic!("expected ticket, got {other:?}"),
        }
    }

    #[test]
    fn submit_while_pending_is_noop() {
        let mut coordinator = RequestCoordinator::new(CheckKind::Email);
        let ticket = issue(&mut coordinator, "hello");

        assert_eq!(coordinator.submit("second"), SubmitOutcome::Busy);
        assert_eq!(coordinator.in_flight(), Some(ticket.sequence));
        assert_eq!(coordinator.input_echo(), Some("hello"));
        assert!(coordinator.state().is_pending());
    }

    #[test]
    fn resubmission_supersedes_previous_sequence() {
        let mut coordinator = RequestCoordinator::new(CheckKind::Url);
        let first = issue(&mut coordinator, "https://one.example");
        coordinator.clear();
        let second = issue(&mut coordinator, "https://two.example");

        assert!(second.sequence > first.sequence);
        assert_eq!(
            coordinator.on_response(first.sequence, &response("safe", 99.0)),
            Resolution::Stale
        );
        assert!(coordinator.state().is_pending());
        assert_eq!(
            coordinator.on_response(second.sequence, &response("safe", 99.0)),
            Resolution::Applied
        );
    }

    #[test]
    fn completion_is_applied_once() {
        let mut coordinator = RequestCoordinator::new(CheckKind::Url);
        let ticket = issue(&mut coordinator, "https://example.com");

        assert_eq!(
            coordinator.on_transport_failure(ticket.sequence, "connection refused"),
            Resolution::Applied
        );
        assert_eq!(
            coordinator.on_response(ticket.sequence, &response("safe", 50.0)),
            Resolution::Stale
        );
        assert_eq!(
            coordinator.state(),
            &RequestState::Failed(ErrorKind::NetworkError)
        );
    }
}
