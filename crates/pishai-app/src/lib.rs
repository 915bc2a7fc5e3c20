#![warn(missing_docs)]
//! # pishai-app
//!
//! ## Purpose
//! Orchestrates validation, the request lifecycle, the classifier transport,
//! and presentation for the `pishai` front end.
//!
//! ## Responsibilities
//! - Wrap one coordinator and one transport per checker ([`Checker`]).
//! - Hold the two independent checkers of a session ([`Session`]).
//! - Parse interactive session commands and map states to exit codes.
//! - Load configuration ([`config`]) and install logging ([`logging`]).
//!
//! ## Data flow
//! Raw input -> [`Checker::start`] (validation, coordinator submit) ->
//! [`Checker::complete`] (transport await, coordinator completion) ->
//! [`Checker::panel`] for rendering. [`Session::dispatch`] runs the second
//! half on a spawned task so a front end stays responsive while pending.
//!
//! ## Ownership and lifetimes
//! A checker owns its coordinator behind a mutex that is never held across the
//! network await, so [`Checker::clear`] stays callable while a check runs.
//!
//! ## Error model
//! Check failures are states, not errors. [`AppError`] covers the ambient
//! failures of the binary (config, transport setup, input reading, output).
//!
//! ## Security and privacy notes
//! Requests are logged only through [`pishai_core::CheckRequest::log_safe`].

pub mod config;
pub mod logging;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pishai_client::{ClassifierTransport, HttpClassifierTransport, TransportError};
use pishai_core::{CheckKind, ErrorKind};
use pishai_lifecycle::{
    RequestCoordinator, RequestState, RequestTicket, Resolution, SubmitOutcome,
};
use pishai_ui::{CheckerPanel, Theme, project};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::{ConfigError, PishaiConfig};

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("PISHAI_VERSION");

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// What a call to [`Checker::check`] ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The submission settled; carries the resulting state.
    Settled(RequestState),
    /// A request was already in flight; nothing was sent.
    Busy,
    /// The checker was cleared or resubmitted before the response arrived.
    Discarded,
}

/// One checker instance: coordinator plus transport.
pub struct Checker {
    coordinator: Mutex<RequestCoordinator>,
    transport: Arc<dyn ClassifierTransport>,
}

impl Checker {
    /// Creates an idle checker.
    pub fn new(kind: CheckKind, transport: Arc<dyn ClassifierTransport>) -> Self {
        Self {
            coordinator: Mutex::new(RequestCoordinator::new(kind)),
            transport,
        }
    }

    /// Returns the checker kind.
    pub fn kind(&self) -> CheckKind {
        self.lock().kind()
    }

    /// Returns a snapshot of the lifecycle state.
    pub fn state(&self) -> RequestState {
        self.lock().state().clone()
    }

    /// Projects the current state for rendering.
    pub fn panel(&self, theme: Theme) -> CheckerPanel {
        project(&self.lock(), theme)
    }

    /// Validates `raw`, sends it, and applies the response.
    ///
    /// Validation failures settle immediately without a network call.
    pub async fn check(&self, raw: &str) -> CheckOutcome {
        match self.start(raw) {
            SubmitOutcome::Issued(ticket) => self.complete(ticket).await,
            SubmitOutcome::Rejected(error) => CheckOutcome::Settled(RequestState::Failed(error)),
            SubmitOutcome::Busy => CheckOutcome::Busy,
        }
    }

    /// Runs the synchronous half of a check: validation and the move to
    /// `Pending`. An issued ticket must be passed to [`Checker::complete`].
    pub fn start(&self, raw: &str) -> SubmitOutcome {
        self.lock().submit(raw)
    }

    /// Sends an issued ticket and applies whatever comes back.
    pub async fn complete(&self, ticket: RequestTicket) -> CheckOutcome {
        let reply = self.transport.classify(&ticket.request).await;

        let mut coordinator = self.lock();
        let resolution = match &reply {
            Ok(response) => {
                if !response.confidence_in_range() {
                    tracing::warn!(
                        kind = %coordinator.kind(),
                        confidence = response.confidence,
                        "classifier confidence out of range, clamping"
                    );
                }
                coordinator.on_response(ticket.sequence, response)
            }
            Err(error) => coordinator.on_transport_failure(ticket.sequence, error),
        };

        match resolution {
            Resolution::Applied => CheckOutcome::Settled(coordinator.state().clone()),
            Resolution::Stale => CheckOutcome::Discarded,
        }
    }

    /// Resets to idle; a running check's response will be discarded.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, RequestCoordinator> {
        self.coordinator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// The URL and email checkers of one front-end session.
pub struct Session {
    url: Checker,
    email: Checker,
}

impl Session {
    /// Creates both checkers over a shared transport.
    pub fn new(transport: Arc<dyn ClassifierTransport>) -> Self {
        Self {
            url: Checker::new(CheckKind::Url, Arc::clone(&transport)),
            email: Checker::new(CheckKind::Email, transport),
        }
    }

    /// Builds a session talking HTTP to the configured endpoint.
    ///
    /// # Errors
    /// Returns [`AppError::Transport`] when the endpoint violates transport
    /// policy or the HTTP client cannot be built.
    pub fn from_config(config: &PishaiConfig) -> Result<Self, AppError> {
        let transport =
            HttpClassifierTransport::new(config.resolved_endpoint(), config.timeout())?;
        tracing::info!(
            endpoint = %transport.endpoint(),
            timeout_secs = config.timeout_secs,
            "classifier transport ready"
        );
        Ok(Self::new(Arc::new(transport)))
    }

    /// Returns the checker for `kind`.
    pub fn checker(&self, kind: CheckKind) -> &Checker {
        match kind {
            CheckKind::Url => &self.url,
            CheckKind::Email => &self.email,
        }
    }

    /// Submits `raw` to one checker without waiting for the classifier.
    ///
    /// Validation and the move to `Pending` happen before this returns, so
    /// the caller can render the busy panel at once. The network leg runs on
    /// a spawned task that reports `(kind, outcome)` on `settled` exactly
    /// once, [`CheckOutcome::Discarded`] included.
    pub fn dispatch(
        self: &Arc<Self>,
        kind: CheckKind,
        raw: &str,
        settled: &mpsc::UnboundedSender<Settlement>,
    ) -> Dispatch {
        let ticket = match self.checker(kind).start(raw) {
            SubmitOutcome::Issued(ticket) => ticket,
            SubmitOutcome::Rejected(error) => {
                return Dispatch::Settled(RequestState::Failed(error));
            }
            SubmitOutcome::Busy => return Dispatch::Busy,
        };

        let session = Arc::clone(self);
        let settled = settled.clone();
        Dispatch::InFlight(tokio::spawn(async move {
            let outcome = session.checker(kind).complete(ticket).await;
            // The receiver is gone only when the front end has quit.
            let _ = settled.send((kind, outcome));
        }))
    }
}

/// Completion report of a dispatched check.
pub type Settlement = (CheckKind, CheckOutcome);

/// What [`Session::dispatch`] did with a submission.
#[derive(Debug)]
pub enum Dispatch {
    /// Request sent; the task reports on the settlement channel.
    InFlight(JoinHandle<()>),
    /// Input rejected locally; nothing was sent.
    Settled(RequestState),
    /// That checker already has a request in flight; nothing was sent.
    Busy,
}

/// One line of input in an interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Submit text to a checker.
    Check(CheckKind, String),
    /// Reset a checker.
    Clear(CheckKind),
    /// Show a checker's current panel.
    Show(CheckKind),
    /// Print command help.
    Help,
    /// End the session.
    Quit,
}

/// Help text for interactive sessions.
pub const SESSION_HELP: &str = "commands:
  url <URL>        check a URL
  email <TEXT>     check email text
  clear url|email  reset a checker
  show url|email   print a checker's current state
  help             show this help
  quit             leave";

/// Parses one interactive line.
///
/// # Errors
/// Returns a short usage message for unknown commands or checker names.
pub fn parse_session_command(line: &str) -> Result<SessionCommand, String> {
    let line = line.trim();
    let (head, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(head, rest)| (head, rest.trim()));

    match head.to_ascii_lowercase().as_str() {
        "url" => Ok(SessionCommand::Check(CheckKind::Url, rest.to_string())),
        "email" => Ok(SessionCommand::Check(CheckKind::Email, rest.to_string())),
        "clear" => parse_checker_name(rest).map(SessionCommand::Clear),
        "show" => parse_checker_name(rest).map(SessionCommand::Show),
        "help" | "?" => Ok(SessionCommand::Help),
        "quit" | "exit" => Ok(SessionCommand::Quit),
        "" => Err("empty command; type `help`".to_string()),
        other => Err(format!("unknown command `{other}`; type `help`")),
    }
}

fn parse_checker_name(name: &str) -> Result<CheckKind, String> {
    match name.to_ascii_lowercase().as_str() {
        "url" => Ok(CheckKind::Url),
        "email" => Ok(CheckKind::Email),
        other => Err(format!("unknown checker `{other}` (expected url or email)")),
    }
}

/// Process exit code for a one-shot check.
///
/// `0` rendered verdict, `2` invalid input, `3` service unreachable, `1`
/// anything else.
pub fn exit_code_for(state: &RequestState) -> u8 {
    match state {
        RequestState::Succeeded(_) => 0,
        RequestState::Failed(ErrorKind::EmptyInput | ErrorKind::InvalidUrl) => 2,
        RequestState::Failed(ErrorKind::NetworkError) => 3,
        RequestState::Idle | RequestState::Pending => 1,
    }
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// Classifier transport could not be set up.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// Reading user input failed.
    #[error("input error: {0}")]
    Input(#[from] std::io::Error),
    /// Rendering JSON output failed.
    #[error("output error: {0}")]
    Output(#[from] serde_json::Error),
}
