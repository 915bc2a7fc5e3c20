#![warn(missing_docs)]
//! # pishai binary
//!
//! Command-line front end for the URL and email checkers.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use pishai_app::config::{Overrides, PishaiConfig};
use pishai_app::logging::init_logging;
use pishai_app::{
    APP_VERSION, AppError, CheckOutcome, Checker, Dispatch, SESSION_HELP, Session,
    SessionCommand, Settlement, exit_code_for, parse_session_command,
};
use pishai_client::Profile;
use pishai_core::CheckKind;
use pishai_ui::{Theme, render_text};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::sync::mpsc;

#[derive(Debug, Parser)]
#[command(
    name = "pishai",
    version = APP_VERSION,
    about = "Check URLs and email text against the PishAI phishing classifier"
)]
struct Cli {
    /// Config file (default: PISHAI_CONFIG, then the per-user config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Classifier base URL; overrides profile and config.
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// Endpoint profile: dev or prod.
    #[arg(long, global = true)]
    profile: Option<Profile>,
    /// Request timeout in seconds (0 disables).
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    /// Color theme: light or dark.
    #[arg(long, global = true)]
    theme: Option<Theme>,
    /// Print panels as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check one URL.
    Url {
        /// Absolute URL, including http:// or https://.
        url: String,
    },
    /// Check email text from --text, --file, or stdin.
    Email {
        /// Email text inline.
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        /// File holding the email text.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Line-oriented session with both checkers.
    Interactive,
}

/// CLI entry point.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(error) => {
            eprintln!("pishai: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<u8, AppError> {
    let config = PishaiConfig::load(cli.config.as_deref())?.apply(Overrides {
        endpoint: cli.endpoint,
        profile: cli.profile,
        timeout_secs: cli.timeout_secs,
        theme: cli.theme,
    });
    init_logging(config.log_filter.as_deref());
    tracing::debug!(version = APP_VERSION, profile = %config.profile, "starting");
    match &config.source {
        Some(path) => tracing::debug!(path = %path.display(), "loaded config file"),
        None => tracing::debug!("no config file, using defaults"),
    }

    let session = Session::from_config(&config)?;
    let output = Output {
        theme: config.theme,
        json: cli.json,
    };

    match cli.command {
        Command::Url { url } => check_once(session.checker(CheckKind::Url), &url, &output).await,
        Command::Email { text, file } => {
            let body = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => tokio::fs::read_to_string(&path).await?,
                (None, None) => {
                    let mut buffer = String::new();
                    tokio::io::stdin().read_to_string(&mut buffer).await?;
                    buffer
                }
            };
            check_once(session.checker(CheckKind::Email), &body, &output).await
        }
        Command::Interactive => interactive(Arc::new(session), &output).await,
    }
}

struct Output {
    theme: Theme,
    json: bool,
}

impl Output {
    fn show(&self, checker: &Checker) -> Result<(), AppError> {
        let panel = checker.panel(self.theme);
        if self.json {
            println!("{}", serde_json::to_string_pretty(&panel)?);
        } else {
            print!("{}", render_text(&panel));
        }
        Ok(())
    }
}

async fn check_once(checker: &Checker, raw: &str, output: &Output) -> Result<u8, AppError> {
    let outcome = checker.check(raw).await;
    output.show(checker)?;
    Ok(match outcome {
        CheckOutcome::Settled(state) => exit_code_for(&state),
        CheckOutcome::Busy | CheckOutcome::Discarded => 1,
    })
}

async fn interactive(session: Arc<Session>, output: &Output) -> Result<u8, AppError> {
    println!("pishai {APP_VERSION} interactive session; type `help` for commands");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let (settled_tx, mut settled_rx) = mpsc::unbounded_channel::<Settlement>();
    let mut in_flight = 0usize;
    let mut reading = true;

    // After end of input, keep going until running checks have reported.
    while reading || in_flight > 0 {
        tokio::select! {
            Some((kind, outcome)) = settled_rx.recv(), if in_flight > 0 => {
                in_flight -= 1;
                match outcome {
                    CheckOutcome::Discarded => {
                        tracing::debug!(%kind, "dropped response for cleared check");
                    }
                    CheckOutcome::Settled(_) | CheckOutcome::Busy => {
                        output.show(session.checker(kind))?;
                    }
                }
            }
            line = lines.next_line(), if reading => {
                let Some(line) = line? else {
                    reading = false;
                    continue;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_session_command(&line) {
                    Ok(SessionCommand::Check(kind, raw)) => {
                        match session.dispatch(kind, &raw, &settled_tx) {
                            Dispatch::InFlight(_) => {
                                in_flight += 1;
                                output.show(session.checker(kind))?;
                            }
                            Dispatch::Settled(_) => output.show(session.checker(kind))?,
                            Dispatch::Busy => eprintln!(
                                "{kind} check still running; wait or `clear {kind}` first"
                            ),
                        }
                    }
                    Ok(SessionCommand::Clear(kind)) => {
                        let checker = session.checker(kind);
                        checker.clear();
                        output.show(checker)?;
                    }
                    Ok(SessionCommand::Show(kind)) => output.show(session.checker(kind))?,
                    Ok(SessionCommand::Help) => println!("{SESSION_HELP}"),
                    Ok(SessionCommand::Quit) => break,
                    Err(message) => eprintln!("{message}"),
                }
            }
        }
    }

    Ok(0)
}
