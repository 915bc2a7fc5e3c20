//! Configuration loading: TOML file, then environment, then CLI overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pishai_client::Profile;
use pishai_ui::Theme;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Env var naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "PISHAI_CONFIG";
/// Env var overriding the classifier endpoint.
pub const ENDPOINT_ENV: &str = "PISHAI_ENDPOINT";
/// Env var overriding the request timeout in seconds.
pub const TIMEOUT_SECS_ENV: &str = "PISHAI_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration, usually read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PishaiConfig {
    /// Deployment profile providing the default endpoint.
    pub profile: Profile,
    /// Explicit endpoint; wins over the profile default.
    pub endpoint: Option<String>,
    /// Per-request timeout in seconds; `0` disables it.
    pub timeout_secs: u64,
    /// Presentation theme.
    pub theme: Theme,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
    /// File the settings were read from; `None` when only defaults apply.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for PishaiConfig {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            endpoint: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            theme: Theme::default(),
            log_filter: None,
            source: None,
        }
    }
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// `--endpoint`
    pub endpoint: Option<String>,
    /// `--profile`
    pub profile: Option<Profile>,
    /// `--timeout-secs`
    pub timeout_secs: Option<u64>,
    /// `--theme`
    pub theme: Option<Theme>,
}

impl PishaiConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys.
    pub fn from_toml_str(raw: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Loads configuration using the process environment.
    ///
    /// # Errors
    /// See [`PishaiConfig::load_with`].
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(explicit, |key| std::env::var(key).ok())
    }

    /// Loads configuration with an injectable environment lookup.
    ///
    /// File resolution: `explicit`, then `PISHAI_CONFIG`, then the per-user
    /// default path if it exists, else built-in defaults. Env overrides are
    /// applied on top of the file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Read`] when a named file cannot be read,
    /// [`ConfigError::Parse`] for bad TOML, and [`ConfigError::InvalidValue`]
    /// for unusable env overrides.
    pub fn load_with<F>(explicit: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let named = explicit
            .map(Path::to_path_buf)
            .or_else(|| env(CONFIG_PATH_ENV).map(PathBuf::from));

        let mut config = match named {
            Some(path) => read_file(&path)?,
            None => match default_config_path().filter(|path| path.is_file()) {
                Some(path) => read_file(&path)?,
                None => Self::default(),
            },
        };

        if let Some(endpoint) = env(ENDPOINT_ENV).filter(|value| !value.trim().is_empty()) {
            config.endpoint = Some(endpoint.trim().to_string());
        }

        if let Some(raw) = env(TIMEOUT_SECS_ENV) {
            config.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: TIMEOUT_SECS_ENV,
                message: format!("expected whole seconds, got `{raw}`"),
            })?;
        }

        Ok(config)
    }

    /// Applies command-line overrides.
    ///
    /// A profile given on the command line drops any endpoint inherited from
    /// file or env unless an endpoint is passed alongside it.
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(profile) = overrides.profile {
            self.profile = profile;
            self.endpoint = None;
        }
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint = Some(endpoint);
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if let Some(theme) = overrides.theme {
            self.theme = theme;
        }
        self
    }

    /// Endpoint to use: explicit one, else the profile default.
    pub fn resolved_endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.profile.default_endpoint())
    }

    /// Request timeout, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Per-user config file location (`<config_dir>/pishai/config.toml`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pishai").join("config.toml"))
}

fn read_file(path: &Path) -> Result<PishaiConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config = PishaiConfig::from_toml_str(&raw, path)?;
    config.source = Some(path.to_path_buf());
    Ok(config)
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Config file is not valid TOML for [`PishaiConfig`].
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
    /// An override value could not be used.
    #[error("invalid value for {key}: {message}")]
    InvalidValue {
        /// Setting name.
        key: &'static str,
        /// What was wrong.
        message: String,
    },
}
