#![forbid(unsafe_code)]

//! Runtime configuration from environment variables.
//!
//! # Environment Variables
//!
//! | Variable | Values | Default |
//! |---|---|---|
//! | `RECFORM_STORE_PATH` | path of the JSON store file | `$XDG_STATE_HOME/recform/records.json` |
//! | `RECFORM_KEY_POLICY` | `legacy` \| `distinct` | `legacy` |
//! | `RECFORM_SCREEN` | `perfil` \| `endereco` \| `cartao` \| `cadastro-plano` \| `plano-loja` | unset |
//! | `RECFORM_LOG` | tracing filter directive | `info` |
//!
//! Invalid values are reported as [`ConfigError`]s and the default is kept.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use recform_store::FileStore;

use crate::screens::{KeyPolicy, Screen};

/// Store file path override.
pub const ENV_STORE_PATH: &str = "RECFORM_STORE_PATH";
/// Record key policy.
pub const ENV_KEY_POLICY: &str = "RECFORM_KEY_POLICY";
/// Screen to open.
pub const ENV_SCREEN: &str = "RECFORM_SCREEN";
/// Log filter directive.
pub const ENV_LOG: &str = "RECFORM_LOG";

/// Application name used for the default store location.
pub const APP_NAME: &str = "recform";

const DEFAULT_LOG_FILTER: &str = "info";

/// One rejected environment value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// Variable name.
    pub var: &'static str,
    /// Rejected value.
    pub value: String,
    /// What was expected.
    pub message: &'static str,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.var, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Parsed configuration plus any rejected values.
#[derive(Debug, Clone)]
pub struct ConfigParse {
    /// Effective configuration.
    pub config: RecformConfig,
    /// Values that were ignored.
    pub errors: Vec<ConfigError>,
}

/// Configuration of a recform session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecformConfig {
    /// Explicit store file; `None` uses the default location.
    pub store_path: Option<PathBuf>,
    /// How screens map to record keys.
    pub key_policy: KeyPolicy,
    /// Screen to open, if chosen by the environment.
    pub screen: Option<Screen>,
    /// Tracing filter directive.
    pub log_filter: String,
}

impl Default for RecformConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            key_policy: KeyPolicy::default(),
            screen: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl RecformConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> ConfigParse {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Read configuration through a custom lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(mut get: F) -> ConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let mut errors = Vec::new();

        if let Some(value) = get(ENV_STORE_PATH) {
            if value.trim().is_empty() {
                errors.push(ConfigError {
                    var: ENV_STORE_PATH,
                    value,
                    message: "expected a non-empty path",
                });
            } else {
                config.store_path = Some(PathBuf::from(value));
            }
        }

        if let Some(value) = get(ENV_KEY_POLICY) {
            match KeyPolicy::parse(&value) {
                Some(policy) => config.key_policy = policy,
                None => errors.push(ConfigError {
                    var: ENV_KEY_POLICY,
                    value,
                    message: "expected legacy|distinct",
                }),
            }
        }

        if let Some(value) = get(ENV_SCREEN) {
            match Screen::parse(&value) {
                Some(screen) => config.screen = Some(screen),
                None => errors.push(ConfigError {
                    var: ENV_SCREEN,
                    value,
                    message: "expected perfil|endereco|cartao|cadastro-plano|plano-loja",
                }),
            }
        }

        if let Some(value) = get(ENV_LOG)
            && !value.trim().is_empty()
        {
            config.log_filter = value;
        }

        ConfigParse { config, errors }
    }

    /// Set the store file.
    #[must_use]
    pub fn with_store_path(mut self, path: impl AsRef<Path>) -> Self {
        self.store_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the key policy.
    #[must_use]
    pub fn with_key_policy(mut self, policy: KeyPolicy) -> Self {
        self.key_policy = policy;
        self
    }

    /// Set the screen.
    #[must_use]
    pub fn with_screen(mut self, screen: Screen) -> Self {
        self.screen = Some(screen);
        self
    }

    /// Set the log filter.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// The file store this configuration points at.
    #[must_use]
    pub fn file_store(&self) -> FileStore {
        match &self.store_path {
            Some(path) => FileStore::new(path),
            None => FileStore::default_for_app(APP_NAME),
        }
    }
}
