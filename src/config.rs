//! Engine configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! Configuration is loaded once at startup and handed to the dispatcher; nothing in the
//! request path reads the environment.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_JAVA_COMPILE_TIMEOUT_MS, DEFAULT_LOG_FILTER, DEFAULT_MAX_OUTPUT_BYTES,
    DEFAULT_NATIVE_COMPILE_TIMEOUT_MS, DEFAULT_RUN_TIMEOUT_MS, modes,
};

/// Backend that handles execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Local subprocesses with timeouts and the source denylist
    #[default]
    LocalSecure,
    /// Containerized execution (not implemented)
    Docker,
    /// External Judge0 service (not implemented)
    Judge0,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::LocalSecure => modes::LOCAL_SECURE,
            ExecutionMode::Docker => modes::DOCKER,
            ExecutionMode::Judge0 => modes::JUDGE0,
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            modes::LOCAL_SECURE => Ok(ExecutionMode::LocalSecure),
            modes::DOCKER => Ok(ExecutionMode::Docker),
            modes::JUDGE0 => Ok(ExecutionMode::Judge0),
            _ => Err(ConfigError::InvalidValue("EXECUTION_MODE".to_string())),
        }
    }
}

/// Wall-clock bounds and capture limits applied to every invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Run phase, every language
    pub run_timeout: Duration,
    /// gcc / g++
    pub native_compile_timeout: Duration,
    /// javac
    pub java_compile_timeout: Duration,
    /// Bytes kept per captured stream
    pub max_output_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            run_timeout: Duration::from_millis(DEFAULT_RUN_TIMEOUT_MS),
            native_compile_timeout: Duration::from_millis(DEFAULT_NATIVE_COMPILE_TIMEOUT_MS),
            java_compile_timeout: Duration::from_millis(DEFAULT_JAVA_COMPILE_TIMEOUT_MS),
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

/// Main engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub mode: ExecutionMode,
    pub limits: Limits,
    /// Parent directory for isolation scopes; system temp dir when unset
    pub scope_root: Option<PathBuf>,
    pub rust_log: String,
    /// Emit logs as JSON lines (`LOG_FORMAT=json`)
    pub log_json: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::default(),
            limits: Limits::default(),
            scope_root: None,
            rust_log: DEFAULT_LOG_FILTER.to_string(),
            log_json: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = match lookup("EXECUTION_MODE") {
            Some(value) => value.parse()?,
            None => ExecutionMode::default(),
        };

        let limits = Limits {
            run_timeout: Duration::from_millis(parse_or(
                &lookup,
                "RUN_TIMEOUT_MS",
                DEFAULT_RUN_TIMEOUT_MS,
            )?),
            native_compile_timeout: Duration::from_millis(parse_or(
                &lookup,
                "NATIVE_COMPILE_TIMEOUT_MS",
                DEFAULT_NATIVE_COMPILE_TIMEOUT_MS,
            )?),
            java_compile_timeout: Duration::from_millis(parse_or(
                &lookup,
                "JAVA_COMPILE_TIMEOUT_MS",
                DEFAULT_JAVA_COMPILE_TIMEOUT_MS,
            )?),
            max_output_bytes: parse_or(&lookup, "MAX_OUTPUT_BYTES", DEFAULT_MAX_OUTPUT_BYTES)?,
        };

        if limits.run_timeout.is_zero() {
            return Err(ConfigError::InvalidValue("RUN_TIMEOUT_MS".to_string()));
        }

        Ok(Self {
            mode,
            limits,
            scope_root: lookup("SCOPE_ROOT")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            log_json: lookup("LOG_FORMAT").is_some_and(|v| v.trim().eq_ignore_ascii_case("json")),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
