//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use pingboard_config::ConfigError;
use pingboard_core::{CoreError, SourceFailure};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const SOURCE_UNAVAILABLE: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Endpoint source ──────────────────────────────────────────────

    #[error("Could not read endpoints from {origin}")]
    #[diagnostic(
        code(pingboard::source_unavailable),
        help(
            "{reason}\n\
             Check the spreadsheet id and range, or use --source-file <path>."
        )
    )]
    SourceUnavailable { origin: String, reason: String },

    #[error("Spreadsheet request timed out")]
    #[diagnostic(
        code(pingboard::source_timeout),
        help("{reason}\nRaise source.timeout in the config file.")
    )]
    SourceTimeout { reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Spreadsheet access was denied")]
    #[diagnostic(
        code(pingboard::auth_failed),
        help(
            "{reason}\n\
             Pass --api-key, set source.api_key_env, or store a key in the system keyring \
             (service 'pingboard', account '<spreadsheet_id>/api-key')."
        )
    )]
    AuthFailed { reason: String },

    #[error("No credentials available: {reason}")]
    #[diagnostic(
        code(pingboard::no_credentials),
        help("Export the named environment variable or remove it from the config file.")
    )]
    NoCredentials { reason: String },

    // ── Report ───────────────────────────────────────────────────────

    #[error("Report rendering failed: {message}")]
    #[diagnostic(code(pingboard::render))]
    Render { message: String },

    #[error("Could not write {}", path.display())]
    #[diagnostic(
        code(pingboard::write_failed),
        help("Check that the output directory is writable, or pass --out-dir.")
    )]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(pingboard::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration file not found: {}", path.display())]
    #[diagnostic(
        code(pingboard::no_config),
        help("Create one with: pingboard config init --config <path>")
    )]
    NoConfig { path: PathBuf },

    #[error(transparent)]
    #[diagnostic(code(pingboard::config))]
    Config(Box<ConfigError>),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not serialize output: {message}")]
    #[diagnostic(code(pingboard::serialize))]
    Serialization { message: String },
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SourceUnavailable { .. } => exit_code::SOURCE_UNAVAILABLE,
            Self::SourceTimeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Validation { .. } | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SourceUnavailable {
                cause: SourceFailure::Auth,
                reason,
                ..
            } => CliError::AuthFailed { reason },
            CoreError::SourceUnavailable {
                cause: SourceFailure::Timeout,
                reason,
                ..
            } => CliError::SourceTimeout { reason },
            CoreError::SourceUnavailable {
                origin,
                cause: SourceFailure::Unavailable,
                reason,
            } => CliError::SourceUnavailable { origin, reason },
            CoreError::Render { message } => CliError::Render { message },
            CoreError::Io { path, source } => CliError::WriteFailed { path, source },
            CoreError::Validation { field, reason } => CliError::Validation { field, reason },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { reason } => CliError::NoCredentials { reason },
            other => CliError::Config(Box::new(other)),
        }
    }
}
