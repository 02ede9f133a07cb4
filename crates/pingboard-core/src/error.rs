// ── Core error types ──
//
// Terminal errors from pingboard-core. Per-endpoint probe failures are
// NOT errors at this level; they are absorbed into `ProbeOutcome`
// records (see `model::ProbeErrorKind`). Only a broken endpoint source,
// a failed render, or invalid configuration stop a run.

use std::path::PathBuf;

use thiserror::Error;

/// Why an endpoint source could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFailure {
    /// Credentials were rejected.
    Auth,
    /// The request did not finish in time.
    Timeout,
    /// Anything else: missing file, network, bad response.
    #[default]
    Unavailable,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Source errors ────────────────────────────────────────────────
    #[error("Endpoint source unavailable ({origin}): {reason}")]
    SourceUnavailable {
        origin: String,
        cause: SourceFailure,
        reason: String,
    },

    // ── Render errors ────────────────────────────────────────────────
    #[error("Report rendering failed: {message}")]
    Render { message: String },

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    Validation { field: String, reason: String },
}

// ── Conversion from the sheets client ────────────────────────────────

impl From<pingboard_sheets::Error> for CoreError {
    fn from(err: pingboard_sheets::Error) -> Self {
        tracing::debug!(status = ?err.status(), error = %err, "spreadsheet request failed");
        let (origin, cause) = match err {
            pingboard_sheets::Error::Authentication { .. } => ("spreadsheet", SourceFailure::Auth),
            pingboard_sheets::Error::Transport(ref e) if e.is_timeout() => {
                ("spreadsheet", SourceFailure::Timeout)
            }
            pingboard_sheets::Error::NotFound { .. } => {
                ("spreadsheet (not found)", SourceFailure::Unavailable)
            }
            pingboard_sheets::Error::Deserialization { .. } => {
                ("spreadsheet (malformed response)", SourceFailure::Unavailable)
            }
            pingboard_sheets::Error::InvalidUrl(_) | pingboard_sheets::Error::UnusableBaseUrl(_) => {
                ("spreadsheet (bad URL)", SourceFailure::Unavailable)
            }
            pingboard_sheets::Error::Transport(_) | pingboard_sheets::Error::Api { .. } => {
                ("spreadsheet", SourceFailure::Unavailable)
            }
        };
        CoreError::SourceUnavailable {
            origin: origin.into(),
            cause,
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheets_errors_become_source_unavailable() {
        let err: CoreError = pingboard_sheets::Error::Api {
            status: 500,
            message: "boom".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Endpoint source unavailable (spreadsheet): Sheets API error (HTTP 500): boom"
        );
        assert!(matches!(
            err,
            CoreError::SourceUnavailable {
                cause: SourceFailure::Unavailable,
                ..
            }
        ));
    }

    #[test]
    fn rejected_credentials_are_tagged_auth() {
        let err: CoreError = pingboard_sheets::Error::Authentication {
            status: 403,
            message: "API key not valid".into(),
        }
        .into();
        assert!(matches!(
            err,
            CoreError::SourceUnavailable {
                cause: SourceFailure::Auth,
                ..
            }
        ));
    }
}
