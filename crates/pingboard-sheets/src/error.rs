use thiserror::Error;

/// Top-level error type for the `pingboard-sheets` crate.
///
/// `pingboard-core` folds every variant into a single "source unavailable"
/// condition, but the distinctions are kept here for diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The API rejected the key or token (HTTP 401/403).
    #[error("Authentication failed (HTTP {status}): {message}")]
    Authentication { status: u16, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL cannot carry path segments (e.g. `data:` URLs).
    #[error("Base URL cannot be used for API requests: {0}")]
    UnusableBaseUrl(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Spreadsheet or range does not exist.
    #[error("Spreadsheet range not found: {spreadsheet_id}/{range}")]
    NotFound {
        spreadsheet_id: String,
        range: String,
    },

    /// Any other non-success status, with the message from the error envelope.
    #[error("Sheets API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status code, if the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } | Self::Api { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
