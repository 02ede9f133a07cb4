// ── Runtime pipeline configuration ──
//
// These types describe *what* to probe and *how*. They carry credential
// data and tuning, but never touch disk. The CLI (via pingboard-config)
// constructs a `PipelineConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use tokio::sync::Semaphore;
use url::Url;

use crate::error::CoreError;

/// Default number of probes in flight.
pub const DEFAULT_CONCURRENCY: usize = 16;
/// Default per-probe timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
/// Default TCP port for the connect probe.
pub const DEFAULT_TCP_PORT: u16 = 80;
/// Default request timeout for the spreadsheet source.
pub const DEFAULT_SHEETS_TIMEOUT: Duration = Duration::from_secs(30);
/// Sheet range read when none is configured.
pub const DEFAULT_SHEETS_RANGE: &str = "Dashboard";

pub use pingboard_sheets::client::DEFAULT_BASE_URL as DEFAULT_SHEETS_BASE_URL;

/// Orchestrator tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    /// Maximum probes in flight (must be >= 1).
    pub concurrency: usize,
    /// Hard limit for a single probe attempt.
    pub per_probe_timeout: Duration,
    /// Extra attempts for endpoints that time out or give no reply.
    pub retries: u32,
    /// Overall budget for the run; unfinished endpoints are recorded as cancelled.
    pub deadline: Option<Duration>,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            per_probe_timeout: DEFAULT_TIMEOUT,
            retries: 0,
            deadline: None,
        }
    }
}

impl ProbeOptions {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.concurrency == 0 {
            return Err(CoreError::Validation {
                field: "concurrency".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.concurrency > Semaphore::MAX_PERMITS {
            return Err(CoreError::Validation {
                field: "concurrency".into(),
                reason: format!("must be at most {}", Semaphore::MAX_PERMITS),
            });
        }
        if self.per_probe_timeout.is_zero() {
            return Err(CoreError::Validation {
                field: "timeout".into(),
                reason: "must be a positive duration".into(),
            });
        }
        if self.deadline.is_some_and(|d| d.is_zero()) {
            return Err(CoreError::Validation {
                field: "deadline".into(),
                reason: "must be a positive duration".into(),
            });
        }
        Ok(())
    }
}

/// Which reachability check to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeMethod {
    /// One ICMP echo request via the system `ping` executable.
    #[default]
    Icmp,
    /// TCP connect to the given port; a refusal still counts as "host answered".
    Tcp { port: u16 },
}

/// Credentials for the spreadsheet source.
#[derive(Debug, Clone, Default)]
pub enum SheetCredentials {
    #[default]
    None,
    ApiKey(SecretString),
    /// Pre-issued OAuth access token.
    BearerToken(SecretString),
}

/// Where the endpoint list comes from.
#[derive(Debug, Clone)]
pub enum SourceConfig {
    Sheets {
        base_url: Url,
        spreadsheet_id: String,
        range: String,
        credentials: SheetCredentials,
        timeout: Duration,
    },
    File {
        path: PathBuf,
    },
}

/// Everything needed to build a probing pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub source: SourceConfig,
    pub method: ProbeMethod,
    pub probe: ProbeOptions,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ProbeOptions::default().validate().is_ok());
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let opts = ProbeOptions {
            concurrency: 0,
            ..ProbeOptions::default()
        };
        let err = opts.validate().unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "concurrency"));
    }

    #[test]
    fn concurrency_beyond_semaphore_limit_is_rejected() {
        let opts = ProbeOptions {
            concurrency: usize::MAX,
            ..ProbeOptions::default()
        };
        let err = opts.validate().unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "concurrency"));

        let opts = ProbeOptions {
            concurrency: Semaphore::MAX_PERMITS,
            ..ProbeOptions::default()
        };
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let opts = ProbeOptions {
            per_probe_timeout: Duration::ZERO,
            ..ProbeOptions::default()
        };
        assert!(opts.validate().is_err());
    }
}
