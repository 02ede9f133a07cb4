use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::Endpoint;

/// Why a probe did not produce a plain yes/no answer.
///
/// Recorded per endpoint; never aborts a batch.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProbeErrorKind {
    /// The probing mechanism itself could not run (missing executable, no privilege).
    ProbeUnavailable,
    /// No answer within the per-probe timeout.
    Timeout,
    /// The run was cancelled or hit its deadline before this endpoint finished.
    Cancelled,
    /// The identifier was rejected before probing (empty, whitespace, option-like).
    InvalidIdentifier,
}

impl ProbeErrorKind {
    /// Whether another attempt could plausibly give a different answer.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Timeout)
    }
}

/// Result of probing one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub endpoint: Endpoint,
    pub reachable: bool,
    pub error: Option<ProbeErrorKind>,
    pub observed_at: DateTime<Utc>,
    /// Probe attempts made (0 if the endpoint was never dispatched).
    pub attempts: u32,
    /// Wall time spent on this endpoint, in milliseconds.
    pub elapsed_ms: u64,
}

impl ProbeOutcome {
    /// Build an outcome from a prober result.
    pub fn from_result(
        endpoint: Endpoint,
        result: Result<bool, ProbeErrorKind>,
        attempts: u32,
        elapsed: Duration,
    ) -> Self {
        let (reachable, error) = match result {
            Ok(reachable) => (reachable, None),
            Err(kind) => (false, Some(kind)),
        };
        Self {
            endpoint,
            reachable,
            error,
            observed_at: Utc::now(),
            attempts,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Outcome for an endpoint whose probe never finished.
    pub fn cancelled(endpoint: Endpoint) -> Self {
        Self::from_result(endpoint, Err(ProbeErrorKind::Cancelled), 0, Duration::ZERO)
    }

    /// Short status word for display: `up`, `down`, or the error kind.
    pub fn status_label(&self) -> &str {
        match (self.reachable, &self.error) {
            (true, _) => "up",
            (false, None) => "down",
            (false, Some(kind)) => kind.as_ref(),
        }
    }
}
