// ── Probers ──
//
// A prober answers one question for one identifier: did the host reply
// within the timeout? Probers never retry; retries and the outer hard
// deadline belong to the orchestrator.

mod icmp;
mod tcp;

use std::future::Future;
use std::time::Duration;

use crate::config::ProbeMethod;
use crate::model::ProbeErrorKind;

pub use icmp::IcmpProber;
pub use tcp::TcpProber;

/// A single-shot reachability check.
///
/// Returns `Ok(true)` when a reply arrived within `timeout`, `Ok(false)`
/// when the check completed without a reply, and an error kind when the
/// mechanism could not run or never finished.
pub trait Prober: Send + Sync {
    fn probe(
        &self,
        identifier: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<bool, ProbeErrorKind>> + Send;
}

/// Reject identifiers that cannot name a host, before any socket or
/// process is touched. A leading `-` would be parsed as a `ping` option.
pub fn validate_identifier(identifier: &str) -> Result<(), ProbeErrorKind> {
    if identifier.is_empty()
        || identifier.starts_with('-')
        || identifier.chars().any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(ProbeErrorKind::InvalidIdentifier);
    }
    Ok(())
}

/// The built-in probers, selectable at runtime.
#[derive(Debug, Clone)]
pub enum SystemProber {
    Icmp(IcmpProber),
    Tcp(TcpProber),
}

impl SystemProber {
    pub fn from_method(method: ProbeMethod) -> Self {
        match method {
            ProbeMethod::Icmp => Self::Icmp(IcmpProber::default()),
            ProbeMethod::Tcp { port } => Self::Tcp(TcpProber::new(port)),
        }
    }
}

impl Prober for SystemProber {
    async fn probe(&self, identifier: &str, timeout: Duration) -> Result<bool, ProbeErrorKind> {
        match self {
            Self::Icmp(p) => p.probe(identifier, timeout).await,
            Self::Tcp(p) => p.probe(identifier, timeout).await,
        }
    }
}
