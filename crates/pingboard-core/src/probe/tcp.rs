// TCP connect probe. Works without ICMP privileges; any answer from the
// host (accept or reset) proves it is up.

use std::io;
use std::time::Duration;

use tokio::net::TcpStream;
use tracing::debug;

use super::{Prober, validate_identifier};
use crate::config::DEFAULT_TCP_PORT;
use crate::model::ProbeErrorKind;

#[derive(Debug, Clone)]
pub struct TcpProber {
    port: u16,
}

impl Default for TcpProber {
    fn default() -> Self {
        Self::new(DEFAULT_TCP_PORT)
    }
}

impl TcpProber {
    pub fn new(port: u16) -> Self {
        Self { port }
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Prober for TcpProber {
    async fn probe(&self, identifier: &str, timeout: Duration) -> Result<bool, ProbeErrorKind> {
        validate_identifier(identifier)?;

        let connect = TcpStream::connect((identifier, self.port));
        match tokio::time::timeout(timeout, connect).await {
            Err(_) => Err(ProbeErrorKind::Timeout),
            Ok(Ok(_stream)) => Ok(true),
            Ok(Err(e)) if e.kind() == io::ErrorKind::ConnectionRefused => Ok(true),
            Ok(Err(e)) if e.kind() == io::ErrorKind::PermissionDenied => {
                Err(ProbeErrorKind::ProbeUnavailable)
            }
            Ok(Err(e)) => {
                debug!(identifier, port = self.port, error = %e, "tcp probe got no answer");
                Ok(false)
            }
        }
    }
}
