// ICMP echo via the system `ping` executable.
//
// Raw ICMP sockets need privileges on most platforms; the setuid/capability
// `ping` binary does not. The child is killed if the probe future is dropped,
// so an abandoned probe never leaves a process behind.

use std::ffi::OsString;
use std::io;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use super::{Prober, validate_identifier};
use crate::model::ProbeErrorKind;

#[derive(Debug, Clone)]
pub struct IcmpProber {
    program: OsString,
}

impl Default for IcmpProber {
    fn default() -> Self {
        Self {
            program: "ping".into(),
        }
    }
}

impl IcmpProber {
    /// Use a specific `ping` executable instead of the one on `PATH`.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

/// Arguments for a single echo request with a reply wait of `timeout`.
fn ping_args(identifier: &str, timeout: Duration) -> Vec<String> {
    let millis = timeout.as_millis().max(1);
    if cfg!(target_os = "windows") {
        vec!["-n".into(), "1".into(), "-w".into(), millis.to_string(), identifier.into()]
    } else if cfg!(target_os = "macos") {
        // BSD ping: -W is the reply wait in milliseconds.
        vec!["-c".into(), "1".into(), "-W".into(), millis.to_string(), identifier.into()]
    } else {
        // iputils/busybox: -W is whole seconds.
        let secs = millis.div_ceil(1000);
        vec!["-c".into(), "1".into(), "-W".into(), secs.to_string(), identifier.into()]
    }
}

/// A reply counts only if ping succeeded and printed a TTL field.
///
/// Windows ping exits 0 for "Destination host unreachable" answered by a
/// gateway; only a real echo reply carries `TTL=`.
fn reply_received(output: &Output) -> bool {
    output.status.success()
        && String::from_utf8_lossy(&output.stdout)
            .to_ascii_lowercase()
            .contains("ttl")
}

/// ping ran but the kernel refused to open the ICMP socket.
fn lacks_privilege(output: &Output) -> bool {
    let stderr = String::from_utf8_lossy(&output.stderr).to_ascii_lowercase();
    stderr.contains("operation not permitted") || stderr.contains("permission denied")
}

impl Prober for IcmpProber {
    async fn probe(&self, identifier: &str, timeout: Duration) -> Result<bool, ProbeErrorKind> {
        validate_identifier(identifier)?;

        let child = Command::new(&self.program)
            .args(ping_args(identifier, timeout))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e: io::Error| {
                warn!(program = ?self.program, kind = ?e.kind(), error = %e, "cannot start ping");
                ProbeErrorKind::ProbeUnavailable
            })?;

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Err(_) => return Err(ProbeErrorKind::Timeout),
            Ok(Err(e)) => {
                warn!(identifier, error = %e, "failed to collect ping output");
                return Err(ProbeErrorKind::ProbeUnavailable);
            }
            Ok(Ok(output)) => output,
        };

        if !output.status.success() && lacks_privilege(&output) {
            return Err(ProbeErrorKind::ProbeUnavailable);
        }

        let reachable = reply_received(&output);
        debug!(identifier, reachable, code = ?output.status.code(), "ping finished");
        Ok(reachable)
    }
}
