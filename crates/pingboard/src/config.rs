//! CLI-side configuration: locate and load the file, then layer flag
//! overrides on top before translating to core types.

use std::path::PathBuf;

use secrecy::SecretString;

use pingboard_config::{Config, MethodKind, SourceKind};
use pingboard_core::{PipelineConfig, SheetCredentials, SourceConfig};

use crate::cli::{GlobalOpts, ProbeArgs, ProbeMethodArg, RunArgs};
use crate::error::CliError;

/// The config file in effect: `--config` / `PINGBOARD_CONFIG`, else the platform default.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(pingboard_config::config_path)
}

/// Load file + environment. An explicitly named file must exist; the
/// default location is optional.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = config_path(global);
    if global.config.is_some() && !path.exists() {
        return Err(CliError::NoConfig { path });
    }
    tracing::debug!(path = %path.display(), "loading configuration");
    Ok(pingboard_config::load_config_from(&path)?)
}

// ── Flag overrides ───────────────────────────────────────────────────

pub fn apply_probe_overrides(cfg: &mut Config, probe: &ProbeArgs) {
    if let Some(concurrency) = probe.concurrency {
        cfg.probe.concurrency = concurrency;
    }
    if let Some(ref timeout) = probe.timeout {
        cfg.probe.timeout.clone_from(timeout);
    }
    if let Some(ref deadline) = probe.deadline {
        cfg.probe.deadline = Some(deadline.clone());
    }
    if let Some(retries) = probe.retries {
        cfg.probe.retries = retries;
    }
    if let Some(method) = probe.method {
        cfg.probe.method = match method {
            ProbeMethodArg::Icmp => MethodKind::Icmp,
            ProbeMethodArg::Tcp => MethodKind::Tcp,
        };
    }
    if let Some(port) = probe.port {
        cfg.probe.port = port;
    }
}

pub fn apply_run_overrides(cfg: &mut Config, run: &RunArgs) {
    if let Some(ref path) = run.source_file {
        cfg.source.kind = SourceKind::File;
        cfg.source.path = Some(path.clone());
    }
    if let Some(ref dir) = run.out_dir {
        cfg.report.output_dir.clone_from(dir);
    }
}

/// Translate to core config. `--api-key` is the first link of the
/// credential chain, so it replaces whatever the file resolved.
pub fn pipeline_config(cfg: &Config, run: &RunArgs) -> Result<PipelineConfig, CliError> {
    let mut pipeline = cfg.to_pipeline_config()?;
    if let (Some(key), SourceConfig::Sheets { credentials, .. }) =
        (&run.api_key, &mut pipeline.source)
    {
        *credentials = SheetCredentials::ApiKey(SecretString::from(key.clone()));
    }
    Ok(pipeline)
}
