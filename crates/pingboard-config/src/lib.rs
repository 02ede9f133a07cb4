//! Configuration for the pingboard CLI.
//!
//! TOML file + `PINGBOARD_*` environment layering, credential resolution
//! (env + keyring + plaintext), and translation to
//! `pingboard_core::PipelineConfig`. The CLI applies its flag overrides
//! on top of what this crate loads.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use pingboard_core::config::{
    DEFAULT_CONCURRENCY, DEFAULT_SHEETS_BASE_URL, DEFAULT_SHEETS_RANGE, DEFAULT_TCP_PORT,
};
use pingboard_core::{
    CoreError, PipelineConfig, ProbeMethod, ProbeOptions, SheetCredentials, SourceConfig,
};

/// Keyring service name used for stored API keys.
pub const KEYRING_SERVICE: &str = "pingboard";

/// Prefix for environment overrides (`PINGBOARD_PROBE__CONCURRENCY=4`).
pub const ENV_PREFIX: &str = "PINGBOARD_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials available: {reason}")]
    NoCredentials { reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceSection,

    #[serde(default)]
    pub probe: ProbeSection,

    #[serde(default)]
    pub report: ReportSection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Sheets,
    File,
}

/// Where endpoints come from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceSection {
    #[serde(default)]
    pub kind: SourceKind,

    /// Spreadsheet id (the long token in the sheet URL).
    pub spreadsheet_id: Option<String>,

    /// A1 range or sheet name to read.
    #[serde(default = "default_range")]
    pub range: String,

    /// Sheets API base URL; override for proxies or tests.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key (plaintext; prefer keyring or env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Environment variable name containing a pre-issued OAuth token.
    pub bearer_token_env: Option<String>,

    /// Request timeout for the spreadsheet API (humantime, e.g. "30s").
    #[serde(default = "default_source_timeout")]
    pub timeout: String,

    /// Endpoint list for `kind = "file"`.
    pub path: Option<PathBuf>,
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            spreadsheet_id: None,
            range: default_range(),
            base_url: default_base_url(),
            api_key: None,
            api_key_env: None,
            bearer_token_env: None,
            timeout: default_source_timeout(),
            path: None,
        }
    }
}

fn default_range() -> String {
    DEFAULT_SHEETS_RANGE.into()
}
fn default_base_url() -> String {
    DEFAULT_SHEETS_BASE_URL.into()
}
fn default_source_timeout() -> String {
    "30s".into()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    #[default]
    Icmp,
    Tcp,
}

/// Probe tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProbeSection {
    #[serde(default)]
    pub method: MethodKind,

    /// Port for `method = "tcp"`.
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-probe timeout (humantime).
    #[serde(default = "default_probe_timeout")]
    pub timeout: String,

    #[serde(default)]
    pub retries: u32,

    /// Overall run budget (humantime). Unset means no deadline.
    pub deadline: Option<String>,
}

impl Default for ProbeSection {
    fn default() -> Self {
        Self {
            method: MethodKind::default(),
            port: default_port(),
            concurrency: default_concurrency(),
            timeout: default_probe_timeout(),
            retries: 0,
            deadline: None,
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_TCP_PORT
}
fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}
fn default_probe_timeout() -> String {
    "2s".into()
}

/// Report output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReportSection {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_title")]
    pub title: String,

    /// Menu links shown above the indicator grid.
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            title: default_title(),
            links: Vec::new(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_title() -> String {
    "Connectivity Dashboard".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "pingboard", "pingboard").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("pingboard");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load config from `path` + environment. A missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Starter file written by `config init`. Parses to `Config::default()`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# pingboard configuration
#
# Every key can also be set through the environment, e.g.
#   PINGBOARD_PROBE__CONCURRENCY=32
#   PINGBOARD_SOURCE__SPREADSHEET_ID=1AbC...

[source]
# "sheets" reads a Google Sheets range, "file" reads identifier,label lines.
kind = "sheets"
range = "Dashboard"
base_url = "https://sheets.googleapis.com"
timeout = "30s"
# spreadsheet_id = "1AbC..."
# api_key_env = "PINGBOARD_SHEETS_KEY"
# bearer_token_env = "PINGBOARD_SHEETS_TOKEN"
# path = "endpoints.csv"

[probe]
# "icmp" shells out to the system ping; "tcp" connects to `port`.
method = "icmp"
port = 80
concurrency = 16
timeout = "2s"
retries = 0
# deadline = "1m"

[report]
output_dir = "."
title = "Connectivity Dashboard"

# [[report.links]]
# label = "Inventory"
# url = "https://intranet.example/inventory"
"#;

/// Stand-in for secrets in displayed config.
pub const REDACTED: &str = "********";

impl Config {
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Copy safe to print: a plaintext `source.api_key` is masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut cfg = self.clone();
        if cfg.source.api_key.is_some() {
            cfg.source.api_key = Some(REDACTED.into());
        }
        cfg
    }
}

/// Write the commented starter file unless `path` already exists.
/// Returns `false` when an existing file was left alone.
pub fn write_default_config(path: &Path) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)?;
    Ok(true)
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve spreadsheet credentials from the chain (no CLI flag step).
///
/// A bearer token env var wins when named; otherwise the API key is looked
/// up via env var, then keyring, then plaintext. Nothing configured means
/// anonymous access.
pub fn resolve_credentials(source: &SourceSection) -> Result<SheetCredentials, ConfigError> {
    if let Some(ref env_name) = source.bearer_token_env {
        return std::env::var(env_name)
            .map(|token| SheetCredentials::BearerToken(SecretString::from(token)))
            .map_err(|_| ConfigError::NoCredentials {
                reason: format!("bearer_token_env names '{env_name}', which is not set"),
            });
    }

    Ok(resolve_api_key(source).map_or(SheetCredentials::None, SheetCredentials::ApiKey))
}

/// API key from env var → keyring → plaintext, if any.
pub fn resolve_api_key(source: &SourceSection) -> Option<SecretString> {
    // 1. Named env var
    if let Some(ref env_name) = source.api_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(source)) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    source.api_key.clone().map(SecretString::from)
}

/// Save an API key in the system keyring under [`keyring_user`].
pub fn store_api_key(source: &SourceSection, key: &str) -> Result<(), ConfigError> {
    let keyring_err = |e: keyring::Error| ConfigError::Validation {
        field: "keyring".into(),
        reason: format!("failed to store API key: {e}"),
    };
    keyring::Entry::new(KEYRING_SERVICE, &keyring_user(source))
        .map_err(keyring_err)?
        .set_password(key)
        .map_err(keyring_err)
}

/// Keyring account for a source: one key per spreadsheet.
pub fn keyring_user(source: &SourceSection) -> String {
    let sheet = source.spreadsheet_id.as_deref().unwrap_or("default");
    format!("{sheet}/api-key")
}

// ── Translation to core config ──────────────────────────────────────

/// Parse a humantime duration (`"500ms"`, `"2s"`, `"1m 30s"`).
pub fn parse_duration(field: &str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|err| ConfigError::Validation {
        field: field.into(),
        reason: format!("'{value}' is not a duration ({err})"),
    })
}

impl Config {
    pub fn probe_method(&self) -> ProbeMethod {
        match self.probe.method {
            MethodKind::Icmp => ProbeMethod::Icmp,
            MethodKind::Tcp => ProbeMethod::Tcp {
                port: self.probe.port,
            },
        }
    }

    /// Validated orchestrator options.
    pub fn probe_options(&self) -> Result<ProbeOptions, ConfigError> {
        let options = ProbeOptions {
            concurrency: self.probe.concurrency,
            per_probe_timeout: parse_duration("probe.timeout", &self.probe.timeout)?,
            retries: self.probe.retries,
            deadline: self
                .probe
                .deadline
                .as_deref()
                .map(|d| parse_duration("probe.deadline", d))
                .transpose()?,
        };
        options.validate().map_err(|err| match err {
            CoreError::Validation { field, reason } => ConfigError::Validation {
                field: format!("probe.{field}"),
                reason,
            },
            other => ConfigError::Validation {
                field: "probe".into(),
                reason: other.to_string(),
            },
        })?;
        Ok(options)
    }

    /// Build the source description, resolving credentials.
    pub fn source_config(&self) -> Result<SourceConfig, ConfigError> {
        let source = &self.source;
        match source.kind {
            SourceKind::File => {
                let path = source.path.clone().ok_or_else(|| ConfigError::Validation {
                    field: "source.path".into(),
                    reason: "required when source.kind = \"file\"".into(),
                })?;
                Ok(SourceConfig::File { path })
            }
            SourceKind::Sheets => {
                let spreadsheet_id = source
                    .spreadsheet_id
                    .clone()
                    .filter(|id| !id.trim().is_empty())
                    .ok_or_else(|| ConfigError::Validation {
                        field: "source.spreadsheet_id".into(),
                        reason: "required when source.kind = \"sheets\"".into(),
                    })?;
                let base_url: Url = source.base_url.parse().map_err(|_| ConfigError::Validation {
                    field: "source.base_url".into(),
                    reason: format!("invalid URL: {}", source.base_url),
                })?;
                Ok(SourceConfig::Sheets {
                    base_url,
                    spreadsheet_id,
                    range: source.range.clone(),
                    credentials: resolve_credentials(source)?,
                    timeout: parse_duration("source.timeout", &source.timeout)?,
                })
            }
        }
    }

    pub fn to_pipeline_config(&self) -> Result<PipelineConfig, ConfigError> {
        Ok(PipelineConfig {
            source: self.source_config()?,
            method: self.probe_method(),
            probe: self.probe_options()?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn template_matches_defaults() {
        let parsed: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_jail| {
            let config = load_config_from(Path::new("does-not-exist.toml")).unwrap();
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn file_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [source]
                kind = "file"
                path = "hosts.csv"

                [probe]
                concurrency = 4
                timeout = "500ms"

                [[report.links]]
                label = "Home"
                url = "https://example.com"
                "#,
            )?;
            jail.set_env("PINGBOARD_PROBE__CONCURRENCY", "32");
            jail.set_env("PINGBOARD_PROBE__METHOD", "tcp");

            let config = load_config_from(Path::new("config.toml")).unwrap();
            assert_eq!(config.source.kind, SourceKind::File);
            assert_eq!(config.source.path, Some(PathBuf::from("hosts.csv")));
            assert_eq!(config.probe.concurrency, 32);
            assert_eq!(config.probe.timeout, "500ms");
            assert_eq!(config.probe.method, MethodKind::Tcp);
            assert_eq!(config.report.links.len(), 1);
            assert_eq!(config.report.title, "Connectivity Dashboard");
            Ok(())
        });
    }

    #[test]
    fn file_source_translates() {
        let mut config = Config::default();
        config.source.kind = SourceKind::File;
        config.source.path = Some(PathBuf::from("hosts.csv"));
        config.probe.method = MethodKind::Tcp;
        config.probe.port = 443;
        config.probe.deadline = Some("1m".into());

        let pipeline = config.to_pipeline_config().unwrap();
        assert!(matches!(pipeline.source, SourceConfig::File { ref path } if path == Path::new("hosts.csv")));
        assert_eq!(pipeline.method, ProbeMethod::Tcp { port: 443 });
        assert_eq!(pipeline.probe.per_probe_timeout, Duration::from_secs(2));
        assert_eq!(pipeline.probe.deadline, Some(Duration::from_secs(60)));
    }

    #[test]
    fn sheets_source_requires_spreadsheet_id() {
        let err = Config::default().source_config().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation { ref field, .. } if field == "source.spreadsheet_id"),
            "got {err:?}"
        );
    }

    #[test]
    fn file_source_requires_path() {
        let mut config = Config::default();
        config.source.kind = SourceKind::File;
        assert!(config.source_config().is_err());
    }

    #[test]
    fn sheets_source_with_plaintext_key() {
        let mut config = Config::default();
        config.source.spreadsheet_id = Some("sheet-under-test-7f3a".into());
        config.source.api_key = Some("plain".into());

        let SourceConfig::Sheets {
            range, credentials, ..
        } = config.source_config().unwrap()
        else {
            panic!("expected sheets source");
        };
        assert_eq!(range, "Dashboard");
        assert!(matches!(credentials, SheetCredentials::ApiKey(_)));
    }

    #[test]
    fn missing_bearer_env_is_an_error() {
        Jail::expect_with(|_jail| {
            let source = SourceSection {
                bearer_token_env: Some("PINGBOARD_TEST_TOKEN_UNSET".into()),
                ..SourceSection::default()
            };
            assert!(matches!(
                resolve_credentials(&source),
                Err(ConfigError::NoCredentials { .. })
            ));
            Ok(())
        });
    }

    #[test]
    fn bearer_env_wins() {
        Jail::expect_with(|jail| {
            jail.set_env("PINGBOARD_TEST_TOKEN", "tok");
            let source = SourceSection {
                bearer_token_env: Some("PINGBOARD_TEST_TOKEN".into()),
                api_key: Some("ignored".into()),
                ..SourceSection::default()
            };
            assert!(matches!(
                resolve_credentials(&source).unwrap(),
                SheetCredentials::BearerToken(_)
            ));
            Ok(())
        });
    }

    #[test]
    fn invalid_durations_and_limits_are_rejected() {
        let mut config = Config::default();
        config.probe.timeout = "soon".into();
        assert!(matches!(
            config.probe_options(),
            Err(ConfigError::Validation { ref field, .. }) if field == "probe.timeout"
        ));

        let mut config = Config::default();
        config.probe.concurrency = 0;
        assert!(matches!(
            config.probe_options(),
            Err(ConfigError::Validation { ref field, .. }) if field == "probe.concurrency"
        ));
        config.probe.concurrency = usize::MAX;
        assert!(matches!(
            config.probe_options(),
            Err(ConfigError::Validation { ref field, .. }) if field == "probe.concurrency"
        ));
    }

    #[test]
    fn write_default_config_does_not_clobber() {
        Jail::expect_with(|_jail| {
            let tmp = tempfile::tempdir().unwrap();
            let path = tmp.path().join("nested").join("config.toml");

            assert!(write_default_config(&path).unwrap());
            std::fs::write(&path, "[probe]\nretries = 3\n").unwrap();
            assert!(!write_default_config(&path).unwrap());
            assert_eq!(load_config_from(&path).unwrap().probe.retries, 3);
            Ok(())
        });
    }

    #[test]
    fn redacted_config_hides_plaintext_key() {
        let mut config = Config::default();
        config.source.api_key = Some("AIza-very-secret".into());

        let shown = config.redacted().to_toml().unwrap();
        assert!(!shown.contains("AIza-very-secret"));
        assert!(shown.contains(REDACTED));
        assert_eq!(Config::default().redacted(), Config::default());
    }

    #[test]
    fn keyring_account_is_per_spreadsheet() {
        let mut source = SourceSection::default();
        assert_eq!(keyring_user(&source), "default/api-key");
        source.spreadsheet_id = Some("1AbC".into());
        assert_eq!(keyring_user(&source), "1AbC/api-key");
    }
}
