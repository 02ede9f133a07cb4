//! Clap derive structures for the `pingboard` CLI.
//!
//! Running without a subcommand executes the full dashboard pipeline.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// pingboard -- concurrent reachability dashboard
#[derive(Debug, Parser)]
#[command(
    name = "pingboard",
    version,
    about = "Probe a list of endpoints and publish a reachability dashboard",
    long_about = "Reads labeled endpoints from a Google Sheets range or a local file,\n\
        probes them concurrently, and writes a donut chart plus an HTML status page.\n\n\
        Run without a subcommand to execute the full pipeline once.",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(flatten)]
    pub probe: ProbeArgs,

    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "PINGBOARD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format for summaries
    #[arg(
        long,
        short = 'o',
        env = "PINGBOARD_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Probe Overrides ──────────────────────────────────────────────────

/// Probe tuning; each flag overrides the `[probe]` config section.
#[derive(Debug, Default, Args)]
pub struct ProbeArgs {
    /// Maximum probes in flight
    #[arg(long, short = 'j', global = true)]
    pub concurrency: Option<usize>,

    /// Per-probe timeout (e.g. 500ms, 2s)
    #[arg(long, short = 't', global = true)]
    pub timeout: Option<String>,

    /// Overall budget for the run (e.g. 1m); unfinished probes are cancelled
    #[arg(long, global = true)]
    pub deadline: Option<String>,

    /// Extra attempts for endpoints that time out or do not reply
    #[arg(long, global = true)]
    pub retries: Option<u32>,

    /// Reachability check to run
    #[arg(long, short = 'm', global = true)]
    pub method: Option<ProbeMethodArg>,

    /// TCP port for `--method tcp`
    #[arg(long, global = true)]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProbeMethodArg {
    /// ICMP echo via the system `ping`
    Icmp,
    /// TCP connect (a refused connection still counts as reachable)
    Tcp,
}

// ── Pipeline Run Options ─────────────────────────────────────────────

#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// Read endpoints from an `identifier,label` file instead of the spreadsheet
    #[arg(long, short = 'f')]
    pub source_file: Option<PathBuf>,

    /// Directory for the chart and HTML report
    #[arg(long, short = 'd')]
    pub out_dir: Option<PathBuf>,

    /// Google Sheets API key
    #[arg(long, env = "PINGBOARD_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Do not show a progress spinner
    #[arg(long)]
    pub no_progress: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Subcommands ──────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Probe ad-hoc hosts and print the results (no report is written)
    Check(CheckArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Hostnames or IP addresses to probe
    #[arg(required = true, num_args = 1..)]
    pub hosts: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the effective configuration (file + environment)
    Show,

    /// Print the config file location
    Path,

    /// Write a commented starter config file
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Store the spreadsheet API key in the system keyring
    ///
    /// The key is prompted for on a terminal, otherwise read from stdin.
    /// It is saved under service 'pingboard', account
    /// '<spreadsheet_id>/api-key'.
    SetKey,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
