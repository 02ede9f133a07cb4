//! `pingboard check`: probe ad-hoc hosts with the configured probe settings.

use tabled::Tabled;

use pingboard_core::{Endpoint, Orchestrator, ProbeOutcome, SystemProber};

use crate::cli::{CheckArgs, GlobalOpts, ProbeArgs};
use crate::commands::cancel_on_interrupt;
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Attempts")]
    attempts: u32,
    #[tabled(rename = "Time")]
    elapsed: String,
}

impl OutcomeRow {
    fn new(o: &ProbeOutcome, color: bool) -> Self {
        Self {
            host: o.endpoint.identifier().to_owned(),
            status: output::paint_status(o.status_label(), color),
            attempts: o.attempts,
            elapsed: format!("{}ms", o.elapsed_ms),
        }
    }
}

pub async fn handle(args: CheckArgs, probe: &ProbeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load(global)?;
    config::apply_probe_overrides(&mut cfg, probe);
    let options = cfg.probe_options()?;
    let prober = SystemProber::from_method(cfg.probe_method());

    let endpoints: Vec<Endpoint> = args
        .hosts
        .into_iter()
        .map(|host| Endpoint::new(host.clone(), host))
        .collect();

    let (cancel, listener) = cancel_on_interrupt();
    let snapshot = Orchestrator::new(prober, options)
        .with_cancellation(cancel)
        .run(&endpoints)
        .await;
    listener.abort();

    let color = output::should_color(&global.color);
    let rendered = output::render_list(
        &global.output,
        snapshot.outcomes(),
        |o| OutcomeRow::new(o, color),
        |o| format!("{} {}", o.endpoint.identifier(), o.status_label()),
    )?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}
