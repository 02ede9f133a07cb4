//! Default command: run the full pipeline once and write the report.

use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use serde::Serialize;

use pingboard_core::{
    ConfiguredSource, Orchestrator, Pipeline, ProbeErrorKind, ProbeOutcome, SystemProber,
};

use crate::cli::{GlobalOpts, ProbeArgs, RunArgs};
use crate::commands::{cancel_on_interrupt, probe_spinner};
use crate::config;
use crate::error::CliError;
use crate::output;
use crate::report::HtmlRenderer;

/// What a run produced, for `--output` rendering.
#[derive(Serialize)]
struct RunSummary<'a> {
    total: usize,
    reachable: usize,
    unreachable: usize,
    reachable_percent: f64,
    interrupted: bool,
    errors: BTreeMap<ProbeErrorKind, usize>,
    generated_at: DateTime<Utc>,
    chart: PathBuf,
    report: PathBuf,
    outcomes: &'a [ProbeOutcome],
}

pub async fn handle(run: &RunArgs, probe: &ProbeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load(global)?;
    config::apply_probe_overrides(&mut cfg, probe);
    config::apply_run_overrides(&mut cfg, run);
    let pipeline_cfg = config::pipeline_config(&cfg, run)?;

    let source = ConfiguredSource::from_config(&pipeline_cfg.source)?;
    let renderer = HtmlRenderer::new(cfg.report.title.clone(), cfg.report.links.clone())?;

    let (cancel, listener) = cancel_on_interrupt();
    let show_progress = !global.quiet && !run.no_progress && std::io::stderr().is_terminal();
    let spinner = probe_spinner(show_progress);
    let prober = SystemProber::from_method(pipeline_cfg.method);
    let orchestrator = Orchestrator::new(prober, pipeline_cfg.probe)
        .with_cancellation(cancel.clone())
        .on_outcome({
            let spinner = spinner.clone();
            move |outcome: &ProbeOutcome| {
                spinner.inc(1);
                spinner.set_message(outcome.endpoint.label().to_owned());
            }
        });

    let result = Pipeline::new(source, orchestrator, renderer).run().await;
    spinner.finish_and_clear();
    listener.abort();
    let finished = result?;

    let written = finished.report.write_to(&cfg.report.output_dir)?;
    let snapshot = &finished.snapshot;
    let summary = RunSummary {
        total: snapshot.len(),
        reachable: snapshot.reachable_count(),
        unreachable: snapshot.unreachable_count(),
        reachable_percent: snapshot.reachable_percent(),
        interrupted: cancel.is_cancelled(),
        errors: snapshot.error_counts(),
        generated_at: snapshot.generated_at(),
        chart: written.chart,
        report: written.markup,
        outcomes: snapshot.outcomes(),
    };

    let color = output::should_color(&global.color);
    let rendered = output::render_single(
        &global.output,
        &summary,
        |s| detail(s, color),
        |s| s.report.display().to_string(),
    )?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}

fn detail(s: &RunSummary<'_>, color: bool) -> String {
    let reachable = format!("{}", s.reachable);
    let unreachable = format!("{}", s.unreachable);
    let (reachable, unreachable) = if color {
        (reachable.green().to_string(), unreachable.red().to_string())
    } else {
        (reachable, unreachable)
    };

    let mut lines = vec![
        format!("Endpoints:   {}", s.total),
        format!("Reachable:   {reachable} ({:.1}%)", s.reachable_percent),
        format!("Unreachable: {unreachable}"),
    ];
    for (kind, count) in &s.errors {
        lines.push(format!("  {kind}: {count}"));
    }
    if s.interrupted {
        lines.push("Interrupted: unfinished endpoints were recorded as cancelled".into());
    }
    lines.push(format!("Chart:       {}", s.chart.display()));
    lines.push(format!("Report:      {}", s.report.display()));
    lines.join("\n")
}
