// ── Pipeline ──
//
// Source -> orchestrator -> aggregator -> renderer, once per invocation.
// Only source and renderer failures are terminal.

use tracing::{info, warn};

use crate::error::CoreError;
use crate::model::Snapshot;
use crate::orchestrator::Orchestrator;
use crate::probe::Prober;
use crate::render::{Report, ReportRenderer};
use crate::source::EndpointSource;

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub snapshot: Snapshot,
    pub report: Report,
}

pub struct Pipeline<S, P, R> {
    source: S,
    orchestrator: Orchestrator<P>,
    renderer: R,
}

impl<S, P, R> Pipeline<S, P, R>
where
    S: EndpointSource,
    P: Prober + 'static,
    R: ReportRenderer,
{
    pub fn new(source: S, orchestrator: Orchestrator<P>, renderer: R) -> Self {
        Self {
            source,
            orchestrator,
            renderer,
        }
    }

    pub async fn run(&self) -> Result<PipelineOutput, CoreError> {
        let endpoints = self.source.fetch_endpoints().await?;
        if endpoints.is_empty() {
            warn!("endpoint source returned no rows; the report will be empty");
        } else {
            info!(endpoints = endpoints.len(), "probing endpoints");
        }

        let snapshot = self.orchestrator.run(&endpoints).await;
        let report = self.renderer.render(&snapshot)?;
        Ok(PipelineOutput { snapshot, report })
    }
}
