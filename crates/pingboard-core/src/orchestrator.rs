// ── Probe orchestrator ──
//
// Fans probes out over the endpoint list under a concurrency limit and
// assembles one outcome per endpoint, in input order. Results land in a
// slot arena indexed by input position, so completion order never leaks
// into the snapshot. Per-endpoint failures are recorded, never raised.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tokio::time::{Instant, Sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::aggregate::summarize;
use crate::config::ProbeOptions;
use crate::model::{Endpoint, ProbeErrorKind, ProbeOutcome, Snapshot};
use crate::probe::Prober;

type Observer = Arc<dyn Fn(&ProbeOutcome) + Send + Sync>;
type Joined = Result<(usize, ProbeOutcome), JoinError>;

/// Runs a [`Prober`] across many endpoints with bounded parallelism.
///
/// Cancelling the token (or hitting `ProbeOptions::deadline`) stops
/// dispatch, abandons in-flight probes, and records every unfinished
/// endpoint as [`ProbeErrorKind::Cancelled`]. Partial results are kept.
pub struct Orchestrator<P> {
    prober: Arc<P>,
    options: ProbeOptions,
    cancel: CancellationToken,
    observer: Option<Observer>,
}

impl<P> Orchestrator<P>
where
    P: Prober + 'static,
{
    pub fn new(prober: P, options: ProbeOptions) -> Self {
        Self {
            prober: Arc::new(prober),
            options,
            cancel: CancellationToken::new(),
            observer: None,
        }
    }

    /// Use an externally owned cancellation token (e.g. wired to Ctrl-C).
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Called once for every endpoint whose probe finished, in completion order.
    pub fn on_outcome(mut self, observer: impl Fn(&ProbeOutcome) + Send + Sync + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    #[cfg(test)]
    fn prober(&self) -> &P {
        &self.prober
    }

    /// Probe every endpoint and summarize the results.
    pub async fn run(&self, endpoints: &[Endpoint]) -> Snapshot {
        let started = Instant::now();
        let snapshot = summarize(self.probe_all(endpoints).await);

        let cancelled = snapshot
            .error_counts()
            .get(&ProbeErrorKind::Cancelled)
            .copied()
            .unwrap_or(0);
        info!(
            total = snapshot.len(),
            reachable = snapshot.reachable_count(),
            unreachable = snapshot.unreachable_count(),
            cancelled,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "probe run complete"
        );
        snapshot
    }

    async fn probe_all(&self, endpoints: &[Endpoint]) -> Vec<ProbeOutcome> {
        if endpoints.is_empty() {
            return Vec::new();
        }

        let mut slots: Vec<Option<ProbeOutcome>> =
            std::iter::repeat_with(|| None).take(endpoints.len()).collect();
        // Never more permits than endpoints; options may not have been validated.
        let permits = self
            .options
            .concurrency
            .clamp(1, endpoints.len().min(Semaphore::MAX_PERMITS));
        let semaphore = Arc::new(Semaphore::new(permits));
        let mut tasks: JoinSet<(usize, ProbeOutcome)> = JoinSet::new();
        let mut deadline = self.options.deadline.map(|d| Box::pin(tokio::time::sleep(d)));
        let mut interrupted = false;

        // ── Dispatch: one task per endpoint, gated by a semaphore permit ──
        'dispatch: for (index, endpoint) in endpoints.iter().enumerate() {
            let permit = loop {
                tokio::select! {
                    biased;
                    () = self.cancel.cancelled() => {
                        interrupted = true;
                        break 'dispatch;
                    }
                    () = expired(&mut deadline) => {
                        interrupted = true;
                        break 'dispatch;
                    }
                    Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                        self.record(&mut slots, joined);
                    }
                    acquired = Arc::clone(&semaphore).acquire_owned() => match acquired {
                        Ok(permit) => break permit,
                        // The semaphore is never closed while we hold it.
                        Err(_) => {
                            interrupted = true;
                            break 'dispatch;
                        }
                    },
                }
            };

            let prober = Arc::clone(&self.prober);
            let endpoint = endpoint.clone();
            let timeout = self.options.per_probe_timeout;
            let retries = self.options.retries;
            tasks.spawn(async move {
                let outcome = probe_endpoint(prober.as_ref(), endpoint, timeout, retries).await;
                drop(permit);
                (index, outcome)
            });
        }

        // ── Drain ──
        while !interrupted && !tasks.is_empty() {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => interrupted = true,
                () = expired(&mut deadline) => interrupted = true,
                Some(joined) = tasks.join_next() => self.record(&mut slots, joined),
            }
        }

        if interrupted {
            debug!(in_flight = tasks.len(), "probe run interrupted, abandoning in-flight probes");
            tasks.abort_all();
            // Tasks that finished before the abort still report their outcome.
            while let Some(joined) = tasks.join_next().await {
                self.record(&mut slots, joined);
            }
        }

        slots
            .into_iter()
            .zip(endpoints)
            .map(|(slot, endpoint)| {
                slot.unwrap_or_else(|| {
                    if interrupted {
                        ProbeOutcome::cancelled(endpoint.clone())
                    } else {
                        // Only a panicked task leaves a slot empty without interruption.
                        ProbeOutcome::from_result(
                            endpoint.clone(),
                            Err(ProbeErrorKind::ProbeUnavailable),
                            0,
                            Duration::ZERO,
                        )
                    }
                })
            })
            .collect()
    }

    fn record(&self, slots: &mut [Option<ProbeOutcome>], joined: Joined) {
        match joined {
            Ok((index, outcome)) => {
                debug!(
                    identifier = outcome.endpoint.identifier(),
                    reachable = outcome.reachable,
                    error = ?outcome.error,
                    attempts = outcome.attempts,
                    "probe finished"
                );
                if let Some(observer) = &self.observer {
                    observer(&outcome);
                }
                if let Some(slot) = slots.get_mut(index) {
                    *slot = Some(outcome);
                }
            }
            Err(e) if e.is_cancelled() => {}
            Err(e) => warn!(error = %e, "probe task failed"),
        }
    }
}

/// Resolves when the run deadline has passed; never resolves without one.
async fn expired(deadline: &mut Option<Pin<Box<Sleep>>>) {
    match deadline {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}

/// Probe one endpoint, enforcing the hard timeout and the retry policy.
async fn probe_endpoint<P: Prober>(
    prober: &P,
    endpoint: Endpoint,
    timeout: Duration,
    retries: u32,
) -> ProbeOutcome {
    let started = Instant::now();
    let mut attempts = 0;

    let result = loop {
        attempts += 1;
        let result = tokio::time::timeout(timeout, prober.probe(endpoint.identifier(), timeout))
            .await
            .unwrap_or(Err(ProbeErrorKind::Timeout));

        let retry = match result {
            Ok(reachable) => !reachable,
            Err(kind) => kind.is_retryable(),
        };
        if !retry || attempts > retries {
            break result;
        }
        debug!(identifier = endpoint.identifier(), attempt = attempts, "retrying probe");
    };

    ProbeOutcome::from_result(endpoint, result, attempts, started.elapsed())
}
