use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ProbeErrorKind, ProbeOutcome};

/// Immutable result of one probing pass.
///
/// Only [`summarize`](crate::aggregate::summarize) builds these, so the
/// counts always agree with the outcome list:
/// `reachable_count + unreachable_count == outcomes.len()`.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    outcomes: Vec<ProbeOutcome>,
    reachable_count: usize,
    unreachable_count: usize,
    generated_at: DateTime<Utc>,
}

impl Snapshot {
    pub(crate) fn new(
        outcomes: Vec<ProbeOutcome>,
        reachable_count: usize,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let unreachable_count = outcomes.len() - reachable_count;
        Self {
            outcomes,
            reachable_count,
            unreachable_count,
            generated_at,
        }
    }

    /// Outcomes in the same order as the input endpoints.
    pub fn outcomes(&self) -> &[ProbeOutcome] {
        &self.outcomes
    }

    pub fn reachable_count(&self) -> usize {
        self.reachable_count
    }

    pub fn unreachable_count(&self) -> usize {
        self.unreachable_count
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Tally of outcomes per error kind (kinds with zero hits are absent).
    pub fn error_counts(&self) -> BTreeMap<ProbeErrorKind, usize> {
        let mut counts = BTreeMap::new();
        for kind in self.outcomes.iter().filter_map(|o| o.error) {
            *counts.entry(kind).or_insert(0) += 1;
        }
        counts
    }

    /// Share of reachable endpoints in percent (0.0 for an empty snapshot).
    #[allow(clippy::cast_precision_loss)]
    pub fn reachable_percent(&self) -> f64 {
        if self.outcomes.is_empty() {
            0.0
        } else {
            self.reachable_count as f64 * 100.0 / self.outcomes.len() as f64
        }
    }
}
