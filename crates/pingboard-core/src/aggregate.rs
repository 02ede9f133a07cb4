// ── Aggregation ──
//
// Reduces an ordered outcome list into a `Snapshot` with summary counts.

use chrono::Utc;

use crate::model::{ProbeOutcome, Snapshot};

/// Count reachable/unreachable outcomes and stamp the snapshot time.
///
/// Order of `outcomes` is preserved as-is. Never fails; an empty list
/// yields zero counts.
pub fn summarize(outcomes: Vec<ProbeOutcome>) -> Snapshot {
    let reachable = outcomes.iter().filter(|o| o.reachable).count();
    Snapshot::new(outcomes, reachable, Utc::now())
}
