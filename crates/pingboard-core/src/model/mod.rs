// ── Domain model ──
//
// Value types that flow through the probing pipeline.

mod endpoint;
mod outcome;
mod snapshot;

pub use endpoint::Endpoint;
pub use outcome::{ProbeErrorKind, ProbeOutcome};
pub use snapshot::Snapshot;
