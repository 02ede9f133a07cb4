// pingboard-core: Probing pipeline between endpoint sources and report renderers.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod pipeline;
pub mod probe;
pub mod render;
pub mod source;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregate::summarize;
pub use config::{PipelineConfig, ProbeMethod, ProbeOptions, SheetCredentials, SourceConfig};
pub use error::{CoreError, SourceFailure};
pub use orchestrator::Orchestrator;
pub use pipeline::{Pipeline, PipelineOutput};
pub use probe::{IcmpProber, Prober, SystemProber, TcpProber};
pub use render::{Report, ReportRenderer, WrittenReport};
pub use source::{ConfiguredSource, EndpointSource, FileSource, SheetSource};

// Re-export model types at the crate root for ergonomics.
pub use model::{Endpoint, ProbeErrorKind, ProbeOutcome, Snapshot};
