// ── Endpoint sources ──
//
// A source yields the ordered list of endpoints to probe. Rows missing an
// identifier or a label are dropped; a source that cannot be read at all
// fails with `CoreError::SourceUnavailable`.

mod file;
mod sheet;

use std::future::Future;

use tracing::debug;

use crate::config::SourceConfig;
use crate::error::CoreError;
use crate::model::Endpoint;

pub use file::FileSource;
pub use sheet::SheetSource;

pub trait EndpointSource: Send + Sync {
    fn fetch_endpoints(&self) -> impl Future<Output = Result<Vec<Endpoint>, CoreError>> + Send;
}

/// Turn raw `(identifier, label, ...)` rows into endpoints, keeping order.
///
/// Cells are trimmed; extra columns are ignored.
pub fn rows_to_endpoints<S>(rows: impl IntoIterator<Item = Vec<S>>) -> Vec<Endpoint>
where
    S: AsRef<str>,
{
    rows.into_iter()
        .enumerate()
        .filter_map(|(row, cells)| {
            let identifier = cells.first().map_or("", |c| c.as_ref().trim());
            let label = cells.get(1).map_or("", |c| c.as_ref().trim());
            if identifier.is_empty() || label.is_empty() {
                debug!(row, "skipping row without identifier or label");
                return None;
            }
            Some(Endpoint::new(identifier, label))
        })
        .collect()
}

/// The built-in sources, selectable from configuration.
pub enum ConfiguredSource {
    Sheet(SheetSource),
    File(FileSource),
}

impl ConfiguredSource {
    pub fn from_config(config: &SourceConfig) -> Result<Self, CoreError> {
        match config {
            SourceConfig::Sheets { .. } => Ok(Self::Sheet(SheetSource::from_config(config)?)),
            SourceConfig::File { path } => Ok(Self::File(FileSource::new(path.clone()))),
        }
    }
}

impl EndpointSource for ConfiguredSource {
    async fn fetch_endpoints(&self) -> Result<Vec<Endpoint>, CoreError> {
        match self {
            Self::Sheet(s) => s.fetch_endpoints().await,
            Self::File(s) => s.fetch_endpoints().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn incomplete_rows_are_skipped() {
        let rows = vec![
            vec!["10.0.0.1", "core"],
            vec!["10.0.0.2"],
            vec!["", "orphan label"],
            vec!["  10.0.0.3 ", " edge ", "extra"],
            vec![],
            vec!["10.0.0.4", "   "],
        ];
        let endpoints = rows_to_endpoints(rows);
        assert_eq!(
            endpoints,
            vec![Endpoint::new("10.0.0.1", "core"), Endpoint::new("10.0.0.3", "edge")]
        );
    }
}
