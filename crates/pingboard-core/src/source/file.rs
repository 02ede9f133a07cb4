use std::path::PathBuf;

use tracing::info;

use super::{EndpointSource, rows_to_endpoints};
use crate::error::{CoreError, SourceFailure};
use crate::model::Endpoint;

/// Reads `identifier,label` lines from a local file.
///
/// Blank lines and `#` comments are ignored. A first line of exactly
/// `identifier,label` (any case) is treated as a header. The label may
/// itself contain commas.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn parse_lines(contents: &str) -> Vec<Endpoint> {
    let rows = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .enumerate()
        .filter(|(n, line)| !(*n == 0 && is_header(line)))
        .map(|(_, line)| match line.split_once(',') {
            Some((identifier, label)) => vec![identifier, label],
            None => vec![line],
        });
    rows_to_endpoints(rows)
}

fn is_header(line: &str) -> bool {
    line.split_once(',').is_some_and(|(a, b)| {
        a.trim().eq_ignore_ascii_case("identifier") && b.trim().eq_ignore_ascii_case("label")
    })
}

impl EndpointSource for FileSource {
    async fn fetch_endpoints(&self) -> Result<Vec<Endpoint>, CoreError> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            CoreError::SourceUnavailable {
                origin: format!("file {}", self.path.display()),
                cause: SourceFailure::Unavailable,
                reason: e.to_string(),
            }
        })?;

        let endpoints = parse_lines(&contents);
        info!(path = %self.path.display(), endpoints = endpoints.len(), "loaded endpoints from file");
        Ok(endpoints)
    }
}
