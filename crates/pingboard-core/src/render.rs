// ── Report rendering seam ──
//
// Renderers turn a finished snapshot into a chart image and a markup
// document. `Report::write_to` puts both into an output directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::CoreError;
use crate::model::Snapshot;

/// Chart file name without extension; the renderer picks the encoding.
pub const CHART_FILE_STEM: &str = "status_chart";
pub const MARKUP_FILE_NAME: &str = "connectivity_report.html";

/// Rendered artifacts for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Encoded chart image.
    pub chart: Vec<u8>,
    /// File extension matching the chart encoding (e.g. `svg`).
    pub chart_extension: &'static str,
    /// Markup document that references the chart by [`Report::chart_file_name`].
    pub markup: String,
}

/// Where [`Report::write_to`] put the artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenReport {
    pub chart: PathBuf,
    pub markup: PathBuf,
}

impl Report {
    pub fn chart_file_name_for(extension: &str) -> String {
        format!("{CHART_FILE_STEM}.{extension}")
    }

    pub fn chart_file_name(&self) -> String {
        Self::chart_file_name_for(self.chart_extension)
    }

    /// Write chart and markup into `dir`, creating it if needed.
    /// Existing files are overwritten.
    pub fn write_to(&self, dir: &Path) -> Result<WrittenReport, CoreError> {
        fs::create_dir_all(dir).map_err(|source| CoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let chart = dir.join(self.chart_file_name());
        fs::write(&chart, &self.chart).map_err(|source| CoreError::Io {
            path: chart.clone(),
            source,
        })?;

        let markup = dir.join(MARKUP_FILE_NAME);
        fs::write(&markup, &self.markup).map_err(|source| CoreError::Io {
            path: markup.clone(),
            source,
        })?;

        info!(chart = %chart.display(), markup = %markup.display(), "report written");
        Ok(WrittenReport { chart, markup })
    }
}

pub trait ReportRenderer {
    fn render(&self, snapshot: &Snapshot) -> Result<Report, CoreError>;
}
