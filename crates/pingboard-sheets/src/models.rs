// Wire types for the Sheets `spreadsheets.values.get` endpoint.

use serde::Deserialize;

/// A block of cell values returned by `values.get`.
///
/// Trailing empty cells and rows are omitted by the API, so rows can be
/// shorter than the header and `values` is absent for an empty range.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

/// Error envelope: `{ "error": { "code": 404, "message": "...", "status": "NOT_FOUND" } }`
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}
