// Sheets values API HTTP client
//
// Wraps `reqwest::Client` with URL construction, credential injection and
// error-envelope parsing. Only the single read endpoint needed to pull an
// endpoint list is implemented.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{ErrorEnvelope, ValueRange};
use crate::transport::TransportConfig;

/// Public Google Sheets API root.
pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

/// How requests are authenticated.
///
/// The interactive OAuth consent flow is not handled here: a bearer token
/// must already have been issued by some other tool.
#[derive(Debug, Clone, Default)]
pub enum SheetsAuth {
    /// No credentials (works for publicly shared sheets via the API proxy only).
    #[default]
    Anonymous,
    /// API key, sent as the `key` query parameter.
    ApiKey(SecretString),
    /// Pre-issued OAuth access token, sent as `Authorization: Bearer`.
    BearerToken(SecretString),
}

/// Raw HTTP client for `spreadsheets.values.get`.
pub struct SheetsClient {
    http: reqwest::Client,
    base_url: Url,
    auth: SheetsAuth,
}

impl SheetsClient {
    /// Create a client from a `TransportConfig`.
    pub fn new(base_url: Url, auth: SheetsAuth, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            auth,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client, auth: SheetsAuth) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            auth,
        })
    }

    /// Build `{base}/v4/spreadsheets/{id}/values/{range}` with each part
    /// percent-encoded as a single path segment.
    fn values_url(&self, spreadsheet_id: &str, range: &str) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::UnusableBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", spreadsheet_id, "values", range]);

        if let SheetsAuth::ApiKey(ref key) = self.auth {
            url.query_pairs_mut().append_pair("key", key.expose_secret());
        }
        Ok(url)
    }

    /// Fetch all cell values of `range` (A1 notation or a sheet name).
    pub async fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<ValueRange, Error> {
        let url = self.values_url(spreadsheet_id, range)?;
        // Path only: the query string may carry the API key.
        debug!(path = url.path(), "GET sheet values");

        let mut request = self.http.get(url);
        if let SheetsAuth::BearerToken(ref token) = self.auth {
            request = request.bearer_auth(token.expose_secret());
        }

        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(error_from_response(status.as_u16(), &body, spreadsheet_id, range));
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

/// Translate a non-success response into the matching error variant.
fn error_from_response(status: u16, body: &str, spreadsheet_id: &str, range: &str) -> Error {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|env| match env.error.status {
            Some(code) if !env.error.message.is_empty() => format!("{code}: {}", env.error.message),
            Some(code) => code,
            None => env.error.message,
        })
        .unwrap_or_else(|_| body.trim().to_owned());

    match status {
        401 | 403 => Error::Authentication { status, message },
        404 => Error::NotFound {
            spreadsheet_id: spreadsheet_id.to_owned(),
            range: range.to_owned(),
        },
        _ => Error::Api { status, message },
    }
}
