use pingboard_sheets::transport::TransportConfig;
use pingboard_sheets::{SheetsAuth, SheetsClient};
use tracing::info;

use super::{EndpointSource, rows_to_endpoints};
use crate::config::{SheetCredentials, SourceConfig};
use crate::error::CoreError;
use crate::model::Endpoint;

/// Reads endpoints from a spreadsheet range. The first row is a header.
pub struct SheetSource {
    client: SheetsClient,
    spreadsheet_id: String,
    range: String,
}

impl SheetSource {
    pub fn new(client: SheetsClient, spreadsheet_id: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            client,
            spreadsheet_id: spreadsheet_id.into(),
            range: range.into(),
        }
    }

    pub(crate) fn from_config(config: &SourceConfig) -> Result<Self, CoreError> {
        let SourceConfig::Sheets {
            base_url,
            spreadsheet_id,
            range,
            credentials,
            timeout,
        } = config
        else {
            return Err(CoreError::Validation {
                field: "source.kind".into(),
                reason: "expected a sheets source".into(),
            });
        };

        let transport = TransportConfig::default().with_timeout(*timeout);
        let client = SheetsClient::new(base_url.clone(), sheets_auth(credentials), &transport)?;
        Ok(Self::new(client, spreadsheet_id.clone(), range.clone()))
    }
}

fn sheets_auth(credentials: &SheetCredentials) -> SheetsAuth {
    match credentials {
        SheetCredentials::None => SheetsAuth::Anonymous,
        SheetCredentials::ApiKey(key) => SheetsAuth::ApiKey(key.clone()),
        SheetCredentials::BearerToken(token) => SheetsAuth::BearerToken(token.clone()),
    }
}

impl EndpointSource for SheetSource {
    async fn fetch_endpoints(&self) -> Result<Vec<Endpoint>, CoreError> {
        let values = self
            .client
            .get_values(&self.spreadsheet_id, &self.range)
            .await?;

        let rows = values.values.len();
        let endpoints = rows_to_endpoints(values.values.into_iter().skip(1));
        info!(
            spreadsheet = %self.spreadsheet_id,
            range = %self.range,
            rows,
            endpoints = endpoints.len(),
            "loaded endpoints from spreadsheet"
        );
        Ok(endpoints)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SHEETS_TIMEOUT;

    #[test]
    fn from_config_rejects_file_config() {
        let config = SourceConfig::File {
            path: "endpoints.csv".into(),
        };
        assert!(matches!(
            SheetSource::from_config(&config),
            Err(CoreError::Validation { .. })
        ));
    }

    #[test]
    fn from_config_builds_client() {
        let config = SourceConfig::Sheets {
            base_url: "https://sheets.example.test".parse().unwrap(),
            spreadsheet_id: "abc".into(),
            range: "Dashboard".into(),
            credentials: SheetCredentials::None,
            timeout: DEFAULT_SHEETS_TIMEOUT,
        };
        let source = SheetSource::from_config(&config).unwrap();
        assert_eq!(source.spreadsheet_id, "abc");
        assert_eq!(source.range, "Dashboard");
    }
}
