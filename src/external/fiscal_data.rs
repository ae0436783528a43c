use crate::config::ReferenceDataConfig;
use crate::external::reference_data::{ReferenceDataError, ReferenceDataProvider};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

/// US Treasury fiscal data feed (average interest rates on marketable securities)
pub struct FiscalDataProvider {
    client: reqwest::Client,
    url: String,
}

impl FiscalDataProvider {
    pub fn new(config: &ReferenceDataConfig) -> Result<Self, ReferenceDataError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ReferenceDataError::Network(e.to_string()))?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct FiscalDataResponse {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

#[async_trait]
impl ReferenceDataProvider for FiscalDataProvider {
    async fn fetch_latest(&self) -> Result<serde_json::Value, ReferenceDataError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ReferenceDataError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ReferenceDataError::BadResponse(format!(
                "fiscal data feed returned status: {}",
                status
            )));
        }

        let body: FiscalDataResponse = resp
            .json()
            .await
            .map_err(|e| ReferenceDataError::Parse(e.to_string()))?;

        let latest = latest_record(body);
        info!("Fetched real-world treasury data: {}", latest);

        Ok(latest)
    }
}

fn latest_record(body: FiscalDataResponse) -> serde_json::Value {
    body.data
        .into_iter()
        .next()
        .unwrap_or_else(|| serde_json::json!({}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_record_takes_first_entry() {
        let body: FiscalDataResponse = serde_json::from_str(
            r#"{"data":[{"record_date":"2025-09-30","avg_interest_rate_amt":"4.012"},{"record_date":"2025-08-31"}],"meta":{"count":2}}"#,
        )
        .unwrap();
        let latest = latest_record(body);
        assert_eq!(latest["record_date"], "2025-09-30");
        assert_eq!(latest["avg_interest_rate_amt"], "4.012");
    }

    #[test]
    fn test_latest_record_empty_feed() {
        let body: FiscalDataResponse = serde_json::from_str(r#"{"meta":{"count":0}}"#).unwrap();
        assert_eq!(latest_record(body), serde_json::json!({}));
    }
}
