//! Warehouse API HTTP client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::debug;

use crate::config::{ApiConfig, ApiMode, AppConfig};
use crate::error::{AppError, Result};
use crate::models::ScanRecord;
use crate::scan::{
    CommitReceipt, MockCommitter, MockValidator, MoveCommitter, ScanRequest, ScanValidator, Verdict,
};

/// Response body of the scan validation endpoint.
#[derive(Debug, Deserialize)]
struct ValidateResponse {
    accepted: bool,
    #[serde(default)]
    reason: Option<String>,
}

/// Response body of the move endpoint.
#[derive(Debug, Default, Deserialize)]
struct MoveResponse {
    #[serde(default)]
    reference: Option<String>,
}

/// Error body returned by the API on failure.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(alias = "message")]
    error: String,
}

/// Warehouse API HTTP client.
///
/// Validates scans against the bin/asset registry and commits moves.
/// Serves as both the [`ScanValidator`] and the [`MoveCommitter`] of a flow.
pub struct WarehouseApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl WarehouseApiClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The API root (e.g., "http://wms.local:8080")
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Create a client from API settings.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(AppError::config("Warehouse API base URL is not set"));
        }
        let client = Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))?;
        let token = config.token.trim();
        Ok(client.with_token((!token.is_empty()).then(|| token.to_string())))
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{base}{path}", base = self.base_url)
    }

    async fn post_json<T: serde::Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<String> {
        let url = self.endpoint(path);
        debug!("POST {url}");

        let mut request = self.client.post(&url).json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        read_body(response).await
    }

    /// Test connection to the API root.
    pub async fn test_connection(&self) -> Result<bool> {
        let response = self.client.get(self.endpoint("/")).send().await?;
        Ok(response.status().is_success())
    }
}

/// Read a response body, turning non-success statuses into API errors.
async fn read_body(response: Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        Ok(body)
    } else {
        Err(AppError::api(status.as_u16(), error_message(&body)))
    }
}

/// Extract the error message from an API error body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => "empty response".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

fn parse_verdict(body: &str) -> Result<Verdict> {
    let parsed: ValidateResponse = serde_json::from_str(body)
        .map_err(|e| AppError::parse(format!("Invalid validation response: {e}")))?;

    if parsed.accepted {
        Ok(Verdict::Accept)
    } else {
        Ok(Verdict::Reject(parsed.reason.filter(|r| !r.trim().is_empty())))
    }
}

fn parse_receipt(body: &str) -> Result<CommitReceipt> {
    if body.trim().is_empty() {
        return Ok(CommitReceipt::default());
    }
    let parsed: MoveResponse =
        serde_json::from_str(body).map_err(|e| AppError::parse(format!("Invalid move response: {e}")))?;
    Ok(CommitReceipt {
        reference: parsed.reference,
    })
}

#[async_trait]
impl ScanValidator for WarehouseApiClient {
    async fn validate(&self, request: &ScanRequest) -> Result<Verdict> {
        let body = self.post_json("/api/scans/validate", request).await?;
        parse_verdict(&body)
    }
}

#[async_trait]
impl MoveCommitter for WarehouseApiClient {
    async fn commit(&self, record: &ScanRecord) -> Result<CommitReceipt> {
        let body = self.post_json("/api/moves", record).await?;
        parse_receipt(&body)
    }
}

/// Collaborators selected by the API mode.
pub struct Collaborators {
    pub validator: Arc<dyn ScanValidator>,
    pub committer: Arc<dyn MoveCommitter>,
}

/// Build the validator and committer for `config`.
///
/// `force_mock` overrides the configured mode.
pub fn build_collaborators(config: &AppConfig, force_mock: bool) -> Result<Collaborators> {
    let mode = if force_mock { ApiMode::Mock } else { config.api.mode };

    match mode {
        ApiMode::Mock => Ok(Collaborators {
            validator: Arc::new(MockValidator::new(Duration::from_millis(config.scan.validate_delay_ms))),
            committer: Arc::new(MockCommitter::new(Duration::from_millis(config.scan.commit_delay_ms))),
        }),
        ApiMode::Http => {
            let client = Arc::new(WarehouseApiClient::from_config(&config.api)?);
            Ok(Collaborators {
                validator: client.clone(),
                committer: client,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let client = WarehouseApiClient::new("http://localhost:8080/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.endpoint("/api/moves"), "http://localhost:8080/api/moves");
    }

    #[test]
    fn test_from_config_ignores_blank_token() {
        let mut config = ApiConfig {
            base_url: "http://localhost".to_string(),
            token: "   ".to_string(),
            ..ApiConfig::default()
        };
        assert!(WarehouseApiClient::from_config(&config).unwrap().token.is_none());

        config.token = "secret".to_string();
        assert_eq!(
            WarehouseApiClient::from_config(&config).unwrap().token.as_deref(),
            Some("secret")
        );
    }

    #[test]
    fn test_from_config_requires_base_url() {
        let config = ApiConfig::default();
        assert!(matches!(
            WarehouseApiClient::from_config(&config),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_parse_accepted_verdict() {
        assert_eq!(parse_verdict(r#"{"accepted": true}"#).unwrap(), Verdict::Accept);
    }

    #[test]
    fn test_parse_rejected_verdict() {
        assert_eq!(
            parse_verdict(r#"{"accepted": false, "reason": "Bin BIN-9 is locked"}"#).unwrap(),
            Verdict::Reject(Some("Bin BIN-9 is locked".to_string()))
        );
        assert_eq!(
            parse_verdict(r#"{"accepted": false, "reason": ""}"#).unwrap(),
            Verdict::Reject(None)
        );
    }

    #[test]
    fn test_parse_invalid_verdict() {
        assert!(matches!(parse_verdict("<html>"), Err(AppError::Parse(_))));
    }

    #[test]
    fn test_parse_receipt() {
        assert_eq!(
            parse_receipt(r#"{"reference": "MV-1001"}"#).unwrap().reference.as_deref(),
            Some("MV-1001")
        );
        assert_eq!(parse_receipt("").unwrap(), CommitReceipt::default());
        assert_eq!(parse_receipt("{}").unwrap(), CommitReceipt::default());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(r#"{"error": "asset not found"}"#), "asset not found");
        assert_eq!(error_message(r#"{"message": "bin full"}"#), "bin full");
        assert_eq!(error_message("  Service Unavailable \n"), "Service Unavailable");
        assert_eq!(error_message(""), "empty response");
    }

    #[test]
    fn test_build_mock_collaborators_when_forced() {
        let mut config = AppConfig::default();
        config.api.mode = ApiMode::Http;
        config.api.base_url = "http://localhost:8080".to_string();
        assert!(build_collaborators(&config, true).is_ok());
        assert!(build_collaborators(&config, false).is_ok());
    }
}
