//! HTTP client for the external document-analysis service.
//!
//! The service receives a document as a data URI and answers with the
//! chemicals it found. Configuration comes from [`LabConfig`](crate::config::LabConfig):
//! - `extractor_url` - Endpoint that accepts `POST {"fileDataUri": ...}`
//! - `extractor_api_key` - Bearer token (optional)

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::LabConfig;
use crate::models::ExtractedChemical;

/// Extraction errors.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Unauthorized: extractor API key required or invalid")]
    Unauthorized,

    #[error("Extraction service error: {0}")]
    Service(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest<'a> {
    file_data_uri: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    chemicals: Vec<ExtractedChemical>,
}

/// Check that `uri` has the form `data:<mimetype>;base64,<data>`.
pub fn validate_data_uri(uri: &str) -> Result<(), ExtractionError> {
    let invalid = |msg: &str| Err(ExtractionError::InvalidDocument(msg.to_string()));

    let Some(rest) = uri.strip_prefix("data:") else {
        return invalid("expected a data URI");
    };
    let Some((mime, data)) = rest.split_once(";base64,") else {
        return invalid("data URI must be base64 encoded");
    };
    if !mime.contains('/') {
        return invalid("data URI is missing a MIME type");
    }
    if data.trim().is_empty() {
        return invalid("document is empty");
    }
    Ok(())
}

/// Client for the document-analysis service.
#[derive(Debug, Clone)]
pub struct HttpExtractor {
    url: String,
    api_key: Option<String>,
    client: Client,
}

impl HttpExtractor {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            url: url.into(),
            api_key,
            client: Client::new(),
        }
    }

    /// `None` when no extractor URL is configured.
    pub fn from_config(config: &LabConfig) -> Option<Self> {
        config
            .extractor_url
            .as_ref()
            .map(|url| Self::new(url.clone(), config.extractor_api_key.clone()))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a document for analysis and return the chemicals found, in the
    /// service's order.
    pub async fn analyze(
        &self,
        file_data_uri: &str,
    ) -> Result<Vec<ExtractedChemical>, ExtractionError> {
        validate_data_uri(file_data_uri)?;

        let mut request = self
            .client
            .post(&self.url)
            .json(&AnalyzeRequest { file_data_uri });
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            let body: AnalyzeResponse = response.json().await?;
            tracing::debug!("Extractor returned {} chemicals", body.chemicals.len());
            Ok(body.chemicals)
        } else {
            let body = response.text().await.unwrap_or_default();
            match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    Err(ExtractionError::Unauthorized)
                }
                _ => Err(ExtractionError::Service(format!("{}: {}", status, body))),
            }
        }
    }
}
