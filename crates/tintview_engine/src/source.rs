use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tintview_logging::tint_debug;

use crate::sizing::SizingRule;
use crate::{FailureKind, FetchError};

/// Endpoint answering `GET` with `{"url": "<image url>"}`.
pub const DEFAULT_ENDPOINT: &str = "https://november7-730026606190.europe-west1.run.app/image";

#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_body_bytes: u64,
    pub sizing: SizingRule,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(10),
            max_body_bytes: 64 * 1024,
            sizing: SizingRule::default(),
        }
    }
}

#[async_trait::async_trait]
pub trait ImageSource: Send + Sync {
    /// One attempt, no retry, no caching.
    async fn fetch_image_url(&self) -> Result<String, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestImageSource {
    settings: SourceSettings,
}

impl ReqwestImageSource {
    pub fn new(settings: SourceSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, FetchError> {
        let max_bytes = self.settings.max_body_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::MalformedResponse,
                    format!("response body of {content_len} bytes exceeds {max_bytes}"),
                ));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            if body.len() as u64 + chunk.len() as u64 > max_bytes {
                return Err(FetchError::new(
                    FailureKind::MalformedResponse,
                    format!("response body exceeds {max_bytes} bytes"),
                ));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl ImageSource for ReqwestImageSource {
    async fn fetch_image_url(&self) -> Result<String, FetchError> {
        let endpoint = reqwest::Url::parse(&self.settings.endpoint)
            .map_err(|err| FetchError::new(FailureKind::InvalidEndpoint, err.to_string()))?;
        let client = self.build_client()?;

        let response = client
            .get(endpoint)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = self.read_body(response).await?;
        let url = parse_url_field(&body)?;
        let sized = self.settings.sizing.apply(&url);
        if sized != url {
            tint_debug!("bounded image size: {} -> {}", url, sized);
        }
        Ok(sized)
    }
}

/// Extracts the non-empty string field `url` from a JSON object body.
pub fn parse_url_field(body: &[u8]) -> Result<String, FetchError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| FetchError::new(FailureKind::MalformedResponse, err.to_string()))?;
    match value.get("url") {
        Some(Value::String(url)) if !url.trim().is_empty() => Ok(url.trim().to_string()),
        Some(Value::String(_)) => Err(FetchError::new(
            FailureKind::MalformedResponse,
            "field `url` is empty",
        )),
        Some(other) => Err(FetchError::new(
            FailureKind::MalformedResponse,
            format!("field `url` is not a string: {other}"),
        )),
        None => Err(FetchError::new(
            FailureKind::MalformedResponse,
            "missing field `url`",
        )),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
