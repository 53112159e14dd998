//! Remote fetch
//!
//! The ingestor only needs "give me the bytes behind this URL". `Fetcher` is
//! that seam; `HttpFetcher` is the reqwest-backed implementation with a
//! timeout and a hard size cap.

use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;

use crate::error::IngestError;
use crate::storage::validation::check_size;

/// Source of remote bytes
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Download the full body behind `url`, failing with a categorized error
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, IngestError>;
}

/// HTTP(S) fetcher bounded by a timeout and a maximum body size
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_bytes: u64,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, max_bytes: u64) -> Result<Self, IngestError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IngestError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, max_bytes })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, IngestError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::FetchFailed(format!(
                "HTTP {status} from {}",
                redact_url(url)
            )));
        }

        // Fail fast on an advertised length, then keep counting while streaming
        let advertised = response.content_length();
        if let Some(len) = advertised {
            check_size(len, self.max_bytes)?;
        }

        let mut body = Vec::with_capacity(advertised.unwrap_or(0) as usize);
        while let Some(chunk) = response.chunk().await.map_err(|e| transport_error(url, e))? {
            check_size((body.len() + chunk.len()) as u64, self.max_bytes)?;
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }
}

/// Categorize a reqwest error. The URL is stripped: file URLs can embed credentials.
fn transport_error(url: &str, error: reqwest::Error) -> IngestError {
    if error.is_timeout() {
        IngestError::FetchTimeout(redact_url(url))
    } else {
        IngestError::FetchFailed(error.without_url().to_string())
    }
}

/// Scheme and host of `url` only, safe to log or show to users
pub fn redact_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match (parsed.host_str(), parsed.port()) {
            (Some(host), Some(port)) => format!("{}://{}:{}", parsed.scheme(), host, port),
            (Some(host), None) => format!("{}://{}", parsed.scheme(), host),
            (None, _) => format!("{}:", parsed.scheme()),
        },
        Err(_) => "<invalid url>".to_string(),
    }
}

/// Extension hint from the last path segment of `url`, or `""` if there is none
pub fn extension_hint(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return String::new();
    };

    parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|last| last.rsplit_once('.'))
        .map(|(_, ext)| ext.to_string())
        .unwrap_or_default()
}
