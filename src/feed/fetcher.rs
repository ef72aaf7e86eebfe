use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const MAX_RETRIES: u32 = 3;
const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while loading feed bytes.
///
/// Remote locations can fail on the network, local ones on the
/// filesystem; either way the run aborts before decoding starts.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the 30-second timeout
    #[error("Request timed out")]
    Timeout,
    /// Server returned 429 Too Many Requests after max retries
    #[error("Rate limited after {0} retries")]
    RateLimited(u32),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Location parsed as a URL with a scheme this tool does not speak
    #[error("Unsupported scheme: {0} (only http/https, or a local path)")]
    UnsupportedScheme(String),
    /// Local feed file could not be read
    #[error("Failed to read local feed: {0}")]
    Read(#[from] std::io::Error),
}

/// Loads raw feed bytes from a location: an http(s) URL is fetched,
/// anything that does not parse as an absolute URL is read as a local
/// path. Other schemes (`file://`, `ftp://`, ...) are rejected rather
/// than misread as paths.
pub async fn load(client: &reqwest::Client, location: &str) -> Result<Vec<u8>, SourceError> {
    match Url::parse(location) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => fetch_remote(client, location).await,
        Ok(url) => Err(SourceError::UnsupportedScheme(url.scheme().to_owned())),
        Err(_) => {
            tracing::debug!(path = location, "reading local feed");
            Ok(tokio::fs::read(location).await?)
        }
    }
}

async fn fetch_remote(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, SourceError> {
    let mut retry_count = 0;

    loop {
        let response = tokio::time::timeout(FETCH_TIMEOUT, client.get(url).send())
            .await
            .map_err(|_| SourceError::Timeout)?
            .map_err(SourceError::Network)?;

        // Rate limiting gets exponential backoff before giving up
        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            if retry_count >= MAX_RETRIES {
                return Err(SourceError::RateLimited(MAX_RETRIES));
            }

            let delay_secs = 2u64.pow(retry_count); // 2s, 4s, 8s
            tracing::warn!(
                feed = url,
                retry = retry_count,
                delay_secs = delay_secs,
                "Rate limited, backing off"
            );
            tokio::time::sleep(Duration::from_secs(delay_secs)).await;
            retry_count += 1;
            continue;
        }

        // Server errors (5xx) are retried the same way
        if response.status().is_server_error() {
            if retry_count >= MAX_RETRIES {
                return Err(SourceError::HttpStatus(response.status().as_u16()));
            }

            let delay_secs = 2u64.pow(retry_count);
            tracing::warn!(
                feed = url,
                status = %response.status(),
                retry = retry_count,
                delay_secs = delay_secs,
                "Server error, retrying after delay"
            );
            tokio::time::sleep(Duration::from_secs(delay_secs)).await;
            retry_count += 1;
            continue;
        }

        // Client errors (4xx) fail immediately
        if !response.status().is_success() {
            return Err(SourceError::HttpStatus(response.status().as_u16()));
        }

        return read_limited_bytes(response, MAX_FEED_SIZE).await;
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, SourceError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(SourceError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(SourceError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(SourceError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
