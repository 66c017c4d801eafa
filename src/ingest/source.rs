//! Archive source loading
//!
//! A source is either a local path or an `http(s)` URL.

use std::time::Duration;

use reqwest::Url;

use crate::error::ConvertError;

/// Whether `source` should be fetched over HTTP
pub fn is_remote(source: &str) -> bool {
    Url::parse(source)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Read the raw bytes of an archive
pub async fn load_source(source: &str, timeout: Duration) -> Result<Vec<u8>, ConvertError> {
    if is_remote(source) {
        fetch_archive(source, timeout).await
    } else {
        log::info!("reading archive from {}", source);
        tokio::fs::read(source).await.map_err(|source_err| ConvertError::Io {
            path: source.to_string(),
            source: source_err,
        })
    }
}

/// Fetch an archive over HTTP
async fn fetch_archive(url: &str, timeout: Duration) -> Result<Vec<u8>, ConvertError> {
    log::info!("fetching archive from {}", url);

    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ConvertError::HttpStatus {
            status,
            url: url.to_string(),
        });
    }

    let bytes = response.bytes().await?;
    log::debug!("fetched {} bytes", bytes.len());

    Ok(bytes.to_vec())
}
