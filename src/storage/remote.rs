//! HTTP(S) article source.

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::SourceConfig;
use crate::storage::ArticleSource;
use crate::utils::http;

/// Article source fetched with a single GET request.
pub struct HttpSource {
    url: url::Url,
    location: String,
    client: reqwest::Client,
}

impl HttpSource {
    /// Create a source for an absolute URL.
    pub fn new(url: &str, config: &SourceConfig) -> Result<Self> {
        let url = url::Url::parse(url)?;
        let client = http::create_async_client(config)?;
        Ok(Self {
            location: url.to_string(),
            url,
            client,
        })
    }
}

#[async_trait]
impl ArticleSource for HttpSource {
    fn location(&self) -> &str {
        &self.location
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| AppError::fetch(&self.location, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(&self.location, format!("HTTP {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::fetch(&self.location, e))?;
        log::debug!("Fetched {} bytes from {}", bytes.len(), self.location);
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_relative_url() {
        let err = HttpSource::new("data.json", &SourceConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Url(_)));
    }

    #[test]
    fn test_location_is_normalized() {
        let source = HttpSource::new("https://Example.com/feed/data.json", &SourceConfig::default())
            .unwrap();
        assert_eq!(source.location(), "https://example.com/feed/data.json");
    }
}
