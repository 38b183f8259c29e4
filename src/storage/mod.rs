//! Article collection loading.
//!
//! The collection is a single JSON array produced by an external ingestion
//! job. It is fetched once per process through an [`ArticleSource`] and kept
//! in a [`DataStore`] as a shared, read-only set.
//!
//! ## Locations
//!
//! ```text
//! https://host/feed/data.json     # HttpSource
//! ./data.json + base_url          # HttpSource (resolved against base_url)
//! ./public/data.json              # LocalSource
//! ```

pub mod local;
pub mod remote;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{Article, SourceConfig};
use crate::utils::{is_remote, resolve};

// Re-export for convenience
pub use local::LocalSource;
pub use remote::HttpSource;

/// Transport for the raw article payload.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Human-readable location used in logs and errors.
    fn location(&self) -> &str;

    /// Fetch the raw payload. Transport failures map to [`AppError::Fetch`].
    async fn fetch(&self) -> Result<Vec<u8>>;
}

/// Build the source described by the configuration.
pub fn source_from_config(config: &SourceConfig) -> Result<Box<dyn ArticleSource>> {
    let location = config.location.trim();
    if is_remote(location) {
        return Ok(Box::new(HttpSource::new(location, config)?));
    }
    if let Some(base) = config.base_url.as_deref() {
        let url = resolve(base, location)
            .ok_or_else(|| AppError::config(format!("invalid source.base_url '{base}'")))?;
        return Ok(Box::new(HttpSource::new(&url, config)?));
    }
    Ok(Box::new(LocalSource::new(location)))
}

/// Load state of the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Error,
}

/// Holds the loaded article set and its load state.
#[derive(Debug)]
pub struct DataStore {
    status: LoadStatus,
    articles: Arc<Vec<Article>>,
    error_message: Option<String>,
}

impl DataStore {
    /// Create an empty store waiting for its single load.
    pub fn new() -> Self {
        Self {
            status: LoadStatus::Loading,
            articles: Arc::new(Vec::new()),
            error_message: None,
        }
    }

    /// Fetch and parse the collection.
    ///
    /// Only the first call does any work; once the store is `Ready` or
    /// `Error` further calls return without refetching.
    pub async fn load(&mut self, source: &dyn ArticleSource) -> Result<()> {
        if self.status != LoadStatus::Loading {
            log::debug!(
                "Article load already settled ({:?}), not fetching {} again",
                self.status,
                source.location()
            );
            return Ok(());
        }

        log::info!("Loading articles from {}", source.location());
        match Self::fetch_and_parse(source).await {
            Ok(articles) => {
                log::info!("Loaded {} articles", articles.len());
                self.articles = Arc::new(articles);
                self.status = LoadStatus::Ready;
                Ok(())
            }
            Err(e) => {
                log::error!("Article load failed: {}", e);
                self.error_message = Some(e.to_string());
                self.status = LoadStatus::Error;
                Err(e)
            }
        }
    }

    async fn fetch_and_parse(source: &dyn ArticleSource) -> Result<Vec<Article>> {
        let bytes = source.fetch().await?;
        Article::parse_collection(&bytes)
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// The loaded set. Empty until the store is ready.
    pub fn articles(&self) -> &Arc<Vec<Article>> {
        &self.articles
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}
