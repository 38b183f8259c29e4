//! Local filesystem article source.
//!
//! Reads the collection from a JSON file and writes merged collections back
//! atomically (temp file, then rename).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Article;
use crate::storage::ArticleSource;

/// Article source backed by a file on disk.
#[derive(Debug, Clone)]
pub struct LocalSource {
    path: PathBuf,
    location: String,
}

impl LocalSource {
    /// Create a source for the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let location = path.display().to_string();
        Self { path, location }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate the collection, treating a missing file as empty.
    pub async fn read_or_empty(&self) -> Result<Vec<Article>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Article::parse_collection(&bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("No article file at {}, starting empty", self.location);
                Ok(Vec::new())
            }
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Write the collection as pretty JSON, atomically.
    pub async fn write(&self, articles: &[Article]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(articles)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        log::info!("Wrote {} articles to {}", articles.len(), self.location);
        Ok(())
    }
}

#[async_trait]
impl ArticleSource for LocalSource {
    fn location(&self) -> &str {
        &self.location
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| AppError::fetch(&self.location, e))
    }
}
