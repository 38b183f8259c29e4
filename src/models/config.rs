//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{ActiveView, Language};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the article collection is fetched from
    #[serde(default)]
    pub source: SourceConfig,

    /// Fuzzy search tuning
    #[serde(default)]
    pub search: SearchConfig,

    /// Rendering defaults
    #[serde(default)]
    pub view: ViewConfig,

    /// Tags that get a labelled badge
    #[serde(default = "defaults::known_tags")]
    pub known_tags: Vec<KnownTag>,

    /// User-facing message templates
    #[serde(default)]
    pub messages: Messages,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.source.location.trim().is_empty() {
            return Err(AppError::validation("source.location is empty"));
        }
        if self.source.timeout_secs == 0 {
            return Err(AppError::validation("source.timeout_secs must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.search.threshold) {
            return Err(AppError::validation(
                "search.threshold must be between 0.0 and 1.0",
            ));
        }
        if self.search.min_token_chars == 0 {
            return Err(AppError::validation("search.min_token_chars must be > 0"));
        }
        if self.search.keys.is_empty() {
            return Err(AppError::validation("search.keys is empty"));
        }
        if self.view.page_size == 0 {
            return Err(AppError::validation("view.page_size must be > 0"));
        }
        if self.view.max_card_tags == 0 {
            return Err(AppError::validation("view.max_card_tags must be > 0"));
        }
        if let Some(tag) = self.known_tags.iter().find(|t| t.name.trim().is_empty()) {
            return Err(AppError::validation(format!(
                "known tag with label '{}' has an empty name",
                tag.label
            )));
        }
        Ok(())
    }

    /// Look up the badge label for a known tag.
    pub fn known_tag(&self, name: &str) -> Option<&KnownTag> {
        self.known_tags.iter().find(|t| t.name == name)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            search: SearchConfig::default(),
            view: ViewConfig::default(),
            known_tags: defaults::known_tags(),
            messages: Messages::default(),
        }
    }
}

/// Data source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// File path or URL of the JSON article array
    #[serde(default = "defaults::location")]
    pub location: String,

    /// Base URL that relative locations are resolved against
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: defaults::location(),
            base_url: None,
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// A field the fuzzy index matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchKey {
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "content.en")]
    ContentEn,
    #[serde(rename = "content.tr")]
    ContentTr,
    #[serde(rename = "authors")]
    Authors,
    #[serde(rename = "id")]
    Id,
}

/// Fuzzy search tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Largest normalized edit distance still accepted as a match (0 = exact)
    #[serde(default = "defaults::threshold")]
    pub threshold: f64,

    /// Query words shorter than this only match as substrings
    #[serde(default = "defaults::min_token_chars")]
    pub min_token_chars: usize,

    /// Fields searched
    #[serde(default = "defaults::search_keys")]
    pub keys: Vec<SearchKey>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: defaults::threshold(),
            min_token_chars: defaults::min_token_chars(),
            keys: defaults::search_keys(),
        }
    }
}

/// Rendering defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Cards per page
    #[serde(default = "defaults::page_size")]
    pub page_size: usize,

    /// Language cards open in
    #[serde(default)]
    pub default_language: Language,

    /// View shown on start
    #[serde(default)]
    pub default_view: ActiveView,

    /// Collapsed card preview length in characters
    #[serde(default = "defaults::preview_chars")]
    pub preview_chars: usize,

    /// Tags shown on a card
    #[serde(default = "defaults::max_card_tags")]
    pub max_card_tags: usize,

    /// Titles listed on the dashboard
    #[serde(default = "defaults::dashboard_recent")]
    pub dashboard_recent: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: defaults::page_size(),
            default_language: Language::default(),
            default_view: ActiveView::default(),
            preview_chars: defaults::preview_chars(),
            max_card_tags: defaults::max_card_tags(),
            dashboard_recent: defaults::dashboard_recent(),
        }
    }
}

/// A tag with distinguishing display treatment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KnownTag {
    /// Category name, e.g. `cs.CR`
    pub name: String,

    /// Human-readable label
    pub label: String,
}

/// Message templates.
///
/// Supported placeholders: `{count}`, `{total}`, `{error}`, `{remaining}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Messages {
    #[serde(default = "defaults::msg_loading")]
    pub loading: String,
    #[serde(default = "defaults::msg_load_error")]
    pub load_error: String,
    #[serde(default = "defaults::msg_empty")]
    pub empty: String,
    #[serde(default = "defaults::msg_empty_hint")]
    pub empty_hint: String,
    #[serde(default = "defaults::msg_count")]
    pub count: String,
    #[serde(default = "defaults::msg_more")]
    pub more: String,
    #[serde(default = "defaults::msg_tr_unavailable")]
    pub tr_unavailable: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            loading: defaults::msg_loading(),
            load_error: defaults::msg_load_error(),
            empty: defaults::msg_empty(),
            empty_hint: defaults::msg_empty_hint(),
            count: defaults::msg_count(),
            more: defaults::msg_more(),
            tr_unavailable: defaults::msg_tr_unavailable(),
        }
    }
}

mod defaults {
    use super::{KnownTag, SearchKey};

    // Source defaults
    pub fn location() -> String {
        "./public/data.json".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; arxiv-feed/0.1)".into()
    }

    // Search defaults
    pub fn threshold() -> f64 {
        0.3
    }
    pub fn min_token_chars() -> usize {
        3
    }
    pub fn search_keys() -> Vec<SearchKey> {
        vec![
            SearchKey::Title,
            SearchKey::ContentEn,
            SearchKey::ContentTr,
            SearchKey::Authors,
            SearchKey::Id,
        ]
    }

    // View defaults
    pub fn page_size() -> usize {
        10
    }
    pub fn preview_chars() -> usize {
        280
    }
    pub fn max_card_tags() -> usize {
        3
    }
    pub fn dashboard_recent() -> usize {
        5
    }

    // Tag defaults
    pub fn known_tags() -> Vec<KnownTag> {
        [
            ("cs.CR", "Security"),
            ("cs.AI", "AI"),
            ("cs.LG", "Machine Learning"),
            ("cs.PL", "Programming Languages"),
        ]
        .into_iter()
        .map(|(name, label)| KnownTag {
            name: name.to_string(),
            label: label.to_string(),
        })
        .collect()
    }

    // Message defaults
    pub fn msg_loading() -> String {
        "Makaleler yükleniyor...".into()
    }
    pub fn msg_load_error() -> String {
        "⚠️ Hata: {error}".into()
    }
    pub fn msg_empty() -> String {
        "📭 Sonuç bulunamadı".into()
    }
    pub fn msg_empty_hint() -> String {
        "Farklı filtreler veya arama terimleri deneyin".into()
    }
    pub fn msg_count() -> String {
        "{count} / {total} makale".into()
    }
    pub fn msg_more() -> String {
        "... {remaining} makale daha (more)".into()
    }
    pub fn msg_tr_unavailable() -> String {
        "Türkçe özet yok".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_location() {
        let mut config = Config::default();
        config.source.location = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_threshold() {
        let mut config = Config::default();
        config.search.threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_page_size() {
        let mut config = Config::default();
        config.view.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [source]
            location = "https://example.com/data.json"

            [search]
            threshold = 0.2
            keys = ["title", "content.en"]

            [view]
            default_language = "en"
            "#,
        )
        .unwrap();

        assert_eq!(config.source.location, "https://example.com/data.json");
        assert_eq!(config.source.timeout_secs, 30);
        assert_eq!(config.search.keys, vec![SearchKey::Title, SearchKey::ContentEn]);
        assert_eq!(config.search.min_token_chars, 3);
        assert_eq!(config.view.default_language, Language::En);
        assert_eq!(config.view.page_size, 10);
        assert_eq!(config.known_tags.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn known_tag_lookup() {
        let config = Config::default();
        assert_eq!(config.known_tag("cs.CR").unwrap().label, "Security");
        assert!(config.known_tag("q-bio.NC").is_none());
    }

    #[test]
    fn load_or_default_falls_back() {
        let config = Config::load_or_default("/nonexistent/feed.toml");
        assert_eq!(config.view.page_size, 10);
    }
}
