//! Article data structures.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AppError, Result};

/// A research article summary as published in the data file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    /// Stable unique identifier (arXiv accession number)
    pub id: String,

    /// Canonical (English) title
    pub title: String,

    /// Localized markdown bodies
    pub content: Content,

    /// Author names in display order
    pub authors: Vec<String>,

    /// Category tags, e.g. `cs.CR`
    pub tags: Vec<String>,

    /// Publication timestamp
    pub published_date: PublishedDate,

    /// Abstract page URL
    pub link: String,

    /// PDF URL
    pub pdf_link: String,
}

impl Article {
    /// Whether the article carries every tag in `tags`.
    pub fn has_all_tags<'a>(&self, tags: impl IntoIterator<Item = &'a String>) -> bool {
        tags.into_iter().all(|tag| self.tags.contains(tag))
    }

    /// Publication instant in UTC.
    pub fn published(&self) -> DateTime<Utc> {
        self.published_date.instant()
    }

    /// Parse a JSON payload into articles and check the collection invariants.
    pub fn parse_collection(bytes: &[u8]) -> Result<Vec<Self>> {
        let articles: Vec<Self> = serde_json::from_slice(bytes)
            .map_err(|e| AppError::parse(format!("payload does not match the article schema: {e}")))?;
        validate_collection(&articles)?;
        Ok(articles)
    }
}

/// Check the invariants serde cannot express: non-empty ids and tags, unique ids.
pub fn validate_collection(articles: &[Article]) -> Result<()> {
    let mut seen = HashSet::with_capacity(articles.len());
    for (position, article) in articles.iter().enumerate() {
        if article.id.trim().is_empty() {
            return Err(AppError::parse(format!(
                "article #{position} has an empty id"
            )));
        }
        if article.tags.is_empty() {
            return Err(AppError::parse(format!(
                "article {} has no tags",
                article.id
            )));
        }
        if !seen.insert(article.id.as_str()) {
            return Err(AppError::parse(format!(
                "duplicate article id {}",
                article.id
            )));
        }
    }
    Ok(())
}

/// Supported content languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[default]
    Tr,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Tr => "tr",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "tr" => Ok(Language::Tr),
            other => Err(AppError::validation(format!(
                "unknown language '{other}' (expected en or tr)"
            ))),
        }
    }
}

/// Localized article bodies. English is mandatory, Turkish optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Content {
    pub en: String,

    /// Blank strings in the payload are treated as missing
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub tr: Option<String>,
}

impl Content {
    /// Body for a language, if present and not blank.
    pub fn get(&self, language: Language) -> Option<&str> {
        let body = match language {
            Language::En => Some(self.en.as_str()),
            Language::Tr => self.tr.as_deref(),
        };
        body.filter(|text| !text.trim().is_empty())
    }

    pub fn has(&self, language: Language) -> bool {
        self.get(language).is_some()
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.trim().is_empty()))
}

/// An ISO-8601 publication timestamp that keeps its original spelling.
///
/// Accepts RFC 3339, naive date-times (read as UTC) and bare dates
/// (midnight UTC).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublishedDate {
    raw: String,
    instant: DateTime<Utc>,
}

impl PublishedDate {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let instant = DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
                    .map(|naive| naive.and_utc())
            })
            .or_else(|_| {
                NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                    .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
            })
            .map_err(|_| AppError::parse(format!("unparseable published_date '{raw}'")))?;

        Ok(Self {
            raw: raw.to_string(),
            instant,
        })
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl From<DateTime<Utc>> for PublishedDate {
    fn from(instant: DateTime<Utc>) -> Self {
        Self {
            raw: instant.to_rfc3339(),
            instant,
        }
    }
}

impl TryFrom<String> for PublishedDate {
    type Error = AppError;

    fn try_from(raw: String) -> Result<Self> {
        Self::parse(&raw)
    }
}

impl From<PublishedDate> for String {
    fn from(date: PublishedDate) -> Self {
        date.raw
    }
}

impl PartialOrd for PublishedDate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PublishedDate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.instant
            .cmp(&other.instant)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}
