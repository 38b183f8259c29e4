//! Tag registry built from the loaded articles.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::models::{Article, Config};

/// Sorted set of every tag in a collection, with article counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRegistry {
    counts: BTreeMap<String, usize>,
}

impl TagRegistry {
    /// Collect the unique union of tags across `articles`.
    pub fn from_articles<'a>(articles: impl IntoIterator<Item = &'a Article>) -> Self {
        let mut counts = BTreeMap::new();
        for article in articles {
            let unique: BTreeSet<&String> = article.tags.iter().collect();
            for tag in unique {
                *counts.entry(tag.clone()).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    /// Tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Tags with their article counts, in sorted order.
    pub fn counts(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(tag, count)| (tag.as_str(), *count))
    }

    pub fn count(&self, tag: &str) -> usize {
        self.counts.get(tag).copied().unwrap_or(0)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.counts.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Display treatment for a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagBadge<'a> {
    Known { name: &'a str, label: &'a str },
    Plain { name: &'a str },
}

impl<'a> TagBadge<'a> {
    /// Pick the badge for `tag`; anything not in the configured known tags
    /// is plain.
    pub fn for_tag(tag: &'a str, config: &'a Config) -> Self {
        match config.known_tag(tag) {
            Some(known) => TagBadge::Known {
                name: tag,
                label: &known.label,
            },
            None => TagBadge::Plain { name: tag },
        }
    }
}

impl fmt::Display for TagBadge<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagBadge::Known { name, label } => write!(f, "[{name} · {label}]"),
            TagBadge::Plain { name } => write!(f, "[{name}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Config, Content, PublishedDate};

    fn tagged(id: &str, tags: &[&str]) -> Article {
        Article {
            id: id.to_string(),
            title: id.to_string(),
            content: Content::default(),
            authors: Vec::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            published_date: PublishedDate::parse("2024-12-20").unwrap(),
            link: String::new(),
            pdf_link: String::new(),
        }
    }

    #[test]
    fn test_union_is_sorted_and_unique() {
        let articles = vec![
            tagged("1", &["cs.LG", "cs.CR"]),
            tagged("2", &["cs.CR", "stat.ML"]),
            tagged("3", &["cs.AI", "cs.CR", "cs.CR"]),
        ];
        let registry = TagRegistry::from_articles(&articles);

        assert_eq!(
            registry.tags().collect::<Vec<_>>(),
            vec!["cs.AI", "cs.CR", "cs.LG", "stat.ML"]
        );
        assert_eq!(registry.count("cs.CR"), 3);
        assert_eq!(registry.count("cs.PL"), 0);
        assert!(!registry.contains("cs.PL"));
    }

    #[test]
    fn test_badges() {
        let config = Config::default();
        let known = TagBadge::for_tag("cs.CR", &config);
        assert_eq!(
            known,
            TagBadge::Known {
                name: "cs.CR",
                label: "Security"
            }
        );
        assert_eq!(known.to_string(), "[cs.CR · Security]");

        let plain = TagBadge::for_tag("q-fin.GN", &config);
        assert_eq!(plain, TagBadge::Plain { name: "q-fin.GN" });
        assert_eq!(plain.to_string(), "[q-fin.GN]");
    }
}
