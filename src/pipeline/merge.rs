//! Merging newly ingested articles into an existing collection.
//!
//! Existing articles always win: an incoming article whose id is already
//! present is skipped, never overwritten. The merged collection is sorted
//! newest first so the data file stays in feed order.

use std::collections::HashSet;

use crate::models::Article;

/// Result of a merge.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// The merged collection, newest first
    pub articles: Vec<Article>,
    /// Ids of incoming articles that were added
    pub added: Vec<String>,
    /// Incoming articles skipped as duplicates
    pub skipped: usize,
}

impl MergeOutcome {
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty()
    }
}

/// Merge `incoming` into `existing`, deduplicating by id.
pub fn merge_articles(existing: Vec<Article>, incoming: Vec<Article>) -> MergeOutcome {
    let mut seen: HashSet<String> = existing.iter().map(|a| a.id.clone()).collect();
    let mut articles = existing;
    let mut added = Vec::new();
    let mut skipped = 0;

    for article in incoming {
        if seen.insert(article.id.clone()) {
            added.push(article.id.clone());
            articles.push(article);
        } else {
            skipped += 1;
        }
    }

    articles.sort_by(|a, b| b.published().cmp(&a.published()));

    log::info!(
        "Merge: {} added, {} skipped, {} total",
        added.len(),
        skipped,
        articles.len()
    );

    MergeOutcome {
        articles,
        added,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Content, PublishedDate};

    fn article(id: &str, title: &str, date: &str) -> Article {
        Article {
            id: id.to_string(),
            title: title.to_string(),
            content: Content {
                en: "body".to_string(),
                tr: None,
            },
            authors: Vec::new(),
            tags: vec!["cs.CR".to_string()],
            published_date: PublishedDate::parse(date).unwrap(),
            link: String::new(),
            pdf_link: String::new(),
        }
    }

    #[test]
    fn test_merge_adds_new_and_keeps_existing() {
        let existing = vec![
            article("1", "Original", "2024-12-01"),
            article("2", "Second", "2024-12-03"),
        ];
        let incoming = vec![
            article("1", "Changed title", "2024-12-01"),
            article("3", "Third", "2024-12-02"),
        ];

        let outcome = merge_articles(existing, incoming);
        assert!(outcome.has_changes());
        assert_eq!(outcome.added, vec!["3"]);
        assert_eq!(outcome.skipped, 1);

        let ids: Vec<&str> = outcome.articles.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
        assert_eq!(outcome.articles[2].title, "Original");
    }

    #[test]
    fn test_duplicates_within_incoming() {
        let incoming = vec![
            article("9", "First copy", "2024-12-01"),
            article("9", "Second copy", "2024-12-01"),
        ];
        let outcome = merge_articles(Vec::new(), incoming);
        assert_eq!(outcome.articles.len(), 1);
        assert_eq!(outcome.articles[0].title, "First copy");
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn test_nothing_new() {
        let existing = vec![article("1", "A", "2024-12-01")];
        let outcome = merge_articles(existing.clone(), existing);
        assert!(!outcome.has_changes());
        assert_eq!(outcome.articles.len(), 1);
    }
}
