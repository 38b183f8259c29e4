//! Filter pipeline over the loaded article set.
//!
//! - `search`: fuzzy index adapter
//! - `filter`: search → tags → date → sort → paginate stages
//! - `date`: relative buckets and explicit ranges
//! - `tags`: tag registry and badges
//! - `merge`: deduplicating merge of new articles into the data file
//!
//! [`Feed`] ties the stages to one article set and rebuilds its index and tag
//! registry whenever that set is replaced.

pub mod date;
pub mod filter;
pub mod merge;
pub mod search;
pub mod tags;

use std::sync::Arc;

use chrono::{DateTime, TimeZone};

use crate::models::{Article, FilterCriteria, SearchConfig};

pub use date::DateWindow;
pub use filter::{filter_by_date, filter_by_tags, paginate, search_stage, sort_newest_first};
pub use merge::{MergeOutcome, merge_articles};
pub use search::{FuzzyIndex, SearchHit};
pub use tags::{TagBadge, TagRegistry};

/// Derived-view engine for one article set.
pub struct Feed {
    index: FuzzyIndex,
    tags: TagRegistry,
    config: SearchConfig,
}

impl Feed {
    /// Index `articles` for searching and filtering.
    pub fn new(articles: Arc<Vec<Article>>, config: &SearchConfig) -> Self {
        let tags = TagRegistry::from_articles(articles.iter());
        Self {
            index: FuzzyIndex::build(articles, config),
            tags,
            config: config.clone(),
        }
    }

    /// Swap in a new article set.
    ///
    /// Rebuilds only when `articles` is a different set than the current one.
    /// Returns whether a rebuild happened.
    pub fn replace_articles(&mut self, articles: Arc<Vec<Article>>) -> bool {
        if self.index.is_built_over(&articles) {
            return false;
        }
        log::debug!("Article set replaced, rebuilding index");
        *self = Self::new(articles, &self.config);
        true
    }

    pub fn articles(&self) -> &[Article] {
        self.index.articles()
    }

    pub fn index(&self) -> &FuzzyIndex {
        &self.index
    }

    pub fn tags(&self) -> &TagRegistry {
        &self.tags
    }

    /// Compute the derived view: every article matching `criteria`, newest first.
    pub fn derive<Tz: TimeZone>(
        &self,
        criteria: &FilterCriteria,
        now: &DateTime<Tz>,
    ) -> Vec<&Article> {
        let working = search_stage(&self.index, &criteria.query);
        let working = filter_by_tags(working, &criteria.selected_tags);
        let working = filter_by_date(working, &criteria.date_filter, now);
        sort_newest_first(working)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Content, DateBucket, DateFilter, PublishedDate};
    use chrono::Utc;

    fn article(id: &str, title: &str, tags: &[&str], date: &str) -> Article {
        Article {
            id: id.to_string(),
            title: title.to_string(),
            content: Content {
                en: format!("Abstract of {title}"),
                tr: None,
            },
            authors: vec!["Test Author".to_string()],
            tags: tags.iter().map(|t| t.to_string()).collect(),
            published_date: PublishedDate::parse(date).unwrap(),
            link: String::new(),
            pdf_link: String::new(),
        }
    }

    fn sample_feed() -> Feed {
        let articles = vec![
            article("1", "Jailbreaking Language Models", &["cs.CR", "cs.AI"], "2024-12-10"),
            article("2", "Side Channels in GPUs", &["cs.CR"], "2024-12-18"),
            article("3", "Adversarial Examples for Malware", &["cs.CR", "cs.LG"], "2024-12-19"),
            article("4", "Language Model Watermarks", &["cs.CR", "cs.AI"], "2024-11-01"),
        ];
        Feed::new(Arc::new(articles), &SearchConfig::default())
    }

    fn ids(articles: &[&Article]) -> Vec<String> {
        articles.iter().map(|a| a.id.clone()).collect()
    }

    #[test]
    fn test_unfiltered_view_is_sorted() {
        let feed = sample_feed();
        let now = Utc.with_ymd_and_hms(2024, 12, 20, 0, 0, 0).unwrap();
        let view = feed.derive(&FilterCriteria::default(), &now);
        assert_eq!(ids(&view), vec!["3", "2", "1", "4"]);
    }

    #[test]
    fn test_all_stages_compose() {
        let feed = sample_feed();
        let now = Utc.with_ymd_and_hms(2024, 12, 20, 0, 0, 0).unwrap();
        let criteria = FilterCriteria {
            query: "language".to_string(),
            selected_tags: ["cs.AI".to_string()].into_iter().collect(),
            date_filter: DateFilter::Bucket(DateBucket::LastMonth),
        };
        assert_eq!(ids(&feed.derive(&criteria, &now)), vec!["1"]);
    }

    #[test]
    fn test_search_results_are_resorted_by_date() {
        let feed = sample_feed();
        let now = Utc.with_ymd_and_hms(2024, 12, 20, 0, 0, 0).unwrap();
        let criteria = FilterCriteria {
            query: "language model".to_string(),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&feed.derive(&criteria, &now)), vec!["1", "4"]);
    }

    #[test]
    fn test_tags_registry_follows_articles() {
        let feed = sample_feed();
        assert_eq!(
            feed.tags().tags().collect::<Vec<_>>(),
            vec!["cs.AI", "cs.CR", "cs.LG"]
        );
    }

    #[test]
    fn test_replace_articles_rebuilds_only_on_new_set() {
        let mut feed = sample_feed();
        let same = Arc::clone(feed.index().articles());
        assert!(!feed.replace_articles(same));

        let fresh = Arc::new(vec![article("9", "Post-Quantum TLS", &["cs.CR"], "2024-12-01")]);
        assert!(feed.replace_articles(fresh));
        assert_eq!(feed.articles().len(), 1);
        assert_eq!(feed.tags().tags().collect::<Vec<_>>(), vec!["cs.CR"]);
        assert_eq!(feed.index().search("quantum").len(), 1);
    }
}
