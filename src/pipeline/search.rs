//! Fuzzy index over the loaded articles.
//!
//! Matching runs in two tiers per query word:
//!
//! - **Substring**: a case- and diacritic-insensitive substring match through
//!   a [`nucleo`] substring atom. Scores 0 (perfect).
//! - **Typo tolerant**: words of at least `min_token_chars` characters are
//!   compared against every word of the field (and the same-length prefix of
//!   that word) by normalized Damerau-Levenshtein distance. The best distance
//!   is the word's score and must not exceed `threshold`.
//!
//! A field matches when every query word matches it; the field score is the
//! mean word score and an article scores as its best field. Short words never
//! go through the typo tier, so two-letter queries cannot pull in
//! near-arbitrary results.

use std::cell::RefCell;
use std::sync::Arc;

use nucleo::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo::{Matcher, Utf32String};
use unicode_segmentation::UnicodeSegmentation;

use crate::models::{Article, SearchConfig, SearchKey};

thread_local! {
    static MATCHER: RefCell<Matcher> = RefCell::new(Matcher::default());
}

/// A ranked search result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    /// Position of the article in the indexed set
    pub index: usize,
    /// 0.0 is a perfect match, `threshold` the loosest accepted
    pub score: f64,
    /// Summed substring match quality, used to order equal scores
    strength: u32,
}

struct IndexedField {
    text: Utf32String,
    words: Vec<String>,
}

impl IndexedField {
    fn new(text: &str) -> Self {
        let lowered = text.to_lowercase();
        Self {
            words: lowered.unicode_words().map(String::from).collect(),
            text: Utf32String::from(text),
        }
    }
}

/// Search index over one article set.
pub struct FuzzyIndex {
    articles: Arc<Vec<Article>>,
    fields: Vec<Vec<IndexedField>>,
    config: SearchConfig,
}

impl FuzzyIndex {
    /// Index `articles` over the configured keys.
    pub fn build(articles: Arc<Vec<Article>>, config: &SearchConfig) -> Self {
        let fields = articles
            .iter()
            .map(|article| {
                config
                    .keys
                    .iter()
                    .filter_map(|key| field_text(article, *key))
                    .map(|text| IndexedField::new(&text))
                    .collect()
            })
            .collect();

        log::debug!(
            "Built fuzzy index over {} articles ({} keys)",
            articles.len(),
            config.keys.len()
        );

        Self {
            articles,
            fields,
            config: config.clone(),
        }
    }

    pub fn articles(&self) -> &Arc<Vec<Article>> {
        &self.articles
    }

    /// Whether this index was built over exactly this set (reference equality).
    pub fn is_built_over(&self, articles: &Arc<Vec<Article>>) -> bool {
        Arc::ptr_eq(&self.articles, articles)
    }

    /// Ranked articles matching `query`.
    ///
    /// A blank query returns the whole set in its original order.
    pub fn search(&self, query: &str) -> Vec<&Article> {
        if query.trim().is_empty() {
            return self.articles.iter().collect();
        }
        self.search_scored(query)
            .into_iter()
            .map(|hit| &self.articles[hit.index])
            .collect()
    }

    /// Ranked hits with their scores. Blank queries yield no hits.
    pub fn search_scored(&self, query: &str) -> Vec<SearchHit> {
        let tokens = query_tokens(query);
        if tokens.is_empty() {
            return Vec::new();
        }

        let atoms: Vec<Atom> = tokens
            .iter()
            .map(|token| {
                Atom::new(
                    token,
                    CaseMatching::Ignore,
                    Normalization::Smart,
                    AtomKind::Substring,
                    false,
                )
            })
            .collect();

        let mut hits: Vec<SearchHit> = MATCHER.with(|matcher| {
            let mut matcher = matcher.borrow_mut();
            self.fields
                .iter()
                .enumerate()
                .filter_map(|(index, fields)| {
                    fields
                        .iter()
                        .filter_map(|field| self.score_field(&tokens, &atoms, field, &mut matcher))
                        .min_by(|a, b| a.0.total_cmp(&b.0).then(b.1.cmp(&a.1)))
                        .map(|(score, strength)| SearchHit {
                            index,
                            score,
                            strength,
                        })
                })
                .collect()
        });

        // Stable: equal scores keep their original relative order.
        hits.sort_by(|a, b| a.score.total_cmp(&b.score).then(b.strength.cmp(&a.strength)));
        log::debug!("Search {:?} matched {} articles", query, hits.len());
        hits
    }

    fn score_field(
        &self,
        tokens: &[String],
        atoms: &[Atom],
        field: &IndexedField,
        matcher: &mut Matcher,
    ) -> Option<(f64, u32)> {
        let mut total = 0.0;
        let mut strength = 0u32;
        for (token, atom) in tokens.iter().zip(atoms) {
            if let Some(score) = atom.score(field.text.slice(..), matcher) {
                strength += u32::from(score);
                continue;
            }
            total += self.typo_distance(token, field)?;
        }
        Some((total / tokens.len() as f64, strength))
    }

    /// Best accepted edit distance of `token` against the field's words.
    fn typo_distance(&self, token: &str, field: &IndexedField) -> Option<f64> {
        let token_len = token.chars().count();
        if token_len < self.config.min_token_chars {
            return None;
        }
        field
            .words
            .iter()
            .map(|word| word_distance(token, word, token_len))
            .min_by(f64::total_cmp)
            .filter(|distance| *distance <= self.config.threshold)
    }
}

/// Normalized distance against the whole word or its same-length prefix.
fn word_distance(token: &str, word: &str, token_len: usize) -> f64 {
    let whole = 1.0 - strsim::normalized_damerau_levenshtein(token, word);
    let prefix: String = word.chars().take(token_len).collect();
    if prefix.len() == word.len() {
        return whole;
    }
    whole.min(1.0 - strsim::normalized_damerau_levenshtein(token, &prefix))
}

fn query_tokens(query: &str) -> Vec<String> {
    let lowered = query.trim().to_lowercase();
    if lowered.is_empty() {
        return Vec::new();
    }
    let words: Vec<String> = lowered.unicode_words().map(String::from).collect();
    if words.is_empty() {
        vec![lowered]
    } else {
        words
    }
}

fn field_text(article: &Article, key: SearchKey) -> Option<String> {
    match key {
        SearchKey::Title => Some(article.title.clone()),
        SearchKey::ContentEn => Some(article.content.en.clone()),
        SearchKey::ContentTr => article.content.tr.clone(),
        SearchKey::Authors => {
            (!article.authors.is_empty()).then(|| article.authors.join(", "))
        }
        SearchKey::Id => Some(article.id.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Content, PublishedDate};

    fn article(id: &str, title: &str, en: &str, tr: Option<&str>, authors: &[&str]) -> Article {
        Article {
            id: id.to_string(),
            title: title.to_string(),
            content: Content {
                en: en.to_string(),
                tr: tr.map(String::from),
            },
            authors: authors.iter().map(|a| a.to_string()).collect(),
            tags: vec!["cs.CR".to_string()],
            published_date: PublishedDate::parse("2024-12-20").unwrap(),
            link: String::new(),
            pdf_link: String::new(),
        }
    }

    fn sample_index() -> FuzzyIndex {
        let articles = vec![
            article(
                "2412.00001",
                "Prompt Injection Attacks on LLM Agents",
                "We study prompt injection against tool-using agents.",
                Some("Araç kullanan ajanlara karşı istem enjeksiyonu."),
                &["Ada Lovelace"],
            ),
            article(
                "2412.00002",
                "Fuzzing Smart Contracts with Reinforcement Learning",
                "A reinforcement learning fuzzer for Solidity.",
                None,
                &["Alan Turing", "Grace Hopper"],
            ),
            article(
                "2412.00003",
                "Differential Privacy for Federated Training",
                "Privacy guarantees in federated settings.",
                Some("Federe öğrenmede diferansiyel gizlilik."),
                &["Claude Shannon"],
            ),
        ];
        FuzzyIndex::build(Arc::new(articles), &SearchConfig::default())
    }

    fn ids(results: &[&Article]) -> Vec<String> {
        results.iter().map(|a| a.id.clone()).collect()
    }

    #[test]
    fn test_blank_query_returns_everything_in_order() {
        let index = sample_index();
        assert_eq!(
            ids(&index.search("   ")),
            vec!["2412.00001", "2412.00002", "2412.00003"]
        );
        assert!(index.search_scored("").is_empty());
    }

    #[test]
    fn test_substring_match() {
        let index = sample_index();
        assert_eq!(ids(&index.search("injection")), vec!["2412.00001"]);
        assert_eq!(ids(&index.search("PRIVACY")), vec!["2412.00003"]);
    }

    #[test]
    fn test_typo_tolerance() {
        let index = sample_index();
        assert_eq!(ids(&index.search("injektion")), vec!["2412.00001"]);
        assert_eq!(ids(&index.search("fuzing")), vec!["2412.00002"]);
        assert_eq!(ids(&index.search("privcy")), vec!["2412.00003"]);
    }

    #[test]
    fn test_matches_authors_id_and_turkish_content() {
        let index = sample_index();
        assert_eq!(ids(&index.search("hopper")), vec!["2412.00002"]);
        // Neighbouring ids are one edit away, so they match too but rank lower.
        assert_eq!(index.search("2412.00003")[0].id, "2412.00003");
        assert_eq!(ids(&index.search("enjeksiyonu")), vec!["2412.00001"]);
        // Diacritic-insensitive substring
        assert_eq!(ids(&index.search("ogrenmede")), vec!["2412.00003"]);
    }

    #[test]
    fn test_short_query_does_not_match_approximately() {
        let index = sample_index();
        assert!(index.search("qz").is_empty());
        assert!(index.search("zzzzzz").is_empty());
    }

    #[test]
    fn test_every_word_must_match_one_field() {
        let index = sample_index();
        assert_eq!(ids(&index.search("federated privacy")), vec!["2412.00003"]);
        assert!(index.search("federated solidity").is_empty());
    }

    #[test]
    fn test_exact_matches_rank_before_typos() {
        let index = sample_index();
        let hits = index.search_scored("learning");
        assert_eq!(hits[0].index, 1);
        assert_eq!(hits[0].score, 0.0);
        for pair in hits.windows(2) {
            assert!(pair[0].score <= pair[1].score);
        }
    }

    #[test]
    fn test_every_hit_is_within_threshold() {
        let index = sample_index();
        for query in ["agent", "reinforcment", "shanon", "contracts"] {
            for hit in index.search_scored(query) {
                assert!(hit.score <= SearchConfig::default().threshold);
            }
        }
    }

    #[test]
    fn test_threshold_is_configurable() {
        let articles = sample_index().articles().clone();
        let strict = SearchConfig {
            threshold: 0.0,
            ..SearchConfig::default()
        };
        let index = FuzzyIndex::build(articles, &strict);
        assert!(index.search("injektion").is_empty());
        assert_eq!(ids(&index.search("injection")), vec!["2412.00001"]);
    }

    #[test]
    fn test_reference_equality() {
        let index = sample_index();
        let same = Arc::clone(index.articles());
        let copy = Arc::new(index.articles().as_ref().clone());
        assert!(index.is_built_over(&same));
        assert!(!index.is_built_over(&copy));
    }
}
