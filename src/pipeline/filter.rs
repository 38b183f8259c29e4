//! Filter pipeline stages.
//!
//! Each stage is a pure function from one working set to the next. The
//! composition order is fixed: search, tags, date, sort, paginate.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone};

use crate::models::{Article, DateFilter};
use crate::pipeline::date::DateWindow;
use crate::pipeline::search::FuzzyIndex;

/// Search stage: ranked matches, or the whole set for a blank query.
pub fn search_stage<'a>(index: &'a FuzzyIndex, query: &str) -> Vec<&'a Article> {
    index.search(query)
}

/// Tag stage: keep articles carrying every selected tag.
pub fn filter_by_tags<'a>(articles: Vec<&'a Article>, selected: &BTreeSet<String>) -> Vec<&'a Article> {
    if selected.is_empty() {
        return articles;
    }
    articles
        .into_iter()
        .filter(|article| article.has_all_tags(selected))
        .collect()
}

/// Date stage: keep articles published inside the filter's window.
pub fn filter_by_date<'a, Tz: TimeZone>(
    articles: Vec<&'a Article>,
    filter: &DateFilter,
    now: &DateTime<Tz>,
) -> Vec<&'a Article> {
    match DateWindow::resolve(filter, now) {
        Some(window) => articles
            .into_iter()
            .filter(|article| window.contains(article.published()))
            .collect(),
        None => articles,
    }
}

/// Sort stage: newest first. Equal dates keep their relative order.
pub fn sort_newest_first(mut articles: Vec<&Article>) -> Vec<&Article> {
    articles.sort_by(|a, b| b.published().cmp(&a.published()));
    articles
}

/// Pagination stage: the first `page * page_size` items.
///
/// `page` counts from 1 (0 is treated as 1); a `page_size` of 0 disables
/// pagination.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page_size == 0 {
        return items;
    }
    let visible = page.max(1).saturating_mul(page_size).min(items.len());
    &items[..visible]
}
