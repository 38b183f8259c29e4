//! UI-owned view state.
//!
//! Never reads or writes the data store. Criteria changes reset the page
//! cursor; everything else leaves it alone.

use std::collections::{HashMap, HashSet};

use crate::models::{ActiveView, DateFilter, FilterCriteria, Language, ViewConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    criteria: FilterCriteria,
    page: usize,
    page_size: usize,
    active_view: ActiveView,
    global_language: Language,
    card_languages: HashMap<String, Language>,
    expanded: HashSet<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(&ViewConfig::default())
    }
}

impl ViewState {
    pub fn new(config: &ViewConfig) -> Self {
        Self {
            criteria: FilterCriteria::default(),
            page: 1,
            page_size: config.page_size,
            active_view: config.default_view,
            global_language: config.default_language,
            card_languages: HashMap::new(),
            expanded: HashSet::new(),
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn active_view(&self) -> ActiveView {
        self.active_view
    }

    pub fn global_language(&self) -> Language {
        self.global_language
    }

    // ---- criteria ----

    /// Replace the whole criteria; resets the page only on a real change.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> bool {
        if self.criteria == criteria {
            return false;
        }
        self.criteria = criteria;
        self.page = 1;
        true
    }

    pub fn set_query(&mut self, query: impl Into<String>) -> bool {
        let criteria = FilterCriteria {
            query: query.into(),
            ..self.criteria.clone()
        };
        self.set_criteria(criteria)
    }

    /// Add the tag if absent, remove it if selected.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        let mut criteria = self.criteria.clone();
        if !criteria.selected_tags.remove(tag) {
            criteria.selected_tags.insert(tag.to_string());
        }
        self.set_criteria(criteria)
    }

    pub fn clear_tags(&mut self) -> bool {
        let criteria = FilterCriteria {
            selected_tags: Default::default(),
            ..self.criteria.clone()
        };
        self.set_criteria(criteria)
    }

    pub fn set_date_filter(&mut self, date_filter: DateFilter) -> bool {
        let criteria = FilterCriteria {
            date_filter,
            ..self.criteria.clone()
        };
        self.set_criteria(criteria)
    }

    /// Clear query, tags and date filter.
    pub fn reset_filters(&mut self) -> bool {
        self.set_criteria(FilterCriteria::default())
    }

    // ---- paging ----

    pub fn load_more(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    /// The article set was replaced; start from the first page again.
    pub fn articles_replaced(&mut self) {
        self.page = 1;
    }

    /// How many of `total` results are currently shown.
    pub fn visible_count(&self, total: usize) -> usize {
        if self.page_size == 0 {
            return total;
        }
        self.page.saturating_mul(self.page_size).min(total)
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.visible_count(total) < total
    }

    // ---- view & language ----

    pub fn set_active_view(&mut self, view: ActiveView) {
        self.active_view = view;
    }

    pub fn set_global_language(&mut self, language: Language) {
        self.global_language = language;
    }

    /// Per-card language override, falling back to the global preference.
    pub fn card_language(&self, id: &str) -> Language {
        self.card_languages
            .get(id)
            .copied()
            .unwrap_or(self.global_language)
    }

    pub fn set_card_language(&mut self, id: &str, language: Language) {
        self.card_languages.insert(id.to_string(), language);
    }

    // ---- expansion ----

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Flip a card between preview and full body. Returns the new state.
    pub fn toggle_expanded(&mut self, id: &str) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DateBucket;

    fn state(page_size: usize) -> ViewState {
        ViewState::new(&ViewConfig {
            page_size,
            ..ViewConfig::default()
        })
    }

    #[test]
    fn test_defaults_from_config() {
        let state = ViewState::default();
        assert_eq!(state.page(), 1);
        assert_eq!(state.page_size(), 10);
        assert_eq!(state.active_view(), ActiveView::List);
        assert_eq!(state.global_language(), Language::Tr);
        assert!(!state.criteria().is_active());
    }

    #[test]
    fn test_pagination_over_twelve_results() {
        let mut state = state(5);
        assert_eq!(state.visible_count(12), 5);
        assert!(state.has_more(12));

        state.load_more();
        state.load_more();
        assert_eq!(state.page(), 3);
        assert_eq!(state.visible_count(12), 12);
        assert!(!state.has_more(12));
    }

    #[test]
    fn test_criteria_change_resets_page() {
        let mut state = state(5);
        state.load_more();
        state.load_more();

        assert!(state.set_query("malware"));
        assert_eq!(state.page(), 1);

        state.load_more();
        // Same query again is not a change.
        assert!(!state.set_query("malware"));
        assert_eq!(state.page(), 2);

        state.toggle_tag("cs.CR");
        assert_eq!(state.page(), 1);
        assert!(state.criteria().selected_tags.contains("cs.CR"));

        state.load_more();
        assert!(state.set_date_filter(DateFilter::Bucket(DateBucket::LastWeek)));
        assert_eq!(state.page(), 1);

        state.load_more();
        state.articles_replaced();
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_toggle_tag_twice_removes_it() {
        let mut state = state(5);
        state.load_more();
        assert!(state.toggle_tag("cs.AI"));
        assert_eq!(state.page(), 1);
        assert!(state.toggle_tag("cs.AI"));
        assert!(state.criteria().selected_tags.is_empty());
        assert!(!state.clear_tags());
    }

    #[test]
    fn test_card_language_override() {
        let mut state = state(5);
        assert_eq!(state.card_language("a"), Language::Tr);
        state.set_card_language("a", Language::En);
        assert_eq!(state.card_language("a"), Language::En);
        assert_eq!(state.card_language("b"), Language::Tr);

        state.set_global_language(Language::En);
        assert_eq!(state.card_language("b"), Language::En);
    }

    #[test]
    fn test_expand_toggle() {
        let mut state = state(5);
        assert!(state.toggle_expanded("a"));
        assert!(state.is_expanded("a"));
        assert!(!state.toggle_expanded("a"));
        assert!(!state.is_expanded("a"));
    }

    #[test]
    fn test_zero_page_size_shows_everything() {
        let state = state(0);
        assert_eq!(state.visible_count(40), 40);
        assert!(!state.has_more(40));
    }
}
