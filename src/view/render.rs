//! Plain-text rendering of cards, lists, the dashboard and load states.

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{Article, Config, Language};
use crate::pipeline::{TagBadge, TagRegistry, paginate};
use crate::storage::{DataStore, LoadStatus};
use crate::utils::{normalize_whitespace, strip_markdown_marks, truncate_graphemes};
use crate::view::language::{resolve_content, split_title_abstract, toggle_available};
use crate::view::state::ViewState;

/// Human date label in the viewer's time zone.
///
/// `Today, 14:05`, `Yesterday, 09:30`, otherwise `Dec 3, 2024`.
pub fn format_date_label<Tz: TimeZone>(instant: DateTime<Utc>, now: &DateTime<Tz>) -> String {
    let local = instant.with_timezone(&now.timezone()).naive_local();
    let today = now.naive_local().date();

    if local.date() == today {
        format!("Today, {}", local.format("%H:%M"))
    } else if today.pred_opt() == Some(local.date()) {
        format!("Yesterday, {}", local.format("%H:%M"))
    } else {
        local.format("%b %-d, %Y").to_string()
    }
}

/// Collapsed preview of a body: markers removed, whitespace collapsed, cut
/// to `max_chars` graphemes.
pub fn preview(body: &str, max_chars: usize) -> String {
    let cleaned = normalize_whitespace(&strip_markdown_marks(body));
    truncate_graphemes(&cleaned, max_chars)
}

/// Renders feed output using the configured templates and view settings.
pub struct Renderer<'a> {
    config: &'a Config,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Message for a store that is not ready yet, if any.
    pub fn status(&self, store: &DataStore) -> Option<String> {
        let messages = &self.config.messages;
        match store.status() {
            LoadStatus::Ready => None,
            LoadStatus::Loading => Some(messages.loading.clone()),
            LoadStatus::Error => Some(
                messages
                    .load_error
                    .replace("{error}", store.error_message().unwrap_or("unknown error")),
            ),
        }
    }

    /// A single article card.
    pub fn card<Tz: TimeZone>(&self, article: &Article, state: &ViewState, now: &DateTime<Tz>) -> String {
        let view = &self.config.view;
        let resolved = resolve_content(article, state.card_language(&article.id));
        let split = split_title_abstract(resolved.body);
        let title = if split.has_title() {
            split.title
        } else {
            article.title.as_str()
        };

        let mut lines = vec![
            format!("{} · {}", article.id, format_date_label(article.published(), now)),
            title.to_string(),
        ];
        if !article.authors.is_empty() {
            lines.push(article.authors.join(", "));
        }

        let mut badges: Vec<String> = article
            .tags
            .iter()
            .take(view.max_card_tags)
            .map(|tag| TagBadge::for_tag(tag, self.config).to_string())
            .collect();
        let hidden = article.tags.len().saturating_sub(view.max_card_tags);
        if hidden > 0 {
            badges.push(format!("+{hidden}"));
        }
        lines.push(badges.join(" "));
        lines.push(self.language_toggles(article, resolved.language));

        let body = if state.is_expanded(&article.id) {
            split.abstract_text.trim().to_string()
        } else {
            preview(split.abstract_text, view.preview_chars)
        };
        if !body.is_empty() {
            lines.push(format!("\n{body}\n"));
        }

        let links: Vec<&str> = [article.link.as_str(), article.pdf_link.as_str()]
            .into_iter()
            .filter(|link| !link.is_empty())
            .collect();
        if !links.is_empty() {
            lines.push(links.join(" | "));
        }
        join_lines(lines)
    }

    /// `[TR] EN`, with the active language bracketed. An unavailable
    /// Turkish toggle carries the configured note.
    fn language_toggles(&self, article: &Article, active: Language) -> String {
        [Language::Tr, Language::En]
            .into_iter()
            .map(|language| {
                let code = language.code().to_uppercase();
                if !toggle_available(article, language) {
                    format!("{code} ({})", self.config.messages.tr_unavailable)
                } else if language == active {
                    format!("[{code}]")
                } else {
                    code
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The list view: count line, the visible page of cards, then a hint
    /// when more pages exist. `total` is the size of the whole article set.
    pub fn list<Tz: TimeZone>(
        &self,
        results: &[&Article],
        total: usize,
        state: &ViewState,
        now: &DateTime<Tz>,
    ) -> String {
        let messages = &self.config.messages;
        let mut lines = vec![
            messages
                .count
                .replace("{count}", &results.len().to_string())
                .replace("{total}", &total.to_string()),
        ];

        if results.is_empty() {
            lines.push(format!("\n{}\n{}", messages.empty, messages.empty_hint));
            return join_lines(lines);
        }

        for article in paginate(results, state.page(), state.page_size()) {
            lines.push(format!("\n{}", self.card(article, state, now)));
        }

        if state.has_more(results.len()) {
            let remaining = results.len() - state.visible_count(results.len());
            lines.push(messages.more.replace("{remaining}", &remaining.to_string()));
        }
        join_lines(lines)
    }

    /// The dashboard: totals, tag distribution of the filtered set and the
    /// newest titles.
    pub fn dashboard<Tz: TimeZone>(
        &self,
        results: &[&Article],
        total: usize,
        now: &DateTime<Tz>,
    ) -> String {
        let mut lines = vec![format!("Articles: {} / {}", results.len(), total)];

        let registry = TagRegistry::from_articles(results.iter().copied());
        if !registry.is_empty() {
            lines.push("\nTags:".to_string());
            lines.extend(registry.counts().map(|(tag, count)| {
                let badge = TagBadge::for_tag(tag, self.config).to_string();
                format!("  {badge:<32} {count:>5}")
            }));
        }

        let recent = self.config.view.dashboard_recent;
        if recent > 0 && !results.is_empty() {
            lines.push("\nRecent:".to_string());
            lines.extend(results.iter().take(recent).map(|article| {
                format!(
                    "  {} · {} · {}",
                    format_date_label(article.published(), now),
                    article.id,
                    article.title
                )
            }));
        }
        join_lines(lines)
    }

    /// Every tag with its article count; selected tags are marked.
    pub fn tags(&self, registry: &TagRegistry, state: &ViewState) -> String {
        let lines = registry
            .counts()
            .map(|(tag, count)| {
                let mark = if state.criteria().selected_tags.contains(tag) {
                    "x"
                } else {
                    " "
                };
                let badge = TagBadge::for_tag(tag, self.config).to_string();
                format!("[{mark}] {badge:<32} {count:>5}")
            })
            .collect();
        join_lines(lines)
    }
}

/// One line per entry, newline-terminated. No entries render as nothing.
fn join_lines(lines: Vec<String>) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
