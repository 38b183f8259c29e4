//! Language resolution and the title/abstract splitter.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{Article, Language};

/// Body chosen for display together with the language it is actually in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedContent<'a> {
    pub language: Language,
    pub body: &'a str,
}

/// Pick the body to show for `requested`.
///
/// Falls back to English, then Turkish, then an empty body. The returned
/// language is the one the body is really in, which may differ from
/// `requested`.
pub fn resolve_content(article: &Article, requested: Language) -> ResolvedContent<'_> {
    [requested, Language::En, Language::Tr]
        .into_iter()
        .find_map(|language| {
            article
                .content
                .get(language)
                .map(|body| ResolvedContent { language, body })
        })
        .unwrap_or(ResolvedContent {
            language: requested,
            body: "",
        })
}

/// Whether the toggle for `language` can be selected on this card.
///
/// English is always selectable; Turkish only when a Turkish body exists.
pub fn toggle_available(article: &Article, language: Language) -> bool {
    match language {
        Language::En => true,
        Language::Tr => article.content.has(Language::Tr),
    }
}

/// A body split into its embedded title and abstract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitBody<'a> {
    /// Embedded title, empty when none was found
    pub title: &'a str,
    pub abstract_text: &'a str,
}

impl SplitBody<'_> {
    pub fn has_title(&self) -> bool {
        !self.title.is_empty()
    }
}

fn title_marker() -> Option<&'static Regex> {
    static TITLE: OnceLock<Option<Regex>> = OnceLock::new();
    TITLE
        .get_or_init(|| {
            Regex::new(
                r"(?i)^\s*(?:#+[ \t]*)?(?:\*\*)?[ \t]*(?:makale[ \t]+başlığı|title)\b[ \t]*(?:\*\*[ \t]*:|:[ \t]*(?:\*\*)?)[ \t]*(?P<title>[^\n]*)",
            )
            .ok()
        })
        .as_ref()
}

fn abstract_marker() -> Option<&'static Regex> {
    static ABSTRACT: OnceLock<Option<Regex>> = OnceLock::new();
    ABSTRACT
        .get_or_init(|| {
            Regex::new(
                r"(?im)^[ \t]*(?:#+[ \t]*)?(?:\*\*)?[ \t]*(?:özet|abstract)\b[ \t]*(?:\*\*[ \t]*:?|:[ \t]*(?:\*\*)?)?[ \t]*",
            )
            .ok()
        })
        .as_ref()
}

/// Split a summary body into `(title, abstract)`.
///
/// Recognizes a leading `Makale Başlığı:` / `Title:` line (optionally bold or
/// a heading) followed on a later line by an `Özet` / `Abstract` marker.
/// Anything else comes back with an empty title and the body verbatim.
pub fn split_title_abstract(body: &str) -> SplitBody<'_> {
    let verbatim = SplitBody {
        title: "",
        abstract_text: body,
    };

    let (Some(title_re), Some(abstract_re)) = (title_marker(), abstract_marker()) else {
        return verbatim;
    };
    let Some(title_caps) = title_re.captures(body) else {
        return verbatim;
    };
    let (Some(whole), Some(title)) = (title_caps.get(0), title_caps.name("title")) else {
        return verbatim;
    };

    let rest = &body[whole.end()..];
    let Some(marker) = abstract_re.find(rest) else {
        return verbatim;
    };
    // The abstract marker must sit on a later line than the title.
    if !rest[..marker.start()].contains('\n') {
        return verbatim;
    }

    SplitBody {
        title: title.as_str().trim().trim_end_matches('*').trim_end(),
        abstract_text: rest[marker.end()..].trim(),
    }
}
