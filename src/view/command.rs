//! Line commands for the interactive browser.

use std::str::FromStr;

use crate::error::{AppError, Result};
use crate::models::{ActiveView, DateFilter, Language};
use crate::view::state::ViewState;

pub const HELP: &str = "\
Commands:
  q <words>            search (q alone clears the query)
  tag <name>           toggle a tag filter
  notags               clear tag filters
  date <all|24h|week|month>
  date <YYYY-MM-DD> [YYYY-MM-DD]
  reset                clear all filters
  more                 show the next page
  view <list|dashboard>
  lang <en|tr>         global language
  lang <id> <en|tr>    language for one card
  open <id>            expand or collapse a card
  tags                 list tags
  help                 this text
  quit";

/// A parsed browser command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Refresh,
    Search(String),
    ToggleTag(String),
    ClearTags,
    Date(DateFilter),
    Reset,
    More,
    View(ActiveView),
    Language(Language),
    CardLanguage { id: String, language: Language },
    Expand(String),
    Tags,
    Help,
    Quit,
}

/// What the browser should do after a command was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Re-render the active view
    Redraw,
    ShowTags,
    ShowHelp,
    Quit,
}

impl FromStr for BrowseCommand {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(verb, rest)| (verb, rest.trim()))
            .unwrap_or((line, ""));
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match (verb.to_lowercase().as_str(), args.as_slice()) {
            ("", _) => BrowseCommand::Refresh,
            ("q" | "search", _) => BrowseCommand::Search(rest.to_string()),
            ("tag", [name]) => BrowseCommand::ToggleTag(name.to_string()),
            ("notags", []) => BrowseCommand::ClearTags,
            ("date", [value]) if value.contains('-') => {
                BrowseCommand::Date(DateFilter::range(value, None)?)
            }
            ("date", [value]) => BrowseCommand::Date(DateFilter::parse(value)?),
            ("date", [from, to]) => BrowseCommand::Date(DateFilter::range(from, Some(*to))?),
            ("reset", []) => BrowseCommand::Reset,
            ("more" | "m", []) => BrowseCommand::More,
            ("view", [view]) => BrowseCommand::View(view.parse()?),
            ("lang", [language]) => BrowseCommand::Language(language.parse()?),
            ("lang", [id, language]) => BrowseCommand::CardLanguage {
                id: id.to_string(),
                language: language.parse()?,
            },
            ("open", [id]) => BrowseCommand::Expand(id.to_string()),
            ("tags", []) => BrowseCommand::Tags,
            ("help" | "?", _) => BrowseCommand::Help,
            ("quit" | "exit", []) => BrowseCommand::Quit,
            _ => {
                return Err(AppError::validation(format!(
                    "unrecognized command '{line}' (type help)"
                )));
            }
        };
        Ok(command)
    }
}

impl BrowseCommand {
    pub fn apply(self, state: &mut ViewState) -> CommandOutcome {
        match self {
            BrowseCommand::Refresh => {}
            BrowseCommand::Search(query) => {
                state.set_query(query);
            }
            BrowseCommand::ToggleTag(tag) => {
                state.toggle_tag(&tag);
            }
            BrowseCommand::ClearTags => {
                state.clear_tags();
            }
            BrowseCommand::Date(filter) => {
                state.set_date_filter(filter);
            }
            BrowseCommand::Reset => {
                state.reset_filters();
            }
            BrowseCommand::More => state.load_more(),
            BrowseCommand::View(view) => state.set_active_view(view),
            BrowseCommand::Language(language) => state.set_global_language(language),
            BrowseCommand::CardLanguage { id, language } => state.set_card_language(&id, language),
            BrowseCommand::Expand(id) => {
                state.toggle_expanded(&id);
            }
            BrowseCommand::Tags => return CommandOutcome::ShowTags,
            BrowseCommand::Help => return CommandOutcome::ShowHelp,
            BrowseCommand::Quit => return CommandOutcome::Quit,
        }
        CommandOutcome::Redraw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DateBucket;

    fn parse(line: &str) -> BrowseCommand {
        line.parse().unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse(""), BrowseCommand::Refresh);
        assert_eq!(
            parse("q  side channel "),
            BrowseCommand::Search("side channel".to_string())
        );
        assert_eq!(parse("q"), BrowseCommand::Search(String::new()));
        assert_eq!(parse("tag cs.CR"), BrowseCommand::ToggleTag("cs.CR".to_string()));
        assert_eq!(
            parse("date week"),
            BrowseCommand::Date(DateFilter::Bucket(DateBucket::LastWeek))
        );
        assert_eq!(
            parse("date 2024-12-01 2024-12-05"),
            BrowseCommand::Date(DateFilter::range("2024-12-01", Some("2024-12-05")).unwrap())
        );
        assert_eq!(
            parse("date 2024-12-01"),
            BrowseCommand::Date(DateFilter::range("2024-12-01", None).unwrap())
        );
        assert_eq!(parse("view dashboard"), BrowseCommand::View(ActiveView::Dashboard));
        assert_eq!(parse("LANG en"), BrowseCommand::Language(Language::En));
        assert_eq!(
            parse("lang 2412.00001 tr"),
            BrowseCommand::CardLanguage {
                id: "2412.00001".to_string(),
                language: Language::Tr
            }
        );
        assert_eq!(parse("quit"), BrowseCommand::Quit);
    }

    #[test]
    fn test_parse_errors() {
        assert!("frobnicate".parse::<BrowseCommand>().is_err());
        assert!("date year".parse::<BrowseCommand>().is_err());
        assert!("date 2024-13-01".parse::<BrowseCommand>().is_err());
        assert!("lang de".parse::<BrowseCommand>().is_err());
    }

    #[test]
    fn test_apply_updates_state() {
        let mut state = ViewState::default();
        state.load_more();

        assert_eq!(parse("q malware").apply(&mut state), CommandOutcome::Redraw);
        assert_eq!(state.criteria().query, "malware");
        assert_eq!(state.page(), 1);

        parse("more").apply(&mut state);
        assert_eq!(state.page(), 2);

        parse("open 2412.1").apply(&mut state);
        assert!(state.is_expanded("2412.1"));

        parse("reset").apply(&mut state);
        assert!(!state.criteria().is_active());

        assert_eq!(parse("tags").apply(&mut state), CommandOutcome::ShowTags);
        assert_eq!(parse("quit").apply(&mut state), CommandOutcome::Quit);
    }
}
