//! Presentation layer: UI state, language handling and text rendering.

pub mod command;
pub mod language;
pub mod render;
pub mod state;

pub use command::{BrowseCommand, CommandOutcome};
pub use language::{ResolvedContent, SplitBody, resolve_content, split_title_abstract, toggle_available};
pub use render::{Renderer, format_date_label, preview};
pub use state::ViewState;
