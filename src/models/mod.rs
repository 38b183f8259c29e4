// src/models/mod.rs

//! Domain models for the feed application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod article;
mod config;
mod criteria;
mod view;

// Re-export all public types
pub use article::{Article, Content, Language, PublishedDate, validate_collection};
pub use config::{
    Config, KnownTag, Messages, SearchConfig, SearchKey, SourceConfig, ViewConfig,
};
pub use criteria::{DateBucket, DateFilter, FilterCriteria};
pub use view::ActiveView;
