// src/lib.rs

//! arxiv-feed library
//!
//! Loads a static feed of arXiv security paper summaries and derives the
//! filtered, sorted and paginated view shown to the reader.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod storage;
pub mod utils;
pub mod view;
