//! View selection.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Top-level screen shown by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActiveView {
    Dashboard,
    #[default]
    List,
}

impl FromStr for ActiveView {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dashboard" => Ok(ActiveView::Dashboard),
            "list" => Ok(ActiveView::List),
            other => Err(AppError::validation(format!(
                "unknown view '{other}' (expected dashboard or list)"
            ))),
        }
    }
}
