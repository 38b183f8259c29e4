//! Filter criteria derived from user input.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A named relative window counted back from now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateBucket {
    #[serde(rename = "24h")]
    Last24h,
    #[serde(rename = "week")]
    LastWeek,
    #[serde(rename = "month")]
    LastMonth,
}

impl DateBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateBucket::Last24h => "24h",
            DateBucket::LastWeek => "week",
            DateBucket::LastMonth => "month",
        }
    }
}

impl FromStr for DateBucket {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "24h" | "day" => Ok(DateBucket::Last24h),
            "week" => Ok(DateBucket::LastWeek),
            "month" => Ok(DateBucket::LastMonth),
            other => Err(AppError::validation(format!(
                "unknown date bucket '{other}' (expected 24h, week or month)"
            ))),
        }
    }
}

/// Date restriction applied by the date stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateFilter {
    #[default]
    All,
    Bucket(DateBucket),
    /// Calendar days in the viewer's time zone, inclusive. `to` defaults to `from`.
    Range {
        from: NaiveDate,
        to: Option<NaiveDate>,
    },
}

impl DateFilter {
    /// Parse `all` or a bucket name.
    pub fn parse(value: &str) -> Result<Self> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(DateFilter::All);
        }
        value.parse().map(DateFilter::Bucket)
    }

    /// Build an explicit range from `YYYY-MM-DD` strings.
    pub fn range(from: &str, to: Option<&str>) -> Result<Self> {
        let parse = |s: &str| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map_err(|_| AppError::validation(format!("invalid date '{s}' (use YYYY-MM-DD)")))
        };
        Ok(DateFilter::Range {
            from: parse(from)?,
            to: to.map(parse).transpose()?,
        })
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, DateFilter::All)
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateFilter::All => f.write_str("all"),
            DateFilter::Bucket(bucket) => f.write_str(bucket.as_str()),
            DateFilter::Range { from, to } => {
                write!(f, "{}..{}", from, to.unwrap_or(*from))
            }
        }
    }
}

/// Everything the filter pipeline needs from the UI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub query: String,
    pub selected_tags: BTreeSet<String>,
    pub date_filter: DateFilter,
}

impl FilterCriteria {
    /// Whether the query should go through the search stage.
    pub fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// Whether any stage other than sorting would change the article set.
    pub fn is_active(&self) -> bool {
        self.has_query() || !self.selected_tags.is_empty() || self.date_filter.is_active()
    }
}
