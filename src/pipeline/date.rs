//! Date windows for the date stage.
//!
//! Relative buckets count back from `now` on the viewer's wall clock: 24h and
//! week step back one and seven calendar days, month steps back one calendar
//! month (the day is clamped to the end of a shorter month, so March 31 goes
//! back to February 28/29). Across a DST change a "day" is therefore 23 or 25
//! hours long. A start that lands on an ambiguous wall time takes the earlier
//! instant; one inside a DST gap moves forward an hour. The window start of a
//! bucket is exclusive and `now` is inclusive.
//!
//! Explicit ranges are calendar days in the viewer's time zone: `from` starts
//! at 00:00:00.000 and `to` (defaulting to `from`) ends at 23:59:59.999, both
//! inclusive.

use chrono::{DateTime, Days, Months, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};

use crate::models::{DateBucket, DateFilter};

/// A resolved date window in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    /// `start < t <= end`
    Relative {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// `start <= t <= end`
    Range {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl DateWindow {
    /// Resolve a filter against the current moment. `All` has no window.
    pub fn resolve<Tz: TimeZone>(filter: &DateFilter, now: &DateTime<Tz>) -> Option<Self> {
        match filter {
            DateFilter::All => None,
            DateFilter::Bucket(bucket) => Some(Self::relative(*bucket, now)),
            DateFilter::Range { from, to } => Some(Self::range(*from, to.unwrap_or(*from), now)),
        }
    }

    fn relative<Tz: TimeZone>(bucket: DateBucket, now: &DateTime<Tz>) -> Self {
        let local = now.naive_local();
        let start = match bucket {
            DateBucket::Last24h => local.checked_sub_days(Days::new(1)),
            DateBucket::LastWeek => local.checked_sub_days(Days::new(7)),
            DateBucket::LastMonth => local.checked_sub_months(Months::new(1)),
        };
        Self::Relative {
            // Only out of chrono's range; the window is then unbounded below.
            start: start.map_or(DateTime::<Utc>::MIN_UTC, |naive| {
                local_to_utc(&now.timezone(), naive)
            }),
            end: now.with_timezone(&Utc),
        }
    }

    fn range<Tz: TimeZone>(from: NaiveDate, to: NaiveDate, now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let day_start = from.and_time(chrono::NaiveTime::MIN);
        let day_end = to
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap_or_else(|| to.and_time(chrono::NaiveTime::MIN));
        Self::Range {
            start: local_to_utc(&tz, day_start),
            end: local_to_utc(&tz, day_end),
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        match self {
            DateWindow::Relative { start, end } => *start < instant && instant <= *end,
            DateWindow::Range { start, end } => *start <= instant && instant <= *end,
        }
    }
}

/// Interpret a wall-clock time in `tz`, stepping over DST gaps.
fn local_to_utc<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + TimeDelta::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}
