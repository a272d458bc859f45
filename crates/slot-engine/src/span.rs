//! Date-anchored class intervals.
//!
//! A [`TimeSpan`] is either empty ("no class scheduled") or a fully specified
//! booking: a calendar date plus a start and end time with `end > start`.
//! Spans are naive local times; no timezone is attached.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::parse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Booking {
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
}

/// A booked or proposed class interval, or the empty span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSpan {
    inner: Option<Booking>,
}

impl TimeSpan {
    /// Build a booked span on `date` from `start` to `end`.
    ///
    /// # Errors
    /// Returns [`SlotError::InvalidSpan`] if `end` is not strictly after `start`.
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if end <= start {
            return Err(SlotError::InvalidSpan { start, end });
        }
        Ok(Self {
            inner: Some(Booking { date, start, end }),
        })
    }

    /// Build a span whose ordering the caller has already established.
    pub(crate) fn booked(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        debug_assert!(start < end, "span {start}-{end} is not forward");
        Self {
            inner: Some(Booking { date, start, end }),
        }
    }

    /// The span representing "no class scheduled".
    pub const fn empty() -> Self {
        Self { inner: None }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.inner.map(|b| b.date)
    }

    pub fn start(&self) -> Option<NaiveTime> {
        self.inner.map(|b| b.start)
    }

    pub fn end(&self) -> Option<NaiveTime> {
        self.inner.map(|b| b.end)
    }

    /// `(date, start, end)` for a booked span, `None` for the empty span.
    pub fn parts(&self) -> Option<(NaiveDate, NaiveTime, NaiveTime)> {
        self.inner.map(|b| (b.date, b.start, b.end))
    }

    /// Length of the span in whole minutes (0 for the empty span).
    pub fn duration_minutes(&self) -> i64 {
        self.inner
            .map(|b| (b.end - b.start).num_minutes())
            .unwrap_or(0)
    }

    /// Order two spans by start time only, ignoring their dates.
    ///
    /// Empty spans sort after every booked span.
    pub fn cmp_by_start(&self, other: &Self) -> Ordering {
        match (self.start(), other.start()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    /// Order two spans chronologically by `(date, start)`. Empty spans sort last.
    pub fn cmp_chronological(&self, other: &Self) -> Ordering {
        match (self.inner, other.inner) {
            (Some(a), Some(b)) => (a.date, a.start).cmp(&(b.date, b.start)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    pub fn same_date(&self, date: NaiveDate) -> bool {
        self.date() == Some(date)
    }
}

impl fmt::Display for TimeSpan {
    /// Canonical text form `YYYY-MM-DD HHMM-HHMM`; the empty span prints nothing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner {
            Some(b) => write!(
                f,
                "{} {}-{}",
                b.date.format("%Y-%m-%d"),
                b.start.format("%H%M"),
                b.end.format("%H%M")
            ),
            None => Ok(()),
        }
    }
}

impl FromStr for TimeSpan {
    type Err = SlotError;

    /// Parse the canonical `YYYY-MM-DD HHMM-HHMM` form. Blank input is the empty span.
    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Ok(Self::empty());
        }
        parse::parse_dated_class(s)
    }
}

impl TryFrom<String> for TimeSpan {
    type Error = SlotError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeSpan> for String {
    fn from(span: TimeSpan) -> Self {
        span.to_string()
    }
}
