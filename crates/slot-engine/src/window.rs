//! The recurring daily availability window used by slot searches.

use std::fmt;

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::parse;
use crate::span::TimeSpan;

/// A time-of-day range within which classes may be placed, plus the length
/// of the class being looked for.
///
/// Construction guarantees `start + duration <= end`, so every window admits
/// at least one slot per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WindowRepr", into = "WindowRepr")]
pub struct DailyWindow {
    start: NaiveTime,
    end: NaiveTime,
    duration_minutes: u32,
}

impl DailyWindow {
    /// # Errors
    /// Returns [`SlotError::InvalidWindow`] if `start >= end`, the duration is
    /// zero, or a slot of `duration_minutes` cannot fit between `start` and `end`.
    pub fn new(start: NaiveTime, end: NaiveTime, duration_minutes: u32) -> Result<Self> {
        if start >= end {
            return Err(SlotError::InvalidWindow(format!(
                "window start {} must be before window end {}",
                start.format("%H%M"),
                end.format("%H%M")
            )));
        }
        if duration_minutes == 0 {
            return Err(SlotError::InvalidWindow(
                "duration must be a positive number of minutes".to_string(),
            ));
        }
        match plus_minutes(start, duration_minutes) {
            Some(slot_end) if slot_end <= end => Ok(Self {
                start,
                end,
                duration_minutes,
            }),
            _ => Err(SlotError::InvalidWindow(format!(
                "a {}-minute class does not fit in {}-{}",
                duration_minutes,
                start.format("%H%M"),
                end.format("%H%M")
            ))),
        }
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn duration(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.duration_minutes))
    }

    /// The first slot of the window on `date`.
    pub fn opening_slot(&self, date: NaiveDate) -> TimeSpan {
        TimeSpan::booked(date, self.start, self.start + self.duration())
    }

    /// End time of a class starting at `start`, or `None` if it would run
    /// past midnight.
    pub(crate) fn class_end(&self, start: NaiveTime) -> Option<NaiveTime> {
        plus_minutes(start, self.duration_minutes)
    }

    /// A class starting at `start` on `date`, if it ends no later than `limit`.
    pub(crate) fn slot_ending_by(
        &self,
        date: NaiveDate,
        start: NaiveTime,
        limit: NaiveTime,
    ) -> Option<TimeSpan> {
        self.class_end(start)
            .filter(|end| *end <= limit)
            .map(|end| TimeSpan::booked(date, start, end))
    }
}

impl fmt::Display for DailyWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} {}",
            self.start.format("%H%M"),
            self.end.format("%H%M"),
            self.duration_minutes
        )
    }
}

/// Add `minutes` to `time` without wrapping past midnight.
pub(crate) fn plus_minutes(time: NaiveTime, minutes: u32) -> Option<NaiveTime> {
    let (result, wrapped) = time.overflowing_add_signed(TimeDelta::minutes(i64::from(minutes)));
    (wrapped == 0).then_some(result)
}

#[derive(Serialize, Deserialize)]
struct WindowRepr {
    start: String,
    end: String,
    duration_minutes: u32,
}

impl TryFrom<WindowRepr> for DailyWindow {
    type Error = SlotError;

    fn try_from(repr: WindowRepr) -> Result<Self> {
        let start = parse::parse_time(&repr.start)?;
        let end = parse::parse_time(&repr.end)?;
        DailyWindow::new(start, end, repr.duration_minutes)
    }
}

impl From<DailyWindow> for WindowRepr {
    fn from(window: DailyWindow) -> Self {
        WindowRepr {
            start: window.start.format("%H%M").to_string(),
            end: window.end.format("%H%M").to_string(),
            duration_minutes: window.duration_minutes,
        }
    }
}
