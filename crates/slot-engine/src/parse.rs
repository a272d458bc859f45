//! Text forms for class times and availability windows.
//!
//! Times are written as four digits (`HHMM`), dates as `YYYY-MM-DD`.
//!
//! - class: `2022-12-16 1100-1200` or `Mon 1100-1200`
//! - window: `1000-1500 120` (window range, then class length in minutes)

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::error::{Result, SlotError};
use crate::span::TimeSpan;
use crate::window::DailyWindow;

const WEEKDAYS: [(&str, Weekday); 7] = [
    ("MON", Weekday::Mon),
    ("TUE", Weekday::Tue),
    ("WED", Weekday::Wed),
    ("THU", Weekday::Thu),
    ("FRI", Weekday::Fri),
    ("SAT", Weekday::Sat),
    ("SUN", Weekday::Sun),
];

/// Parse a four-digit `HHMM` time in the range `0000`-`2359`.
pub fn parse_time(text: &str) -> Result<NaiveTime> {
    let text = text.trim();
    if text.len() != 4 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SlotError::Parse(format!(
            "time '{}' must be four digits in the form HHMM",
            text
        )));
    }
    let out_of_range = || SlotError::Parse(format!("time '{}' is not between 0000 and 2359", text));
    let hour: u32 = text[..2].parse().map_err(|_| out_of_range())?;
    let minute: u32 = text[2..].parse().map_err(|_| out_of_range())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(out_of_range)
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    if text.len() != 10 {
        return Err(SlotError::Parse(format!(
            "date '{}' must be in the form YYYY-MM-DD",
            text
        )));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| SlotError::Parse(format!("invalid date '{}': {}", text, e)))
}

/// Parse an `HHMM-HHMM` range into its two endpoints, without ordering checks.
pub fn parse_time_range(text: &str) -> Result<(NaiveTime, NaiveTime)> {
    let (start, end) = text.trim().split_once('-').ok_or_else(|| {
        SlotError::Parse(format!("time range '{}' must look like HHMM-HHMM", text.trim()))
    })?;
    Ok((parse_time(start)?, parse_time(end)?))
}

/// Parse a three-letter weekday abbreviation (`MON`..`SUN`), ignoring case.
pub fn parse_weekday(text: &str) -> Result<Weekday> {
    let upper = text.trim().to_ascii_uppercase();
    WEEKDAYS
        .iter()
        .find(|(name, _)| *name == upper)
        .map(|(_, day)| *day)
        .ok_or_else(|| SlotError::Parse(format!("unknown weekday '{}'", text.trim())))
}

/// Parse a class written with a fixed date: `YYYY-MM-DD HHMM-HHMM`.
pub fn parse_dated_class(text: &str) -> Result<TimeSpan> {
    let (date, range) = split_class(text)?;
    let date = parse_date(date)?;
    let (start, end) = parse_time_range(range)?;
    TimeSpan::new(date, start, end)
}

/// Parse a class written either with a fixed date or with a weekday.
///
/// A weekday class (`Mon 1100-1200`) lands on the next such weekday after
/// `reference`, as computed by [`next_occurrence_of_weekday`].
pub fn parse_class(text: &str, reference: NaiveDateTime) -> Result<TimeSpan> {
    let (day, range) = split_class(text)?;
    if day.len() != 3 {
        return parse_dated_class(text);
    }

    let weekday = parse_weekday(day)?;
    let (start, end) = parse_time_range(range)?;
    let date = next_occurrence_of_weekday(reference, weekday, start);
    TimeSpan::new(date, start, end)
}

/// The date of the next class on `weekday` at `time`, seen from `reference`.
///
/// If `reference` already falls on `weekday`, the class is today when `time`
/// is still ahead, otherwise a week later.
pub fn next_occurrence_of_weekday(
    reference: NaiveDateTime,
    weekday: Weekday,
    time: NaiveTime,
) -> NaiveDate {
    let today = reference.date();
    let current = today.weekday();

    if current == weekday {
        return if time > reference.time() {
            today
        } else {
            today + Days::new(7)
        };
    }

    let ahead = (7 + weekday.num_days_from_monday() - current.num_days_from_monday()) % 7;
    today + Days::new(u64::from(ahead))
}

/// Parse an availability query: `HHMM-HHMM DURATION`.
pub fn parse_window(text: &str) -> Result<DailyWindow> {
    let mut parts = text.split_whitespace();
    let (Some(range), Some(minutes), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(SlotError::Parse(format!(
            "window '{}' must look like HHMM-HHMM DURATION",
            text.trim()
        )));
    };

    let (start, end) = parse_time_range(range)?;
    let minutes: u32 = minutes.parse().map_err(|_| {
        SlotError::Parse(format!(
            "duration '{}' must be a positive number of minutes",
            minutes
        ))
    })?;
    DailyWindow::new(start, end, minutes)
}

fn split_class(text: &str) -> Result<(&str, &str)> {
    text.trim().split_once(' ').ok_or_else(|| {
        SlotError::Parse(format!(
            "class '{}' must look like YYYY-MM-DD HHMM-HHMM or DDD HHMM-HHMM",
            text.trim()
        ))
    })
}
