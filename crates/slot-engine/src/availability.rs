//! Earliest free class slot search.
//!
//! Walks a date-ordered list of booked classes and returns the first slot of
//! the requested length that fits inside the daily window and clashes with
//! no booking. The search checks, in order: the gap before the first booking,
//! the gaps between consecutive bookings (which may span several days), and
//! the gap after the last booking. It never fails: when the last booking's
//! day is full the slot rolls over to the next calendar day.

use chrono::{Days, NaiveDate, NaiveTime};
use tracing::debug;

use crate::span::TimeSpan;
use crate::window::DailyWindow;

#[derive(Debug, Clone, Copy)]
struct Class {
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
}

/// The bookings in `spans` that have not finished as of `(today, now)`,
/// sorted by `(date, start)`.
///
/// A class dated today counts until its end time passes, so one in progress
/// is still upcoming. Empty spans are dropped. The result satisfies the
/// ordering precondition of [`find_earliest_slot`].
pub fn upcoming<I>(spans: I, today: NaiveDate, now: NaiveTime) -> Vec<TimeSpan>
where
    I: IntoIterator<Item = TimeSpan>,
{
    let mut upcoming: Vec<TimeSpan> = spans
        .into_iter()
        .filter(|span| match span.parts() {
            Some((date, _, end)) => date > today || (date == today && end > now),
            None => false,
        })
        .collect();
    upcoming.sort_by(TimeSpan::cmp_chronological);
    upcoming
}

/// Find the earliest slot for a class of `window.duration_minutes()`.
///
/// `booked` must hold only non-empty spans, sorted ascending by
/// `(date, start)`, none of them ending before `(today, now)`. The result
/// never starts before `now` on `today`, always lies within the window on its
/// own date, and does not clash with any booking sharing that date.
pub fn find_earliest_slot(
    booked: &[TimeSpan],
    window: &DailyWindow,
    today: NaiveDate,
    now: NaiveTime,
) -> TimeSpan {
    let classes: Vec<Class> = booked
        .iter()
        .filter_map(|span| {
            debug_assert!(!span.is_empty(), "empty span passed as a booking");
            span.parts().map(|(date, start, end)| Class { date, start, end })
        })
        .collect();
    debug_assert!(
        classes
            .windows(2)
            .all(|pair| (pair[0].date, pair[0].start) <= (pair[1].date, pair[1].start)),
        "bookings are not sorted by (date, start)"
    );

    let slot = match classes.as_slice() {
        [] => slot_on_today(window, today, now)
            .unwrap_or_else(|| window.opening_slot(next_day(today))),
        [only] => slot_before_class(window, today, now, only)
            .unwrap_or_else(|| slot_after_class(window, only)),
        [first, .., last] => slot_before_class(window, today, now, first)
            .or_else(|| {
                classes
                    .windows(2)
                    .find_map(|pair| slot_between_classes(window, &pair[0], &pair[1]))
            })
            .unwrap_or_else(|| slot_after_class(window, last)),
    };

    debug!(
        bookings = classes.len(),
        window = %window,
        slot = %slot,
        "earliest slot found"
    );
    slot
}

/// A slot on `today` that starts no earlier than `now`.
fn slot_on_today(window: &DailyWindow, today: NaiveDate, now: NaiveTime) -> Option<TimeSpan> {
    if now < window.start() {
        Some(window.opening_slot(today))
    } else if now < window.end() {
        window.slot_ending_by(today, now, window.end())
    } else {
        None
    }
}

fn slot_before_class(
    window: &DailyWindow,
    today: NaiveDate,
    now: NaiveTime,
    next: &Class,
) -> Option<TimeSpan> {
    debug_assert!(today <= next.date, "booking {:?} is in the past", next);

    if today >= next.date {
        let earliest = now.max(window.start());
        let slot = window.slot_ending_by(today, earliest, next.start.min(window.end()));
        if slot.is_some() {
            debug!(before = %next.date, "slot fits before first class");
        }
        return slot;
    }

    if let Some(slot) = slot_on_today(window, today, now) {
        debug!("slot fits today ahead of first class");
        return Some(slot);
    }

    let tomorrow = next_day(today);
    if tomorrow < next.date {
        Some(window.opening_slot(tomorrow))
    } else {
        window.slot_ending_by(tomorrow, window.start(), next.start)
    }
}

fn slot_between_classes(window: &DailyWindow, a: &Class, b: &Class) -> Option<TimeSpan> {
    debug_assert!(a.date <= b.date);

    let earliest = a.end.max(window.start());

    if a.date == b.date {
        return window.slot_ending_by(a.date, earliest, b.start.min(window.end()));
    }

    if let Some(slot) = window.slot_ending_by(a.date, earliest, window.end()) {
        return Some(slot);
    }

    // A whole free day between the two classes.
    let day_after = next_day(a.date);
    if day_after < b.date {
        return Some(window.opening_slot(day_after));
    }

    window.slot_ending_by(b.date, window.start(), b.start)
}

fn slot_after_class(window: &DailyWindow, last: &Class) -> TimeSpan {
    if last.end < window.start() {
        return window.opening_slot(last.date);
    }
    window
        .slot_ending_by(last.date, last.end, window.end())
        .unwrap_or_else(|| window.opening_slot(next_day(last.date)))
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date + Days::new(1)
}
