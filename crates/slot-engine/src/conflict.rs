//! Detect clashes between a proposed class and existing bookings.
//!
//! Two spans on the same date clash when their start times are equal, their
//! end times are equal, or either span starts strictly inside the other.
//! Back-to-back classes (one ends exactly when the other starts) do NOT clash.
//! Spans on different dates never clash, and the empty span clashes with nothing.

use chrono::NaiveTime;
use tracing::debug;

use crate::error::{Result, SlotError};
use crate::span::TimeSpan;

/// An existing booking that clashes with a candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub existing: TimeSpan,
    pub overlap_minutes: i64,
}

/// The raw clash predicate on two time-of-day ranges assumed to share a date.
///
/// Returns `false` if any of the four times is absent.
pub fn has_conflict(
    candidate_start: Option<NaiveTime>,
    candidate_end: Option<NaiveTime>,
    existing_start: Option<NaiveTime>,
    existing_end: Option<NaiveTime>,
) -> bool {
    let (Some(cs), Some(ce), Some(es), Some(ee)) =
        (candidate_start, candidate_end, existing_start, existing_end)
    else {
        return false;
    };

    cs == es || ce == ee || (cs > es && cs < ee) || (es > cs && es < ce)
}

/// Whether two spans clash: same date and [`has_conflict`] on their times.
pub fn spans_conflict(a: &TimeSpan, b: &TimeSpan) -> bool {
    match (a.date(), b.date()) {
        (Some(da), Some(db)) if da == db => has_conflict(a.start(), a.end(), b.start(), b.end()),
        _ => false,
    }
}

/// Verify that `candidate` clashes with none of `existing`.
///
/// Stops at the first clash.
///
/// # Errors
/// Returns [`SlotError::ScheduleConflict`] carrying the candidate's date.
pub fn check_conflict(candidate: &TimeSpan, existing: &[TimeSpan]) -> Result<()> {
    let Some(date) = candidate.date() else {
        return Ok(());
    };

    if let Some(hit) = existing.iter().find(|e| spans_conflict(candidate, e)) {
        debug!(candidate = %candidate, existing = %hit, "class conflict");
        return Err(SlotError::ScheduleConflict { date });
    }
    Ok(())
}

/// Verify that no two of `bookings` clash with each other.
///
/// Used to validate booking lists that did not come through a [`Roster`],
/// since [`find_earliest_slot`] assumes its input is clash-free.
///
/// # Errors
/// Returns [`SlotError::ScheduleConflict`] for the first clashing pair found.
///
/// [`Roster`]: crate::Roster
/// [`find_earliest_slot`]: crate::find_earliest_slot
pub fn check_bookings(bookings: &[TimeSpan]) -> Result<()> {
    for (i, booking) in bookings.iter().enumerate() {
        check_conflict(booking, &bookings[i + 1..])?;
    }
    Ok(())
}

/// Every booking in `existing` that clashes with `candidate`, with the
/// number of overlapping minutes.
pub fn find_conflicts(candidate: &TimeSpan, existing: &[TimeSpan]) -> Vec<Conflict> {
    let Some((_, cs, ce)) = candidate.parts() else {
        return Vec::new();
    };

    existing
        .iter()
        .filter(|e| spans_conflict(candidate, e))
        .filter_map(|e| {
            let (_, es, ee) = e.parts()?;
            let overlap_minutes = (ce.min(ee) - cs.max(es)).num_minutes().max(0);
            Some(Conflict {
                existing: *e,
                overlap_minutes,
            })
        })
        .collect()
}
