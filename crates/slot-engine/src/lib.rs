//! # slot-engine
//!
//! Class scheduling for a tutor's student roster: each student owns at most
//! one class (a date plus start and end time), and the engine answers two
//! questions about them.
//!
//! - Does a proposed class clash with one already booked on the same date?
//! - What is the earliest free slot of a given length inside a recurring
//!   daily window such as `1000-1500`?
//!
//! All times are naive local times. The engine never reads a clock: callers
//! pass the reference `(today, now)` explicitly.
//!
//! ## Modules
//!
//! - [`span`] - `TimeSpan`, a date-anchored class interval (or the empty span)
//! - [`window`] - `DailyWindow`, the daily range plus the class length
//! - [`conflict`] - The clash predicate and first-hit conflict check
//! - [`availability`] - Earliest free slot search over sorted bookings
//! - [`roster`] - Students, the per-date class index, and booking mutations
//! - [`parse`] - `HHMM` / `YYYY-MM-DD` text forms and weekday resolution
//! - [`error`] - Error types

pub mod availability;
pub mod conflict;
pub mod error;
pub mod parse;
pub mod roster;
pub mod span;
pub mod window;

pub use availability::{find_earliest_slot, upcoming};
pub use conflict::{check_bookings, check_conflict, find_conflicts, has_conflict, Conflict};
pub use error::SlotError;
pub use parse::{next_occurrence_of_weekday, parse_class, parse_window};
pub use roster::{ClassIndex, Roster, Student};
pub use span::TimeSpan;
pub use window::DailyWindow;
