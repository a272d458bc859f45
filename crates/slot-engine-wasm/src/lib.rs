//! WASM bindings for slot-engine.
//!
//! Exposes the free-slot search, class conflict checks, and weekday date
//! resolution to JavaScript via `wasm-bindgen`. Classes cross the boundary in
//! their canonical text form (`"2022-12-16 1100-1200"`) and composite results
//! come back as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use slot_engine::parse::{parse_date, parse_dated_class, parse_time, parse_weekday};
use slot_engine::{DailyWindow, TimeSpan};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SlotDto {
    date: String,
    start: String,
    end: String,
    text: String,
}

impl SlotDto {
    fn from_span(span: &TimeSpan) -> Option<Self> {
        let (date, start, end) = span.parts()?;
        Some(Self {
            date: date.format("%Y-%m-%d").to_string(),
            start: start.format("%H%M").to_string(),
            end: end.format("%H%M").to_string(),
            text: span.to_string(),
        })
    }
}

#[derive(Serialize)]
struct ConflictDto {
    existing: String,
    overlap_minutes: i64,
}

#[derive(Serialize)]
struct CheckDto {
    ok: bool,
    conflicts: Vec<ConflictDto>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a JSON array of class strings, dropping empty entries.
fn parse_classes_json(json: &str) -> Result<Vec<TimeSpan>, String> {
    let texts: Vec<String> =
        serde_json::from_str(json).map_err(|e| format!("Invalid classes JSON: {}", e))?;

    let mut spans = Vec::with_capacity(texts.len());
    for text in texts {
        if text.trim().is_empty() {
            continue;
        }
        spans.push(parse_dated_class(&text).map_err(|e| e.to_string())?);
    }
    Ok(spans)
}

fn parse_clock(today: &str, now: &str) -> Result<(NaiveDate, NaiveTime), String> {
    let today = parse_date(today).map_err(|e| e.to_string())?;
    let now = parse_time(now).map_err(|e| e.to_string())?;
    Ok((today, now))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn find_earliest_slot_impl(
    bookings_json: &str,
    window_start: &str,
    window_end: &str,
    duration_minutes: u32,
    today: &str,
    now: &str,
) -> Result<String, String> {
    let window = DailyWindow::new(
        parse_time(window_start).map_err(|e| e.to_string())?,
        parse_time(window_end).map_err(|e| e.to_string())?,
        duration_minutes,
    )
    .map_err(|e| e.to_string())?;
    let (today, now) = parse_clock(today, now)?;

    let bookings = parse_classes_json(bookings_json)?;
    slot_engine::check_bookings(&bookings).map_err(|e| format!("Invalid bookings: {}", e))?;
    let booked = slot_engine::upcoming(bookings, today, now);

    let slot = slot_engine::find_earliest_slot(&booked, &window, today, now);
    let dto = SlotDto::from_span(&slot).ok_or_else(|| "Slot search returned no slot".to_string())?;
    to_json(&dto)
}

fn check_conflict_impl(candidate: &str, existing_json: &str) -> Result<String, String> {
    let candidate = parse_dated_class(candidate).map_err(|e| e.to_string())?;
    let existing = parse_classes_json(existing_json)?;

    let conflicts: Vec<ConflictDto> = slot_engine::find_conflicts(&candidate, &existing)
        .into_iter()
        .map(|c| ConflictDto {
            existing: c.existing.to_string(),
            overlap_minutes: c.overlap_minutes,
        })
        .collect();

    to_json(&CheckDto {
        ok: conflicts.is_empty(),
        conflicts,
    })
}

fn next_occurrence_impl(today: &str, now: &str, weekday: &str, time: &str) -> Result<String, String> {
    let (today, now) = parse_clock(today, now)?;
    let weekday = parse_weekday(weekday).map_err(|e| e.to_string())?;
    let time = parse_time(time).map_err(|e| e.to_string())?;
    let date = slot_engine::next_occurrence_of_weekday(today.and_time(now), weekday, time);
    Ok(date.format("%Y-%m-%d").to_string())
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Find the earliest free class slot.
///
/// `bookings_json` is a JSON array of class strings (`"YYYY-MM-DD HHMM-HHMM"`).
/// Bookings that clash with each other are rejected. Bookings that finished
/// before `(today, now)` are ignored and the rest are sorted before the search. Returns a JSON `{date, start, end, text}` object.
///
/// # Arguments
/// - `window_start`, `window_end` -- daily window as `HHMM`
/// - `duration_minutes` -- class length
/// - `today` -- reference date `YYYY-MM-DD`
/// - `now` -- reference time `HHMM`
#[wasm_bindgen(js_name = "findEarliestSlot")]
pub fn find_earliest_slot(
    bookings_json: &str,
    window_start: &str,
    window_end: &str,
    duration_minutes: u32,
    today: &str,
    now: &str,
) -> Result<String, JsValue> {
    find_earliest_slot_impl(
        bookings_json,
        window_start,
        window_end,
        duration_minutes,
        today,
        now,
    )
    .map_err(|e| JsValue::from_str(&e))
}

/// Check a proposed class against existing ones.
///
/// Returns a JSON `{ok, conflicts}` object where each conflict carries the
/// clashing class and the overlap in minutes.
#[wasm_bindgen(js_name = "checkConflict")]
pub fn check_conflict(candidate: &str, existing_json: &str) -> Result<String, JsValue> {
    check_conflict_impl(candidate, existing_json).map_err(|e| JsValue::from_str(&e))
}

/// Resolve a weekday class (`"MON"`..`"SUN"` at `HHMM`) to its next date
/// after `(today, now)`. Returns `YYYY-MM-DD`.
#[wasm_bindgen(js_name = "nextOccurrence")]
pub fn next_occurrence(today: &str, now: &str, weekday: &str, time: &str) -> Result<String, JsValue> {
    next_occurrence_impl(today, now, weekday, time).map_err(|e| JsValue::from_str(&e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earliest_slot_json() {
        let json = find_earliest_slot_impl(
            r#"["2022-12-17 1200-1500", "2022-12-16 1100-1200", ""]"#,
            "1000",
            "1500",
            120,
            "2022-12-16",
            "1000",
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["text"], "2022-12-16 1200-1400");
        assert_eq!(value["start"], "1200");
    }

    #[test]
    fn earliest_slot_rejects_bad_window() {
        let err = find_earliest_slot_impl("[]", "1000", "1030", 60, "2022-12-16", "1000")
            .unwrap_err();
        assert!(err.contains("Invalid time window"));
    }

    #[test]
    fn earliest_slot_rejects_clashing_bookings() {
        let err = find_earliest_slot_impl(
            r#"["2022-12-16 1000-1400", "2022-12-16 1100-1200"]"#,
            "1000",
            "1500",
            60,
            "2022-12-16",
            "0900",
        )
        .unwrap_err();
        assert!(err.contains("Invalid bookings"));
        assert!(err.contains("2022-12-16"));
    }

    #[test]
    fn earliest_slot_accepts_back_to_back_bookings() {
        let json = find_earliest_slot_impl(
            r#"["2022-12-16 1100-1200", "2022-12-16 1000-1100"]"#,
            "1000",
            "1500",
            60,
            "2022-12-16",
            "0900",
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["text"], "2022-12-16 1200-1300");
    }

    #[test]
    fn conflict_check_json() {
        let json =
            check_conflict_impl("2022-12-16 1030-1130", r#"["2022-12-16 1000-1100"]"#).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["ok"], false);
        assert_eq!(value["conflicts"][0]["overlap_minutes"], 30);

        let json =
            check_conflict_impl("2022-12-16 1100-1200", r#"["2022-12-16 1000-1100"]"#).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn next_occurrence_resolves_weekday() {
        assert_eq!(
            next_occurrence_impl("2022-12-16", "0900", "mon", "1000").unwrap(),
            "2022-12-19"
        );
        assert!(next_occurrence_impl("2022-12-16", "0900", "xyz", "1000").is_err());
    }
}
