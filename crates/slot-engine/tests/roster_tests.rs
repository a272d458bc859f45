//! Tests for the roster's booking workflow and its per-date class index.

use chrono::{NaiveDate, NaiveTime};
use slot_engine::{ClassIndex, DailyWindow, Roster, SlotError, Student, TimeSpan};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn t(hhmm: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hhmm / 100, hhmm % 100, 0).unwrap()
}

fn span(date: NaiveDate, start: u32, end: u32) -> TimeSpan {
    TimeSpan::new(date, t(start), t(end)).unwrap()
}

fn sample_roster() -> Roster {
    Roster::from_students(vec![
        Student::new("Alice", span(d(2022, 12, 16), 1100, 1200)),
        Student::new("Bob", span(d(2022, 12, 17), 1200, 1500)),
        Student::new("Carol", TimeSpan::empty()),
    ])
    .unwrap()
}

#[test]
fn from_students_indexes_only_booked_classes() {
    let roster = sample_roster();
    assert_eq!(roster.students().len(), 3);
    assert_eq!(roster.index().len(), 2);
    let on_16th: Vec<_> = roster.index().classes_on(d(2022, 12, 16), None).collect();
    assert_eq!(on_16th.len(), 1);
    assert_eq!(on_16th[0].0, "Alice");
}

#[test]
fn rebuilt_index_matches_incremental_one() {
    let mut roster = sample_roster();
    roster
        .set_class("Carol", span(d(2022, 12, 18), 1000, 1100))
        .unwrap();
    roster.clear_class("Alice").unwrap();

    let rebuilt = ClassIndex::build(roster.students());
    assert_eq!(rebuilt.len(), roster.index().len());
    assert_eq!(rebuilt.len(), 2);
    assert_eq!(rebuilt.classes_on(d(2022, 12, 16), None).count(), 0);
    assert!(!rebuilt.is_empty());
}

#[test]
fn from_students_rejects_clashing_records() {
    let result = Roster::from_students(vec![
        Student::new("Alice", span(d(2022, 12, 16), 1100, 1200)),
        Student::new("Bob", span(d(2022, 12, 16), 1130, 1230)),
    ]);
    assert!(matches!(result, Err(SlotError::ScheduleConflict { .. })));
}

#[test]
fn duplicate_names_are_rejected() {
    let mut roster = sample_roster();
    let err = roster
        .add_student(Student::new("Alice", TimeSpan::empty()))
        .unwrap_err();
    assert_eq!(err, SlotError::DuplicateStudent("Alice".to_string()));
}

#[test]
fn booking_a_clashing_class_leaves_roster_unchanged() {
    let mut roster = sample_roster();
    let err = roster
        .set_class("Carol", span(d(2022, 12, 16), 1130, 1230))
        .unwrap_err();
    assert_eq!(
        err,
        SlotError::ScheduleConflict {
            date: d(2022, 12, 16)
        }
    );
    assert!(roster.student("Carol").unwrap().class.is_empty());
    assert_eq!(roster.index().len(), 2);
}

#[test]
fn back_to_back_booking_is_accepted() {
    let mut roster = sample_roster();
    roster
        .set_class("Carol", span(d(2022, 12, 16), 1200, 1300))
        .unwrap();
    assert_eq!(roster.index().classes_on(d(2022, 12, 16), None).count(), 2);
}

#[test]
fn rebooking_ignores_the_students_own_class() {
    // Alice moves her class 30 minutes later; it overlaps only her old slot.
    let mut roster = sample_roster();
    roster
        .set_class("Alice", span(d(2022, 12, 16), 1130, 1230))
        .unwrap();
    let on_16th: Vec<_> = roster.index().classes_on(d(2022, 12, 16), None).collect();
    assert_eq!(on_16th.len(), 1, "old class must be dropped from the index");
    assert_eq!(on_16th[0].1.start(), Some(t(1130)));
}

#[test]
fn moving_a_class_to_another_date_updates_both_dates() {
    let mut roster = sample_roster();
    roster
        .set_class("Alice", span(d(2022, 12, 17), 900, 1000))
        .unwrap();
    assert_eq!(roster.index().classes_on(d(2022, 12, 16), None).count(), 0);
    assert_eq!(roster.index().classes_on(d(2022, 12, 17), None).count(), 2);
}

#[test]
fn clear_class_frees_the_slot() {
    let mut roster = sample_roster();
    roster.clear_class("Alice").unwrap();
    assert!(roster.student("Alice").unwrap().class.is_empty());
    roster
        .set_class("Carol", span(d(2022, 12, 16), 1100, 1200))
        .unwrap();
}

#[test]
fn unknown_student_is_reported() {
    let mut roster = sample_roster();
    let err = roster
        .set_class("Dave", span(d(2022, 12, 16), 900, 1000))
        .unwrap_err();
    assert_eq!(err, SlotError::UnknownStudent("Dave".to_string()));
    assert!(roster.remove_student("Dave").is_err());
}

#[test]
fn removing_a_student_drops_their_class() {
    let mut roster = sample_roster();
    let removed = roster.remove_student("Bob").unwrap();
    assert_eq!(removed.name, "Bob");
    assert_eq!(roster.index().classes_on(d(2022, 12, 17), None).count(), 0);
    assert_eq!(roster.students().len(), 2);
}

#[test]
fn find_conflicts_names_the_clashing_students() {
    let roster = sample_roster();
    let candidate = span(d(2022, 12, 16), 1030, 1130);
    let conflicts = roster.find_conflicts(&candidate, None);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].0, "Alice");
    assert_eq!(conflicts[0].1.overlap_minutes, 30);
    assert!(roster.find_conflicts(&candidate, Some("Alice")).is_empty());
}

#[test]
fn upcoming_classes_skip_finished_ones() {
    let roster = sample_roster();
    // At 1230 on the 16th, Alice's 1100-1200 class is over.
    let upcoming = roster.upcoming_classes(d(2022, 12, 16), t(1230));
    assert_eq!(upcoming, vec![span(d(2022, 12, 17), 1200, 1500)]);

    // A class still in progress counts.
    let upcoming = roster.upcoming_classes(d(2022, 12, 16), t(1130));
    assert_eq!(upcoming.len(), 2);
}

#[test]
fn upcoming_classes_are_sorted() {
    let roster = Roster::from_students(vec![
        Student::new("A", span(d(2022, 12, 18), 900, 1000)),
        Student::new("B", span(d(2022, 12, 16), 1400, 1500)),
        Student::new("C", span(d(2022, 12, 16), 1000, 1100)),
    ])
    .unwrap();
    let upcoming = roster.upcoming_classes(d(2022, 12, 16), t(800));
    let starts: Vec<_> = upcoming.iter().map(|s| (s.date(), s.start())).collect();
    assert_eq!(
        starts,
        vec![
            (Some(d(2022, 12, 16)), Some(t(1000))),
            (Some(d(2022, 12, 16)), Some(t(1400))),
            (Some(d(2022, 12, 18)), Some(t(900))),
        ]
    );
}

#[test]
fn find_available_slot_uses_upcoming_classes() {
    let roster = sample_roster();
    let window = DailyWindow::new(t(1000), t(1500), 120).unwrap();
    let slot = roster.find_available_slot(&window, d(2022, 12, 16), t(1000));
    assert_eq!(slot, span(d(2022, 12, 16), 1200, 1400));

    let long = DailyWindow::new(t(1000), t(1500), 300).unwrap();
    let slot = roster.find_available_slot(&long, d(2022, 12, 16), t(1000));
    assert_eq!(slot, span(d(2022, 12, 18), 1000, 1500));
}

#[test]
fn found_slot_can_be_booked() {
    let mut roster = sample_roster();
    let window = DailyWindow::new(t(1000), t(1500), 60).unwrap();
    let slot = roster.find_available_slot(&window, d(2022, 12, 16), t(900));
    roster.set_class("Carol", slot).unwrap();
    assert_eq!(roster.student("Carol").unwrap().class, slot);
}

#[test]
fn students_serialize_with_canonical_class_text() {
    let json = r#"[{"name":"Alice","class":"2022-12-16 1100-1200"},{"name":"Carol"}]"#;
    let students: Vec<Student> = serde_json::from_str(json).unwrap();
    assert_eq!(students[0].class, span(d(2022, 12, 16), 1100, 1200));
    assert!(students[1].class.is_empty());

    let back = serde_json::to_string(&students).unwrap();
    assert!(back.contains(r#""class":"2022-12-16 1100-1200""#));
}
