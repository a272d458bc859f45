//! The student roster and its per-date class index.
//!
//! Each student owns at most one class. The roster keeps a per-date
//! projection of every booked class so that conflict checks only look at
//! classes sharing the candidate's date. The projection is updated on every
//! mutation and is never written to directly.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::availability;
use crate::conflict::{self, Conflict};
use crate::error::{Result, SlotError};
use crate::span::TimeSpan;
use crate::window::DailyWindow;

/// A tracked student and their scheduled class (possibly empty).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub name: String,
    #[serde(default)]
    pub class: TimeSpan,
}

impl Student {
    pub fn new(name: impl Into<String>, class: TimeSpan) -> Self {
        Self {
            name: name.into(),
            class,
        }
    }
}

/// Booked classes grouped by date, each tagged with its owner's name.
#[derive(Debug, Clone, Default)]
pub struct ClassIndex {
    by_date: BTreeMap<NaiveDate, Vec<(String, TimeSpan)>>,
}

impl ClassIndex {
    pub fn build<'a>(students: impl IntoIterator<Item = &'a Student>) -> Self {
        let mut index = Self::default();
        for student in students {
            index.insert(&student.name, student.class);
        }
        index
    }

    /// Classes on `date` not owned by `ignoring`.
    pub fn classes_on<'a>(
        &'a self,
        date: NaiveDate,
        ignoring: Option<&'a str>,
    ) -> impl Iterator<Item = (&'a str, &'a TimeSpan)> + 'a {
        self.by_date
            .get(&date)
            .into_iter()
            .flatten()
            .filter(move |(owner, _)| Some(owner.as_str()) != ignoring)
            .map(|(owner, span)| (owner.as_str(), span))
    }

    pub fn len(&self) -> usize {
        self.by_date.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    fn insert(&mut self, owner: &str, span: TimeSpan) {
        if let Some(date) = span.date() {
            self.by_date
                .entry(date)
                .or_default()
                .push((owner.to_string(), span));
        }
    }

    fn remove(&mut self, owner: &str, span: &TimeSpan) {
        let Some(date) = span.date() else {
            return;
        };
        if let Some(entries) = self.by_date.get_mut(&date) {
            entries.retain(|(o, s)| !(o == owner && s == span));
            if entries.is_empty() {
                self.by_date.remove(&date);
            }
        }
    }
}

/// The set of students and their classes.
///
/// Every mutation that books a class runs the conflict check and the index
/// update under the same `&mut self` borrow, so a check can never be
/// invalidated before its insert lands.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    students: Vec<Student>,
    index: ClassIndex,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from existing records, rejecting duplicate names and
    /// clashing classes.
    pub fn from_students(students: impl IntoIterator<Item = Student>) -> Result<Self> {
        let mut roster = Self::new();
        for student in students {
            roster.add_student(student)?;
        }
        Ok(roster)
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn student(&self, name: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.name == name)
    }

    pub fn index(&self) -> &ClassIndex {
        &self.index
    }

    /// # Errors
    /// [`SlotError::DuplicateStudent`] if the name is taken,
    /// [`SlotError::ScheduleConflict`] if the student's class clashes.
    pub fn add_student(&mut self, student: Student) -> Result<()> {
        if self.student(&student.name).is_some() {
            return Err(SlotError::DuplicateStudent(student.name));
        }
        self.check_conflict(&student.class, None)?;

        self.index.insert(&student.name, student.class);
        info!(student = %student.name, class = %student.class, "student added");
        self.students.push(student);
        Ok(())
    }

    pub fn remove_student(&mut self, name: &str) -> Result<Student> {
        let position = self.position(name)?;
        let student = self.students.remove(position);
        self.index.remove(&student.name, &student.class);
        info!(student = %student.name, "student removed");
        Ok(student)
    }

    /// Check `candidate` against every class on its date, skipping the class
    /// owned by `ignoring` (the student being re-booked).
    pub fn check_conflict(&self, candidate: &TimeSpan, ignoring: Option<&str>) -> Result<()> {
        let Some(date) = candidate.date() else {
            return Ok(());
        };
        let existing: Vec<TimeSpan> = self
            .index
            .classes_on(date, ignoring)
            .map(|(_, span)| *span)
            .collect();
        conflict::check_conflict(candidate, &existing)
    }

    /// Every student whose class clashes with `candidate`.
    pub fn find_conflicts(
        &self,
        candidate: &TimeSpan,
        ignoring: Option<&str>,
    ) -> Vec<(String, Conflict)> {
        let Some(date) = candidate.date() else {
            return Vec::new();
        };
        self.index
            .classes_on(date, ignoring)
            .flat_map(|(owner, span)| {
                conflict::find_conflicts(candidate, std::slice::from_ref(span))
                    .into_iter()
                    .map(move |c| (owner.to_string(), c))
            })
            .collect()
    }

    /// Book `class` for the named student, replacing any previous class.
    ///
    /// # Errors
    /// [`SlotError::UnknownStudent`] or [`SlotError::ScheduleConflict`]; on
    /// error the roster is unchanged.
    pub fn set_class(&mut self, name: &str, class: TimeSpan) -> Result<()> {
        let position = self.position(name)?;
        self.check_conflict(&class, Some(name))?;

        let student = &mut self.students[position];
        self.index.remove(&student.name, &student.class);
        self.index.insert(&student.name, class);
        student.class = class;
        info!(student = %name, class = %class, "class booked");
        Ok(())
    }

    pub fn clear_class(&mut self, name: &str) -> Result<()> {
        self.set_class(name, TimeSpan::empty())
    }

    /// Booked classes that have not yet finished as of `(today, now)`,
    /// sorted by `(date, start)`.
    pub fn upcoming_classes(&self, today: NaiveDate, now: NaiveTime) -> Vec<TimeSpan> {
        availability::upcoming(
            self.index
                .by_date
                .range(today..)
                .flat_map(|(_, entries)| entries.iter().map(|(_, span)| *span)),
            today,
            now,
        )
    }

    /// The earliest free slot matching `window`, as of `(today, now)`.
    pub fn find_available_slot(
        &self,
        window: &DailyWindow,
        today: NaiveDate,
        now: NaiveTime,
    ) -> TimeSpan {
        let booked = self.upcoming_classes(today, now);
        availability::find_earliest_slot(&booked, window, today, now)
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.students
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| SlotError::UnknownStudent(name.to_string()))
    }
}
