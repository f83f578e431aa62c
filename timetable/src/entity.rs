/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core data structures for the timetable generator.
//!
//! Two sides of the pipeline are modelled separately:
//!
//! ```text
//! directory YAML ──►  ClassEntity (+ SubjectEntity)  ──(generator)──►  ScheduleCell grid  ──►  ClassTimetable (JSON)
//!                      ↑ input, read-only snapshot                      ↑ output               ↑ persisted per class
//! ```
//!
//! # Ownership model
//! The generator only **borrows** the class list and the grid configuration.
//! Every output cell owns its strings so a [`ClassTimetable`] can outlive the
//! directory it was built from (it is written to disk and re-read later by
//! the edit and show commands).

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

// ── Teacher lookup ────────────────────────────────────────────────────────────

/// Read-only lookup from teacher id to display name.
///
/// Only used to decorate output cells.  A missing name is tolerated: the
/// cell simply carries an empty `teacher_name`.
pub trait TeacherLookup {
    fn teacher_name(&self, teacher_id: &str) -> Option<&str>;
}

impl TeacherLookup for HashMap<String, String> {
    fn teacher_name(&self, teacher_id: &str) -> Option<&str> {
        self.get(teacher_id).map(String::as_str)
    }
}

impl TeacherLookup for BTreeMap<String, String> {
    fn teacher_name(&self, teacher_id: &str) -> Option<&str> {
        self.get(teacher_id).map(String::as_str)
    }
}

// ── Directory entities ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TeacherEntity {
    pub id: String,
    pub name: String,
}

/// A subject taught to exactly one class.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubjectEntity {
    pub id: String,
    pub name: String,
    pub class_id: String,
    /// Teacher assigned to this subject.  `None` falls back to the class's
    /// default teacher.
    pub teacher_id: Option<String>,
}

/// A class together with its subjects, in directory order.
///
/// The subject order is significant: it is the rotation order used by the
/// generator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassEntity {
    pub id: String,
    pub name: String,
    /// Default teacher for subjects that carry no teacher of their own.
    pub teacher_id: Option<String>,
    pub subjects: Vec<SubjectEntity>,
}

impl ClassEntity {
    /// Resolve the effective teacher of `subject`: the subject's own teacher,
    /// else this class's default teacher, else none.
    ///
    /// Empty ids count as absent.
    pub fn effective_teacher<'a>(&'a self, subject: &'a SubjectEntity) -> Option<&'a str> {
        non_empty(subject.teacher_id.as_deref()).or_else(|| non_empty(self.teacher_id.as_deref()))
    }

    /// Looks up one of this class's subjects by id.
    pub fn subject(&self, subject_id: &str) -> Option<&SubjectEntity> {
        self.subjects.iter().find(|s| s.id == subject_id)
    }
}

fn non_empty(id: Option<&str>) -> Option<&str> {
    id.filter(|s| !s.is_empty())
}

// ── Grid ──────────────────────────────────────────────────────────────────────

/// A discrete period of the school day, shared by every class.
///
/// Conflict detection keys on `id` only; `start` / `end` are carried for
/// display and never compared for overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: String,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl Slot {
    pub fn new(id: impl Into<String>, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            id: id.into(),
            start,
            end,
        }
    }

    /// `"08:00-08:40"`
    pub fn time_range(&self) -> String {
        format!(
            "{}-{}",
            self.start.format(hhmm::FORMAT),
            self.end.format(hhmm::FORMAT)
        )
    }
}

/// `HH:MM` (de)serialisation for slot times.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

// ── ScheduleCell ──────────────────────────────────────────────────────────────

/// Subject name written into every break cell.
pub const BREAK_LABEL: &str = "Break";

/// One (class, day, slot) entry of a timetable.
///
/// Replaces the `subjectId: null` sentinel of the stored document with a
/// proper variant.  The flat document shape is only produced at the
/// persistence boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "CellRecord", from = "CellRecord")]
pub enum ScheduleCell {
    Lesson {
        subject_id: String,
        subject_name: String,
        /// `None` for a subject with no resolvable teacher.
        teacher_id: Option<String>,
        teacher_name: String,
    },
    /// No subject placed: either nothing conflict-free was available or the
    /// cell was cleared by hand.
    #[default]
    Break,
}

impl ScheduleCell {
    /// Build a lesson cell for `subject`, taught by `teacher_id`.
    ///
    /// The teacher name is resolved through `teachers`; an unknown id yields
    /// an empty name.
    pub fn lesson<L: TeacherLookup + ?Sized>(
        subject: &SubjectEntity,
        teacher_id: Option<&str>,
        teachers: &L,
    ) -> Self {
        let teacher_name = teacher_id
            .and_then(|id| teachers.teacher_name(id))
            .unwrap_or_default()
            .to_string();

        ScheduleCell::Lesson {
            subject_id: subject.id.clone(),
            subject_name: subject.name.clone(),
            teacher_id: teacher_id.map(str::to_string),
            teacher_name,
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, ScheduleCell::Break)
    }

    pub fn subject_id(&self) -> Option<&str> {
        match self {
            ScheduleCell::Lesson { subject_id, .. } => Some(subject_id),
            ScheduleCell::Break => None,
        }
    }

    pub fn subject_name(&self) -> &str {
        match self {
            ScheduleCell::Lesson { subject_name, .. } => subject_name,
            ScheduleCell::Break => BREAK_LABEL,
        }
    }

    pub fn teacher_id(&self) -> Option<&str> {
        match self {
            ScheduleCell::Lesson { teacher_id, .. } => teacher_id.as_deref(),
            ScheduleCell::Break => None,
        }
    }

    pub fn teacher_name(&self) -> &str {
        match self {
            ScheduleCell::Lesson { teacher_name, .. } => teacher_name,
            ScheduleCell::Break => "",
        }
    }
}

/// Stored document shape of a cell: `{subjectId, subjectName, teacherId, teacherName}`.
///
/// A `null` `subjectId` is a break.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CellRecord {
    subject_id: Option<String>,
    #[serde(default)]
    subject_name: String,
    #[serde(default)]
    teacher_id: Option<String>,
    #[serde(default)]
    teacher_name: String,
}

impl From<ScheduleCell> for CellRecord {
    fn from(cell: ScheduleCell) -> Self {
        match cell {
            ScheduleCell::Lesson {
                subject_id,
                subject_name,
                teacher_id,
                teacher_name,
            } => CellRecord {
                subject_id: Some(subject_id),
                subject_name,
                teacher_id,
                teacher_name,
            },
            ScheduleCell::Break => CellRecord {
                subject_id: None,
                subject_name: BREAK_LABEL.to_string(),
                teacher_id: None,
                teacher_name: String::new(),
            },
        }
    }
}

impl From<CellRecord> for ScheduleCell {
    fn from(record: CellRecord) -> Self {
        match record.subject_id {
            Some(subject_id) => ScheduleCell::Lesson {
                subject_id,
                subject_name: record.subject_name,
                teacher_id: record.teacher_id.filter(|t| !t.is_empty()),
                teacher_name: record.teacher_name,
            },
            None => ScheduleCell::Break,
        }
    }
}

// ── Schedules ─────────────────────────────────────────────────────────────────

/// Day → slot id → cell, for one class.
///
/// `BTreeMap` keeps serialised output stable.  Display order comes from the
/// `days` / `slots` lists stored alongside in [`ClassTimetable`].
pub type ClassSchedule = BTreeMap<String, BTreeMap<String, ScheduleCell>>;

/// Class id → schedule.  Output of a generation run.
pub type ScheduleMap = BTreeMap<String, ClassSchedule>;

/// A class schedule together with the grid that produced it.
///
/// This is the unit handed to the persistence sink, one per class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassTimetable {
    pub class_id: String,
    pub days: Vec<String>,
    pub slots: Vec<Slot>,
    pub schedule: ClassSchedule,
}

impl ClassTimetable {
    pub fn cell(&self, day: &str, slot_id: &str) -> Option<&ScheduleCell> {
        self.schedule.get(day).and_then(|row| row.get(slot_id))
    }

    /// `true` if every (day, slot) of the grid has a cell.
    pub fn is_complete(&self) -> bool {
        self.days
            .iter()
            .all(|day| self.slots.iter().all(|slot| self.cell(day, &slot.id).is_some()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
