/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Teacher double-booking audit.
//!
//! Generated timetables never double-book a teacher, but manual edits are
//! trusted and may.  This audit is **report only**: it lists every
//! (day, slot, teacher) booked by more than one class and leaves the
//! timetables untouched.  Callers decide whether to warn.

use std::collections::BTreeMap;
use std::fmt;

use crate::entity::ScheduleMap;

/// One teacher booked by several classes in the same day and slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoubleBooking {
    pub day: String,
    pub slot_id: String,
    pub teacher_id: String,
    /// Classes holding the teacher, sorted by class id.
    pub class_ids: Vec<String>,
}

impl fmt::Display for DoubleBooking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "teacher '{}' is booked by classes [{}] on {} slot {}",
            self.teacher_id,
            self.class_ids.join(", "),
            self.day,
            self.slot_id
        )
    }
}

/// List every teacher booked by two or more classes in the same day and
/// slot id.
///
/// Only identical slot ids collide; slot times are not compared.  Cells
/// without a teacher never conflict.  Output is sorted by (day, slot,
/// teacher).
pub fn find_double_bookings(schedules: &ScheduleMap) -> Vec<DoubleBooking> {
    let mut bookings: BTreeMap<(&str, &str, &str), Vec<&str>> = BTreeMap::new();

    for (class_id, schedule) in schedules {
        for (day, row) in schedule {
            for (slot_id, cell) in row {
                if let Some(teacher_id) = cell.teacher_id() {
                    bookings
                        .entry((day.as_str(), slot_id.as_str(), teacher_id))
                        .or_default()
                        .push(class_id.as_str());
                }
            }
        }
    }

    bookings
        .into_iter()
        .filter(|(_, classes)| classes.len() > 1)
        .map(|((day, slot_id, teacher_id), classes)| DoubleBooking {
            day: day.to_string(),
            slot_id: slot_id.to_string(),
            teacher_id: teacher_id.to_string(),
            class_ids: classes.into_iter().map(str::to_string).collect(),
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
