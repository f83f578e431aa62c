/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Single-cell timetable edits.
//!
//! An edit overwrites exactly one cell and leaves the rest of the timetable
//! as it was.  It does **not** consult other classes: a manual choice is
//! trusted even if it double-books a teacher.  Use
//! [`find_double_bookings`](super::find_double_bookings) afterwards to
//! surface such bookings.

use tracing::info;

use super::error::TimetableError;
use crate::entity::{ClassEntity, ClassTimetable, ScheduleCell, TeacherLookup};

/// Overwrite the cell at (`day`, `slot_id`) of `timetable`.
///
/// `subject_id = None` clears the cell to a break.  Otherwise the subject
/// must be one of `class`'s subjects; the cell gets its effective teacher.
///
/// Returns the previous cell.
///
/// # Errors
/// * [`TimetableError::ClassMismatch`] – `class` is not the timetable's class.
/// * [`TimetableError::UnknownDay`] / [`TimetableError::UnknownSlot`] – the
///   cell is outside the timetable's grid.
/// * [`TimetableError::SubjectNotInClass`] – the subject is not taught to
///   `class`.
pub fn edit_cell<L: TeacherLookup + ?Sized>(
    timetable: &mut ClassTimetable,
    class: &ClassEntity,
    day: &str,
    slot_id: &str,
    subject_id: Option<&str>,
    teachers: &L,
) -> Result<ScheduleCell, TimetableError> {
    if class.id != timetable.class_id {
        return Err(TimetableError::ClassMismatch {
            expected: timetable.class_id.clone(),
            found: class.id.clone(),
        });
    }
    if !timetable.days.iter().any(|d| d == day) {
        return Err(TimetableError::UnknownDay {
            class: class.id.clone(),
            day: day.to_string(),
        });
    }
    if !timetable.slots.iter().any(|s| s.id == slot_id) {
        return Err(TimetableError::UnknownSlot {
            class: class.id.clone(),
            slot: slot_id.to_string(),
        });
    }

    let cell = match subject_id {
        Some(id) => {
            let subject = class
                .subject(id)
                .ok_or_else(|| TimetableError::SubjectNotInClass {
                    class: class.id.clone(),
                    subject: id.to_string(),
                })?;
            ScheduleCell::lesson(subject, class.effective_teacher(subject), teachers)
        }
        None => ScheduleCell::Break,
    };

    info!(
        class = %class.id,
        day,
        slot = slot_id,
        subject = cell.subject_name(),
        teacher = ?cell.teacher_id(),
        "cell edited"
    );

    let previous = timetable
        .schedule
        .entry(day.to_string())
        .or_default()
        .insert(slot_id.to_string(), cell);

    Ok(previous.unwrap_or_default())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::entity::{ScheduleMap, SubjectEntity};
    use crate::timetable::{find_double_bookings, generate};
    use std::collections::HashMap;

    fn subject(id: &str, class_id: &str, teacher: Option<&str>) -> SubjectEntity {
        SubjectEntity {
            id: id.to_string(),
            name: format!("{id}-name"),
            class_id: class_id.to_string(),
            teacher_id: teacher.map(str::to_string),
        }
    }

    fn class(id: &str, default_teacher: Option<&str>, subjects: Vec<SubjectEntity>) -> ClassEntity {
        ClassEntity {
            id: id.to_string(),
            name: id.to_string(),
            teacher_id: default_teacher.map(str::to_string),
            subjects,
        }
    }

    fn teachers() -> HashMap<String, String> {
        HashMap::from([
            ("T1".to_string(), "Ada".to_string()),
            ("T2".to_string(), "Alan".to_string()),
        ])
    }

    fn timetable_for(classes: &[ClassEntity], class_id: &str) -> ClassTimetable {
        let grid = GridConfig::default();
        let mut map = generate(classes, &grid.days, &grid.slots, &teachers());
        ClassTimetable {
            class_id: class_id.to_string(),
            days: grid.days,
            slots: grid.slots,
            schedule: map.remove(class_id).unwrap(),
        }
    }

    #[test]
    fn edit_overwrites_only_the_target_cell() {
        let c1 = class(
            "C1",
            None,
            vec![subject("S1", "C1", Some("T1")), subject("S2", "C1", None)],
        );
        let mut table = timetable_for(std::slice::from_ref(&c1), "C1");
        let before = table.clone();

        let previous = edit_cell(&mut table, &c1, "Monday", "1", Some("S2"), &teachers()).unwrap();

        assert_eq!(previous.subject_id(), Some("S1"));
        assert_eq!(table.cell("Monday", "1").unwrap().subject_id(), Some("S2"));

        for day in &before.days {
            for slot in &before.slots {
                if day == "Monday" && slot.id == "1" {
                    continue;
                }
                assert_eq!(table.cell(day, &slot.id), before.cell(day, &slot.id));
            }
        }
    }

    #[test]
    fn edit_with_no_subject_writes_break() {
        let c1 = class("C1", None, vec![subject("S1", "C1", Some("T1"))]);
        let mut table = timetable_for(std::slice::from_ref(&c1), "C1");

        edit_cell(&mut table, &c1, "Tuesday", "3", None, &teachers()).unwrap();
        assert!(table.cell("Tuesday", "3").unwrap().is_break());
        assert!(table.is_complete());
    }

    #[test]
    fn edit_resolves_class_default_teacher() {
        let c1 = class("C1", Some("T2"), vec![subject("S1", "C1", None)]);
        let mut table = timetable_for(std::slice::from_ref(&c1), "C1");

        edit_cell(&mut table, &c1, "Friday", "6", Some("S1"), &teachers()).unwrap();
        let cell = table.cell("Friday", "6").unwrap();
        assert_eq!(cell.teacher_id(), Some("T2"));
        assert_eq!(cell.teacher_name(), "Alan");
    }

    #[test]
    fn edit_skips_busy_check_and_may_double_book() {
        // C1 and C2 both have a single subject taught by T1; generation gives
        // C1 every slot and C2 only breaks.
        let c1 = class("C1", Some("T1"), vec![subject("S1", "C1", None)]);
        let c2 = class("C2", Some("T1"), vec![subject("S2", "C2", None)]);
        let classes = vec![c1.clone(), c2.clone()];
        let grid = GridConfig::default();
        let mut map: ScheduleMap = generate(&classes, &grid.days, &grid.slots, &teachers());

        let mut c2_table = ClassTimetable {
            class_id: "C2".into(),
            days: grid.days.clone(),
            slots: grid.slots.clone(),
            schedule: map.remove("C2").unwrap(),
        };
        assert!(c2_table.cell("Monday", "1").unwrap().is_break());

        // Manual edit puts T1 into C2 at the same slot; accepted.
        edit_cell(&mut c2_table, &c2, "Monday", "1", Some("S2"), &teachers()).unwrap();
        map.insert("C2".into(), c2_table.schedule);

        let conflicts = find_double_bookings(&map);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].teacher_id, "T1");
        assert_eq!(conflicts[0].class_ids, vec!["C1", "C2"]);
    }

    #[test]
    fn edit_rejects_unknown_day_and_slot() {
        let c1 = class("C1", None, vec![subject("S1", "C1", None)]);
        let mut table = timetable_for(std::slice::from_ref(&c1), "C1");
        let before = table.clone();

        let err = edit_cell(&mut table, &c1, "Sunday", "1", None, &teachers()).unwrap_err();
        assert!(matches!(err, TimetableError::UnknownDay { .. }));

        let err = edit_cell(&mut table, &c1, "Monday", "99", None, &teachers()).unwrap_err();
        assert!(matches!(err, TimetableError::UnknownSlot { .. }));

        assert_eq!(table, before, "failed edits must not modify the timetable");
    }

    #[test]
    fn edit_rejects_subject_of_another_class() {
        let c1 = class("C1", None, vec![subject("S1", "C1", None)]);
        let mut table = timetable_for(std::slice::from_ref(&c1), "C1");

        let err = edit_cell(&mut table, &c1, "Monday", "1", Some("S9"), &teachers()).unwrap_err();
        assert_eq!(
            err,
            TimetableError::SubjectNotInClass {
                class: "C1".into(),
                subject: "S9".into(),
            }
        );
    }

    #[test]
    fn edit_rejects_mismatched_class() {
        let c1 = class("C1", None, vec![subject("S1", "C1", None)]);
        let other = class("C2", None, vec![subject("S1", "C2", None)]);
        let mut table = timetable_for(std::slice::from_ref(&c1), "C1");

        let err = edit_cell(&mut table, &other, "Monday", "1", Some("S1"), &teachers()).unwrap_err();
        assert!(matches!(err, TimetableError::ClassMismatch { .. }));
    }
}
