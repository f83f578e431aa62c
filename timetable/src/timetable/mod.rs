//! Timetable generation for every class of a school.
//!
//! [`generate`] fills a day × slot grid for each class with the class's
//! subjects, rotating through them round-robin, so that no teacher is booked
//! by two classes in the same day and slot.  A cell that cannot be filled
//! without a double booking becomes a break.  [`TimetableGenerator`] binds
//! the algorithm to a loaded grid configuration.
//!
//! # Algorithm
//! For each class (input order), a cursor starts at subject 0.  For each
//! day, then each slot:
//!
//! 1. Try up to `N` subjects, starting at the cursor and wrapping around.
//! 2. Accept the first one whose effective teacher is absent or not yet
//!    booked for this day and slot id by any class.  The cursor then moves
//!    one step forward.
//! 3. If all `N` are blocked, write a break and leave the cursor where it is.
//!
//! There is no lookahead and no backtracking.  Bookings are kept in an
//! explicit `(day, slot, teacher) → class` index filled in iteration order,
//! so the first class to claim a teacher keeps it.
//!
//! # Properties
//! | Property | How it holds |
//! |---|---|
//! | No double booking | every placement checks and updates the booking index |
//! | No gaps | every (day, slot) of a generated class gets a lesson or a break |
//! | Skip empty | classes with no subjects produce no entry |
//! | Deterministic | no randomness; output depends only on input order |
//!
//! Two subjects of the same class may share an effective teacher; the index
//! only guards against conflicts between classes, and a class never fills
//! the same slot twice.
//!
//! # Example
//! ```rust,ignore
//! let grid = Arc::new(grid_config_manager);
//! let generator = TimetableGenerator::new(grid);
//! let timetables = generator.build_timetables(directory.classes(), &directory);
//! ```

pub mod conflicts;
pub mod edit;
pub mod error;
pub mod render;

pub use conflicts::{find_double_bookings, DoubleBooking};
pub use edit::edit_cell;
pub use error::TimetableError;
pub use render::render_text;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::GridConfigManager;
use crate::entity::{
    ClassEntity, ClassSchedule, ClassTimetable, ScheduleCell, ScheduleMap, Slot, SubjectEntity,
    TeacherLookup,
};

// ── Internal state types ──────────────────────────────────────────────────────

/// Per-run booking index: (day, slot id, teacher id) → class id holding it.
///
/// Only ever queried by exact key, so a `HashMap` keeps results
/// deterministic.  Keys borrow from the inputs for the duration of the run.
type Bookings<'a> = HashMap<(&'a str, &'a str, &'a str), &'a str>;

// ── Core algorithm ────────────────────────────────────────────────────────────

/// Generate a schedule for every class with at least one subject.
///
/// Never fails: every generated class gets a cell for every (day, slot).
/// `teachers` only decorates cells with display names; unknown ids yield an
/// empty name.
pub fn generate<L: TeacherLookup + ?Sized>(
    classes: &[ClassEntity],
    days: &[String],
    slots: &[Slot],
    teachers: &L,
) -> ScheduleMap {
    let mut bookings = Bookings::new();
    let mut schedules = ScheduleMap::new();

    for class in classes {
        if class.subjects.is_empty() {
            debug!(class = %class.id, "no subjects, skipped");
            continue;
        }
        let schedule = fill_class(class, days, slots, teachers, &mut bookings);
        schedules.insert(class.id.clone(), schedule);
    }

    schedules
}

/// Fill one class's grid, claiming teachers in `bookings` as it goes.
fn fill_class<'a, L: TeacherLookup + ?Sized>(
    class: &'a ClassEntity,
    days: &'a [String],
    slots: &'a [Slot],
    teachers: &L,
    bookings: &mut Bookings<'a>,
) -> ClassSchedule {
    let subjects: &'a [SubjectEntity] = &class.subjects;
    let n = subjects.len();
    let mut subject_index = 0usize;
    let mut schedule = ClassSchedule::new();
    let mut breaks = 0usize;

    for day in days {
        let row = schedule.entry(day.clone()).or_default();

        for slot in slots {
            let mut candidate = None;

            for attempt in 0..n {
                let subject = &subjects[(subject_index + attempt) % n];
                let teacher = class.effective_teacher(subject);

                // Teacherless subjects are always placeable
                if let Some(teacher_id) = teacher {
                    let key = (day.as_str(), slot.id.as_str(), teacher_id);
                    if let Some(holder) = bookings.get(&key) {
                        debug!(
                            class   = %class.id,
                            day     = %day,
                            slot    = %slot.id,
                            subject = %subject.id,
                            teacher = %teacher_id,
                            holder  = %holder,
                            "teacher busy"
                        );
                        continue;
                    }
                }

                candidate = Some((subject, teacher));
                break;
            }

            let cell = match candidate {
                Some((subject, teacher_id)) => {
                    if let Some(teacher_id) = teacher_id {
                        bookings.insert(
                            (day.as_str(), slot.id.as_str(), teacher_id),
                            class.id.as_str(),
                        );
                    }
                    subject_index = (subject_index + 1) % n;
                    ScheduleCell::lesson(subject, teacher_id, teachers)
                }
                None => {
                    breaks += 1;
                    ScheduleCell::Break
                }
            };

            row.insert(slot.id.clone(), cell);
        }
    }

    debug!(
        class    = %class.id,
        subjects = n,
        cells    = days.len() * slots.len(),
        breaks   = breaks,
        "class filled"
    );

    schedule
}

// ── TimetableGenerator ────────────────────────────────────────────────────────

/// Generates timetables on the grid held by a [`GridConfigManager`].
///
/// Holds a shared reference to the grid.  All per-run state (the booking
/// index, cursors) lives inside each call, so the generator is `Send + Sync`
/// and a run can be repeated at any time for a full regeneration.
pub struct TimetableGenerator {
    grid_config_manager: Arc<GridConfigManager>,
}

impl TimetableGenerator {
    pub fn new(grid_config_manager: Arc<GridConfigManager>) -> Self {
        Self {
            grid_config_manager,
        }
    }

    /// Generate schedules for `classes` on the configured grid.
    ///
    /// The result is audited for double bookings; a finding is logged as a
    /// warning and indicates a bug, since generation guarantees none.
    pub fn generate<L: TeacherLookup + ?Sized>(
        &self,
        classes: &[ClassEntity],
        teachers: &L,
    ) -> ScheduleMap {
        let grid = self.grid_config_manager.grid();

        info!(
            class_count = classes.len(),
            days = grid.days.len(),
            slots = grid.slots.len(),
            grid_loaded = self.grid_config_manager.is_loaded(),
            "=== TimetableGenerator::generate() ==="
        );

        if grid.days.is_empty() || grid.slots.is_empty() {
            warn!("grid has no days or no slots; generated timetables will be empty");
        }

        let map = generate(classes, &grid.days, &grid.slots, teachers);

        for booking in find_double_bookings(&map) {
            warn!(%booking, "generated timetable double-books a teacher");
        }

        let breaks = map
            .values()
            .flat_map(|schedule| schedule.values())
            .flat_map(|row| row.values())
            .filter(|cell| cell.is_break())
            .count();

        info!(
            generated = map.len(),
            skipped = classes.len() - map.len(),
            breaks = breaks,
            "=== Generation complete ==="
        );

        map
    }

    /// Generate and package each schedule with the grid that produced it,
    /// ready for the persistence sink.  Output follows `classes` order.
    pub fn build_timetables<L: TeacherLookup + ?Sized>(
        &self,
        classes: &[ClassEntity],
        teachers: &L,
    ) -> Vec<ClassTimetable> {
        let grid = self.grid_config_manager.grid();
        let mut map = self.generate(classes, teachers);

        classes
            .iter()
            .filter_map(|class| {
                map.remove(&class.id).map(|schedule| ClassTimetable {
                    class_id: class.id.clone(),
                    days: grid.days.clone(),
                    slots: grid.slots.clone(),
                    schedule,
                })
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
