/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for timetable edits.
//!
//! Generation itself is total and has no error type: it always returns a
//! complete grid.  Only the single-cell edit path can fail, and only when
//! the requested cell or subject does not belong to the timetable.

use thiserror::Error;

/// Error returned by [`edit_cell`](super::edit_cell).
///
/// Every variant names the offending value so the CLI can report it without
/// further parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimetableError {
    /// The class entity passed in is not the one the timetable belongs to.
    #[error("timetable belongs to class '{expected}', not '{found}'")]
    ClassMismatch { expected: String, found: String },

    /// The day is not part of the timetable's grid.
    #[error("day '{day}' is not part of the timetable for class '{class}'")]
    UnknownDay { class: String, day: String },

    /// The slot id is not part of the timetable's grid.
    #[error("slot '{slot}' is not part of the timetable for class '{class}'")]
    UnknownSlot { class: String, slot: String },

    /// The chosen subject is not taught to this class.
    #[error("subject '{subject}' is not taught to class '{class}'")]
    SubjectNotInClass { class: String, subject: String },
}
