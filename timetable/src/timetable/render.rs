/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Plain-text rendering of a class timetable.

use crate::entity::{ClassTimetable, ScheduleCell};

const COLUMN_SEPARATOR: &str = " | ";

/// Render `timetable` as a fixed-width grid: one row per slot in configured
/// order, one column per day in configured order.
///
/// ```text
/// Slot              | Monday        | Tuesday
/// ------------------+---------------+--------
/// 1 08:00-08:40     | Maths (Ada)   | Break
/// ```
pub fn render_text(timetable: &ClassTimetable) -> String {
    let mut header = vec!["Slot".to_string()];
    header.extend(timetable.days.iter().cloned());

    let rows: Vec<Vec<String>> = timetable
        .slots
        .iter()
        .map(|slot| {
            let mut row = vec![format!("{} {}", slot.id, slot.time_range())];
            row.extend(
                timetable
                    .days
                    .iter()
                    .map(|day| cell_text(timetable.cell(day, &slot.id))),
            );
            row
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            std::iter::once(&header)
                .chain(rows.iter())
                .map(|r| r[col].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = format!("Class {}\n", timetable.class_id);
    out.push_str(&format_row(&header, &widths));
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    for row in &rows {
        out.push_str(&format_row(row, &widths));
    }
    out
}

fn cell_text(cell: Option<&ScheduleCell>) -> String {
    match cell {
        Some(cell) if !cell.teacher_name().is_empty() => {
            format!("{} ({})", cell.subject_name(), cell.teacher_name())
        }
        Some(cell) => cell.subject_name().to_string(),
        None => "-".to_string(),
    }
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{:<width$}", c, width = *w))
        .collect::<Vec<_>>()
        .join(COLUMN_SEPARATOR);
    format!("{}\n", line.trim_end())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
