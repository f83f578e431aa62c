/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Class timetable generator
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── entity        – classes, subjects, teachers, slots, schedule cells
//! ├── config/       – YAML day / slot grid
//! ├── directory/    – YAML class / subject / teacher directory
//! ├── timetable/    – generation, single-cell edits, double-booking audit, text rendering
//! └── store/        – per-class JSON persistence
//! ```

pub mod config;
pub mod directory;
pub mod entity;
pub mod store;
pub mod timetable;
