/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Persistence sink for generated timetables.
//!
//! Each class is stored as its own document, keyed by class id, together
//! with the days and slots used to produce it.  Writes are independent per
//! class: a failure for one class does not stop the others and is not
//! rolled back.  [`save_all`] reports which classes made it.
//!
//! [`JsonTimetableStore`] layout:
//! ```text
//! <root>/
//! ├── C1.json
//! └── C2.json
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};

use crate::entity::{ClassTimetable, ScheduleMap};

const EXTENSION: &str = "json";

// ── TimetableStore ────────────────────────────────────────────────────────────

/// Storage for per-class timetables.
pub trait TimetableStore {
    /// Write `timetable`, replacing any stored timetable for the same class.
    fn save(&self, timetable: &ClassTimetable) -> Result<()>;

    /// Read the timetable of `class_id`, or `None` if nothing is stored.
    fn load(&self, class_id: &str) -> Result<Option<ClassTimetable>>;

    /// Ids of every stored class, sorted.
    fn class_ids(&self) -> Result<Vec<String>>;
}

/// Outcome of [`save_all`].
#[derive(Debug, Default)]
pub struct SaveReport {
    pub saved: Vec<String>,
    pub failed: Vec<(String, anyhow::Error)>,
}

impl SaveReport {
    /// `true` when every timetable was saved.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Save each timetable independently, in order.
///
/// Never stops early: failures are collected in the report and the
/// remaining classes are still written.
pub fn save_all<S: TimetableStore + ?Sized>(store: &S, timetables: &[ClassTimetable]) -> SaveReport {
    let mut report = SaveReport::default();

    for timetable in timetables {
        match store.save(timetable) {
            Ok(()) => report.saved.push(timetable.class_id.clone()),
            Err(e) => {
                warn!(class = %timetable.class_id, "failed to save timetable: {:#}", e);
                report.failed.push((timetable.class_id.clone(), e));
            }
        }
    }

    info!(
        saved = report.saved.len(),
        failed = report.failed.len(),
        "timetables persisted"
    );

    report
}

/// Read every stored timetable into a class id → schedule map.
pub fn load_schedules<S: TimetableStore + ?Sized>(store: &S) -> Result<ScheduleMap> {
    let mut map = ScheduleMap::new();
    for class_id in store.class_ids()? {
        if let Some(timetable) = store.load(&class_id)? {
            map.insert(timetable.class_id, timetable.schedule);
        }
    }
    Ok(map)
}

// ── JsonTimetableStore ────────────────────────────────────────────────────────

/// One pretty-printed JSON document per class under a root directory.
#[derive(Debug, Clone)]
pub struct JsonTimetableStore {
    root: PathBuf,
}

impl JsonTimetableStore {
    /// The directory is created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Document path for `class_id`.
    ///
    /// # Errors
    /// Rejects ids that are empty or could escape the root directory.
    fn path_for(&self, class_id: &str) -> Result<PathBuf> {
        if class_id.is_empty()
            || class_id == "."
            || class_id == ".."
            || class_id.contains(['/', '\\'])
        {
            bail!("invalid class id for storage: '{}'", class_id);
        }
        Ok(self.root.join(format!("{}.{}", class_id, EXTENSION)))
    }
}

impl TimetableStore for JsonTimetableStore {
    fn save(&self, timetable: &ClassTimetable) -> Result<()> {
        let path = self.path_for(&timetable.class_id)?;

        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("Cannot create store directory: {}", self.root.display()))?;

        let json = serde_json::to_string_pretty(timetable)
            .with_context(|| format!("Failed to serialise timetable for '{}'", timetable.class_id))?;

        // Write next to the target, then rename over it.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("Cannot write file: {}", tmp.display()))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("Cannot replace file: {}", path.display()))?;

        debug!(class = %timetable.class_id, path = %path.display(), "timetable saved");
        Ok(())
    }

    fn load(&self, class_id: &str) -> Result<Option<ClassTimetable>> {
        let path = self.path_for(class_id)?;
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Cannot open file: {}", path.display()))?;
        let timetable: ClassTimetable = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON file: {}", path.display()))?;

        if timetable.class_id != class_id {
            bail!(
                "{} holds the timetable of class '{}', expected '{}'",
                path.display(),
                timetable.class_id,
                class_id
            );
        }

        Ok(Some(timetable))
    }

    fn class_ids(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("Cannot read store directory: {}", self.root.display()))?;

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("Cannot read store directory: {}", self.root.display()))?
                .path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
