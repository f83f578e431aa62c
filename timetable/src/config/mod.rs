//! Day / slot grid configuration loading and management.
//!
//! The grid is shared by every class: an ordered list of weekday names and
//! an ordered list of time slots.  Without a configuration file the school
//! default is used (Monday–Friday, six 40-minute periods from 08:00).
//!
//! The expected YAML structure is:
//! ```yaml
//! days: [Monday, Tuesday, Wednesday, Thursday, Friday]
//! slots:
//!   - id: "1"
//!     start: "08:00"
//!     end: "08:40"
//!   - id: "2"
//!     start: "08:45"
//!     end: "09:25"
//! ```

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveTime;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::entity::Slot;

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
///
/// Both lists are optional so that a file may override only one of them.
#[derive(Debug, Deserialize)]
struct GridConfigFile {
    #[serde(default)]
    days: Vec<String>,
    #[serde(default)]
    slots: Vec<SlotEntry>,
}

/// Per-slot fields as they appear in the YAML file.
#[derive(Debug, Deserialize)]
struct SlotEntry {
    id: SlotKey,
    start: String,
    end: String,
}

/// Slot ids may be written bare (`id: 1`) or quoted (`id: "1"`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SlotKey {
    Number(u64),
    Text(String),
}

impl SlotKey {
    fn into_string(self) -> String {
        match self {
            SlotKey::Number(n) => n.to_string(),
            SlotKey::Text(s) => s,
        }
    }
}

const TIME_FORMAT: &str = "%H:%M";

/// Default school week.
const DEFAULT_DAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

/// Default periods as `(start, end)` in `(hour, minute)`.
const DEFAULT_PERIODS: [((u32, u32), (u32, u32)); 6] = [
    ((8, 0), (8, 40)),
    ((8, 45), (9, 25)),
    ((9, 30), (10, 10)),
    ((10, 30), (11, 10)),
    ((11, 15), (11, 55)),
    ((12, 0), (12, 40)),
];

// ── Public data structures ────────────────────────────────────────────────────

/// The ordered day and slot lists every timetable is built on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfig {
    pub days: Vec<String>,
    pub slots: Vec<Slot>,
}

impl GridConfig {
    /// Monday through Friday.
    pub fn default_days() -> Vec<String> {
        DEFAULT_DAYS.iter().map(|d| d.to_string()).collect()
    }

    /// Six periods with ids `"1"`..`"6"`, starting at 08:00.
    pub fn default_slots() -> Vec<Slot> {
        DEFAULT_PERIODS
            .iter()
            .enumerate()
            .filter_map(|(i, &((sh, sm), (eh, em)))| {
                Some(Slot::new(
                    (i + 1).to_string(),
                    NaiveTime::from_hms_opt(sh, sm, 0)?,
                    NaiveTime::from_hms_opt(eh, em, 0)?,
                ))
            })
            .collect()
    }

    pub fn slot(&self, id: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id == id)
    }

    /// Number of (day, slot) cells per class.
    pub fn cell_count(&self) -> usize {
        self.days.len() * self.slots.len()
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            days: Self::default_days(),
            slots: Self::default_slots(),
        }
    }
}

// ── GridConfigManager ─────────────────────────────────────────────────────────

/// Loads and holds the grid configuration from a YAML file.
///
/// Until a file is loaded the default grid is served.
#[derive(Debug, Default)]
pub struct GridConfigManager {
    grid: GridConfig,

    /// Set to `true` after a successful [`load_from_file`](Self::load_from_file).
    loaded: bool,
}

impl GridConfigManager {
    /// Creates a manager serving the default grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `path` and replaces the current grid.
    ///
    /// * An empty or missing `days` / `slots` list falls back to the default
    ///   for that list.
    /// * Calling this method a second time replaces the previously loaded grid.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, the YAML is structurally
    /// invalid, a time is not `HH:MM`, a slot does not end after it starts, or
    /// a day name / slot id is repeated.  On error the default grid is served.
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        info!("Loading grid configuration from: {}", path.display());

        // Reset state before (re-)loading
        self.grid = GridConfig::default();
        self.loaded = false;

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open grid configuration file: {}", path.display()))?;

        let file: GridConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;

        let days = if file.days.is_empty() {
            warn!("No days found in grid configuration, using Monday-Friday");
            GridConfig::default_days()
        } else {
            file.days
        };

        let slots = if file.slots.is_empty() {
            warn!("No slots found in grid configuration, using default periods");
            GridConfig::default_slots()
        } else {
            file.slots
                .into_iter()
                .map(parse_slot)
                .collect::<Result<Vec<_>>>()?
        };

        validate(&days, &slots)?;

        for slot in &slots {
            debug!("  Slot: {} | {}", slot.id, slot.time_range());
        }

        self.grid = GridConfig { days, slots };
        self.loaded = true;

        info!(
            days = ?self.grid.days,
            slot_count = self.grid.slots.len(),
            "Successfully loaded grid configuration"
        );

        Ok(())
    }

    /// The active grid: the loaded one, or the default.
    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    /// Returns `true` after a successful call to [`load_from_file`](Self::load_from_file).
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

fn parse_slot(entry: SlotEntry) -> Result<Slot> {
    let id = entry.id.into_string();
    let start = NaiveTime::parse_from_str(&entry.start, TIME_FORMAT)
        .with_context(|| format!("slot '{}': invalid start time '{}'", id, entry.start))?;
    let end = NaiveTime::parse_from_str(&entry.end, TIME_FORMAT)
        .with_context(|| format!("slot '{}': invalid end time '{}'", id, entry.end))?;
    Ok(Slot::new(id, start, end))
}

fn validate(days: &[String], slots: &[Slot]) -> Result<()> {
    let mut seen_days = HashSet::new();
    for day in days {
        if !seen_days.insert(day.as_str()) {
            bail!("day '{}' is listed more than once", day);
        }
    }

    let mut seen_slots = HashSet::new();
    for slot in slots {
        if slot.id.is_empty() {
            bail!("slot with empty id");
        }
        if !seen_slots.insert(slot.id.as_str()) {
            bail!("slot id '{}' is listed more than once", slot.id);
        }
        if slot.end <= slot.start {
            bail!(
                "slot '{}' ends at or before it starts ({})",
                slot.id,
                slot.time_range()
            );
        }
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper: write a YAML string to a temp file and return it.
    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    // ── GridConfig ────────────────────────────────────────────────────────────

    #[test]
    fn default_grid_has_expected_values() {
        let grid = GridConfig::default();
        assert_eq!(
            grid.days,
            vec!["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
        );
        assert_eq!(grid.slots.len(), 6);
        assert_eq!(grid.slots[0].id, "1");
        assert_eq!(grid.slots[0].time_range(), "08:00-08:40");
        assert_eq!(grid.slots[5].id, "6");
        assert_eq!(grid.cell_count(), 30);
    }

    #[test]
    fn default_slots_are_ordered_and_do_not_overlap() {
        let slots = GridConfig::default_slots();
        for pair in slots.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        assert!(validate(&GridConfig::default_days(), &slots).is_ok());
    }

    #[test]
    fn unloaded_manager_serves_default_grid() {
        let mgr = GridConfigManager::new();
        assert!(!mgr.is_loaded());
        assert_eq!(mgr.grid(), &GridConfig::default());
    }

    // ── GridConfigManager: load_from_file ─────────────────────────────────────

    #[test]
    fn load_example_yaml() {
        let yaml = r#"
days: [Monday, Wednesday]
slots:
  - id: "A"
    start: "09:00"
    end: "09:45"
  - id: 2
    start: "10:00"
    end: "10:45"
"#;
        let f = yaml_tempfile(yaml);
        let mut mgr = GridConfigManager::new();
        mgr.load_from_file(f.path()).unwrap();

        assert!(mgr.is_loaded());
        let grid = mgr.grid();
        assert_eq!(grid.days, vec!["Monday", "Wednesday"]);
        assert_eq!(grid.slots.len(), 2);
        assert_eq!(grid.slots[0].id, "A");
        assert_eq!(grid.slots[1].id, "2", "numeric ids are read as strings");
        assert_eq!(grid.slot("2").unwrap().time_range(), "10:00-10:45");
    }

    #[test]
    fn missing_lists_fall_back_to_defaults() {
        let f = yaml_tempfile("days: [Saturday]\n");
        let mut mgr = GridConfigManager::new();
        mgr.load_from_file(f.path()).unwrap();

        assert_eq!(mgr.grid().days, vec!["Saturday"]);
        assert_eq!(mgr.grid().slots, GridConfig::default_slots());

        let f = yaml_tempfile("days: []\nslots: []\n");
        mgr.load_from_file(f.path()).unwrap();
        assert_eq!(mgr.grid(), &GridConfig::default());
    }

    #[test]
    fn missing_file_returns_error() {
        let mut mgr = GridConfigManager::new();
        let result = mgr.load_from_file(Path::new("/nonexistent/path/grid.yaml"));
        assert!(result.is_err());
        assert!(!mgr.is_loaded());
    }

    #[test]
    fn malformed_yaml_returns_error() {
        let f = yaml_tempfile("this is: not: valid: yaml: content:::");
        let mut mgr = GridConfigManager::new();
        assert!(mgr.load_from_file(f.path()).is_err());
        assert!(!mgr.is_loaded());
    }

    #[test]
    fn bad_time_format_returns_error() {
        let yaml = r#"
slots:
  - id: "1"
    start: "8am"
    end: "08:40"
"#;
        let f = yaml_tempfile(yaml);
        let mut mgr = GridConfigManager::new();
        let err = mgr.load_from_file(f.path()).unwrap_err();
        assert!(format!("{err:#}").contains("invalid start time"));
    }

    #[test]
    fn duplicate_slot_id_returns_error() {
        let yaml = r#"
slots:
  - { id: "1", start: "08:00", end: "08:40" }
  - { id: "1", start: "09:00", end: "09:40" }
"#;
        let f = yaml_tempfile(yaml);
        let mut mgr = GridConfigManager::new();
        assert!(mgr.load_from_file(f.path()).is_err());
        assert!(!mgr.is_loaded());
        assert_eq!(mgr.grid(), &GridConfig::default());
    }

    #[test]
    fn duplicate_day_returns_error() {
        let f = yaml_tempfile("days: [Monday, Monday]\n");
        let mut mgr = GridConfigManager::new();
        assert!(mgr.load_from_file(f.path()).is_err());
    }

    #[test]
    fn slot_ending_before_start_returns_error() {
        let yaml = r#"
slots:
  - { id: "1", start: "09:00", end: "08:40" }
"#;
        let f = yaml_tempfile(yaml);
        let mut mgr = GridConfigManager::new();
        assert!(mgr.load_from_file(f.path()).is_err());
    }

    // ── GridConfigManager: reload ─────────────────────────────────────────────

    #[test]
    fn reload_replaces_previous_grid() {
        let f1 = yaml_tempfile("days: [Monday]\n");
        let f2 = yaml_tempfile("days: [Tuesday]\n");

        let mut mgr = GridConfigManager::new();
        mgr.load_from_file(f1.path()).unwrap();
        assert_eq!(mgr.grid().days, vec!["Monday"]);

        mgr.load_from_file(f2.path()).unwrap();
        assert_eq!(mgr.grid().days, vec!["Tuesday"], "old grid must be gone");
    }
}
