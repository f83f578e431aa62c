/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Class / subject / teacher directory.
//!
//! A read-only snapshot of the school's entities, loaded from YAML.  Lists
//! keep their file order because the generator's output depends on it
//! (classes are filled in order, subjects rotate in order).
//!
//! The expected YAML structure is:
//! ```yaml
//! teachers:
//!   - { id: T1, name: "Ada Lovelace" }
//! classes:
//!   - { id: C1, name: "Grade 1A", teacher_id: T1 }
//! subjects:
//!   - { id: S1, name: Maths, class_id: C1, teacher_id: T2 }
//!   - { id: S2, name: Art, class_id: C1 }
//! ```
//! `teacherId` / `classId` are accepted as aliases.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::entity::{ClassEntity, SubjectEntity, TeacherEntity, TeacherLookup};

// ── Private YAML deserialization types ────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct DirectoryFile {
    #[serde(default)]
    teachers: Vec<TeacherEntry>,
    #[serde(default)]
    classes: Vec<ClassEntry>,
    #[serde(default)]
    subjects: Vec<SubjectEntry>,
}

#[derive(Debug, Deserialize)]
struct TeacherEntry {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct ClassEntry {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default, alias = "teacherId")]
    teacher_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubjectEntry {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(alias = "classId")]
    class_id: String,
    #[serde(default, alias = "teacherId")]
    teacher_id: Option<String>,
}

// ── SchoolDirectory ───────────────────────────────────────────────────────────

/// Teachers and classes (with their subjects expanded), in input order.
#[derive(Debug, Default)]
pub struct SchoolDirectory {
    teachers: Vec<TeacherEntity>,
    classes: Vec<ClassEntity>,
    loaded: bool,
}

impl SchoolDirectory {
    /// Creates an empty, unloaded directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory from already-parsed entities.
    ///
    /// Each subject is attached to the class named by its `class_id`,
    /// keeping the order of `subjects`.  Subjects naming an unknown class are
    /// skipped with a warning.  Any `subjects` already present on `classes`
    /// are kept ahead of the attached ones.
    ///
    /// # Errors
    /// Returns an error if a teacher, class or subject id is empty or
    /// repeated.
    pub fn from_entities(
        teachers: Vec<TeacherEntity>,
        mut classes: Vec<ClassEntity>,
        subjects: Vec<SubjectEntity>,
    ) -> Result<Self> {
        check_unique("teacher", teachers.iter().map(|t| t.id.as_str()))?;
        check_unique("class", classes.iter().map(|c| c.id.as_str()))?;
        check_unique(
            "subject",
            classes
                .iter()
                .flat_map(|c| c.subjects.iter())
                .chain(subjects.iter())
                .map(|s| s.id.as_str()),
        )?;

        let known_teachers: HashSet<&str> = teachers.iter().map(|t| t.id.as_str()).collect();

        let mut orphans = 0usize;
        for subject in subjects {
            match classes.iter_mut().find(|c| c.id == subject.class_id) {
                Some(class) => class.subjects.push(subject),
                None => {
                    warn!(
                        subject = %subject.id,
                        class = %subject.class_id,
                        "subject refers to an unknown class, skipped"
                    );
                    orphans += 1;
                }
            }
        }

        for class in &classes {
            let referenced = class
                .teacher_id
                .iter()
                .chain(class.subjects.iter().filter_map(|s| s.teacher_id.as_ref()))
                .filter(|id| !id.is_empty());
            for teacher_id in referenced {
                if !known_teachers.contains(teacher_id.as_str()) {
                    debug!(
                        class = %class.id,
                        teacher = %teacher_id,
                        "teacher id not in directory, name will be empty"
                    );
                }
            }
        }

        let directory = Self {
            teachers,
            classes,
            loaded: true,
        };

        info!(
            teachers = directory.teachers.len(),
            classes = directory.classes.len(),
            subjects = directory.subject_count(),
            skipped_subjects = orphans,
            "School directory assembled"
        );

        Ok(directory)
    }

    /// Parses `path` and replaces the directory contents.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, the YAML is structurally
    /// invalid, or an id is empty or repeated.  On error the directory is left
    /// empty and unloaded.
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        info!("Loading school directory from: {}", path.display());

        *self = Self::default();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open directory file: {}", path.display()))?;

        let file: DirectoryFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;

        let teachers = file
            .teachers
            .into_iter()
            .map(|t| TeacherEntity {
                id: t.id,
                name: t.name,
            })
            .collect();
        let classes = file
            .classes
            .into_iter()
            .map(|c| ClassEntity {
                id: c.id,
                name: c.name,
                teacher_id: c.teacher_id,
                subjects: Vec::new(),
            })
            .collect();
        let subjects = file
            .subjects
            .into_iter()
            .map(|s| SubjectEntity {
                id: s.id,
                name: s.name,
                class_id: s.class_id,
                teacher_id: s.teacher_id,
            })
            .collect();

        *self = Self::from_entities(teachers, classes, subjects)
            .with_context(|| format!("Invalid directory file: {}", path.display()))?;

        Ok(())
    }

    /// Classes in input order, each with its subjects expanded.
    pub fn classes(&self) -> &[ClassEntity] {
        &self.classes
    }

    pub fn class(&self, id: &str) -> Option<&ClassEntity> {
        self.classes.iter().find(|c| c.id == id)
    }

    pub fn teachers(&self) -> &[TeacherEntity] {
        &self.teachers
    }

    pub fn subject_count(&self) -> usize {
        self.classes.iter().map(|c| c.subjects.len()).sum()
    }

    /// Returns `true` once entities have been loaded or assembled.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

impl TeacherLookup for SchoolDirectory {
    fn teacher_name(&self, teacher_id: &str) -> Option<&str> {
        self.teachers
            .iter()
            .find(|t| t.id == teacher_id)
            .map(|t| t.name.as_str())
    }
}

fn check_unique<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.is_empty() {
            bail!("{} with empty id", kind);
        }
        if !seen.insert(id) {
            bail!("duplicate {} id '{}'", kind, id);
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

    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    const SCHOOL: &str = r#"
teachers:
  - { id: T1, name: "Ada Lovelace" }
  - { id: T2, name: "Alan Turing" }
classes:
  - { id: C2, name: "Grade 2", teacher_id: T1 }
  - { id: C1, name: "Grade 1" }
  - { id: C3, name: "Grade 3" }
subjects:
  - { id: S3, name: Art, class_id: C1 }
  - { id: S1, name: Maths, class_id: C2, teacher_id: T2 }
  - { id: S2, name: Physics, classId: C1, teacherId: T1 }
  - { id: S4, name: Music, class_id: C9 }
"#;

    #[test]
    fn load_keeps_input_order_and_expands_subjects() {
        let f = yaml_tempfile(SCHOOL);
        let mut dir = SchoolDirectory::new();
        dir.load_from_file(f.path()).unwrap();

        assert!(dir.is_loaded());
        let ids: Vec<_> = dir.classes().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["C2", "C1", "C3"]);

        let c1 = dir.class("C1").unwrap();
        let subjects: Vec<_> = c1.subjects.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(subjects, vec!["S3", "S2"]);
        assert_eq!(c1.subjects[1].teacher_id.as_deref(), Some("T1"));

        assert_eq!(dir.class("C2").unwrap().teacher_id.as_deref(), Some("T1"));
        assert!(dir.class("C3").unwrap().subjects.is_empty());
    }

    #[test]
    fn subject_with_unknown_class_is_skipped() {
        let f = yaml_tempfile(SCHOOL);
        let mut dir = SchoolDirectory::new();
        dir.load_from_file(f.path()).unwrap();

        assert_eq!(dir.subject_count(), 3);
        assert!(dir
            .classes()
            .iter()
            .all(|c| c.subjects.iter().all(|s| s.id != "S4")));
    }

    #[test]
    fn teacher_lookup_resolves_names() {
        let f = yaml_tempfile(SCHOOL);
        let mut dir = SchoolDirectory::new();
        dir.load_from_file(f.path()).unwrap();

        assert_eq!(dir.teacher_name("T2"), Some("Alan Turing"));
        assert_eq!(dir.teacher_name("T9"), None);
    }

    #[test]
    fn duplicate_class_id_returns_error() {
        let yaml = r#"
classes:
  - { id: C1 }
  - { id: C1 }
"#;
        let f = yaml_tempfile(yaml);
        let mut dir = SchoolDirectory::new();
        let err = dir.load_from_file(f.path()).unwrap_err();
        assert!(format!("{err:#}").contains("duplicate class id 'C1'"));
        assert!(!dir.is_loaded());
        assert!(dir.classes().is_empty());
    }

    #[test]
    fn duplicate_subject_id_across_classes_returns_error() {
        let result = SchoolDirectory::from_entities(
            vec![],
            vec![ClassEntity {
                id: "C1".into(),
                ..Default::default()
            }],
            vec![
                SubjectEntity {
                    id: "S1".into(),
                    class_id: "C1".into(),
                    ..Default::default()
                },
                SubjectEntity {
                    id: "S1".into(),
                    class_id: "C1".into(),
                    ..Default::default()
                },
            ],
        );
        assert!(result.is_err());
    }

    #[test]
    fn subject_without_class_id_is_rejected_by_parser() {
        let yaml = r#"
subjects:
  - { id: S1, name: Maths }
"#;
        let f = yaml_tempfile(yaml);
        let mut dir = SchoolDirectory::new();
        assert!(dir.load_from_file(f.path()).is_err());
    }

    #[test]
    fn missing_file_returns_error() {
        let mut dir = SchoolDirectory::new();
        assert!(dir
            .load_from_file(Path::new("/nonexistent/path/school.yaml"))
            .is_err());
        assert!(!dir.is_loaded());
    }

    #[test]
    fn empty_file_sections_yield_empty_directory() {
        let f = yaml_tempfile("teachers: []\n");
        let mut dir = SchoolDirectory::new();
        dir.load_from_file(f.path()).unwrap();
        assert!(dir.is_loaded());
        assert!(dir.classes().is_empty());
        assert!(dir.teachers().is_empty());
    }
}
