/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use timetable::config::GridConfigManager;
use timetable::directory::SchoolDirectory;
use timetable::store::{load_schedules, save_all, JsonTimetableStore, TimetableStore};
use timetable::timetable::{edit_cell, find_double_bookings, render_text, TimetableGenerator};

// ── CLI argument definition ───────────────────────────────────────────────────

/// Class timetable generator.
///
/// Example:
///   timetable generate -d school.yaml -g grid.yaml -o timetables/
///   timetable edit -d school.yaml -o timetables/ -c C1 --day Monday --slot 1 --subject S2
///   timetable show -o timetables/ -c C1
#[derive(Debug, Parser)]
#[command(
    name = "timetable",
    about = "Class timetable generator",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Regenerate and store the timetable of every class that has subjects.
    Generate {
        /// Path to the YAML school directory (teachers, classes, subjects).
        #[arg(short = 'd', long = "directory")]
        directory: PathBuf,

        /// Path to the YAML day / slot grid.  Defaults to Monday–Friday, six periods.
        #[arg(short = 'g', long = "grid")]
        grid: Option<PathBuf>,

        /// Directory holding one JSON timetable per class.
        #[arg(short = 'o', long = "out")]
        out: PathBuf,
    },

    /// Overwrite a single cell of a stored timetable.  No conflict check is applied.
    Edit {
        /// Path to the YAML school directory (teachers, classes, subjects).
        #[arg(short = 'd', long = "directory")]
        directory: PathBuf,

        /// Directory holding one JSON timetable per class.
        #[arg(short = 'o', long = "out")]
        out: PathBuf,

        #[arg(short = 'c', long = "class")]
        class_id: String,

        #[arg(long)]
        day: String,

        #[arg(long)]
        slot: String,

        /// Subject to place.  Omit to clear the cell to a break.
        #[arg(long)]
        subject: Option<String>,
    },

    /// Print a stored timetable as a text grid.
    Show {
        /// Directory holding one JSON timetable per class.
        #[arg(short = 'o', long = "out")]
        out: PathBuf,

        #[arg(short = 'c', long = "class")]
        class_id: String,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Generate {
            directory,
            grid,
            out,
        } => generate(&directory, grid.as_deref(), &out),
        Command::Edit {
            directory,
            out,
            class_id,
            day,
            slot,
            subject,
        } => edit(&directory, &out, &class_id, &day, &slot, subject.as_deref()),
        Command::Show { out, class_id } => show(&out, &class_id),
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn generate(directory_path: &Path, grid_path: Option<&Path>, out: &Path) -> Result<()> {
    let directory = load_directory(directory_path)?;

    let mut grid_config_manager = GridConfigManager::new();
    match grid_path {
        Some(path) => grid_config_manager.load_from_file(path)?,
        None => warn!("No grid configuration file provided, using default days and slots"),
    }

    let generator = TimetableGenerator::new(Arc::new(grid_config_manager));
    let timetables = generator.build_timetables(directory.classes(), &directory);

    let store = JsonTimetableStore::new(out);
    let report = save_all(&store, &timetables);

    for class_id in &report.saved {
        info!(class = %class_id, "  saved");
    }
    if !report.is_complete() {
        let failed: Vec<&str> = report.failed.iter().map(|(id, _)| id.as_str()).collect();
        bail!(
            "{} of {} timetable(s) could not be saved: {}",
            failed.len(),
            timetables.len(),
            failed.join(", ")
        );
    }

    info!(
        count = report.saved.len(),
        out = %store.root().display(),
        "All timetables saved"
    );
    Ok(())
}

fn edit(
    directory_path: &Path,
    out: &Path,
    class_id: &str,
    day: &str,
    slot: &str,
    subject: Option<&str>,
) -> Result<()> {
    let directory = load_directory(directory_path)?;
    let class = directory
        .class(class_id)
        .ok_or_else(|| anyhow!("class '{}' not found in directory", class_id))?;

    let store = JsonTimetableStore::new(out);
    let mut timetable = store
        .load(class_id)?
        .ok_or_else(|| anyhow!("no stored timetable for class '{}' (run generate first)", class_id))?;

    let previous = edit_cell(&mut timetable, class, day, slot, subject, &directory)?;
    store.save(&timetable)?;

    info!(
        class = %class_id,
        day,
        slot,
        previous = previous.subject_name(),
        "Cell updated"
    );

    // Manual edits are trusted; only surface what they caused.
    let schedules = load_schedules(&store).context("Failed to audit stored timetables")?;
    for booking in find_double_bookings(&schedules) {
        warn!("double booking: {}", booking);
    }

    Ok(())
}

fn show(out: &Path, class_id: &str) -> Result<()> {
    let store = JsonTimetableStore::new(out);
    let timetable = store
        .load(class_id)?
        .ok_or_else(|| anyhow!("no stored timetable for class '{}'", class_id))?;

    if !timetable.is_complete() {
        warn!(class = %class_id, "stored timetable has missing cells");
    }

    print!("{}", render_text(&timetable));
    Ok(())
}

fn load_directory(path: &Path) -> Result<SchoolDirectory> {
    let mut directory = SchoolDirectory::new();
    directory.load_from_file(path)?;
    if directory.classes().is_empty() {
        warn!("School directory has no classes");
    }
    Ok(directory)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
