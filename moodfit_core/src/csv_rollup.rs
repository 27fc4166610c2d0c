//! Roll the session log up into a CSV history file.
//!
//! The CSV is fsynced before the log is emptied, and the drained lines are
//! kept in a timestamped archive so a bad rollup can be recovered by hand.

use crate::session_log::SessionLog;
use crate::{Result, WorkoutSession};
use chrono::{Duration, Utc};
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::Path;

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: String,
    mood: &'a str,
    started_at: String,
    ended_at: Option<String>,
    duration_minutes: u32,
    calories: u32,
    exercises: String,
    rating: Option<u8>,
    notes: Option<&'a str>,
}

impl<'a> CsvRow<'a> {
    fn new(session: &'a WorkoutSession) -> Self {
        let names: Vec<&str> = session.exercises().iter().map(|e| e.name.as_str()).collect();
        Self {
            id: session.id.to_string(),
            mood: session.mood.label(),
            started_at: session.started_at.to_rfc3339(),
            ended_at: session.ended_at().map(|t| t.to_rfc3339()),
            duration_minutes: session.duration_minutes(),
            calories: session.calories_burned(),
            exercises: names.join("; "),
            rating: session.rating(),
            notes: session.notes.as_deref(),
        }
    }
}

/// Append every logged session to `csv_path`, then archive and empty the log
///
/// Returns how many rows were written. A log with nothing readable in it is
/// left in place.
pub fn rollup_to_csv(log: &SessionLog, csv_path: &Path) -> Result<usize> {
    let mut at = Utc::now();
    let mut archive = log.archive_path(at);
    while archive.exists() {
        at = at + Duration::microseconds(1);
        archive = log.archive_path(at);
    }
    let count = log.drain(&archive, |sessions| append_rows(sessions, csv_path))?;

    if count == 0 {
        tracing::info!("Session log {:?} is empty, nothing to roll up", log.path());
    } else {
        tracing::info!(
            "Rolled {} sessions into {:?}, log archived as {:?}",
            count,
            csv_path,
            archive
        );
    }
    Ok(count)
}

fn append_rows(sessions: &[WorkoutSession], csv_path: &Path) -> Result<()> {
    if let Some(dir) = csv_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;
    let fresh = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(fresh)
        .from_writer(file);
    for session in sessions {
        writer.serialize(CsvRow::new(session))?;
    }
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;
    Ok(())
}

/// Delete archived logs (`*.processed`) in `dir`, returning how many went
pub fn remove_archived_logs(dir: &Path) -> Result<usize> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let mut removed = 0;
    for entry in entries {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "processed") {
            std::fs::remove_file(&path)?;
            tracing::debug!("Removed archived log {:?}", path);
            removed += 1;
        }
    }
    Ok(removed)
}
