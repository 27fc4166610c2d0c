//! Append-only JSONL log of finished workouts.
//!
//! One session per line. Writers hold an exclusive `fs2` lock for the
//! duration of a single append, readers a shared one. Draining copies the
//! log to an archive and truncates it in place under the same exclusive lock,
//! so the live file is never renamed out from under a waiting writer.

use crate::{Error, Result, WorkoutSession};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Destination for finished sessions
pub trait SessionSink {
    fn append(&mut self, session: &WorkoutSession) -> Result<()>;
}

/// Session log backed by a JSON Lines file
#[derive(Clone, Debug)]
pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Archive location for a drain performed at `at`
    ///
    /// `sessions.wal` becomes `sessions.wal.<UTC timestamp>.processed`.
    pub fn archive_path(&self, at: DateTime<Utc>) -> PathBuf {
        let stamp = at.format("%Y%m%dT%H%M%S%.6fZ").to_string().replace('.', "");
        self.path.with_extension(format!("wal.{}.processed", stamp))
    }

    /// All readable sessions in the log; an absent log reads as empty
    pub fn read_all(&self) -> Result<Vec<WorkoutSession>> {
        read_sessions(&self.path)
    }

    /// Hand every logged session to `consume`, then archive and empty the log
    ///
    /// The exclusive lock is held from the read until the log is truncated,
    /// so no append can land between them. If `consume` fails, or the log
    /// holds no readable session, the log is left untouched. Returns how many
    /// sessions were drained.
    pub fn drain<F>(&self, archive_to: &Path, consume: F) -> Result<usize>
    where
        F: FnOnce(&[WorkoutSession]) -> Result<()>,
    {
        let mut file = match OpenOptions::new().read(true).write(true).open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        file.lock_exclusive()?;
        let drained = drain_locked(&mut file, archive_to, consume);
        file.unlock()?;
        drained
    }
}

fn drain_locked<F>(file: &mut File, archive_to: &Path, consume: F) -> Result<usize>
where
    F: FnOnce(&[WorkoutSession]) -> Result<()>,
{
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let sessions = parse_sessions(&contents);
    if sessions.is_empty() {
        return Ok(0);
    }

    // Claim the archive before the consumer runs so a name clash fails early
    let mut archive = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(archive_to)?;
    if let Err(e) = consume(&sessions) {
        drop(archive);
        std::fs::remove_file(archive_to)?;
        return Err(e);
    }

    // Raw contents, unreadable lines included, for manual recovery
    archive.write_all(contents.as_bytes())?;
    archive.sync_all()?;

    file.set_len(0)?;
    file.sync_all()?;

    tracing::debug!("Drained {} sessions into {:?}", sessions.len(), archive_to);
    Ok(sessions.len())
}

impl SessionSink for SessionLog {
    fn append(&mut self, session: &WorkoutSession) -> Result<()> {
        if !session.is_completed() {
            return Err(Error::Session(format!(
                "refusing to log unfinished session {}",
                session.id
            )));
        }

        let mut line = serde_json::to_vec(session)?;
        line.push(b'\n');

        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;
        let written = file.write_all(&line).and_then(|_| file.sync_data());
        file.unlock()?;
        written?;

        tracing::debug!("Logged session {} ({} bytes)", session.id, line.len());
        Ok(())
    }
}

/// Parse every session in `path`, skipping lines that are not valid sessions
pub fn read_sessions(path: &Path) -> Result<Vec<WorkoutSession>> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut contents = String::new();
    file.lock_shared()?;
    let read = file.read_to_string(&mut contents);
    file.unlock()?;
    read?;

    let sessions = parse_sessions(&contents);
    tracing::debug!("Read {} sessions from {:?}", sessions.len(), path);
    Ok(sessions)
}

fn parse_sessions(contents: &str) -> Vec<WorkoutSession> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(idx, line)| match serde_json::from_str(line) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("Skipping unreadable session on line {}: {}", idx + 1, e);
                None
            }
        })
        .collect()
}
