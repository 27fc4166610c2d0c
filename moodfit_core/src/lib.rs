#![forbid(unsafe_code)]

//! Core domain model and business logic for MoodFit.
//!
//! This crate provides:
//! - Domain types (moods, exercises, sessions, user records)
//! - The exercise catalog
//! - Mood-based and weighted-random recommendation
//! - The workout countdown timer
//! - Streak and progress accounting
//! - Persistence (key/value store, session log, CSV rollup)

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod recommend;
pub mod timer;
pub mod session;
pub mod streak;
pub mod progress;
pub mod store;
pub mod tracker;
pub mod session_log;
pub mod csv_rollup;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog, gif_name};
pub use config::Config;
pub use recommend::{
    filter_exercises_by_difficulty, generate_mood_specific_exercises, recommend_for_mood,
    select_random_exercise, with_fallbacks,
};
pub use timer::{format_mmss, Clock, ManualClock, SystemClock, TimerEvent, TimerState, WorkoutTimer};
pub use store::{JsonFileStore, Store};
pub use tracker::{ProgressSnapshot, ProgressTracker};
pub use session_log::{SessionLog, SessionSink};
