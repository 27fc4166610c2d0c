//! Core domain types for the MoodFit system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Moods, difficulty levels and exercise categories
//! - Exercises and the catalog that owns them
//! - Workout sessions
//! - The persistent user record and aggregate progress

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Mood
// ============================================================================

/// Self-reported mood at workout-selection time
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    Neutral,
    Frustrated,
    Stressed,
}

/// Display label and accent color per mood
const MOOD_STYLES: [(Mood, &str, &str); 4] = [
    (Mood::Happy, "Happy", "#FFC107"),
    (Mood::Neutral, "Neutral", "#90A4AE"),
    (Mood::Frustrated, "Frustrated", "#E53935"),
    (Mood::Stressed, "Stressed", "#7E57C2"),
];

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Happy, Mood::Neutral, Mood::Frustrated, Mood::Stressed];

    fn style(self) -> (&'static str, &'static str) {
        MOOD_STYLES
            .iter()
            .find(|(mood, _, _)| *mood == self)
            .map(|(_, label, color)| (*label, *color))
            .unwrap_or(("Neutral", "#90A4AE"))
    }

    pub fn label(self) -> &'static str {
        self.style().0
    }

    /// Accent color as a `#RRGGBB` hex string
    pub fn accent_color(self) -> &'static str {
        self.style().1
    }

    /// Parse a mood name (case-insensitive, matched against labels)
    pub fn parse(name: &str) -> Option<Mood> {
        let wanted = name.trim();
        Mood::ALL
            .into_iter()
            .find(|mood| mood.label().eq_ignore_ascii_case(wanted))
    }

    /// Parse a mood name, falling back to `Neutral` for anything unknown
    pub fn from_name(name: &str) -> Mood {
        Mood::parse(name).unwrap_or_else(|| {
            tracing::warn!("Unknown mood '{}', falling back to Neutral", name);
            Mood::Neutral
        })
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Difficulty and Category
// ============================================================================

/// Exercise difficulty, ordered from easiest to hardest
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Numeric level and display label per difficulty
const DIFFICULTY_LEVELS: [(Difficulty, i32, &str); 3] = [
    (Difficulty::Beginner, 0, "Beginner"),
    (Difficulty::Intermediate, 1, "Intermediate"),
    (Difficulty::Advanced, 2, "Advanced"),
];

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    fn entry(self) -> (i32, &'static str) {
        DIFFICULTY_LEVELS
            .iter()
            .find(|(d, _, _)| *d == self)
            .map(|(_, level, label)| (*level, *label))
            .unwrap_or((0, "Beginner"))
    }

    /// Numeric level (0 = Beginner) used for distance arithmetic
    pub fn level(self) -> i32 {
        self.entry().0
    }

    pub fn label(self) -> &'static str {
        self.entry().1
    }

    pub fn parse(name: &str) -> Option<Difficulty> {
        let wanted = name.trim();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(wanted))
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Beginner
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Exercise category
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Cardio,
    Strength,
    Flexibility,
    Breathing,
    Yoga,
    Hiit,
}

const CATEGORY_LABELS: [(Category, &str); 6] = [
    (Category::Cardio, "Cardio"),
    (Category::Strength, "Strength"),
    (Category::Flexibility, "Flexibility"),
    (Category::Breathing, "Breathing"),
    (Category::Yoga, "Yoga"),
    (Category::Hiit, "HIIT"),
];

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Cardio,
        Category::Strength,
        Category::Flexibility,
        Category::Breathing,
        Category::Yoga,
        Category::Hiit,
    ];

    pub fn label(self) -> &'static str {
        CATEGORY_LABELS
            .iter()
            .find(|(c, _)| *c == self)
            .map(|(_, label)| *label)
            .unwrap_or("Cardio")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Exercise and Catalog
// ============================================================================

/// A single catalog exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub name: String,
    pub description: String,
    pub instructions: String,
    pub difficulty: Difficulty,
    pub category: Category,
    pub duration_minutes: u32,
    pub calories: u32,
    pub media_ref: Option<String>,
    pub moods: Vec<Mood>,
}

/// The static list of all known exercises
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub exercises: Vec<Exercise>,
}

// ============================================================================
// Session
// ============================================================================

/// A single workout attempt
///
/// The exercise list is append-only and calories track it; both are only
/// reachable through the lifecycle methods in `session.rs`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mood: Mood,
    pub(crate) exercises: Vec<Exercise>,
    pub started_at: DateTime<Utc>,
    pub(crate) ended_at: Option<DateTime<Utc>>,
    pub(crate) duration_minutes: u32,
    pub(crate) calories_burned: u32,
    pub(crate) completed: bool,
    pub(crate) rating: Option<u8>,
    pub notes: Option<String>,
}

// ============================================================================
// User and Progress
// ============================================================================

/// The persistent user record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub(crate) current_streak: u32,
    pub(crate) best_streak: u32,
    pub total_workouts: u32,
    pub total_minutes: u32,
    pub last_workout_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub preferred_difficulty: Difficulty,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub open_count: u32,
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: "Athlete".into(),
            current_streak: 0,
            best_streak: 0,
            total_workouts: 0,
            total_minutes: 0,
            last_workout_at: None,
            preferred_difficulty: Difficulty::default(),
            created_at: Utc::now(),
            open_count: 0,
        }
    }
}

/// Lifetime aggregate statistics
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct UserProgress {
    pub total_workouts: u32,
    pub total_minutes: u32,
    pub total_calories: u32,
    #[serde(default)]
    pub mood_counts: HashMap<Mood, u32>,
    #[serde(default)]
    pub category_counts: HashMap<Category, u32>,
    #[serde(default)]
    pub workout_dates: Vec<DateTime<Utc>>,
}
