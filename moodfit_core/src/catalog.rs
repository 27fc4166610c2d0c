//! Default exercise catalog and media slug helpers.
//!
//! This module provides the built-in exercises for the system.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Slug returned when a name has no usable characters
pub const DEFAULT_GIF_NAME: &str = "gif_default";

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference. This function is retained for testing and custom catalogs.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

/// Derive a media reference slug from an exercise name
///
/// Lower-cases, drops everything outside `[a-z0-9\s]`, joins whitespace runs
/// with a single underscore and prefixes `gif_`. Names with nothing left
/// after stripping map to [`DEFAULT_GIF_NAME`].
pub fn gif_name(name: &str) -> String {
    let cleaned: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_ascii_whitespace())
        .collect();

    let slug = cleaned
        .split_ascii_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if slug.is_empty() {
        return DEFAULT_GIF_NAME.to_string();
    }
    format!("gif_{}", slug)
}

/// Exercise handed out when there is nothing else to choose from
pub fn default_exercise() -> Exercise {
    exercise(
        "Jumping Jacks",
        "A classic full-body warm-up.",
        "Jump while spreading arms and legs, then return to standing. Keep a steady rhythm.",
        Difficulty::Beginner,
        Category::Cardio,
        5,
        40,
        &Mood::ALL,
    )
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn exercise(
    name: &str,
    description: &str,
    instructions: &str,
    difficulty: Difficulty,
    category: Category,
    duration_minutes: u32,
    calories: u32,
    moods: &[Mood],
) -> Exercise {
    Exercise {
        name: name.into(),
        description: description.into(),
        instructions: instructions.into(),
        difficulty,
        category,
        duration_minutes,
        calories,
        media_ref: Some(gif_name(name)),
        moods: moods.to_vec(),
    }
}

fn build_default_catalog_internal() -> Catalog {
    use Category::*;
    use Difficulty::*;
    use Mood::*;

    let exercises = vec![
        // ====================================================================
        // Beginner
        // ====================================================================
        default_exercise(),
        exercise(
            "March in Place",
            "Low-impact cardio to get the blood moving.",
            "Lift knees alternately to hip height while swinging the arms.",
            Beginner,
            Cardio,
            5,
            30,
            &[Neutral, Stressed],
        ),
        exercise(
            "Wall Push-Ups",
            "Upper-body strength without floor work.",
            "Hands on a wall at shoulder height, lower the chest toward the wall and press back.",
            Beginner,
            Strength,
            5,
            25,
            &[Neutral, Frustrated],
        ),
        exercise(
            "Child's Pose",
            "Restorative yoga pose for the back and hips.",
            "Kneel, sit back on the heels and fold forward with arms extended. Breathe slowly.",
            Beginner,
            Yoga,
            5,
            10,
            &[Stressed, Neutral],
        ),
        exercise(
            "Box Breathing",
            "Four-count breathing to calm the nervous system.",
            "Inhale for 4, hold for 4, exhale for 4, hold for 4. Repeat.",
            Beginner,
            Breathing,
            5,
            5,
            &[Stressed, Frustrated],
        ),
        exercise(
            "Seated Hamstring Stretch",
            "Gentle flexibility work for the back of the legs.",
            "Sit with one leg extended and reach toward the toes, keeping the back long.",
            Beginner,
            Flexibility,
            5,
            10,
            &[Stressed, Neutral],
        ),
        // ====================================================================
        // Intermediate
        // ====================================================================
        exercise(
            "High Knees",
            "Fast-paced cardio drill.",
            "Run in place driving the knees above hip height, pumping the arms.",
            Intermediate,
            Hiit,
            10,
            100,
            &[Happy, Frustrated],
        ),
        exercise(
            "Bodyweight Squats",
            "Lower-body strength staple.",
            "Feet shoulder-width apart, sit the hips back and down, then drive up through the heels.",
            Intermediate,
            Strength,
            10,
            70,
            &[Happy, Neutral],
        ),
        exercise(
            "Shadow Boxing",
            "Punch out the tension.",
            "Stay light on your feet and throw jab-cross combinations at an imaginary target.",
            Intermediate,
            Cardio,
            10,
            90,
            &[Frustrated, Happy],
        ),
        exercise(
            "Sun Salutation",
            "Flowing yoga sequence.",
            "Move through mountain pose, forward fold, plank, cobra and downward dog with the breath.",
            Intermediate,
            Yoga,
            10,
            45,
            &[Stressed, Happy],
        ),
        exercise(
            "4-7-8 Breathing",
            "Extended exhale breathing pattern.",
            "Inhale for 4, hold for 7, exhale slowly for 8.",
            Intermediate,
            Breathing,
            5,
            5,
            &[Stressed],
        ),
        // ====================================================================
        // Advanced
        // ====================================================================
        exercise(
            "Burpees",
            "Full-body high-intensity movement.",
            "Squat, kick back to plank, push-up, jump the feet in and explode upward.",
            Advanced,
            Hiit,
            10,
            150,
            &[Frustrated, Happy],
        ),
        exercise(
            "Mountain Climbers",
            "Core and cardio in one.",
            "From a high plank, drive the knees toward the chest alternately at speed.",
            Advanced,
            Hiit,
            10,
            120,
            &[Frustrated, Happy],
        ),
        exercise(
            "Pistol Squats",
            "Single-leg strength and balance.",
            "Stand on one leg, extend the other forward and squat down under control.",
            Advanced,
            Strength,
            10,
            90,
            &[Happy, Neutral],
        ),
        exercise(
            "Crow Pose",
            "Arm balance for focus and strength.",
            "Squat, plant the hands, rest the knees on the upper arms and lean forward until the feet lift.",
            Advanced,
            Yoga,
            10,
            50,
            &[Stressed, Neutral],
        ),
    ];

    Catalog { exercises }
}

impl Catalog {
    /// All exercises at the given difficulty
    pub fn by_difficulty(&self, difficulty: Difficulty) -> impl Iterator<Item = &Exercise> {
        self.exercises
            .iter()
            .filter(move |e| e.difficulty == difficulty)
    }

    /// All exercises tagged as suiting the given mood
    pub fn by_mood(&self, mood: Mood) -> impl Iterator<Item = &Exercise> {
        self.exercises.iter().filter(move |e| e.moods.contains(&mood))
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for exercise in &self.exercises {
            if exercise.name.trim().is_empty() {
                errors.push("Exercise has empty name".to_string());
                continue;
            }
            if !seen.insert(exercise.name.as_str()) {
                errors.push(format!("Duplicate exercise '{}'", exercise.name));
            }
            if exercise.duration_minutes == 0 {
                errors.push(format!("Exercise '{}' has zero duration", exercise.name));
            }
            if exercise.moods.is_empty() {
                errors.push(format!("Exercise '{}' suits no mood", exercise.name));
            }
            if exercise.instructions.trim().is_empty() {
                errors.push(format!("Exercise '{}' has no instructions", exercise.name));
            }
        }

        for difficulty in Difficulty::ALL {
            if self.by_difficulty(difficulty).next().is_none() {
                errors.push(format!("Catalog has no {} exercises", difficulty));
            }
        }

        errors
    }
}
