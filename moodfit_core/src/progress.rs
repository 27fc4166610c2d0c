//! Aggregate lifetime statistics.

use crate::{Category, Mood, UserProgress, WorkoutSession};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

impl UserProgress {
    /// Fold a completed session into the aggregates
    ///
    /// Each distinct category in the session counts once.
    pub fn record_workout(&mut self, session: &WorkoutSession) {
        self.total_workouts += 1;
        self.total_minutes += session.duration_minutes();
        self.total_calories += session.calories_burned();

        *self.mood_counts.entry(session.mood).or_insert(0) += 1;

        let categories: HashSet<Category> =
            session.exercises().iter().map(|e| e.category).collect();
        for category in categories {
            *self.category_counts.entry(category).or_insert(0) += 1;
        }

        let completed_at = session.ended_at().unwrap_or(session.started_at);
        self.workout_dates.push(completed_at);
        self.workout_dates.sort();

        tracing::debug!(
            "Recorded session {}: {} workouts, {} kcal total",
            session.id,
            self.total_workouts,
            self.total_calories
        );
    }

    /// Workouts completed in the trailing 7×24h window ending at `now`
    pub fn workouts_this_week(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - Duration::days(7);
        self.workout_dates
            .iter()
            .filter(|d| **d > cutoff && **d <= now)
            .count()
    }

    /// Mood with the most recorded workouts
    pub fn favorite_mood(&self) -> Option<Mood> {
        Mood::ALL
            .into_iter()
            .filter_map(|m| self.mood_counts.get(&m).map(|n| (m, *n)))
            .filter(|(_, n)| *n > 0)
            .max_by_key(|(_, n)| *n)
            .map(|(m, _)| m)
    }
}
