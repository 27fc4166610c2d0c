//! Workout session lifecycle.
//!
//! A session is created when a mood is chosen, collects exercises as they
//! are performed and becomes terminal once ended.

use crate::{Error, Exercise, Mood, Result, WorkoutSession};
use chrono::{DateTime, Utc};
use uuid::Uuid;

impl WorkoutSession {
    /// Begin a new session
    pub fn start(user_id: Uuid, mood: Mood, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            mood,
            exercises: Vec::new(),
            started_at,
            ended_at: None,
            duration_minutes: 0,
            calories_burned: 0,
            completed: false,
            rating: None,
            notes: None,
        }
    }

    /// Append an exercise and add its calories to the running total
    pub fn add_exercise(&mut self, exercise: Exercise) -> Result<()> {
        if self.completed {
            return Err(Error::Session(format!(
                "cannot add '{}' to completed session {}",
                exercise.name, self.id
            )));
        }
        self.calories_burned += exercise.calories;
        self.exercises.push(exercise);
        Ok(())
    }

    /// Stamp the end time, derive the duration and mark complete
    pub fn end_workout(&mut self, ended_at: DateTime<Utc>) -> Result<()> {
        if self.completed {
            return Err(Error::Session(format!("session {} already ended", self.id)));
        }
        let minutes = (ended_at - self.started_at).num_minutes().max(0);
        self.duration_minutes = u32::try_from(minutes).unwrap_or(u32::MAX);
        self.ended_at = Some(ended_at);
        self.completed = true;
        tracing::info!(
            "Session {} ended: {} exercises, {} min, {} kcal",
            self.id,
            self.exercises.len(),
            self.duration_minutes,
            self.calories_burned
        );
        Ok(())
    }

    /// Rate the session from 1 to 5
    pub fn set_rating(&mut self, rating: u8) -> Result<()> {
        if !(1..=5).contains(&rating) {
            return Err(Error::Session(format!("rating {} outside 1..=5", rating)));
        }
        self.rating = Some(rating);
        Ok(())
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn calories_burned(&self) -> u32 {
        self.calories_burned
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn rating(&self) -> Option<u8> {
        self.rating
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_exercise;
    use chrono::{Duration, TimeZone};

    fn start_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 7, 30, 0).unwrap()
    }

    #[test]
    fn test_add_exercise_accumulates_calories() {
        let mut session = WorkoutSession::start(Uuid::new_v4(), Mood::Happy, start_time());
        let mut a = default_exercise();
        a.calories = 40;
        let mut b = default_exercise();
        b.calories = 75;

        session.add_exercise(a).unwrap();
        session.add_exercise(b).unwrap();

        assert_eq!(session.exercises().len(), 2);
        assert_eq!(session.calories_burned(), 115);
    }

    #[test]
    fn test_end_workout_derives_duration() {
        let mut session = WorkoutSession::start(Uuid::new_v4(), Mood::Stressed, start_time());
        session
            .end_workout(start_time() + Duration::seconds(17 * 60 + 40))
            .unwrap();

        assert!(session.is_completed());
        assert_eq!(session.duration_minutes(), 17);
        assert!(session.ended_at().is_some());
    }

    #[test]
    fn test_completed_session_is_terminal() {
        let mut session = WorkoutSession::start(Uuid::new_v4(), Mood::Neutral, start_time());
        session.end_workout(start_time()).unwrap();

        assert!(matches!(
            session.add_exercise(default_exercise()),
            Err(Error::Session(_))
        ));
        assert!(matches!(
            session.end_workout(start_time() + Duration::minutes(5)),
            Err(Error::Session(_))
        ));
        assert_eq!(session.duration_minutes(), 0);
        assert!(session.exercises().is_empty());
    }

    #[test]
    fn test_rating_bounds() {
        let mut session = WorkoutSession::start(Uuid::new_v4(), Mood::Happy, start_time());
        assert!(session.set_rating(0).is_err());
        assert!(session.set_rating(6).is_err());
        session.set_rating(4).unwrap();
        assert_eq!(session.rating(), Some(4));
    }
}
