//! Progress engine over an injected store.
//!
//! Each operation loads the records it needs, mutates them and saves them
//! back whole. Missing records are created and persisted on first use.

use crate::store::{Store, PROGRESS_KEY, USER_KEY};
use crate::{Error, Result, User, UserProgress, WorkoutSession};
use chrono::{DateTime, TimeZone};

/// User and progress after an update
#[derive(Clone, Debug)]
pub struct ProgressSnapshot {
    pub user: User,
    pub progress: UserProgress,
}

/// Streak and statistics bookkeeping for the single local user
pub struct ProgressTracker<S: Store> {
    store: S,
}

impl<S: Store> ProgressTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the user, creating and saving a fresh one if none is stored
    pub fn load_user(&self) -> Result<User> {
        match self.store.load::<User>(USER_KEY)? {
            Some(user) => Ok(user),
            None => {
                let user = User::default();
                self.store.save(USER_KEY, &user)?;
                tracing::info!("Created new user {}", user.id);
                Ok(user)
            }
        }
    }

    /// Load aggregate progress, creating and saving an empty record if needed
    pub fn load_progress(&self) -> Result<UserProgress> {
        match self.store.load::<UserProgress>(PROGRESS_KEY)? {
            Some(progress) => Ok(progress),
            None => {
                let progress = UserProgress::default();
                self.store.save(PROGRESS_KEY, &progress)?;
                Ok(progress)
            }
        }
    }

    /// Load the user, modify it, and save it back
    pub fn update_user<F>(&self, f: F) -> Result<User>
    where
        F: FnOnce(&mut User),
    {
        let mut user = self.load_user()?;
        f(&mut user);
        self.store.save(USER_KEY, &user)?;
        Ok(user)
    }

    pub fn record_app_open(&self) -> Result<User> {
        self.update_user(User::record_open)
    }

    /// Apply the daily decay check, saving only if the streak was reset
    pub fn refresh_streak<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<User> {
        let mut user = self.load_user()?;
        if user.check_streak(now) {
            self.store.save(USER_KEY, &user)?;
        }
        Ok(user)
    }

    /// Fold a completed session into the user's streak and statistics
    pub fn record_completion<Tz: TimeZone>(
        &self,
        session: &WorkoutSession,
        now: DateTime<Tz>,
    ) -> Result<ProgressSnapshot> {
        if !session.is_completed() {
            return Err(Error::Session(format!(
                "session {} has not been ended",
                session.id
            )));
        }

        let mut user = self.load_user()?;
        let mut progress = self.load_progress()?;

        user.check_streak(&now);
        user.add_workout(session.duration_minutes(), now);
        progress.record_workout(session);

        self.store.save(USER_KEY, &user)?;
        self.store.save(PROGRESS_KEY, &progress)?;

        tracing::info!(
            "Recorded workout for {}: streak {}, {} workouts total",
            user.name,
            user.current_streak(),
            progress.total_workouts
        );

        Ok(ProgressSnapshot { user, progress })
    }
}
