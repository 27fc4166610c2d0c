//! Daily streak accounting on the user record.
//!
//! Streaks count consecutive calendar days with at least one completed
//! workout. Days are compared in the caller's timezone (normally `Local`),
//! not as rolling 24h windows, so 23:00 and 01:00 the next night are two days.

use crate::User;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Calendar day of a UTC instant as seen in `tz`
fn local_day<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    at.with_timezone(tz).date_naive()
}

impl User {
    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    /// Extend the streak by one day, keeping `best >= current`
    pub fn increment_streak(&mut self) {
        self.current_streak += 1;
        self.best_streak = self.best_streak.max(self.current_streak);
    }

    pub fn reset_streak(&mut self) {
        self.current_streak = 0;
    }

    /// Whether the last workout fell on the same calendar day as `now`
    pub fn has_worked_out_today<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.last_workout_at
            .map(|last| local_day(last, &now.timezone()) == now.date_naive())
            .unwrap_or(false)
    }

    /// Record a completed workout
    ///
    /// The streak grows only for the first workout of a calendar day.
    pub fn add_workout<Tz: TimeZone>(&mut self, minutes: u32, now: DateTime<Tz>) {
        if !self.has_worked_out_today(&now) {
            self.increment_streak();
            tracing::info!(
                "Streak extended to {} (best {})",
                self.current_streak,
                self.best_streak
            );
        } else {
            tracing::debug!("Already worked out today, streak stays at {}", self.current_streak);
        }

        self.total_workouts += 1;
        self.total_minutes += minutes;
        self.last_workout_at = Some(now.with_timezone(&Utc));
    }

    /// Reset the streak if a calendar day was missed
    ///
    /// The streak survives while the last workout was today or yesterday.
    /// Returns true if the streak was reset.
    pub fn check_streak<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> bool {
        let Some(last) = self.last_workout_at else {
            return false;
        };
        if self.current_streak == 0 {
            return false;
        }

        let days_since = (now.date_naive() - local_day(last, &now.timezone())).num_days();
        if days_since > 1 {
            tracing::info!(
                "Last workout was {} days ago, resetting streak of {}",
                days_since,
                self.current_streak
            );
            self.reset_streak();
            return true;
        }
        false
    }

    /// Count one more app open
    pub fn record_open(&mut self) {
        self.open_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_first_workout_of_day_extends_streak() {
        let mut user = User::default();
        for _ in 0..6 {
            user.increment_streak();
        }
        user.last_workout_at = Some(at(9, 18));

        user.add_workout(20, at(10, 8));

        assert_eq!(user.current_streak(), 7);
        assert_eq!(user.best_streak(), 7);
        assert_eq!(user.total_workouts, 1);
        assert_eq!(user.total_minutes, 20);
    }

    #[test]
    fn test_best_streak_kept_when_higher() {
        let mut user = User::default();
        for _ in 0..10 {
            user.increment_streak();
        }
        user.reset_streak();
        for _ in 0..6 {
            user.increment_streak();
        }

        user.add_workout(15, at(3, 12));

        assert_eq!(user.current_streak(), 7);
        assert_eq!(user.best_streak(), 10);
    }

    #[test]
    fn test_same_day_workout_does_not_compound() {
        let mut user = User::default();
        user.add_workout(10, at(4, 7));
        user.add_workout(10, at(4, 21));

        assert_eq!(user.current_streak(), 1);
        assert_eq!(user.total_workouts, 2);
        assert_eq!(user.total_minutes, 20);
    }

    #[test]
    fn test_calendar_day_not_rolling_window() {
        let mut user = User::default();
        user.add_workout(10, at(4, 23));
        user.add_workout(10, at(4, 23) + Duration::hours(2));

        assert_eq!(user.current_streak(), 2);
    }

    #[test]
    fn test_day_boundary_uses_given_timezone() {
        // 20:00 and 22:00 UTC on the 4th land on the 4th and 5th in UTC+3
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        let mut user = User::default();
        user.add_workout(10, at(4, 20).with_timezone(&tz));
        user.add_workout(10, at(4, 22).with_timezone(&tz));

        assert_eq!(user.current_streak(), 2);
    }

    #[test]
    fn test_best_never_below_current() {
        let mut user = User::default();
        let ops = [true, true, false, true, true, true, false, false, true];
        for inc in ops {
            if inc {
                user.increment_streak();
            } else {
                user.reset_streak();
            }
            assert!(user.best_streak() >= user.current_streak());
        }
        assert_eq!(user.best_streak(), 3);
    }

    #[test]
    fn test_check_streak_keeps_yesterday() {
        let mut user = User::default();
        user.add_workout(10, at(10, 22));

        assert!(!user.check_streak(&at(11, 23)));
        assert_eq!(user.current_streak(), 1);
    }

    #[test]
    fn test_check_streak_resets_after_missed_day() {
        let mut user = User::default();
        user.add_workout(10, at(10, 22));
        user.add_workout(10, at(11, 6));

        assert!(user.check_streak(&at(13, 0)));
        assert_eq!(user.current_streak(), 0);
        assert_eq!(user.best_streak(), 2);
    }

    #[test]
    fn test_check_streak_without_history_is_noop() {
        let mut user = User::default();
        assert!(!user.check_streak(&at(1, 0)));
        assert_eq!(user.current_streak(), 0);
    }
}
