// SPDX-License-Identifier: MIT

//! Per-user progress aggregate: XP, level, streaks, counters, badges.
//!
//! One document per user, created lazily on first access and never deleted.
//! `level` is always recomputed from `xp`, never incremented independently,
//! so the two fields cannot drift apart.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::time_utils::{date_key, day_before};

/// Progress record for a user.
///
/// Stored in the `user_stats` collection, keyed by user ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub user_id: String,
    /// Total XP earned (never decreases)
    #[serde(default)]
    pub xp: u64,
    /// Derived from `xp` on every award
    #[serde(default = "default_level")]
    pub level: u32,
    /// Consecutive UTC days with at least one XP award
    #[serde(default)]
    pub current_streak: u32,
    /// High-water mark of `current_streak`
    #[serde(default)]
    pub longest_streak: u32,
    /// UTC date ("YYYY-MM-DD") of the most recent award, empty if never
    #[serde(default)]
    pub last_activity_date: String,
    #[serde(default)]
    pub assignments_completed: u32,
    #[serde(default)]
    pub flashcards_studied: u32,
    #[serde(default)]
    pub quizzes_taken: u32,
    /// Earned badge IDs. Once present an ID is never removed.
    #[serde(default)]
    pub badges: HashSet<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

fn default_level() -> u32 {
    1
}

/// Counters bumped by specific external events and consumed only by badge
/// evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatCounter {
    AssignmentsCompleted,
    FlashcardsStudied,
    QuizzesTaken,
}

impl StatCounter {
    pub fn field_name(&self) -> &'static str {
        match self {
            StatCounter::AssignmentsCompleted => "assignments_completed",
            StatCounter::FlashcardsStudied => "flashcards_studied",
            StatCounter::QuizzesTaken => "quizzes_taken",
        }
    }
}

/// Level curve: `floor(sqrt(xp / 100)) + 1`.
///
/// Thresholds are spaced quadratically (level 2 at 100 XP, level 3 at 400,
/// level n at `100 * (n-1)^2`), giving fast early levels that slow down
/// as totals grow.
pub fn level_for_xp(xp: u64) -> u32 {
    (xp as f64 / 100.0).sqrt() as u32 + 1
}

/// Streak transition for an XP award happening on `today`.
///
/// Three distinct branches, in order:
/// - last activity was yesterday: the streak continues;
/// - last activity was today: already credited, streak unchanged
///   (repeat same-day awards still accrue XP without inflating the streak);
/// - anything else, including "never": streak restarts at 1.
pub fn next_streak(last_activity_date: &str, today: NaiveDate, current_streak: u32) -> u32 {
    if last_activity_date == date_key(day_before(today)) {
        current_streak + 1
    } else if last_activity_date == date_key(today) {
        current_streak
    } else {
        1
    }
}

impl UserStats {
    /// Fresh record for a user who has never earned XP.
    pub fn new(user_id: &str, now: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            xp: 0,
            level: 1,
            current_streak: 0,
            longest_streak: 0,
            last_activity_date: String::new(),
            assignments_completed: 0,
            flashcards_studied: 0,
            quizzes_taken: 0,
            badges: HashSet::new(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    /// Apply a single XP award to this snapshot.
    ///
    /// Updates XP, the derived level, the streak pair, and the activity
    /// date, all computed from the values before the call.
    pub fn apply_award(&mut self, amount: u32, today: NaiveDate) {
        let streak = next_streak(&self.last_activity_date, today, self.current_streak);
        self.current_streak = streak;
        self.longest_streak = self.longest_streak.max(streak);
        self.xp += u64::from(amount);
        self.level = level_for_xp(self.xp);
        self.last_activity_date = date_key(today);
    }

    /// Increment one named counter by 1.
    pub fn bump(&mut self, counter: StatCounter) {
        match counter {
            StatCounter::AssignmentsCompleted => self.assignments_completed += 1,
            StatCounter::FlashcardsStudied => self.flashcards_studied += 1,
            StatCounter::QuizzesTaken => self.quizzes_taken += 1,
        }
    }

    pub fn has_badge(&self, badge_id: &str) -> bool {
        self.badges.contains(badge_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_level_curve_fixed_points() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 2);
        assert_eq!(level_for_xp(399), 2);
        assert_eq!(level_for_xp(400), 3);
        assert_eq!(level_for_xp(900), 4);
        assert_eq!(level_for_xp(8100), 10);
    }

    #[test]
    fn test_streak_continues_from_yesterday() {
        let today = day(2024, 3, 15);
        assert_eq!(next_streak("2024-03-14", today, 3), 4);
    }

    #[test]
    fn test_streak_unchanged_same_day() {
        let today = day(2024, 3, 15);
        assert_eq!(next_streak("2024-03-15", today, 3), 3);
    }

    #[test]
    fn test_streak_resets_after_gap_or_first_activity() {
        let today = day(2024, 3, 15);
        assert_eq!(next_streak("2024-03-10", today, 9), 1);
        assert_eq!(next_streak("", today, 0), 1);
    }

    #[test]
    fn test_award_scenario_first_day() {
        let mut stats = UserStats::new("u1", "2024-03-15T00:00:00Z");
        stats.apply_award(10, day(2024, 3, 15));

        assert_eq!(stats.xp, 10);
        assert_eq!(stats.level, 1);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.last_activity_date, "2024-03-15");
    }

    #[test]
    fn test_award_scenario_next_day_continues() {
        let mut stats = UserStats::new("u1", "2024-03-15T00:00:00Z");
        stats.apply_award(10, day(2024, 3, 15));
        stats.apply_award(25, day(2024, 3, 16));

        assert_eq!(stats.xp, 35);
        assert_eq!(stats.level, 1);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.last_activity_date, "2024-03-16");
    }

    #[test]
    fn test_award_scenario_gap_resets_but_keeps_high_water_mark() {
        let mut stats = UserStats::new("u1", "2024-03-15T00:00:00Z");
        stats.apply_award(10, day(2024, 3, 15));
        stats.apply_award(25, day(2024, 3, 16));
        stats.apply_award(50, day(2024, 3, 21));

        assert_eq!(stats.xp, 85);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 2);
    }

    #[test]
    fn test_longest_streak_never_below_current() {
        let mut stats = UserStats::new("u1", "2024-03-01T00:00:00Z");
        let mut date = day(2024, 3, 1);
        for _ in 0..10 {
            stats.apply_award(5, date);
            assert!(stats.longest_streak >= stats.current_streak);
            date = date.succ_opt().unwrap();
        }
        assert_eq!(stats.current_streak, 10);
        assert_eq!(stats.longest_streak, 10);
    }

    #[test]
    fn test_same_day_awards_accrue_xp_without_streak_inflation() {
        let mut stats = UserStats::new("u1", "2024-03-15T00:00:00Z");
        let today = day(2024, 3, 15);
        stats.apply_award(10, today);
        stats.apply_award(25, today);

        assert_eq!(stats.xp, 35);
        assert_eq!(stats.current_streak, 1);
    }

    #[test]
    fn test_level_recomputed_across_awards() {
        let mut stats = UserStats::new("u1", "2024-03-15T00:00:00Z");
        stats.apply_award(350, day(2024, 3, 15));
        assert_eq!(stats.level, 2);
        stats.apply_award(50, day(2024, 3, 15));
        assert_eq!(stats.xp, 400);
        assert_eq!(stats.level, 3);
    }

    #[test]
    fn test_bump_touches_exactly_one_counter() {
        let mut stats = UserStats::new("u1", "2024-03-15T00:00:00Z");
        stats.bump(StatCounter::FlashcardsStudied);
        stats.bump(StatCounter::FlashcardsStudied);
        stats.bump(StatCounter::QuizzesTaken);

        assert_eq!(stats.flashcards_studied, 2);
        assert_eq!(stats.quizzes_taken, 1);
        assert_eq!(stats.assignments_completed, 0);
    }
}
