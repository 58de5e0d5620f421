// SPDX-License-Identifier: MIT

//! Badge catalog and qualification rules.
//!
//! The catalog is process-wide constant configuration: ten badges, each with
//! a typed qualification rule and a one-time XP reward. A badge, once in a
//! user's set, is never re-evaluated or revoked.

use serde::Serialize;

use crate::models::UserStats;

/// Typed qualification rule, evaluated against a stats snapshot.
///
/// `FriendCount` is the one rule that needs data outside the snapshot; the
/// caller supplies the accepted-friend count separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeRule {
    FlashcardsStudied(u32),
    CurrentStreak(u32),
    AssignmentsCompleted(u32),
    QuizzesTaken(u32),
    Level(u32),
    TotalXp(u64),
    FriendCount(usize),
}

impl BadgeRule {
    pub fn is_met(&self, stats: &UserStats, friend_count: usize) -> bool {
        match *self {
            BadgeRule::FlashcardsStudied(n) => stats.flashcards_studied >= n,
            BadgeRule::CurrentStreak(n) => stats.current_streak >= n,
            BadgeRule::AssignmentsCompleted(n) => stats.assignments_completed >= n,
            BadgeRule::QuizzesTaken(n) => stats.quizzes_taken >= n,
            BadgeRule::Level(n) => stats.level >= n,
            BadgeRule::TotalXp(n) => stats.xp >= n,
            BadgeRule::FriendCount(n) => friend_count >= n,
        }
    }
}

/// One catalog entry. The `requirement` text is display-only; qualification
/// goes through `rule`.
#[derive(Debug, Clone, Serialize)]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub requirement: &'static str,
    pub xp_reward: u32,
    #[serde(skip_serializing)]
    pub rule: BadgeRule,
}

pub static CATALOG: [Badge; 10] = [
    Badge {
        id: "first_flashcard",
        name: "First Steps",
        description: "Study your first flashcard set",
        icon: "🎯",
        requirement: "Study 1 flashcard set",
        xp_reward: 50,
        rule: BadgeRule::FlashcardsStudied(1),
    },
    Badge {
        id: "flashcard_master",
        name: "Flashcard Master",
        description: "Study 50 flashcard sets",
        icon: "🧠",
        requirement: "Study 50 flashcard sets",
        xp_reward: 500,
        rule: BadgeRule::FlashcardsStudied(50),
    },
    Badge {
        id: "week_streak",
        name: "Week Warrior",
        description: "Maintain a 7-day streak",
        icon: "🔥",
        requirement: "Reach a 7-day streak",
        xp_reward: 200,
        rule: BadgeRule::CurrentStreak(7),
    },
    Badge {
        id: "month_streak",
        name: "Monthly Champion",
        description: "Maintain a 30-day streak",
        icon: "👑",
        requirement: "Reach a 30-day streak",
        xp_reward: 1000,
        rule: BadgeRule::CurrentStreak(30),
    },
    Badge {
        id: "social_butterfly",
        name: "Social Butterfly",
        description: "Add 5 friends",
        icon: "🦋",
        requirement: "Have 5 accepted friends",
        xp_reward: 150,
        rule: BadgeRule::FriendCount(5),
    },
    Badge {
        id: "early_bird",
        name: "Early Bird",
        description: "Complete 10 assignments on time",
        icon: "🐦",
        requirement: "Complete 10 assignments",
        xp_reward: 300,
        rule: BadgeRule::AssignmentsCompleted(10),
    },
    Badge {
        id: "quiz_whiz",
        name: "Quiz Whiz",
        description: "Complete 20 quizzes",
        icon: "⚡",
        requirement: "Complete 20 quizzes",
        xp_reward: 400,
        rule: BadgeRule::QuizzesTaken(20),
    },
    Badge {
        id: "level_10",
        name: "Rising Star",
        description: "Reach level 10",
        icon: "⭐",
        requirement: "Reach level 10",
        xp_reward: 250,
        rule: BadgeRule::Level(10),
    },
    Badge {
        id: "level_25",
        name: "Superstar",
        description: "Reach level 25",
        icon: "🌟",
        requirement: "Reach level 25",
        xp_reward: 750,
        rule: BadgeRule::Level(25),
    },
    Badge {
        id: "xp_1000",
        name: "XP Hunter",
        description: "Earn 1,000 total XP",
        icon: "💎",
        requirement: "Earn 1,000 XP",
        xp_reward: 100,
        rule: BadgeRule::TotalXp(1000),
    },
];

/// Look up a catalog entry by ID.
pub fn find(badge_id: &str) -> Option<&'static Badge> {
    CATALOG.iter().find(|b| b.id == badge_id)
}

/// Badges the user newly qualifies for: rule met and not already held,
/// in catalog order.
pub fn qualifying(stats: &UserStats, friend_count: usize) -> Vec<&'static Badge> {
    CATALOG
        .iter()
        .filter(|b| !stats.has_badge(b.id) && b.rule.is_met(stats, friend_count))
        .collect()
}
