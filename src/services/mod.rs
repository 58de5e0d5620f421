// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod friends;
pub mod gamification;
pub mod leaderboard;

pub use friends::FriendService;
pub use gamification::GamificationService;
pub use leaderboard::LeaderboardService;
