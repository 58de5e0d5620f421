// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod activity;
pub mod badge;
pub mod friendship;
pub mod leaderboard;
pub mod stats;
pub mod user;

pub use activity::{ActivityType, XpActivity};
pub use badge::Badge;
pub use friendship::{Friendship, FriendshipStatus};
pub use leaderboard::LeaderboardEntry;
pub use stats::{StatCounter, UserStats};
pub use user::User;
