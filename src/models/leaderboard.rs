// SPDX-License-Identifier: MIT

//! Leaderboard entries: computed per request, never persisted.

use serde::Serialize;

/// One ranked row: a stats aggregate joined with the user's identity.
///
/// Carries both sort keys (`xp` and `current_streak`) so a client can
/// re-sort without a second fetch.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based position in the sorted sequence
    pub rank: u32,
    pub user_id: String,
    /// "Unknown" when the identity record is missing
    pub name: String,
    /// Empty when the identity record is missing
    pub email: String,
    pub xp: u64,
    pub level: u32,
    pub current_streak: u32,
    pub badges: Vec<String>,
    pub is_current_user: bool,
}
