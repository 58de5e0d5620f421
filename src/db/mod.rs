// SPDX-License-Identifier: MIT

//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Per-user progress aggregates (keyed by user ID)
    pub const USER_STATS: &str = "user_stats";
    /// Append-only XP award log
    pub const XP_ACTIVITIES: &str = "xp_activities";
    /// One record per unordered user pair (keyed by pair key)
    pub const FRIENDSHIPS: &str = "friendships";
}
