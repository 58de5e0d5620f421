// SPDX-License-Identifier: MIT

//! Friendship edges.
//!
//! A friendship is stored as one directed record per unordered user pair:
//! `user_id` sent the request, `friend_id` received it. The document ID is
//! derived from the unordered pair, so "at most one record per pair" holds
//! structurally. Rejection and removal delete the record; no history is kept.

use serde::{Deserialize, Serialize};

/// Edge state. `Rejected` exists on the wire for API symmetry but is never
/// stored: rejecting deletes the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Friendship record (document ID = `pair_key(user_id, friend_id)`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Friendship {
    /// Requester
    pub user_id: String,
    /// Recipient
    pub friend_id: String,
    pub status: FriendshipStatus,
    pub created_at: String,
}

/// Document ID for the unordered pair `{a, b}`.
///
/// User IDs are percent-encoded, which encodes `:` itself, so the `:`
/// separator stays unambiguous.
pub fn pair_key(a: &str, b: &str) -> String {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    format!("{}:{}", urlencoding::encode(lo), urlencoding::encode(hi))
}

impl Friendship {
    /// New pending request from `user_id` to `friend_id`.
    pub fn pending(user_id: &str, friend_id: &str, now: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            friend_id: friend_id.to_string(),
            status: FriendshipStatus::Pending,
            created_at: now.to_string(),
        }
    }

    /// Whether this edge touches `user_id` on either end.
    pub fn involves(&self, user_id: &str) -> bool {
        self.user_id == user_id || self.friend_id == user_id
    }

    /// The other party of the edge, from `user_id`'s point of view.
    pub fn counterpart_of(&self, user_id: &str) -> &str {
        if self.user_id == user_id {
            &self.friend_id
        } else {
            &self.user_id
        }
    }
}
