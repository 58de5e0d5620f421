// SPDX-License-Identifier: MIT

//! Leaderboard aggregation.
//!
//! Joins stats aggregates with user identities and ranks them. The friends
//! scope covers the requester plus their accepted friends; the global scope
//! covers the top-N stats records by XP. A missing identity record renders
//! as "Unknown" rather than dropping the row or failing the request.

use crate::db::FirestoreDb;
use crate::error::Result;
use crate::models::{LeaderboardEntry, User, UserStats};

/// Default size of the global leaderboard.
pub const DEFAULT_LIMIT: u32 = 50;

#[derive(Clone)]
pub struct LeaderboardService {
    db: FirestoreDb,
}

impl LeaderboardService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Standings of `user_id` and their accepted friends, ranked by XP.
    ///
    /// Peers without a stats record (never earned XP) are omitted, matching
    /// what the stats lookup yields.
    pub async fn friends_leaderboard(&self, user_id: &str) -> Result<Vec<LeaderboardEntry>> {
        let edges = self.db.get_accepted_friendships(user_id).await?;

        let mut peer_ids: Vec<String> = vec![user_id.to_string()];
        peer_ids.extend(
            edges
                .iter()
                .map(|edge| edge.counterpart_of(user_id).to_string()),
        );

        let all_stats = self.db.get_stats_for_users(&peer_ids).await?;
        let rows = self.join_identities(all_stats).await;

        Ok(rank_entries(rows, user_id))
    }

    /// Top-`limit` standings across all users, ranked by XP.
    pub async fn global_leaderboard(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<LeaderboardEntry>> {
        let top_stats = self.db.get_top_stats(limit).await?;
        let rows = self.join_identities(top_stats).await;

        Ok(rank_entries(rows, user_id))
    }

    /// Fetch the identity record for each stats row.
    ///
    /// A failed or empty lookup yields `None` for that row only; one bad
    /// join must not drop the whole leaderboard.
    async fn join_identities(&self, all_stats: Vec<UserStats>) -> Vec<(UserStats, Option<User>)> {
        let mut rows = Vec::with_capacity(all_stats.len());
        for stats in all_stats {
            let user = match self.db.get_user(&stats.user_id).await {
                Ok(user) => user,
                Err(e) => {
                    tracing::warn!(user_id = %stats.user_id, error = %e, "Identity lookup failed");
                    None
                }
            };
            rows.push((stats, user));
        }
        rows
    }
}

/// Sort rows by XP descending (stable, ties keep input order), assign
/// 1-based ranks, and flag the requesting user.
pub fn rank_entries(
    mut rows: Vec<(UserStats, Option<User>)>,
    current_user: &str,
) -> Vec<LeaderboardEntry> {
    rows.sort_by(|a, b| b.0.xp.cmp(&a.0.xp));

    rows.into_iter()
        .enumerate()
        .map(|(index, (stats, user))| {
            let mut badges: Vec<String> = stats.badges.iter().cloned().collect();
            badges.sort_unstable();

            LeaderboardEntry {
                rank: index as u32 + 1,
                is_current_user: stats.user_id == current_user,
                name: user
                    .as_ref()
                    .and_then(|u| u.name.clone())
                    .unwrap_or_else(|| "Unknown".to_string()),
                email: user.map(|u| u.email).unwrap_or_default(),
                user_id: stats.user_id,
                xp: stats.xp,
                level: stats.level,
                current_streak: stats.current_streak,
                badges,
            }
        })
        .collect()
}

/// The requester's 1-based rank, or `len + 1` when they fall outside the
/// visible sequence (just past the list, never "no rank").
pub fn my_rank(entries: &[LeaderboardEntry]) -> u32 {
    entries
        .iter()
        .find(|e| e.is_current_user)
        .map(|e| e.rank)
        .unwrap_or(entries.len() as u32 + 1)
}
