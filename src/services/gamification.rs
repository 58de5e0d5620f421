// SPDX-License-Identifier: MIT

//! XP engine and badge evaluator.
//!
//! Handles the core award path:
//! 1. Load (or lazily create) the user's stats aggregate
//! 2. Apply the award: streak transition, XP total, derived level
//! 3. Append one entry to the XP activity log
//! 4. Write the updated aggregate back
//!
//! Badge evaluation runs after stats-affecting events and may cascade
//! further XP awards (`badge_earned` entries).

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{badge, ActivityType, StatCounter, UserStats, XpActivity};
use crate::time_utils::{now_rfc3339, utc_today};

#[derive(Clone)]
pub struct GamificationService {
    db: FirestoreDb,
}

impl GamificationService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Get the user's stats, creating a zeroed record on first access.
    ///
    /// Idempotent: an existing record is returned unchanged.
    pub async fn get_or_create_stats(&self, user_id: &str) -> Result<UserStats> {
        if let Some(stats) = self.db.get_user_stats(user_id).await? {
            return Ok(stats);
        }

        let stats = UserStats::new(user_id, &now_rfc3339());
        self.db.insert_user_stats(&stats).await?;
        tracing::info!(user_id, "Created stats record");
        Ok(stats)
    }

    /// Award XP and return the updated stats.
    ///
    /// Exactly one activity log entry and one stats write per call. The
    /// stats write is a read-modify-write against the snapshot loaded at
    /// the top of the call; concurrent awards for the same user can race
    /// (last write wins).
    pub async fn add_xp(
        &self,
        user_id: &str,
        amount: u32,
        activity_type: ActivityType,
        description: &str,
    ) -> Result<UserStats> {
        if amount == 0 {
            return Err(AppError::BadRequest(
                "XP amount must be positive".to_string(),
            ));
        }

        let mut stats = self.get_or_create_stats(user_id).await?;
        stats.apply_award(amount, utc_today());
        stats.updated_at = now_rfc3339();

        let entry = XpActivity::record(user_id, activity_type, amount, description);
        self.db.insert_xp_activity(&entry).await?;
        self.db.set_user_stats(&stats).await?;

        tracing::debug!(
            user_id,
            amount,
            activity_type = ?activity_type,
            xp = stats.xp,
            level = stats.level,
            streak = stats.current_streak,
            "XP awarded"
        );

        Ok(stats)
    }

    /// Atomically bump one named counter by 1.
    pub async fn increment_stat(&self, user_id: &str, counter: StatCounter) -> Result<()> {
        self.db.increment_counter(user_id, counter).await
    }

    /// Most recent XP award log entries, newest first.
    pub async fn recent_activities(&self, user_id: &str, limit: u32) -> Result<Vec<XpActivity>> {
        self.db.get_recent_xp_activities(user_id, limit).await
    }

    /// Add a badge to the user's set. No-op if already held.
    pub async fn award_badge(&self, user_id: &str, badge_id: &str) -> Result<UserStats> {
        let mut stats = self.get_or_create_stats(user_id).await?;
        if stats.has_badge(badge_id) {
            return Ok(stats);
        }

        stats.badges.insert(badge_id.to_string());
        stats.updated_at = now_rfc3339();
        self.db.set_user_stats(&stats).await?;

        tracing::info!(user_id, badge = badge_id, "Badge awarded");
        Ok(stats)
    }

    /// Evaluate the badge catalog against a stats snapshot and award
    /// everything newly qualified, each with its catalog XP reward.
    ///
    /// Held badges are skipped, so repeated evaluation with the same
    /// snapshot awards each badge at most once. The accepted-friend count
    /// is fetched here since it is not a stats field.
    pub async fn evaluate_badges(&self, user_id: &str, snapshot: &UserStats) -> Result<()> {
        let friend_count = self.db.get_accepted_friendships(user_id).await?.len();

        for badge in badge::qualifying(snapshot, friend_count) {
            self.award_badge(user_id, badge.id).await?;
            self.add_xp(
                user_id,
                badge.xp_reward,
                ActivityType::BadgeEarned,
                &format!("Earned badge: {}", badge.name),
            )
            .await?;
        }

        Ok(())
    }
}
