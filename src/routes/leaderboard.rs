// SPDX-License-Identifier: MIT

//! Leaderboard routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::LeaderboardEntry;
use crate::services::leaderboard::{self, DEFAULT_LIMIT};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MAX_LIMIT: u32 = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/leaderboard", get(get_leaderboard))
}

#[derive(Deserialize)]
struct LeaderboardQuery {
    /// "friends" (default) or "global"
    #[serde(rename = "type", default = "default_scope")]
    scope: String,
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_scope() -> String {
    "friends".to_string()
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// The requester's own standing, shown alongside the board.
#[derive(Serialize)]
pub struct MyStats {
    pub rank: u32,
    pub xp: u64,
    pub level: u32,
    pub current_streak: u32,
    pub badges: Vec<String>,
}

#[derive(Serialize)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
    pub my_stats: MyStats,
    #[serde(rename = "type")]
    pub scope: String,
}

/// Get the friends or global leaderboard, plus the requester's own rank.
async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>> {
    let scope = match params.scope.as_str() {
        "friends" | "global" => params.scope.clone(),
        other => {
            return Err(crate::error::AppError::BadRequest(format!(
                "Invalid leaderboard type: {}",
                other
            )));
        }
    };
    let limit = params.limit.min(MAX_LIMIT);

    tracing::debug!(
        user_id = %user.user_id,
        scope = %scope,
        limit,
        "Building leaderboard"
    );

    let entries = if scope == "global" {
        state
            .leaderboard
            .global_leaderboard(&user.user_id, limit)
            .await?
    } else {
        state.leaderboard.friends_leaderboard(&user.user_id).await?
    };

    let rank = leaderboard::my_rank(&entries);
    let my_stats = state.gamification.get_or_create_stats(&user.user_id).await?;
    let mut badges: Vec<String> = my_stats.badges.iter().cloned().collect();
    badges.sort_unstable();

    Ok(Json(LeaderboardResponse {
        leaderboard: entries,
        my_stats: MyStats {
            rank,
            xp: my_stats.xp,
            level: my_stats.level,
            current_streak: my_stats.current_streak,
            badges,
        },
        scope,
    }))
}
