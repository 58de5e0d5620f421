// SPDX-License-Identifier: MIT

//! Stats and activity-recording routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{badge, ActivityType, Badge, StatCounter, UserStats, XpActivity};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How many recent log entries the dashboard shows.
const RECENT_ACTIVITY_LIMIT: u32 = 10;

/// Route-level XP amounts per recorded action.
const XP_DAILY_LOGIN: u32 = 10;
const XP_FLASHCARD_STUDY: u32 = 25;
const XP_ASSIGNMENT_COMPLETE: u32 = 50;
const XP_QUIZ_BASE: u32 = 20;
const XP_QUIZ_DEFAULT: u32 = 30;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/stats", get(get_stats))
        .route("/api/stats/activity", post(record_activity))
}

// ─── Current Stats ───────────────────────────────────────────

/// Stats dashboard response: the aggregate, the recent award feed, and the
/// badge catalog split into earned/available.
#[derive(Serialize)]
pub struct StatsResponse {
    pub stats: UserStats,
    pub activities: Vec<XpActivity>,
    pub earned_badges: Vec<&'static Badge>,
    pub available_badges: Vec<&'static Badge>,
    pub all_badges: &'static [Badge],
}

/// Get current user's stats, recent XP activity, and badge progress.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StatsResponse>> {
    let stats = state.gamification.get_or_create_stats(&user.user_id).await?;
    let activities = state
        .gamification
        .recent_activities(&user.user_id, RECENT_ACTIVITY_LIMIT)
        .await?;

    let (earned_badges, available_badges): (Vec<_>, Vec<_>) =
        badge::CATALOG.iter().partition(|b| stats.has_badge(b.id));

    Ok(Json(StatsResponse {
        stats,
        activities,
        earned_badges,
        available_badges,
        all_badges: &badge::CATALOG,
    }))
}

// ─── Record Activity ─────────────────────────────────────────

#[derive(Deserialize)]
struct ActivityRequest {
    action: String,
    #[serde(default)]
    data: Option<ActivityData>,
}

#[derive(Deserialize, Default)]
struct ActivityData {
    /// Flashcard topic, for the log description
    topic: Option<String>,
    /// Assignment/quiz name, for the log description
    name: Option<String>,
    /// Quiz score, scales the XP award
    score: Option<f64>,
}

#[derive(Serialize)]
pub struct RecordActivityResponse {
    pub success: bool,
    pub stats: UserStats,
}

/// Record a study action: award XP, bump the matching counter, then run
/// badge evaluation.
///
/// Badge evaluation is best-effort: a failure there is logged and must not
/// fail an activity that was already recorded.
async fn record_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<ActivityRequest>,
) -> Result<Json<RecordActivityResponse>> {
    let data = request.data.unwrap_or_default();
    let user_id = user.user_id.as_str();

    let stats = match request.action.as_str() {
        "daily_login" => {
            state
                .gamification
                .add_xp(
                    user_id,
                    XP_DAILY_LOGIN,
                    ActivityType::DailyLogin,
                    "Daily login bonus",
                )
                .await?
        }
        "flashcard_study" => {
            let description = match &data.topic {
                Some(topic) => format!("Studied: {}", topic),
                None => "Studied flashcards".to_string(),
            };
            let stats = state
                .gamification
                .add_xp(
                    user_id,
                    XP_FLASHCARD_STUDY,
                    ActivityType::FlashcardStudy,
                    &description,
                )
                .await?;
            state
                .gamification
                .increment_stat(user_id, StatCounter::FlashcardsStudied)
                .await?;
            stats
        }
        "assignment_complete" => {
            let description = data.name.as_deref().unwrap_or("Completed assignment");
            let stats = state
                .gamification
                .add_xp(
                    user_id,
                    XP_ASSIGNMENT_COMPLETE,
                    ActivityType::AssignmentComplete,
                    description,
                )
                .await?;
            state
                .gamification
                .increment_stat(user_id, StatCounter::AssignmentsCompleted)
                .await?;
            stats
        }
        "quiz_complete" => {
            let xp = match data.score {
                Some(score) => (score * 0.5).floor() as u32 + XP_QUIZ_BASE,
                None => XP_QUIZ_DEFAULT,
            };
            let description = data.name.as_deref().unwrap_or("Completed quiz");
            let stats = state
                .gamification
                .add_xp(user_id, xp, ActivityType::QuizComplete, description)
                .await?;
            state
                .gamification
                .increment_stat(user_id, StatCounter::QuizzesTaken)
                .await?;
            stats
        }
        other => {
            return Err(crate::error::AppError::BadRequest(format!(
                "Invalid action: {}",
                other
            )));
        }
    };

    if let Err(e) = state.gamification.evaluate_badges(user_id, &stats).await {
        tracing::warn!(user_id, error = %e, "Badge evaluation failed");
    }

    // Refresh after potential badge awards
    let updated = state.gamification.get_or_create_stats(user_id).await?;

    Ok(Json(RecordActivityResponse {
        success: true,
        stats: updated,
    }))
}
