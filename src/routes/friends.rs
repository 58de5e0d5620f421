// SPDX-License-Identifier: MIT

//! Friendship routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{ActivityType, Friendship};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// XP granted to both parties when a request is accepted.
const XP_FRIEND_ACCEPTED: u32 = 20;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/friends",
        get(get_friends)
            .post(friend_action)
            .delete(delete_friend),
    )
}

// ─── Listing ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct FriendsQuery {
    /// "all" (default) or "status"
    #[serde(rename = "type", default)]
    kind: Option<String>,
    friend_id: Option<String>,
}

/// Identity summary attached to friends and requests.
#[derive(Serialize)]
pub struct FriendInfo {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
}

/// A pending request joined with the other party's identity.
#[derive(Serialize)]
pub struct RequestInfo {
    #[serde(flatten)]
    pub friendship: Friendship,
    pub user: Option<FriendInfo>,
}

#[derive(Serialize)]
pub struct FriendsResponse {
    pub friends: Vec<FriendInfo>,
    pub pending_requests: Vec<RequestInfo>,
    pub sent_requests: Vec<RequestInfo>,
    pub friend_count: usize,
}

#[derive(Serialize)]
pub struct FriendshipStatusResponse {
    pub status: Option<Friendship>,
}

/// Get the friends list with pending/sent requests, or (with
/// `type=status&friend_id=X`) the single record for one pair.
async fn get_friends(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<FriendsQuery>,
) -> Result<axum::response::Response> {
    use axum::response::IntoResponse;

    if params.kind.as_deref() == Some("status") {
        let friend_id = params
            .friend_id
            .ok_or_else(|| AppError::BadRequest("friend_id required".to_string()))?;
        let status = state
            .friends
            .friendship_status(&user.user_id, &friend_id)
            .await?;
        return Ok(Json(FriendshipStatusResponse { status }).into_response());
    }

    let friend_ids = state.friends.list_friends(&user.user_id).await?;
    let mut friends = Vec::with_capacity(friend_ids.len());
    for id in &friend_ids {
        if let Some(info) = lookup_identity(&state, id).await {
            friends.push(info);
        }
    }

    let pending = state.friends.pending_requests(&user.user_id).await?;
    let mut pending_requests = Vec::with_capacity(pending.len());
    for friendship in pending {
        // Incoming: show who sent it
        let user_info = lookup_identity(&state, &friendship.user_id).await;
        pending_requests.push(RequestInfo {
            friendship,
            user: user_info,
        });
    }

    let sent = state.friends.sent_requests(&user.user_id).await?;
    let mut sent_requests = Vec::with_capacity(sent.len());
    for friendship in sent {
        // Outgoing: show who it was sent to
        let user_info = lookup_identity(&state, &friendship.friend_id).await;
        sent_requests.push(RequestInfo {
            friendship,
            user: user_info,
        });
    }

    Ok(Json(FriendsResponse {
        friend_count: friends.len(),
        friends,
        pending_requests,
        sent_requests,
    })
    .into_response())
}

/// Identity lookup that degrades to `None` instead of failing the listing.
async fn lookup_identity(state: &AppState, user_id: &str) -> Option<FriendInfo> {
    match state.db.get_user(user_id).await {
        Ok(Some(user)) => Some(FriendInfo {
            id: user.id,
            name: user.name,
            email: user.email,
        }),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(user_id, error = %e, "Identity lookup failed");
            None
        }
    }
}

// ─── Actions ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct FriendActionRequest {
    /// "send", "accept", or "reject"
    action: String,
    friend_id: String,
}

#[derive(Serialize)]
pub struct FriendActionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendship: Option<Friendship>,
}

/// Send, accept, or reject a friend request.
async fn friend_action(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<FriendActionRequest>,
) -> Result<Json<FriendActionResponse>> {
    if request.friend_id.is_empty() {
        return Err(AppError::BadRequest("friend_id required".to_string()));
    }
    if request.friend_id == user.user_id {
        return Err(AppError::BadRequest("Cannot friend yourself".to_string()));
    }

    match request.action.as_str() {
        "send" => {
            let friendship = state
                .friends
                .send_request(&user.user_id, &request.friend_id)
                .await?;
            Ok(Json(FriendActionResponse {
                success: true,
                friendship: Some(friendship),
            }))
        }
        "accept" => {
            let friendship = state
                .friends
                .accept_request(&user.user_id, &request.friend_id)
                .await?;

            if friendship.is_some() {
                // Reward both parties and re-check badges (social_butterfly).
                // Best-effort: the acceptance itself already succeeded.
                for party in [user.user_id.as_str(), request.friend_id.as_str()] {
                    if let Err(e) = reward_new_friendship(&state, party).await {
                        tracing::warn!(user_id = party, error = %e, "Friendship reward failed");
                    }
                }
            }

            Ok(Json(FriendActionResponse {
                success: true,
                friendship,
            }))
        }
        "reject" => {
            let rejected = state
                .friends
                .reject_request(&user.user_id, &request.friend_id)
                .await?;
            Ok(Json(FriendActionResponse {
                success: rejected,
                friendship: None,
            }))
        }
        other => Err(AppError::BadRequest(format!("Invalid action: {}", other))),
    }
}

/// Award the friendship XP bonus and re-run badge evaluation for one party.
///
/// The fixed activity-type set has no friendship variant, so the bonus is
/// logged as a daily-login award, matching the established ledger format.
async fn reward_new_friendship(state: &AppState, user_id: &str) -> Result<()> {
    let stats = state
        .gamification
        .add_xp(
            user_id,
            XP_FRIEND_ACCEPTED,
            ActivityType::DailyLogin,
            "Made a new friend!",
        )
        .await?;
    state.gamification.evaluate_badges(user_id, &stats).await
}

// ─── Removal ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct RemoveFriendQuery {
    friend_id: String,
}

/// Remove an accepted friend.
async fn delete_friend(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<RemoveFriendQuery>,
) -> Result<Json<FriendActionResponse>> {
    let removed = state
        .friends
        .remove_friend(&user.user_id, &params.friend_id)
        .await?;

    Ok(Json(FriendActionResponse {
        success: removed,
        friendship: None,
    }))
}
