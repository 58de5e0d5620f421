// SPDX-License-Identifier: MIT

//! Friendship graph operations.
//!
//! Pending requests are directed (requester to recipient); accepted
//! friendships are symmetric. The store keeps one record per unordered
//! pair, so duplicate checks are a single lookup.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{Friendship, FriendshipStatus};
use crate::time_utils::now_rfc3339;

#[derive(Clone)]
pub struct FriendService {
    db: FirestoreDb,
}

impl FriendService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Send a friend request from `user_id` to `friend_id`.
    ///
    /// Any currently stored record for the pair, pending or accepted,
    /// blocks a new request.
    pub async fn send_request(&self, user_id: &str, friend_id: &str) -> Result<Friendship> {
        if self.db.get_friendship(user_id, friend_id).await?.is_some() {
            return Err(AppError::DuplicateRelationship);
        }

        let friendship = Friendship::pending(user_id, friend_id, &now_rfc3339());
        self.db.insert_friendship(&friendship).await?;

        tracing::info!(user_id, friend_id, "Friend request sent");
        Ok(friendship)
    }

    /// Accept a pending request that `requester` sent to `accepter`.
    ///
    /// Returns `None` (nothing changed) if no such pending edge exists,
    /// including when the edge points the other way.
    pub async fn accept_request(
        &self,
        accepter: &str,
        requester: &str,
    ) -> Result<Option<Friendship>> {
        let edge = match self.db.get_friendship(accepter, requester).await? {
            Some(edge)
                if edge.status == FriendshipStatus::Pending
                    && edge.user_id == requester
                    && edge.friend_id == accepter =>
            {
                edge
            }
            _ => return Ok(None),
        };

        let accepted = Friendship {
            status: FriendshipStatus::Accepted,
            ..edge
        };
        self.db.set_friendship(&accepted).await?;

        tracing::info!(accepter, requester, "Friend request accepted");
        Ok(Some(accepted))
    }

    /// Delete a pending request that `requester` sent to `accepter`.
    ///
    /// Returns whether a record was deleted.
    pub async fn reject_request(&self, accepter: &str, requester: &str) -> Result<bool> {
        match self.db.get_friendship(accepter, requester).await? {
            Some(edge)
                if edge.status == FriendshipStatus::Pending
                    && edge.user_id == requester
                    && edge.friend_id == accepter =>
            {
                self.db.delete_friendship(accepter, requester).await?;
                tracing::info!(accepter, requester, "Friend request rejected");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Delete the accepted friendship between two users, whichever side
    /// originally sent the request. Returns whether a record was deleted.
    pub async fn remove_friend(&self, user_id: &str, friend_id: &str) -> Result<bool> {
        match self.db.get_friendship(user_id, friend_id).await? {
            Some(edge) if edge.status == FriendshipStatus::Accepted => {
                self.db.delete_friendship(user_id, friend_id).await?;
                tracing::info!(user_id, friend_id, "Friend removed");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// IDs of all accepted friends of `user_id`, direction collapsed.
    pub async fn list_friends(&self, user_id: &str) -> Result<Vec<String>> {
        let edges = self.db.get_accepted_friendships(user_id).await?;
        Ok(edges
            .iter()
            .map(|edge| edge.counterpart_of(user_id).to_string())
            .collect())
    }

    /// Pending requests received by `user_id`.
    pub async fn pending_requests(&self, user_id: &str) -> Result<Vec<Friendship>> {
        self.db.get_pending_received(user_id).await
    }

    /// Pending requests sent by `user_id`.
    pub async fn sent_requests(&self, user_id: &str) -> Result<Vec<Friendship>> {
        self.db.get_pending_sent(user_id).await
    }

    /// The pair's single record, if any (for UI display).
    pub async fn friendship_status(&self, a: &str, b: &str) -> Result<Option<Friendship>> {
        self.db.get_friendship(a, b).await
    }
}
