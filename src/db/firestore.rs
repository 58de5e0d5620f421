// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (identity records, read for leaderboard/friends joins)
//! - User stats (per-user progress aggregates)
//! - XP activities (append-only award log)
//! - Friendships (one record per unordered user pair)

use crate::db::collections;
use crate::error::AppError;
use crate::models::friendship::pair_key;
use crate::models::{Friendship, StatCounter, User, UserStats, XpActivity};
use crate::time_utils::now_rfc3339;
use futures_util::{stream, StreamExt};

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user identity record by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user identity record.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── User Stats Operations ───────────────────────────────────

    /// Get a user's stats aggregate document.
    pub async fn get_user_stats(&self, user_id: &str) -> Result<Option<UserStats>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USER_STATS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a fresh stats document. Fails if one already exists.
    pub async fn insert_user_stats(&self, stats: &UserStats) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::USER_STATS)
            .document_id(&stats.user_id)
            .object(stats)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Store a stats document (full overwrite of tracked fields).
    ///
    /// `add_xp` goes through here as a plain read-modify-write: two
    /// concurrent awards for the same user can race and the later write
    /// wins.
    pub async fn set_user_stats(&self, stats: &UserStats) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USER_STATS)
            .document_id(&stats.user_id)
            .object(stats)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Atomically increment one named counter inside a transaction.
    ///
    /// If another request modifies the stats concurrently, Firestore retries
    /// with fresh data, so counter bumps are never lost (unlike XP awards,
    /// see `set_user_stats`).
    pub async fn increment_counter(
        &self,
        user_id: &str,
        counter: StatCounter,
    ) -> Result<(), AppError> {
        let now = now_rfc3339();

        let mut transaction = self
            .get_client()?
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        // Read current stats within the transaction scope so the document
        // is registered for conflict detection.
        let current: Option<UserStats> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USER_STATS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to read stats in transaction: {}", e))
            })?;

        let mut stats = current.unwrap_or_else(|| UserStats::new(user_id, &now));
        stats.bump(counter);
        stats.updated_at = now;

        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::USER_STATS)
            .document_id(user_id)
            .object(&stats)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add stats to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::debug!(
            user_id,
            counter = counter.field_name(),
            "Counter incremented"
        );

        Ok(())
    }

    /// Top stats documents ordered by XP descending.
    pub async fn get_top_stats(&self, limit: u32) -> Result<Vec<UserStats>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USER_STATS)
            .order_by([("xp", firestore::FirestoreQueryDirection::Descending)])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch stats documents for a set of users.
    ///
    /// Uses bounded concurrent reads; users without a stats document are
    /// omitted from the result.
    pub async fn get_stats_for_users(
        &self,
        user_ids: &[String],
    ) -> Result<Vec<UserStats>, AppError> {
        let client = self.get_client()?;

        let results = stream::iter(user_ids.to_vec())
            .map(|user_id| async move {
                client
                    .fluent()
                    .select()
                    .by_id_in(collections::USER_STATS)
                    .obj::<UserStats>()
                    .one(&user_id)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<Option<UserStats>, AppError>>>()
            .await;

        let mut stats = Vec::with_capacity(results.len());
        for result in results {
            if let Some(s) = result? {
                stats.push(s);
            }
        }
        Ok(stats)
    }

    // ─── XP Activity Operations ──────────────────────────────────

    /// Append one entry to the XP award log.
    pub async fn insert_xp_activity(&self, activity: &XpActivity) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::XP_ACTIVITIES)
            .document_id(&activity.id)
            .object(activity)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Most recent XP awards for a user, newest first.
    pub async fn get_recent_xp_activities(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<XpActivity>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::XP_ACTIVITIES)
            .filter(move |q| q.for_all([q.field("user_id").eq(user_id.clone())]))
            .order_by([("created_at", firestore::FirestoreQueryDirection::Descending)])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Friendship Operations ───────────────────────────────────

    /// The single record (if any) for the unordered pair `{a, b}`.
    pub async fn get_friendship(&self, a: &str, b: &str) -> Result<Option<Friendship>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::FRIENDSHIPS)
            .obj()
            .one(&pair_key(a, b))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a friendship record. Fails if the pair already has one.
    pub async fn insert_friendship(&self, friendship: &Friendship) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::FRIENDSHIPS)
            .document_id(&pair_key(&friendship.user_id, &friendship.friend_id))
            .object(friendship)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Overwrite the pair's record (status transitions).
    pub async fn set_friendship(&self, friendship: &Friendship) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::FRIENDSHIPS)
            .document_id(&pair_key(&friendship.user_id, &friendship.friend_id))
            .object(friendship)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete the pair's record (reject or unfriend).
    pub async fn delete_friendship(&self, a: &str, b: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::FRIENDSHIPS)
            .document_id(&pair_key(a, b))
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Accepted edges touching `user_id` in either direction.
    ///
    /// Firestore equality filters target one field, so the two directions
    /// are two queries, merged. Pair-keyed documents guarantee no overlap.
    pub async fn get_accepted_friendships(
        &self,
        user_id: &str,
    ) -> Result<Vec<Friendship>, AppError> {
        let sent = self.query_friendships("user_id", user_id, "accepted").await?;
        let received = self
            .query_friendships("friend_id", user_id, "accepted")
            .await?;

        let mut edges = sent;
        edges.extend(received);
        Ok(edges)
    }

    /// Pending requests received by `user_id`.
    pub async fn get_pending_received(&self, user_id: &str) -> Result<Vec<Friendship>, AppError> {
        self.query_friendships("friend_id", user_id, "pending").await
    }

    /// Pending requests sent by `user_id`.
    pub async fn get_pending_sent(&self, user_id: &str) -> Result<Vec<Friendship>, AppError> {
        self.query_friendships("user_id", user_id, "pending").await
    }

    /// Helper: friendships where `field == user_id` and `status` matches.
    async fn query_friendships(
        &self,
        field: &'static str,
        user_id: &str,
        status: &'static str,
    ) -> Result<Vec<Friendship>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::FRIENDSHIPS)
            .filter(move |q| {
                q.for_all([
                    q.field(field).eq(user_id.clone()),
                    q.field("status").eq(status),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
