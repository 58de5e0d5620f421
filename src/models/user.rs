// SPDX-License-Identifier: MIT

//! User identity model.
//!
//! Account creation and sign-in live elsewhere; this service only reads
//! identity records to label leaderboard and friends-list entries.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore (document ID = `id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    /// Display name (may be unset before onboarding completes)
    pub name: Option<String>,
    /// When the account was created (RFC3339)
    pub created_at: String,
}
