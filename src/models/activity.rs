// SPDX-License-Identifier: MIT

//! XP activity log entries.
//!
//! Append-only audit trail of XP awards. Entries are written alongside each
//! award and read back only for the recent-activity feed, never for
//! recomputing the stats aggregate.

use serde::{Deserialize, Serialize};

use crate::time_utils::now_rfc3339;

/// What earned the XP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    FlashcardStudy,
    AssignmentComplete,
    QuizComplete,
    DailyLogin,
    StreakBonus,
    BadgeEarned,
}

/// One XP-earning event (document ID = `id`). Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XpActivity {
    pub id: String,
    pub user_id: String,
    pub activity_type: ActivityType,
    pub xp_earned: u32,
    pub description: String,
    /// When the XP was awarded (RFC3339)
    pub created_at: String,
}

impl XpActivity {
    /// Build a log entry for an award happening now.
    pub fn record(
        user_id: &str,
        activity_type: ActivityType,
        xp_earned: u32,
        description: &str,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            activity_type,
            xp_earned,
            description: description.to_string(),
            created_at: now_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_type_wire_names() {
        let json = serde_json::to_string(&ActivityType::FlashcardStudy).unwrap();
        assert_eq!(json, "\"flashcard_study\"");
        let json = serde_json::to_string(&ActivityType::BadgeEarned).unwrap();
        assert_eq!(json, "\"badge_earned\"");

        let parsed: ActivityType = serde_json::from_str("\"daily_login\"").unwrap();
        assert_eq!(parsed, ActivityType::DailyLogin);
    }

    #[test]
    fn test_record_fills_id_and_timestamp() {
        let entry = XpActivity::record("u1", ActivityType::QuizComplete, 30, "Completed quiz");
        assert!(!entry.id.is_empty());
        assert!(!entry.created_at.is_empty());
        assert_eq!(entry.xp_earned, 30);
    }
}
