//! Persistent row models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taste_common::quiz::QuizAnswers;
use taste_common::scoring::{RankedTag, TasteScores};

/// Whether a referrer may view full results
///
/// Monotonic: once unlocked, a user never reverts to locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnlockStatus {
    Locked,
    Unlocked,
}

impl UnlockStatus {
    /// Stable identifier used in storage
    pub fn as_str(&self) -> &'static str {
        match self {
            UnlockStatus::Locked => "locked",
            UnlockStatus::Unlocked => "unlocked",
        }
    }

    /// Parse a status from its stable identifier
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "locked" => Some(UnlockStatus::Locked),
            "unlocked" => Some(UnlockStatus::Unlocked),
            _ => None,
        }
    }
}

/// Completion state of one referrer→referred edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStatus {
    Clicked,
    Completed,
}

impl EdgeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeStatus::Clicked => "clicked",
            EdgeStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "clicked" => Some(EdgeStatus::Clicked),
            "completed" => Some(EdgeStatus::Completed),
            _ => None,
        }
    }
}

/// A quiz participant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasteUser {
    pub user_id: String,
    /// Set at most once, at creation; never changed afterwards
    pub referrer_id: Option<String>,
    /// Null until the first successful submission
    pub quiz_completed_at: Option<DateTime<Utc>>,
    pub unlock_status: UnlockStatus,
    pub created_at: DateTime<Utc>,
}

/// A stored quiz result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasteProfile {
    pub user_id: String,
    pub scores: TasteScores,
    pub primary: RankedTag,
    pub secondary: RankedTag,
    pub tertiary: RankedTag,
    pub answers: QuizAnswers,
    pub created_at: DateTime<Utc>,
}

/// One referrer→referred relationship record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferralEdge {
    pub referrer_id: String,
    pub referred_id: String,
    pub status: EdgeStatus,
    /// Null until the referred user completes the quiz
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
