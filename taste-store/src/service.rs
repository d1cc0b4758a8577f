//! Service operations
//!
//! The four operations transport layers call into: create-or-get user,
//! submit quiz, get profile, get referral status. Validation happens
//! before any store access; all writes are keyed upserts so a failed
//! call is safe to retry with the same payload.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use taste_common::quiz::QuizAnswers;
use taste_common::scoring;
use taste_common::{identity, Error, Result};

use crate::db;
use crate::models::{TasteProfile, TasteUser, UnlockStatus};

/// Completed referrals required before a referrer's results unlock
pub const UNLOCK_THRESHOLD: i64 = 2;

/// Referral standing of one user acting as referrer
#[derive(Debug, Clone, Serialize)]
pub struct ReferralStatus {
    /// Completed-edge count, derived by aggregation (authoritative)
    pub completed_count: i64,
    /// Stored unlock flag; repaired on read if it lags the count
    pub is_unlocked: bool,
    /// Completed referred users' profiles, most recent first
    pub friends: Vec<TasteProfile>,
}

/// Create a user if needed, or return the existing row untouched
///
/// With no id supplied a fresh one is generated. A referrer id only
/// takes effect when the user row is genuinely created by this call;
/// it then also records the clicked referral edge.
pub async fn create_or_get_user(
    pool: &SqlitePool,
    user_id: Option<&str>,
    referrer_id: Option<&str>,
) -> Result<TasteUser> {
    if let Some(id) = user_id {
        if let Some(existing) = db::users::get_user(pool, id).await? {
            return Ok(existing);
        }
    }

    let user_id = match user_id {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => identity::generate_user_id(),
    };
    let referrer_id = referrer_id.filter(|r| !r.is_empty());
    let now = Utc::now();

    let created = db::users::insert_user(pool, &user_id, referrer_id, now).await?;
    if created {
        if let Some(referrer) = referrer_id {
            db::referrals::insert_edge(pool, referrer, &user_id, now).await?;
        }
    }

    db::users::get_user(pool, &user_id)
        .await?
        .ok_or_else(|| Error::Internal(format!("User {} missing after insert", user_id)))
}

/// Load a user row
pub async fn get_user(pool: &SqlitePool, user_id: &str) -> Result<TasteUser> {
    if user_id.is_empty() {
        return Err(Error::InvalidInput("userId is required".to_string()));
    }

    db::users::get_user(pool, user_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("User not found: {}", user_id)))
}

/// Score a submission, persist the profile, and run the unlock cascade
///
/// The profile upsert and the submitter's completion timestamp commit
/// together; a failure there fails the whole submission. Referrer
/// bookkeeping afterwards is best-effort: its failure never blocks the
/// submitting user's own results, and any drift it leaves behind is
/// repaired by the next referral-status read.
pub async fn submit_quiz(
    pool: &SqlitePool,
    user_id: &str,
    answers: &QuizAnswers,
) -> Result<TasteProfile> {
    if user_id.is_empty() {
        return Err(Error::InvalidInput("userId is required".to_string()));
    }
    if answers.is_empty() {
        return Err(Error::InvalidInput("answers are required".to_string()));
    }

    let scores = scoring::calculate_scores(answers);
    let top = scoring::top_tags(&scores);
    let now = Utc::now();

    // Ensure the user row exists; an existing row keeps its referrer
    db::users::insert_user(pool, user_id, None, now).await?;
    db::profiles::save_profile(pool, user_id, &scores, &top, answers, now).await?;

    if let Err(e) = run_unlock_cascade(pool, user_id, now).await {
        warn!("Referral cascade failed for {}: {}", user_id, e);
    }

    db::profiles::get_profile(pool, user_id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Profile {} missing after upsert", user_id)))
}

/// Load a stored profile
pub async fn get_profile(pool: &SqlitePool, user_id: &str) -> Result<TasteProfile> {
    if user_id.is_empty() {
        return Err(Error::InvalidInput("userId is required".to_string()));
    }

    db::profiles::get_profile(pool, user_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Profile not found: {}", user_id)))
}

/// Report a user's referral standing
///
/// Unknown users report zero/locked/empty rather than an error. The
/// completed count is derived from edges on every call; if the stored
/// unlock flag lags a count at or past the threshold (a skipped
/// cascade), it is flipped here before reporting.
pub async fn get_referral_status(pool: &SqlitePool, user_id: &str) -> Result<ReferralStatus> {
    let user = db::users::get_user(pool, user_id).await?;
    let completed_count = db::referrals::completed_count(pool, user_id).await?;

    let mut is_unlocked = matches!(
        user.as_ref().map(|u| u.unlock_status),
        Some(UnlockStatus::Unlocked)
    );

    if !is_unlocked && completed_count >= UNLOCK_THRESHOLD && user.is_some() {
        if db::users::unlock_user(pool, user_id).await? {
            warn!(
                "Unlock flag for {} lagged completed count {}; repaired on read",
                user_id, completed_count
            );
            is_unlocked = true;
        }
    }

    let friends = if completed_count > 0 {
        db::referrals::completed_friend_profiles(pool, user_id).await?
    } else {
        Vec::new()
    };

    Ok(ReferralStatus {
        completed_count,
        is_unlocked,
        friends,
    })
}

/// Edge transition and unlock flip for one submission
///
/// A missing referrer row makes the flip a no-op rather than an error:
/// the referred user's submission already succeeded and must stay that
/// way.
async fn run_unlock_cascade(
    pool: &SqlitePool,
    user_id: &str,
    completed_at: DateTime<Utc>,
) -> Result<()> {
    let Some(user) = db::users::get_user(pool, user_id).await? else {
        return Ok(());
    };
    let Some(referrer_id) = user.referrer_id else {
        return Ok(());
    };

    let unlocked_now = db::referrals::complete_and_unlock(
        pool,
        &referrer_id,
        user_id,
        completed_at,
        UNLOCK_THRESHOLD,
    )
    .await?;

    if unlocked_now {
        info!("Referrer {} unlocked after completed referrals", referrer_id);
    }

    Ok(())
}
