//! Referral ledger operations
//!
//! One edge per (referrer, referred) pair. The per-referrer completed
//! count is always derived by aggregation over edges; there is no
//! stored counter to drift out of sync with the edge set.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use taste_common::{Error, Result};

use crate::db::profiles::map_profile_row;
use crate::db::users::parse_timestamp;
use crate::models::{EdgeStatus, ReferralEdge, TasteProfile};

/// Record a referral click; a no-op when the pair already has an edge
pub async fn insert_edge(
    pool: &SqlitePool,
    referrer_id: &str,
    referred_id: &str,
    created_at: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR IGNORE INTO referral_edges (referrer_id, referred_id, status, created_at)
        VALUES (?, ?, 'clicked', ?)
        "#,
    )
    .bind(referrer_id)
    .bind(referred_id)
    .bind(created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Transition an edge clicked→completed and flip the referrer once the
/// completed count reaches `threshold`; returns true when the referrer
/// was unlocked now
///
/// Commits as one transaction, with the count derived by aggregation
/// after the transition so concurrent completions for the same referrer
/// converge to the correct total. The edge update is conditional on the
/// current status: a re-submission by an already-completed referred
/// user neither double-counts nor moves the completion timestamp. A
/// referrer with no user row is a no-op for the flip.
pub async fn complete_and_unlock(
    pool: &SqlitePool,
    referrer_id: &str,
    referred_id: &str,
    completed_at: DateTime<Utc>,
    threshold: i64,
) -> Result<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE referral_edges
        SET status = 'completed', completed_at = ?
        WHERE referrer_id = ? AND referred_id = ? AND status = 'clicked'
        "#,
    )
    .bind(completed_at.to_rfc3339())
    .bind(referrer_id)
    .bind(referred_id)
    .execute(&mut *tx)
    .await?;

    let completed: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM referral_edges WHERE referrer_id = ? AND status = 'completed'",
    )
    .bind(referrer_id)
    .fetch_one(&mut *tx)
    .await?;

    let mut unlocked_now = false;
    if completed >= threshold {
        let result = sqlx::query(
            "UPDATE taste_users SET unlock_status = 'unlocked' WHERE user_id = ? AND unlock_status = 'locked'",
        )
        .bind(referrer_id)
        .execute(&mut *tx)
        .await?;
        unlocked_now = result.rows_affected() > 0;
    }

    tx.commit().await?;

    Ok(unlocked_now)
}

/// Derived count of completed edges for one referrer (authoritative)
pub async fn completed_count(pool: &SqlitePool, referrer_id: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM referral_edges WHERE referrer_id = ? AND status = 'completed'",
    )
    .bind(referrer_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Load one edge by its composite identity
pub async fn get_edge(
    pool: &SqlitePool,
    referrer_id: &str,
    referred_id: &str,
) -> Result<Option<ReferralEdge>> {
    let row = sqlx::query(
        r#"
        SELECT referrer_id, referred_id, status, completed_at, created_at
        FROM referral_edges
        WHERE referrer_id = ? AND referred_id = ?
        "#,
    )
    .bind(referrer_id)
    .bind(referred_id)
    .fetch_optional(pool)
    .await?;

    row.map(|row| map_edge_row(&row)).transpose()
}

/// Profiles of completed referred users, most recently completed first
pub async fn completed_friend_profiles(
    pool: &SqlitePool,
    referrer_id: &str,
) -> Result<Vec<TasteProfile>> {
    let rows = sqlx::query(
        r#"
        SELECT p.user_id, p.paris_archive, p.nyc_street, p.minimal_core, p.designer_vintage,
               p.deal_hunter, p.primary_tag, p.primary_percentage, p.secondary_tag,
               p.secondary_percentage, p.tertiary_tag, p.tertiary_percentage, p.answers,
               p.created_at
        FROM taste_profiles p
        JOIN referral_edges e ON p.user_id = e.referred_id
        WHERE e.referrer_id = ? AND e.status = 'completed'
        ORDER BY e.completed_at DESC
        "#,
    )
    .bind(referrer_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_profile_row).collect()
}

fn map_edge_row(row: &SqliteRow) -> Result<ReferralEdge> {
    let status: String = row.get("status");
    let status = EdgeStatus::from_str(&status)
        .ok_or_else(|| Error::Internal(format!("Unknown edge status: {}", status)))?;

    let completed_at: Option<String> = row.get("completed_at");
    let completed_at = completed_at
        .map(|s| parse_timestamp(&s, "completed_at"))
        .transpose()?;

    let created_at: String = row.get("created_at");
    let created_at = parse_timestamp(&created_at, "created_at")?;

    Ok(ReferralEdge {
        referrer_id: row.get("referrer_id"),
        referred_id: row.get("referred_id"),
        status,
        completed_at,
        created_at,
    })
}
