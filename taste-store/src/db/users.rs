//! User row operations
//!
//! Creation uses insert-or-ignore semantics: an existing user keeps its
//! referrer and timestamps no matter what a later create call carries.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use taste_common::{Error, Result};

use crate::models::{TasteUser, UnlockStatus};

/// Insert a user if absent; returns true when the row was created now
pub async fn insert_user(
    pool: &SqlitePool,
    user_id: &str,
    referrer_id: Option<&str>,
    created_at: DateTime<Utc>,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO taste_users (user_id, referrer_id, created_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(referrer_id)
    .bind(created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Load a user row
pub async fn get_user(pool: &SqlitePool, user_id: &str) -> Result<Option<TasteUser>> {
    let row = sqlx::query(
        r#"
        SELECT user_id, referrer_id, quiz_completed_at, unlock_status, created_at
        FROM taste_users
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.map(|row| map_user_row(&row)).transpose()
}

/// Flip a user to unlocked; returns true when the flag changed now
///
/// Conditional on the current status, so the flip happens at most once
/// and an unknown user is a no-op rather than an error.
pub async fn unlock_user(pool: &SqlitePool, user_id: &str) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE taste_users SET unlock_status = 'unlocked' WHERE user_id = ? AND unlock_status = 'locked'",
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

fn map_user_row(row: &SqliteRow) -> Result<TasteUser> {
    let unlock_status: String = row.get("unlock_status");
    let unlock_status = UnlockStatus::from_str(&unlock_status)
        .ok_or_else(|| Error::Internal(format!("Unknown unlock status: {}", unlock_status)))?;

    let created_at: String = row.get("created_at");
    let created_at = parse_timestamp(&created_at, "created_at")?;

    let quiz_completed_at: Option<String> = row.get("quiz_completed_at");
    let quiz_completed_at = quiz_completed_at
        .map(|s| parse_timestamp(&s, "quiz_completed_at"))
        .transpose()?;

    Ok(TasteUser {
        user_id: row.get("user_id"),
        referrer_id: row.get("referrer_id"),
        quiz_completed_at,
        unlock_status,
        created_at,
    })
}

pub(crate) fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map_err(|e| Error::Internal(format!("Failed to parse {}: {}", column, e)))
        .map(|dt| dt.with_timezone(&Utc))
}
