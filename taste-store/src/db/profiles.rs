//! Taste profile row operations
//!
//! One row per user, overwritten wholesale on re-submission.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use taste_common::quiz::QuizAnswers;
use taste_common::scoring::{RankedTag, TasteScores, TopTags};
use taste_common::{Error, Result, TasteTag};

use crate::db::users::parse_timestamp;
use crate::models::TasteProfile;

/// Upsert a profile and stamp the user's quiz completion, atomically
///
/// Full overwrite on conflict, timestamp included. The two writes
/// commit together: a submission either lands completely or not at all,
/// and retrying with the same payload is safe.
pub async fn save_profile(
    pool: &SqlitePool,
    user_id: &str,
    scores: &TasteScores,
    top: &TopTags,
    answers: &QuizAnswers,
    saved_at: DateTime<Utc>,
) -> Result<()> {
    // Prepare all data before acquiring a database connection
    let answers_json = serde_json::to_string(answers)
        .map_err(|e| Error::Internal(format!("Failed to serialize answers: {}", e)))?;
    let saved_at = saved_at.to_rfc3339();

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO taste_profiles (
            user_id, paris_archive, nyc_street, minimal_core, designer_vintage, deal_hunter,
            primary_tag, primary_percentage, secondary_tag, secondary_percentage,
            tertiary_tag, tertiary_percentage, answers, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            paris_archive = excluded.paris_archive,
            nyc_street = excluded.nyc_street,
            minimal_core = excluded.minimal_core,
            designer_vintage = excluded.designer_vintage,
            deal_hunter = excluded.deal_hunter,
            primary_tag = excluded.primary_tag,
            primary_percentage = excluded.primary_percentage,
            secondary_tag = excluded.secondary_tag,
            secondary_percentage = excluded.secondary_percentage,
            tertiary_tag = excluded.tertiary_tag,
            tertiary_percentage = excluded.tertiary_percentage,
            answers = excluded.answers,
            created_at = excluded.created_at
        "#,
    )
    .bind(user_id)
    .bind(scores.paris_archive as i64)
    .bind(scores.nyc_street as i64)
    .bind(scores.minimal_core as i64)
    .bind(scores.designer_vintage as i64)
    .bind(scores.deal_hunter as i64)
    .bind(top.primary.tag.as_str())
    .bind(top.primary.percentage as i64)
    .bind(top.secondary.tag.as_str())
    .bind(top.secondary.percentage as i64)
    .bind(top.tertiary.tag.as_str())
    .bind(top.tertiary.percentage as i64)
    .bind(&answers_json)
    .bind(&saved_at)
    .execute(&mut *tx)
    .await?;

    // Refreshed on every successful submission
    sqlx::query("UPDATE taste_users SET quiz_completed_at = ? WHERE user_id = ?")
        .bind(&saved_at)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

/// Load a profile row
pub async fn get_profile(pool: &SqlitePool, user_id: &str) -> Result<Option<TasteProfile>> {
    let row = sqlx::query(
        r#"
        SELECT user_id, paris_archive, nyc_street, minimal_core, designer_vintage, deal_hunter,
               primary_tag, primary_percentage, secondary_tag, secondary_percentage,
               tertiary_tag, tertiary_percentage, answers, created_at
        FROM taste_profiles
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.map(|row| map_profile_row(&row)).transpose()
}

pub(crate) fn map_profile_row(row: &SqliteRow) -> Result<TasteProfile> {
    let scores = TasteScores {
        paris_archive: row.get::<i64, _>("paris_archive") as u32,
        nyc_street: row.get::<i64, _>("nyc_street") as u32,
        minimal_core: row.get::<i64, _>("minimal_core") as u32,
        designer_vintage: row.get::<i64, _>("designer_vintage") as u32,
        deal_hunter: row.get::<i64, _>("deal_hunter") as u32,
    };

    let answers: String = row.get("answers");
    let answers: QuizAnswers = serde_json::from_str(&answers)
        .map_err(|e| Error::Internal(format!("Failed to deserialize answers: {}", e)))?;

    let created_at: String = row.get("created_at");
    let created_at = parse_timestamp(&created_at, "created_at")?;

    Ok(TasteProfile {
        user_id: row.get("user_id"),
        scores,
        primary: ranked_tag(row, "primary_tag", "primary_percentage")?,
        secondary: ranked_tag(row, "secondary_tag", "secondary_percentage")?,
        tertiary: ranked_tag(row, "tertiary_tag", "tertiary_percentage")?,
        answers,
        created_at,
    })
}

fn ranked_tag(row: &SqliteRow, tag_column: &str, percentage_column: &str) -> Result<RankedTag> {
    let tag: String = row.get(tag_column);
    let tag = TasteTag::from_str(&tag)
        .ok_or_else(|| Error::Internal(format!("Unknown taste tag: {}", tag)))?;

    Ok(RankedTag {
        tag,
        percentage: row.get::<i64, _>(percentage_column) as u32,
    })
}
