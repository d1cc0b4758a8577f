//! Integration tests for the service operations
//!
//! Each test runs against a fresh in-memory SQLite database with the
//! real schema, exercising the full path from validation through the
//! unlock cascade.

use std::time::Duration;

use sqlx::SqlitePool;
use taste_common::quiz::QuizAnswers;
use taste_common::{Error, TasteTag};
use taste_store::models::EdgeStatus;
use taste_store::{db, service};

/// Test helper: fresh in-memory database with the full schema
async fn setup_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Should connect to in-memory database");
    db::create_schema(&pool).await.expect("Should create schema");
    pool
}

fn answers(entries: &[(u32, &str)]) -> QuizAnswers {
    entries
        .iter()
        .map(|&(id, option)| (id, option.to_string()))
        .collect()
}

/// All-paris answer set from the quiz definition
fn paris_answers() -> QuizAnswers {
    answers(&[(1, "A"), (2, "A"), (3, "D"), (4, "A"), (5, "A")])
}

// =============================================================================
// create-or-get user
// =============================================================================

#[tokio::test]
async fn test_create_user_generates_prefixed_id() {
    let pool = setup_pool().await;

    let user = service::create_or_get_user(&pool, None, None).await.unwrap();

    assert!(user.user_id.starts_with("tm_"));
    assert_eq!(user.user_id.len(), 12);
    assert_eq!(user.referrer_id, None);
    assert!(user.quiz_completed_at.is_none());
    assert_eq!(user.unlock_status, taste_store::UnlockStatus::Locked);
}

#[tokio::test]
async fn test_create_user_is_idempotent() {
    let pool = setup_pool().await;

    let first = service::create_or_get_user(&pool, Some("tm_aaaaaaaaa"), Some("tm_referrer1"))
        .await
        .unwrap();
    // Second create with a different referrer must not overwrite anything
    let second = service::create_or_get_user(&pool, Some("tm_aaaaaaaaa"), Some("tm_referrer2"))
        .await
        .unwrap();

    assert_eq!(second.user_id, first.user_id);
    assert_eq!(second.referrer_id.as_deref(), Some("tm_referrer1"));
    assert_eq!(second.created_at, first.created_at);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM taste_users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_create_with_referrer_records_clicked_edge() {
    let pool = setup_pool().await;

    service::create_or_get_user(&pool, Some("tm_referrer1"), None)
        .await
        .unwrap();
    service::create_or_get_user(&pool, Some("tm_referred1"), Some("tm_referrer1"))
        .await
        .unwrap();

    let edge = db::referrals::get_edge(&pool, "tm_referrer1", "tm_referred1")
        .await
        .unwrap()
        .expect("Edge should exist");
    assert_eq!(edge.status, EdgeStatus::Clicked);
    assert!(edge.completed_at.is_none());
}

#[tokio::test]
async fn test_existing_user_gains_no_edge_from_later_referrer() {
    let pool = setup_pool().await;

    service::create_or_get_user(&pool, Some("tm_veteran11"), None)
        .await
        .unwrap();
    // Arriving later through someone's invite link must not attach an edge
    service::create_or_get_user(&pool, Some("tm_veteran11"), Some("tm_referrer1"))
        .await
        .unwrap();

    let edge = db::referrals::get_edge(&pool, "tm_referrer1", "tm_veteran11")
        .await
        .unwrap();
    assert!(edge.is_none());
}

#[tokio::test]
async fn test_get_user_not_found() {
    let pool = setup_pool().await;

    let result = service::get_user(&pool, "tm_nobody123").await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

// =============================================================================
// submit quiz
// =============================================================================

#[tokio::test]
async fn test_submit_rejects_missing_fields() {
    let pool = setup_pool().await;

    let result = service::submit_quiz(&pool, "", &paris_answers()).await;
    assert!(matches!(result, Err(Error::InvalidInput(_))));

    let result = service::submit_quiz(&pool, "tm_bbbbbbbbb", &QuizAnswers::new()).await;
    assert!(matches!(result, Err(Error::InvalidInput(_))));

    // Validation failures never touch the store
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM taste_profiles")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_submit_computes_and_persists_profile() {
    let pool = setup_pool().await;
    service::create_or_get_user(&pool, Some("tm_ccccccccc"), None)
        .await
        .unwrap();

    let profile = service::submit_quiz(&pool, "tm_ccccccccc", &paris_answers())
        .await
        .unwrap();

    assert_eq!(profile.scores.paris_archive, 10);
    assert_eq!(profile.scores.total(), 10);
    assert_eq!(profile.primary.tag, TasteTag::ParisArchive);
    assert_eq!(profile.primary.percentage, 100);
    assert_eq!(profile.secondary.percentage, 0);
    assert_eq!(profile.tertiary.percentage, 0);
    assert_eq!(profile.answers, paris_answers());

    let stored = service::get_profile(&pool, "tm_ccccccccc").await.unwrap();
    assert_eq!(stored.scores, profile.scores);

    let user = service::get_user(&pool, "tm_ccccccccc").await.unwrap();
    assert!(user.quiz_completed_at.is_some());
}

#[tokio::test]
async fn test_submit_creates_user_row_when_missing() {
    let pool = setup_pool().await;

    service::submit_quiz(&pool, "tm_ddddddddd", &answers(&[(2, "B")]))
        .await
        .unwrap();

    let user = service::get_user(&pool, "tm_ddddddddd").await.unwrap();
    assert_eq!(user.referrer_id, None);
    assert!(user.quiz_completed_at.is_some());
}

#[tokio::test]
async fn test_submit_twice_overwrites_single_row() {
    let pool = setup_pool().await;

    let first = service::submit_quiz(&pool, "tm_eeeeeeeee", &paris_answers())
        .await
        .unwrap();
    let second = service::submit_quiz(&pool, "tm_eeeeeeeee", &paris_answers())
        .await
        .unwrap();

    assert_eq!(second.scores, first.scores);
    assert_eq!(second.primary, first.primary);
    assert_eq!(second.answers, first.answers);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM taste_profiles")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    // Different answers overwrite in place
    let third = service::submit_quiz(&pool, "tm_eeeeeeeee", &answers(&[(2, "B")]))
        .await
        .unwrap();
    assert_eq!(third.scores.deal_hunter, 2);
    assert_eq!(third.scores.paris_archive, 0);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM taste_profiles")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_submit_with_unknown_option_falls_back_to_default_ranking() {
    let pool = setup_pool().await;

    let profile = service::submit_quiz(&pool, "tm_fffffffff", &answers(&[(1, "Z")]))
        .await
        .unwrap();

    assert_eq!(profile.scores.total(), 0);
    assert_eq!(profile.primary.tag, TasteTag::MinimalCore);
    assert_eq!(profile.primary.percentage, 34);
    assert_eq!(profile.secondary.tag, TasteTag::ParisArchive);
    assert_eq!(profile.secondary.percentage, 33);
}

#[tokio::test]
async fn test_get_profile_not_found() {
    let pool = setup_pool().await;

    let result = service::get_profile(&pool, "tm_nobody123").await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

// =============================================================================
// referral ledger and unlock
// =============================================================================

#[tokio::test]
async fn test_unlock_after_two_completed_referrals() {
    let pool = setup_pool().await;

    service::create_or_get_user(&pool, Some("tm_referrer1"), None)
        .await
        .unwrap();
    service::create_or_get_user(&pool, Some("tm_friend_a1"), Some("tm_referrer1"))
        .await
        .unwrap();
    service::create_or_get_user(&pool, Some("tm_friend_b1"), Some("tm_referrer1"))
        .await
        .unwrap();

    // First completion: still locked
    service::submit_quiz(&pool, "tm_friend_a1", &paris_answers())
        .await
        .unwrap();
    let status = service::get_referral_status(&pool, "tm_referrer1")
        .await
        .unwrap();
    assert_eq!(status.completed_count, 1);
    assert!(!status.is_unlocked);
    assert_eq!(status.friends.len(), 1);

    tokio::time::sleep(Duration::from_millis(5)).await;

    // Second completion crosses the threshold
    service::submit_quiz(&pool, "tm_friend_b1", &answers(&[(1, "B"), (4, "B")]))
        .await
        .unwrap();
    let status = service::get_referral_status(&pool, "tm_referrer1")
        .await
        .unwrap();
    assert_eq!(status.completed_count, 2);
    assert!(status.is_unlocked);

    // Most recently completed first
    assert_eq!(status.friends.len(), 2);
    assert_eq!(status.friends[0].user_id, "tm_friend_b1");
    assert_eq!(status.friends[1].user_id, "tm_friend_a1");

    let referrer = service::get_user(&pool, "tm_referrer1").await.unwrap();
    assert_eq!(referrer.unlock_status, taste_store::UnlockStatus::Unlocked);
}

#[tokio::test]
async fn test_resubmission_does_not_double_count() {
    let pool = setup_pool().await;

    service::create_or_get_user(&pool, Some("tm_referrer1"), None)
        .await
        .unwrap();
    service::create_or_get_user(&pool, Some("tm_friend_a1"), Some("tm_referrer1"))
        .await
        .unwrap();

    service::submit_quiz(&pool, "tm_friend_a1", &paris_answers())
        .await
        .unwrap();
    let edge_before = db::referrals::get_edge(&pool, "tm_referrer1", "tm_friend_a1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(edge_before.status, EdgeStatus::Completed);

    tokio::time::sleep(Duration::from_millis(5)).await;

    service::submit_quiz(&pool, "tm_friend_a1", &answers(&[(3, "A")]))
        .await
        .unwrap();

    let status = service::get_referral_status(&pool, "tm_referrer1")
        .await
        .unwrap();
    assert_eq!(status.completed_count, 1);
    assert!(!status.is_unlocked);

    // Completion timestamp is fixed at the first transition
    let edge_after = db::referrals::get_edge(&pool, "tm_referrer1", "tm_friend_a1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(edge_after.completed_at, edge_before.completed_at);
}

#[tokio::test]
async fn test_referral_status_for_unknown_user_defaults() {
    let pool = setup_pool().await;

    let status = service::get_referral_status(&pool, "tm_nobody123")
        .await
        .unwrap();
    assert_eq!(status.completed_count, 0);
    assert!(!status.is_unlocked);
    assert!(status.friends.is_empty());
}

#[tokio::test]
async fn test_cascade_with_missing_referrer_row_is_noop() {
    let pool = setup_pool().await;

    // The referrer id was never created as a user; only the edge exists
    service::create_or_get_user(&pool, Some("tm_friend_a1"), Some("tm_ghost0000"))
        .await
        .unwrap();

    // Submission must succeed despite the unfinishable referrer bookkeeping
    service::submit_quiz(&pool, "tm_friend_a1", &paris_answers())
        .await
        .unwrap();

    let status = service::get_referral_status(&pool, "tm_ghost0000")
        .await
        .unwrap();
    assert_eq!(status.completed_count, 1);
    assert!(!status.is_unlocked);
    assert_eq!(status.friends.len(), 1);
}

#[tokio::test]
async fn test_status_read_repairs_lagging_unlock_flag() {
    let pool = setup_pool().await;

    service::create_or_get_user(&pool, Some("tm_referrer1"), None)
        .await
        .unwrap();
    service::create_or_get_user(&pool, Some("tm_friend_a1"), Some("tm_referrer1"))
        .await
        .unwrap();
    service::create_or_get_user(&pool, Some("tm_friend_b1"), Some("tm_referrer1"))
        .await
        .unwrap();
    service::submit_quiz(&pool, "tm_friend_a1", &paris_answers())
        .await
        .unwrap();
    service::submit_quiz(&pool, "tm_friend_b1", &paris_answers())
        .await
        .unwrap();

    // Manufacture drift: force the flag back as if a cascade was skipped
    sqlx::query("UPDATE taste_users SET unlock_status = 'locked' WHERE user_id = 'tm_referrer1'")
        .execute(&pool)
        .await
        .unwrap();

    let status = service::get_referral_status(&pool, "tm_referrer1")
        .await
        .unwrap();
    assert_eq!(status.completed_count, 2);
    assert!(status.is_unlocked, "read path should repair the flag");

    let referrer = service::get_user(&pool, "tm_referrer1").await.unwrap();
    assert_eq!(referrer.unlock_status, taste_store::UnlockStatus::Unlocked);
}

#[tokio::test]
async fn test_unlock_is_monotonic_across_further_completions() {
    let pool = setup_pool().await;

    service::create_or_get_user(&pool, Some("tm_referrer1"), None)
        .await
        .unwrap();
    for friend in ["tm_friend_a1", "tm_friend_b1", "tm_friend_c1"] {
        service::create_or_get_user(&pool, Some(friend), Some("tm_referrer1"))
            .await
            .unwrap();
        service::submit_quiz(&pool, friend, &paris_answers())
            .await
            .unwrap();
    }

    let status = service::get_referral_status(&pool, "tm_referrer1")
        .await
        .unwrap();
    assert_eq!(status.completed_count, 3);
    assert!(status.is_unlocked);
}
