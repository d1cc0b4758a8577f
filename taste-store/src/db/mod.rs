//! Database access layer
//!
//! SQLite-backed storage for users, taste profiles, and referral
//! edges. The store is the single source of truth; nothing here caches
//! ledger counts or unlock flags in memory.

use std::path::Path;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::info;

use taste_common::{config, Result};

pub mod profiles;
pub mod referrals;
pub mod users;

/// Open the database at its configured location
///
/// Resolves the data folder (explicit argument, environment, config
/// file, then the platform default), creates it if needed, and opens
/// the database inside it.
pub async fn init_database_from_config(explicit_dir: Option<&str>) -> Result<SqlitePool> {
    let data_dir = config::resolve_data_dir(explicit_dir);
    config::ensure_data_dir(&data_dir)?;
    init_database(&config::database_path(&data_dir)).await
}

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create tables and indexes (idempotent, safe to call repeatedly)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_users_table(pool).await?;
    create_profiles_table(pool).await?;
    create_referral_edges_table(pool).await?;
    Ok(())
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS taste_users (
            user_id TEXT PRIMARY KEY,
            referrer_id TEXT,
            quiz_completed_at TEXT,
            unlock_status TEXT NOT NULL DEFAULT 'locked'
                CHECK (unlock_status IN ('locked', 'unlocked')),
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_profiles_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS taste_profiles (
            user_id TEXT PRIMARY KEY,
            paris_archive INTEGER NOT NULL DEFAULT 0,
            nyc_street INTEGER NOT NULL DEFAULT 0,
            minimal_core INTEGER NOT NULL DEFAULT 0,
            designer_vintage INTEGER NOT NULL DEFAULT 0,
            deal_hunter INTEGER NOT NULL DEFAULT 0,
            primary_tag TEXT NOT NULL,
            primary_percentage INTEGER NOT NULL,
            secondary_tag TEXT NOT NULL,
            secondary_percentage INTEGER NOT NULL,
            tertiary_tag TEXT NOT NULL,
            tertiary_percentage INTEGER NOT NULL,
            answers TEXT NOT NULL,
            created_at TEXT NOT NULL,
            CHECK (paris_archive >= 0),
            CHECK (nyc_street >= 0),
            CHECK (minimal_core >= 0),
            CHECK (designer_vintage >= 0),
            CHECK (deal_hunter >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_referral_edges_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS referral_edges (
            referrer_id TEXT NOT NULL,
            referred_id TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'clicked'
                CHECK (status IN ('clicked', 'completed')),
            completed_at TEXT,
            created_at TEXT NOT NULL,
            PRIMARY KEY (referrer_id, referred_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Completed-count and friend queries filter by referrer
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_referral_edges_referrer ON referral_edges(referrer_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
