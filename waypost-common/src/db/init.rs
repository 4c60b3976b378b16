//! Database initialization
//!
//! Opens (or creates) the catalogue database and brings the schema up to
//! date. All table creation is idempotent, so calling this on every startup
//! is safe.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    configure_connection(&pool).await?;
    create_points_of_interest_table(&pool).await?;

    Ok(pool)
}

/// Initialize an in-memory database (tests and dry runs)
///
/// Pinned to a single pooled connection: every connection to `:memory:`
/// opens its own empty database, so the pool must never open a second one.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect("sqlite::memory:")
        .await?;
    configure_connection(&pool).await?;
    create_points_of_interest_table(&pool).await?;
    Ok(pool)
}

async fn configure_connection(pool: &SqlitePool) -> Result<()> {
    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    // WAL mode allows concurrent readers while the importer writes
    sqlx::query("PRAGMA journal_mode = WAL").execute(pool).await?;

    // Set busy timeout so sibling processes retry instead of failing fast
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the points_of_interest table
///
/// Stores the canonical PoI entity. `external_id` is the natural key used
/// for insert-or-replace during import; the CHECK constraints are the final
/// guard on coordinate ranges at the store boundary.
pub async fn create_points_of_interest_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS points_of_interest (
            guid TEXT PRIMARY KEY,
            external_id TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            category TEXT NOT NULL DEFAULT '',
            ratings_raw TEXT NOT NULL DEFAULT '',
            average_rating REAL,
            description TEXT,
            source_file TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (latitude >= -90.0 AND latitude <= 90.0),
            CHECK (longitude >= -180.0 AND longitude <= 180.0),
            CHECK (length(external_id) > 0),
            CHECK (length(name) > 0),
            CHECK (average_rating IS NULL OR (average_rating >= 0.0))
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_poi_external_id ON points_of_interest(external_id)",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_poi_category ON points_of_interest(category)")
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_poi_average_rating ON points_of_interest(average_rating)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn init_creates_database_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let db_path = dir.path().join("catalogue").join("waypost.db");

        let pool = init_database(&db_path).await.unwrap();
        assert!(db_path.exists());

        // Schema is queryable immediately after init
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM points_of_interest")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn init_is_idempotent() {
        let pool = init_memory_database().await.unwrap();
        create_points_of_interest_table(&pool).await.unwrap();
        create_points_of_interest_table(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn check_constraint_rejects_out_of_range_latitude() {
        let pool = init_memory_database().await.unwrap();
        let result = sqlx::query(
            "INSERT INTO points_of_interest (guid, external_id, name, latitude, longitude)
             VALUES ('g1', 'x1', 'Somewhere', 95.0, 0.0)",
        )
        .execute(&pool)
        .await;
        assert!(result.is_err());
    }
}
