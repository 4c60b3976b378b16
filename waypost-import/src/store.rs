//! Upsert store operations
//!
//! Persistence for normalized records, keyed by `external_id`. The upsert is
//! an explicit lookup-then-branch (insert or full-field replace) so the
//! transaction boundary stays visible to the caller: the orchestrator runs
//! every upsert for one file inside a single transaction.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::warn;
use uuid::Uuid;
use waypost_common::db::{NewPointOfInterest, PointOfInterest};

/// Result of one upsert attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// First import of this external id
    Created,
    /// Existing record fully replaced
    Updated,
    /// Entity-level validation failed at the store boundary; nothing written
    Rejected,
}

/// Insert or fully replace the record stored under its external id.
///
/// Coordinates outside the declared ranges reject the entity before any
/// write. The rejection is logged but, like a row skip, stays silent to the
/// batch. On replace every mutable field is overwritten, so a blank incoming
/// description erases a previously stored one. `created_at` is set once at
/// first insert; `updated_at` refreshes on every write.
pub async fn upsert(
    conn: &mut SqliteConnection,
    record: &NewPointOfInterest,
) -> Result<UpsertOutcome> {
    if !record.coordinates_in_range() {
        warn!(
            external_id = %record.external_id,
            latitude = record.latitude,
            longitude = record.longitude,
            "rejecting record with out-of-range coordinates"
        );
        return Ok(UpsertOutcome::Rejected);
    }

    let now = Utc::now().to_rfc3339();

    let existing: Option<String> =
        sqlx::query_scalar("SELECT guid FROM points_of_interest WHERE external_id = ?")
            .bind(&record.external_id)
            .fetch_optional(&mut *conn)
            .await?;

    match existing {
        None => {
            sqlx::query(
                r#"
                INSERT INTO points_of_interest
                    (guid, external_id, name, latitude, longitude, category,
                     ratings_raw, average_rating, description, source_file,
                     created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&record.external_id)
            .bind(&record.name)
            .bind(record.latitude)
            .bind(record.longitude)
            .bind(&record.category)
            .bind(&record.ratings_raw)
            .bind(record.average_rating)
            .bind(&record.description)
            .bind(&record.source_file)
            .bind(&now)
            .bind(&now)
            .execute(&mut *conn)
            .await?;

            Ok(UpsertOutcome::Created)
        }
        Some(guid) => {
            sqlx::query(
                r#"
                UPDATE points_of_interest SET
                    name = ?,
                    latitude = ?,
                    longitude = ?,
                    category = ?,
                    ratings_raw = ?,
                    average_rating = ?,
                    description = ?,
                    source_file = ?,
                    updated_at = ?
                WHERE guid = ?
                "#,
            )
            .bind(&record.name)
            .bind(record.latitude)
            .bind(record.longitude)
            .bind(&record.category)
            .bind(&record.ratings_raw)
            .bind(record.average_rating)
            .bind(&record.description)
            .bind(&record.source_file)
            .bind(&now)
            .bind(&guid)
            .execute(&mut *conn)
            .await?;

            Ok(UpsertOutcome::Updated)
        }
    }
}

/// Remove every stored record; used by the explicit `--clear` flag before
/// any file in the batch is processed
pub async fn clear_all(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM points_of_interest")
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Look up a stored record by its external id
pub async fn find_by_external_id(
    pool: &SqlitePool,
    external_id: &str,
) -> Result<Option<PointOfInterest>> {
    let row = sqlx::query(
        r#"
        SELECT guid, external_id, name, latitude, longitude, category,
               ratings_raw, average_rating, description, source_file,
               created_at, updated_at
        FROM points_of_interest
        WHERE external_id = ?
        "#,
    )
    .bind(external_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let guid_str: String = row.get("guid");
            let guid = Uuid::parse_str(&guid_str)?;

            let created_at_str: String = row.get("created_at");
            let created_at = DateTime::parse_from_rfc3339(&created_at_str)?.with_timezone(&Utc);
            let updated_at_str: String = row.get("updated_at");
            let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)?.with_timezone(&Utc);

            Ok(Some(PointOfInterest {
                guid,
                external_id: row.get("external_id"),
                name: row.get("name"),
                latitude: row.get("latitude"),
                longitude: row.get("longitude"),
                category: row.get("category"),
                ratings_raw: row.get("ratings_raw"),
                average_rating: row.get("average_rating"),
                description: row.get("description"),
                source_file: row.get("source_file"),
                created_at,
                updated_at,
            }))
        }
        None => Ok(None),
    }
}

/// Total number of stored records
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM points_of_interest")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
