//! Repository for the append-only `activity_logs` table.

use sqlx::PgPool;
use masterclass_core::types::DbId;

use crate::models::activity_log::{ActivityLog, CreateActivityLog};

/// Log columns joined with the admin's display name (alias `l`, users `u`).
const COLUMNS: &str = "l.id, l.admin_id, (u.first_name || ' ' || u.last_name) AS admin_name, \
                        l.action_type, l.entity_type, l.entity_id, l.details, l.created_at";

pub struct ActivityLogRepo;

impl ActivityLogRepo {
    /// Append one entry.
    pub async fn append(pool: &PgPool, input: &CreateActivityLog) -> Result<ActivityLog, sqlx::Error> {
        let query = format!(
            "WITH l AS (
                INSERT INTO activity_logs (admin_id, action_type, entity_type, entity_id, details)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
             )
             SELECT {COLUMNS} FROM l LEFT JOIN users u ON u.id = l.admin_id"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(input.admin_id)
            .bind(&input.action_type)
            .bind(&input.entity_type)
            .bind(input.entity_id)
            .bind(&input.details)
            .fetch_one(pool)
            .await
    }

    /// One page of entries, newest first.
    pub async fn list_page(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_logs l
             LEFT JOIN users u ON u.id = l.admin_id
             ORDER BY l.created_at DESC, l.id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM activity_logs")
            .fetch_one(pool)
            .await
    }

    /// Entries touching one entity, newest first.
    pub async fn list_for_entity(
        pool: &PgPool,
        entity_type: &str,
        entity_id: DbId,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_logs l
             LEFT JOIN users u ON u.id = l.admin_id
             WHERE l.entity_type = $1 AND l.entity_id = $2
             ORDER BY l.created_at DESC, l.id DESC"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .fetch_all(pool)
            .await
    }
}
