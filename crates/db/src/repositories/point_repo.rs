//! Repository for the `point_transactions` ledger.

use sqlx::PgPool;
use masterclass_core::types::DbId;

use crate::models::points::{CreatePointTransaction, PointTransaction};

const COLUMNS: &str = "id, user_id, points, reason, source_type, source_id, created_at, updated_at";

pub struct PointRepo;

impl PointRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreatePointTransaction,
    ) -> Result<PointTransaction, sqlx::Error> {
        let query = format!(
            "INSERT INTO point_transactions (user_id, points, reason, source_type, source_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PointTransaction>(&query)
            .bind(input.user_id)
            .bind(input.points)
            .bind(&input.reason)
            .bind(&input.source_type)
            .bind(input.source_id)
            .fetch_one(pool)
            .await
    }

    /// Cumulative point balance of a member. Zero without transactions.
    pub async fn total_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(points), 0)::BIGINT FROM point_transactions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// A member's ledger, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<PointTransaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM point_transactions
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, PointTransaction>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
