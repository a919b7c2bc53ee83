//! Repository for the `satisfaction_surveys` table.

use sqlx::PgPool;
use masterclass_core::types::DbId;

use crate::models::satisfaction::{CreateSatisfactionSurvey, SatisfactionSurvey};

const COLUMNS: &str = "id, formation_id, user_id, respondent_name, respondent_email, rating, \
                        recommendation, comment, created_at, updated_at";

pub struct SatisfactionRepo;

impl SatisfactionRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: Option<DbId>,
        input: &CreateSatisfactionSurvey,
    ) -> Result<SatisfactionSurvey, sqlx::Error> {
        let query = format!(
            "INSERT INTO satisfaction_surveys
                (formation_id, user_id, respondent_name, respondent_email, rating, recommendation, comment)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SatisfactionSurvey>(&query)
            .bind(input.formation_id)
            .bind(user_id)
            .bind(&input.respondent_name)
            .bind(&input.respondent_email)
            .bind(input.rating)
            .bind(input.recommendation)
            .bind(&input.comment)
            .fetch_one(pool)
            .await
    }

    /// One page of responses, newest first, optionally for one formation.
    pub async fn list_page(
        pool: &PgPool,
        formation_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SatisfactionSurvey>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM satisfaction_surveys
             WHERE ($1::BIGINT IS NULL OR formation_id = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, SatisfactionSurvey>(&query)
            .bind(formation_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, formation_id: Option<DbId>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM satisfaction_surveys
             WHERE ($1::BIGINT IS NULL OR formation_id = $1)",
        )
        .bind(formation_id)
        .fetch_one(pool)
        .await
    }

    /// Every `(rating, recommendation)` pair, the input of the statistics.
    pub async fn list_answers(
        pool: &PgPool,
        formation_id: Option<DbId>,
    ) -> Result<Vec<(i16, Option<i16>)>, sqlx::Error> {
        sqlx::query_as::<_, (i16, Option<i16>)>(
            "SELECT rating, recommendation FROM satisfaction_surveys
             WHERE ($1::BIGINT IS NULL OR formation_id = $1)",
        )
        .bind(formation_id)
        .fetch_all(pool)
        .await
    }
}
