//! Repository for the `learning_milestones` table.

use sqlx::PgPool;
use masterclass_core::types::DbId;

use crate::models::milestone::{CreateMilestone, LearningMilestone, UpdateMilestone};

const COLUMNS: &str = "id, title, description, position, points_required, icon, created_at, updated_at";

pub struct MilestoneRepo;

impl MilestoneRepo {
    /// All milestones in learning-path order.
    pub async fn list(pool: &PgPool) -> Result<Vec<LearningMilestone>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM learning_milestones ORDER BY position ASC");
        sqlx::query_as::<_, LearningMilestone>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        input: &CreateMilestone,
    ) -> Result<LearningMilestone, sqlx::Error> {
        let query = format!(
            "INSERT INTO learning_milestones (title, description, position, points_required, icon)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LearningMilestone>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.position)
            .bind(input.points_required)
            .bind(&input.icon)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMilestone,
    ) -> Result<Option<LearningMilestone>, sqlx::Error> {
        let query = format!(
            "UPDATE learning_milestones SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                position = COALESCE($4, position),
                points_required = COALESCE($5, points_required),
                icon = COALESCE($6, icon)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LearningMilestone>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.position)
            .bind(input.points_required)
            .bind(&input.icon)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM learning_milestones WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
