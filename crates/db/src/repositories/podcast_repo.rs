//! Repository for the `podcasts` table.

use sqlx::PgPool;
use masterclass_core::types::DbId;

use crate::models::content::{CreatePodcast, Podcast, UpdatePodcast};

const COLUMNS: &str = "id, title, description, audio_url, duration_secs, is_published, \
                        published_at, created_at, updated_at";

pub struct PodcastRepo;

impl PodcastRepo {
    pub async fn create(pool: &PgPool, input: &CreatePodcast) -> Result<Podcast, sqlx::Error> {
        let query = format!(
            "INSERT INTO podcasts (title, description, audio_url, duration_secs, is_published, published_at)
             VALUES ($1, $2, $3, $4, $5, CASE WHEN $5 THEN NOW() END)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Podcast>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.audio_url)
            .bind(input.duration_secs)
            .bind(input.is_published)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Podcast>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM podcasts WHERE id = $1");
        sqlx::query_as::<_, Podcast>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Published episodes, newest first.
    pub async fn list_published(pool: &PgPool) -> Result<Vec<Podcast>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM podcasts
             WHERE is_published = true
             ORDER BY published_at DESC NULLS LAST, id DESC"
        );
        sqlx::query_as::<_, Podcast>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePodcast,
    ) -> Result<Option<Podcast>, sqlx::Error> {
        let query = format!(
            "UPDATE podcasts SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                audio_url = COALESCE($4, audio_url),
                duration_secs = COALESCE($5, duration_secs),
                is_published = COALESCE($6, is_published),
                published_at = CASE
                    WHEN COALESCE($6, is_published) AND published_at IS NULL THEN NOW()
                    ELSE published_at
                END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Podcast>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.audio_url)
            .bind(input.duration_secs)
            .bind(input.is_published)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM podcasts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
