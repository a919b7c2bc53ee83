//! Repository for the `formations` and `formation_sessions` tables.

use sqlx::PgPool;
use masterclass_core::types::DbId;

use crate::models::formation::{
    CreateFormation, CreateFormationSession, Formation, FormationSession, FormationWithSessions,
    UpdateFormation, UpdateFormationSession,
};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

const COLUMNS: &str = "id, title, slug, description, level, price_cents, duration_hours, \
                        image_url, is_published, created_at, updated_at";

const SESSION_COLUMNS: &str = "id, formation_id, starts_at, ends_at, location, capacity, \
                                seats_taken, created_at, updated_at";

// ---------------------------------------------------------------------------
// FormationRepo
// ---------------------------------------------------------------------------

/// Formation catalogue.
pub struct FormationRepo;

impl FormationRepo {
    pub async fn create(pool: &PgPool, input: &CreateFormation) -> Result<Formation, sqlx::Error> {
        let query = format!(
            "INSERT INTO formations
                (title, slug, description, level, price_cents, duration_hours, image_url, is_published)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Formation>(&query)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(input.level.as_str())
            .bind(input.price_cents)
            .bind(input.duration_hours)
            .bind(&input.image_url)
            .bind(input.is_published)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Formation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM formations WHERE id = $1");
        sqlx::query_as::<_, Formation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Formation with its sessions embedded, ordered by start date.
    ///
    /// With `published_only`, unpublished formations read as missing.
    pub async fn find_with_sessions(
        pool: &PgPool,
        id: DbId,
        published_only: bool,
    ) -> Result<Option<FormationWithSessions>, sqlx::Error> {
        let Some(formation) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        if published_only && !formation.is_published {
            return Ok(None);
        }
        let sessions = FormationSessionRepo::list_for_formation(pool, id).await?;
        Ok(Some(FormationWithSessions { formation, sessions }))
    }

    /// Published formations for the public catalogue, alphabetical.
    pub async fn list_published(pool: &PgPool) -> Result<Vec<Formation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM formations WHERE is_published = true ORDER BY title ASC"
        );
        sqlx::query_as::<_, Formation>(&query).fetch_all(pool).await
    }

    /// One page of the admin list, newest first.
    pub async fn list_page(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Formation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM formations
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Formation>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM formations")
            .fetch_one(pool)
            .await
    }

    /// Update a formation. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFormation,
    ) -> Result<Option<Formation>, sqlx::Error> {
        let query = format!(
            "UPDATE formations SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                level = COALESCE($5, level),
                price_cents = COALESCE($6, price_cents),
                duration_hours = COALESCE($7, duration_hours),
                image_url = COALESCE($8, image_url),
                is_published = COALESCE($9, is_published)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Formation>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(input.level.map(|l| l.as_str()))
            .bind(input.price_cents)
            .bind(input.duration_hours)
            .bind(&input.image_url)
            .bind(input.is_published)
            .fetch_optional(pool)
            .await
    }

    /// Delete a formation and, by cascade, its sessions.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM formations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// FormationSessionRepo
// ---------------------------------------------------------------------------

/// Scheduled sessions of a formation.
pub struct FormationSessionRepo;

impl FormationSessionRepo {
    pub async fn create(
        pool: &PgPool,
        formation_id: DbId,
        input: &CreateFormationSession,
    ) -> Result<FormationSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO formation_sessions (formation_id, starts_at, ends_at, location, capacity)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {SESSION_COLUMNS}"
        );
        sqlx::query_as::<_, FormationSession>(&query)
            .bind(formation_id)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(&input.location)
            .bind(input.capacity)
            .fetch_one(pool)
            .await
    }

    /// Find a session belonging to the given formation.
    pub async fn find(
        pool: &PgPool,
        formation_id: DbId,
        id: DbId,
    ) -> Result<Option<FormationSession>, sqlx::Error> {
        let query = format!(
            "SELECT {SESSION_COLUMNS} FROM formation_sessions WHERE id = $1 AND formation_id = $2"
        );
        sqlx::query_as::<_, FormationSession>(&query)
            .bind(id)
            .bind(formation_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_formation(
        pool: &PgPool,
        formation_id: DbId,
    ) -> Result<Vec<FormationSession>, sqlx::Error> {
        let query = format!(
            "SELECT {SESSION_COLUMNS} FROM formation_sessions
             WHERE formation_id = $1
             ORDER BY starts_at ASC, id ASC"
        );
        sqlx::query_as::<_, FormationSession>(&query)
            .bind(formation_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        formation_id: DbId,
        id: DbId,
        input: &UpdateFormationSession,
    ) -> Result<Option<FormationSession>, sqlx::Error> {
        let query = format!(
            "UPDATE formation_sessions SET
                starts_at = COALESCE($3, starts_at),
                ends_at = COALESCE($4, ends_at),
                location = COALESCE($5, location),
                capacity = COALESCE($6, capacity),
                seats_taken = COALESCE($7, seats_taken)
             WHERE id = $1 AND formation_id = $2
             RETURNING {SESSION_COLUMNS}"
        );
        sqlx::query_as::<_, FormationSession>(&query)
            .bind(id)
            .bind(formation_id)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(&input.location)
            .bind(input.capacity)
            .bind(input.seats_taken)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, formation_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM formation_sessions WHERE id = $1 AND formation_id = $2")
            .bind(id)
            .bind(formation_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
