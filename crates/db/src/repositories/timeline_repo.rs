//! Repository for the `timeline_events` table.

use sqlx::{PgConnection, PgPool};
use masterclass_core::types::DbId;

use crate::models::timeline::{CreateTimelineEvent, TimelineEvent};

const COLUMNS: &str = "id, user_id, kind, title, description, occurred_at, metadata, \
                        created_at, updated_at";

pub struct TimelineRepo;

impl TimelineRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateTimelineEvent,
    ) -> Result<TimelineEvent, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::create_in(&mut conn, input).await
    }

    /// Insert on an open connection, usually inside a caller's transaction.
    pub(crate) async fn create_in(
        conn: &mut PgConnection,
        input: &CreateTimelineEvent,
    ) -> Result<TimelineEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO timeline_events (user_id, kind, title, description, occurred_at, metadata)
             VALUES ($1, $2, $3, $4, COALESCE($5, NOW()), $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TimelineEvent>(&query)
            .bind(input.user_id)
            .bind(input.kind.as_str())
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.occurred_at)
            .bind(&input.metadata)
            .fetch_one(conn)
            .await
    }

    /// A member's events, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<TimelineEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM timeline_events
             WHERE user_id = $1
             ORDER BY occurred_at DESC, id DESC"
        );
        sqlx::query_as::<_, TimelineEvent>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
