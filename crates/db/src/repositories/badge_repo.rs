//! Repository for the `badges` and `user_badges` tables.

use serde_json::json;
use sqlx::PgPool;
use masterclass_core::badge::BadgeRarity;
use masterclass_core::timeline::TimelineEventKind;
use masterclass_core::types::DbId;

use crate::models::badge::{
    AwardOutcome, Badge, BadgeWithAwards, CreateBadge, MemberBadge, UpdateBadge, UserBadge,
};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

const COLUMNS: &str = "id, name, description, category, rarity, points, icon, is_active, \
                        created_at, updated_at";

/// Badge columns qualified with the `b` alias, for joins.
const B_COLUMNS: &str = "b.id, b.name, b.description, b.category, b.rarity, b.points, b.icon, \
                          b.is_active, b.created_at, b.updated_at";

const USER_BADGE_COLUMNS: &str = "id, user_id, badge_id, awarded_by, earned_at, created_at, updated_at";

/// Point transaction source type for badge rewards.
pub const POINT_SOURCE_BADGE: &str = "badge";

// ---------------------------------------------------------------------------
// BadgeRepo
// ---------------------------------------------------------------------------

/// Badge catalogue and awards.
pub struct BadgeRepo;

impl BadgeRepo {
    pub async fn create(pool: &PgPool, input: &CreateBadge) -> Result<Badge, sqlx::Error> {
        let query = format!(
            "INSERT INTO badges (name, description, category, rarity, points, icon)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Badge>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.category.as_str())
            .bind(input.rarity.unwrap_or(BadgeRarity::Common).as_str())
            .bind(input.points)
            .bind(&input.icon)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Badge>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM badges WHERE id = $1");
        sqlx::query_as::<_, Badge>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Active badges ordered by category, then points.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Badge>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM badges WHERE is_active = true ORDER BY category, points, name"
        );
        sqlx::query_as::<_, Badge>(&query).fetch_all(pool).await
    }

    /// Every badge with its award count, for the admin list and export.
    pub async fn list_with_awards(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BadgeWithAwards>, sqlx::Error> {
        let query = format!(
            "SELECT {B_COLUMNS},
                    (SELECT COUNT(*) FROM user_badges ub WHERE ub.badge_id = b.id) AS awarded_count
             FROM badges b
             ORDER BY b.created_at DESC, b.id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, BadgeWithAwards>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM badges")
            .fetch_one(pool)
            .await
    }

    /// The active catalogue as seen by one member, with `earned_at` set on
    /// earned badges. Inactive badges the member already holds are included.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<MemberBadge>, sqlx::Error> {
        let query = format!(
            "SELECT {B_COLUMNS}, ub.earned_at
             FROM badges b
             LEFT JOIN user_badges ub ON ub.badge_id = b.id AND ub.user_id = $1
             WHERE b.is_active = true OR ub.id IS NOT NULL
             ORDER BY ub.earned_at DESC NULLS LAST, b.category, b.points"
        );
        sqlx::query_as::<_, MemberBadge>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a badge. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBadge,
    ) -> Result<Option<Badge>, sqlx::Error> {
        let query = format!(
            "UPDATE badges SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                rarity = COALESCE($5, rarity),
                points = COALESCE($6, points),
                icon = COALESCE($7, icon),
                is_active = COALESCE($8, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Badge>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.category.map(|c| c.as_str()))
            .bind(input.rarity.map(|r| r.as_str()))
            .bind(input.points)
            .bind(&input.icon)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM badges WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Award `badge` to a member.
    ///
    /// Idempotent: when the member already holds the badge the existing row is
    /// returned with `newly_awarded = false` and nothing else is written. A new
    /// award credits the badge points and adds a timeline event in the same
    /// transaction.
    pub async fn award(
        pool: &PgPool,
        badge: &Badge,
        user_id: DbId,
        awarded_by: Option<DbId>,
    ) -> Result<AwardOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert = format!(
            "INSERT INTO user_badges (user_id, badge_id, awarded_by)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_user_badges_user_badge DO NOTHING
             RETURNING {USER_BADGE_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, UserBadge>(&insert)
            .bind(user_id)
            .bind(badge.id)
            .bind(awarded_by)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(user_badge) = inserted else {
            let select = format!(
                "SELECT {USER_BADGE_COLUMNS} FROM user_badges WHERE user_id = $1 AND badge_id = $2"
            );
            let existing = sqlx::query_as::<_, UserBadge>(&select)
                .bind(user_id)
                .bind(badge.id)
                .fetch_one(&mut *tx)
                .await?;
            tx.commit().await?;
            return Ok(AwardOutcome {
                user_badge: existing,
                newly_awarded: false,
            });
        };

        if badge.points > 0 {
            sqlx::query(
                "INSERT INTO point_transactions (user_id, points, reason, source_type, source_id)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(user_id)
            .bind(badge.points)
            .bind(format!("Badge obtenu : {}", badge.name))
            .bind(POINT_SOURCE_BADGE)
            .bind(badge.id)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            "INSERT INTO timeline_events (user_id, kind, title, description, occurred_at, metadata)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user_id)
        .bind(TimelineEventKind::Badge.as_str())
        .bind(format!("Badge obtenu : {}", badge.name))
        .bind(&badge.description)
        .bind(user_badge.earned_at)
        .bind(json!({ "badge_id": badge.id, "points": badge.points }))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(AwardOutcome {
            user_badge,
            newly_awarded: true,
        })
    }
}
