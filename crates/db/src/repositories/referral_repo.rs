//! Repository for the `referrals` table.

use serde_json::json;
use sqlx::{PgConnection, PgPool};
use masterclass_core::referral::{cumulative_reward_points, generate_code, ReferralStatus};
use masterclass_core::timeline::TimelineEventKind;
use masterclass_core::types::DbId;

use crate::models::referral::{
    CreateReferral, Referral, ReferralStatusChange, ReferralWithReferrer,
};
use crate::models::timeline::CreateTimelineEvent;
use crate::models::user::User;
use crate::repositories::TimelineRepo;

/// `source_type` of point transactions credited for referrals.
pub const POINT_SOURCE_REFERRAL: &str = "referral";

const COLUMNS: &str = "id, referrer_id, referee_email, referee_name, referee_user_id, code, \
                        status, message, reward_points, clicked_at, registered_at, converted_at, \
                        created_at, updated_at";

/// Referral columns qualified with the `r` alias, for joins.
const R_COLUMNS: &str = "r.id, r.referrer_id, r.referee_email, r.referee_name, r.referee_user_id, \
                          r.code, r.status, r.message, r.reward_points, r.clicked_at, \
                          r.registered_at, r.converted_at, r.created_at, r.updated_at";

pub struct ReferralRepo;

impl ReferralRepo {
    pub async fn create(pool: &PgPool, input: &CreateReferral) -> Result<Referral, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::create_in(&mut conn, input).await
    }

    async fn create_in(
        conn: &mut PgConnection,
        input: &CreateReferral,
    ) -> Result<Referral, sqlx::Error> {
        let query = format!(
            "INSERT INTO referrals
                (referrer_id, referee_email, referee_name, code, message, status,
                 referee_user_id, reward_points, registered_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8,
                     CASE WHEN $6 = 'registered' THEN NOW() END)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Referral>(&query)
            .bind(input.referrer_id)
            .bind(&input.referee_email)
            .bind(&input.referee_name)
            .bind(&input.code)
            .bind(&input.message)
            .bind(input.status.as_str())
            .bind(input.referee_user_id)
            .bind(cumulative_reward_points(input.status))
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Referral>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM referrals WHERE id = $1");
        sqlx::query_as::<_, Referral>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Referral>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM referrals WHERE code = $1");
        sqlx::query_as::<_, Referral>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// A member's invitations, newest first.
    pub async fn list_for_referrer(
        pool: &PgPool,
        referrer_id: DbId,
    ) -> Result<Vec<Referral>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM referrals
             WHERE referrer_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Referral>(&query)
            .bind(referrer_id)
            .fetch_all(pool)
            .await
    }

    /// One page of the admin list with referrer names, newest first.
    pub async fn list_page_with_referrer(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReferralWithReferrer>, sqlx::Error> {
        let query = format!(
            "SELECT {R_COLUMNS},
                    (u.first_name || ' ' || u.last_name) AS referrer_name,
                    u.email AS referrer_email
             FROM referrals r
             JOIN users u ON u.id = r.referrer_id
             ORDER BY r.created_at DESC, r.id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, ReferralWithReferrer>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM referrals")
            .fetch_one(pool)
            .await
    }

    /// Move a `pending` referral to `clicked`. Other statuses are left alone.
    ///
    /// Returns `true` if the row changed.
    pub async fn mark_clicked(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE referrals SET status = 'clicked', clicked_at = NOW()
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record the registration of the referee.
    ///
    /// Only `pending` and `clicked` referrals move; `None` otherwise.
    pub async fn mark_registered(
        pool: &PgPool,
        id: DbId,
        referee_user_id: DbId,
    ) -> Result<Option<Referral>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::mark_registered_in(&mut conn, id, referee_user_id).await
    }

    async fn mark_registered_in(
        conn: &mut PgConnection,
        id: DbId,
        referee_user_id: DbId,
    ) -> Result<Option<Referral>, sqlx::Error> {
        let query = format!(
            "UPDATE referrals SET
                status = 'registered',
                referee_user_id = $2,
                registered_at = NOW(),
                reward_points = $3
             WHERE id = $1 AND status IN ('pending', 'clicked')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Referral>(&query)
            .bind(id)
            .bind(referee_user_id)
            .bind(cumulative_reward_points(ReferralStatus::Registered))
            .fetch_optional(conn)
            .await
    }

    /// Assign any status (admin action) and settle the referrer's points.
    ///
    /// The row is locked for the whole transaction, so concurrent changes
    /// apply one after the other and each credits only its own delta. The
    /// matching timestamp is stamped the first time a status is reached.
    pub async fn change_status(
        pool: &PgPool,
        id: DbId,
        status: ReferralStatus,
    ) -> Result<Option<ReferralStatusChange>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM referrals WHERE id = $1 FOR UPDATE");
        let Some(previous) = sqlx::query_as::<_, Referral>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let update = format!(
            "UPDATE referrals SET
                status = $2,
                reward_points = $3,
                clicked_at = CASE WHEN $2 = 'clicked' THEN COALESCE(clicked_at, NOW()) ELSE clicked_at END,
                registered_at = CASE WHEN $2 IN ('registered', 'converted')
                                     THEN COALESCE(registered_at, NOW()) ELSE registered_at END,
                converted_at = CASE WHEN $2 = 'converted' THEN COALESCE(converted_at, NOW()) ELSE converted_at END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let referral = sqlx::query_as::<_, Referral>(&update)
            .bind(id)
            .bind(status.as_str())
            .bind(cumulative_reward_points(status))
            .fetch_one(&mut *tx)
            .await?;

        let points_delta = referral.reward_points - previous.reward_points;
        Self::credit_referrer_in(&mut tx, &referral, points_delta).await?;

        tx.commit().await?;
        Ok(Some(ReferralStatusChange {
            previous,
            referral,
            points_delta,
        }))
    }

    /// Complete the referral behind `code` for a member who just registered.
    ///
    /// `code` is either an invitation code or a member's personal code. A
    /// personal code reuses that member's open invitation to the same email,
    /// or creates a `registered` referral. Credits the referrer and adds a
    /// timeline event on their side. Unknown codes and invitations that were
    /// already used give `None`.
    pub(crate) async fn complete_registration_in(
        conn: &mut PgConnection,
        code: &str,
        new_user: &User,
    ) -> Result<Option<Referral>, sqlx::Error> {
        let by_code = format!("SELECT {COLUMNS} FROM referrals WHERE code = $1 FOR UPDATE");
        let invite = sqlx::query_as::<_, Referral>(&by_code)
            .bind(code)
            .fetch_optional(&mut *conn)
            .await?;

        let invite = match invite {
            Some(invite) => invite,
            None => {
                let referrer_id: Option<DbId> = sqlx::query_scalar(
                    "SELECT id FROM users WHERE referral_code = $1 AND id <> $2",
                )
                .bind(code)
                .bind(new_user.id)
                .fetch_optional(&mut *conn)
                .await?;
                let Some(referrer_id) = referrer_id else {
                    tracing::info!(%code, "Registration with unknown referral code");
                    return Ok(None);
                };

                let by_email = format!(
                    "SELECT {COLUMNS} FROM referrals
                     WHERE referrer_id = $1 AND referee_email = $2
                     FOR UPDATE"
                );
                let existing = sqlx::query_as::<_, Referral>(&by_email)
                    .bind(referrer_id)
                    .bind(&new_user.email)
                    .fetch_optional(&mut *conn)
                    .await?;
                match existing {
                    Some(invite) => invite,
                    None => {
                        let created = Self::create_in(
                            &mut *conn,
                            &CreateReferral {
                                referrer_id,
                                referee_email: new_user.email.clone(),
                                referee_name: Some(new_user.full_name()),
                                code: generate_code(),
                                message: None,
                                status: ReferralStatus::Registered,
                                referee_user_id: Some(new_user.id),
                            },
                        )
                        .await?;
                        Self::settle_registration_in(conn, new_user, 0, &created).await?;
                        return Ok(Some(created));
                    }
                }
            }
        };

        let Some(registered) = Self::mark_registered_in(&mut *conn, invite.id, new_user.id).await?
        else {
            tracing::info!(referral_id = invite.id, status = %invite.status, "Referral already used");
            return Ok(None);
        };
        Self::settle_registration_in(conn, new_user, invite.reward_points, &registered).await?;
        Ok(Some(registered))
    }

    async fn settle_registration_in(
        conn: &mut PgConnection,
        new_user: &User,
        previous_points: i32,
        referral: &Referral,
    ) -> Result<(), sqlx::Error> {
        Self::credit_referrer_in(&mut *conn, referral, referral.reward_points - previous_points)
            .await?;
        TimelineRepo::create_in(
            conn,
            &CreateTimelineEvent {
                user_id: referral.referrer_id,
                kind: TimelineEventKind::Referral,
                title: format!("{} a rejoint la Masterclass", new_user.full_name()),
                description: None,
                occurred_at: None,
                metadata: Some(json!({ "referral_id": referral.id })),
            },
        )
        .await?;
        Ok(())
    }

    /// Post the change in reward points to the referrer. Nothing for a zero delta.
    async fn credit_referrer_in(
        conn: &mut PgConnection,
        referral: &Referral,
        delta: i32,
    ) -> Result<(), sqlx::Error> {
        if delta == 0 {
            return Ok(());
        }

        sqlx::query(
            "INSERT INTO point_transactions (user_id, points, reason, source_type, source_id)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(referral.referrer_id)
        .bind(delta)
        .bind(format!(
            "Parrainage {} : {}",
            referral.referee_email,
            referral.status().label()
        ))
        .bind(POINT_SOURCE_REFERRAL)
        .bind(referral.id)
        .execute(conn)
        .await?;

        tracing::info!(
            referral_id = referral.id,
            referrer_id = referral.referrer_id,
            delta,
            "Referral points credited"
        );
        Ok(())
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM referrals WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
