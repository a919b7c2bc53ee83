//! Referral invitations: member invites, link tracking, and the admin list.
//!
//! Every referral row carries its own code. Members also own a personal
//! code (`users.referral_code`) used in share links; registering with a
//! personal code creates the referral on the spot.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use validator::Validate;

use masterclass_core::activity::{action_types, entity_types};
use masterclass_core::email_template::EmailTemplateType;
use masterclass_core::notification::NotificationKind;
use masterclass_core::referral::{
    generate_code, invite_url, normalize_code, summarize, ReferralStatus, ReferralSummary,
    ShareLinks,
};
use masterclass_core::types::DbId;
use masterclass_db::models::notification::CreateNotification;
use masterclass_db::models::referral::{
    CreateReferral, InviteReferral, Referral, ReferralFilter, ReferralWithReferrer,
    UpdateReferralStatus,
};
use masterclass_db::models::user::User;
use masterclass_db::repositories::{NotificationRepo, ReferralRepo, UserRepo};
use masterclass_db::DbPool;
use masterclass_events::queue_template_email;

use crate::activity;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::ListParams;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct MyReferrals {
    pub referrals: Vec<Referral>,
    pub summary: ReferralSummary,
}

#[derive(Debug, Serialize)]
pub struct TrackResult {
    pub code: String,
    /// Whether a pending invitation moved to `clicked`.
    pub clicked: bool,
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /api/v1/referrals/track/{code}
///
/// Called when an invite link is opened. A pending invitation becomes
/// `clicked`; personal member codes are acknowledged without a state change.
pub async fn track(
    State(state): State<AppState>,
    Path(raw_code): Path<String>,
) -> AppResult<Json<DataResponse<TrackResult>>> {
    let code = normalize_code(&raw_code)?;

    let clicked = match ReferralRepo::find_by_code(&state.pool, &code).await? {
        Some(referral) => ReferralRepo::mark_clicked(&state.pool, referral.id).await?,
        None => {
            if UserRepo::find_by_referral_code(&state.pool, &code).await?.is_none() {
                return Err(AppError::BadRequest(format!("Unknown referral code '{code}'")));
            }
            false
        }
    };

    tracing::debug!(%code, clicked, "Referral link opened");
    Ok(Json(DataResponse {
        data: TrackResult { code, clicked },
    }))
}

// ---------------------------------------------------------------------------
// Member
// ---------------------------------------------------------------------------

/// GET /api/v1/me/referrals
pub async fn list_mine(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MyReferrals>>> {
    let referrals = ReferralRepo::list_for_referrer(&state.pool, user.user_id).await?;
    let summary = summarize(referrals.iter().map(Referral::status));
    Ok(Json(DataResponse {
        data: MyReferrals { referrals, summary },
    }))
}

/// POST /api/v1/me/referrals
///
/// Invite a colleague. The invitation email is queued when the
/// `referral_invitation` template is active and auto-send.
pub async fn invite(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<InviteReferral>,
) -> AppResult<(StatusCode, Json<DataResponse<Referral>>)> {
    input.validate()?;
    let referrer = load_user(&state.pool, user.user_id).await?;

    let referee_email = input.referee_email.trim().to_lowercase();
    if referee_email == referrer.email.to_lowercase() {
        return Err(AppError::BadRequest("You cannot invite yourself".into()));
    }

    let referral = ReferralRepo::create(
        &state.pool,
        &CreateReferral {
            referrer_id: referrer.id,
            referee_email,
            referee_name: input.referee_name.clone(),
            code: generate_code(),
            message: input.message.clone(),
            status: ReferralStatus::Pending,
            referee_user_id: None,
        },
    )
    .await?;

    tracing::info!(referral_id = referral.id, referrer_id = referrer.id, "Referral invitation created");

    let link = invite_url(&state.config.public_site_url, &referral.code)?;
    let variables = json!({
        "referrer_name": referrer.full_name(),
        "referee_name": referral.referee_name.clone().unwrap_or_default(),
        "referral_code": referral.code,
        "invite_url": link,
    });
    if let Err(e) = queue_template_email(
        &state.pool,
        EmailTemplateType::ReferralInvitation,
        &referral.referee_email,
        variables,
    )
    .await
    {
        tracing::warn!(error = %e, referral_id = referral.id, "Failed to queue invitation email");
    }

    Ok((StatusCode::CREATED, Json(DataResponse { data: referral })))
}

/// GET /api/v1/me/referrals/share
pub async fn share_links(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ShareLinks>>> {
    let member = load_user(&state.pool, user.user_id).await?;
    let links = ShareLinks::build(&state.config.public_site_url, &member.referral_code)?;
    Ok(Json(DataResponse { data: links }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/referrals?q=&status=&from=&to=&limit=&offset=
pub async fn admin_list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Page<ReferralWithReferrer>>>> {
    let (limit, offset) = params.page();
    let filter = ReferralFilter {
        query: params.text(),
        status: params.parsed_status::<ReferralStatus>()?,
        range: params.range()?,
    };

    let rows = ReferralRepo::list_page_with_referrer(&state.pool, limit, offset).await?;
    let total = ReferralRepo::count(&state.pool).await?;
    let items = filter.apply(rows);

    Ok(Json(DataResponse {
        data: Page::new(items, total, limit, offset),
    }))
}

/// PATCH /api/v1/admin/referrals/{id}/status
///
/// Any transition is allowed. The referrer's balance follows the change in
/// the referral's reward; repeated or concurrent requests for the same
/// status credit nothing more.
pub async fn admin_update_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateReferralStatus>,
) -> AppResult<Json<DataResponse<Referral>>> {
    let change = ReferralRepo::change_status(&state.pool, id, input.status)
        .await?
        .ok_or_else(|| AppError::not_found("Referral", id))?;

    activity::record(
        &state.pool,
        &admin,
        action_types::UPDATE_REFERRAL_STATUS,
        entity_types::REFERRAL,
        Some(id),
        &json!({
            "from": change.previous.status,
            "to": change.referral.status,
            "points": change.points_delta,
        }),
    )
    .await;

    Ok(Json(DataResponse {
        data: change.referral,
    }))
}

// ---------------------------------------------------------------------------
// Registration hook
// ---------------------------------------------------------------------------

/// Tell the back office a referred member signed up.
///
/// The registration is already committed; a failure here is only logged.
pub(crate) async fn notify_referral_registration(
    pool: &DbPool,
    new_user: &User,
    referral: &Referral,
) {
    let result = NotificationRepo::create(
        pool,
        &CreateNotification {
            kind: NotificationKind::Referral,
            title: "Nouvelle inscription par parrainage".to_string(),
            message: format!("{} s'est inscrit via un parrainage", new_user.full_name()),
            link: Some("/admin/parrainages".to_string()),
            entity_type: Some(entity_types::REFERRAL.to_string()),
            entity_id: Some(referral.id),
        },
    )
    .await;

    if let Err(e) = result {
        tracing::error!(error = %e, referral_id = referral.id, "Failed to notify referral registration");
    }
}

pub(crate) async fn load_user(pool: &DbPool, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))
}
