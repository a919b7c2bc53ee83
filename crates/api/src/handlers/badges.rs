//! Admin badge catalogue: list, create, award, export.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use masterclass_core::activity::{action_types, entity_types};
use masterclass_core::badge::{validate_badge_points, BadgeCategory, BadgeRarity};
use masterclass_core::email_template::EmailTemplateType;
use masterclass_core::filtering::TextQuery;
use masterclass_core::search::MAX_EXPORT_ROWS;
use masterclass_core::types::DbId;
use masterclass_db::models::badge::{
    AwardBadge, AwardOutcome, Badge, BadgeFilter, BadgeWithAwards, CreateBadge,
};
use masterclass_db::repositories::{BadgeRepo, UserRepo};
use masterclass_events::queue_template_email;

use crate::activity;
use crate::error::{AppError, AppResult};
use crate::handlers::export_download;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{ExportParams, PaginationParams};
use crate::response::{DataResponse, Page};
use crate::state::AppState;

/// `?q=&category=&rarity=&is_active=&limit=&offset=`
#[derive(Debug, Default, Deserialize)]
pub struct BadgeListParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub rarity: Option<String>,
    pub is_active: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl BadgeListParams {
    fn filter(&self) -> AppResult<BadgeFilter> {
        Ok(BadgeFilter {
            query: TextQuery::new(self.q.as_deref()),
            category: self
                .category
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(str::parse::<BadgeCategory>)
                .transpose()?,
            rarity: self
                .rarity
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(str::parse::<BadgeRarity>)
                .transpose()?,
            is_active: self.is_active,
        })
    }
}

/// GET /api/v1/admin/badges
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<BadgeListParams>,
) -> AppResult<Json<DataResponse<Page<BadgeWithAwards>>>> {
    let filter = params.filter()?;
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();

    let rows = BadgeRepo::list_with_awards(&state.pool, limit, offset).await?;
    let total = BadgeRepo::count(&state.pool).await?;

    Ok(Json(DataResponse {
        data: Page::new(filter.apply(rows), total, limit, offset),
    }))
}

/// POST /api/v1/admin/badges
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateBadge>,
) -> AppResult<(StatusCode, Json<DataResponse<Badge>>)> {
    input.validate()?;
    validate_badge_points(input.points)?;

    let badge = BadgeRepo::create(&state.pool, &input).await?;

    activity::record(
        &state.pool,
        &admin,
        action_types::CREATE_BADGE,
        entity_types::BADGE,
        Some(badge.id),
        &json!({
            "name": badge.name,
            "category": badge.category,
            "rarity": badge.rarity,
            "points": badge.points,
        }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: badge })))
}

/// POST /api/v1/admin/badges/{id}/award
///
/// Awarding a badge the member already holds is a no-op reported with
/// `newly_awarded = false`.
pub async fn award(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(badge_id): Path<DbId>,
    Json(input): Json<AwardBadge>,
) -> AppResult<Json<DataResponse<AwardOutcome>>> {
    let badge = BadgeRepo::find_by_id(&state.pool, badge_id)
        .await?
        .ok_or_else(|| AppError::not_found("Badge", badge_id))?;
    if !badge.is_active {
        return Err(AppError::BadRequest(format!(
            "Badge '{}' is inactive and cannot be awarded",
            badge.name
        )));
    }

    let member = UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", input.user_id))?;

    let outcome = BadgeRepo::award(&state.pool, &badge, member.id, Some(admin.user_id)).await?;

    if outcome.newly_awarded {
        tracing::info!(badge_id, user_id = member.id, points = badge.points, "Badge awarded");

        let variables = json!({
            "first_name": member.first_name,
            "badge_name": badge.name,
            "badge_points": badge.points.to_string(),
        });
        if let Err(e) =
            queue_template_email(&state.pool, EmailTemplateType::BadgeEarned, &member.email, variables)
                .await
        {
            tracing::warn!(error = %e, badge_id, user_id = member.id, "Failed to queue badge email");
        }

        activity::record(
            &state.pool,
            &admin,
            action_types::AWARD_BADGE,
            entity_types::BADGE,
            Some(badge.id),
            &json!({ "badge": badge.name, "user_id": member.id, "points": badge.points }),
        )
        .await;
    }

    Ok(Json(DataResponse { data: outcome }))
}

/// GET /api/v1/admin/badges/export?format=csv|pdf
///
/// Same filters as the list, applied to the first export batch.
pub async fn export(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<BadgeListParams>,
    Query(export): Query<ExportParams>,
) -> AppResult<Response> {
    let format = export.format()?;
    let filter = params.filter()?;

    let rows = BadgeRepo::list_with_awards(&state.pool, MAX_EXPORT_ROWS, 0).await?;
    let rows = filter.apply(rows);
    let response = export_download(format, "badges", "Catalogue des badges", &rows)?;

    activity::record(
        &state.pool,
        &admin,
        action_types::EXPORT,
        entity_types::BADGE,
        None,
        &json!({ "format": format, "rows": rows.len() }),
    )
    .await;

    Ok(response)
}
