//! Formation catalogue: public pages and admin CRUD, sessions included.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use masterclass_core::activity::{action_types, entity_types};
use masterclass_core::filtering::TextQuery;
use masterclass_core::formation::{validate_formation, validate_session, FormationLevel};
use masterclass_core::types::DbId;
use masterclass_db::models::formation::{
    CreateFormation, CreateFormationSession, Formation, FormationFilter, FormationSession,
    FormationWithSessions, UpdateFormation, UpdateFormationSession,
};
use masterclass_db::repositories::{FormationRepo, FormationSessionRepo};
use masterclass_db::DbPool;

use crate::activity;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

/// `?q=&level=&is_published=&limit=&offset=`
#[derive(Debug, Default, Deserialize)]
pub struct FormationListParams {
    pub q: Option<String>,
    pub level: Option<String>,
    pub is_published: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /api/v1/formations
pub async fn list_published(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Formation>>>> {
    let formations = FormationRepo::list_published(&state.pool).await?;
    Ok(Json(DataResponse { data: formations }))
}

/// GET /api/v1/formations/{id}
///
/// Unpublished formations are reported as missing.
pub async fn get_published(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<FormationWithSessions>>> {
    let formation = FormationRepo::find_with_sessions(&state.pool, id, true)
        .await?
        .ok_or_else(|| AppError::not_found("Formation", id))?;
    Ok(Json(DataResponse { data: formation }))
}

// ---------------------------------------------------------------------------
// Admin: formations
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/formations
pub async fn admin_list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<FormationListParams>,
) -> AppResult<Json<DataResponse<Page<Formation>>>> {
    let filter = FormationFilter {
        query: TextQuery::new(params.q.as_deref()),
        level: params
            .level
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::parse::<FormationLevel>)
            .transpose()?,
        is_published: params.is_published,
    };
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();

    let rows = FormationRepo::list_page(&state.pool, limit, offset).await?;
    let total = FormationRepo::count(&state.pool).await?;

    Ok(Json(DataResponse {
        data: Page::new(filter.apply(rows), total, limit, offset),
    }))
}

/// GET /api/v1/admin/formations/{id}
pub async fn admin_get(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<FormationWithSessions>>> {
    let formation = FormationRepo::find_with_sessions(&state.pool, id, false)
        .await?
        .ok_or_else(|| AppError::not_found("Formation", id))?;
    Ok(Json(DataResponse { data: formation }))
}

/// POST /api/v1/admin/formations
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateFormation>,
) -> AppResult<(StatusCode, Json<DataResponse<Formation>>)> {
    input.validate()?;
    validate_formation(&input.title, input.price_cents, input.duration_hours)?;

    let formation = FormationRepo::create(&state.pool, &input).await?;
    tracing::info!(formation_id = formation.id, slug = %formation.slug, "Formation created");

    activity::record(
        &state.pool,
        &admin,
        action_types::CREATE_FORMATION,
        entity_types::FORMATION,
        Some(formation.id),
        &json!({ "title": formation.title, "slug": formation.slug }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: formation })))
}

/// PUT /api/v1/admin/formations/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFormation>,
) -> AppResult<Json<DataResponse<Formation>>> {
    input.validate()?;
    let current = find_formation(&state.pool, id).await?;
    validate_formation(
        input.title.as_deref().unwrap_or(&current.title),
        input.price_cents.unwrap_or(current.price_cents),
        input.duration_hours.unwrap_or(current.duration_hours),
    )?;

    let formation = FormationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Formation", id))?;

    activity::record(
        &state.pool,
        &admin,
        action_types::UPDATE_FORMATION,
        entity_types::FORMATION,
        Some(id),
        &json!({
            "title": formation.title,
            "is_published": formation.is_published,
            "price_cents": formation.price_cents,
        }),
    )
    .await;

    Ok(Json(DataResponse { data: formation }))
}

/// DELETE /api/v1/admin/formations/{id}
///
/// Sessions are removed with their formation.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let formation = find_formation(&state.pool, id).await?;
    if !FormationRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Formation", id));
    }

    activity::record(
        &state.pool,
        &admin,
        action_types::DELETE_FORMATION,
        entity_types::FORMATION,
        Some(id),
        &json!({ "title": formation.title, "slug": formation.slug }),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Admin: sessions
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/formations/{formation_id}/sessions
pub async fn list_sessions(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(formation_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<FormationSession>>>> {
    find_formation(&state.pool, formation_id).await?;
    let sessions = FormationSessionRepo::list_for_formation(&state.pool, formation_id).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// POST /api/v1/admin/formations/{formation_id}/sessions
pub async fn create_session(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(formation_id): Path<DbId>,
    Json(input): Json<CreateFormationSession>,
) -> AppResult<(StatusCode, Json<DataResponse<FormationSession>>)> {
    input.validate()?;
    validate_session(input.starts_at, input.ends_at, input.capacity)?;
    let formation = find_formation(&state.pool, formation_id).await?;

    let session = FormationSessionRepo::create(&state.pool, formation_id, &input).await?;

    activity::record(
        &state.pool,
        &admin,
        action_types::CREATE_SESSION,
        entity_types::FORMATION_SESSION,
        Some(session.id),
        &json!({
            "formation": formation.title,
            "starts_at": session.starts_at,
            "location": session.location,
        }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: session })))
}

/// PUT /api/v1/admin/formations/{formation_id}/sessions/{id}
pub async fn update_session(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((formation_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateFormationSession>,
) -> AppResult<Json<DataResponse<FormationSession>>> {
    input.validate()?;
    let current = FormationSessionRepo::find(&state.pool, formation_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("FormationSession", id))?;

    let capacity = input.capacity.unwrap_or(current.capacity);
    validate_session(
        input.starts_at.unwrap_or(current.starts_at),
        input.ends_at.unwrap_or(current.ends_at),
        capacity,
    )?;
    if input.seats_taken.unwrap_or(current.seats_taken) > capacity {
        return Err(AppError::BadRequest(
            "Seats taken cannot exceed the session capacity".into(),
        ));
    }

    let session = FormationSessionRepo::update(&state.pool, formation_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("FormationSession", id))?;

    activity::record(
        &state.pool,
        &admin,
        action_types::UPDATE_SESSION,
        entity_types::FORMATION_SESSION,
        Some(id),
        &json!({
            "formation_id": formation_id,
            "starts_at": session.starts_at,
            "capacity": session.capacity,
            "seats_taken": session.seats_taken,
        }),
    )
    .await;

    Ok(Json(DataResponse { data: session }))
}

/// DELETE /api/v1/admin/formations/{formation_id}/sessions/{id}
pub async fn delete_session(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((formation_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if !FormationSessionRepo::delete(&state.pool, formation_id, id).await? {
        return Err(AppError::not_found("FormationSession", id));
    }

    activity::record(
        &state.pool,
        &admin,
        action_types::DELETE_SESSION,
        entity_types::FORMATION_SESSION,
        Some(id),
        &json!({ "formation_id": formation_id }),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

async fn find_formation(pool: &DbPool, id: DbId) -> AppResult<Formation> {
    FormationRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Formation", id))
}
