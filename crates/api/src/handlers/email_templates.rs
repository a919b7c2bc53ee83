//! Admin email template management and preview.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use validator::Validate;

use masterclass_core::activity::{action_types, entity_types};
use masterclass_core::email_template::{
    placeholders, render_email, validate_send_delay, validate_template, EmailTemplateType,
    RenderedEmail,
};
use masterclass_core::types::DbId;
use masterclass_db::models::email::{
    CreateEmailTemplate, EmailTemplate, PreviewEmailTemplate, UpdateEmailTemplate,
};
use masterclass_db::repositories::EmailTemplateRepo;
use masterclass_db::DbPool;

use crate::activity;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TemplatePreview {
    #[serde(flatten)]
    pub rendered: RenderedEmail,
    /// Every placeholder found in the template.
    pub placeholders: Vec<String>,
    /// Variables the application supplies for this template type.
    pub available_variables: &'static [&'static str],
}

/// GET /api/v1/admin/email-templates
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<EmailTemplate>>>> {
    let templates = EmailTemplateRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// GET /api/v1/admin/email-templates/{id}
pub async fn get(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EmailTemplate>>> {
    let template = find_template(&state.pool, id).await?;
    Ok(Json(DataResponse { data: template }))
}

/// POST /api/v1/admin/email-templates
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateEmailTemplate>,
) -> AppResult<(StatusCode, Json<DataResponse<EmailTemplate>>)> {
    input.validate()?;
    validate_template(&input.name, &input.subject, &input.content)?;
    validate_send_delay(input.send_delay_minutes)?;

    let template = EmailTemplateRepo::create(&state.pool, &input).await?;

    activity::record(
        &state.pool,
        &admin,
        action_types::CREATE_EMAIL_TEMPLATE,
        entity_types::EMAIL_TEMPLATE,
        Some(template.id),
        &json!({
            "name": template.name,
            "template_type": template.template_type,
            "auto_send": template.auto_send,
        }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// PUT /api/v1/admin/email-templates/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEmailTemplate>,
) -> AppResult<Json<DataResponse<EmailTemplate>>> {
    input.validate()?;
    let current = find_template(&state.pool, id).await?;
    validate_template(
        input.name.as_deref().unwrap_or(&current.name),
        input.subject.as_deref().unwrap_or(&current.subject),
        input.content.as_deref().unwrap_or(&current.content),
    )?;
    if let Some(minutes) = input.send_delay_minutes {
        validate_send_delay(minutes)?;
    }

    let template = EmailTemplateRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("EmailTemplate", id))?;

    activity::record(
        &state.pool,
        &admin,
        action_types::UPDATE_EMAIL_TEMPLATE,
        entity_types::EMAIL_TEMPLATE,
        Some(id),
        &json!({
            "name": template.name,
            "is_active": template.is_active,
            "auto_send": template.auto_send,
            "send_delay_minutes": template.send_delay_minutes,
        }),
    )
    .await;

    Ok(Json(DataResponse { data: template }))
}

/// DELETE /api/v1/admin/email-templates/{id}
///
/// Queued emails keep their row; their template reference is cleared.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let template = find_template(&state.pool, id).await?;
    if !EmailTemplateRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("EmailTemplate", id));
    }

    activity::record(
        &state.pool,
        &admin,
        action_types::DELETE_EMAIL_TEMPLATE,
        entity_types::EMAIL_TEMPLATE,
        Some(id),
        &json!({ "name": template.name, "template_type": template.template_type }),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/email-templates/{id}/preview
///
/// Renders with the supplied variables. Placeholders without a value stay
/// in the output and are listed under `missing`.
pub async fn preview(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<PreviewEmailTemplate>,
) -> AppResult<Json<DataResponse<TemplatePreview>>> {
    let template = find_template(&state.pool, id).await?;

    let available_variables = template
        .template_type
        .parse::<EmailTemplateType>()
        .map(EmailTemplateType::variables)
        .unwrap_or(&[]);

    Ok(Json(DataResponse {
        data: TemplatePreview {
            rendered: render_email(&template.subject, &template.content, &input.variables),
            placeholders: placeholders(&template.subject, &template.content),
            available_variables,
        },
    }))
}

async fn find_template(pool: &DbPool, id: DbId) -> AppResult<EmailTemplate> {
    EmailTemplateRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("EmailTemplate", id))
}
