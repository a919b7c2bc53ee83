//! Contact requests: the public form and the admin inbox.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use validator::Validate;

use masterclass_core::activity::{action_types, entity_types};
use masterclass_core::contact::{validate_contact_message, ContactStatus};
use masterclass_core::email_template::EmailTemplateType;
use masterclass_core::notification::NotificationKind;
use masterclass_core::types::DbId;
use masterclass_db::models::contact::{Contact, ContactFilter, CreateContact, UpdateContactStatus};
use masterclass_db::models::notification::CreateNotification;
use masterclass_db::repositories::{ContactRepo, NotificationRepo};
use masterclass_events::queue_template_email;

use crate::activity;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::ListParams;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

/// POST /api/v1/contact
///
/// Stores the request as `nouveau`, notifies the back office and queues the
/// confirmation email when that template is auto-send. Once the row is
/// stored the request succeeds; later failures are only logged.
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<CreateContact>,
) -> AppResult<(StatusCode, Json<DataResponse<Contact>>)> {
    input.validate()?;
    validate_contact_message(&input.subject, &input.message)?;

    let contact = ContactRepo::create(&state.pool, &input).await?;
    tracing::info!(contact_id = contact.id, "Contact request received");

    if let Err(e) = NotificationRepo::create(
        &state.pool,
        &CreateNotification {
            kind: NotificationKind::Contact,
            title: "Nouvelle demande de contact".to_string(),
            message: format!("{} : {}", contact.name, contact.subject),
            link: Some(format!("/admin/contacts/{}", contact.id)),
            entity_type: Some(entity_types::CONTACT.to_string()),
            entity_id: Some(contact.id),
        },
    )
    .await
    {
        tracing::error!(error = %e, contact_id = contact.id, "Failed to notify contact request");
    }

    let variables = json!({ "name": contact.name, "subject": contact.subject });
    if let Err(e) = queue_template_email(
        &state.pool,
        EmailTemplateType::ContactConfirmation,
        &contact.email,
        variables,
    )
    .await
    {
        tracing::warn!(error = %e, contact_id = contact.id, "Failed to queue contact confirmation");
    }

    Ok((StatusCode::CREATED, Json(DataResponse { data: contact })))
}

/// GET /api/v1/admin/contacts?q=&status=&from=&to=&limit=&offset=
pub async fn admin_list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Page<Contact>>>> {
    let (limit, offset) = params.page();
    let filter = ContactFilter {
        query: params.text(),
        status: params.parsed_status::<ContactStatus>()?,
        range: params.range()?,
    };

    let rows = ContactRepo::list_page(&state.pool, limit, offset).await?;
    let total = ContactRepo::count(&state.pool).await?;

    Ok(Json(DataResponse {
        data: Page::new(filter.apply(rows), total, limit, offset),
    }))
}

/// PATCH /api/v1/admin/contacts/{id}/status
///
/// Any status may follow any other.
pub async fn update_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContactStatus>,
) -> AppResult<Json<DataResponse<Contact>>> {
    let before = ContactRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Contact", id))?;

    let contact = ContactRepo::update_status(&state.pool, id, input.status)
        .await?
        .ok_or_else(|| AppError::not_found("Contact", id))?;

    activity::record(
        &state.pool,
        &admin,
        action_types::UPDATE_CONTACT_STATUS,
        entity_types::CONTACT,
        Some(id),
        &json!({ "from": before.status, "to": contact.status, "email": contact.email }),
    )
    .await;

    Ok(Json(DataResponse { data: contact }))
}

/// DELETE /api/v1/admin/contacts/{id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let contact = ContactRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Contact", id))?;

    if !ContactRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Contact", id));
    }

    activity::record(
        &state.pool,
        &admin,
        action_types::DELETE_CONTACT,
        entity_types::CONTACT,
        Some(id),
        &json!({ "name": contact.name, "email": contact.email, "subject": contact.subject }),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
