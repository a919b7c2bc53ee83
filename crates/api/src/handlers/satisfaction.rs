//! Satisfaction surveys: public submission and the admin dashboard.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use masterclass_core::notification::NotificationKind;
use masterclass_core::satisfaction::{compute_stats, validate_response, SatisfactionStats};
use masterclass_core::types::DbId;
use masterclass_db::models::notification::CreateNotification;
use masterclass_db::models::satisfaction::{CreateSatisfactionSurvey, SatisfactionSurvey};
use masterclass_db::repositories::{NotificationRepo, SatisfactionRepo};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

/// `?formation_id=&limit=&offset=`
#[derive(Debug, Default, Deserialize)]
pub struct SatisfactionParams {
    pub formation_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SatisfactionOverview {
    pub responses: Page<SatisfactionSurvey>,
    /// Computed over every response matching `formation_id`, not just the page.
    pub stats: SatisfactionStats,
}

/// POST /api/v1/satisfaction
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<CreateSatisfactionSurvey>,
) -> AppResult<(StatusCode, Json<DataResponse<SatisfactionSurvey>>)> {
    input.validate()?;
    validate_response(input.rating, input.recommendation, input.comment.as_deref())?;

    let survey = SatisfactionRepo::create(&state.pool, None, &input).await?;
    tracing::info!(survey_id = survey.id, rating = survey.rating, "Satisfaction survey received");

    if let Err(e) = NotificationRepo::create(
        &state.pool,
        &CreateNotification {
            kind: NotificationKind::Satisfaction,
            title: "Nouvelle réponse au questionnaire".to_string(),
            message: format!(
                "{} a donné la note {}/5",
                survey.respondent_name.as_deref().unwrap_or("Un participant"),
                survey.rating
            ),
            link: Some("/admin/satisfaction".to_string()),
            entity_type: Some("satisfaction_survey".to_string()),
            entity_id: Some(survey.id),
        },
    )
    .await
    {
        tracing::error!(error = %e, survey_id = survey.id, "Failed to notify satisfaction survey");
    }

    Ok((StatusCode::CREATED, Json(DataResponse { data: survey })))
}

/// GET /api/v1/admin/satisfaction
pub async fn admin_overview(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<SatisfactionParams>,
) -> AppResult<Json<DataResponse<SatisfactionOverview>>> {
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();

    let (rows, total, answers) = tokio::try_join!(
        SatisfactionRepo::list_page(&state.pool, params.formation_id, limit, offset),
        SatisfactionRepo::count(&state.pool, params.formation_id),
        SatisfactionRepo::list_answers(&state.pool, params.formation_id),
    )?;

    Ok(Json(DataResponse {
        data: SatisfactionOverview {
            responses: Page::new(rows, total, limit, offset),
            stats: compute_stats(answers),
        },
    }))
}
