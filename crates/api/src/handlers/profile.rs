//! Member profile and timeline (`/me/profile`, `/me/timeline`).

use axum::extract::State;
use axum::Json;
use validator::Validate;

use masterclass_core::timeline::{group_by_month, MonthGroup};
use masterclass_db::models::timeline::TimelineEntry;
use masterclass_db::models::user::{UpdateProfile, UserProfile};
use masterclass_db::repositories::{TimelineRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::referrals::load_user;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/me/profile
pub async fn get_profile(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let member = load_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse {
        data: member.into(),
    }))
}

/// PUT /api/v1/me/profile
///
/// Absent fields are left unchanged. Returns the updated profile.
pub async fn update_profile(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    input.validate()?;
    let updated = UserRepo::update_profile(&state.pool, user.user_id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("User", user.user_id))?;

    tracing::info!(user_id = user.user_id, "Profile updated");
    Ok(Json(DataResponse {
        data: updated.into(),
    }))
}

/// GET /api/v1/me/timeline
///
/// Events grouped by month, newest month first.
pub async fn timeline(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<MonthGroup<TimelineEntry>>>>> {
    let events = TimelineRepo::list_for_user(&state.pool, user.user_id).await?;
    let entries = events.into_iter().map(TimelineEntry::from).collect();
    Ok(Json(DataResponse {
        data: group_by_month(entries),
    }))
}
