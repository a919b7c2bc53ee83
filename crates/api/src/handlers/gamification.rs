//! Member gamification views: badges, level, learning path.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use masterclass_core::gamification::{
    badge_collection_stats, learning_path_progress, BadgeCollectionStats, LearningPathProgress,
    LevelProgress,
};
use masterclass_db::models::badge::MemberBadge;
use masterclass_db::models::milestone::LearningMilestone;
use masterclass_db::models::points::PointTransaction;
use masterclass_db::repositories::{BadgeRepo, MilestoneRepo, PointRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct MyBadges {
    pub badges: Vec<MemberBadge>,
    pub stats: BadgeCollectionStats,
    pub level: LevelProgress,
}

#[derive(Debug, Serialize)]
pub struct MyProgress {
    pub level: LevelProgress,
    pub milestones: Vec<LearningMilestone>,
    pub learning_path: LearningPathProgress,
    /// Most recent ledger entries first.
    pub recent_points: Vec<PointTransaction>,
}

/// Ledger entries shown on the progress page.
const RECENT_POINTS: usize = 10;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/learning-path/milestones
pub async fn list_milestones(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<LearningMilestone>>>> {
    let milestones = MilestoneRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: milestones }))
}

/// GET /api/v1/me/badges
///
/// The whole catalogue as seen by the caller (earned badges carry
/// `earned_at`), collection statistics and the current level.
pub async fn my_badges(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MyBadges>>> {
    let (badges, total_points) = tokio::try_join!(
        BadgeRepo::list_for_user(&state.pool, user.user_id),
        PointRepo::total_for_user(&state.pool, user.user_id),
    )?;

    let stats = badge_collection_stats(badges.iter().filter_map(MemberBadge::tally));
    Ok(Json(DataResponse {
        data: MyBadges {
            badges,
            stats,
            level: LevelProgress::from_points(total_points),
        },
    }))
}

/// GET /api/v1/me/progress
///
/// Level and learning-path position. The three reads are independent and
/// run concurrently.
pub async fn my_progress(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MyProgress>>> {
    let (total_points, milestones, mut ledger) = tokio::try_join!(
        PointRepo::total_for_user(&state.pool, user.user_id),
        MilestoneRepo::list(&state.pool),
        PointRepo::list_for_user(&state.pool, user.user_id),
    )?;

    let specs: Vec<_> = milestones.iter().map(LearningMilestone::spec).collect();
    let learning_path = learning_path_progress(&specs, total_points);
    ledger.truncate(RECENT_POINTS);

    Ok(Json(DataResponse {
        data: MyProgress {
            level: LevelProgress::from_points(total_points),
            milestones,
            learning_path,
            recent_points: ledger,
        },
    }))
}
