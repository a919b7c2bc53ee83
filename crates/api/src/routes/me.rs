//! Route definitions for the `/me` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{gamification, profile, referrals};
use crate::state::AppState;

/// Routes mounted at `/me`. Every route requires a member token.
///
/// ```text
/// GET  /profile          -> profile::get_profile
/// PUT  /profile          -> profile::update_profile
/// GET  /timeline         -> profile::timeline
/// GET  /badges           -> gamification::my_badges
/// GET  /progress         -> gamification::my_progress
/// GET  /referrals        -> referrals::list_mine
/// POST /referrals        -> referrals::invite
/// GET  /referrals/share  -> referrals::share_links
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route("/timeline", get(profile::timeline))
        .route("/badges", get(gamification::my_badges))
        .route("/progress", get(gamification::my_progress))
        .route(
            "/referrals",
            get(referrals::list_mine).post(referrals::invite),
        )
        .route("/referrals/share", get(referrals::share_links))
}
