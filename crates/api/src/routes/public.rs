//! Unauthenticated routes: catalogue, public forms, referral tracking.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{contacts, content, formations, gamification, referrals, satisfaction};
use crate::state::AppState;

/// Routes merged at the `/api/v1` root.
///
/// ```text
/// GET  /formations                -> formations::list_published
/// GET  /formations/{id}           -> formations::get_published
/// GET  /articles                  -> content::list_articles
/// GET  /articles/{slug}           -> content::get_article
/// GET  /podcasts                  -> content::list_podcasts
/// GET  /learning-path/milestones  -> gamification::list_milestones
/// POST /contact                   -> contacts::submit
/// POST /satisfaction              -> satisfaction::submit
/// GET  /referrals/track/{code}    -> referrals::track
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/formations", get(formations::list_published))
        .route("/formations/{id}", get(formations::get_published))
        .route("/articles", get(content::list_articles))
        .route("/articles/{slug}", get(content::get_article))
        .route("/podcasts", get(content::list_podcasts))
        .route("/learning-path/milestones", get(gamification::list_milestones))
        .route("/contact", post(contacts::submit))
        .route("/satisfaction", post(satisfaction::submit))
        .route("/referrals/track/{code}", get(referrals::track))
}
