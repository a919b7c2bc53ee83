//! Route definitions for the `/admin` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{
    activity_logs, badges, contacts, email_templates, formations, notifications, referrals,
    satisfaction,
};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET    /formations                            -> formations::admin_list
/// POST   /formations                            -> formations::create
/// GET    /formations/{id}                       -> formations::admin_get
/// PUT    /formations/{id}                       -> formations::update
/// DELETE /formations/{id}                       -> formations::delete
/// GET    /formations/{id}/sessions              -> formations::list_sessions
/// POST   /formations/{id}/sessions              -> formations::create_session
/// PUT    /formations/{id}/sessions/{session_id} -> formations::update_session
/// DELETE /formations/{id}/sessions/{session_id} -> formations::delete_session
///
/// GET    /contacts                              -> contacts::admin_list
/// PATCH  /contacts/{id}/status                  -> contacts::update_status
/// DELETE /contacts/{id}                         -> contacts::delete
///
/// GET    /email-templates                       -> email_templates::list
/// POST   /email-templates                       -> email_templates::create
/// GET    /email-templates/{id}                  -> email_templates::get
/// PUT    /email-templates/{id}                  -> email_templates::update
/// DELETE /email-templates/{id}                  -> email_templates::delete
/// POST   /email-templates/{id}/preview          -> email_templates::preview
///
/// GET    /satisfaction                          -> satisfaction::admin_overview
///
/// GET    /activity-logs                         -> activity_logs::list
/// GET    /activity-logs/export                  -> activity_logs::export
///
/// GET    /notifications                         -> notifications::list
/// GET    /notifications/unread-count            -> notifications::unread_count
/// POST   /notifications/read-all                -> notifications::mark_all_read
/// POST   /notifications/{id}/read               -> notifications::mark_read
///
/// GET    /badges                                -> badges::list
/// POST   /badges                                -> badges::create
/// GET    /badges/export                         -> badges::export
/// POST   /badges/{id}/award                     -> badges::award
///
/// GET    /referrals                             -> referrals::admin_list
/// PATCH  /referrals/{id}/status                 -> referrals::admin_update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        // Formations and their sessions.
        .route(
            "/formations",
            get(formations::admin_list).post(formations::create),
        )
        .route(
            "/formations/{id}",
            get(formations::admin_get)
                .put(formations::update)
                .delete(formations::delete),
        )
        .route(
            "/formations/{id}/sessions",
            get(formations::list_sessions).post(formations::create_session),
        )
        .route(
            "/formations/{id}/sessions/{session_id}",
            axum::routing::put(formations::update_session).delete(formations::delete_session),
        )
        // Contact inbox.
        .route("/contacts", get(contacts::admin_list))
        .route("/contacts/{id}", axum::routing::delete(contacts::delete))
        .route("/contacts/{id}/status", patch(contacts::update_status))
        // Email templates.
        .route(
            "/email-templates",
            get(email_templates::list).post(email_templates::create),
        )
        .route(
            "/email-templates/{id}",
            get(email_templates::get)
                .put(email_templates::update)
                .delete(email_templates::delete),
        )
        .route("/email-templates/{id}/preview", post(email_templates::preview))
        // Satisfaction dashboard.
        .route("/satisfaction", get(satisfaction::admin_overview))
        // Activity history.
        .route("/activity-logs", get(activity_logs::list))
        .route("/activity-logs/export", get(activity_logs::export))
        // Notifications.
        .route("/notifications", get(notifications::list))
        .route("/notifications/unread-count", get(notifications::unread_count))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route("/notifications/{id}/read", post(notifications::mark_read))
        // Badges.
        .route("/badges", get(badges::list).post(badges::create))
        .route("/badges/export", get(badges::export))
        .route("/badges/{id}/award", post(badges::award))
        // Referrals.
        .route("/referrals", get(referrals::admin_list))
        .route("/referrals/{id}/status", patch(referrals::admin_update_status))
}
