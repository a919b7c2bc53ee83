pub mod admin;
pub mod auth;
pub mod health;
pub mod me;
pub mod public;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
///
/// /formations, /articles, /podcasts                public catalogue
/// /learning-path/milestones                        public milestone list
/// /contact, /satisfaction                          public forms (POST)
/// /referrals/track/{code}                          invite link opened
///
/// /me/profile, /me/timeline                        member profile (auth required)
/// /me/badges, /me/progress                         gamification
/// /me/referrals, /me/referrals/share               referral program
///
/// /admin/formations[/{id}[/sessions[/{id}]]]        catalogue management
/// /admin/contacts                                  contact inbox
/// /admin/email-templates                           templates + preview
/// /admin/satisfaction                              survey dashboard
/// /admin/activity-logs[/export]                    admin history
/// /admin/notifications                             notification feed
/// /admin/badges                                    badge catalogue + awards
/// /admin/referrals                                 referral follow-up
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(public::router())
        .nest("/me", me::router())
        .nest("/admin", admin::router())
}
