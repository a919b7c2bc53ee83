//! Request extractors for authentication and authorization.
//!
//! - [`auth::AuthUser`] -- the caller identified by a Bearer access token.
//! - [`rbac::RequireAdmin`] -- an [`auth::AuthUser`] holding the `admin` role.

pub mod auth;
pub mod rbac;
